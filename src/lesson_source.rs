use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::models::LessonData;

/// Where lesson datasets come from. Loading finishes before any deck is built.
#[async_trait]
pub trait LessonSource: Send + Sync {
    /// Load a dataset such as `ひらがな.json` or `words.json`
    async fn load(&self, dataset: &str) -> Result<LessonData>;

    /// Human readable location for logging
    fn describe(&self) -> String;
}

/// Datasets stored in a local directory
#[derive(Debug, Clone)]
pub struct FileLessonSource {
    root: PathBuf,
}

impl FileLessonSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl LessonSource for FileLessonSource {
    async fn load(&self, dataset: &str) -> Result<LessonData> {
        let path = self.root.join(dataset);
        debug!(path = %path.display(), "Reading lesson dataset");

        let raw = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read lesson dataset {}", path.display()))?;
        let data: LessonData = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse lesson dataset {}", path.display()))?;

        info!(dataset = dataset, note_count = data.notes.len(), "Lesson dataset loaded");
        Ok(data)
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Datasets served over HTTP next to the lesson page
#[derive(Debug, Clone)]
pub struct HttpLessonSource {
    client: Client,
    base_url: String,
}

impl HttpLessonSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn dataset_url(&self, dataset: &str) -> String {
        format!("{}/{}", self.base_url, dataset)
    }
}

#[async_trait]
impl LessonSource for HttpLessonSource {
    async fn load(&self, dataset: &str) -> Result<LessonData> {
        let url = self.dataset_url(dataset);
        debug!(url = %url, "Fetching lesson dataset");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch lesson dataset {}", url))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "Lesson dataset request to {} failed with status {}",
                url,
                response.status()
            ));
        }

        let data: LessonData = response
            .json()
            .await
            .with_context(|| format!("Failed to parse lesson dataset {}", url))?;

        info!(dataset = dataset, note_count = data.notes.len(), "Lesson dataset fetched");
        Ok(data)
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

/// Pick a source for `location`: URLs are fetched, anything else is a directory
pub fn lesson_source_for(location: &str) -> Box<dyn LessonSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Box::new(HttpLessonSource::new(location))
    } else {
        Box::new(FileLessonSource::new(location))
    }
}
