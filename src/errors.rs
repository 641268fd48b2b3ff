use tracing::{info, warn};

/// Failures raised by deck construction and use
#[derive(Debug, thiserror::Error)]
pub enum DeckError {
    #[error("Invalid lesson data: {0}")]
    InvalidData(String),

    #[error("No scheduler assigned to deck")]
    SchedulerUnset,
}

/// Error context for structured logging
#[derive(Debug)]
pub struct ErrorContext {
    pub operation: String,
    pub dataset: Option<String>,
    pub sort_field: Option<String>,
}

impl ErrorContext {
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            dataset: None,
            sort_field: None,
        }
    }

    pub fn with_dataset(mut self, dataset: Option<&str>) -> Self {
        self.dataset = dataset.map(str::to_string);
        self
    }

    pub fn with_sort_field(mut self, sort_field: &str) -> Self {
        self.sort_field = Some(sort_field.to_string());
        self
    }
}

impl DeckError {
    /// Log the error with its context and hand it back for propagation
    pub fn logged(self, context: ErrorContext) -> Self {
        match &self {
            DeckError::InvalidData(_) => {
                warn!(
                    operation = %context.operation,
                    dataset = ?context.dataset,
                    sort_field = ?context.sort_field,
                    error = %self,
                    "Rejected lesson data"
                );
            }
            DeckError::SchedulerUnset => {
                info!(
                    operation = %context.operation,
                    error = %self,
                    "Deck used before a scheduler was assigned"
                );
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_context_creation() {
        let context = ErrorContext::new("build_deck")
            .with_dataset(Some("ひらがな"))
            .with_sort_field("ひらがな");

        assert_eq!(context.operation, "build_deck");
        assert_eq!(context.dataset, Some("ひらがな".to_string()));
        assert_eq!(context.sort_field, Some("ひらがな".to_string()));
    }

    #[test]
    fn test_logged_preserves_variant() {
        let error = DeckError::InvalidData("no notes".to_string())
            .logged(ErrorContext::new("build_deck"));
        assert!(matches!(error, DeckError::InvalidData(ref msg) if msg == "no notes"));
        assert_eq!(error.to_string(), "Invalid lesson data: no notes");

        let error = DeckError::SchedulerUnset.logged(ErrorContext::new("get_next"));
        assert!(matches!(error, DeckError::SchedulerUnset));
    }
}
