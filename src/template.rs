use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::models::Note;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([^{}\s]+)\s*\}\}").expect("placeholder pattern is valid"));

/// Named card layout with `{{field}}` placeholders on each side
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub name: String,
    pub front: String,
    pub back: String,
}

/// Both sides of a card with placeholders substituted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCard {
    pub front: String,
    pub back: String,
}

impl Template {
    pub fn new(name: &str, front: &str, back: &str) -> Self {
        Self {
            name: name.to_string(),
            front: front.to_string(),
            back: back.to_string(),
        }
    }

    pub fn render(&self, note: &Note) -> RenderedCard {
        RenderedCard {
            front: substitute(&self.front, note),
            back: substitute(&self.back, note),
        }
    }
}

/// Unknown or absent fields render as an empty string
fn substitute(side: &str, note: &Note) -> String {
    PLACEHOLDER
        .replace_all(side, |caps: &Captures| {
            note.field(&caps[1]).unwrap_or_default().to_string()
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note() -> Note {
        Note::new(1, "Set 2: さた", [("ひらがな", "さ"), ("英語", "left")])
    }

    #[test]
    fn test_render_substitutes_fields() {
        let template = Template::new("default", "", "<h1>{{ひらがな}}</h1>");
        let rendered = template.render(&note());
        assert_eq!(rendered.front, "");
        assert_eq!(rendered.back, "<h1>さ</h1>");
    }

    #[test]
    fn test_render_tolerates_spacing_and_missing_fields() {
        let template = Template::new("gloss", "{{ ひらがな }}", "{{漢字}}/{{英語}}");
        let rendered = template.render(&note());
        assert_eq!(rendered.front, "さ");
        assert_eq!(rendered.back, "/left");
    }
}
