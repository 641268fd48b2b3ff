use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::errors::DeckError;

/// 1-based position of a note in its raw lesson data, assigned before sorting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NoteId(pub usize);

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw lesson dataset as served next to the lesson page.
///
/// Column 0 of every row is the category label, the remaining columns pair
/// positionally with `fields`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LessonData {
    #[serde(default)]
    pub name: Option<String>,
    pub fields: Vec<String>,
    pub notes: Vec<Vec<Option<String>>>,
    /// 1-based row positions in the unfiltered dataset, parallel to `notes`.
    /// Empty means the rows are still in their original positions.
    #[serde(skip)]
    pub row_ids: Vec<usize>,
}

impl LessonData {
    /// Keep only the rows whose category is selected by `filter`.
    /// Kept rows remember their original position so note ids survive filtering.
    pub fn filtered(&self, filter: &CategoryFilter) -> LessonData {
        let (row_ids, notes) = self
            .notes
            .iter()
            .enumerate()
            .filter(|(_, row)| {
                row.first()
                    .and_then(|cat| cat.as_deref())
                    .map(|cat| filter.contains(cat))
                    .unwrap_or(false)
            })
            .map(|(idx, row)| (self.row_id(idx), row.clone()))
            .unzip();

        LessonData {
            name: self.name.clone(),
            fields: self.fields.clone(),
            notes,
            row_ids,
        }
    }

    /// Convert the raw rows into notes, in raw-data order
    pub fn to_notes(&self) -> Result<Vec<Note>, DeckError> {
        self.notes
            .iter()
            .enumerate()
            .map(|(idx, row)| Note::from_row(NoteId(self.row_id(idx)), &self.fields, row))
            .collect()
    }

    fn row_id(&self, idx: usize) -> usize {
        self.row_ids.get(idx).copied().unwrap_or(idx + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

/// Set of selected category labels
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryFilter {
    labels: BTreeSet<String>,
}

impl CategoryFilter {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a comma separated list such as `"Set 1: あか,Set 2: さた"`
    pub fn parse(list: &str) -> Self {
        Self::new(
            list.split(',')
                .map(str::trim)
                .filter(|label| !label.is_empty()),
        )
    }

    pub fn contains(&self, category: &str) -> bool {
        self.labels.contains(category)
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

/// Option labels for the row picker: `Set 1: あか`, `Set 2: さた`, ...
pub fn set_labels<S: AsRef<str>>(rows: &[S]) -> Vec<String> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| format!("Set {}: {}", i + 1, row.as_ref()))
        .collect()
}

/// Immutable learnable unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub category: String,
    /// Field name to value, in dataset column order. Absent fields are omitted.
    pub fields: Vec<(String, String)>,
}

impl Note {
    pub fn new<I, K, V>(id: usize, category: &str, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            id: NoteId(id),
            category: category.to_string(),
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    fn from_row(
        id: NoteId,
        field_names: &[String],
        row: &[Option<String>],
    ) -> Result<Self, DeckError> {
        let category = match row.first() {
            Some(Some(cat)) if !cat.is_empty() => cat.clone(),
            _ => {
                return Err(DeckError::InvalidData(format!(
                    "note {} has no category",
                    id
                )));
            }
        };

        let values = &row[1..];
        if values.len() > field_names.len() {
            return Err(DeckError::InvalidData(format!(
                "note {} has {} values but only {} fields are declared",
                id,
                values.len(),
                field_names.len()
            )));
        }

        let fields = field_names
            .iter()
            .zip(values)
            .filter_map(|(name, value)| match value {
                Some(v) if !v.is_empty() => Some((name.clone(), v.clone())),
                _ => None,
            })
            .collect();

        Ok(Self {
            id,
            category,
            fields,
        })
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Audio clip for this note, keyed by the value of `key_field`
    pub fn audio_url(&self, root: &str, key_field: &str) -> Option<String> {
        self.field(key_field)
            .map(|key| format!("{}{}.mp3", root, key))
    }
}

/// Binary review outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    Fail = 0,
    Success = 1,
}

impl Grade {
    pub fn from_int(grade: i32) -> Option<Grade> {
        match grade {
            0 => Some(Grade::Fail),
            1 => Some(Grade::Success),
            _ => None,
        }
    }

    pub fn is_success(self) -> bool {
        self == Grade::Success
    }
}

/// One reviewable unit backed by a shared note
#[derive(Debug, Clone)]
pub struct Card {
    pub note: Arc<Note>,
    /// Removed from the Basic policy's selectable pool
    pub retired: bool,
    /// Consecutive successes, reset by a failure
    pub streak: u32,
    pub reps: u32,
    pub lapses: u32,
    /// Deck-local sequence number of the last answer
    pub last_shown: Option<u64>,
    pub last_reviewed: Option<DateTime<Utc>>,
    pub last_grade: Option<Grade>,
}

impl Card {
    pub fn new(note: Arc<Note>) -> Self {
        Self {
            note,
            retired: false,
            streak: 0,
            reps: 0,
            lapses: 0,
            last_shown: None,
            last_reviewed: None,
            last_grade: None,
        }
    }

    pub fn id(&self) -> NoteId {
        self.note.id
    }

    pub fn is_due(&self) -> bool {
        !self.retired
    }

    /// Bookkeeping shared by every policy; retirement is decided by the scheduler
    pub fn record(&mut self, grade: Grade, tick: u64, now: DateTime<Utc>) {
        self.reps += 1;
        self.last_shown = Some(tick);
        self.last_reviewed = Some(now);
        self.last_grade = Some(grade);
        match grade {
            Grade::Success => self.streak += 1,
            Grade::Fail => {
                self.streak = 0;
                self.lapses += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hiragana() -> LessonData {
        serde_json::from_str(
            r#"{
                "name": "ひらがな",
                "fields": ["ひらがな", "漢字", "英語"],
                "notes": [
                    ["Set 1: あか", "あ"],
                    ["Set 1: あか", "か", null, ""],
                    ["Set 2: さた", "さ", "左", "left"]
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_rows_become_notes() {
        let notes = hiragana().to_notes().unwrap();
        assert_eq!(notes.len(), 3);
        assert_eq!(notes[0].id, NoteId(1));
        assert_eq!(notes[0].category, "Set 1: あか");
        assert_eq!(notes[0].field("ひらがな"), Some("あ"));
        assert_eq!(notes[1].field("漢字"), None);
        assert_eq!(notes[1].field("英語"), None);
        assert_eq!(notes[2].field("英語"), Some("left"));
    }

    #[test]
    fn test_row_without_category_is_invalid() {
        let mut data = hiragana();
        data.notes.push(vec![None, Some("た".to_string())]);
        assert!(matches!(data.to_notes(), Err(DeckError::InvalidData(_))));

        data.notes.pop();
        data.notes.push(vec![]);
        assert!(matches!(data.to_notes(), Err(DeckError::InvalidData(_))));
    }

    #[test]
    fn test_row_with_extra_values_is_invalid() {
        let mut data = hiragana();
        data.notes.push(
            ["Set 2: さた", "た", "田", "field", "extra"]
                .iter()
                .map(|v| Some(v.to_string()))
                .collect(),
        );
        assert!(matches!(data.to_notes(), Err(DeckError::InvalidData(_))));
    }

    #[test]
    fn test_filter_is_set_membership() {
        let data = hiragana();
        let filtered = data.filtered(&CategoryFilter::new(["Set 2: さた"]));
        assert_eq!(filtered.notes.len(), 1);
        assert_eq!(filtered.to_notes().unwrap()[0].id, NoteId(3));

        // a substring of a selected label is not a match
        let filtered = data.filtered(&CategoryFilter::new(["Set 1: あかさ"]));
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_note_ids_survive_filtering() {
        let data = hiragana();
        let set_1 = data.filtered(&CategoryFilter::new(["Set 1: あか"]));
        let set_2 = data.filtered(&CategoryFilter::new(["Set 2: さた"]));
        let both = data.filtered(&CategoryFilter::new(["Set 1: あか", "Set 2: さた"]));

        let ids = |data: &LessonData| -> Vec<NoteId> {
            data.to_notes().unwrap().iter().map(|note| note.id).collect()
        };
        assert_eq!(ids(&set_1), vec![NoteId(1), NoteId(2)]);
        assert_eq!(ids(&set_2), vec![NoteId(3)]);
        assert_eq!(ids(&both), ids(&data));

        // filtering twice keeps the ids from the first pass
        let again = both.filtered(&CategoryFilter::new(["Set 2: さた"]));
        assert_eq!(ids(&again), vec![NoteId(3)]);
    }

    #[test]
    fn test_filter_parse_and_set_labels() {
        let filter = CategoryFilter::parse(" Set 1: あか , ,Set 2: さた");
        assert!(filter.contains("Set 1: あか"));
        assert!(filter.contains("Set 2: さた"));
        assert_eq!(filter.labels().count(), 2);

        assert_eq!(
            set_labels(&["あか", "さた"]),
            vec!["Set 1: あか".to_string(), "Set 2: さた".to_string()]
        );
    }

    #[test]
    fn test_grade_conversion() {
        assert_eq!(Grade::from_int(0), Some(Grade::Fail));
        assert_eq!(Grade::from_int(1), Some(Grade::Success));
        assert_eq!(Grade::from_int(2), None);
        assert_eq!(Grade::from_int(-1), None);
    }

    #[test]
    fn test_card_record_updates_counters() {
        let note = Arc::new(Note::new(1, "Set 1: あか", [("ひらがな", "あ")]));
        let mut card = Card::new(note);
        let now = Utc::now();

        card.record(Grade::Success, 1, now);
        card.record(Grade::Success, 2, now);
        assert_eq!(card.streak, 2);

        card.record(Grade::Fail, 3, now);
        assert_eq!(card.streak, 0);
        assert_eq!(card.lapses, 1);
        assert_eq!(card.reps, 3);
        assert_eq!(card.last_shown, Some(3));
        assert_eq!(card.last_grade, Some(Grade::Fail));
        assert!(card.is_due());
    }

    #[test]
    fn test_audio_url() {
        let note = Note::new(1, "Set 1: あか", [("ひらがな", "か")]);
        assert_eq!(
            note.audio_url("https://example.org/audio/", "ひらがな"),
            Some("https://example.org/audio/か.mp3".to_string())
        );
        assert_eq!(note.audio_url("https://example.org/audio/", "漢字"), None);
    }
}
