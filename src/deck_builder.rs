use std::collections::HashSet;
use std::sync::Arc;

use crate::deck::Deck;
use crate::errors::{DeckError, ErrorContext};
use crate::log_validation;
use crate::models::{Card, LessonData, Note};
use crate::scheduler::Scheduler;

/// Options for turning lesson data into a deck
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Field whose value orders the notes before cards are created
    pub sort_field: String,
    /// Policy to assign right away; left unset when `None`
    pub scheduler: Option<Scheduler>,
}

impl BuildOptions {
    pub fn new(sort_field: &str) -> Self {
        Self {
            sort_field: sort_field.to_string(),
            scheduler: None,
        }
    }

    pub fn with_scheduler(mut self, scheduler: Scheduler) -> Self {
        self.scheduler = Some(scheduler);
        self
    }
}

/// Build a deck from lesson data the caller has already filtered
pub fn build(data: &LessonData, options: BuildOptions) -> Result<Deck, DeckError> {
    let context = || {
        ErrorContext::new("build_deck")
            .with_dataset(data.name.as_deref())
            .with_sort_field(&options.sort_field)
    };

    let notes = data.to_notes().map_err(|e| e.logged(context()))?;
    build_from_notes(notes, options.clone()).map_err(|e| e.logged(context()))
}

/// Build a deck from notes: one card per note, stable-sorted by the sort field
pub fn build_from_notes(notes: Vec<Note>, options: BuildOptions) -> Result<Deck, DeckError> {
    if notes.is_empty() {
        return Err(DeckError::InvalidData("no notes to build a deck from".to_string()));
    }

    if let Some(note) = notes
        .iter()
        .find(|note| note.field(&options.sort_field).is_none())
    {
        return Err(DeckError::InvalidData(format!(
            "note {} lacks sort field '{}'",
            note.id, options.sort_field
        )));
    }

    let mut ids = HashSet::new();
    if let Some(note) = notes.iter().find(|note| !ids.insert(note.id)) {
        return Err(DeckError::InvalidData(format!(
            "note id {} appears more than once",
            note.id
        )));
    }

    let mut notes = notes;
    // sort_by is stable: ties keep raw-data order
    notes.sort_by(|a, b| a.field(&options.sort_field).cmp(&b.field(&options.sort_field)));

    let cards = notes
        .into_iter()
        .map(|note| Card::new(Arc::new(note)))
        .collect();

    log_validation!(success, "lesson_data", "notes accepted for deck");

    let mut deck = Deck::new(cards, &options.sort_field);
    if let Some(scheduler) = options.scheduler {
        deck.set_scheduler(scheduler);
    }
    Ok(deck)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NoteId;

    fn notes() -> Vec<Note> {
        vec![
            Note::new(1, "Set 2: さた", [("kana", "さ")]),
            Note::new(2, "Set 1: あか", [("kana", "か"), ("romaji", "ka")]),
            Note::new(3, "Set 1: あか", [("kana", "あ")]),
            Note::new(4, "Set 1: あか", [("kana", "か"), ("romaji", "ka2")]),
        ]
    }

    #[test]
    fn test_cards_follow_sort_field_with_stable_ties() {
        let deck = build_from_notes(notes(), BuildOptions::new("kana")).unwrap();
        let ids: Vec<NoteId> = deck.cards().iter().map(|card| card.id()).collect();
        assert_eq!(ids, vec![NoteId(3), NoteId(2), NoteId(4), NoteId(1)]);
        assert!(deck.current_card().is_none());
        assert!(deck.scheduler().is_none());
    }

    #[test]
    fn test_empty_notes_are_invalid() {
        let result = build_from_notes(Vec::new(), BuildOptions::new("kana"));
        assert!(matches!(result, Err(DeckError::InvalidData(_))));
    }

    #[test]
    fn test_missing_sort_field_is_invalid() {
        let result = build_from_notes(notes(), BuildOptions::new("romaji"));
        match result {
            Err(DeckError::InvalidData(msg)) => assert!(msg.contains("romaji")),
            other => panic!("expected InvalidData, got {:?}", other.map(|deck| deck.len())),
        }
    }

    #[test]
    fn test_duplicate_note_ids_are_invalid() {
        let notes = vec![
            Note::new(1, "Set 1: あか", [("kana", "あ")]),
            Note::new(1, "Set 1: あか", [("kana", "か")]),
        ];
        let options = BuildOptions::new("kana").with_scheduler(Scheduler::infinite());
        match build_from_notes(notes, options) {
            Err(DeckError::InvalidData(msg)) => assert!(msg.contains("more than once")),
            other => panic!("expected InvalidData, got {:?}", other.map(|deck| deck.len())),
        }
    }

    #[test]
    fn test_scheduler_option_is_assigned() {
        let options = BuildOptions::new("kana").with_scheduler(Scheduler::infinite());
        let deck = build_from_notes(notes(), options).unwrap();
        assert_eq!(deck.scheduler().map(Scheduler::name), Some("infinite"));
    }

    #[test]
    fn test_build_from_lesson_data() {
        let data: LessonData = serde_json::from_str(
            r#"{"fields": ["ひらがな"], "notes": [["Set 1: あか", "か"], ["Set 1: あか", "あ"]]}"#,
        )
        .unwrap();
        let deck = build(&data, BuildOptions::new("ひらがな")).unwrap();
        assert_eq!(deck.cards()[0].note.field("ひらがな"), Some("あ"));

        let empty = LessonData::default();
        assert!(matches!(
            build(&empty, BuildOptions::new("ひらがな")),
            Err(DeckError::InvalidData(_))
        ));
    }
}
