//! Practice flow for a lesson page: learn the selected sets until every card
//! is retired, then drill the practice words forever.
//!
//! The session owns exactly one deck. Changing the selection or switching to
//! the practice words replaces that deck rather than mutating it.

use crate::deck::Deck;
use crate::deck_builder::{self, BuildOptions};
use crate::errors::DeckError;
use crate::models::{Card, CategoryFilter, Grade, LessonData};
use crate::scheduler::Scheduler;
use crate::template::Template;
use crate::{log_session_event, log_system_event};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PracticeMode {
    /// Finite lesson deck under the Basic policy
    Lesson,
    /// Endless practice words under the Infinite policy
    Practice,
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub sort_field: String,
    /// Layout registered on every deck the session builds
    pub template: Option<Template>,
}

impl SessionOptions {
    pub fn new(sort_field: &str) -> Self {
        Self {
            sort_field: sort_field.to_string(),
            template: None,
        }
    }

    pub fn with_template(mut self, name: &str, front: &str, back: &str) -> Self {
        self.template = Some(Template::new(name, front, back));
        self
    }
}

pub struct PracticeSession {
    lesson: LessonData,
    practice: LessonData,
    filter: CategoryFilter,
    options: SessionOptions,
    mode: PracticeMode,
    deck: Deck,
}

impl PracticeSession {
    /// Start on the lesson deck for `filter` with its first card selected
    pub fn new(
        lesson: LessonData,
        practice: LessonData,
        filter: CategoryFilter,
        options: SessionOptions,
    ) -> Result<Self, DeckError> {
        let deck = build_deck(&lesson, &filter, &options, Scheduler::basic())?;
        let mut session = Self {
            lesson,
            practice,
            filter,
            options,
            mode: PracticeMode::Lesson,
            deck,
        };
        log_system_event!(startup, component = "practice_session", "lesson deck ready");
        session.next_card()?;
        Ok(session)
    }

    pub fn mode(&self) -> PracticeMode {
        self.mode
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    pub fn current_card(&self) -> Option<&Card> {
        self.deck.current_card()
    }

    /// Select the next card; an exhausted lesson deck hands over to the
    /// practice words. `None` means the session is over.
    pub fn next_card(&mut self) -> Result<Option<&Card>, DeckError> {
        if self.deck.get_next()?.is_none() && self.mode == PracticeMode::Lesson {
            self.switch_to_practice()?;
        }
        self.deck.get_next()
    }

    /// Grade the current card and move on
    pub fn answer(&mut self, grade: Grade) -> Result<Option<&Card>, DeckError> {
        self.deck.answer_current(grade);
        self.next_card()
    }

    /// Rebuild the lesson deck for a new selection. An empty selection is ignored.
    pub fn select_categories(&mut self, filter: CategoryFilter) -> Result<(), DeckError> {
        if filter.is_empty() {
            log_session_event!(warn, "empty category selection ignored");
            return Ok(());
        }

        let deck = build_deck(&self.lesson, &filter, &self.options, Scheduler::basic())?;
        log_session_event!(filter, categories = filter.labels().count());
        self.filter = filter;
        self.replace_deck(deck, PracticeMode::Lesson);
        self.next_card()?;
        Ok(())
    }

    /// Leave the lesson deck early and drill the practice words
    pub fn skip_to_practice(&mut self) -> Result<Option<&Card>, DeckError> {
        if self.mode == PracticeMode::Lesson {
            self.switch_to_practice()?;
        }
        self.deck.get_next()
    }

    /// Replace the lesson deck with the practice words. When no practice word
    /// matches the selection the lesson deck stays in place and the session
    /// simply ends.
    fn switch_to_practice(&mut self) -> Result<(), DeckError> {
        if self.practice.filtered(&self.filter).is_empty() {
            log_session_event!(warn, "no practice words for the current selection");
            return Ok(());
        }

        let deck = build_deck(&self.practice, &self.filter, &self.options, Scheduler::infinite())?;
        self.replace_deck(deck, PracticeMode::Practice);
        Ok(())
    }

    fn replace_deck(&mut self, deck: Deck, mode: PracticeMode) {
        self.deck = deck;
        self.mode = mode;
        log_session_event!(mode, mode = self.mode, deck_id = self.deck.id());
    }
}

fn build_deck(
    data: &LessonData,
    filter: &CategoryFilter,
    options: &SessionOptions,
    scheduler: Scheduler,
) -> Result<Deck, DeckError> {
    let build_options = BuildOptions::new(&options.sort_field).with_scheduler(scheduler);
    let mut deck = deck_builder::build(&data.filtered(filter), build_options)?;
    if let Some(template) = &options.template {
        deck.add_template(&template.name, &template.front, &template.back);
    }
    Ok(deck)
}
