use std::collections::BTreeSet;
use uuid::Uuid;

use crate::errors::{DeckError, ErrorContext};
use crate::models::{Card, Grade};
use crate::scheduler::Scheduler;
use crate::template::{RenderedCard, Template};
use crate::{log_deck_event, log_scheduler_event};

/// Ordered cards, the current selection and the active scheduler.
///
/// Built by [`crate::deck_builder::build`]. At most one card is current at a
/// time; answering clears the selection.
#[derive(Debug, Clone)]
pub struct Deck {
    id: Uuid,
    cards: Vec<Card>,
    current: Option<usize>,
    sort_field: String,
    scheduler: Option<Scheduler>,
    templates: Vec<Template>,
    tick: u64,
}

impl Deck {
    pub(crate) fn new(cards: Vec<Card>, sort_field: &str) -> Self {
        let deck = Self {
            id: Uuid::new_v4(),
            cards,
            current: None,
            sort_field: sort_field.to_string(),
            scheduler: None,
            templates: Vec::new(),
            tick: 0,
        };
        log_deck_event!(
            built,
            deck_id = deck.id,
            card_count = deck.cards.len(),
            sort_field = deck.sort_field
        );
        deck
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Assign the review policy. Clears any current selection.
    pub fn set_scheduler(&mut self, scheduler: Scheduler) {
        log_scheduler_event!(assigned, deck_id = self.id, policy = scheduler.name());
        self.scheduler = Some(scheduler);
        self.current = None;
    }

    pub fn with_scheduler(mut self, scheduler: Scheduler) -> Self {
        self.set_scheduler(scheduler);
        self
    }

    pub fn scheduler(&self) -> Option<&Scheduler> {
        self.scheduler.as_ref()
    }

    /// Select the next card and make it current. `None` under the Basic
    /// policy means every card has been retired.
    pub fn get_next(&mut self) -> Result<Option<&Card>, DeckError> {
        let scheduler = match &self.scheduler {
            Some(scheduler) => scheduler,
            None => {
                return Err(DeckError::SchedulerUnset.logged(ErrorContext::new("get_next")));
            }
        };

        self.current = scheduler.select_next(&self.cards);
        match self.current {
            Some(idx) => {
                let card = &self.cards[idx];
                log_deck_event!(selected, deck_id = self.id, note_id = card.id());
                Ok(Some(card))
            }
            None => {
                log_deck_event!(exhausted, deck_id = self.id);
                Ok(None)
            }
        }
    }

    /// Grade the current card and clear the selection. Without a current
    /// card this does nothing.
    pub fn answer_current(&mut self, grade: Grade) {
        let (Some(idx), Some(scheduler)) = (self.current, self.scheduler.as_mut()) else {
            log_deck_event!(self.id, "answer ignored, no current card");
            return;
        };

        self.tick += 1;
        let card = &mut self.cards[idx];
        scheduler.on_answer(card, grade, self.tick);
        log_deck_event!(answered, deck_id = self.id, note_id = card.id(), grade = grade);
        self.current = None;
    }

    pub fn current_card(&self) -> Option<&Card> {
        self.current.map(|idx| &self.cards[idx])
    }

    /// Clear the selection without grading
    pub fn clear_current(&mut self) {
        self.current = None;
    }

    pub fn is_exhausted(&self) -> bool {
        self.scheduler
            .as_ref()
            .map(|scheduler| scheduler.is_exhausted(&self.cards))
            .unwrap_or(false)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn sort_field(&self) -> &str {
        &self.sort_field
    }

    /// Distinct categories present in the deck
    pub fn categories(&self) -> BTreeSet<&str> {
        self.cards
            .iter()
            .map(|card| card.note.category.as_str())
            .collect()
    }

    /// Register a layout; a template with the same name is replaced
    pub fn add_template(&mut self, name: &str, front: &str, back: &str) {
        self.templates.retain(|template| template.name != name);
        self.templates.push(Template::new(name, front, back));
        log_deck_event!(self.id, format!("template '{}' registered", name));
    }

    pub fn render(&self, card: &Card, template_name: &str) -> Option<RenderedCard> {
        self.templates
            .iter()
            .find(|template| template.name == template_name)
            .map(|template| template.render(&card.note))
    }
}
