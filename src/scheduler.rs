use chrono::Utc;
use tracing::info;

use crate::log_scheduler_event;
use crate::models::{Card, Grade, NoteId};

/// Review policy consulted by a deck.
///
/// Both policies choose the eligible card answered least recently, with
/// never-answered cards first and ties resolved by deck order. Selection is a
/// pure function of card state, so asking twice without an answer in between
/// yields the same card.
#[derive(Debug, Clone)]
pub enum Scheduler {
    Basic(BasicScheduler),
    Infinite(InfiniteScheduler),
}

impl Scheduler {
    pub fn basic() -> Self {
        Scheduler::Basic(BasicScheduler::new())
    }

    pub fn infinite() -> Self {
        Scheduler::Infinite(InfiniteScheduler::new())
    }

    /// Resolve a policy by name, defaulting to Basic
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "basic" | "finite" => Scheduler::basic(),
            "infinite" | "practice" => Scheduler::infinite(),
            _ => {
                info!("Unknown scheduler '{}', defaulting to basic", name);
                Scheduler::basic()
            }
        }
    }

    /// Index of the card to show next, if any
    pub fn select_next(&self, cards: &[Card]) -> Option<usize> {
        match self {
            Scheduler::Basic(scheduler) => scheduler.select_next(cards),
            Scheduler::Infinite(scheduler) => scheduler.select_next(cards),
        }
    }

    pub fn on_answer(&mut self, card: &mut Card, grade: Grade, tick: u64) {
        match self {
            Scheduler::Basic(scheduler) => scheduler.on_answer(card, grade, tick),
            Scheduler::Infinite(scheduler) => scheduler.on_answer(card, grade, tick),
        }
    }

    pub fn is_exhausted(&self, cards: &[Card]) -> bool {
        match self {
            Scheduler::Basic(_) => cards.iter().all(|card| card.retired),
            Scheduler::Infinite(_) => cards.is_empty(),
        }
    }

    /// Get the policy name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Scheduler::Basic(_) => "basic",
            Scheduler::Infinite(_) => "infinite",
        }
    }
}

/// Least recently answered card among `candidates`, unseen cards first
fn least_recent<'a, I>(candidates: I) -> Option<usize>
where
    I: Iterator<Item = (usize, &'a Card)>,
{
    // min_by_key keeps the first of equal keys, i.e. deck order
    candidates
        .min_by_key(|(_, card)| card.last_shown)
        .map(|(idx, _)| idx)
}

/// Finite learn-until-mastered policy: a success retires the card
#[derive(Debug, Clone, Default)]
pub struct BasicScheduler;

impl BasicScheduler {
    pub fn new() -> Self {
        Self
    }

    pub fn select_next(&self, cards: &[Card]) -> Option<usize> {
        least_recent(cards.iter().enumerate().filter(|(_, card)| !card.retired))
    }

    pub fn on_answer(&mut self, card: &mut Card, grade: Grade, tick: u64) {
        card.record(grade, tick, Utc::now());
        match grade {
            Grade::Success => {
                card.retired = true;
                log_scheduler_event!(retired, policy = "basic", note_id = card.id());
            }
            Grade::Fail => {
                card.retired = false;
                log_scheduler_event!(requeued, policy = "basic", note_id = card.id());
            }
        }
    }
}

/// Endless practice pool: cards never retire and the previous card is not
/// repeated while another one is available
#[derive(Debug, Clone, Default)]
pub struct InfiniteScheduler {
    previous: Option<NoteId>,
    answered: u64,
    failed: u64,
}

impl InfiniteScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_next(&self, cards: &[Card]) -> Option<usize> {
        let avoid = if cards.len() > 1 { self.previous } else { None };
        least_recent(
            cards
                .iter()
                .enumerate()
                .filter(|(_, card)| Some(card.id()) != avoid),
        )
    }

    pub fn on_answer(&mut self, card: &mut Card, grade: Grade, tick: u64) {
        card.record(grade, tick, Utc::now());
        self.previous = Some(card.id());
        self.answered += 1;
        if !grade.is_success() {
            self.failed += 1;
            log_scheduler_event!(requeued, policy = "infinite", note_id = card.id());
        }
    }

    pub fn previous(&self) -> Option<NoteId> {
        self.previous
    }

    /// Answers recorded so far, and how many of them were failures
    pub fn answer_counts(&self) -> (u64, u64) {
        (self.answered, self.failed)
    }
}
