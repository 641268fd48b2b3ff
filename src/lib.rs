pub mod config;
pub mod deck;
pub mod deck_builder;
pub mod errors;
pub mod lesson_source;
pub mod logging;
pub mod models;
pub mod practice;
pub mod scheduler;
pub mod template;

pub use config::Config;
pub use deck::Deck;
pub use deck_builder::{build, BuildOptions};
pub use errors::*;
pub use lesson_source::{lesson_source_for, FileLessonSource, HttpLessonSource, LessonSource};
pub use models::*;
pub use practice::{PracticeMode, PracticeSession, SessionOptions};
pub use scheduler::{BasicScheduler, InfiniteScheduler, Scheduler};
pub use template::{RenderedCard, Template};
