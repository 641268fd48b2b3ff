use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use kana_drill::config::LoggingConfig;
use kana_drill::{
    lesson_source_for, log_system_event, Card, Config, Grade, PracticeMode, PracticeSession,
    SessionOptions,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    let _guard = setup_logging(&config.logging)?;
    config.validate()?;

    log_system_event!(startup, component = "drill", "Starting kana drill");

    let lesson_config = &config.lesson;
    let source = lesson_source_for(&lesson_config.source);
    info!(source = %source.describe(), "Loading lesson datasets");

    let (lesson, practice) = tokio::try_join!(
        source.load(&lesson_config.lesson_dataset),
        source.load(&lesson_config.practice_dataset),
    )?;

    let sort_field = &lesson_config.sort_field;
    let options = SessionOptions::new(sort_field).with_template(
        "default",
        "",
        &format!("{{{{{}}}}}", sort_field),
    );
    let mut session =
        PracticeSession::new(lesson, practice, lesson_config.category_filter(), options)?;

    println!("Sets: {}", lesson_config.selected_sets.join(", "));
    println!("Enter reveals the answer, then y/n grades it. s skips to words, q quits.\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut revealed = false;
    let mut announced_practice = false;

    loop {
        if session.mode() == PracticeMode::Practice && !announced_practice {
            println!("Finished! Here are some words to practice (this list repeats indefinitely).\n");
            announced_practice = true;
        }

        let Some(card) = session.current_card() else {
            println!("Nothing left to practice.");
            break;
        };

        if revealed {
            print_answer(&session, card);
            println!("Did you get it? [y/n]");
        } else {
            print_prompt(card, &lesson_config.audio_root, sort_field);
        }

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match (line.trim(), revealed) {
            ("q", _) => break,
            ("s", _) => {
                revealed = false;
                session.skip_to_practice()?;
            }
            ("", false) => revealed = true,
            ("y", true) => {
                revealed = false;
                session.answer(Grade::Success)?;
            }
            ("n", true) => {
                revealed = false;
                session.answer(Grade::Fail)?;
            }
            _ => println!("?"),
        }
    }

    log_system_event!(shutdown, component = "drill", "Drill finished");
    Ok(())
}

fn print_prompt(card: &Card, audio_root: &str, audio_field: &str) {
    match card.note.audio_url(audio_root, audio_field) {
        Some(url) => println!("Listen: {}", url),
        None => println!("(no audio)"),
    }
}

fn print_answer(session: &PracticeSession, card: &Card) {
    if let Some(rendered) = session.deck().render(card, "default") {
        println!("  {}", rendered.back);
    }
    if let Some(kanji) = card.note.field("漢字") {
        println!("  {}", kanji);
    }
    if session.mode() == PracticeMode::Practice {
        if let Some(english) = card.note.field("英語") {
            println!("  {}", english);
        }
    }
}

fn setup_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    use std::fs;
    use tracing_subscriber::fmt;

    // Configure log level from environment variable
    let env_filter = EnvFilter::try_new(&config.level)
        .unwrap_or_else(|_| EnvFilter::new("info,kana_drill=debug"));

    let console_layer = config.console_enabled.then(|| {
        fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
            .with_ansi(true)
    });

    let mut guard = None;
    let file_layer = if config.file_enabled {
        // Create logs directory if it doesn't exist
        fs::create_dir_all(&config.log_directory).unwrap_or_else(|e| {
            eprintln!("Warning: Could not create logs directory: {}", e);
        });

        // Set up file appender with daily rotation
        let file_appender = tracing_appender::rolling::daily(&config.log_directory, "kana-drill.log");
        let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(file_guard);

        Some(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_ansi(false)
                .with_writer(non_blocking_file),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    info!(
        log_directory = %config.log_directory,
        file_enabled = config.file_enabled,
        "Logging initialized"
    );

    Ok(guard)
}
