// Macros file - tracing macros are imported within the macro definitions

/// Standardized logging macros for consistent field names and message patterns across the crate
///
/// These macros ensure:
/// - Consistent field naming conventions
/// - Appropriate logging levels for different scenarios
/// - Structured logging with context

// ============================================================================
// Deck Logging Macros
// ============================================================================

/// Log deck lifecycle and selection events
#[macro_export]
macro_rules! log_deck_event {
    (built, deck_id = $deck_id:expr, card_count = $count:expr, sort_field = $field:expr) => {
        tracing::info!(
            component = "deck",
            deck_id = %$deck_id,
            card_count = $count,
            sort_field = %$field,
            "Deck built"
        );
    };
    (selected, deck_id = $deck_id:expr, note_id = $note_id:expr) => {
        tracing::debug!(
            component = "deck",
            deck_id = %$deck_id,
            note_id = %$note_id,
            "Card selected"
        );
    };
    (answered, deck_id = $deck_id:expr, note_id = $note_id:expr, grade = $grade:expr) => {
        tracing::debug!(
            component = "deck",
            deck_id = %$deck_id,
            note_id = %$note_id,
            grade = ?$grade,
            "Card answered"
        );
    };
    (exhausted, deck_id = $deck_id:expr) => {
        tracing::info!(
            component = "deck",
            deck_id = %$deck_id,
            "Deck exhausted"
        );
    };
    ($deck_id:expr, $msg:expr) => {
        tracing::debug!(
            component = "deck",
            deck_id = %$deck_id,
            "Deck event: {}", $msg
        );
    };
}

// ============================================================================
// Scheduler Logging Macros
// ============================================================================

/// Log scheduler policy decisions
#[macro_export]
macro_rules! log_scheduler_event {
    (retired, policy = $policy:expr, note_id = $note_id:expr) => {
        tracing::debug!(
            component = "scheduler",
            policy = $policy,
            note_id = %$note_id,
            "Card retired"
        );
    };
    (requeued, policy = $policy:expr, note_id = $note_id:expr) => {
        tracing::debug!(
            component = "scheduler",
            policy = $policy,
            note_id = %$note_id,
            "Card requeued"
        );
    };
    (assigned, deck_id = $deck_id:expr, policy = $policy:expr) => {
        tracing::info!(
            component = "scheduler",
            deck_id = %$deck_id,
            policy = $policy,
            "Scheduler assigned"
        );
    };
}

// ============================================================================
// Practice Session Logging Macros
// ============================================================================

/// Log practice session transitions
#[macro_export]
macro_rules! log_session_event {
    (mode, mode = $mode:expr, deck_id = $deck_id:expr) => {
        tracing::info!(
            component = "practice_session",
            mode = ?$mode,
            deck_id = %$deck_id,
            "Practice mode changed"
        );
    };
    (filter, categories = $count:expr) => {
        tracing::info!(
            component = "practice_session",
            category_count = $count,
            "Category selection changed"
        );
    };
    (warn, $msg:expr) => {
        tracing::warn!(
            component = "practice_session",
            "Practice session warning: {}", $msg
        );
    };
}

// ============================================================================
// System Event Logging Macros
// ============================================================================

/// Log system startup and shutdown events
#[macro_export]
macro_rules! log_system_event {
    (startup, component = $component:expr, $msg:expr) => {
        tracing::info!(
            event_type = "startup",
            component = $component,
            "System event: {}",
            $msg
        );
    };
    (shutdown, component = $component:expr, $msg:expr) => {
        tracing::info!(
            event_type = "shutdown",
            component = $component,
            "System event: {}",
            $msg
        );
    };
    (config, $msg:expr) => {
        tracing::info!(event_type = "configuration", "System event: {}", $msg);
    };
}

// ============================================================================
// Validation Logging Macros
// ============================================================================

/// Log validation results consistently
#[macro_export]
macro_rules! log_validation {
    (success, $component:expr, $msg:expr) => {
        tracing::debug!(
            event_type = "validation",
            component = $component,
            result = "success",
            "Validation completed: {}", $msg
        );
    };
    (failure, $component:expr, error = $error:expr) => {
        tracing::warn!(
            event_type = "validation",
            component = $component,
            result = "failure",
            error = %$error,
            "Validation failed"
        );
    };
}
