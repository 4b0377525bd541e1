//! Span helpers for the study workflow

/// Span around one solve: ingestion of the prompt, the model call and
/// parsing of the answer.
///
/// ```rust
/// use edusolve_observability::solve_span;
///
/// let span = solve_span!(3usize, "td2.pdf");
/// let _guard = span.enter();
/// ```
#[macro_export]
macro_rules! solve_span {
    ($course_count:expr, $exercise:expr) => {
        tracing::info_span!(
            "edusolve.solve",
            courses = $course_count,
            exercise = $exercise,
            model = tracing::field::Empty,
            duration_ms = tracing::field::Empty,
            error = tracing::field::Empty,
            error.message = tracing::field::Empty,
        )
    };
}

/// Span around one follow-up chat turn.
#[macro_export]
macro_rules! chat_span {
    ($session_id:expr, $turn:expr) => {
        tracing::info_span!(
            "edusolve.chat",
            session.id = %$session_id,
            turn = $turn,
            duration_ms = tracing::field::Empty,
            error = tracing::field::Empty,
            error.message = tracing::field::Empty,
        )
    };
}

/// Span around writing the printable document.
#[macro_export]
macro_rules! export_span {
    ($path:expr) => {
        tracing::info_span!(
            "edusolve.export",
            path = %$path,
            duration_ms = tracing::field::Empty,
            error = tracing::field::Empty,
            error.message = tracing::field::Empty,
        )
    };
}

/// Record an error on the current span and emit it as an event.
///
/// The span must declare `error` and `error.message` fields for the values
/// to stick; the event is emitted either way.
pub fn record_error<E: std::error::Error>(error: &E) {
    let span = tracing::Span::current();
    span.record("error", true);
    span.record("error.message", error.to_string());
    tracing::error!(error = %error, "operation failed");
}

/// Record a duration in milliseconds on the current span.
pub fn record_duration(key: &str, duration: std::time::Duration) {
    let span = tracing::Span::current();
    span.record(key, duration.as_millis() as u64);
}
