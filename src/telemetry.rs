//! Telemetry initialization (tracing/tracing-subscriber).
//!
//! - LOG_LEVEL holds `EnvFilter` directives; unset or invalid falls back to
//!   `DEFAULT_DIRECTIVES`.
//! - LOG_FORMAT=json switches to structured JSON lines, anything else is the
//!   human-readable formatter.
//!
//! Event targets: `keisan_backend` (lifecycle), `quiz` (sessions and answers),
//! `generator` (dispatch, retries, placeholder fallbacks).

use tracing_subscriber::EnvFilter;

pub const DEFAULT_DIRECTIVES: &str = "info,quiz=debug,keisan_backend=debug,tower_http=info,axum=info";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

fn filter_from_env() -> EnvFilter {
    EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

pub fn init_tracing() {
    let format = LogFormat::parse(std::env::var("LOG_FORMAT").ok().as_deref());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter_from_env())
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    // The two builders have different types, so each arm finishes its own init.
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}
