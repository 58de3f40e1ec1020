use chrono::NaiveDate;

/// Core error type for the bot.
///
/// Adapter crates map their specific errors into this type so the command
/// layer can decide what the user sees (fallback reply vs rendered data).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    /// Network failure, non-2xx status or undecodable body from the astronomy API.
    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("malformed record {name}: {reason}")]
    MalformedRecord { name: String, reason: String },

    #[error("invalid date range: {start} is after {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("render error: {0}")]
    Render(String),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
