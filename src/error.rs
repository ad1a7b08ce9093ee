//! The error type shared by every module of this crate

use chrono::NaiveDate;

/// Everything that can go wrong while planning
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The advice service answered, but not with a `{todo, caution, motivation}` object
    #[error("malformed daily advice response: {0}")]
    MalformedAdviceResponse(String),
    /// The advice service answered, but not with a date-keyed map of tasks for the target month
    #[error("malformed month plan response: {0}")]
    MalformedPlanResponse(String),

    /// Plan items cannot be deleted
    #[error("todo {id} on {date} comes from the book plan and cannot be deleted")]
    ProtectedItem { date: NaiveDate, id: String },
    #[error("{date} is not part of {month}")]
    DateOutsideMonth { date: NaiveDate, month: String },
    #[error("{year}-{month} is not a valid month")]
    InvalidMonth { year: i32, month: u32 },

    #[error("request to the advice service failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("advice service answered {status}: {body}")]
    Api { status: u16, body: String },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Returned by mocked sources when their behaviour requires a failure
    #[error("mocked failure: {0}")]
    Mocked(String),
}

pub type Result<T> = std::result::Result<T, Error>;
