//! Search client errors

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("missing search configuration: {}", .0.join(", "))]
    MissingConfig(Vec<&'static str>),

    #[error("invalid search configuration: {0}")]
    InvalidConfig(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("search API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("task {task_id} on '{index}' not published after {attempts} checks")]
    TaskTimeout {
        index: String,
        task_id: i64,
        attempts: u32,
    },

    #[error("connectivity check failed: {0}")]
    Connectivity(String),
}
