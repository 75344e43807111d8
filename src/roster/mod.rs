//! Reading the roster from the external spreadsheet.

mod extract;
mod sheets;

pub use extract::{extract_roster, RosterMode};
pub use sheets::{SheetsConfig, SheetsRosterSource};

use crate::profile::Roster;
use async_trait::async_trait;
use thiserror::Error;

/// Errors that make the roster source unavailable for a tick
#[derive(Error, Debug)]
pub enum SourceError {
    /// Never carries the request URL, which holds the API key
    #[error("HTTP error: {0}")]
    HttpError(#[source] reqwest::Error),

    #[error("Roster source returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid roster source configuration: {0}")]
    InvalidConfig(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(e: reqwest::Error) -> Self {
        SourceError::HttpError(e.without_url())
    }
}

/// Provides the current roster on demand.
///
/// Rows that are malformed or carry an invalid email are dropped silently;
/// only failures to read the source at all are errors.
#[async_trait]
pub trait RosterSource: Send + Sync {
    async fn fetch(&self) -> Result<Roster, SourceError>;
}
