mod storage;
mod types;

pub use storage::BaselineStore;
pub use types::BaselineEntry;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BaselineError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Baseline at {} is corrupt and needs operator attention: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl BaselineError {
    pub fn is_corrupt(&self) -> bool {
        matches!(self, BaselineError::Corrupt { .. })
    }
}
