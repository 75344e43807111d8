use super::types::{entries_to_roster, roster_to_entries, BaselineEntry};
use super::BaselineError;
use crate::profile::Roster;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// Persists the last-synchronized roster as a JSON array.
///
/// The store owns a single file. Writes go to a sibling temp file which is
/// flushed and then renamed over the target, so a reader never observes a
/// half-written snapshot.
#[derive(Debug, Clone)]
pub struct BaselineStore {
    path: PathBuf,
}

impl BaselineStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the baseline. `Ok(None)` means no snapshot exists yet (first run).
    pub async fn load(&self) -> Result<Option<Roster>, BaselineError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let entries: Vec<BaselineEntry> =
            serde_json::from_str(&content).map_err(|source| BaselineError::Corrupt {
                path: self.path.clone(),
                source,
            })?;

        Ok(Some(entries_to_roster(entries)))
    }

    /// Replace the baseline with `roster`
    pub async fn save(&self, roster: &Roster) -> Result<(), BaselineError> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let content = serde_json::to_string_pretty(&roster_to_entries(roster))?;

        // Write atomically using temp file + rename
        let temp_path = self.temp_path();
        if let Err(e) = write_synced(&temp_path, content.as_bytes()).await {
            if let Err(cleanup) = fs::remove_file(&temp_path).await {
                warn!(path = %temp_path.display(), error = %cleanup, "Failed to remove temp baseline");
            }
            return Err(e.into());
        }
        fs::rename(&temp_path, &self.path).await?;

        debug!(path = %self.path.display(), entries = roster.len(), "Baseline saved");
        Ok(())
    }

    pub(crate) fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "baseline.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

async fn write_synced(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(content).await?;
    file.flush().await?;
    file.sync_all().await
}
