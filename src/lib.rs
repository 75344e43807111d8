pub mod baseline;
pub mod config;
pub mod mailing;
pub mod profile;
pub mod reconciliation;
pub mod roster;
pub mod scheduler;
pub mod utils;

// Re-export commonly used types
pub use baseline::{BaselineEntry, BaselineError, BaselineStore};
pub use config::{CliArgs, ConfigError, ListingConfig, RunMode, SyncConfig};
pub use mailing::{
    format_list_table, AddOutcome, ListDirectory, ListSummary, ListTarget, MailchimpClient,
    MailchimpConfig, MailchimpList, TargetError,
};
pub use profile::{is_email_valid, split_full_name, Profile, Roster};
pub use reconciliation::{
    EngineError, FanOutReport, ReconciliationEngine, TargetFailure, TargetReport, TickOutcome,
};
pub use roster::{extract_roster, RosterMode, RosterSource, SheetsConfig, SheetsRosterSource, SourceError};
pub use scheduler::{Scheduler, ShutdownSignal};
