//! Remote mailing lists: membership reads and subscriptions.

mod mailchimp;
mod types;

pub use mailchimp::{MailchimpClient, MailchimpConfig, MailchimpList};
pub use types::{format_list_table, AddOutcome, ListSummary};

use crate::profile::Profile;
use async_trait::async_trait;
use std::collections::HashSet;
use thiserror::Error;

/// Errors that make a target list unavailable, or reject one subscription
#[derive(Error, Debug)]
pub enum TargetError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Mailing list service returned {status} ({title}): {detail}")]
    Rejected {
        status: u16,
        title: String,
        detail: String,
    },

    #[error("Invalid mailing list configuration: {0}")]
    InvalidConfig(String),
}

/// A single remote list that new profiles are subscribed to
#[async_trait]
pub trait ListTarget: Send + Sync {
    /// Opaque id of the list
    fn list_id(&self) -> &str;

    /// Display name, for logging only
    async fn list_name(&self) -> Result<String, TargetError>;

    /// Every email address currently on the list, whatever its status
    async fn list_members(&self) -> Result<HashSet<String>, TargetError>;

    /// Subscribe a profile. Invalid emails and remote duplicates are not errors.
    async fn add_member(&self, profile: &Profile) -> Result<AddOutcome, TargetError>;
}

/// Enumerates every list visible to the configured account
#[async_trait]
pub trait ListDirectory: Send + Sync {
    async fn enumerate_lists(&self) -> Result<Vec<ListSummary>, TargetError>;
}
