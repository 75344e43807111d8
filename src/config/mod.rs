//! Process configuration.
//!
//! Every setting can come from the environment or a flag. Raw arguments are
//! validated in one pass so that every missing or empty variable is reported
//! together, before any network activity.

use crate::mailing::MailchimpConfig;
use crate::roster::{RosterMode, SheetsConfig};
use crate::utils::{DEFAULT_BASELINE_PATH, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_INTERVAL_SECS};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing or empty required settings: {}", .0.join(", "))]
    Missing(Vec<String>),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: String, reason: String },
}

/// Roster Sync - subscribe new spreadsheet roster entries to Mailchimp lists
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Mailchimp API key (`<secret>-<datacenter>`)
    #[arg(long, env = "MAILCHIMP_API_KEY", hide_env_values = true)]
    pub mailchimp_api_key: Option<String>,

    /// Basic-auth user name sent to Mailchimp
    #[arg(long, env = "MAILCHIMP_USER", default_value = "roster-sync")]
    pub mailchimp_user: String,

    /// Comma-separated target list ids. When absent, available lists are printed.
    #[arg(long, env = "MAILCHIMP_LIST_ID")]
    pub list_ids: Option<String>,

    /// Google Sheets API key
    #[arg(long, env = "GOOGLE_SHEETS_API_KEY", hide_env_values = true)]
    pub sheets_api_key: Option<String>,

    /// Spreadsheet holding the roster
    #[arg(long, env = "SPREADSHEET_ID")]
    pub spreadsheet_id: Option<String>,

    /// Range (A1 notation or named range) holding the roster rows
    #[arg(long, env = "SPREADSHEET_RANGE_NAME")]
    pub range: Option<String>,

    /// Row layout of the roster range
    #[arg(long, env = "ROSTER_MODE", value_enum, default_value_t = RosterMode::Emails)]
    pub roster_mode: RosterMode,

    /// Where the last synchronized roster is stored
    #[arg(long, env = "BASELINE_PATH", default_value = DEFAULT_BASELINE_PATH)]
    pub baseline_path: PathBuf,

    /// Seconds between two sync ticks
    #[arg(long, env = "SYNC_INTERVAL_SECS", default_value_t = DEFAULT_INTERVAL_SECS)]
    pub interval_secs: u64,

    /// Timeout for each outbound HTTP request, in seconds
    #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value_t = DEFAULT_HTTP_TIMEOUT_SECS)]
    pub http_timeout_secs: u64,
}

/// What the process should do with its configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// No target list configured: print the available lists and exit
    ListLists(ListingConfig),
    Sync(SyncConfig),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingConfig {
    pub mailchimp: MailchimpConfig,
    pub http_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub mailchimp: MailchimpConfig,
    pub list_ids: Vec<String>,
    pub sheets: SheetsConfig,
    pub baseline_path: PathBuf,
    pub interval: Duration,
    pub http_timeout: Duration,
}

/// Collects missing settings while reading them
#[derive(Default)]
struct Required {
    missing: Vec<String>,
}

impl Required {
    fn take(&mut self, name: &str, value: Option<String>) -> String {
        match non_empty(value) {
            Some(v) => v,
            None => {
                self.missing.push(name.to_string());
                String::new()
            }
        }
    }

    fn finish(self) -> Result<(), ConfigError> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Missing(self.missing))
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_list_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl CliArgs {
    /// Validate raw arguments into a run mode.
    pub fn into_run_mode(self) -> Result<RunMode, ConfigError> {
        let mut required = Required::default();
        let api_key = required.take("MAILCHIMP_API_KEY", self.mailchimp_api_key);

        let list_ids = self
            .list_ids
            .as_deref()
            .map(parse_list_ids)
            .unwrap_or_default();

        if self.http_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "HTTP_TIMEOUT_SECS".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        let http_timeout = Duration::from_secs(self.http_timeout_secs);

        if list_ids.is_empty() {
            required.finish()?;
            let mailchimp = validate_mailchimp(api_key, self.mailchimp_user)?;
            return Ok(RunMode::ListLists(ListingConfig {
                mailchimp,
                http_timeout,
            }));
        }

        let sheets_api_key = required.take("GOOGLE_SHEETS_API_KEY", self.sheets_api_key);
        let spreadsheet_id = required.take("SPREADSHEET_ID", self.spreadsheet_id);
        let range = required.take("SPREADSHEET_RANGE_NAME", self.range);
        required.finish()?;

        let mailchimp = validate_mailchimp(api_key, self.mailchimp_user)?;

        if self.interval_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "SYNC_INTERVAL_SECS".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(RunMode::Sync(SyncConfig {
            mailchimp,
            list_ids,
            sheets: SheetsConfig {
                api_key: sheets_api_key,
                spreadsheet_id,
                range,
                mode: self.roster_mode,
            },
            baseline_path: self.baseline_path,
            interval: Duration::from_secs(self.interval_secs),
            http_timeout,
        }))
    }
}

fn validate_mailchimp(api_key: String, user: String) -> Result<MailchimpConfig, ConfigError> {
    let config = MailchimpConfig { api_key, user };
    if config.datacenter().is_none() {
        return Err(ConfigError::Invalid {
            name: "MAILCHIMP_API_KEY".to_string(),
            reason: "expected a `<key>-<datacenter>` value".to_string(),
        });
    }
    Ok(config)
}
