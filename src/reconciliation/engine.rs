use super::report::{FanOutReport, TargetFailure, TargetReport, TickOutcome};
use crate::baseline::{BaselineError, BaselineStore};
use crate::mailing::{AddOutcome, ListTarget};
use crate::profile::Roster;
use crate::roster::{RosterSource, SourceError};
use crate::utils::now_iso;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Roster source unavailable: {0}")]
    SourceUnavailable(#[from] SourceError),

    #[error("Baseline error: {0}")]
    BaselineError(#[from] BaselineError),
}

/// Diffs the roster against the baseline and fans new profiles out to the targets.
pub struct ReconciliationEngine {
    source: Arc<dyn RosterSource>,
    targets: Vec<Arc<dyn ListTarget>>,
    store: BaselineStore,
}

impl ReconciliationEngine {
    pub fn new(
        source: Arc<dyn RosterSource>,
        targets: Vec<Arc<dyn ListTarget>>,
        store: BaselineStore,
    ) -> Self {
        Self {
            source,
            targets,
            store,
        }
    }

    pub fn store(&self) -> &BaselineStore {
        &self.store
    }

    /// Run one fetch-diff-apply cycle.
    ///
    /// The baseline is written on the bootstrap path and when the diff is
    /// empty. When new profiles are pushed the baseline is left untouched, so
    /// those profiles are diffed (and retried against each target) again on
    /// the next tick.
    pub async fn run_tick(&self) -> Result<TickOutcome, EngineError> {
        let baseline = self.store.load().await?;

        let Some(baseline) = baseline else {
            info!("First run! Creating baseline");
            let roster = self.source.fetch().await?;
            self.store.save(&roster).await?;
            return Ok(TickOutcome::Bootstrapped {
                roster_size: roster.len(),
            });
        };

        let roster = self.source.fetch().await?;
        let diff = roster.difference(&baseline);

        if diff.is_empty() {
            info!("No new emails were found");
            self.store.save(&roster).await?;
            return Ok(TickOutcome::NoChanges {
                roster_size: roster.len(),
            });
        }

        info!(new = diff.len(), "Found new emails");
        let report = self.fan_out(&diff).await;
        Ok(TickOutcome::Applied(report))
    }

    async fn fan_out(&self, diff: &Roster) -> FanOutReport {
        let mut report = FanOutReport {
            started_at: now_iso(),
            new_emails: diff.emails().map(str::to_string).collect(),
            targets: Vec::with_capacity(self.targets.len()),
        };

        for target in &self.targets {
            let target_report = apply_to_target(target.as_ref(), diff).await;
            report.targets.push(target_report);
        }

        report
    }
}

/// Push every profile of `diff` that the list does not already hold.
///
/// Failures are recorded on the report and never stop the remaining profiles.
async fn apply_to_target(target: &dyn ListTarget, diff: &Roster) -> TargetReport {
    let mut report = TargetReport::new(target.list_id());

    let members = match target.list_members().await {
        Ok(members) => members
            .into_iter()
            .map(|email| email.to_lowercase())
            .collect::<HashSet<_>>(),
        Err(e) => {
            error!(list_id = %report.list_id, error = %e, "Failed to fetch list members");
            report.failures.push(TargetFailure {
                email: None,
                message: e.to_string(),
            });
            return report;
        }
    };

    report.list_name = match target.list_name().await {
        Ok(name) => name,
        Err(e) => {
            warn!(list_id = %report.list_id, error = %e, "Failed to resolve list name");
            String::new()
        }
    };

    for profile in diff.iter() {
        if members.contains(&profile.normalized_email()) {
            report.already_present.push(profile.email.clone());
            continue;
        }

        match target.add_member(profile).await {
            Ok(AddOutcome::Added) => {
                info!(
                    list_id = %report.list_id,
                    "New email added to {}: {}",
                    report.display_name(),
                    profile.email
                );
                report.added.push(profile.email.clone());
            }
            Ok(AddOutcome::AlreadyMember) => {
                info!(
                    list_id = %report.list_id,
                    email = %profile.email,
                    "Email already subscribed to {}",
                    report.display_name()
                );
                report.duplicates.push(profile.email.clone());
            }
            Ok(AddOutcome::InvalidEmail) => {
                warn!(email = %profile.email, "Skipping invalid email");
                report.invalid.push(profile.email.clone());
            }
            Err(e) => {
                error!(
                    list_id = %report.list_id,
                    email = %profile.email,
                    error = %e,
                    "Failed to add member"
                );
                report.failures.push(TargetFailure {
                    email: Some(profile.email.clone()),
                    message: e.to_string(),
                });
            }
        }
    }

    report
}
