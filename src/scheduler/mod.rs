//! Fixed-period driver for the reconciliation engine.

use crate::baseline::BaselineError;
use crate::reconciliation::{EngineError, ReconciliationEngine, TickOutcome};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info, warn, Instrument};
use uuid::Uuid;

/// Signal sent to stop the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    None,
    Shutdown,
}

/// Runs one tick immediately, then one per period, until shut down.
///
/// Ticks are strictly sequential: each wait of one full period starts when
/// the previous tick has finished, so a slow tick pushes the next one back.
pub struct Scheduler {
    engine: ReconciliationEngine,
    period: Duration,
}

impl Scheduler {
    /// A zero period is raised to one millisecond.
    pub fn new(engine: ReconciliationEngine, period: Duration) -> Self {
        Self {
            engine,
            period: period.max(Duration::from_millis(1)),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Loop until the shutdown channel carries `Shutdown` or its sender is dropped.
    ///
    /// An in-flight tick always runs to completion. Returns the number of
    /// ticks executed.
    pub async fn run(&self, mut shutdown: watch::Receiver<ShutdownSignal>) -> u64 {
        let mut ticks: u64 = 0;

        info!(period_secs = self.period.as_secs_f64(), "Scheduler started");

        loop {
            if *shutdown.borrow() == ShutdownSignal::Shutdown {
                break;
            }

            self.tick().await;
            ticks += 1;

            if !self.wait_for_next_tick(&mut shutdown).await {
                break;
            }
        }

        info!(ticks, "Scheduler stopped");
        ticks
    }

    /// Sleep one period. Returns `false` if shutdown was requested meanwhile.
    async fn wait_for_next_tick(&self, shutdown: &mut watch::Receiver<ShutdownSignal>) -> bool {
        let sleep = tokio::time::sleep(self.period);
        tokio::pin!(sleep);

        loop {
            tokio::select! {
                _ = &mut sleep => return true,
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        info!("Shutdown channel closed");
                        return false;
                    }
                    if *shutdown.borrow() == ShutdownSignal::Shutdown {
                        return false;
                    }
                }
            }
        }
    }

    /// Run a single tick and log its outcome
    pub async fn tick(&self) -> Option<TickOutcome> {
        let tick_id = Uuid::new_v4();
        let span = tracing::info_span!("tick", %tick_id);

        async {
            info!("Checking for new emails...");
            match self.engine.run_tick().await {
                Ok(outcome) => {
                    log_outcome(&outcome);
                    Some(outcome)
                }
                Err(EngineError::BaselineError(e @ BaselineError::Corrupt { .. })) => {
                    error!(
                        path = %self.engine.store().path().display(),
                        "{}. Fix or remove the file; it will not be overwritten.",
                        e
                    );
                    None
                }
                Err(e) => {
                    warn!(error = %e, "Tick failed");
                    None
                }
            }
        }
        .instrument(span)
        .await
    }
}

fn log_outcome(outcome: &TickOutcome) {
    match outcome {
        TickOutcome::Bootstrapped { roster_size } => {
            info!(roster_size, "Baseline created");
        }
        TickOutcome::NoChanges { roster_size } => {
            info!(roster_size, "Baseline refreshed");
        }
        TickOutcome::Applied(report) => {
            let failures = report.total_failures();
            if failures > 0 {
                warn!(
                    new = report.new_emails.len(),
                    added = report.total_added(),
                    failures,
                    "Tick finished with failures"
                );
            } else {
                info!(
                    new = report.new_emails.len(),
                    added = report.total_added(),
                    "Tick finished"
                );
            }
        }
    }
}
