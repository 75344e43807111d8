use std::fmt;

/// What a single tick did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// No baseline existed; the fetched roster became the baseline
    Bootstrapped { roster_size: usize },
    /// The roster matched the baseline; the baseline was rewritten
    NoChanges { roster_size: usize },
    /// New profiles were pushed to the targets; the baseline was left as is
    Applied(FanOutReport),
}

/// Per-target results of pushing a diff
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FanOutReport {
    pub started_at: String,
    /// Emails that were new relative to the baseline
    pub new_emails: Vec<String>,
    pub targets: Vec<TargetReport>,
}

impl FanOutReport {
    pub fn total_added(&self) -> usize {
        self.targets.iter().map(|t| t.added.len()).sum()
    }

    pub fn total_failures(&self) -> usize {
        self.targets.iter().map(|t| t.failures.len()).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetReport {
    pub list_id: String,
    /// Empty when the name could not be resolved
    pub list_name: String,
    pub added: Vec<String>,
    /// Already on the list according to the fetched membership
    pub already_present: Vec<String>,
    /// Reported as an existing member by the service itself
    pub duplicates: Vec<String>,
    /// Refused locally because the email is malformed
    pub invalid: Vec<String>,
    pub failures: Vec<TargetFailure>,
}

impl TargetReport {
    pub fn new(list_id: impl Into<String>) -> Self {
        Self {
            list_id: list_id.into(),
            ..Default::default()
        }
    }

    /// Name for log lines, falling back to the id
    pub fn display_name(&self) -> &str {
        if self.list_name.is_empty() {
            &self.list_id
        } else {
            &self.list_name
        }
    }
}

/// A failed interaction with one target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetFailure {
    /// `None` when the failure concerns the whole list (membership fetch)
    pub email: Option<String>,
    pub message: String,
}

impl fmt::Display for TargetFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.email {
            Some(email) => write!(f, "{}: {}", email, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}
