#![allow(dead_code)]

use async_trait::async_trait;
use roster_sync::{AddOutcome, ListTarget, Profile, Roster, RosterSource, SourceError, TargetError};
use roster_sync::is_email_valid;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tempfile::TempDir;

/// Create a temporary directory for a test
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Baseline path inside a not-yet-existing cache folder
pub fn baseline_path(dir: &TempDir) -> PathBuf {
    dir.path().join("cache").join("current_google.json")
}

pub fn write_baseline(path: &Path, content: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

pub fn read_baseline_json(path: &Path) -> serde_json::Value {
    let content = std::fs::read_to_string(path).expect("baseline should exist");
    serde_json::from_str(&content).expect("baseline should be valid JSON")
}

pub fn roster(emails: &[&str]) -> Roster {
    emails.iter().map(|e| Profile::from_email(*e)).collect()
}

/// Roster source returning a configurable list of profiles
pub struct FakeSource {
    profiles: Mutex<Vec<Profile>>,
    fail: Mutex<bool>,
    delay: Option<Duration>,
    fetches: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeSource {
    pub fn new(emails: &[&str]) -> Self {
        Self {
            profiles: Mutex::new(emails.iter().map(|e| Profile::from_email(*e)).collect()),
            fail: Mutex::new(false),
            delay: None,
            fetches: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_profiles(profiles: Vec<Profile>) -> Self {
        let source = Self::new(&[]);
        *source.profiles.lock().unwrap() = profiles;
        source
    }

    /// Each fetch takes this long
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set_failing(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RosterSource for FakeSource {
    async fn fetch(&self) -> Result<Roster, SourceError> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        self.fetches.fetch_add(1, Ordering::SeqCst);

        match self.delay {
            Some(delay) => tokio::time::sleep(delay).await,
            None => tokio::task::yield_now().await,
        }

        let result = if *self.fail.lock().unwrap() {
            Err(SourceError::Status {
                status: 503,
                message: "unavailable".to_string(),
            })
        } else {
            Ok(self.profiles.lock().unwrap().clone().into_iter().collect())
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

/// In-memory list target recording every call
pub struct FakeTarget {
    id: String,
    name: Option<String>,
    members: Mutex<HashSet<String>>,
    add_attempts: Mutex<Vec<String>>,
    fail_members: bool,
    fail_emails: HashSet<String>,
    calls: AtomicUsize,
}

impl FakeTarget {
    pub fn new(id: &str, members: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            name: Some(format!("List {id}")),
            members: Mutex::new(members.iter().map(|m| m.to_string()).collect()),
            add_attempts: Mutex::new(Vec::new()),
            fail_members: false,
            fail_emails: HashSet::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Membership fetch always fails
    pub fn unavailable(id: &str) -> Self {
        Self {
            fail_members: true,
            ..Self::new(id, &[])
        }
    }

    /// List name lookup always fails
    pub fn without_name(mut self) -> Self {
        self.name = None;
        self
    }

    /// Adding any of these emails fails
    pub fn failing_for(mut self, emails: &[&str]) -> Self {
        self.fail_emails = emails.iter().map(|e| e.to_string()).collect();
        self
    }

    pub fn add_attempts(&self) -> Vec<String> {
        self.add_attempts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn error(&self) -> TargetError {
        TargetError::Rejected {
            status: 500,
            title: "Internal Server Error".to_string(),
            detail: format!("list {} failed", self.id),
        }
    }
}

#[async_trait]
impl ListTarget for FakeTarget {
    fn list_id(&self) -> &str {
        &self.id
    }

    async fn list_name(&self) -> Result<String, TargetError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.name.clone().ok_or_else(|| self.error())
    }

    async fn list_members(&self) -> Result<HashSet<String>, TargetError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_members {
            return Err(self.error());
        }
        Ok(self.members.lock().unwrap().clone())
    }

    async fn add_member(&self, profile: &Profile) -> Result<AddOutcome, TargetError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !is_email_valid(&profile.email) {
            return Ok(AddOutcome::InvalidEmail);
        }
        self.add_attempts.lock().unwrap().push(profile.email.clone());
        if self.fail_emails.contains(&profile.email) {
            return Err(self.error());
        }
        self.members.lock().unwrap().insert(profile.email.clone());
        Ok(AddOutcome::Added)
    }
}
