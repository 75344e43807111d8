use crate::profile::{Profile, Roster};
use serde::{Deserialize, Serialize};

/// One element of the baseline JSON array.
///
/// Profiles without names are stored as a bare email string, so an
/// email-only roster serializes to `["a@x.com", "b@x.com"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BaselineEntry {
    Email(String),
    Profile(Profile),
}

impl From<&Profile> for BaselineEntry {
    fn from(profile: &Profile) -> Self {
        if profile.has_name() {
            BaselineEntry::Profile(profile.clone())
        } else {
            BaselineEntry::Email(profile.email.clone())
        }
    }
}

impl From<BaselineEntry> for Profile {
    fn from(entry: BaselineEntry) -> Self {
        match entry {
            BaselineEntry::Email(email) => Profile::from_email(email),
            BaselineEntry::Profile(profile) => profile,
        }
    }
}

pub fn roster_to_entries(roster: &Roster) -> Vec<BaselineEntry> {
    roster.iter().map(BaselineEntry::from).collect()
}

pub fn entries_to_roster(entries: Vec<BaselineEntry>) -> Roster {
    entries.into_iter().map(Profile::from).collect()
}
