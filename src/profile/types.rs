use super::email::is_email_valid;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// A roster entry. The email is the identity key; names are informational.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl Profile {
    /// Profile with no name information
    pub fn from_email(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            first_name: String::new(),
            last_name: String::new(),
        }
    }

    /// Profile whose names are derived from a single full-name field
    pub fn with_full_name(email: impl Into<String>, full_name: &str) -> Self {
        let (first_name, last_name) = split_full_name(full_name);
        Self {
            email: email.into(),
            first_name,
            last_name,
        }
    }

    pub fn has_name(&self) -> bool {
        !self.first_name.is_empty() || !self.last_name.is_empty()
    }

    /// Lowercased email, used when comparing against remote membership
    pub fn normalized_email(&self) -> String {
        self.email.to_lowercase()
    }
}

/// Split a full name on whitespace into (first token, last token).
///
/// A single token is used for both; an empty name yields empty strings.
pub fn split_full_name(full_name: &str) -> (String, String) {
    let mut tokens = full_name.split_whitespace();
    match tokens.next() {
        Some(first) => {
            let last = tokens.last().unwrap_or(first);
            (first.to_string(), last.to_string())
        }
        None => (String::new(), String::new()),
    }
}

/// A set of valid profiles keyed by lowercased email.
///
/// Only profiles with a valid email are ever admitted, and the first profile
/// seen for a given email wins regardless of case; it keeps its original
/// spelling. Iteration is ordered by lowercased email.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    profiles: BTreeMap<String, Profile>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a profile. Returns `false` if the email is invalid or already present.
    pub fn insert(&mut self, profile: Profile) -> bool {
        if !is_email_valid(&profile.email) {
            return false;
        }
        match self.profiles.entry(profile.normalized_email()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(profile);
                true
            }
        }
    }

    /// Case-insensitive lookup
    pub fn contains_email(&self, email: &str) -> bool {
        self.profiles.contains_key(&email.to_lowercase())
    }

    pub fn get(&self, email: &str) -> Option<&Profile> {
        self.profiles.get(&email.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.values()
    }

    /// Emails as first seen, not lowercased
    pub fn emails(&self) -> impl Iterator<Item = &str> {
        self.profiles.values().map(|p| p.email.as_str())
    }

    /// Profiles present in `self` whose email is absent from `other`.
    ///
    /// Identity is the email alone, compared without case: a profile whose
    /// name or email casing changed is not part of the difference.
    pub fn difference(&self, other: &Roster) -> Roster {
        let profiles = self
            .profiles
            .iter()
            .filter(|(email, _)| !other.profiles.contains_key(*email))
            .map(|(email, profile)| (email.clone(), profile.clone()))
            .collect();
        Roster { profiles }
    }
}

impl FromIterator<Profile> for Roster {
    fn from_iter<I: IntoIterator<Item = Profile>>(iter: I) -> Self {
        let mut roster = Roster::new();
        for profile in iter {
            roster.insert(profile);
        }
        roster
    }
}

impl IntoIterator for Roster {
    type Item = Profile;
    type IntoIter = std::collections::btree_map::IntoValues<String, Profile>;

    fn into_iter(self) -> Self::IntoIter {
        self.profiles.into_values()
    }
}
