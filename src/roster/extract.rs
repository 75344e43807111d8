use crate::profile::{Profile, Roster};
use clap::ValueEnum;

/// How roster rows are laid out in the spreadsheet range
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum RosterMode {
    /// Email in the second column; names are not read
    #[default]
    Emails,
    /// Email in the first column, full name in the second
    Profiles,
}

impl RosterMode {
    fn email_column(self) -> usize {
        match self {
            RosterMode::Emails => 1,
            RosterMode::Profiles => 0,
        }
    }

    fn name_column(self) -> Option<usize> {
        match self {
            RosterMode::Emails => None,
            RosterMode::Profiles => Some(1),
        }
    }
}

/// Build a roster from raw spreadsheet rows.
///
/// The first row is a header and is always skipped. Rows missing a required
/// cell or carrying an invalid email are dropped.
pub fn extract_roster(rows: &[Vec<String>], mode: RosterMode) -> Roster {
    rows.iter()
        .skip(1)
        .filter_map(|row| profile_from_row(row, mode))
        .collect()
}

fn profile_from_row(row: &[String], mode: RosterMode) -> Option<Profile> {
    let email = row.get(mode.email_column())?.trim();
    if email.is_empty() {
        return None;
    }

    match mode.name_column() {
        Some(column) => {
            let full_name = row.get(column)?;
            Some(Profile::with_full_name(email, full_name))
        }
        None => Some(Profile::from_email(email)),
    }
}
