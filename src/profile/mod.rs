//! Profiles, rosters and the email identity rules shared by every component.

mod email;
mod types;

pub use email::is_email_valid;
pub use types::{split_full_name, Profile, Roster};
