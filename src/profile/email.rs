use once_cell::sync::Lazy;
use regex::Regex;

/// Loose address shape: `local@domain.tld`, anchored at the start only.
static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@]+@[^@]+\.[^@]+").expect("email pattern should compile"));

/// Check whether a value looks like an email address.
///
/// This is intentionally permissive; the mailing-list service performs its
/// own stricter validation when a member is added.
pub fn is_email_valid(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}
