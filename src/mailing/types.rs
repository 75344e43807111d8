use serde::{Deserialize, Serialize};

/// Result of a subscription attempt that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// The email failed local validation; nothing was sent
    InvalidEmail,
    /// The service already knows this address
    AlreadyMember,
}

/// A list as shown in the listing table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSummary {
    pub id: String,
    pub name: String,
    pub member_count: u64,
}

/// Render lists as the `List ID | Member count | List name` table
pub fn format_list_table(lists: &[ListSummary]) -> String {
    let mut out = String::new();
    out.push_str("List ID\t| Member count\t| List name\n");
    out.push_str("----------------------------------------\n");
    for list in lists {
        out.push_str(&format!(
            "{}\t| {}\t\t| {}\n",
            list.id, list.member_count, list.name
        ));
    }
    out
}

// Wire types for the Mailchimp marketing API (subsets)

#[derive(Debug, Deserialize)]
pub(crate) struct MembersPage {
    #[serde(default)]
    pub members: Vec<MemberAddress>,
    #[serde(default)]
    pub total_items: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MemberAddress {
    pub email_address: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListsPage {
    #[serde(default)]
    pub lists: Vec<ListInfo>,
    #[serde(default)]
    pub total_items: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub stats: ListStats,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListStats {
    #[serde(default)]
    pub member_count: u64,
}

impl From<ListInfo> for ListSummary {
    fn from(info: ListInfo) -> Self {
        Self {
            id: info.id,
            name: info.name,
            member_count: info.stats.member_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct NewMember<'a> {
    pub email_address: &'a str,
    pub status: &'static str,
    pub merge_fields: MergeFields<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct MergeFields<'a> {
    #[serde(rename = "FNAME")]
    pub first_name: &'a str,
    #[serde(rename = "LNAME")]
    pub last_name: &'a str,
}

/// Problem-detail body returned on API errors
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiProblem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub detail: String,
}
