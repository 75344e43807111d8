//! Mailchimp marketing API client (reqwest-based).

use super::types::{
    AddOutcome, ApiProblem, ListSummary, ListsPage, MembersPage, MergeFields, NewMember,
};
use super::{ListDirectory, ListTarget, TargetError};
use crate::profile::{is_email_valid, Profile};
use crate::utils::USER_AGENT;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::time::Duration;
use tracing::debug;

/// Page size used when walking members and lists
const PAGE_SIZE: u64 = 1000;

/// Title the API uses when a subscription targets an existing member
const MEMBER_EXISTS_TITLE: &str = "Member Exists";

/// Credentials for the marketing API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailchimpConfig {
    /// API key of the form `<secret>-<datacenter>`
    pub api_key: String,
    /// Basic-auth user name; the API ignores its value
    pub user: String,
}

impl MailchimpConfig {
    /// Datacenter suffix of the API key, e.g. `us6`
    pub fn datacenter(&self) -> Option<&str> {
        self.api_key
            .rsplit_once('-')
            .map(|(_, dc)| dc)
            .filter(|dc| !dc.is_empty())
    }

    pub fn base_url(&self) -> Option<String> {
        self.datacenter()
            .map(|dc| format!("https://{dc}.api.mailchimp.com/3.0"))
    }
}

/// Stateless client; every call carries the configured credentials.
#[derive(Debug, Clone)]
pub struct MailchimpClient {
    base_url: String,
    config: MailchimpConfig,
    http_client: Client,
}

impl MailchimpClient {
    pub fn new(config: MailchimpConfig, timeout: Duration) -> Result<Self, TargetError> {
        let base_url = config.base_url().ok_or_else(|| {
            TargetError::InvalidConfig("API key has no datacenter suffix".to_string())
        })?;
        let http_client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self::with_http_client(base_url, config, http_client))
    }

    /// Create a client with a pre-built `reqwest::Client` (for testing).
    pub fn with_http_client(base_url: String, config: MailchimpConfig, http_client: Client) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            base_url,
            config,
            http_client,
        }
    }

    /// Handle on a single list
    pub fn list(&self, list_id: impl Into<String>) -> MailchimpList {
        MailchimpList {
            client: self.clone(),
            list_id: list_id.into(),
        }
    }

    /// All member email addresses of a list, across every page
    pub async fn get_all_emails(&self, list_id: &str) -> Result<HashSet<String>, TargetError> {
        let url = format!("{}/lists/{}/members", self.base_url, list_id);
        let mut emails = HashSet::new();
        let mut offset: u64 = 0;

        loop {
            let page: MembersPage = self
                .get_page(&url, "members.email_address,total_items", offset)
                .await?;
            let received = page.members.len() as u64;
            emails.extend(page.members.into_iter().map(|m| m.email_address));
            offset += received;

            if received == 0 || offset >= page.total_items {
                break;
            }
        }

        debug!(list_id = %list_id, members = emails.len(), "Fetched list members");
        Ok(emails)
    }

    pub async fn get_list_name(&self, list_id: &str) -> Result<String, TargetError> {
        #[derive(serde::Deserialize)]
        struct ListName {
            #[serde(default)]
            name: String,
        }

        let url = format!("{}/lists/{}", self.base_url, list_id);
        let response = self
            .http_client
            .get(&url)
            .basic_auth(&self.config.user, Some(&self.config.api_key))
            .query(&[("fields", "name")])
            .send()
            .await?;
        let body: ListName = self.handle_response(response).await?;
        Ok(body.name)
    }

    /// Subscribe a profile to a list with its name merge fields.
    pub async fn add_member(
        &self,
        list_id: &str,
        profile: &Profile,
    ) -> Result<AddOutcome, TargetError> {
        if !is_email_valid(&profile.email) {
            return Ok(AddOutcome::InvalidEmail);
        }

        let url = format!("{}/lists/{}/members", self.base_url, list_id);
        let body = NewMember {
            email_address: &profile.email,
            status: "subscribed",
            merge_fields: MergeFields {
                first_name: &profile.first_name,
                last_name: &profile.last_name,
            },
        };

        debug!(list_id = %list_id, email = %profile.email, "Subscribing member");
        let response = self
            .http_client
            .post(&url)
            .basic_auth(&self.config.user, Some(&self.config.api_key))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(AddOutcome::Added);
        }

        let problem = read_problem(response).await;
        if status == StatusCode::BAD_REQUEST && problem.title == MEMBER_EXISTS_TITLE {
            return Ok(AddOutcome::AlreadyMember);
        }

        Err(TargetError::Rejected {
            status: status.as_u16(),
            title: problem.title,
            detail: problem.detail,
        })
    }

    /// Every list visible to the account, with member counts
    pub async fn get_all_lists(&self) -> Result<Vec<ListSummary>, TargetError> {
        let url = format!("{}/lists", self.base_url);
        let mut lists = Vec::new();
        let mut offset: u64 = 0;

        loop {
            let page: ListsPage = self
                .get_page(
                    &url,
                    "lists.id,lists.name,lists.stats.member_count,total_items",
                    offset,
                )
                .await?;
            let received = page.lists.len() as u64;
            lists.extend(page.lists.into_iter().map(ListSummary::from));
            offset += received;

            if received == 0 || offset >= page.total_items {
                break;
            }
        }

        Ok(lists)
    }

    // ── Internal HTTP Methods ─────────────────────────────────────────

    async fn get_page<T: DeserializeOwned>(
        &self,
        url: &str,
        fields: &str,
        offset: u64,
    ) -> Result<T, TargetError> {
        debug!("Mailchimp GET {} (offset={})", url, offset);
        let response = self
            .http_client
            .get(url)
            .basic_auth(&self.config.user, Some(&self.config.api_key))
            .query(&[
                ("fields", fields.to_string()),
                ("count", PAGE_SIZE.to_string()),
                ("offset", offset.to_string()),
            ])
            .send()
            .await?;
        self.handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T, TargetError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let problem = read_problem(response).await;
        Err(TargetError::Rejected {
            status: status.as_u16(),
            title: problem.title,
            detail: problem.detail,
        })
    }
}

async fn read_problem(response: Response) -> ApiProblem {
    let text = response.text().await.unwrap_or_default();
    serde_json::from_str(&text).unwrap_or_else(|_| ApiProblem {
        title: String::new(),
        detail: text,
    })
}

#[async_trait]
impl ListDirectory for MailchimpClient {
    async fn enumerate_lists(&self) -> Result<Vec<ListSummary>, TargetError> {
        self.get_all_lists().await
    }
}

/// One configured target list
#[derive(Debug, Clone)]
pub struct MailchimpList {
    client: MailchimpClient,
    list_id: String,
}

#[async_trait]
impl ListTarget for MailchimpList {
    fn list_id(&self) -> &str {
        &self.list_id
    }

    async fn list_name(&self) -> Result<String, TargetError> {
        self.client.get_list_name(&self.list_id).await
    }

    async fn list_members(&self) -> Result<HashSet<String>, TargetError> {
        self.client.get_all_emails(&self.list_id).await
    }

    async fn add_member(&self, profile: &Profile) -> Result<AddOutcome, TargetError> {
        self.client.add_member(&self.list_id, profile).await
    }
}
