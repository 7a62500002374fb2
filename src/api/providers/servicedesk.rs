//! Helpdesk ticketing API client
//!
//! Exchanges user credentials for a bearer token, then searches tickets by
//! last activity and lists the notes of individual tickets. Every response
//! arrives wrapped in a `{success, result}` envelope.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};
use std::fmt;
use tracing::debug;

use super::send_json;
use crate::api::error::ApiError;
use crate::types::{Note, TicketId, TicketSummary};

const PROVIDER_NAME: &str = "servicedesk";

/// Content type the ticketing API expects on JSON requests
const JSON_PATCH_CONTENT_TYPE: &str = "application/json-patch+json";

/// Username, password and tenant exchanged for a bearer token
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub tenant: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("tenant", &self.tenant)
            .finish()
    }
}

/// Operations the notes report needs from the ticketing backend
#[async_trait]
pub trait ServiceDeskApi: Send + Sync {
    /// Exchange credentials for a bearer token used by every later call
    async fn authenticate(&mut self, credentials: &Credentials) -> Result<(), ApiError>;

    /// One page of tickets whose last activity is at or after `from`
    async fn search_tickets(
        &self,
        from: DateTime<Utc>,
        page_number: u32,
        page_size: u32,
    ) -> Result<Vec<TicketSummary>, ApiError>;

    /// All notes attached to a ticket
    async fn ticket_notes(&self, ticket_id: TicketId) -> Result<Vec<Note>, ApiError>;
}

/// Ticketing API client; one `reqwest::Client` is reused for every request
pub struct ServiceDeskClient {
    server_url: String,
    token: Option<String>,
    client: Client,
}

impl ServiceDeskClient {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            token: None,
            client: Client::new(),
        }
    }

    /// Use an already issued bearer token instead of authenticating
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn tickets_url(&self) -> String {
        format!("{}/v2/servicedesk/tickets", self.server_url)
    }

    fn bearer(&self) -> Result<String, ApiError> {
        self.token
            .as_deref()
            .map(|token| format!("Bearer {token}"))
            .ok_or_else(|| ApiError::unauthorized(PROVIDER_NAME))
    }
}

/// Format a window start the way the search filter expects it
pub fn activity_filter_timestamp(from: DateTime<Utc>) -> String {
    from.to_rfc3339_opts(SecondsFormat::Micros, false)
}

// Ticketing API response types
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    result: Option<T>,
}

impl<T> Envelope<T> {
    fn into_result(self, what: &str) -> Result<T, ApiError> {
        if !self.success {
            return Err(ApiError::rejected(
                PROVIDER_NAME,
                format!("{what}: success=false"),
            ));
        }
        self.result
            .ok_or_else(|| ApiError::parse(PROVIDER_NAME, format!("{what}: missing result")))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthResult {
    access_token: Option<String>,
}

/// Keep an explicit `null` distinct from an absent field
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// Text for a loosely typed field: absent takes `default`, `null` is empty
fn field_text(value: Option<Value>, default: &str) -> String {
    match value {
        None => default.to_string(),
        Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text,
        Some(other) => other.to_string(),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TicketDto {
    id: TicketId,
    #[serde(default, deserialize_with = "present")]
    ticket_number: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    assignee_name: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    queue_name: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    account_name: Option<Value>,
}

impl From<TicketDto> for TicketSummary {
    fn from(dto: TicketDto) -> Self {
        TicketSummary {
            id: dto.id,
            ticket_number: field_text(dto.ticket_number, "Unknown"),
            assignee_name: field_text(dto.assignee_name, "Unassigned"),
            queue_name: field_text(dto.queue_name, "Unknown"),
            account_name: field_text(dto.account_name, "Unknown"),
        }
    }
}

/// Note fields are decoded loosely so one odd value cannot fail the whole list
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NoteDto {
    #[serde(default, deserialize_with = "present")]
    details: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    created_by_name: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    created_on: Option<Value>,
}

impl NoteDto {
    fn into_note(self, ticket_id: TicketId) -> Note {
        // Non-string timestamps are kept as JSON text and rejected when parsed
        let created_on = match self.created_on {
            None | Some(Value::Null) => None,
            Some(Value::String(raw)) => Some(raw),
            Some(other) => Some(other.to_string()),
        };
        Note {
            ticket_id,
            details: field_text(self.details, ""),
            created_by_name: field_text(self.created_by_name, ""),
            created_on,
        }
    }
}

#[async_trait]
impl ServiceDeskApi for ServiceDeskClient {
    async fn authenticate(&mut self, credentials: &Credentials) -> Result<(), ApiError> {
        let url = format!("{}/v2/security/authenticate", self.server_url);
        debug!("servicedesk POST: {}", url);

        let form: &[(&str, &str)] = &[
            ("UserName", credentials.username.as_str()),
            ("Password", credentials.password.as_str()),
            ("Tenant", credentials.tenant.as_str()),
            ("GrantType", "Password"),
        ];
        let request = self.client.post(&url).form(form);

        let envelope: Envelope<AuthResult> = send_json(PROVIDER_NAME, request)
            .await
            .map_err(ApiError::into_auth_failure)?;
        let token = envelope
            .into_result("authenticate")
            .ok()
            .and_then(|result| result.access_token)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ApiError::AuthenticationFailed {
                provider: PROVIDER_NAME.to_string(),
                message: "credentials rejected, check username, password and company name"
                    .to_string(),
            })?;

        self.token = Some(token);
        Ok(())
    }

    async fn search_tickets(
        &self,
        from: DateTime<Utc>,
        page_number: u32,
        page_size: u32,
    ) -> Result<Vec<TicketSummary>, ApiError> {
        let url = format!("{}/search", self.tickets_url());
        debug!("servicedesk POST: {} (page {})", url, page_number);

        let payload = json!({
            "filter": {
                "LastActivityUpdateFrom": activity_filter_timestamp(from),
            },
            "pageNumber": page_number,
            "pageSize": page_size,
        });
        let request = self
            .client
            .post(&url)
            .header("Authorization", self.bearer()?)
            .header("Content-Type", JSON_PATCH_CONTENT_TYPE)
            .body(payload.to_string());

        let envelope: Envelope<Vec<TicketDto>> = send_json(PROVIDER_NAME, request).await?;
        Ok(envelope
            .into_result("ticket search")?
            .into_iter()
            .map(TicketSummary::from)
            .collect())
    }

    async fn ticket_notes(&self, ticket_id: TicketId) -> Result<Vec<Note>, ApiError> {
        let url = format!("{}/{}/notes", self.tickets_url(), ticket_id);
        debug!("servicedesk GET: {}", url);

        let request = self
            .client
            .get(&url)
            .header("Authorization", self.bearer()?)
            .header("Content-Type", JSON_PATCH_CONTENT_TYPE);

        let envelope: Envelope<Vec<NoteDto>> = send_json(PROVIDER_NAME, request).await?;
        Ok(envelope
            .into_result("ticket notes")?
            .into_iter()
            .map(|note| note.into_note(ticket_id))
            .collect())
    }
}
