use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Core Application Schemas ---

/// Role
///
/// The closed set of portal roles used for Role-Based Access Control (RBAC).
/// Every identity carries exactly one role; the route guard and the admin
/// endpoints match on this enum exhaustively, so adding a role forces every
/// access decision to be revisited at compile time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, ToSchema, Default,
)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Farmer,
    Government,
    Analyst,
    Admin,
    Staff,
}

/// User
///
/// Represents a user's canonical identity record in the portal directory.
/// This structure includes the minimal required data resolved during authentication.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    // The user's login identifier.
    pub email: String,
    // The RBAC field.
    pub role: Role,
}

/// Party
///
/// The identity snapshot embedded in a message as `sender` / `recipient`.
/// Captured at send time so a message remains renderable even if the directory
/// entry changes later. Ownership checks compare against `id` only.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct Party {
    pub id: Uuid,
    pub name: String,
    pub role: Role,
}

impl From<&User> for Party {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            role: user.role,
        }
    }
}

/// Priority
///
/// Message priority marker. Purely informational for the client inbox UI,
/// except that the admin stats endpoint counts `high` messages.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default,
)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

/// Message
///
/// A single inbox message. `read` is a one-way latch: it starts false, flips to
/// true the first time the recipient views the message (or explicitly marks it),
/// and there is no reverse operation. `timestamp` is always server-assigned at
/// insertion time, never client-supplied.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct Message {
    pub id: Uuid,
    pub sender: Party,
    pub recipient: Party,
    pub subject: String,
    pub content: String,
    #[ts(type = "string")]
    pub timestamp: DateTime<Utc>,
    pub read: bool,
    pub priority: Priority,
}

/// --- Request Payloads (Input Schemas) ---

/// LoginRequest
///
/// Input payload for the public login endpoint (POST /auth/login).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// SendMessageRequest
///
/// Input payload for sending a message (POST /messages).
///
/// All three required fields are modelled as `Option<T>` so the handler can
/// report every missing/blank field in a single field-level validation
/// response, rather than failing on the first absent key at deserialization.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct SendMessageRequest {
    pub recipient_id: Option<Uuid>,
    pub subject: Option<String>,
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

/// --- Response Schemas (Output) ---

/// LoginResponse
///
/// Output schema for a successful login: the signed bearer token plus the
/// resolved directory record, so the client can populate its session store
/// without a second round trip.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// UserProfile
///
/// Output schema for the authenticated user's profile (GET /me).
/// Provides a slightly richer set of data than the internal `User` struct.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    // Dynamic URL for a profile image/avatar.
    pub avatar_url: Option<String>,
}

/// DeleteResponse
///
/// Minimal confirmation body returned by DELETE /messages/{id}.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct DeleteResponse {
    pub message: String,
}

/// NotificationSummary
///
/// Output schema for the inbox badge (GET /notifications): the caller's unread
/// count plus their five most recent messages, newest first.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct NotificationSummary {
    pub unread_count: i64,
    pub recent_messages: Vec<Message>,
}

/// MessagingStats
///
/// Output schema for the administrative statistics dashboard (GET /admin/stats).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct MessagingStats {
    pub total_users: i64,
    pub total_messages: i64,
    pub unread_messages: i64,
    pub high_priority_messages: i64,
}

/// --- Announcement Schemas ---

/// AnnouncementKind
///
/// Severity class of a system announcement, driving the client banner style.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default,
)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementKind {
    #[default]
    Info,
    Warning,
    Alert,
}

/// Announcement
///
/// A system-wide broadcast shown to every authenticated user. Announcements
/// are static fixtures with an expiry; expired entries are filtered out server-side.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct Announcement {
    pub id: i64,
    pub title: String,
    pub content: String,

    // 'type' is a reserved keyword in Rust, so we rename it for internal Rust use.
    #[serde(rename = "type")]
    pub kind: AnnouncementKind,

    pub priority: Priority,
    #[ts(type = "string")]
    pub timestamp: DateTime<Utc>,
    #[ts(type = "string")]
    pub expires_at: DateTime<Utc>,
}
