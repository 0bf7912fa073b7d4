use crate::{
    AppState,
    auth::{AuthUser, issue_token},
    error::{ApiError, FieldError},
    models::{
        self, Announcement, AnnouncementKind, DeleteResponse, LoginRequest, LoginResponse,
        Message, MessagingStats, NotificationSummary, Party, Role, SendMessageRequest, User,
        UserProfile,
    },
};
use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{Duration, Utc};
use uuid::Uuid;

// --- Handlers ---

/// login
///
/// [Public Route] Exchanges an email/password credential for a signed bearer token.
///
/// *Security*: unknown email and wrong password both collapse into the same
/// 401 response, so the endpoint cannot be used to probe which emails exist.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 401, description = "Bad credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state
        .repo
        .verify_credentials(&payload.email, &payload.password)
        .await
        .ok_or(ApiError::Unauthenticated)?;

    let token = issue_token(user.id, &state.config.jwt_secret).map_err(|_| ApiError::Internal)?;

    Ok(Json(LoginResponse { token, user }))
}

/// get_messages
///
/// [Authenticated Route] Lists the caller's inbox: every message where they are
/// the sender or the recipient, newest first.
///
/// *Security*: the repository filter is the no-cross-user-leakage invariant;
/// a message between two other parties can never appear here.
#[utoipa::path(
    get,
    path = "/messages",
    responses((status = 200, description = "My Messages", body = [Message]))
)]
pub async fn get_messages(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> Json<Vec<models::Message>> {
    let messages = state.repo.get_messages_for(id).await;
    Json(messages)
}

/// get_message_details
///
/// [Authenticated Route] Retrieves a single message by ID.
///
/// *Authorization*: only the sender or the recipient may read the message;
/// anyone else gets a 403 with no content.
///
/// *Side effect*: when the recipient views an unread message, the read latch
/// flips to true — exactly once; re-viewing has no further effect.
#[utoipa::path(
    get,
    path = "/messages/{id}",
    params(("id" = Uuid, Path, description = "Message ID")),
    responses(
        (status = 200, description = "Found", body = Message),
        (status = 403, description = "Not a participant"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_message_details(
    AuthUser { id: user_id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<models::Message>, ApiError> {
    let message = state
        .repo
        .get_message(id)
        .await
        .ok_or(ApiError::NotFound("Message"))?;

    if message.sender.id != user_id && message.recipient.id != user_id {
        return Err(ApiError::Forbidden);
    }

    // Mark as read if the recipient is viewing.
    if message.recipient.id == user_id && !message.read {
        if let Some(updated) = state.repo.mark_read(id, user_id).await {
            return Ok(Json(updated));
        }
    }

    Ok(Json(message))
}

/// send_message
///
/// [Authenticated Route] Sends a new message to a directory user.
///
/// The sender identity is taken from the authenticated session, never from the
/// payload, and the timestamp is assigned server-side so ordering cannot be spoofed.
/// Every new message starts unread.
#[utoipa::path(
    post,
    path = "/messages",
    request_body = SendMessageRequest,
    responses(
        (status = 200, description = "Sent", body = Message),
        (status = 400, description = "Missing required fields"),
        (status = 404, description = "Recipient unknown")
    )
)]
pub async fn send_message(
    AuthUser { id, name, role }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<SendMessageRequest>,
) -> Result<Json<models::Message>, ApiError> {
    // Field-level validation, reporting every missing/blank field at once.
    let mut errors = Vec::new();
    if payload.recipient_id.is_none() {
        errors.push(FieldError::required("recipient_id"));
    }
    let subject = payload.subject.filter(|s| !s.trim().is_empty());
    if subject.is_none() {
        errors.push(FieldError::required("subject"));
    }
    let content = payload.content.filter(|c| !c.trim().is_empty());
    if content.is_none() {
        errors.push(FieldError::required("content"));
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    // All three are Some past this point; the defaults are unreachable.
    let recipient_id = payload.recipient_id.unwrap_or_default();
    let recipient = state
        .repo
        .get_user(recipient_id)
        .await
        .ok_or(ApiError::NotFound("Recipient"))?;

    let sender = Party { id, name, role };

    let message = state
        .repo
        .insert_message(
            sender,
            Party::from(&recipient),
            subject.unwrap_or_default(),
            content.unwrap_or_default(),
            payload.priority.unwrap_or_default(),
        )
        .await;

    Ok(Json(message))
}

/// mark_message_read
///
/// [Authenticated Route] Explicitly marks a message as read.
///
/// *Authorization*: **Recipient-Only** — the sender cannot mark their own
/// message read on the recipient's behalf. The operation is idempotent; there
/// is no mark-unread counterpart.
#[utoipa::path(
    put,
    path = "/messages/{id}/read",
    params(("id" = Uuid, Path, description = "Message ID")),
    responses(
        (status = 200, description = "Marked as read", body = Message),
        (status = 403, description = "Not the recipient"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn mark_message_read(
    AuthUser { id: user_id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<models::Message>, ApiError> {
    let message = state
        .repo
        .get_message(id)
        .await
        .ok_or(ApiError::NotFound("Message"))?;

    if message.recipient.id != user_id {
        return Err(ApiError::Forbidden);
    }

    let updated = state
        .repo
        .mark_read(id, user_id)
        .await
        .ok_or(ApiError::NotFound("Message"))?;

    Ok(Json(updated))
}

/// delete_message
///
/// [Authenticated Route] Removes a message from the store.
///
/// *Authorization*: either participant (sender or recipient) may delete; a
/// third party gets a 403 and the message remains. Removal matches by id, so
/// an append landing between the lookup and the removal cannot shift the target.
#[utoipa::path(
    delete,
    path = "/messages/{id}",
    params(("id" = Uuid, Path, description = "Message ID")),
    responses(
        (status = 200, description = "Deleted", body = DeleteResponse),
        (status = 403, description = "Not a participant"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_message(
    AuthUser { id: user_id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let message = state
        .repo
        .get_message(id)
        .await
        .ok_or(ApiError::NotFound("Message"))?;

    if message.sender.id != user_id && message.recipient.id != user_id {
        return Err(ApiError::Forbidden);
    }

    if !state.repo.delete_message(id).await {
        // Raced with another delete of the same message.
        return Err(ApiError::NotFound("Message"));
    }

    Ok(Json(DeleteResponse {
        message: "deleted".to_string(),
    }))
}

/// get_contacts
///
/// [Authenticated Route] Lists the directory users available as message
/// recipients — everyone except the caller, sorted by name.
#[utoipa::path(
    get,
    path = "/contacts",
    responses((status = 200, description = "Contacts", body = [User]))
)]
pub async fn get_contacts(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> Json<Vec<models::User>> {
    let contacts = state.repo.list_contacts(id).await;
    Json(contacts)
}

/// get_notifications
///
/// [Authenticated Route] The inbox badge summary: how many messages are
/// addressed to the caller and still unread, plus their five most recent
/// messages (sent or received), newest first.
#[utoipa::path(
    get,
    path = "/notifications",
    responses((status = 200, description = "Summary", body = NotificationSummary))
)]
pub async fn get_notifications(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> Json<NotificationSummary> {
    let messages = state.repo.get_messages_for(id).await;

    let unread_count = messages
        .iter()
        .filter(|msg| msg.recipient.id == id && !msg.read)
        .count() as i64;

    // Already newest-first from the repository.
    let recent_messages = messages.into_iter().take(5).collect();

    Json(NotificationSummary {
        unread_count,
        recent_messages,
    })
}

/// get_announcements
///
/// [Authenticated Route] System-wide broadcasts. These are static fixtures
/// with timestamps relative to now; entries past their expiry are dropped
/// before the response is built.
#[utoipa::path(
    get,
    path = "/announcements",
    responses((status = 200, description = "Active announcements", body = [Announcement]))
)]
pub async fn get_announcements(AuthUser { id: _user_id, .. }: AuthUser) -> Json<Vec<Announcement>> {
    let now = Utc::now();

    let announcements = vec![
        Announcement {
            id: 1,
            title: "New Subsidy Program Launch".to_string(),
            content: "A new agricultural subsidy program has been launched. Check the \
                      government portal for details."
                .to_string(),
            kind: AnnouncementKind::Info,
            priority: models::Priority::High,
            timestamp: now - Duration::hours(3),
            expires_at: now + Duration::days(30),
        },
        Announcement {
            id: 2,
            title: "System Maintenance Notice".to_string(),
            content: "The platform will be under maintenance this weekend from 2-4 AM. \
                      Please plan accordingly."
                .to_string(),
            kind: AnnouncementKind::Warning,
            priority: models::Priority::Normal,
            timestamp: now - Duration::hours(20),
            expires_at: now + Duration::days(6),
        },
        Announcement {
            id: 3,
            title: "Weather Alert".to_string(),
            content: "Heavy rainfall expected in the northern region. Farmers are \
                      advised to take necessary precautions."
                .to_string(),
            kind: AnnouncementKind::Alert,
            priority: models::Priority::High,
            timestamp: now - Duration::hours(48),
            expires_at: now + Duration::days(2),
        },
    ];

    Json(
        announcements
            .into_iter()
            .filter(|a| a.expires_at > now)
            .collect(),
    )
}

/// get_me
///
/// [Authenticated Route] Provides the authenticated user's profile information,
/// resolved fresh from the directory so a role change is reflected immediately.
#[utoipa::path(
    get,
    path = "/me",
    responses((status = 200, description = "Profile", body = UserProfile))
)]
pub async fn get_me(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<UserProfile>, ApiError> {
    // The extractor verified existence, but the user may have been removed since.
    let user = state
        .repo
        .get_user(id)
        .await
        .ok_or(ApiError::Unauthenticated)?;

    Ok(Json(UserProfile {
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role,
        // Using a DiceBear API for stable, unique avatar generation based on UUID.
        avatar_url: Some(format!(
            "https://api.dicebear.com/7.x/avataaars/svg?seed={}",
            id
        )),
    }))
}

/// get_admin_stats
///
/// [Admin Route] Retrieves core messaging statistics for the dashboard.
///
/// *Authorization*: explicitly checks that the resolved role is `admin`.
#[utoipa::path(
    get,
    path = "/admin/stats",
    responses(
        (status = 200, description = "Stats", body = MessagingStats),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn get_admin_stats(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<MessagingStats>, ApiError> {
    if role != Role::Admin {
        return Err(ApiError::Forbidden);
    }
    Ok(Json(state.repo.get_stats().await))
}
