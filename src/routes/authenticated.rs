use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, get, post, put},
};

/// Authenticated Router Module
///
/// Defines the routes accessible to any user who has successfully passed the
/// authentication layer. This module implements the communication surface of
/// the portal: the inbox, sending, read-state transitions, contacts, and the
/// notification badge.
///
/// Access Control Strategy:
/// Every handler in this module relies on the `AuthUser` extractor middleware
/// being present on the router layer above this module. This guarantees that
/// all handlers receive a validated `AuthUser` struct containing the user's
/// ID and role, which is then used for all ownership checks (sender/recipient
/// membership on read and delete, recipient-only on the read latch).
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /me
        // Retrieves the currently authenticated user's profile data.
        .route("/me", get(handlers::get_me))
        // --- Messaging ---
        // GET /messages — the caller's inbox, newest first.
        // POST /messages — send a new message; recipient must exist, the
        // message always starts unread, and the timestamp is server-assigned.
        .route(
            "/messages",
            get(handlers::get_messages).post(handlers::send_message),
        )
        // GET/DELETE /messages/{id}
        // Reading is participant-only and flips the read latch when the
        // recipient views. Deleting is participant-only and matches by id.
        .route(
            "/messages/{id}",
            get(handlers::get_message_details).delete(handlers::delete_message),
        )
        // PUT /messages/{id}/read
        // Explicit read-state transition. Recipient-only, idempotent, and
        // one-way (there is no mark-unread).
        .route("/messages/{id}/read", put(handlers::mark_message_read))
        // --- Directory & Notifications ---
        // GET /contacts — available recipients (directory minus the caller).
        .route("/contacts", get(handlers::get_contacts))
        // GET /notifications — unread count plus the five most recent messages.
        .route("/notifications", get(handlers::get_notifications))
        // GET /announcements — active system broadcasts.
        .route("/announcements", get(handlers::get_announcements))
}
