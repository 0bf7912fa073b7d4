use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Admin Router Module
///
/// Defines the routes exclusively accessible to users with the `admin` role.
///
/// Access Control:
/// This entire router is nested behind the authentication layer, and every
/// handler additionally checks `role == Role::Admin` before touching the
/// repository. Authentication and role authorization are separate steps on
/// purpose: the extractor never knows about per-endpoint role requirements.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /admin/stats
        // Retrieves core dashboard metrics (total users/messages, unread and
        // high-priority counts) for system oversight.
        .route("/stats", get(handlers::get_admin_stats))
}
