use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Defines endpoints that are **unauthenticated** and accessible to any client.
/// Everything else in the API sits behind the authentication layer; the only
/// anonymous surface is the health probe and the credential exchange itself.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // A simple, unauthenticated endpoint used for monitoring and load balancer checks.
        // Returns "ok" immediately to verify the service is running and responsive.
        .route("/health", get(|| async { "ok" }))
        // POST /auth/login
        // Exchanges an email/password credential for a signed bearer token plus
        // the resolved user record. Unknown email and wrong password are
        // indistinguishable in the response.
        .route("/auth/login", post(handlers::login))
}
