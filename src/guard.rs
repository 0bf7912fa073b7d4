//! Client-side route guarding, as a pure decision module.
//!
//! The SPA asks this logic whether the current session may enter a view
//! before any request is made; the server-side extractor in [`crate::auth`]
//! is an independent trust boundary that re-checks every API call. The two
//! layers are deliberately redundant, not a pipeline.

use crate::models::{Party, Role};

/// ResolvedSession
///
/// The three-state result of session resolution. `Unknown` exists so the
/// guard can suspend while a session restore is in flight instead of
/// redirecting and then un-redirecting once the identity arrives.
#[derive(Debug, Clone, Default)]
pub enum ResolvedSession {
    /// Session restore still in flight; no decision can be made yet.
    #[default]
    Unknown,
    /// A resolved, authenticated identity.
    Authenticated(Party),
    /// Resolution finished and found no session.
    Anonymous,
}

/// RouteDecision
///
/// The guard's verdict for a (session, view) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Render nothing; identity resolution has not finished.
    Suspend,
    /// The session may enter the view.
    Allow,
    /// No session: send the visitor to the login view.
    RedirectLogin,
    /// Authenticated but the role is not permitted: send them home.
    RedirectHome,
}

/// ViewDescriptor
///
/// Static declaration of a client view and the roles allowed to reach it.
/// `allowed_roles: None` means the view is unrestricted (any authenticated
/// role may enter). Defined once at startup, never mutated.
#[derive(Debug, Clone, Copy)]
pub struct ViewDescriptor {
    pub path: &'static str,
    pub allowed_roles: Option<&'static [Role]>,
}

/// The portal's view table. Paths mirror the SPA routes one-to-one.
pub const VIEWS: &[ViewDescriptor] = &[
    ViewDescriptor {
        path: "/",
        allowed_roles: None,
    },
    ViewDescriptor {
        path: "/land-mapping",
        allowed_roles: Some(&[Role::Farmer, Role::Government, Role::Staff, Role::Admin]),
    },
    ViewDescriptor {
        path: "/farmer-portal",
        allowed_roles: Some(&[Role::Farmer, Role::Admin]),
    },
    ViewDescriptor {
        path: "/government",
        allowed_roles: Some(&[Role::Government, Role::Admin]),
    },
    ViewDescriptor {
        path: "/analytics",
        allowed_roles: Some(&[Role::Analyst, Role::Government, Role::Admin]),
    },
    ViewDescriptor {
        path: "/communication",
        allowed_roles: None,
    },
];

/// Looks up a view descriptor by its exact path.
pub fn find_view(path: &str) -> Option<&'static ViewDescriptor> {
    VIEWS.iter().find(|view| view.path == path)
}

/// decide
///
/// The guard's single decision function. Pure and synchronous: given a
/// resolved session state and a target view, it returns exactly one verdict.
///
/// Invariant: `Allow` is returned iff the session is authenticated and the
/// identity's role is in the view's allowed set (or the view is unrestricted).
pub fn decide(session: &ResolvedSession, view: &ViewDescriptor) -> RouteDecision {
    match session {
        ResolvedSession::Unknown => RouteDecision::Suspend,
        ResolvedSession::Anonymous => RouteDecision::RedirectLogin,
        ResolvedSession::Authenticated(identity) => match view.allowed_roles {
            Some(allowed) if !allowed.contains(&identity.role) => RouteDecision::RedirectHome,
            _ => RouteDecision::Allow,
        },
    }
}
