//! Decision-table tests for the pure route-guard module.

use greenlands_portal::guard::{
    ResolvedSession, RouteDecision, VIEWS, ViewDescriptor, decide, find_view,
};
use greenlands_portal::models::{Party, Role};
use uuid::Uuid;

const ALL_ROLES: [Role; 5] = [
    Role::Farmer,
    Role::Government,
    Role::Analyst,
    Role::Admin,
    Role::Staff,
];

fn identity(role: Role) -> ResolvedSession {
    ResolvedSession::Authenticated(Party {
        id: Uuid::new_v4(),
        name: "Test User".to_string(),
        role,
    })
}

// --- Tests ---

#[test]
fn test_unknown_session_always_suspends() {
    // While session restore is in flight the guard must render nothing,
    // never redirect — regardless of the target view.
    for view in VIEWS {
        assert_eq!(
            decide(&ResolvedSession::Unknown, view),
            RouteDecision::Suspend,
            "view {} must suspend while identity is unresolved",
            view.path
        );
    }
}

#[test]
fn test_anonymous_always_redirects_to_login() {
    for view in VIEWS {
        assert_eq!(
            decide(&ResolvedSession::Anonymous, view),
            RouteDecision::RedirectLogin,
            "view {} must send anonymous visitors to login",
            view.path
        );
    }
}

#[test]
fn test_unrestricted_views_admit_every_role() {
    let dashboard = find_view("/").expect("dashboard view");
    let communication = find_view("/communication").expect("communication view");

    for role in ALL_ROLES {
        assert_eq!(decide(&identity(role), dashboard), RouteDecision::Allow);
        assert_eq!(decide(&identity(role), communication), RouteDecision::Allow);
    }
}

#[test]
fn test_disallowed_role_redirects_home() {
    let farmer_portal = find_view("/farmer-portal").expect("farmer portal view");

    assert_eq!(
        decide(&identity(Role::Analyst), farmer_portal),
        RouteDecision::RedirectHome
    );
    assert_eq!(
        decide(&identity(Role::Government), farmer_portal),
        RouteDecision::RedirectHome
    );
    // But the roles in the allowed set get through
    assert_eq!(
        decide(&identity(Role::Farmer), farmer_portal),
        RouteDecision::Allow
    );
    assert_eq!(
        decide(&identity(Role::Admin), farmer_portal),
        RouteDecision::Allow
    );
}

#[test]
fn test_allow_iff_role_in_allowed_set() {
    // The guard's core invariant, checked over the whole table: an
    // authenticated session is allowed exactly when the view is unrestricted
    // or its allowed set contains the role.
    for view in VIEWS {
        for role in ALL_ROLES {
            let expected = match view.allowed_roles {
                None => RouteDecision::Allow,
                Some(allowed) if allowed.contains(&role) => RouteDecision::Allow,
                Some(_) => RouteDecision::RedirectHome,
            };
            assert_eq!(
                decide(&identity(role), view),
                expected,
                "role {role:?} on view {}",
                view.path
            );
        }
    }
}

#[test]
fn test_find_view_matches_exact_paths() {
    assert!(find_view("/government").is_some());
    assert!(find_view("/no-such-view").is_none());

    // Lookup is exact, not prefix-based
    assert!(find_view("/government/extra").is_none());
}

#[test]
fn test_guard_decision_for_ad_hoc_view() {
    // A view descriptor does not need to be in the static table to be guarded.
    let restricted = ViewDescriptor {
        path: "/experiments",
        allowed_roles: Some(&[Role::Admin]),
    };

    assert_eq!(
        decide(&identity(Role::Admin), &restricted),
        RouteDecision::Allow
    );
    assert_eq!(
        decide(&identity(Role::Staff), &restricted),
        RouteDecision::RedirectHome
    );
    assert_eq!(
        decide(&ResolvedSession::Anonymous, &restricted),
        RouteDecision::RedirectLogin
    );
}
