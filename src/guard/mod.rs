//! Route guard - decides whether a navigation request may enter a
//! protected part of the portal.
//!
//! The decision is a pure function of the session user, the allowed roles
//! of the matched route and the requested location. It never fetches data;
//! resolving the session is the job of [`crate::services::sessions`].

pub mod table;

use std::borrow::Cow;

use crate::{config::PortalConfig, models::SessionUser};

pub use table::{Access, MenuEntry, MenuSection, RouteRule, RouteTable, PORTAL_ROUTES};

/// Where the guard sends rejected navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destinations {
    pub admin_prefix: String,
    pub admin_login: String,
    pub login: String,
    pub access_denied: String,
}

impl From<&PortalConfig> for Destinations {
    fn from(config: &PortalConfig) -> Self {
        Self {
            admin_prefix: config.admin_prefix.clone(),
            admin_login: config.admin_login.clone(),
            login: config.login.clone(),
            access_denied: config.access_denied.clone(),
        }
    }
}

impl Default for Destinations {
    fn default() -> Self {
        Self::from(&PortalConfig::default())
    }
}

/// Result of one guard evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// No session: go to `login`, then come back to `from`
    Unauthenticated { login: String, from: String },
    /// Render the protected subtree
    AuthorizedView,
    /// Session present but none of the allowed roles
    Denied { to: String },
}

impl GuardOutcome {
    /// Location header for the redirect, `None` when the view is rendered
    pub fn redirect_target(&self) -> Option<String> {
        match self {
            GuardOutcome::Unauthenticated { login, from } => {
                Some(format!("{}?from={}", login, urlencoding::encode(from)))
            }
            GuardOutcome::Denied { to } => Some(to.clone()),
            GuardOutcome::AuthorizedView => None,
        }
    }
}

/// Evaluate a navigation request.
///
/// `user` is `None` when there is no live session. `allowed_roles` of `None`
/// or an empty list admits any authenticated user. `location` is the
/// requested path, optionally with its query string.
pub fn evaluate<S: AsRef<str>>(
    user: Option<&SessionUser>,
    allowed_roles: Option<&[S]>,
    location: &str,
    destinations: &Destinations,
) -> GuardOutcome {
    let Some(user) = user else {
        let path = location.split('?').next().unwrap_or(location);
        let login = if is_within(path, &destinations.admin_prefix) {
            &destinations.admin_login
        } else {
            &destinations.login
        };
        return GuardOutcome::Unauthenticated {
            login: login.clone(),
            from: location.to_string(),
        };
    };

    match allowed_roles {
        Some(roles) if !roles.is_empty() && !user.has_any_role(roles) => GuardOutcome::Denied {
            to: destinations.access_denied.clone(),
        },
        _ => GuardOutcome::AuthorizedView,
    }
}

/// Non-empty path segments, percent-decoded and lower-cased.
///
/// A segment that decodes to a separator is split again, so `/admin%2Fusers`
/// and `/ADMIN/users` name the same page as `/admin/users`.
pub(crate) fn segments(path: &str) -> Vec<String> {
    path.split('/')
        .flat_map(|raw| {
            let decoded = urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw));
            decoded
                .split(['/', '\\'])
                .filter(|s| !s.is_empty())
                .map(str::to_lowercase)
                .collect::<Vec<_>>()
        })
        .collect()
}

/// True when `path` is `prefix` or lies below it, compared segment by segment
pub(crate) fn is_within(path: &str, prefix: &str) -> bool {
    let path = segments(path);
    let prefix = segments(prefix);
    path.len() >= prefix.len() && path.iter().zip(prefix.iter()).all(|(a, b)| a == b)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_ROLES: Option<&[&str]> = None;

    fn user(roles: &[&str]) -> SessionUser {
        SessionUser {
            user_id: 1,
            login: "user".to_string(),
            display_name: None,
            role_names: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn test_unauthenticated_admin_path_goes_to_admin_login() {
        let outcome = evaluate(None, NO_ROLES, "/admin/users", &Destinations::default());
        assert_eq!(
            outcome,
            GuardOutcome::Unauthenticated {
                login: "/admin/login".to_string(),
                from: "/admin/users".to_string(),
            }
        );
        assert_eq!(
            outcome.redirect_target().as_deref(),
            Some("/admin/login?from=%2Fadmin%2Fusers")
        );
    }

    #[test]
    fn test_unauthenticated_other_path_goes_to_general_login() {
        let outcome = evaluate(
            None,
            Some(&["ManageUser"][..]),
            "/reader/borrows?page=2",
            &Destinations::default(),
        );
        assert_eq!(
            outcome,
            GuardOutcome::Unauthenticated {
                login: "/login".to_string(),
                from: "/reader/borrows?page=2".to_string(),
            }
        );
    }

    #[test]
    fn test_admin_prefix_is_segment_based() {
        let dest = Destinations::default();
        let login_of = |path: &str| match evaluate(None, NO_ROLES, path, &dest) {
            GuardOutcome::Unauthenticated { login, .. } => login,
            other => panic!("unexpected outcome {:?}", other),
        };
        assert_eq!(login_of("/admin"), "/admin/login");
        assert_eq!(login_of("/admin/"), "/admin/login");
        assert_eq!(login_of("/administer"), "/login");
        assert_eq!(login_of("/reader/admin"), "/login");
    }

    #[test]
    fn test_authenticated_without_restriction_renders() {
        let u = user(&[]);
        let dest = Destinations::default();
        assert_eq!(evaluate(Some(&u), NO_ROLES, "/reader", &dest), GuardOutcome::AuthorizedView);
        let empty: &[&str] = &[];
        assert_eq!(evaluate(Some(&u), Some(empty), "/admin", &dest), GuardOutcome::AuthorizedView);
    }

    #[test]
    fn test_role_intersection_renders() {
        let u = user(&["ManageUser"]);
        let outcome = evaluate(
            Some(&u),
            Some(&["ManageUser", "ManageBook"][..]),
            "/admin/users",
            &Destinations::default(),
        );
        assert_eq!(outcome, GuardOutcome::AuthorizedView);
        assert_eq!(outcome.redirect_target(), None);
    }

    #[test]
    fn test_no_intersection_is_denied() {
        let u = user(&["Reader"]);
        let outcome = evaluate(
            Some(&u),
            Some(&["ManageUser"][..]),
            "/admin/users",
            &Destinations::default(),
        );
        assert_eq!(
            outcome,
            GuardOutcome::Denied {
                to: "/access-denied".to_string()
            }
        );
        assert_eq!(outcome.redirect_target().as_deref(), Some("/access-denied"));
    }

    #[test]
    fn test_is_within() {
        assert!(is_within("/admin/users/42", "/admin/users"));
        assert!(is_within("//admin///users", "/admin/users"));
        assert!(is_within("/%61dmin", "/admin"));
        assert!(!is_within("/admin", "/admin/users"));
        assert!(is_within("/anything", "/"));
    }

    #[test]
    fn test_case_and_encoded_separators_stay_within_prefix() {
        assert!(is_within("/ADMIN/users", "/admin/users"));
        assert!(is_within("/Admin/Settings", "/admin/settings"));
        assert!(is_within("/admin%2Fusers", "/admin/users"));
        assert!(is_within("/admin%5cusers", "/admin/users"));
        assert_eq!(segments("/%41dmin%2F%2Fusers/"), vec!["admin", "users"]);

        let outcome = evaluate(None, NO_ROLES, "/ADMIN/users", &Destinations::default());
        assert_eq!(
            outcome.redirect_target().as_deref(),
            Some("/admin/login?from=%2FADMIN%2Fusers")
        );
    }
}
