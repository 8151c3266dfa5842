//! Static route table: which portal paths need a session, and which roles

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use utoipa::ToSchema;

use super::{is_within, segments, Destinations};
use crate::{
    error::{AppError, AppResult},
    models::{
        session::{MANAGE_BOOK, MANAGE_BORROW, MANAGE_READER, MANAGE_SYSTEM, MANAGE_USER},
        SessionUser,
    },
};

static PATH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(/|(/[a-z0-9][a-z0-9-]*)+)$").expect("valid route path regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    /// Needs a session; an empty list admits any authenticated user
    Protected { allowed_roles: &'static [&'static str] },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteRule {
    pub path: &'static str,
    pub title: &'static str,
    pub section: &'static str,
    pub access: Access,
}

const fn public(path: &'static str, title: &'static str, section: &'static str) -> RouteRule {
    RouteRule { path, title, section, access: Access::Public }
}

const fn protected(
    path: &'static str,
    title: &'static str,
    section: &'static str,
    allowed_roles: &'static [&'static str],
) -> RouteRule {
    RouteRule { path, title, section, access: Access::Protected { allowed_roles } }
}

/// Portal navigation table
pub static PORTAL_ROUTES: &[RouteRule] = &[
    public("/", "Home", "Home"),
    public("/catalog", "Catalog", "Catalog"),
    public("/login", "Sign in", "Account"),
    public("/admin/login", "Staff sign in", "Account"),
    public("/access-denied", "Access denied", "Account"),
    protected("/reader", "My library", "Reader", &[]),
    protected("/reader/borrows", "My borrows", "Reader", &[]),
    protected("/reader/profile", "My profile", "Reader", &[]),
    protected("/admin", "Dashboard", "Dashboard", &[]),
    protected("/admin/books", "Books", "Catalog", &[MANAGE_BOOK]),
    protected("/admin/books/inward", "Inward receipts", "Catalog", &[MANAGE_BOOK]),
    protected("/admin/books/outward", "Outward receipts", "Catalog", &[MANAGE_BOOK]),
    protected("/admin/borrows", "Borrow desk", "Circulation", &[MANAGE_BORROW]),
    protected("/admin/returns", "Returns", "Circulation", &[MANAGE_BORROW]),
    protected("/admin/readers", "Readers", "Readers", &[MANAGE_READER]),
    protected("/admin/cards", "Library cards", "Readers", &[MANAGE_READER]),
    protected("/admin/users", "Staff accounts", "System", &[MANAGE_USER]),
    protected("/admin/roles", "Roles", "System", &[MANAGE_USER]),
    protected("/admin/settings", "Settings", "System", &[MANAGE_SYSTEM]),
];

/// Menu entry visible to a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct MenuEntry {
    pub path: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct MenuSection {
    pub section: String,
    pub entries: Vec<MenuEntry>,
}

/// Validated route table
#[derive(Debug, Clone)]
pub struct RouteTable {
    rules: Vec<RouteRule>,
}

impl RouteTable {
    /// Build and validate a table against the guard destinations
    pub fn new(rules: &[RouteRule], destinations: &Destinations) -> AppResult<Self> {
        let mut seen = HashSet::new();
        for rule in rules {
            check_path("route", rule.path)?;
            if !seen.insert(rule.path) {
                return Err(AppError::Configuration(format!("Duplicate route {}", rule.path)));
            }
            if let Access::Protected { allowed_roles } = rule.access {
                let mut roles = HashSet::new();
                for role in allowed_roles {
                    if role.is_empty() || role.chars().any(char::is_whitespace) {
                        return Err(AppError::Configuration(format!(
                            "Invalid role name {:?} on {}",
                            role, rule.path
                        )));
                    }
                    if !roles.insert(*role) {
                        return Err(AppError::Configuration(format!(
                            "Role {} listed twice on {}",
                            role, rule.path
                        )));
                    }
                }
            }
        }

        let table = Self { rules: rules.to_vec() };

        check_path("admin prefix", &destinations.admin_prefix)?;
        // anything under the prefix without its own rule falls back to this one
        if table.access_for(&destinations.admin_prefix) == Access::Public {
            return Err(AppError::Configuration(format!(
                "The admin prefix {} must be protected",
                destinations.admin_prefix
            )));
        }
        for (name, dest) in [
            ("login", &destinations.login),
            ("admin login", &destinations.admin_login),
            ("access denied", &destinations.access_denied),
        ] {
            check_path(name, dest)?;
            if table.access_for(dest) != Access::Public {
                return Err(AppError::Configuration(format!(
                    "The {} page {} must be public",
                    name, dest
                )));
            }
        }
        if !is_within(&destinations.admin_login, &destinations.admin_prefix) {
            return Err(AppError::Configuration(format!(
                "Admin login {} lies outside {}",
                destinations.admin_login, destinations.admin_prefix
            )));
        }

        Ok(table)
    }

    /// The portal's own table
    pub fn portal(destinations: &Destinations) -> AppResult<Self> {
        Self::new(PORTAL_ROUTES, destinations)
    }

    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }

    /// Most specific rule covering `path`. The root rule only covers `/`.
    pub fn resolve(&self, path: &str) -> Option<&RouteRule> {
        let depth = segments(path).len();
        self.rules
            .iter()
            .filter(|rule| {
                let rule_depth = segments(rule.path).len();
                if rule_depth == 0 {
                    depth == 0
                } else {
                    is_within(path, rule.path)
                }
            })
            .max_by_key(|rule| segments(rule.path).len())
    }

    /// Access for `path`; paths outside the table are public
    pub fn access_for(&self, path: &str) -> Access {
        self.resolve(path).map(|r| r.access).unwrap_or(Access::Public)
    }

    /// Protected entries the user may open, grouped by section in table order
    pub fn menu_for(&self, user: &SessionUser) -> Vec<MenuSection> {
        let mut sections: IndexMap<&str, Vec<MenuEntry>> = IndexMap::new();
        for rule in &self.rules {
            if let Access::Protected { allowed_roles } = rule.access {
                if allowed_roles.is_empty() || user.has_any_role(allowed_roles) {
                    sections.entry(rule.section).or_default().push(MenuEntry {
                        path: rule.path.to_string(),
                        title: rule.title.to_string(),
                    });
                }
            }
        }

        sections
            .into_iter()
            .map(|(section, entries)| MenuSection {
                section: section.to_string(),
                entries,
            })
            .collect()
    }
}

fn check_path(what: &str, path: &str) -> AppResult<()> {
    if PATH_RE.is_match(path) {
        Ok(())
    } else {
        Err(AppError::Configuration(format!("Invalid {} path {:?}", what, path)))
    }
}
