//! Session model and token claims

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;

pub const MANAGE_BOOK: &str = "ManageBook";
pub const MANAGE_BORROW: &str = "ManageBorrow";
pub const MANAGE_READER: &str = "ManageReader";
pub const MANAGE_USER: &str = "ManageUser";
pub const MANAGE_SYSTEM: &str = "ManageSystem";

/// Role names that open the administrative area
pub const MANAGEMENT_ROLES: &[&str] = &[
    MANAGE_BOOK,
    MANAGE_BORROW,
    MANAGE_READER,
    MANAGE_USER,
    MANAGE_SYSTEM,
];

/// User attached to a live session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SessionUser {
    pub user_id: i64,
    pub login: String,
    pub display_name: Option<String>,
    /// Role names granted by the backend
    #[schema(value_type = Vec<String>)]
    pub role_names: BTreeSet<String>,
}

impl SessionUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.role_names.contains(role)
    }

    /// True when the user holds at least one of `roles`
    pub fn has_any_role<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        roles.iter().any(|r| self.has_role(r.as_ref()))
    }

    pub fn is_staff(&self) -> bool {
        self.has_any_role(MANAGEMENT_ROLES)
    }
}

/// Server-side session record
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub user: SessionUser,
    /// Token issued by the library backend, forwarded on API calls
    pub backend_token: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Require one of `roles`; an empty list only requires a session
    pub fn require_any_role(&self, roles: &[&str]) -> Result<(), AppError> {
        if roles.is_empty() || self.user.has_any_role(roles) {
            Ok(())
        } else {
            Err(AppError::Authorization(format!(
                "One of the following roles is required: {}",
                roles.join(", ")
            )))
        }
    }
}

/// JWT claims carried by the session cookie or bearer header
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    /// Session id in the store
    pub sid: Uuid,
    pub exp: i64,
    pub iat: i64,
}

impl SessionClaims {
    pub fn for_session(session: &Session) -> Self {
        Self {
            sub: session.user.login.clone(),
            sid: session.id,
            exp: session.expires_at.timestamp(),
            iat: session.created_at.timestamp(),
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}
