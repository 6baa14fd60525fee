//! Authentication payloads and token claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims for a back-office session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (admin ID).
    pub sub: Uuid,
    /// Session ID the token was issued for.
    pub sid: Uuid,
    /// Admin role at login time. Informational; the stored role is authoritative.
    pub role: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for an admin session.
    #[must_use]
    pub fn new(admin_id: Uuid, session_id: Uuid, role: &str, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: admin_id,
            sid: session_id,
            role: role.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the admin ID from claims.
    #[must_use]
    pub const fn admin_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the session ID from claims.
    #[must_use]
    pub const fn session_id(&self) -> Uuid {
        self.sid
    }
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Admin username.
    #[serde(default)]
    pub username: String,
    /// Admin password.
    #[serde(default)]
    pub password: String,
}

/// Login response payload.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Authenticated admin.
    pub admin: AdminInfo,
    /// Session token, also set as the session cookie.
    pub access_token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}

/// Admin identity returned in auth responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminInfo {
    /// Admin ID.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// Role (`cashier` or `superadmin`).
    pub role: String,
}
