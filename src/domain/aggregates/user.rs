//! User accounts and the principal the order engine sees

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use crate::{Result, StorefrontError};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role { #[default] User, Admin }

/// A stored account.
///
/// Password hashes and federated-login fields belong to the identity provider.
/// They are kept in `credentials` verbatim so rewriting the users document
/// never drops them.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub credentials: Map<String, Value>,
}

/// Account as shown in the admin console, without credentials.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<&User> for UserSummary {
    fn from(u: &User) -> Self {
        Self { id: u.id.clone(), name: u.name.clone(), email: u.email.clone(), role: u.role, created_at: u.created_at }
    }
}

/// An authenticated actor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Principal {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl Principal {
    pub fn is_admin(&self) -> bool { self.role == Role::Admin }

    pub fn require_admin(&self) -> Result<()> {
        if self.is_admin() { Ok(()) } else { Err(StorefrontError::Forbidden("Not authorized as admin")) }
    }
}

impl From<&User> for Principal {
    fn from(u: &User) -> Self {
        Self { id: u.id.clone(), name: u.name.clone(), email: u.email.clone(), role: u.role }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_round_trip() {
        let raw = r#"{"id":"u1","name":"Asha","email":"asha@example.com","password":"$2a$10$hash","role":"admin","createdAt":"2024-03-01T10:00:00.000Z","googleId":"g-42"}"#;
        let user: User = serde_json::from_str(raw).unwrap();
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.credentials.get("password").and_then(Value::as_str), Some("$2a$10$hash"));

        let back = serde_json::to_value(&user).unwrap();
        assert_eq!(back["googleId"], "g-42");
        assert_eq!(back["password"], "$2a$10$hash");
    }

    #[test]
    fn test_require_admin() {
        let mut p = Principal { id: "u1".into(), name: "A".into(), email: "a@x.io".into(), role: Role::User };
        assert!(matches!(p.require_admin(), Err(StorefrontError::Forbidden(_))));
        p.role = Role::Admin;
        assert!(p.require_admin().is_ok());
    }
}
