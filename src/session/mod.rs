pub mod gate;

pub use gate::{evaluate, GateDecision};

use serde::{Deserialize, Serialize};

/// Authenticated principal as resolved by the identity edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub role: String,
}

/// Session state supplied by the external identity provider.
///
/// Read-only to this service. While `is_loading` the edge has not finished
/// resolving the session and `user` must not be treated as authoritative.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub user: Option<SessionUser>,
    pub is_loading: bool,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        !self.is_loading && self.user.is_some()
    }
}

/// Roles a protected route group accepts. Empty means any authenticated user.
#[derive(Debug, Clone, Default)]
pub struct RequiredRoles(pub Vec<String>);

impl RequiredRoles {
    pub fn any_authenticated() -> Self {
        Self(Vec::new())
    }

    pub fn of(roles: &[&str]) -> Self {
        Self(roles.iter().map(|r| r.to_string()).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn allows(&self, role: &str) -> bool {
        self.0.iter().any(|r| r == role)
    }
}
