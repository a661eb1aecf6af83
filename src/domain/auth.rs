//! Identity of the signed-in user as issued by the auth service.

use serde::{Deserialize, Serialize};

/// JWT claims carried in the identity cookie.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub sub: String,
    pub email: String,
    /// Tenant the user works in.
    pub hub_id: i32,
    pub name: String,
    pub roles: Vec<String>,
    pub exp: usize,
}

impl AuthenticatedUser {
    pub fn has_role(&self, role: &str) -> bool {
        check_role(role, &self.roles)
    }
}

pub fn check_role(role: &str, roles: &[String]) -> bool {
    roles.iter().any(|r| r == role)
}
