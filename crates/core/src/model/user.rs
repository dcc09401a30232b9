use serde::{Deserialize, Serialize};

use crate::auth::Role;
use crate::model::ids::UserId;

/// A platform account as seen by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub is_active: bool,
}

impl User {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Editable fields of an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserUpdate {
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

/// Fields for self-registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_name_tolerates_missing_parts() {
        let user = User {
            id: UserId::new(1),
            first_name: "Ada".into(),
            last_name: String::new(),
            email: "ada@example.com".into(),
            role: Role::User,
            is_active: true,
        };
        assert_eq!(user.full_name(), "Ada");
    }
}
