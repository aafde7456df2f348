use serde::{Deserialize, Serialize};

use crate::models::user::User;

/// Contents of the encrypted session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Session {
    Customer { user: User },
    Admin { username: String },
}

impl Session {
    pub fn customer(&self) -> Option<&User> {
        match self {
            Session::Customer { user } => Some(user),
            Session::Admin { .. } => None,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Session::Admin { .. })
    }
}
