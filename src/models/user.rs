use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::loyalty::LoyaltyStatus;

pub const CUSTOMER_DISPLAY_NAME: &str = "Cliente VIP";

/// Customer reconstructed at login; it is never stored on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub is_club_member: bool,
    pub trip_count: u64,
}

impl User {
    pub fn club_member(email: &str, trip_count: u64) -> Self {
        let email = email.trim();
        Self {
            id: customer_id(email),
            name: CUSTOMER_DISPLAY_NAME.into(),
            email: email.to_string(),
            is_club_member: true,
            trip_count,
        }
    }

    pub fn loyalty(&self) -> LoyaltyStatus {
        LoyaltyStatus::from_trip_count(i64::try_from(self.trip_count).unwrap_or(i64::MAX))
    }
}

/// Stable id derived from the normalized login identifier.
pub fn customer_id(identifier: &str) -> String {
    let digest = Sha256::digest(identifier.trim().to_lowercase().as_bytes());
    digest
        .iter()
        .take(8)
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_id_ignores_case_and_whitespace() {
        assert_eq!(customer_id("Ana@Example.com "), customer_id("ana@example.com"));
        assert_ne!(customer_id("ana@example.com"), customer_id("bia@example.com"));
        assert_eq!(customer_id("ana@example.com").len(), 16);
    }

    #[test]
    fn club_member_carries_trip_count_into_loyalty() {
        let user = User::club_member("ana@example.com", 21);
        assert!(user.is_club_member);
        assert_eq!(user.name, CUSTOMER_DISPLAY_NAME);
        assert_eq!(user.loyalty().current_discount, 1);
    }
}
