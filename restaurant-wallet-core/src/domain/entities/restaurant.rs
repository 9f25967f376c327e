use serde::{Deserialize, Serialize};

use crate::shared::types::RestaurantId;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    /// Public restaurant code shown to admins.
    pub external_id: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl Restaurant {
    /// Case-insensitive substring match on name or external id.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || self.name.to_lowercase().contains(&term)
            || self.external_id.to_lowercase().contains(&term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_search() {
        let restaurant = Restaurant {
            id: "r1".to_string(),
            name: "Golden Dragon".to_string(),
            external_id: "RST-0042".to_string(),
            email: None,
        };

        assert!(restaurant.matches_search("dragon"));
        assert!(restaurant.matches_search("rst-00"));
        assert!(restaurant.matches_search("  "));
        assert!(!restaurant.matches_search("pizza"));
    }
}
