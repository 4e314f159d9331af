//! HMAC message construction.
//!
//! The `<client_seed>:<nonce>:<category>` format is a wire contract shared by
//! the roll engine and every external verifier.

use serde::{Deserialize, Serialize};

/// Which independent draw a message feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RollCategory {
    /// Tier selection.
    Rarity,
    /// Entry selection within the chosen tier.
    Item,
}

impl RollCategory {
    /// The category's wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rarity => "rarity",
            Self::Item => "item",
        }
    }
}

impl std::fmt::Display for RollCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build the HMAC message `"{client_seed}:{nonce}:{category}"`.
pub fn build_message(client_seed: &str, nonce: u64, category: impl std::fmt::Display) -> String {
    format!("{client_seed}:{nonce}:{category}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_format() {
        assert_eq!(
            build_message("publicclientseed456", 1, RollCategory::Rarity),
            "publicclientseed456:1:rarity"
        );
        assert_eq!(build_message("user123", 0, RollCategory::Item), "user123:0:item");
    }

    #[test]
    fn nonce_is_plain_decimal() {
        assert_eq!(
            build_message("c", u64::MAX, RollCategory::Item),
            "c:18446744073709551615:item"
        );
        assert_eq!(build_message("c", 7, "bonus"), "c:7:bonus");
    }

    #[test]
    fn colons_in_client_seed_are_kept() {
        assert_eq!(build_message("a:b", 3, RollCategory::Rarity), "a:b:3:rarity");
    }

    #[test]
    fn category_names() {
        assert_eq!(RollCategory::Rarity.to_string(), "rarity");
        assert_eq!(RollCategory::Item.as_str(), "item");
    }
}
