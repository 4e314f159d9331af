//! Configuration for a sequential roll session.

use serde::{Deserialize, Serialize};

/// When a session ratchets its server seed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeedPolicy {
    /// Advance the seed after every roll.
    #[default]
    AdvanceEachRoll,
    /// Keep one seed per epoch; only [`advance_epoch`] moves it forward.
    ///
    /// [`advance_epoch`]: crate::session::RollSession::advance_epoch
    FixedEpoch,
}

/// Configuration for a roll session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollConfig {
    /// Public client seed mixed into every roll.
    pub client_seed: String,
    /// Nonce of the first roll.
    pub start_nonce: u64,
    /// Seed advance policy.
    pub seed_policy: SeedPolicy,
}

impl Default for RollConfig {
    fn default() -> Self {
        Self {
            client_seed: "client".to_string(),
            start_nonce: 0,
            seed_policy: SeedPolicy::default(),
        }
    }
}

impl RollConfig {
    /// Set the client seed.
    pub fn with_client_seed(mut self, client_seed: impl Into<String>) -> Self {
        self.client_seed = client_seed.into();
        self
    }

    /// Set the nonce of the first roll.
    pub fn with_start_nonce(mut self, nonce: u64) -> Self {
        self.start_nonce = nonce;
        self
    }

    /// Set the seed advance policy.
    pub fn with_seed_policy(mut self, policy: SeedPolicy) -> Self {
        self.seed_policy = policy;
        self
    }
}
