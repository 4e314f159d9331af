//! Sequential rolling against one table.
//!
//! `RollSession` owns the moving parts a caller otherwise tracks by hand:
//! the current server seed, the next nonce and a log of every result.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::{RollConfig, SeedPolicy};
use crate::engine::{RollResult, roll};
use crate::error::{FairError, FairResult};
use crate::hash::advance_seed;
use crate::table::OutcomeTable;

/// An in-memory, chronological record of roll results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RollLog {
    entries: Vec<RollResult>,
}

impl RollLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a result.
    pub fn append(&mut self, result: RollResult) {
        self.entries.push(result);
    }

    /// All results, oldest first.
    pub fn entries(&self) -> &[RollResult] {
        &self.entries
    }

    /// Number of results.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// How many times each tier was rolled.
    pub fn tier_counts(&self) -> HashMap<&str, usize> {
        let mut counts = HashMap::new();
        for entry in &self.entries {
            *counts.entry(entry.tier_name.as_str()).or_default() += 1;
        }
        counts
    }

    /// Export the log as pretty-printed JSON.
    pub fn export_json(&self) -> FairResult<String> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }
}

/// Rolls against a fixed table with a moving seed and nonce.
#[derive(Debug, Clone)]
pub struct RollSession {
    table: OutcomeTable,
    config: RollConfig,
    server_seed: String,
    nonce: Option<u64>,
    log: RollLog,
}

impl RollSession {
    /// Start a session. The table is validated up front.
    pub fn new(
        server_seed: impl Into<String>,
        table: OutcomeTable,
        config: RollConfig,
    ) -> FairResult<Self> {
        table.validate()?;
        Ok(Self {
            nonce: Some(config.start_nonce),
            server_seed: server_seed.into(),
            table,
            config,
            log: RollLog::new(),
        })
    }

    /// Roll once with the current seed and nonce.
    ///
    /// The nonce always moves forward. The seed moves forward only under
    /// [`SeedPolicy::AdvanceEachRoll`]. Once `u64::MAX` has been rolled the
    /// session has no unused nonce left and every further call fails with
    /// [`FairError::NonceExhausted`].
    pub fn roll_next(&mut self) -> FairResult<&RollResult> {
        let nonce = self.nonce.ok_or(FairError::NonceExhausted)?;
        let advance = self.config.seed_policy == SeedPolicy::AdvanceEachRoll;
        let result = roll(
            &self.server_seed,
            &self.config.client_seed,
            nonce,
            &self.table,
            advance,
        )?;
        self.server_seed.clone_from(&result.next_server_seed);
        self.nonce = nonce.checked_add(1);
        if self.nonce.is_none() {
            tracing::warn!(nonce, "nonce space exhausted for this session");
        }
        self.log.append(result);
        Ok(&self.log.entries[self.log.len() - 1])
    }

    /// Ratchet the seed to start a new epoch and return the retired seed,
    /// which can now be revealed for verification.
    pub fn advance_epoch(&mut self) -> String {
        let next = advance_seed(&self.server_seed);
        tracing::info!(nonce = ?self.nonce, "server seed epoch advanced");
        std::mem::replace(&mut self.server_seed, next)
    }

    /// The seed the next roll will use.
    pub fn server_seed(&self) -> &str {
        &self.server_seed
    }

    /// The nonce the next roll will use, or `None` once every nonce has
    /// been used.
    pub fn nonce(&self) -> Option<u64> {
        self.nonce
    }

    /// The table being rolled against.
    pub fn table(&self) -> &OutcomeTable {
        &self.table
    }

    /// Results rolled so far.
    pub fn log(&self) -> &RollLog {
        &self.log
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TableError;
    use crate::verify::{audit_roll, verify_seed_chain};

    fn session(policy: SeedPolicy) -> RollSession {
        let config = RollConfig::default()
            .with_client_seed("user123")
            .with_seed_policy(policy);
        RollSession::new("server", OutcomeTable::default(), config).unwrap()
    }

    #[test]
    fn rejects_invalid_table() {
        let err = RollSession::new(
            "server",
            OutcomeTable::new(Vec::new()),
            RollConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, FairError::InvalidTable(TableError::Empty)));
    }

    #[test]
    fn advance_each_roll_chains_seeds() {
        let mut s = session(SeedPolicy::AdvanceEachRoll);
        let mut rendered = Vec::new();
        for _ in 0..3 {
            rendered.push(s.roll_next().unwrap().to_string());
        }
        assert_eq!(
            rendered,
            vec![
                "Arcana -> arcana_void_wings",
                "Rare -> rare_bow",
                "Legendary -> legendary_dragon_slayer",
            ]
        );
        assert_eq!(s.nonce(), Some(3));
        assert_eq!(
            s.server_seed(),
            "7a8b7c02ef8051558870fc170f45e113bb354e1e313d39e8642a3a3d96f7d504"
        );

        let entries = s.log().entries();
        for pair in entries.windows(2) {
            assert!(verify_seed_chain(
                &pair[0].debug.server_seed_used,
                &pair[1].debug.server_seed_used
            ));
        }
    }

    #[test]
    fn fixed_epoch_keeps_seed_until_advanced() {
        let mut s = session(SeedPolicy::FixedEpoch);
        s.roll_next().unwrap();
        s.roll_next().unwrap();
        assert_eq!(s.server_seed(), "server");
        assert_eq!(s.nonce(), Some(2));

        let retired = s.advance_epoch();
        assert_eq!(retired, "server");
        assert!(verify_seed_chain("server", s.server_seed()));
        // Nonces keep counting across epochs.
        let next = s.roll_next().unwrap();
        assert_eq!(next.debug.nonce, 2);
        assert_eq!(next.debug.server_seed_used, advance_seed("server"));
    }

    #[test]
    fn start_nonce_is_honored() {
        let config = RollConfig::default().with_start_nonce(41);
        let mut s = RollSession::new("seed", OutcomeTable::default(), config).unwrap();
        assert_eq!(s.roll_next().unwrap().debug.nonce, 41);
        assert_eq!(s.nonce(), Some(42));
    }

    #[test]
    fn last_nonce_is_rolled_then_session_stops() {
        let config = RollConfig::default().with_start_nonce(u64::MAX);
        let mut s = RollSession::new("seed", OutcomeTable::default(), config).unwrap();

        let last = s.roll_next().unwrap();
        assert_eq!(last.debug.nonce, u64::MAX);
        assert_eq!(last.debug.rarity_message, "client:18446744073709551615:rarity");
        assert_eq!(s.nonce(), None);
        assert_eq!(s.log().len(), 1);

        // No wrap back to nonce 0 under the same seed.
        let seed_before = s.server_seed().to_string();
        let err = s.roll_next().unwrap_err();
        assert!(matches!(err, FairError::NonceExhausted));
        assert_eq!(s.log().len(), 1);
        assert_eq!(s.server_seed(), seed_before);

        // Moving to a new epoch does not hand out reused nonces either.
        s.advance_epoch();
        assert!(matches!(s.roll_next(), Err(FairError::NonceExhausted)));
    }

    #[test]
    fn logged_rolls_pass_audit() {
        let mut s = session(SeedPolicy::AdvanceEachRoll);
        for _ in 0..5 {
            s.roll_next().unwrap();
        }
        for entry in s.log().entries() {
            let report = audit_roll(&entry.debug.server_seed_used, entry, s.table());
            assert!(report.is_valid());
        }
    }

    #[test]
    fn log_counts_and_export() {
        let mut s = session(SeedPolicy::FixedEpoch);
        for _ in 0..10 {
            s.roll_next().unwrap();
        }
        let log = s.log();
        assert_eq!(log.len(), 10);
        assert_eq!(log.tier_counts().values().sum::<usize>(), 10);

        let json = log.export_json().unwrap();
        let parsed: Vec<RollResult> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.as_slice(), log.entries());
    }

    #[test]
    fn empty_log() {
        let log = RollLog::new();
        assert!(log.is_empty());
        assert!(log.tier_counts().is_empty());
        assert_eq!(log.export_json().unwrap(), "[]");
    }
}
