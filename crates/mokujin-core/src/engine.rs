//! The fair roll engine.
//!
//! A roll makes two independent draws under the same server seed:
//!
//! 1. `HMAC(server_seed, "{client}:{nonce}:rarity")` picks a tier. The first
//!    four digest bytes (big-endian) are reduced modulo the table's total
//!    weight and walked through the cumulative weights in table order.
//! 2. `HMAC(server_seed, "{client}:{nonce}:item")` picks an entry in that
//!    tier by reducing modulo the entry count.
//!
//! The seed is then optionally ratcheted forward with SHA-256.

use serde::{Deserialize, Serialize};

use crate::error::{FairError, FairResult};
use crate::hash::{advance_seed as ratchet, hmac_sha256, leading_u32};
use crate::message::{RollCategory, build_message};
use crate::table::OutcomeTable;

/// Every value needed to recompute and audit a roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollDebug {
    /// The server seed the roll was keyed with.
    pub server_seed_used: String,
    /// The public client seed.
    pub client_seed: String,
    /// The roll's nonce.
    pub nonce: u64,
    /// Message hashed for tier selection.
    pub rarity_message: String,
    /// Lowercase hex HMAC of `rarity_message`.
    pub rarity_digest_hex: String,
    /// First four bytes of the rarity digest, big-endian.
    pub rarity_value: u32,
    /// `rarity_value` reduced modulo `total_weight`.
    pub rarity_roll: u64,
    /// Weight of the selected tier.
    pub selected_tier_weight: u32,
    /// Sum of all tier weights.
    pub total_weight: u64,
    /// Message hashed for entry selection.
    pub item_message: String,
    /// Lowercase hex HMAC of `item_message`.
    pub item_digest_hex: String,
    /// First four bytes of the item digest, big-endian.
    pub item_value: u32,
    /// Index of the selected entry, absent when the tier has no entries.
    pub item_index: Option<usize>,
    /// Number of entries in the selected tier.
    pub entry_count: usize,
}

/// The outcome of a single roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    /// Name of the selected tier.
    pub tier_name: String,
    /// The selected entry, absent when the tier has no entries.
    pub selected_entry: Option<String>,
    /// Full derivation trail.
    pub debug: RollDebug,
    /// The seed to use for the next roll.
    pub next_server_seed: String,
}

impl std::fmt::Display for RollResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.selected_entry {
            Some(entry) => write!(f, "{} -> {entry}", self.tier_name),
            None => write!(f, "{} -> none", self.tier_name),
        }
    }
}

/// The explicit inputs of a roll.
#[derive(Debug, Clone, Copy)]
pub struct RollInput<'a> {
    /// Secret server seed for the current epoch.
    pub server_seed: &'a str,
    /// Public client seed.
    pub client_seed: &'a str,
    /// Per-roll counter, unique within a server seed epoch.
    pub nonce: u64,
    /// Table to roll against.
    pub table: &'a OutcomeTable,
}

impl RollInput<'_> {
    /// Roll with these inputs. See [`roll`].
    pub fn roll(&self, advance_seed: bool) -> FairResult<RollResult> {
        roll(
            self.server_seed,
            self.client_seed,
            self.nonce,
            self.table,
            advance_seed,
        )
    }
}

/// Perform a provably fair roll.
///
/// Identical inputs always produce identical results. When `advance_seed` is
/// set, `next_server_seed` is `sha256_hex(server_seed)`; otherwise it is the
/// server seed unchanged.
///
/// Fails when the table is empty or its weights sum to zero. A tier without
/// entries yields no entry rather than an error.
pub fn roll(
    server_seed: &str,
    client_seed: &str,
    nonce: u64,
    table: &OutcomeTable,
    advance_seed: bool,
) -> FairResult<RollResult> {
    let total_weight = table.validate()?;

    let rarity_message = build_message(client_seed, nonce, RollCategory::Rarity);
    let rarity_digest = hmac_sha256(server_seed, &rarity_message)?;
    let rarity_value = leading_u32(&rarity_digest);
    let rarity_roll = u64::from(rarity_value) % total_weight;

    let Some(tier) = table.select(rarity_roll) else {
        tracing::error!(rarity_roll, total_weight, "weighted walk selected no tier");
        return Err(FairError::SelectionInvariant {
            roll: rarity_roll,
            total_weight,
        });
    };

    let item_message = build_message(client_seed, nonce, RollCategory::Item);
    let item_digest = hmac_sha256(server_seed, &item_message)?;
    let item_value = leading_u32(&item_digest);

    let entry_count = tier.entries.len();
    let item_index =
        (entry_count > 0).then(|| (u64::from(item_value) % entry_count as u64) as usize);
    let selected_entry = item_index.map(|i| tier.entries[i].clone());

    let next_server_seed = if advance_seed {
        ratchet(server_seed)
    } else {
        server_seed.to_string()
    };

    tracing::debug!(
        client_seed,
        nonce,
        tier = %tier.name,
        rarity_roll,
        total_weight,
        item_index = ?item_index,
        advanced = advance_seed,
        "rolled outcome"
    );

    Ok(RollResult {
        tier_name: tier.name.clone(),
        selected_entry,
        debug: RollDebug {
            server_seed_used: server_seed.to_string(),
            client_seed: client_seed.to_string(),
            nonce,
            rarity_message,
            rarity_digest_hex: hex::encode(rarity_digest),
            rarity_value,
            rarity_roll,
            selected_tier_weight: tier.weight,
            total_weight,
            item_message,
            item_digest_hex: hex::encode(item_digest),
            item_value,
            item_index,
            entry_count,
        },
        next_server_seed,
    })
}
