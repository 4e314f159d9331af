//! Verification of revealed seeds and recorded rolls.
//!
//! Nothing here returns an error. A mismatch, a malformed digest or an
//! unrollable table is reported as "not verified" so audit tooling keeps
//! working on partially corrupted data.

use serde::Serialize;
use subtle::ConstantTimeEq;

use crate::engine::{RollDebug, RollResult, roll};
use crate::hash::{advance_seed, hmac_sha256_hex};
use crate::table::OutcomeTable;

/// Check a published HMAC digest against a revealed key and message.
///
/// The claim is compared in constant time against the lowercase hex digest.
/// Claims of the wrong length or case never verify.
pub fn verify_hmac(key: &str, message: &str, claimed_digest_hex: &str) -> bool {
    hmac_sha256_hex(key, message)
        .is_ok_and(|expected| constant_time_eq(&expected, claimed_digest_hex))
}

/// Check that `next_seed` is the ratchet successor of `previous_seed`.
pub fn verify_seed_chain(previous_seed: &str, next_seed: &str) -> bool {
    constant_time_eq(&advance_seed(previous_seed), next_seed)
}

fn constant_time_eq(expected: &str, claimed: &str) -> bool {
    expected.as_bytes().ct_eq(claimed.as_bytes()).into()
}

/// Per-check outcome of re-deriving a recorded roll.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    /// The revealed seed is the one the roll claims to have used.
    pub seed_matches: bool,
    /// The recorded rarity digest recomputes.
    pub rarity_digest: bool,
    /// The recorded item digest recomputes.
    pub item_digest: bool,
    /// The recomputed tier matches the recorded tier.
    pub tier: bool,
    /// The recomputed entry matches the recorded entry.
    pub entry: bool,
    /// The recorded messages and derived values match the recomputed ones.
    pub trail: bool,
    /// The recorded next seed is consistent with the revealed seed.
    pub next_seed: bool,
}

impl AuditReport {
    /// Whether every check passed.
    pub fn is_valid(&self) -> bool {
        self.seed_matches
            && self.rarity_digest
            && self.item_digest
            && self.tier
            && self.entry
            && self.trail
            && self.next_seed
    }

    /// Names of the checks that failed.
    pub fn failures(&self) -> Vec<&'static str> {
        [
            ("seed", self.seed_matches),
            ("rarity digest", self.rarity_digest),
            ("item digest", self.item_digest),
            ("tier", self.tier),
            ("entry", self.entry),
            ("trail", self.trail),
            ("next seed", self.next_seed),
        ]
        .into_iter()
        .filter_map(|(name, ok)| (!ok).then_some(name))
        .collect()
    }
}

/// Re-derive a recorded roll from its revealed server seed.
///
/// The client seed and nonce are taken from the roll's debug trail. Both
/// messages must be the ones built from that client seed and nonce, and every
/// derived value in the trail must match the recomputed roll. The next seed
/// passes if it is either the ratchet successor or the unchanged seed,
/// covering both advance modes.
pub fn audit_roll(
    revealed_server_seed: &str,
    recorded: &RollResult,
    table: &OutcomeTable,
) -> AuditReport {
    let trail = &recorded.debug;
    let mut report = AuditReport {
        seed_matches: constant_time_eq(&trail.server_seed_used, revealed_server_seed),
        rarity_digest: verify_hmac(
            revealed_server_seed,
            &trail.rarity_message,
            &trail.rarity_digest_hex,
        ),
        item_digest: verify_hmac(
            revealed_server_seed,
            &trail.item_message,
            &trail.item_digest_hex,
        ),
        next_seed: verify_seed_chain(revealed_server_seed, &recorded.next_server_seed)
            || constant_time_eq(revealed_server_seed, &recorded.next_server_seed),
        ..AuditReport::default()
    };

    match roll(
        revealed_server_seed,
        &trail.client_seed,
        trail.nonce,
        table,
        false,
    ) {
        Ok(recomputed) => {
            report.tier = recomputed.tier_name == recorded.tier_name;
            report.entry = recomputed.selected_entry == recorded.selected_entry;
            report.trail = trail_matches(trail, &recomputed.debug);
        }
        Err(e) => {
            tracing::warn!(error = %e, nonce = trail.nonce, "audit could not recompute roll");
        }
    }

    if !report.is_valid() {
        tracing::warn!(
            nonce = trail.nonce,
            failures = ?report.failures(),
            "roll failed audit"
        );
    }
    report
}

/// Compare a recorded trail with a recomputed one. Seeds and digests have
/// their own checks.
fn trail_matches(recorded: &RollDebug, recomputed: &RollDebug) -> bool {
    recorded.client_seed == recomputed.client_seed
        && recorded.nonce == recomputed.nonce
        && recorded.rarity_message == recomputed.rarity_message
        && recorded.rarity_value == recomputed.rarity_value
        && recorded.rarity_roll == recomputed.rarity_roll
        && recorded.selected_tier_weight == recomputed.selected_tier_weight
        && recorded.total_weight == recomputed.total_weight
        && recorded.item_message == recomputed.item_message
        && recorded.item_value == recomputed.item_value
        && recorded.item_index == recomputed.item_index
        && recorded.entry_count == recomputed.entry_count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{RollCategory, build_message};
    use crate::table::OutcomeTier;

    const SERVER: &str = "mysecretserverseed123";
    const CLIENT: &str = "publicclientseed456";
    const RARITY_HEX: &str = "338d5e6807218e4224ba77e766b9d994b7387d9e73a10641a98a13188366b57c";

    fn table() -> OutcomeTable {
        OutcomeTable::new(vec![
            OutcomeTier::new("Common", 70, ["Item1", "Item2", "Item3"]),
            OutcomeTier::new("Rare", 25, ["RareItem1", "RareItem2"]),
            OutcomeTier::new("Legendary", 5, ["LegendaryItem"]),
        ])
    }

    #[test]
    fn verifies_known_digest() {
        let message = build_message(CLIENT, 1, RollCategory::Rarity);
        assert!(verify_hmac(SERVER, &message, RARITY_HEX));
    }

    #[test]
    fn rejects_wrong_key_or_message() {
        let message = build_message(CLIENT, 1, RollCategory::Rarity);
        assert!(!verify_hmac("other", &message, RARITY_HEX));
        assert!(!verify_hmac(SERVER, "publicclientseed456:2:rarity", RARITY_HEX));
    }

    #[test]
    fn malformed_claims_are_not_verified() {
        let message = build_message(CLIENT, 1, RollCategory::Rarity);
        assert!(!verify_hmac(SERVER, &message, ""));
        assert!(!verify_hmac(SERVER, &message, "zz"));
        assert!(!verify_hmac(SERVER, &message, &RARITY_HEX[..63]));
        assert!(!verify_hmac(SERVER, &message, &format!("{RARITY_HEX}00")));
        assert!(!verify_hmac(SERVER, &message, &RARITY_HEX.to_uppercase()));
    }

    #[test]
    fn seed_chain() {
        let next = advance_seed(SERVER);
        assert!(verify_seed_chain(SERVER, &next));
        assert!(!verify_seed_chain(&next, SERVER));
        assert!(!verify_seed_chain(SERVER, SERVER));
    }

    #[test]
    fn honest_roll_passes_audit() {
        let table = table();
        for advance in [true, false] {
            let recorded = roll(SERVER, CLIENT, 5, &table, advance).unwrap();
            let report = audit_roll(SERVER, &recorded, &table);
            assert!(report.is_valid(), "{report:?}");
            assert!(report.failures().is_empty());
        }
    }

    #[test]
    fn tampered_entry_fails_audit() {
        let table = table();
        let mut recorded = roll(SERVER, CLIENT, 1, &table, true).unwrap();
        recorded.selected_entry = Some("Item3".to_string());
        let report = audit_roll(SERVER, &recorded, &table);
        assert!(!report.is_valid());
        assert_eq!(report.failures(), vec!["entry"]);
    }

    #[test]
    fn foreign_message_with_valid_digest_fails_audit() {
        let table = table();
        let mut recorded = roll(SERVER, CLIENT, 1, &table, true).unwrap();
        // A genuine digest, but for another nonce's message.
        let foreign = build_message(CLIENT, 2, RollCategory::Rarity);
        recorded.debug.rarity_digest_hex = hmac_sha256_hex(SERVER, &foreign).unwrap();
        recorded.debug.rarity_message = foreign;
        let report = audit_roll(SERVER, &recorded, &table);
        assert!(report.rarity_digest);
        assert_eq!(report.failures(), vec!["trail"]);

        let mut recorded = roll(SERVER, CLIENT, 1, &table, true).unwrap();
        let foreign = build_message("someone-else", 1, RollCategory::Item);
        recorded.debug.item_digest_hex = hmac_sha256_hex(SERVER, &foreign).unwrap();
        recorded.debug.item_message = foreign;
        let report = audit_roll(SERVER, &recorded, &table);
        assert!(report.item_digest);
        assert_eq!(report.failures(), vec!["trail"]);
    }

    #[test]
    fn tampered_trail_values_fail_audit() {
        let table = table();
        let honest = roll(SERVER, CLIENT, 1, &table, true).unwrap();
        let tampers: [fn(&mut RollDebug); 8] = [
            |d| d.rarity_value ^= 1,
            |d| d.rarity_roll = 99,
            |d| d.selected_tier_weight = 5,
            |d| d.total_weight = 36,
            |d| d.item_value = d.item_value.wrapping_add(1),
            |d| d.item_index = Some(2),
            |d| d.entry_count = 2,
            |d| d.item_index = None,
        ];
        for tamper in tampers {
            let mut recorded = honest.clone();
            tamper(&mut recorded.debug);
            let report = audit_roll(SERVER, &recorded, &table);
            assert_eq!(report.failures(), vec!["trail"], "{:?}", recorded.debug);
        }
    }

    #[test]
    fn wrong_revealed_seed_fails_everything_seeded() {
        let table = table();
        let recorded = roll(SERVER, CLIENT, 1, &table, true).unwrap();
        let report = audit_roll("not-the-seed", &recorded, &table);
        assert!(!report.seed_matches);
        assert!(!report.rarity_digest);
        assert!(!report.item_digest);
        assert!(!report.next_seed);
    }

    #[test]
    fn unrollable_table_fails_without_error() {
        let recorded = roll(SERVER, CLIENT, 1, &table(), true).unwrap();
        let report = audit_roll(SERVER, &recorded, &OutcomeTable::new(Vec::new()));
        assert!(report.rarity_digest);
        assert!(!report.tier);
        assert!(!report.trail);
        assert!(!report.is_valid());
    }
}
