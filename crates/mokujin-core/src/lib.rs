//! Provably fair weighted outcome rolls.
//!
//! A secret server seed, a public client seed and a nonce are combined with
//! HMAC-SHA256 into two independent draws: one selects a weighted tier from
//! an [`OutcomeTable`], the other selects an entry inside that tier. Every
//! step is recorded in a [`RollDebug`] trail so anyone holding the revealed
//! server seed can recompute and [`verify`] the result. Seeds chain forward
//! through SHA-256, so a later seed never reveals an earlier one.

pub mod config;
pub mod engine;
pub mod error;
pub mod hash;
pub mod message;
pub mod session;
pub mod table;
pub mod verify;

pub use config::{RollConfig, SeedPolicy};
pub use engine::{RollDebug, RollInput, RollResult, roll};
pub use error::{FairError, FairResult, TableError};
pub use hash::{advance_seed, hmac_sha256, hmac_sha256_hex, sha256_hex};
pub use message::{RollCategory, build_message};
pub use session::{RollLog, RollSession};
pub use table::{OutcomeTable, OutcomeTier};
pub use verify::{AuditReport, audit_roll, verify_hmac, verify_seed_chain};
