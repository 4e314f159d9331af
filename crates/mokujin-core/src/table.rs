//! Weighted outcome tables.
//!
//! A table is an ordered list of tiers. Order is part of the contract: the
//! cumulative walk in [`OutcomeTable::select`] always favors earlier tiers
//! when a roll lands on a boundary.

use serde::{Deserialize, Serialize};

use crate::error::{FairError, FairResult, TableError};

/// A named tier with a selection weight and its candidate entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeTier {
    /// Tier name, expected to be unique within a table.
    pub name: String,
    /// Selection weight relative to the table's total weight.
    pub weight: u32,
    /// Candidate entries, picked uniformly once the tier is chosen.
    #[serde(default, alias = "items")]
    pub entries: Vec<String>,
}

impl OutcomeTier {
    /// Create a tier from a name, weight and entries.
    pub fn new<I, S>(name: impl Into<String>, weight: u32, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            weight,
            entries: entries.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether this tier has no entries to pick from.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Display for OutcomeTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (weight {}, {} entries)",
            self.name,
            self.weight,
            self.entries.len()
        )
    }
}

/// An ordered sequence of weighted tiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeTable {
    /// Tiers in selection order.
    pub tiers: Vec<OutcomeTier>,
}

/// Accepted on-disk shapes for a table definition.
#[derive(Deserialize)]
#[serde(untagged)]
enum TableDef {
    Wrapped { tiers: Vec<OutcomeTier> },
    Bare(Vec<OutcomeTier>),
}

impl OutcomeTable {
    /// Create a table from tiers in selection order.
    pub fn new(tiers: Vec<OutcomeTier>) -> Self {
        Self { tiers }
    }

    /// Append a tier.
    pub fn with_tier<I, S>(mut self, name: impl Into<String>, weight: u32, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tiers.push(OutcomeTier::new(name, weight, entries));
        self
    }

    /// Number of tiers.
    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    /// Whether the table has no tiers.
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Sum of all tier weights.
    pub fn total_weight(&self) -> u64 {
        self.tiers.iter().map(|t| u64::from(t.weight)).sum()
    }

    /// Check that the table can be rolled against and return its total weight.
    ///
    /// Duplicate names and tiers without entries are accepted.
    pub fn validate(&self) -> FairResult<u64> {
        if self.tiers.is_empty() {
            return Err(TableError::Empty.into());
        }
        let total = self.total_weight();
        if total == 0 {
            return Err(TableError::NonPositiveWeight { total }.into());
        }
        Ok(total)
    }

    /// Select the first tier whose running weight total exceeds `roll`.
    ///
    /// Returns `None` when `roll` is not below the total weight.
    pub fn select(&self, roll: u64) -> Option<&OutcomeTier> {
        let mut cumulative = 0u64;
        self.tiers.iter().find(|tier| {
            cumulative += u64::from(tier.weight);
            roll < cumulative
        })
    }

    /// Look up the first tier with the given name.
    pub fn tier(&self, name: &str) -> Option<&OutcomeTier> {
        self.tiers.iter().find(|t| t.name == name)
    }

    /// Parse a table from JSON: either a bare array of tiers or an object
    /// with a `tiers` array.
    pub fn from_json(json: &str) -> FairResult<Self> {
        let def: TableDef =
            serde_json::from_str(json).map_err(|e| FairError::TableFormat(e.to_string()))?;
        let tiers = match def {
            TableDef::Wrapped { tiers } | TableDef::Bare(tiers) => tiers,
        };
        Ok(Self { tiers })
    }

    /// Serialize the table as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> FairResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for OutcomeTable {
    /// The eight-tier reference table, from Common down to Ancient.
    fn default() -> Self {
        Self::new(Vec::new())
            .with_tier(
                "Common",
                8,
                [
                    "common_sword",
                    "common_shield",
                    "common_helm",
                    "common_boots",
                    "common_gloves",
                    "common_cloak",
                ],
            )
            .with_tier(
                "Uncommon",
                7,
                [
                    "uncommon_ring",
                    "uncommon_dagger",
                    "uncommon_amulet",
                    "uncommon_robe",
                    "uncommon_necklace",
                ],
            )
            .with_tier("Rare", 6, ["rare_staff", "rare_bow"])
            .with_tier("Mythical", 5, ["mythical_blade"])
            .with_tier("Legendary", 4, ["legendary_dragon_slayer"])
            .with_tier("Immortal", 3, ["immortal_scepter"])
            .with_tier("Arcana", 2, ["arcana_void_wings"])
            .with_tier("Ancient", 1, ["ancient_eternal_flame"])
    }
}
