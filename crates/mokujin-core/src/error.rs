//! Error types for table validation and rolling.

/// Alias for `Result<T, FairError>`.
pub type FairResult<T> = Result<T, FairError>;

/// Errors that can occur while validating a table or computing a roll.
#[derive(Debug, thiserror::Error)]
pub enum FairError {
    /// The outcome table cannot be rolled against.
    #[error("invalid table: {0}")]
    InvalidTable(#[from] TableError),

    /// The weighted walk selected no tier even though the total weight was
    /// positive. This is a logic bug, never an input problem.
    #[error("no tier selected for roll {roll} with total weight {total_weight}")]
    SelectionInvariant {
        /// The reduced roll value.
        roll: u64,
        /// The total weight the roll was reduced by.
        total_weight: u64,
    },

    /// A table definition could not be parsed.
    #[error("invalid table format: {0}")]
    TableFormat(String),

    /// The HMAC key was rejected by the MAC implementation.
    #[error("HMAC key rejected")]
    HmacKey,

    /// Every nonce of the session has been used; rolling again would reuse one.
    #[error("nonce space exhausted")]
    NonceExhausted,

    /// A table or roll log could not be serialized.
    #[error("export failed: {0}")]
    Export(#[from] serde_json::Error),
}

/// Reasons a table is rejected before rolling.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// The table has no tiers.
    #[error("table has no tiers")]
    Empty,

    /// The tier weights do not sum to a positive value.
    #[error("sum of weights must be positive (got {total})")]
    NonPositiveWeight {
        /// The computed total weight.
        total: u64,
    },
}
