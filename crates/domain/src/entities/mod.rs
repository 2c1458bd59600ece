pub mod bucket;
pub mod liquidity;
pub mod pair;
pub mod token;

// Re-export for easier access
pub use bucket::{BucketError, BucketWindow, PairBucket, PairFlows, TokenBucket, TotalBucket};
pub use liquidity::{PairLiquidity, TokenLiquidity};
pub use pair::{Pair, Side, TokenLookup, UnresolvedPair};
pub use token::Token;

use serde::{Deserialize, Serialize};

/// Quality of a computed record.
///
/// Consumers must not treat anything other than [`RecordStatus::Valid`] as
/// authoritative data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    /// Every field was computed from complete inputs.
    #[default]
    Valid,
    /// USD prices could not be derived; price and value fields are zero.
    Unpriced,
    /// Some field was substituted or is inconsistent with the others.
    Degraded,
}

impl RecordStatus {
    #[must_use]
    pub fn is_valid(self) -> bool {
        self == Self::Valid
    }

    /// Combines two statuses, keeping the worse one.
    #[must_use]
    pub fn worst(self, other: Self) -> Self {
        match (self, other) {
            (Self::Degraded, _) | (_, Self::Degraded) => Self::Degraded,
            (Self::Unpriced, _) | (_, Self::Unpriced) => Self::Unpriced,
            _ => Self::Valid,
        }
    }
}
