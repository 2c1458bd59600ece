use crate::BlockNumber;
use crate::error::LedgerError;
use async_trait::async_trait;
use pairstats_domain::address::Address;
use pairstats_domain::reserves::RawReserves;
use std::collections::HashMap;

/// Reads the raw reserve integers of a pair contract.
#[async_trait]
pub trait ReserveSource: Send + Sync {
    /// Returns the reserves of `pair`, at block `at` or at the latest block.
    ///
    /// # Errors
    /// Returns [`LedgerError`] if the ledger cannot be read.
    async fn get_reserves(
        &self,
        pair: &Address,
        at: Option<BlockNumber>,
    ) -> Result<RawReserves, LedgerError>;
}

/// A source serving fixed reserves, regardless of the block asked for.
///
/// Backs offline valuation from reserves obtained elsewhere.
#[derive(Debug, Clone, Default)]
pub struct FixedReserves {
    reserves: HashMap<Address, RawReserves>,
}

impl FixedReserves {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_pair(mut self, pair: Address, reserves: RawReserves) -> Self {
        self.reserves.insert(pair, reserves);
        self
    }
}

#[async_trait]
impl ReserveSource for FixedReserves {
    async fn get_reserves(
        &self,
        pair: &Address,
        _at: Option<BlockNumber>,
    ) -> Result<RawReserves, LedgerError> {
        self.reserves
            .get(pair)
            .copied()
            .ok_or_else(|| LedgerError::Contract(format!("no reserves known for {pair}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_reserves() {
        let pair = Address::from_bytes([7; 20]);
        let source = FixedReserves::new().with_pair(pair, RawReserves::new(10u64, 20u64));

        let raw = source.get_reserves(&pair, Some(100)).await.unwrap();
        assert_eq!(raw, RawReserves::new(10u64, 20u64));

        let missing = source.get_reserves(&Address::ZERO, None).await;
        assert!(matches!(missing, Err(LedgerError::Contract(_))));
    }
}
