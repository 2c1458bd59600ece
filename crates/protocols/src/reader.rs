//! Pair reader.
//!
//! Fetches raw reserves through a [`ReserveSource`], normalizes them with the
//! pair's token exponents and derives USD prices. Ledger failures are always
//! returned to the caller; the reader never substitutes reserves of its own.

use crate::BlockNumber;
use crate::error::{LedgerError, ReadError};
use crate::source::ReserveSource;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use pairstats_domain::config::ValuationConfig;
use pairstats_domain::entities::{Pair, PairLiquidity};
use pairstats_domain::reserves::Reserves;
use pairstats_domain::valuation::{self, PairUsdPrices, ValuationError};
use tracing::debug;

/// Reads and values pairs from a reserve source.
pub struct PairReader<S> {
    source: S,
    config: ValuationConfig,
}

impl<S: ReserveSource> PairReader<S> {
    /// Creates a new reader.
    #[must_use]
    pub fn new(source: S, config: ValuationConfig) -> Self {
        Self { source, config }
    }

    #[must_use]
    pub fn config(&self) -> &ValuationConfig {
        &self.config
    }

    /// Fetches and normalizes the reserves of a pair.
    ///
    /// # Errors
    /// Returns the source's [`LedgerError`] unchanged.
    pub async fn fetch_reserves(
        &self,
        pair: &Pair,
        at: Option<BlockNumber>,
    ) -> Result<Reserves, LedgerError> {
        let raw = self.source.get_reserves(&pair.address, at).await?;
        debug!(
            pair = %pair,
            address = %pair.address,
            block = ?at,
            reserve0 = %raw.reserve0,
            reserve1 = %raw.reserve1,
            "Read reserves"
        );
        Ok(pair.normalize(&raw))
    }

    /// Fetches a pair and derives the USD price of both its tokens.
    ///
    /// # Errors
    /// Returns [`ReadError::Ledger`] if the fetch fails, or
    /// [`ReadError::Valuation`] if the pair has no anchor or no liquidity.
    pub async fn prices(
        &self,
        pair: &Pair,
        at: Option<BlockNumber>,
    ) -> Result<PairUsdPrices, ReadError> {
        let reserves = self.fetch_reserves(pair, at).await?;
        Ok(valuation::usd_prices(pair, &reserves, &self.config)?)
    }

    /// USD price of the pair's non-anchor token.
    ///
    /// # Errors
    /// See [`PairReader::prices`].
    pub async fn price_in_usd(
        &self,
        pair: &Pair,
        at: Option<BlockNumber>,
    ) -> Result<BigDecimal, ReadError> {
        let prices = self.prices(pair, at).await?;
        Ok(prices.quoted().clone())
    }

    /// Takes a liquidity sample of a pair at `time`.
    ///
    /// A pair that cannot be priced still yields a sample, with zero prices
    /// and status unpriced.
    ///
    /// # Errors
    /// Returns the source's [`LedgerError`] unchanged.
    pub async fn sample(
        &self,
        pair: &Pair,
        time: DateTime<Utc>,
        total_supply: BigDecimal,
        at: Option<BlockNumber>,
    ) -> Result<PairLiquidity, LedgerError> {
        let (sample, _) = self.sample_with_reason(pair, time, total_supply, at).await?;
        Ok(sample)
    }

    /// Like [`PairReader::sample`], also returning why an unpriced sample
    /// could not be priced. Reads the ledger once.
    ///
    /// # Errors
    /// Returns the source's [`LedgerError`] unchanged.
    pub async fn sample_with_reason(
        &self,
        pair: &Pair,
        time: DateTime<Utc>,
        total_supply: BigDecimal,
        at: Option<BlockNumber>,
    ) -> Result<(PairLiquidity, Option<ValuationError>), LedgerError> {
        let reserves = self.fetch_reserves(pair, at).await?;
        let prices = valuation::usd_prices(pair, &reserves, &self.config);
        let sample = PairLiquidity::new(pair, time, reserves, total_supply);

        match prices {
            Ok(prices) => Ok((sample.with_prices(&prices), None)),
            Err(e) => {
                debug!(pair = %pair, error = %e, "Sampled pair without USD prices");
                Ok((sample, Some(e)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::FixedReserves;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use pairstats_domain::address::Address;
    use pairstats_domain::entities::{RecordStatus, Token};
    use pairstats_domain::reserves::RawReserves;
    use primitive_types::U256;
    use std::str::FromStr;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fails every read and remembers the blocks asked for.
    #[derive(Default)]
    struct DownLedger {
        asked: Mutex<Vec<Option<BlockNumber>>>,
    }

    #[async_trait]
    impl ReserveSource for DownLedger {
        async fn get_reserves(
            &self,
            _pair: &Address,
            at: Option<BlockNumber>,
        ) -> Result<RawReserves, LedgerError> {
            self.asked.lock().unwrap().push(at);
            Err(LedgerError::Transport("timed out".to_string()))
        }
    }

    /// Counts the reads passed on to an inner source.
    struct CountingSource {
        inner: FixedReserves,
        reads: AtomicUsize,
    }

    #[async_trait]
    impl ReserveSource for CountingSource {
        async fn get_reserves(
            &self,
            pair: &Address,
            at: Option<BlockNumber>,
        ) -> Result<RawReserves, LedgerError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.get_reserves(pair, at).await
        }
    }

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 6, 1, 0, 0, 0).unwrap()
    }

    fn go_usdc() -> Pair {
        let go = Token::new(Address::from_bytes([1; 20]), "GO", 18, "GoChain");
        let usdc = Token::new(Address::from_bytes([2; 20]), "USDC", 6, "USD Coin");
        Pair::new(0, Address::from_bytes([9; 20]), go, usdc).unwrap()
    }

    fn go_weth() -> Pair {
        let go = Token::new(Address::from_bytes([1; 20]), "GO", 18, "GoChain");
        let weth = Token::new(Address::from_bytes([3; 20]), "WETH", 18, "Wrapped Ether");
        Pair::new(1, Address::from_bytes([8; 20]), go, weth).unwrap()
    }

    fn reader() -> PairReader<FixedReserves> {
        // 250 GO against 50 USDC.
        let go_raw = U256::from(250u64) * U256::exp10(18);
        let usdc_raw = U256::from(50_000_000u64);
        let source = FixedReserves::new()
            .with_pair(go_usdc().address, RawReserves::new(go_raw, usdc_raw))
            .with_pair(go_weth().address, RawReserves::new(go_raw, go_raw))
            .with_pair(Address::from_bytes([7; 20]), RawReserves::new(0u64, usdc_raw));
        PairReader::new(source, ValuationConfig::default())
    }

    #[tokio::test]
    async fn test_fetch_reserves_normalizes() {
        let reserves = reader().fetch_reserves(&go_usdc(), None).await.unwrap();
        assert_eq!(reserves.reserve0, dec("250"));
        assert_eq!(reserves.reserve1, dec("50"));
    }

    #[tokio::test]
    async fn test_price_in_usd() {
        let price = reader().price_in_usd(&go_usdc(), Some(1_000)).await.unwrap();
        assert_eq!(price, dec("0.2"));
    }

    #[tokio::test]
    async fn test_price_without_anchor() {
        let result = reader().price_in_usd(&go_weth(), None).await;
        assert!(matches!(
            result,
            Err(ReadError::Valuation(ValuationError::NoAnchor { .. }))
        ));
    }

    #[tokio::test]
    async fn test_price_without_liquidity() {
        let go = Token::new(Address::from_bytes([1; 20]), "GO", 18, "GoChain");
        let usdc = Token::new(Address::from_bytes([2; 20]), "USDC", 6, "USD Coin");
        let drained = Pair::new(2, Address::from_bytes([7; 20]), go, usdc).unwrap();

        let result = reader().price_in_usd(&drained, None).await;
        assert_eq!(result, Err(ReadError::Valuation(ValuationError::NoLiquidity)));
    }

    #[tokio::test]
    async fn test_sample_is_priced() {
        let sample = reader()
            .sample(&go_usdc(), time(), dec("10"), None)
            .await
            .unwrap();
        assert_eq!(sample.status, RecordStatus::Valid);
        assert_eq!(sample.pair, "GO-USDC");
        assert_eq!(sample.price0, dec("0.2"));
        assert_eq!(sample.price1, dec("1"));
        assert_eq!(sample.value_usd(), dec("100"));
    }

    #[tokio::test]
    async fn test_unanchored_sample_is_unpriced() {
        let sample = reader()
            .sample(&go_weth(), time(), dec("10"), None)
            .await
            .unwrap();
        assert_eq!(sample.status, RecordStatus::Unpriced);
        assert_eq!(sample.reserve0, dec("250"));
        assert_eq!(sample.price0, BigDecimal::from(0));
    }

    #[tokio::test]
    async fn test_sample_with_reason_reads_once() {
        let go_raw = U256::from(250u64) * U256::exp10(18);
        let inner =
            FixedReserves::new().with_pair(go_weth().address, RawReserves::new(go_raw, go_raw));
        let source = CountingSource {
            inner,
            reads: AtomicUsize::new(0),
        };
        let reader = PairReader::new(source, ValuationConfig::default());

        let (sample, reason) = reader
            .sample_with_reason(&go_weth(), time(), dec("1"), None)
            .await
            .unwrap();
        assert_eq!(sample.status, RecordStatus::Unpriced);
        assert!(matches!(reason, Some(ValuationError::NoAnchor { .. })));
        assert_eq!(reader.source.reads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_priced_sample_has_no_reason() {
        let (sample, reason) = reader()
            .sample_with_reason(&go_usdc(), time(), dec("1"), None)
            .await
            .unwrap();
        assert_eq!(sample.status, RecordStatus::Valid);
        assert_eq!(reason, None);
    }

    #[tokio::test]
    async fn test_ledger_failure_propagates() {
        let reader = PairReader::new(DownLedger::default(), ValuationConfig::default());

        let sample = reader.sample(&go_usdc(), time(), dec("1"), Some(42)).await;
        assert_eq!(sample, Err(LedgerError::Transport("timed out".to_string())));

        let price = reader.price_in_usd(&go_usdc(), None).await;
        assert!(matches!(price, Err(ReadError::Ledger(LedgerError::Transport(_)))));

        assert_eq!(*reader.source.asked.lock().unwrap(), vec![Some(42), None]);
    }
}
