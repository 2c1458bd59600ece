//! Persistence bridge between native entities and stored documents.
//!
//! [`Project::project`] runs immediately before a record is handed to the
//! store and [`Hydrate::hydrate`] immediately after one is read back. The two
//! are exact inverses for every decimal and address field.
//!
//! Hydration never fails. A field that cannot be decoded is replaced by zero
//! (or the zero address), reported as a [`FieldIssue`] and logged, and the
//! record's status becomes [`RecordStatus::Degraded`]. Hydration never looks up
//! other entities: a pair comes back as an [`UnresolvedPair`].

use crate::documents::{
    PairBucketDocument, PairDocument, PairLiquidityDocument, TokenBucketDocument, TokenDocument,
    TokenLiquidityDocument, TotalBucketDocument,
};
use bigdecimal::BigDecimal;
use pairstats_domain::address::{Address, AddressError};
use pairstats_domain::codec::{self, CodecError};
use pairstats_domain::entities::{
    BucketError, Pair, PairBucket, PairLiquidity, RecordStatus, Token, TokenBucket,
    TokenLiquidity, TotalBucket, UnresolvedPair,
};
use thiserror::Error;
use tracing::warn;

/// A field that could not be restored faithfully.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldIssue {
    /// A decimal field held undecodable text and was replaced by zero.
    #[error("field {field}: {source}")]
    Decimal {
        field: &'static str,
        source: CodecError,
    },
    /// An address field held undecodable text and was replaced by the zero address.
    #[error("field {field}: {source}")]
    Address {
        field: &'static str,
        source: AddressError,
    },
    /// A derived field disagrees with the fields it is derived from.
    #[error("field {field}: {source}")]
    Inconsistent {
        field: &'static str,
        source: BucketError,
    },
}

impl FieldIssue {
    /// Stored name of the affected field.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::Decimal { field, .. }
            | Self::Address { field, .. }
            | Self::Inconsistent { field, .. } => field,
        }
    }
}

/// A hydrated record together with the fields that had to be substituted.
#[derive(Debug, Clone, PartialEq)]
pub struct Hydrated<T> {
    pub record: T,
    pub issues: Vec<FieldIssue>,
}

impl<T> Hydrated<T> {
    /// Returns true if any field was substituted or inconsistent.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Stored names of the affected fields.
    #[must_use]
    pub fn fields(&self) -> Vec<&'static str> {
        self.issues.iter().map(FieldIssue::field).collect()
    }

    #[must_use]
    pub fn into_inner(self) -> T {
        self.record
    }

    /// Maps the record, keeping the issues.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Hydrated<U> {
        Hydrated {
            record: f(self.record),
            issues: self.issues,
        }
    }
}

/// Produces the stored document of a native entity.
pub trait Project {
    type Document;

    /// Fills every encoded field from its native counterpart.
    fn project(&self) -> Self::Document;
}

/// Restores the native entity from a stored document.
pub trait Hydrate {
    type Record;

    /// Fills every native field from its encoded counterpart.
    fn hydrate(self) -> Hydrated<Self::Record>;
}

/// Collects issues while decoding the fields of one document.
#[derive(Debug, Default)]
struct FieldReader {
    issues: Vec<FieldIssue>,
}

impl FieldReader {
    fn decimal(&mut self, field: &'static str, text: &str) -> BigDecimal {
        let decoded = codec::decode_or_zero(text);
        if let Some(source) = decoded.error {
            warn!(field, error = %source, "Substituting zero for undecodable decimal");
            self.issues.push(FieldIssue::Decimal { field, source });
        }
        decoded.value
    }

    fn address(&mut self, field: &'static str, text: &str) -> Address {
        match Address::from_hex(text) {
            Ok(address) => address,
            Err(source) => {
                warn!(field, error = %source, "Substituting zero address for undecodable address");
                self.issues.push(FieldIssue::Address { field, source });
                Address::ZERO
            }
        }
    }

    fn volume(&mut self, result: Result<(), BucketError>) {
        if let Err(source) = result {
            warn!(error = %source, "Stored volume disagrees with flows");
            self.issues.push(FieldIssue::Inconsistent {
                field: "volumeUSD",
                source,
            });
        }
    }

    /// Degrades the stored status if any field failed.
    fn status(&self, stored: RecordStatus) -> RecordStatus {
        if self.issues.is_empty() {
            stored
        } else {
            RecordStatus::Degraded
        }
    }

    fn finish<T>(self, record: T) -> Hydrated<T> {
        Hydrated {
            record,
            issues: self.issues,
        }
    }
}

impl Project for Token {
    type Document = TokenDocument;

    fn project(&self) -> TokenDocument {
        TokenDocument {
            address: self.address.to_hex(),
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            decimals: self.decimals(),
            total_supply: codec::encode(&self.total_supply),
            reference_price: codec::encode(&self.reference_price),
        }
    }
}

impl Hydrate for TokenDocument {
    type Record = Token;

    fn hydrate(self) -> Hydrated<Token> {
        let mut reader = FieldReader::default();
        let address = reader.address("address", &self.address);
        let mut token = Token::new(address, self.symbol, self.decimals, self.name)
            .with_total_supply(reader.decimal("totalSupply", &self.total_supply));
        token.reference_price = reader.decimal("CMCPrice", &self.reference_price);
        reader.finish(token)
    }
}

impl Project for Pair {
    type Document = PairDocument;

    fn project(&self) -> PairDocument {
        self.unresolved().project()
    }
}

impl Project for UnresolvedPair {
    type Document = PairDocument;

    fn project(&self) -> PairDocument {
        PairDocument {
            index: self.index,
            address: self.address.to_hex(),
            token0_address: self.token0.to_hex(),
            token1_address: self.token1.to_hex(),
        }
    }
}

impl Hydrate for PairDocument {
    type Record = UnresolvedPair;

    fn hydrate(self) -> Hydrated<UnresolvedPair> {
        let mut reader = FieldReader::default();
        let pair = UnresolvedPair {
            index: self.index,
            address: reader.address("address", &self.address),
            token0: reader.address("token0address", &self.token0_address),
            token1: reader.address("token1address", &self.token1_address),
        };
        reader.finish(pair)
    }
}

impl Project for PairLiquidity {
    type Document = PairLiquidityDocument;

    fn project(&self) -> PairLiquidityDocument {
        PairLiquidityDocument {
            address: self.address.to_hex(),
            time: self.time,
            pair: self.pair.clone(),
            token0: self.token0.to_hex(),
            token1: self.token1.to_hex(),
            total_supply: codec::encode(&self.total_supply),
            reserve0: codec::encode(&self.reserve0),
            reserve1: codec::encode(&self.reserve1),
            price0: codec::encode(&self.price0),
            price1: codec::encode(&self.price1),
            status: self.status,
        }
    }
}

impl Hydrate for PairLiquidityDocument {
    type Record = PairLiquidity;

    fn hydrate(self) -> Hydrated<PairLiquidity> {
        let mut reader = FieldReader::default();
        let mut sample = PairLiquidity {
            address: reader.address("address", &self.address),
            time: self.time,
            pair: self.pair,
            token0: reader.address("token0", &self.token0),
            token1: reader.address("token1", &self.token1),
            total_supply: reader.decimal("totalSupply", &self.total_supply),
            reserve0: reader.decimal("reserve0", &self.reserve0),
            reserve1: reader.decimal("reserve1", &self.reserve1),
            price0: reader.decimal("price0", &self.price0),
            price1: reader.decimal("price1", &self.price1),
            status: self.status,
        };
        sample.status = reader.status(self.status);
        reader.finish(sample)
    }
}

impl Project for TokenLiquidity {
    type Document = TokenLiquidityDocument;

    fn project(&self) -> TokenLiquidityDocument {
        TokenLiquidityDocument {
            address: self.address.to_hex(),
            time: self.time,
            symbol: self.symbol.clone(),
            reserve: codec::encode(&self.reserve),
            price: codec::encode(&self.price),
            status: self.status,
        }
    }
}

impl Hydrate for TokenLiquidityDocument {
    type Record = TokenLiquidity;

    fn hydrate(self) -> Hydrated<TokenLiquidity> {
        let mut reader = FieldReader::default();
        let mut sample = TokenLiquidity {
            address: reader.address("address", &self.address),
            time: self.time,
            symbol: self.symbol,
            reserve: reader.decimal("reserve", &self.reserve),
            price: reader.decimal("price", &self.price),
            status: self.status,
        };
        sample.status = reader.status(self.status);
        reader.finish(sample)
    }
}

impl Project for PairBucket {
    type Document = PairBucketDocument;

    fn project(&self) -> PairBucketDocument {
        PairBucketDocument {
            address: self.address.to_hex(),
            time: self.time,
            pair: self.pair.clone(),
            amount0_in: codec::encode(&self.amount0_in),
            amount1_in: codec::encode(&self.amount1_in),
            amount0_out: codec::encode(&self.amount0_out),
            amount1_out: codec::encode(&self.amount1_out),
            price0_usd: codec::encode(&self.price0_usd),
            price1_usd: codec::encode(&self.price1_usd),
            volume_usd: codec::encode(&self.volume_usd),
            status: self.status,
        }
    }
}

impl Hydrate for PairBucketDocument {
    type Record = PairBucket;

    fn hydrate(self) -> Hydrated<PairBucket> {
        let mut reader = FieldReader::default();
        let mut bucket = PairBucket {
            address: reader.address("address", &self.address),
            time: self.time,
            pair: self.pair,
            amount0_in: reader.decimal("amount0In", &self.amount0_in),
            amount1_in: reader.decimal("amount1In", &self.amount1_in),
            amount0_out: reader.decimal("amount0Out", &self.amount0_out),
            amount1_out: reader.decimal("amount1Out", &self.amount1_out),
            price0_usd: reader.decimal("price0USD", &self.price0_usd),
            price1_usd: reader.decimal("price1USD", &self.price1_usd),
            volume_usd: reader.decimal("volumeUSD", &self.volume_usd),
            status: self.status,
        };
        reader.volume(bucket.validate());
        bucket.status = reader.status(self.status);
        reader.finish(bucket)
    }
}

impl Project for TokenBucket {
    type Document = TokenBucketDocument;

    fn project(&self) -> TokenBucketDocument {
        TokenBucketDocument {
            address: self.address.to_hex(),
            time: self.time,
            symbol: self.symbol.clone(),
            amount_in: codec::encode(&self.amount_in),
            amount_out: codec::encode(&self.amount_out),
            price_usd: codec::encode(&self.price_usd),
            volume_usd: codec::encode(&self.volume_usd),
            status: self.status,
        }
    }
}

impl Hydrate for TokenBucketDocument {
    type Record = TokenBucket;

    fn hydrate(self) -> Hydrated<TokenBucket> {
        let mut reader = FieldReader::default();
        let mut bucket = TokenBucket {
            address: reader.address("address", &self.address),
            time: self.time,
            symbol: self.symbol,
            amount_in: reader.decimal("amountIn", &self.amount_in),
            amount_out: reader.decimal("amountOut", &self.amount_out),
            price_usd: reader.decimal("priceUSD", &self.price_usd),
            volume_usd: reader.decimal("volumeUSD", &self.volume_usd),
            status: self.status,
        };
        reader.volume(bucket.validate());
        bucket.status = reader.status(self.status);
        reader.finish(bucket)
    }
}

impl Project for TotalBucket {
    type Document = TotalBucketDocument;

    fn project(&self) -> TotalBucketDocument {
        TotalBucketDocument {
            time: self.time,
            volume_usd: codec::encode(&self.volume_usd),
            liquidity_usd: codec::encode(&self.liquidity_usd),
            status: self.status,
        }
    }
}

impl Hydrate for TotalBucketDocument {
    type Record = TotalBucket;

    fn hydrate(self) -> Hydrated<TotalBucket> {
        let mut reader = FieldReader::default();
        let mut bucket = TotalBucket {
            time: self.time,
            volume_usd: reader.decimal("volumeUSD", &self.volume_usd),
            liquidity_usd: reader.decimal("liquidityUSD", &self.liquidity_usd),
            status: self.status,
        };
        bucket.status = reader.status(self.status);
        reader.finish(bucket)
    }
}
