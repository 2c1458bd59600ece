use pairstats_domain::valuation::ValuationError;
use thiserror::Error;

/// Failures reported by a ledger client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The ledger node could not be reached.
    #[error("ledger transport error: {0}")]
    Transport(String),
    /// The pair contract call failed or returned garbage.
    #[error("pair contract error: {0}")]
    Contract(String),
}

/// Failures of a pair price read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    /// The reserves could not be fetched.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    /// The reserves were fetched but cannot be priced.
    #[error(transparent)]
    Valuation(#[from] ValuationError),
}
