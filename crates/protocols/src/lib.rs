//! Reading pair reserves from a ledger.
//!
//! The ledger client itself lives outside this workspace; it is consumed
//! through [`ReserveSource`]. [`PairReader`] turns its raw integers into
//! normalized reserves, USD prices and liquidity samples.

/// Ledger read errors.
pub mod error;
/// Pair reading on top of a reserve source.
pub mod reader;
/// The reserve source abstraction.
pub mod source;

pub use error::{LedgerError, ReadError};
pub use reader::PairReader;
pub use source::{FixedReserves, ReserveSource};

/// Height of a ledger block, used for point-in-time reads.
pub type BlockNumber = u64;
