use crate::address::Address;
use thiserror::Error;

/// Errors raised when building or linking domain entities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Both sides of a pair point at the same token.
    #[error("pair tokens must be distinct, both are {0}")]
    IdenticalTokens(Address),
    /// A pair references a token the lookup does not know.
    #[error("unknown token {0}")]
    UnknownToken(Address),
}
