//! Error types for the ledger API.

use credledger_core::ValidationError;
use thiserror::Error;

/// Errors found by a chain audit walk ([`crate::Ledger::verify_chain`]).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("chain is empty")]
    Empty,

    #[error("genesis block malformed")]
    BadGenesis,

    #[error("index discontinuity at position {at}: expected {expected}, got {got}")]
    IndexMismatch { at: usize, expected: u64, got: u64 },

    #[error("hash-chain break at position {at}")]
    LinkBroken { at: usize },
}

/// Errors that can occur during issuance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IssueError {
    /// Input rejected before anything was hashed or signed.
    #[error("malformed input: {0}")]
    Malformed(#[from] ValidationError),

    /// The underlying crypto provider could not produce a keypair.
    #[error("key generation failed: {0}")]
    KeyGeneration(String),
}
