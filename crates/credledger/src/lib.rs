//! # Credledger
//!
//! An append-only, tamper-evident record of certificate issuance events.
//!
//! An issuer signs a certificate; the ledger accepts the entry only if the
//! signature verifies, linking each accepted entry to the previous one via
//! a content hash.
//!
//! ## Key Concepts
//!
//! - **Certificate**: the issuance record. Immutable once built.
//! - **Block**: index + previous block hash + certificate + timestamp,
//!   tagged with the [`Trust`] provenance of its ingestion path.
//! - **Ledger**: the ordered, append-only sequence of blocks, starting at
//!   the genesis block. Never reordered or truncated.
//! - **Issuer**: owns a keypair; builds, signs, and submits certificates.
//!
//! ## Usage
//!
//! ```rust
//! use credledger::{Issuer, Ledger};
//!
//! let ledger = Ledger::new();
//! let university = Issuer::new("UniversityXYZ");
//!
//! let issuance = university
//!     .issue_certificate(&ledger, "student123", "Bachelor of Science", &b"DOC1"[..])
//!     .unwrap();
//!
//! assert!(issuance.outcome.is_accepted());
//! assert_eq!(ledger.len(), 2);
//! ```
//!
//! Every mutating operation returns an explicit [`AppendResult`]; a
//! declined submission is reported to the caller, never only logged.

pub mod error;
pub mod issuer;
pub mod ledger;

// Re-export the core crate for convenience
pub use credledger_core as core;

pub use error::{ChainError, IssueError};
pub use issuer::{Issuance, Issuer};
pub use ledger::{AppendResult, Ledger, RejectReason, Submission};

// Re-export commonly used core types
pub use credledger_core::{
    Block, BlockHash, Certificate, CertificateBuilder, ContentHash, IssuerPublicKey,
    IssuerSignature, Keypair, PrevHash, SignedCertificate, Trust,
};
