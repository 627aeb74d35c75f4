//! # Credledger Core
//!
//! Pure primitives for the credential ledger: certificates, blocks, and
//! canonicalization.
//!
//! This crate contains no I/O, no storage, no networking. It is pure
//! computation over cryptographic data structures.
//!
//! ## Key Types
//!
//! - [`Certificate`] - The issuance record carried through the chain
//! - [`Block`] - Index, previous hash, certificate, timestamp, trust tag
//! - [`BlockHash`] - Content-addressed block identifier
//! - [`ContentHash`] - Blake3 digest used for documents and chaining
//! - [`Trust`] - Provenance of an appended block (verified / unverified)
//!
//! ## Canonicalization
//!
//! Certificates and blocks are encoded using deterministic CBOR. See the
//! [`canonical`] module for the exact field-key contract.

pub mod block;
pub mod canonical;
pub mod certificate;
pub mod crypto;
pub mod error;
pub mod types;
pub mod validation;

pub use block::{Block, PrevHash, Trust};
pub use canonical::{
    canonical_block_bytes, canonical_certificate_bytes, canonical_certificate_record_bytes,
    decode_certificate,
};
pub use certificate::{Certificate, CertificateBuilder, SignedCertificate};
pub use crypto::{ContentHash, IssuerPublicKey, IssuerSignature, Keypair};
pub use error::{CoreError, ValidationError};
pub use types::BlockHash;
pub use validation::{validate_certificate, verify_certificate};
