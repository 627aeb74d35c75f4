//! Testing utilities for the credential ledger.
//!
//! Fixtures for integration tests and proptest generators for property
//! tests. Not intended for production use.

pub mod fixtures;
pub mod generators;

pub use fixtures::{
    make_self_addressed, make_signed_certificate, TestFixture, FIXED_ISSUE_DATE, SAMPLE_DOCUMENTS,
};
