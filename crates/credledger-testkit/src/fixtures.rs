//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use credledger::{Issuer, Ledger};
use credledger_core::{Certificate, CertificateBuilder, IssuerSignature, Keypair};

/// A fixed issue date so signatures are reproducible across runs.
pub const FIXED_ISSUE_DATE: &str = "2025-05-26T00:00:00Z";

/// Sample document payloads used across tests.
pub const SAMPLE_DOCUMENTS: &[&[u8]] = &[
    b"DOC1",
    b"{\"studentName\":\"Alice\",\"degree\":\"Bachelor of Science\"}",
    b"",
];

/// A test fixture with an issuer and a fresh ledger.
pub struct TestFixture {
    pub issuer: Issuer,
    pub ledger: Ledger,
}

impl TestFixture {
    /// Create a new fixture with a random issuer keypair.
    pub fn new() -> Self {
        Self {
            issuer: Issuer::new("UniversityXYZ"),
            ledger: Ledger::new(),
        }
    }

    /// Create with a deterministic issuer keypair from seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self {
            issuer: Issuer::from_seed("UniversityXYZ", &seed),
            ledger: Ledger::new(),
        }
    }

    /// The issuer's public key.
    pub fn public_key(&self) -> credledger_core::IssuerPublicKey {
        self.issuer.public_key()
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Build and sign a certificate with a pinned issue date, outside any
/// ledger. Useful for feeding the verified path directly.
pub fn make_signed_certificate(
    keypair: &Keypair,
    recipient_id: &str,
    certificate_type: &str,
    document: &[u8],
) -> (Certificate, IssuerSignature) {
    let signed = CertificateBuilder::new("UniversityXYZ", recipient_id, certificate_type)
        .document(document.to_vec())
        .issue_date(FIXED_ISSUE_DATE)
        .sign(keypair)
        .expect("fixture inputs are well-formed");
    (signed.certificate, signed.signature)
}

/// Build a self-addressed certificate for the unsigned ingestion path.
pub fn make_self_addressed(recipient_id: &str, document: &[u8]) -> Certificate {
    Certificate::self_addressed(
        "UniversityXYZ",
        recipient_id,
        "Professional Certificate",
        FIXED_ISSUE_DATE,
        document.to_vec(),
    )
    .expect("fixture inputs are well-formed")
}
