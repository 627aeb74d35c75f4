//! Issuer: a trusted issuing authority that builds, signs, and submits
//! certificates.
//!
//! The issuer owns its keypair; the private half never leaves this struct.
//! The only coupling to the ledger is the one-way submission call inside
//! [`Issuer::issue_certificate`].

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use tracing::{debug, warn};

use credledger_core::{Certificate, CertificateBuilder, IssuerPublicKey, IssuerSignature, Keypair};

use crate::error::IssueError;
use crate::ledger::{AppendResult, Ledger};

/// What the caller gets back from an issuance.
///
/// The ledger outcome is part of the return value: a rejected block is
/// visible to the caller, not only to the log.
#[derive(Debug, Clone)]
pub struct Issuance {
    /// The certificate that was built and signed.
    pub certificate: Certificate,

    /// Raw signature over the certificate's canonical bytes.
    pub signature: IssuerSignature,

    /// The signature in base64, the transport encoding handed to external
    /// collaborators.
    pub signature_base64: String,

    /// Whether the ledger accepted the block.
    pub outcome: AppendResult,
}

/// A trusted issuing authority. Generates its keypair once at
/// construction; no revocation or rotation is modeled.
pub struct Issuer {
    issuer_id: String,
    keypair: Keypair,
}

impl Issuer {
    /// Create an issuer with a fresh random keypair.
    pub fn new(issuer_id: impl Into<String>) -> Self {
        Self {
            issuer_id: issuer_id.into(),
            keypair: Keypair::generate(),
        }
    }

    /// Create an issuer with a deterministic keypair from a 32-byte seed.
    pub fn from_seed(issuer_id: impl Into<String>, seed: &[u8; 32]) -> Self {
        Self {
            issuer_id: issuer_id.into(),
            keypair: Keypair::from_seed(seed),
        }
    }

    /// Create an issuer from externally supplied seed material.
    ///
    /// This is the one place key generation can fail at construction.
    pub fn from_seed_bytes(issuer_id: impl Into<String>, seed: &[u8]) -> Result<Self, IssueError> {
        let seed: [u8; 32] = seed.try_into().map_err(|_| {
            IssueError::KeyGeneration(format!("seed must be 32 bytes, got {}", seed.len()))
        })?;
        Ok(Self::from_seed(issuer_id, &seed))
    }

    /// The issuer's unique id.
    pub fn issuer_id(&self) -> &str {
        &self.issuer_id
    }

    /// The issuer's public key.
    pub fn public_key(&self) -> IssuerPublicKey {
        self.keypair.public_key()
    }

    /// Build, sign, and submit a certificate for `recipient_id`.
    ///
    /// The document is hashed, the certificate is built with the
    /// double-hash construction, canonically serialized, signed, and
    /// submitted to the ledger's verified path. The ledger's outcome is
    /// carried in the returned [`Issuance`]; a rejection is additionally
    /// logged but never swallowed.
    pub fn issue_certificate(
        &self,
        ledger: &Ledger,
        recipient_id: impl Into<String>,
        certificate_type: impl Into<String>,
        document: impl Into<bytes::Bytes>,
    ) -> Result<Issuance, IssueError> {
        let signed = CertificateBuilder::new(&self.issuer_id, recipient_id, certificate_type)
            .document(document)
            .issue_date(chrono::Utc::now().to_rfc3339())
            .sign(&self.keypair)?;

        let outcome = ledger.add_block(
            signed.certificate.clone(),
            self.keypair.public_key(),
            signed.signature,
        );

        match &outcome {
            AppendResult::Accepted { index, .. } => {
                debug!(issuer = %self.issuer_id, index, "certificate issued");
            }
            AppendResult::Rejected { reason } => {
                warn!(issuer = %self.issuer_id, %reason, "ledger rejected issuance");
            }
        }

        Ok(Issuance {
            signature_base64: BASE64.encode(signed.signature.as_bytes()),
            certificate: signed.certificate,
            signature: signed.signature,
            outcome,
        })
    }
}

impl std::fmt::Debug for Issuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Issuer")
            .field("issuer_id", &self.issuer_id)
            .field("public_key", &self.public_key())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credledger_core::{ContentHash, Trust, ValidationError};

    #[test]
    fn test_issue_certificate_lands_on_ledger() {
        let ledger = Ledger::new();
        let issuer = Issuer::new("UniversityXYZ");

        let issuance = issuer
            .issue_certificate(&ledger, "student123", "Bachelor of Science", &b"DOC1"[..])
            .unwrap();

        assert!(issuance.outcome.is_accepted());
        assert_eq!(ledger.len(), 2);

        let tail = ledger.last_block();
        assert_eq!(tail.certificate.recipient_id, "student123");
        assert_eq!(tail.trust, Trust::Verified);
    }

    #[test]
    fn test_issuance_double_hash() {
        let ledger = Ledger::new();
        let issuer = Issuer::new("UniversityXYZ");

        let issuance = issuer
            .issue_certificate(&ledger, "student123", "Bachelor of Science", &b"DOC1"[..])
            .unwrap();

        let cert = &issuance.certificate;
        let doc_hash = ContentHash::hash(b"DOC1");
        assert_eq!(cert.document_hash, doc_hash);
        assert_eq!(cert.certificate_hash, doc_hash);
        assert_eq!(cert.hash, ContentHash::hash(doc_hash.to_hex().as_bytes()));
    }

    #[test]
    fn test_signature_base64_decodes_to_signature() {
        let ledger = Ledger::new();
        let issuer = Issuer::new("UniversityXYZ");

        let issuance = issuer
            .issue_certificate(&ledger, "student123", "Bachelor of Science", &b"DOC1"[..])
            .unwrap();

        let decoded = BASE64.decode(&issuance.signature_base64).unwrap();
        assert_eq!(decoded, issuance.signature.as_bytes());
    }

    #[test]
    fn test_empty_recipient_fails_before_signing() {
        let ledger = Ledger::new();
        let issuer = Issuer::new("UniversityXYZ");

        let err = issuer
            .issue_certificate(&ledger, "", "Bachelor of Science", &b"DOC1"[..])
            .unwrap_err();
        assert_eq!(
            err,
            IssueError::Malformed(ValidationError::EmptyField("recipient_id"))
        );
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_from_seed_bytes_rejects_bad_seed() {
        let err = Issuer::from_seed_bytes("UniversityXYZ", &[0u8; 31]).unwrap_err();
        assert!(matches!(err, IssueError::KeyGeneration(_)));
    }

    #[test]
    fn test_from_seed_deterministic() {
        let a = Issuer::from_seed("UniversityXYZ", &[7; 32]);
        let b = Issuer::from_seed("UniversityXYZ", &[7; 32]);
        assert_eq!(a.public_key(), b.public_key());
    }
}
