//! Certificate: the issuance record carried through the chain.
//!
//! A certificate is immutable once built. Two construction contracts exist:
//!
//! - The signed path ([`CertificateBuilder`]) computes the double hash:
//!   `certificate_hash == document_hash == H(document)` and
//!   `hash == H(hex(document_hash))`, separating the certificate-id
//!   namespace from the raw document-hash namespace.
//! - The self-addressed path ([`Certificate::self_addressed`]) sets all
//!   three digests equal. It is used by flows that never produce a
//!   signature and lands on the chain tagged unverified.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::canonical::canonical_certificate_bytes;
use crate::crypto::{ContentHash, IssuerSignature, Keypair};
use crate::error::ValidationError;

/// The issuance record describing issuer, recipient, type, document hash,
/// and self-addressing hash.
///
/// The external representation uses the camelCase field names consumed by
/// presentation layers: `hash`, `certificateHash`, `issuerId`,
/// `recipientId`, `certificateType`, `issueDate`, `documentHash`,
/// `document`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    /// Content id of the certificate.
    pub hash: ContentHash,

    /// Hash of the certificate document.
    pub certificate_hash: ContentHash,

    /// Issuer unique id.
    pub issuer_id: String,

    /// Recipient unique id.
    pub recipient_id: String,

    /// E.g. "Bachelor of Science".
    pub certificate_type: String,

    /// ISO-8601 issue instant.
    pub issue_date: String,

    /// Hash of the document bytes.
    pub document_hash: ContentHash,

    /// Raw document payload, when the uploader chose to carry it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<Bytes>,
}

impl Certificate {
    /// Build a self-addressed certificate: `hash == certificate_hash ==
    /// document_hash == H(document)`.
    ///
    /// This is the lower-trust construction used by unsigned ingestion.
    pub fn self_addressed(
        issuer_id: impl Into<String>,
        recipient_id: impl Into<String>,
        certificate_type: impl Into<String>,
        issue_date: impl Into<String>,
        document: impl Into<Bytes>,
    ) -> Result<Self, ValidationError> {
        let document = document.into();
        let document_hash = ContentHash::hash(&document);
        let cert = Self {
            hash: document_hash,
            certificate_hash: document_hash,
            issuer_id: issuer_id.into(),
            recipient_id: recipient_id.into(),
            certificate_type: certificate_type.into(),
            issue_date: issue_date.into(),
            document_hash,
            document: Some(document),
        };
        cert.check_required_fields()?;
        Ok(cert)
    }

    /// The genesis placeholder certificate.
    ///
    /// Field values follow the fixed genesis record: issuer `"genesis"`,
    /// recipient `"none"`, type `"Genesis Certificate"`, id `H("0")`, and
    /// zero digests where no document exists.
    pub fn genesis(issue_date: impl Into<String>) -> Self {
        Self {
            hash: ContentHash::hash(b"0"),
            certificate_hash: ContentHash::ZERO,
            issuer_id: "genesis".to_string(),
            recipient_id: "none".to_string(),
            certificate_type: "Genesis Certificate".to_string(),
            issue_date: issue_date.into(),
            document_hash: ContentHash::ZERO,
            document: None,
        }
    }

    /// Substring match against `recipient_id`, `certificate_hash` and
    /// `document_hash`, the search surface exposed to collaborators.
    pub fn matches(&self, query: &str) -> bool {
        self.recipient_id.contains(query)
            || self.certificate_hash.to_hex().contains(query)
            || self.document_hash.to_hex().contains(query)
    }

    /// Reject empty required fields before anything is hashed or signed.
    pub fn check_required_fields(&self) -> Result<(), ValidationError> {
        if self.issuer_id.is_empty() {
            return Err(ValidationError::EmptyField("issuer_id"));
        }
        if self.recipient_id.is_empty() {
            return Err(ValidationError::EmptyField("recipient_id"));
        }
        if self.certificate_type.is_empty() {
            return Err(ValidationError::EmptyField("certificate_type"));
        }
        Ok(())
    }
}

/// A certificate together with the issuer's signature over its canonical
/// bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedCertificate {
    /// The signed certificate.
    pub certificate: Certificate,

    /// Ed25519 signature over `canonical_certificate_bytes(certificate)`.
    pub signature: IssuerSignature,
}

/// Builder for the signed construction path.
pub struct CertificateBuilder {
    issuer_id: String,
    recipient_id: String,
    certificate_type: String,
    issue_date: Option<String>,
    document: Bytes,
    carry_document: bool,
}

impl CertificateBuilder {
    /// Start building a certificate for the given parties.
    pub fn new(
        issuer_id: impl Into<String>,
        recipient_id: impl Into<String>,
        certificate_type: impl Into<String>,
    ) -> Self {
        Self {
            issuer_id: issuer_id.into(),
            recipient_id: recipient_id.into(),
            certificate_type: certificate_type.into(),
            issue_date: None,
            document: Bytes::new(),
            carry_document: true,
        }
    }

    /// Set the document bytes to hash.
    pub fn document(mut self, document: impl Into<Bytes>) -> Self {
        self.document = document.into();
        self
    }

    /// Override the issue date (defaults to the current instant, RFC 3339).
    pub fn issue_date(mut self, date: impl Into<String>) -> Self {
        self.issue_date = Some(date.into());
        self
    }

    /// Drop the raw payload from the built certificate, keeping only the
    /// content-addressed digests.
    pub fn without_payload(mut self) -> Self {
        self.carry_document = false;
        self
    }

    /// Build the certificate with the double-hash construction.
    pub fn build(self) -> Result<Certificate, ValidationError> {
        let document_hash = ContentHash::hash(&self.document);
        let hash = ContentHash::hash(document_hash.to_hex().as_bytes());

        let cert = Certificate {
            hash,
            certificate_hash: document_hash,
            issuer_id: self.issuer_id,
            recipient_id: self.recipient_id,
            certificate_type: self.certificate_type,
            issue_date: self
                .issue_date
                .unwrap_or_else(|| chrono::Utc::now().to_rfc3339()),
            document_hash,
            document: if self.carry_document {
                Some(self.document)
            } else {
                None
            },
        };
        cert.check_required_fields()?;
        Ok(cert)
    }

    /// Build and sign the certificate.
    ///
    /// The signature covers the canonical serialization of the whole
    /// certificate, raw payload included, so tampering with any field
    /// breaks verification.
    pub fn sign(self, keypair: &Keypair) -> Result<SignedCertificate, ValidationError> {
        let certificate = self.build()?;
        let message = canonical_certificate_bytes(&certificate);
        let signature = keypair.sign(&message);
        Ok(SignedCertificate {
            certificate,
            signature,
        })
    }
}
