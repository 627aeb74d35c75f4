//! Error types for the credential ledger core.

use thiserror::Error;

/// Core errors that can occur during certificate operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("malformed certificate: {0}")]
    MalformedCertificate(String),

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("decoding error: {0}")]
    DecodingError(String),
}

/// Validation errors for certificate structure and signatures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("signature verification failed")]
    SignatureFailed,

    #[error("required field is empty: {0}")]
    EmptyField(&'static str),

    #[error("document hash does not match document bytes")]
    DocumentHashMismatch,

    #[error("certificate hash does not match its contents")]
    CertificateHashMismatch,

    #[error("structural error: {0}")]
    StructuralError(String),
}

impl From<CoreError> for ValidationError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidSignature | CoreError::InvalidPublicKey => {
                ValidationError::SignatureFailed
            }
            CoreError::MalformedCertificate(msg) => ValidationError::StructuralError(msg),
            CoreError::EncodingError(msg) | CoreError::DecodingError(msg) => {
                ValidationError::StructuralError(msg)
            }
        }
    }
}
