//! Certificate validation: structural checks and signature verification.

use crate::canonical::canonical_certificate_bytes;
use crate::certificate::Certificate;
use crate::crypto::{ContentHash, IssuerPublicKey, IssuerSignature};
use crate::error::ValidationError;

/// Validate a certificate's structure.
///
/// This performs:
/// - Required-field checks (issuer, recipient, type must be non-empty)
/// - Document binding: when the raw payload is carried, `document_hash`
///   must equal the hash of the payload bytes
///
/// The relation between `hash` and `document_hash` is NOT checked here:
/// the signed path and the self-addressed path construct it differently,
/// and the block's trust tag records which contract applies.
pub fn validate_certificate(cert: &Certificate) -> Result<(), ValidationError> {
    cert.check_required_fields()?;

    if let Some(document) = &cert.document {
        if ContentHash::hash(document) != cert.document_hash {
            return Err(ValidationError::DocumentHashMismatch);
        }
    }

    Ok(())
}

/// Validate structure, then verify the issuer's signature over the
/// certificate's canonical bytes.
pub fn verify_certificate(
    cert: &Certificate,
    issuer_public_key: &IssuerPublicKey,
    signature: &IssuerSignature,
) -> Result<(), ValidationError> {
    validate_certificate(cert)?;

    let message = canonical_certificate_bytes(cert);
    issuer_public_key
        .verify(&message, signature)
        .map_err(|_| ValidationError::SignatureFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::certificate::CertificateBuilder;
    use crate::crypto::Keypair;

    fn make_test_keypair() -> Keypair {
        Keypair::from_seed(&[0x42; 32])
    }

    fn signed_sample(keypair: &Keypair) -> (Certificate, IssuerSignature) {
        let signed = CertificateBuilder::new("UniversityXYZ", "student123", "Bachelor of Science")
            .document(b"DOC1".to_vec())
            .issue_date("2025-05-26T00:00:00Z")
            .sign(keypair)
            .unwrap();
        (signed.certificate, signed.signature)
    }

    #[test]
    fn test_valid_certificate_verifies() {
        let keypair = make_test_keypair();
        let (cert, sig) = signed_sample(&keypair);
        assert!(verify_certificate(&cert, &keypair.public_key(), &sig).is_ok());
    }

    #[test]
    fn test_tampered_recipient_fails() {
        let keypair = make_test_keypair();
        let (mut cert, sig) = signed_sample(&keypair);
        cert.recipient_id = "someone-else".to_string();

        let result = verify_certificate(&cert, &keypair.public_key(), &sig);
        assert!(matches!(result, Err(ValidationError::SignatureFailed)));
    }

    #[test]
    fn test_tampered_document_fails_binding() {
        let keypair = make_test_keypair();
        let (mut cert, sig) = signed_sample(&keypair);
        cert.document = Some(b"DOC2".to_vec().into());

        let result = verify_certificate(&cert, &keypair.public_key(), &sig);
        assert!(matches!(result, Err(ValidationError::DocumentHashMismatch)));
    }

    #[test]
    fn test_tampered_issue_date_fails() {
        let keypair = make_test_keypair();
        let (mut cert, sig) = signed_sample(&keypair);
        cert.issue_date = "1999-01-01T00:00:00Z".to_string();

        let result = verify_certificate(&cert, &keypair.public_key(), &sig);
        assert!(matches!(result, Err(ValidationError::SignatureFailed)));
    }

    #[test]
    fn test_wrong_issuer_key_fails() {
        let keypair = make_test_keypair();
        let other = Keypair::from_seed(&[0x43; 32]);
        let (cert, sig) = signed_sample(&keypair);

        let result = verify_certificate(&cert, &other.public_key(), &sig);
        assert!(matches!(result, Err(ValidationError::SignatureFailed)));
    }

    #[test]
    fn test_zeroed_signature_fails() {
        let keypair = make_test_keypair();
        let (cert, _) = signed_sample(&keypair);

        let result = verify_certificate(&cert, &keypair.public_key(), &IssuerSignature::ZERO);
        assert!(matches!(result, Err(ValidationError::SignatureFailed)));
    }

    #[test]
    fn test_empty_recipient_rejected_structurally() {
        let keypair = make_test_keypair();
        let (mut cert, sig) = signed_sample(&keypair);
        cert.recipient_id = String::new();

        let result = verify_certificate(&cert, &keypair.public_key(), &sig);
        assert!(matches!(
            result,
            Err(ValidationError::EmptyField("recipient_id"))
        ));
    }
}
