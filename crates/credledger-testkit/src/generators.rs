//! Proptest generators for property-based testing.

use proptest::prelude::*;

use credledger_core::{
    BlockHash, Certificate, CertificateBuilder, ContentHash, IssuerPublicKey, Keypair,
};

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate a random ContentHash.
pub fn content_hash() -> impl Strategy<Value = ContentHash> {
    any::<[u8; 32]>().prop_map(ContentHash::from_bytes)
}

/// Generate a random BlockHash.
pub fn block_hash() -> impl Strategy<Value = BlockHash> {
    any::<[u8; 32]>().prop_map(BlockHash::from_bytes)
}

/// Generate a random IssuerPublicKey.
pub fn public_key() -> impl Strategy<Value = IssuerPublicKey> {
    keypair().prop_map(|kp| kp.public_key())
}

/// Generate a non-empty identifier (issuer ids, recipient ids).
pub fn identifier() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_-]{1,24}"
}

/// Generate a certificate type label.
pub fn certificate_type() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Bachelor of Science".to_string()),
        Just("Master of Arts".to_string()),
        Just("Professional Certificate".to_string()),
    ]
}

/// Generate document bytes, empty allowed.
pub fn document() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(any::<u8>(), 0..256)
}

/// Generate a well-formed certificate via the double-hash builder.
pub fn certificate() -> impl Strategy<Value = Certificate> {
    (identifier(), identifier(), certificate_type(), document()).prop_map(
        |(issuer, recipient, kind, doc)| {
            CertificateBuilder::new(issuer, recipient, kind)
                .document(doc)
                .issue_date("2025-05-26T00:00:00Z")
                .build()
                .expect("generated fields are non-empty")
        },
    )
}

/// Generate a self-addressed certificate (unsigned-path contract).
pub fn self_addressed_certificate() -> impl Strategy<Value = Certificate> {
    (identifier(), identifier(), certificate_type(), document()).prop_map(
        |(issuer, recipient, kind, doc)| {
            Certificate::self_addressed(issuer, recipient, kind, "2025-05-26T00:00:00Z", doc)
                .expect("generated fields are non-empty")
        },
    )
}
