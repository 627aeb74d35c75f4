//! End-to-end scenarios over the issuer/ledger surface.

use credledger::{AppendResult, ContentHash, Ledger, PrevHash, RejectReason, Trust};
use credledger_testkit::{make_self_addressed, make_signed_certificate, TestFixture, SAMPLE_DOCUMENTS};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[test]
fn university_issues_certificate_to_student() {
    init_tracing();
    let fx = TestFixture::new();

    let issuance = fx
        .issuer
        .issue_certificate(&fx.ledger, "student123", "Bachelor of Science", &b"DOC1"[..])
        .unwrap();

    assert!(issuance.outcome.is_accepted());
    assert_eq!(fx.ledger.len(), 2);

    let blocks = fx.ledger.list();
    let cert = &blocks[1].certificate;
    assert_eq!(cert.recipient_id, "student123");
    assert_eq!(cert.document_hash, ContentHash::hash(b"DOC1"));
    assert_eq!(
        cert.hash,
        ContentHash::hash(cert.document_hash.to_hex().as_bytes())
    );
    assert_eq!(blocks[1].trust, Trust::Verified);
}

#[test]
fn accepted_append_links_to_previous_tail() {
    let fx = TestFixture::new();
    let tail = fx.ledger.last_block();

    let issuance = fx
        .issuer
        .issue_certificate(&fx.ledger, "student123", "Bachelor of Science", &b"DOC1"[..])
        .unwrap();

    assert!(issuance.outcome.is_accepted());
    assert_eq!(fx.ledger.last_block().prev_hash, PrevHash::Block(tail.hash()));
}

#[test]
fn tampering_any_field_rejects_and_leaves_ledger_unchanged() {
    init_tracing();
    let fx = TestFixture::with_seed([0x42; 32]);
    let keypair = credledger::Keypair::from_seed(&[0x42; 32]);

    let tamper: Vec<(&str, Box<dyn Fn(&mut credledger::Certificate)>)> = vec![
        ("recipient_id", Box::new(|c| c.recipient_id = "mallory".into())),
        ("certificate_type", Box::new(|c| c.certificate_type = "PhD".into())),
        ("issue_date", Box::new(|c| c.issue_date = "1999-01-01T00:00:00Z".into())),
        ("issuer_id", Box::new(|c| c.issuer_id = "DiplomaMill".into())),
        (
            "document_hash",
            Box::new(|c| c.document_hash = ContentHash::hash(b"other")),
        ),
    ];

    for (field, mutate) in tamper {
        let (mut cert, sig) =
            make_signed_certificate(&keypair, "student123", "Bachelor of Science", b"DOC1");
        mutate(&mut cert);

        let before = fx.ledger.len();
        let result = fx.ledger.add_block(cert, fx.public_key(), sig);
        assert!(!result.is_accepted(), "tampered {field} must be rejected");
        assert_eq!(fx.ledger.len(), before, "rejected {field} must not mutate");
    }
}

#[test]
fn genesis_invariants_hold_for_fresh_ledger() {
    let ledger = Ledger::new();
    let blocks = ledger.list();

    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].index, 0);
    assert_eq!(blocks[0].prev_hash.to_hex(), "0");
    assert_eq!(blocks[0].certificate.issuer_id, "genesis");
}

#[test]
fn bypass_path_is_distinguishable_from_verified_path() {
    init_tracing();
    let fx = TestFixture::new();

    fx.issuer
        .issue_certificate(&fx.ledger, "signed-student", "Bachelor of Science", &b"A"[..])
        .unwrap();
    fx.ledger
        .add_certificate(make_self_addressed("walk-in", b"B"));

    let blocks = fx.ledger.list();
    assert_eq!(blocks.len(), 3);
    assert_eq!(blocks[1].trust, Trust::Verified);
    assert_eq!(blocks[2].trust, Trust::Unverified);

    // The bypass construction collapses the id namespace
    let bypass = &blocks[2].certificate;
    assert_eq!(bypass.hash, bypass.document_hash);

    // The signed construction keeps them apart
    let signed = &blocks[1].certificate;
    assert_ne!(signed.hash, signed.document_hash);
}

#[test]
fn rejection_is_reported_to_the_caller() {
    let fx = TestFixture::new();
    let stranger = credledger::Keypair::generate();

    // A certificate signed by someone other than the claimed issuer key
    let (cert, sig) = make_signed_certificate(&stranger, "student123", "Master of Arts", b"DOC1");
    let result = fx.ledger.add_block(cert, fx.public_key(), sig);

    assert_eq!(
        result,
        AppendResult::Rejected {
            reason: RejectReason::SignatureInvalid
        }
    );
}

#[test]
fn find_matches_exactly_the_advertised_fields() {
    let fx = TestFixture::new();

    fx.issuer
        .issue_certificate(&fx.ledger, "alice-2025", "Bachelor of Science", &b"alpha"[..])
        .unwrap();
    fx.issuer
        .issue_certificate(&fx.ledger, "bob-2025", "Master of Arts", &b"beta"[..])
        .unwrap();

    // Recipient substring
    let hits = fx.ledger.find("alice");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].recipient_id, "alice-2025");

    // Document-hash substring
    let beta_hash = ContentHash::hash(b"beta").to_hex();
    let hits = fx.ledger.find(&beta_hash[..20]);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].recipient_id, "bob-2025");

    // Certificate-type is NOT part of the search surface
    assert!(fx.ledger.find("Master of Arts").is_empty());

    // No match
    assert!(fx.ledger.find("zzzz-not-there").is_empty());
}

#[test]
fn chain_audit_passes_after_mixed_ingestion() {
    let fx = TestFixture::new();

    for i in 0..5 {
        fx.issuer
            .issue_certificate(
                &fx.ledger,
                format!("student-{i}"),
                "Bachelor of Science",
                format!("doc-{i}").into_bytes(),
            )
            .unwrap();
        fx.ledger
            .add_certificate(make_self_addressed(&format!("walkin-{i}"), b"w"));
    }

    assert_eq!(fx.ledger.len(), 11);
    fx.ledger.verify_chain().expect("audit walk must pass");

    // Index succession across the whole chain
    for (i, block) in fx.ledger.list().iter().enumerate() {
        assert_eq!(block.index, i as u64);
    }
}

#[test]
fn document_hash_is_stable_per_payload() {
    let fx = TestFixture::new();

    for (i, doc) in SAMPLE_DOCUMENTS.iter().enumerate() {
        let issuance = fx
            .issuer
            .issue_certificate(&fx.ledger, format!("r-{i}"), "Diploma", *doc)
            .unwrap();
        assert_eq!(issuance.certificate.document_hash, ContentHash::hash(doc));
    }

    fx.ledger.verify_chain().unwrap();
}

mod properties {
    use super::*;
    use credledger_testkit::generators;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn accepted_appends_always_link(cert in generators::certificate()) {
            let ledger = Ledger::new();
            let tail_hash = ledger.last_block().hash();

            let result = ledger.add_certificate(cert);
            prop_assert!(result.is_accepted());
            prop_assert_eq!(ledger.last_block().prev_hash, PrevHash::Block(tail_hash));
            prop_assert!(ledger.verify_chain().is_ok());
        }

        #[test]
        fn signed_certificates_always_verify(
            kp in generators::keypair(),
            cert in generators::certificate(),
        ) {
            let message = credledger_core::canonical_certificate_bytes(&cert);
            let sig = kp.sign(&message);
            prop_assert!(kp.public_key().verify(&message, &sig).is_ok());
        }

        #[test]
        fn canonical_bytes_roundtrip(cert in generators::self_addressed_certificate()) {
            let bytes = credledger_core::canonical_certificate_bytes(&cert);
            let decoded = credledger_core::decode_certificate(&bytes).unwrap();
            prop_assert_eq!(cert, decoded);
        }

        #[test]
        fn find_results_always_match_query(
            certs in proptest::collection::vec(generators::certificate(), 1..8),
            query in "[a-z0-9]{1,4}",
        ) {
            let ledger = Ledger::new();
            for cert in certs {
                ledger.add_certificate(cert);
            }
            for hit in ledger.find(&query) {
                prop_assert!(hit.matches(&query));
            }
        }
    }
}
