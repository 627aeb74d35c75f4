//! Canonical CBOR encoding for deterministic serialization.
//!
//! This module implements RFC 8949 Core Deterministic Encoding:
//! - Map keys sorted by encoded byte comparison
//! - Integers use smallest valid encoding
//! - Definite lengths only
//! - No floats (timestamps are i64 milliseconds)
//!
//! The canonical encoding is the contract behind both hashing and signing:
//! the same certificate produces identical bytes (and thus identical
//! digests and signatures) across independent implementations.
//!
//! Three encodings exist:
//! - [`canonical_certificate_bytes`]: the full certificate, raw document
//!   included. This is the SIGNING message, so tampering with any field,
//!   payload included, breaks verification.
//! - [`canonical_certificate_record_bytes`]: the certificate without the
//!   raw payload. Only the content-addressed digests remain.
//! - [`canonical_block_bytes`]: the block chaining input. Embeds the
//!   certificate record form, so block-hash cost is bounded independent of
//!   document size.

use ciborium::value::Value;

use crate::block::{Block, PrevHash};
use crate::certificate::Certificate;
use crate::crypto::ContentHash;
use crate::error::CoreError;

/// Certificate field keys (integer keys for compact encoding).
///
/// Keys 0-23 encode as single bytes in CBOR.
mod cert_keys {
    pub const HASH: u64 = 0;
    pub const CERTIFICATE_HASH: u64 = 1;
    pub const ISSUER_ID: u64 = 2;
    pub const RECIPIENT_ID: u64 = 3;
    pub const CERTIFICATE_TYPE: u64 = 4;
    pub const ISSUE_DATE: u64 = 5;
    pub const DOCUMENT_HASH: u64 = 6;
    pub const DOCUMENT: u64 = 7;
}

/// Block field keys.
mod block_keys {
    pub const INDEX: u64 = 0;
    pub const PREV_HASH: u64 = 1;
    pub const CERTIFICATE: u64 = 2;
    pub const TIMESTAMP: u64 = 3;
}

/// Encode a certificate to canonical bytes, raw document included.
///
/// This is the message the issuer signs and the ledger verifies.
pub fn canonical_certificate_bytes(cert: &Certificate) -> Vec<u8> {
    let value = certificate_to_cbor_value(cert, true);
    encode_cbor_value_canonical(&value)
}

/// Encode a certificate's content-addressed record form: the same map
/// without the raw document payload.
pub fn canonical_certificate_record_bytes(cert: &Certificate) -> Vec<u8> {
    let value = certificate_to_cbor_value(cert, false);
    encode_cbor_value_canonical(&value)
}

/// Encode a block's chaining input: index, prev hash, certificate record,
/// timestamp. The trust tag is provenance metadata and stays out.
pub fn canonical_block_bytes(block: &Block) -> Vec<u8> {
    let prev_value = match &block.prev_hash {
        // The genesis predecessor renders as the literal text "0".
        PrevHash::Genesis => Value::Text("0".to_string()),
        PrevHash::Block(h) => Value::Bytes(h.0.to_vec()),
    };

    let entries = vec![
        (
            Value::Integer(block_keys::INDEX.into()),
            Value::Integer(block.index.into()),
        ),
        (Value::Integer(block_keys::PREV_HASH.into()), prev_value),
        (
            Value::Integer(block_keys::CERTIFICATE.into()),
            certificate_to_cbor_value(&block.certificate, false),
        ),
        (
            Value::Integer(block_keys::TIMESTAMP.into()),
            Value::Integer(block.timestamp.into()),
        ),
    ];

    encode_cbor_value_canonical(&Value::Map(entries))
}

/// Convert a certificate to a CBOR Value (map with integer keys).
fn certificate_to_cbor_value(cert: &Certificate, include_document: bool) -> Value {
    // Build map entries in key order (already sorted 0-7)
    let mut entries = Vec::with_capacity(8);

    entries.push((
        Value::Integer(cert_keys::HASH.into()),
        Value::Bytes(cert.hash.0.to_vec()),
    ));
    entries.push((
        Value::Integer(cert_keys::CERTIFICATE_HASH.into()),
        Value::Bytes(cert.certificate_hash.0.to_vec()),
    ));
    entries.push((
        Value::Integer(cert_keys::ISSUER_ID.into()),
        Value::Text(cert.issuer_id.clone()),
    ));
    entries.push((
        Value::Integer(cert_keys::RECIPIENT_ID.into()),
        Value::Text(cert.recipient_id.clone()),
    ));
    entries.push((
        Value::Integer(cert_keys::CERTIFICATE_TYPE.into()),
        Value::Text(cert.certificate_type.clone()),
    ));
    entries.push((
        Value::Integer(cert_keys::ISSUE_DATE.into()),
        Value::Text(cert.issue_date.clone()),
    ));
    entries.push((
        Value::Integer(cert_keys::DOCUMENT_HASH.into()),
        Value::Bytes(cert.document_hash.0.to_vec()),
    ));

    if include_document {
        // An absent payload is an explicit null, never a missing key.
        let doc_value = match &cert.document {
            Some(doc) => Value::Bytes(doc.to_vec()),
            None => Value::Null,
        };
        entries.push((Value::Integer(cert_keys::DOCUMENT.into()), doc_value));
    }

    Value::Map(entries)
}

/// Encode a CBOR Value to canonical bytes.
///
/// This function ensures:
/// - Map keys are sorted by encoded byte comparison
/// - Integers use smallest encoding
/// - Definite lengths only
fn encode_cbor_value_canonical(value: &Value) -> Vec<u8> {
    let mut buf = Vec::new();
    encode_value_to(&mut buf, value);
    buf
}

/// Recursively encode a CBOR value.
fn encode_value_to(buf: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Integer(i) => {
            encode_integer(buf, *i);
        }
        Value::Bytes(b) => {
            encode_bytes(buf, b);
        }
        Value::Text(s) => {
            encode_text(buf, s);
        }
        Value::Array(arr) => {
            encode_array(buf, arr);
        }
        Value::Map(entries) => {
            encode_map_canonical(buf, entries);
        }
        Value::Bool(b) => {
            buf.push(if *b { 0xf5 } else { 0xf4 });
        }
        Value::Null => {
            buf.push(0xf6);
        }
        Value::Float(_) => {
            panic!("floats not supported in canonical encoding");
        }
        _ => {
            panic!("unsupported CBOR value type");
        }
    }
}

/// Encode a CBOR integer (major types 0 and 1).
fn encode_integer(buf: &mut Vec<u8>, i: ciborium::value::Integer) {
    let n: i128 = i.into();

    if n >= 0 {
        // Major type 0: unsigned integer
        encode_uint(buf, 0, n as u64);
    } else {
        // Major type 1: negative integer
        // CBOR encodes -1 as 0, -2 as 1, etc.
        let abs = (-1 - n) as u64;
        encode_uint(buf, 1, abs);
    }
}

/// Encode an unsigned integer with the given major type.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffffffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// Encode a byte string (major type 2).
fn encode_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    encode_uint(buf, 2, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

/// Encode a text string (major type 3).
fn encode_text(buf: &mut Vec<u8>, s: &str) {
    encode_uint(buf, 3, s.len() as u64);
    buf.extend_from_slice(s.as_bytes());
}

/// Encode an array (major type 4).
fn encode_array(buf: &mut Vec<u8>, arr: &[Value]) {
    encode_uint(buf, 4, arr.len() as u64);
    for item in arr {
        encode_value_to(buf, item);
    }
}

/// Encode a map canonically (major type 5).
///
/// Keys are sorted by their encoded byte comparison.
fn encode_map_canonical(buf: &mut Vec<u8>, entries: &[(Value, Value)]) {
    // Encode all keys first to sort by encoded bytes
    let mut key_value_pairs: Vec<(Vec<u8>, &Value)> = entries
        .iter()
        .map(|(k, v)| {
            let mut key_buf = Vec::new();
            encode_value_to(&mut key_buf, k);
            (key_buf, v)
        })
        .collect();

    // Sort by encoded key bytes (lexicographic)
    key_value_pairs.sort_by(|a, b| a.0.cmp(&b.0));

    // Write map header
    encode_uint(buf, 5, key_value_pairs.len() as u64);

    // Write sorted key-value pairs
    for (key_bytes, value) in key_value_pairs {
        buf.extend_from_slice(&key_bytes);
        encode_value_to(buf, value);
    }
}

/// Decode a certificate from canonical bytes.
pub fn decode_certificate(bytes: &[u8]) -> Result<Certificate, CoreError> {
    let cursor = std::io::Cursor::new(bytes);
    let value: Value =
        ciborium::from_reader(cursor).map_err(|e| CoreError::DecodingError(e.to_string()))?;
    cbor_value_to_certificate(&value)
}

/// Convert a CBOR Value (map) back to a Certificate.
fn cbor_value_to_certificate(value: &Value) -> Result<Certificate, CoreError> {
    let map = match value {
        Value::Map(m) => m,
        _ => return Err(CoreError::DecodingError("expected map".into())),
    };

    // Helper to get a value by integer key
    let get = |key: u64| -> Option<&Value> {
        map.iter()
            .find(|(k, _)| matches!(k, Value::Integer(i) if i128::from(*i) == key as i128))
            .map(|(_, v)| v)
    };

    let get_hash = |key: u64, name: &str| -> Result<ContentHash, CoreError> {
        match get(key) {
            Some(Value::Bytes(b)) if b.len() == 32 => {
                let mut arr = [0u8; 32];
                arr.copy_from_slice(b);
                Ok(ContentHash(arr))
            }
            _ => Err(CoreError::DecodingError(format!("invalid {name}"))),
        }
    };

    let get_text = |key: u64, name: &str| -> Result<String, CoreError> {
        match get(key) {
            Some(Value::Text(s)) => Ok(s.clone()),
            _ => Err(CoreError::DecodingError(format!("invalid {name}"))),
        }
    };

    let hash = get_hash(cert_keys::HASH, "hash")?;
    let certificate_hash = get_hash(cert_keys::CERTIFICATE_HASH, "certificate_hash")?;
    let issuer_id = get_text(cert_keys::ISSUER_ID, "issuer_id")?;
    let recipient_id = get_text(cert_keys::RECIPIENT_ID, "recipient_id")?;
    let certificate_type = get_text(cert_keys::CERTIFICATE_TYPE, "certificate_type")?;
    let issue_date = get_text(cert_keys::ISSUE_DATE, "issue_date")?;
    let document_hash = get_hash(cert_keys::DOCUMENT_HASH, "document_hash")?;

    let document = match get(cert_keys::DOCUMENT) {
        Some(Value::Bytes(b)) => Some(bytes::Bytes::from(b.clone())),
        Some(Value::Null) => None,
        None => None,
        _ => return Err(CoreError::DecodingError("invalid document".into())),
    };

    Ok(Certificate {
        hash,
        certificate_hash,
        issuer_id,
        recipient_id,
        certificate_type,
        issue_date,
        document_hash,
        document,
    })
}
