//! The ledger: an ordered, append-only sequence of blocks.
//!
//! The ledger is owned by the hosting process and passed by reference to
//! every collaborator; there is no ambient global instance. All appends go
//! through a single write guard so index and prev-hash assignment stay
//! linearizable under concurrent use.

use std::sync::RwLock;

use tracing::{debug, warn};

use credledger_core::{
    verify_certificate, Block, BlockHash, Certificate, IssuerPublicKey, IssuerSignature, PrevHash,
    Trust, ValidationError,
};

use crate::error::ChainError;

/// A certificate submitted for ingestion, with its trust evidence.
///
/// This is the single ingestion operation parameterized by provenance:
/// every appended block visibly carries the trust tag its submission
/// earned.
#[derive(Debug, Clone)]
pub enum Submission {
    /// Signed path: verified before mutation, appended as
    /// [`Trust::Verified`] on success.
    Signed {
        certificate: Certificate,
        issuer_public_key: IssuerPublicKey,
        signature: IssuerSignature,
    },
    /// Unsigned path: structural checks only, appended as
    /// [`Trust::Unverified`].
    Unsigned { certificate: Certificate },
}

/// Why a submission was declined. The ledger was not mutated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
    #[error("signature invalid")]
    SignatureInvalid,

    #[error("malformed certificate: {0}")]
    MalformedCertificate(ValidationError),
}

/// Outcome of an append. Rejection is data, not an error: callers must be
/// able to distinguish "accepted" from "declined" without error plumbing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppendResult {
    /// The block was appended.
    Accepted {
        /// Index of the new block.
        index: u64,
        /// Derived hash of the new block.
        block_hash: BlockHash,
        /// Provenance the block carries.
        trust: Trust,
    },
    /// The submission was declined; the chain is unchanged.
    Rejected { reason: RejectReason },
}

impl AppendResult {
    /// Whether the submission landed on the chain.
    pub fn is_accepted(&self) -> bool {
        matches!(self, AppendResult::Accepted { .. })
    }
}

/// The ordered, append-only sequence of blocks, never reordered or
/// truncated. The first element is always the genesis block.
pub struct Ledger {
    chain: RwLock<Vec<Block>>,
}

impl Ledger {
    /// Create a ledger holding only the genesis block.
    pub fn new() -> Self {
        Self {
            chain: RwLock::new(vec![Block::genesis()]),
        }
    }

    /// The tail of the chain. Always defined: genesis guarantees
    /// non-emptiness.
    pub fn last_block(&self) -> Block {
        let chain = self.chain.read().unwrap();
        chain.last().expect("genesis guarantees non-emptiness").clone()
    }

    /// Number of blocks, genesis included.
    pub fn len(&self) -> usize {
        self.chain.read().unwrap().len()
    }

    /// Always false: the genesis block is never removed.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Ingest a submission, tagging the appended block with its provenance.
    ///
    /// Verification runs outside the critical section; only the tail read
    /// and the push happen under the write guard, so two concurrent
    /// appends can never collide on an index.
    pub fn append(&self, submission: Submission) -> AppendResult {
        let (certificate, trust) = match submission {
            Submission::Signed {
                certificate,
                issuer_public_key,
                signature,
            } => {
                if let Err(e) = verify_certificate(&certificate, &issuer_public_key, &signature) {
                    let reason = match e {
                        ValidationError::SignatureFailed => RejectReason::SignatureInvalid,
                        other => RejectReason::MalformedCertificate(other),
                    };
                    warn!(%reason, recipient = %certificate.recipient_id, "block rejected");
                    return AppendResult::Rejected { reason };
                }
                (certificate, Trust::Verified)
            }
            Submission::Unsigned { certificate } => {
                if let Err(e) = certificate.check_required_fields() {
                    let reason = RejectReason::MalformedCertificate(e);
                    warn!(%reason, "unsigned submission rejected");
                    return AppendResult::Rejected { reason };
                }
                (certificate, Trust::Unverified)
            }
        };

        let mut chain = self.chain.write().unwrap();
        let last = chain.last().expect("genesis guarantees non-emptiness");
        let block = Block::next(last, certificate, now_millis(), trust);
        let index = block.index;
        let block_hash = block.hash();
        chain.push(block);

        debug!(index, block_hash = %block_hash, ?trust, "block appended");
        AppendResult::Accepted {
            index,
            block_hash,
            trust,
        }
    }

    /// Verified append: the signature must check out under the supplied
    /// issuer public key or nothing is mutated.
    pub fn add_block(
        &self,
        certificate: Certificate,
        issuer_public_key: IssuerPublicKey,
        signature: IssuerSignature,
    ) -> AppendResult {
        self.append(Submission::Signed {
            certificate,
            issuer_public_key,
            signature,
        })
    }

    /// Unverified append: the distinct, lower-trust ingestion path. The
    /// block lands tagged [`Trust::Unverified`].
    pub fn add_certificate(&self, certificate: Certificate) -> AppendResult {
        self.append(Submission::Unsigned { certificate })
    }

    /// Read-only snapshot of the chain in order.
    pub fn list(&self) -> Vec<Block> {
        self.chain.read().unwrap().clone()
    }

    /// Linear substring scan over `recipient_id`, `certificate_hash` and
    /// `document_hash` of every certificate on the chain.
    ///
    /// Full scan, no index: O(n) over chain length, acceptable only at
    /// small scale.
    pub fn find(&self, query: &str) -> Vec<Certificate> {
        self.chain
            .read()
            .unwrap()
            .iter()
            .map(|block| &block.certificate)
            .filter(|cert| cert.matches(query))
            .cloned()
            .collect()
    }

    /// Audit walk over the whole chain: genesis shape, index succession,
    /// and prev-hash linkage.
    pub fn verify_chain(&self) -> Result<(), ChainError> {
        let chain = self.chain.read().unwrap();

        let genesis = chain.first().ok_or(ChainError::Empty)?;
        if !genesis.is_genesis() {
            return Err(ChainError::BadGenesis);
        }

        for (i, pair) in chain.windows(2).enumerate() {
            let (prev, current) = (&pair[0], &pair[1]);
            let at = i + 1;

            if current.index != prev.index + 1 {
                return Err(ChainError::IndexMismatch {
                    at,
                    expected: prev.index + 1,
                    got: current.index,
                });
            }
            if current.prev_hash != PrevHash::Block(prev.hash()) {
                return Err(ChainError::LinkBroken { at });
            }
        }

        Ok(())
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as i64
}
