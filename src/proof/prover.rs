//! Prover for leaf membership proofs
use crate::{
    constant::OPENING_TRANSCRIPT_LABEL,
    proof::{LeafProof, LevelOpening, QueryError},
    tree::VerkleTree,
    types::{fr_to_le_bytes, Node},
};
use banderwagon::Fr;
use ipa_multipoint::{ipa, ProverQuery, Transcript};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use sha2::{Digest, Sha256};
use tracing::trace;

/// Domain separator for the per-opening mask seed.
const OPENING_MASK_DOMAIN: &[u8] = b"verkle_opening_masks";

impl VerkleTree {
    /// Creates the membership proof of data block `index`.
    ///
    /// The proof holds the block itself and one opening per level, from the block's parent up
    /// to the root. Each opening shows that the node's polynomial evaluates to the hash of the
    /// child on the path at that child's slot point. Requesting the same index twice yields the
    /// same proof.
    pub fn request_proof(&self, index: usize) -> Result<LeafProof, QueryError> {
        let datum = self.datum(index).ok_or(QueryError::IndexOutOfRange {
            index,
            len: self.len(),
        })?;

        let width = self.width();
        let mut slot = index;
        let mut result = Node::Leaf(datum).hash_to_scalar();
        let mut openings = Vec::with_capacity(self.depth());

        for (height, level) in self.levels().iter().enumerate() {
            let point = Fr::from((slot % width) as u64 + 1);
            slot /= width;

            let (commitment, secret) = level.node(slot).ok_or(QueryError::IndexOutOfRange {
                index,
                len: self.len(),
            })?;
            let query = ProverQuery {
                commitment: *commitment,
                poly: &secret.polynomial,
                blinding: secret.blinding,
                point,
                result,
            };

            let mut transcript = Transcript::new(OPENING_TRANSCRIPT_LABEL);
            let proof = ipa::create(&mut transcript, self.crs(), &query, &mut opening_rng(&query))
                .ok_or(QueryError::InversionFailure)?;

            trace!(index, level = height, slot, "opened node");

            openings.push(LevelOpening {
                commitment: *commitment,
                point,
                result,
                proof,
            });
            result = Node::Internal(commitment).hash_to_scalar();
        }

        Ok(LeafProof {
            datum: datum.to_vec(),
            openings,
        })
    }
}

/// Mask source for one opening, seeded from everything the opening depends on.
fn opening_rng(query: &ProverQuery<'_>) -> ChaCha20Rng {
    let mut hasher = Sha256::new();
    hasher.update(OPENING_MASK_DOMAIN);
    hasher.update(query.commitment.to_bytes());
    hasher.update(fr_to_le_bytes(query.point));
    hasher.update(fr_to_le_bytes(query.result));
    hasher.update(fr_to_le_bytes(query.blinding));
    for coeff in query.poly {
        hasher.update(fr_to_le_bytes(*coeff));
    }
    ChaCha20Rng::from_seed(hasher.finalize().into())
}
