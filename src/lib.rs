//! This crate implements a Verkle tree: a Merkle-style authenticated structure over a fixed
//! sequence of data blocks in which every internal node is a polynomial commitment instead of a
//! hash of its children.
//!
//! The tree has a branch factor of `2^exponent` and exactly `width^depth` leaves. Each internal
//! node interpolates the polynomial that takes the hash of its `i`-th child at `X = i + 1`, and
//! commits to it with a hiding Pedersen commitment over the Banderwagon group. The commitment
//! of the single node at the top is the root.
//!
//! A membership proof for one data block consists of the block plus one opening per level: an
//! inner-product argument showing that the node on the path evaluates to the hash of its child.
//! Since an opening is constant-size in the number of children, proofs stay small even for wide
//! trees, which is the point of a Verkle tree over a plain Merkle tree.
//!
//! The crate is split into:
//! - [`polynomial`]: evaluation, multiplication and Lagrange interpolation over the scalar field.
//! - [`tree`]: bottom-up construction of the commitment levels.
//! - [`proof`]: proof generation and verification.
//!
//! The group arithmetic lives in the `banderwagon` crate and the commitment scheme in the
//! `ipa-multipoint` crate of this workspace.

pub mod constant;
pub mod polynomial;
pub use polynomial::PolynomialError;
pub mod proof;
pub use proof::{verify, verify_strict, verify_with_crs, LeafProof, LevelOpening, QueryError};
pub mod tree;
pub use tree::{ConstructionError, VerkleTree};
pub mod types;
pub use types::*;

pub use banderwagon::{Element, Fr};
pub use ipa_multipoint::crs::CRS;

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    /// A simple end-to-end test demonstrating the complete workflow.
    fn basic_integration_test() -> Result<(), Box<dyn std::error::Error>> {
        let mut rng = StdRng::seed_from_u64(2024);

        // Alice commits to 16 data blocks with branch factor 4
        let blocks: Vec<String> = (0..16).map(|i| format!("block #{i}")).collect();
        let tree = VerkleTree::build(blocks, 2, &mut rng)?;
        assert_eq!(tree.depth(), 2);

        // She publishes the root and hands out a proof for block 9
        let root = tree.root();
        let proof = tree.request_proof(9)?;
        assert_eq!(proof.datum, b"block #9");

        // Bob verifies it against the published root alone
        assert!(verify(9, &proof.datum, &proof.openings, root));
        assert!(verify_strict(9, &proof.datum, &proof.openings, root));

        // A forged block does not
        assert!(!verify(9, b"block #10", &proof.openings, root));

        // Asking for a block that does not exist is an error, not a panic
        assert!(matches!(
            tree.request_proof(16),
            Err(QueryError::IndexOutOfRange { index: 16, len: 16 })
        ));

        Ok(())
    }
}
