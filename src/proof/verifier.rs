//! Verifier for leaf membership proofs
use crate::{
    proof::{crs_for_openings, LevelOpening},
    types::{Commitment, Node},
};
use banderwagon::Fr;
use ipa_multipoint::crs::CRS;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::debug;

/// Verifies a membership proof against `root`, deriving the commitment setup from the width of
/// the openings.
///
/// Accepts iff the chain is non-empty, the first opening evaluates to the hash of `datum`, the
/// last opening is against `root`, and every opening proof verifies on its own. `index` is not
/// checked against the evaluation points and consecutive openings are not linked; use
/// [`verify_strict`] for that.
pub fn verify(index: usize, datum: &[u8], openings: &[LevelOpening], root: Commitment) -> bool {
    match crs_for_openings(openings) {
        Some(crs) => verify_with_crs(crs, index, datum, openings, root),
        None => {
            debug!(index, "rejecting proof: empty chain or unsupported width");
            false
        }
    }
}

/// [`verify`] against an explicit commitment setup.
pub fn verify_with_crs(
    crs: &CRS,
    index: usize,
    datum: &[u8],
    openings: &[LevelOpening],
    root: Commitment,
) -> bool {
    let (Some(first), Some(last)) = (openings.first(), openings.last()) else {
        debug!(index, "rejecting proof: no openings");
        return false;
    };

    if first.result != Node::Leaf(datum).hash_to_scalar() {
        debug!(index, "rejecting proof: datum does not match the first opening");
        return false;
    }
    if last.commitment != root {
        debug!(index, "rejecting proof: last opening is not against the root");
        return false;
    }

    #[cfg(feature = "parallel")]
    let all_open = openings.par_iter().all(|o| o.verify_opening(crs));
    #[cfg(not(feature = "parallel"))]
    let all_open = openings.iter().all(|o| o.verify_opening(crs));

    if !all_open {
        debug!(index, "rejecting proof: an opening does not verify");
    }
    all_open
}

/// [`verify`], plus the checks that bind the chain to one path of one tree.
///
/// Additionally requires that every opening has the same width, that the chain is long enough
/// to address `index`, that each evaluation point is the slot of the path at that level, and
/// that each opening's result is the hash of the commitment opened one level below.
pub fn verify_strict(
    index: usize,
    datum: &[u8],
    openings: &[LevelOpening],
    root: Commitment,
) -> bool {
    let Some(crs) = crs_for_openings(openings) else {
        debug!(index, "rejecting proof: empty chain or unsupported width");
        return false;
    };
    let width = crs.n;

    if openings.iter().any(|o| o.width() != width) {
        debug!(index, "rejecting proof: openings of mixed width");
        return false;
    }

    // A chain of `depth` openings addresses `width^depth` leaves
    let depth = u32::try_from(openings.len()).unwrap_or(u32::MAX);
    if width.checked_pow(depth).is_some_and(|leaves| index >= leaves) {
        debug!(index, depth, "rejecting proof: index beyond the tree");
        return false;
    }

    let mut slot = index;
    for (level, opening) in openings.iter().enumerate() {
        if opening.point != Fr::from((slot % width) as u64 + 1) {
            debug!(index, level, "rejecting proof: evaluation point off the path");
            return false;
        }
        slot /= width;
    }

    let linked = openings
        .windows(2)
        .all(|pair| pair[1].result == Node::Internal(&pair[0].commitment).hash_to_scalar());
    if !linked {
        debug!(index, "rejecting proof: consecutive openings are not linked");
        return false;
    }

    verify_with_crs(crs, index, datum, openings, root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{constant::default_crs, proof::LeafProof, tree::VerkleTree};
    use rand::{rngs::StdRng, SeedableRng};

    fn four_leaf_tree() -> VerkleTree {
        let mut rng = StdRng::seed_from_u64(42);
        VerkleTree::build(["a", "b", "c", "d"], 1, &mut rng).unwrap()
    }

    #[test]
    fn honest_proofs_verify() {
        let mut rng = StdRng::seed_from_u64(9);
        let blocks: Vec<String> = (0..16).map(|i| format!("entry {i}")).collect();
        let tree = VerkleTree::build(blocks.clone(), 2, &mut rng).unwrap();

        for (index, block) in blocks.iter().enumerate() {
            let LeafProof { datum, openings } = tree.request_proof(index).unwrap();
            assert_eq!(datum, block.as_bytes());
            assert!(verify(index, &datum, &openings, tree.root()));
            assert!(verify_strict(index, &datum, &openings, tree.root()));
            assert!(verify_with_crs(tree.crs(), index, &datum, &openings, tree.root()));
        }
    }

    #[test]
    fn tampered_datum_is_rejected() {
        let tree = four_leaf_tree();
        let proof = tree.request_proof(0).unwrap();

        assert!(verify(0, b"a", &proof.openings, tree.root()));
        assert!(!verify(0, b"X", &proof.openings, tree.root()));
        assert!(!verify_strict(0, b"X", &proof.openings, tree.root()));
    }

    #[test]
    fn wrong_root_is_rejected() {
        let tree = four_leaf_tree();
        let proof = tree.request_proof(0).unwrap();
        let other_root = tree.commitments(0).unwrap()[0];

        assert!(!verify(0, &proof.datum, &proof.openings, other_root));
    }

    #[test]
    fn tampered_result_is_rejected() {
        let tree = four_leaf_tree();
        let mut proof = tree.request_proof(3).unwrap();

        proof.openings[1].result += Fr::from(1u64);
        assert!(!verify(3, &proof.datum, &proof.openings, tree.root()));
    }

    #[test]
    fn tampered_point_is_rejected() {
        let tree = four_leaf_tree();
        let mut proof = tree.request_proof(1).unwrap();

        proof.openings[0].point = Fr::from(1u64);
        assert!(!verify(1, &proof.datum, &proof.openings, tree.root()));
    }

    #[test]
    fn empty_chain_is_rejected() {
        let tree = four_leaf_tree();

        assert!(!verify(0, b"a", &[], tree.root()));
        assert!(!verify_strict(0, b"a", &[], tree.root()));
        assert!(!verify_with_crs(default_crs(1), 0, b"a", &[], tree.root()));
    }

    #[test]
    fn wrong_crs_is_rejected() {
        let tree = four_leaf_tree();
        let proof = tree.request_proof(0).unwrap();

        assert!(!verify_with_crs(
            default_crs(2),
            0,
            &proof.datum,
            &proof.openings,
            tree.root()
        ));
    }

    #[test]
    fn strict_mode_binds_index_and_chain() {
        let tree = four_leaf_tree();
        let proof_c = tree.request_proof(2).unwrap();
        let proof_a = tree.request_proof(0).unwrap();

        // The datum's parent opening glued under an unrelated root opening
        let spliced = vec![proof_c.openings[0].clone(), proof_a.openings[1].clone()];
        assert!(verify(2, b"c", &spliced, tree.root()));
        assert!(!verify_strict(2, b"c", &spliced, tree.root()));

        // An honest proof presented for another index
        assert!(verify(3, &proof_c.datum, &proof_c.openings, tree.root()));
        assert!(!verify_strict(3, &proof_c.datum, &proof_c.openings, tree.root()));

        // An index the chain cannot reach
        assert!(!verify_strict(6, &proof_c.datum, &proof_c.openings, tree.root()));
    }
}
