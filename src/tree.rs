//! Construction of the Verkle tree.
//!
//! The tree is built bottom-up, one level at a time. Every group of `2^exponent` consecutive
//! nodes is hashed into the scalar field, interpolated into the polynomial that takes the
//! `i`-th hash at `X = i + 1`, and committed with a fresh blinding factor. The commitments of one
//! level are the nodes of the next, until a single commitment (the root) is left.
//!
//! Each level keeps two parallel arrays indexed by slot: the public commitments, and the
//! prover-only polynomials and blinding factors needed to open them later.
use crate::{
    constant::{default_crs, is_supported_exponent, EXPONENT_LIMIT, MIN_EXPONENT},
    polynomial::{interpolate, PolynomialError},
    types::{Commitment, Node, Polynomial},
};
use banderwagon::{trait_defs::*, Fr};
use ipa_multipoint::crs::CRS;
use rand::{CryptoRng, RngCore};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, trace};

/// Error type for tree construction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    /// No data blocks were supplied.
    #[error("cannot build a tree without data blocks")]
    EmptyInput,
    /// The branch factor is below 2 or does not fit in a `usize`.
    #[error("exponent {0} is outside [{MIN_EXPONENT}, {EXPONENT_LIMIT})")]
    InvalidExponent(u32),
    /// The number of data blocks is not a positive power of the branch factor.
    #[error("{len} data blocks is not a positive power of the branch width {width}")]
    InvalidSize { len: usize, width: usize },
    /// Interpolating a node's polynomial failed.
    #[error(transparent)]
    Polynomial(#[from] PolynomialError),
}

/// The secrets behind one commitment. Never leaves the prover.
#[derive(Clone)]
pub(crate) struct NodeSecret {
    pub(crate) polynomial: Polynomial,
    pub(crate) blinding: Fr,
}

impl fmt::Debug for NodeSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeSecret")
            .field("degree", &self.polynomial.len().saturating_sub(1))
            .finish_non_exhaustive()
    }
}

/// All nodes of one level, addressed by slot.
#[derive(Debug, Clone)]
pub(crate) struct Level {
    commitments: Vec<Commitment>,
    secrets: Vec<NodeSecret>,
}

impl Level {
    pub(crate) fn commitments(&self) -> &[Commitment] {
        &self.commitments
    }

    /// The commitment at `slot` together with its secrets, if the slot exists.
    pub(crate) fn node(&self, slot: usize) -> Option<(&Commitment, &NodeSecret)> {
        Some((self.commitments.get(slot)?, self.secrets.get(slot)?))
    }
}

/// A Verkle tree over a fixed sequence of data blocks.
///
/// Built once by [`VerkleTree::build`] and immutable afterwards. Proofs are requested with
/// [`VerkleTree::request_proof`], which only reads the tree and may be called from several
/// threads at once.
#[derive(Debug, Clone)]
pub struct VerkleTree {
    exponent: u32,
    depth: usize,
    datablocks: Vec<Vec<u8>>,
    crs: &'static CRS,
    /// `levels[0]` commits to the data blocks, the last level holds only the root.
    levels: Vec<Level>,
}

/// Checks that `len` data blocks fill a tree of branch factor `2^exponent` and returns its
/// depth, i.e. the number of commitment levels above the data blocks.
pub fn tree_depth(len: usize, exponent: u32) -> Result<usize, ConstructionError> {
    if len == 0 {
        return Err(ConstructionError::EmptyInput);
    }
    if !is_supported_exponent(exponent) {
        return Err(ConstructionError::InvalidExponent(exponent));
    }

    let bits = len.trailing_zeros();
    if !len.is_power_of_two() || bits == 0 || bits % exponent != 0 {
        return Err(ConstructionError::InvalidSize {
            len,
            width: 1 << exponent,
        });
    }

    Ok((bits / exponent) as usize)
}

impl VerkleTree {
    /// Builds the tree over `datablocks` with branch factor `2^exponent`.
    ///
    /// Blinding factors are drawn from `rng`, level by level in slot order, so a seeded `rng`
    /// reproduces the same tree regardless of how many threads do the work.
    pub fn build<I, B, R>(
        datablocks: I,
        exponent: u32,
        rng: &mut R,
    ) -> Result<Self, ConstructionError>
    where
        I: IntoIterator<Item = B>,
        B: Into<Vec<u8>>,
        R: RngCore + CryptoRng,
    {
        let datablocks: Vec<Vec<u8>> = datablocks.into_iter().map(Into::into).collect();
        let depth = tree_depth(datablocks.len(), exponent)?;
        let width = 1usize << exponent;
        let crs = default_crs(exponent);

        info!(leaves = datablocks.len(), width, depth, "building verkle tree");

        let mut levels: Vec<Level> = Vec::with_capacity(depth);
        let leaves: Vec<Node<'_>> = datablocks.iter().map(|d| Node::Leaf(d.as_slice())).collect();
        let mut hashes = hash_nodes(&leaves);

        for height in 1..=depth {
            let level = commit_level(&hashes, width, crs, rng)?;

            debug!(level = height, nodes = level.commitments.len(), "committed level");
            trace!(
                level = height,
                commitments = ?level
                    .commitments
                    .iter()
                    .map(|c| hex::encode(c.to_bytes()))
                    .collect::<Vec<_>>(),
                "level commitments"
            );

            hashes = hash_nodes(
                &level
                    .commitments
                    .iter()
                    .map(Node::Internal)
                    .collect::<Vec<_>>(),
            );
            levels.push(level);
        }
        debug_assert_eq!(levels.last().map(|l| l.commitments.len()), Some(1));

        let tree = VerkleTree {
            exponent,
            depth,
            datablocks,
            crs,
            levels,
        };
        info!(root = %hex::encode(tree.root().to_bytes()), "verkle tree built");

        Ok(tree)
    }

    /// [`VerkleTree::build`], returning the root alongside the tree.
    pub fn build_root<I, B, R>(
        datablocks: I,
        exponent: u32,
        rng: &mut R,
    ) -> Result<(Self, Commitment), ConstructionError>
    where
        I: IntoIterator<Item = B>,
        B: Into<Vec<u8>>,
        R: RngCore + CryptoRng,
    {
        let tree = Self::build(datablocks, exponent, rng)?;
        let root = tree.root();
        Ok((tree, root))
    }

    /// `log2` of the branch factor.
    pub fn exponent(&self) -> u32 {
        self.exponent
    }

    /// Branch factor.
    pub fn width(&self) -> usize {
        1 << self.exponent
    }

    /// Number of commitment levels above the data blocks.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of data blocks.
    pub fn len(&self) -> usize {
        self.datablocks.len()
    }

    /// Always `false`: construction rejects empty input.
    pub fn is_empty(&self) -> bool {
        self.datablocks.is_empty()
    }

    pub fn datablocks(&self) -> &[Vec<u8>] {
        &self.datablocks
    }

    pub fn datum(&self, index: usize) -> Option<&[u8]> {
        self.datablocks.get(index).map(Vec::as_slice)
    }

    /// The commitment setup shared by every node of this tree.
    pub fn crs(&self) -> &CRS {
        self.crs
    }

    /// The root commitment.
    pub fn root(&self) -> Commitment {
        // The last level holds exactly one commitment
        self.levels[self.depth - 1].commitments[0]
    }

    /// Public commitments of level `level`, where level 0 sits directly above the data blocks
    /// and level `depth - 1` is the root.
    pub fn commitments(&self, level: usize) -> Option<&[Commitment]> {
        self.levels.get(level).map(Level::commitments)
    }

    pub(crate) fn levels(&self) -> &[Level] {
        &self.levels
    }
}

/// Hashes every node of a level into the scalar field.
fn hash_nodes(nodes: &[Node<'_>]) -> Vec<Fr> {
    #[cfg(feature = "parallel")]
    let iter = nodes.par_iter();
    #[cfg(not(feature = "parallel"))]
    let iter = nodes.iter();

    iter.map(Node::hash_to_scalar).collect()
}

/// Interpolates and commits every group of `width` hashes.
fn commit_level<R: RngCore + CryptoRng>(
    hashes: &[Fr],
    width: usize,
    crs: &CRS,
    rng: &mut R,
) -> Result<Level, ConstructionError> {
    // Sampled up front and in order, so the workers below never touch the rng
    let blindings: Vec<Fr> = (0..hashes.len() / width).map(|_| Fr::rand(rng)).collect();

    #[cfg(feature = "parallel")]
    let groups = hashes.par_chunks(width).zip(blindings.par_iter());
    #[cfg(not(feature = "parallel"))]
    let groups = hashes.chunks(width).zip(blindings.iter());

    let nodes = groups
        .map(|(group, blinding)| -> Result<(Commitment, NodeSecret), PolynomialError> {
            let coords: Vec<(Fr, Fr)> = group
                .iter()
                .enumerate()
                .map(|(slot, hash)| (Fr::from(slot as u64 + 1), *hash))
                .collect();
            let polynomial = interpolate(&coords)?;
            let commitment = crs.commit(&polynomial, *blinding);

            Ok((
                commitment,
                NodeSecret {
                    polynomial,
                    blinding: *blinding,
                },
            ))
        })
        .collect::<Result<Vec<_>, PolynomialError>>()?;

    let (commitments, secrets) = nodes.into_iter().unzip();
    Ok(Level {
        commitments,
        secrets,
    })
}
