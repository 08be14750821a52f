//! This module defines the constants that fix the hashing domain, the commitment setup and the
//! range of supported tree shapes.
use ipa_multipoint::crs::CRS;
use once_cell::sync::{Lazy, OnceCell};

/// Domain tag mixed into every node hash (data blocks and commitments alike).
pub const DOMAIN_TAG: &str = "verkle";
/// Seed from which the commitment generators are derived. Every tree of the same width shares the
/// same setup, so a verifier can rebuild it from the width alone.
pub const CRS_SEED: &[u8] = b"verkle_tree_crs_v1";
/// Label that starts the Fiat-Shamir transcript of every opening proof.
pub const OPENING_TRANSCRIPT_LABEL: &[u8] = b"verkle_opening";
/// Smallest supported `log2` of the branch factor.
pub const MIN_EXPONENT: u32 = 1;
/// One past the largest `log2` of the branch factor: the width must fit in a `usize`.
pub const EXPONENT_LIMIT: u32 = usize::BITS;

/// One lazily derived setup per exponent.
static DEFAULT_CRS: Lazy<Vec<OnceCell<CRS>>> =
    Lazy::new(|| (0..EXPONENT_LIMIT).map(|_| OnceCell::new()).collect());

/// Whether `2^exponent` is a supported branch factor.
pub fn is_supported_exponent(exponent: u32) -> bool {
    (MIN_EXPONENT..EXPONENT_LIMIT).contains(&exponent)
}

/// Returns the shared setup for branch factor `2^exponent`, deriving it on first use.
///
/// # Panics
///
/// Panics if `exponent` is not below [`EXPONENT_LIMIT`].
pub fn default_crs(exponent: u32) -> &'static CRS {
    DEFAULT_CRS[exponent as usize].get_or_init(|| CRS::new(1 << exponent, CRS_SEED))
}
