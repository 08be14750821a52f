//! Domain-separated hashing into the scalar field.

use crate::Fr;
use ark_ff::PrimeField;
use sha2::{Digest, Sha256};

/// Hashes `bytes` under the label `domain` and reduces the digest into [`Fr`].
///
/// The label is length-prefixed, so `("ab", "c")` and `("a", "bc")` never
/// collide.
pub fn hash_to_scalar(domain: &str, bytes: &[u8]) -> Fr {
    let mut hasher = Sha256::new();
    hasher.update((domain.len() as u64).to_be_bytes());
    hasher.update(domain.as_bytes());
    hasher.update(bytes);
    Fr::from_le_bytes_mod_order(&hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_separation() {
        let a = hash_to_scalar("verkle", b"data");
        assert_eq!(a, hash_to_scalar("verkle", b"data"));
        assert_ne!(a, hash_to_scalar("other", b"data"));
        assert_ne!(hash_to_scalar("ab", b"c"), hash_to_scalar("a", b"bc"));
    }
}
