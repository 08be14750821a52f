//! Common Reference String (CRS) for Pedersen vector commitments.
//!
//! The CRS consists of:
//! - `n` value-binding generators `G` for the polynomial coefficients
//! - a blinding generator `H` that hides the committed vector
//! - an inner-product generator `Q` used only inside opening proofs
//!
//! All points are derived from a seed by hashing to the curve, so anyone can
//! rebuild the same setup from `(n, seed)` and no discrete-log relation
//! between the points is known.

use banderwagon::{multi_scalar_mul, try_reduce_to_element, Element, Fr};

#[allow(non_snake_case)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CRS {
    /// Capacity: the longest vector this CRS can commit to. Always a power of two.
    pub n: usize,
    /// An array of `n` value-binding generators.
    pub G: Vec<Element>,
    /// Blinding generator.
    pub H: Element,
    /// Inner-product generator.
    pub Q: Element,
}

impl CRS {
    /// Derives a CRS of capacity `n` from `seed`.
    ///
    /// # Panics
    ///
    /// Panics if `n` is not a power of two, or if the derivation ever yields a
    /// repeated point (which would break binding).
    #[allow(non_snake_case)]
    pub fn new(n: usize, seed: &[u8]) -> CRS {
        assert!(n.is_power_of_two(), "crs capacity must be a power of two");

        // n for G, then H, then Q
        let mut points = generate_random_elements(n + 2, seed);
        CRS::assert_dedup(&points);

        let Q = points.pop().expect("n + 2 points were generated");
        let H = points.pop().expect("n + 2 points were generated");
        let G = points;

        CRS { n, G, H, Q }
    }

    pub fn max_number_of_elements(&self) -> usize {
        self.n
    }

    fn assert_dedup(points: &[Element]) {
        use std::collections::HashSet;
        let mut seen = HashSet::new();
        for point in points {
            let value_is_new = seen.insert(point.to_bytes());
            assert!(value_is_new, "crs has duplicated points")
        }
    }

    /// Pedersen commitment to a coefficient vector:
    /// `Σ coeffsᵢ·Gᵢ + blinding·H`.
    ///
    /// Vectors shorter than `n` use a prefix of `G`.
    ///
    /// # Panics
    ///
    /// Panics if `coeffs` is longer than the CRS capacity.
    pub fn commit(&self, coeffs: &[Fr], blinding: Fr) -> Element {
        assert!(
            coeffs.len() <= self.n,
            "vector of length {} does not fit a crs of capacity {}",
            coeffs.len(),
            self.n
        );
        multi_scalar_mul(&self.G[..coeffs.len()], coeffs) + self.H * blinding
    }
}

impl std::ops::Index<usize> for CRS {
    type Output = Element;

    fn index(&self, index: usize) -> &Self::Output {
        &self.G[index]
    }
}

/// Hashes `seed ‖ be64(counter)` for increasing counters and keeps every digest
/// that decodes to a valid group element, until `num_required_points` are found.
fn generate_random_elements(num_required_points: usize, seed: &[u8]) -> Vec<Element> {
    use sha2::{Digest, Sha256};

    let hash_to_x = |index: u64| -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(seed);
        hasher.update(index.to_be_bytes());
        hasher.finalize().to_vec()
    };

    (0u64..)
        .map(hash_to_x)
        .filter_map(|hash_bytes| try_reduce_to_element(&hash_bytes))
        .take(num_required_points)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use banderwagon::trait_defs::*;

    #[test]
    fn crs_is_deterministic_per_seed() {
        let crs = CRS::new(8, b"verkle_test_seed");
        assert_eq!(crs.G.len(), 8);
        assert_eq!(crs, CRS::new(8, b"verkle_test_seed"));
        assert_ne!(crs, CRS::new(8, b"another_seed"));
        assert_ne!(crs.H, crs.Q);
    }

    #[test]
    fn smaller_crs_is_a_prefix() {
        // Same seed, same point stream: the only difference is where H and Q are cut
        let small = CRS::new(4, b"verkle_test_seed");
        let large = CRS::new(8, b"verkle_test_seed");
        assert_eq!(small.G[..], large.G[..4]);
    }

    #[test]
    #[should_panic(expected = "power of two")]
    fn rejects_non_power_of_two() {
        CRS::new(6, b"verkle_test_seed");
    }

    #[test]
    fn commitment_is_homomorphic() {
        let crs = CRS::new(4, b"verkle_test_seed");
        let a = [Fr::from(1u64), Fr::from(2u64), Fr::from(3u64), Fr::from(4u64)];
        let b = [Fr::from(9u64), Fr::zero(), Fr::from(7u64), Fr::one()];
        let sum: Vec<Fr> = a.iter().zip(&b).map(|(x, y)| *x + *y).collect();

        let (r, s) = (Fr::from(100u64), Fr::from(200u64));
        assert_eq!(
            crs.commit(&a, r) + crs.commit(&b, s),
            crs.commit(&sum, r + s)
        );
        assert_eq!(crs.commit(&a[..2], Fr::zero()), crs[0] + crs[1] * Fr::from(2u64));
    }

    #[test]
    fn blinding_hides_the_vector() {
        let crs = CRS::new(2, b"verkle_test_seed");
        let coeffs = [Fr::from(5u64), Fr::from(6u64)];
        assert_ne!(
            crs.commit(&coeffs, Fr::from(1u64)),
            crs.commit(&coeffs, Fr::from(2u64))
        );
    }
}
