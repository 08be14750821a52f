use ark_ec::{twisted_edwards::TECurveConfig, PrimeGroup, ScalarMul, VariableBaseMSM};
use ark_ed_on_bls12_381_bandersnatch::{BandersnatchConfig, EdwardsAffine, EdwardsProjective, Fq};
use ark_ff::{Field, One, PrimeField, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};

pub use ark_ed_on_bls12_381_bandersnatch::Fr;

/// A Banderwagon group element. Commitments and CRS generators are all of
/// this type.
#[derive(Debug, Clone, Copy, Eq)]
pub struct Element(pub(crate) EdwardsProjective);

impl PartialEq for Element {
    /// Equality in the quotient group: `(x, y)` and `(-x, -y)` are the same
    /// element, so compare `x₁·y₂` with `x₂·y₁` instead of the coordinates.
    ///
    /// Both sides must be valid Banderwagon elements (the point at infinity,
    /// with `y = 0`, never passes the subgroup check).
    fn eq(&self, other: &Self) -> bool {
        (self.0.x * other.0.y) == (other.0.x * self.0.y)
    }
}

impl Element {
    /// Size in bytes of the canonical encoding produced by [`Element::to_bytes`].
    pub const fn compressed_serialized_size() -> usize {
        32
    }

    /// Canonical 32-byte big-endian encoding `sign(y)·x`.
    ///
    /// Both representatives of an element map to the same bytes, which makes
    /// this encoding suitable for hashing commitments into the scalar field.
    ///
    /// # Encoding
    ///
    /// - If `y` is positive (the lexicographically larger root), write `x`.
    /// - Otherwise write `-x`.
    ///
    /// Since `sign(-y)·(-x) = sign(y)·x`, the two points of an equivalence
    /// class agree.
    ///
    /// # Panics
    ///
    /// Panics if arkworks fails to write a base field element into 32 bytes,
    /// which cannot happen for a valid element.
    pub fn to_bytes(&self) -> [u8; 32] {
        let affine = EdwardsAffine::from(self.0);
        let x = if is_positive(affine.y) {
            affine.x
        } else {
            -affine.x
        };
        let mut bytes = [0u8; 32];
        x.serialize_compressed(&mut bytes[..])
            .expect("serialization failed");

        // arkworks writes little endian
        bytes.reverse();
        bytes
    }

    /// Decodes the output of [`Element::to_bytes`].
    ///
    /// # Decoding
    ///
    /// 1. Read the bytes as the x-coordinate.
    /// 2. Recover the point with the positive y-coordinate.
    /// 3. Check membership in the prime-order subgroup.
    ///
    /// # Returns
    ///
    /// `None` when the bytes are not a canonical field element, when no curve
    /// point has that x-coordinate, or when the point falls outside the
    /// subgroup.
    ///
    /// # Security
    ///
    /// This is the validating path and the one to use on untrusted input,
    /// e.g. commitments inside a deserialized proof.
    pub fn from_bytes(mut bytes: [u8; 32]) -> Option<Element> {
        bytes.reverse();

        let x = Fq::deserialize_compressed(&bytes[..]).ok()?;
        let point = Self::get_point_from_x(x, true)?;

        if !subgroup_check(&point) {
            return None;
        }

        Some(Element(point))
    }

    /// The fixed generator of the prime-order subgroup.
    pub fn prime_subgroup_generator() -> Element {
        Element(EdwardsProjective::generator())
    }

    /// The group identity, i.e. the commitment to the empty vector with no blinding.
    pub fn zero() -> Element {
        Element(EdwardsProjective::zero())
    }

    pub fn is_zero(&self) -> bool {
        *self == Element::zero()
    }

    /// Reconstructs a point on the Bandersnatch curve from its x-coordinate.
    ///
    /// Solving the curve equation `ax² + y² = 1 + dx²y²` for `y` gives
    /// `y² = (1 - ax²) / (1 - dx²)`, with `a` and `d` taken from
    /// [`BandersnatchConfig`].
    ///
    /// # Parameters
    ///
    /// - `x`: the x-coordinate
    /// - `choose_largest`: pick the lexicographically larger root if `true`,
    ///   the smaller one otherwise
    ///
    /// # Returns
    ///
    /// `None` if `y²` is not a square, i.e. no point has this x-coordinate.
    ///
    /// The result is on the curve but not necessarily in the subgroup; the
    /// caller runs [`subgroup_check`] when it matters.
    fn get_point_from_x(x: Fq, choose_largest: bool) -> Option<EdwardsProjective> {
        let x_sq = x.square();
        let y_squared = (BandersnatchConfig::COEFF_A * x_sq - Fq::one())
            / (BandersnatchConfig::COEFF_D * x_sq - Fq::one());

        let y = y_squared.sqrt()?;
        let y = if is_positive(y) == choose_largest {
            y
        } else {
            -y
        };

        Some(EdwardsAffine::new_unchecked(x, y).into())
    }
}

// The lexicographically largest value is the positive one
fn is_positive(coordinate: Fq) -> bool {
    coordinate > -coordinate
}

/// Subgroup membership for a point already on the curve: `1 - ax²` must be a
/// quadratic residue.
///
/// Points that pass are exactly the ones Banderwagon keeps; in particular the
/// points with `y = 0` are excluded, which the quotient equality relies on.
fn subgroup_check(point: &EdwardsProjective) -> bool {
    (Fq::one() - BandersnatchConfig::COEFF_A * point.x.square())
        .legendre()
        .is_qr()
}

/// Maps arbitrary bytes (typically a hash output) to a group element, or
/// `None` if the reduced x-coordinate is not the encoding of a valid element.
///
/// Used to derive generators with no known discrete-log relation.
pub fn try_reduce_to_element(bytes: &[u8]) -> Option<Element> {
    // from_bytes expects a canonical encoding, so reduce first
    let x = Fq::from_be_bytes_mod_order(bytes);
    let mut encoded = [0u8; 32];
    x.serialize_compressed(&mut encoded[..]).ok()?;
    encoded.reverse();
    Element::from_bytes(encoded)
}

/// `Σ scalarsᵢ · basesᵢ`.
///
/// # Panics
///
/// Panics if the two slices differ in length.
pub fn multi_scalar_mul(bases: &[Element], scalars: &[Fr]) -> Element {
    assert_eq!(
        bases.len(),
        scalars.len(),
        "number of bases should equal number of scalars"
    );
    let bases_inner: Vec<_> = bases.iter().map(|element| element.0).collect();
    let bases = EdwardsProjective::batch_convert_to_mul_base(&bases_inner);

    let result = EdwardsProjective::msm(&bases, scalars)
        .expect("number of bases should equal number of scalars");

    Element(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ec::AdditiveGroup;

    #[test]
    fn fixed_test_vectors() {
        let expected = [
            "4a2c7486fd924882bf02c6908de395122843e3e05264d7991e18e7985dad51e9",
            "43aa74ef706605705989e8fd38df46873b7eae5921fbed115ac9d937399ce4d5",
            "5e5f550494159f38aa54d2ed7f11a7e93e4968617990445cc93ac8e59808c126",
            "0e7e3748db7c5c999a7bcd93d71d671f1f40090423792266f94cb27ca43fce5c",
        ];

        let mut point = Element::prime_subgroup_generator();
        for (i, hex_point) in expected.iter().enumerate() {
            assert_eq!(hex::encode(point.to_bytes()), *hex_point, "index {i}");
            point = Element(point.0.double());
        }
    }

    #[test]
    fn encoding_roundtrip_ignores_torsion() {
        // (0, -1) is the two-torsion point identified away by the quotient
        let two_torsion =
            EdwardsProjective::new_unchecked(Fq::zero(), -Fq::one(), Fq::zero(), Fq::one());
        let element = Element::prime_subgroup_generator() * Fr::from(7u64);
        let shifted = Element(element.0 + two_torsion);

        assert_eq!(element.to_bytes(), shifted.to_bytes());
        let decoded = Element::from_bytes(element.to_bytes()).expect("valid element");
        assert_eq!(decoded, element);
        assert_eq!(decoded, shifted);
    }

    #[test]
    fn reduce_is_deterministic() {
        let found: Vec<_> = (0u8..32)
            .filter_map(|i| try_reduce_to_element(&[i; 32]))
            .collect();
        assert!(!found.is_empty());

        let again: Vec<_> = (0u8..32)
            .filter_map(|i| try_reduce_to_element(&[i; 32]))
            .collect();
        assert_eq!(found, again);
    }

    #[test]
    fn msm_matches_naive_sum() {
        let g = Element::prime_subgroup_generator();
        let bases = [g, g * Fr::from(2u64), g * Fr::from(3u64)];
        let scalars = [Fr::from(5u64), Fr::from(6u64), Fr::from(7u64)];

        // 5 + 12 + 21
        assert_eq!(multi_scalar_mul(&bases, &scalars), g * Fr::from(38u64));
    }
}
