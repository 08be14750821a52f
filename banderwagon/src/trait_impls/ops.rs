//! Group operators for [`Element`].
//!
//! Scalar multiplication takes an [`Fr`] on the right (`point * scalar`), which
//! is how commitments are written throughout the workspace:
//!
//! ```
//! # use banderwagon::{Element, Fr};
//! let g = Element::prime_subgroup_generator();
//! let commitment = g * Fr::from(3u64) + g * Fr::from(4u64);
//! assert_eq!(commitment, g * Fr::from(7u64));
//! ```
use crate::Element;
use ark_ed_on_bls12_381_bandersnatch::Fr;

use std::{
    hash::Hash,
    iter::Sum,
    ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign},
};

/// Scalar multiplication `k·P` in the Banderwagon group.
///
/// Every commitment in the workspace is a sum of such products, generator times coefficient.
impl Mul<Fr> for Element {
    type Output = Element;

    fn mul(self, rhs: Fr) -> Self::Output {
        Element(self.0 * rhs)
    }
}

/// Borrowed scalar multiplication, for loops over slices of generators and coefficients
/// where neither operand should be copied.
impl Mul<&Fr> for &Element {
    type Output = Element;

    fn mul(self, rhs: &Fr) -> Self::Output {
        Element(self.0 * rhs)
    }
}

/// Group addition.
///
/// The group is abelian, so `P + Q == Q + P`; this is what makes Pedersen commitments
/// additively homomorphic.
impl Add<Element> for Element {
    type Output = Element;

    fn add(self, rhs: Element) -> Self::Output {
        Element(self.0 + rhs.0)
    }
}

/// In-place group addition, used to accumulate the folded commitment during verification.
impl AddAssign<Element> for Element {
    fn add_assign(&mut self, rhs: Element) {
        self.0 += rhs.0
    }
}

/// Group subtraction, `self + (-rhs)`.
impl Sub<Element> for Element {
    type Output = Element;

    fn sub(self, rhs: Element) -> Self::Output {
        Element(self.0 - rhs.0)
    }
}

/// In-place group subtraction.
impl SubAssign<Element> for Element {
    fn sub_assign(&mut self, rhs: Element) {
        self.0 -= rhs.0
    }
}

/// Additive inverse: `P + (-P)` is the identity.
impl Neg for Element {
    type Output = Element;

    fn neg(self) -> Self::Output {
        Element(-self.0)
    }
}

/// Sums an iterator of elements.
///
/// The empty sum is the identity, so `.sum()` over no generators yields [`Element::zero`].
impl Sum for Element {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Element(iter.map(|element| element.0).sum())
    }
}

/// Hashes the canonical encoding from [`Element::to_bytes`].
///
/// Both representatives `(x, y)` and `(-x, -y)` of an element land in the same bucket, which
/// keeps `Hash` consistent with the quotient-group `PartialEq`. Elements can therefore key a
/// `HashMap` or `HashSet`.
impl Hash for Element {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.to_bytes().hash(state)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Element, Fr};

    #[test]
    fn group_laws() {
        let g = Element::prime_subgroup_generator();
        let p = g * Fr::from(11u64);
        let q = &g * &Fr::from(5u64);

        assert_eq!(p - q, g * Fr::from(6u64));
        assert_eq!(p + (-p), Element::zero());

        let mut acc = p;
        acc += q;
        acc -= g;
        assert_eq!(acc, g * Fr::from(15u64));

        let total: Element = vec![p, q, g].into_iter().sum();
        assert_eq!(total, g * Fr::from(17u64));
        assert!(std::iter::empty::<Element>().sum::<Element>().is_zero());
    }
}
