//! Polynomial algebra over the Bandersnatch scalar field.
//!
//! Polynomials are plain coefficient vectors, lowest degree first. Everything
//! here is quadratic in the number of coefficients; the tree only ever works
//! with polynomials of its branch width.
use crate::types::Polynomial;
use banderwagon::{trait_defs::*, Fr};
use ipa_multipoint::math_utils::{inner_product, powers_of};
use thiserror::Error;

/// Error type for polynomial algebra.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PolynomialError {
    /// Two interpolation points share an x-coordinate.
    #[error("interpolation points {first} and {second} share the same x-coordinate")]
    DuplicateCoordinate { first: usize, second: usize },
    /// Zero has no inverse.
    #[error("attempted to invert zero")]
    InversionFailure,
}

/// `[x⁰, x¹, …, x^degree]`
pub fn powers(x: Fr, degree: usize) -> Vec<Fr> {
    powers_of(x, degree + 1)
}

/// Evaluates `coeffs` at `x`. The empty polynomial is zero everywhere.
pub fn evaluate(x: Fr, coeffs: &[Fr]) -> Fr {
    if coeffs.is_empty() {
        return Fr::zero();
    }
    inner_product(&powers(x, coeffs.len() - 1), coeffs)
}

/// Schoolbook product of two polynomials. The result has
/// `a.len() + b.len() - 1` coefficients, or none if either input is empty.
pub fn multiply(a: &[Fr], b: &[Fr]) -> Polynomial {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }

    let mut product = vec![Fr::zero(); a.len() + b.len() - 1];
    for (i, a_i) in a.iter().enumerate() {
        for (j, b_j) in b.iter().enumerate() {
            product[i + j] += *a_i * b_j;
        }
    }
    product
}

/// Field inverse that reports zero instead of panicking.
pub fn invert(x: Fr) -> Result<Fr, PolynomialError> {
    x.inverse().ok_or(PolynomialError::InversionFailure)
}

/// Lagrange interpolation.
///
/// Returns the unique polynomial with exactly `coords.len()` coefficients
/// that passes through every `(x, y)` in `coords`. Fails with
/// [`PolynomialError::DuplicateCoordinate`] if two points share an `x`.
pub fn interpolate(coords: &[(Fr, Fr)]) -> Result<Polynomial, PolynomialError> {
    let n = coords.len();

    // ∏_j (X - x_j), n + 1 coefficients
    let vanishing = coords
        .iter()
        .fold(vec![Fr::one()], |acc, (x_j, _)| multiply(&acc, &[-*x_j, Fr::one()]));

    let mut poly = vec![Fr::zero(); n];
    for (i, (x_i, y_i)) in coords.iter().enumerate() {
        let denominator: Fr = coords
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, (x_j, _))| *x_i - x_j)
            .product();
        let scale = invert(denominator).map_err(|_| duplicate_of(coords, i))? * y_i;

        // Synthetic division of the vanishing polynomial by (X - x_i), highest degree first
        let mut quotient = Fr::zero();
        for k in (0..n).rev() {
            quotient = vanishing[k + 1] + quotient * x_i;
            poly[k] += quotient * scale;
        }
    }

    Ok(poly)
}

/// The error for a point `i` whose `x` repeats elsewhere in `coords`.
fn duplicate_of(coords: &[(Fr, Fr)], i: usize) -> PolynomialError {
    let j = (0..coords.len())
        .find(|&j| j != i && coords[j].0 == coords[i].0)
        .unwrap_or(i);
    PolynomialError::DuplicateCoordinate {
        first: i.min(j),
        second: i.max(j),
    }
}
