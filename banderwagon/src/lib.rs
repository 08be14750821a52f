//! Banderwagon: the prime-order quotient of the Bandersnatch curve, together
//! with the scalar field helpers used by the commitment layer.
//!
//! Points `(x, y)` and `(-x, -y)` are identified, which removes the cofactor
//! and gives a group of prime order whose scalar field is the Bandersnatch
//! scalar field [`Fr`].

pub mod element;
pub mod hash;
mod trait_impls;

pub use element::{multi_scalar_mul, try_reduce_to_element, Element, Fr};
pub use hash::hash_to_scalar;
pub use trait_defs::*;

/// Field and serialization traits that callers need in scope to do arithmetic
/// on [`Fr`] without depending on arkworks directly.
pub mod trait_defs {
    pub use ark_ff::{batch_inversion, AdditiveGroup, Field, One, PrimeField, Zero};
    pub use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
    pub use ark_std::UniformRand;
}
