//! Hiding inner-product argument for a single polynomial opening.
//!
//! The commitment is `C = ⟨a, G⟩ + r·H` over the coefficient vector `a`.
//! Opening at `x` to `v` is the statement `⟨a, b⟩ = v` with
//! `b = [1, x, …, x^(n-1)]`. Each halving round sends blinded cross terms
//! `L`, `R`; the final length-one statement is closed with a Schnorr-style
//! proof of knowledge so the last coefficient and blinding stay hidden.
#![allow(non_snake_case)]

use crate::{
    crs::CRS,
    math_utils::{folding_scalars, inner_product, powers_of},
    transcript::{Transcript, TranscriptProtocol},
};
use banderwagon::{multi_scalar_mul, trait_defs::*, Element, Fr};
use rand::{CryptoRng, RngCore};

/// Prover side of an opening: the public statement plus the secrets behind
/// the commitment.
#[derive(Clone, Debug)]
pub struct ProverQuery<'a> {
    pub commitment: Element,
    /// Coefficients, lowest degree first.
    pub poly: &'a [Fr],
    pub blinding: Fr,
    // Given a function f, we use z to denote the input point and y the output, ie f(z) = y
    pub point: Fr,
    pub result: Fr,
}

impl From<&ProverQuery<'_>> for VerifierQuery {
    fn from(pq: &ProverQuery<'_>) -> Self {
        VerifierQuery {
            commitment: pq.commitment,
            point: pq.point,
            result: pq.result,
        }
    }
}

/// The public statement "the vector committed in `commitment` evaluates to
/// `result` at `point`".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifierQuery {
    pub commitment: Element,
    pub point: Fr,
    pub result: Fr,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IPAProof {
    pub(crate) L_vec: Vec<Element>,
    pub(crate) R_vec: Vec<Element>,
    /// Commitment to the masks of the final Schnorr step.
    pub(crate) blind_commitment: Element,
    /// Masked final coefficient.
    pub(crate) z_coeff: Fr,
    /// Masked final blinding.
    pub(crate) z_blinding: Fr,
}

/// Absorbs the statement and derives the inner-product generator `U = w·Q`.
fn bind_statement(transcript: &mut Transcript, crs: &CRS, query: &VerifierQuery) -> Element {
    transcript.domain_sep(b"ipa");
    transcript.append_point(b"C", &query.commitment);
    transcript.append_scalar(b"input point", &query.point);
    transcript.append_scalar(b"output point", &query.result);

    let w = transcript.challenge_scalar(b"w");
    crs.Q * w
}

/// Creates an opening proof for `query`.
///
/// The polynomial may be shorter than the CRS; it is zero-padded. The masks
/// are drawn from `rng`, so a deterministic `rng` yields a deterministic proof.
///
/// Returns `None` only if a Fiat–Shamir challenge is zero and cannot be
/// inverted.
///
/// # Panics
///
/// Panics if the polynomial is longer than the CRS capacity.
pub fn create<R: RngCore + CryptoRng>(
    transcript: &mut Transcript,
    crs: &CRS,
    query: &ProverQuery<'_>,
    rng: &mut R,
) -> Option<IPAProof> {
    let n = crs.n;
    assert!(
        query.poly.len() <= n,
        "polynomial of length {} does not fit a crs of capacity {n}",
        query.poly.len()
    );

    let U = bind_statement(transcript, crs, &VerifierQuery::from(query));

    let mut a = query.poly.to_vec();
    a.resize(n, Fr::zero());
    let mut b = powers_of(query.point, n);
    let mut G = crs.G.clone();
    let mut blinding = query.blinding;

    let num_rounds = n.trailing_zeros() as usize;
    let mut L_vec = Vec::with_capacity(num_rounds);
    let mut R_vec = Vec::with_capacity(num_rounds);

    while a.len() > 1 {
        let half = a.len() / 2;
        let (a_L, a_R) = a.split_at(half);
        let (b_L, b_R) = b.split_at(half);
        let (G_L, G_R) = G.split_at(half);

        let l_blind = Fr::rand(rng);
        let r_blind = Fr::rand(rng);

        let L = cross_term(G_R, a_L, U, inner_product(a_L, b_R), crs.H, l_blind);
        let R = cross_term(G_L, a_R, U, inner_product(a_R, b_L), crs.H, r_blind);

        transcript.append_point(b"L", &L);
        transcript.append_point(b"R", &R);
        L_vec.push(L);
        R_vec.push(R);

        let u = transcript.challenge_scalar(b"x");
        let u_inv = u.inverse()?;

        let a_next: Vec<Fr> = a_L.iter().zip(a_R).map(|(l, r)| *l + u * r).collect();
        let b_next: Vec<Fr> = b_L.iter().zip(b_R).map(|(l, r)| *l + u_inv * r).collect();
        let G_next: Vec<Element> = G_L
            .iter()
            .zip(G_R)
            .map(|(l, r)| *l + *r * u_inv)
            .collect();

        blinding += u_inv * l_blind + u * r_blind;
        a = a_next;
        b = b_next;
        G = G_next;
    }

    // Statement left: C' = a₀·(G₀ + b₀·U) + blinding·H
    let base = G[0] + U * b[0];
    let coeff_mask = Fr::rand(rng);
    let blinding_mask = Fr::rand(rng);
    let blind_commitment = base * coeff_mask + crs.H * blinding_mask;
    transcript.append_point(b"B", &blind_commitment);

    let c = transcript.challenge_scalar(b"c");

    Some(IPAProof {
        L_vec,
        R_vec,
        blind_commitment,
        z_coeff: coeff_mask + c * a[0],
        z_blinding: blinding_mask + c * blinding,
    })
}

/// `⟨scalars, bases⟩ + ip·U + blind·H`
fn cross_term(
    bases: &[Element],
    scalars: &[Fr],
    U: Element,
    ip: Fr,
    H: Element,
    blind: Fr,
) -> Element {
    let mut all_bases = Vec::with_capacity(bases.len() + 2);
    all_bases.extend_from_slice(bases);
    all_bases.extend([U, H]);

    let mut all_scalars = Vec::with_capacity(scalars.len() + 2);
    all_scalars.extend_from_slice(scalars);
    all_scalars.extend([ip, blind]);

    multi_scalar_mul(&all_bases, &all_scalars)
}

impl IPAProof {
    /// Number of halving rounds, i.e. `log2` of the CRS capacity the proof
    /// was made for.
    pub fn num_rounds(&self) -> usize {
        self.L_vec.len()
    }

    /// Verifies the proof against `query`, using only the public statement.
    pub fn verify(&self, transcript: &mut Transcript, crs: &CRS, query: &VerifierQuery) -> bool {
        let n = crs.n;
        let width = 1usize.checked_shl(self.L_vec.len() as u32);
        if self.L_vec.len() != self.R_vec.len() || width != Some(n) {
            return false;
        }

        let U = bind_statement(transcript, crs, query);
        let mut commitment = query.commitment + U * query.result;

        let mut challenges_inv = Vec::with_capacity(self.L_vec.len());
        for (L, R) in self.L_vec.iter().zip(&self.R_vec) {
            transcript.append_point(b"L", L);
            transcript.append_point(b"R", R);

            let u = transcript.challenge_scalar(b"x");
            let Some(u_inv) = u.inverse() else {
                return false;
            };

            commitment += *L * u_inv + *R * u;
            challenges_inv.push(u_inv);
        }

        transcript.append_point(b"B", &self.blind_commitment);
        let c = transcript.challenge_scalar(b"c");

        // G₀ and b₀ are the fully folded generator and evaluation vector
        let scalars = folding_scalars(&challenges_inv, n);
        let G_0 = multi_scalar_mul(&crs.G, &scalars);
        let b_0 = inner_product(&powers_of(query.point, n), &scalars);

        let base = G_0 + U * b_0;
        self.blind_commitment + commitment * c == base * self.z_coeff + crs.H * self.z_blinding
    }

    pub fn serialized_size(&self) -> usize {
        (self.L_vec.len() + self.R_vec.len() + 1) * Element::compressed_serialized_size() + 2 * 32
    }

    /// `L₀ … L_k ‖ R₀ … R_k ‖ B ‖ z_coeff ‖ z_blinding`; points use the 32-byte
    /// canonical encoding, scalars are 32 bytes little endian.
    pub fn to_bytes(&self) -> crate::IOResult<Vec<u8>> {
        let mut bytes = Vec::with_capacity(self.serialized_size());

        for L in &self.L_vec {
            bytes.extend(L.to_bytes());
        }
        for R in &self.R_vec {
            bytes.extend(R.to_bytes());
        }
        bytes.extend(self.blind_commitment.to_bytes());

        self.z_coeff
            .serialize_compressed(&mut bytes)
            .map_err(|_| crate::IOError::from(crate::IOErrorKind::InvalidData))?;
        self.z_blinding
            .serialize_compressed(&mut bytes)
            .map_err(|_| crate::IOError::from(crate::IOErrorKind::InvalidData))?;

        Ok(bytes)
    }

    /// Parses the output of [`IPAProof::to_bytes`] for a CRS of capacity
    /// `poly_degree`.
    pub fn from_bytes(bytes: &[u8], poly_degree: usize) -> crate::IOResult<IPAProof> {
        use crate::{IOError, IOErrorKind};

        if !poly_degree.is_power_of_two() {
            return Err(IOError::from(IOErrorKind::InvalidData));
        }
        let num_rounds = poly_degree.trailing_zeros() as usize;
        let num_points = 2 * num_rounds + 1;
        if bytes.len() != num_points * 32 + 2 * 32 {
            return Err(IOError::from(IOErrorKind::InvalidData));
        }

        let (point_bytes, scalar_bytes) = bytes.split_at(num_points * 32);
        let mut points = point_bytes
            .chunks_exact(32)
            .map(|chunk| {
                let chunk: [u8; 32] = chunk.try_into().expect("chunks_exact yields 32 bytes");
                Element::from_bytes(chunk).ok_or(IOError::from(IOErrorKind::InvalidData))
            })
            .collect::<crate::IOResult<Vec<_>>>()?;

        let blind_commitment = points.pop().ok_or(IOError::from(IOErrorKind::InvalidData))?;
        let R_vec = points.split_off(num_rounds);
        let L_vec = points;

        let z_coeff = Fr::deserialize_compressed(&scalar_bytes[..32])
            .map_err(|_| IOError::from(IOErrorKind::InvalidData))?;
        let z_blinding = Fr::deserialize_compressed(&scalar_bytes[32..])
            .map_err(|_| IOError::from(IOErrorKind::InvalidData))?;

        Ok(IPAProof {
            L_vec,
            R_vec,
            blind_commitment,
            z_coeff,
            z_blinding,
        })
    }
}
