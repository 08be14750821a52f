use banderwagon::{trait_defs::*, Fr};

/// Computes the inner product between two scalar vectors
pub fn inner_product(a: &[Fr], b: &[Fr]) -> Fr {
    a.iter().zip(b.iter()).map(|(a, b)| *a * *b).sum()
}

/// `[1, x, x², …, x^(n-1)]`
#[inline(always)]
pub fn powers_of(point: Fr, n: usize) -> Vec<Fr> {
    let mut powers = Vec::with_capacity(n);
    if n == 0 {
        return powers;
    }
    powers.push(Fr::one());

    for i in 1..n {
        powers.push(powers[i - 1] * point);
    }
    powers
}

/// Folding coefficients of a vector of length `n` after the IPA rounds with
/// the given inverse challenges: entry `i` is the product of the inverse
/// challenges of every round in which `i` fell into the right half.
///
/// `n` must equal `2^challenges_inv.len()`.
pub(crate) fn folding_scalars(challenges_inv: &[Fr], n: usize) -> Vec<Fr> {
    let mut scalars = vec![Fr::one(); n];
    for (round, u_inv) in challenges_inv.iter().enumerate() {
        let half = n >> (round + 1);
        for (i, scalar) in scalars.iter_mut().enumerate() {
            if i & half != 0 {
                *scalar *= u_inv;
            }
        }
    }
    scalars
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_std::test_rng;

    #[test]
    fn simple_vandermonde() {
        let rand_fr = Fr::rand(&mut test_rng());
        let n = 100;
        let powers = powers_of(rand_fr, n);

        assert_eq!(powers[0], Fr::one());
        for (i, power) in powers.into_iter().enumerate() {
            assert_eq!(power, rand_fr.pow([i as u64]))
        }
        assert!(powers_of(rand_fr, 0).is_empty());
    }

    #[test]
    fn folding_scalars_match_explicit_folding() {
        let mut rng = test_rng();
        let n = 8;
        let values: Vec<Fr> = (0..n).map(|_| Fr::rand(&mut rng)).collect();
        let challenges_inv: Vec<Fr> = (0..3).map(|_| Fr::rand(&mut rng)).collect();

        let mut folded = values.clone();
        for u_inv in &challenges_inv {
            let (left, right) = folded.split_at(folded.len() / 2);
            folded = left
                .iter()
                .zip(right)
                .map(|(l, r)| *l + *r * u_inv)
                .collect();
        }

        let scalars = folding_scalars(&challenges_inv, n);
        assert_eq!(folded[0], inner_product(&values, &scalars));
    }
}
