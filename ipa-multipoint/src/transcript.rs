//! Fiat–Shamir transcript.
//!
//! Prover and verifier feed the same labelled messages in the same order; each
//! challenge is the SHA-256 of everything absorbed so far, reduced into `Fr`,
//! and is itself absorbed before the next message.
use banderwagon::{trait_defs::*, Element, Fr};
use sha2::{Digest, Sha256};

pub trait TranscriptProtocol {
    /// Compute a `label`ed challenge variable.
    fn challenge_scalar(&mut self, label: &'static [u8]) -> Fr;
    fn append_point(&mut self, label: &'static [u8], point: &Element);
    fn append_scalar(&mut self, label: &'static [u8], point: &Fr);
    fn domain_sep(&mut self, label: &'static [u8]);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub state: Vec<u8>,
}

impl Transcript {
    pub fn new(label: &'static [u8]) -> Transcript {
        Transcript {
            state: label.to_vec(),
        }
    }

    fn append_message(&mut self, message: &[u8], label: &'static [u8]) {
        self.state.extend(label);
        self.state.extend(message);
    }
}

impl TranscriptProtocol for Transcript {
    fn challenge_scalar(&mut self, label: &'static [u8]) -> Fr {
        self.domain_sep(label);

        let hash = Sha256::digest(&self.state);
        self.state.clear();

        let scalar = Fr::from_le_bytes_mod_order(&hash);
        self.append_scalar(label, &scalar);

        scalar
    }

    fn append_point(&mut self, label: &'static [u8], point: &Element) {
        self.append_message(&point.to_bytes(), label)
    }

    fn append_scalar(&mut self, label: &'static [u8], scalar: &Fr) {
        let mut bytes = [0u8; 32];
        scalar
            .serialize_compressed(&mut bytes[..])
            .expect("a scalar always fits in 32 bytes");
        self.append_message(&bytes, label)
    }

    fn domain_sep(&mut self, label: &'static [u8]) {
        self.state.extend(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn challenges_depend_on_history() {
        let mut a = Transcript::new(b"test");
        let mut b = Transcript::new(b"test");
        assert_eq!(a.challenge_scalar(b"x"), b.challenge_scalar(b"x"));

        a.append_scalar(b"v", &Fr::from(1u64));
        b.append_scalar(b"v", &Fr::from(2u64));
        assert_ne!(a.challenge_scalar(b"x"), b.challenge_scalar(b"x"));
    }

    #[test]
    fn labels_are_absorbed() {
        let point = Element::prime_subgroup_generator();
        let mut a = Transcript::new(b"test");
        let mut b = Transcript::new(b"test");
        a.append_point(b"C", &point);
        b.append_point(b"D", &point);
        assert_ne!(a.challenge_scalar(b"x"), b.challenge_scalar(b"x"));

        let mut c = Transcript::new(b"first");
        let mut d = Transcript::new(b"second");
        assert_ne!(c.challenge_scalar(b"x"), d.challenge_scalar(b"x"));
    }
}
