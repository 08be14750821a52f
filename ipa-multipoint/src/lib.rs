pub mod crs;
pub mod ipa; // single-point opening, BCMS20 folding with a hiding final step
pub mod math_utils;
pub mod transcript;

pub use crs::CRS;
pub use ipa::{IPAProof, ProverQuery, VerifierQuery};
pub use transcript::{Transcript, TranscriptProtocol};

// TODO: We use the IO Result while we do not have a dedicated Error enum
pub type IOResult<T> = std::io::Result<T>;
pub type IOError = std::io::Error;
pub type IOErrorKind = std::io::ErrorKind;
