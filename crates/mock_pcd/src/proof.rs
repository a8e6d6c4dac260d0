use core::fmt;

use rand_core::{CryptoRng, RngCore};

/// Key material shared by provers and verifiers of the mock system.
///
/// Stands in for the proving and verifying keys of a real backend. Proofs
/// only verify under the params they were created with.
#[derive(Clone, Copy)]
pub struct Params([u8; 32]);

impl Params {
    /// Samples fresh params.
    pub fn random(rng: &mut (impl RngCore + CryptoRng)) -> Self {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub(crate) const fn key(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<[u8; 32]> for Params {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for Params {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("Params(..)")
    }
}

/// A constant-size mock proof.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Proof([u8; 64]);

impl From<[u8; 64]> for Proof {
    fn from(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }
}

impl From<Proof> for [u8; 64] {
    fn from(proof: Proof) -> Self {
        proof.0
    }
}

impl fmt::Debug for Proof {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("Proof(")?;
        for byte in self.0.iter().take(8) {
            write!(formatter, "{byte:02x}")?;
        }
        formatter.write_str("..)")
    }
}

/// Proof-carrying data: a public statement together with its proof.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pcd<I, O> {
    /// Public input, shared by every proof in a recursive chain.
    pub input: I,
    /// Public output of the last step.
    pub output: O,
    /// Proof binding `input` and `output` to the application.
    pub proof: Proof,
}
