use alloc::{vec, vec::Vec};
use core::fmt::Debug;

use pasta_curves::Fp;

/// Domain tag for a [`Header`] type.
///
/// Two header types that encode to the same field elements still produce
/// different proofs because the suffix is absorbed first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Suffix(u16);

impl Suffix {
    /// Creates a suffix.
    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Returns the raw tag.
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }
}

/// A public statement carried by a proof (its input or its output).
///
/// Encodings must have a fixed length for a given header type; the proof
/// digest does not length-prefix them.
pub trait Header: Clone + Debug + PartialEq {
    /// Domain tag of this header type.
    const SUFFIX: Suffix;

    /// Encodes the header as field elements.
    fn encode(&self) -> Vec<Fp>;
}

impl Header for () {
    const SUFFIX: Suffix = Suffix::new(0);

    fn encode(&self) -> Vec<Fp> {
        Vec::new()
    }
}

impl Header for Fp {
    const SUFFIX: Suffix = Suffix::new(1);

    fn encode(&self) -> Vec<Fp> {
        vec![*self]
    }
}
