use ff::{Field as _, FromUniformBytes as _, PrimeField as _};
use mock_pcd::{Header, Suffix};
use pasta_curves::Fp;

use crate::constants::HASH_PERSONALIZATION;

/// The commitment hash $H$ over field elements.
///
/// $$H(x_1, \ldots, x_n) = \text{ToBase}(\text{BLAKE2b-512}(
/// \text{"ZkProcessor_Hash"},\; \text{repr}(x_1) \| \cdots \|
/// \text{repr}(x_n)))$$
///
/// Each element is absorbed as its 32-byte canonical representation; the
/// 64-byte digest is reduced into $\mathbb{F}_p$ without bias.
#[must_use]
pub fn hash(elements: &[Fp]) -> Fp {
    let mut state = blake2b_simd::Params::new()
        .hash_length(64)
        .personal(HASH_PERSONALIZATION)
        .to_state();
    for element in elements {
        state.update(&element.to_repr());
    }
    Fp::from_uniform_bytes(state.finalize().as_array())
}

/// A hash-chained list commitment.
///
/// Lists are built by prepending: a node `(tail, head)` commits to
/// $H(\mathsf{tail}, \mathsf{head})$ and the empty list commits to zero.
/// The action log, the reversed snapshot and the [`List`](crate::contract::List)
/// contract's state are all commitments of this shape.
///
/// Two different histories reach the same commitment only through a hash
/// collision, so a commitment also identifies the exact sequence behind it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Commitment(#[cfg_attr(feature = "serde", serde(with = "fp_serde"))] Fp);

impl Commitment {
    /// The commitment of the empty list.
    pub const EMPTY: Self = Self(Fp::ZERO);

    /// Prepends `head` onto `tail`: $H(\mathsf{tail}, \mathsf{head})$.
    #[must_use]
    pub fn cons(tail: Self, head: Fp) -> Self {
        Self(hash(&[tail.0, head]))
    }

    /// Whether this is the empty-list commitment.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Self::EMPTY
    }
}

impl Header for Commitment {
    const SUFFIX: Suffix = Suffix::new(0x10);

    fn encode(&self) -> Vec<Fp> {
        vec![self.0]
    }
}

impl From<Fp> for Commitment {
    fn from(fp: Fp) -> Self {
        Self(fp)
    }
}

impl From<Commitment> for Fp {
    fn from(commitment: Commitment) -> Self {
        commitment.0
    }
}

impl From<Commitment> for [u8; 32] {
    fn from(commitment: Commitment) -> Self {
        commitment.0.to_repr()
    }
}

impl TryFrom<[u8; 32]> for Commitment {
    type Error = &'static str;

    fn try_from(bytes: [u8; 32]) -> Result<Self, Self::Error> {
        Option::from(Fp::from_repr(bytes))
            .map(Self)
            .ok_or("invalid field element")
    }
}

#[cfg(feature = "serde")]
mod fp_serde {
    use ff::PrimeField as _;
    use pasta_curves::Fp;
    use serde::{Deserialize as _, Deserializer, Serialize as _, Serializer};

    pub(super) fn serialize<S: Serializer>(fp: &Fp, serializer: S) -> Result<S::Ok, S::Error> {
        fp.to_repr().serialize(serializer)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Fp, D::Error> {
        let bytes = <[u8; 32]>::deserialize(deserializer)?;
        Option::from(Fp::from_repr(bytes))
            .ok_or_else(|| serde::de::Error::custom("invalid field element"))
    }
}
