use alloc::vec::Vec;
use core::marker::PhantomData;

use ff::PrimeField as _;

use crate::{Header, Index, Params, Pcd, PcdError, Proof, Result, Step};

/// BLAKE2b-512 personalization for mock proof digests.
const PROOF_PERSONALIZATION: &[u8; 16] = b"MockPcd_ProofDig";

/// Collects the steps of an [`Application`].
#[derive(Debug)]
#[expect(
    clippy::module_name_repetitions,
    reason = "ApplicationBuilder is the established PCD name"
)]
pub struct ApplicationBuilder<I, O> {
    domain: &'static str,
    steps: Vec<Index>,
    marker: PhantomData<fn(I) -> O>,
}

impl<I: Header, O: Header> ApplicationBuilder<I, O> {
    /// Starts an application under the given domain separator.
    #[must_use]
    pub const fn new(domain: &'static str) -> Self {
        Self {
            domain,
            steps: Vec::new(),
            marker: PhantomData,
        }
    }

    /// Registers a step. Indices must be unique.
    pub fn register<S: Step<I, O>>(mut self, _step: &S) -> Result<Self> {
        if self.steps.contains(&S::INDEX) {
            return Err(PcdError::DuplicateStep(S::INDEX));
        }
        self.steps.push(S::INDEX);
        Ok(self)
    }

    /// Binds the registered steps to key material.
    #[must_use]
    pub fn finalize(self, params: &Params) -> Application<I, O> {
        Application {
            domain: self.domain,
            steps: self.steps,
            params: *params,
            marker: PhantomData,
        }
    }
}

/// A recursive circuit: a set of steps sharing one public input type `I`
/// and one public output type `O`.
#[derive(Debug)]
pub struct Application<I, O> {
    domain: &'static str,
    steps: Vec<Index>,
    params: Params,
    marker: PhantomData<fn(I) -> O>,
}

impl<I: Header, O: Header> Application<I, O> {
    /// Proves a base step, starting a new chain.
    pub fn seed<S: Step<I, O, Left = ()>>(
        &self,
        step: &S,
        input: I,
        witness: S::Witness,
    ) -> Result<Pcd<I, O>> {
        self.ensure_registered(S::INDEX)?;
        let output = step.witness(&input, witness, ())?;
        Ok(self.attest(input, output))
    }

    /// Proves a recursive step on top of `left`.
    ///
    /// `left` is verified first; its public input and output are handed to
    /// the step, which is responsible for binding them to `input`.
    pub fn fold<S: Step<I, O, Left = (I, O)>>(
        &self,
        step: &S,
        input: I,
        witness: S::Witness,
        left: &Pcd<I, O>,
    ) -> Result<Pcd<I, O>> {
        self.ensure_registered(S::INDEX)?;
        self.verify(left)?;
        let output = step.witness(
            &input,
            witness,
            (left.input.clone(), left.output.clone()),
        )?;
        Ok(self.attest(input, output))
    }

    /// Checks that `pcd` was produced by this application.
    pub fn verify(&self, pcd: &Pcd<I, O>) -> Result<()> {
        if self.digest(&pcd.input, &pcd.output) == pcd.proof {
            Ok(())
        } else {
            Err(PcdError::Unverified)
        }
    }

    fn ensure_registered(&self, index: Index) -> Result<()> {
        if self.steps.contains(&index) {
            Ok(())
        } else {
            Err(PcdError::UnknownStep(index))
        }
    }

    fn attest(&self, input: I, output: O) -> Pcd<I, O> {
        let proof = self.digest(&input, &output);
        Pcd {
            input,
            output,
            proof,
        }
    }

    /// `BLAKE2b-512_key("MockPcd_ProofDig", domain || 0 || I || O)` where each
    /// header is absorbed as its suffix followed by its field encoding.
    fn digest(&self, input: &I, output: &O) -> Proof {
        let mut state = blake2b_simd::Params::new()
            .hash_length(64)
            .key(self.params.key())
            .personal(PROOF_PERSONALIZATION)
            .to_state();
        state.update(self.domain.as_bytes());
        state.update(&[0u8]);
        absorb(&mut state, input);
        absorb(&mut state, output);
        Proof::from(*state.finalize().as_array())
    }
}

fn absorb<H: Header>(state: &mut blake2b_simd::State, header: &H) {
    #[expect(clippy::little_endian_bytes, reason = "specified behavior")]
    state.update(&H::SUFFIX.get().to_le_bytes());
    for element in header.encode() {
        state.update(&element.to_repr());
    }
}
