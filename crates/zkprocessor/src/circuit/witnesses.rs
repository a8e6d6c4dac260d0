// =============================================================================
// Circuit witnesses (prover-side)
// =============================================================================

use pasta_curves::Fp;

use crate::{contract::Contract, primitives::Commitment};

/// Private witness for one reversal `Cons` step.
///
/// Claims that the log node currently being walked is `(tail, head)`. The
/// step only succeeds if $H(\mathsf{tail}, \mathsf{head})$ is that node's
/// commitment.
#[derive(Clone, Copy, Debug)]
pub struct ConsWitness {
    /// Digest of the action at this node.
    pub head: Fp,
    /// Action state before the action was appended.
    pub tail: Commitment,
}

/// Private witness for folding one action in a reducer.
#[derive(Clone, Debug)]
pub struct ActionWitness<C: Contract> {
    /// Chronological commitment of the actions after this one.
    pub tail: Commitment,
    /// The action itself.
    pub action: C::Action,
    /// Private inputs to the contract's handler.
    pub handler: C::Witness,
}
