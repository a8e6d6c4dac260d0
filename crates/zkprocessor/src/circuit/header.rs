use mock_pcd::{Header, Suffix};
use pasta_curves::Fp;

use crate::primitives::Commitment;

/// Public input of the reversal circuit: the log segment being reversed.
///
/// The range is open-ended: it runs from `start` back to wherever the
/// reversal stops, which the processor pins to its checkpoint. `start` is
/// never the empty log.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LogRange {
    /// Action state at the newest end of the segment.
    pub start: Commitment,
}

impl Header for LogRange {
    const SUFFIX: Suffix = Suffix::new(0x11);

    fn encode(&self) -> Vec<Fp> {
        self.start.encode()
    }
}

/// Public output of the reversal circuit.
///
/// `in_order` is the part of the LIFO log not yet walked. `rev_order` is
/// the walked part rebuilt so that its outermost node is the oldest action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReversedList {
    /// Commitment of the remaining, unreversed log.
    pub in_order: Commitment,
    /// Chronological commitment of the reversed actions.
    pub rev_order: Commitment,
}

impl Header for ReversedList {
    const SUFFIX: Suffix = Suffix::new(0x12);

    fn encode(&self) -> Vec<Fp> {
        vec![self.in_order.into(), self.rev_order.into()]
    }
}

/// Public input and output of a reducer circuit.
///
/// `marker` is the chronological commitment of the actions still to fold;
/// `state` is the contract state after folding everything before them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReductionStatement<S> {
    /// Commitment of the actions not yet folded.
    pub marker: Commitment,
    /// Contract state so far.
    pub state: S,
}

impl<S: Header + Copy> Header for ReductionStatement<S> {
    const SUFFIX: Suffix = Suffix::new(0x13);

    fn encode(&self) -> Vec<Fp> {
        let mut elements = self.marker.encode();
        elements.extend(self.state.encode());
        elements
    }
}
