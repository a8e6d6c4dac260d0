//! The action log.
//!
//! The log is an authenticated singly linked list built by prepending. It is
//! never stored as a list of values, only as a running commitment, the
//! *action state*:
//!
//! $$\mathsf{action\_state}' = H(\mathsf{action\_state},\; H(\text{encode}(a)))$$
//!
//! starting from [`empty`]. Appending is O(1) and needs no proof, which is
//! what lets any number of clients submit actions without coordinating.
//! The price is order: the newest action is the outermost node, so the log
//! unrolls most-recent-first. The [`Reversal`](crate::circuit::Reversal)
//! circuit turns a segment of it back into chronological order.

use crate::{action::Action, primitives::Commitment};

/// The action state of a log with no actions.
#[must_use]
pub const fn empty() -> Commitment {
    Commitment::EMPTY
}

/// Appends `action` to the log whose current action state is
/// `action_state`, returning the new action state.
#[must_use]
pub fn append<A: Action>(action_state: Commitment, action: &A) -> Commitment {
    Commitment::cons(action_state, action.digest())
}

/// Appends every action in order, oldest first.
#[must_use]
pub fn extend<'action, A: Action + 'action>(
    action_state: Commitment,
    actions: impl IntoIterator<Item = &'action A>,
) -> Commitment {
    actions.into_iter().fold(action_state, append)
}
