//! Actions: queued requests to change contract state.
//!
//! An action is immutable once created. It enters the action log as its
//! digest $H(\text{encode}(a))$ and is only interpreted later, when a reducer
//! folds it into contract state.

use core::fmt::Debug;

use crate::primitives::{Fp, hash};

/// A tagged request to change contract state.
///
/// Implementors are closed enums. The encoding must be deterministic and
/// must start with a per-variant tag so that variants with identical field
/// layouts never share a digest.
pub trait Action: Clone + Debug {
    /// Encodes the action as field elements: the variant tag, then its fields.
    fn encode(&self) -> Vec<Fp>;

    /// The action's digest $H(\text{encode}(a))$, the value prepended onto
    /// the action log.
    fn digest(&self) -> Fp {
        hash(&self.encode())
    }
}
