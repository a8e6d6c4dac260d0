#![expect(
    clippy::module_name_repetitions,
    reason = "CounterAction reads better than Action outside this module"
)]

use ff::Field as _;
use mock_pcd::Result;
use pasta_curves::Fp;

use super::Contract;
use crate::{action::Action, constants::COUNTER_REDUCER_DOMAIN};

/// Requests against a [`Counter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CounterAction {
    /// Adds `amount` to the counter (modulo the field order).
    Add {
        /// Amount to add.
        amount: Fp,
    },
}

impl Action for CounterAction {
    fn encode(&self) -> Vec<Fp> {
        match *self {
            Self::Add { amount } => vec![Fp::ZERO, amount],
        }
    }
}

/// A single field element that actions add to.
#[derive(Clone, Copy, Debug)]
pub struct Counter;

impl Contract for Counter {
    const DOMAIN: &'static str = COUNTER_REDUCER_DOMAIN;

    type State = Fp;
    type Action = CounterAction;
    type Witness = ();

    fn initial() -> Fp {
        Fp::ZERO
    }

    fn handle(state: Fp, action: &CounterAction, _witness: ()) -> Result<Fp> {
        match *action {
            CounterAction::Add { amount } => Ok(state + amount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_folds_into_state() {
        let state = Counter::handle(
            Fp::from(10u64),
            &CounterAction::Add {
                amount: Fp::from(5u64),
            },
            (),
        );
        assert_eq!(state, Ok(Fp::from(15u64)));
    }

    /// The encoding carries the variant tag ahead of the amount.
    #[test]
    fn encoding_is_tagged() {
        let action = CounterAction::Add {
            amount: Fp::from(7u64),
        };
        assert_eq!(action.encode(), vec![Fp::ZERO, Fp::from(7u64)]);
        assert_ne!(action.digest(), Fp::from(7u64));
    }
}
