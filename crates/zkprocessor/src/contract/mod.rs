//! Contracts: the application logic a reducer folds actions into.
//!
//! A contract fixes three things:
//!
//! - the shape of its state, a [`Header`] so it can appear in a reduction
//!   statement;
//! - a closed enum of [`Action`]s that clients may request;
//! - one handler per action variant, [`Contract::handle`], run inside the
//!   reducer circuit for every folded action.
//!
//! Handlers may need private inputs (for example a node read back from
//! off-chain storage). The prover supplies them through a [`Witnesses`]
//! source while it builds a reduction.

use core::fmt::Debug;

use mock_pcd::{Header, Result};

use crate::action::Action;

mod counter;
mod list;

pub use counter::{Counter, CounterAction};
pub use list::{List, ListAction, ListNode, MemoryStore, MerkleList, NodeStore};

/// Application logic driven by the action log.
pub trait Contract {
    /// Domain separator of this contract's reducer circuit.
    const DOMAIN: &'static str;

    /// State folded by the reducer.
    type State: Header + Copy + Eq;

    /// Requests clients may submit.
    type Action: Action;

    /// Private handler inputs for a single action.
    type Witness: Clone + Debug;

    /// State set when the contract is initialized.
    fn initial() -> Self::State;

    /// Folds one action into `state`.
    ///
    /// Runs inside the reducer circuit: any failed assertion aborts the
    /// reduction proof. Must be deterministic.
    fn handle(
        state: Self::State,
        action: &Self::Action,
        witness: Self::Witness,
    ) -> Result<Self::State>;
}

/// Supplies handler witnesses while a reduction is proved.
///
/// Called once per action, oldest first, with the state the action will be
/// folded into.
pub trait Witnesses<C: Contract> {
    /// Produces the private inputs for folding `action` into `state`.
    fn witness(&mut self, state: C::State, action: &C::Action) -> Result<C::Witness>;
}

/// Witness source for contracts whose handlers take no private inputs.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoWitness;

impl<C: Contract<Witness = ()>> Witnesses<C> for NoWitness {
    fn witness(&mut self, _state: C::State, _action: &C::Action) -> Result<()> {
        Ok(())
    }
}
