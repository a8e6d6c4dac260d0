//! The processor: the request surface of a contract.
//!
//! | Operation                               | Preconditions | Effect |
//! |-----------------------------------------|---------------|--------|
//! | [`init`](Processor::init)               | uninitialized | `value := initial`, checkpoint and snapshot empty |
//! | [`request`](Processor::request)         | none          | append one action |
//! | [`take_snapshot`](Processor::take_snapshot) | `action_state = start`, `checkpoint = in_order`, `snapshot = ∅` | `checkpoint := start`, `snapshot := rev_order` |
//! | [`reduce`](Processor::reduce)           | `value = input.state`, `snapshot = input.marker` | `value := output.state`, `snapshot := output.marker` |
//!
//! Requests never touch checked state, so any number of clients can submit
//! concurrently. Snapshots race against requests: a reversal proof of an
//! older tip is rejected. Reductions only race against other reductions,
//! since a taken snapshot is immune to later appends.
//!
//! Each operation is also available as an [`Update`] builder for callers
//! that apply updates to a [`Ledger`] themselves.

use ff::Field as _;
use mock_pcd::{Params, PcdError};
use pasta_curves::Fp;
use tracing::{info, warn};

use crate::{
    circuit::{LogRange, Reducer, ReducerProof, Reversal, ReversalProof},
    contract::{Contract, Counter, CounterAction},
    ledger::{
        Account, ArchivedAction, Ledger, PreconditionMismatch, Preconditions, StateField,
        StateUpdate, Update,
    },
    primitives::Commitment,
};

/// Errors returned to processor callers.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[expect(clippy::module_name_repetitions, reason = "exported at the crate root")]
pub enum ProcessorError {
    /// The contract has not been initialized.
    #[error("contract is not initialized")]
    NotInitialized,

    /// `init` was called on an initialized contract.
    #[error("contract is already initialized")]
    AlreadyInitialized,

    /// The proof is valid but was computed against state that has since
    /// moved. Recompute against the current account and resubmit.
    #[error("stale proof: {0}")]
    Precondition(PreconditionMismatch),

    /// The proof does not verify. Resubmitting it cannot succeed.
    #[error("malformed proof: {0}")]
    MalformedProof(PcdError),
}

impl ProcessorError {
    /// Whether this is a precondition mismatch, the recoverable race outcome.
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        matches!(*self, Self::Precondition(_))
    }
}

impl From<PreconditionMismatch> for ProcessorError {
    fn from(mismatch: PreconditionMismatch) -> Self {
        match mismatch.field {
            StateField::Initialized if mismatch.actual == [Fp::ZERO] => Self::NotInitialized,
            StateField::Initialized => Self::AlreadyInitialized,
            StateField::ActionState
            | StateField::Value
            | StateField::Checkpoint
            | StateField::Snapshot => Self::Precondition(mismatch),
        }
    }
}

/// Account state plus the circuits that gate changes to it.
#[derive(Debug)]
pub struct Processor<C: Contract> {
    ledger: Ledger<C>,
    reversal: Reversal,
    reducer: Reducer<C>,
}

impl<C: Contract> Processor<C> {
    /// Creates an uninitialized processor verifying proofs under `params`.
    pub fn new(params: &Params) -> Result<Self, PcdError> {
        Ok(Self {
            ledger: Ledger::new(),
            reversal: Reversal::build(params)?,
            reducer: Reducer::build(params)?,
        })
    }

    /// The underlying account.
    pub const fn ledger(&self) -> &Ledger<C> {
        &self.ledger
    }

    /// Current account.
    pub fn account(&self) -> Account<C::State> {
        self.ledger.account()
    }

    /// Archived actions between two log positions; see
    /// [`Ledger::actions_between`].
    pub fn actions_between(
        &self,
        from: Commitment,
        to: Commitment,
    ) -> Option<Vec<ArchivedAction<C::Action>>> {
        self.ledger.actions_between(from, to)
    }

    /// Archived actions behind a pending snapshot; see
    /// [`Ledger::snapshotted_actions`].
    pub fn snapshotted_actions(
        &self,
        checkpoint: Commitment,
        snapshot: Commitment,
    ) -> Option<Vec<ArchivedAction<C::Action>>> {
        self.ledger.snapshotted_actions(checkpoint, snapshot)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Update builders
    // ═══════════════════════════════════════════════════════════════════

    /// Initializes the contract state.
    #[must_use]
    pub fn init_update() -> Update<C::State, C::Action> {
        Update {
            preconditions: Preconditions {
                initialized: Some(false),
                ..Preconditions::default()
            },
            set_state: StateUpdate {
                value: Some(C::initial()),
                checkpoint: Some(Commitment::EMPTY),
                snapshot: Some(Commitment::EMPTY),
            },
            push_actions: Vec::new(),
        }
    }

    /// Appends `action` to the log.
    #[must_use]
    pub fn request_update(action: C::Action) -> Update<C::State, C::Action> {
        Update {
            push_actions: vec![action],
            ..Update::default()
        }
    }

    /// Freezes the actions reversed by `proof` as the snapshot.
    pub fn snapshot_update(
        &self,
        proof: &ReversalProof,
    ) -> Result<Update<C::State, C::Action>, ProcessorError> {
        self.reversal
            .verify(proof)
            .map_err(ProcessorError::MalformedProof)?;
        let LogRange { start } = proof.input;
        Ok(Update {
            preconditions: Preconditions {
                action_state: Some(start),
                checkpoint: Some(proof.output.in_order),
                snapshot: Some(Commitment::EMPTY),
                ..Preconditions::default()
            },
            set_state: StateUpdate {
                checkpoint: Some(start),
                snapshot: Some(proof.output.rev_order),
                ..StateUpdate::default()
            },
            push_actions: Vec::new(),
        })
    }

    /// Folds the snapshotted actions covered by `proof` into the value.
    pub fn reduce_update(
        &self,
        proof: &ReducerProof<C>,
    ) -> Result<Update<C::State, C::Action>, ProcessorError> {
        self.reducer
            .verify(proof)
            .map_err(ProcessorError::MalformedProof)?;
        Ok(Update {
            preconditions: Preconditions {
                value: Some(proof.input.state),
                snapshot: Some(proof.input.marker),
                ..Preconditions::default()
            },
            set_state: StateUpdate {
                value: Some(proof.output.state),
                snapshot: Some(proof.output.marker),
                ..StateUpdate::default()
            },
            push_actions: Vec::new(),
        })
    }

    // ═══════════════════════════════════════════════════════════════════
    // Request surface
    // ═══════════════════════════════════════════════════════════════════

    /// Initializes the contract. Succeeds once per processor.
    pub fn init(&self) -> Result<Account<C::State>, ProcessorError> {
        let account = self.ledger.apply(Self::init_update())?;
        info!(domain = C::DOMAIN, "initialized");
        Ok(account)
    }

    /// Queues `action` and returns the new action state.
    ///
    /// Carries no preconditions, so it cannot be rejected.
    pub fn request(&self, action: C::Action) -> Result<Commitment, ProcessorError> {
        let account = self.ledger.apply(Self::request_update(action))?;
        Ok(account.action_state)
    }

    /// Submits a reversal proof of the current log as the new snapshot.
    pub fn take_snapshot(
        &self,
        proof: &ReversalProof,
    ) -> Result<Account<C::State>, ProcessorError> {
        let update = self.snapshot_update(proof)?;
        self.submit(update, "snapshot")
    }

    /// Submits a reducer proof over (a prefix of) the current snapshot.
    pub fn reduce(
        &self,
        proof: &ReducerProof<C>,
    ) -> Result<Account<C::State>, ProcessorError> {
        let update = self.reduce_update(proof)?;
        self.submit(update, "reduction")
    }

    fn submit(
        &self,
        update: Update<C::State, C::Action>,
        operation: &'static str,
    ) -> Result<Account<C::State>, ProcessorError> {
        match self.ledger.apply(update) {
            Ok(account) => {
                info!(
                    operation,
                    action_state = ?account.action_state,
                    state = ?account.state,
                    "accepted"
                );
                Ok(account)
            }
            Err(mismatch) => {
                warn!(operation, field = ?mismatch.field, "rejected: precondition mismatch");
                Err(mismatch.into())
            }
        }
    }
}

#[expect(
    clippy::multiple_inherent_impl,
    reason = "contract-specific request helpers"
)]
impl Processor<Counter> {
    /// Queues `Add { amount }`.
    pub fn request_add(&self, amount: Fp) -> Result<Commitment, ProcessorError> {
        self.request(CounterAction::Add { amount })
    }
}
