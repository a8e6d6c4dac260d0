//! The shared account a processor runs against.
//!
//! An [`Account`] holds the action log tip and, once initialized, the
//! contract's [`AppState`]. Every change goes through [`Ledger::apply`] as an
//! [`Update`]: a set of equality preconditions on current fields, new values
//! for some fields, and actions to append. Preconditions are all checked
//! before anything is written, so an update either applies completely or
//! leaves the account untouched.
//!
//! Appended actions are also archived next to the action state they
//! produced. Provers need the actions themselves, not just their digests,
//! to build reversal and reducer proofs.

use ff::Field as _;
use mock_pcd::Header;
use parking_lot::Mutex;
use pasta_curves::Fp;
use tracing::debug;

use crate::{action::Action as _, contract::Contract, log, primitives::Commitment};

/// Contract state persisted by the processor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AppState<S> {
    /// Contract state after every reduced action.
    pub value: S,
    /// Action state up to which actions have been snapshotted.
    pub checkpoint: Commitment,
    /// Chronological commitment of the snapshotted actions not yet reduced.
    pub snapshot: Commitment,
}

impl<S> AppState<S> {
    /// Fresh state: `value`, nothing snapshotted.
    pub const fn new(value: S) -> Self {
        Self {
            value,
            checkpoint: Commitment::EMPTY,
            snapshot: Commitment::EMPTY,
        }
    }
}

/// Snapshot of the account.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Account<S> {
    /// Current tip of the action log.
    pub action_state: Commitment,
    /// Contract state, `None` until initialized.
    pub state: Option<AppState<S>>,
}

/// An appended action and the action state it produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchivedAction<A> {
    /// The action.
    pub action: A,
    /// Action state right after appending it.
    pub action_state: Commitment,
}

/// Account fields a precondition can refer to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateField {
    /// Whether the contract state exists.
    Initialized,
    /// [`Account::action_state`].
    ActionState,
    /// [`AppState::value`].
    Value,
    /// [`AppState::checkpoint`].
    Checkpoint,
    /// [`AppState::snapshot`].
    Snapshot,
}

/// An update was rejected because a field no longer has the expected value.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("precondition on {field:?} does not hold")]
pub struct PreconditionMismatch {
    /// The field that differs.
    pub field: StateField,
    /// Encoding of the value the update expected.
    pub expected: Vec<Fp>,
    /// Encoding of the value found.
    pub actual: Vec<Fp>,
}

/// Expected values of account fields. `None` fields are unconstrained.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Preconditions<S> {
    /// Whether the account must (not) be initialized.
    pub initialized: Option<bool>,
    /// Expected log tip.
    pub action_state: Option<Commitment>,
    /// Expected contract state.
    pub value: Option<S>,
    /// Expected checkpoint.
    pub checkpoint: Option<Commitment>,
    /// Expected snapshot.
    pub snapshot: Option<Commitment>,
}

impl<S> Default for Preconditions<S> {
    fn default() -> Self {
        Self {
            initialized: None,
            action_state: None,
            value: None,
            checkpoint: None,
            snapshot: None,
        }
    }
}

impl<S: Header + Copy> Preconditions<S> {
    fn check(&self, account: &Account<S>) -> Result<(), PreconditionMismatch> {
        if let Some(expected) = self.initialized {
            ensure_flag(expected, account.state.is_some())?;
        }
        if let Some(expected) = self.action_state {
            ensure(StateField::ActionState, &expected, &account.action_state)?;
        }
        if self.value.is_none() && self.checkpoint.is_none() && self.snapshot.is_none() {
            return Ok(());
        }
        let Some(state) = account.state else {
            return ensure_flag(true, false);
        };
        if let Some(expected) = self.value {
            ensure(StateField::Value, &expected, &state.value)?;
        }
        if let Some(expected) = self.checkpoint {
            ensure(StateField::Checkpoint, &expected, &state.checkpoint)?;
        }
        if let Some(expected) = self.snapshot {
            ensure(StateField::Snapshot, &expected, &state.snapshot)?;
        }
        Ok(())
    }
}

fn ensure<H: Header>(
    field: StateField,
    expected: &H,
    actual: &H,
) -> Result<(), PreconditionMismatch> {
    if expected == actual {
        Ok(())
    } else {
        Err(PreconditionMismatch {
            field,
            expected: expected.encode(),
            actual: actual.encode(),
        })
    }
}

fn ensure_flag(expected: bool, actual: bool) -> Result<(), PreconditionMismatch> {
    let encode = |flag: bool| vec![if flag { Fp::ONE } else { Fp::ZERO }];
    if expected == actual {
        Ok(())
    } else {
        Err(PreconditionMismatch {
            field: StateField::Initialized,
            expected: encode(expected),
            actual: encode(actual),
        })
    }
}

/// New values for contract state fields. `None` fields are kept.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StateUpdate<S> {
    /// New contract state.
    pub value: Option<S>,
    /// New checkpoint.
    pub checkpoint: Option<Commitment>,
    /// New snapshot.
    pub snapshot: Option<Commitment>,
}

impl<S> Default for StateUpdate<S> {
    fn default() -> Self {
        Self {
            value: None,
            checkpoint: None,
            snapshot: None,
        }
    }
}

impl<S: Copy> StateUpdate<S> {
    /// Whether the update sets no field.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.value.is_none() && self.checkpoint.is_none() && self.snapshot.is_none()
    }

    fn apply(&self, state: &mut AppState<S>) {
        if let Some(value) = self.value {
            state.value = value;
        }
        if let Some(checkpoint) = self.checkpoint {
            state.checkpoint = checkpoint;
        }
        if let Some(snapshot) = self.snapshot {
            state.snapshot = snapshot;
        }
    }
}

/// A conditional change to the account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Update<S, A> {
    /// Checked against the account before anything is written.
    pub preconditions: Preconditions<S>,
    /// Fields to overwrite.
    pub set_state: StateUpdate<S>,
    /// Actions to append to the log, oldest first.
    pub push_actions: Vec<A>,
}

impl<S, A> Default for Update<S, A> {
    fn default() -> Self {
        Self {
            preconditions: Preconditions::default(),
            set_state: StateUpdate::default(),
            push_actions: Vec::new(),
        }
    }
}

#[derive(Debug)]
struct Inner<S, A> {
    account: Account<S>,
    archive: Vec<ArchivedAction<A>>,
}

/// The account of one contract instance.
///
/// All updates are serialized by an internal lock; each is a single
/// compare-and-set over the whole account.
#[derive(Debug)]
pub struct Ledger<C: Contract> {
    inner: Mutex<Inner<C::State, C::Action>>,
}

impl<C: Contract> Default for Ledger<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Contract> Ledger<C> {
    /// An uninitialized account with an empty action log.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                account: Account {
                    action_state: Commitment::EMPTY,
                    state: None,
                },
                archive: Vec::new(),
            }),
        }
    }

    /// Current account.
    pub fn account(&self) -> Account<C::State> {
        self.inner.lock().account
    }

    /// Applies `update` if all its preconditions hold, returning the new
    /// account.
    ///
    /// State fields of an uninitialized account start from
    /// [`Contract::initial`] and an empty checkpoint and snapshot.
    pub fn apply(
        &self,
        update: Update<C::State, C::Action>,
    ) -> Result<Account<C::State>, PreconditionMismatch> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        update.preconditions.check(&inner.account)?;

        if !update.set_state.is_empty() {
            let mut state = inner
                .account
                .state
                .unwrap_or_else(|| AppState::new(C::initial()));
            update.set_state.apply(&mut state);
            inner.account.state = Some(state);
        }

        for action in update.push_actions {
            let action_state = log::append(inner.account.action_state, &action);
            debug!(?action_state, ?action, "appended action");
            inner.account.action_state = action_state;
            inner.archive.push(ArchivedAction {
                action,
                action_state,
            });
        }

        Ok(inner.account)
    }

    /// Actions appended after the log was at `from`, up to and including the
    /// one that brought it to `to`, oldest first.
    ///
    /// Returns `None` if either commitment is not in this log's history or
    /// `to` precedes `from`.
    pub fn actions_between(
        &self,
        from: Commitment,
        to: Commitment,
    ) -> Option<Vec<ArchivedAction<C::Action>>> {
        let inner = self.inner.lock();
        let end = inner.position(to)?;
        let start = inner.position_before(from, end)?;
        inner.archive.get(start..end).map(<[_]>::to_vec)
    }

    /// The newest actions up to and including the one that brought the log
    /// to `checkpoint` whose chronological list commits to `snapshot`,
    /// oldest first.
    ///
    /// Only the entries the snapshot covers are visited. Returns `None` if
    /// `checkpoint` is not in this log's history or no run of actions ending
    /// there commits to `snapshot`.
    pub fn snapshotted_actions(
        &self,
        checkpoint: Commitment,
        snapshot: Commitment,
    ) -> Option<Vec<ArchivedAction<C::Action>>> {
        let inner = self.inner.lock();
        let end = inner.position(checkpoint)?;
        let mut list = Commitment::EMPTY;
        let mut covered = Vec::new();
        for entry in inner.archive.get(..end)?.iter().rev() {
            if list == snapshot {
                break;
            }
            list = Commitment::cons(list, entry.action.digest());
            covered.push(entry.clone());
        }
        (list == snapshot).then(|| {
            covered.reverse();
            covered
        })
    }
}

impl<S, A> Inner<S, A> {
    /// Archive length at the time the log was at `commitment`, searching
    /// from the tip.
    fn position(&self, commitment: Commitment) -> Option<usize> {
        self.position_before(commitment, self.archive.len())
    }

    /// Like [`Self::position`], but only among the first `end` entries.
    fn position_before(&self, commitment: Commitment, end: usize) -> Option<usize> {
        if commitment.is_empty() {
            return Some(0);
        }
        self.archive
            .get(..end)?
            .iter()
            .rposition(|entry| entry.action_state == commitment)
            .map(|index| index + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        action::Action as _,
        contract::{Counter, CounterAction},
    };

    fn add(amount: u64) -> CounterAction {
        CounterAction::Add {
            amount: Fp::from(amount),
        }
    }

    fn initialized() -> Ledger<Counter> {
        let ledger = Ledger::new();
        ledger
            .apply(Update {
                preconditions: Preconditions {
                    initialized: Some(false),
                    ..Preconditions::default()
                },
                set_state: StateUpdate {
                    value: Some(Fp::ZERO),
                    checkpoint: Some(Commitment::EMPTY),
                    snapshot: Some(Commitment::EMPTY),
                },
                push_actions: Vec::new(),
            })
            .unwrap();
        ledger
    }

    #[test]
    fn push_extends_log_and_archive() {
        let ledger = initialized();
        let account = ledger
            .apply(Update {
                push_actions: vec![add(2), add(3)],
                ..Update::default()
            })
            .unwrap();

        assert_eq!(
            account.action_state,
            log::extend(log::empty(), &[add(2), add(3)])
        );
        let archived = ledger
            .actions_between(Commitment::EMPTY, account.action_state)
            .unwrap();
        assert_eq!(archived.len(), 2);
        assert_eq!(archived[0].action, add(2));
        assert_eq!(archived[1].action_state, account.action_state);
    }

    /// A failing precondition leaves every field as it was, including the
    /// log.
    #[test]
    fn mismatch_is_atomic() {
        let ledger = initialized();
        let before = ledger.account();
        let err = ledger
            .apply(Update {
                preconditions: Preconditions {
                    value: Some(Fp::ONE),
                    ..Preconditions::default()
                },
                set_state: StateUpdate {
                    value: Some(Fp::from(7u64)),
                    ..StateUpdate::default()
                },
                push_actions: vec![add(1)],
            })
            .unwrap_err();

        assert_eq!(err.field, StateField::Value);
        assert_eq!(err.expected, vec![Fp::ONE]);
        assert_eq!(err.actual, vec![Fp::ZERO]);
        assert_eq!(ledger.account(), before);
        assert_eq!(
            ledger.actions_between(Commitment::EMPTY, Commitment::EMPTY),
            Some(Vec::new())
        );
    }

    #[test]
    fn state_preconditions_need_initialized_account() {
        let ledger = Ledger::<Counter>::new();
        let err = ledger
            .apply(Update {
                preconditions: Preconditions {
                    snapshot: Some(Commitment::EMPTY),
                    ..Preconditions::default()
                },
                ..Update::default()
            })
            .unwrap_err();
        assert_eq!(err.field, StateField::Initialized);
        assert_eq!(ledger.account().state, None);
    }

    #[test]
    fn actions_between_partial_range() {
        let ledger = initialized();
        let first = ledger
            .apply(Update {
                push_actions: vec![add(1)],
                ..Update::default()
            })
            .unwrap();
        let last = ledger
            .apply(Update {
                push_actions: vec![add(2), add(3)],
                ..Update::default()
            })
            .unwrap();

        let between = ledger
            .actions_between(first.action_state, last.action_state)
            .unwrap();
        assert_eq!(
            between.iter().map(|entry| entry.action).collect::<Vec<_>>(),
            vec![add(2), add(3)]
        );
        assert_eq!(
            ledger.actions_between(last.action_state, first.action_state),
            None
        );
        assert_eq!(
            ledger.actions_between(Commitment::from(Fp::ONE), last.action_state),
            None
        );
    }

    /// Only the run of actions a snapshot commits to is read back, however
    /// long the history before it.
    #[test]
    fn snapshotted_actions_stop_at_the_snapshot() {
        let ledger = initialized();
        ledger
            .apply(Update {
                push_actions: vec![add(1), add(2), add(3)],
                ..Update::default()
            })
            .unwrap();
        let checkpoint = ledger
            .apply(Update {
                push_actions: vec![add(4), add(5)],
                ..Update::default()
            })
            .unwrap()
            .action_state;
        ledger
            .apply(Update {
                push_actions: vec![add(6)],
                ..Update::default()
            })
            .unwrap();

        let snapshot = [add(5), add(4)]
            .iter()
            .fold(Commitment::EMPTY, |list, action| {
                Commitment::cons(list, action.digest())
            });
        let covered = ledger.snapshotted_actions(checkpoint, snapshot).unwrap();
        assert_eq!(
            covered.iter().map(|entry| entry.action).collect::<Vec<_>>(),
            vec![add(4), add(5)]
        );
        assert_eq!(covered.last().map(|entry| entry.action_state), Some(checkpoint));

        assert_eq!(
            ledger.snapshotted_actions(checkpoint, Commitment::EMPTY),
            Some(Vec::new())
        );
        assert_eq!(
            ledger.snapshotted_actions(checkpoint, Commitment::from(Fp::ONE)),
            None
        );
        assert_eq!(
            ledger.snapshotted_actions(Commitment::from(Fp::ONE), snapshot),
            None
        );
    }
}
