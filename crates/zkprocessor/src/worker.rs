//! The reducer worker: proves snapshots and reductions out of band.
//!
//! A worker reads the processor's account, proves against what it read and
//! submits. Anything can change in between, so submissions can come back
//! stale. The worker reports that to its caller instead of retrying; the
//! caller decides whether to run again.

use core::{iter, num::NonZeroUsize};

use mock_pcd::{Params, PcdError};
use tracing::{debug, info};

use crate::{
    action::Action as _,
    circuit::{LogRange, ReductionStatement, Reducer, ReducerProof, Reversal, ReversalProof},
    contract::{Contract, Witnesses},
    ledger::AppState,
    primitives::Commitment,
    processor::{Processor, ProcessorError},
};

/// Worker configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Config {
    /// Largest number of actions folded into one reducer proof. `None`
    /// reduces a whole snapshot at once.
    pub max_actions_per_reduction: Option<NonZeroUsize>,
}

impl Config {
    /// Caps the actions per reducer proof, splitting a snapshot into
    /// several partial reductions.
    #[must_use]
    pub const fn with_max_actions_per_reduction(mut self, max: NonZeroUsize) -> Self {
        self.max_actions_per_reduction = Some(max);
        self
    }
}

/// Errors raised while running a worker.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[expect(clippy::module_name_repetitions, reason = "exported at the crate root")]
pub enum WorkerError {
    /// The contract has not been initialized.
    #[error("contract is not initialized")]
    NotInitialized,

    /// The ledger archive does not hold the actions behind a commitment.
    #[error("actions behind the account state are missing from the archive")]
    MissingActions,

    /// Building a proof failed.
    #[error("proving failed: {0}")]
    Proving(#[from] PcdError),

    /// The processor rejected a submission.
    #[error(transparent)]
    Submit(#[from] ProcessorError),
}

impl WorkerError {
    /// Whether a submission was rejected as stale.
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        matches!(*self, Self::Submit(ProcessorError::Precondition(_)))
    }
}

/// What one [`Worker::run_once`] achieved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Progress {
    /// Nothing to snapshot or reduce.
    Idle,
    /// Submissions were accepted.
    Reduced {
        /// Whether a new snapshot was taken.
        snapshot_taken: bool,
        /// Number of actions folded into the value.
        actions: usize,
    },
}

/// A snapshotted action still to be folded, with the chronological
/// commitment of the actions after it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingAction<A> {
    /// Commitment of the actions after this one.
    pub tail: Commitment,
    /// The action.
    pub action: A,
}

/// Proves snapshots and reductions for contract `C`.
///
/// `W` supplies handler witnesses; it is called for every folded action,
/// including those of reductions that end up rejected.
#[derive(Debug)]
pub struct Worker<C: Contract, W> {
    reversal: Reversal,
    reducer: Reducer<C>,
    witnesses: W,
    config: Config,
}

impl<C: Contract, W: Witnesses<C>> Worker<C, W> {
    /// Creates a worker proving under `params`.
    pub fn new(params: &Params, witnesses: W, config: Config) -> Result<Self, PcdError> {
        Ok(Self {
            reversal: Reversal::build(params)?,
            reducer: Reducer::build(params)?,
            witnesses,
            config,
        })
    }

    /// The witness source.
    pub const fn witnesses(&self) -> &W {
        &self.witnesses
    }

    /// Proves a reversal of every action appended since the checkpoint.
    ///
    /// Returns `None` if a snapshot is still being reduced or nothing was
    /// appended since the checkpoint.
    pub fn prove_snapshot(
        &self,
        processor: &Processor<C>,
    ) -> Result<Option<ReversalProof>, WorkerError> {
        let account = processor.account();
        let state = account.state.ok_or(WorkerError::NotInitialized)?;
        if !state.snapshot.is_empty() || account.action_state == state.checkpoint {
            return Ok(None);
        }

        let archived = processor
            .actions_between(state.checkpoint, account.action_state)
            .ok_or(WorkerError::MissingActions)?;
        let tails = iter::once(state.checkpoint)
            .chain(archived.iter().map(|entry| entry.action_state));
        let nodes = archived
            .iter()
            .zip(tails)
            .map(|(entry, tail)| (entry.action.digest(), tail))
            .collect::<Vec<_>>();

        let range = LogRange {
            start: account.action_state,
        };
        let mut proof = self.reversal.empty(range)?;
        for (head, tail) in nodes.into_iter().rev() {
            proof = self.reversal.cons(range, head, tail, &proof)?;
        }
        debug!(actions = archived.len(), start = ?range.start, "proved snapshot");
        Ok(Some(proof))
    }

    /// Recovers the actions still committed to by `state.snapshot`, oldest
    /// first.
    ///
    /// The snapshot covers the newest actions up to the checkpoint; only
    /// those are read back from the archive.
    pub fn pending_actions(
        &self,
        processor: &Processor<C>,
        state: &AppState<C::State>,
    ) -> Result<Vec<PendingAction<C::Action>>, WorkerError> {
        let snapshotted = processor
            .snapshotted_actions(state.checkpoint, state.snapshot)
            .ok_or(WorkerError::MissingActions)?;

        let mut marker = Commitment::EMPTY;
        let mut pending = snapshotted
            .into_iter()
            .rev()
            .map(|entry| {
                let tail = marker;
                marker = Commitment::cons(tail, entry.action.digest());
                PendingAction {
                    tail,
                    action: entry.action,
                }
            })
            .collect::<Vec<_>>();
        pending.reverse();
        Ok(pending)
    }

    /// Proves the reduction of `pending` on top of `state`, folding at most
    /// [`Config::max_actions_per_reduction`] actions.
    pub fn prove_reduction(
        &mut self,
        state: &AppState<C::State>,
        pending: &[PendingAction<C::Action>],
    ) -> Result<ReducerProof<C>, WorkerError> {
        let seed = ReductionStatement {
            marker: state.snapshot,
            state: state.value,
        };
        let mut proof = self.reducer.init(seed)?;
        for next in pending.iter().take(self.chunk_len(pending.len())) {
            let handler = self.witnesses.witness(proof.output.state, &next.action)?;
            proof = self
                .reducer
                .handle_action(seed, &proof, next.tail, next.action.clone(), handler)?;
        }
        Ok(proof)
    }

    /// Reduces the current snapshot, snapshots newly appended actions and
    /// reduces those too.
    ///
    /// Stops at the first rejected submission and returns it.
    pub fn run_once(&mut self, processor: &Processor<C>) -> Result<Progress, WorkerError> {
        let mut actions = self.drain(processor)?;

        let snapshot_taken = match self.prove_snapshot(processor)? {
            Some(proof) => {
                processor.take_snapshot(&proof)?;
                true
            }
            None => false,
        };
        if snapshot_taken {
            actions += self.drain(processor)?;
        }

        if !snapshot_taken && actions == 0 {
            return Ok(Progress::Idle);
        }
        info!(snapshot_taken, actions, "worker made progress");
        Ok(Progress::Reduced {
            snapshot_taken,
            actions,
        })
    }

    /// Reduces the pending snapshot completely, one submission per chunk.
    fn drain(&mut self, processor: &Processor<C>) -> Result<usize, WorkerError> {
        let mut reduced = 0;
        loop {
            let state = processor
                .account()
                .state
                .ok_or(WorkerError::NotInitialized)?;
            let pending = self.pending_actions(processor, &state)?;
            if pending.is_empty() {
                return Ok(reduced);
            }
            let proof = self.prove_reduction(&state, &pending)?;
            processor.reduce(&proof)?;
            reduced += self.chunk_len(pending.len());
        }
    }

    /// Actions one reducer proof folds out of `pending`.
    fn chunk_len(&self, pending: usize) -> usize {
        self.config
            .max_actions_per_reduction
            .map_or(pending, |max| max.get().min(pending))
    }
}

#[cfg(test)]
mod tests {
    use pasta_curves::Fp;
    use rand::{SeedableRng as _, rngs::StdRng};

    use super::*;
    use crate::contract::{Counter, CounterAction, NoWitness};

    fn setup(config: Config) -> (Processor<Counter>, Worker<Counter, NoWitness>) {
        let params = Params::random(&mut StdRng::seed_from_u64(0));
        let processor = Processor::new(&params).unwrap();
        processor.init().unwrap();
        let worker = Worker::new(&params, NoWitness, config).unwrap();
        (processor, worker)
    }

    #[test]
    fn idle_without_actions() {
        let (processor, mut worker) = setup(Config::default());
        assert_eq!(worker.prove_snapshot(&processor), Ok(None));
        assert_eq!(worker.run_once(&processor), Ok(Progress::Idle));
    }

    #[test]
    fn pending_actions_are_chronological() {
        let (processor, worker) = setup(Config::default());
        for amount in [2u64, 3, 5] {
            processor.request_add(Fp::from(amount)).unwrap();
        }
        let proof = worker.prove_snapshot(&processor).unwrap().unwrap();
        let account = processor.take_snapshot(&proof).unwrap();

        let pending = worker
            .pending_actions(&processor, &account.state.unwrap())
            .unwrap();
        let amounts = pending
            .iter()
            .map(|next| match next.action {
                CounterAction::Add { amount } => amount,
            })
            .collect::<Vec<_>>();
        assert_eq!(
            amounts,
            vec![Fp::from(2u64), Fp::from(3u64), Fp::from(5u64)]
        );
        assert_eq!(pending.last().map(|next| next.tail), Some(Commitment::EMPTY));
    }

    /// With a cap of two, three snapshotted actions take two reductions.
    #[test]
    fn chunked_run_reduces_everything() {
        let two = NonZeroUsize::new(2).unwrap();
        let (processor, mut worker) =
            setup(Config::default().with_max_actions_per_reduction(two));
        for amount in [2u64, 3, 5] {
            processor.request_add(Fp::from(amount)).unwrap();
        }

        assert_eq!(
            worker.run_once(&processor),
            Ok(Progress::Reduced {
                snapshot_taken: true,
                actions: 3,
            })
        );
        let state = processor.account().state.unwrap();
        assert_eq!(state.value, Fp::from(10u64));
        assert!(state.snapshot.is_empty());
        assert_eq!(state.checkpoint, processor.account().action_state);
        assert_eq!(worker.run_once(&processor), Ok(Progress::Idle));
    }

    #[test]
    fn partial_reduction_leaves_the_rest_pending() {
        let one = NonZeroUsize::new(1).unwrap();
        let (processor, mut worker) =
            setup(Config::default().with_max_actions_per_reduction(one));
        for amount in [2u64, 3] {
            processor.request_add(Fp::from(amount)).unwrap();
        }
        let snapshot = worker.prove_snapshot(&processor).unwrap().unwrap();
        let state = processor.take_snapshot(&snapshot).unwrap().state.unwrap();

        let pending = worker.pending_actions(&processor, &state).unwrap();
        let proof = worker.prove_reduction(&state, &pending).unwrap();
        assert_eq!(proof.output.marker, pending[0].tail);
        let after = processor.reduce(&proof).unwrap().state.unwrap();

        assert_eq!(after.value, Fp::from(2u64));
        assert_eq!(after.snapshot, pending[0].tail);
        assert_eq!(worker.pending_actions(&processor, &after).unwrap().len(), 1);
    }

    #[test]
    fn uninitialized_contract_is_reported() {
        let params = Params::random(&mut StdRng::seed_from_u64(0));
        let processor = Processor::<Counter>::new(&params).unwrap();
        let mut worker = Worker::new(&params, NoWitness, Config::default()).unwrap();
        assert_eq!(
            worker.run_once(&processor),
            Err(WorkerError::NotInitialized)
        );
    }

    /// After a long reduced history, only the newly snapshotted action is
    /// pending.
    #[test]
    fn pending_actions_skip_reduced_history() {
        let (processor, mut worker) = setup(Config::default());
        for amount in 0..200u64 {
            processor.request_add(Fp::from(amount)).unwrap();
        }
        worker.run_once(&processor).unwrap();

        processor.request_add(Fp::from(7u64)).unwrap();
        let proof = worker.prove_snapshot(&processor).unwrap().unwrap();
        let state = processor.take_snapshot(&proof).unwrap().state.unwrap();

        assert_eq!(
            worker.pending_actions(&processor, &state),
            Ok(vec![PendingAction {
                tail: Commitment::EMPTY,
                action: CounterAction::Add {
                    amount: Fp::from(7u64),
                },
            }])
        );
        assert_eq!(
            processor
                .snapshotted_actions(state.checkpoint, state.snapshot)
                .map(|covered| covered.len()),
            Some(1)
        );
    }
}
