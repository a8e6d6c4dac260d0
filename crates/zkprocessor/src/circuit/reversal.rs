//! The reversal circuit: LIFO action log to FIFO snapshot.

use mock_pcd::{
    Application, ApplicationBuilder, Index, Params, Pcd, Result, Step, ensure_eq, ensure_ne,
};
use pasta_curves::Fp;
use tracing::debug;

use super::{
    header::{LogRange, ReversedList},
    witnesses::ConsWitness,
};
use crate::{constants::REVERSAL_DOMAIN, primitives::Commitment};

/// A reversal proof: `range` reversed down to `output.in_order`.
#[expect(
    clippy::module_name_repetitions,
    reason = "re-exported from the circuit module"
)]
pub type ReversalProof = Pcd<LogRange, ReversedList>;

// ═══════════════════════════════════════════════════════════════════════
// Empty  (Index 0)
// ═══════════════════════════════════════════════════════════════════════

/// Base step: nothing walked yet.
///
/// Fails on an empty range, which has no history to reverse.
struct Empty;

impl Step<LogRange, ReversedList> for Empty {
    const INDEX: Index = Index::new(0);

    type Witness = ();
    type Left = ();

    fn witness(&self, input: &LogRange, _witness: (), _left: ()) -> Result<ReversedList> {
        ensure_ne(input.start, Commitment::EMPTY, "range starts at a non-empty log")?;
        Ok(ReversedList {
            in_order: input.start,
            rev_order: Commitment::EMPTY,
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Cons  (Index 1)
// ═══════════════════════════════════════════════════════════════════════

/// Recursive step: moves one node from the LIFO log onto the FIFO list.
///
/// 1. The predecessor reversed the same `range`.
/// 2. $\mathsf{in\_order} = H(\mathsf{tail}, \mathsf{head})$: `head` really was
///    appended onto `tail` to form the node being walked.
/// 3. Output is $(\mathsf{tail}, H(\mathsf{rev\_order}, \mathsf{head}))$.
struct Cons;

impl Step<LogRange, ReversedList> for Cons {
    const INDEX: Index = Index::new(1);

    type Witness = ConsWitness;
    type Left = (LogRange, ReversedList);

    fn witness(
        &self,
        input: &LogRange,
        witness: ConsWitness,
        left: (LogRange, ReversedList),
    ) -> Result<ReversedList> {
        let (left_range, state) = left;
        ensure_eq(left_range, *input, "same range throughout")?;
        ensure_eq(
            state.in_order,
            Commitment::cons(witness.tail, witness.head),
            "head was appended onto tail",
        )?;
        Ok(ReversedList {
            in_order: witness.tail,
            rev_order: Commitment::cons(state.rev_order, witness.head),
        })
    }
}

/// The reversal circuit.
///
/// Proving walks the log newest to oldest: [`empty`](Self::empty) at the
/// tip, then one [`cons`](Self::cons) per action. After walking the actions
/// $a_n, \ldots, a_1$ the output `rev_order` has $a_1$ outermost, so a
/// reducer unrolling it sees the actions in the order they were appended.
#[derive(Debug)]
pub struct Reversal {
    app: Application<LogRange, ReversedList>,
}

impl Reversal {
    /// Builds the circuit: registers `Empty` (0) and `Cons` (1).
    pub fn build(params: &Params) -> Result<Self> {
        let app = ApplicationBuilder::new(REVERSAL_DOMAIN)
            .register(&Empty)?
            .register(&Cons)?
            .finalize(params);
        Ok(Self { app })
    }

    /// Starts reversing the log segment ending at `range.start`.
    pub fn empty(&self, range: LogRange) -> Result<ReversalProof> {
        debug!(start = ?range.start, "reversal: empty");
        self.app.seed(&Empty, range, ())
    }

    /// Reverses one more action, `head` appended onto `tail`.
    pub fn cons(
        &self,
        range: LogRange,
        head: Fp,
        tail: Commitment,
        prev: &ReversalProof,
    ) -> Result<ReversalProof> {
        self.app
            .fold(&Cons, range, ConsWitness { head, tail }, prev)
    }

    /// Checks a reversal proof against its public statement.
    pub fn verify(&self, proof: &ReversalProof) -> Result<()> {
        self.app.verify(proof)
    }
}

#[cfg(test)]
mod tests {
    use mock_pcd::PcdError;
    use rand::{SeedableRng as _, rngs::StdRng};

    use super::*;
    use crate::{action::Action as _, contract::CounterAction, log};

    fn add(amount: u64) -> CounterAction {
        CounterAction::Add {
            amount: Fp::from(amount),
        }
    }

    fn reversal() -> Reversal {
        Reversal::build(&Params::random(&mut StdRng::seed_from_u64(0))).unwrap()
    }

    #[test]
    fn empty_range_is_rejected() {
        let range = LogRange {
            start: log::empty(),
        };
        assert_eq!(
            reversal().empty(range).unwrap_err(),
            PcdError::Unsatisfied("range starts at a non-empty log")
        );
    }

    /// Reversing `[2, 3, 5]` yields the chain with 2 outermost.
    #[test]
    fn reverses_three_actions() {
        let reversal = reversal();
        let actions = [add(2), add(3), add(5)];
        let one = log::append(log::empty(), &actions[0]);
        let two = log::append(one, &actions[1]);
        let three = log::append(two, &actions[2]);
        let range = LogRange { start: three };

        let mut pcd = reversal.empty(range).unwrap();
        pcd = reversal.cons(range, actions[2].digest(), two, &pcd).unwrap();
        pcd = reversal.cons(range, actions[1].digest(), one, &pcd).unwrap();
        pcd = reversal
            .cons(range, actions[0].digest(), log::empty(), &pcd)
            .unwrap();

        reversal.verify(&pcd).unwrap();
        let expected = Commitment::cons(
            Commitment::cons(
                Commitment::cons(Commitment::EMPTY, actions[2].digest()),
                actions[1].digest(),
            ),
            actions[0].digest(),
        );
        assert_eq!(pcd.output.in_order, log::empty());
        assert_eq!(pcd.output.rev_order, expected);
    }

    /// Claiming a node that was never appended cannot be proved.
    #[test]
    fn cons_rejects_wrong_head() {
        let reversal = reversal();
        let start = log::append(log::empty(), &add(2));
        let range = LogRange { start };
        let pcd = reversal.empty(range).unwrap();
        assert_eq!(
            reversal
                .cons(range, add(3).digest(), log::empty(), &pcd)
                .unwrap_err(),
            PcdError::Unsatisfied("head was appended onto tail")
        );
    }

    /// A step cannot continue a proof that reversed a different range.
    #[test]
    fn cons_rejects_other_range() {
        let reversal = reversal();
        let start = log::append(log::empty(), &add(2));
        let pcd = reversal.empty(LogRange { start }).unwrap();
        let other = LogRange {
            start: log::append(start, &add(3)),
        };
        assert_eq!(
            reversal
                .cons(other, add(2).digest(), log::empty(), &pcd)
                .unwrap_err(),
            PcdError::Unsatisfied("same range throughout")
        );
    }

    #[test]
    fn cons_rejects_forged_predecessor() {
        let reversal = reversal();
        let start = log::append(log::empty(), &add(2));
        let range = LogRange { start };
        let mut pcd = reversal.empty(range).unwrap();
        pcd.output.in_order = log::append(log::empty(), &add(9));
        assert_eq!(
            reversal
                .cons(range, add(9).digest(), log::empty(), &pcd)
                .unwrap_err(),
            PcdError::Unverified
        );
    }
}
