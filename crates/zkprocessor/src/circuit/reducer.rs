//! The reducer circuit: folds a chronological action list into state.

use core::marker::PhantomData;

use mock_pcd::{Application, ApplicationBuilder, Index, Params, Pcd, Result, Step, ensure_eq};
use tracing::debug;

use super::{header::ReductionStatement, witnesses::ActionWitness};
use crate::{action::Action as _, contract::Contract, primitives::Commitment};

/// Reduction statement of contract `C`.
pub type Statement<C> = ReductionStatement<<C as Contract>::State>;

/// A reducer proof: `input` is the seed, `output` how far folding got.
#[expect(
    clippy::module_name_repetitions,
    reason = "re-exported from the circuit module"
)]
pub type ReducerProof<C> = Pcd<Statement<C>, Statement<C>>;

// ═══════════════════════════════════════════════════════════════════════
// Init  (Index 0)
// ═══════════════════════════════════════════════════════════════════════

/// Base step: anchors the chain at its seed statement.
struct Init<C>(PhantomData<C>);

impl<C: Contract> Step<Statement<C>, Statement<C>> for Init<C> {
    const INDEX: Index = Index::new(0);

    type Witness = Statement<C>;
    type Left = ();

    fn witness(
        &self,
        input: &Statement<C>,
        witness: Statement<C>,
        _left: (),
    ) -> Result<Statement<C>> {
        ensure_eq(*input, witness, "statement is the seed")?;
        Ok(witness)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// HandleAction  (Index 1)
// ═══════════════════════════════════════════════════════════════════════

/// Recursive step: folds the next action.
///
/// 1. The predecessor has the same seed statement.
/// 2. $\mathsf{marker} = H(\mathsf{tail}, H(\text{encode}(a)))$: the action is
///    the outermost node of what is left to fold.
/// 3. The contract handler folds the action into the state.
///
/// Output is `(tail, handle(state, a))`. Skipping, reordering or repeating
/// an action breaks (2).
struct HandleAction<C>(PhantomData<C>);

impl<C: Contract> Step<Statement<C>, Statement<C>> for HandleAction<C> {
    const INDEX: Index = Index::new(1);

    type Witness = ActionWitness<C>;
    type Left = (Statement<C>, Statement<C>);

    fn witness(
        &self,
        input: &Statement<C>,
        witness: ActionWitness<C>,
        left: (Statement<C>, Statement<C>),
    ) -> Result<Statement<C>> {
        let (left_input, prev) = left;
        ensure_eq(left_input, *input, "same seed throughout")?;
        ensure_eq(
            prev.marker,
            Commitment::cons(witness.tail, witness.action.digest()),
            "action is next in sequence",
        )?;
        let state = C::handle(prev.state, &witness.action, witness.handler)?;
        Ok(ReductionStatement {
            marker: witness.tail,
            state,
        })
    }
}

/// The reducer circuit of contract `C`.
#[derive(Debug)]
pub struct Reducer<C: Contract> {
    app: Application<Statement<C>, Statement<C>>,
}

impl<C: Contract> Reducer<C> {
    /// Builds the circuit under `C::DOMAIN`: registers `Init` (0) and
    /// `HandleAction` (1).
    pub fn build(params: &Params) -> Result<Self> {
        let app = ApplicationBuilder::new(C::DOMAIN)
            .register(&Init::<C>(PhantomData))?
            .register(&HandleAction::<C>(PhantomData))?
            .finalize(params);
        Ok(Self { app })
    }

    /// Starts a reduction at `seed`.
    pub fn init(&self, seed: Statement<C>) -> Result<ReducerProof<C>> {
        debug!(marker = ?seed.marker, "reducer: init");
        self.app.seed(&Init::<C>(PhantomData), seed, seed)
    }

    /// Folds `action`, whose successors commit to `tail`, on top of `prev`.
    pub fn handle_action(
        &self,
        seed: Statement<C>,
        prev: &ReducerProof<C>,
        tail: Commitment,
        action: C::Action,
        handler: C::Witness,
    ) -> Result<ReducerProof<C>> {
        self.app.fold(
            &HandleAction::<C>(PhantomData),
            seed,
            ActionWitness {
                tail,
                action,
                handler,
            },
            prev,
        )
    }

    /// Checks a reducer proof against its public statement.
    pub fn verify(&self, proof: &ReducerProof<C>) -> Result<()> {
        self.app.verify(proof)
    }
}
