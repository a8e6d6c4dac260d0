//! Recursive circuits over the action log.
//!
//! Two PCD applications turn the action log into contract state:
//!
//! - **[`Reversal`]**: `Empty` (Index 0) and `Cons` (Index 1). Walks the
//!   LIFO log from its tip back to a checkpoint and re-emits the walked
//!   actions as a chronological list.
//! - **[`Reducer`]**: `Init` (Index 0) and `HandleAction` (Index 1). Unrolls
//!   the chronological list oldest-first, folding each action into the
//!   contract state with [`Contract::handle`](crate::contract::Contract::handle).
//!
//! ## Proof chains
//!
//! ```text
//!  Empty(tip) ─ Cons(a_n) ─ Cons(a_n-1) ─ … ─ Cons(a_1)     reversal
//!                                                 │ rev_order = snapshot
//!  Init(seed) ─ HandleAction(a_1) ─ … ─ HandleAction(a_n)  reducer
//! ```
//!
//! Each recursive step verifies its predecessor and checks that the
//! predecessor carries the same public input, so one final proof attests
//! to the whole chain.
//!
//! ## Headers
//!
//! | Header                 | Elements | Role |
//! |------------------------|----------|------|
//! | [`LogRange`]           | 1        | reversal input: log tip |
//! | [`ReversedList`]       | 2        | reversal output: `(in_order, rev_order)` |
//! | [`ReductionStatement`] | 1 + state | reducer input (seed) and output |

mod header;
mod reducer;
mod reversal;
mod witnesses;

pub use header::{LogRange, ReductionStatement, ReversedList};
pub use reducer::{Reducer, ReducerProof, Statement};
pub use reversal::{Reversal, ReversalProof};
pub use witnesses::{ActionWitness, ConsWitness};
