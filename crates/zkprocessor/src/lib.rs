//! # zkprocessor
//!
//! Concurrent, proof-gated state updates driven by an action log.
//!
//! Many clients submit requests against one piece of shared state. The
//! state only changes when a succinct proof of the change is verified
//! against it, so it can be re-derived and re-checked by anyone from the
//! log of committed actions.
//!
//! ## Lifecycle
//!
//! ```text
//!  request ─► action log (LIFO hash chain, no proof, never blocks)
//!                │
//!                ▼  Reversal proof            take_snapshot
//!            snapshot (FIFO hash chain) ─────────────────────► checkpoint, snapshot
//!                │
//!                ▼  Reducer proof             reduce
//!            folded state ───────────────────────────────────► value
//! ```
//!
//! - [`log`]: the action log, a running commitment over appended
//!   [`Action`]s.
//! - [`circuit`]: the [`Reversal`](circuit::Reversal) and
//!   [`Reducer`](circuit::Reducer) recursive circuits.
//! - [`ledger`]: the account, updated by precondition-gated
//!   compare-and-set.
//! - [`processor`]: the request surface (`init`, `request`,
//!   `take_snapshot`, `reduce`).
//! - [`worker`]: the out-of-band prover that snapshots and reduces.
//! - [`contract`]: the application logic folded by reducers.
//!
//! ## Staleness
//!
//! Proving is slow and requests keep arriving. A proof computed against an
//! account that has since moved is still valid, but its preconditions no
//! longer hold and it is rejected with
//! [`ProcessorError::Precondition`]. Only snapshots race against requests;
//! a taken snapshot is frozen, so reductions of it are unaffected by later
//! appends.
//!
//! ## Nomenclature
//!
//! "Action state" is the commitment to the whole action log. "Checkpoint"
//! is the action state up to which actions have been snapshotted.
//! "Snapshot" is the chronological commitment to the snapshotted actions
//! not yet reduced.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![expect(clippy::pub_use, reason = "exporting items for consumers")]

extern crate alloc;

pub mod action;
pub mod circuit;
pub mod constants;
pub mod contract;
pub mod ledger;
pub mod log;
pub mod processor;
pub mod worker;

mod primitives;

#[cfg(test)]
mod tests;

pub use action::Action;
pub use contract::{Contract, Counter, CounterAction, List, ListAction, Witnesses};
pub use ledger::{Account, AppState, Ledger, PreconditionMismatch, StateField, Update};
pub use mock_pcd::{Params, PcdError};
pub use primitives::{Commitment, Fp, hash};
pub use processor::{Processor, ProcessorError};
pub use worker::{Config, Progress, Worker, WorkerError};
