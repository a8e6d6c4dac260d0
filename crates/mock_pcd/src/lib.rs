//! # mock_pcd
//!
//! A BLAKE2b-based mock of a proof-carrying data (PCD) proof system.
//!
//! A real PCD system compiles each [`Step`] into a circuit and produces a
//! succinct proof that the step ran on top of an already verified proof. This
//! mock keeps the same shape and the same failure behavior:
//!
//! - [`Step::witness`] runs the step's assertions natively and returns the
//!   public output, or [`PcdError::Unsatisfied`] if any assertion fails. No
//!   proof exists for an unsatisfied step.
//! - [`Application::fold`] verifies the predecessor [`Pcd`] before running
//!   the step, so a proof only exists if every step in its history succeeded.
//! - The proof is a constant-size keyed BLAKE2b-512 digest over the
//!   application domain, the encoded public input and the encoded public
//!   output.
//!
//! ## Usage
//!
//! ```ignore
//! let params = Params::random(&mut rng);
//! let app = ApplicationBuilder::new("example")
//!     .register(&base)?
//!     .register(&extend)?
//!     .finalize(&params);
//!
//! let pcd = app.seed(&base, input, witness)?;
//! let next = app.fold(&extend, input, witness, &pcd)?;
//! app.verify(&next)?;
//! ```
//!
//! Anyone holding the [`Params`] can forge proofs. This is a stand-in for the
//! proving backend in tests and demos only.

#![cfg_attr(not(feature = "std"), no_std)]
#![expect(clippy::pub_use, reason = "exporting items for consumers")]

extern crate alloc;

use core::result;

mod application;
mod header;
mod proof;
mod step;

pub use application::{Application, ApplicationBuilder};
pub use header::{Header, Suffix};
pub use proof::{Params, Pcd, Proof};
pub use step::{Index, Step, ensure_eq, ensure_ne};

/// Errors raised while proving or verifying.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PcdError {
    /// An assertion inside a step failed; no proof was produced.
    #[error("step constraint unsatisfied: {0}")]
    Unsatisfied(&'static str),

    /// A proof does not verify against its claimed statement.
    #[error("proof does not verify against its statement")]
    Unverified,

    /// Two steps with the same index were registered.
    #[error("step index {0} registered twice")]
    DuplicateStep(Index),

    /// A step was used with an application it was never registered with.
    #[error("step index {0} is not registered")]
    UnknownStep(Index),
}

/// Result type for proving and verification.
pub type Result<T, E = PcdError> = result::Result<T, E>;
