use core::fmt;

use crate::{Header, PcdError, Result};

/// Position of a [`Step`] within an [`Application`](crate::Application).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Index(u16);

impl Index {
    /// Creates a step index.
    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }
}

impl fmt::Display for Index {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// One method of a recursive circuit.
///
/// `I` is the public input shared by every proof in a chain and `O` is the
/// public output of this step.
///
/// Base steps use `Left = ()`. Recursive steps use `Left = (I, O)`: the
/// public input and output of the predecessor proof, which the application
/// has already verified before calling [`witness`](Step::witness).
pub trait Step<I: Header, O: Header> {
    /// Index of this step within its application.
    const INDEX: Index;

    /// Private inputs to the step.
    type Witness;

    /// Public data of the predecessor proof.
    type Left;

    /// Runs the step's assertions and computes its public output.
    fn witness(&self, input: &I, witness: Self::Witness, left: Self::Left) -> Result<O>;
}

/// Asserts two values are equal inside a step.
pub fn ensure_eq<T: PartialEq>(left: T, right: T, constraint: &'static str) -> Result<()> {
    if left == right {
        Ok(())
    } else {
        Err(PcdError::Unsatisfied(constraint))
    }
}

/// Asserts two values differ inside a step.
pub fn ensure_ne<T: PartialEq>(left: T, right: T, constraint: &'static str) -> Result<()> {
    if left == right {
        Err(PcdError::Unsatisfied(constraint))
    } else {
        Ok(())
    }
}
