mod commitment;

pub use commitment::{Commitment, hash};
pub use pasta_curves::Fp;
