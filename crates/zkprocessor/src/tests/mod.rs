//! End-to-end tests: clients, a processor and reducer workers together.

mod list;

use pasta_curves::Fp;
use rand::{SeedableRng as _, rngs::StdRng};

use crate::{
    Params,
    contract::{Counter, CounterAction, NoWitness},
    processor::Processor,
    worker::{Config, Worker},
};

fn params() -> Params {
    Params::random(&mut StdRng::seed_from_u64(0x5eed))
}

fn add(amount: u64) -> CounterAction {
    CounterAction::Add {
        amount: Fp::from(amount),
    }
}

/// An initialized counter and a worker sharing its params.
fn counter(config: Config) -> (Processor<Counter>, Worker<Counter, NoWitness>) {
    let params = params();
    let processor = Processor::new(&params).unwrap();
    processor.init().unwrap();
    let worker = Worker::new(&params, NoWitness, config).unwrap();
    (processor, worker)
}
