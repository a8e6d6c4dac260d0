use mock_pcd::PcdError;
use pasta_curves::Fp;

use super::params;
use crate::{
    contract::{List, ListAction, ListNode, MemoryStore, MerkleList},
    processor::Processor,
    worker::{Config, Progress, Worker, WorkerError},
};

fn list() -> (Processor<List>, Worker<List, MemoryStore>) {
    let params = params();
    let processor = Processor::new(&params).unwrap();
    processor.init().unwrap();
    let worker = Worker::new(&params, MemoryStore::default(), Config::default()).unwrap();
    (processor, worker)
}

fn push(element: u64) -> ListAction {
    ListAction::Push {
        element: Fp::from(element),
    }
}

fn list_of(elements: &[u64]) -> MerkleList {
    elements
        .iter()
        .fold(MerkleList::EMPTY, |tail, element| {
            ListNode {
                tail,
                head: Fp::from(*element),
            }
            .to_list()
        })
}

/// Push 1, 2, 3 then pop: the reduced list is `[1, 2]`.
#[test]
fn push_push_push_pop() {
    let (processor, mut worker) = list();
    for action in [push(1), push(2), push(3), ListAction::Pop] {
        processor.request(action).unwrap();
    }

    assert_eq!(
        worker.run_once(&processor),
        Ok(Progress::Reduced {
            snapshot_taken: true,
            actions: 4,
        })
    );
    assert_eq!(
        processor.account().state.map(|current| current.value),
        Some(list_of(&[1, 2]))
    );
    assert_eq!(worker.witnesses().len(), 3);
}

/// Pops in a later snapshot read nodes written while reducing an earlier
/// one.
#[test]
fn pops_across_snapshots() {
    let (processor, mut worker) = list();
    processor.request(push(7)).unwrap();
    processor.request(push(8)).unwrap();
    worker.run_once(&processor).unwrap();

    processor.request(ListAction::Pop).unwrap();
    processor.request(ListAction::Pop).unwrap();
    worker.run_once(&processor).unwrap();

    assert_eq!(
        processor.account().state.map(|current| current.value),
        Some(MerkleList::EMPTY)
    );
}

/// Popping an empty list cannot be proved, so the snapshot holding the pop
/// stays unreduced.
#[test]
fn pop_on_empty_list_is_unprovable() {
    let (processor, mut worker) = list();
    processor.request(ListAction::Pop).unwrap();

    assert_eq!(
        worker.run_once(&processor),
        Err(WorkerError::Proving(PcdError::Unsatisfied(
            "pop from an unknown list"
        )))
    );
    let state = processor.account().state.unwrap();
    assert_eq!(state.value, MerkleList::EMPTY);
    assert!(!state.snapshot.is_empty());
}
