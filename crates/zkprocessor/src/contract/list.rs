//! An authenticated stack of field elements.
//!
//! The state is only the commitment to the list. Popping needs the node
//! behind that commitment, so every pushed node is written to a
//! [`NodeStore`] while the reduction is proved and read back for the
//! matching pop.

#![expect(
    clippy::module_name_repetitions,
    reason = "ListAction and ListNode read better than Action and Node outside this module"
)]

use alloc::collections::BTreeMap;

use ff::{Field as _, PrimeField as _};
use mock_pcd::{Header, PcdError, Result, Suffix, ensure_eq};
use pasta_curves::Fp;

use super::{Contract, Witnesses};
use crate::{action::Action, constants::LIST_REDUCER_DOMAIN, primitives::Commitment};

/// Commitment to a list of field elements.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MerkleList(pub Commitment);

impl MerkleList {
    /// The empty list.
    pub const EMPTY: Self = Self(Commitment::EMPTY);
}

impl Header for MerkleList {
    const SUFFIX: Suffix = Suffix::new(0x20);

    fn encode(&self) -> Vec<Fp> {
        self.0.encode()
    }
}

/// The outermost node of a non-empty list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListNode {
    /// The rest of the list.
    pub tail: MerkleList,
    /// The most recently pushed element.
    pub head: Fp,
}

impl ListNode {
    /// The commitment of the list this node heads.
    #[must_use]
    pub fn to_list(&self) -> MerkleList {
        MerkleList(Commitment::cons(self.tail.0, self.head))
    }
}

/// Requests against a [`List`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListAction {
    /// Pushes `element` onto the list.
    Push {
        /// Element to push.
        element: Fp,
    },
    /// Removes the most recently pushed element.
    Pop,
}

impl Action for ListAction {
    fn encode(&self) -> Vec<Fp> {
        match *self {
            Self::Push { element } => vec![Fp::ZERO, element],
            Self::Pop => vec![Fp::ONE],
        }
    }
}

/// A stack of field elements, committed as a [`MerkleList`].
///
/// `Pop` takes the node behind the current state as its witness and fails
/// on an empty list.
#[derive(Clone, Copy, Debug)]
pub struct List;

impl Contract for List {
    const DOMAIN: &'static str = LIST_REDUCER_DOMAIN;

    type State = MerkleList;
    type Action = ListAction;
    type Witness = Option<ListNode>;

    fn initial() -> MerkleList {
        MerkleList::EMPTY
    }

    fn handle(
        state: MerkleList,
        action: &ListAction,
        witness: Option<ListNode>,
    ) -> Result<MerkleList> {
        match *action {
            ListAction::Push { element } => Ok(ListNode {
                tail: state,
                head: element,
            }
            .to_list()),
            ListAction::Pop => {
                let node = witness.ok_or(PcdError::Unsatisfied("pop needs the head node"))?;
                ensure_eq(node.to_list(), state, "pop node heads the list")?;
                Ok(node.tail)
            }
        }
    }
}

/// Off-chain storage for list nodes, keyed by the list they head.
pub trait NodeStore {
    /// Stores `node`.
    fn write(&mut self, node: ListNode);

    /// Returns the node heading `list`, if stored.
    fn read(&self, list: MerkleList) -> Option<ListNode>;
}

/// In-memory [`NodeStore`].
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    nodes: BTreeMap<[u8; 32], ListNode>,
}

impl MemoryStore {
    /// Number of stored nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no node has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl NodeStore for MemoryStore {
    fn write(&mut self, node: ListNode) {
        let key = Fp::from(node.to_list().0).to_repr();
        self.nodes.insert(key, node);
    }

    fn read(&self, list: MerkleList) -> Option<ListNode> {
        self.nodes.get(&Fp::from(list.0).to_repr()).copied()
    }
}

impl<S: NodeStore> Witnesses<List> for S {
    fn witness(&mut self, state: MerkleList, action: &ListAction) -> Result<Option<ListNode>> {
        match *action {
            ListAction::Push { element } => {
                self.write(ListNode {
                    tail: state,
                    head: element,
                });
                Ok(None)
            }
            ListAction::Pop => self
                .read(state)
                .map(Some)
                .ok_or(PcdError::Unsatisfied("pop from an unknown list")),
        }
    }
}
