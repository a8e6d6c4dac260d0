//! Protocol-wide domain separators and personalizations.
//!
//! BLAKE2b personalizations are exactly 16 bytes (the BLAKE2b personal field
//! width). Circuit domains are variable-length strings under the
//! `zkprocessor:` namespace.

/// BLAKE2b-512 personalization for the commitment hash $H$.
///
/// $$H(x_1, \ldots, x_n) = \text{ToBase}(\text{BLAKE2b-512}(
/// \text{"ZkProcessor_Hash"},\; x_1 \| \cdots \| x_n))$$
pub const HASH_PERSONALIZATION: &[u8; 16] = b"ZkProcessor_Hash";

/// Domain of the reversal circuit (LIFO action log to FIFO snapshot).
pub const REVERSAL_DOMAIN: &str = "zkprocessor:ReversedActions";

/// Domain of the reducer circuit for the [`Counter`](crate::contract::Counter)
/// contract.
pub const COUNTER_REDUCER_DOMAIN: &str = "zkprocessor:Reducer:Counter";

/// Domain of the reducer circuit for the [`List`](crate::contract::List)
/// contract.
pub const LIST_REDUCER_DOMAIN: &str = "zkprocessor:Reducer:List";
