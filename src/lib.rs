//! list-table: a single-threaded key/value table that permits duplicate
//! keys, layered over a doubly linked list.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a minimal, fully-ordered table whose interesting behavior is its
//!   entry lifecycle (duplicate-key semantics, latest-wins lookup, and
//!   hook-based release of keys and values), built in small layers that can
//!   be reasoned about independently.
//! - Layers:
//!   - DList<T>: doubly linked list with nodes in a slot arena, addressed
//!     through stable generational `Position` handles. Provides the
//!     positional contract (first/next/get/insert-before/remove-returning-
//!     next) the table is written against.
//!   - ListTable<K, V>: public API. Owns a `DList` of entries plus a key
//!     comparator and optional key/value removal hooks.
//!
//! Constraints
//! - Single-threaded, synchronous; no internal locking. Wrap the table in
//!   external mutual exclusion before sharing it across threads.
//! - Deliberately O(n) per operation: insert is O(1) at the head, lookup
//!   and remove are linear scans. There is no index and no rebalancing.
//! - Duplicate keys are permitted. Insert never scans for duplicates;
//!   instead new entries go to the head so a forward scan finds the most
//!   recent insert first (latest-wins), and remove scans the whole list so
//!   it deletes every matching entry.
//!
//! Why this split?
//! - Localize invariants: DList owns link integrity and stale-position
//!   safety; ListTable owns duplicate semantics and hook discipline.
//! - Positions are generational slot keys, so a position invalidated by a
//!   removal never resolves again: the classic removed-node-cursor bug
//!   becomes a checked `Option` instead of undefined behavior.
//! - User code (comparator, hooks, traversal visitors) only ever runs while
//!   the list is structurally consistent; hooks fire after the entry's node
//!   has been unlinked.
//!
//! Ownership and hooks
//! - The table owns every inserted key and value; dropping the table (or
//!   calling `clear`/`remove`) releases them. The optional removal hooks
//!   are close-notifications that consume the owned key/value of each
//!   removed entry, exactly once per entry, key hook before value hook.
//!   With no hook installed the payload is dropped like any owned value.
//!
//! Notes and non-goals
//! - No persistence, no wire format, no thread safety, no hashing or
//!   sorted index. The comparator returns a full `Ordering` but only the
//!   `Equal`/non-`Equal` distinction is observed.
//! - No "destroyed table" state: teardown is `Drop`, so use-after-teardown
//!   is unrepresentable rather than undefined.

pub mod dlist;
mod table;
mod table_proptest;

// Public surface
pub use dlist::{DList, Position};
pub use table::{Iter, ListTable};
