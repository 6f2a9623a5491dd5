//! DList: the ordered-sequence layer. A doubly linked list whose nodes live
//! in a slot arena and are addressed through stable generational positions.

use slotmap::{DefaultKey, SlotMap};

/// Stable position of one element in a [`DList`]. Copyable and cheap; a
/// position obtained from an insert or a traversal stays valid until that
/// element is removed, after which it never resolves again (generational
/// keys prevent aliasing a recycled slot).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Position(DefaultKey);

impl Position {
    pub(crate) fn new(k: DefaultKey) -> Self {
        Position(k)
    }
    pub(crate) fn raw(&self) -> DefaultKey {
        self.0
    }
}

struct Node<T> {
    item: T,
    prev: Option<DefaultKey>,
    next: Option<DefaultKey>,
}

/// Doubly linked list with positional access.
///
/// The end of the sequence is represented as `None` wherever an
/// `Option<Position>` appears, so `insert_before(x, list.first())` prepends
/// (also into an empty list) and `insert_before(x, None)` appends.
///
/// Dropping the list drops the arena and with it every remaining element; no
/// separate teardown step exists.
pub struct DList<T> {
    nodes: SlotMap<DefaultKey, Node<T>>,
    head: Option<DefaultKey>,
    tail: Option<DefaultKey>,
}

impl<T> DList<T> {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            head: None,
            tail: None,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Head position, or `None` for the empty list.
    pub fn first(&self) -> Option<Position> {
        self.head.map(Position::new)
    }

    /// Position after `pos`; `None` at the tail or for a stale position.
    pub fn next(&self, pos: Position) -> Option<Position> {
        self.nodes.get(pos.raw())?.next.map(Position::new)
    }

    pub fn get(&self, pos: Position) -> Option<&T> {
        self.nodes.get(pos.raw()).map(|n| &n.item)
    }

    pub fn get_mut(&mut self, pos: Position) -> Option<&mut T> {
        self.nodes.get_mut(pos.raw()).map(|n| &mut n.item)
    }

    /// Link a new element immediately before `pos` and return its position.
    /// `None` (and any stale position) means the end, i.e. append.
    pub fn insert_before(&mut self, item: T, pos: Option<Position>) -> Position {
        let next_key = pos
            .map(|p| p.raw())
            .filter(|k| self.nodes.contains_key(*k));
        match next_key {
            Some(next_key) => {
                let prev_key = self.nodes[next_key].prev;
                let new_key = self.nodes.insert(Node {
                    item,
                    prev: prev_key,
                    next: Some(next_key),
                });
                self.nodes[next_key].prev = Some(new_key);
                match prev_key {
                    Some(p) => self.nodes[p].next = Some(new_key),
                    None => self.head = Some(new_key),
                }
                Position::new(new_key)
            }
            None => {
                let new_key = self.nodes.insert(Node {
                    item,
                    prev: self.tail,
                    next: None,
                });
                match self.tail {
                    Some(t) => self.nodes[t].next = Some(new_key),
                    None => self.head = Some(new_key),
                }
                self.tail = Some(new_key);
                Position::new(new_key)
            }
        }
    }

    pub fn push_front(&mut self, item: T) -> Position {
        let first = self.first();
        self.insert_before(item, first)
    }

    pub fn push_back(&mut self, item: T) -> Position {
        self.insert_before(item, None)
    }

    /// Unlink the element at `pos`, returning it together with the position
    /// that followed it (the cursor a scan should continue from). Returns
    /// `None` and leaves the list unchanged for a stale position.
    pub fn remove(&mut self, pos: Position) -> Option<(T, Option<Position>)> {
        let node = self.nodes.remove(pos.raw())?;
        match node.prev {
            Some(p) => self.nodes[p].next = node.next,
            None => self.head = node.next,
        }
        match node.next {
            Some(n) => self.nodes[n].prev = node.prev,
            None => self.tail = node.prev,
        }
        Some((node.item, node.next.map(Position::new)))
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }
}

impl<T> Default for DList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Forward (head-to-tail) iterator over a `DList`.
pub struct Iter<'a, T> {
    list: &'a DList<T>,
    cursor: Option<DefaultKey>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (Position, &'a T);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let k = self.cursor?;
        let node = &self.list.nodes[k];
        self.cursor = node.next;
        Some((Position::new(k), &node.item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items<T: Clone>(l: &DList<T>) -> Vec<T> {
        l.iter().map(|(_, x)| x.clone()).collect()
    }

    /// Invariant: `push_front`/`push_back` place elements at the expected
    /// ends and forward iteration visits head to tail.
    #[test]
    fn push_and_iterate_in_order() {
        let mut l: DList<i32> = DList::new();
        assert!(l.is_empty());

        l.push_back(2);
        l.push_front(1);
        l.push_back(3);

        assert_eq!(l.len(), 3);
        assert_eq!(items(&l), vec![1, 2, 3]);
    }

    /// Invariant: `insert_before(x, first())` prepends, including into an
    /// empty list; `insert_before(x, None)` appends; inserting before an
    /// interior position links in the middle.
    #[test]
    fn insert_before_covers_all_positions() {
        let mut l: DList<&str> = DList::new();

        let first = l.first();
        assert!(first.is_none());
        l.insert_before("b", first); // empty list: becomes the sole node
        let first = l.first();
        l.insert_before("a", first);
        l.insert_before("d", None);

        let p_d = l.iter().find(|(_, x)| **x == "d").map(|(p, _)| p).unwrap();
        l.insert_before("c", Some(p_d));

        assert_eq!(items(&l), vec!["a", "b", "c", "d"]);
    }

    /// Invariant: `remove` unlinks head, interior and tail nodes correctly
    /// and returns the position the scan should continue from.
    #[test]
    fn remove_relinks_and_returns_next() {
        let mut l: DList<i32> = DList::new();
        let positions: Vec<Position> = (1..=5).map(|i| l.push_back(i)).collect();

        // Interior: next is the following node.
        let (item, next) = l.remove(positions[2]).unwrap();
        assert_eq!(item, 3);
        assert_eq!(next, Some(positions[3]));
        assert_eq!(items(&l), vec![1, 2, 4, 5]);

        // Head: next is the new head.
        let (item, next) = l.remove(positions[0]).unwrap();
        assert_eq!(item, 1);
        assert_eq!(next, l.first());

        // Tail: next is end.
        let (item, next) = l.remove(positions[4]).unwrap();
        assert_eq!(item, 5);
        assert_eq!(next, None);

        assert_eq!(items(&l), vec![2, 4]);
    }

    /// Invariant: a removed position never resolves again, even if the
    /// physical slot is reused by a later insert (generational keys).
    #[test]
    fn stale_position_does_not_alias_new_node() {
        let mut l: DList<i32> = DList::new();
        let p1 = l.push_back(1);
        let _ = l.remove(p1).unwrap();

        // Next insert likely reuses the freed slot with a bumped generation.
        let p2 = l.push_back(2);
        assert_ne!(p1, p2, "positions must differ across generations");
        assert!(l.get(p1).is_none(), "stale position must not resolve");
        assert!(l.next(p1).is_none());
        assert!(l.remove(p1).is_none(), "stale removal leaves list unchanged");
        assert_eq!(l.len(), 1);
    }

    /// Invariant: `get_mut` mutates in place; the change is visible through
    /// subsequent reads at the same position.
    #[test]
    fn get_mut_updates_in_place() {
        let mut l: DList<i32> = DList::new();
        let p = l.push_back(10);
        *l.get_mut(p).unwrap() += 5;
        assert_eq!(l.get(p), Some(&15));
    }

    /// Invariant: removing every element one by one from the head empties
    /// the list and restores `is_empty`.
    #[test]
    fn drain_from_head_until_empty() {
        let mut l: DList<i32> = DList::new();
        for i in 0..4 {
            l.push_back(i);
        }
        let mut drained = Vec::new();
        while let Some(p) = l.first() {
            let (item, _) = l.remove(p).unwrap();
            drained.push(item);
        }
        assert_eq!(drained, vec![0, 1, 2, 3]);
        assert!(l.is_empty());
        assert_eq!(l.len(), 0);
    }
}
