//! ListTable: key/value table over the DList layer, with caller-supplied
//! key comparison and optional removal hooks.

use crate::dlist::DList;
use core::cmp::Ordering;

/// One stored key/value pair.
struct Entry<K, V> {
    key: K,
    value: V,
}

type KeyCmp<K> = Box<dyn Fn(&K, &K) -> Ordering>;
type RemovalHook<T> = Box<dyn FnMut(T)>;

/// A key/value table that permits duplicate keys, layered over a doubly
/// linked list.
///
/// Every operation is O(n) by design. Inserts link the new entry at the
/// head, so for duplicate keys a forward scan finds the most recent insert
/// first: lookups are latest-wins without any duplicate check on insert.
///
/// The table owns its keys and values. Removal hooks, when installed,
/// receive the owned key/value of each entry as it leaves the table (on
/// [`remove`](ListTable::remove), [`clear`](ListTable::clear) or drop) and
/// fire exactly once per entry, key hook before value hook. Without a hook
/// the payload is simply dropped.
pub struct ListTable<K, V> {
    entries: DList<Entry<K, V>>,
    key_cmp: KeyCmp<K>,
    key_hook: Option<RemovalHook<K>>,
    value_hook: Option<RemovalHook<V>>,
}

impl<K, V> ListTable<K, V>
where
    K: Ord + 'static,
    V: 'static,
{
    /// Empty table comparing keys with their `Ord` implementation.
    pub fn new() -> Self {
        Self::with_cmp(K::cmp)
    }
}

impl<K, V> Default for ListTable<K, V>
where
    K: Ord + 'static,
    V: 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> ListTable<K, V>
where
    K: 'static,
    V: 'static,
{
    /// Empty table with a caller-supplied comparator.
    ///
    /// The comparator returns a full `Ordering` so a sorted variant could
    /// share it, but only the `Equal`/non-`Equal` distinction is observed:
    /// two keys belong to the same lookup/remove group iff they compare
    /// `Equal`, regardless of `==`.
    pub fn with_cmp(key_cmp: impl Fn(&K, &K) -> Ordering + 'static) -> Self {
        Self {
            entries: DList::new(),
            key_cmp: Box::new(key_cmp),
            key_hook: None,
            value_hook: None,
        }
    }

    /// Install a hook that receives the owned key of every removed entry.
    pub fn on_key_removed(mut self, hook: impl FnMut(K) + 'static) -> Self {
        self.key_hook = Some(Box::new(hook));
        self
    }

    /// Install a hook that receives the owned value of every removed entry.
    pub fn on_value_removed(mut self, hook: impl FnMut(V) + 'static) -> Self {
        self.value_hook = Some(Box::new(hook));
        self
    }

    /// Number of entries, duplicates included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add a key/value pair. Never fails and never checks for duplicates;
    /// the new entry is linked before the current head, so it is the first
    /// one a forward scan encounters.
    pub fn insert(&mut self, key: K, value: V) {
        let first = self.entries.first();
        self.entries.insert_before(Entry { key, value }, first);
    }

    /// Value of the first entry (head to tail) whose key compares `Equal`
    /// to `key`; `None` on a miss or an empty table. With duplicate keys
    /// this is the value of the most recent matching insert.
    pub fn lookup(&self, key: &K) -> Option<&V> {
        self.entries
            .iter()
            .find(|(_, e)| (self.key_cmp)(&e.key, key) == Ordering::Equal)
            .map(|(_, e)| &e.value)
    }

    /// Like [`lookup`](ListTable::lookup), but yields mutable access.
    pub fn lookup_mut(&mut self, key: &K) -> Option<&mut V> {
        let mut pos = self.entries.first();
        while let Some(p) = pos {
            let matched = self
                .entries
                .get(p)
                .map_or(false, |e| (self.key_cmp)(&e.key, key) == Ordering::Equal);
            if matched {
                return self.entries.get_mut(p).map(|e| &mut e.value);
            }
            pos = self.entries.next(p);
        }
        None
    }

    /// Delete every entry whose key compares `Equal` to `key`, firing the
    /// removal hooks per entry, and return how many were removed. Entries
    /// that do not match keep their relative order. An absent key is a
    /// no-op returning 0.
    pub fn remove(&mut self, key: &K) -> usize {
        let mut removed = 0;
        let mut pos = self.entries.first();
        while let Some(p) = pos {
            let matched = self
                .entries
                .get(p)
                .map_or(false, |e| (self.key_cmp)(&e.key, key) == Ordering::Equal);
            if matched {
                // The scan only ever holds live positions.
                let (entry, next) = self.entries.remove(p).expect("scan position is live");
                release(&mut self.key_hook, &mut self.value_hook, entry);
                removed += 1;
                pos = next;
            } else {
                pos = self.entries.next(p);
            }
        }
        removed
    }

    /// Apply `visit` to every pair, head to tail (most recently inserted
    /// first). Pure traversal; the table is not touched.
    pub fn for_each(&self, mut visit: impl FnMut(&K, &V)) {
        for (k, v) in self.iter() {
            visit(k, v);
        }
    }

    /// Iterate over `(&key, &value)` pairs, head to tail.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.entries.iter(),
        }
    }
}

// `clear` lives outside the bounded impl so `Drop` can reach it for any
// K, V the struct admits.
impl<K, V> ListTable<K, V> {
    /// Delete every entry, firing the removal hooks per entry exactly once.
    /// The table stays usable afterwards.
    pub fn clear(&mut self) {
        while let Some(p) = self.entries.first() {
            if let Some((entry, _)) = self.entries.remove(p) {
                release(&mut self.key_hook, &mut self.value_hook, entry);
            }
        }
    }
}

impl<K, V> Drop for ListTable<K, V> {
    fn drop(&mut self) {
        // Teardown runs the same drain as `clear`, so hooks fire exactly
        // once for each surviving entry before its payload is dropped.
        self.clear();
    }
}

// Hand one removed entry to the hooks. Split out so `remove`, `clear` and
// `Drop` share it with split field borrows; an omitted hook means the
// payload is dropped here like any owned value.
fn release<K, V>(
    key_hook: &mut Option<RemovalHook<K>>,
    value_hook: &mut Option<RemovalHook<V>>,
    entry: Entry<K, V>,
) {
    let Entry { key, value } = entry;
    if let Some(hook) = key_hook.as_mut() {
        hook(key);
    }
    if let Some(hook) = value_hook.as_mut() {
        hook(value);
    }
}

/// Iterator over a table's `(&key, &value)` pairs, head to tail.
pub struct Iter<'a, K, V> {
    inner: crate::dlist::Iter<'a, Entry<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, e)| (&e.key, &e.value))
    }
}
