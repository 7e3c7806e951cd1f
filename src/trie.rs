use std::borrow::Borrow;
use std::fmt;
use std::ops::{Index, IndexMut};

use tracing::{debug, trace};

use crate::as_symbols::AsSymbols;
use crate::entry::{Entry, OccupiedEntry, VacantEntry};
use crate::iter::{Iter, Keys, Values};
use crate::node::NodeIdx;
use crate::node_pool::NodePool;

pub(crate) const LOG_TARGET: &str = "symtrie";

/// A `Trie` maps sequences of symbols to values using a prefix tree.
///
/// The symbol type `S` is anything totally ordered: `char` for text keys,
/// `u8` for byte strings, integers for numeric paths. Keys are passed as
/// anything implementing [`AsSymbols<S>`].
///
/// # Features
///
/// - Lookups in O(k) where k is the key length
/// - Prefix queries and prefix-restricted iteration
/// - Removal that prunes every node left without a value or children
/// - Deep cloning when both symbols and values are `Clone`
/// - An ASCII tree rendering through [`Display`](std::fmt::Display)
///
/// # Examples
///
/// ```
/// use symtrie::Trie;
///
/// let mut trie = Trie::new();
///
/// trie.insert("hello", 1);
/// trie.insert("help", 2);
/// trie.insert("world", 3);
///
/// assert!(trie.contains_key("hello"));
/// assert!(!trie.contains_key("hel"));
/// assert!(trie.contains_prefix("hel"));
///
/// assert_eq!(trie.get("help"), Some(&2));
///
/// assert!(trie.erase("hello"));
/// assert!(!trie.erase("hello"));
/// assert!(trie.contains_prefix("hel"));
///
/// println!("{trie}");
/// ```
pub struct Trie<S, V> {
    pub(crate) pool: NodePool<S, V>,
    pub(crate) root: NodeIdx,
    pub(crate) size: usize,
}

impl<S: Ord, V> Default for Trie<S, V> {
    /// Creates a new empty `Trie`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use symtrie::Trie;
    /// let trie: Trie<char, i32> = Default::default();
    /// assert!(trie.is_empty());
    /// ```
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Ord, V> Trie<S, V> {
    /// Creates a new empty `Trie`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use symtrie::Trie;
    /// let trie: Trie<char, i32> = Trie::new();
    /// assert!(trie.is_empty());
    /// assert_eq!(trie.node_count(), 1);
    /// ```
    pub fn new() -> Self {
        Trie {
            pool: NodePool::new(),
            root: NodePool::<S, V>::ROOT,
            size: 0,
        }
    }

    /// Creates a new `Trie` with room for `capacity` nodes.
    ///
    /// # Examples
    ///
    /// ```
    /// # use symtrie::Trie;
    /// let mut trie: Trie<char, i32> = Trie::with_capacity(64);
    /// assert!(trie.is_empty());
    /// assert_eq!(trie.node_count(), 1);
    ///
    /// trie.insert("abc", 1);
    /// assert_eq!(trie.node_count(), 4);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Trie {
            pool: NodePool::with_capacity(capacity),
            root: NodePool::<S, V>::ROOT,
            size: 0,
        }
    }

    /// Returns the number of keys holding a value.
    ///
    /// # Examples
    ///
    /// ```
    /// # use symtrie::Trie;
    /// let mut trie = Trie::new();
    /// assert_eq!(trie.len(), 0);
    ///
    /// trie.insert("a", 1);
    /// trie.insert("a", 2);
    /// assert_eq!(trie.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if no key holds a value.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of nodes in the tree, root included.
    ///
    /// Every node other than the root either holds a value or has a child,
    /// so this is one more than the number of distinct non-empty prefixes
    /// of the stored keys.
    ///
    /// # Examples
    ///
    /// ```
    /// # use symtrie::Trie;
    /// let mut trie = Trie::new();
    /// trie.insert("ab", 1);
    /// trie.insert("ac", 2);
    /// assert_eq!(trie.node_count(), 4);
    ///
    /// trie.erase("ac");
    /// assert_eq!(trie.node_count(), 3);
    /// ```
    pub fn node_count(&self) -> usize {
        self.pool.live_nodes()
    }

    /// Removes every key, keeping only an empty root.
    pub fn clear(&mut self) {
        self.pool.clear();
        self.size = 0;
    }

    /// Inserts a value under `key`, creating the missing path nodes.
    ///
    /// If the key already held a value it is overwritten and the old value
    /// is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// # use symtrie::Trie;
    /// let mut trie = Trie::new();
    /// assert_eq!(trie.insert("alt", 9), None);
    /// assert_eq!(trie.insert("alt", 10), Some(9));
    /// assert_eq!(trie.get("alt"), Some(&10));
    /// ```
    pub fn insert<K: AsSymbols<S>>(&mut self, key: K, value: V) -> Option<V> {
        let idx = self.pool.find_or_create(self.root, key.symbols());
        let previous = self.pool.get_node_mut(idx).value.replace(value);
        if previous.is_none() {
            self.size += 1;
        }
        previous
    }

    /// Returns `true` if a path exists for every symbol of `key`, whether or
    /// not a value ends there. The empty key is always a prefix.
    ///
    /// # Examples
    ///
    /// ```
    /// # use symtrie::Trie;
    /// let mut trie = Trie::new();
    /// trie.insert("hello", 1);
    ///
    /// assert!(trie.contains_prefix(""));
    /// assert!(trie.contains_prefix("hell"));
    /// assert!(trie.contains_prefix("hello"));
    /// assert!(!trie.contains_prefix("helloo"));
    /// ```
    pub fn contains_prefix<K: AsSymbols<S>>(&self, key: K) -> bool {
        self.find(key).is_some()
    }

    /// Returns `true` if `key` is stored with a value.
    ///
    /// # Examples
    ///
    /// ```
    /// # use symtrie::Trie;
    /// let mut trie = Trie::new();
    /// trie.insert("hello", 1);
    ///
    /// assert!(trie.contains_key("hello"));
    /// assert!(!trie.contains_key("hell"));
    /// ```
    pub fn contains_key<K: AsSymbols<S>>(&self, key: K) -> bool {
        self.get(key).is_some()
    }

    /// Returns `true` if at least one stored key starts with `prefix`.
    ///
    /// Unlike [`contains_prefix`](Self::contains_prefix) the empty prefix
    /// only matches a non-empty trie.
    ///
    /// # Examples
    ///
    /// ```
    /// # use symtrie::Trie;
    /// let mut trie: Trie<char, i32> = Trie::new();
    /// assert!(!trie.starts_with(""));
    ///
    /// trie.insert("apple", 1);
    /// assert!(trie.starts_with("app"));
    /// assert!(!trie.starts_with("ban"));
    /// ```
    pub fn starts_with<K: AsSymbols<S>>(&self, prefix: K) -> bool {
        self.find(prefix)
            .is_some_and(|idx| self.pool.get_node(idx).is_meaningful())
    }

    /// Returns a reference to the value stored under `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use symtrie::Trie;
    /// let mut trie = Trie::new();
    /// trie.insert("hello", 42);
    ///
    /// assert_eq!(trie.get("hello"), Some(&42));
    /// assert_eq!(trie.get("hell"), None);
    /// ```
    pub fn get<K: AsSymbols<S>>(&self, key: K) -> Option<&V> {
        let idx = self.find(key)?;
        self.pool.get_node(idx).value.as_ref()
    }

    /// Returns a mutable reference to the value stored under `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use symtrie::Trie;
    /// let mut trie = Trie::new();
    /// trie.insert("a", 1);
    ///
    /// if let Some(value) = trie.get_mut("a") {
    ///     *value = 10;
    /// }
    /// assert_eq!(trie.get("a"), Some(&10));
    /// ```
    pub fn get_mut<K: AsSymbols<S>>(&mut self, key: K) -> Option<&mut V> {
        let idx = self.find(key)?;
        self.pool.get_node_mut(idx).value.as_mut()
    }

    /// Returns an entry for in-place manipulation of the value under `key`.
    ///
    /// No node is created until a vacant entry is actually inserted into.
    ///
    /// # Examples
    ///
    /// ```
    /// # use symtrie::{Trie, Entry};
    /// let mut trie = Trie::new();
    ///
    /// trie.entry("a").or_insert(1);
    ///
    /// if let Entry::Occupied(mut occupied) = trie.entry("a") {
    ///     *occupied.get_mut() += 10;
    /// }
    ///
    /// assert_eq!(trie.get("a"), Some(&11));
    /// ```
    pub fn entry<K: AsSymbols<S>>(&mut self, key: K) -> Entry<'_, S, V> {
        let key = key.symbols_vec();
        let occupied = self
            .pool
            .find(self.root, &key)
            .filter(|&idx| self.pool.get_node(idx).value.is_some());

        match occupied {
            Some(node) => Entry::Occupied(OccupiedEntry {
                trie: self,
                key,
                node,
            }),
            None => Entry::Vacant(VacantEntry { trie: self, key }),
        }
    }

    /// Returns the value under `key`, inserting `V::default()` first if the
    /// key holds none.
    ///
    /// This is the indexed mutable access: the path is created on demand and
    /// the slot is never left without a value.
    ///
    /// # Examples
    ///
    /// ```
    /// # use symtrie::Trie;
    /// let mut trie: Trie<char, i32> = Trie::new();
    ///
    /// *trie.get_or_insert_default("hello") += 1;
    /// *trie.get_or_insert_default("hello") += 1;
    /// assert_eq!(trie.get("hello"), Some(&2));
    /// ```
    pub fn get_or_insert_default<K: AsSymbols<S>>(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.entry(key).or_default()
    }

    /// Returns the value under `key`, inserting the result of `f` first if the
    /// key holds none.
    ///
    /// # Examples
    ///
    /// ```
    /// # use symtrie::Trie;
    /// let mut trie = Trie::new();
    ///
    /// *trie.get_or_insert_with("a", || 42) += 1;
    /// assert_eq!(trie.get("a"), Some(&43));
    ///
    /// let value = trie.get_or_insert_with("a", || unreachable!());
    /// assert_eq!(*value, 43);
    /// ```
    pub fn get_or_insert_with<K: AsSymbols<S>, F>(&mut self, key: K, f: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        self.entry(key).or_insert_with(f)
    }

    /// Inserts `value` only if `key` holds no value yet.
    ///
    /// On success returns a mutable reference to the stored value, otherwise
    /// hands `value` back.
    ///
    /// # Examples
    ///
    /// ```
    /// # use symtrie::Trie;
    /// let mut trie = Trie::new();
    ///
    /// assert!(trie.try_insert("a", 1).is_ok());
    /// assert_eq!(trie.try_insert("a", 2), Err(2));
    /// assert_eq!(trie.get("a"), Some(&1));
    /// ```
    pub fn try_insert<K: AsSymbols<S>>(&mut self, key: K, value: V) -> Result<&mut V, V> {
        match self.entry(key) {
            Entry::Vacant(entry) => Ok(entry.insert(value)),
            Entry::Occupied(_) => Err(value),
        }
    }

    /// Removes the value under `key` and returns it.
    ///
    /// Nodes left without a value and without children are pruned, walking
    /// upwards until an ancestor that still guards another key. Removing a
    /// key that is not stored changes nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// # use symtrie::Trie;
    /// let mut trie = Trie::new();
    /// trie.insert("hel", 1);
    /// trie.insert("hello", 2);
    ///
    /// assert_eq!(trie.remove("hello"), Some(2));
    /// assert_eq!(trie.remove("hello"), None);
    /// assert!(trie.contains_key("hel"));
    /// assert!(!trie.contains_prefix("hello"));
    /// ```
    pub fn remove<K: AsSymbols<S>>(&mut self, key: K) -> Option<V> {
        self.remove_symbols(key.symbols())
    }

    /// Removes the value under `key`, returning whether one was there.
    ///
    /// # Examples
    ///
    /// ```
    /// # use symtrie::Trie;
    /// let mut trie = Trie::new();
    /// trie.insert("hello", 1);
    ///
    /// assert!(!trie.erase("hell"));
    /// assert!(trie.erase("hello"));
    /// assert!(trie.is_empty());
    /// assert_eq!(trie.node_count(), 1);
    /// ```
    pub fn erase<K: AsSymbols<S>>(&mut self, key: K) -> bool {
        self.remove(key).is_some()
    }

    pub(crate) fn remove_symbols<I>(&mut self, symbols: I) -> Option<V>
    where
        I: IntoIterator<Item = S>,
    {
        let mut path = Vec::new();
        let mut current = self.root;
        for symbol in symbols {
            let child = self.pool.child(current, &symbol)?;
            path.push((current, symbol));
            current = child;
        }

        let removed = self.pool.get_node_mut(current).value.take()?;
        self.size -= 1;
        self.prune(path, current);
        Some(removed)
    }

    /// Drops nodes along `path` that no longer guard any key, deepest first.
    fn prune_path<Q: Borrow<S>>(&mut self, path: &[Q]) {
        let mut edges: Vec<(NodeIdx, &S)> = Vec::with_capacity(path.len());
        let mut current = self.root;
        for symbol in path {
            match self.pool.child(current, symbol.borrow()) {
                Some(child) => {
                    edges.push((current, symbol.borrow()));
                    current = child;
                }
                None => return,
            }
        }
        self.prune(edges, current);
    }

    /// Walks `edges` back up from `last`, detaching every node left without a
    /// value or children. Stops at the first node that still leads somewhere.
    fn prune<Q: Borrow<S>>(&mut self, mut edges: Vec<(NodeIdx, Q)>, last: NodeIdx) {
        let mut current = last;
        while let Some((parent, symbol)) = edges.pop() {
            if self.pool.get_node(current).is_meaningful() {
                break;
            }
            self.pool.remove_child(parent, symbol.borrow());
            trace!(target: LOG_TARGET, depth = edges.len() + 1, "pruned empty node");
            current = parent;
        }
    }

    pub(crate) fn find<K: AsSymbols<S>>(&self, key: K) -> Option<NodeIdx> {
        self.pool.find(self.root, key.symbols())
    }
}

impl<S: Ord + Clone, V> Trie<S, V> {
    /// Returns an iterator over the key-value pairs in lexicographic key order.
    ///
    /// # Examples
    ///
    /// ```
    /// # use symtrie::Trie;
    /// let mut trie = Trie::new();
    /// trie.insert("b", 2);
    /// trie.insert("a", 1);
    ///
    /// let pairs: Vec<(String, i32)> = trie
    ///     .iter()
    ///     .map(|(key, value)| (key.into_iter().collect(), *value))
    ///     .collect();
    /// assert_eq!(pairs, vec![("a".to_string(), 1), ("b".to_string(), 2)]);
    /// ```
    pub fn iter(&self) -> Iter<'_, S, V> {
        Iter::new(&self.pool, Some(self.root), Vec::new())
    }

    /// Returns an iterator over the keys in lexicographic order.
    pub fn keys(&self) -> Keys<'_, S, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values in key order.
    pub fn values(&self) -> Values<'_, S, V> {
        Values { inner: self.iter() }
    }

    /// Returns an iterator over the entries whose keys start with `prefix`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use symtrie::Trie;
    /// let mut trie = Trie::new();
    /// trie.insert("apple", 1);
    /// trie.insert("application", 2);
    /// trie.insert("banana", 3);
    ///
    /// let values: Vec<_> = trie.prefix_iter("app").map(|(_, v)| *v).collect();
    /// assert_eq!(values, vec![1, 2]);
    /// assert_eq!(trie.prefix_iter("cherry").count(), 0);
    /// ```
    pub fn prefix_iter<K: AsSymbols<S>>(&self, prefix: K) -> Iter<'_, S, V> {
        let prefix = prefix.symbols_vec();
        let start = self.pool.find(self.root, &prefix);
        Iter::new(&self.pool, start, prefix)
    }

    /// Returns an iterator over the keys that start with `prefix`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use symtrie::Trie;
    /// let mut trie = Trie::new();
    /// trie.insert("tess", 4);
    /// trie.insert("test", 1);
    /// trie.insert("world", 11);
    ///
    /// let words: Vec<String> = trie
    ///     .prefix_keys("tes")
    ///     .map(|key| key.into_iter().collect())
    ///     .collect();
    /// assert_eq!(words, vec!["tess", "test"]);
    /// ```
    pub fn prefix_keys<K: AsSymbols<S>>(&self, prefix: K) -> Keys<'_, S, V> {
        Keys {
            inner: self.prefix_iter(prefix),
        }
    }

    /// Removes every key starting with `prefix` and returns the removed
    /// entries in key order.
    ///
    /// The subtree under `prefix` is detached in one step and the path above
    /// it is pruned like in [`remove`](Self::remove).
    ///
    /// # Examples
    ///
    /// ```
    /// # use symtrie::Trie;
    /// let mut trie = Trie::new();
    /// trie.insert("apple", 1);
    /// trie.insert("application", 2);
    /// trie.insert("banana", 3);
    ///
    /// let removed = trie.remove_prefix("app");
    /// assert_eq!(removed.len(), 2);
    /// assert_eq!(trie.len(), 1);
    /// assert!(!trie.contains_prefix("a"));
    /// ```
    pub fn remove_prefix<K: AsSymbols<S>>(&mut self, prefix: K) -> Vec<(Vec<S>, V)> {
        let prefix = prefix.symbols_vec();
        let Some(start) = self.pool.find(self.root, &prefix) else {
            return Vec::new();
        };

        let mut removed = Vec::new();
        let mut stack = vec![(start, prefix.clone())];
        while let Some((idx, key)) = stack.pop() {
            let node = self.pool.get_node_mut(idx);
            let value = node.value.take();
            // Reverse so the smallest symbol is popped first
            for (symbol, &child) in node.children.iter().rev() {
                let mut child_key = key.clone();
                child_key.push(symbol.clone());
                stack.push((child, child_key));
            }
            if let Some(value) = value {
                removed.push((key, value));
            }
        }

        match prefix.split_last() {
            Some((last, parent_path)) => {
                if let Some(parent) = self.pool.find(self.root, parent_path) {
                    self.pool.remove_child(parent, last);
                }
                self.prune_path(parent_path);
            }
            None => self.pool.clear(),
        }

        self.size -= removed.len();
        trace!(target: LOG_TARGET, removed = removed.len(), "detached prefix subtree");
        removed
    }

    /// Retains only the entries for which `f` returns `true`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use symtrie::Trie;
    /// let mut trie = Trie::new();
    /// trie.insert("a", 1);
    /// trie.insert("ab", 2);
    /// trie.insert("abc", 3);
    ///
    /// trie.retain(|_, v| *v % 2 == 1);
    ///
    /// assert_eq!(trie.len(), 2);
    /// assert!(!trie.contains_key("ab"));
    /// assert!(trie.contains_key("abc"));
    /// ```
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&[S], &mut V) -> bool,
    {
        let mut key: Vec<S> = Vec::new();
        let mut removed = Self::retain_value(&mut self.pool, self.root, &key, &mut f) as usize;

        // Each frame holds the children still to visit, smallest on top
        let mut stack = vec![(self.root, self.pool.child_edges(self.root))];
        while let Some((_, pending)) = stack.last_mut() {
            match pending.pop() {
                Some((symbol, child)) => {
                    key.push(symbol);
                    if Self::retain_value(&mut self.pool, child, &key, &mut f) {
                        removed += 1;
                    }
                    stack.push((child, self.pool.child_edges(child)));
                }
                None => {
                    let Some((idx, _)) = stack.pop() else { break };
                    if let (Some((parent, _)), Some(symbol)) = (stack.last(), key.pop()) {
                        if !self.pool.get_node(idx).is_meaningful() {
                            self.pool.remove_child(*parent, &symbol);
                        }
                    }
                }
            }
        }

        self.size -= removed;
        trace!(target: LOG_TARGET, removed, "retained entries");
    }

    /// Applies `f` to the value at `idx`, dropping it when rejected. Returns
    /// `true` if a value was dropped.
    fn retain_value<F>(pool: &mut NodePool<S, V>, idx: NodeIdx, key: &[S], f: &mut F) -> bool
    where
        F: FnMut(&[S], &mut V) -> bool,
    {
        let node = pool.get_node_mut(idx);
        let keep = match node.value.as_mut() {
            Some(value) => f(key, value),
            None => true,
        };
        if !keep {
            node.value = None;
        }
        !keep
    }
}

impl<S: Ord + Clone, V: Clone> Clone for Trie<S, V> {
    /// Duplicates every reachable node and value into a fresh arena.
    fn clone(&self) -> Self {
        let mut pool = NodePool::with_capacity(self.pool.live_nodes());
        let mut stack = vec![(self.root, NodePool::<S, V>::ROOT)];

        while let Some((source, target)) = stack.pop() {
            let node = self.pool.get_node(source);
            pool.get_node_mut(target).value = node.value.clone();
            for (symbol, &child) in &node.children {
                let copy = pool.child_or_insert(target, symbol.clone());
                stack.push((child, copy));
            }
        }

        debug!(target: LOG_TARGET, nodes = pool.live_nodes(), "cloned trie");
        Trie {
            pool,
            root: NodePool::<S, V>::ROOT,
            size: self.size,
        }
    }
}

impl<S: Ord + Clone + fmt::Debug, V: fmt::Debug> fmt::Debug for Trie<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<S: Ord + Clone, V: PartialEq> PartialEq for Trie<S, V> {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.iter().eq(other.iter())
    }
}

impl<S: Ord + Clone, V: Eq> Eq for Trie<S, V> {}

impl<S: Ord, V, K: AsSymbols<S>> Index<K> for Trie<S, V> {
    type Output = V;

    /// # Panics
    ///
    /// Panics if `key` holds no value.
    fn index(&self, key: K) -> &Self::Output {
        self.get(key).expect("no entry found for key")
    }
}

impl<S: Ord, V, K: AsSymbols<S>> IndexMut<K> for Trie<S, V> {
    /// # Panics
    ///
    /// Panics if `key` holds no value. Use
    /// [`get_or_insert_default`](Trie::get_or_insert_default) to create it.
    fn index_mut(&mut self, key: K) -> &mut Self::Output {
        self.get_mut(key).expect("no entry found for key")
    }
}

impl<S: Ord, V, K: AsSymbols<S>> Extend<(K, V)> for Trie<S, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<S: Ord, V, K: AsSymbols<S>> FromIterator<(K, V)> for Trie<S, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut trie = Trie::new();
        trie.extend(iter);
        trie
    }
}

impl<S: Ord, V, K: AsSymbols<S>, const N: usize> From<[(K, V); N]> for Trie<S, V> {
    fn from(array: [(K, V); N]) -> Self {
        array.into_iter().collect()
    }
}

impl<'a, S: Ord + Clone, V> IntoIterator for &'a Trie<S, V> {
    type Item = (Vec<S>, &'a V);
    type IntoIter = Iter<'a, S, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
