use crate::Trie;
use crate::node::NodeIdx;

/// Represents an entry in a `Trie` which may either be vacant or occupied.
///
/// This is part of the `Entry API` and is used to ensure that only a single lookup is performed.
///
/// # Examples
///
/// ```
/// use symtrie::{Trie, Entry};
///
/// let mut trie = Trie::new();
///
/// match trie.entry("a") {
///     Entry::Vacant(entry) => {
///         entry.insert(1);
///     }
///     Entry::Occupied(entry) => {
///         *entry.into_mut() += 1;
///     }
/// }
/// ```
pub enum Entry<'a, S, V> {
    /// An occupied entry.
    Occupied(OccupiedEntry<'a, S, V>),
    /// A vacant entry.
    Vacant(VacantEntry<'a, S, V>),
}

/// A view into an occupied entry in a `Trie`.
///
/// It is part of the [`Entry`] API.
pub struct OccupiedEntry<'a, S, V> {
    pub(crate) trie: &'a mut Trie<S, V>,
    pub(crate) key: Vec<S>,
    pub(crate) node: NodeIdx,
}

/// A view into a vacant entry in a `Trie`.
///
/// Nothing is allocated in the trie until [`VacantEntry::insert`] is called.
pub struct VacantEntry<'a, S, V> {
    pub(crate) trie: &'a mut Trie<S, V>,
    pub(crate) key: Vec<S>,
}

impl<'a, S: Ord, V> Entry<'a, S, V> {
    /// Returns a reference to the value in the entry.
    ///
    /// # Examples
    ///
    /// ```
    /// # use symtrie::Trie;
    /// let mut trie = Trie::new();
    /// trie.insert("a", 1);
    ///
    /// assert_eq!(trie.entry("a").get(), Some(&1));
    /// assert_eq!(trie.entry("b").get(), None);
    /// ```
    pub fn get(&self) -> Option<&V> {
        match self {
            Entry::Occupied(entry) => Some(entry.get()),
            Entry::Vacant(_) => None,
        }
    }

    /// Returns a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> Option<&mut V> {
        match self {
            Entry::Occupied(entry) => Some(entry.get_mut()),
            Entry::Vacant(_) => None,
        }
    }

    /// Ensures a value is in the entry by inserting the default if empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use symtrie::Trie;
    /// let mut trie: Trie<char, i32> = Trie::new();
    ///
    /// trie.entry("a").or_default();
    /// assert_eq!(trie.get("a"), Some(&0));
    /// ```
    pub fn or_default(self) -> &'a mut V
    where
        V: Default,
    {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(V::default()),
        }
    }

    /// Ensures a value is in the entry by inserting the given value if empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use symtrie::Trie;
    /// let mut trie = Trie::new();
    ///
    /// trie.entry("a").or_insert(1);
    /// *trie.entry("a").or_insert(10) *= 2;
    /// assert_eq!(trie.get("a"), Some(&2));
    /// ```
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Ensures a value is in the entry by inserting the result of the function if empty.
    pub fn or_insert_with<F: FnOnce() -> V>(self, default: F) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Ensures a value is in the entry by inserting the result of the function if empty.
    ///
    /// The function is given the key's symbols.
    ///
    /// # Examples
    ///
    /// ```
    /// # use symtrie::Trie;
    /// let mut trie = Trie::new();
    ///
    /// trie.entry("abc").or_insert_with_key(|key| key.len());
    /// assert_eq!(trie.get("abc"), Some(&3));
    /// ```
    pub fn or_insert_with_key<F: FnOnce(&[S]) -> V>(self, default: F) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let value = default(entry.key());
                entry.insert(value)
            }
        }
    }

    /// Returns the key's symbols.
    pub fn key(&self) -> &[S] {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }

    /// Provides in-place mutable access to an occupied entry.
    ///
    /// # Examples
    ///
    /// ```
    /// # use symtrie::Trie;
    /// let mut trie = Trie::new();
    ///
    /// trie.entry("a").and_modify(|v| *v += 1).or_insert(1);
    /// assert_eq!(trie.get("a"), Some(&1));
    ///
    /// trie.entry("a").and_modify(|v| *v += 1).or_insert(0);
    /// assert_eq!(trie.get("a"), Some(&2));
    /// ```
    pub fn and_modify<F: FnOnce(&mut V)>(self, f: F) -> Self {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }
}

impl<'a, S: Ord, V> OccupiedEntry<'a, S, V> {
    fn slot(&self) -> &Option<V> {
        &self.trie.pool.get_node(self.node).value
    }

    fn slot_mut(&mut self) -> &mut Option<V> {
        &mut self.trie.pool.get_node_mut(self.node).value
    }

    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        match self.slot() {
            Some(value) => value,
            None => unreachable!("occupied entry without a value"),
        }
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        match self.slot_mut() {
            Some(value) => value,
            None => unreachable!("occupied entry without a value"),
        }
    }

    /// Converts the entry into a mutable reference to the value.
    pub fn into_mut(self) -> &'a mut V {
        let trie = self.trie;
        match &mut trie.pool.get_node_mut(self.node).value {
            Some(value) => value,
            None => unreachable!("occupied entry without a value"),
        }
    }

    /// Gets the key's symbols.
    pub fn key(&self) -> &[S] {
        &self.key
    }

    /// Replaces the value in the entry, returning the old value.
    ///
    /// # Examples
    ///
    /// ```
    /// # use symtrie::{Trie, Entry};
    /// let mut trie = Trie::new();
    /// trie.insert("a", 1);
    ///
    /// if let Entry::Occupied(mut entry) = trie.entry("a") {
    ///     assert_eq!(entry.insert(2), 1);
    /// }
    /// assert_eq!(trie.get("a"), Some(&2));
    /// ```
    pub fn insert(&mut self, value: V) -> V {
        std::mem::replace(self.get_mut(), value)
    }

    /// Removes the entry, pruning the nodes that no longer lead anywhere,
    /// and returns the value.
    ///
    /// # Examples
    ///
    /// ```
    /// # use symtrie::{Trie, Entry};
    /// let mut trie = Trie::new();
    /// trie.insert("abc", 1);
    ///
    /// if let Entry::Occupied(entry) = trie.entry("abc") {
    ///     assert_eq!(entry.remove(), 1);
    /// }
    /// assert!(!trie.contains_prefix("a"));
    /// ```
    pub fn remove(self) -> V {
        match self.trie.remove_symbols(self.key) {
            Some(value) => value,
            None => unreachable!("occupied entry without a value"),
        }
    }
}

impl<'a, S: Ord, V> VacantEntry<'a, S, V> {
    /// Gets the symbols of the key that would be used when inserting a value.
    pub fn key(&self) -> &[S] {
        &self.key
    }

    /// Takes ownership of the key.
    pub fn into_key(self) -> Vec<S> {
        self.key
    }

    /// Inserts the given value into the entry, creating its path, and returns
    /// a mutable reference to it.
    ///
    /// # Examples
    ///
    /// ```
    /// # use symtrie::{Trie, Entry};
    /// let mut trie = Trie::new();
    ///
    /// if let Entry::Vacant(entry) = trie.entry("a") {
    ///     *entry.insert(1) += 1;
    /// }
    /// assert_eq!(trie.get("a"), Some(&2));
    /// ```
    pub fn insert(self, value: V) -> &'a mut V {
        let trie = self.trie;
        let idx = trie.pool.find_or_create(trie.root, self.key);
        trie.size += 1;
        trie.pool.get_node_mut(idx).value.insert(value)
    }
}
