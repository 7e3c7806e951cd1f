use std::collections::btree_map;

use crate::node::NodeIdx;
use crate::node_pool::NodePool;

/// An iterator over the key-value pairs of a `Trie`, in lexicographic key
/// order.
///
/// This struct is created by the [`iter`] and [`prefix_iter`] methods on
/// [`Trie`].
///
/// [`Trie`]: crate::Trie
/// [`iter`]: crate::Trie::iter
/// [`prefix_iter`]: crate::Trie::prefix_iter
pub struct Iter<'a, S, V> {
    pool: &'a NodePool<S, V>,
    key: Vec<S>,
    stack: Vec<btree_map::Iter<'a, S, NodeIdx>>,
    start: Option<NodeIdx>,
}

impl<'a, S: Ord, V> Iter<'a, S, V> {
    pub(crate) fn new(pool: &'a NodePool<S, V>, start: Option<NodeIdx>, key: Vec<S>) -> Self {
        let stack = start
            .map(|idx| vec![pool.get_node(idx).children.iter()])
            .unwrap_or_default();
        Iter {
            pool,
            key,
            stack,
            start,
        }
    }
}

impl<'a, S: Ord + Clone, V> Iterator for Iter<'a, S, V> {
    type Item = (Vec<S>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let pool = self.pool;

        // The start node's own value comes before its descendants
        if let Some(start) = self.start.take() {
            if let Some(value) = pool.get_node(start).value.as_ref() {
                return Some((self.key.clone(), value));
            }
        }

        loop {
            let frame = self.stack.last_mut()?;
            match frame.next() {
                Some((symbol, &child)) => {
                    let node = pool.get_node(child);
                    self.key.push(symbol.clone());
                    self.stack.push(node.children.iter());
                    if let Some(value) = node.value.as_ref() {
                        return Some((self.key.clone(), value));
                    }
                }
                None => {
                    self.stack.pop();
                    if !self.stack.is_empty() {
                        self.key.pop();
                    }
                }
            }
        }
    }
}

/// An iterator over the keys of a `Trie`.
///
/// This struct is created by the [`keys`] and [`prefix_keys`] methods on
/// [`Trie`].
///
/// [`Trie`]: crate::Trie
/// [`keys`]: crate::Trie::keys
/// [`prefix_keys`]: crate::Trie::prefix_keys
pub struct Keys<'a, S, V> {
    pub(crate) inner: Iter<'a, S, V>,
}

impl<S: Ord + Clone, V> Iterator for Keys<'_, S, V> {
    type Item = Vec<S>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }
}

/// An iterator over the values of a `Trie`, in key order.
///
/// This struct is created by the [`values`] method on [`Trie`].
///
/// [`Trie`]: crate::Trie
/// [`values`]: crate::Trie::values
pub struct Values<'a, S, V> {
    pub(crate) inner: Iter<'a, S, V>,
}

impl<'a, S: Ord + Clone, V> Iterator for Values<'a, S, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }
}
