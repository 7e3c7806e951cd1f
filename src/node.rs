use std::collections::BTreeMap;

/// Handle of a node inside a [`NodePool`](crate::node_pool::NodePool).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeIdx(pub(crate) usize);

pub(crate) struct TrieNode<S, V> {
    pub(crate) children: BTreeMap<S, NodeIdx>,
    pub(crate) value: Option<V>,
}

impl<S, V> TrieNode<S, V> {
    pub(crate) fn new() -> Self {
        TrieNode {
            children: BTreeMap::new(),
            value: None,
        }
    }

    /// A node is meaningful when it terminates a key or leads to one.
    pub(crate) fn is_meaningful(&self) -> bool {
        self.value.is_some() || !self.children.is_empty()
    }

    pub(crate) fn child_len(&self) -> usize {
        self.children.len()
    }
}
