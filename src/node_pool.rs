use std::borrow::Borrow;

use crate::node::{NodeIdx, TrieNode};

/// Arena owning every node of a trie.
///
/// Slot 0 always holds the root. Released slots are reset and kept on a
/// free list so that later insertions reuse them.
pub(crate) struct NodePool<S, V> {
    pub(crate) nodes: Vec<TrieNode<S, V>>,
    pub(crate) free: Vec<NodeIdx>,
}

impl<S: Ord, V> NodePool<S, V> {
    pub(crate) const ROOT: NodeIdx = NodeIdx(0);

    /// Creates a pool holding only an empty root
    pub(crate) fn new() -> Self {
        NodePool {
            nodes: vec![TrieNode::new()],
            free: Vec::new(),
        }
    }

    /// Creates a pool with room for `capacity` nodes before reallocating
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        nodes.push(TrieNode::new());
        NodePool {
            nodes,
            free: Vec::new(),
        }
    }

    /// Drops every node but a fresh root
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.nodes.push(TrieNode::new());
    }

    #[inline]
    pub(crate) fn get_node(&self, idx: NodeIdx) -> &TrieNode<S, V> {
        &self.nodes[idx.0]
    }

    #[inline]
    pub(crate) fn get_node_mut(&mut self, idx: NodeIdx) -> &mut TrieNode<S, V> {
        &mut self.nodes[idx.0]
    }

    /// Number of nodes currently reachable, root included
    pub(crate) fn live_nodes(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Gets the child of `idx` reached through `symbol`
    #[inline]
    pub(crate) fn child(&self, idx: NodeIdx, symbol: &S) -> Option<NodeIdx> {
        self.get_node(idx).children.get(symbol).copied()
    }

    /// Gets the child of `idx` reached through `symbol`, allocating it when missing
    pub(crate) fn child_or_insert(&mut self, idx: NodeIdx, symbol: S) -> NodeIdx {
        if let Some(child) = self.child(idx, &symbol) {
            return child;
        }
        let child = self.allocate();
        self.get_node_mut(idx).children.insert(symbol, child);
        child
    }

    /// Lists the children of `idx` from the largest symbol to the smallest
    pub(crate) fn child_edges(&self, idx: NodeIdx) -> Vec<(S, NodeIdx)>
    where
        S: Clone,
    {
        self.get_node(idx)
            .children
            .iter()
            .rev()
            .map(|(symbol, &child)| (symbol.clone(), child))
            .collect()
    }

    /// Walks `symbols` from `start` without allocating
    pub(crate) fn find<I, Q>(&self, start: NodeIdx, symbols: I) -> Option<NodeIdx>
    where
        I: IntoIterator<Item = Q>,
        Q: Borrow<S>,
    {
        let mut current = start;
        for symbol in symbols {
            current = self.child(current, symbol.borrow())?;
        }
        Some(current)
    }

    /// Walks `symbols` from `start`, allocating missing nodes on the way
    pub(crate) fn find_or_create<I>(&mut self, start: NodeIdx, symbols: I) -> NodeIdx
    where
        I: IntoIterator<Item = S>,
    {
        let mut current = start;
        for symbol in symbols {
            current = self.child_or_insert(current, symbol);
        }
        current
    }

    /// Detaches the child of `parent` reached through `symbol` and releases its
    /// whole subtree, dropping any values still stored there.
    pub(crate) fn remove_child(&mut self, parent: NodeIdx, symbol: &S) -> bool {
        match self.get_node_mut(parent).children.remove(symbol) {
            Some(child) => {
                self.release_subtree(child);
                true
            }
            None => false,
        }
    }

    fn release_subtree(&mut self, idx: NodeIdx) {
        let mut stack = vec![idx];
        while let Some(idx) = stack.pop() {
            let node = std::mem::replace(self.get_node_mut(idx), TrieNode::new());
            stack.extend(node.children.into_values());
            self.free.push(idx);
        }
    }

    fn allocate(&mut self) -> NodeIdx {
        if let Some(idx) = self.free.pop() {
            return idx;
        }
        self.nodes.push(TrieNode::new());
        NodeIdx(self.nodes.len() - 1)
    }
}
