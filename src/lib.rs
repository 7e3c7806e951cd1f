//! A prefix tree (trie) over arbitrary ordered symbol alphabets.
//!
//! This crate provides a `Trie`, an associative container mapping
//! sequences of symbols to values. Symbols can be `char`s, bytes, integers or
//! any other totally ordered type, which makes it usable for autocomplete,
//! routing tables and dictionaries alike.
//!
//! # Features
//!
//! - Exact-match and prefix queries in O(k) where k is the key length
//! - Removal that prunes nodes no longer leading to any key
//! - Entry API for in-place updates
//! - Ordered iteration, optionally restricted to a prefix
//! - Deep cloning and an ASCII tree rendering

mod as_symbols;
mod entry;
mod error;
mod iter;
mod node;
mod node_pool;
mod render;
mod trie;

pub use as_symbols::AsSymbols;
pub use entry::{Entry, OccupiedEntry, VacantEntry};
pub use error::{Result, TrieError};
pub use iter::{Iter, Keys, Values};
pub use render::{RenderStyle, render, render_with};
pub use trie::Trie;

#[cfg(test)]
mod proptest_trie;
