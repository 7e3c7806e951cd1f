//! ASCII tree rendering of a [`Trie`].
//!
//! Every top-level symbol starts a line. A node's label is its symbol, put in
//! parentheses when a key ends there. Single children continue the line with
//! a connector; further children of a branching node start a new line
//! aligned under the branch point, with bars marking ancestor branches that
//! still have children left to draw.
//!
//! ```text
//! a-l-o-(e)
//!    `-p-h-(a)-b-e-(t)
//!    `-(t)-a-(r)
//! t-e-s-(s)
//!      `-(t)-e-(r)
//!           `-i-n-(g)
//! ```

use std::collections::btree_map;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TrieError};
use crate::node::NodeIdx;
use crate::trie::{LOG_TARGET, Trie};

/// Glyphs used by the renderer.
///
/// Deserializes from JSON with every field optional:
///
/// ```
/// # use symtrie::RenderStyle;
/// let style = RenderStyle::from_json(r#"{ "bar": ":" }"#).unwrap();
/// assert_eq!(style.bar, ':');
/// assert_eq!(style.connector, '-');
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    /// Joins a node to its first child on the same line
    pub connector: char,
    /// Precedes the connector of every further child
    pub branch: char,
    /// Marks an ancestor branch that is still open
    pub bar: char,
    /// Opens the label of a node holding a value
    pub value_open: char,
    /// Closes the label of a node holding a value
    pub value_close: char,
}

impl Default for RenderStyle {
    fn default() -> Self {
        RenderStyle {
            connector: '-',
            branch: '`',
            bar: '|',
            value_open: '(',
            value_close: ')',
        }
    }
}

impl RenderStyle {
    /// Parses a style from JSON and validates it.
    pub fn from_json(json: &str) -> Result<Self> {
        let style: RenderStyle = serde_json::from_str(json)?;
        style.validate()?;
        Ok(style)
    }

    /// Checks that every glyph is visible and that the bar is not reused.
    pub fn validate(&self) -> Result<()> {
        let glyphs = [
            ("connector", self.connector),
            ("branch", self.branch),
            ("bar", self.bar),
            ("value_open", self.value_open),
            ("value_close", self.value_close),
        ];

        for (field, glyph) in glyphs {
            if glyph.is_whitespace() || glyph.is_control() {
                debug!(target: LOG_TARGET, field, ?glyph, "rejected render style");
                return Err(TrieError::InvalidGlyph { field, glyph });
            }
        }

        if glyphs
            .iter()
            .any(|&(field, glyph)| field != "bar" && glyph == self.bar)
        {
            debug!(target: LOG_TARGET, bar = ?self.bar, "rejected render style");
            return Err(TrieError::DuplicateGlyph(self.bar));
        }

        Ok(())
    }
}

/// Renders `trie` with the default [`RenderStyle`].
///
/// Returns an empty string when no key has a non-empty path.
///
/// # Examples
///
/// ```
/// # use symtrie::{render, Trie};
/// let mut trie = Trie::new();
/// trie.insert("world", 11);
/// trie.insert("worm", 12);
///
/// assert_eq!(render(&trie), "w-o-r-l-(d)\n     `-(m)");
/// ```
pub fn render<S: Ord + Display, V>(trie: &Trie<S, V>) -> String {
    render_with(trie, &RenderStyle::default())
}

/// Renders `trie` with the given glyphs.
pub fn render_with<S: Ord + Display, V>(trie: &Trie<S, V>, style: &RenderStyle) -> String {
    let root = trie.pool.get_node(trie.root);
    if root.children.is_empty() {
        return String::new();
    }

    let mut renderer = Renderer {
        trie,
        style,
        lines: Vec::new(),
        line: String::new(),
        column: 0,
        open: Vec::new(),
    };

    for (position, (symbol, &child)) in root.children.iter().enumerate() {
        if position > 0 {
            renderer.break_line();
        }
        renderer.subtree(child, symbol);
    }

    renderer.finish()
}

/// A node whose children are still being drawn.
struct Frame<'a, S> {
    children: btree_map::Iter<'a, S, NodeIdx>,
    /// Column right after the node's label
    anchor: usize,
    count: usize,
    position: usize,
}

struct Renderer<'a, S, V> {
    trie: &'a Trie<S, V>,
    style: &'a RenderStyle,
    lines: Vec<String>,
    line: String,
    /// Width of `line` in chars
    column: usize,
    /// Anchors of branch points that still have children to draw
    open: Vec<usize>,
}

impl<'a, S: Ord + Display, V> Renderer<'a, S, V> {
    /// Draws the node reached through `symbol` and everything below it.
    fn subtree(&mut self, start: NodeIdx, symbol: &S) {
        let mut stack: Vec<Frame<'a, S>> = self.label(start, symbol).into_iter().collect();

        while let Some(frame) = stack.last_mut() {
            let Some((child_symbol, &child)) = frame.children.next() else {
                stack.pop();
                continue;
            };
            let position = frame.position;
            frame.position += 1;

            if position > 0 {
                let (anchor, count) = (frame.anchor, frame.count);
                self.break_line();
                // The last child closes this branch point
                if position + 1 == count {
                    self.open.pop();
                }
                self.indent(anchor);
                self.push(self.style.branch);
            }
            self.push(self.style.connector);

            if let Some(frame) = self.label(child, child_symbol) {
                stack.push(frame);
            }
        }
    }

    /// Writes the label of `idx` and, if it has children, returns the frame
    /// that draws them.
    fn label(&mut self, idx: NodeIdx, symbol: &S) -> Option<Frame<'a, S>> {
        let trie = self.trie;
        let node = trie.pool.get_node(idx);

        let text = symbol.to_string();
        if node.value.is_some() {
            self.push(self.style.value_open);
            self.push_str(&text);
            self.push(self.style.value_close);
        } else {
            self.push_str(&text);
        }

        let count = node.child_len();
        if count == 0 {
            return None;
        }
        if count > 1 {
            self.open.push(self.column);
        }
        Some(Frame {
            children: node.children.iter(),
            anchor: self.column,
            count,
            position: 0,
        })
    }

    /// Pads the fresh line to `anchor`, drawing bars for open branches left of it.
    fn indent(&mut self, anchor: usize) {
        let mut padding = vec![' '; anchor];
        for &column in &self.open {
            if column < anchor {
                padding[column] = self.style.bar;
            }
        }
        self.line.extend(padding);
        self.column = anchor;
    }

    fn push(&mut self, glyph: char) {
        self.line.push(glyph);
        self.column += 1;
    }

    fn push_str(&mut self, text: &str) {
        self.line.push_str(text);
        self.column += text.chars().count();
    }

    fn break_line(&mut self) {
        self.lines.push(std::mem::take(&mut self.line));
        self.column = 0;
    }

    fn finish(mut self) -> String {
        self.break_line();
        self.lines.join("\n")
    }
}

impl<S: Ord + Display, V> Display for Trie<S, V> {
    /// Writes the [`render`]ed tree.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Trie<char, i32> {
        let mut trie = Trie::new();

        trie.insert("test", 1);
        trie.insert("tester", 2);
        trie.insert("testing", 3);
        trie.insert("tess", 4);

        trie.insert("alpha", 5);
        trie.insert("alphabet", 6);
        trie.insert("aloe", 7);
        trie.insert("altar", 8);

        trie.insert("alt", 9);
        trie.insert("alt", 10);

        trie.insert("world", 11);
        trie.insert("worm", 12);
        trie
    }

    const SAMPLE: &str = "a-l-o-(e)\n   `-p-h-(a)-b-e-(t)\n   `-(t)-a-(r)\nt-e-s-(s)\n     `-(t)-e-(r)\n          `-i-n-(g)\nw-o-r-l-(d)\n     `-(m)";

    #[test]
    fn test_render_complex() {
        assert_eq!(render(&sample()), SAMPLE);
    }

    #[test]
    fn test_display_matches_render() {
        let trie = sample();
        assert_eq!(trie.to_string(), SAMPLE);
        assert_eq!(format!("{trie}"), SAMPLE);
    }

    #[test]
    fn test_render_empty() {
        let trie: Trie<char, i32> = Trie::new();
        assert_eq!(render(&trie), "");
    }

    #[test]
    fn test_render_empty_key_only() {
        let mut trie = Trie::new();
        trie.insert("", 1);
        assert_eq!(render(&trie), "");
    }

    #[test]
    fn test_render_single_key() {
        let mut trie = Trie::new();
        trie.insert("abc", 1);
        assert_eq!(render(&trie), "a-b-(c)");
    }

    #[test]
    fn test_render_open_branch_bars() {
        let mut trie = Trie::new();
        trie.insert("abc", 1);
        trie.insert("abd", 2);
        trie.insert("ae", 3);

        assert_eq!(render(&trie), "a-b-(c)\n | `-(d)\n `-(e)");
    }

    #[test]
    fn test_render_nested_open_branches() {
        let mut trie = Trie::new();
        trie.insert("abcd", 1);
        trie.insert("abce", 2);
        trie.insert("abf", 3);
        trie.insert("ag", 4);

        let expected = [
            "a-b-c-(d)",
            " | | `-(e)",
            " | `-(f)",
            " `-(g)",
        ]
        .join("\n");
        assert_eq!(render(&trie), expected);
    }

    #[test]
    fn test_render_multi_character_symbols() {
        let mut trie: Trie<i32, &str> = Trie::new();
        trie.insert([1, 23], "a");
        trie.insert([1, 4], "b");

        assert_eq!(render(&trie), "1-(4)\n `-(23)");
    }

    #[test]
    fn test_render_deep_key() {
        let depth = 100_000;
        let mut trie = Trie::new();
        trie.insert("a".repeat(depth), 1);

        let mut expected = vec!["a"; depth - 1].join("-");
        expected.push_str("-(a)");
        assert_eq!(render(&trie), expected);
    }

    #[test]
    fn test_render_branches_below_deep_chain() {
        let mut trie = Trie::new();
        let stem = "x".repeat(50_000);
        trie.insert(format!("{stem}ab"), 1);
        trie.insert(format!("{stem}c"), 2);

        let rendered = render(&trie);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("x-a-(b)"));
        assert_eq!(lines[1], format!("{}`-(c)", " ".repeat(2 * 50_000 - 1)));
    }

    #[test]
    fn test_render_unchanged_by_missing_erase() {
        let mut trie = sample();
        let before = render(&trie);
        assert!(!trie.erase("tes"));
        assert!(!trie.erase("zebra"));
        assert_eq!(render(&trie), before);
    }

    #[test]
    fn test_render_with_custom_style() {
        let mut trie = Trie::new();
        trie.insert("abc", 1);
        trie.insert("abd", 2);
        trie.insert("ae", 3);

        let style = RenderStyle {
            connector: '=',
            branch: '+',
            bar: ':',
            value_open: '[',
            value_close: ']',
        };
        assert_eq!(render_with(&trie, &style), "a=b=[c]\n : +=[d]\n +=[e]");
    }

    #[test]
    fn test_style_from_json_defaults_missing_fields() {
        let style = RenderStyle::from_json("{}").unwrap();
        assert_eq!(style, RenderStyle::default());

        let style = RenderStyle::from_json(r#"{"value_open": "<", "value_close": ">"}"#).unwrap();
        assert_eq!(style.value_open, '<');
        assert_eq!(style.value_close, '>');
        assert_eq!(style.bar, '|');
    }

    #[test]
    fn test_style_round_trips_through_json() {
        let style = RenderStyle {
            bar: '!',
            ..RenderStyle::default()
        };
        let json = serde_json::to_string(&style).unwrap();
        assert_eq!(RenderStyle::from_json(&json).unwrap(), style);
    }

    #[test]
    fn test_style_rejects_malformed_json() {
        let err = RenderStyle::from_json(r#"{"bar": 3}"#).unwrap_err();
        assert!(matches!(err, TrieError::Json(_)));
    }

    #[test]
    fn test_style_rejects_whitespace_glyph() {
        let err = RenderStyle::from_json(r#"{"connector": " "}"#).unwrap_err();
        assert!(matches!(
            err,
            TrieError::InvalidGlyph {
                field: "connector",
                glyph: ' '
            }
        ));
    }

    #[test]
    fn test_style_rejects_reused_bar() {
        let style = RenderStyle {
            bar: '-',
            ..RenderStyle::default()
        };
        assert!(matches!(style.validate(), Err(TrieError::DuplicateGlyph('-'))));
    }
}
