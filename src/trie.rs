//! A prefix tree over the builtin command vocabulary, used to drive
//! tab-completion in the line editor.

use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct Node {
    children: BTreeMap<char, Node>,
    is_word: bool,
}

/// Prefix tree mapping strings to membership.
///
/// Built once at startup from the fixed builtin vocabulary and read-only for
/// the rest of the session.
#[derive(Debug, Default)]
pub struct Trie {
    root: Node,
}

impl Trie {
    /// Create a trie already populated with the given words.
    pub fn from_words<'a>(words: impl IntoIterator<Item = &'a str>) -> Self {
        let mut trie = Trie::default();
        for word in words {
            trie.insert(word);
        }
        trie
    }

    /// Add a word to the trie. Inserting the same word twice is a no-op.
    pub fn insert(&mut self, word: &str) {
        let mut node = &mut self.root;
        for ch in word.chars() {
            node = node.children.entry(ch).or_default();
        }
        node.is_word = true;
    }

    fn walk(&self, prefix: &str) -> Option<&Node> {
        let mut node = &self.root;
        for ch in prefix.chars() {
            node = node.children.get(&ch)?;
        }
        Some(node)
    }

    /// Whether any inserted word starts with `prefix`.
    pub fn contains_prefix(&self, prefix: &str) -> bool {
        self.walk(prefix).is_some()
    }

    /// Compute the single unambiguous continuation of `prefix`, if one exists.
    ///
    /// A prefix that already spells a complete word with no longer siblings
    /// completes to a single space. Otherwise the walk descends while exactly
    /// one child exists and no intermediate word ends, collecting the edge
    /// characters; a trailing space is added when the walk ends on a leaf.
    /// Returns `None` when the prefix is absent or the continuation branches
    /// immediately.
    pub fn unique_completion(&self, prefix: &str) -> Option<String> {
        let mut node = self.walk(prefix)?;
        if node.is_word && node.children.is_empty() {
            return Some(" ".to_string());
        }

        let mut suffix = String::new();
        while !node.is_word && node.children.len() == 1 {
            let (ch, child) = node.children.iter().next()?;
            suffix.push(*ch);
            node = child;
        }
        if suffix.is_empty() {
            return None;
        }
        if node.children.is_empty() {
            suffix.push(' ');
        }
        Some(suffix)
    }

    /// Enumerate every full word reachable from `prefix`.
    ///
    /// The order of the result is unspecified. An absent prefix yields an
    /// empty vector, never an error.
    pub fn completions(&self, prefix: &str) -> Vec<String> {
        let Some(start) = self.walk(prefix) else {
            return Vec::new();
        };
        let mut words = Vec::new();
        let mut stack = vec![(start, prefix.to_string())];
        while let Some((node, word)) = stack.pop() {
            if node.is_word {
                words.push(word.clone());
            }
            for (ch, child) in &node.children {
                let mut next = word.clone();
                next.push(*ch);
                stack.push((child, next));
            }
        }
        words
    }
}
