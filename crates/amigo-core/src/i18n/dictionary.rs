//! Typed nested translation dictionaries.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A node in a translation dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Entry {
    Text(String),
    List(Vec<String>),
    Section(BTreeMap<String, Entry>),
}

/// Result of walking a dotted path through a dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    Found(&'a Entry),
    NotFound,
}

impl<'a> Lookup<'a> {
    /// The string at the path, if the path ends at a text leaf.
    pub fn text(self) -> Option<&'a str> {
        match self {
            Lookup::Found(Entry::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    /// The list at the path, if the path ends at a list leaf.
    pub fn list(self) -> Option<&'a [String]> {
        match self {
            Lookup::Found(Entry::List(items)) => Some(items.as_slice()),
            _ => None,
        }
    }
}

/// The translations of one language.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dictionary {
    root: BTreeMap<String, Entry>,
}

impl Dictionary {
    pub fn new(root: BTreeMap<String, Entry>) -> Self {
        Self { root }
    }

    /// Parses a dictionary from its JSON representation.
    pub fn from_json(content: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Walks `key` segment by segment ("practice.title").
    ///
    /// An empty key, an empty segment, or a segment that descends into a
    /// leaf all produce [`Lookup::NotFound`].
    pub fn lookup(&self, key: &str) -> Lookup<'_> {
        let mut segments = key.split('.');
        let Some(first) = segments.next().filter(|s| !s.is_empty()) else {
            return Lookup::NotFound;
        };
        let Some(mut node) = self.root.get(first) else {
            return Lookup::NotFound;
        };
        for segment in segments {
            match node {
                Entry::Section(children) => match children.get(segment) {
                    Some(child) => node = child,
                    None => return Lookup::NotFound,
                },
                _ => return Lookup::NotFound,
            }
        }
        Lookup::Found(node)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Overlays `other` on top of this dictionary. Sections merge
    /// recursively; leaves in `other` win.
    pub fn merge(&mut self, other: Dictionary) {
        merge_maps(&mut self.root, other.root);
    }
}

fn merge_maps(base: &mut BTreeMap<String, Entry>, overlay: BTreeMap<String, Entry>) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(Entry::Section(existing)), Entry::Section(incoming)) => {
                merge_maps(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dictionary {
        Dictionary::from_json(
            r#"{
                "practice": { "title": "Practice Room", "finish": "" },
                "journal": { "prompts": ["Best part?", "Hardest part?"] },
                "flat": "value"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_lookup_nested_text() {
        let dict = sample();
        assert_eq!(dict.lookup("practice.title").text(), Some("Practice Room"));
        assert_eq!(dict.lookup("flat").text(), Some("value"));
    }

    #[test]
    fn test_empty_string_is_found() {
        assert_eq!(sample().lookup("practice.finish").text(), Some(""));
    }

    #[test]
    fn test_missing_segments() {
        let dict = sample();
        assert_eq!(dict.lookup("practice.missing"), Lookup::NotFound);
        assert_eq!(dict.lookup("flat.deeper"), Lookup::NotFound);
        assert_eq!(dict.lookup(""), Lookup::NotFound);
        assert_eq!(dict.lookup("practice").text(), None);
    }

    #[test]
    fn test_lists() {
        let prompts = sample().lookup("journal.prompts").list().map(|l| l.len());
        assert_eq!(prompts, Some(2));
    }

    #[test]
    fn test_merge_overlays_leaves() {
        let mut base = sample();
        let overlay =
            Dictionary::from_json(r#"{ "practice": { "title": "Gym" }, "new": "x" }"#).unwrap();
        base.merge(overlay);
        assert_eq!(base.lookup("practice.title").text(), Some("Gym"));
        assert_eq!(base.lookup("practice.finish").text(), Some(""));
        assert_eq!(base.lookup("new").text(), Some("x"));
    }
}
