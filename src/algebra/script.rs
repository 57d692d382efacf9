//! The spelling dictionary and its merge algebra.
//!
//! A [`Script`] maps syllable keys to deduplicated spelling sequences. The
//! only way to add entries is [`Script::merge`], which folds a batch of
//! source spellings into a destination key:
//!
//! ```text
//! for x in source:
//!     y = x with kind = max(batch.kind, x.kind)
//!               credibility = x.credibility + batch.credibility
//!               tips = batch.tips or x.tips
//!     if dest has e with e.text == y.text:
//!         e.kind = min(e.kind, y.kind)
//!         e.credibility = max(e.credibility, y.credibility)
//!         e.tips = ""
//!     else:
//!         append y
//! ```
//!
//! `min`, `max` and the unconditional tip clearing make the final entry set
//! independent of the order in which merges are issued, which is what lets
//! the [`TransformEngine`](super::engine::TransformEngine) reduce intents
//! concurrently.

use std::collections::btree_map::{self, BTreeMap};

use super::spelling::{Spelling, SpellingProperties};

/// Ordered mapping from syllable key to its spelling entries.
#[derive(Debug, Clone, Default)]
pub struct Script {
    entries: BTreeMap<String, Vec<Spelling>>,
}

impl Script {
    /// Create an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a script where every syllable holds its own canonical spelling.
    pub fn from_syllables<I, S>(syllables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut script = Script::new();
        for syllable in syllables {
            let syllable = syllable.into();
            let seed = [Spelling::new(syllable.as_str())];
            script.merge(&syllable, &SpellingProperties::default(), &seed);
        }
        script
    }

    pub(crate) fn from_map(entries: BTreeMap<String, Vec<Spelling>>) -> Self {
        Self { entries }
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the script has no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `key` is present (possibly with no entries).
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Entries recorded under `key`.
    pub fn get(&self, key: &str) -> Option<&[Spelling]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Iterate keys and entries in ascending key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Vec<Spelling>> {
        self.entries.iter()
    }

    /// Iterate keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Total number of spelling entries across all keys.
    pub fn spelling_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Insert an empty entry sequence for `syllable`.
    ///
    /// Returns `false` if the key already exists.
    pub fn add_syllable(&mut self, syllable: &str) -> bool {
        if self.entries.contains_key(syllable) {
            return false;
        }
        self.entries.insert(syllable.to_string(), Vec::new());
        true
    }

    /// Merge `source` into `key` under `batch` properties.
    ///
    /// The key is created even when `source` is empty.
    pub fn merge(&mut self, key: &str, batch: &SpellingProperties, source: &[Spelling]) {
        if let Some(dest) = self.entries.get_mut(key) {
            merge_entries(dest, batch, source);
            return;
        }
        merge_entries(self.entries.entry(key.to_string()).or_default(), batch, source);
    }

    /// Exact comparison of keys, entry order and entry properties.
    pub fn same_as(&self, other: &Script) -> bool {
        self.entries.len() == other.entries.len()
            && self.entries.iter().zip(other.entries.iter()).all(
                |((ka, va), (kb, vb))| {
                    ka == kb && va.len() == vb.len() && va.iter().zip(vb).all(|(a, b)| a.same_as(b))
                },
            )
    }

    /// Consume the script, returning the underlying map.
    pub fn into_inner(self) -> BTreeMap<String, Vec<Spelling>> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a Script {
    type Item = (&'a String, &'a Vec<Spelling>);
    type IntoIter = btree_map::Iter<'a, String, Vec<Spelling>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Fold `source` into a single key's entry sequence.
///
/// Shared by [`Script::merge`] and the engine's reduce phase so both paths
/// run the exact same algebra.
pub(crate) fn merge_entries(dest: &mut Vec<Spelling>, batch: &SpellingProperties, source: &[Spelling]) {
    for x in source {
        let mut y = x.clone();
        y.properties.combine(batch);
        match dest.iter_mut().find(|e| e.text == y.text) {
            Some(existing) => existing.properties.reconcile(&y.properties),
            None => dest.push(y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::spelling::SpellingType;

    fn spelling(text: &str, kind: SpellingType, credibility: f64, tips: &str) -> Spelling {
        Spelling::with_properties(text, SpellingProperties::new(kind, credibility).with_tips(tips))
    }

    #[test]
    fn test_merge_appends_new_text() {
        let mut script = Script::new();
        script.merge("ni", &SpellingProperties::default(), &[Spelling::new("ni")]);
        script.merge(
            "ni",
            &SpellingProperties::default(),
            &[spelling("nyi", SpellingType::Ambiguous, 0.5, "")],
        );

        let entries = script.get("ni").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].text, "ni");
        assert_eq!(entries[1].text, "nyi");
        assert_eq!(entries[1].properties.kind, SpellingType::Ambiguous);
    }

    #[test]
    fn test_merge_combines_batch() {
        let mut script = Script::new();
        let batch = SpellingProperties::new(SpellingType::Abbreviation, -1.0).with_tips("〔缩〕");
        script.merge("n", &batch, &[spelling("ni", SpellingType::Normal, 2.0, "old")]);

        let e = &script.get("n").unwrap()[0];
        assert_eq!(e.text, "ni");
        assert_eq!(e.properties.kind, SpellingType::Abbreviation);
        assert_eq!(e.properties.credibility, 1.0);
        assert_eq!(e.properties.tips, "〔缩〕");
    }

    #[test]
    fn test_merge_keeps_source_tips_without_batch_tips() {
        let mut script = Script::new();
        script.merge(
            "n",
            &SpellingProperties::default(),
            &[spelling("ni", SpellingType::Normal, 0.0, "keep")],
        );
        assert_eq!(script.get("n").unwrap()[0].properties.tips, "keep");
    }

    #[test]
    fn test_merge_reconciles_collision() {
        let mut script = Script::new();
        script.merge(
            "lv",
            &SpellingProperties::default(),
            &[spelling("lv", SpellingType::Ambiguous, 1.0, "a")],
        );
        script.merge(
            "lv",
            &SpellingProperties::default(),
            &[spelling("lv", SpellingType::Normal, 0.5, "")],
        );

        let entries = script.get("lv").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].properties.kind, SpellingType::Normal);
        assert_eq!(entries[0].properties.credibility, 1.0);
        assert!(entries[0].properties.tips.is_empty());
    }

    #[test]
    fn test_merge_idempotent_with_identity_batch() {
        let mut script = Script::new();
        let source = vec![
            spelling("zhi", SpellingType::Normal, 1.0, ""),
            spelling("zi", SpellingType::Ambiguous, 0.5, ""),
        ];
        script.merge("zhi", &SpellingProperties::default(), &source);
        let before = script.clone();

        let own: Vec<Spelling> = script.get("zhi").unwrap().to_vec();
        script.merge("zhi", &SpellingProperties::default(), &own);
        assert!(script.same_as(&before));
    }

    #[test]
    fn test_merge_empty_source_creates_key() {
        let mut script = Script::new();
        script.merge("a", &SpellingProperties::default(), &[]);
        assert!(script.contains_key("a"));
        assert_eq!(script.get("a").unwrap().len(), 0);
    }

    #[test]
    fn test_add_syllable() {
        let mut script = Script::new();
        assert!(script.add_syllable("ma"));
        assert!(!script.add_syllable("ma"));
        assert_eq!(script.get("ma").unwrap().len(), 0);
    }

    #[test]
    fn test_from_syllables() {
        let script = Script::from_syllables(["zhong", "guo", "zhong"]);
        assert_eq!(script.len(), 2);
        assert_eq!(script.get("zhong").unwrap().len(), 1);
        assert_eq!(script.keys().collect::<Vec<_>>(), vec!["guo", "zhong"]);
        assert_eq!(script.spelling_count(), 2);
    }
}
