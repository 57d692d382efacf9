//! Spelling value types.
//!
//! A [`Spelling`] is one textual variant recorded under a syllable key,
//! together with its [`SpellingProperties`]: a reliability ordinal
//! ([`SpellingType`]), a credibility weight and an optional annotation.

use std::fmt;

/// Reliability ordinal of a spelling variant.
///
/// The order is load-bearing: lower values are more canonical. Merging keeps
/// the *least* canonical type of a combined entry and the *most* canonical
/// type when two contributors collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum SpellingType {
    /// Canonical spelling of the syllable
    #[default]
    Normal,
    /// Shortened form (e.g. initials only)
    Abbreviation,
    /// Prefix completion of a longer spelling
    Completion,
    /// Fuzzy or otherwise ambiguous variant
    Ambiguous,
    /// Spelling that must not be offered
    Invalid,
}

impl SpellingType {
    /// Symbols used by the dictionary dump, indexed by ordinal.
    pub const SYMBOLS: [char; 5] = ['-', 'a', 'c', '?', '!'];

    /// All types in ascending order.
    pub const ALL: [SpellingType; 5] = [
        SpellingType::Normal,
        SpellingType::Abbreviation,
        SpellingType::Completion,
        SpellingType::Ambiguous,
        SpellingType::Invalid,
    ];

    /// Numeric ordinal (0 = canonical).
    #[inline]
    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// Single-character dump symbol.
    #[inline]
    pub fn symbol(self) -> char {
        Self::SYMBOLS[self.ordinal()]
    }

    /// Inverse of [`symbol`](Self::symbol).
    pub fn from_symbol(symbol: char) -> Option<Self> {
        Self::SYMBOLS
            .iter()
            .position(|&c| c == symbol)
            .map(|i| Self::ALL[i])
    }
}

impl fmt::Display for SpellingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Reliability metadata attached to a spelling.
///
/// The default value (`Normal`, `0.0`, no tips) is the identity of the merge
/// algebra.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpellingProperties {
    /// Reliability ordinal
    pub kind: SpellingType,
    /// Accumulated confidence weight
    pub credibility: f64,
    /// Annotation text, empty when absent
    pub tips: String,
}

impl SpellingProperties {
    /// Create properties with the given type and credibility and no tips.
    pub fn new(kind: SpellingType, credibility: f64) -> Self {
        Self {
            kind,
            credibility,
            tips: String::new(),
        }
    }

    /// Builder-style setter for the annotation.
    pub fn with_tips(mut self, tips: impl Into<String>) -> Self {
        self.tips = tips.into();
        self
    }

    /// Fold batch properties into a source entry's properties.
    ///
    /// The less canonical type wins, credibilities add up, and non-empty
    /// batch tips replace the entry's own.
    pub(crate) fn combine(&mut self, batch: &SpellingProperties) {
        self.kind = self.kind.max(batch.kind);
        self.credibility += batch.credibility;
        if !batch.tips.is_empty() {
            self.tips.clone_from(&batch.tips);
        }
    }

    /// Reconcile a colliding contribution into an existing entry.
    ///
    /// Tips are cleared unconditionally so the outcome does not depend on
    /// which contributor arrived first.
    pub(crate) fn reconcile(&mut self, other: &SpellingProperties) {
        self.kind = self.kind.min(other.kind);
        if other.credibility > self.credibility {
            self.credibility = other.credibility;
        }
        self.tips.clear();
    }
}

/// One textual variant recorded under a syllable key.
///
/// Equality is defined on `text` only; two spellings with the same text but
/// different properties are the same entry as far as deduplication goes.
#[derive(Debug, Clone, Default)]
pub struct Spelling {
    /// Spelling text
    pub text: String,
    /// Reliability metadata
    pub properties: SpellingProperties,
}

impl Spelling {
    /// A canonical spelling with default properties.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            properties: SpellingProperties::default(),
        }
    }

    /// A spelling with explicit properties.
    pub fn with_properties(text: impl Into<String>, properties: SpellingProperties) -> Self {
        Self {
            text: text.into(),
            properties,
        }
    }

    /// Exact comparison of text *and* properties.
    ///
    /// Use this in tests and equivalence checks; `==` only looks at text.
    pub fn same_as(&self, other: &Spelling) -> bool {
        self.text == other.text
            && self.properties.kind == other.properties.kind
            && self.properties.credibility.to_bits() == other.properties.credibility.to_bits()
            && self.properties.tips == other.properties.tips
    }
}

impl PartialEq for Spelling {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Spelling {}

impl From<&str> for Spelling {
    fn from(text: &str) -> Self {
        Spelling::new(text)
    }
}
