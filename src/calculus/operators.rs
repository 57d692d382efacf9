//! Standard formula operators.

use std::borrow::Cow;

use regex::Regex;
use rustc_hash::FxHashMap;

use super::{require_args, CalculusError};
use crate::algebra::calculation::{Calculation, CalculationError};
use crate::algebra::spelling::{Spelling, SpellingType};

/// Maximum number of bytes a single rewrite may add to a spelling.
///
/// Guards against runaway replacements such as `xform/$/$0$0/` blowing up
/// across rounds.
pub const MAX_EXPANSION: usize = 64;

/// Credibility added to spellings derived by `fuzz`: `ln(0.5)`.
pub const FUZZY_SPELLING_PENALTY: f64 = -std::f64::consts::LN_2;

/// Credibility added to spellings derived by `abbrev`: `ln(0.5)`.
pub const ABBREVIATION_PENALTY: f64 = -std::f64::consts::LN_2;

fn check_expansion(before: &str, after: &str) -> Result<(), CalculationError> {
    if after.len() > before.len() + MAX_EXPANSION {
        return Err(CalculationError::ExpansionLimit {
            text: before.to_string(),
            limit: MAX_EXPANSION,
        });
    }
    Ok(())
}

/// Brace numbered group references so `$1ve` means group 1 followed by
/// `ve`, not a group named `1ve`.
fn normalize_replacement(replacement: &str) -> String {
    let mut out = String::with_capacity(replacement.len() + 4);
    let mut chars = replacement.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('$') => {
                out.push_str("$$");
                chars.next();
            }
            Some(d) if d.is_ascii_digit() => {
                out.push_str("${");
                while let Some(&d) = chars.peek() {
                    if !d.is_ascii_digit() {
                        break;
                    }
                    out.push(d);
                    chars.next();
                }
                out.push('}');
            }
            _ => out.push('$'),
        }
    }
    out
}

/// `xlit/from/to/`: character-for-character transliteration.
#[derive(Debug, Clone)]
pub struct Transliteration {
    table: FxHashMap<char, char>,
}

impl Transliteration {
    /// Build from two tables of equal character count.
    pub fn new(from: &str, to: &str) -> Result<Self, CalculusError> {
        let (nfrom, nto) = (from.chars().count(), to.chars().count());
        if nfrom != nto {
            return Err(CalculusError::LengthMismatch { from: nfrom, to: nto });
        }
        if nfrom == 0 {
            return Err(CalculusError::EmptyPattern);
        }
        Ok(Self {
            table: from.chars().zip(to.chars()).collect(),
        })
    }

    pub(crate) fn parse(args: &[&str]) -> Result<Box<dyn Calculation>, CalculusError> {
        require_args("xlit", args, 2)?;
        Ok(Box::new(Self::new(args[0], args[1])?))
    }
}

impl Calculation for Transliteration {
    fn apply(&self, spelling: &mut Spelling) -> Result<bool, CalculationError> {
        let mut modified = false;
        let result: String = spelling
            .text
            .chars()
            .map(|c| match self.table.get(&c) {
                Some(&r) => {
                    modified |= r != c;
                    r
                }
                None => c,
            })
            .collect();
        if modified {
            spelling.text = result;
        }
        Ok(modified)
    }

    fn describe(&self) -> String {
        let mut pairs: Vec<_> = self.table.iter().collect();
        pairs.sort_unstable();
        let (from, to): (String, String) = pairs.into_iter().map(|(&a, &b)| (a, b)).unzip();
        format!("xlit/{}/{}/", from, to)
    }
}

/// How a regex rewrite treats the original entry and the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteMode {
    /// `xform`: replace the original
    Transform,
    /// `derive`: keep the original, fork the result
    Derive,
    /// `fuzz`: as `Derive`, result is [`SpellingType::Ambiguous`]
    Fuzz,
    /// `abbrev`: as `Derive`, result is [`SpellingType::Abbreviation`]
    Abbreviate,
}

impl RewriteMode {
    fn operator(self) -> &'static str {
        match self {
            RewriteMode::Transform => "xform",
            RewriteMode::Derive => "derive",
            RewriteMode::Fuzz => "fuzz",
            RewriteMode::Abbreviate => "abbrev",
        }
    }
}

/// `xform`, `derive`, `fuzz` and `abbrev`: regex replace-all.
#[derive(Debug, Clone)]
pub struct Transformation {
    pattern: Regex,
    replacement: String,
    mode: RewriteMode,
}

impl Transformation {
    /// Compile `pattern`; `replacement` may reference its groups.
    pub fn new(mode: RewriteMode, pattern: &str, replacement: &str) -> Result<Self, CalculusError> {
        if pattern.is_empty() {
            return Err(CalculusError::EmptyPattern);
        }
        Ok(Self {
            pattern: Regex::new(pattern)?,
            replacement: normalize_replacement(replacement),
            mode,
        })
    }

    pub(crate) fn parse(mode: RewriteMode, args: &[&str]) -> Result<Box<dyn Calculation>, CalculusError> {
        require_args(mode.operator(), args, 2)?;
        Ok(Box::new(Self::new(mode, args[0], args[1])?))
    }

    /// The rewrite mode.
    pub fn mode(&self) -> RewriteMode {
        self.mode
    }
}

impl Calculation for Transformation {
    fn apply(&self, spelling: &mut Spelling) -> Result<bool, CalculationError> {
        let result = match self.pattern.replace_all(&spelling.text, self.replacement.as_str()) {
            Cow::Borrowed(_) => return Ok(false),
            Cow::Owned(result) => result,
        };
        if result == spelling.text {
            return Ok(false);
        }
        check_expansion(&spelling.text, &result)?;
        spelling.text = result;

        let properties = &mut spelling.properties;
        match self.mode {
            RewriteMode::Transform | RewriteMode::Derive => {}
            RewriteMode::Fuzz => {
                properties.kind = SpellingType::Ambiguous;
                properties.credibility += FUZZY_SPELLING_PENALTY;
            }
            RewriteMode::Abbreviate => {
                properties.kind = SpellingType::Abbreviation;
                properties.credibility += ABBREVIATION_PENALTY;
            }
        }
        Ok(true)
    }

    fn deletion(&self) -> bool {
        self.mode == RewriteMode::Transform
    }

    fn describe(&self) -> String {
        format!("{}/{}/{}/", self.mode.operator(), self.pattern.as_str(), self.replacement)
    }
}

/// `erase/pattern/`: drop spellings the pattern matches in full.
#[derive(Debug, Clone)]
pub struct Erasion {
    pattern: Regex,
    source: String,
}

impl Erasion {
    /// Compile `pattern`, anchored at both ends.
    pub fn new(pattern: &str) -> Result<Self, CalculusError> {
        if pattern.is_empty() {
            return Err(CalculusError::EmptyPattern);
        }
        Ok(Self {
            pattern: Regex::new(&format!("^(?:{})$", pattern))?,
            source: pattern.to_string(),
        })
    }

    pub(crate) fn parse(args: &[&str]) -> Result<Box<dyn Calculation>, CalculusError> {
        require_args("erase", args, 1)?;
        Ok(Box::new(Self::new(args[0])?))
    }
}

impl Calculation for Erasion {
    fn apply(&self, spelling: &mut Spelling) -> Result<bool, CalculationError> {
        if spelling.text.is_empty() || !self.pattern.is_match(&spelling.text) {
            return Ok(false);
        }
        spelling.text.clear();
        Ok(true)
    }

    fn addition(&self) -> bool {
        false
    }

    fn describe(&self) -> String {
        format!("erase/{}/", self.source)
    }
}
