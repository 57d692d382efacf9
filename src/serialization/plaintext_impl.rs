//! Tab-separated dump of a spelling dictionary.
//!
//! # Format
//!
//! One line per `(key, spelling)` pair, five tab-separated fields:
//!
//! ```text
//! key      spelling  type  credibility  tips
//! ni       ni        -     1
//!          nyi       ?     -0.6931471805599453
//! zhong    zhong     -     0
//! ```
//!
//! The key is written only on its first line and left empty on the
//! following ones. `type` is one of `- a c ? !` (see
//! [`SpellingType::SYMBOLS`]). Keys appear in ascending order, spellings in
//! their recorded order. Keys without spellings produce no lines.
//!
//! # Example
//!
//! ```rust,ignore
//! use spelling_algebra::prelude::*;
//! use std::fs::File;
//!
//! let script = Script::from_syllables(["ni", "hao"]);
//! ScriptDumper::dump(&script, File::create("script.txt")?)?;
//! let loaded = ScriptDumper::load(File::open("script.txt")?)?;
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use super::ScriptFormatError;
use crate::algebra::script::Script;
use crate::algebra::spelling::{Spelling, SpellingProperties, SpellingType};

/// Plain text dumper for [`Script`]s.
pub struct ScriptDumper;

impl ScriptDumper {
    /// Write `script` to `writer`.
    pub fn dump<W: Write>(script: &Script, mut writer: W) -> Result<(), ScriptFormatError> {
        for (key, spellings) in script {
            let mut first = true;
            for s in spellings {
                writeln!(
                    writer,
                    "{}\t{}\t{}\t{}\t{}",
                    if first { key.as_str() } else { "" },
                    s.text,
                    s.properties.kind.symbol(),
                    s.properties.credibility,
                    s.properties.tips
                )?;
                first = false;
            }
        }
        writer.flush()?;
        Ok(())
    }

    /// Write `script` to a file, creating or truncating it.
    pub fn dump_to_path<P: AsRef<Path>>(script: &Script, path: P) -> Result<(), ScriptFormatError> {
        let file = File::create(path)?;
        Self::dump(script, BufWriter::new(file))
    }

    /// Read a dump back into a [`Script`].
    ///
    /// Blank lines are skipped. Repeated spellings under one key are merged.
    pub fn load<R: Read>(reader: R) -> Result<Script, ScriptFormatError> {
        let mut script = Script::new();
        let mut current: Option<String> = None;

        for (i, line) in BufReader::new(reader).lines().enumerate() {
            let line_no = i + 1;
            let line = line?;
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() != 5 {
                return Err(ScriptFormatError::FieldCount {
                    line: line_no,
                    found: fields.len(),
                });
            }

            if !fields[0].is_empty() {
                current = Some(fields[0].to_string());
            }
            let key = current
                .as_deref()
                .ok_or(ScriptFormatError::MissingKey { line: line_no })?;

            let spelling = parse_spelling(line_no, &fields[1..])?;
            script.merge(key, &SpellingProperties::default(), &[spelling]);
        }

        Ok(script)
    }

    /// Read a dump from a file.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Script, ScriptFormatError> {
        Self::load(File::open(path)?)
    }
}

fn parse_spelling(line: usize, fields: &[&str]) -> Result<Spelling, ScriptFormatError> {
    let mut symbol = fields[1].chars();
    let kind = match (symbol.next(), symbol.next()) {
        (Some(c), None) => SpellingType::from_symbol(c),
        _ => None,
    }
    .ok_or_else(|| ScriptFormatError::UnknownType {
        line,
        symbol: fields[1].to_string(),
    })?;

    let credibility: f64 = fields[2]
        .parse()
        .map_err(|_| ScriptFormatError::Credibility {
            line,
            value: fields[2].to_string(),
        })?;

    Ok(Spelling::with_properties(
        fields[0],
        SpellingProperties::new(kind, credibility).with_tips(fields[3]),
    ))
}

/// Read one syllable per line into a [`Script`] where every syllable holds
/// its own canonical spelling.
///
/// Surrounding whitespace is trimmed and blank lines are skipped.
pub fn load_syllables<R: Read>(reader: R) -> Result<Script, ScriptFormatError> {
    let mut syllables = Vec::new();
    for line in BufReader::new(reader).lines() {
        let line = line?;
        let syllable = line.trim();
        if !syllable.is_empty() {
            syllables.push(syllable.to_string());
        }
    }
    Ok(Script::from_syllables(syllables))
}
