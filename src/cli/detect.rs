//! Dictionary input format auto-detection

pub use super::args::InputFormat;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Detect the input format of a dictionary file.
///
/// A user-specified format always wins. Otherwise the first non-blank line
/// decides: dump lines are tab-separated, syllable lists are not.
pub fn detect_format(path: &Path, user_format: Option<InputFormat>) -> Result<InputFormat> {
    if let Some(format) = user_format {
        return Ok(format);
    }

    let file =
        File::open(path).with_context(|| format!("Failed to open input: {}", path.display()))?;
    for line in BufReader::new(file).lines() {
        let line = line.with_context(|| format!("Failed to read input: {}", path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        return Ok(detect_line(&line));
    }
    Ok(InputFormat::Syllables)
}

fn detect_line(line: &str) -> InputFormat {
    if line.contains('\t') {
        InputFormat::Dump
    } else {
        InputFormat::Syllables
    }
}
