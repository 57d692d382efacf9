//! CLI command implementations

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::algebra::engine::ExecutionStrategy;
use crate::algebra::projection::Projection;
use crate::algebra::script::Script;
use crate::config::AlgebraConfig;
use crate::serialization::{load_syllables, ScriptDumper};

use super::args::{Commands, InputFormat};
use super::detect::detect_format;

/// Execute a CLI command
pub fn execute(command: Commands) -> Result<()> {
    match command {
        Commands::Apply {
            config,
            input,
            format,
            output,
            workers,
            sequential,
        } => cmd_apply(&config, &input, format, output, workers, sequential),
        Commands::Project { config, texts } => cmd_project(&config, &texts),
        Commands::Check { config } => cmd_check(&config),
    }
}

fn load_config(path: &Path) -> Result<AlgebraConfig> {
    AlgebraConfig::from_path(path)
        .with_context(|| format!("Failed to load config: {}", path.display()))
}

fn build_projection(config: &AlgebraConfig) -> Result<Projection> {
    config
        .build_projection()
        .context("Failed to load spelling algebra")
}

fn load_script(path: &Path, format: InputFormat) -> Result<Script> {
    let file =
        File::open(path).with_context(|| format!("Failed to open input: {}", path.display()))?;
    let script = match format {
        InputFormat::Syllables => load_syllables(file),
        InputFormat::Dump => ScriptDumper::load(file),
    };
    script.with_context(|| format!("Failed to read {} input: {}", format, path.display()))
}

fn cmd_apply(
    config_path: &Path,
    input: &Path,
    format: Option<InputFormat>,
    output: Option<PathBuf>,
    workers: Option<usize>,
    sequential: bool,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    if workers.is_some() {
        config.workers = workers;
    }
    if sequential {
        config.strategy = ExecutionStrategy::Sequential;
    }
    let projection = build_projection(&config)?;

    let format = detect_format(input, format)?;
    let mut script = load_script(input, format)?;
    let keys_before = script.len();

    let modified = projection
        .apply_script(&mut script)
        .context("Failed to apply spelling algebra")?;

    match &output {
        Some(path) => ScriptDumper::dump_to_path(&script, path)
            .with_context(|| format!("Failed to write output: {}", path.display()))?,
        None => {
            let stdout = io::stdout();
            ScriptDumper::dump(&script, BufWriter::new(stdout.lock()))
                .context("Failed to write output")?;
        }
    }

    eprintln!(
        "{} {} formula(s), {} -> {} key(s){}",
        "✓".green(),
        projection.len(),
        keys_before,
        script.len(),
        if modified { "" } else { " (unchanged)" }
    );
    Ok(())
}

fn cmd_project(config_path: &Path, texts: &[String]) -> Result<()> {
    let config = load_config(config_path)?;
    let projection = build_projection(&config)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for text in texts {
        let mut value = text.clone();
        projection
            .apply_str(&mut value)
            .with_context(|| format!("Failed to project '{}'", text))?;
        writeln!(out, "{}\t{}", text, value)?;
    }
    Ok(())
}

fn cmd_check(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let mut projection = Projection::sequential();
    projection
        .load(&config.algebra)
        .context("Failed to load spelling algebra")?;
    println!(
        "{} {} formula(s) compiled",
        "✓".green(),
        projection.len().to_string().bold()
    );
    Ok(())
}
