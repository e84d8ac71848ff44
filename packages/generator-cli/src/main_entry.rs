// Main Entry Point
//
// Argument parsing and the run loop behind the `apigen` binary.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{bail, Context};
use apigen::{Generator, GeneratorOptions, UnsupportedTypePolicy};
use clap::Parser;

use crate::config::ApigenConfig;

/// Exit status when generation ran but some definitions failed under `--strict`.
pub const EXIT_DEFINITION_FAILED: i32 = 1;

#[derive(Debug, Parser)]
#[command(name = "apigen")]
#[command(about = "Generate code from apig directives in a Go source file")]
#[command(version)]
pub struct Cli {
    /// Go source file containing the directives
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// JSON configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory relative template paths are resolved against
    #[arg(long, value_name = "DIR", env = "APIGEN_TEMPLATE_ROOT")]
    pub template_root: Option<PathBuf>,

    /// Directory searched for import paths before $GOPATH (repeatable)
    #[arg(long = "package-root", value_name = "DIR")]
    pub package_roots: Vec<PathBuf>,

    /// Treat callables with unsupported field types as non-matches
    #[arg(long)]
    pub skip_unsupported: bool,

    /// Write generated code to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Exit with status 1 if any definition failed
    #[arg(long)]
    pub strict: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Combine flags with the configuration file. Flags win.
    pub fn generator_options(&self) -> anyhow::Result<GeneratorOptions> {
        let config = match &self.config {
            Some(path) => ApigenConfig::load(path)
                .with_context(|| format!("failed to read config {}", path.display()))?,
            None => ApigenConfig::default(),
        };

        let mut package_roots = self.package_roots.clone();
        package_roots.extend(config.package_roots);

        let unsupported_types = if self.skip_unsupported {
            UnsupportedTypePolicy::Skip
        } else {
            config.unsupported_types.unwrap_or_default()
        };

        Ok(GeneratorOptions {
            template_root: self.template_root.clone().or(config.template_root),
            package_roots,
            unsupported_types,
        })
    }

    /// Default log filter for the chosen verbosity.
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "apigen=debug,apigen_cli=debug"
        } else {
            "apigen=info,apigen_cli=info"
        }
    }
}

/// Run the generator and return the process exit status.
pub fn run(cli: &Cli) -> anyhow::Result<i32> {
    if !cli.file.is_file() {
        bail!("input file not found: {}", cli.file.display());
    }
    let options = cli.generator_options()?;
    let generator = Generator::from_options(options);

    let mut sink: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };
    let report = generator.process_file(&cli.file, &mut sink)?;
    sink.flush().context("failed to flush output")?;

    for failure in &report.failures {
        tracing::debug!(%failure, "failed definition");
    }
    if cli.strict && !report.is_success() {
        return Ok(EXIT_DEFINITION_FAILED);
    }
    Ok(0)
}
