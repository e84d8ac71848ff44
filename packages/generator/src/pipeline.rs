//! Generation Pipeline
//!
//! Pass 1 interprets every directive of a host file and fills the registry.
//! Pass 2 only borrows the registry: setup, resolution and rendering run per
//! definition, and a failing definition never stops the others.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::config::{DefConfig, GeneratorOptions, GlobalConfig};
use crate::directive::{Diagnostic, DirectiveInterpreter};
use crate::emit::Emitter;
use crate::error::{GeneratorError, Result};
use crate::go::extract_comment_lines;
use crate::loader::{FsPackageLoader, PackageLoader};
use crate::resolver::SymbolResolver;

/// Output of pass 1.
#[derive(Debug, Default)]
pub struct Interpretation {
    pub global: GlobalConfig,
    pub definitions: Vec<DefConfig>,
    pub diagnostics: Vec<Diagnostic>,
}

/// A definition that produced no output.
#[derive(Debug)]
pub struct DefinitionFailure {
    pub line: usize,
    pub generator_ref: String,
    pub error: GeneratorError,
}

impl fmt::Display for DefinitionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}: {}", self.line, self.generator_ref, self.error)
    }
}

/// Summary of one run
#[derive(Debug, Default)]
pub struct GenerationReport {
    pub definitions: usize,
    pub resolved: usize,
    pub rendered: usize,
    pub failures: Vec<DefinitionFailure>,
    pub diagnostics: Vec<Diagnostic>,
}

impl GenerationReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct Generator<L> {
    options: GeneratorOptions,
    resolver: SymbolResolver<L>,
}

impl Generator<FsPackageLoader> {
    /// Generator over the filesystem: package roots, then `$GOPATH`.
    pub fn from_options(options: GeneratorOptions) -> Self {
        let loader = FsPackageLoader::with_gopath(options.package_roots.clone());
        Generator::new(options, loader)
    }
}

impl<L: PackageLoader> Generator<L> {
    pub fn new(options: GeneratorOptions, loader: L) -> Self {
        let resolver = SymbolResolver::new(loader).with_policy(options.unsupported_types);
        Generator { options, resolver }
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    pub fn resolver(&self) -> &SymbolResolver<L> {
        &self.resolver
    }

    /// Pass 1 with the generator's own options.
    pub fn interpret(&self, source: &str) -> Result<Interpretation> {
        interpret_with(&self.options, source)
    }

    /// Pass 2. The registry is frozen for the whole pass.
    pub fn emit<W: Write>(&self, interpretation: Interpretation, sink: W) -> GenerationReport {
        let Interpretation {
            global,
            definitions,
            diagnostics,
        } = interpretation;

        let mut report = GenerationReport {
            definitions: definitions.len(),
            diagnostics,
            ..GenerationReport::default()
        };
        let mut emitter = Emitter::new(&global, sink);

        for mut def in definitions {
            if let Err(err) = def.setup(&global, &self.resolver) {
                record_failure(&mut report, &def, err.into());
                continue;
            }
            report.resolved += 1;

            match emitter.emit(&def) {
                Ok(true) => report.rendered += 1,
                Ok(false) => {}
                Err(err) => record_failure(&mut report, &def, err),
            }
        }
        report
    }

    pub fn process_source<W: Write>(&self, source: &str, sink: W) -> Result<GenerationReport> {
        self.run(&self.options, source, sink)
    }

    /// Run both passes over a host file. Relative template paths resolve
    /// against the file's directory unless a template root is configured.
    pub fn process_file<W: Write>(&self, path: &Path, sink: W) -> Result<GenerationReport> {
        let source = fs::read_to_string(path).map_err(|e| GeneratorError::io(path, e))?;
        if self.options.template_root.is_some() {
            return self.run(&self.options, &source, sink);
        }
        let options = GeneratorOptions {
            template_root: path.parent().map(Path::to_path_buf),
            ..self.options.clone()
        };
        self.run(&options, &source, sink)
    }

    fn run<W: Write>(
        &self,
        options: &GeneratorOptions,
        source: &str,
        sink: W,
    ) -> Result<GenerationReport> {
        let interpretation = interpret_with(options, source)?;
        let report = self.emit(interpretation, sink);
        tracing::info!(
            definitions = report.definitions,
            resolved = report.resolved,
            rendered = report.rendered,
            failed = report.failures.len(),
            "generation finished"
        );
        Ok(report)
    }
}

fn interpret_with(options: &GeneratorOptions, source: &str) -> Result<Interpretation> {
    let interpreter = DirectiveInterpreter::new(options);
    let mut interpretation = Interpretation::default();

    for comment in extract_comment_lines(source)? {
        let outcome = interpreter.interpret_line(&mut interpretation.global, comment.line, &comment.text);
        interpretation.diagnostics.extend(outcome.diagnostics);
        interpretation.definitions.extend(outcome.definition);
    }
    tracing::debug!(
        definitions = interpretation.definitions.len(),
        templates = interpretation.global.templates.len(),
        "directives interpreted"
    );
    Ok(interpretation)
}

fn record_failure(report: &mut GenerationReport, def: &DefConfig, error: GeneratorError) {
    tracing::error!(line = def.line, generator = %def.generator_ref, error = %error, "definition failed");
    report.failures.push(DefinitionFailure {
        line: def.line,
        generator_ref: def.generator_ref.clone(),
        error,
    });
}
