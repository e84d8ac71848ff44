//! Package Loader
//!
//! Locates a Go package from its import path and hands back its source files.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ResolveError;

/// `package <name>` at the start of a line, after an optional byte order mark.
static PACKAGE_CLAUSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\x{FEFF}?\s*package\s+([\p{L}_][\p{L}\p{N}_]*)").unwrap());

/// One source file of a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub path: PathBuf,
    pub text: String,
}

/// A package as returned by a loader: display name plus ordered sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedPackage {
    pub import_path: String,
    pub name: String,
    pub sources: Vec<SourceUnit>,
}

/// Capability to load a package by import path.
pub trait PackageLoader {
    fn load(&self, import_path: &str) -> Result<LoadedPackage, ResolveError>;
}

/// Read the package name from a file's `package` clause.
pub fn package_name(text: &str) -> Option<&str> {
    PACKAGE_CLAUSE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Loader over the filesystem.
///
/// Relative (`./x`, `../x`) and absolute import paths are used as directories
/// directly; any other path is looked up under each root in order.
#[derive(Debug, Clone, Default)]
pub struct FsPackageLoader {
    roots: Vec<PathBuf>,
}

impl FsPackageLoader {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        FsPackageLoader { roots }
    }

    /// Explicit roots first, then `src` under every `$GOPATH` entry.
    pub fn with_gopath(mut roots: Vec<PathBuf>) -> Self {
        if let Some(gopath) = std::env::var_os("GOPATH") {
            roots.extend(std::env::split_paths(&gopath).map(|p| p.join("src")));
        }
        FsPackageLoader { roots }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    fn locate(&self, import_path: &str) -> Result<PathBuf, ResolveError> {
        let direct = Path::new(import_path);
        if direct.is_absolute() || import_path.starts_with("./") || import_path.starts_with("../")
        {
            if direct.is_dir() {
                return Ok(direct.to_path_buf());
            }
            return Err(ResolveError::PackageNotFound {
                import_path: import_path.to_string(),
                searched: direct.display().to_string(),
            });
        }

        for root in &self.roots {
            let candidate = root.join(import_path);
            if candidate.is_dir() {
                return Ok(candidate);
            }
        }
        Err(ResolveError::PackageNotFound {
            import_path: import_path.to_string(),
            searched: self
                .roots
                .iter()
                .map(|r| r.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        })
    }
}

fn is_package_source(path: &Path) -> bool {
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name,
        None => return false,
    };
    name.ends_with(".go") && !name.ends_with("_test.go") && path.is_file()
}

impl PackageLoader for FsPackageLoader {
    fn load(&self, import_path: &str) -> Result<LoadedPackage, ResolveError> {
        let dir = self.locate(import_path)?;
        let load_error = |message: String| ResolveError::PackageLoad {
            import_path: import_path.to_string(),
            message,
        };

        let entries = fs::read_dir(&dir)
            .map_err(|e| load_error(format!("{}: {}", dir.display(), e)))?;
        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| is_package_source(path))
            .collect();
        paths.sort();

        let mut sources = Vec::with_capacity(paths.len());
        for path in paths {
            let text = fs::read_to_string(&path)
                .map_err(|e| load_error(format!("{}: {}", path.display(), e)))?;
            sources.push(SourceUnit { path, text });
        }

        let name = sources
            .iter()
            .find_map(|unit| package_name(&unit.text))
            .map(str::to_string)
            .ok_or_else(|| {
                load_error(format!("no buildable Go source files in {}", dir.display()))
            })?;

        tracing::debug!(import_path, package = %name, files = sources.len(), "loaded package");
        Ok(LoadedPackage {
            import_path: import_path.to_string(),
            name,
            sources,
        })
    }
}

/// Loader over sources held in memory, keyed by import path.
#[derive(Debug, Clone, Default)]
pub struct MemoryPackageLoader {
    packages: HashMap<String, Vec<SourceUnit>>,
}

impl MemoryPackageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file to a package. Files keep insertion order.
    pub fn add_file(
        &mut self,
        import_path: impl Into<String>,
        file_name: impl Into<PathBuf>,
        text: impl Into<String>,
    ) -> &mut Self {
        self.packages
            .entry(import_path.into())
            .or_default()
            .push(SourceUnit {
                path: file_name.into(),
                text: text.into(),
            });
        self
    }

    pub fn with_file(
        mut self,
        import_path: impl Into<String>,
        file_name: impl Into<PathBuf>,
        text: impl Into<String>,
    ) -> Self {
        self.add_file(import_path, file_name, text);
        self
    }
}

impl PackageLoader for MemoryPackageLoader {
    fn load(&self, import_path: &str) -> Result<LoadedPackage, ResolveError> {
        let sources = self
            .packages
            .get(import_path)
            .ok_or_else(|| ResolveError::PackageNotFound {
                import_path: import_path.to_string(),
                searched: String::from("<memory>"),
            })?;
        let name = sources
            .iter()
            .find_map(|unit| package_name(&unit.text))
            .ok_or_else(|| ResolveError::PackageLoad {
                import_path: import_path.to_string(),
                message: String::from("no package clause"),
            })?;
        Ok(LoadedPackage {
            import_path: import_path.to_string(),
            name: name.to_string(),
            sources: sources.clone(),
        })
    }
}
