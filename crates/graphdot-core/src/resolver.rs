//! Package resolution: the boundary to the Go toolchain.
//!
//! The tree builder never inspects source files itself. It asks a
//! [`PackageResolver`] for the direct imports of an import path and whether
//! that path belongs to the standard library.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use dashmap::DashMap;
use serde::Deserialize;
use tracing::{debug, trace};

use graphdot_error::{Error, Result};

/// Import path of the cgo pseudo-package. It has no source and is never resolved.
pub const CGO_PSEUDO_PACKAGE: &str = "C";

/// What a resolver knows about one package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedPackage {
    /// Canonical import path (`.` resolves to the package's real path).
    pub import_path: String,
    /// Part of the toolchain's standard library.
    pub is_system: bool,
    /// Direct imports of the non-test sources.
    pub imports: Vec<String>,
    /// Imports of the package's test files, internal and external.
    pub test_imports: Vec<String>,
}

impl ResolvedPackage {
    pub fn new(import_path: impl Into<String>) -> Self {
        Self {
            import_path: import_path.into(),
            ..Default::default()
        }
    }
}

/// Resolves an import path, relative to a working directory, into a package.
pub trait PackageResolver: Send + Sync {
    fn resolve(&self, import_path: &str, work_dir: &Path) -> Result<ResolvedPackage>;
}

impl<R: PackageResolver + ?Sized> PackageResolver for &R {
    fn resolve(&self, import_path: &str, work_dir: &Path) -> Result<ResolvedPackage> {
        (**self).resolve(import_path, work_dir)
    }
}

impl<R: PackageResolver + ?Sized> PackageResolver for Box<R> {
    fn resolve(&self, import_path: &str, work_dir: &Path) -> Result<ResolvedPackage> {
        (**self).resolve(import_path, work_dir)
    }
}

// ============================================================================
// go list
// ============================================================================

/// Resolver backed by `go list -json`.
#[derive(Debug, Clone)]
pub struct GoListResolver {
    go: PathBuf,
}

impl Default for GoListResolver {
    fn default() -> Self {
        Self::new("go")
    }
}

impl GoListResolver {
    /// Use the given `go` binary.
    pub fn new(go: impl Into<PathBuf>) -> Self {
        Self { go: go.into() }
    }

    pub fn go_binary(&self) -> &Path {
        &self.go
    }
}

impl PackageResolver for GoListResolver {
    fn resolve(&self, import_path: &str, work_dir: &Path) -> Result<ResolvedPackage> {
        if import_path.is_empty() || import_path.starts_with('-') {
            return Err(
                Error::invalid_argument(format!("invalid import path '{import_path}'"))
                    .with_operation("resolver::go_list"),
            );
        }

        trace!(import_path, dir = %work_dir.display(), "go list");
        let output = Command::new(&self.go)
            .args(["list", "-json", import_path])
            .current_dir(work_dir)
            .output()
            .map_err(|err| {
                Error::resolution_failed(
                    import_path,
                    format!("failed to run {}: {err}", self.go.display()),
                )
                .with_operation("resolver::go_list")
                .set_source(err)
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(
                Error::resolution_failed(import_path, stderr.trim().to_string())
                    .with_operation("resolver::go_list")
                    .with_context("dir", work_dir.display().to_string()),
            );
        }

        parse_go_list(import_path, &output.stdout)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GoListPackage {
    import_path: String,
    #[serde(default)]
    standard: bool,
    #[serde(default)]
    goroot: bool,
    #[serde(default)]
    imports: Vec<String>,
    #[serde(default)]
    test_imports: Vec<String>,
    #[serde(default, rename = "XTestImports")]
    x_test_imports: Vec<String>,
    #[serde(default)]
    error: Option<GoListError>,
}

#[derive(Debug, Deserialize)]
struct GoListError {
    #[serde(rename = "Err")]
    err: String,
}

/// Parse the JSON printed by `go list -json` for a single package.
pub fn parse_go_list(import_path: &str, stdout: &[u8]) -> Result<ResolvedPackage> {
    let mut stream = serde_json::Deserializer::from_slice(stdout).into_iter::<GoListPackage>();
    let package = match stream.next() {
        Some(Ok(package)) => package,
        Some(Err(err)) => {
            return Err(Error::parse_failed(format!("invalid go list output: {err}"))
                .with_operation("resolver::parse_go_list")
                .with_context("import_path", import_path)
                .set_source(err));
        }
        None => {
            return Err(Error::parse_failed("empty go list output")
                .with_operation("resolver::parse_go_list")
                .with_context("import_path", import_path));
        }
    };

    if let Some(error) = package.error {
        return Err(Error::resolution_failed(import_path, error.err)
            .with_operation("resolver::parse_go_list"));
    }

    let mut test_imports = package.test_imports;
    for path in package.x_test_imports {
        if !test_imports.contains(&path) {
            test_imports.push(path);
        }
    }

    debug!(
        import_path = %package.import_path,
        system = package.standard || package.goroot,
        imports = package.imports.len(),
        "resolved package"
    );

    Ok(ResolvedPackage {
        import_path: package.import_path,
        is_system: package.standard || package.goroot,
        imports: package.imports,
        test_imports,
    })
}

// ============================================================================
// In-memory
// ============================================================================

/// Resolver over a fixed table of packages.
///
/// Used to embed graphdot over a package graph obtained elsewhere, and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryResolver {
    packages: HashMap<String, ResolvedPackage>,
    aliases: HashMap<String, String>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a non-system package with its direct imports.
    pub fn package<I, S>(mut self, import_path: &str, imports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut package = ResolvedPackage::new(import_path);
        package.imports = imports.into_iter().map(Into::into).collect();
        self.packages.insert(import_path.to_string(), package);
        self
    }

    /// Register a standard-library package.
    pub fn system(mut self, import_path: &str) -> Self {
        let mut package = ResolvedPackage::new(import_path);
        package.is_system = true;
        self.packages.insert(import_path.to_string(), package);
        self
    }

    /// Set the test imports of an already registered package.
    pub fn test_imports<I, S>(mut self, import_path: &str, imports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let package = self
            .packages
            .entry(import_path.to_string())
            .or_insert_with(|| ResolvedPackage::new(import_path));
        package.test_imports = imports.into_iter().map(Into::into).collect();
        self
    }

    /// Make `alias` (typically `.`) resolve to `target`.
    pub fn alias(mut self, alias: &str, target: &str) -> Self {
        self.aliases.insert(alias.to_string(), target.to_string());
        self
    }
}

impl PackageResolver for MemoryResolver {
    fn resolve(&self, import_path: &str, _work_dir: &Path) -> Result<ResolvedPackage> {
        let key = self
            .aliases
            .get(import_path)
            .map(String::as_str)
            .unwrap_or(import_path);
        self.packages
            .get(key)
            .cloned()
            .ok_or_else(|| Error::package_not_found(import_path).with_operation("resolver::memory"))
    }
}

// ============================================================================
// Caching
// ============================================================================

/// Memoizes successful resolutions of an inner resolver.
///
/// The same package is reached along many import paths and resolution is
/// deterministic, so each `(work_dir, import_path)` pair is resolved once.
/// Errors are not cached.
pub struct CachingResolver<R> {
    inner: R,
    cache: DashMap<(PathBuf, String), ResolvedPackage>,
}

impl<R: PackageResolver> CachingResolver<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: DashMap::new(),
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Number of cached packages.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

impl<R: PackageResolver> PackageResolver for CachingResolver<R> {
    fn resolve(&self, import_path: &str, work_dir: &Path) -> Result<ResolvedPackage> {
        let key = (work_dir.to_path_buf(), import_path.to_string());
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit.value().clone());
        }

        let package = self.inner.resolve(import_path, work_dir)?;
        self.cache.insert(key, package.clone());
        Ok(package)
    }
}
