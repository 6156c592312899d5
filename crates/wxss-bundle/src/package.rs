//! The package: every stylesheet of a mini-app, and the passes over them.
//!
//! A [`Package`] is the registry the compiler resolves imports against. Its
//! lifecycle mirrors how a package is bundled:
//!
//! 1. Register every stylesheet ([`Package::insert`] or [`Package::load_dir`])
//! 2. Compile each one ([`Package::compile_all`])
//! 3. Validate the import graph and classify independence
//!    ([`Package::resolve_graph`])
//!
//! [`Package::process`] runs steps 2 and 3.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::compile::compile;
use crate::error::{BundleError, CompileError, CompileErrors, CyclicImportError};
use crate::graph;
use crate::path::normalize;
use crate::stylesheet::{ImportRef, Stylesheet};
use crate::transform::Transforms;

/// Finds stylesheets by extension or by path.
pub trait StylesheetLookup: Sync {
    fn find_by_extension(&self, extension: &str) -> Vec<&Stylesheet>;

    /// `None` when no stylesheet is registered at `path`.
    fn find_by_path(&self, path: &Path) -> Option<&Stylesheet>;
}

/// Package-wide settings.
#[derive(Debug, Clone, PartialEq)]
pub struct BundleOptions {
    /// The application-wide stylesheet, relative to the package root.
    pub entry: PathBuf,
    /// Extension of stylesheet files, without the dot.
    pub extension: String,
    /// Screen width in `rpx` that all devices scale from.
    pub reference_width: f64,
}

impl Default for BundleOptions {
    fn default() -> Self {
        Self {
            entry: PathBuf::from("app.wxss"),
            extension: "wxss".to_string(),
            reference_width: crate::device::REFERENCE_WIDTH,
        }
    }
}

impl BundleOptions {
    pub fn with_entry(mut self, entry: impl Into<PathBuf>) -> Self {
        self.entry = entry.into();
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_reference_width(mut self, reference_width: f64) -> Self {
        self.reference_width = reference_width;
        self
    }
}

/// Every stylesheet of one package, in registration order.
pub struct Package {
    root: PathBuf,
    options: BundleOptions,
    transforms: Transforms,
    sheets: Vec<Stylesheet>,
    index: HashMap<PathBuf, usize>,
}

impl Package {
    /// A package rooted at `root`. A relative root is made absolute against
    /// the current directory.
    pub fn new(root: impl AsRef<Path>, options: BundleOptions) -> Self {
        let root = root.as_ref();
        let root = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());
        Self {
            root: normalize(&root),
            options,
            transforms: Transforms::default(),
            sheets: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn with_transforms(mut self, transforms: Transforms) -> Self {
        self.transforms = transforms;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn options(&self) -> &BundleOptions {
        &self.options
    }

    pub fn entry_path(&self) -> PathBuf {
        self.locate(&self.options.entry)
    }

    /// Resolves `path` against the package root. Absolute paths are kept.
    pub fn locate(&self, path: impl AsRef<Path>) -> PathBuf {
        normalize(&self.root.join(path))
    }

    /// Registers a stylesheet, replacing any previous one at the same path.
    ///
    /// `source` is `None` for a virtual stylesheet with no file behind it.
    pub fn insert(&mut self, path: impl AsRef<Path>, source: Option<String>) -> &mut Stylesheet {
        let path = self.locate(path);
        let mut sheet = Stylesheet::new(&path, source);
        sheet.set_entry(path == self.entry_path());

        let index = match self.index.get(&path) {
            Some(&index) => {
                self.sheets[index] = sheet;
                index
            }
            None => {
                self.sheets.push(sheet);
                self.index.insert(path, self.sheets.len() - 1);
                self.sheets.len() - 1
            }
        };
        &mut self.sheets[index]
    }

    /// Registers every stylesheet file under the package root.
    ///
    /// Files are registered in path order. Returns how many were found.
    pub fn load_dir(&mut self) -> Result<usize, CompileError> {
        let mut files = Vec::new();
        collect_files(&self.root, &self.options.extension, &mut files)?;
        files.sort();

        for file in &files {
            let source = fs::read_to_string(file).map_err(|source| CompileError::Io {
                path: file.clone(),
                source,
            })?;
            self.insert(file, Some(source));
        }

        log::info!(
            "PACKAGE: loaded {} stylesheet(s) from {}",
            files.len(),
            self.root.display()
        );
        Ok(files.len())
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<&Stylesheet> {
        self.index
            .get(&self.locate(path))
            .map(|&index| &self.sheets[index])
    }

    pub fn stylesheets(&self) -> impl Iterator<Item = &Stylesheet> {
        self.sheets.iter()
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Stylesheets that may be emitted as standalone bundles.
    pub fn independent(&self) -> impl Iterator<Item = &Stylesheet> {
        self.sheets.iter().filter(|sheet| sheet.is_independent())
    }

    /// Compiles every registered stylesheet.
    ///
    /// Each file compiles against the registry as it stands, so the order
    /// does not matter. A failing file keeps an empty stream and does not
    /// stop the others; all failures are returned together.
    pub fn compile_all(&mut self) -> Result<(), CompileErrors> {
        let registry: &Self = self;
        let results: Vec<_> = registry
            .sheets
            .iter()
            .map(|sheet| compile(sheet, registry, &registry.transforms))
            .collect();

        for sheet in &mut self.sheets {
            sheet.clear_importers();
        }

        let mut failures = Vec::new();
        for (index, result) in results.into_iter().enumerate() {
            let compiled = match result {
                Ok(compiled) => compiled,
                Err(err) => {
                    log::warn!("COMPILE: {}", err);
                    failures.push(err);
                    Default::default()
                }
            };

            for edge in &compiled.imports {
                if let Some(&target) = self.index.get(&edge.to) {
                    self.sheets[target].add_importer(ImportRef {
                        from: edge.from.clone(),
                        span: edge.span,
                    });
                }
            }
            self.sheets[index].set_compiled(compiled);
        }

        log::info!(
            "PACKAGE: compiled {} stylesheet(s), {} failed",
            self.sheets.len(),
            failures.len()
        );

        if failures.is_empty() {
            Ok(())
        } else {
            Err(CompileErrors(failures))
        }
    }

    /// Checks the import graph for cycles and marks independent stylesheets.
    pub fn resolve_graph(&mut self) -> Result<(), CyclicImportError> {
        graph::resolve_graph(&mut self.sheets)
    }

    /// Compiles everything, then resolves the import graph.
    pub fn process(&mut self) -> Result<(), BundleError> {
        self.compile_all()?;
        self.resolve_graph()?;
        Ok(())
    }
}

impl StylesheetLookup for Package {
    fn find_by_extension(&self, extension: &str) -> Vec<&Stylesheet> {
        let extension = extension.trim_start_matches('.');
        self.sheets
            .iter()
            .filter(|sheet| {
                sheet
                    .path()
                    .extension()
                    .is_some_and(|ext| ext == extension)
            })
            .collect()
    }

    fn find_by_path(&self, path: &Path) -> Option<&Stylesheet> {
        self.get(path)
    }
}

fn collect_files(dir: &Path, extension: &str, files: &mut Vec<PathBuf>) -> Result<(), CompileError> {
    let io_error = |source| CompileError::Io {
        path: dir.to_path_buf(),
        source,
    };

    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_dir() {
            collect_files(&path, extension, files)?;
        } else if path.extension().is_some_and(|ext| ext == extension) {
            files.push(path);
        }
    }
    Ok(())
}
