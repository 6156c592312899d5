//! The stylesheet entity and `@import` resolution.

use std::path::{Path, PathBuf};

use wxss::parser::{AtRule, Span};

use crate::chunk::ChunkStream;
use crate::compile::CompiledStylesheet;
use crate::error::CompileError;
use crate::package::StylesheetLookup;
use crate::path::normalize;

/// An outgoing `@import`, one per occurrence in source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEdge {
    pub from: PathBuf,
    pub to: PathBuf,
    /// Where the `@import` sits in the importing file.
    pub span: Span,
}

/// An incoming reference: some stylesheet imports this one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRef {
    pub from: PathBuf,
    pub span: Span,
}

/// A successfully resolved `@import`.
#[derive(Debug)]
pub struct ResolvedImport<'a> {
    pub target: &'a Stylesheet,
    pub edge: ImportEdge,
}

/// One stylesheet of a package, identified by its normalized path.
#[derive(Debug, Clone)]
pub struct Stylesheet {
    path: PathBuf,
    source: Option<String>,
    chunks: ChunkStream,
    imports: Vec<ImportEdge>,
    importers: Vec<ImportRef>,
    independent: bool,
    entry: bool,
}

impl Stylesheet {
    /// A stylesheet at `path`. `source` is `None` for a virtual, empty file.
    pub fn new(path: impl AsRef<Path>, source: Option<String>) -> Self {
        Self {
            path: normalize(path.as_ref()),
            source,
            chunks: ChunkStream::new(),
            imports: Vec::new(),
            importers: Vec::new(),
            independent: false,
            entry: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The directory `@import` paths are resolved against.
    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new(""))
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Whether the stylesheet has any source text of its own.
    pub fn has_source(&self) -> bool {
        self.source.as_deref().is_some_and(|s| !s.is_empty())
    }

    pub fn chunks(&self) -> &ChunkStream {
        &self.chunks
    }

    pub fn imports(&self) -> &[ImportEdge] {
        &self.imports
    }

    pub fn importers(&self) -> &[ImportRef] {
        &self.importers
    }

    /// Set by graph resolution; `false` until then.
    pub fn is_independent(&self) -> bool {
        self.independent
    }

    pub fn is_entry(&self) -> bool {
        self.entry
    }

    pub fn set_entry(&mut self, entry: bool) {
        self.entry = entry;
    }

    /// Resolves an `@import` at-rule of this stylesheet against `lookup`.
    ///
    /// The parameter must be a single quoted path; it is resolved relative
    /// to this stylesheet's directory. The returned edge still has to be
    /// recorded on both ends, which [`Package`](crate::package::Package)
    /// does once the whole file has compiled.
    pub fn resolve_import<'a>(
        &self,
        at_rule: &AtRule,
        lookup: &'a dyn StylesheetLookup,
    ) -> Result<ResolvedImport<'a>, CompileError> {
        let Some(relative) = quoted_path(&at_rule.params) else {
            return Err(CompileError::ImportSyntax {
                path: self.path.clone(),
                params: at_rule.params.trim().to_string(),
                position: at_rule.span.start,
            });
        };

        let resolved = normalize(&self.directory().join(relative));
        let Some(target) = lookup.find_by_path(&resolved) else {
            return Err(CompileError::TargetNotFound {
                path: self.path.clone(),
                target: resolved,
                position: at_rule.span.start,
            });
        };

        log::debug!(
            "IMPORT: {} -> {} at {}",
            self.path.display(),
            target.path().display(),
            at_rule.span.start
        );

        Ok(ResolvedImport {
            edge: ImportEdge {
                from: self.path.clone(),
                to: target.path().to_path_buf(),
                span: at_rule.span,
            },
            target,
        })
    }

    /// Replaces the compiled output wholesale.
    pub(crate) fn set_compiled(&mut self, compiled: CompiledStylesheet) {
        self.chunks = compiled.chunks;
        self.imports = compiled.imports;
    }

    pub(crate) fn add_importer(&mut self, importer: ImportRef) {
        self.importers.push(importer);
    }

    pub(crate) fn clear_importers(&mut self) {
        self.importers.clear();
    }

    pub(crate) fn set_independent(&mut self, independent: bool) {
        self.independent = independent;
    }
}

/// `"path"` or `'path'`, nothing else.
fn quoted_path(params: &str) -> Option<&str> {
    let params = params.trim();
    ['"', '\''].into_iter().find_map(|quote| {
        params
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
            .filter(|inner| !inner.is_empty())
    })
}
