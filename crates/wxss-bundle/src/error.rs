//! Error types for compiling, resolving and rendering stylesheets.
//!
//! Every error names the stylesheet it belongs to; import errors also carry
//! the line and column of the offending `@import`.

use std::path::{Path, PathBuf};

use thiserror::Error;
use wxss::ParseError;
use wxss::parser::Position;

use crate::transform::TransformError;

/// A failure that aborts the compilation of one stylesheet.
#[derive(Error, Debug)]
pub enum CompileError {
    /// The stylesheet source is malformed.
    #[error("{}: {source}", .path.display())]
    Parse { path: PathBuf, source: ParseError },

    /// `@import` with anything but a single quoted path.
    #[error(
        "{}:{}: @import expects a single quoted path, found `{params}`",
        .path.display(),
        .position
    )]
    ImportSyntax {
        path: PathBuf,
        params: String,
        position: Position,
    },

    /// `@import` of a stylesheet the package does not contain.
    #[error(
        "{}:{}: imported stylesheet {} not found",
        .path.display(),
        .position,
        .target.display()
    )]
    TargetNotFound {
        path: PathBuf,
        /// The resolved path that was looked up.
        target: PathBuf,
        position: Position,
    },

    /// A selector or declaration transform failed.
    #[error("{}: transform failed: {source}", .path.display())]
    Transform {
        path: PathBuf,
        source: TransformError,
    },

    /// Reading a stylesheet from disk failed.
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl CompileError {
    /// The stylesheet whose compilation failed.
    pub fn path(&self) -> &Path {
        match self {
            CompileError::Parse { path, .. }
            | CompileError::ImportSyntax { path, .. }
            | CompileError::TargetNotFound { path, .. }
            | CompileError::Transform { path, .. }
            | CompileError::Io { path, .. } => path,
        }
    }

    /// Where in the stylesheet the failure happened, when known.
    pub fn position(&self) -> Option<Position> {
        match self {
            CompileError::Parse { source, .. } => Some(source.position),
            CompileError::ImportSyntax { position, .. }
            | CompileError::TargetNotFound { position, .. } => Some(*position),
            CompileError::Transform { .. } | CompileError::Io { .. } => None,
        }
    }
}

/// Every stylesheet that failed during a package-wide compile.
#[derive(Error, Debug)]
#[error("{} stylesheet(s) failed to compile: {}", .0.len(), format_list(.0))]
pub struct CompileErrors(pub Vec<CompileError>);

impl CompileErrors {
    pub fn iter(&self) -> std::slice::Iter<'_, CompileError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn format_list(errors: &[CompileError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// The import graph contains a cycle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cyclic @import of {}: {}", .path.display(), format_chain(.chain, .path))]
pub struct CyclicImportError {
    /// The stylesheet that was reached twice.
    pub path: PathBuf,
    /// The import path that led back to it, starting from where the walk began.
    pub chain: Vec<PathBuf>,
}

fn format_chain(chain: &[PathBuf], path: &Path) -> String {
    chain
        .iter()
        .map(|p| p.as_path())
        .chain(std::iter::once(path))
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// A failure while producing final stylesheet text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("stylesheet {} is not part of the package", .0.display())]
    UnknownStylesheet(PathBuf),

    #[error("stylesheet {} imports itself while rendering", .0.display())]
    CyclicImport(PathBuf),
}

/// Any failure surfaced by this crate.
#[derive(Error, Debug)]
pub enum BundleError {
    #[error(transparent)]
    Compile(#[from] CompileErrors),

    #[error(transparent)]
    Cycle(#[from] CyclicImportError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

pub type Result<T> = std::result::Result<T, BundleError>;
