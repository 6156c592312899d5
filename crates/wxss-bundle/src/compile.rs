//! The stylesheet compiler.
//!
//! Walks the parsed tree of one stylesheet and writes it into a
//! [`ChunkStream`]. Selectors and values go through the configured
//! [`Transforms`]; `@import` becomes a [`Chunk::Nested`] reference so the
//! imported file is inlined at render time, not at compile time.

use wxss::parser::{AtRule, Declaration, Node, Rule, parse_stylesheet};

use crate::chunk::{Chunk, ChunkAccumulator, ChunkStream};
use crate::error::CompileError;
use crate::package::StylesheetLookup;
use crate::stylesheet::{ImportEdge, Stylesheet};
use crate::transform::{TransformError, Transforms};

/// Context name used for every keyframes block, whatever its vendor prefix.
pub const KEYFRAMES: &str = "keyframes";

/// Separator written when a declaration carries none of its own.
pub const DEFAULT_SEPARATOR: &str = ": ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    Root,
    AtRule,
}

/// Where in the tree a node sits, as seen by the transforms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileContext {
    pub kind: ContextKind,
    /// `root` at the top level, otherwise the enclosing at-rule's name.
    pub name: String,
}

impl CompileContext {
    pub fn root() -> Self {
        Self {
            kind: ContextKind::Root,
            name: "root".to_string(),
        }
    }

    pub fn at_rule(name: impl Into<String>) -> Self {
        Self {
            kind: ContextKind::AtRule,
            name: name.into(),
        }
    }

    pub fn keyframes() -> Self {
        Self::at_rule(KEYFRAMES)
    }

    pub fn is_keyframes(&self) -> bool {
        self.kind == ContextKind::AtRule && self.name == KEYFRAMES
    }
}

/// The result of compiling one stylesheet.
#[derive(Debug, Clone, Default)]
pub struct CompiledStylesheet {
    pub chunks: ChunkStream,
    /// Every resolved `@import`, in source order.
    pub imports: Vec<ImportEdge>,
}

/// Compiles `sheet` into a chunk stream.
///
/// Import targets are looked up through `lookup`; they must be registered
/// but need not be compiled yet. A virtual stylesheet compiles to an empty
/// stream.
pub fn compile(
    sheet: &Stylesheet,
    lookup: &dyn StylesheetLookup,
    transforms: &Transforms,
) -> Result<CompiledStylesheet, CompileError> {
    let root = parse_stylesheet(sheet.source().unwrap_or_default()).map_err(|source| {
        CompileError::Parse {
            path: sheet.path().to_path_buf(),
            source,
        }
    })?;

    let mut compiler = Compiler {
        sheet,
        lookup,
        transforms,
        imports: Vec::new(),
    };
    let mut output = ChunkAccumulator::new();
    compiler.process(&Node::Root(root), &mut output, &CompileContext::root())?;

    let compiled = CompiledStylesheet {
        chunks: output.into_stream(),
        imports: compiler.imports,
    };
    log::debug!(
        "COMPILE: {} -> {} chunks, {} imports",
        sheet.path().display(),
        compiled.chunks.len(),
        compiled.imports.len()
    );
    Ok(compiled)
}

struct Compiler<'a> {
    sheet: &'a Stylesheet,
    lookup: &'a dyn StylesheetLookup,
    transforms: &'a Transforms,
    imports: Vec<ImportEdge>,
}

impl Compiler<'_> {
    fn process(
        &mut self,
        node: &Node,
        output: &mut ChunkAccumulator,
        context: &CompileContext,
    ) -> Result<(), CompileError> {
        match node {
            Node::Root(root) => {
                for child in &root.nodes {
                    self.process(child, output, context)?;
                }
                output.finish();
            }
            Node::Rule(rule) => self.process_rule(rule, output, context)?,
            Node::Declaration(declaration) => {
                self.process_declaration(declaration, output, context)?
            }
            Node::AtRule(at_rule) if at_rule.name == "import" => {
                let resolved = self.sheet.resolve_import(at_rule, self.lookup)?;
                output.flush(Some(Chunk::Nested(resolved.target.path().to_path_buf())));
                self.imports.push(resolved.edge);
            }
            Node::AtRule(at_rule) => self.process_at_rule(at_rule, output)?,
            Node::Comment(_) => {}
        }
        Ok(())
    }

    fn process_rule(
        &mut self,
        rule: &Rule,
        output: &mut ChunkAccumulator,
        context: &CompileContext,
    ) -> Result<(), CompileError> {
        self.transforms
            .selector
            .process(rule, output, context)
            .map_err(|source| self.transform_error(source))?;
        output.append("{");
        for child in &rule.nodes {
            self.process(child, output, context)?;
        }
        output.append("}");
        Ok(())
    }

    fn process_declaration(
        &mut self,
        declaration: &Declaration,
        output: &mut ChunkAccumulator,
        context: &CompileContext,
    ) -> Result<(), CompileError> {
        output.append(&declaration.prop);
        if declaration.between.is_empty() {
            output.append(DEFAULT_SEPARATOR);
        } else {
            output.append(&declaration.between);
        }

        let outcome = self
            .transforms
            .declaration
            .process(declaration, output, context)
            .map_err(|source| self.transform_error(source))?;
        if outcome.deferred_unit_emitted {
            log::trace!(
                "COMPILE: {} deferred `{}` in {}",
                declaration.prop,
                declaration.value,
                self.sheet.path().display()
            );
        }

        if let Some(marker) = &declaration.important {
            output.append(" ");
            output.append(marker);
        }
        if declaration.semicolon {
            output.append(";");
        }
        Ok(())
    }

    fn process_at_rule(
        &mut self,
        at_rule: &AtRule,
        output: &mut ChunkAccumulator,
    ) -> Result<(), CompileError> {
        output.append("@");
        output.append(&at_rule.name);
        if !at_rule.params.is_empty() {
            output.append(" ");
            output.append(&at_rule.params);
        }

        let Some(nodes) = &at_rule.nodes else {
            output.append(";");
            return Ok(());
        };

        let inner = if at_rule.is_keyframes() {
            CompileContext::keyframes()
        } else {
            CompileContext::at_rule(at_rule.name.as_str())
        };
        log::trace!("COMPILE: entering @{} as `{}`", at_rule.name, inner.name);

        output.append("{");
        for child in nodes {
            self.process(child, output, &inner)?;
        }
        output.append("}");
        Ok(())
    }

    fn transform_error(&self, source: TransformError) -> CompileError {
        CompileError::Transform {
            path: self.sheet.path().to_path_buf(),
            source,
        }
    }
}

