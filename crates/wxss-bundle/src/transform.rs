//! Selector and declaration rewriting.
//!
//! The compiler owns the tree walk; what a selector or a value turns into is
//! decided by the transforms plugged into it. The defaults cover what every
//! package needs: selectors pass through (or get their type selectors
//! prefixed) and `rpx` literals become deferred pixel values.

use wxss::parser::selectors::prefix_type_selectors;
use wxss::parser::units::find_rpx_literals;
use wxss::parser::{Declaration, Rule};

use crate::chunk::{Chunk, ChunkAccumulator};
use crate::compile::CompileContext;

/// Opaque failure raised by a transform. The compiler passes it on untouched.
pub type TransformError = Box<dyn std::error::Error + Send + Sync>;

/// What a declaration transform wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeclarationOutcome {
    /// At least one deferred unit chunk was emitted.
    pub deferred_unit_emitted: bool,
}

/// Writes the rewritten selector of a rule.
pub trait SelectorTransform: Send + Sync {
    fn process(
        &self,
        rule: &Rule,
        output: &mut ChunkAccumulator,
        context: &CompileContext,
    ) -> Result<(), TransformError>;
}

/// Writes the rewritten value of a declaration.
pub trait DeclarationTransform: Send + Sync {
    fn process(
        &self,
        declaration: &Declaration,
        output: &mut ChunkAccumulator,
        context: &CompileContext,
    ) -> Result<DeclarationOutcome, TransformError>;
}

/// Writes selectors exactly as written.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughSelector;

impl SelectorTransform for PassthroughSelector {
    fn process(
        &self,
        rule: &Rule,
        output: &mut ChunkAccumulator,
        _context: &CompileContext,
    ) -> Result<(), TransformError> {
        output.append(rule.selector.trim());
        Ok(())
    }
}

/// Prefixes type selectors so they match component elements.
///
/// Keyframe selectors (`from`, `to`, `50%`) are left alone.
#[derive(Debug, Clone)]
pub struct TagPrefixSelector {
    prefix: String,
}

impl TagPrefixSelector {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for TagPrefixSelector {
    fn default() -> Self {
        Self::new("wx-")
    }
}

impl SelectorTransform for TagPrefixSelector {
    fn process(
        &self,
        rule: &Rule,
        output: &mut ChunkAccumulator,
        context: &CompileContext,
    ) -> Result<(), TransformError> {
        let selector = rule.selector.trim();
        if context.is_keyframes() {
            output.append(selector);
        } else {
            output.append(&prefix_type_selectors(selector, &self.prefix));
        }
        Ok(())
    }
}

/// Copies values, deferring every `rpx` literal to render time.
#[derive(Debug, Clone, Copy, Default)]
pub struct RpxDeclaration;

impl DeclarationTransform for RpxDeclaration {
    fn process(
        &self,
        declaration: &Declaration,
        output: &mut ChunkAccumulator,
        _context: &CompileContext,
    ) -> Result<DeclarationOutcome, TransformError> {
        let value = declaration.value.as_str();
        let mut outcome = DeclarationOutcome::default();
        let mut copied = 0;

        for literal in find_rpx_literals(value) {
            output.append(&value[copied..literal.start]);
            output.flush(Some(Chunk::pixel(literal.value)));
            copied = literal.end;
            outcome.deferred_unit_emitted = true;
        }
        output.append(&value[copied..]);

        Ok(outcome)
    }
}

/// The pair of transforms a compile pass runs with.
pub struct Transforms {
    pub selector: Box<dyn SelectorTransform>,
    pub declaration: Box<dyn DeclarationTransform>,
}

impl Transforms {
    pub fn new(
        selector: impl SelectorTransform + 'static,
        declaration: impl DeclarationTransform + 'static,
    ) -> Self {
        Self {
            selector: Box::new(selector),
            declaration: Box::new(declaration),
        }
    }
}

impl Default for Transforms {
    fn default() -> Self {
        Self::new(PassthroughSelector, RpxDeclaration)
    }
}
