//! Import graph validation and independence classification.
//!
//! The graph is walked depth-first from every stylesheet nothing imports,
//! then from whatever the first sweep did not reach, so that cycles with no
//! way in are still found.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::CyclicImportError;
use crate::stylesheet::Stylesheet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Pending,
    Active,
    Done,
}

struct ImportGraph<'a> {
    sheets: &'a [Stylesheet],
    index: HashMap<&'a Path, usize>,
    state: Vec<Visit>,
    stack: Vec<usize>,
}

impl<'a> ImportGraph<'a> {
    fn new(sheets: &'a [Stylesheet]) -> Self {
        Self {
            index: sheets
                .iter()
                .enumerate()
                .map(|(i, sheet)| (sheet.path(), i))
                .collect(),
            state: vec![Visit::Pending; sheets.len()],
            stack: Vec::new(),
            sheets,
        }
    }

    fn check(mut self) -> Result<(), CyclicImportError> {
        let roots: Vec<usize> = (0..self.sheets.len())
            .filter(|&i| self.sheets[i].importers().is_empty())
            .collect();
        for root in roots {
            self.visit(root)?;
        }

        for i in 0..self.sheets.len() {
            if self.state[i] == Visit::Pending {
                self.visit(i)?;
            }
        }
        Ok(())
    }

    fn visit(&mut self, node: usize) -> Result<(), CyclicImportError> {
        match self.state[node] {
            Visit::Done => return Ok(()),
            Visit::Active => return Err(self.cycle_at(node)),
            Visit::Pending => {}
        }

        self.state[node] = Visit::Active;
        self.stack.push(node);

        let sheets = self.sheets;
        for edge in sheets[node].imports() {
            // Edges only ever point at registered stylesheets.
            if let Some(&target) = self.index.get(edge.to.as_path()) {
                self.visit(target)?;
            }
        }

        self.stack.pop();
        self.state[node] = Visit::Done;
        Ok(())
    }

    fn cycle_at(&self, node: usize) -> CyclicImportError {
        let start = self
            .stack
            .iter()
            .position(|&i| i == node)
            .unwrap_or_default();
        CyclicImportError {
            path: self.sheets[node].path().to_path_buf(),
            chain: self.stack[start..]
                .iter()
                .map(|&i| self.sheets[i].path().to_path_buf())
                .collect::<Vec<PathBuf>>(),
        }
    }
}

/// Validates the import graph of `sheets`, then marks which of them are
/// independent.
///
/// A stylesheet is independent when nothing imports it, unless it is the
/// entry stylesheet and has source of its own. On a cycle every flag is
/// cleared and the error names the stylesheet that was reached twice.
pub fn resolve_graph(sheets: &mut [Stylesheet]) -> Result<(), CyclicImportError> {
    if let Err(err) = ImportGraph::new(sheets).check() {
        log::warn!("GRAPH: {}", err);
        for sheet in sheets.iter_mut() {
            sheet.set_independent(false);
        }
        return Err(err);
    }

    for sheet in sheets.iter_mut() {
        let independent =
            sheet.importers().is_empty() && (!sheet.is_entry() || !sheet.has_source());
        sheet.set_independent(independent);
    }

    log::debug!(
        "GRAPH: {} of {} stylesheet(s) independent",
        sheets.iter().filter(|s| s.is_independent()).count(),
        sheets.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::{BundleOptions, Package};

    fn package(files: &[(&str, &str)]) -> Package {
        let mut package = Package::new("/pkg", BundleOptions::default());
        for (path, source) in files {
            package.insert(path, Some(source.to_string()));
        }
        package.compile_all().unwrap();
        package
    }

    #[test]
    fn test_chain_starts_at_reentered_sheet() {
        let mut package = package(&[
            ("root.wxss", "@import \"a.wxss\";"),
            ("a.wxss", "@import \"b.wxss\";"),
            ("b.wxss", "@import \"a.wxss\";"),
        ]);

        let err = package.resolve_graph().unwrap_err();
        assert_eq!(err.path, Path::new("/pkg/a.wxss"));
        assert_eq!(
            err.chain,
            vec![PathBuf::from("/pkg/a.wxss"), PathBuf::from("/pkg/b.wxss")]
        );
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        let mut package = package(&[
            ("top.wxss", "@import \"left.wxss\"; @import \"right.wxss\";"),
            ("left.wxss", "@import \"base.wxss\";"),
            ("right.wxss", "@import \"base.wxss\";"),
            ("base.wxss", ".base{}"),
        ]);

        package.resolve_graph().unwrap();
        let independent: Vec<_> = package.independent().map(|s| s.path()).collect();
        assert_eq!(independent, vec![Path::new("/pkg/top.wxss")]);
    }
}
