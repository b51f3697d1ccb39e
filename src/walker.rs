//! Worklist walker: breadth-first closure over a module's exports.
//!
//! A run starts from the exported symbols of one root module. Every
//! declaration handed to the extractor may reveal more types (parameter
//! and return types); the ones that originate from a symbol are folded
//! back into the queue until nothing new is reachable.
//!
//! Dedup is keyed by the alias-resolved symbol and checked before the
//! enqueue, so a re-exported name and its target share one visit.
//! A symbol with several declarations (overloads, merged declarations) is
//! documented from its first declaration only.

use crate::error::{DocError, Result};
use crate::extract::Extractor;
use crate::model::DocEntry;
use crate::semantic::{DeclId, SemanticModel, SymbolId, TypeId};
use crate::source::SourceResolver;
use std::collections::{HashSet, VecDeque};

/// Traversal state of one documentation run.
pub struct Walker<'a, M: SemanticModel + ?Sized> {
    model: &'a M,
    extractor: Extractor<'a, M>,
    queue: VecDeque<DeclId>,
    visited: HashSet<SymbolId>,
    entries: Vec<DocEntry>,
}

impl<'a, M: SemanticModel + ?Sized> Walker<'a, M> {
    pub fn new(model: &'a M, sources: &'a dyn SourceResolver) -> Self {
        Walker {
            model,
            extractor: Extractor::new(model, sources),
            queue: VecDeque::new(),
            visited: HashSet::new(),
            entries: Vec::new(),
        }
    }

    /// Seed the queue with the exports of `root_module` and drain it.
    pub fn run(&mut self, root_module: &str) -> Result<()> {
        let exports = self
            .model
            .exports_of_module(root_module)
            .ok_or_else(|| DocError::ModuleNotFound(root_module.to_string()))?;
        tracing::debug!(module = root_module, exports = exports.len(), "seeding worklist");

        for symbol in exports {
            self.request_visit(symbol)?;
        }

        while let Some(decl) = self.queue.pop_front() {
            let visit = self.extractor.visit(decl)?;
            self.entries.extend(visit.entries);
            for ty in visit.discovered {
                self.request_visit_type(ty)?;
            }
        }

        tracing::info!(
            module = root_module,
            visited = self.visited.len(),
            entries = self.entries.len(),
            "documentation closure complete"
        );
        Ok(())
    }

    /// Enqueue the first declaration of `symbol` unless it was seen before.
    pub fn request_visit(&mut self, symbol: SymbolId) -> Result<()> {
        let symbol = if self.model.is_alias(symbol) {
            self.model.resolve_alias(symbol)
        } else {
            symbol
        };
        if !self.visited.insert(symbol) {
            return Ok(());
        }
        let decl = self
            .model
            .declarations(symbol)
            .first()
            .copied()
            .ok_or_else(|| DocError::NoDeclarations(self.model.symbol_name(symbol).to_string()))?;
        tracing::debug!(symbol = self.model.symbol_name(symbol), "enqueue");
        self.queue.push_back(decl);
        Ok(())
    }

    /// Visit whatever a type refers to; primitives refer to nothing.
    pub fn request_visit_type(&mut self, ty: TypeId) -> Result<()> {
        if let Some(symbol) = self.model.originating_symbol(ty) {
            self.request_visit(symbol)?;
        }
        if let Some(symbol) = self.model.alias_symbol(ty) {
            self.request_visit(symbol)?;
        }
        Ok(())
    }

    /// Whether the alias-resolved `symbol` has been visited.
    pub fn visited(&self, symbol: SymbolId) -> bool {
        self.visited.contains(&self.model.resolve_alias(symbol))
    }

    /// Entries in discovery order.
    pub fn entries(&self) -> &[DocEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<DocEntry> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::graph::GraphModel;
    use crate::source::NoSourceLinks;

    fn run(json: &str, root: &str) -> Result<Vec<DocEntry>> {
        let model = GraphModel::from_json_str(json).unwrap();
        let mut walker = Walker::new(&model, &NoSourceLinks);
        walker.run(root)?;
        Ok(walker.into_entries())
    }

    fn names(entries: &[DocEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn breadth_first_order() {
        // a(): B, c(): D. B and D are discovered after both exports.
        let entries = run(
            r#"{
                "modules": { "m": ["a", "c"] },
                "symbols": {
                    "a": { "declarations": ["a"] },
                    "c": { "declarations": ["c"] },
                    "B": { "declarations": ["B"] },
                    "D": { "declarations": ["D"] }
                },
                "declarations": {
                    "a": { "kind": "function", "signature": { "returns": "B" } },
                    "c": { "kind": "function", "signature": { "returns": "D" } },
                    "B": { "kind": "class" },
                    "D": { "kind": "class" }
                },
                "types": {
                    "B": { "display": "B", "symbol": "B" },
                    "D": { "display": "D", "symbol": "D" }
                }
            }"#,
            "m",
        )
        .unwrap();
        assert_eq!(names(&entries), vec!["a", "c", "B", "D"]);
    }

    #[test]
    fn recursive_types_terminate() {
        let entries = run(
            r#"{
                "modules": { "m": ["Node"] },
                "symbols": { "Node": { "declarations": ["Node"] } },
                "declarations": {
                    "Node": { "kind": "class", "members": ["Node.next"] },
                    "Node.next": { "kind": "method", "name": "next",
                        "signature": { "params": [{ "name": "n", "type": "Node" }], "returns": "Node" } }
                },
                "types": { "Node": { "display": "Node", "symbol": "Node" } }
            }"#,
            "m",
        )
        .unwrap();
        assert_eq!(names(&entries), vec!["Node", "Node.next"]);
    }

    #[test]
    fn missing_module_is_fatal() {
        let err = run(r#"{ "modules": { "m": [] } }"#, "other").unwrap_err();
        assert!(matches!(err, DocError::ModuleNotFound(ref m) if m == "other"));
    }

    #[test]
    fn symbol_without_declarations_is_fatal() {
        let err = run(
            r#"{ "modules": { "m": ["ghost"] }, "symbols": { "ghost": {} } }"#,
            "m",
        )
        .unwrap_err();
        assert!(matches!(err, DocError::NoDeclarations(ref s) if s == "ghost"));
    }

    #[test]
    fn first_declaration_only() {
        let entries = run(
            r#"{
                "modules": { "m": ["f"] },
                "symbols": { "f": { "declarations": ["f1", "f2"] } },
                "declarations": {
                    "f1": { "kind": "function", "signature": { "params": [{ "name": "x", "type": "number" }] } },
                    "f2": { "kind": "function", "signature": { "params": [{ "name": "s", "type": "string" }] } }
                }
            }"#,
            "m",
        )
        .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].typestr.as_deref(), Some("(x: number) => void"));
    }

    #[test]
    fn type_alias_symbol_is_visited() {
        let json = r#"{
            "modules": { "m": ["zeros"] },
            "symbols": {
                "zeros": { "declarations": ["zeros"] },
                "Shape": { "declarations": ["Shape"] }
            },
            "declarations": {
                "zeros": { "kind": "function",
                    "signature": { "params": [{ "name": "shape", "type": "Shape" }] } },
                "Shape": { "kind": "typeAlias" }
            },
            "types": { "Shape": { "display": "Shape", "alias": "Shape" } }
        }"#;
        let model = GraphModel::from_json_str(json).unwrap();
        let mut walker = Walker::new(&model, &NoSourceLinks);
        walker.run("m").unwrap();
        // Shape is visited but produces no entry.
        assert!(walker.visited(SymbolId(0)));
        assert_eq!(names(walker.entries()), vec!["zeros"]);
    }
}
