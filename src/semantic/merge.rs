//! Fragment merge: combine per-file semantic graph dumps into one graph.
//!
//! Analyzers typically emit one fragment per source file. Symbols and
//! declarations are owned by exactly one fragment; types are repeated in
//! every fragment that mentions them and must agree; module export lists
//! are concatenated in file order.

use super::graph::{Fragment, TypeSpec};
use crate::error::{DocError, Result};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Merge fragments in the given order into a single fragment.
pub fn merge(fragments: Vec<(PathBuf, Fragment)>) -> Result<Fragment> {
    let mut merged = Fragment::default();

    for (path, fragment) in fragments {
        tracing::debug!(
            path = %path.display(),
            symbols = fragment.symbols.len(),
            declarations = fragment.declarations.len(),
            "merging fragment"
        );

        for (module, exports) in fragment.modules {
            let existing = merged.modules.entry(module).or_default();
            for export in exports {
                if !existing.contains(&export) {
                    existing.push(export);
                }
            }
        }

        insert_unique(&mut merged.symbols, fragment.symbols, "symbol")?;
        insert_unique(&mut merged.declarations, fragment.declarations, "declaration")?;

        for (key, spec) in fragment.types {
            merge_type(&mut merged.types, key, spec)?;
        }
    }

    Ok(merged)
}

fn insert_unique<V>(
    into: &mut BTreeMap<String, V>,
    from: BTreeMap<String, V>,
    kind: &'static str,
) -> Result<()> {
    for (key, value) in from {
        match into.entry(key) {
            Entry::Occupied(occupied) => {
                return Err(DocError::DuplicateKey {
                    kind,
                    key: occupied.key().clone(),
                });
            }
            Entry::Vacant(vacant) => {
                vacant.insert(value);
            }
        }
    }
    Ok(())
}

/// Identical repeated types collapse; conflicting ones are an error.
fn merge_type(types: &mut BTreeMap<String, TypeSpec>, key: String, spec: TypeSpec) -> Result<()> {
    match types.entry(key) {
        Entry::Occupied(occupied) if *occupied.get() == spec => Ok(()),
        Entry::Occupied(occupied) => Err(DocError::DuplicateKey {
            kind: "type",
            key: occupied.key().clone(),
        }),
        Entry::Vacant(vacant) => {
            vacant.insert(spec);
            Ok(())
        }
    }
}
