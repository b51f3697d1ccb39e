//! JSON renderer: the intermediate entry list for tooling and inspection.
//!
//! Entries stay in discovery order; only the HTML page applies the
//! presentation sort.

use crate::model::DocEntry;
use crate::render::Renderer;

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, entries: &[DocEntry]) -> String {
        // DocEntry holds only strings, options and vectors; serializing it
        // cannot fail.
        let mut out = serde_json::to_string_pretty(entries).unwrap_or_default();
        out.push('\n');
        out
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}
