//! apidoc: API reference generation from a semantic model.
//!
//! Starting from the exports of one root module, [`walker::Walker`] pulls
//! in every type reachable through signatures, [`extract::Extractor`]
//! turns each declaration into [`model::DocEntry`] records and
//! [`render`] lays them out as a single HTML page (or a JSON dump).

pub mod error;
pub mod extract;
pub mod logging;
pub mod markup;
pub mod model;
pub mod render;
pub mod semantic;
pub mod source;
pub mod walker;

pub use error::{DocError, Result};
pub use model::{ArgEntry, DocEntry, DocKind};

use semantic::SemanticModel;
use source::SourceResolver;

/// Run the closure walk for `root_module` and return its entries in
/// discovery order.
pub fn generate<M: SemanticModel + ?Sized>(
    model: &M,
    root_module: &str,
    sources: &dyn SourceResolver,
) -> Result<Vec<DocEntry>> {
    let mut walker = walker::Walker::new(model, sources);
    walker.run(root_module)?;
    Ok(walker.into_entries())
}
