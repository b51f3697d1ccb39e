//! Renderer module: trait-based format dispatch.

pub mod html;
pub mod index;
pub mod json;

use crate::model::DocEntry;
use anyhow::{anyhow, Result};

/// Page-level settings for the HTML renderer.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub title: String,
    /// Include the parameters/returns block of each method.
    pub verbose: bool,
    pub stylesheets: Vec<String>,
    pub scripts: Vec<String>,
    pub analytics_id: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            title: "API Reference".to_string(),
            verbose: false,
            stylesheets: Vec::new(),
            scripts: Vec::new(),
            analytics_id: None,
        }
    }
}

/// Trait for rendering a list of entries into a specific output format.
pub trait Renderer {
    fn render(&self, entries: &[DocEntry]) -> String;
    fn file_extension(&self) -> &str;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str, options: RenderOptions) -> Result<Box<dyn Renderer>> {
    match format {
        "html" => Ok(Box::new(html::HtmlRenderer::new(options))),
        "json" => Ok(Box::new(json::JsonRenderer)),
        _ => Err(anyhow!("unknown format: {}. Use html or json", format)),
    }
}

/// Order entries for presentation: names not starting with an uppercase
/// character (functions, instances) first, then uppercase-leading names
/// (classes and their members); lexicographic within each group.
pub fn sort_entries(entries: &[DocEntry]) -> Vec<&DocEntry> {
    let mut sorted: Vec<&DocEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| {
        starts_uppercase(&a.name)
            .cmp(&starts_uppercase(&b.name))
            .then_with(|| a.name.cmp(&b.name))
    });
    sorted
}

fn starts_uppercase(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}
