//! apidoc: generate an API reference page from a semantic graph.
//!
//! `apidoc -r api -o docs/index.html graph/*.json`
//!
//! The graph files are dumped by an external analyzer. The exports of the
//! root module and every type they reach are documented; the page is only
//! written once the whole run has succeeded.

use anyhow::{Context, Result};
use apidoc::render::{self, RenderOptions};
use apidoc::semantic::graph::GraphModel;
use apidoc::source::{GitSourceResolver, NoSourceLinks, SourceResolver};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "apidoc",
    about = "Generate an API reference from the exports of a module"
)]
struct Cli {
    /// Semantic graph JSON files (glob patterns and directories supported)
    #[arg(required = true)]
    models: Vec<String>,

    /// Root module whose exports are documented
    #[arg(short = 'r', long)]
    root: String,

    /// Output file
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output format: html (default), json
    #[arg(short = 'f', long, default_value = "html")]
    format: String,

    /// Include parameter and return blocks for methods
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Page title
    #[arg(long, default_value = "API Reference")]
    title: String,

    /// Stylesheet href to link from the page (repeatable)
    #[arg(long = "stylesheet")]
    stylesheets: Vec<String>,

    /// Script src to load from the page (repeatable)
    #[arg(long = "script")]
    scripts: Vec<String>,

    /// Analytics tag id; adds the tracking snippet when set
    #[arg(long)]
    analytics_id: Option<String>,

    /// Repository URL used to build source links, e.g. https://github.com/org/repo
    #[arg(long)]
    repo_url: Option<String>,

    /// Git working tree the declaration paths are relative to
    #[arg(long, default_value = ".")]
    repo_root: PathBuf,

    /// Probe every generated source link with an HTTP HEAD request
    #[arg(long, requires = "repo_url")]
    check_links: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = apidoc::logging::init() {
        eprintln!("warning: logging disabled: {}", e);
    }

    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let output = cli
        .output
        .as_deref()
        .context("--output is required")?;

    let options = RenderOptions {
        title: cli.title.clone(),
        verbose: cli.verbose,
        stylesheets: cli.stylesheets.clone(),
        scripts: cli.scripts.clone(),
        analytics_id: cli.analytics_id.clone(),
    };
    let renderer = render::create_renderer(&cli.format, options)?;

    let inputs = expand_globs(&cli.models)?;
    if inputs.is_empty() {
        anyhow::bail!("no semantic graph files found");
    }
    let model = GraphModel::load(&inputs).context("failed to load semantic graph")?;

    let sources: Box<dyn SourceResolver> = match cli.repo_url {
        Some(ref url) => Box::new(
            GitSourceResolver::new(&cli.repo_root, url, cli.check_links)
                .context("failed to prepare source links")?,
        ),
        None => Box::new(NoSourceLinks),
    };

    let entries = apidoc::generate(&model, &cli.root, sources.as_ref())
        .with_context(|| format!("failed to document module {}", cli.root))?;

    let rendered = renderer.render(&entries);
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory: {}", parent.display()))?;
    }
    fs::write(output, rendered)
        .with_context(|| format!("failed to write {}", output.display()))?;

    tracing::info!(
        entries = entries.len(),
        format = renderer.file_extension(),
        output = %output.display(),
        "wrote reference"
    );
    Ok(())
}

/// Expand glob patterns into a list of real file paths.
/// Also handles bare directory paths by scanning for `.json` files.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        // Directory: non-recursive scan
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries.flatten() {
                let p = entry.path();
                if p.is_file() && p.extension().and_then(|e| e.to_str()) == Some("json") {
                    files.push(p);
                }
            }
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            tracing::warn!(pattern = %pattern, "no files matched");
        }
        files.extend(matches);
    }
    // Sort for deterministic merge order
    files.sort();
    files.dedup();
    Ok(files)
}
