//! HTML renderer: standalone reference page.

use crate::markup::escape;
use crate::model::*;
use crate::render::index::{anchor, render_index};
use crate::render::{sort_entries, RenderOptions, Renderer};

pub struct HtmlRenderer {
    options: RenderOptions,
}

impl HtmlRenderer {
    pub fn new(options: RenderOptions) -> Self {
        HtmlRenderer { options }
    }

    fn render_head(&self, out: &mut String) {
        out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        out.push_str("<meta charset=\"utf-8\">\n");
        out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
        out.push_str(&format!("<title>{}</title>\n", escape(&self.options.title)));
        for href in &self.options.stylesheets {
            out.push_str(&format!(
                "<link rel=\"stylesheet\" href=\"{}\">\n",
                escape(href)
            ));
        }
        if self.options.stylesheets.is_empty() {
            out.push_str("<style>\n");
            out.push_str("body { font-family: system-ui, sans-serif; max-width: 56em; margin: 2em auto; padding: 0 1em; }\n");
            out.push_str("pre { background: #f4f4f4; padding: 1em; border-radius: 5px; overflow-x: auto; }\n");
            out.push_str(".typestr { font-family: monospace; color: #555; }\n");
            out.push_str(".kind { font-size: 0.75em; color: #888; }\n");
            out.push_str(".source-link { font-size: 0.75em; margin-left: 0.5em; }\n");
            out.push_str("</style>\n");
        }
        for src in &self.options.scripts {
            out.push_str(&format!("<script src=\"{}\"></script>\n", escape(src)));
        }
        if let Some(ref id) = self.options.analytics_id {
            out.push_str(&analytics_snippet(id));
        }
        out.push_str("</head>\n<body>\n");
    }
}

impl Renderer for HtmlRenderer {
    fn render(&self, entries: &[DocEntry]) -> String {
        let sorted = sort_entries(entries);
        let mut out = String::new();

        self.render_head(&mut out);
        out.push_str(&format!("<h1>{}</h1>\n", escape(&self.options.title)));

        out.push_str(&render_index(&sorted));

        for entry in &sorted {
            out.push_str(&render_entry_html(entry, self.options.verbose));
        }

        out.push_str("</body>\n</html>\n");
        out
    }

    fn file_extension(&self) -> &str {
        "html"
    }
}

fn render_entry_html(entry: &DocEntry, verbose: bool) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "<div class=\"doc-entry {}\" id=\"{}\">\n",
        entry.kind,
        escape(&anchor(&entry.name))
    ));

    // Heading with optional source link
    out.push_str(&format!("<h2 class=\"name\">{}", escape(&entry.name)));
    if let Some(ref url) = entry.source_url {
        out.push_str(&format!(
            "<a class=\"source-link\" href=\"{}\">source</a>",
            escape(url)
        ));
    }
    out.push_str("</h2>\n");

    if let Some(ref typestr) = entry.typestr {
        out.push_str(&format!(
            "<div class=\"typestr\">{}</div>\n",
            escape(typestr)
        ));
    }

    if let Some(ref docstr) = entry.docstr {
        out.push_str(&format!(
            "<div class=\"docstr\">{}</div>\n",
            docstr
        ));
    }

    if verbose && entry.kind == DocKind::Method {
        out.push_str(&render_params_html(entry));
    }

    out.push_str("</div>\n");
    out
}

fn render_params_html(entry: &DocEntry) -> String {
    let mut out = String::new();
    if let Some(ref args) = entry.args {
        if !args.is_empty() {
            out.push_str("<h3>Parameters</h3>\n<ul class=\"args\">\n");
            for arg in args {
                out.push_str(&format!(
                    "  <li><code>{}</code> <span class=\"typestr\">{}</span>",
                    escape(&arg.name),
                    escape(&arg.typestr)
                ));
                if let Some(ref doc) = arg.docstr {
                    out.push_str(&format!(" {}", doc));
                }
                out.push_str("</li>\n");
            }
            out.push_str("</ul>\n");
        }
    }
    if let Some(ref ret) = entry.ret_type {
        out.push_str(&format!(
            "<h3>Returns</h3>\n<div class=\"ret\"><span class=\"typestr\">{}</span></div>\n",
            escape(ret)
        ));
    }
    out
}

fn analytics_snippet(id: &str) -> String {
    let id = escape(id);
    format!(
        concat!(
            "<script async src=\"https://www.googletagmanager.com/gtag/js?id={id}\"></script>\n",
            "<script>\n",
            "window.dataLayer = window.dataLayer || [];\n",
            "function gtag() {{ dataLayer.push(arguments); }}\n",
            "gtag('js', new Date());\n",
            "gtag('config', '{id}');\n",
            "</script>\n"
        ),
        id = id
    )
}
