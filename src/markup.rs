//! Docstring markup: promote indented example text into code blocks.
//!
//! A two-state fold over the lines of a docstring. Lines indented by two
//! or more spaces open (or continue) an example block; the first
//! non-indented line closes it. Everything else passes through as
//! paragraph text.

use regex::Regex;
use std::sync::LazyLock;

static RE_INDENTED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^ {2,}\S").unwrap());

const CODE_OPEN: &str = "</p><pre class=\"example\"><code>";
const CODE_CLOSE: &str = "</code></pre>";
const PARAGRAPH_OPEN: &str = "<p>";
const PARAGRAPH_CLOSE: &str = "</p>";
const INDENT: &str = "  ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    Code,
}

/// Convert a raw docstring to HTML.
pub fn to_html(docstr: &str) -> String {
    let (state, mut lines) = docstr
        .split('\n')
        .fold((State::Normal, Vec::new()), |(state, mut out), line| {
            let next = step(state, line, &mut out);
            (next, out)
        });

    let mut html = String::from(PARAGRAPH_OPEN);
    match state {
        State::Normal => {
            html.push_str(&lines.join("\n"));
            html.push_str(PARAGRAPH_CLOSE);
        }
        // The close marker ends the document; no paragraph follows it.
        State::Code => {
            lines.push(CODE_CLOSE.to_string());
            html.push_str(&lines.join("\n"));
        }
    }
    html.replace("<p></p>", "")
}

/// Emit the output for one line and return the next state.
fn step(state: State, line: &str, out: &mut Vec<String>) -> State {
    let indented = is_indented(line);
    match (state, indented) {
        (State::Normal, true) => {
            out.push(format!("{}{}", CODE_OPEN, escape(unindent(line))));
            State::Code
        }
        (State::Normal, false) => {
            out.push(escape(line));
            State::Normal
        }
        (State::Code, true) => {
            out.push(escape(unindent(line)));
            State::Code
        }
        (State::Code, false) => {
            out.push(format!(
                "{}{}{}",
                CODE_CLOSE,
                PARAGRAPH_OPEN,
                escape(line)
            ));
            State::Normal
        }
    }
}

fn is_indented(line: &str) -> bool {
    RE_INDENTED.is_match(line)
}

/// Strip exactly one two-space indentation level.
fn unindent(line: &str) -> &str {
    line.strip_prefix(INDENT).unwrap_or(line)
}

pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
