//! Index list and anchor generation for the HTML page.

use crate::markup::escape;
use crate::model::DocEntry;

/// HTML id for an entry.
///
/// ASCII alphanumerics, `.` and `-` are kept so `Tensor.add` stays
/// readable. Every other byte, `_` included, becomes `_XX` (uppercase
/// hex), so distinct names never share an anchor.
pub fn anchor(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for byte in name.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'-') {
            out.push(byte as char);
        } else {
            out.push_str(&format!("_{:02X}", byte));
        }
    }
    out
}

/// One `<li>` of the index: a link to the entry, tagged with its kind.
pub fn render_index_item(entry: &DocEntry) -> String {
    format!(
        "  <li><a href=\"#{}\" class=\"kind-{}\">{}</a> <span class=\"kind\">{}</span></li>\n",
        escape(&anchor(&entry.name)),
        entry.kind,
        escape(&entry.name),
        entry.kind
    )
}

/// The whole index list for already-sorted entries.
pub fn render_index(entries: &[&DocEntry]) -> String {
    let mut out = String::from("<ul class=\"index\">\n");
    for entry in entries {
        out.push_str(&render_index_item(entry));
    }
    out.push_str("</ul>\n");
    out
}
