//! Server-side rendering of the heatmap page.

mod heatmap;
mod land;
mod page;

pub use heatmap::{marker_radius, project, render_heatmap_svg};
pub use page::{render_index, render_no_data};

/// Escapes text for use in HTML/SVG content and attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
