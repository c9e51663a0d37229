//! Report rendering for kmerplot
//!
//! Turns ordered sample lines into a colored HTML page with a legend.

pub mod html;

pub use html::{escape_html, glyph_string, legend_label, render_lines, HtmlExporter, ReportConfig};
