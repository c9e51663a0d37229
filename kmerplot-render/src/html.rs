/*!
# HTML Report Export

Writes the composed sample lines as a self-contained HTML page: one table row
per sample with a colored glyph per window, followed by a legend in color
table order.
*/

use anyhow::{Context, Result};
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use kmerplot_core::{Category, PlotOptions, SampleLine};

const FONT_FAMILY: &str = r#""DejaVu Sans Mono", monospace"#;
const CELL_PADDING_PX: u32 = 8;
const LEGEND_HEADING: &str = "K-mer Maps Best To:";

/// Report configuration
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub show_legend: bool,
    /// Generation timestamp under the legend (not byte-reproducible)
    pub show_footer: bool,
    pub provenance_comment: Option<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            show_legend: true,
            show_footer: false,
            provenance_comment: None,
        }
    }
}

/// HTML report exporter
pub struct HtmlExporter {
    config: ReportConfig,
}

impl HtmlExporter {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Render the full document
    pub fn render(&self, lines: &[SampleLine], options: &PlotOptions) -> String {
        let mut html = HtmlBuilder::default();

        if let Some(comment) = &self.config.provenance_comment {
            html.add_comment(comment);
        }

        html.add_head(&format!("{} Mappings", options.main_genes.join("/")));

        html.add_sample_table(lines, &options.kmer_shape);

        if self.config.show_legend {
            html.add_legend(options);
        }

        if self.config.show_footer {
            html.add_footer();
        }

        html.finish()
    }

    /// Render and write to a file
    pub fn export_html<P: AsRef<Path>>(&self, path: P, lines: &[SampleLine], options: &PlotOptions) -> Result<()> {
        let path = path.as_ref();
        let document = self.render(lines, options);

        let file = File::create(path)
            .with_context(|| format!("Failed to create report file: {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        writer.write_all(document.as_bytes())?;
        writer.flush()?;

        log::info!("Wrote report for {} samples to {}", lines.len(), path.display());
        Ok(())
    }
}

/// Glyph markup for one sample: a colored span per window
pub fn glyph_string(line: &SampleLine, glyph: &str) -> String {
    let glyph = escape_html(glyph);
    let mut out = String::with_capacity(line.cells.len() * (glyph.len() + 32));
    for color in line.colors() {
        out.push_str(&format!(
            r#"<span style="color: {};">{}</span>"#,
            escape_html(color),
            glyph
        ));
    }
    out
}

/// Ordered (sample, glyph markup) pairs
pub fn render_lines(lines: &[SampleLine], glyph: &str) -> Vec<(String, String)> {
    lines
        .iter()
        .map(|line| (line.sample.clone(), glyph_string(line, glyph)))
        .collect()
}

/// Legend label for a color table key
pub fn legend_label(key: &str, main_genes: &[String]) -> String {
    match Category::from_key(key) {
        Category::Both => main_genes.join(" and "),
        _ => key.to_string(),
    }
}

/// Escape text for HTML content and attribute values
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 16);
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}

#[derive(Default)]
struct HtmlBuilder {
    head: Vec<String>,
    body: Vec<String>,
    top_comments: Vec<String>,
}

impl HtmlBuilder {
    fn add_comment(&mut self, text: &str) {
        // "--" may not appear inside an HTML comment
        self.top_comments.push(text.replace("--", "- -"));
    }

    fn add_head(&mut self, title: &str) {
        self.head.push(format!("<title>{}</title>", escape_html(title)));
        self.head.push(format!(
            r#"<style type="text/css">body {{ font-family: {}; }} th, td {{ padding-right: {}px; text-align: left; }}</style>"#,
            FONT_FAMILY, CELL_PADDING_PX
        ));
    }

    fn add_sample_table(&mut self, lines: &[SampleLine], glyph: &str) {
        self.body.push("<table>".to_string());
        self.body.push("<thead><tr><th>Sample</th><th></th></tr></thead>".to_string());
        self.body.push("<tbody>".to_string());
        for line in lines {
            self.body.push(format!(
                r#"<tr><td style="white-space: nowrap;">{}</td><td>{}</td></tr>"#,
                escape_html(&line.sample),
                glyph_string(line, glyph)
            ));
        }
        self.body.push("</tbody>".to_string());
        self.body.push("</table>".to_string());
    }

    fn add_legend(&mut self, options: &PlotOptions) {
        let glyph = escape_html(&options.kmer_shape);
        self.body.push("<hr />".to_string());
        self.body.push(format!("<b>{}</b>", LEGEND_HEADING));
        self.body.push("<table>".to_string());
        for (key, color) in options.colors.iter() {
            self.body.push(format!(
                r#"<tr><td>{}</td><td style="color: {};">{}</td></tr>"#,
                escape_html(&legend_label(key, &options.main_genes)),
                escape_html(color),
                glyph
            ));
        }
        self.body.push("</table>".to_string());
    }

    fn add_footer(&mut self) {
        let now = chrono::Local::now();
        self.body.push(format!(
            "<p><small>Generated by kmerplot {} on {}</small></p>",
            kmerplot_core::VERSION,
            now.format("%Y-%m-%d %H:%M:%S")
        ));
    }

    fn finish(self) -> String {
        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n");
        for c in &self.top_comments {
            for line in c.lines() {
                out.push_str(&format!("<!-- {} -->\n", line));
            }
        }
        out.push_str("<html>\n<head>\n");
        for element in &self.head {
            out.push_str(element);
            out.push('\n');
        }
        out.push_str("</head>\n<body>\n");
        for element in &self.body {
            out.push_str(element);
            out.push('\n');
        }
        out.push_str("</body>\n</html>\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kmerplot_core::{Cell, ColorTable};

    fn options() -> PlotOptions {
        PlotOptions::new(
            vec!["X".into(), "Y".into()],
            ColorTable::new()
                .with("X", "blue")
                .with("Y", "orange")
                .with("Both", "green")
                .with("None", "grey")
                .with("Past_end", "white"),
        )
        .with_kmer_shape("#")
    }

    fn line(sample: &str, cells: &[(Category, &str)]) -> SampleLine {
        SampleLine {
            sample: sample.to_string(),
            cells: cells
                .iter()
                .enumerate()
                .map(|(i, (category, color))| Cell {
                    window_start: (i * 100) as u64,
                    category: category.clone(),
                    color: color.to_string(),
                })
                .collect(),
            relevance: 0,
        }
    }

    #[test]
    fn test_glyph_string() {
        let l = line("s", &[(Category::Gene("X".into()), "blue"), (Category::PastEnd, "white")]);
        assert_eq!(
            glyph_string(&l, "#"),
            r#"<span style="color: blue;">#</span><span style="color: white;">#</span>"#
        );
    }

    #[test]
    fn test_render_lines_keeps_order() {
        let lines = vec![line("b", &[]), line("a", &[])];
        let rendered = render_lines(&lines, "#");
        assert_eq!(rendered[0].0, "b");
        assert_eq!(rendered[1].0, "a");
        assert_eq!(rendered[0].1, "");
    }

    #[test]
    fn test_legend_label() {
        let genes = vec!["X".to_string(), "Y".to_string()];
        assert_eq!(legend_label("Both", &genes), "X and Y");
        assert_eq!(legend_label("None", &genes), "None");
        assert_eq!(legend_label("X", &genes), "X");
    }

    #[test]
    fn test_escape_html() {
        assert!(matches!(escape_html("plain"), Cow::Borrowed("plain")));
        assert_eq!(escape_html("<a&b>"), "&lt;a&amp;b&gt;");
        assert_eq!(escape_html(r#"say "hi""#), "say &quot;hi&quot;");
    }

    #[test]
    fn test_render_document_structure() {
        let lines = vec![line("sample<1>", &[(Category::Both, "green")])];
        let html = HtmlExporter::new(ReportConfig::default()).render(&lines, &options());

        assert!(html.starts_with("<!DOCTYPE html>\n"));
        assert!(html.contains("<title>X/Y Mappings</title>"));
        assert!(html.contains(r#"<td style="white-space: nowrap;">sample&lt;1&gt;</td>"#));
        assert!(html.contains(r#"<span style="color: green;">#</span>"#));
        assert!(html.contains("<b>K-mer Maps Best To:</b>"));
        assert!(html.contains(r#"<tr><td>X and Y</td><td style="color: green;">#</td></tr>"#));

        let legend_x = html.find("<tr><td>X</td>").unwrap();
        let legend_past_end = html.find("<tr><td>Past_end</td>").unwrap();
        assert!(legend_x < legend_past_end);
        assert!(html.ends_with("</html>\n"));
    }

    #[test]
    fn test_legend_can_be_disabled() {
        let config = ReportConfig { show_legend: false, ..ReportConfig::default() };
        let html = HtmlExporter::new(config).render(&[], &options());
        assert!(!html.contains("K-mer Maps Best To"));
    }

    #[test]
    fn test_provenance_comment() {
        let config = ReportConfig {
            provenance_comment: Some("input: a.bam\noptions: --x".into()),
            ..ReportConfig::default()
        };
        let html = HtmlExporter::new(config).render(&[], &options());
        assert!(html.contains("<!-- input: a.bam -->\n"));
        assert!(html.contains("<!-- options: - -x -->\n"));
    }
}
