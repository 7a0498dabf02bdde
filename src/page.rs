// Page assembly - the complete HTML document, rendered once
//
// Output is a pure function of the tables: same tables, same bytes, same ETag.

use crate::data::Dataset;
use crate::layout::{build_dashboard, Node, DASHBOARD_TITLE};
use crate::stats::Summary;
use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

const STYLESHEETS: [&str; 2] = [
    "https://cdn.jsdelivr.net/npm/bootswatch@5.3.3/dist/flatly/bootstrap.min.css",
    "https://fonts.googleapis.com/css2?family=Bebas+Neue&display=swap",
];

const PLOTLY_SCRIPT: &str = "https://cdn.plot.ly/plotly-2.35.0.min.js";

const PAGE_STYLE: &str = r#"
* {
    font-family: 'Bebas Neue', sans-serif;
}
.regular-text {
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
}
.card-body p, .card-body text {
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
}
.card {
    margin-bottom: 1rem;
}
"#;

#[derive(Debug, Clone)]
pub struct Page {
    pub html: String,
    /// Quoted strong validator: "\"<sha256 hex>\""
    pub etag: String,
}

impl Page {
    pub fn render(data: &Dataset, summary: &Summary) -> Result<Self> {
        let tree = build_dashboard(data, summary);
        Self::from_tree(&tree)
    }

    pub fn from_tree(tree: &Node) -> Result<Self> {
        let html = render_document(tree)?;

        let mut hasher = Sha256::new();
        hasher.update(html.as_bytes());
        let etag = format!("\"{:x}\"", hasher.finalize());

        Ok(Page { html, etag })
    }

    pub fn len(&self) -> usize {
        self.html.len()
    }

    pub fn is_empty(&self) -> bool {
        self.html.is_empty()
    }
}

fn render_document(tree: &Node) -> Result<String> {
    let mut out = String::with_capacity(64 * 1024);

    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    out.push_str("<meta charset=\"utf-8\">\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    out.push_str(&format!("<title>{}</title>\n", DASHBOARD_TITLE));
    for href in STYLESHEETS {
        out.push_str(&format!("<link rel=\"stylesheet\" href=\"{}\">\n", href));
    }
    out.push_str("<style>");
    out.push_str(PAGE_STYLE);
    out.push_str("</style>\n");
    out.push_str(&format!("<script src=\"{}\"></script>\n", PLOTLY_SCRIPT));
    out.push_str("</head>\n<body>\n");

    tree.render(&mut out);
    out.push('\n');

    out.push_str("<script>\n");
    for (id, figure) in tree.graphs() {
        let (data, layout) = figure
            .to_json_parts()
            .with_context(|| format!("Failed to serialize figure {}", id))?;
        out.push_str(&format!(
            "Plotly.newPlot(\"{}\", {}, {}, {{\"responsive\": true}});\n",
            id,
            script_safe(&data),
            script_safe(&layout),
        ));
    }
    out.push_str("</script>\n</body>\n</html>\n");

    Ok(out)
}

/// Keep "</" out of inline script bodies; "<\/" is the same JSON string
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}
