//! HTML page rendering
//!
//! The page is assembled as a string. Every value that originates from the
//! request, the database or the driver goes through [`escape_html`]; only
//! fixed markup and the (static) asset path are written verbatim.

use crate::registry::{column_label, TableName, TableRegistry};
use crate::schema::{ConnectionStatus, QueryResult};

/// Plaintext body returned for a table name outside the registry
pub const REJECTION_MESSAGE: &str = "Error: invalid table.";

/// Everything needed to render one page
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    /// Heading shown above the navigation
    pub title: &'a str,

    /// Mount path of the viewer, used to locate the stylesheet
    pub base_path: &'a str,

    pub registry: &'a TableRegistry,
    pub selected: &'a TableName,
    pub status: &'a ConnectionStatus,

    /// `None` when the gateway never ran or failed
    pub result: Option<&'a QueryResult>,
}

/// Escape text for use in element content and quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for character in text.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Body of the rejection response
pub fn render_rejection() -> &'static str {
    REJECTION_MESSAGE
}

/// Render the full HTML document
pub fn render_page(context: &PageContext<'_>) -> String {
    let title = escape_html(context.title);
    let mut html = String::with_capacity(4096);

    html.push_str("<!DOCTYPE html>\n<html lang=\"es\">\n<head>\n");
    html.push_str("    <meta charset=\"UTF-8\">\n");
    html.push_str(
        "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    html.push_str(&format!("    <title>{}</title>\n", title));
    html.push_str(&format!(
        "    <link rel=\"stylesheet\" href=\"{}/assets/viewer.css\">\n",
        context.base_path.trim_end_matches('/')
    ));
    html.push_str("</head>\n<body>\n    <div class=\"container\">\n");

    html.push_str("        <div class=\"header\">\n");
    html.push_str(&format!("            <h1>{}</h1>\n", title));
    html.push_str("            <p>Select a table to view its records.</p>\n");
    html.push_str("        </div>\n");

    render_status(&mut html, context.status);
    render_navigation(&mut html, context.registry, context.selected);

    html.push_str("        <div class=\"table-wrapper\">\n");
    html.push_str(&format!(
        "            <h2>Records of: &quot;{}&quot;</h2>\n",
        escape_html(&context.selected.display_name())
    ));
    match context.result {
        Some(result) if !result.is_empty() => render_table(&mut html, result),
        Some(_) => html.push_str(&format!(
            "            <p class=\"empty\">The table &quot;{}&quot; has no records.</p>\n",
            escape_html(context.selected.as_str())
        )),
        None => html.push_str(
            "            <p class=\"unavailable\">The data cannot be displayed. Check the database connection.</p>\n",
        ),
    }
    html.push_str("        </div>\n");

    html.push_str("    </div>\n</body>\n</html>\n");
    html
}

fn render_status(html: &mut String, status: &ConnectionStatus) {
    html.push_str(&format!(
        "        <div class=\"status {}\">{}</div>\n",
        status.kind.css_class(),
        escape_html(&status.message)
    ));
}

fn render_navigation(html: &mut String, registry: &TableRegistry, selected: &TableName) {
    html.push_str("        <nav>\n");
    for table in registry.tables() {
        let class = if table == selected { " class=\"active\"" } else { "" };
        html.push_str(&format!(
            "            <a href=\"?tabla={}\"{}>{}</a>\n",
            escape_html(&urlencoding::encode(table.as_str())),
            class,
            escape_html(&table.display_name())
        ));
    }
    html.push_str("        </nav>\n");
}

fn render_table(html: &mut String, result: &QueryResult) {
    html.push_str("            <table>\n                <thead>\n                    <tr>\n");
    for column in &result.columns {
        html.push_str(&format!(
            "                        <th>{}</th>\n",
            escape_html(&column_label(column))
        ));
    }
    html.push_str("                    </tr>\n                </thead>\n                <tbody>\n");
    for row in &result.rows {
        html.push_str("                    <tr>\n");
        for value in row {
            html.push_str(&format!(
                "                        <td>{}</td>\n",
                escape_html(value.as_deref().unwrap_or_default())
            ));
        }
        html.push_str("                    </tr>\n");
    }
    html.push_str("                </tbody>\n            </table>\n");
}
