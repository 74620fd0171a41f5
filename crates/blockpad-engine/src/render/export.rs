use html_escape::{encode_double_quoted_attribute, encode_text};

/// Head references and title for a standalone HTML export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub title: String,
    /// Stylesheet for syntax highlighting, omitted when `None`.
    pub stylesheet_href: Option<String>,
    /// Highlighter script, omitted (with its init call) when `None`.
    pub script_src: Option<String>,
}

impl ExportOptions {
    pub const DEFAULT_TITLE: &'static str = "Export";
    pub const HIGHLIGHT_STYLESHEET: &'static str =
        "https://cdnjs.cloudflare.com/ajax/libs/highlight.js/11.7.0/styles/default.min.css";
    pub const HIGHLIGHT_SCRIPT: &'static str =
        "https://cdnjs.cloudflare.com/ajax/libs/highlight.js/11.7.0/highlight.min.js";
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            title: Self::DEFAULT_TITLE.to_string(),
            stylesheet_href: Some(Self::HIGHLIGHT_STYLESHEET.to_string()),
            script_src: Some(Self::HIGHLIGHT_SCRIPT.to_string()),
        }
    }
}

/// Wrap a rendered fragment in a complete HTML document.
///
/// The fragment is interpolated as-is; it is expected to come from the
/// renderer (already escaped) or the sanitizer.
pub fn standalone_document(fragment: &str, options: &ExportOptions) -> String {
    let mut head = String::new();
    head.push_str("<meta charset=\"utf-8\"/>\n");
    head.push_str("<meta name=\"viewport\" content=\"width=device-width,initial-scale=1\"/>\n");
    head.push_str(&format!("<title>{}</title>\n", encode_text(&options.title)));
    if let Some(href) = &options.stylesheet_href {
        head.push_str(&format!(
            "<link rel=\"stylesheet\" href=\"{}\">\n",
            encode_double_quoted_attribute(href)
        ));
    }

    let mut scripts = String::new();
    if let Some(src) = &options.script_src {
        scripts.push_str(&format!(
            "<script src=\"{}\"></script>\n<script>hljs.highlightAll();</script>\n",
            encode_double_quoted_attribute(src)
        ));
    }

    format!("<!doctype html>\n<html>\n<head>\n{head}</head>\n<body>\n{fragment}\n{scripts}</body>\n</html>")
}
