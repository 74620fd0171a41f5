//! Allowlist sanitizer for rendered fragments.
//!
//! The renderer escapes everything it writes, so its own output passes
//! through untouched in meaning. This exists for the display step: HTML that
//! came from elsewhere (an imported page, a hand-edited fragment) is parsed
//! with html5ever and rebuilt from allowlisted elements and attributes only.
//!
//! - `script`, `style` and other active or embedding elements are dropped
//!   together with their content.
//! - Unknown elements are unwrapped: their children are kept.
//! - `img[src]` must be http, https, scheme-relative/relative, or `data:image/`.
//! - `span[style]` keeps only the editor's formatting declarations.
//! - All text and attribute values are re-escaped.

pub mod preview;

use std::sync::OnceLock;

use html_escape::{encode_double_quoted_attribute, encode_text};
use regex::Regex;

use crate::markup::{self, Element, InlineStyle, MarkupNode};

pub use preview::{Preview, PreviewUpdate};

const ALLOWED_ELEMENTS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "div", "span", "br", "ul", "ol", "li", "figure",
    "img", "figcaption", "pre", "code", "table", "thead", "tbody", "tr", "th", "td", "b",
    "strong", "i", "em", "u",
];

const DROPPED_ELEMENTS: &[&str] = &[
    "script", "style", "iframe", "frame", "frameset", "object", "embed", "applet", "template",
    "noscript", "svg", "math", "title", "head", "link", "meta", "base",
];

const VOID_ELEMENTS: &[&str] = &["br", "img"];

const STYLE_PROPERTIES: &[&str] = &["font-weight", "font-style", "text-decoration", "color"];

/// Sanitize an HTML fragment, returning safe HTML (possibly empty).
pub fn sanitize_fragment(source: &str) -> String {
    let mut out = String::new();
    for node in markup::parse_html(source) {
        write_node(&node, &mut out);
    }
    out
}

fn write_node(node: &MarkupNode, out: &mut String) {
    match node {
        MarkupNode::Text(text) => out.push_str(&encode_text(text)),
        MarkupNode::Element(element) => write_element(element, out),
    }
}

fn write_element(element: &Element, out: &mut String) {
    let tag = element.tag.as_str();
    if DROPPED_ELEMENTS.contains(&tag) {
        log::debug!("sanitizer dropped <{tag}> and its content");
        return;
    }
    if !ALLOWED_ELEMENTS.contains(&tag) {
        log::trace!("sanitizer unwrapped <{tag}>");
        for child in &element.children {
            write_node(child, out);
        }
        return;
    }

    out.push('<');
    out.push_str(tag);
    for (name, value) in allowed_attributes(element) {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&encode_double_quoted_attribute(&value));
        out.push('"');
    }

    if VOID_ELEMENTS.contains(&tag) {
        out.push_str("/>");
        return;
    }
    out.push('>');
    for child in &element.children {
        write_node(child, out);
    }
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn allowed_attributes(element: &Element) -> Vec<(&'static str, String)> {
    let mut attrs = Vec::new();
    match element.tag.as_str() {
        "img" => {
            if let Some(src) = element.attr("src")
                && is_safe_image_src(src)
            {
                attrs.push(("src", src.to_string()));
            }
            if let Some(alt) = element.attr("alt") {
                attrs.push(("alt", alt.to_string()));
            }
        }
        "code" => {
            if let Some(class) = element.attr("class")
                && language_class_regex().is_match(class)
            {
                attrs.push(("class", class.to_string()));
            }
        }
        "span" => {
            let css = filter_style(&element.inline_style());
            if !css.is_empty() {
                attrs.push(("style", css));
            }
        }
        _ => {}
    }
    attrs
}

/// Keeps the formatting declarations whose values are plain keywords or colors.
fn filter_style(style: &InlineStyle) -> String {
    let mut css = String::new();
    for property in STYLE_PROPERTIES {
        let Some(value) = style.get(property) else {
            continue;
        };
        let ok = if *property == "color" {
            is_safe_color(value)
        } else {
            keyword_regex().is_match(value)
        };
        if ok {
            css.push_str(property);
            css.push(':');
            css.push_str(value);
            css.push(';');
        }
    }
    css
}

/// True for color names, hex colors and numeric `rgb()`/`hsl()` forms.
pub fn is_safe_color(value: &str) -> bool {
    color_regex().is_match(value)
}

/// True for http(s), data:image and scheme-less URLs.
pub fn is_safe_image_src(src: &str) -> bool {
    // browsers ignore whitespace and control characters inside the scheme
    let compact: String = src
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_ascii_control())
        .collect::<String>()
        .to_ascii_lowercase();

    let scheme_end = compact.find(':');
    let path_start = compact.find(['/', '?', '#']);
    match (scheme_end, path_start) {
        (Some(colon), Some(path)) if path < colon => true,
        (Some(colon), _) => {
            let scheme = &compact[..colon];
            scheme == "http" || scheme == "https" || compact.starts_with("data:image/")
        }
        (None, _) => true,
    }
}

fn language_class_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^language-[A-Za-z0-9_+#.\-]+$").expect("Invalid class regex"))
}

fn keyword_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z\-]+( [A-Za-z\-]+)*$").expect("Invalid keyword regex"))
}

fn color_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(#[0-9A-Fa-f]{3,8}|[A-Za-z]+|(rgb|rgba|hsl|hsla)\([0-9.,%\s]+\))$")
            .expect("Invalid color regex")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn renderer_output_passes_through() {
        let html = "<h2>A &amp; B</h2><ul><li>x</li></ul><pre><code class=\"language-rust\">fn</code></pre>";
        assert_eq!(sanitize_fragment(html), html);
    }

    #[test]
    fn script_elements_are_removed_with_content() {
        assert_eq!(
            sanitize_fragment("<p>ok</p><script>alert(1)</script><p>too</p>"),
            "<p>ok</p><p>too</p>"
        );
    }

    #[test]
    fn event_handler_attributes_are_stripped() {
        assert_eq!(
            sanitize_fragment("<p onclick=\"evil()\">x</p><img src=\"a.png\" onerror=\"evil()\">"),
            "<p>x</p><img src=\"a.png\"/>"
        );
    }

    #[test]
    fn unknown_elements_are_unwrapped() {
        assert_eq!(
            sanitize_fragment("<section><a href=\"javascript:x\">link</a></section>"),
            "link"
        );
    }

    #[rstest]
    #[case("https://example.com/a.png", true)]
    #[case("http://example.com/a.png", true)]
    #[case("images/a.png", true)]
    #[case("/a.png?x=1:2", true)]
    #[case("data:image/png;base64,AAAA", true)]
    #[case("javascript:alert(1)", false)]
    #[case("JaVa\tScRiPt:alert(1)", false)]
    #[case("data:text/html,<script>", false)]
    #[case("vbscript:x", false)]
    fn image_src_schemes(#[case] src: &str, #[case] safe: bool) {
        assert_eq!(is_safe_image_src(src), safe);
    }

    #[test]
    fn unsafe_src_is_dropped_but_img_kept() {
        assert_eq!(
            sanitize_fragment("<img src=\"javascript:alert(1)\" alt=\"x\">"),
            "<img alt=\"x\"/>"
        );
    }

    #[test]
    fn span_style_is_filtered() {
        assert_eq!(
            sanitize_fragment(
                "<span style=\"font-weight:bold; background:url(x); color: rgb(255, 0, 0)\">t</span>"
            ),
            "<span style=\"font-weight:bold;color:rgb(255, 0, 0);\">t</span>"
        );
        assert_eq!(
            sanitize_fragment("<span style=\"color: expression(alert(1))\">t</span>"),
            "<span>t</span>"
        );
    }

    #[rstest]
    #[case("red", true)]
    #[case("#fa0", true)]
    #[case("hsla(120, 50%, 50%, 0.3)", true)]
    #[case("red;background:url(//x)", false)]
    #[case("expression(alert(1))", false)]
    #[case("", false)]
    fn color_values(#[case] value: &str, #[case] safe: bool) {
        assert_eq!(is_safe_color(value), safe);
    }

    #[test]
    fn text_is_reescaped() {
        assert_eq!(sanitize_fragment("a &lt;b&gt; &amp; c"), "a &lt;b&gt; &amp; c");
    }

    #[test]
    fn code_class_must_be_a_language() {
        assert_eq!(
            sanitize_fragment("<code class=\"language-x onload\">c</code>"),
            "<code>c</code>"
        );
    }
}
