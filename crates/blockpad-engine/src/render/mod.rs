//! Block tree → HTML fragment.
//!
//! # Mapping
//!
//! | Block | HTML |
//! |-------|------|
//! | heading | `<hN>` with N = level clamped to 1..=6 (default 2) |
//! | paragraph (text) | `<p>` (or `<div>`, see [`ParagraphTag`]) |
//! | paragraph (children) | same tag wrapping the rendered children |
//! | list | `<ul>`/`<ol>` of `<li>` |
//! | image | `<figure><img src alt/>` plus `<figcaption>` when a caption is set |
//! | code | `<pre><code class="language-X">` (X defaults to `text`) |
//! | table | `<table>` with `<thead>` of `<th>` and `<tbody>` of `<td>` rows |
//! | text | `<span>` |
//! | span | `<span style="...">` wrapping its children |
//! | break | `<br/>` |
//! | unknown, unrecognized | nothing |
//!
//! # Escaping
//!
//! Every piece of user text goes through `html-escape`: text nodes with
//! `encode_text`, attribute values with `encode_double_quoted_attribute`.
//! No other encoding is applied. Span colors are written only when they are
//! plain color values. The output is not sanitized; pass it through
//! [`crate::sanitize`] before trusting it for display.

pub mod export;

use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::{Deserialize, Serialize};

use crate::model::{
    Block, BlockKind, BlockStyle, CodeBlock, HeadingBlock, ImageBlock, InlineBlock, ListBlock,
    ParagraphBlock, ParagraphContent, TableBlock,
};
use crate::sanitize::is_safe_color;

pub use export::{ExportOptions, standalone_document};

/// Element used for paragraphs. Pick one per system and keep it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParagraphTag {
    #[default]
    P,
    Div,
}

impl ParagraphTag {
    pub fn as_str(self) -> &'static str {
        match self {
            ParagraphTag::P => "p",
            ParagraphTag::Div => "div",
        }
    }
}

impl std::str::FromStr for ParagraphTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "p" => Ok(ParagraphTag::P),
            "div" => Ok(ParagraphTag::Div),
            other => Err(format!("unsupported paragraph tag: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub paragraph_tag: ParagraphTag,
}

/// Stateless HTML renderer; construct once and pass it where needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer {
    options: RenderOptions,
}

impl HtmlRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> RenderOptions {
        self.options
    }

    pub fn render_block(&self, block: &Block) -> String {
        let mut out = String::new();
        self.write_block(block, &mut out);
        out
    }

    /// Renders each block and joins the results with newlines.
    pub fn render_document(&self, blocks: &[Block]) -> String {
        blocks
            .iter()
            .map(|block| self.render_block(block))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn write_block(&self, block: &Block, out: &mut String) {
        match &block.kind {
            BlockKind::Heading(heading) => write_heading(heading, out),
            BlockKind::Paragraph(paragraph) => self.write_paragraph(paragraph, out),
            BlockKind::List(list) => write_list(list, out),
            BlockKind::Image(image) => write_image(image, out),
            BlockKind::Code(code) => write_code(code, out),
            BlockKind::Table(table) => write_table(table, out),
            BlockKind::Text(text) => self.write_inline(text, None, out),
            BlockKind::Span(span) => self.write_inline(span, Some(&span.style()), out),
            BlockKind::Break => out.push_str("<br/>"),
            BlockKind::Unknown(_) | BlockKind::Unrecognized(_) => {}
        }
    }

    fn write_paragraph(&self, paragraph: &ParagraphBlock, out: &mut String) {
        let tag = self.options.paragraph_tag.as_str();
        open(out, tag);
        match &paragraph.content {
            ParagraphContent::Text(text) => out.push_str(&encode_text(text)),
            ParagraphContent::Children(children) => self.write_children(children, out),
        }
        close(out, tag);
    }

    fn write_inline(&self, inline: &InlineBlock, style: Option<&BlockStyle>, out: &mut String) {
        match style.map(style_attribute).filter(|css| !css.is_empty()) {
            Some(css) => {
                out.push_str("<span style=\"");
                out.push_str(&encode_double_quoted_attribute(&css));
                out.push_str("\">");
            }
            None => open(out, "span"),
        }
        match (&inline.content, &inline.children) {
            (Some(content), _) => out.push_str(&encode_text(content)),
            (None, Some(children)) => self.write_children(children, out),
            (None, None) => {}
        }
        close(out, "span");
    }

    fn write_children(&self, children: &[Block], out: &mut String) {
        for child in children {
            self.write_block(child, out);
        }
    }
}

fn write_heading(heading: &HeadingBlock, out: &mut String) {
    let tag = format!("h{}", heading.effective_level());
    open(out, &tag);
    out.push_str(&encode_text(&heading.content));
    close(out, &tag);
}

fn write_list(list: &ListBlock, out: &mut String) {
    let tag = if list.ordered { "ol" } else { "ul" };
    open(out, tag);
    for item in &list.items {
        text_element(out, "li", item);
    }
    close(out, tag);
}

fn write_image(image: &ImageBlock, out: &mut String) {
    open(out, "figure");
    out.push_str("<img src=\"");
    out.push_str(&encode_double_quoted_attribute(&image.src));
    out.push_str("\" alt=\"");
    out.push_str(&encode_double_quoted_attribute(
        image.alt.as_deref().unwrap_or_default(),
    ));
    out.push_str("\"/>");
    if let Some(caption) = image.caption.as_deref()
        && !caption.is_empty()
    {
        text_element(out, "figcaption", caption);
    }
    close(out, "figure");
}

fn write_code(code: &CodeBlock, out: &mut String) {
    out.push_str("<pre><code class=\"language-");
    out.push_str(&encode_double_quoted_attribute(code.effective_language()));
    out.push_str("\">");
    out.push_str(&encode_text(&code.code));
    out.push_str("</code></pre>");
}

fn write_table(table: &TableBlock, out: &mut String) {
    out.push_str("<table><thead><tr>");
    for header in &table.headers {
        text_element(out, "th", header);
    }
    out.push_str("</tr></thead><tbody>");
    for row in &table.rows {
        open(out, "tr");
        for cell in row {
            text_element(out, "td", cell);
        }
        close(out, "tr");
    }
    out.push_str("</tbody></table>");
}

/// CSS declarations for the formatting flags, in a fixed order.
///
/// A color that is not a plain color value is left out.
pub fn style_attribute(style: &BlockStyle) -> String {
    let mut css = String::new();
    if style.bold {
        css.push_str("font-weight:bold;");
    }
    if style.italic {
        css.push_str("font-style:italic;");
    }
    if style.underline {
        css.push_str("text-decoration:underline;");
    }
    if let Some(color) = style.color.as_deref()
        && is_safe_color(color)
    {
        css.push_str("color:");
        css.push_str(color);
        css.push(';');
    }
    css
}

fn open(out: &mut String, tag: &str) {
    out.push('<');
    out.push_str(tag);
    out.push('>');
}

fn close(out: &mut String, tag: &str) {
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn text_element(out: &mut String, tag: &str, text: &str) {
    open(out, tag);
    out.push_str(&encode_text(text));
    close(out, tag);
}

/// Render one block with default options.
pub fn render_block(block: &Block) -> String {
    HtmlRenderer::default().render_block(block)
}

/// Render a whole document with default options.
pub fn render_document(blocks: &[Block]) -> String {
    HtmlRenderer::default().render_document(blocks)
}
