//! Markup tree → block tree.
//!
//! Children are parsed before the node itself decides what it is, since
//! composite blocks need their children's results:
//!
//! | Node | Block |
//! |------|-------|
//! | `span` with children | `span` with children and style flags |
//! | any other element with children | composite `paragraph` |
//! | text node | `text` with the raw text |
//! | leaf `h2` | `heading`, level 2 |
//! | leaf `br` | `break` |
//! | any other leaf element | `unknown` with text content and style flags |
//!
//! Unrecognized tags degrade to `unknown`; parsing never fails.

use crate::markup::{self, Element, MarkupNode};
use crate::model::{Block, BlockKind, BlockStyle, Document, HeadingBlock, InlineBlock};

/// Parse one markup node (recursively) into a block.
///
/// Elements nested past [`markup::MAX_DEPTH`] become `text` blocks holding
/// their text content.
pub fn parse_node(node: &MarkupNode) -> Block {
    parse_node_at(node, 0)
}

fn parse_node_at(node: &MarkupNode, depth: usize) -> Block {
    let element = match node {
        MarkupNode::Text(text) => return Block::text(text.as_str()),
        MarkupNode::Element(_) if depth >= markup::MAX_DEPTH => {
            return Block::text(node.text_content());
        }
        MarkupNode::Element(element) => element,
    };

    if !element.children.is_empty() {
        let children: Vec<Block> = element
            .children
            .iter()
            .map(|child| parse_node_at(child, depth + 1))
            .collect();
        if element.tag == "span" {
            return Block::new(BlockKind::Span(InlineBlock {
                content: None,
                children: Some(children),
                style: Some(extract_style(element)),
            }));
        }
        return Block::composite_paragraph(children);
    }

    match element.tag.as_str() {
        "h2" => Block::new(BlockKind::Heading(HeadingBlock {
            content: node.text_content(),
            level: Some(2),
        })),
        "br" => Block::line_break(),
        tag => {
            log::trace!("unrecognized leaf element <{tag}> parsed as unknown");
            Block::new(BlockKind::Unknown(InlineBlock {
                content: Some(node.text_content()),
                children: None,
                style: Some(extract_style(element)),
            }))
        }
    }
}

/// Parse the top-level nodes of an editable surface into a document.
pub fn parse_document(nodes: &[MarkupNode]) -> Document {
    nodes.iter().map(parse_node).collect()
}

/// Parse an HTML string (the surface's inner HTML) into a document.
pub fn parse_html(source: &str) -> Document {
    parse_document(&markup::parse_html(source))
}

/// Reads the editor's three formatting flags and color from `style`.
pub fn extract_style(element: &Element) -> BlockStyle {
    let style = element.inline_style();
    BlockStyle {
        bold: style.is("font-weight", "bold"),
        italic: style.is("font-style", "italic"),
        underline: style.is("text-decoration", "underline"),
        color: style.get("color").map(str::to_string),
    }
}
