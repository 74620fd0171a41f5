//! HTML string → [`MarkupNode`] tree, via html5ever's RcDom.

use html5ever::tendril::TendrilSink;
use html5ever::{ParseOpts, parse_document};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use super::{Element, MAX_DEPTH, MarkupNode};

/// Parse an HTML string and return the children of `<body>`.
///
/// The input is treated as the content of an editable surface, so anything
/// html5ever hoists into `<head>` (scripts or styles before any body content,
/// `<title>`, ...) is not returned. Malformed markup is recovered the way a
/// browser would; this never fails. Elements nested deeper than
/// [`MAX_DEPTH`] are flattened into their text.
pub fn parse_html(source: &str) -> Vec<MarkupNode> {
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(source);

    match find_body(&dom.document) {
        Some(body) => body
            .children
            .borrow()
            .iter()
            .filter_map(|child| convert(child, 0))
            .collect(),
        None => Vec::new(),
    }
}

fn find_body(document: &Handle) -> Option<Handle> {
    let html = find_child_element(document, "html")?;
    find_child_element(&html, "body")
}

fn find_child_element(parent: &Handle, tag: &str) -> Option<Handle> {
    parent
        .children
        .borrow()
        .iter()
        .find(|child| match &child.data {
            NodeData::Element { name, .. } => &*name.local == tag,
            _ => false,
        })
        .cloned()
}

fn convert(handle: &Handle, depth: usize) -> Option<MarkupNode> {
    match &handle.data {
        NodeData::Text { contents } => Some(MarkupNode::Text(String::from(&**contents.borrow()))),
        NodeData::Element { .. } if depth >= MAX_DEPTH => {
            Some(MarkupNode::Text(descendant_text(handle)))
        }
        NodeData::Element { name, attrs, .. } => {
            let attrs = attrs
                .borrow()
                .iter()
                .map(|attr| {
                    (
                        attr.name.local.to_ascii_lowercase().to_string(),
                        String::from(&*attr.value),
                    )
                })
                .collect();
            let children = handle
                .children
                .borrow()
                .iter()
                .filter_map(|child| convert(child, depth + 1))
                .collect();
            Some(MarkupNode::Element(Element {
                tag: name.local.to_ascii_lowercase().to_string(),
                attrs,
                children,
            }))
        }
        // comments, doctype, processing instructions
        _ => None,
    }
}

/// Text of every descendant, walked without recursion.
fn descendant_text(handle: &Handle) -> String {
    let mut out = String::new();
    let mut stack = vec![handle.clone()];
    while let Some(node) = stack.pop() {
        match &node.data {
            NodeData::Text { contents } => out.push_str(&**contents.borrow()),
            NodeData::Element { .. } => stack.extend(node.children.borrow().iter().rev().cloned()),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn returns_body_children() {
        let nodes = parse_html("Hello <h2>Title</h2><br>");
        assert_eq!(
            nodes,
            vec![
                MarkupNode::text("Hello "),
                Element::new("h2").with_text("Title").into(),
                Element::new("br").into(),
            ]
        );
    }

    #[test]
    fn keeps_attributes_and_nesting() {
        let nodes = parse_html(r#"<span style="font-weight: bold">a<i>b</i></span>"#);
        assert_eq!(
            nodes,
            vec![
                Element::new("span")
                    .with_attr("style", "font-weight: bold")
                    .with_text("a")
                    .with_child(Element::new("i").with_text("b"))
                    .into()
            ]
        );
    }

    #[test]
    fn drops_comments() {
        let nodes = parse_html("<p>a<!-- hidden -->b</p>");
        assert_eq!(nodes[0].children().len(), 2);
        assert_eq!(nodes[0].text_content(), "ab");
    }

    #[test]
    fn recovers_from_mismatched_tags() {
        let nodes = parse_html("<p><b>bold</p>after");
        assert!(!nodes.is_empty());
        let text: String = nodes.iter().map(MarkupNode::text_content).collect();
        assert_eq!(text, "boldafter");
    }

    #[test]
    fn empty_input_yields_no_nodes() {
        assert!(parse_html("").is_empty());
    }

    #[test]
    fn deep_nesting_is_flattened_into_text() {
        let source = format!("{}x{}", "<span>".repeat(1000), "</span>".repeat(1000));
        let nodes = parse_html(&source);

        let mut depth = 0;
        let mut node = &nodes[0];
        while let Some(child) = node.children().first() {
            depth += 1;
            node = child;
        }
        assert_eq!(depth, MAX_DEPTH);
        assert_eq!(node, &MarkupNode::text("x"));
    }

    #[test]
    fn uppercase_tags_are_normalized() {
        let nodes = parse_html("<DIV STYLE=\"color:red\"><BR></DIV>");
        assert_eq!(nodes[0].tag(), Some("div"));
        assert_eq!(nodes[0].children()[0].tag(), Some("br"));
        let MarkupNode::Element(div) = &nodes[0] else {
            panic!("expected element");
        };
        assert_eq!(div.attrs, vec![("style".to_string(), "color:red".to_string())]);
    }
}
