//! Generic markup tree consumed by the block parser.
//!
//! The tree is deliberately small: elements with lowercase tag names,
//! attributes in source order, and text nodes. Comments and other node
//! types never make it in. [`parse_html`] builds one from an HTML string;
//! callers that already hold a live tree can build [`MarkupNode`]s directly.

pub mod html;
pub mod style;

pub use html::parse_html;
pub use style::InlineStyle;

/// Deepest element nesting kept when building or walking a tree. Anything
/// below it is reduced to its text so tree walks stay shallow.
pub const MAX_DEPTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupNode {
    Text(String),
    Element(Element),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lowercase tag name (`span`, `h2`, `br`, ...)
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<MarkupNode>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs
            .push((name.to_ascii_lowercase(), value.to_string()));
        self
    }

    pub fn with_child(mut self, child: impl Into<MarkupNode>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_text(self, text: &str) -> Self {
        self.with_child(MarkupNode::Text(text.to_string()))
    }

    /// First attribute with the given (case-insensitive) name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Declarations of the inline `style` attribute.
    pub fn inline_style(&self) -> InlineStyle {
        self.attr("style").map(InlineStyle::parse).unwrap_or_default()
    }
}

impl From<Element> for MarkupNode {
    fn from(element: Element) -> Self {
        MarkupNode::Element(element)
    }
}

impl MarkupNode {
    pub fn text(text: &str) -> Self {
        MarkupNode::Text(text.to_string())
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            MarkupNode::Element(element) => Some(&element.tag),
            MarkupNode::Text(_) => None,
        }
    }

    pub fn children(&self) -> &[MarkupNode] {
        match self {
            MarkupNode::Element(element) => &element.children,
            MarkupNode::Text(_) => &[],
        }
    }

    pub fn has_children(&self) -> bool {
        !self.children().is_empty()
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                MarkupNode::Text(text) => out.push_str(text),
                MarkupNode::Element(element) => stack.extend(element.children.iter().rev()),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builder_lowercases_tags_and_attr_names() {
        let el = Element::new("SPAN").with_attr("STYLE", "color: red");
        assert_eq!(el.tag, "span");
        assert_eq!(el.attr("style"), Some("color: red"));
        assert_eq!(el.attr("Style"), Some("color: red"));
    }

    #[test]
    fn text_content_concatenates_descendants() {
        let node: MarkupNode = Element::new("p")
            .with_text("Hello ")
            .with_child(Element::new("b").with_text("bold"))
            .with_child(Element::new("br"))
            .with_text("!")
            .into();
        assert_eq!(node.text_content(), "Hello bold!");
        assert_eq!(node.children().len(), 4);
    }

    #[test]
    fn text_nodes_have_no_children() {
        let node = MarkupNode::text("plain");
        assert!(!node.has_children());
        assert_eq!(node.tag(), None);
    }
}
