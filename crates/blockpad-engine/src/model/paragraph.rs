//! Paragraph payload and its two content shapes.
//!
//! A paragraph holds either plain text or a sequence of child blocks (the
//! shape produced when parsing live markup). The JSON layout is:
//!
//! - text form: `{"type":"paragraph","content":"..."}`
//! - composite form: `{"type":"paragraph","children":[...]}`
//!
//! Older documents store the composite form as `"content": [...]`; it is
//! migrated to `Children` on import. When both keys are present `content`
//! takes precedence.

use serde::{Deserialize, Serialize};

use super::block::{Block, concat_plain_text};

#[derive(Debug, Clone, PartialEq)]
pub enum ParagraphContent {
    Text(String),
    Children(Vec<Block>),
}

impl Default for ParagraphContent {
    fn default() -> Self {
        ParagraphContent::Text(String::new())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawParagraph", into = "RawParagraph")]
pub struct ParagraphBlock {
    pub content: ParagraphContent,
}

impl ParagraphBlock {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: ParagraphContent::Text(content.into()),
        }
    }

    pub fn children(children: Vec<Block>) -> Self {
        Self {
            content: ParagraphContent::Children(children),
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self.content, ParagraphContent::Children(_))
    }

    /// Collapses a composite paragraph into its plain-text form.
    ///
    /// Inline styling of the children is dropped. Text paragraphs are
    /// returned unchanged.
    pub fn normalize_to_text(&self) -> ParagraphBlock {
        match &self.content {
            ParagraphContent::Text(_) => self.clone(),
            ParagraphContent::Children(children) => ParagraphBlock::text(concat_plain_text(children)),
        }
    }
}

/// Wire shape accepting every historical paragraph layout.
#[derive(Default, Serialize, Deserialize)]
#[serde(default)]
struct RawParagraph {
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<RawParagraphContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    children: Option<Vec<Block>>,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawParagraphContent {
    Text(String),
    Blocks(Vec<Block>),
}

impl From<RawParagraph> for ParagraphBlock {
    fn from(raw: RawParagraph) -> Self {
        let content = match (raw.content, raw.children) {
            (Some(RawParagraphContent::Text(text)), _) => ParagraphContent::Text(text),
            (Some(RawParagraphContent::Blocks(blocks)), _) => ParagraphContent::Children(blocks),
            (None, Some(children)) => ParagraphContent::Children(children),
            (None, None) => ParagraphContent::default(),
        };
        Self { content }
    }
}

impl From<ParagraphBlock> for RawParagraph {
    fn from(paragraph: ParagraphBlock) -> Self {
        match paragraph.content {
            ParagraphContent::Text(text) => RawParagraph {
                content: Some(RawParagraphContent::Text(text)),
                children: None,
            },
            ParagraphContent::Children(children) => RawParagraph {
                content: None,
                children: Some(children),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BlockKind;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn paragraph_of(value: serde_json::Value) -> ParagraphBlock {
        let block: Block = serde_json::from_value(value).unwrap();
        match block.kind {
            BlockKind::Paragraph(paragraph) => paragraph,
            other => panic!("expected paragraph, got {other:?}"),
        }
    }

    #[test]
    fn text_content_imports_as_text() {
        let paragraph = paragraph_of(json!({ "type": "paragraph", "content": "hi" }));
        assert_eq!(paragraph.content, ParagraphContent::Text("hi".to_string()));
    }

    #[test]
    fn children_import_as_composite() {
        let paragraph = paragraph_of(json!({
            "type": "paragraph",
            "children": [{ "type": "text", "content": "a" }]
        }));
        assert_eq!(
            paragraph.content,
            ParagraphContent::Children(vec![Block::text("a")])
        );
    }

    #[test]
    fn legacy_array_content_is_migrated() {
        let paragraph = paragraph_of(json!({
            "type": "paragraph",
            "content": [{ "type": "break" }]
        }));
        assert_eq!(
            paragraph.content,
            ParagraphContent::Children(vec![Block::line_break()])
        );

        let value = serde_json::to_value(Block::new(BlockKind::Paragraph(paragraph))).unwrap();
        assert_eq!(
            value,
            json!({ "type": "paragraph", "children": [{ "type": "break" }] })
        );
    }

    #[test]
    fn content_wins_over_children() {
        let paragraph = paragraph_of(json!({
            "type": "paragraph",
            "content": "kept",
            "children": [{ "type": "text", "content": "dropped" }]
        }));
        assert_eq!(paragraph.content, ParagraphContent::Text("kept".to_string()));
    }

    #[test]
    fn missing_content_is_empty_text() {
        let paragraph = paragraph_of(json!({ "type": "paragraph" }));
        assert_eq!(paragraph.content, ParagraphContent::Text(String::new()));
    }

    #[test]
    fn normalize_flattens_children() {
        let paragraph = ParagraphBlock::children(vec![
            Block::text("one "),
            Block::line_break(),
            Block::text("two"),
        ]);
        assert_eq!(
            paragraph.normalize_to_text(),
            ParagraphBlock::text("one \ntwo")
        );
        assert!(!paragraph.normalize_to_text().is_composite());
    }
}
