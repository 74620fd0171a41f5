use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::paragraph::{ParagraphBlock, ParagraphContent};

/// One node of the structured document model.
///
/// Serialized as a flat JSON object: the optional `id` sits next to the
/// `type` tag and the variant fields of [`BlockKind`].
///
/// ```rust
/// # use blockpad_engine::model::Block;
/// let block: Block = serde_json::from_str(r#"{"type":"heading","content":"Hi"}"#).unwrap();
/// assert!(block.is_heading());
/// assert_eq!(block.as_heading().unwrap().effective_level(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Caller-assigned identifier. Opaque, not checked for uniqueness.
    pub id: Option<String>,
    pub kind: BlockKind,
}

/// The closed set of block variants, keyed by the JSON `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BlockKind {
    Heading(HeadingBlock),
    Paragraph(ParagraphBlock),
    Text(InlineBlock),
    Span(InlineBlock),
    Break,
    List(ListBlock),
    Image(ImageBlock),
    Code(CodeBlock),
    Table(TableBlock),
    Unknown(InlineBlock),
    /// Any object whose `type` is outside the closed set (or missing). The
    /// fields other than a string `id` are kept as imported and written back
    /// unchanged; it renders nothing.
    #[serde(skip)]
    Unrecognized(Map<String, Value>),
}

/// Wire layout of a block with a known tag.
#[derive(Deserialize)]
struct KnownBlock {
    #[serde(default)]
    id: Option<String>,
    #[serde(flatten)]
    kind: BlockKind,
}

#[derive(Serialize)]
struct KnownBlockRef<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    #[serde(flatten)]
    kind: &'a BlockKind,
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.kind {
            BlockKind::Unrecognized(fields) => {
                let id = self.id.as_deref().filter(|_| !fields.contains_key("id"));
                let mut map = serializer.serialize_map(Some(fields.len() + usize::from(id.is_some())))?;
                if let Some(id) = id {
                    map.serialize_entry("id", id)?;
                }
                for (key, value) in fields {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            kind => KnownBlockRef {
                id: self.id.as_deref(),
                kind,
            }
            .serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields: Map<String, Value> = Map::deserialize(deserializer)?;
        let known = fields
            .get("type")
            .and_then(Value::as_str)
            .is_some_and(|tag| BlockType::ALL.iter().any(|t| t.as_str() == tag));

        if known {
            let KnownBlock { id, kind } =
                serde_json::from_value(Value::Object(fields)).map_err(de::Error::custom)?;
            return Ok(Block { id, kind });
        }

        let id = match fields.remove("id") {
            Some(Value::String(id)) => Some(id),
            Some(other) => {
                fields.insert("id".to_string(), other);
                None
            }
            None => None,
        };
        Ok(Block {
            id,
            kind: BlockKind::Unrecognized(fields),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadingBlock {
    pub content: String,
    /// Kept as imported; clamped to 1..=6 only when rendering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<i64>,
}

impl HeadingBlock {
    pub const DEFAULT_LEVEL: i64 = 2;

    /// Heading level with the default applied and clamped to `1..=6`.
    pub fn effective_level(&self) -> u8 {
        // clamp keeps the value inside u8 range
        self.level.unwrap_or(Self::DEFAULT_LEVEL).clamp(1, 6) as u8
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListBlock {
    pub ordered: bool,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageBlock {
    pub src: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeBlock {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub code: String,
}

impl CodeBlock {
    pub const DEFAULT_LANGUAGE: &'static str = "text";

    /// Language name, falling back to `text` when absent or empty.
    pub fn effective_language(&self) -> &str {
        match self.language.as_deref() {
            Some(lang) if !lang.is_empty() => lang,
            _ => Self::DEFAULT_LANGUAGE,
        }
    }
}

/// Header row plus body rows. Rectangular by convention only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableBlock {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Shared payload of the `text`, `span` and `unknown` variants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InlineBlock {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Block>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<BlockStyle>,
}

impl InlineBlock {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn children(&self) -> &[Block] {
        self.children.as_deref().unwrap_or(&[])
    }

    pub fn style(&self) -> BlockStyle {
        self.style.clone().unwrap_or_default()
    }
}

/// Inline formatting flags read from (and written to) `style` attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    /// CSS color string, `null` in JSON when unset.
    pub color: Option<String>,
}

impl BlockStyle {
    /// True when no flag and no color is set.
    pub fn is_plain(&self) -> bool {
        !self.bold && !self.italic && !self.underline && self.color.is_none()
    }
}

/// Fieldless names of the block variants, used to request new blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockType {
    Heading,
    Paragraph,
    Text,
    Span,
    Break,
    List,
    Image,
    Code,
    Table,
    Unknown,
}

impl BlockType {
    pub const ALL: [BlockType; 10] = [
        BlockType::Heading,
        BlockType::Paragraph,
        BlockType::Text,
        BlockType::Span,
        BlockType::Break,
        BlockType::List,
        BlockType::Image,
        BlockType::Code,
        BlockType::Table,
        BlockType::Unknown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BlockType::Heading => "heading",
            BlockType::Paragraph => "paragraph",
            BlockType::Text => "text",
            BlockType::Span => "span",
            BlockType::Break => "break",
            BlockType::List => "list",
            BlockType::Image => "image",
            BlockType::Code => "code",
            BlockType::Table => "table",
            BlockType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown block type: {0}")]
pub struct UnknownBlockType(pub String);

impl FromStr for BlockType {
    type Err = UnknownBlockType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockType::ALL
            .into_iter()
            .find(|ty| ty.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownBlockType(s.to_string()))
    }
}

impl BlockKind {
    /// The variant name, or `None` for an unrecognized tag.
    pub fn block_type(&self) -> Option<BlockType> {
        Some(match self {
            BlockKind::Heading(_) => BlockType::Heading,
            BlockKind::Paragraph(_) => BlockType::Paragraph,
            BlockKind::Text(_) => BlockType::Text,
            BlockKind::Span(_) => BlockType::Span,
            BlockKind::Break => BlockType::Break,
            BlockKind::List(_) => BlockType::List,
            BlockKind::Image(_) => BlockType::Image,
            BlockKind::Code(_) => BlockType::Code,
            BlockKind::Table(_) => BlockType::Table,
            BlockKind::Unknown(_) => BlockType::Unknown,
            BlockKind::Unrecognized(_) => return None,
        })
    }
}

impl From<BlockKind> for Block {
    fn from(kind: BlockKind) -> Self {
        Self { id: None, kind }
    }
}

impl Block {
    pub fn new(kind: BlockKind) -> Self {
        kind.into()
    }

    pub fn heading(content: impl Into<String>, level: i64) -> Self {
        BlockKind::Heading(HeadingBlock {
            content: content.into(),
            level: Some(level),
        })
        .into()
    }

    pub fn paragraph(content: impl Into<String>) -> Self {
        BlockKind::Paragraph(ParagraphBlock::text(content)).into()
    }

    pub fn composite_paragraph(children: Vec<Block>) -> Self {
        BlockKind::Paragraph(ParagraphBlock::children(children)).into()
    }

    pub fn text(content: impl Into<String>) -> Self {
        BlockKind::Text(InlineBlock::text(content)).into()
    }

    pub fn line_break() -> Self {
        BlockKind::Break.into()
    }

    pub fn list(ordered: bool, items: Vec<String>) -> Self {
        BlockKind::List(ListBlock { ordered, items }).into()
    }

    pub fn code(language: Option<&str>, code: impl Into<String>) -> Self {
        BlockKind::Code(CodeBlock {
            language: language.map(str::to_string),
            code: code.into(),
        })
        .into()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Assigns a fresh UUID v4 as the block id.
    pub fn with_generated_id(self) -> Self {
        self.with_id(uuid::Uuid::new_v4().to_string())
    }

    /// Placeholder block the editor inserts for a newly requested type.
    pub fn template(block_type: BlockType) -> Self {
        let kind = match block_type {
            BlockType::Heading => BlockKind::Heading(HeadingBlock {
                content: "New Heading".to_string(),
                level: Some(HeadingBlock::DEFAULT_LEVEL),
            }),
            BlockType::Paragraph => BlockKind::Paragraph(ParagraphBlock::text("New paragraph...")),
            BlockType::Text => BlockKind::Text(InlineBlock::text(String::new())),
            BlockType::Span => BlockKind::Span(InlineBlock {
                children: Some(Vec::new()),
                style: Some(BlockStyle::default()),
                ..InlineBlock::default()
            }),
            BlockType::Break => BlockKind::Break,
            BlockType::List => BlockKind::List(ListBlock {
                ordered: false,
                items: vec!["New item".to_string()],
            }),
            BlockType::Image => BlockKind::Image(ImageBlock {
                src: "https://via.placeholder.com/300".to_string(),
                alt: Some(String::new()),
                caption: Some(String::new()),
            }),
            BlockType::Code => BlockKind::Code(CodeBlock {
                language: Some(CodeBlock::DEFAULT_LANGUAGE.to_string()),
                code: "/* code */".to_string(),
            }),
            BlockType::Table => BlockKind::Table(TableBlock {
                headers: vec!["Col 1".to_string(), "Col 2".to_string()],
                rows: vec![vec![String::new(), String::new()]],
            }),
            BlockType::Unknown => BlockKind::Unknown(InlineBlock::default()),
        };
        kind.into()
    }

    pub fn block_type(&self) -> Option<BlockType> {
        self.kind.block_type()
    }

    pub fn is_heading(&self) -> bool {
        matches!(self.kind, BlockKind::Heading(_))
    }

    pub fn is_paragraph(&self) -> bool {
        matches!(self.kind, BlockKind::Paragraph(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, BlockKind::Text(_))
    }

    pub fn is_span(&self) -> bool {
        matches!(self.kind, BlockKind::Span(_))
    }

    pub fn is_break(&self) -> bool {
        matches!(self.kind, BlockKind::Break)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self.kind, BlockKind::Unknown(_) | BlockKind::Unrecognized(_))
    }

    pub fn as_heading(&self) -> Option<&HeadingBlock> {
        match &self.kind {
            BlockKind::Heading(heading) => Some(heading),
            _ => None,
        }
    }

    pub fn as_paragraph(&self) -> Option<&ParagraphBlock> {
        match &self.kind {
            BlockKind::Paragraph(paragraph) => Some(paragraph),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&InlineBlock> {
        match &self.kind {
            BlockKind::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Payload of any inline-shaped variant (`text`, `span`, `unknown`).
    pub fn as_inline(&self) -> Option<&InlineBlock> {
        match &self.kind {
            BlockKind::Text(inline) | BlockKind::Span(inline) | BlockKind::Unknown(inline) => {
                Some(inline)
            }
            _ => None,
        }
    }

    /// Concatenated textual content of this block and its descendants.
    pub fn plain_text(&self) -> String {
        match &self.kind {
            BlockKind::Heading(heading) => heading.content.clone(),
            BlockKind::Paragraph(paragraph) => match &paragraph.content {
                ParagraphContent::Text(text) => text.clone(),
                ParagraphContent::Children(children) => concat_plain_text(children),
            },
            BlockKind::Text(inline) | BlockKind::Span(inline) | BlockKind::Unknown(inline) => {
                match &inline.content {
                    Some(content) => content.clone(),
                    None => concat_plain_text(inline.children()),
                }
            }
            BlockKind::Break => "\n".to_string(),
            BlockKind::List(list) => list.items.join("\n"),
            BlockKind::Image(image) => image
                .caption
                .clone()
                .or_else(|| image.alt.clone())
                .unwrap_or_default(),
            BlockKind::Code(code) => code.code.clone(),
            BlockKind::Table(table) => std::iter::once(&table.headers)
                .chain(table.rows.iter())
                .map(|row| row.join("\t"))
                .collect::<Vec<_>>()
                .join("\n"),
            BlockKind::Unrecognized(_) => String::new(),
        }
    }
}

pub(crate) fn concat_plain_text(blocks: &[Block]) -> String {
    blocks.iter().map(Block::plain_text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn heading_defaults_when_fields_missing() {
        let block: Block = serde_json::from_value(json!({ "type": "heading" })).unwrap();
        let heading = block.as_heading().unwrap();
        assert_eq!(heading.content, "");
        assert_eq!(heading.level, None);
        assert_eq!(heading.effective_level(), 2);
    }

    #[rstest]
    #[case(Some(9), 6)]
    #[case(Some(0), 1)]
    #[case(Some(-4), 1)]
    #[case(Some(3), 3)]
    #[case(None, 2)]
    fn heading_level_is_clamped(#[case] level: Option<i64>, #[case] expected: u8) {
        let heading = HeadingBlock {
            content: "X".to_string(),
            level,
        };
        assert_eq!(heading.effective_level(), expected);
    }

    #[test]
    fn id_sits_beside_type_tag() {
        let block = Block::text("hello").with_id("b1");
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(
            value,
            json!({ "id": "b1", "type": "text", "content": "hello" })
        );
    }

    #[test]
    fn break_serializes_without_payload() {
        let value = serde_json::to_value(Block::line_break()).unwrap();
        assert_eq!(value, json!({ "type": "break" }));
    }

    #[test]
    fn unrecognized_tag_is_absorbed() {
        let block: Block =
            serde_json::from_value(json!({ "type": "bogus", "whatever": 1 })).unwrap();
        assert!(matches!(block.kind, BlockKind::Unrecognized(_)));
        assert_eq!(block.block_type(), None);
        assert!(block.is_unknown());
    }

    #[rstest]
    #[case(json!({ "id": "y", "type": "bogus", "n": 1 }))]
    #[case(json!({ "type": "gallery", "images": [{ "src": "a.png" }], "meta": null }))]
    #[case(json!({ "id": 7, "type": "Heading", "content": "tag is case-sensitive" }))]
    #[case(json!({ "content": "no type at all" }))]
    fn unrecognized_object_is_written_back_unchanged(#[case] original: Value) {
        let block: Block = serde_json::from_value(original.clone()).unwrap();
        assert!(matches!(block.kind, BlockKind::Unrecognized(_)));
        assert_eq!(serde_json::to_value(&block).unwrap(), original);
    }

    #[test]
    fn unrecognized_keeps_string_id_on_block() {
        let block: Block = serde_json::from_value(json!({ "id": "y", "type": "bogus" })).unwrap();
        assert_eq!(block.id.as_deref(), Some("y"));
    }

    #[test]
    fn style_color_serializes_as_null() {
        let block = Block::new(BlockKind::Span(InlineBlock {
            children: Some(vec![Block::text("a")]),
            style: Some(BlockStyle {
                bold: true,
                ..BlockStyle::default()
            }),
            ..InlineBlock::default()
        }));
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(
            value["style"],
            json!({ "bold": true, "italic": false, "underline": false, "color": null })
        );
    }

    #[test]
    fn list_ordered_defaults_to_false() {
        let block: Block =
            serde_json::from_value(json!({ "type": "list", "items": ["a"] })).unwrap();
        match block.kind {
            BlockKind::List(list) => {
                assert!(!list.ordered);
                assert_eq!(list.items, vec!["a".to_string()]);
            }
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn predicates_narrow_variants() {
        let heading = Block::heading("Title", 1);
        assert!(heading.is_heading());
        assert!(!heading.is_paragraph());
        assert!(heading.as_text().is_none());

        let text = Block::text("body");
        assert!(text.is_text());
        assert_eq!(text.as_text().unwrap().content.as_deref(), Some("body"));
        assert!(text.as_inline().is_some());

        let paragraph = Block::paragraph("p");
        assert!(paragraph.is_paragraph());
        assert!(paragraph.as_heading().is_none());
    }

    #[test]
    fn code_language_falls_back_to_text() {
        let mut code = CodeBlock {
            language: None,
            code: String::new(),
        };
        assert_eq!(code.effective_language(), "text");
        code.language = Some(String::new());
        assert_eq!(code.effective_language(), "text");
        code.language = Some("rust".to_string());
        assert_eq!(code.effective_language(), "rust");
    }

    #[test]
    fn block_type_parses_case_insensitively() {
        assert_eq!("Heading".parse::<BlockType>(), Ok(BlockType::Heading));
        assert_eq!(" table ".parse::<BlockType>(), Ok(BlockType::Table));
        assert!("quote".parse::<BlockType>().is_err());
    }

    #[test]
    fn templates_match_their_type() {
        for block_type in BlockType::ALL {
            assert_eq!(Block::template(block_type).block_type(), Some(block_type));
        }
        assert_eq!(
            Block::template(BlockType::Heading).plain_text(),
            "New Heading"
        );
    }

    #[test]
    fn generated_ids_are_distinct() {
        let a = Block::template(BlockType::Text).with_generated_id();
        let b = Block::template(BlockType::Text).with_generated_id();
        assert!(a.id.is_some());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn plain_text_walks_children() {
        let paragraph = Block::composite_paragraph(vec![
            Block::text("Hello "),
            Block::new(BlockKind::Span(InlineBlock {
                children: Some(vec![Block::text("world")]),
                ..InlineBlock::default()
            })),
        ]);
        assert_eq!(paragraph.plain_text(), "Hello world");
    }
}
