pub mod block;
pub mod document;
pub mod paragraph;

pub use block::{
    Block, BlockKind, BlockStyle, BlockType, CodeBlock, HeadingBlock, ImageBlock, InlineBlock,
    ListBlock, TableBlock, UnknownBlockType,
};
pub use document::{Document, DocumentError};
pub use paragraph::{ParagraphBlock, ParagraphContent};
