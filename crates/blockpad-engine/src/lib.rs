pub mod editing;
pub mod markup;
pub mod model;
pub mod parsing;
pub mod render;
pub mod sanitize;

// Re-export key types for easier usage
pub use editing::{AutosaveClock, Cmd, Debouncer, EditorSession, History, Patch};
pub use model::{Block, BlockKind, BlockType, Document, DocumentError};
pub use parsing::{parse_html, parse_node};
pub use render::{ExportOptions, HtmlRenderer, ParagraphTag, RenderOptions};
pub use sanitize::{Preview, PreviewUpdate, sanitize_fragment};
