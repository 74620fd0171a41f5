use log::{debug, info};

use super::{Cmd, History, Patch};
use crate::model::{Document, DocumentError, document};
use crate::parsing;
use crate::render::{ExportOptions, HtmlRenderer, RenderOptions, standalone_document};
use crate::sanitize::Preview;

/// Live editing state: the working document, its history and the preview.
///
/// Edits go through [`EditorSession::apply`] and are only snapshotted when
/// the caller commits, which lets a shell debounce history capture.
#[derive(Debug, Clone)]
pub struct EditorSession {
    document: Document,
    history: History,
    preview: Preview,
    renderer: HtmlRenderer,
    version: u64,
}

impl EditorSession {
    pub fn new(options: RenderOptions) -> Self {
        Self::with_document(Document::new(), options)
    }

    /// Start from `document`, recorded as the first history entry.
    pub fn with_document(document: Document, options: RenderOptions) -> Self {
        let mut session = Self {
            document,
            history: History::new(),
            preview: Preview::new(),
            renderer: HtmlRenderer::new(options),
            version: 0,
        };
        session.history.record(&session.document);
        session.refresh_preview();
        session
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn preview(&self) -> &Preview {
        &self.preview
    }

    pub fn render_options(&self) -> RenderOptions {
        self.renderer.options()
    }

    /// Monotonic counter bumped on every change to the live document.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// True when the live document differs from the history cursor.
    pub fn is_dirty(&self) -> bool {
        self.history.current() != Some(&self.document)
    }

    /// Apply a command to the live document without recording history.
    pub fn apply(&mut self, cmd: Cmd) -> Patch {
        let changed = cmd.apply_to(&mut self.document);
        if changed {
            self.version += 1;
            self.refresh_preview();
        }
        Patch {
            changed,
            version: self.version,
        }
    }

    /// Snapshot the live document into history.
    pub fn commit(&mut self) -> bool {
        self.history.record(&self.document)
    }

    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        self.document = snapshot.clone();
        self.loaded_from_history();
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        self.document = snapshot.clone();
        self.loaded_from_history();
        true
    }

    /// Replace the document with one decoded from JSON and commit it.
    ///
    /// On error the session is left untouched.
    pub fn import_json(&mut self, source: &str) -> Result<(), DocumentError> {
        let imported = document::from_json(source)?;
        info!("imported document with {} blocks", imported.len());
        self.apply(Cmd::Replace { document: imported });
        self.commit();
        Ok(())
    }

    /// Rebuild the document from live editor markup.
    pub fn load_markup(&mut self, source: &str) -> Patch {
        let parsed = parsing::parse_html(source);
        debug!("parsed {} blocks from markup", parsed.len());
        self.apply(Cmd::Replace { document: parsed })
    }

    /// Escaped HTML fragment for the live document.
    pub fn render_fragment(&self) -> String {
        self.renderer.render_document(&self.document)
    }

    pub fn export_html(&self, options: &ExportOptions) -> String {
        standalone_document(&self.render_fragment(), options)
    }

    fn loaded_from_history(&mut self) {
        self.version += 1;
        self.refresh_preview();
    }

    fn refresh_preview(&mut self) {
        let fragment = self.render_fragment();
        self.preview.update(&fragment);
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, BlockType};
    use crate::render::ParagraphTag;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_session_records_initial_snapshot() {
        let session = EditorSession::default();
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history().index(), Some(0));
        assert!(!session.is_dirty());
    }

    #[test]
    fn apply_does_not_record_until_commit() {
        let mut session = EditorSession::default();
        let patch = session.apply(Cmd::AddBlock {
            kind: BlockType::Paragraph,
        });

        assert_eq!(patch, Patch { changed: true, version: 1 });
        assert_eq!(session.history().len(), 1);
        assert!(session.is_dirty());

        assert!(session.commit());
        assert!(!session.commit());
        assert_eq!(session.history().len(), 2);
    }

    #[test]
    fn unchanged_command_keeps_version() {
        let mut session = EditorSession::default();
        let patch = session.apply(Cmd::RemoveBlock { at: 0 });
        assert_eq!(patch, Patch { changed: false, version: 0 });
    }

    #[test]
    fn undo_redo_restore_independent_copies() {
        let mut session = EditorSession::with_document(
            vec![Block::paragraph("one")],
            RenderOptions::default(),
        );
        session.apply(Cmd::InsertBlock {
            at: 1,
            block: Block::paragraph("two"),
        });
        session.commit();

        assert!(session.undo());
        assert_eq!(session.document(), &vec![Block::paragraph("one")]);
        assert!(!session.undo());

        session.apply(Cmd::UpdateBlock {
            at: 0,
            block: Block::paragraph("edited live"),
        });
        assert_eq!(
            session.history().entries()[0].content,
            vec![Block::paragraph("one")]
        );

        assert!(session.redo());
        assert_eq!(session.document().len(), 2);
        assert!(!session.redo());
    }

    #[test]
    fn import_failure_leaves_document() {
        let mut session = EditorSession::with_document(
            vec![Block::heading("keep", 1)],
            RenderOptions::default(),
        );
        let before = session.document().clone();

        assert!(session.import_json("{\"type\":\"heading\"}").is_err());
        assert!(session.import_json("not json").is_err());
        assert_eq!(session.document(), &before);
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn import_success_replaces_and_commits() {
        let mut session = EditorSession::default();
        session
            .import_json(r#"[{"type":"heading","content":"Title","level":1}]"#)
            .unwrap();
        assert_eq!(session.document(), &vec![Block::heading("Title", 1)]);
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.preview().html(), "<h1>Title</h1>");
    }

    #[test]
    fn load_markup_parses_editor_html() {
        let mut session = EditorSession::default();
        let patch = session.load_markup("<p>Body</p><br>");
        assert!(patch.changed);
        assert_eq!(
            session.document(),
            &vec![
                Block::composite_paragraph(vec![Block::text("Body")]),
                Block::line_break(),
            ]
        );
        assert_eq!(session.render_fragment(), "<p><span>Body</span></p>\n<br/>");
    }

    #[test]
    fn render_honours_paragraph_tag() {
        let session = EditorSession::with_document(
            vec![Block::paragraph("x")],
            RenderOptions {
                paragraph_tag: ParagraphTag::Div,
            },
        );
        assert_eq!(session.render_fragment(), "<div>x</div>");
    }

    #[test]
    fn export_wraps_fragment() {
        let session = EditorSession::with_document(
            vec![Block::paragraph("x")],
            RenderOptions::default(),
        );
        let html = session.export_html(&ExportOptions::default());
        assert!(html.starts_with("<!doctype html>"));
        assert!(html.contains("<p>x</p>"));
    }
}
