/*!
 * # Editing
 *
 * State changes to a [`Document`](crate::model::Document) while it is being
 * edited.
 *
 * - **`commands`**: `Cmd` enum of structural edits and the `move_item`
 *   reordering helper used for drag-and-drop
 * - **`patch`**: what an applied command changed
 * - **`history`**: linear undo/redo log of independent snapshots
 * - **`schedule`**: debounce and autosave hooks driven by caller-supplied
 *   instants
 * - **`session`**: `EditorSession`, the live document tying the above
 *   together with a renderer and a sanitized preview
 *
 * ```rust
 * use blockpad_engine::editing::*;
 * use blockpad_engine::model::BlockType;
 *
 * let mut session = EditorSession::default();
 * let patch = session.apply(Cmd::AddBlock { kind: BlockType::Heading });
 * assert!(patch.changed);
 *
 * // History only moves when the shell commits (usually debounced).
 * session.commit();
 * assert!(session.undo());
 * assert!(session.document().is_empty());
 * ```
 */

pub mod commands;
pub mod history;
pub mod patch;
pub mod schedule;
pub mod session;

pub use commands::{Cmd, move_item};
pub use history::{History, HistoryEntry};
pub use patch::Patch;
pub use schedule::{AutosaveClock, Debouncer};
pub use session::EditorSession;
