//! Structural edits over a [`Document`].

use log::trace;

use crate::model::{Block, BlockType, Document};

/// A single document edit.
///
/// Out-of-range indices are clamped for insertions and moves, and ignored
/// for removals and updates.
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    /// Append a template block of the given type with a fresh id.
    AddBlock { kind: BlockType },
    InsertBlock { at: usize, block: Block },
    RemoveBlock { at: usize },
    UpdateBlock { at: usize, block: Block },
    MoveBlock { from: usize, to: usize },
    Replace { document: Document },
    Clear,
}

impl Cmd {
    /// Apply to `document`, returning whether anything changed.
    pub fn apply_to(self, document: &mut Document) -> bool {
        trace!("apply {self:?}");
        match self {
            Cmd::AddBlock { kind } => {
                document.push(Block::template(kind).with_generated_id());
                true
            }
            Cmd::InsertBlock { at, block } => {
                let at = at.min(document.len());
                document.insert(at, block);
                true
            }
            Cmd::RemoveBlock { at } => {
                if at < document.len() {
                    document.remove(at);
                    true
                } else {
                    false
                }
            }
            Cmd::UpdateBlock { at, block } => match document.get_mut(at) {
                Some(slot) if *slot != block => {
                    *slot = block;
                    true
                }
                _ => false,
            },
            Cmd::MoveBlock { from, to } => move_item(document, from, to),
            Cmd::Replace { document: next } => {
                if *document == next {
                    false
                } else {
                    *document = next;
                    true
                }
            }
            Cmd::Clear => {
                let changed = !document.is_empty();
                document.clear();
                changed
            }
        }
    }
}

/// Move the element at `from` so it ends up at `to` within the same list.
///
/// Both indices are clamped to the last position. Returns `false` for an
/// empty list or when the move leaves the order unchanged.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    let Some(last) = items.len().checked_sub(1) else {
        return false;
    };
    let (from, to) = (from.min(last), to.min(last));
    if from == to {
        return false;
    }
    let item = items.remove(from);
    items.insert(to, item);
    true
}
