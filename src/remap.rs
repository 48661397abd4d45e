//! Position remapping through document edits.
//!
//! The editing surface describes each change as a [`TextEdit`] (or an ordered
//! [`EditBatch`]). Anything that can map an old offset to a new one is a
//! [`PositionRemap`], including plain closures.

use similar::{ChangeTag, TextDiff};

/// Which side of an insertion point a position sticks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    /// Stay before text inserted at this position. Used for span ends.
    Before,
    /// Move past text inserted at this position. Used for span starts.
    After,
}

/// Maps offsets in the old document to offsets in the edited document.
pub trait PositionRemap {
    fn remap(&self, pos: usize, assoc: Assoc) -> usize;
}

/// Opaque remapping functions ignore association.
impl<F> PositionRemap for F
where
    F: Fn(usize) -> usize + ?Sized,
{
    fn remap(&self, pos: usize, _assoc: Assoc) -> usize {
        self(pos)
    }
}

/// A single replace operation: `[start, old_end)` became `[start, new_end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextEdit {
    pub start: usize,
    pub old_end: usize,
    pub new_end: usize,
}

/// Apply a signed delta to a byte position, clamping at zero.
fn apply_delta(position: usize, delta: i64) -> usize {
    (position as i64).saturating_add(delta).max(0) as usize
}

impl TextEdit {
    pub fn new(start: usize, old_end: usize, new_end: usize) -> Self {
        Self {
            start,
            old_end,
            new_end,
        }
    }

    /// Insert `len` bytes at `at`.
    pub fn insert(at: usize, len: usize) -> Self {
        Self::new(at, at, at + len)
    }

    /// Delete the range `[start, end)`.
    pub fn delete(start: usize, end: usize) -> Self {
        Self::new(start, end, start)
    }

    /// Byte delta (positive for insertion, negative for deletion).
    pub fn delta(&self) -> i64 {
        self.new_end as i64 - self.old_end as i64
    }

    pub fn is_insertion_only(&self) -> bool {
        self.start == self.old_end
    }
}

impl PositionRemap for TextEdit {
    fn remap(&self, pos: usize, assoc: Assoc) -> usize {
        if pos < self.start {
            return pos;
        }

        if self.is_insertion_only() {
            // Only the insertion point itself is ambiguous
            return match (pos == self.start, assoc) {
                (true, Assoc::Before) => pos,
                _ => apply_delta(pos, self.delta()),
            };
        }

        if pos >= self.old_end {
            apply_delta(pos, self.delta())
        } else if pos == self.start {
            // A span starting exactly where a replacement starts keeps the
            // replacement text; a pure insertion at that point does not.
            pos
        } else {
            // Strictly inside the replaced range
            match assoc {
                Assoc::Before => self.start,
                Assoc::After => self.new_end,
            }
        }
    }
}

/// Edits applied one after another; each is expressed in the coordinates
/// produced by the edits before it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditBatch {
    edits: Vec<TextEdit>,
}

impl EditBatch {
    pub fn new(edits: Vec<TextEdit>) -> Self {
        Self { edits }
    }

    pub fn push(&mut self, edit: TextEdit) {
        self.edits.push(edit);
    }

    pub fn edits(&self) -> &[TextEdit] {
        &self.edits
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Reconstruct the edits that turn `old_text` into `new_text`.
    ///
    /// Uses a character-level diff with byte offsets. Each run of adjacent
    /// deletions and insertions becomes one edit. Identical texts produce an
    /// empty batch.
    pub fn from_texts(old_text: &str, new_text: &str) -> Self {
        let mut batch = Self::default();
        if old_text == new_text {
            return batch;
        }

        // NOTE: from_chars() keeps edits tight; from_lines() would widen every
        // edit to whole lines and over-collapse spans.
        let diff = TextDiff::from_chars(old_text, new_text);

        // Offset in the partially edited document: earlier runs are already
        // applied, so everything before `cursor` is in new-text coordinates.
        let mut cursor = 0;
        let mut pending: Option<TextEdit> = None;

        for change in diff.iter_all_changes() {
            let len = change.value().len();
            match change.tag() {
                ChangeTag::Equal => {
                    if let Some(edit) = pending.take() {
                        cursor = edit.new_end;
                        batch.push(edit);
                    }
                    cursor += len;
                }
                ChangeTag::Delete => {
                    let edit = pending.get_or_insert(TextEdit::new(cursor, cursor, cursor));
                    edit.old_end += len;
                }
                ChangeTag::Insert => {
                    let edit = pending.get_or_insert(TextEdit::new(cursor, cursor, cursor));
                    edit.new_end += len;
                }
            }
        }

        if let Some(edit) = pending {
            batch.push(edit);
        }
        batch
    }
}

impl From<TextEdit> for EditBatch {
    fn from(edit: TextEdit) -> Self {
        Self::new(vec![edit])
    }
}

impl PositionRemap for EditBatch {
    fn remap(&self, pos: usize, assoc: Assoc) -> usize {
        self.edits
            .iter()
            .fold(pos, |pos, edit| edit.remap(pos, assoc))
    }
}
