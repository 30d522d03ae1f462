//! Editor session state.
//!
//! [`FormBuilderState`] is the root of all state for one open editor
//! session: the live document, the current selection, the bounded
//! undo/redo stacks, and the unsaved-changes flag. It is created when the
//! editor opens (from a loaded or default document) and discarded when the
//! session ends; persistence is the host's concern.
//!
//! All mutation flows through [`crate::reducer::apply`]. Snapshots on the
//! history stacks are independent clones; a retained snapshot is never
//! mutated in place.

use formdef_model::{FieldId, FormDefinition};

/// Maximum retained undo snapshots. Bounds session memory.
pub const HISTORY_LIMIT: usize = 50;

/// The state of one form-builder session.
#[derive(Debug, Clone)]
pub struct FormBuilderState {
    /// The live document.
    pub(crate) document: FormDefinition,
    /// Field currently selected in the canvas, if any.
    pub(crate) selected_field: Option<FieldId>,
    /// Page currently shown in the canvas.
    pub(crate) selected_page: usize,
    /// Pre-command snapshots, oldest first.
    pub(crate) undo_stack: Vec<FormDefinition>,
    /// Undone snapshots, restored by Redo until the next edit clears them.
    pub(crate) redo_stack: Vec<FormDefinition>,
    /// Whether the document has changed since the last MarkSaved.
    pub(crate) dirty: bool,
}

impl FormBuilderState {
    /// Open a session on a fresh default document.
    pub fn new(form_name: impl Into<String>) -> Self {
        Self::with_document(FormDefinition::new(form_name))
    }

    /// Open a session on a previously persisted document.
    ///
    /// The seed is sanitized first so a damaged document still opens as
    /// the closest valid one.
    pub fn from_document(mut seed: FormDefinition) -> Self {
        seed.sanitize();
        Self::with_document(seed)
    }

    fn with_document(document: FormDefinition) -> Self {
        Self {
            document,
            selected_field: None,
            selected_page: 0,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            dirty: false,
        }
    }

    /// The live document, e.g. for rendering or serialization.
    pub fn document(&self) -> &FormDefinition {
        &self.document
    }

    pub fn selected_field(&self) -> Option<&FieldId> {
        self.selected_field.as_ref()
    }

    pub fn selected_page(&self) -> usize {
        self.selected_page
    }

    #[inline]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    #[inline]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Current undo depth; exposed for the history indicator.
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Record the current document as the undo point for the command
    /// about to run: push a snapshot, trim the oldest past the cap, and
    /// invalidate redo history.
    pub(crate) fn push_snapshot(&mut self) {
        self.undo_stack.push(self.document.clone());
        if self.undo_stack.len() > HISTORY_LIMIT {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }

    /// Clamp the selected page into the valid range after page removal.
    pub(crate) fn clamp_selection(&mut self) {
        if self.selected_page >= self.document.pages.len() {
            self.selected_page = self.document.pages.len().saturating_sub(1);
        }
    }
}

impl Default for FormBuilderState {
    fn default() -> Self {
        Self::new("Untitled form")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_clean() {
        let state = FormBuilderState::default();
        assert!(!state.is_dirty());
        assert!(!state.can_undo());
        assert!(!state.can_redo());
        assert_eq!(state.selected_page(), 0);
        assert!(state.selected_field().is_none());
    }

    #[test]
    fn snapshot_cap_drops_oldest() {
        let mut state = FormBuilderState::default();
        for i in 0..(HISTORY_LIMIT + 5) {
            state.document.name = format!("rev {}", i);
            state.push_snapshot();
        }
        assert_eq!(state.undo_depth(), HISTORY_LIMIT);
        // 55 pushes, cap 50: revisions 0-4 were discarded.
        assert_eq!(state.undo_stack[0].name, "rev 5");
    }

    #[test]
    fn from_document_sanitizes_seed() {
        let mut seed = FormDefinition::new("f");
        seed.pages.clear();
        let state = FormBuilderState::from_document(seed);
        assert_eq!(state.document().pages.len(), 1);
        assert!(state.document().validate().is_ok());
    }
}
