//! Command vocabulary of the form builder.
//!
//! Every edit the UI can perform is one variant of [`Command`], processed
//! atomically by [`crate::reducer::apply`]. Partial updates travel as
//! explicit patch records: a `Some` field is installed, a `None` field is
//! left untouched (shallow merge).

use formdef_model::{
    ChoiceOption, ConditionGroup, FieldId, FieldStyle, FieldType, FieldWidth, FormMode, PageId,
};

/// A discrete, named state-transition request.
#[derive(Debug, Clone)]
pub enum Command {
    // =========================================================================
    // Field structure
    // =========================================================================
    /// Create a field of `field_type` on `page_index`, inserted after
    /// `after_field_id` when given, else at the end of the page.
    AddField {
        field_type: FieldType,
        page_index: usize,
        after_field_id: Option<FieldId>,
    },
    /// Delete a field everywhere it is referenced.
    RemoveField { field_id: FieldId },
    /// Shallow-merge a patch into one field.
    UpdateField { field_id: FieldId, patch: FieldPatch },
    /// Clone a field (fresh id and name, "(Copy)" label) right after the
    /// source on the same page.
    DuplicateField { field_id: FieldId },
    /// Replace a page's field order wholesale. The caller supplies a true
    /// permutation of the page's current ids.
    ReorderFields {
        page_index: usize,
        order: Vec<FieldId>,
    },
    /// Move a field to another page, at `target_index` or the end.
    MoveFieldToPage {
        field_id: FieldId,
        target_page_index: usize,
        target_index: Option<usize>,
    },

    // =========================================================================
    // Page structure
    // =========================================================================
    /// Insert an empty page after `after_index` (default: at the end).
    AddPage {
        after_index: Option<usize>,
        title: Option<String>,
    },
    /// Remove a page, re-homing its fields onto the adjacent page.
    /// No-op when only one page remains.
    RemovePage { page_index: usize },
    /// Shallow-merge a patch into one page's metadata.
    UpdatePage { page_index: usize, patch: PagePatch },
    /// Reorder pages by id sequence; unknown ids are dropped.
    ReorderPages { order: Vec<PageId> },
    /// Switch between single-page and multi-step rendering.
    SetFormMode { mode: FormMode },

    // =========================================================================
    // Document-level settings
    // =========================================================================
    UpdateStyling { patch: StylingPatch },
    UpdateSettings { patch: SettingsPatch },

    // =========================================================================
    // Session state (no history effect)
    // =========================================================================
    SelectField { field_id: Option<FieldId> },
    SelectPage { page_index: usize },

    // =========================================================================
    // History
    // =========================================================================
    Undo,
    Redo,
    /// Clear the dirty flag after the host persists the document.
    MarkSaved,
}

/// Three-state edit of a field's visibility rule.
#[derive(Debug, Clone)]
pub enum VisibilityPatch {
    Set(ConditionGroup),
    Clear,
}

/// Partial update of a single field. Fields that do not apply to the
/// target's kind (options on a text field, placeholder on a divider) are
/// silently ignored.
#[derive(Debug, Clone, Default)]
pub struct FieldPatch {
    pub label: Option<String>,
    /// Requested machine name; de-duplicated against the document on
    /// application.
    pub name: Option<String>,
    pub width: Option<FieldWidth>,
    pub required: Option<bool>,
    pub placeholder: Option<Option<String>>,
    pub options: Option<Vec<ChoiceOption>>,
    pub visibility: Option<VisibilityPatch>,
    pub style: Option<FieldStyle>,
}

impl FieldPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_width(mut self, width: FieldWidth) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn with_placeholder(mut self, placeholder: Option<String>) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    pub fn with_options(mut self, options: Vec<ChoiceOption>) -> Self {
        self.options = Some(options);
        self
    }

    pub fn with_visibility(mut self, group: ConditionGroup) -> Self {
        self.visibility = Some(VisibilityPatch::Set(group));
        self
    }

    pub fn clearing_visibility(mut self) -> Self {
        self.visibility = Some(VisibilityPatch::Clear);
        self
    }

    pub fn with_style(mut self, style: FieldStyle) -> Self {
        self.style = Some(style);
        self
    }
}

/// Partial update of a page's metadata.
#[derive(Debug, Clone, Default)]
pub struct PagePatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
}

impl PagePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }
}

/// Partial update of the form-wide styling.
#[derive(Debug, Clone, Default)]
pub struct StylingPatch {
    pub primary_color: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub font_family: Option<String>,
    pub border_radius: Option<u16>,
    pub field_spacing: Option<u16>,
}

/// Partial update of the fill-time settings.
#[derive(Debug, Clone, Default)]
pub struct SettingsPatch {
    pub submit_label: Option<String>,
    pub confirmation_message: Option<String>,
    pub redirect_url: Option<Option<String>>,
    pub notification_email: Option<Option<String>>,
    pub save_progress: Option<bool>,
    pub show_page_numbers: Option<bool>,
}

impl Command {
    /// Whether this command edits document content or structure, and so
    /// participates in undo history.
    pub fn is_content_command(&self) -> bool {
        !matches!(
            self,
            Command::SelectField { .. }
                | Command::SelectPage { .. }
                | Command::Undo
                | Command::Redo
                | Command::MarkSaved
        )
    }
}
