//! The single state-transition function of the form builder.
//!
//! [`apply`] processes one [`Command`] atomically against a
//! [`FormBuilderState`]. Every content/structure command first records the
//! pre-command document as an undo snapshot (trimming the oldest past the
//! cap and invalidating redo history), then installs the new document and
//! marks the session dirty. Commands that reference a missing id degrade
//! to a no-op: the UI is the sole command source, so a stale reference is
//! an ignorable race, not an error.

use formdef_model::{FieldConfig, FieldId, FieldType, FormMode, FormPage, PageId, unique_name};

use crate::command::{
    Command, FieldPatch, PagePatch, SettingsPatch, StylingPatch, VisibilityPatch,
};
use crate::state::FormBuilderState;

/// Apply one command to the session state.
pub fn apply(state: &mut FormBuilderState, command: Command) {
    match command {
        Command::AddField {
            field_type,
            page_index,
            after_field_id,
        } => add_field(state, field_type, page_index, after_field_id),
        Command::RemoveField { field_id } => remove_field(state, field_id),
        Command::UpdateField { field_id, patch } => update_field(state, field_id, patch),
        Command::DuplicateField { field_id } => duplicate_field(state, field_id),
        Command::ReorderFields { page_index, order } => reorder_fields(state, page_index, order),
        Command::MoveFieldToPage {
            field_id,
            target_page_index,
            target_index,
        } => move_field_to_page(state, field_id, target_page_index, target_index),
        Command::AddPage { after_index, title } => add_page(state, after_index, title),
        Command::RemovePage { page_index } => remove_page(state, page_index),
        Command::UpdatePage { page_index, patch } => update_page(state, page_index, patch),
        Command::ReorderPages { order } => reorder_pages(state, order),
        Command::SetFormMode { mode } => set_form_mode(state, mode),
        Command::UpdateStyling { patch } => update_styling(state, patch),
        Command::UpdateSettings { patch } => update_settings(state, patch),
        Command::SelectField { field_id } => select_field(state, field_id),
        Command::SelectPage { page_index } => select_page(state, page_index),
        Command::Undo => undo(state),
        Command::Redo => redo(state),
        Command::MarkSaved => mark_saved(state),
    }
}

fn add_field(
    state: &mut FormBuilderState,
    field_type: FieldType,
    page_index: usize,
    after_field_id: Option<FieldId>,
) {
    if state.document.page(page_index).is_none() {
        tracing::warn!(page_index, "AddField targets a missing page");
        return;
    }
    state.push_snapshot();

    let field = FieldConfig::new(field_type, &state.document.field_names(None));
    let field_id = field.id.clone();
    state
        .document
        .insert_field(page_index, field, after_field_id.as_ref());
    state.document.touch();
    state.selected_field = Some(field_id.clone());
    state.dirty = true;
    tracing::debug!(%field_id, field_type = %field_type, page_index, "added field");
}

fn remove_field(state: &mut FormBuilderState, field_id: FieldId) {
    if state.document.field(&field_id).is_none() {
        tracing::warn!(%field_id, "RemoveField targets a missing field");
        return;
    }
    state.push_snapshot();

    state.document.remove_field(&field_id);
    if state.selected_field.as_ref() == Some(&field_id) {
        state.selected_field = None;
    }
    state.document.touch();
    state.dirty = true;
    tracing::debug!(%field_id, "removed field");
}

fn update_field(
    state: &mut FormBuilderState,
    field_id: FieldId,
    patch: FieldPatch,
) {
    if state.document.field(&field_id).is_none() {
        tracing::warn!(%field_id, "UpdateField targets a missing field");
        return;
    }
    state.push_snapshot();

    // Renames go through unique-name generation against the rest of the
    // document so the uniqueness invariant holds for every command.
    let new_name = patch.name.as_ref().and_then(|requested| {
        let requested = requested.trim();
        if requested.is_empty() {
            return None;
        }
        let others = state.document.field_names(Some(&field_id));
        Some(unique_name(requested, &others))
    });

    let Some(field) = state.document.field_mut(&field_id) else {
        return;
    };
    if let Some(label) = patch.label {
        field.label = label;
    }
    if let Some(name) = new_name {
        field.name = name;
    }
    if let Some(width) = patch.width {
        field.width = width;
    }
    if let Some(required) = patch.required {
        field.set_required(required);
    }
    if let Some(placeholder) = patch.placeholder {
        field.set_placeholder(placeholder);
    }
    if let Some(options) = patch.options {
        field.set_options(options);
    }
    if let Some(style) = patch.style {
        field.style = style;
    }
    match patch.visibility {
        Some(VisibilityPatch::Set(mut group)) => {
            // A rule must not depend on its own field's answer.
            group.retain_targets_except(&field_id);
            field.conditional_visibility = Some(group);
        }
        Some(VisibilityPatch::Clear) => field.conditional_visibility = None,
        None => {}
    }

    state.document.touch();
    state.dirty = true;
    tracing::debug!(%field_id, "updated field");
}

fn duplicate_field(state: &mut FormBuilderState, field_id: FieldId) {
    let Some(page_index) = state.document.page_index_of(&field_id) else {
        tracing::warn!(%field_id, "DuplicateField targets a missing field");
        return;
    };
    state.push_snapshot();

    let Some(source) = state.document.field(&field_id).cloned() else {
        return;
    };
    let mut clone = source.clone();
    clone.id = FieldId::generate();
    clone.name = state.document.unique_field_name(&source.name);
    clone.label = format!("{} (Copy)", source.label);

    let clone_id = clone.id.clone();
    state
        .document
        .insert_field(page_index, clone, Some(&field_id));
    state.document.touch();
    state.selected_field = Some(clone_id.clone());
    state.dirty = true;
    tracing::debug!(source = %field_id, clone = %clone_id, "duplicated field");
}

fn reorder_fields(
    state: &mut FormBuilderState,
    page_index: usize,
    order: Vec<FieldId>,
) {
    let Some(page) = state.document.page(page_index) else {
        tracing::warn!(page_index, "ReorderFields targets a missing page");
        return;
    };

    // Caller-trusted permutation; a mismatch is a UI bug worth surfacing
    // in logs, but the supplied order is installed either way.
    let mut current: Vec<_> = page.fields.clone();
    let mut supplied: Vec<_> = order.clone();
    current.sort();
    supplied.sort();
    if current != supplied {
        tracing::debug!(page_index, "ReorderFields order is not a permutation of the page");
    }

    state.push_snapshot();
    if let Some(page) = state.document.page_mut(page_index) {
        page.fields = order;
    }
    state.document.touch();
    state.dirty = true;
}

fn move_field_to_page(
    state: &mut FormBuilderState,
    field_id: FieldId,
    target_page_index: usize,
    target_index: Option<usize>,
) {
    let Some(source_index) = state.document.page_index_of(&field_id) else {
        tracing::warn!(%field_id, "MoveFieldToPage targets a missing field");
        return;
    };
    if state.document.page(target_page_index).is_none() {
        tracing::warn!(target_page_index, "MoveFieldToPage targets a missing page");
        return;
    }
    state.push_snapshot();

    if let Some(source) = state.document.page_mut(source_index) {
        source.fields.retain(|id| id != &field_id);
    }
    if let Some(target) = state.document.page_mut(target_page_index) {
        let position = target_index
            .unwrap_or(target.fields.len())
            .min(target.fields.len());
        target.fields.insert(position, field_id.clone());
    }
    state.document.touch();
    state.dirty = true;
    tracing::debug!(%field_id, target_page_index, "moved field");
}

fn add_page(state: &mut FormBuilderState, after_index: Option<usize>, title: Option<String>) {
    state.push_snapshot();

    let page_count = state.document.pages.len();
    let position = after_index
        .map(|index| (index + 1).min(page_count))
        .unwrap_or(page_count);
    let title = title.unwrap_or_else(|| format!("Page {}", page_count + 1));
    state.document.pages.insert(position, FormPage::new(title));
    state.document.touch();
    state.selected_page = position;
    state.dirty = true;
    tracing::debug!(position, "added page");
}

fn remove_page(state: &mut FormBuilderState, page_index: usize) {
    if state.document.pages.len() <= 1 {
        // A form always keeps at least one page.
        return;
    }
    if state.document.page(page_index).is_none() {
        tracing::warn!(page_index, "RemovePage targets a missing page");
        return;
    }
    state.push_snapshot();

    // Fields are re-homed onto the previous page, or the next one when
    // removing the first page.
    let removed = state.document.pages.remove(page_index);
    let destination = if page_index == 0 { 0 } else { page_index - 1 };
    if let Some(page) = state.document.page_mut(destination) {
        page.fields.extend(removed.fields);
    }
    state.clamp_selection();
    state.document.touch();
    state.dirty = true;
    tracing::debug!(page_index, "removed page");
}

fn update_page(state: &mut FormBuilderState, page_index: usize, patch: PagePatch) {
    if state.document.page(page_index).is_none() {
        tracing::warn!(page_index, "UpdatePage targets a missing page");
        return;
    }
    state.push_snapshot();

    let Some(page) = state.document.page_mut(page_index) else {
        return;
    };
    if let Some(title) = patch.title {
        page.title = title;
    }
    if let Some(description) = patch.description {
        page.description = description;
    }
    state.document.touch();
    state.dirty = true;
}

fn reorder_pages(state: &mut FormBuilderState, order: Vec<PageId>) {
    state.push_snapshot();

    let mut remaining = std::mem::take(&mut state.document.pages);
    let mut reordered = Vec::with_capacity(remaining.len());
    for id in order {
        if let Some(position) = remaining.iter().position(|page| page.id == id) {
            reordered.push(remaining.remove(position));
        } else {
            tracing::debug!(page_id = %id, "ReorderPages dropped an unknown page id");
        }
    }
    // Pages missing from the supplied order keep their relative order at
    // the end; dropping them would orphan their fields.
    reordered.extend(remaining);
    state.document.pages = reordered;
    state.clamp_selection();
    state.document.touch();
    state.dirty = true;
}

fn set_form_mode(state: &mut FormBuilderState, mode: FormMode) {
    if state.document.mode == mode {
        return;
    }
    state.push_snapshot();

    state.document.mode = mode;
    if mode == FormMode::SinglePage && state.document.pages.len() > 1 {
        // Consolidate every page's fields, in page order, onto page 0.
        let tail: Vec<FormPage> = state.document.pages.split_off(1);
        let first = &mut state.document.pages[0];
        for page in tail {
            first.fields.extend(page.fields);
        }
    }
    state.selected_page = 0;
    state.document.touch();
    state.dirty = true;
    tracing::debug!(mode = %mode, "changed form mode");
}

fn update_styling(state: &mut FormBuilderState, patch: StylingPatch) {
    state.push_snapshot();

    let styling = &mut state.document.styling;
    if let Some(primary_color) = patch.primary_color {
        styling.primary_color = primary_color;
    }
    if let Some(background_color) = patch.background_color {
        styling.background_color = background_color;
    }
    if let Some(text_color) = patch.text_color {
        styling.text_color = text_color;
    }
    if let Some(font_family) = patch.font_family {
        styling.font_family = font_family;
    }
    if let Some(border_radius) = patch.border_radius {
        styling.border_radius = border_radius;
    }
    if let Some(field_spacing) = patch.field_spacing {
        styling.field_spacing = field_spacing;
    }
    state.document.touch();
    state.dirty = true;
}

fn update_settings(state: &mut FormBuilderState, patch: SettingsPatch) {
    state.push_snapshot();

    let settings = &mut state.document.settings;
    if let Some(submit_label) = patch.submit_label {
        settings.submit_label = submit_label;
    }
    if let Some(confirmation_message) = patch.confirmation_message {
        settings.confirmation_message = confirmation_message;
    }
    if let Some(redirect_url) = patch.redirect_url {
        settings.redirect_url = redirect_url;
    }
    if let Some(notification_email) = patch.notification_email {
        settings.notification_email = notification_email;
    }
    if let Some(save_progress) = patch.save_progress {
        settings.save_progress = save_progress;
    }
    if let Some(show_page_numbers) = patch.show_page_numbers {
        settings.show_page_numbers = show_page_numbers;
    }
    state.document.touch();
    state.dirty = true;
}

fn select_field(state: &mut FormBuilderState, field_id: Option<FieldId>) {
    match field_id {
        Some(id) if state.document.field(&id).is_none() => {
            tracing::warn!(field_id = %id, "SelectField targets a missing field");
        }
        other => state.selected_field = other,
    }
}

fn select_page(state: &mut FormBuilderState, page_index: usize) {
    if page_index < state.document.pages.len() {
        state.selected_page = page_index;
    } else {
        tracing::warn!(page_index, "SelectPage targets a missing page");
    }
}

fn undo(state: &mut FormBuilderState) {
    let Some(previous) = state.undo_stack.pop() else {
        return;
    };
    let current = std::mem::replace(&mut state.document, previous);
    state.redo_stack.push(current);
    state.dirty = true;
    fix_selection(state);
}

fn redo(state: &mut FormBuilderState) {
    let Some(next) = state.redo_stack.pop() else {
        return;
    };
    let current = std::mem::replace(&mut state.document, next);
    state.undo_stack.push(current);
    state.dirty = true;
    fix_selection(state);
}

fn mark_saved(state: &mut FormBuilderState) {
    state.dirty = false;
}

/// Drop a selection that no longer resolves after a history jump.
fn fix_selection(state: &mut FormBuilderState) {
    state.clamp_selection();
    if let Some(id) = &state.selected_field
        && state.document.field(id).is_none()
    {
        state.selected_field = None;
    }
}
