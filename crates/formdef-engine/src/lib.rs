//! Form-builder state engine.
//!
//! Owns the editor session: a [`FormBuilderState`] holding the live
//! [`formdef_model::FormDefinition`], selection, dirty flag and bounded
//! undo/redo history. The UI layer translates gestures into [`Command`]s,
//! dispatches them through [`reducer::apply`], and re-renders using
//! [`evaluator::should_show_field`] against the current answers.

pub mod command;
pub mod evaluator;
pub mod reducer;
pub mod state;

pub use command::{
    Command, FieldPatch, PagePatch, SettingsPatch, StylingPatch, VisibilityPatch,
};
pub use evaluator::{condition_matches, evaluate, should_show_field};
pub use reducer::apply;
pub use state::{FormBuilderState, HISTORY_LIMIT};

// Re-exported so UI collaborators need only this crate for the common
// path: build commands, dispatch, query operators for the rule builder.
pub use formdef_model::{operators_for_field_type, MAX_CONDITION_DEPTH};

#[cfg(test)]
mod tests {
    use super::*;
    use formdef_model::FieldType;

    #[test]
    fn add_field_end_to_end() {
        let mut state = FormBuilderState::new("Referral intake");
        apply(
            &mut state,
            Command::AddField {
                field_type: FieldType::Email,
                page_index: 0,
                after_field_id: None,
            },
        );

        let doc = state.document();
        assert_eq!(doc.fields.len(), 1);
        assert_eq!(doc.pages[0].fields.len(), 1);
        let field = doc.field(&doc.pages[0].fields[0]).expect("field exists");
        assert_eq!(field.field_type(), FieldType::Email);
        assert_eq!(field.name, "email");
        assert!(state.is_dirty());
        assert!(state.can_undo());
    }
}
