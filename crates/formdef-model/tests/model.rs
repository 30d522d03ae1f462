#![allow(missing_docs)]

use std::collections::BTreeSet;

use formdef_model::{
    AnswerValue, Combinator, ConditionGroup, ConditionOperator, DocumentError, FieldCondition,
    FieldConfig, FieldId, FieldType, FormDefinition, FormMode, MAX_CONDITION_DEPTH,
    operators_for_field_type, unique_name,
};

#[test]
fn test_field_factory_defaults() {
    let mut doc = FormDefinition::new("Referral intake");

    for field_type in FieldType::all() {
        let field = FieldConfig::new(*field_type, &doc.field_names(None));
        assert_eq!(field.field_type(), *field_type);
        assert_eq!(field.label, field_type.label());
        assert!(!field.is_required());
        assert!(field.conditional_visibility.is_none());
        if field_type.is_choice() {
            let options = field.options().expect("choice fields carry options");
            assert!(!options.is_empty());
        } else {
            assert!(field.options().is_none());
        }
        doc.insert_field(0, field, None);
    }

    // One pass over every type still yields a valid document with
    // pairwise-distinct machine names.
    assert!(doc.validate().is_ok());
    let names: BTreeSet<String> = doc.field_names(None);
    assert_eq!(names.len(), FieldType::all().len());
}

#[test]
fn test_unique_name_generation() {
    let mut existing = BTreeSet::new();
    assert_eq!(unique_name("text", &existing), "text");
    existing.insert("text".to_string());
    assert_eq!(unique_name("text", &existing), "text_copy");
    existing.insert("text_copy".to_string());
    assert_eq!(unique_name("text", &existing), "text_copy_1");
    existing.insert("text_copy_1".to_string());
    assert_eq!(unique_name("text", &existing), "text_copy_2");
}

#[test]
fn test_default_document_shape() {
    let doc = FormDefinition::new("Referral intake");
    assert_eq!(doc.name, "Referral intake");
    assert_eq!(doc.mode, FormMode::SinglePage);
    assert_eq!(doc.pages.len(), 1);
    assert!(doc.pages[0].fields.is_empty());
    assert!(doc.fields.is_empty());
    assert_eq!(doc.created_at, doc.updated_at);
}

#[test]
fn test_validate_reports_dangling_reference() {
    let mut doc = FormDefinition::new("f");
    doc.pages[0].fields.push(FieldId::new("ghost"));
    assert!(matches!(
        doc.validate(),
        Err(DocumentError::DanglingFieldRef { page: 0, .. })
    ));
}

#[test]
fn test_validate_reports_duplicate_names() {
    let mut doc = FormDefinition::new("f");
    let a = FieldConfig::new(FieldType::Text, &BTreeSet::new());
    doc.insert_field(0, a, None);
    let mut b = FieldConfig::new(FieldType::Email, &BTreeSet::new());
    b.name = "text".to_string();
    doc.insert_field(0, b, None);
    assert!(matches!(
        doc.validate(),
        Err(DocumentError::DuplicateName { name }) if name == "text"
    ));
}

#[test]
fn test_validate_rejects_self_reference() {
    let mut doc = FormDefinition::new("f");
    let field = FieldConfig::new(FieldType::Text, &doc.field_names(None));
    let id = field.id.clone();
    doc.insert_field(0, field, None);
    doc.field_mut(&id).unwrap().conditional_visibility = Some(
        ConditionGroup::new(Combinator::And).with_condition(FieldCondition::new(
            id.clone(),
            ConditionOperator::IsNotEmpty,
            None,
        )),
    );
    assert_eq!(doc.validate(), Err(DocumentError::SelfReference { field: id }));
}

#[test]
fn test_sanitize_makes_any_seed_openable() {
    let mut doc = FormDefinition::new("f");
    doc.pages.clear();
    let orphan = FieldConfig::new(FieldType::Number, &BTreeSet::new());
    let orphan_id = orphan.id.clone();
    doc.fields.insert(orphan_id.clone(), orphan);

    doc.sanitize();
    assert!(doc.validate().is_ok());
    assert_eq!(doc.page_index_of(&orphan_id), Some(0));
}

#[test]
fn test_document_round_trips_through_json() {
    let mut doc = FormDefinition::new("Referral intake");
    let toggle = FieldConfig::new(FieldType::Checkbox, &doc.field_names(None));
    let toggle_id = toggle.id.clone();
    doc.insert_field(0, toggle, None);

    let mut details = FieldConfig::new(FieldType::LongText, &doc.field_names(None));
    details.conditional_visibility = Some(
        ConditionGroup::new(Combinator::And).with_condition(FieldCondition::new(
            toggle_id,
            ConditionOperator::IsChecked,
            None,
        )),
    );
    doc.insert_field(0, details, None);

    let json = serde_json::to_string_pretty(&doc).expect("serialize");
    let round: FormDefinition = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(round, doc);
    assert!(round.validate().is_ok());
}

#[test]
fn test_answer_value_json_shapes() {
    assert_eq!(
        serde_json::from_str::<AnswerValue>("true").unwrap(),
        AnswerValue::Bool(true)
    );
    assert_eq!(
        serde_json::from_str::<AnswerValue>("42.5").unwrap(),
        AnswerValue::Number(42.5)
    );
    assert_eq!(
        serde_json::from_str::<AnswerValue>("\"yes\"").unwrap(),
        AnswerValue::Text("yes".to_string())
    );
    assert_eq!(
        serde_json::from_str::<AnswerValue>("[\"a\",\"b\"]").unwrap(),
        AnswerValue::Selection(vec!["a".to_string(), "b".to_string()])
    );
}

#[test]
fn test_operator_registry_covers_every_input_type() {
    for field_type in FieldType::all() {
        let operators = operators_for_field_type(*field_type);
        assert_eq!(operators.is_empty(), field_type.is_layout());
        // Registry sets never repeat an operator.
        let unique: BTreeSet<_> = operators.iter().collect();
        assert_eq!(unique.len(), operators.len());
    }
}

#[test]
fn test_nested_group_gate() {
    let mut group = ConditionGroup::new(Combinator::And);
    assert!(group.can_add_nested_group(MAX_CONDITION_DEPTH));
    for _ in 0..(MAX_CONDITION_DEPTH - 1) {
        group = ConditionGroup::new(Combinator::And).with_group(group);
    }
    assert_eq!(group.depth(), MAX_CONDITION_DEPTH);
    assert!(!group.can_add_nested_group(MAX_CONDITION_DEPTH));
}
