#![allow(missing_docs)]

use std::collections::BTreeSet;

use formdef_engine::{condition_matches, evaluate, should_show_field};
use formdef_model::{
    AnswerMap, AnswerValue, Combinator, ConditionGroup, ConditionNode, ConditionOperator,
    FieldCondition, FieldConfig, FieldId, FieldType,
};

fn answers(pairs: &[(&str, AnswerValue)]) -> AnswerMap {
    pairs
        .iter()
        .map(|(id, value)| (FieldId::new(*id), value.clone()))
        .collect()
}

fn leaf(id: &str, operator: ConditionOperator, value: Option<AnswerValue>) -> ConditionNode {
    ConditionNode::Condition(FieldCondition::new(FieldId::new(id), operator, value))
}

#[test]
fn test_field_without_rule_is_always_shown() {
    let field = FieldConfig::new(FieldType::Text, &BTreeSet::new());
    assert!(should_show_field(&field, &AnswerMap::new()));
}

#[test]
fn test_field_with_rule_delegates_to_evaluator() {
    let mut field = FieldConfig::new(FieldType::LongText, &BTreeSet::new());
    field.conditional_visibility = Some(ConditionGroup {
        combinator: Combinator::And,
        children: vec![leaf("consent", ConditionOperator::IsChecked, None)],
    });
    assert!(!should_show_field(&field, &AnswerMap::new()));
    assert!(should_show_field(
        &field,
        &answers(&[("consent", AnswerValue::Bool(true))])
    ));
}

#[test]
fn test_empty_group_conventions() {
    assert!(evaluate(&ConditionGroup::new(Combinator::And), &AnswerMap::new()));
    assert!(!evaluate(&ConditionGroup::new(Combinator::Or), &AnswerMap::new()));
}

#[test]
fn test_or_group_with_one_true_child() {
    // consent is unchecked (false leaf), but the other branch matches.
    let group = ConditionGroup {
        combinator: Combinator::Or,
        children: vec![
            leaf("consent", ConditionOperator::IsChecked, None),
            leaf(
                "reason",
                ConditionOperator::Equals,
                Some(AnswerValue::from("urgent")),
            ),
        ],
    };
    let values = answers(&[
        ("consent", AnswerValue::Bool(false)),
        ("reason", AnswerValue::from("urgent")),
    ]);
    assert!(evaluate(&group, &values));
}

#[test]
fn test_and_group_requires_all_children() {
    let group = ConditionGroup {
        combinator: Combinator::And,
        children: vec![
            leaf("consent", ConditionOperator::IsChecked, None),
            leaf(
                "age",
                ConditionOperator::GreaterThanOrEqual,
                Some(AnswerValue::Number(18.0)),
            ),
        ],
    };
    assert!(evaluate(
        &group,
        &answers(&[
            ("consent", AnswerValue::Bool(true)),
            ("age", AnswerValue::Number(18.0)),
        ])
    ));
    assert!(!evaluate(
        &group,
        &answers(&[
            ("consent", AnswerValue::Bool(true)),
            ("age", AnswerValue::Number(17.0)),
        ])
    ));
}

#[test]
fn test_numeric_scenarios() {
    let over_18 = FieldCondition::new(
        FieldId::new("age"),
        ConditionOperator::GreaterThan,
        Some(AnswerValue::Number(18.0)),
    );
    assert!(condition_matches(
        &over_18,
        &answers(&[("age", AnswerValue::Number(25.0))])
    ));
    assert!(!condition_matches(&over_18, &AnswerMap::new()));
    // Numeric text coerces; non-numeric text does not.
    assert!(condition_matches(
        &over_18,
        &answers(&[("age", AnswerValue::from("19"))])
    ));
    assert!(!condition_matches(
        &over_18,
        &answers(&[("age", AnswerValue::from("nineteen"))])
    ));
}

#[test]
fn test_equals_is_strict() {
    let is_jane = FieldCondition::new(
        FieldId::new("name"),
        ConditionOperator::Equals,
        Some(AnswerValue::from("Jane")),
    );
    assert!(condition_matches(
        &is_jane,
        &answers(&[("name", AnswerValue::from("Jane"))])
    ));
    assert!(!condition_matches(
        &is_jane,
        &answers(&[("name", AnswerValue::from("jane"))])
    ));
    // A missing comparison value never matches.
    let broken = FieldCondition::new(FieldId::new("name"), ConditionOperator::Equals, None);
    assert!(!condition_matches(
        &broken,
        &answers(&[("name", AnswerValue::from("Jane"))])
    ));
}

#[test]
fn test_multi_select_equals_is_set_equality() {
    let wants = FieldCondition::new(
        FieldId::new("symptoms"),
        ConditionOperator::Equals,
        Some(AnswerValue::Selection(vec![
            "fatigue".to_string(),
            "fever".to_string(),
        ])),
    );
    // Order-insensitive, exact set.
    assert!(condition_matches(
        &wants,
        &answers(&[(
            "symptoms",
            AnswerValue::Selection(vec!["fever".to_string(), "fatigue".to_string()])
        )])
    ));
    assert!(!condition_matches(
        &wants,
        &answers(&[("symptoms", AnswerValue::Selection(vec!["fever".to_string()]))])
    ));
}

#[test]
fn test_contains_semantics() {
    let text_contains = FieldCondition::new(
        FieldId::new("notes"),
        ConditionOperator::Contains,
        Some(AnswerValue::from("urgent")),
    );
    assert!(condition_matches(
        &text_contains,
        &answers(&[("notes", AnswerValue::from("marked urgent by GP"))])
    ));

    let membership = FieldCondition::new(
        FieldId::new("symptoms"),
        ConditionOperator::Contains,
        Some(AnswerValue::from("fever")),
    );
    assert!(condition_matches(
        &membership,
        &answers(&[(
            "symptoms",
            AnswerValue::Selection(vec!["fever".to_string(), "cough".to_string()])
        )])
    ));
    assert!(!condition_matches(
        &membership,
        &answers(&[("symptoms", AnswerValue::Selection(vec!["cough".to_string()]))])
    ));
}

#[test]
fn test_missing_answer_policy() {
    let values = AnswerMap::new();
    let positive = [
        (ConditionOperator::Equals, Some(AnswerValue::from("x"))),
        (ConditionOperator::Contains, Some(AnswerValue::from("x"))),
        (ConditionOperator::IsChecked, None),
        (ConditionOperator::IsNotEmpty, None),
    ];
    for (operator, value) in positive {
        let condition = FieldCondition::new(FieldId::new("deleted"), operator, value);
        assert!(
            !condition_matches(&condition, &values),
            "{} should be false for a missing answer",
            operator
        );
    }

    // Absence behaves like emptiness, so the negations hold.
    let negative = [
        (ConditionOperator::NotEquals, Some(AnswerValue::from("x"))),
        (ConditionOperator::NotContains, Some(AnswerValue::from("x"))),
        (ConditionOperator::IsNotChecked, None),
        (ConditionOperator::IsEmpty, None),
    ];
    for (operator, value) in negative {
        let condition = FieldCondition::new(FieldId::new("deleted"), operator, value);
        assert!(
            condition_matches(&condition, &values),
            "{} should be true for a missing answer",
            operator
        );
    }
}

#[test]
fn test_emptiness_of_present_answers() {
    let is_empty = FieldCondition::new(FieldId::new("notes"), ConditionOperator::IsEmpty, None);
    assert!(condition_matches(
        &is_empty,
        &answers(&[("notes", AnswerValue::from(""))])
    ));
    assert!(condition_matches(
        &is_empty,
        &answers(&[("notes", AnswerValue::Selection(vec![]))])
    ));
    assert!(!condition_matches(
        &is_empty,
        &answers(&[("notes", AnswerValue::Number(0.0))])
    ));
    assert!(!condition_matches(
        &is_empty,
        &answers(&[("notes", AnswerValue::Bool(false))])
    ));
}

#[test]
fn test_nested_groups_evaluate_recursively() {
    // consent AND (age > 65 OR priority = "high")
    let group = ConditionGroup {
        combinator: Combinator::And,
        children: vec![
            leaf("consent", ConditionOperator::IsChecked, None),
            ConditionNode::Group(ConditionGroup {
                combinator: Combinator::Or,
                children: vec![
                    leaf(
                        "age",
                        ConditionOperator::GreaterThan,
                        Some(AnswerValue::Number(65.0)),
                    ),
                    leaf(
                        "priority",
                        ConditionOperator::Equals,
                        Some(AnswerValue::from("high")),
                    ),
                ],
            }),
        ],
    };

    let mut values = answers(&[
        ("consent", AnswerValue::Bool(true)),
        ("age", AnswerValue::Number(40.0)),
        ("priority", AnswerValue::from("high")),
    ]);
    assert!(evaluate(&group, &values));

    values.insert(FieldId::new("priority"), AnswerValue::from("routine"));
    assert!(!evaluate(&group, &values));

    values.insert(FieldId::new("age"), AnswerValue::Number(70.0));
    assert!(evaluate(&group, &values));
}

#[test]
fn test_evaluator_is_total_on_odd_inputs() {
    // Wrong-typed operands resolve to false rather than erroring.
    let cases = [
        (
            ConditionOperator::GreaterThan,
            Some(AnswerValue::from("high")),
            AnswerValue::from("low"),
        ),
        (
            ConditionOperator::Contains,
            Some(AnswerValue::Number(3.0)),
            AnswerValue::Number(33.0),
        ),
        (
            ConditionOperator::IsChecked,
            None,
            AnswerValue::from("true"),
        ),
    ];
    for (operator, value, answer) in cases {
        let condition = FieldCondition::new(FieldId::new("x"), operator, value);
        assert!(!condition_matches(
            &condition,
            &answers(&[("x", answer)])
        ));
    }
}
