//! Conditional-visibility evaluation.
//!
//! Pure, total and deterministic: these functions run per keystroke
//! during live preview, so they never panic and always return a boolean.
//! A malformed operand (say, a text value fed to a numeric comparison)
//! simply evaluates to `false`.
//!
//! Missing-answer policy: when a leaf's target has no current answer
//! (never answered, or the referenced field was deleted), positive
//! operators evaluate `false` and emptiness operators evaluate `true`;
//! absence behaves like emptiness.

use std::collections::BTreeSet;

use formdef_model::{
    AnswerMap, AnswerValue, Combinator, ConditionGroup, ConditionNode, ConditionOperator,
    FieldCondition, FieldConfig,
};

/// Hard recursion ceiling. The editor caps construction at
/// [`formdef_model::MAX_CONDITION_DEPTH`]; this only guards against
/// hostile seeds, turning a pathologically deep subtree into `false`
/// instead of a stack overflow.
const MAX_EVAL_DEPTH: usize = 32;

/// Whether a field should currently be rendered. A field with no
/// visibility rule is always shown.
pub fn should_show_field(field: &FieldConfig, values: &AnswerMap) -> bool {
    match &field.conditional_visibility {
        None => true,
        Some(group) => evaluate(group, values),
    }
}

/// Evaluate a rule tree against the current answers.
///
/// AND short-circuits on the first false child and an empty AND is true;
/// OR short-circuits on the first true child and an empty OR is false.
pub fn evaluate(group: &ConditionGroup, values: &AnswerMap) -> bool {
    evaluate_at_depth(group, values, 0)
}

fn evaluate_at_depth(group: &ConditionGroup, values: &AnswerMap, depth: usize) -> bool {
    if depth >= MAX_EVAL_DEPTH {
        return false;
    }
    match group.combinator {
        Combinator::And => group
            .children
            .iter()
            .all(|child| evaluate_node(child, values, depth)),
        Combinator::Or => group
            .children
            .iter()
            .any(|child| evaluate_node(child, values, depth)),
    }
}

fn evaluate_node(node: &ConditionNode, values: &AnswerMap, depth: usize) -> bool {
    match node {
        ConditionNode::Group(group) => evaluate_at_depth(group, values, depth + 1),
        ConditionNode::Condition(condition) => condition_matches(condition, values),
    }
}

/// Evaluate one leaf against the current answers.
pub fn condition_matches(condition: &FieldCondition, values: &AnswerMap) -> bool {
    let answer = values.get(&condition.target_field_id);
    match condition.operator {
        ConditionOperator::Equals => equals(answer, condition.value.as_ref()),
        ConditionOperator::NotEquals => !equals(answer, condition.value.as_ref()),
        ConditionOperator::Contains => contains(answer, condition.value.as_ref()),
        ConditionOperator::NotContains => !contains(answer, condition.value.as_ref()),
        ConditionOperator::GreaterThan => compare(answer, condition.value.as_ref(), |a, b| a > b),
        ConditionOperator::GreaterThanOrEqual => {
            compare(answer, condition.value.as_ref(), |a, b| a >= b)
        }
        ConditionOperator::LessThan => compare(answer, condition.value.as_ref(), |a, b| a < b),
        ConditionOperator::LessThanOrEqual => {
            compare(answer, condition.value.as_ref(), |a, b| a <= b)
        }
        ConditionOperator::IsEmpty => is_empty(answer),
        ConditionOperator::IsNotEmpty => !is_empty(answer),
        ConditionOperator::IsChecked => is_checked(answer),
        ConditionOperator::IsNotChecked => !is_checked(answer),
    }
}

/// Strict equality. For multi-select answers, equality means the answer
/// set equals the condition's value set exactly, ignoring order.
fn equals(answer: Option<&AnswerValue>, value: Option<&AnswerValue>) -> bool {
    let (Some(answer), Some(value)) = (answer, value) else {
        return false;
    };
    match (answer, value) {
        (AnswerValue::Selection(a), AnswerValue::Selection(b)) => {
            let a: BTreeSet<&str> = a.iter().map(String::as_str).collect();
            let b: BTreeSet<&str> = b.iter().map(String::as_str).collect();
            a == b
        }
        _ => answer == value,
    }
}

/// Substring test for text answers, membership test for selections.
fn contains(answer: Option<&AnswerValue>, value: Option<&AnswerValue>) -> bool {
    let (Some(answer), Some(value)) = (answer, value) else {
        return false;
    };
    match (answer, value) {
        (AnswerValue::Text(haystack), AnswerValue::Text(needle)) => haystack.contains(needle),
        (AnswerValue::Selection(items), AnswerValue::Text(needle)) => {
            items.iter().any(|item| item == needle)
        }
        (AnswerValue::Selection(items), AnswerValue::Selection(needles)) => {
            needles.iter().all(|needle| items.contains(needle))
        }
        _ => false,
    }
}

/// Numeric comparison; either operand failing to read as a number makes
/// the whole leaf false.
fn compare(
    answer: Option<&AnswerValue>,
    value: Option<&AnswerValue>,
    ordering: fn(f64, f64) -> bool,
) -> bool {
    match (
        answer.and_then(AnswerValue::as_number),
        value.and_then(AnswerValue::as_number),
    ) {
        (Some(a), Some(b)) => ordering(a, b),
        _ => false,
    }
}

fn is_empty(answer: Option<&AnswerValue>) -> bool {
    answer.is_none_or(AnswerValue::is_empty)
}

fn is_checked(answer: Option<&AnswerValue>) -> bool {
    answer.and_then(AnswerValue::as_bool).unwrap_or(false)
}
