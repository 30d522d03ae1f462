//! Conditional-visibility rule trees and answer values.
//!
//! A field may carry a [`ConditionGroup`]: a boolean combinator (AND/OR)
//! over children that are either nested groups or [`FieldCondition`]
//! leaves comparing another field's current answer against a value.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ids::FieldId;

/// Editor cap on rule-tree nesting. The evaluator itself tolerates deeper
/// trees; this only gates what the condition builder lets users construct.
pub const MAX_CONDITION_DEPTH: usize = 4;

/// How the children of a group combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Combinator {
    /// Every child must match. An empty AND group matches.
    #[default]
    And,
    /// At least one child must match. An empty OR group does not match.
    Or,
}

impl Combinator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Combinator::And => "and",
            Combinator::Or => "or",
        }
    }

    /// Label shown in the condition builder.
    pub fn label(&self) -> &'static str {
        match self {
            Combinator::And => "All of the following",
            Combinator::Or => "Any of the following",
        }
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison applied by a condition leaf.
///
/// Which operators are legal depends on the target field's type; see
/// [`crate::registry::operators_for_field_type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    IsEmpty,
    IsNotEmpty,
    IsChecked,
    IsNotChecked,
}

impl ConditionOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionOperator::Equals => "equals",
            ConditionOperator::NotEquals => "not_equals",
            ConditionOperator::Contains => "contains",
            ConditionOperator::NotContains => "not_contains",
            ConditionOperator::GreaterThan => "greater_than",
            ConditionOperator::GreaterThanOrEqual => "greater_than_or_equal",
            ConditionOperator::LessThan => "less_than",
            ConditionOperator::LessThanOrEqual => "less_than_or_equal",
            ConditionOperator::IsEmpty => "is_empty",
            ConditionOperator::IsNotEmpty => "is_not_empty",
            ConditionOperator::IsChecked => "is_checked",
            ConditionOperator::IsNotChecked => "is_not_checked",
        }
    }

    /// Label shown in the condition builder.
    pub fn label(&self) -> &'static str {
        match self {
            ConditionOperator::Equals => "is equal to",
            ConditionOperator::NotEquals => "is not equal to",
            ConditionOperator::Contains => "contains",
            ConditionOperator::NotContains => "does not contain",
            ConditionOperator::GreaterThan => "is greater than",
            ConditionOperator::GreaterThanOrEqual => "is at least",
            ConditionOperator::LessThan => "is less than",
            ConditionOperator::LessThanOrEqual => "is at most",
            ConditionOperator::IsEmpty => "is empty",
            ConditionOperator::IsNotEmpty => "is not empty",
            ConditionOperator::IsChecked => "is checked",
            ConditionOperator::IsNotChecked => "is not checked",
        }
    }

    /// Whether the leaf needs a comparison value.
    pub fn requires_value(&self) -> bool {
        !matches!(
            self,
            ConditionOperator::IsEmpty
                | ConditionOperator::IsNotEmpty
                | ConditionOperator::IsChecked
                | ConditionOperator::IsNotChecked
        )
    }

    pub fn all() -> &'static [ConditionOperator] {
        &[
            ConditionOperator::Equals,
            ConditionOperator::NotEquals,
            ConditionOperator::Contains,
            ConditionOperator::NotContains,
            ConditionOperator::GreaterThan,
            ConditionOperator::GreaterThanOrEqual,
            ConditionOperator::LessThan,
            ConditionOperator::LessThanOrEqual,
            ConditionOperator::IsEmpty,
            ConditionOperator::IsNotEmpty,
            ConditionOperator::IsChecked,
            ConditionOperator::IsNotChecked,
        ]
    }
}

impl fmt::Display for ConditionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConditionOperator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConditionOperator::all()
            .iter()
            .find(|op| op.as_str() == s.trim())
            .copied()
            .ok_or_else(|| format!("Unknown condition operator: {}", s))
    }
}

/// A current answer, as supplied by the live-preview renderer.
///
/// Untagged so fill-time JSON payloads (`true`, `42`, `"yes"`,
/// `["a", "b"]`) deserialize directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Bool(bool),
    Number(f64),
    Text(String),
    Selection(Vec<String>),
}

impl AnswerValue {
    /// Emptiness as the evaluator understands it: empty string or empty
    /// selection. Numbers and booleans are never empty.
    pub fn is_empty(&self) -> bool {
        match self {
            AnswerValue::Bool(_) | AnswerValue::Number(_) => false,
            AnswerValue::Text(s) => s.trim().is_empty(),
            AnswerValue::Selection(items) => items.is_empty(),
        }
    }

    /// Numeric view of the answer. Text parses when it looks like a
    /// number, since live-preview inputs arrive as text.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AnswerValue::Number(n) => Some(*n),
            AnswerValue::Text(s) => s.trim().parse::<f64>().ok(),
            AnswerValue::Bool(_) | AnswerValue::Selection(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AnswerValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        AnswerValue::Text(value.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(value: String) -> Self {
        AnswerValue::Text(value)
    }
}

impl From<f64> for AnswerValue {
    fn from(value: f64) -> Self {
        AnswerValue::Number(value)
    }
}

impl From<bool> for AnswerValue {
    fn from(value: bool) -> Self {
        AnswerValue::Bool(value)
    }
}

impl From<Vec<String>> for AnswerValue {
    fn from(value: Vec<String>) -> Self {
        AnswerValue::Selection(value)
    }
}

/// Current answers keyed by field id.
pub type AnswerMap = BTreeMap<FieldId, AnswerValue>;

/// Leaf rule: compare the target field's current answer against a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldCondition {
    pub target_field_id: FieldId,
    pub operator: ConditionOperator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<AnswerValue>,
}

impl FieldCondition {
    pub fn new(target: FieldId, operator: ConditionOperator, value: Option<AnswerValue>) -> Self {
        Self {
            target_field_id: target,
            operator,
            value,
        }
    }
}

/// One child of a group: either a nested group or a leaf condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionNode {
    Group(ConditionGroup),
    Condition(FieldCondition),
}

/// A node of the visibility rule tree.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConditionGroup {
    #[serde(default)]
    pub combinator: Combinator,
    #[serde(default)]
    pub children: Vec<ConditionNode>,
}

impl ConditionGroup {
    pub fn new(combinator: Combinator) -> Self {
        Self {
            combinator,
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: ConditionNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_condition(self, condition: FieldCondition) -> Self {
        self.with_child(ConditionNode::Condition(condition))
    }

    pub fn with_group(self, group: ConditionGroup) -> Self {
        self.with_child(ConditionNode::Group(group))
    }

    /// Nesting depth of this tree; a group with only leaf children is 1.
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|child| match child {
                ConditionNode::Group(group) => group.depth(),
                ConditionNode::Condition(_) => 0,
            })
            .max()
            .unwrap_or(0)
    }

    /// Whether the condition builder may add another nested group without
    /// exceeding `max_depth`.
    pub fn can_add_nested_group(&self, max_depth: usize) -> bool {
        self.depth() < max_depth
    }

    /// True if any leaf in the tree targets `field_id`. Used to reject
    /// self-referencing rules in the editor.
    pub fn references(&self, field_id: &FieldId) -> bool {
        self.children.iter().any(|child| match child {
            ConditionNode::Group(group) => group.references(field_id),
            ConditionNode::Condition(cond) => cond.target_field_id == *field_id,
        })
    }

    /// Drop every leaf targeting `field_id`, recursively. Used when the
    /// target field is removed from the document.
    pub fn retain_targets_except(&mut self, field_id: &FieldId) {
        self.children.retain_mut(|child| match child {
            ConditionNode::Group(group) => {
                group.retain_targets_except(field_id);
                true
            }
            ConditionNode::Condition(cond) => cond.target_field_id != *field_id,
        });
    }
}
