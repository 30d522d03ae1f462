//! Static field-type metadata for the condition builder.
//!
//! Maps each field type to the comparison operators that make sense for
//! answers of that type. Layout elements collect no answers and therefore
//! expose no operators.

use crate::condition::ConditionOperator;
use crate::field::FieldType;

/// Legal condition operators for answers of the given field type.
pub fn operators_for_field_type(field_type: FieldType) -> &'static [ConditionOperator] {
    use ConditionOperator as Op;

    match field_type {
        FieldType::Text | FieldType::LongText | FieldType::Email | FieldType::Phone => &[
            Op::Equals,
            Op::NotEquals,
            Op::Contains,
            Op::NotContains,
            Op::IsEmpty,
            Op::IsNotEmpty,
        ],
        FieldType::Number => &[
            Op::Equals,
            Op::NotEquals,
            Op::GreaterThan,
            Op::GreaterThanOrEqual,
            Op::LessThan,
            Op::LessThanOrEqual,
            Op::IsEmpty,
            Op::IsNotEmpty,
        ],
        FieldType::Date => &[
            Op::Equals,
            Op::NotEquals,
            Op::IsEmpty,
            Op::IsNotEmpty,
        ],
        FieldType::Checkbox => &[Op::IsChecked, Op::IsNotChecked],
        FieldType::Dropdown | FieldType::Radio => &[
            Op::Equals,
            Op::NotEquals,
            Op::IsEmpty,
            Op::IsNotEmpty,
        ],
        FieldType::MultiSelect => &[
            Op::Equals,
            Op::NotEquals,
            Op::Contains,
            Op::NotContains,
            Op::IsEmpty,
            Op::IsNotEmpty,
        ],
        FieldType::Heading | FieldType::Paragraph | FieldType::Divider | FieldType::Spacer => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_types_expose_no_operators() {
        assert!(operators_for_field_type(FieldType::Divider).is_empty());
        assert!(operators_for_field_type(FieldType::Heading).is_empty());
    }

    #[test]
    fn checkbox_gets_only_checked_operators() {
        assert_eq!(
            operators_for_field_type(FieldType::Checkbox),
            &[ConditionOperator::IsChecked, ConditionOperator::IsNotChecked]
        );
    }

    #[test]
    fn numeric_comparisons_only_on_number_fields() {
        for t in FieldType::all() {
            let has_gt =
                operators_for_field_type(*t).contains(&ConditionOperator::GreaterThan);
            assert_eq!(has_gt, *t == FieldType::Number);
        }
    }
}
