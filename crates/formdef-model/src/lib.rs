pub mod condition;
pub mod document;
pub mod error;
pub mod field;
pub mod ids;
pub mod registry;

pub use condition::{
    AnswerMap, AnswerValue, Combinator, ConditionGroup, ConditionNode, ConditionOperator,
    FieldCondition, MAX_CONDITION_DEPTH,
};
pub use document::{FormDefinition, FormMode, FormPage, FormSettings, FormStyling};
pub use error::{DocumentError, Result};
pub use field::{
    CheckboxSettings, ChoiceOption, ChoiceSettings, DateSettings, FieldConfig, FieldKind,
    FieldStyle, FieldType, FieldWidth, HeadingSettings, NumberSettings, ParagraphSettings,
    SpacerSettings, TextSettings, TextValidation, unique_name,
};
pub use ids::{FieldId, FormId, PageId};
pub use registry::operators_for_field_type;
