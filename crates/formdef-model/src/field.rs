//! Field configuration model.
//!
//! A field is an envelope (id, machine name, label, width, visibility
//! rule, style overrides) plus a [`FieldKind`] payload that carries the
//! settings specific to its type. Input kinds carry required/placeholder/
//! validation settings; layout kinds structurally cannot, so "a divider is
//! never required" holds by construction rather than by convention.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::condition::ConditionGroup;
use crate::ids::FieldId;

/// Discriminant for every supported field and layout-element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    LongText,
    Email,
    Phone,
    Number,
    Date,
    Checkbox,
    Dropdown,
    Radio,
    MultiSelect,
    Heading,
    Paragraph,
    Divider,
    Spacer,
}

impl FieldType {
    /// Canonical machine token, also used as the base for generated names.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::LongText => "long_text",
            FieldType::Email => "email",
            FieldType::Phone => "phone",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Checkbox => "checkbox",
            FieldType::Dropdown => "dropdown",
            FieldType::Radio => "radio",
            FieldType::MultiSelect => "multi_select",
            FieldType::Heading => "heading",
            FieldType::Paragraph => "paragraph",
            FieldType::Divider => "divider",
            FieldType::Spacer => "spacer",
        }
    }

    /// Human-readable label shown in the field palette.
    pub fn label(&self) -> &'static str {
        match self {
            FieldType::Text => "Text Input",
            FieldType::LongText => "Long Text",
            FieldType::Email => "Email",
            FieldType::Phone => "Phone",
            FieldType::Number => "Number",
            FieldType::Date => "Date",
            FieldType::Checkbox => "Checkbox",
            FieldType::Dropdown => "Dropdown",
            FieldType::Radio => "Radio Group",
            FieldType::MultiSelect => "Multi Select",
            FieldType::Heading => "Heading",
            FieldType::Paragraph => "Paragraph",
            FieldType::Divider => "Divider",
            FieldType::Spacer => "Spacer",
        }
    }

    /// Layout elements render static content and never collect answers.
    pub fn is_layout(&self) -> bool {
        matches!(
            self,
            FieldType::Heading | FieldType::Paragraph | FieldType::Divider | FieldType::Spacer
        )
    }

    /// True for kinds whose answers come from a configured option list.
    pub fn is_choice(&self) -> bool {
        matches!(
            self,
            FieldType::Dropdown | FieldType::Radio | FieldType::MultiSelect
        )
    }

    /// All supported types, palette order.
    pub fn all() -> &'static [FieldType] {
        &[
            FieldType::Text,
            FieldType::LongText,
            FieldType::Email,
            FieldType::Phone,
            FieldType::Number,
            FieldType::Date,
            FieldType::Checkbox,
            FieldType::Dropdown,
            FieldType::Radio,
            FieldType::MultiSelect,
            FieldType::Heading,
            FieldType::Paragraph,
            FieldType::Divider,
            FieldType::Spacer,
        ]
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::all()
            .iter()
            .find(|t| t.as_str() == s.trim())
            .copied()
            .ok_or_else(|| format!("Unknown field type: {}", s))
    }
}

/// Horizontal span of a field in the form grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldWidth {
    #[default]
    Full,
    Half,
    Third,
}

/// One selectable option of a choice field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub value: String,
    pub label: String,
}

impl ChoiceOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Length/pattern constraints for text-like inputs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextValidation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    /// Regex the answer must match, evaluated by the fill-time renderer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// Settings shared by text, long-text, email and phone inputs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextSettings {
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub validation: TextValidation,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NumberSettings {
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateSettings {
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CheckboxSettings {
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub default_checked: bool,
}

/// Settings for dropdown, radio and multi-select fields.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChoiceSettings {
    #[serde(default)]
    pub required: bool,
    pub options: Vec<ChoiceOption>,
    /// Offer a free-text "Other" entry alongside the options.
    #[serde(default)]
    pub allow_other: bool,
}

impl ChoiceSettings {
    /// Placeholder option list for a freshly created choice field.
    pub fn with_placeholder_options() -> Self {
        Self {
            required: false,
            options: (1..=3)
                .map(|n| ChoiceOption::new(format!("option_{}", n), format!("Option {}", n)))
                .collect(),
            allow_other: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingSettings {
    /// Heading level 1-6; the envelope label is the heading text.
    pub level: u8,
}

impl Default for HeadingSettings {
    fn default() -> Self {
        Self { level: 2 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParagraphSettings {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpacerSettings {
    /// Vertical gap in pixels.
    pub height: u16,
}

impl Default for SpacerSettings {
    fn default() -> Self {
        Self { height: 24 }
    }
}

/// Type-specific payload of a field.
///
/// Input variants carry their own required flag and constraints; layout
/// variants have no answer-related settings at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Text(TextSettings),
    LongText(TextSettings),
    Email(TextSettings),
    Phone(TextSettings),
    Number(NumberSettings),
    Date(DateSettings),
    Checkbox(CheckboxSettings),
    Dropdown(ChoiceSettings),
    Radio(ChoiceSettings),
    MultiSelect(ChoiceSettings),
    Heading(HeadingSettings),
    Paragraph(ParagraphSettings),
    Divider,
    Spacer(SpacerSettings),
}

impl FieldKind {
    /// Default payload for a field of the given type.
    pub fn default_for(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Text => FieldKind::Text(TextSettings::default()),
            FieldType::LongText => FieldKind::LongText(TextSettings::default()),
            FieldType::Email => FieldKind::Email(TextSettings::default()),
            FieldType::Phone => FieldKind::Phone(TextSettings::default()),
            FieldType::Number => FieldKind::Number(NumberSettings::default()),
            FieldType::Date => FieldKind::Date(DateSettings::default()),
            FieldType::Checkbox => FieldKind::Checkbox(CheckboxSettings::default()),
            FieldType::Dropdown => {
                FieldKind::Dropdown(ChoiceSettings::with_placeholder_options())
            }
            FieldType::Radio => FieldKind::Radio(ChoiceSettings::with_placeholder_options()),
            FieldType::MultiSelect => {
                FieldKind::MultiSelect(ChoiceSettings::with_placeholder_options())
            }
            FieldType::Heading => FieldKind::Heading(HeadingSettings::default()),
            FieldType::Paragraph => FieldKind::Paragraph(ParagraphSettings::default()),
            FieldType::Divider => FieldKind::Divider,
            FieldType::Spacer => FieldKind::Spacer(SpacerSettings::default()),
        }
    }

    pub fn field_type(&self) -> FieldType {
        match self {
            FieldKind::Text(_) => FieldType::Text,
            FieldKind::LongText(_) => FieldType::LongText,
            FieldKind::Email(_) => FieldType::Email,
            FieldKind::Phone(_) => FieldType::Phone,
            FieldKind::Number(_) => FieldType::Number,
            FieldKind::Date(_) => FieldType::Date,
            FieldKind::Checkbox(_) => FieldType::Checkbox,
            FieldKind::Dropdown(_) => FieldType::Dropdown,
            FieldKind::Radio(_) => FieldType::Radio,
            FieldKind::MultiSelect(_) => FieldType::MultiSelect,
            FieldKind::Heading(_) => FieldType::Heading,
            FieldKind::Paragraph(_) => FieldType::Paragraph,
            FieldKind::Divider => FieldType::Divider,
            FieldKind::Spacer(_) => FieldType::Spacer,
        }
    }
}

/// Per-field cosmetic overrides on top of the form styling.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_size: Option<u16>,
}

/// Complete configuration of one field or layout element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    pub id: FieldId,
    /// Unique machine name; keys the answer map at fill time.
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub width: FieldWidth,
    /// Rule tree deciding whether this field is shown; `None` = always.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional_visibility: Option<ConditionGroup>,
    #[serde(default)]
    pub style: FieldStyle,
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl FieldConfig {
    /// Create a fully-populated field of the given type with a machine
    /// name that does not collide with `existing_names`.
    ///
    /// Never fails: every type has valid defaults.
    pub fn new(field_type: FieldType, existing_names: &BTreeSet<String>) -> Self {
        Self {
            id: FieldId::generate(),
            name: unique_name(field_type.as_str(), existing_names),
            label: field_type.label().to_string(),
            width: FieldWidth::default(),
            conditional_visibility: None,
            style: FieldStyle::default(),
            kind: FieldKind::default_for(field_type),
        }
    }

    pub fn field_type(&self) -> FieldType {
        self.kind.field_type()
    }

    pub fn is_layout(&self) -> bool {
        self.field_type().is_layout()
    }

    /// Whether an answer is mandatory. Always false for layout elements.
    pub fn is_required(&self) -> bool {
        match &self.kind {
            FieldKind::Text(s) | FieldKind::LongText(s) | FieldKind::Email(s)
            | FieldKind::Phone(s) => s.required,
            FieldKind::Number(s) => s.required,
            FieldKind::Date(s) => s.required,
            FieldKind::Checkbox(s) => s.required,
            FieldKind::Dropdown(s) | FieldKind::Radio(s) | FieldKind::MultiSelect(s) => s.required,
            FieldKind::Heading(_) | FieldKind::Paragraph(_) | FieldKind::Divider
            | FieldKind::Spacer(_) => false,
        }
    }

    /// Set the required flag on input kinds; ignored for layout elements.
    pub fn set_required(&mut self, required: bool) {
        match &mut self.kind {
            FieldKind::Text(s) | FieldKind::LongText(s) | FieldKind::Email(s)
            | FieldKind::Phone(s) => s.required = required,
            FieldKind::Number(s) => s.required = required,
            FieldKind::Date(s) => s.required = required,
            FieldKind::Checkbox(s) => s.required = required,
            FieldKind::Dropdown(s) | FieldKind::Radio(s) | FieldKind::MultiSelect(s) => {
                s.required = required;
            }
            FieldKind::Heading(_) | FieldKind::Paragraph(_) | FieldKind::Divider
            | FieldKind::Spacer(_) => {}
        }
    }

    /// Set the placeholder on kinds that render one; ignored elsewhere.
    pub fn set_placeholder(&mut self, placeholder: Option<String>) {
        match &mut self.kind {
            FieldKind::Text(s) | FieldKind::LongText(s) | FieldKind::Email(s)
            | FieldKind::Phone(s) => s.placeholder = placeholder,
            FieldKind::Number(s) => s.placeholder = placeholder,
            _ => {}
        }
    }

    pub fn options(&self) -> Option<&[ChoiceOption]> {
        match &self.kind {
            FieldKind::Dropdown(s) | FieldKind::Radio(s) | FieldKind::MultiSelect(s) => {
                Some(&s.options)
            }
            _ => None,
        }
    }

    /// Replace the option list on choice kinds; ignored elsewhere.
    pub fn set_options(&mut self, options: Vec<ChoiceOption>) {
        match &mut self.kind {
            FieldKind::Dropdown(s) | FieldKind::Radio(s) | FieldKind::MultiSelect(s) => {
                s.options = options;
            }
            _ => {}
        }
    }
}

/// Generate a machine name not present in `existing`.
///
/// Tries `base`, then `base_copy`, then `base_copy_1`, `base_copy_2`, …
pub fn unique_name(base: &str, existing: &BTreeSet<String>) -> String {
    if !existing.contains(base) {
        return base.to_string();
    }
    let copy = format!("{}_copy", base);
    if !existing.contains(&copy) {
        return copy;
    }
    let mut n = 1usize;
    loop {
        let candidate = format!("{}_copy_{}", base, n);
        if !existing.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn unique_name_suffix_sequence() {
        let existing = names(&["age", "age_copy", "age_copy_1"]);
        assert_eq!(unique_name("email", &existing), "email");
        assert_eq!(unique_name("age", &existing), "age_copy_2");
        assert_eq!(unique_name("age_copy", &existing), "age_copy_copy");
    }

    #[test]
    fn factory_gives_choice_fields_placeholder_options() {
        let field = FieldConfig::new(FieldType::Dropdown, &BTreeSet::new());
        let options = field.options().expect("dropdown has options");
        assert_eq!(options.len(), 3);
        assert_eq!(options[0].value, "option_1");
    }

    #[test]
    fn layout_elements_are_never_required() {
        let mut divider = FieldConfig::new(FieldType::Divider, &BTreeSet::new());
        divider.set_required(true);
        assert!(!divider.is_required());
        assert!(divider.is_layout());
        assert!(divider.options().is_none());
    }

    #[test]
    fn field_type_token_round_trip() {
        for t in FieldType::all() {
            assert_eq!(t.as_str().parse::<FieldType>().as_ref(), Ok(t));
        }
        assert!("carousel".parse::<FieldType>().is_err());
    }
}
