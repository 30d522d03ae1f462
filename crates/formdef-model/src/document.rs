//! Form document model.
//!
//! A [`FormDefinition`] is a normalized document: pages hold ordered field
//! ids, the field map owns the configurations. Invariants (no dangling
//! ids, one page per field, unique machine names) are enforced by the
//! constructors and mutation helpers here and checked for externally
//! loaded seeds by [`FormDefinition::validate`].

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DocumentError;
use crate::field::{FieldConfig, unique_name};
use crate::ids::{FieldId, FormId, PageId};

/// Whether a form renders as one page or as a stepped wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormMode {
    #[default]
    SinglePage,
    MultiStep,
}

impl FormMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormMode::SinglePage => "single_page",
            FormMode::MultiStep => "multi_step",
        }
    }
}

impl fmt::Display for FormMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "single_page" => Ok(FormMode::SinglePage),
            "multi_step" => Ok(FormMode::MultiStep),
            other => Err(format!("Unknown form mode: {}", other)),
        }
    }
}

/// One page of a form. Field order in `fields` is display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormPage {
    pub id: PageId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldId>,
}

impl FormPage {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: PageId::generate(),
            title: title.into(),
            description: None,
            fields: Vec::new(),
        }
    }
}

/// Form-wide cosmetic settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormStyling {
    pub primary_color: String,
    pub background_color: String,
    pub text_color: String,
    pub font_family: String,
    pub border_radius: u16,
    pub field_spacing: u16,
}

impl Default for FormStyling {
    fn default() -> Self {
        Self {
            primary_color: "#2563EB".to_string(),
            background_color: "#FFFFFF".to_string(),
            text_color: "#111827".to_string(),
            font_family: "Inter".to_string(),
            border_radius: 8,
            field_spacing: 16,
        }
    }
}

/// Behavioral settings applied at fill time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSettings {
    pub submit_label: String,
    pub confirmation_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    /// Address notified on each submission, when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_email: Option<String>,
    /// Let respondents leave and resume a partially filled form.
    #[serde(default)]
    pub save_progress: bool,
    #[serde(default)]
    pub show_page_numbers: bool,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            submit_label: "Submit".to_string(),
            confirmation_message: "Thank you, your referral has been received.".to_string(),
            redirect_url: None,
            notification_email: None,
            save_progress: false,
            show_page_numbers: true,
        }
    }
}

/// The complete editable document for one form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormDefinition {
    pub id: FormId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub mode: FormMode,
    pub pages: Vec<FormPage>,
    /// All field configurations, keyed by id. Pages reference into this.
    #[serde(default)]
    pub fields: BTreeMap<FieldId, FieldConfig>,
    #[serde(default)]
    pub styling: FormStyling,
    #[serde(default)]
    pub settings: FormSettings,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FormDefinition {
    /// Default document: one empty page, no fields, default styling and
    /// settings. Never fails.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: FormId::generate(),
            name: name.into(),
            description: None,
            mode: FormMode::default(),
            pages: vec![FormPage::new("Page 1")],
            fields: BTreeMap::new(),
            styling: FormStyling::default(),
            settings: FormSettings::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn field(&self, id: &FieldId) -> Option<&FieldConfig> {
        self.fields.get(id)
    }

    pub fn field_mut(&mut self, id: &FieldId) -> Option<&mut FieldConfig> {
        self.fields.get_mut(id)
    }

    pub fn page(&self, index: usize) -> Option<&FormPage> {
        self.pages.get(index)
    }

    pub fn page_mut(&mut self, index: usize) -> Option<&mut FormPage> {
        self.pages.get_mut(index)
    }

    /// Index of the page whose field list contains `id`.
    pub fn page_index_of(&self, id: &FieldId) -> Option<usize> {
        self.pages.iter().position(|page| page.fields.contains(id))
    }

    /// Machine names currently in use, optionally ignoring one field
    /// (used when renaming it).
    pub fn field_names(&self, exclude: Option<&FieldId>) -> BTreeSet<String> {
        self.fields
            .iter()
            .filter(|(id, _)| Some(*id) != exclude)
            .map(|(_, field)| field.name.clone())
            .collect()
    }

    /// A machine name derived from `base` that is unused in this document.
    pub fn unique_field_name(&self, base: &str) -> String {
        unique_name(base, &self.field_names(None))
    }

    /// Insert a field on `page_index`, placed immediately after
    /// `after_field_id` when that id is on the page, else at the end.
    ///
    /// Keeps the invariants: the id enters the field map and exactly one
    /// page list.
    pub fn insert_field(
        &mut self,
        page_index: usize,
        field: FieldConfig,
        after_field_id: Option<&FieldId>,
    ) {
        let id = field.id.clone();
        self.fields.insert(id.clone(), field);
        if let Some(page) = self.pages.get_mut(page_index) {
            let position = after_field_id
                .and_then(|after| page.fields.iter().position(|f| f == after))
                .map(|pos| pos + 1)
                .unwrap_or(page.fields.len());
            page.fields.insert(position, id);
        }
    }

    /// Remove a field from the map and from its owning page.
    pub fn remove_field(&mut self, id: &FieldId) -> Option<FieldConfig> {
        let removed = self.fields.remove(id)?;
        for page in &mut self.pages {
            page.fields.retain(|f| f != id);
        }
        Some(removed)
    }

    /// Bump the modification timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Check the structural invariants, reporting the first violation.
    ///
    /// Intended for documents loaded from the persistence collaborator;
    /// documents built through the engine always pass.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.pages.is_empty() {
            return Err(DocumentError::NoPages);
        }

        let mut placed: BTreeSet<&FieldId> = BTreeSet::new();
        for (page_index, page) in self.pages.iter().enumerate() {
            for id in &page.fields {
                if !self.fields.contains_key(id) {
                    return Err(DocumentError::DanglingFieldRef {
                        page: page_index,
                        field: id.clone(),
                    });
                }
                if !placed.insert(id) {
                    return Err(DocumentError::DuplicateFieldRef { field: id.clone() });
                }
            }
        }

        for id in self.fields.keys() {
            if !placed.contains(id) {
                return Err(DocumentError::OrphanField { field: id.clone() });
            }
        }

        let mut names: BTreeSet<&str> = BTreeSet::new();
        for field in self.fields.values() {
            if !names.insert(field.name.as_str()) {
                return Err(DocumentError::DuplicateName {
                    name: field.name.clone(),
                });
            }
        }

        for (id, field) in &self.fields {
            if let Some(group) = &field.conditional_visibility
                && group.references(id)
            {
                return Err(DocumentError::SelfReference { field: id.clone() });
            }
        }

        Ok(())
    }

    /// Repair a seed so every invariant holds: guarantees at least one
    /// page, drops dangling and repeated page references, re-homes orphan
    /// fields onto the last page, de-duplicates machine names, and strips
    /// self-referencing visibility leaves.
    ///
    /// Loading never fails; a damaged seed opens as the closest valid
    /// document.
    pub fn sanitize(&mut self) {
        if self.pages.is_empty() {
            self.pages.push(FormPage::new("Page 1"));
        }

        let known: BTreeSet<FieldId> = self.fields.keys().cloned().collect();
        let mut placed: BTreeSet<FieldId> = BTreeSet::new();
        for page in &mut self.pages {
            page.fields
                .retain(|id| known.contains(id) && placed.insert(id.clone()));
        }

        let orphans: Vec<FieldId> = self
            .fields
            .keys()
            .filter(|id| !placed.contains(*id))
            .cloned()
            .collect();
        if let Some(last) = self.pages.last_mut() {
            last.fields.extend(orphans);
        }

        let mut names: BTreeSet<String> = BTreeSet::new();
        for field in self.fields.values_mut() {
            let base = if field.name.trim().is_empty() {
                field.kind.field_type().as_str().to_string()
            } else {
                field.name.clone()
            };
            let name = unique_name(&base, &names);
            names.insert(name.clone());
            field.name = name;
        }

        for (id, field) in &mut self.fields {
            if let Some(group) = &mut field.conditional_visibility {
                group.retain_targets_except(id);
            }
        }
    }
}
