use thiserror::Error;

use crate::ids::FieldId;

/// Structural violations detected when validating a document seed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("form has no pages")]
    NoPages,
    #[error("page {page} references unknown field {field}")]
    DanglingFieldRef { page: usize, field: FieldId },
    #[error("field {field} appears on more than one page")]
    DuplicateFieldRef { field: FieldId },
    #[error("field {field} is not placed on any page")]
    OrphanField { field: FieldId },
    #[error("machine name `{name}` is used by more than one field")]
    DuplicateName { name: String },
    #[error("visibility rule on field {field} references itself")]
    SelfReference { field: FieldId },
}

pub type Result<T> = std::result::Result<T, DocumentError>;
