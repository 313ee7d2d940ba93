//! Category entity and its request payloads.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::validation::{check_name, require, ValidationErrors};

/// Longest accepted category name, in characters.
pub const CATEGORY_NAME_MAX: usize = 50;

/// A stored category. Serializes as `{"id", "name"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Body of `POST /categories` and `PUT /categories/{id}`.
///
/// Every field is optional at the wire level so that a missing `name` on create
/// is reported as a validation error rather than a decoding failure.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CategoryPayload {
    /// Display name, 1 to 50 characters.
    #[schema(example = "Road")]
    pub name: Option<String>,
}

/// A validated category ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
}

/// Validated partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryChanges {
    pub name: Option<String>,
}

impl CategoryChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
    }
}

impl CategoryPayload {
    /// Validate as a create request: `name` is required.
    pub fn into_new(self) -> Result<NewCategory, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let name = require(&mut errors, "name", self.name);
        if let Some(name) = &name {
            check_name(&mut errors, "name", name, CATEGORY_NAME_MAX);
        }
        match name {
            Some(name) => errors.finish(NewCategory { name }),
            None => Err(errors),
        }
    }

    /// Validate as a partial update: only supplied fields are checked.
    pub fn into_changes(self) -> Result<CategoryChanges, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if let Some(name) = &self.name {
            check_name(&mut errors, "name", name, CATEGORY_NAME_MAX);
        }
        errors.finish(CategoryChanges { name: self.name })
    }
}
