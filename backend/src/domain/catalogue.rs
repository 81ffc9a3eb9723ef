//! Read-only catalogue of reviewable items.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ItemId;

/// Maximum item name length in characters (`VARCHAR(100)`).
pub const ITEM_NAME_MAX: usize = 100;

/// Validation errors raised while building an [`Item`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ItemValidationError {
    /// The name was blank.
    #[error("item name must not be empty")]
    EmptyName,
    /// The name exceeded [`ITEM_NAME_MAX`].
    #[error("item name must be at most {max} characters")]
    NameTooLong { max: usize },
}

/// A catalogue entry that users can review.
///
/// ## Invariants
/// - `name` is non-empty, at most [`ITEM_NAME_MAX`] characters and unique
///   across the catalogue (enforced by storage).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Item {
    /// Item identifier.
    pub id: ItemId,
    /// Display name.
    #[schema(example = "Item 1")]
    pub name: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Optional image reference.
    pub image_url: Option<String>,
}

impl Item {
    /// Build a new item with a fresh identifier.
    pub fn try_new(
        name: impl Into<String>,
        description: Option<String>,
        image_url: Option<String>,
    ) -> Result<Self, ItemValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ItemValidationError::EmptyName);
        }
        if name.chars().count() > ITEM_NAME_MAX {
            return Err(ItemValidationError::NameTooLong {
                max: ITEM_NAME_MAX,
            });
        }
        Ok(Self {
            id: ItemId::random(),
            name,
            description,
            image_url,
        })
    }
}
