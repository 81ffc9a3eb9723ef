//! Driving port for reading the item catalogue.

use async_trait::async_trait;

use crate::domain::{Error, Item, ItemId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueQuery: Send + Sync {
    /// Every item in the catalogue.
    async fn list_items(&self) -> Result<Vec<Item>, Error>;

    /// One item, or `NotFound`.
    async fn find_item(&self, id: &ItemId) -> Result<Item, Error>;
}
