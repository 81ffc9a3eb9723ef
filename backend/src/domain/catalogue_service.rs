//! Catalogue read service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{CatalogueQuery, ItemRepository, ItemRepositoryError};
use crate::domain::{Error, Item, ItemId};

fn map_repository_error(error: ItemRepositoryError) -> Error {
    match error {
        ItemRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("item repository unavailable: {message}"))
        }
        other => Error::internal(format!("item repository error: {other}")),
    }
}

/// Catalogue service implementing [`CatalogueQuery`].
#[derive(Clone)]
pub struct CatalogueService<R> {
    items: Arc<R>,
}

impl<R> CatalogueService<R> {
    pub fn new(items: Arc<R>) -> Self {
        Self { items }
    }
}

#[async_trait]
impl<R> CatalogueQuery for CatalogueService<R>
where
    R: ItemRepository,
{
    async fn list_items(&self) -> Result<Vec<Item>, Error> {
        self.items.list().await.map_err(map_repository_error)
    }

    async fn find_item(&self, id: &ItemId) -> Result<Item, Error> {
        self.items
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found("Item not found"))
    }
}
