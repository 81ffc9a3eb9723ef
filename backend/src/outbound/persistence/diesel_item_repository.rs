//! PostgreSQL-backed `ItemRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ItemRepository, ItemRepositoryError};
use crate::domain::{Item, ItemId};

use super::diesel_helpers::{constraint_violation, map_basic_diesel_error, map_basic_pool_error};
use super::models::ItemRow;
use super::pool::{DbPool, PoolError};
use super::schema::items;

const ITEM_NAME_UNIQUE: &str = "items_name_key";

/// Diesel-backed implementation of the item repository port.
#[derive(Clone)]
pub struct DieselItemRepository {
    pool: DbPool,
}

impl DieselItemRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ItemRepositoryError {
    map_basic_pool_error(error, ItemRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ItemRepositoryError {
    if constraint_violation(&error).is_some_and(|violation| violation.is(ITEM_NAME_UNIQUE)) {
        return ItemRepositoryError::duplicate_name();
    }
    map_basic_diesel_error(
        error,
        ItemRepositoryError::query,
        ItemRepositoryError::connection,
    )
}

#[async_trait]
impl ItemRepository for DieselItemRepository {
    async fn list(&self) -> Result<Vec<Item>, ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = items::table
            .select(ItemRow::as_select())
            .order_by(items::name.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Item::from).collect())
    }

    async fn find_by_id(&self, id: &ItemId) -> Result<Option<Item>, ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = items::table
            .find(*id.as_uuid())
            .select(ItemRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Item::from))
    }

    async fn create(&self, item: &Item) -> Result<(), ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(items::table)
            .values(ItemRow::from(item))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
