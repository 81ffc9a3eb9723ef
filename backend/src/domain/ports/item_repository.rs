//! Port for catalogue item persistence.

use async_trait::async_trait;

use crate::domain::{Item, ItemId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by item repository adapters.
    pub enum ItemRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "item repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "item repository query failed: {message}",
        /// An item with the same name already exists.
        DuplicateName => "item name is already taken",
    }
}

/// Read access to the catalogue plus the insert used by demo seeding.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Every item, ordered by name.
    async fn list(&self) -> Result<Vec<Item>, ItemRepositoryError>;

    /// Fetch a single item.
    async fn find_by_id(&self, id: &ItemId) -> Result<Option<Item>, ItemRepositoryError>;

    /// Insert a new item.
    async fn create(&self, item: &Item) -> Result<(), ItemRepositoryError>;
}
