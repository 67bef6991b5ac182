//! Shared shape for repositories with create/get/list operations.

use crate::db::errors::Result;

/// Base repository trait for tables that are created, fetched by id and listed with a filter.
///
/// Repositories wrap a `&mut PgConnection` (usually a transaction) so callers decide the
/// transaction boundary.
#[async_trait::async_trait]
pub trait Repository {
    /// Input accepted by [`Repository::create`]
    type CreateRequest;

    /// Row type handed back to callers
    type Response;

    type Id: Send + Sync;

    /// Narrows [`Repository::list`]; pagination lives here too
    type Filter: Send + Sync;

    /// Insert one row and return it
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response>;

    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>>;

    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>>;
}
