//! Blocked date endpoints

use async_trait::async_trait;

use super::Repository;
use crate::{
    error::AppResult,
    models::blocked_date::{BlockedDate, BlockedDateQuery, CreateBlockedDate},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlockedDatesBackend: Send + Sync {
    /// Blocked rows for one hall (or all halls) within an inclusive range
    async fn blocked_dates(&self, query: BlockedDateQuery) -> AppResult<Vec<BlockedDate>>;
    async fn create_blocked_date(&self, data: &CreateBlockedDate) -> AppResult<BlockedDate>;
    async fn delete_blocked_date(&self, id: i64) -> AppResult<()>;
}

#[async_trait]
impl BlockedDatesBackend for Repository {
    async fn blocked_dates(&self, query: BlockedDateQuery) -> AppResult<Vec<BlockedDate>> {
        self.get_query("/blocked-dates/by_date/", &query.to_params()).await
    }

    async fn create_blocked_date(&self, data: &CreateBlockedDate) -> AppResult<BlockedDate> {
        self.post("/blocked-dates/", data).await
    }

    async fn delete_blocked_date(&self, id: i64) -> AppResult<()> {
        self.delete(&format!("/blocked-dates/{}/", id)).await
    }
}
