//! Dashboard endpoints

use async_trait::async_trait;

use super::Repository;
use crate::{
    error::AppResult,
    models::dashboard::{CurrentWorkingHall, DashboardFilter, DashboardStats},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardBackend: Send + Sync {
    async fn dashboard_stats(&self, filter: DashboardFilter) -> AppResult<DashboardStats>;
    /// Halls with an approved booking for the slot running right now
    async fn current_working_halls(&self) -> AppResult<Vec<CurrentWorkingHall>>;
}

#[async_trait]
impl DashboardBackend for Repository {
    async fn dashboard_stats(&self, filter: DashboardFilter) -> AppResult<DashboardStats> {
        self.get_query("/dashboard-stats/", &filter.to_params()).await
    }

    async fn current_working_halls(&self) -> AppResult<Vec<CurrentWorkingHall>> {
        self.get("/current-working-halls/").await
    }
}
