//! Admin dashboard: statistics, halls in use and the approval queue

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{
        dashboard::{DashboardFilter, DashboardSnapshot},
        hall::{CategoryChoice, Office, SessionMaster},
    },
    repository::{BookingsBackend, CatalogBackend, DashboardBackend},
};

/// Choices for the dashboard filter bar
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub offices: Vec<Office>,
    pub categories: Vec<CategoryChoice>,
    pub sessions: Vec<SessionMaster>,
}

#[derive(Clone)]
pub struct DashboardService {
    dashboard: Arc<dyn DashboardBackend>,
    bookings: Arc<dyn BookingsBackend>,
    catalog: Arc<dyn CatalogBackend>,
}

impl DashboardService {
    pub fn new(
        dashboard: Arc<dyn DashboardBackend>,
        bookings: Arc<dyn BookingsBackend>,
        catalog: Arc<dyn CatalogBackend>,
    ) -> Self {
        Self {
            dashboard,
            bookings,
            catalog,
        }
    }

    /// Fetch every dashboard section concurrently.
    ///
    /// Never fails as a whole: a failed section stays empty and its error is
    /// recorded on the snapshot.
    pub async fn snapshot(&self, filter: &DashboardFilter) -> DashboardSnapshot {
        let (stats, working, pending, counts) = tokio::join!(
            self.dashboard.dashboard_stats(*filter),
            self.dashboard.current_working_halls(),
            self.bookings.pending_approvals(),
            self.bookings.booking_stats(),
        );

        let mut snapshot = DashboardSnapshot::default();
        match stats {
            Ok(stats) => snapshot.stats = Some(stats),
            Err(e) => record(&mut snapshot, "dashboard stats", e),
        }
        match working {
            Ok(halls) => snapshot.working_halls = halls,
            Err(e) => record(&mut snapshot, "working halls", e),
        }
        match pending {
            Ok(bookings) => snapshot.pending_approvals = bookings,
            Err(e) => record(&mut snapshot, "pending approvals", e),
        }
        match counts {
            Ok(counts) => snapshot.booking_stats = Some(counts),
            Err(e) => record(&mut snapshot, "booking stats", e),
        }
        snapshot
    }

    /// Offices, categories and sessions, fetched together
    pub async fn reference_data(&self) -> AppResult<ReferenceData> {
        let (offices, categories, sessions) = tokio::try_join!(
            self.catalog.list_offices(),
            self.catalog.hall_categories(),
            self.catalog.list_sessions(),
        )?;
        Ok(ReferenceData {
            offices,
            categories,
            sessions,
        })
    }
}

fn record(snapshot: &mut DashboardSnapshot, section: &str, error: AppError) {
    tracing::warn!("Failed to load {}: {}", section, error);
    snapshot.errors.push(format!("Could not load {}", section));
}
