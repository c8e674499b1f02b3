//! Admin slot management: block and reopen whole days for a set of halls

use chrono::NaiveDate;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{
        blocked_date::{BlockedDate, BlockedDateQuery, CreateBlockedDate, HallFilter},
        hall::Hall,
    },
    repository::{BlockedDatesBackend, CatalogBackend},
};

use super::{
    batch::BatchReport,
    calendar::BlockedDates,
    selection::SelectedRange,
};

pub const BLOCK_REASON: &str = "Admin blocked";
pub const NO_HALLS: &str = "No halls available for the selected office.";
pub const BLOCK_FAILED: &str = "Failed to block some dates. Please try again.";
pub const UNBLOCK_FAILED: &str = "Failed to unblock some dates. Please try again.";
pub const PAST_DATE: &str = "Past dates cannot be selected.";

/// Halls an admin action applies to
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HallScope {
    #[default]
    All,
    /// Halls whose office has this name
    Office(String),
}

impl HallScope {
    /// `"all"` (any case) selects every hall, anything else is an office name
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("all") {
            HallScope::All
        } else {
            HallScope::Office(value.trim().to_string())
        }
    }

    pub fn apply(&self, halls: Vec<Hall>) -> Vec<Hall> {
        match self {
            HallScope::All => halls,
            HallScope::Office(name) => halls
                .into_iter()
                .filter(|hall| hall.office_name.as_deref() == Some(name.as_str()))
                .collect(),
        }
    }
}

/// Distinct office names among `halls`, in first-seen order
pub fn office_names(halls: &[Hall]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for name in halls.iter().filter_map(|hall| hall.office_name.as_deref()) {
        if !name.is_empty() && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Key of one block request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockKey {
    pub hall: i64,
    pub date: NaiveDate,
}

impl std::fmt::Display for BlockKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "hall {} on {}", self.hall, self.date)
    }
}

/// Halls × dates to block, halls outer
#[derive(Debug, Clone)]
pub struct BlockBatch {
    pub halls: Vec<Hall>,
    pub dates: Vec<NaiveDate>,
}

impl BlockBatch {
    pub fn requests(&self) -> Vec<(BlockKey, Option<CreateBlockedDate>)> {
        self.halls
            .iter()
            .flat_map(|hall| {
                self.dates.iter().map(move |date| {
                    let key = BlockKey {
                        hall: hall.id,
                        date: *date,
                    };
                    let request = hall.office.map(|office| CreateBlockedDate {
                        office,
                        hall: hall.id,
                        blocked_date: *date,
                        reason: BLOCK_REASON.to_string(),
                    });
                    (key, request)
                })
            })
            .collect()
    }
}

/// What the selected range currently contains, deciding whether "block",
/// "open" or both are offered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RangeStatus {
    pub has_open: bool,
    pub has_blocked: bool,
}

/// Range picked on the admin calendar; only days before `today` are refused
pub fn admin_range(from: NaiveDate, to: Option<NaiveDate>, today: NaiveDate) -> AppResult<SelectedRange> {
    let range = SelectedRange::new(from, to);
    match range.from() {
        Some(first) if first < today => Err(AppError::Validation(PAST_DATE.to_string())),
        _ => Ok(range),
    }
}

pub fn range_status(range: &SelectedRange, blocked: &BlockedDates) -> Option<RangeStatus> {
    if range.is_empty() {
        return None;
    }
    let mut status = RangeStatus::default();
    for day in range.days() {
        if blocked.is_blocked(day) {
            status.has_blocked = true;
        } else {
            status.has_open = true;
        }
    }
    Some(status)
}

#[derive(Clone)]
pub struct BlockingService {
    catalog: Arc<dyn CatalogBackend>,
    blocked_dates: Arc<dyn BlockedDatesBackend>,
}

impl BlockingService {
    pub fn new(catalog: Arc<dyn CatalogBackend>, blocked_dates: Arc<dyn BlockedDatesBackend>) -> Self {
        Self { catalog, blocked_dates }
    }

    pub async fn halls_in_scope(&self, scope: &HallScope) -> AppResult<Vec<Hall>> {
        Ok(scope.apply(self.catalog.list_halls().await?))
    }

    /// Blocked rows of the halls in scope, within `from..=to`
    pub async fn blocked_for(&self, halls: &[Hall], from: NaiveDate, to: NaiveDate) -> AppResult<BlockedDates> {
        let records = self
            .blocked_dates
            .blocked_dates(BlockedDateQuery {
                hall: HallFilter::All,
                start_date: from,
                end_date: to,
            })
            .await?;
        let hall_ids: Vec<i64> = halls.iter().map(|hall| hall.id).collect();
        Ok(BlockedDates::for_halls(records, &hall_ids))
    }

    /// Block every day of the range for every hall, one request at a time
    pub async fn block(&self, halls: Vec<Hall>, range: &SelectedRange) -> AppResult<BatchReport<BlockKey>> {
        if halls.is_empty() {
            return Err(AppError::Validation(NO_HALLS.to_string()));
        }
        let batch = BlockBatch {
            halls,
            dates: range.days(),
        };
        if batch.dates.is_empty() {
            return Err(AppError::Validation("Please select a date range".to_string()));
        }

        let requests = batch.requests();
        let mut report = BatchReport::pending(requests.iter().map(|(key, _)| *key));
        for (index, (key, request)) in requests.iter().enumerate() {
            let result = match request {
                Some(request) => self.blocked_dates.create_blocked_date(request).await,
                None => Err(AppError::Validation(format!("Hall {} has no office", key.hall))),
            };
            match result {
                Ok(created) => report.mark_applied(index, Some(created.id)),
                Err(e) => {
                    tracing::warn!("Blocking hall {} on {} failed: {}", key.hall, key.date, e);
                    report.mark_failed(index, e.to_string(), BLOCK_FAILED.to_string());
                    break;
                }
            }
        }
        tracing::info!("Block run: {}", report);
        Ok(report)
    }

    /// Reopen every day of the range for the halls in scope
    pub async fn unblock(&self, halls: Vec<Hall>, range: &SelectedRange) -> AppResult<BatchReport<BlockedDate>> {
        if halls.is_empty() {
            return Err(AppError::Validation(NO_HALLS.to_string()));
        }
        let (Some(from), to) = (range.from(), range.to()) else {
            return Err(AppError::Validation("Please select a date range".to_string()));
        };
        let to = to.unwrap_or(from);

        let rows = self.blocked_for(&halls, from, to).await?.records().to_vec();
        let mut report = BatchReport::pending(rows.iter().cloned());
        for (index, row) in rows.iter().enumerate() {
            match self.blocked_dates.delete_blocked_date(row.id).await {
                Ok(()) => report.mark_applied(index, Some(row.id)),
                Err(e) => {
                    tracing::warn!("Unblocking row {} ({}) failed: {}", row.id, row.blocked_date, e);
                    report.mark_failed(index, e.to_string(), UNBLOCK_FAILED.to_string());
                    break;
                }
            }
        }
        tracing::info!("Unblock run: {}", report);
        Ok(report)
    }

    /// Range status and the blocked rows of `halls`, ordered by date then
    /// hall, from a single fetch
    pub async fn listing(&self, halls: &[Hall], range: &SelectedRange) -> AppResult<BlockedListing> {
        let Some(from) = range.from() else {
            return Ok(BlockedListing::default());
        };
        let to = range.to().unwrap_or(from);
        let blocked = self.blocked_for(halls, from, to).await?;

        let mut rows = blocked.records().to_vec();
        rows.sort_by(|a, b| a.blocked_date.cmp(&b.blocked_date).then(a.hall.cmp(&b.hall)));
        Ok(BlockedListing {
            status: range_status(range, &blocked),
            rows,
        })
    }
}

/// What the admin calendar shows for a range
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockedListing {
    pub status: Option<RangeStatus>,
    pub rows: Vec<BlockedDate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{enums::HallCategory, hall::HallAmenities};
    use crate::repository::{blocked_dates::MockBlockedDatesBackend, catalog::MockCatalogBackend};
    use mockall::Sequence;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn hall(id: i64, office: i64, office_name: &str) -> Hall {
        Hall {
            id,
            office: Some(office),
            office_name: Some(office_name.into()),
            hall_code: format!("H{}", id),
            hall_name: format!("Hall {}", id),
            about: None,
            image: None,
            capacity: 8,
            category: HallCategory::Hall,
            is_freeze: false,
            amenities: HallAmenities::default(),
        }
    }

    fn row(id: i64, hall: i64, day: NaiveDate) -> BlockedDate {
        BlockedDate {
            id,
            office: 1,
            hall: Some(hall),
            blocked_date: day,
            reason: Some(BLOCK_REASON.into()),
            office_name: None,
            hall_name: None,
            created_by_name: None,
        }
    }

    fn service(catalog: MockCatalogBackend, blocked: MockBlockedDatesBackend) -> BlockingService {
        BlockingService::new(Arc::new(catalog), Arc::new(blocked))
    }

    #[test]
    fn test_scope_by_office_name() {
        let halls = vec![hall(1, 1, "Chennai"), hall(2, 2, "Pune"), hall(3, 1, "Chennai")];
        let ids: Vec<i64> = HallScope::parse("Chennai").apply(halls.clone()).iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(HallScope::parse("ALL").apply(halls.clone()).len(), 3);
        assert_eq!(office_names(&halls), vec!["Chennai".to_string(), "Pune".to_string()]);
    }

    #[test]
    fn test_range_status() {
        let blocked = BlockedDates::new(vec![row(1, 1, date(11))]);
        assert_eq!(range_status(&SelectedRange::default(), &blocked), None);
        assert_eq!(
            range_status(&SelectedRange::new(date(10), Some(date(12))), &blocked),
            Some(RangeStatus { has_open: true, has_blocked: true })
        );
        assert_eq!(
            range_status(&SelectedRange::new(date(11), None), &blocked),
            Some(RangeStatus { has_open: false, has_blocked: true })
        );
    }

    #[test]
    fn test_admin_range_refuses_only_past_days() {
        assert_eq!(admin_range(date(9), None, date(10)).unwrap_err().user_message(), PAST_DATE);
        // blocked or far-future days are fine for admins
        let range = admin_range(date(10), Some(date(30)), date(10)).unwrap();
        assert_eq!(range.days().len(), 21);
        // an inverted range is normalised before the check
        assert!(admin_range(date(12), Some(date(9)), date(10)).is_err());
    }

    #[tokio::test]
    async fn test_block_runs_halls_outer_dates_inner() {
        let mut blocked = MockBlockedDatesBackend::new();
        let mut seq = Sequence::new();
        let mut next_id = 100;
        for (hall_id, day) in [(1, 10), (1, 11), (2, 10), (2, 11)] {
            next_id += 1;
            let id = next_id;
            blocked
                .expect_create_blocked_date()
                .withf(move |r| r.hall == hall_id && r.blocked_date == date(day) && r.reason == BLOCK_REASON)
                .times(1)
                .in_sequence(&mut seq)
                .returning(move |r| Ok(row(id, r.hall, r.blocked_date)));
        }

        let report = service(MockCatalogBackend::new(), blocked)
            .block(
                vec![hall(1, 1, "Chennai"), hall(2, 1, "Chennai")],
                &SelectedRange::new(date(10), Some(date(11))),
            )
            .await
            .unwrap();
        assert!(report.is_complete());
        assert_eq!(report.applied_count(), 4);
    }

    #[tokio::test]
    async fn test_block_stops_on_first_failure() {
        let mut blocked = MockBlockedDatesBackend::new();
        let mut seq = Sequence::new();
        blocked
            .expect_create_blocked_date()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|r| Ok(row(1, r.hall, r.blocked_date)));
        blocked
            .expect_create_blocked_date()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(AppError::BadRequest("already blocked".into())));

        let report = service(MockCatalogBackend::new(), blocked)
            .block(vec![hall(1, 1, "Chennai")], &SelectedRange::new(date(10), Some(date(12))))
            .await
            .unwrap();
        assert_eq!(report.applied_count(), 1);
        assert_eq!(report.not_attempted_count(), 1);
        assert_eq!(report.failure.as_deref(), Some(BLOCK_FAILED));
    }

    #[tokio::test]
    async fn test_block_without_halls_sends_nothing() {
        let mut blocked = MockBlockedDatesBackend::new();
        blocked.expect_create_blocked_date().never();
        let err = service(MockCatalogBackend::new(), blocked)
            .block(Vec::new(), &SelectedRange::new(date(10), None))
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), NO_HALLS);
    }

    #[tokio::test]
    async fn test_unblock_deletes_only_rows_in_scope() {
        let mut blocked = MockBlockedDatesBackend::new();
        blocked
            .expect_blocked_dates()
            .withf(|q| q.hall == HallFilter::All && q.start_date == date(10) && q.end_date == date(10))
            .times(1)
            .returning(|_| Ok(vec![row(7, 1, date(10)), row(8, 9, date(10))]));
        blocked
            .expect_delete_blocked_date()
            .withf(|id| *id == 7)
            .times(1)
            .returning(|_| Ok(()));

        let report = service(MockCatalogBackend::new(), blocked)
            .unblock(vec![hall(1, 1, "Chennai")], &SelectedRange::new(date(10), None))
            .await
            .unwrap();
        assert_eq!(report.applied_count(), 1);
        assert_eq!(report.last_applied_id(), Some(7));
    }

    #[tokio::test]
    async fn test_listing_fetches_once_and_sorts() {
        let mut blocked = MockBlockedDatesBackend::new();
        blocked
            .expect_blocked_dates()
            .withf(|q| q.start_date == date(10) && q.end_date == date(11))
            .times(1)
            .returning(|_| Ok(vec![row(3, 2, date(11)), row(2, 1, date(11)), row(1, 1, date(10)), row(9, 9, date(11))]));

        let halls = vec![hall(1, 1, "Chennai"), hall(2, 1, "Chennai")];
        let listing = service(MockCatalogBackend::new(), blocked)
            .listing(&halls, &SelectedRange::new(date(10), Some(date(11))))
            .await
            .unwrap();

        let ids: Vec<i64> = listing.rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(
            listing.status,
            Some(RangeStatus {
                has_open: false,
                has_blocked: true
            })
        );
    }

    #[tokio::test]
    async fn test_halls_in_scope_uses_catalog() {
        let mut catalog = MockCatalogBackend::new();
        catalog
            .expect_list_halls()
            .times(1)
            .returning(|| Ok(vec![hall(1, 1, "Chennai"), hall(2, 2, "Pune")]));
        let halls = service(catalog, MockBlockedDatesBackend::new())
            .halls_in_scope(&HallScope::Office("Pune".into()))
            .await
            .unwrap();
        assert_eq!(halls.len(), 1);
        assert_eq!(halls[0].id, 2);
    }
}
