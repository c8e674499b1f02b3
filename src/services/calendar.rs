//! Booking calendar: blocked dates, selectable days and month grids

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use std::{collections::BTreeSet, sync::Arc};

use crate::{
    clock::BusinessClock,
    error::{AppError, AppResult},
    models::blocked_date::{BlockedDate, BlockedDateQuery, HallFilter},
    repository::BlockedDatesBackend,
};

/// Cells in a month view: six Monday-first weeks
pub const GRID_CELLS: usize = 42;

// ---------------------------------------------------------------------------
// Blocked dates
// ---------------------------------------------------------------------------

/// Blocked rows fetched for a hall or an office, indexed by calendar date
#[derive(Debug, Clone, Default)]
pub struct BlockedDates {
    records: Vec<BlockedDate>,
    dates: BTreeSet<NaiveDate>,
}

impl BlockedDates {
    pub fn new(records: Vec<BlockedDate>) -> Self {
        let dates = records.iter().map(|r| r.blocked_date).collect();
        Self { records, dates }
    }

    /// Keep only rows whose hall is one of `hall_ids`
    pub fn for_halls(records: Vec<BlockedDate>, hall_ids: &[i64]) -> Self {
        Self::new(
            records
                .into_iter()
                .filter(|r| r.hall.is_some_and(|hall| hall_ids.contains(&hall)))
                .collect(),
        )
    }

    pub fn is_blocked(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    pub fn records(&self) -> &[BlockedDate] {
        &self.records
    }

    pub fn dates(&self) -> impl Iterator<Item = &NaiveDate> {
        self.dates.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// BookingCalendar
// ---------------------------------------------------------------------------

/// Which days a requester may pick
#[derive(Debug, Clone)]
pub struct BookingCalendar {
    pub today: NaiveDate,
    pub horizon_days: u32,
    pub blocked: BlockedDates,
}

impl BookingCalendar {
    pub fn new(today: NaiveDate, horizon_days: u32, blocked: BlockedDates) -> Self {
        Self {
            today,
            horizon_days,
            blocked,
        }
    }

    /// Last bookable day
    pub fn last_bookable(&self) -> NaiveDate {
        self.today
            .checked_add_days(Days::new(u64::from(self.horizon_days)))
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn is_blocked(&self, date: NaiveDate) -> bool {
        self.blocked.is_blocked(date)
    }

    pub fn is_selectable(&self, date: NaiveDate) -> bool {
        date >= self.today && date <= self.last_bookable() && !self.is_blocked(date)
    }
}

/// Every day of `from..=to`; empty when `to` is before `from`
pub fn days_between(from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    from.iter_days().take_while(|day| *day <= to).collect()
}

// ---------------------------------------------------------------------------
// MonthGrid
// ---------------------------------------------------------------------------

/// One month laid out as 42 Monday-first cells, with the leading and
/// trailing days borrowed from the neighbouring months
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub first: NaiveDate,
    pub last: NaiveDate,
    pub cells: Vec<NaiveDate>,
}

impl MonthGrid {
    pub fn new(year: i32, month: u32) -> AppResult<Self> {
        let (first, last) = month_bounds(year, month)?;
        let lead = u64::from(first.weekday().num_days_from_monday());
        let start = first
            .checked_sub_days(Days::new(lead))
            .ok_or_else(|| AppError::Validation(format!("Month out of range: {}-{}", year, month)))?;
        let cells = start.iter_days().take(GRID_CELLS).collect();
        Ok(Self { first, last, cells })
    }

    /// Grid of the month containing `date`
    pub fn containing(date: NaiveDate) -> AppResult<Self> {
        Self::new(date.year(), date.month())
    }

    pub fn in_month(&self, date: NaiveDate) -> bool {
        date >= self.first && date <= self.last
    }

    /// Rows of seven cells
    pub fn weeks(&self) -> impl Iterator<Item = &[NaiveDate]> {
        self.cells.chunks(7)
    }

    pub fn next(&self) -> AppResult<Self> {
        let date = self
            .first
            .checked_add_months(Months::new(1))
            .ok_or_else(|| AppError::Validation("No month after this one".to_string()))?;
        Self::containing(date)
    }

    pub fn previous(&self) -> AppResult<Self> {
        let date = self
            .first
            .checked_sub_months(Months::new(1))
            .ok_or_else(|| AppError::Validation("No month before this one".to_string()))?;
        Self::containing(date)
    }

    pub fn title(&self) -> String {
        self.first.format("%B %Y").to_string()
    }

    pub const WEEKDAYS: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];
}

/// First and last day of a month
pub fn month_bounds(year: i32, month: u32) -> AppResult<(NaiveDate, NaiveDate)> {
    let invalid = || AppError::Validation(format!("Invalid month: {}-{}", year, month));
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(invalid)?;
    Ok((first, last))
}

// ---------------------------------------------------------------------------
// CalendarService
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct CalendarService {
    blocked_dates: Arc<dyn BlockedDatesBackend>,
    clock: BusinessClock,
    horizon_days: u32,
}

impl CalendarService {
    pub fn new(blocked_dates: Arc<dyn BlockedDatesBackend>, clock: BusinessClock, horizon_days: u32) -> Self {
        Self {
            blocked_dates,
            clock,
            horizon_days,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Blocked rows for `hall` within `from..=to`
    pub async fn blocked_between(&self, hall: HallFilter, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<BlockedDate>> {
        self.blocked_dates
            .blocked_dates(BlockedDateQuery {
                hall,
                start_date: from,
                end_date: to,
            })
            .await
    }

    /// Calendar for booking `hall_id`, with blocked dates from today to the horizon
    pub async fn booking_calendar(&self, hall_id: i64) -> AppResult<BookingCalendar> {
        let today = self.clock.today();
        let mut calendar = BookingCalendar::new(today, self.horizon_days, BlockedDates::default());
        let records = self
            .blocked_between(HallFilter::One(hall_id), today, calendar.last_bookable())
            .await?;
        calendar.blocked = BlockedDates::new(records);
        Ok(calendar)
    }

    /// Blocked dates of one hall within the month shown by `grid`
    pub async fn blocked_in_month(&self, hall: HallFilter, grid: &MonthGrid) -> AppResult<Vec<BlockedDate>> {
        self.blocked_between(hall, grid.first, grid.last).await
    }
}
