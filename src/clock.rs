//! Business-timezone clock
//!
//! "Today" and "now" always come from here, resolved in the one configured
//! business timezone, so calendar dates sent to the backend never depend on
//! the zone of the machine running the client.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()
}

/// Format a date the way the backend expects
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[derive(Debug, Clone, Copy)]
pub struct BusinessClock {
    tz: Tz,
    /// Frozen instant, for tests and reproducible reports
    fixed: Option<DateTime<Utc>>,
}

impl BusinessClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz, fixed: None }
    }

    /// A clock stuck at `instant`
    pub fn fixed(tz: Tz, instant: DateTime<Utc>) -> Self {
        Self {
            tz,
            fixed: Some(instant),
        }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn now(&self) -> DateTime<Tz> {
        self.fixed.unwrap_or_else(Utc::now).with_timezone(&self.tz)
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// Local wall-clock time of day
    pub fn time_of_day(&self) -> NaiveTime {
        self.now().time()
    }

    pub fn is_today(&self, date: NaiveDate) -> bool {
        date == self.today()
    }
}
