//! Admin-blocked dates

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A day on which a hall cannot be booked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedDate {
    pub id: i64,
    pub office: i64,
    pub hall: Option<i64>,
    pub blocked_date: NaiveDate,
    pub reason: Option<String>,
    pub office_name: Option<String>,
    pub hall_name: Option<String>,
    pub created_by_name: Option<String>,
}

impl std::fmt::Display for BlockedDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.hall_name, self.hall) {
            (Some(name), _) => write!(f, "{} on {}", name, self.blocked_date),
            (None, Some(hall)) => write!(f, "hall {} on {}", hall, self.blocked_date),
            (None, None) => write!(f, "all halls on {}", self.blocked_date),
        }
    }
}

/// Create blocked date request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateBlockedDate {
    pub office: i64,
    pub hall: i64,
    pub blocked_date: NaiveDate,
    pub reason: String,
}

/// Which halls a blocked-date query covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HallFilter {
    All,
    One(i64),
}

impl HallFilter {
    /// Query-string value of the `hall` parameter
    pub fn as_param(&self) -> String {
        match self {
            HallFilter::All => "all".to_string(),
            HallFilter::One(id) => id.to_string(),
        }
    }
}

/// Parameters of `/blocked-dates/by_date/`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockedDateQuery {
    pub hall: HallFilter,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl BlockedDateQuery {
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("hall", self.hall.as_param()),
            ("start_date", self.start_date.format("%Y-%m-%d").to_string()),
            ("end_date", self.end_date.format("%Y-%m-%d").to_string()),
        ]
    }
}
