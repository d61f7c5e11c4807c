//! Calendar handling in the displayed time zone (UTC+9) and query windows.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Offset of the displayed calendar from UTC.
pub const DISPLAY_UTC_OFFSET_HOURS: i64 = 9;

/// Calendar date of `ts` as seen in the displayed time zone.
pub fn local_date(ts: DateTime<Utc>) -> NaiveDate {
    (ts + Duration::hours(DISPLAY_UTC_OFFSET_HOURS)).date_naive()
}

/// Year of `ts` in the displayed time zone.
pub fn local_year(ts: DateTime<Utc>) -> i32 {
    local_date(ts).year()
}

/// Month (1-12) of `ts` in the displayed time zone.
pub fn local_month(ts: DateTime<Utc>) -> u32 {
    local_date(ts).month()
}

/// UTC instant of `h:m:s` local time on `date`.
fn local_to_utc(date: NaiveDate, h: u32, m: u32, s: u32) -> Option<DateTime<Utc>> {
    let naive = date.and_hms_opt(h, m, s)?;
    Some(naive.and_utc() - Duration::hours(DISPLAY_UTC_OFFSET_HOURS))
}

/// Inclusive time window used to filter records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl TimeWindow {
    /// Jan 1 00:00:00 through Dec 31 23:59:59, local time.
    pub fn for_year(year: i32) -> Option<Self> {
        let from = local_to_utc(NaiveDate::from_ymd_opt(year, 1, 1)?, 0, 0, 0)?;
        let to = local_to_utc(NaiveDate::from_ymd_opt(year, 12, 31)?, 23, 59, 59)?;
        Some(Self { from, to })
    }

    /// `start` 00:00:00 through `end` 23:59:59, local time.
    pub fn for_dates(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        Some(Self {
            from: local_to_utc(start, 0, 0, 0)?,
            to: local_to_utc(end, 23, 59, 59)?,
        })
    }

    /// Resolve query parameters: a non-empty year wins over a date range,
    /// even when it does not parse; anything unparseable means no filter.
    pub fn from_params(
        year: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Option<Self> {
        if let Some(year) = year.map(str::trim).filter(|y| !y.is_empty()) {
            return Self::for_year(year.parse().ok()?);
        }
        let start = NaiveDate::parse_from_str(start_date?, "%Y-%m-%d").ok()?;
        let end = NaiveDate::parse_from_str(end_date?, "%Y-%m-%d").ok()?;
        Self::for_dates(start, end)
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.from && ts <= self.to
    }
}

/// Distinct local years present in `timestamps`, newest first.
pub fn available_years<I>(timestamps: I) -> Vec<i32>
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    let mut years: Vec<i32> = timestamps.into_iter().map(local_year).collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years
}
