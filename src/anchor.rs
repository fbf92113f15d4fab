/// Anchor date and trailing window.
///
/// The precipitation and tobs routes report the year leading up to an
/// anchor date. The historical behaviour pins the anchor to 2017-08-23,
/// the last day in the Hawaii dataset; `LatestInDataset` derives it from
/// the measurement table instead.

use chrono::{Days, NaiveDate};
use serde::Deserialize;

use crate::error::StoreError;
use crate::store::WeatherStore;

/// Format of every date the service reads, writes or compares.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Default window length in days.
pub const DEFAULT_WINDOW_DAYS: u32 = 365;

/// Longest window accepted from configuration (about a century).
pub const MAX_WINDOW_DAYS: u32 = 36_600;

/// Last recorded day of the Hawaii dataset.
pub fn default_anchor_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2017, 8, 23).unwrap_or_default()
}

/// How the anchor date is chosen.
///
/// In `surfsup.toml`:
///
/// ```toml
/// anchor = { fixed = "2017-08-23" }
/// # or
/// anchor = "latest"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorStrategy {
    Fixed(NaiveDate),
    #[serde(alias = "latest")]
    LatestInDataset,
}

impl Default for AnchorStrategy {
    fn default() -> Self {
        AnchorStrategy::Fixed(default_anchor_date())
    }
}

impl AnchorStrategy {
    /// Resolves the anchor. `None` means the dataset has no measurements,
    /// which only happens with `LatestInDataset`.
    pub fn resolve<S: WeatherStore>(&self, store: &mut S) -> Result<Option<NaiveDate>, StoreError> {
        match self {
            AnchorStrategy::Fixed(date) => Ok(Some(*date)),
            AnchorStrategy::LatestInDataset => match store.latest_measurement_date()? {
                Some(latest) => parse_iso_date(&latest)
                    .map(Some)
                    .ok_or(StoreError::InvalidStoredDate(latest)),
                None => Ok(None),
            },
        }
    }
}

/// Anchor plus window length; yields the first date of the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailingWindow {
    pub anchor: AnchorStrategy,
    pub days: u32,
}

impl Default for TrailingWindow {
    fn default() -> Self {
        Self {
            anchor: AnchorStrategy::default(),
            days: DEFAULT_WINDOW_DAYS,
        }
    }
}

impl TrailingWindow {
    /// `anchor - days` in ISO text form, or `None` if there is no anchor.
    pub fn start<S: WeatherStore>(&self, store: &mut S) -> Result<Option<String>, StoreError> {
        let Some(anchor) = self.anchor.resolve(store)? else {
            return Ok(None);
        };
        window_start(anchor, self.days)
            .map(Some)
            .ok_or(StoreError::WindowOutOfRange { anchor, days: self.days })
    }
}

/// First day of the window ending at `anchor`, as `YYYY-MM-DD`.
/// `None` if that day is before the earliest date chrono can represent.
pub fn window_start(anchor: NaiveDate, days: u32) -> Option<String> {
    anchor
        .checked_sub_days(Days::new(u64::from(days)))
        .map(|start| start.format(ISO_DATE_FORMAT).to_string())
}

/// Parses a `YYYY-MM-DD` string. Surrounding whitespace is rejected.
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    if s.trim() != s {
        return None;
    }
    NaiveDate::parse_from_str(s, ISO_DATE_FORMAT).ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
