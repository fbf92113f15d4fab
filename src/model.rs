/// Shared data types for the Hawaii climate API.
///
/// Row types mirror the two read-only tables of the dataset
/// (`measurement`, `station`); response types are the JSON shapes
/// returned by the endpoint.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Dataset rows
// ---------------------------------------------------------------------------

/// One row of the `measurement` table.
///
/// `date` is kept in its ISO-8601 text form (`YYYY-MM-DD`) so that
/// lexical comparison matches chronological order.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub station: String,
    pub date: String,
    /// Precipitation in inches; missing for some days.
    pub prcp: Option<f64>,
    /// Temperature observation in °F.
    pub tobs: f64,
}

/// One row of the `station` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub station: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
}

// ---------------------------------------------------------------------------
// Query results
// ---------------------------------------------------------------------------

/// `{date, prcp}` element of `/api/v1.0/precipitation`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecipitationReading {
    pub date: String,
    pub prcp: Option<f64>,
}

/// `{date, tobs}` element of `/api/v1.0/tobs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureObservation {
    pub date: String,
    pub tobs: f64,
}

/// Number of measurement rows recorded by one station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationActivity {
    pub station: String,
    pub count: i64,
}

/// Raw MIN/AVG/MAX aggregate as returned by the store.
///
/// All three fields are `None` when no row matched, which is what an SQL
/// aggregate over an empty set yields.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TemperatureAggregate {
    pub min: Option<f64>,
    pub avg: Option<f64>,
    pub max: Option<f64>,
}

/// `{TMIN, TAVG, TMAX}` response of the start / start-end routes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureStats {
    #[serde(rename = "TMIN")]
    pub tmin: f64,
    #[serde(rename = "TAVG")]
    pub tavg: f64,
    #[serde(rename = "TMAX")]
    pub tmax: f64,
}

impl TemperatureAggregate {
    /// Converts to a response, or `None` if the aggregate matched nothing.
    pub fn into_stats(self) -> Option<TemperatureStats> {
        match (self.min, self.avg, self.max) {
            (Some(tmin), Some(tavg), Some(tmax)) => Some(TemperatureStats { tmin, tavg, tmax }),
            _ => None,
        }
    }
}

/// Inclusive date filter in canonical ISO text form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub start: String,
    pub end: Option<String>,
}

impl DateRange {
    /// True if an ISO date string falls inside the range.
    pub fn contains(&self, date: &str) -> bool {
        date >= self.start.as_str() && self.end.as_deref().is_none_or(|end| date <= end)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
