/// Query service: one method per route.
///
/// Each call is a stateless read against the store it is given; nothing
/// is cached between calls, so identical inputs over unchanged data give
/// identical results.

use log::debug;

use crate::anchor::{parse_iso_date, TrailingWindow, ISO_DATE_FORMAT};
use crate::error::ServiceError;
use crate::model::{
    DateRange, PrecipitationReading, Station, StationActivity, TemperatureObservation,
    TemperatureStats,
};
use crate::store::WeatherStore;

/// Plain-text listing served at `/`.
pub const ROUTE_LISTING: &str = "Available Routes:\n\
    /api/v1.0/precipitation\n\
    /api/v1.0/stations\n\
    /api/v1.0/tobs\n\
    /api/v1.0/<start>\n\
    /api/v1.0/<start>/<end>\n";

/// Answers the fixed questions against a borrowed store.
pub struct QueryService<'a, S: WeatherStore> {
    store: &'a mut S,
    window: TrailingWindow,
}

impl<'a, S: WeatherStore> QueryService<'a, S> {
    pub fn new(store: &'a mut S, window: TrailingWindow) -> Self {
        Self { store, window }
    }

    /// Static listing of the available routes.
    pub fn list_routes() -> &'static str {
        ROUTE_LISTING
    }

    /// Precipitation for the trailing window, in storage order.
    pub fn precipitation(&mut self) -> Result<Vec<PrecipitationReading>, ServiceError> {
        match self.window.start(self.store)? {
            Some(since) => Ok(self.store.precipitation_since(&since)?),
            None => Ok(Vec::new()),
        }
    }

    /// The full station roster.
    pub fn stations(&mut self) -> Result<Vec<Station>, ServiceError> {
        Ok(self.store.stations()?)
    }

    /// Temperature observations of the most active station over the
    /// trailing window.
    pub fn temperature_observations(&mut self) -> Result<Vec<TemperatureObservation>, ServiceError> {
        let activity = self.store.station_activity()?;
        let Some(most_active) = most_active_station(&activity) else {
            return Ok(Vec::new());
        };
        debug!("Most active station: {} ({} rows)", most_active.station, most_active.count);

        match self.window.start(self.store)? {
            Some(since) => Ok(self
                .store
                .temperature_observations(&most_active.station, &since)?),
            None => Ok(Vec::new()),
        }
    }

    /// TMIN/TAVG/TMAX from `start` onwards, optionally up to `end`.
    /// Both bounds are inclusive `YYYY-MM-DD` dates.
    pub fn temperature_stats(
        &mut self,
        start: &str,
        end: Option<&str>,
    ) -> Result<TemperatureStats, ServiceError> {
        let range = parse_date_range(start, end)?;
        let aggregate = self.store.temperature_aggregate(&range)?;

        aggregate.into_stats().ok_or_else(|| {
            ServiceError::EmptyResult(match &range.end {
                Some(end) => format!("between {} and {}", range.start, end),
                None => format!("from {}", range.start),
            })
        })
    }
}

/// Station with the most rows; ties go to the smallest station id.
pub fn most_active_station(activity: &[StationActivity]) -> Option<&StationActivity> {
    activity
        .iter()
        .max_by(|a, b| a.count.cmp(&b.count).then_with(|| b.station.cmp(&a.station)))
}

/// Validates path-segment dates and renders them in canonical ISO form.
pub fn parse_date_range(start: &str, end: Option<&str>) -> Result<DateRange, ServiceError> {
    let start_date = parse_iso_date(start).ok_or_else(|| malformed("start", start))?;
    let end_date = end
        .map(|e| parse_iso_date(e).ok_or_else(|| malformed("end", e)))
        .transpose()?;

    if let Some(end_date) = end_date {
        if end_date < start_date {
            return Err(ServiceError::MalformedInput(format!(
                "End date {} is before start date {}",
                end_date, start_date
            )));
        }
    }

    Ok(DateRange {
        start: start_date.format(ISO_DATE_FORMAT).to_string(),
        end: end_date.map(|d| d.format(ISO_DATE_FORMAT).to_string()),
    })
}

fn malformed(which: &str, value: &str) -> ServiceError {
    ServiceError::MalformedInput(format!(
        "Invalid {} date '{}': expected YYYY-MM-DD",
        which, value
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
