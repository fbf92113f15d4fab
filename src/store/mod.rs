/// Read-only access to the measurement and station tables.
///
/// `WeatherStore` is the set of query primitives the service needs; each
/// method corresponds to a single query. `StoreSource` hands out one store
/// per request, so no handle outlives the request that opened it.
///
/// Two backends:
/// - `postgres` - the production dataset, one connection per request
/// - `memory`   - shared in-process rows, insertion order = storage order

pub mod memory;
pub mod postgres;

#[cfg(test)]
pub(crate) mod fixtures;

use crate::error::StoreError;
use crate::model::{
    DateRange, PrecipitationReading, Station, StationActivity, TemperatureAggregate,
    TemperatureObservation,
};

pub use self::memory::{Dataset, MemoryStore};
pub use self::postgres::{PostgresSource, PostgresStore};

/// Query primitives over the dataset. Dates are ISO-8601 strings.
pub trait WeatherStore {
    /// Greatest `date` in the measurement table, `None` if it is empty.
    fn latest_measurement_date(&mut self) -> Result<Option<String>, StoreError>;

    /// `{date, prcp}` for every measurement with `date >= since`, in storage order.
    fn precipitation_since(&mut self, since: &str) -> Result<Vec<PrecipitationReading>, StoreError>;

    /// The full station roster, in storage order.
    fn stations(&mut self) -> Result<Vec<Station>, StoreError>;

    /// Row count per station over all measurements.
    fn station_activity(&mut self) -> Result<Vec<StationActivity>, StoreError>;

    /// `{date, tobs}` for one station with `date >= since`, in storage order.
    fn temperature_observations(
        &mut self,
        station: &str,
        since: &str,
    ) -> Result<Vec<TemperatureObservation>, StoreError>;

    /// MIN/AVG/MAX of `tobs` over measurements inside `range`.
    fn temperature_aggregate(&mut self, range: &DateRange) -> Result<TemperatureAggregate, StoreError>;
}

/// Opens a store scoped to one request. Dropping the store releases it.
pub trait StoreSource: Send + Sync + 'static {
    type Store: WeatherStore;

    fn open(&self) -> Result<Self::Store, StoreError>;
}
