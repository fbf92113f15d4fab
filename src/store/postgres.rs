/// PostgreSQL-backed store.
///
/// Expects the Hawaii dataset as two tables in one schema:
///
/// ```text
/// measurement(station, date, prcp, tobs)
/// station(station, name, latitude, longitude, elevation)
/// ```
///
/// `date` may be `TEXT` (as imported from the SQLite file) or `DATE`; it
/// is always compared and returned as `date::text`, whose ISO form sorts
/// chronologically. Numeric columns are cast to `float8` on the way out.
///
/// Every request gets its own `Client` through `PostgresSource::open`;
/// the connection closes when the store is dropped.

use postgres::{Client, NoTls};

use super::{StoreSource, WeatherStore};
use crate::error::StoreError;
use crate::model::{
    DateRange, PrecipitationReading, Station, StationActivity, TemperatureAggregate,
    TemperatureObservation,
};

/// Opens one connection per request.
#[derive(Debug, Clone)]
pub struct PostgresSource {
    database_url: String,
    schema: String,
}

impl PostgresSource {
    /// `schema` must already be validated as a plain identifier; it is
    /// interpolated into the SQL text.
    pub fn new(database_url: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            schema: schema.into(),
        }
    }
}

impl StoreSource for PostgresSource {
    type Store = PostgresStore;

    fn open(&self) -> Result<PostgresStore, StoreError> {
        let client = Client::connect(&self.database_url, NoTls).map_err(StoreError::Connect)?;
        Ok(PostgresStore::new(client, &self.schema))
    }
}

/// A store over a single open connection.
pub struct PostgresStore {
    client: Client,
    measurement_table: String,
    station_table: String,
}

impl PostgresStore {
    pub fn new(client: Client, schema: &str) -> Self {
        Self {
            client,
            measurement_table: format!("{}.measurement", schema),
            station_table: format!("{}.station", schema),
        }
    }
}

impl WeatherStore for PostgresStore {
    fn latest_measurement_date(&mut self) -> Result<Option<String>, StoreError> {
        let row = self.client.query_one(
            &format!("SELECT MAX(date::text) FROM {}", self.measurement_table),
            &[],
        )?;
        Ok(row.get(0))
    }

    fn precipitation_since(&mut self, since: &str) -> Result<Vec<PrecipitationReading>, StoreError> {
        let rows = self.client.query(
            &format!(
                "SELECT date::text, prcp::float8
                 FROM {}
                 WHERE date::text >= $1",
                self.measurement_table
            ),
            &[&since],
        )?;

        Ok(rows
            .iter()
            .map(|row| PrecipitationReading {
                date: row.get(0),
                prcp: row.get(1),
            })
            .collect())
    }

    fn stations(&mut self) -> Result<Vec<Station>, StoreError> {
        let rows = self.client.query(
            &format!(
                "SELECT station, name, latitude::float8, longitude::float8, elevation::float8
                 FROM {}",
                self.station_table
            ),
            &[],
        )?;

        Ok(rows
            .iter()
            .map(|row| Station {
                station: row.get(0),
                name: row.get(1),
                latitude: row.get(2),
                longitude: row.get(3),
                elevation: row.get(4),
            })
            .collect())
    }

    fn station_activity(&mut self) -> Result<Vec<StationActivity>, StoreError> {
        let rows = self.client.query(
            &format!(
                "SELECT station, COUNT(*)
                 FROM {}
                 GROUP BY station",
                self.measurement_table
            ),
            &[],
        )?;

        Ok(rows
            .iter()
            .map(|row| StationActivity {
                station: row.get(0),
                count: row.get(1),
            })
            .collect())
    }

    fn temperature_observations(
        &mut self,
        station: &str,
        since: &str,
    ) -> Result<Vec<TemperatureObservation>, StoreError> {
        let rows = self.client.query(
            &format!(
                "SELECT date::text, tobs::float8
                 FROM {}
                 WHERE station = $1 AND date::text >= $2",
                self.measurement_table
            ),
            &[&station, &since],
        )?;

        Ok(rows
            .iter()
            .map(|row| TemperatureObservation {
                date: row.get(0),
                tobs: row.get(1),
            })
            .collect())
    }

    fn temperature_aggregate(&mut self, range: &DateRange) -> Result<TemperatureAggregate, StoreError> {
        let end = range.end.as_deref();
        let row = self.client.query_one(
            &format!(
                "SELECT MIN(tobs)::float8, AVG(tobs)::float8, MAX(tobs)::float8
                 FROM {}
                 WHERE date::text >= $1
                   AND ($2::text IS NULL OR date::text <= $2::text)",
                self.measurement_table
            ),
            &[&range.start, &end],
        )?;

        Ok(TemperatureAggregate {
            min: row.get(0),
            avg: row.get(1),
            max: row.get(2),
        })
    }
}
