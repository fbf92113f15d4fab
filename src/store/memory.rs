/// In-memory store.
///
/// Rows live in an `Arc<Dataset>` shared by every store opened from it,
/// so `open` is a pointer clone. Iteration order is insertion order,
/// which plays the role of the storage order a database would return.

use std::collections::HashMap;
use std::sync::Arc;

use super::{StoreSource, WeatherStore};
use crate::error::StoreError;
use crate::model::{
    DateRange, Measurement, PrecipitationReading, Station, StationActivity, TemperatureAggregate,
    TemperatureObservation,
};

/// Immutable measurement and station rows.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub measurements: Vec<Measurement>,
    pub stations: Vec<Station>,
}

/// A store over a shared `Dataset`. Also acts as its own `StoreSource`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Arc<Dataset>,
}

impl MemoryStore {
    pub fn new(dataset: Dataset) -> Self {
        Self { data: Arc::new(dataset) }
    }
}

impl WeatherStore for MemoryStore {
    fn latest_measurement_date(&mut self) -> Result<Option<String>, StoreError> {
        Ok(self.data.measurements.iter().map(|m| m.date.clone()).max())
    }

    fn precipitation_since(&mut self, since: &str) -> Result<Vec<PrecipitationReading>, StoreError> {
        Ok(self
            .data
            .measurements
            .iter()
            .filter(|m| m.date.as_str() >= since)
            .map(|m| PrecipitationReading { date: m.date.clone(), prcp: m.prcp })
            .collect())
    }

    fn stations(&mut self) -> Result<Vec<Station>, StoreError> {
        Ok(self.data.stations.clone())
    }

    fn station_activity(&mut self) -> Result<Vec<StationActivity>, StoreError> {
        // Keep first-seen order so the result reads like a GROUP BY scan.
        let mut order: Vec<&str> = Vec::new();
        let mut counts: HashMap<&str, i64> = HashMap::new();

        for m in &self.data.measurements {
            let count = counts.entry(m.station.as_str()).or_insert_with(|| {
                order.push(m.station.as_str());
                0
            });
            *count += 1;
        }

        Ok(order
            .into_iter()
            .map(|station| StationActivity {
                station: station.to_string(),
                count: counts[station],
            })
            .collect())
    }

    fn temperature_observations(
        &mut self,
        station: &str,
        since: &str,
    ) -> Result<Vec<TemperatureObservation>, StoreError> {
        Ok(self
            .data
            .measurements
            .iter()
            .filter(|m| m.station == station && m.date.as_str() >= since)
            .map(|m| TemperatureObservation { date: m.date.clone(), tobs: m.tobs })
            .collect())
    }

    fn temperature_aggregate(&mut self, range: &DateRange) -> Result<TemperatureAggregate, StoreError> {
        let mut aggregate = TemperatureAggregate::default();
        let mut sum = 0.0;
        let mut n = 0usize;

        for m in self.data.measurements.iter().filter(|m| range.contains(&m.date)) {
            aggregate.min = Some(aggregate.min.map_or(m.tobs, |v| v.min(m.tobs)));
            aggregate.max = Some(aggregate.max.map_or(m.tobs, |v| v.max(m.tobs)));
            sum += m.tobs;
            n += 1;
        }

        if n > 0 {
            aggregate.avg = Some(sum / n as f64);
        }
        Ok(aggregate)
    }
}

impl StoreSource for MemoryStore {
    type Store = MemoryStore;

    fn open(&self) -> Result<Self::Store, StoreError> {
        Ok(self.clone())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fixtures::{measurement, small_dataset};

    #[test]
    fn test_latest_date_is_lexical_max() {
        let mut store = MemoryStore::new(small_dataset());
        assert_eq!(store.latest_measurement_date().unwrap().as_deref(), Some("2017-08-23"));
    }

    #[test]
    fn test_latest_date_of_empty_dataset_is_none() {
        let mut store = MemoryStore::default();
        assert!(store.latest_measurement_date().unwrap().is_none());
    }

    #[test]
    fn test_station_activity_keeps_first_seen_order() {
        let mut store = MemoryStore::new(Dataset {
            measurements: vec![
                measurement("B", "2017-01-01", None, 70.0),
                measurement("A", "2017-01-01", None, 70.0),
                measurement("B", "2017-01-02", None, 71.0),
            ],
            stations: Vec::new(),
        });

        let activity = store.station_activity().unwrap();
        assert_eq!(
            activity,
            vec![
                StationActivity { station: "B".to_string(), count: 2 },
                StationActivity { station: "A".to_string(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_aggregate_matches_hand_computed_values() {
        let mut store = MemoryStore::new(Dataset {
            measurements: vec![
                measurement("A", "2017-01-01", None, 60.0),
                measurement("A", "2017-01-02", None, 70.0),
                measurement("A", "2017-01-03", None, 80.0),
                measurement("A", "2017-02-01", None, 99.0),
            ],
            stations: Vec::new(),
        });
        let range = DateRange {
            start: "2017-01-01".to_string(),
            end: Some("2017-01-31".to_string()),
        };

        let aggregate = store.temperature_aggregate(&range).unwrap();
        assert_eq!(aggregate.min, Some(60.0));
        assert_eq!(aggregate.avg, Some(70.0));
        assert_eq!(aggregate.max, Some(80.0));
    }

    #[test]
    fn test_opened_stores_share_rows() {
        let source = MemoryStore::new(small_dataset());
        let mut a = source.open().unwrap();
        let mut b = source.open().unwrap();
        assert_eq!(a.stations().unwrap(), b.stations().unwrap());
    }
}
