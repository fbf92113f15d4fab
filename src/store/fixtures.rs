/// Test fixtures: small hand-built slices of the Hawaii dataset.
///
/// Station metadata matches the real `station` table; measurement rows
/// are chosen to straddle the trailing-year window that ends on
/// 2017-08-23 (window start 2016-08-23).

use crate::model::{Measurement, Station};
use crate::store::Dataset;

pub(crate) fn measurement(station: &str, date: &str, prcp: Option<f64>, tobs: f64) -> Measurement {
    Measurement {
        station: station.to_string(),
        date: date.to_string(),
        prcp,
        tobs,
    }
}

pub(crate) fn station(id: &str, name: &str, latitude: f64, longitude: f64, elevation: f64) -> Station {
    Station {
        station: id.to_string(),
        name: name.to_string(),
        latitude,
        longitude,
        elevation,
    }
}

pub(crate) fn hawaii_stations() -> Vec<Station> {
    vec![
        station("USC00519397", "WAIKIKI 717.2, HI US", 21.2716, -157.8168, 3.0),
        station("USC00513117", "KANEOHE 838.1, HI US", 21.4234, -157.8015, 14.6),
        station("USC00519281", "WAIHEE 837.5, HI US", 21.45167, -157.84889, 32.9),
    ]
}

/// Eleven rows: WAIHEE reports most often (5 rows), two rows fall before
/// the window and one sits exactly on its first day.
pub(crate) fn small_dataset() -> Dataset {
    Dataset {
        measurements: vec![
            measurement("USC00519397", "2016-08-22", Some(0.10), 80.0),
            measurement("USC00519397", "2016-08-23", Some(0.00), 81.0),
            measurement("USC00519397", "2017-01-15", None, 66.0),
            measurement("USC00513117", "2017-01-15", Some(0.25), 68.0),
            measurement("USC00513117", "2017-08-23", Some(0.00), 82.0),
            measurement("USC00519281", "2016-08-01", Some(1.20), 77.0),
            measurement("USC00519281", "2016-08-24", Some(0.05), 79.0),
            measurement("USC00519281", "2017-01-01", Some(0.00), 62.0),
            measurement("USC00519281", "2017-01-31", Some(0.30), 71.0),
            measurement("USC00519281", "2017-08-18", None, 79.0),
            measurement("USC00513117", "2017-06-10", Some(0.02), 77.0),
        ],
        stations: hawaii_stations(),
    }
}
