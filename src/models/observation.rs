use crate::models::{StationKey, StationMetadata};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metric group of an observation. Temperatures are in °C and pressure in hPa
/// until the derived quantities stage converts them to K and Pa.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObservationMetric {
    pub temperature: f64,
    pub dewpoint: f64,
    pub wind_speed: f64,
    pub pressure: f64,
    pub precipitation: f64,
}

impl Default for ObservationMetric {
    fn default() -> Self {
        Self {
            temperature: f64::NAN,
            dewpoint: f64::NAN,
            wind_speed: f64::NAN,
            pressure: f64::NAN,
            precipitation: f64::NAN,
        }
    }
}

/// Where values of an observation came from, consumed by the derived
/// quantities stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    /// Station id of the wind speed sensor that contributed a value
    pub wind_speed_station: Option<String>,
    /// Unit string registered for that wind speed sensor
    pub wind_speed_unit: Option<String>,
    /// A pressure reading matched at join time (its value may still be NaN)
    pub pressure_measured: bool,
}

/// All sensor classes of one station at one instant
/// Names of the values returned by [`Observation::numeric_fields`]
pub const NUMERIC_FIELD_NAMES: [&str; 10] = [
    "latitude",
    "longitude",
    "elevation",
    "humidity",
    "wind direction",
    "temperature",
    "dewpoint",
    "wind speed",
    "pressure",
    "precipitation",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub station_id: String,
    pub station_name: String,
    pub time: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
    pub humidity: f64,
    pub wind_direction: f64,
    pub metric: ObservationMetric,
    pub provenance: Provenance,
}

impl Observation {
    /// Seed an observation from station metadata with every metric missing
    pub fn seed(station: &StationMetadata, time: DateTime<Utc>) -> Self {
        Self {
            station_id: station.id.clone(),
            station_name: station.name.clone(),
            time,
            latitude: station.latitude,
            longitude: station.longitude,
            elevation: station.elevation,
            humidity: f64::NAN,
            wind_direction: f64::NAN,
            metric: ObservationMetric::default(),
            provenance: Provenance::default(),
        }
    }

    pub fn key(&self) -> StationKey {
        StationKey::new(&self.station_name, self.latitude, self.longitude)
    }

    /// Every numeric field in the order they appear in the encoded record
    pub fn numeric_fields(&self) -> [f64; 10] {
        [
            self.latitude,
            self.longitude,
            self.elevation,
            self.humidity,
            self.wind_direction,
            self.metric.temperature,
            self.metric.dewpoint,
            self.metric.wind_speed,
            self.metric.pressure,
            self.metric.precipitation,
        ]
    }

    /// True when each numeric field is either finite or NaN
    pub fn has_no_infinities(&self) -> bool {
        self.numeric_fields()
            .iter()
            .all(|v| v.is_finite() || v.is_nan())
    }
}
