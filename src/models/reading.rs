use crate::models::StationKey;
use crate::utils::constants::RAW_MISSING_VALUE;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One measured variable type. Each class is delivered as its own series
/// with its own station registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SensorClass {
    Pressure,
    Humidity,
    Temperature,
    WindDirection,
    WindSpeed,
    Precipitation,
}

impl SensorClass {
    pub const ALL: [SensorClass; 6] = [
        SensorClass::Pressure,
        SensorClass::Humidity,
        SensorClass::Temperature,
        SensorClass::WindDirection,
        SensorClass::WindSpeed,
        SensorClass::Precipitation,
    ];

    /// Class code used by the webdrops service for file names
    pub fn code(&self) -> &'static str {
        match self {
            SensorClass::Pressure => "BAROMETRO",
            SensorClass::Humidity => "IGROMETRO",
            SensorClass::Temperature => "TERMOMETRO",
            SensorClass::WindDirection => "DIREZIONEVENTO",
            SensorClass::WindSpeed => "ANEMOMETRO",
            SensorClass::Precipitation => "PLUVIOMETRO",
        }
    }
}

impl fmt::Display for SensorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SensorClass::Pressure => "pressure",
            SensorClass::Humidity => "humidity",
            SensorClass::Temperature => "temperature",
            SensorClass::WindDirection => "wind direction",
            SensorClass::WindSpeed => "wind speed",
            SensorClass::Precipitation => "precipitation",
        };
        f.write_str(name)
    }
}

/// A single sensor value at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub key: StationKey,
    pub at: DateTime<Utc>,
    pub value: f64,
    pub station_id: String,
}

impl Reading {
    pub fn new(key: StationKey, at: DateTime<Utc>, value: f64, station_id: String) -> Self {
        Self {
            key,
            at,
            value,
            station_id,
        }
    }

    /// The measured value, or NaN when the sensor reported the missing sentinel
    pub fn sensor_value(&self) -> f64 {
        if self.value == RAW_MISSING_VALUE {
            f64::NAN
        } else {
            self.value
        }
    }
}
