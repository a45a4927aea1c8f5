use crate::utils::coordinates::{format_micro_degrees, to_micro_degrees};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct StationMetadata {
    #[validate(length(min = 1))]
    pub id: String,

    pub name: String,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    /// Meters above sea level
    pub elevation: f64,

    /// Measurement unit, only meaningful for wind speed sensors
    pub unit: Option<String>,
}

impl StationMetadata {
    pub fn new(
        id: String,
        name: String,
        latitude: f64,
        longitude: f64,
        elevation: f64,
        unit: Option<String>,
    ) -> Self {
        Self {
            id,
            name,
            latitude,
            longitude,
            elevation,
            unit,
        }
    }

    pub fn key(&self) -> StationKey {
        StationKey::new(&self.name, self.latitude, self.longitude)
    }
}

/// Identity of a physical station shared across sensor classes.
///
/// Each sensor class registers its own identifier for the same station, so
/// identity is rebuilt from the display name and the coordinates rounded to
/// six decimals. Ordering is by name, then latitude, then longitude.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StationKey {
    name: String,
    lat_micro: i64,
    lon_micro: i64,
}

impl StationKey {
    pub fn new(name: &str, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.to_string(),
            lat_micro: to_micro_degrees(latitude),
            lon_micro: to_micro_degrees(longitude),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for StationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.name,
            format_micro_degrees(self.lat_micro),
            format_micro_degrees(self.lon_micro)
        )
    }
}
