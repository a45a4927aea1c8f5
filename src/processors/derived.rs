use crate::error::{ProcessingError, Result};
use crate::models::Observation;
use crate::utils::atmosphere::StandardAtmosphereTable;
use crate::utils::constants::{CELSIUS_TO_KELVIN, HPA_TO_PA, KMH_TO_MS};
use crate::utils::humidity::dewpoint_celsius;
use tracing::debug;

/// Wind speed units accepted from station registries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindUnit {
    KilometresPerHour,
    MetresPerSecond,
}

impl WindUnit {
    /// Registries spell kilometres per hour both as "km/h" and "Km/h"
    pub fn parse(unit: &str) -> Option<Self> {
        let unit = unit.trim();
        if unit.eq_ignore_ascii_case("km/h") {
            Some(WindUnit::KilometresPerHour)
        } else if unit.eq_ignore_ascii_case("m/s") {
            Some(WindUnit::MetresPerSecond)
        } else {
            None
        }
    }

    pub fn to_metres_per_second(self, value: f64) -> f64 {
        match self {
            WindUnit::KilometresPerHour => value * KMH_TO_MS,
            WindUnit::MetresPerSecond => value,
        }
    }
}

/// Counters collected while deriving a batch of observations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DerivedStats {
    pub dewpoints_computed: usize,
    pub pressures_estimated: usize,
    pub wind_speeds_converted: usize,
}

/// Fills in derived values and converts units to what WRF expects:
/// wind speed in m/s, temperatures in K and pressure in Pa.
pub struct DerivedQuantities {
    atmosphere: StandardAtmosphereTable,
}

impl DerivedQuantities {
    pub fn new() -> Self {
        Self {
            atmosphere: StandardAtmosphereTable::standard(),
        }
    }

    pub fn apply(&self, observation: Observation) -> Result<Observation> {
        self.apply_counted(observation, &mut DerivedStats::default())
    }

    pub fn apply_all(&self, observations: Vec<Observation>) -> Result<Vec<Observation>> {
        let mut stats = DerivedStats::default();

        let derived = observations
            .into_iter()
            .map(|obs| self.apply_counted(obs, &mut stats))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "Derived quantities: {} dewpoints computed, {} pressures estimated, {} wind speeds converted from km/h",
            stats.dewpoints_computed, stats.pressures_estimated, stats.wind_speeds_converted
        );

        Ok(derived)
    }

    fn apply_counted(&self, mut obs: Observation, stats: &mut DerivedStats) -> Result<Observation> {
        if let Some(station_id) = obs.provenance.wind_speed_station.as_deref() {
            let raw_unit = obs.provenance.wind_speed_unit.as_deref().unwrap_or_default();
            let unit = WindUnit::parse(raw_unit).ok_or_else(|| ProcessingError::UnknownUnit {
                station_id: station_id.to_string(),
                unit: raw_unit.to_string(),
            })?;

            if unit == WindUnit::KilometresPerHour {
                stats.wind_speeds_converted += 1;
            }
            obs.metric.wind_speed = unit.to_metres_per_second(obs.metric.wind_speed);
        }

        if obs.metric.dewpoint.is_nan() {
            obs.metric.dewpoint = dewpoint_celsius(obs.humidity, obs.metric.temperature);
            if !obs.metric.dewpoint.is_nan() {
                stats.dewpoints_computed += 1;
            }
        }

        if !obs.provenance.pressure_measured {
            obs.metric.pressure = self.atmosphere.pressure_hpa(obs.elevation);
            stats.pressures_estimated += 1;
        }

        obs.metric.temperature += CELSIUS_TO_KELVIN;
        obs.metric.dewpoint += CELSIUS_TO_KELVIN;
        obs.metric.pressure *= HPA_TO_PA;

        Ok(obs)
    }
}

impl Default for DerivedQuantities {
    fn default() -> Self {
        Self::new()
    }
}
