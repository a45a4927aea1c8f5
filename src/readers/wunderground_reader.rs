use crate::error::{ProcessingError, Result};
use crate::models::{Domain, Observation, StationMetadata};
use crate::readers::ElevationSource;
use crate::utils::constants::WUNDERGROUND_DIR_FORMAT;
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Wunderground wind speeds are always reported in km/h
const WUNDERGROUND_WIND_UNIT: &str = "km/h";

/// History files only use an observation this close to the target
const HISTORY_MAX_DELTA_MINUTES: f64 = 30.0;

/// Layout of the files under `<input>/<YYYYMMDDHH>/`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WundergroundKind {
    /// One current-conditions observation per file
    Current,
    /// `{"observations": [...]}` per file, one station each
    History,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WundMetric {
    temp_avg: Option<f64>,
    dewpt_avg: Option<f64>,
    windspeed_avg: Option<f64>,
    pressure_min: Option<f64>,
    pressure_max: Option<f64>,
    precip_total: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WundObservation {
    humidity_avg: Option<f64>,
    winddir_avg: Option<f64>,
    lat: f64,
    lon: f64,
    obs_time_utc: String,
    #[serde(rename = "stationID", alias = "stationId")]
    station_id: String,
    #[serde(default)]
    metric: WundMetric,
}

#[derive(Debug, Deserialize)]
struct WundHistory {
    #[serde(default)]
    observations: Vec<WundObservation>,
}

fn value(v: Option<f64>) -> f64 {
    v.unwrap_or(f64::NAN)
}

fn parse_obs_time(obs: &WundObservation) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&obs.obs_time_utc)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ProcessingError::InvalidTimestamp {
            value: obs.obs_time_utc.clone(),
            context: format!("wunderground station {}", obs.station_id),
        })
}

/// Reads personal weather station observations that are already composite,
/// so they skip the join and go straight to the derived quantities stage
pub struct WundergroundReader<'a> {
    domain: Domain,
    elevations: &'a dyn ElevationSource,
    kind: WundergroundKind,
}

impl<'a> WundergroundReader<'a> {
    pub fn new(domain: Domain, elevations: &'a dyn ElevationSource, kind: WundergroundKind) -> Self {
        Self {
            domain,
            elevations,
            kind,
        }
    }

    pub fn date_dir(input_dir: &Path, target: DateTime<Utc>) -> PathBuf {
        input_dir.join(target.format(WUNDERGROUND_DIR_FORMAT).to_string())
    }

    /// Read every station file for `target`, keeping stations inside the domain
    pub fn read(&self, input_dir: &Path, target: DateTime<Utc>) -> Result<Vec<Observation>> {
        let dir = Self::date_dir(input_dir, target);

        let mut files = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();

        let parsed = files
            .par_iter()
            .map(|path| self.read_file(path, target))
            .collect::<Result<Vec<_>>>()?;

        let mut observations: Vec<Observation> = parsed.into_iter().flatten().collect();
        observations.sort_by(|a, b| a.key().cmp(&b.key()).then_with(|| a.time.cmp(&b.time)));

        info!(
            "Read {} wunderground observations from {} files in {}",
            observations.len(),
            files.len(),
            dir.display()
        );

        Ok(observations)
    }

    fn read_file(&self, path: &Path, target: DateTime<Utc>) -> Result<Option<Observation>> {
        let buf = fs::read(path)?;

        let chosen = match self.kind {
            WundergroundKind::Current => {
                let obs: WundObservation = serde_json::from_slice(&buf)?;
                Some(obs)
            }
            WundergroundKind::History => {
                let history: WundHistory = serde_json::from_slice(&buf)?;
                self.pick_nearest(history.observations, target)?
            }
        };

        let Some(obs) = chosen else {
            debug!("{}: no observations", path.display());
            return Ok(None);
        };

        if !self.domain.contains(obs.lat, obs.lon) {
            return Ok(None);
        }

        self.to_observation(obs).map(Some)
    }

    /// Observation closest to `target` within half an hour, otherwise the
    /// first one in the file
    fn pick_nearest(
        &self,
        observations: Vec<WundObservation>,
        target: DateTime<Utc>,
    ) -> Result<Option<WundObservation>> {
        let mut best: Option<(f64, usize)> = None;

        for (index, obs) in observations.iter().enumerate() {
            let at = parse_obs_time(obs)?;
            let delta = ((at - target).num_seconds() as f64 / 60.0).abs();

            if delta >= HISTORY_MAX_DELTA_MINUTES {
                continue;
            }

            if best.map_or(true, |(best_delta, _)| delta < best_delta) {
                best = Some((delta, index));
            }
        }

        let index = best.map_or(0, |(_, index)| index);
        Ok(observations.into_iter().nth(index))
    }

    fn to_observation(&self, obs: WundObservation) -> Result<Observation> {
        let time = parse_obs_time(&obs)?;
        let elevation = self.elevations.elevation(obs.lat, obs.lon);
        let station = StationMetadata::new(
            obs.station_id.clone(),
            obs.station_id.clone(),
            obs.lat,
            obs.lon,
            elevation,
            Some(WUNDERGROUND_WIND_UNIT.to_string()),
        );

        let mut observation = Observation::seed(&station, time);
        observation.humidity = value(obs.humidity_avg);
        observation.wind_direction = value(obs.winddir_avg);
        observation.metric.temperature = value(obs.metric.temp_avg);
        observation.metric.dewpoint = value(obs.metric.dewpt_avg);
        observation.metric.wind_speed = value(obs.metric.windspeed_avg);
        observation.metric.pressure =
            (value(obs.metric.pressure_min) + value(obs.metric.pressure_max)) / 2.0;
        observation.metric.precipitation = value(obs.metric.precip_total);
        observation.provenance.wind_speed_station = Some(obs.station_id);
        observation.provenance.wind_speed_unit = Some(WUNDERGROUND_WIND_UNIT.to_string());
        observation.provenance.pressure_measured = true;

        Ok(observation)
    }
}
