use crate::error::{ProcessingError, Result};
use crate::models::{Reading, SensorClass, StationRegistry};
use crate::processors::{NearestReadingReducer, ReducedSeries};
use crate::utils::constants::{
    COMPACT_TIMESTAMP_FORMAT, DEFAULT_BUFFER_SIZE, MMAP_THRESHOLD_BYTES, SERIES_SUFFIX,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use memmap2::Mmap;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Timeline and values of one sensor as delivered by webdrops
#[derive(Debug, Clone, Deserialize)]
pub struct SeriesEntry {
    #[serde(rename = "sensorId", alias = "SensorID", alias = "sensorID", alias = "id")]
    pub sensor_id: String,

    #[serde(alias = "Timeline")]
    pub timeline: Vec<String>,

    #[serde(alias = "Values")]
    pub values: Vec<f64>,
}

/// Parse a series timestamp: RFC 3339, or compact `YYYYMMDDHHMM` taken as UTC
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(trimmed, COMPACT_TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

pub struct SeriesReader {
    use_mmap: bool,
}

impl SeriesReader {
    pub fn new() -> Self {
        Self { use_mmap: false }
    }

    pub fn with_mmap(use_mmap: bool) -> Self {
        Self { use_mmap }
    }

    pub fn series_path(data_dir: &Path, class: SensorClass) -> PathBuf {
        data_dir.join(format!("{}{}", class.code(), SERIES_SUFFIX))
    }

    /// Decode the raw series file of one class. Large files are always
    /// memory mapped.
    pub fn read_entries(&self, path: &Path) -> Result<Vec<SeriesEntry>> {
        let file = File::open(path)?;

        if self.use_mmap || file.metadata()?.len() >= MMAP_THRESHOLD_BYTES {
            let mmap = unsafe { Mmap::map(&file)? };
            Ok(serde_json::from_slice(&mmap)?)
        } else {
            let reader = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file);
            Ok(serde_json::from_reader(reader)?)
        }
    }

    /// Turn series entries into readings for the stations of `registry`.
    ///
    /// Every entry is checked before the registry lookup: a malformed
    /// timestamp or a timeline/values length mismatch fails the whole read,
    /// even for sensors outside the domain. Those sensors are then skipped.
    pub fn to_readings(
        &self,
        entries: Vec<SeriesEntry>,
        registry: &StationRegistry,
    ) -> Result<Vec<Reading>> {
        let mut readings = Vec::new();
        let mut skipped = 0usize;

        for entry in entries {
            if entry.timeline.len() != entry.values.len() {
                return Err(ProcessingError::SeriesLength {
                    sensor_id: entry.sensor_id,
                    timeline: entry.timeline.len(),
                    values: entry.values.len(),
                });
            }

            let times = entry
                .timeline
                .iter()
                .map(|timestamp| {
                    parse_timestamp(timestamp).ok_or_else(|| ProcessingError::InvalidTimestamp {
                        value: timestamp.clone(),
                        context: format!("{} sensor {}", registry.class().code(), entry.sensor_id),
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            let Some(station) = registry.get(&entry.sensor_id) else {
                skipped += 1;
                continue;
            };

            let key = station.key();
            for (at, value) in times.into_iter().zip(entry.values.iter()) {
                readings.push(Reading::new(key.clone(), at, *value, entry.sensor_id.clone()));
            }
        }

        if skipped > 0 {
            debug!(
                "{}: skipped {} sensors outside the domain",
                registry.class().code(),
                skipped
            );
        }

        Ok(readings)
    }

    /// Read one class and reduce it to the nearest reading per station
    pub fn read_reduced(
        &self,
        data_dir: &Path,
        registry: &StationRegistry,
        reducer: &NearestReadingReducer,
    ) -> Result<ReducedSeries> {
        let path = Self::series_path(data_dir, registry.class());
        let entries = self.read_entries(&path)?;
        let readings = self.to_readings(entries, registry)?;
        let total = readings.len();

        let reduced = reducer.reduce(readings);
        debug!(
            "{}: {} readings reduced to {} stations",
            registry.class().code(),
            total,
            reduced.len()
        );

        Ok(reduced)
    }
}

impl Default for SeriesReader {
    fn default() -> Self {
        Self::new()
    }
}
