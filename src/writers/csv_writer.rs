use crate::error::Result;
use crate::models::Observation;
use crate::writers::wrf_ascii::fixed;
use chrono::SecondsFormat;
use csv::Writer;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tracing::info;

pub const CSV_COLUMNS: [&str; 10] = [
    "station_id",
    "latitude",
    "longitude",
    "elevation",
    "time",
    "pressure",
    "precipitation",
    "humidity",
    "temperature",
    "wind_speed",
];

fn number(value: f64) -> String {
    fixed(value, 0, 3).trim_start().to_string()
}

/// Flat table of the assembled observations, one row each
pub struct CsvWriter;

impl CsvWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_file(&self, observations: &[Observation], path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(path)?;
        self.write(observations, file)?;

        info!("Wrote {} observations to {}", observations.len(), path.display());
        Ok(())
    }

    pub fn write<W: Write>(&self, observations: &[Observation], sink: W) -> Result<()> {
        let mut writer = Writer::from_writer(sink);
        writer.write_record(CSV_COLUMNS)?;

        for obs in observations {
            writer.write_record([
                obs.station_id.clone(),
                number(obs.latitude),
                number(obs.longitude),
                number(obs.elevation),
                obs.time.to_rfc3339_opts(SecondsFormat::Secs, true),
                number(obs.metric.pressure),
                number(obs.metric.precipitation),
                number(obs.humidity),
                number(obs.metric.temperature),
                number(obs.metric.wind_speed),
            ])?;
        }

        writer.flush()?;
        Ok(())
    }
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}
