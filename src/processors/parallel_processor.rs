use crate::error::{ProcessingError, Result};
use crate::models::{Domain, Observation};
use crate::processors::{
    DataMerger, DerivedQuantities, IntegrityChecker, IntegrityReport, NearestReadingReducer,
};
use crate::readers::{
    ConcurrentReader, ElevationSource, StationReader, WundergroundKind, WundergroundReader,
};
use crate::utils::progress::ProgressReporter;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

/// Where the observations of a run come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum InputFormat {
    /// Webdrops registries and per-class series
    Dewetra,
    Wunderground,
    WunderHist,
}

impl FromStr for InputFormat {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEWETRA" => Ok(InputFormat::Dewetra),
            "WUNDERGROUND" => Ok(InputFormat::Wunderground),
            "WUNDERHIST" => Ok(InputFormat::WunderHist),
            other => Err(ProcessingError::InvalidFormat(format!(
                "Unknown input format '{}', expected DEWETRA, WUNDERGROUND or WUNDERHIST",
                other
            ))),
        }
    }
}

impl TryFrom<String> for InputFormat {
    type Error = ProcessingError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InputFormat::Dewetra => "DEWETRA",
            InputFormat::Wunderground => "WUNDERGROUND",
            InputFormat::WunderHist => "WUNDERHIST",
        };
        f.write_str(name)
    }
}

/// Runs the whole pipeline: registries, concurrent per-class reduction,
/// join, derived quantities and the coverage check
pub struct ParallelProcessor {
    max_workers: usize,
    domain: Domain,
    window: Option<Duration>,
    use_mmap: bool,
}

impl ParallelProcessor {
    pub fn new(max_workers: usize, domain: Domain) -> Self {
        Self {
            max_workers,
            domain,
            window: None,
            use_mmap: false,
        }
    }

    /// Ignore readings farther than `minutes` from the target. The window
    /// must be non-negative and representable as a duration.
    pub fn with_window_minutes(mut self, minutes: Option<i64>) -> Result<Self> {
        self.window = match minutes {
            None => None,
            Some(minutes) if minutes < 0 => {
                return Err(ProcessingError::InvalidWindow {
                    minutes,
                    reason: "must not be negative".to_string(),
                });
            }
            Some(minutes) => Some(Duration::try_minutes(minutes).ok_or_else(|| {
                ProcessingError::InvalidWindow {
                    minutes,
                    reason: "out of range".to_string(),
                }
            })?),
        };
        Ok(self)
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    pub async fn process(
        &self,
        format: InputFormat,
        input_dir: &Path,
        target: DateTime<Utc>,
        elevations: &dyn ElevationSource,
        progress: Option<&ProgressReporter>,
    ) -> Result<(Vec<Observation>, IntegrityReport)> {
        let observations = match format {
            InputFormat::Dewetra => {
                self.process_dewetra(input_dir, target, elevations, progress)
                    .await?
            }
            InputFormat::Wunderground => self.read_wunderground(
                WundergroundKind::Current,
                input_dir,
                target,
                elevations,
                progress,
            )?,
            InputFormat::WunderHist => self.read_wunderground(
                WundergroundKind::History,
                input_dir,
                target,
                elevations,
                progress,
            )?,
        };

        if let Some(p) = progress {
            p.set_message("Computing derived quantities...");
        }
        let observations = DerivedQuantities::new().apply_all(observations)?;

        if let Some(p) = progress {
            p.set_message("Checking coverage...");
        }
        let report = IntegrityChecker::new().check_integrity(&observations)?;

        if let Some(p) = progress {
            p.finish_with_message(&format!("Assembled {} observations", observations.len()));
        }

        Ok((observations, report))
    }

    /// Registry load, six concurrent reductions, then the join
    async fn process_dewetra(
        &self,
        input_dir: &Path,
        target: DateTime<Utc>,
        elevations: &dyn ElevationSource,
        progress: Option<&ProgressReporter>,
    ) -> Result<Vec<Observation>> {
        if let Some(p) = progress {
            p.set_message("Reading station registries...");
        }

        let registries = StationReader::new(self.domain, elevations).read_all(input_dir)?;
        info!(
            "Loaded {} stations inside domain {}",
            registries.total_stations(),
            self.domain
        );
        let registries = Arc::new(registries);

        if let Some(p) = progress {
            p.set_message("Reading sensor series...");
        }

        let reducer = NearestReadingReducer::new(target).with_window(self.window);
        let streams = ConcurrentReader::new(self.max_workers)
            .with_mmap(self.use_mmap)
            .read_all_reduced(input_dir, registries.clone(), reducer)
            .await?;

        if let Some(p) = progress {
            p.set_message("Joining sensor classes...");
        }

        let observations = DataMerger::new(&registries).merge(&streams)?;
        info!("Joined {} observations", observations.len());

        Ok(observations)
    }

    fn read_wunderground(
        &self,
        kind: WundergroundKind,
        input_dir: &Path,
        target: DateTime<Utc>,
        elevations: &dyn ElevationSource,
        progress: Option<&ProgressReporter>,
    ) -> Result<Vec<Observation>> {
        if let Some(p) = progress {
            p.set_message("Reading wunderground observations...");
        }

        WundergroundReader::new(self.domain, elevations, kind).read(input_dir, target)
    }
}

impl Default for ParallelProcessor {
    fn default() -> Self {
        Self::new(num_cpus::get(), Domain::world())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_format_parse() {
        assert_eq!("dewetra".parse::<InputFormat>().unwrap(), InputFormat::Dewetra);
        assert_eq!("WUNDERHIST".parse::<InputFormat>().unwrap(), InputFormat::WunderHist);
        assert!("netcdf".parse::<InputFormat>().is_err());
        assert_eq!(InputFormat::Wunderground.to_string(), "WUNDERGROUND");
    }

    #[test]
    fn test_window_minutes() {
        let processor = ParallelProcessor::new(1, Domain::world())
            .with_window_minutes(Some(30))
            .unwrap();
        assert_eq!(processor.window, Some(Duration::minutes(30)));

        let processor = ParallelProcessor::new(1, Domain::world())
            .with_window_minutes(None)
            .unwrap();
        assert!(processor.window.is_none());
    }

    #[test]
    fn test_window_minutes_rejects_bad_values() {
        for minutes in [-1, i64::MAX, i64::MIN] {
            let result = ParallelProcessor::new(1, Domain::world()).with_window_minutes(Some(minutes));
            assert!(matches!(
                result,
                Err(ProcessingError::InvalidWindow { minutes: m, .. }) if m == minutes
            ));
        }
    }
}
