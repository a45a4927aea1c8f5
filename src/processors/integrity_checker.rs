use crate::error::Result;
use crate::models::observation::NUMERIC_FIELD_NAMES;
use crate::models::{Observation, StationKey};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Variables reported by the coverage check
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Variable {
    Pressure,
    WindSpeed,
    WindDirection,
    Temperature,
    Dewpoint,
    Humidity,
    Precipitation,
}

impl Variable {
    pub const ALL: [Variable; 7] = [
        Variable::Pressure,
        Variable::WindSpeed,
        Variable::WindDirection,
        Variable::Temperature,
        Variable::Dewpoint,
        Variable::Humidity,
        Variable::Precipitation,
    ];

    pub fn value(&self, obs: &Observation) -> f64 {
        match self {
            Variable::Pressure => obs.metric.pressure,
            Variable::WindSpeed => obs.metric.wind_speed,
            Variable::WindDirection => obs.wind_direction,
            Variable::Temperature => obs.metric.temperature,
            Variable::Dewpoint => obs.metric.dewpoint,
            Variable::Humidity => obs.humidity,
            Variable::Precipitation => obs.metric.precipitation,
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Variable::Pressure => "pressure",
            Variable::WindSpeed => "wind speed",
            Variable::WindDirection => "wind direction",
            Variable::Temperature => "temperature",
            Variable::Dewpoint => "dewpoint",
            Variable::Humidity => "humidity",
            Variable::Precipitation => "precipitation",
        };
        f.write_str(name)
    }
}

/// Observation with a value that is neither finite nor missing
#[derive(Debug, Clone)]
pub struct InfiniteValue {
    pub station_id: String,
    pub details: String,
}

#[derive(Debug, Clone, Default)]
pub struct IntegrityReport {
    pub total_observations: usize,
    pub distinct_stations: usize,
    pub complete_observations: usize,
    pub estimated_pressures: usize,
    pub missing_by_variable: BTreeMap<Variable, usize>,
    pub infinite_values: Vec<InfiniteValue>,
}

impl IntegrityReport {
    pub fn missing(&self, variable: Variable) -> usize {
        self.missing_by_variable.get(&variable).copied().unwrap_or(0)
    }

    pub fn is_clean(&self) -> bool {
        self.infinite_values.is_empty()
    }
}

/// Summarises how many variables each run could fill
pub struct IntegrityChecker;

impl IntegrityChecker {
    pub fn new() -> Self {
        Self
    }

    pub fn check_integrity(&self, observations: &[Observation]) -> Result<IntegrityReport> {
        let mut report = IntegrityReport {
            total_observations: observations.len(),
            ..Default::default()
        };
        let mut stations: HashSet<StationKey> = HashSet::new();

        for variable in Variable::ALL {
            report.missing_by_variable.insert(variable, 0);
        }

        for obs in observations {
            stations.insert(obs.key());

            if !obs.provenance.pressure_measured {
                report.estimated_pressures += 1;
            }

            let mut complete = true;
            for variable in Variable::ALL {
                let value = variable.value(obs);
                if value.is_nan() {
                    complete = false;
                    *report.missing_by_variable.entry(variable).or_default() += 1;
                }
            }

            if !obs.has_no_infinities() {
                for (name, value) in NUMERIC_FIELD_NAMES.iter().zip(obs.numeric_fields()) {
                    if value.is_infinite() {
                        report.infinite_values.push(InfiniteValue {
                            station_id: obs.station_id.clone(),
                            details: format!("{} is {}", name, value),
                        });
                    }
                }
            }

            if complete {
                report.complete_observations += 1;
            }
        }

        report.distinct_stations = stations.len();
        Ok(report)
    }

    pub fn generate_summary(&self, report: &IntegrityReport) -> String {
        let mut summary = String::new();
        let percent = |count: usize| {
            if report.total_observations == 0 {
                0.0
            } else {
                100.0 * count as f64 / report.total_observations as f64
            }
        };

        summary.push_str("=== Observation Coverage Report ===\n");
        summary.push_str(&format!("Observations: {}\n", report.total_observations));
        summary.push_str(&format!("Stations: {}\n", report.distinct_stations));
        summary.push_str(&format!(
            "Complete Observations: {} ({:.1}%)\n",
            report.complete_observations,
            percent(report.complete_observations)
        ));
        summary.push_str(&format!(
            "Estimated Pressures: {} ({:.1}%)\n",
            report.estimated_pressures,
            percent(report.estimated_pressures)
        ));

        summary.push_str("\nMissing Values:\n");
        for (variable, count) in &report.missing_by_variable {
            summary.push_str(&format!(
                "  {:<15} {:>6} ({:.1}%)\n",
                variable.to_string(),
                count,
                percent(*count)
            ));
        }

        if !report.infinite_values.is_empty() {
            summary.push_str(&format!(
                "\nInfinite Values: {}\n",
                report.infinite_values.len()
            ));
            for (i, bad) in report.infinite_values.iter().take(10).enumerate() {
                summary.push_str(&format!("  {}. Station {}: {}\n", i + 1, bad.station_id, bad.details));
            }
        }

        summary
    }
}

impl Default for IntegrityChecker {
    fn default() -> Self {
        Self::new()
    }
}
