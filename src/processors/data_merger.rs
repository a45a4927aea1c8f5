use crate::error::Result;
use crate::models::{Observation, Reading, RegistrySet, SensorClass};
use std::cmp::Ordering;
use tracing::debug;

/// The six reduced per-class streams, each sorted by station key and then
/// timestamp
#[derive(Debug, Clone, Default)]
pub struct SensorStreams {
    streams: [Vec<Reading>; 6],
}

impl SensorStreams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the stream of `class`, sorting it into merge order
    pub fn set(&mut self, class: SensorClass, mut readings: Vec<Reading>) {
        readings.sort_by(|a, b| a.key.cmp(&b.key).then_with(|| a.at.cmp(&b.at)));
        self.streams[class as usize] = readings;
    }

    pub fn with(mut self, class: SensorClass, readings: Vec<Reading>) -> Self {
        self.set(class, readings);
        self
    }

    pub fn get(&self, class: SensorClass) -> &[Reading] {
        &self.streams[class as usize]
    }

    pub fn total_readings(&self) -> usize {
        self.streams.iter().map(Vec::len).sum()
    }
}

/// Merge order of two cursor heads; an exhausted cursor sorts last
pub fn cursor_order(a: Option<&Reading>, b: Option<&Reading>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => a.key.cmp(&b.key).then_with(|| a.at.cmp(&b.at)),
    }
}

/// Lock-step k-way merge of per-class streams into observations
pub struct DataMerger<'a> {
    registries: &'a RegistrySet,
}

impl<'a> DataMerger<'a> {
    pub fn new(registries: &'a RegistrySet) -> Self {
        Self { registries }
    }

    /// Merge the streams into one observation per (station, timestamp).
    ///
    /// Each pass picks the smallest head among the six cursors. Every cursor
    /// whose head has the same station key and exactly the same timestamp
    /// contributes its value and advances; a head with the same key but a
    /// different timestamp stays put and becomes its own observation later.
    pub fn merge(&self, streams: &SensorStreams) -> Result<Vec<Observation>> {
        let mut cursors = [0usize; 6];
        let mut observations = Vec::new();
        let mut deferred = 0usize;

        loop {
            let heads: Vec<Option<&Reading>> = SensorClass::ALL
                .iter()
                .map(|class| streams.get(*class).get(cursors[*class as usize]))
                .collect();

            let chosen = SensorClass::ALL
                .iter()
                .zip(heads.iter())
                .min_by(|(_, a), (_, b)| cursor_order(**a, **b));

            let (chosen_class, chosen) = match chosen {
                Some((class, Some(reading))) => (*class, *reading),
                _ => break,
            };

            let station = self
                .registries
                .get(chosen_class)
                .require(&chosen.station_id)?;
            let mut observation = Observation::seed(station, chosen.at);

            for (class, head) in SensorClass::ALL.iter().zip(heads.iter()) {
                let Some(reading) = head else { continue };

                if reading.key != chosen.key {
                    continue;
                }

                if reading.at != chosen.at {
                    deferred += 1;
                    continue;
                }

                self.apply(&mut observation, *class, reading)?;
                cursors[*class as usize] += 1;
            }

            observations.push(observation);
        }

        debug!(
            "Merged {} readings into {} observations ({} readings deferred to a later timestamp)",
            streams.total_readings(),
            observations.len(),
            deferred
        );

        Ok(observations)
    }

    fn apply(&self, observation: &mut Observation, class: SensorClass, reading: &Reading) -> Result<()> {
        let value = reading.sensor_value();

        match class {
            SensorClass::Pressure => {
                observation.metric.pressure = value;
                observation.provenance.pressure_measured = true;
            }
            SensorClass::Humidity => observation.humidity = value,
            SensorClass::Temperature => observation.metric.temperature = value,
            SensorClass::WindDirection => observation.wind_direction = value,
            SensorClass::WindSpeed => {
                let sensor = self
                    .registries
                    .get(SensorClass::WindSpeed)
                    .require(&reading.station_id)?;
                observation.metric.wind_speed = value;
                observation.provenance.wind_speed_station = Some(reading.station_id.clone());
                observation.provenance.wind_speed_unit = sensor.unit.clone();
            }
            SensorClass::Precipitation => observation.metric.precipitation = value,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{StationKey, StationMetadata, StationRegistry};
    use crate::writers::WrfAsciiWriter;
    use chrono::{DateTime, TimeZone, Utc};

    const FOGGIA: &str = "Foggia Istituto Agrario";

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 3, 30, 18, minute, 0).unwrap()
    }

    fn station(id: &str, name: &str, unit: Option<&str>) -> StationMetadata {
        StationMetadata::new(
            id.to_string(),
            name.to_string(),
            41.469,
            15.483167,
            0.0,
            unit.map(str::to_string),
        )
    }

    fn reading(id: &str, name: &str, time: DateTime<Utc>, value: f64) -> Reading {
        Reading::new(StationKey::new(name, 41.469, 15.483167), time, value, id.to_string())
    }

    /// Each class registers the same two physical stations under its own ids
    fn registries() -> RegistrySet {
        RegistrySet::new(SensorClass::ALL.into_iter().map(|class| {
            let unit = (class == SensorClass::WindSpeed).then_some("m/s");
            StationRegistry::from_stations(
                class,
                vec![
                    station(&format!("{}-1", class.code()), FOGGIA, unit),
                    station(&format!("{}-2", class.code()), "Bari", unit),
                ],
            )
            .unwrap()
        }))
    }

    fn id(class: SensorClass, n: u32) -> String {
        format!("{}-{}", class.code(), n)
    }

    fn foggia_streams() -> SensorStreams {
        SensorStreams::new()
            .with(
                SensorClass::Humidity,
                vec![reading(&id(SensorClass::Humidity, 1), FOGGIA, at(0), 75.0)],
            )
            .with(
                SensorClass::WindDirection,
                vec![reading(&id(SensorClass::WindDirection, 1), FOGGIA, at(0), 292.0)],
            )
            .with(
                SensorClass::Temperature,
                vec![reading(&id(SensorClass::Temperature, 1), FOGGIA, at(0), 13.0)],
            )
            .with(
                SensorClass::WindSpeed,
                vec![reading(&id(SensorClass::WindSpeed, 1), FOGGIA, at(0), 0.6)],
            )
            .with(
                SensorClass::Precipitation,
                vec![reading(&id(SensorClass::Precipitation, 1), FOGGIA, at(0), 0.0)],
            )
    }

    #[test]
    fn test_merge_joins_classes_by_station_key() {
        let registries = registries();
        let observations = DataMerger::new(&registries).merge(&foggia_streams()).unwrap();

        assert_eq!(observations.len(), 1);
        let obs = &observations[0];
        // metadata comes from the class whose reading was chosen first
        assert_eq!(obs.station_id, id(SensorClass::Humidity, 1));
        assert_eq!(obs.station_name, FOGGIA);
        assert_eq!(obs.time, at(0));
        assert_eq!(obs.humidity, 75.0);
        assert_eq!(obs.wind_direction, 292.0);
        assert_eq!(obs.metric.temperature, 13.0);
        assert_eq!(obs.metric.wind_speed, 0.6);
        assert_eq!(obs.metric.precipitation, 0.0);
        assert!(obs.metric.pressure.is_nan());
        assert!(obs.metric.dewpoint.is_nan());
        assert!(!obs.provenance.pressure_measured);
        assert_eq!(obs.provenance.wind_speed_unit.as_deref(), Some("m/s"));
        assert_eq!(
            obs.provenance.wind_speed_station,
            Some(id(SensorClass::WindSpeed, 1))
        );
    }

    #[test]
    fn test_merge_emits_stations_in_key_order() {
        let registries = registries();
        let streams = SensorStreams::new()
            .with(
                SensorClass::Temperature,
                vec![
                    reading(&id(SensorClass::Temperature, 1), FOGGIA, at(0), 13.0),
                    reading(&id(SensorClass::Temperature, 2), "Bari", at(0), 15.0),
                ],
            )
            .with(
                SensorClass::Pressure,
                vec![reading(&id(SensorClass::Pressure, 1), FOGGIA, at(0), 1002.0)],
            );

        let observations = DataMerger::new(&registries).merge(&streams).unwrap();

        assert_eq!(observations.len(), 2);
        assert_eq!(observations[0].station_name, "Bari");
        assert!(observations[0].metric.pressure.is_nan());
        assert_eq!(observations[1].station_name, FOGGIA);
        assert_eq!(observations[1].metric.pressure, 1002.0);
        assert!(observations[1].provenance.pressure_measured);
    }

    #[test]
    fn test_timestamp_mismatch_is_not_joined() {
        let registries = registries();
        let streams = SensorStreams::new()
            .with(
                SensorClass::Temperature,
                vec![reading(&id(SensorClass::Temperature, 1), FOGGIA, at(0), 13.0)],
            )
            .with(
                SensorClass::Humidity,
                vec![reading(&id(SensorClass::Humidity, 1), FOGGIA, at(10), 80.0)],
            );

        let observations = DataMerger::new(&registries).merge(&streams).unwrap();

        assert_eq!(observations.len(), 2);
        assert_eq!(observations[0].time, at(0));
        assert_eq!(observations[0].metric.temperature, 13.0);
        assert!(observations[0].humidity.is_nan());
        assert_eq!(observations[1].time, at(10));
        assert_eq!(observations[1].humidity, 80.0);
        assert!(observations[1].metric.temperature.is_nan());
    }

    #[test]
    fn test_missing_sentinel_becomes_nan() {
        let registries = registries();
        let streams = SensorStreams::new().with(
            SensorClass::Pressure,
            vec![reading(&id(SensorClass::Pressure, 1), FOGGIA, at(0), -9998.0)],
        );

        let observations = DataMerger::new(&registries).merge(&streams).unwrap();
        assert!(observations[0].metric.pressure.is_nan());
        assert!(observations[0].provenance.pressure_measured);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let registries = registries();
        let merger = DataMerger::new(&registries);
        let streams = foggia_streams();

        let first = merger.merge(&streams).unwrap();
        let second = merger.merge(&streams).unwrap();

        let writer = WrfAsciiWriter::new();
        assert_eq!(first.len(), second.len());
        assert_eq!(writer.render(&first), writer.render(&second));
    }

    #[test]
    fn test_unknown_station_is_fatal() {
        let registries = registries();
        let streams = SensorStreams::new().with(
            SensorClass::Temperature,
            vec![reading("nope", FOGGIA, at(0), 13.0)],
        );

        assert!(DataMerger::new(&registries).merge(&streams).is_err());
    }

    #[test]
    fn test_empty_streams() {
        let registries = registries();
        let observations = DataMerger::new(&registries)
            .merge(&SensorStreams::new())
            .unwrap();
        assert!(observations.is_empty());
    }

    #[test]
    fn test_cursor_order_puts_exhausted_last() {
        let r = reading("1", FOGGIA, at(0), 1.0);
        assert_eq!(cursor_order(None, Some(&r)), Ordering::Greater);
        assert_eq!(cursor_order(Some(&r), None), Ordering::Less);
        assert_eq!(cursor_order(None, None), Ordering::Equal);
    }
}
