use crate::models::{Reading, StationKey};
use chrono::{DateTime, Duration, Utc};
use std::cmp::Ordering;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Keeps, for every station, the reading closest in time to a target instant.
///
/// Ties on distance go to the smaller raw station id, then to the earlier
/// timestamp. An exact duplicate (same id and timestamp) keeps the reading
/// seen first.
#[derive(Debug, Clone)]
pub struct NearestReadingReducer {
    target: DateTime<Utc>,
    window: Option<Duration>,
}

impl NearestReadingReducer {
    pub fn new(target: DateTime<Utc>) -> Self {
        Self {
            target,
            window: None,
        }
    }

    /// Ignore readings farther than `window` from the target
    pub fn with_window(mut self, window: Option<Duration>) -> Self {
        self.window = window;
        self
    }

    fn distance_ms(&self, reading: &Reading) -> i64 {
        (reading.at - self.target).num_milliseconds().abs()
    }

    fn in_window(&self, reading: &Reading) -> bool {
        match self.window {
            Some(window) => self.distance_ms(reading) <= window.num_milliseconds(),
            None => true,
        }
    }

    /// Ordering of two candidates for the same station; `Less` is better
    pub fn compare(&self, a: &Reading, b: &Reading) -> Ordering {
        self.distance_ms(a)
            .cmp(&self.distance_ms(b))
            .then_with(|| a.station_id.cmp(&b.station_id))
            .then_with(|| a.at.cmp(&b.at))
    }

    /// Collapse a reading stream to one reading per station
    pub fn reduce(&self, readings: impl IntoIterator<Item = Reading>) -> ReducedSeries {
        let mut best: BTreeMap<StationKey, Reading> = BTreeMap::new();

        for reading in readings {
            if !self.in_window(&reading) {
                continue;
            }

            match best.entry(reading.key.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(reading);
                }
                Entry::Occupied(mut slot) => {
                    if self.compare(&reading, slot.get()) == Ordering::Less {
                        slot.insert(reading);
                    }
                }
            }
        }

        ReducedSeries { readings: best }
    }
}

/// At most one reading per station, ordered by station key
#[derive(Debug, Clone, Default)]
pub struct ReducedSeries {
    readings: BTreeMap<StationKey, Reading>,
}

impl ReducedSeries {
    pub fn get(&self, key: &StationKey) -> Option<&Reading> {
        self.readings.get(key)
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Readings sorted by station key (and so by timestamp within a key)
    pub fn into_sorted(self) -> Vec<Reading> {
        self.readings.into_values().collect()
    }
}
