use crate::error::{ProcessingError, Result};
use crate::models::{SensorClass, StationMetadata};
use std::collections::HashMap;

/// Stations of one sensor class, keyed by the class-specific station id.
/// Built once per run and read-only afterwards.
#[derive(Debug, Clone)]
pub struct StationRegistry {
    class: SensorClass,
    stations: HashMap<String, StationMetadata>,
}

impl StationRegistry {
    pub fn new(class: SensorClass) -> Self {
        Self {
            class,
            stations: HashMap::new(),
        }
    }

    /// Build a registry, failing if the same id appears twice
    pub fn from_stations(
        class: SensorClass,
        stations: impl IntoIterator<Item = StationMetadata>,
    ) -> Result<Self> {
        let mut registry = Self::new(class);
        for station in stations {
            registry.insert(station)?;
        }
        Ok(registry)
    }

    pub fn insert(&mut self, station: StationMetadata) -> Result<()> {
        if self.stations.contains_key(&station.id) {
            return Err(ProcessingError::DuplicateStation {
                class: self.class.code().to_string(),
                station_id: station.id,
            });
        }
        self.stations.insert(station.id.clone(), station);
        Ok(())
    }

    pub fn class(&self) -> SensorClass {
        self.class
    }

    pub fn get(&self, station_id: &str) -> Option<&StationMetadata> {
        self.stations.get(station_id)
    }

    /// Like `get`, but a missing station is an error naming this class
    pub fn require(&self, station_id: &str) -> Result<&StationMetadata> {
        self.get(station_id)
            .ok_or_else(|| ProcessingError::StationNotFound {
                class: self.class.code().to_string(),
                station_id: station_id.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

/// One registry per sensor class
#[derive(Debug, Clone)]
pub struct RegistrySet {
    registries: HashMap<SensorClass, StationRegistry>,
}

impl RegistrySet {
    pub fn new(registries: impl IntoIterator<Item = StationRegistry>) -> Self {
        let mut map = HashMap::new();
        for registry in registries {
            map.insert(registry.class(), registry);
        }

        for class in SensorClass::ALL {
            map.entry(class).or_insert_with(|| StationRegistry::new(class));
        }

        Self { registries: map }
    }

    pub fn get(&self, class: SensorClass) -> &StationRegistry {
        // every class is inserted in `new`
        &self.registries[&class]
    }

    pub fn total_stations(&self) -> usize {
        self.registries.values().map(StationRegistry::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(id: &str) -> StationMetadata {
        StationMetadata::new(id.to_string(), "Genova".to_string(), 44.4, 8.93, 20.0, None)
    }

    #[test]
    fn test_duplicate_id_is_fatal() {
        let result =
            StationRegistry::from_stations(SensorClass::Humidity, vec![station("1"), station("1")]);
        match result {
            Err(ProcessingError::DuplicateStation { class, station_id }) => {
                assert_eq!(class, "IGROMETRO");
                assert_eq!(station_id, "1");
            }
            other => panic!("expected duplicate station error, got {:?}", other),
        }
    }

    #[test]
    fn test_require_names_class() {
        let registry =
            StationRegistry::from_stations(SensorClass::Pressure, vec![station("7")]).unwrap();
        assert_eq!(registry.require("7").unwrap().id, "7");
        let err = registry.require("8").unwrap_err().to_string();
        assert!(err.contains("BAROMETRO"));
        assert!(err.contains('8'));
    }

    #[test]
    fn test_registry_set_has_every_class() {
        let set = RegistrySet::new(vec![StationRegistry::from_stations(
            SensorClass::Temperature,
            vec![station("1"), station("2")],
        )
        .unwrap()]);

        assert_eq!(set.get(SensorClass::Temperature).len(), 2);
        assert!(set.get(SensorClass::WindSpeed).is_empty());
        assert_eq!(set.total_stations(), 2);
    }
}
