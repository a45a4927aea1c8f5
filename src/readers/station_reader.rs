use crate::error::Result;
use crate::models::{Domain, RegistrySet, SensorClass, StationMetadata, StationRegistry};
use crate::readers::ElevationSource;
use crate::utils::constants::REGISTRY_SUFFIX;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::info;
use validator::Validate;

/// A station as listed in a webdrops registry file
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryEntry {
    #[serde(alias = "ID", alias = "Id")]
    pub id: String,

    #[serde(alias = "Name", alias = "stationName", alias = "StationName")]
    pub name: String,

    #[serde(alias = "Lat")]
    pub lat: f64,

    #[serde(alias = "Lng", alias = "lon", alias = "Lon")]
    pub lng: f64,

    #[serde(default, alias = "MU", alias = "unit")]
    pub mu: Option<String>,
}

pub struct StationReader<'a> {
    domain: Domain,
    elevations: &'a dyn ElevationSource,
}

impl<'a> StationReader<'a> {
    pub fn new(domain: Domain, elevations: &'a dyn ElevationSource) -> Self {
        Self { domain, elevations }
    }

    pub fn registry_path(data_dir: &Path, class: SensorClass) -> PathBuf {
        data_dir.join(format!("{}{}", class.code(), REGISTRY_SUFFIX))
    }

    /// Read the registry of one sensor class from `<CODE>-registry.json`
    pub fn read_registry(&self, data_dir: &Path, class: SensorClass) -> Result<StationRegistry> {
        let path = Self::registry_path(data_dir, class);
        let file = File::open(&path)?;
        let entries: Vec<RegistryEntry> = serde_json::from_reader(BufReader::new(file))?;

        let registry = self.build_registry(class, entries)?;
        info!(
            "{} registry: {} stations inside domain {}",
            class.code(),
            registry.len(),
            self.domain
        );

        Ok(registry)
    }

    /// Read the registries of all six classes
    pub fn read_all(&self, data_dir: &Path) -> Result<RegistrySet> {
        let registries = SensorClass::ALL
            .into_iter()
            .map(|class| self.read_registry(data_dir, class))
            .collect::<Result<Vec<_>>>()?;

        Ok(RegistrySet::new(registries))
    }

    /// Keep entries inside the domain, attach elevations and reject
    /// duplicated ids
    pub fn build_registry(
        &self,
        class: SensorClass,
        entries: Vec<RegistryEntry>,
    ) -> Result<StationRegistry> {
        let mut registry = StationRegistry::new(class);

        for entry in entries {
            if !self.domain.contains(entry.lat, entry.lng) {
                continue;
            }

            let elevation = self.elevations.elevation(entry.lat, entry.lng);
            let station = StationMetadata::new(
                entry.id, entry.name, entry.lat, entry.lng, elevation, entry.mu,
            );
            station.validate()?;
            registry.insert(station)?;
        }

        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProcessingError;
    use crate::readers::FlatElevation;
    use std::io::Write;
    use tempfile::TempDir;

    const REGISTRY: &str = r#"[
        {"id": "210329130_2", "name": "Foggia Istituto Agrario", "lat": 41.469, "lng": 15.483167, "mu": "m/s"},
        {"ID": "-1937156895_2", "Name": "Genova Centro Funzionale", "Lat": 44.400433, "Lng": 8.947683, "MU": "Km/h"},
        {"id": "999", "name": "Paris", "lat": 48.85, "lng": 2.35}
    ]"#;

    #[test]
    fn test_read_registry_filters_domain() -> Result<()> {
        let dir = TempDir::new()?;
        let mut file = File::create(dir.path().join("ANEMOMETRO-registry.json"))?;
        file.write_all(REGISTRY.as_bytes())?;

        let elevations = FlatElevation(12.0);
        let reader = StationReader::new("34,47,4,20".parse()?, &elevations);
        let registry = reader.read_registry(dir.path(), SensorClass::WindSpeed)?;

        assert_eq!(registry.len(), 2);
        assert!(registry.get("999").is_none());

        let genova = registry.require("-1937156895_2")?;
        assert_eq!(genova.name, "Genova Centro Funzionale");
        assert_eq!(genova.unit.as_deref(), Some("Km/h"));
        assert_eq!(genova.elevation, 12.0);

        Ok(())
    }

    #[test]
    fn test_duplicate_inside_domain_is_fatal() {
        let entries: Vec<RegistryEntry> = serde_json::from_str(
            r#"[{"id": "1", "name": "A", "lat": 44.0, "lng": 8.0},
                {"id": "1", "name": "B", "lat": 44.1, "lng": 8.1}]"#,
        )
        .unwrap();

        let elevations = FlatElevation(0.0);
        let reader = StationReader::new(Domain::world(), &elevations);
        let result = reader.build_registry(SensorClass::Temperature, entries);

        assert!(matches!(
            result,
            Err(ProcessingError::DuplicateStation { .. })
        ));
    }

    #[test]
    fn test_duplicate_outside_domain_is_ignored() {
        let entries: Vec<RegistryEntry> = serde_json::from_str(
            r#"[{"id": "1", "name": "A", "lat": 44.0, "lng": 8.0},
                {"id": "1", "name": "B", "lat": 10.0, "lng": 8.1}]"#,
        )
        .unwrap();

        let elevations = FlatElevation(0.0);
        let reader = StationReader::new("40,50,0,10".parse().unwrap(), &elevations);
        let registry = reader
            .build_registry(SensorClass::Temperature, entries)
            .unwrap();

        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_missing_registry_file() {
        let dir = TempDir::new().unwrap();
        let elevations = FlatElevation(0.0);
        let reader = StationReader::new(Domain::world(), &elevations);

        assert!(matches!(
            reader.read_registry(dir.path(), SensorClass::Pressure),
            Err(ProcessingError::Io(_))
        ));
    }
}
