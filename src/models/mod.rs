pub mod domain;
pub mod observation;
pub mod reading;
pub mod registry;
pub mod station;

pub use domain::Domain;
pub use observation::{Observation, ObservationMetric, Provenance};
pub use reading::{Reading, SensorClass};
pub use registry::{RegistrySet, StationRegistry};
pub use station::{StationKey, StationMetadata};
