pub mod concurrent_reader;
pub mod elevation;
pub mod series_reader;
pub mod station_reader;
pub mod wrf_ascii_reader;
pub mod wunderground_reader;

pub use concurrent_reader::ConcurrentReader;
pub use elevation::{ElevationGrid, ElevationSource, FlatElevation};
pub use series_reader::{parse_timestamp, SeriesEntry, SeriesReader};
pub use station_reader::{RegistryEntry, StationReader};
pub use wrf_ascii_reader::{WrfAsciiFile, WrfAsciiReader, WrfField, WrfRecord};
pub use wunderground_reader::{WundergroundKind, WundergroundReader};
