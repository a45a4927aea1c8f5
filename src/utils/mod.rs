pub mod atmosphere;
pub mod constants;
pub mod coordinates;
pub mod filename;
pub mod humidity;
pub mod progress;

pub use atmosphere::{standard_atmosphere_hpa, StandardAtmosphereTable};
pub use constants::*;
pub use filename::{default_csv_path, default_output_path};
pub use humidity::dewpoint_celsius;
pub use progress::ProgressReporter;
