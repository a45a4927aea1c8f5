use crate::error::Result;
use crate::processors::InputFormat;
use crate::utils::constants::DEFAULT_OUTPUT_FILE;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Prefix of environment variables overriding settings, e.g. `OBS2WRF_INPUT_DIR`
pub const ENV_PREFIX: &str = "OBS2WRF";

/// Run settings: built-in defaults, then an optional settings file, then
/// environment variables. Command-line flags are applied on top by the CLI.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub input_dir: PathBuf,
    pub output_file: PathBuf,
    pub format: InputFormat,
    #[serde(default)]
    pub elevation_grid: Option<PathBuf>,
    #[serde(default)]
    pub window_minutes: Option<i64>,
    pub max_workers: usize,
    #[serde(default)]
    pub use_mmap: bool,
}

impl Settings {
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("input_dir", ".")?
            .set_default("output_file", DEFAULT_OUTPUT_FILE)?
            .set_default("format", "DEWETRA")?
            .set_default("max_workers", num_cpus::get() as u64)?
            .set_default("use_mmap", false)?;

        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(true));
        }

        let settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        Ok(settings)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            format: InputFormat::Dewetra,
            elevation_grid: None,
            window_minutes: None,
            max_workers: num_cpus::get(),
            use_mmap: false,
        }
    }
}
