use crate::models::Domain;
use crate::processors::InputFormat;
use crate::utils::constants::{MAX_WINDOW_MINUTES, TARGET_DATE_FORMAT};
use chrono::{DateTime, NaiveDateTime, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "obs-to-wrf")]
#[command(about = "Assemble weather station observations into WRF data assimilation ob.ascii files")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Settings file (TOML, YAML or JSON)")]
    pub config: Option<PathBuf>,
}

/// Parse a `YYYYMMDDHH` target instant, taken as UTC
pub fn parse_target_date(value: &str) -> std::result::Result<DateTime<Utc>, String> {
    NaiveDateTime::parse_from_str(&format!("{}00", value.trim()), &format!("{}%M", TARGET_DATE_FORMAT))
        .map(|naive| naive.and_utc())
        .map_err(|e| format!("expected YYYYMMDDHH, got '{}': {}", value, e))
}

/// Inputs shared by the commands that run the pipeline
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    #[arg(
        short,
        long,
        allow_hyphen_values = true,
        help = "Domain as MINLAT,MAXLAT,MINLON,MAXLON"
    )]
    pub domain: Domain,

    #[arg(long, value_parser = parse_target_date, help = "Target instant as YYYYMMDDHH (UTC)")]
    pub date: DateTime<Utc>,

    #[arg(short, long, help = "Input directory [default: from settings]")]
    pub input: Option<PathBuf>,

    #[arg(long, help = "Input format: DEWETRA, WUNDERGROUND or WUNDERHIST")]
    pub format: Option<InputFormat>,

    #[arg(long, help = "Elevation grid JSON file")]
    pub elevation_grid: Option<PathBuf>,

    #[arg(
        long,
        value_parser = clap::value_parser!(i64).range(0..=MAX_WINDOW_MINUTES),
        help = "Ignore readings farther than this many minutes from the target"
    )]
    pub window_minutes: Option<i64>,

    #[arg(long)]
    pub max_workers: Option<usize>,

    #[arg(long, help = "Memory map series files")]
    pub mmap: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Assemble observations and write the ob.ascii file
    Convert {
        #[command(flatten)]
        input: InputArgs,

        #[arg(short, long, help = "Output file, or a directory to write ob.ascii into [default: ob.ascii]")]
        output: Option<PathBuf>,

        #[arg(
            long,
            num_args = 0..=1,
            help = "Also write a CSV table [default: observations-{YYYYMMDDHH}.csv next to the output]"
        )]
        csv: Option<Option<PathBuf>>,
    },

    /// Run the pipeline and print the coverage report without writing output
    Validate {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Display the contents of an ob.ascii file
    Inspect {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(short, long, default_value = "10")]
        sample: usize,
    },
}
