use crate::utils::constants::{DEFAULT_OUTPUT_FILE, TARGET_DATE_FORMAT};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// Default artifact path: `ob.ascii` inside `dir`
pub fn default_output_path(dir: &Path) -> PathBuf {
    dir.join(DEFAULT_OUTPUT_FILE)
}

/// Default CSV side file next to `output`: `observations-{YYYYMMDDHH}.csv`
pub fn default_csv_path(output: &Path, target: DateTime<Utc>) -> PathBuf {
    let filename = format!("observations-{}.csv", target.format(TARGET_DATE_FORMAT));
    match output.parent() {
        Some(parent) => parent.join(filename),
        None => PathBuf::from(filename),
    }
}
