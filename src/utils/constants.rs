/// Raw value reported by webdrops sensors that have no measurement
pub const RAW_MISSING_VALUE: f64 = -9998.0;

/// Value written in place of a missing measurement in ob.ascii files
pub const WRF_MISSING_VALUE: f64 = -888888.0;

/// Substring that marks a rendered value as missing
pub const WRF_MISSING_MARKER: &str = "-888";

/// Quality control codes
pub const QC_GOOD: i32 = 0;
pub const QC_MISSING: i32 = -88;

/// File names
pub const DEFAULT_OUTPUT_FILE: &str = "ob.ascii";
pub const REGISTRY_SUFFIX: &str = "-registry.json";
pub const SERIES_SUFFIX: &str = ".json";

/// Directory names for Wunderground archives use the target hour
pub const WUNDERGROUND_DIR_FORMAT: &str = "%Y%m%d%H";

/// Timestamp formats
pub const TARGET_DATE_FORMAT: &str = "%Y%m%d%H";
pub const COMPACT_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M";
pub const WRF_DATE_FORMAT: &str = "%Y-%m-%d_%H:%M:%S";

/// Unit conversions
pub const KMH_TO_MS: f64 = 0.277778;
pub const CELSIUS_TO_KELVIN: f64 = 273.15;
pub const HPA_TO_PA: f64 = 100.0;

/// Processing defaults
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB
pub const MMAP_THRESHOLD_BYTES: u64 = 16 * 1024 * 1024;

/// Widest reduction window accepted on the command line (one leap year)
pub const MAX_WINDOW_MINUTES: i64 = 366 * 24 * 60;
