use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV writing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Date parsing error: {0}")]
    DateParse(#[from] chrono::ParseError),

    #[error("Invalid timestamp '{value}' in {context}")]
    InvalidTimestamp { value: String, context: String },

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid domain '{input}': {reason}")]
    InvalidDomain { input: String, reason: String },

    #[error("Unknown wind speed unit '{unit}' for station {station_id}")]
    UnknownUnit { station_id: String, unit: String },

    #[error("Station {station_id} registered twice in {class} registry")]
    DuplicateStation { class: String, station_id: String },

    #[error("Station {station_id} not found in {class} registry")]
    StationNotFound { class: String, station_id: String },

    #[error("Series for sensor {sensor_id} has {timeline} timestamps but {values} values")]
    SeriesLength {
        sensor_id: String,
        timeline: usize,
        values: usize,
    },

    #[error("Invalid reduction window of {minutes} minutes: {reason}")]
    InvalidWindow { minutes: i64, reason: String },

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Async task error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Worker pool closed: {0}")]
    WorkerPool(#[from] tokio::sync::AcquireError),
}
