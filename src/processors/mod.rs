pub mod data_merger;
pub mod derived;
pub mod integrity_checker;
pub mod parallel_processor;
pub mod reducer;

pub use data_merger::{cursor_order, DataMerger, SensorStreams};
pub use derived::{DerivedQuantities, DerivedStats, WindUnit};
pub use integrity_checker::{IntegrityChecker, IntegrityReport, Variable};
pub use parallel_processor::{InputFormat, ParallelProcessor};
pub use reducer::{NearestReadingReducer, ReducedSeries};
