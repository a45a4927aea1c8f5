use crate::error::{ProcessingError, Result};
use crate::models::{Reading, RegistrySet, SensorClass};
use crate::processors::{NearestReadingReducer, SensorStreams};
use crate::readers::SeriesReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::info;

/// Reads and reduces the six sensor class series on blocking worker tasks
pub struct ConcurrentReader {
    max_workers: usize,
    use_mmap: bool,
}

impl ConcurrentReader {
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
            use_mmap: false,
        }
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    /// Read every class series and reduce it to one reading per station.
    ///
    /// Returns only once all six classes are done, so the merged result does
    /// not depend on which task finishes first.
    pub async fn read_all_reduced(
        &self,
        data_dir: &Path,
        registries: Arc<RegistrySet>,
        reducer: NearestReadingReducer,
    ) -> Result<SensorStreams> {
        let permits = Arc::new(Semaphore::new(self.max_workers));
        let reducer = Arc::new(reducer);

        let spawn = |class: SensorClass| -> JoinHandle<Result<(SensorClass, Vec<Reading>)>> {
            let permits = permits.clone();
            let registries = registries.clone();
            let reducer = reducer.clone();
            let data_dir: PathBuf = data_dir.to_path_buf();
            let use_mmap = self.use_mmap;

            tokio::spawn(async move {
                let _permit = permits.acquire_owned().await?;

                let readings = tokio::task::spawn_blocking(move || -> Result<Vec<Reading>> {
                    let reader = SeriesReader::with_mmap(use_mmap);
                    let reduced = reader.read_reduced(&data_dir, registries.get(class), &reducer)?;
                    Ok(reduced.into_sorted())
                })
                .await??;

                Ok::<_, ProcessingError>((class, readings))
            })
        };

        let (pressure, humidity, temperature, wind_direction, wind_speed, precipitation) = tokio::try_join!(
            spawn(SensorClass::Pressure),
            spawn(SensorClass::Humidity),
            spawn(SensorClass::Temperature),
            spawn(SensorClass::WindDirection),
            spawn(SensorClass::WindSpeed),
            spawn(SensorClass::Precipitation),
        )?;

        let mut streams = SensorStreams::new();
        for result in [pressure, humidity, temperature, wind_direction, wind_speed, precipitation] {
            let (class, readings) = result?;
            info!("{}: kept {} readings after reduction", class.code(), readings.len());
            streams.set(class, readings);
        }

        Ok(streams)
    }
}

impl Default for ConcurrentReader {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}
