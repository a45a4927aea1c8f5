use crate::error::{ProcessingError, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// Grid cells with this value, or NaN, lie on the sea
const GRID_NO_DATA: f64 = -9999.0;

/// Terrain height lookup for station coordinates
pub trait ElevationSource: Send + Sync {
    /// Meters above sea level at `latitude`, `longitude`
    fn elevation(&self, latitude: f64, longitude: f64) -> f64;
}

/// Same elevation everywhere; used when no orography raster is available
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatElevation(pub f64);

impl ElevationSource for FlatElevation {
    fn elevation(&self, _latitude: f64, _longitude: f64) -> f64 {
        self.0
    }
}

#[derive(Debug, Deserialize)]
struct GridFile {
    x: Vec<f64>,
    y: Vec<f64>,
    z: Vec<f64>,
}

/// Regular orography raster with nearest-pixel lookup.
///
/// `x` holds longitudes in ascending order, `y` latitudes in descending order
/// (first row is the northernmost) and `z` the row-major heights.
#[derive(Debug, Clone)]
pub struct ElevationGrid {
    xs: Vec<f64>,
    ys: Vec<f64>,
    zs: Vec<f64>,
}

impl ElevationGrid {
    pub fn new(xs: Vec<f64>, ys: Vec<f64>, zs: Vec<f64>) -> Result<Self> {
        if xs.len() < 2 || ys.len() < 2 {
            return Err(ProcessingError::InvalidFormat(
                "Elevation grid needs at least two columns and two rows".to_string(),
            ));
        }

        if zs.len() != xs.len() * ys.len() {
            return Err(ProcessingError::InvalidFormat(format!(
                "Elevation grid has {} cells, expected {}x{}",
                zs.len(),
                xs.len(),
                ys.len()
            )));
        }

        Ok(Self { xs, ys, zs })
    }

    /// Load a raster stored as a JSON object with `x`, `y` and `z` arrays
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let grid: GridFile = serde_json::from_reader(BufReader::new(file))?;
        debug!(
            "Opened elevation grid {} ({}x{})",
            path.display(),
            grid.x.len(),
            grid.y.len()
        );
        Self::new(grid.x, grid.y, grid.z)
    }

    fn nearest_index(position: f64, len: usize) -> usize {
        let index = position.round();
        if index.is_nan() || index < 0.0 {
            0
        } else {
            (index as usize).min(len - 1)
        }
    }
}

impl ElevationSource for ElevationGrid {
    fn elevation(&self, latitude: f64, longitude: f64) -> f64 {
        let min_lon = self.xs[0];
        let max_lon = self.xs[self.xs.len() - 1];
        let max_lat = self.ys[0];
        let min_lat = self.ys[self.ys.len() - 1];

        let columns = self.xs.len();
        let rows = self.ys.len();

        // pixel spacing is uniform, so position along each axis is linear
        let x_pos = (longitude - min_lon) / (max_lon - min_lon) * (columns - 1) as f64;
        let y_pos = (max_lat - latitude) / (max_lat - min_lat) * (rows - 1) as f64;

        let col = Self::nearest_index(x_pos, columns);
        let row = Self::nearest_index(y_pos, rows);

        let value = self.zs[col + row * columns];
        if value.is_nan() || value == GRID_NO_DATA {
            0.0
        } else {
            value
        }
    }
}
