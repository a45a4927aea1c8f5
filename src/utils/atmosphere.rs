//! Piecewise-linear standard atmosphere used when a station reports no
//! pressure.

/// One altitude band. `alt_max`/`pressure_max` are `None` for the open-ended
/// top band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AltitudeBand {
    pub alt_min: f64,
    pub alt_max: Option<f64>,
    /// Pascal
    pub pressure_min: f64,
    /// Pascal
    pub pressure_max: Option<f64>,
}

impl AltitudeBand {
    const fn new(alt_min: f64, alt_max: f64, pressure_min: f64, pressure_max: f64) -> Self {
        Self {
            alt_min,
            alt_max: Some(alt_max),
            pressure_min,
            pressure_max: Some(pressure_max),
        }
    }

    fn covers(&self, elevation: f64) -> bool {
        self.alt_min <= elevation && self.alt_max.map_or(true, |max| max > elevation)
    }

    /// Linear interpolation in hPa; NaN for the open-ended band
    fn interpolate_hpa(&self, elevation: f64) -> f64 {
        let (x0, y0) = (self.alt_min, self.pressure_min / 100.0);
        let x1 = self.alt_max.unwrap_or(f64::NAN);
        let y1 = self.pressure_max.unwrap_or(f64::NAN) / 100.0;

        y0 + (elevation - x0) * (y1 - y0) / (x1 - x0)
    }
}

/// Ordered altitude bands, lowest first
#[derive(Debug, Clone, Copy)]
pub struct StandardAtmosphereTable {
    bands: &'static [AltitudeBand],
}

static STANDARD_BANDS: [AltitudeBand; 7] = [
    AltitudeBand::new(0.0, 1000.0, 101325.0, 89876.0),
    AltitudeBand::new(1000.0, 5000.0, 89876.0, 54048.0),
    AltitudeBand::new(5000.0, 10000.0, 54048.0, 26500.0),
    AltitudeBand::new(10000.0, 15000.0, 26500.0, 12111.0),
    AltitudeBand::new(15000.0, 20000.0, 12111.0, 5469.0),
    AltitudeBand::new(20000.0, 25000.0, 5469.0, 2549.0),
    AltitudeBand {
        alt_min: 25000.0,
        alt_max: None,
        pressure_min: 2549.0,
        pressure_max: None,
    },
];

impl StandardAtmosphereTable {
    pub fn standard() -> Self {
        Self {
            bands: &STANDARD_BANDS,
        }
    }

    /// Expected pressure in hPa at `elevation` meters.
    ///
    /// Elevations below the lowest band extrapolate that band's line, so
    /// sites below sea level get a pressure above the sea level value.
    /// Elevations inside the open-ended top band yield NaN.
    pub fn pressure_hpa(&self, elevation: f64) -> f64 {
        if elevation.is_nan() {
            return f64::NAN;
        }

        let band = self
            .bands
            .iter()
            .find(|band| band.covers(elevation))
            .or_else(|| self.bands.first().filter(|lowest| elevation < lowest.alt_min));

        match band {
            Some(band) => band.interpolate_hpa(elevation),
            None => f64::NAN,
        }
    }
}

impl Default for StandardAtmosphereTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Convenience wrapper over the standard table
pub fn standard_atmosphere_hpa(elevation: f64) -> f64 {
    StandardAtmosphereTable::standard().pressure_hpa(elevation)
}
