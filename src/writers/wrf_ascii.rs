use crate::error::Result;
use crate::models::Observation;
use crate::utils::constants::{
    QC_GOOD, QC_MISSING, WRF_DATE_FORMAT, WRF_MISSING_MARKER, WRF_MISSING_VALUE,
};
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use tracing::info;

/// Width of name and id columns
pub const TEXT_WIDTH: usize = 40;

const PLATFORM: &str = "FM-12 SYNOP";
const LEVELS: i32 = 1;

/// Error magnitudes written after each value
const SLP_ERROR: f64 = 99.99;
const PRECIPITATION_ERROR: f64 = 99.99;
const PRESSURE_ERROR: f64 = 1.0;
const WIND_SPEED_ERROR: f64 = 1.0;
const WIND_DIRECTION_ERROR: f64 = 3.0;
const HEIGHT_ERROR: f64 = 999.99;
const TEMPERATURE_ERROR: f64 = 1.0;
const DEWPOINT_ERROR: f64 = 1.0;
const HUMIDITY_ERROR: f64 = 2.0;

/// Header block of an ob.ascii file; both counts are the number of
/// observations that follow
pub fn header(total: usize) -> String {
    format!(
        concat!(
            "TOTAL = {:>6}, MISS. =-888888.,\n",
            "SYNOP = {:>6}, METAR =      0, SHIP  =      0, BUOY  =      0, BOGUS =      0, TEMP  =      0,\n",
            "AMDAR =      0, AIREP =      0, TAMDAR=      0, PILOT =      0, SATEM =      0, SATOB =      0,\n",
            "GPSPW =      0, GPSZD =      0, GPSRF =      0, GPSEP =      0, SSMT1 =      0, SSMT2 =      0,\n",
            "TOVS  =      0, QSCAT =      0, PROFL =      0, AIRSR =      0, OTHER =      0,\n",
            "PHIC  =  40.00, XLONC = -95.00, TRUE1 =  30.00, TRUE2 =  60.00, XIM11 =   1.00, XJM11 =   1.00,\n",
            "base_temp= 290.00, base_lapse=  50.00, PTOP  =  5000., base_pres=100000., base_tropo_pres= 20000., base_strat_temp=   215.,\n",
            "IXC   =     60, JXC   =     90, IPROJ =      1, IDD   =      1, MAXNES=      1,\n",
            "NESTIX=     60,\n",
            "NESTJX=     90,\n",
            "NUMC  =      1,\n",
            "DIS   =  60.00,\n",
            "NESTI =      1,\n",
            "NESTJ =      1,\n",
            "INFO  = PLATFORM, DATE, NAME, LEVELS, LATITUDE, LONGITUDE, ELEVATION, ID.\n",
            "SRFC  = SLP, PW (DATA,QC,ERROR).\n",
            "EACH  = PRES, SPEED, DIR, HEIGHT, TEMP, DEW PT, HUMID (DATA,QC,ERROR)*LEVELS.\n",
            "INFO_FMT = (A12,1X,A19,1X,A40,1X,I6,3(F12.3,11X),6X,A40)\n",
            "SRFC_FMT = (F12.3,I4,F7.2,F12.3,I4,F7.3)\n",
            "EACH_FMT = (3(F12.3,I4,F7.2),11X,3(F12.3,I4,F7.2),11X,3(F12.3,I4,F7.2))\n",
            "#------------------------------------------------------------------------------#\n",
        ),
        total, total
    )
}

/// Right-aligned fixed-point number where a space stands in for the sign of
/// non-negative values. NaN is written as the missing sentinel.
pub fn fixed(value: f64, width: usize, precision: usize) -> String {
    let value = if value.is_nan() { WRF_MISSING_VALUE } else { value };

    let mut rendered = format!("{:.*}", precision, value);
    if !rendered.starts_with('-') {
        rendered.insert(0, ' ');
    }

    format!("{:>width$}", rendered, width = width)
}

/// Quality control code of a rendered value
pub fn qc_code(rendered: &str) -> i32 {
    if rendered.contains(WRF_MISSING_MARKER) {
        QC_MISSING
    } else {
        QC_GOOD
    }
}

/// Replace every character that is not an ASCII letter with `X`, then pad
/// or cut to the text column width
pub fn sanitize(text: &str) -> String {
    let letters: String = text
        .chars()
        .map(|c| if c.is_ascii_alphabetic() { c } else { 'X' })
        .take(TEXT_WIDTH)
        .collect();

    format!("{:<width$}", letters, width = TEXT_WIDTH)
}

fn left(text: &str, width: usize) -> String {
    format!("{:<width$}", text, width = width)
}

fn space(n: usize) -> String {
    " ".repeat(n)
}

/// Value, QC code and error magnitude of one slot
fn slot(value: f64, error: f64, error_precision: usize) -> String {
    let data = fixed(value, 12, 3);
    let qc = qc_code(&data);
    format!("{}{:>4}{}", data, qc, fixed(error, 7, error_precision))
}

/// Renders observations as WRF data assimilation `ob.ascii` text
pub struct WrfAsciiWriter;

impl WrfAsciiWriter {
    pub fn new() -> Self {
        Self
    }

    /// The three lines of one observation, without a trailing newline
    pub fn encode_observation(&self, obs: &Observation) -> String {
        let info = [
            left(PLATFORM, 12),
            " ".to_string(),
            obs.time.format(WRF_DATE_FORMAT).to_string(),
            " ".to_string(),
            sanitize(&obs.station_name),
            " ".to_string(),
            format!("{:>6}", LEVELS),
            fixed(obs.latitude, 12, 3),
            space(11),
            fixed(obs.longitude, 12, 3),
            space(11),
            fixed(obs.elevation, 12, 3),
            space(11),
            space(6),
            sanitize(&obs.station_id),
        ]
        .concat();

        // sea level pressure is never reported
        let surface = [
            slot(f64::NAN, SLP_ERROR, 2),
            slot(obs.metric.precipitation, PRECIPITATION_ERROR, 3),
        ]
        .concat();

        let each = [
            slot(obs.metric.pressure, PRESSURE_ERROR, 2),
            slot(obs.metric.wind_speed, WIND_SPEED_ERROR, 2),
            slot(obs.wind_direction, WIND_DIRECTION_ERROR, 2),
            space(11),
            slot(obs.elevation, HEIGHT_ERROR, 2),
            slot(obs.metric.temperature, TEMPERATURE_ERROR, 2),
            slot(obs.metric.dewpoint, DEWPOINT_ERROR, 2),
            space(11),
            slot(obs.humidity, HUMIDITY_ERROR, 2),
        ]
        .concat();

        format!("{}\n{}\n{}", info, surface, each)
    }

    /// Header plus every observation block, blocks separated by newlines
    pub fn render(&self, observations: &[Observation]) -> String {
        let blocks: Vec<String> = observations
            .par_iter()
            .map(|obs| self.encode_observation(obs))
            .collect();

        let mut artifact = header(observations.len());
        artifact.push_str(&blocks.join("\n"));
        artifact
    }

    /// Render in memory, then write the artifact in one call
    pub fn write_file(&self, observations: &[Observation], path: &Path) -> Result<()> {
        let artifact = self.render(observations);

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, artifact.as_bytes())?;

        info!(
            "Wrote {} observations ({} bytes) to {}",
            observations.len(),
            artifact.len(),
            path.display()
        );
        Ok(())
    }
}

impl Default for WrfAsciiWriter {
    fn default() -> Self {
        Self::new()
    }
}
