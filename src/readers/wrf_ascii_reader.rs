use crate::error::{ProcessingError, Result};
use crate::utils::constants::{WRF_DATE_FORMAT, WRF_MISSING_VALUE};
use chrono::{DateTime, NaiveDateTime, Utc};
use std::fs;
use std::ops::Range;
use std::path::Path;

const HEADER_END: &str = "#---";

/// Column ranges of the first record line
const PLATFORM_COLS: Range<usize> = 0..12;
const DATE_COLS: Range<usize> = 13..32;
const NAME_COLS: Range<usize> = 33..73;
const LEVELS_COLS: Range<usize> = 74..80;
const LATITUDE_COLS: Range<usize> = 80..92;
const LONGITUDE_COLS: Range<usize> = 103..115;
const ELEVATION_COLS: Range<usize> = 126..138;
const ID_COLS: Range<usize> = 155..195;

/// Start column of each value/qc/error slot on the second and third lines
const SURFACE_SLOTS: [usize; 2] = [0, 23];
const EACH_SLOTS: [usize; 7] = [0, 23, 46, 80, 103, 126, 160];

/// One value/QC/error triple. The missing sentinel reads back as NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WrfField {
    pub value: f64,
    pub qc: i32,
    pub error: f64,
}

impl WrfField {
    pub fn is_missing(&self) -> bool {
        self.value.is_nan()
    }
}

/// A decoded observation block
#[derive(Debug, Clone, PartialEq)]
pub struct WrfRecord {
    pub platform: String,
    pub time: DateTime<Utc>,
    pub name: String,
    pub levels: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
    pub station_id: String,
    pub sea_level_pressure: WrfField,
    pub precipitation: WrfField,
    pub pressure: WrfField,
    pub wind_speed: WrfField,
    pub wind_direction: WrfField,
    pub height: WrfField,
    pub temperature: WrfField,
    pub dewpoint: WrfField,
    pub humidity: WrfField,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WrfAsciiFile {
    pub total: usize,
    pub synop: usize,
    pub records: Vec<WrfRecord>,
}

fn columns<'l>(line: &'l str, cols: Range<usize>, line_no: usize) -> Result<&'l str> {
    line.get(cols.clone()).ok_or_else(|| {
        ProcessingError::InvalidFormat(format!(
            "Line {} is too short for columns {}..{}",
            line_no, cols.start, cols.end
        ))
    })
}

fn number(text: &str, line_no: usize) -> Result<f64> {
    let value: f64 = text.trim().parse().map_err(|_| {
        ProcessingError::InvalidFormat(format!("Line {}: '{}' is not a number", line_no, text.trim()))
    })?;

    if value <= WRF_MISSING_VALUE {
        Ok(f64::NAN)
    } else {
        Ok(value)
    }
}

fn integer(text: &str, line_no: usize) -> Result<i32> {
    text.trim().parse().map_err(|_| {
        ProcessingError::InvalidFormat(format!("Line {}: '{}' is not an integer", line_no, text.trim()))
    })
}

fn field(line: &str, start: usize, error_width: usize, line_no: usize) -> Result<WrfField> {
    Ok(WrfField {
        value: number(columns(line, start..start + 12, line_no)?, line_no)?,
        qc: integer(columns(line, start + 12..start + 16, line_no)?, line_no)?,
        error: number(columns(line, start + 16..start + 16 + error_width, line_no)?, line_no)?,
    })
}

/// Count after `label =` on a header line
fn header_count(line: Option<&str>, label: &str) -> Result<usize> {
    let line = line.ok_or_else(|| ProcessingError::InvalidFormat("Truncated header".to_string()))?;

    line.strip_prefix(label)
        .and_then(|rest| rest.trim_start().strip_prefix('='))
        .and_then(|rest| rest.split(',').next())
        .and_then(|count| count.trim().parse().ok())
        .ok_or_else(|| ProcessingError::InvalidFormat(format!("Missing {} count in header", label)))
}

/// Parses ob.ascii artifacts back into their fixed-column fields
pub struct WrfAsciiReader;

impl WrfAsciiReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read_file(&self, path: &Path) -> Result<WrfAsciiFile> {
        let content = fs::read_to_string(path)?;
        self.parse(&content)
    }

    pub fn parse(&self, content: &str) -> Result<WrfAsciiFile> {
        let lines: Vec<&str> = content.lines().collect();

        let total = header_count(lines.first().copied(), "TOTAL")?;
        let synop = header_count(lines.get(1).copied(), "SYNOP")?;

        let body_start = lines
            .iter()
            .position(|line| line.starts_with(HEADER_END))
            .map(|index| index + 1)
            .ok_or_else(|| ProcessingError::InvalidFormat("Header end marker not found".to_string()))?;

        let body = &lines[body_start..];
        if body.len() % 3 != 0 {
            return Err(ProcessingError::InvalidFormat(format!(
                "Expected three lines per observation, found {} body lines",
                body.len()
            )));
        }

        let records = body
            .chunks(3)
            .enumerate()
            .map(|(i, block)| self.parse_record(block, body_start + i * 3 + 1))
            .collect::<Result<Vec<_>>>()?;

        if records.len() != total {
            return Err(ProcessingError::InvalidFormat(format!(
                "Header announces {} observations, file holds {}",
                total,
                records.len()
            )));
        }

        Ok(WrfAsciiFile {
            total,
            synop,
            records,
        })
    }

    /// Decode one three-line block; `first_line` is its 1-based line number
    fn parse_record(&self, block: &[&str], first_line: usize) -> Result<WrfRecord> {
        let (info, surface, each) = (block[0], block[1], block[2]);
        let (n1, n2, n3) = (first_line, first_line + 1, first_line + 2);

        let date = columns(info, DATE_COLS, n1)?;
        let time = NaiveDateTime::parse_from_str(date, WRF_DATE_FORMAT)?.and_utc();

        let slot = |i: usize| field(each, EACH_SLOTS[i], 7, n3);

        Ok(WrfRecord {
            platform: columns(info, PLATFORM_COLS, n1)?.trim_end().to_string(),
            time,
            name: columns(info, NAME_COLS, n1)?.trim_end().to_string(),
            levels: integer(columns(info, LEVELS_COLS, n1)?, n1)?,
            latitude: number(columns(info, LATITUDE_COLS, n1)?, n1)?,
            longitude: number(columns(info, LONGITUDE_COLS, n1)?, n1)?,
            elevation: number(columns(info, ELEVATION_COLS, n1)?, n1)?,
            station_id: columns(info, ID_COLS, n1)?.trim_end().to_string(),
            sea_level_pressure: field(surface, SURFACE_SLOTS[0], 7, n2)?,
            precipitation: field(surface, SURFACE_SLOTS[1], 7, n2)?,
            pressure: slot(0)?,
            wind_speed: slot(1)?,
            wind_direction: slot(2)?,
            height: slot(3)?,
            temperature: slot(4)?,
            dewpoint: slot(5)?,
            humidity: slot(6)?,
        })
    }
}

impl Default for WrfAsciiReader {
    fn default() -> Self {
        Self::new()
    }
}
