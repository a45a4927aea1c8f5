use crate::error::{ProcessingError, Result};

const MICRO_DEGREES: f64 = 1_000_000.0;

/// Convert decimal degrees into integer micro-degrees (6 decimal places).
///
/// Station identity is derived from coordinates printed with six decimals,
/// so two readings belong to the same station exactly when their micro-degree
/// values match.
///
/// # Examples
/// ```
/// use obs_to_wrf::utils::coordinates::to_micro_degrees;
///
/// assert_eq!(to_micro_degrees(41.469), 41_469_000);
/// assert_eq!(to_micro_degrees(15.4831666), 15_483_167);
/// ```
pub fn to_micro_degrees(degrees: f64) -> i64 {
    (degrees * MICRO_DEGREES).round() as i64
}

/// Render micro-degrees back to a decimal string with six places
pub fn format_micro_degrees(micro: i64) -> String {
    let sign = if micro < 0 { "-" } else { "" };
    let abs = micro.unsigned_abs();
    format!("{}{}.{:06}", sign, abs / 1_000_000, abs % 1_000_000)
}

/// Parse a decimal coordinate, rejecting values outside the valid range
pub fn parse_coordinate(coord_str: &str, limit: f64) -> Result<f64> {
    let trimmed = coord_str.trim();
    let value = trimmed.parse::<f64>().map_err(|_| {
        ProcessingError::InvalidFormat(format!("Invalid coordinate value: '{}'", coord_str))
    })?;

    if !value.is_finite() || value.abs() > limit {
        return Err(ProcessingError::InvalidFormat(format!(
            "Coordinate {} is outside [-{}, {}]",
            value, limit, limit
        )));
    }

    Ok(value)
}
