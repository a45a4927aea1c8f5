/// Arden Buck coefficients
const BUCK_B: f64 = 18.678;
const BUCK_C: f64 = 257.14;
const BUCK_D: f64 = 234.5;

/// Dewpoint in °C from relative humidity (0-100) and temperature in °C,
/// using the Arden Buck equation. NaN if either input is NaN.
pub fn dewpoint_celsius(relative_humidity: f64, temperature: f64) -> f64 {
    if relative_humidity.is_nan() || temperature.is_nan() {
        return f64::NAN;
    }

    let exponent = (BUCK_B - temperature / BUCK_D) * (temperature / (BUCK_C + temperature));
    let gamma = (relative_humidity / 100.0 * exponent.exp()).ln();

    BUCK_C * gamma / (BUCK_B - gamma)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_value() {
        // 13 °C at 75% relative humidity
        let dewpoint = dewpoint_celsius(75.0, 13.0);
        assert!((dewpoint - 8.66).abs() < 0.05, "got {}", dewpoint);
    }

    #[test]
    fn test_nan_inputs() {
        assert!(dewpoint_celsius(f64::NAN, 13.0).is_nan());
        assert!(dewpoint_celsius(75.0, f64::NAN).is_nan());
        assert!(dewpoint_celsius(f64::NAN, f64::NAN).is_nan());
    }

    #[test]
    fn test_never_exceeds_temperature() {
        for t in (-40..=45).map(|t| t as f64) {
            for rh in (1..=100).map(|rh| rh as f64) {
                let dewpoint = dewpoint_celsius(rh, t);
                assert!(
                    dewpoint <= t + 1e-9,
                    "dewpoint {} above temperature {} at rh {}",
                    dewpoint,
                    t,
                    rh
                );
            }
        }
    }

    #[test]
    fn test_saturation_is_close_to_temperature() {
        assert!((dewpoint_celsius(100.0, 20.0) - 20.0).abs() < 0.2);
        assert!((dewpoint_celsius(100.0, 0.0)).abs() < 1e-12);
    }
}
