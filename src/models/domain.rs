use crate::error::{ProcessingError, Result};
use crate::utils::coordinates::parse_coordinate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Geographic bounding box used to filter station registries.
///
/// The textual form is order sensitive: `MINLAT,MAXLAT,MINLON,MAXLON`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Domain {
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Result<Self> {
        let domain = Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        };

        if min_lat > max_lat {
            return Err(ProcessingError::InvalidDomain {
                input: domain.to_string(),
                reason: format!("min latitude {} > max latitude {}", min_lat, max_lat),
            });
        }

        if min_lon > max_lon {
            return Err(ProcessingError::InvalidDomain {
                input: domain.to_string(),
                reason: format!("min longitude {} > max longitude {}", min_lon, max_lon),
            });
        }

        Ok(domain)
    }

    /// Whole globe, useful when no geographic filtering is wanted
    pub fn world() -> Self {
        Self {
            min_lat: -90.0,
            max_lat: 90.0,
            min_lon: -180.0,
            max_lon: 180.0,
        }
    }

    /// Inclusive on all four edges
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        latitude >= self.min_lat
            && latitude <= self.max_lat
            && longitude >= self.min_lon
            && longitude <= self.max_lon
    }
}

impl FromStr for Domain {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(',').collect();

        if parts.len() != 4 {
            return Err(ProcessingError::InvalidDomain {
                input: s.to_string(),
                reason: format!("expected 4 comma separated values, got {}", parts.len()),
            });
        }

        let invalid = |e: ProcessingError| ProcessingError::InvalidDomain {
            input: s.to_string(),
            reason: e.to_string(),
        };

        let min_lat = parse_coordinate(parts[0], 90.0).map_err(invalid)?;
        let max_lat = parse_coordinate(parts[1], 90.0).map_err(invalid)?;
        let min_lon = parse_coordinate(parts[2], 180.0).map_err(invalid)?;
        let max_lon = parse_coordinate(parts[3], 180.0).map_err(invalid)?;

        Domain::new(min_lat, max_lat, min_lon, max_lon)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.min_lat, self.max_lat, self.min_lon, self.max_lon
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_domain_order() {
        let domain: Domain = "34,47,4,20".parse().unwrap();
        assert_eq!(domain.min_lat, 34.0);
        assert_eq!(domain.max_lat, 47.0);
        assert_eq!(domain.min_lon, 4.0);
        assert_eq!(domain.max_lon, 20.0);
    }

    #[test]
    fn test_contains_is_inclusive() {
        let domain = Domain::new(43.0, 44.0, 7.0, 10.0).unwrap();
        assert!(domain.contains(43.0, 7.0));
        assert!(domain.contains(44.0, 10.0));
        assert!(domain.contains(43.5, 8.9));
        assert!(!domain.contains(42.99, 8.0));
        assert!(!domain.contains(43.5, 10.01));
    }

    #[test]
    fn test_malformed_domain_strings() {
        assert!("34,47,4".parse::<Domain>().is_err());
        assert!("34,47,4,x".parse::<Domain>().is_err());
        assert!("47,34,4,20".parse::<Domain>().is_err());
        assert!("34,47,20,4".parse::<Domain>().is_err());
    }

    #[test]
    fn test_world_contains_everything() {
        assert!(Domain::world().contains(-90.0, 180.0));
        assert!(Domain::world().contains(41.469, 15.483167));
    }
}
