//! Station identifiers and station records.

use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;

use super::{DomainError, LineId};

/// A non-empty station identifier, e.g. `EST001`.
///
/// Identifiers are compared and ordered as plain strings; the ordering is
/// what the planner uses to break priority ties.
///
/// # Examples
///
/// ```
/// use transit_server::domain::StationId;
///
/// let id = StationId::parse("EST001").unwrap();
/// assert_eq!(id.as_str(), "EST001");
///
/// // Blank ids are rejected
/// assert!(StationId::parse("   ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationId(String);

impl StationId {
    /// Parse a station id, trimming surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyId { kind: "station" });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for StationId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Geographic position of a station in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Create coordinates, rejecting non-finite or out-of-range values.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        if !valid {
            return Err(DomainError::InvalidCoordinates {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Straight-line distance in degrees, treating lat/lon as a plane.
    pub fn euclidean_degrees(&self, other: &Coordinates) -> f64 {
        let dlat = other.latitude - self.latitude;
        let dlon = other.longitude - self.longitude;
        (dlat * dlat + dlon * dlon).sqrt()
    }
}

/// A station in the network. Created at load time and never modified.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub id: StationId,
    pub name: String,
    pub coordinates: Coordinates,
    /// Lines serving this station.
    pub lines: BTreeSet<LineId>,
    /// Amenity tags (toilets, wifi, step-free access, ...).
    pub services: BTreeSet<String>,
}

impl Station {
    /// Returns true if the given line serves this station.
    pub fn is_served_by(&self, line: &LineId) -> bool {
        self.lines.contains(line)
    }

    /// Returns true if the station offers the given amenity.
    pub fn has_service(&self, tag: &str) -> bool {
        self.services.contains(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_whitespace() {
        let id = StationId::parse("  EST001 ").unwrap();
        assert_eq!(id.as_str(), "EST001");
    }

    #[test]
    fn reject_empty() {
        assert!(StationId::parse("").is_err());
        assert!(StationId::parse(" \t").is_err());
    }

    #[test]
    fn display_and_debug() {
        let id = StationId::parse("A").unwrap();
        assert_eq!(format!("{}", id), "A");
        assert_eq!(format!("{:?}", id), "StationId(A)");
    }

    #[test]
    fn ordering_is_lexicographic() {
        let a = StationId::parse("A").unwrap();
        let b = StationId::parse("B").unwrap();
        let a10 = StationId::parse("A10").unwrap();
        assert!(a < b);
        assert!(a < a10);
        assert!(a10 < b);
    }

    #[test]
    fn borrow_as_str_for_lookup() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(StationId::parse("EST001").unwrap(), 1);
        assert_eq!(map.get("EST001"), Some(&1));
    }

    #[test]
    fn coordinates_validation() {
        assert!(Coordinates::new(4.6097, -74.0817).is_ok());
        assert!(Coordinates::new(90.5, 0.0).is_err());
        assert!(Coordinates::new(0.0, -181.0).is_err());
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn euclidean_distance() {
        let a = Coordinates::new(0.0, 0.0).unwrap();
        let b = Coordinates::new(3.0, 4.0).unwrap();
        assert!((a.euclidean_degrees(&b) - 5.0).abs() < 1e-12);
        assert_eq!(a.euclidean_degrees(&a), 0.0);
    }

    #[test]
    fn station_lookups() {
        let l1 = LineId::parse("L1").unwrap();
        let station = Station {
            id: StationId::parse("EST001").unwrap(),
            name: "Terminal Central".into(),
            coordinates: Coordinates::new(4.6097, -74.0817).unwrap(),
            lines: [l1.clone()].into_iter().collect(),
            services: ["wifi".to_string()].into_iter().collect(),
        };
        assert!(station.is_served_by(&l1));
        assert!(!station.is_served_by(&LineId::parse("L2").unwrap()));
        assert!(station.has_service("wifi"));
        assert!(!station.has_service("toilets"));
    }
}
