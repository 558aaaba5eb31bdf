//! Core data types for the GNSS survey toolkit.
//!
//! This module defines the shared domain model imported by all other modules:
//! GPS time identifiers, ephemeris product descriptors, survey stations and
//! the error enums raised by the pure computations. It holds no I/O.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// GPS time
// ---------------------------------------------------------------------------

/// GPS calendar identifier derived from a single calendar date.
///
/// `composite_id` is the "week + day" filename convention used by the IGS
/// archives (e.g. week 2190, Tuesday → 21902). It is not a numeric encoding
/// in any stronger sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GpsTimeIdentifier {
    pub week: u32,
    /// 0 = Sunday, 6 = Saturday.
    pub day_of_week: u8,
    pub composite_id: u32,
    /// 1-based ordinal day within `year`.
    pub day_of_year: u16,
    pub year: i32,
}

// ---------------------------------------------------------------------------
// Ephemeris products
// ---------------------------------------------------------------------------

/// Orbit products that can be requested. Declaration order is the order in
/// which descriptors are always returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Product {
    /// IGS final orbits.
    Precise,
    /// IGS rapid orbits.
    Rapid,
    /// GFZ rapid orbits.
    Gfz,
}

impl Product {
    pub const ALL: [Product; 3] = [Product::Precise, Product::Rapid, Product::Gfz];

    pub fn label(&self) -> &'static str {
        match self {
            Product::Precise => "IGS precise (final)",
            Product::Rapid => "IGS rapid",
            Product::Gfz => "GFZ rapid",
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Product::Precise => write!(f, "precise"),
            Product::Rapid => write!(f, "rapid"),
            Product::Gfz => write!(f, "gfz"),
        }
    }
}

/// Compression suffix carried by a remote ephemeris file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Compression {
    /// gzip, `.gz`
    Gz,
    /// Unix compress, `.Z`
    Z,
}

impl Compression {
    /// Detects the compression from a file name or URL suffix.
    /// The match is case-sensitive: `.Z` and `.z` are different formats.
    pub fn from_suffix(name: &str) -> Option<Compression> {
        if name.ends_with(".gz") {
            Some(Compression::Gz)
        } else if name.ends_with(".Z") {
            Some(Compression::Z)
        } else {
            None
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            Compression::Gz => "gz",
            Compression::Z => "Z",
        }
    }
}

/// A fully instantiated download target for one product on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteProductDescriptor {
    pub product: Product,
    pub label: String,
    pub url: String,
    /// Last path segment of `url`, used as the local file name.
    pub file_name: String,
    pub compression: Compression,
}

// ---------------------------------------------------------------------------
// Stations
// ---------------------------------------------------------------------------

/// One reference survey station from the station table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationRecord {
    pub id: String,
    pub municipality: String,
    pub department: String,
    /// WGS84 latitude, decimal degrees.
    pub latitude: f64,
    /// WGS84 longitude, decimal degrees.
    pub longitude: f64,
}

/// A latitude/longitude pair that has passed range validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Builds a coordinate, rejecting non-finite values, `|lat| > 90` and
    /// `|lon| > 180`.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && latitude.abs() <= 90.0
            && longitude.abs() <= 180.0;
        if valid {
            Ok(Coordinate { latitude, longitude })
        } else {
            Err(GeoError::InvalidCoordinate { latitude, longitude })
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// A station together with its distance to the query point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedStation {
    pub station: StationRecord,
    pub distance_km: f64,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors raised while turning user input into a GPS time identifier.
#[derive(Debug, PartialEq)]
pub enum GpsTimeError {
    /// The text is not a valid calendar date in any accepted format.
    InvalidDate(String),
    /// The date precedes the GPS epoch (1980-01-06), so no week ≥ 0 exists.
    BeforeEpoch(NaiveDate),
}

impl fmt::Display for GpsTimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpsTimeError::InvalidDate(input) => {
                write!(f, "Invalid date '{}': expected DD-MM-YYYY or YYYY-MM-DD", input)
            }
            GpsTimeError::BeforeEpoch(date) => {
                write!(f, "Date {} is before the GPS epoch (1980-01-06)", date)
            }
        }
    }
}

impl std::error::Error for GpsTimeError {}

/// Errors raised by coordinate handling and the station ranker.
#[derive(Debug, PartialEq)]
pub enum GeoError {
    /// Latitude/longitude outside the valid range, or not finite.
    InvalidCoordinate { latitude: f64, longitude: f64 },
    /// A degrees-minutes-seconds value could not be parsed or is out of range.
    InvalidDms(String),
}

impl fmt::Display for GeoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeoError::InvalidCoordinate { latitude, longitude } => write!(
                f,
                "Invalid coordinate ({}, {}): latitude must be within ±90 and longitude within ±180",
                latitude, longitude
            ),
            GeoError::InvalidDms(msg) => write!(f, "Invalid DMS value: {}", msg),
        }
    }
}

impl std::error::Error for GeoError {}
