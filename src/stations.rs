//! Reference station table.
//!
//! Loads the list of continuously operating GNSS reference stations used by
//! the nearest-station lookup. A default table ships inside the binary
//! (`data/stations.toml`); a site-specific table can replace it through the
//! `[stations] table` config entry or `--stations` on the command line.
//!
//! The table is read once per invocation and never mutated.

use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::model::StationRecord;

/// Built-in station table.
const DEFAULT_TABLE: &str = include_str!("../data/stations.toml");

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
pub enum StationTableError {
    /// The table file could not be read.
    Io(String),
    /// The table is not valid TOML or is missing columns.
    Parse(String),
    /// Two rows share a station id.
    DuplicateId(String),
}

impl fmt::Display for StationTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StationTableError::Io(msg) => write!(f, "Station table I/O error: {}", msg),
            StationTableError::Parse(msg) => write!(f, "Station table parse error: {}", msg),
            StationTableError::DuplicateId(id) => write!(f, "Duplicate station id '{}'", id),
        }
    }
}

impl std::error::Error for StationTableError {}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct StationTable {
    #[serde(default)]
    station: Vec<StationRecord>,
}

/// Parses a station table from TOML text, preserving row order.
pub fn parse_stations(text: &str) -> Result<Vec<StationRecord>, StationTableError> {
    let table: StationTable =
        toml::from_str(text).map_err(|e| StationTableError::Parse(e.to_string()))?;

    let mut seen = HashSet::new();
    for station in &table.station {
        if !seen.insert(station.id.as_str()) {
            return Err(StationTableError::DuplicateId(station.id.clone()));
        }
    }

    Ok(table.station)
}

/// Loads a station table from disk.
pub fn load_stations(path: &Path) -> Result<Vec<StationRecord>, StationTableError> {
    let text = fs::read_to_string(path)
        .map_err(|e| StationTableError::Io(format!("{}: {}", path.display(), e)))?;
    parse_stations(&text)
}

/// The built-in station table.
pub fn default_stations() -> Result<Vec<StationRecord>, StationTableError> {
    parse_stations(DEFAULT_TABLE)
}

/// Looks up a station by id (case-insensitive). Returns `None` if not found.
pub fn find_station<'a>(stations: &'a [StationRecord], id: &str) -> Option<&'a StationRecord> {
    stations.iter().find(|s| s.id.eq_ignore_ascii_case(id))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
