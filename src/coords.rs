//! Degrees-minutes-seconds handling for coordinates typed by hand.
//!
//! The sign lives on the degrees component only and applies to the whole
//! value, on both axes: `-74 4 51.3` is `-(74 + 4/60 + 51.3/3600)`.

use crate::model::{Coordinate, GeoError};

/// Converts a DMS triple to signed decimal degrees.
///
/// `minutes` and `seconds` must be in `[0, 60)`.
pub fn dms_to_decimal(degrees: f64, minutes: f64, seconds: f64) -> Result<f64, GeoError> {
    if !(degrees.is_finite() && minutes.is_finite() && seconds.is_finite()) {
        return Err(GeoError::InvalidDms(format!(
            "non-finite component in {} {} {}",
            degrees, minutes, seconds
        )));
    }
    if !(0.0..60.0).contains(&minutes) {
        return Err(GeoError::InvalidDms(format!("minutes {} not in [0, 60)", minutes)));
    }
    if !(0.0..60.0).contains(&seconds) {
        return Err(GeoError::InvalidDms(format!("seconds {} not in [0, 60)", seconds)));
    }

    let magnitude = degrees.abs() + minutes / 60.0 + seconds / 3600.0;
    Ok(if degrees >= 0.0 { magnitude } else { -magnitude })
}

/// Parses `"-74 4 51.3"`, `-74°4'51.3"` or `-74:4:51.3`.
///
/// Minutes and seconds may be omitted. Only the last component given may
/// carry a fraction (`74.5` or `74 30.5`, not `74.5 30`). At most one
/// leading sign is accepted; a leading `-` with zero degrees (`-0 30 0`)
/// is honoured.
pub fn parse_dms(input: &str) -> Result<f64, GeoError> {
    let trimmed = input.trim();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let parts: Vec<&str> = unsigned
        .split(|c: char| c.is_whitespace() || matches!(c, '°' | '\'' | '"' | ':' | '′' | '″'))
        .filter(|s| !s.is_empty())
        .collect();

    if parts.is_empty() || parts.len() > 3 {
        return Err(GeoError::InvalidDms(format!("'{}' is not D M S", input)));
    }

    let mut values = [0.0_f64; 3];
    for (i, (slot, part)) in values.iter_mut().zip(&parts).enumerate() {
        if part.starts_with(['-', '+']) {
            return Err(GeoError::InvalidDms(format!("only one leading sign is allowed in '{}'", input)));
        }
        *slot = part
            .parse::<f64>()
            .map_err(|_| GeoError::InvalidDms(format!("'{}' in '{}' is not a number", part, input)))?;
        if i + 1 < parts.len() && slot.fract() != 0.0 {
            return Err(GeoError::InvalidDms(format!(
                "'{}' in '{}' has a fraction but is followed by a smaller unit",
                part, input
            )));
        }
    }

    let magnitude = dms_to_decimal(values[0], values[1], values[2])?;
    Ok(if negative { -magnitude } else { magnitude })
}

/// Builds a validated coordinate from two DMS strings, latitude first.
pub fn coordinate_from_dms(latitude: &str, longitude: &str) -> Result<Coordinate, GeoError> {
    Coordinate::new(parse_dms(latitude)?, parse_dms(longitude)?)
}
