//! GPS calendar conversion.
//!
//! Maps a naive calendar date onto the GPS week / day-of-week pair counted
//! from the GPS epoch (Sunday 1980-01-06), plus the day-of-year used by the
//! long-form product names.

use chrono::{Datelike, Duration, NaiveDate};

use crate::model::{GpsTimeError, GpsTimeIdentifier};

/// Accepted input formats, tried in order. `DD-MM-YYYY` is the format the
/// field operators type; ISO is accepted for scripting.
const DATE_FORMATS: &[&str] = &["%d-%m-%Y", "%Y-%m-%d"];

/// First day of GPS week 0.
pub fn gps_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1980, 1, 6).expect("1980-01-06 is a valid date")
}

/// Parses user-typed date text.
pub fn parse_date(input: &str) -> Result<NaiveDate, GpsTimeError> {
    let trimmed = input.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| GpsTimeError::InvalidDate(input.to_string()))
}

/// Splits a signed day count since the epoch into `(week, day_of_week)`.
///
/// Uses floor division so the day stays in `0..=6` for negative counts:
/// day -1 is Saturday of week -1, not day -1 of week 0.
pub fn split_days(days_since_epoch: i64) -> (i64, u8) {
    (
        days_since_epoch.div_euclid(7),
        days_since_epoch.rem_euclid(7) as u8,
    )
}

/// Computes the GPS time identifier for `date`.
pub fn compute_gps_time(date: NaiveDate) -> Result<GpsTimeIdentifier, GpsTimeError> {
    let days = (date - gps_epoch()).num_days();
    let (week, day_of_week) = split_days(days);

    let week = u32::try_from(week).map_err(|_| GpsTimeError::BeforeEpoch(date))?;

    Ok(GpsTimeIdentifier {
        week,
        day_of_week,
        composite_id: week * 10 + day_of_week as u32,
        day_of_year: date.ordinal() as u16,
        year: date.year(),
    })
}

/// Parses `input` and converts it in one step.
pub fn gps_time_from_str(input: &str) -> Result<GpsTimeIdentifier, GpsTimeError> {
    compute_gps_time(parse_date(input)?)
}

/// Calendar date of a given GPS week and day. Returns `None` when
/// `day_of_week > 6` or the result overflows the calendar.
pub fn date_from_gps(week: u32, day_of_week: u8) -> Option<NaiveDate> {
    if day_of_week > 6 {
        return None;
    }
    let days = i64::from(week) * 7 + i64::from(day_of_week);
    gps_epoch().checked_add_signed(Duration::days(days))
}
