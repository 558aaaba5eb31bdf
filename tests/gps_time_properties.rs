//! Property checks for the GPS calendar conversion and URL builder.
//!
//! Walks every day from the epoch through 2040 rather than sampling, since
//! the full range is only ~22k dates.

use chrono::{Datelike, Duration, NaiveDate};
use gnss_survey::gpstime::{compute_gps_time, date_from_gps, gps_epoch};
use gnss_survey::model::Product;
use gnss_survey::products::{ProductTemplates, build_product_urls};

fn every_day_until(end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    let start = gps_epoch();
    let span = (end - start).num_days();
    (0..=span).map(move |offset| start + Duration::days(offset))
}

fn end_of_range() -> NaiveDate {
    NaiveDate::from_ymd_opt(2040, 12, 31).unwrap()
}

#[test]
fn test_composite_id_is_week_times_ten_plus_day() {
    for date in every_day_until(end_of_range()) {
        let id = compute_gps_time(date).unwrap();
        assert_eq!(
            id.composite_id,
            id.week * 10 + id.day_of_week as u32,
            "composite mismatch on {}",
            date
        );
    }
}

#[test]
fn test_consecutive_days_advance_by_one() {
    let mut previous = compute_gps_time(gps_epoch()).unwrap();
    for date in every_day_until(end_of_range()).skip(1) {
        let id = compute_gps_time(date).unwrap();
        if previous.day_of_week == 6 {
            assert_eq!((id.week, id.day_of_week), (previous.week + 1, 0), "rollover on {}", date);
        } else {
            assert_eq!((id.week, id.day_of_week), (previous.week, previous.day_of_week + 1), "step on {}", date);
        }
        previous = id;
    }
}

#[test]
fn test_day_zero_is_always_sunday() {
    for date in every_day_until(end_of_range()) {
        let id = compute_gps_time(date).unwrap();
        assert_eq!(
            id.day_of_week as u32,
            date.weekday().num_days_from_sunday(),
            "weekday mismatch on {}",
            date
        );
    }
}

#[test]
fn test_day_of_year_and_year_follow_the_calendar() {
    for date in every_day_until(end_of_range()) {
        let id = compute_gps_time(date).unwrap();
        assert_eq!(id.year, date.year());
        assert_eq!(id.day_of_year as u32, date.ordinal());
        assert!((1..=366).contains(&id.day_of_year));
    }
}

#[test]
fn test_inverse_recovers_date() {
    for date in every_day_until(end_of_range()).step_by(97) {
        let id = compute_gps_time(date).unwrap();
        assert_eq!(date_from_gps(id.week, id.day_of_week), Some(date));
    }
}

#[test]
fn test_product_urls_are_referentially_transparent() {
    let templates = ProductTemplates::default();
    for date in every_day_until(end_of_range()).step_by(53) {
        let id = compute_gps_time(date).unwrap();
        let first = build_product_urls(&id, &Product::ALL, &templates).unwrap();
        let second = build_product_urls(&id, &Product::ALL, &templates).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }
}
