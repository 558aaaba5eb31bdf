//! Presentation of results: plain-text tables for the terminal and a
//! GeoJSON export that any web map or GIS can draw.

use serde_json::{Value, json};

use crate::gpstime::date_from_gps;
use crate::model::{Coordinate, GpsTimeIdentifier, RankedStation, RemoteProductDescriptor};

const WEEKDAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

pub fn weekday_name(day_of_week: u8) -> &'static str {
    WEEKDAYS.get(day_of_week as usize).copied().unwrap_or("?")
}

/// Key/value summary of a GPS time identifier.
pub fn gps_time_table(id: &GpsTimeIdentifier) -> String {
    let week_start = date_from_gps(id.week, 0)
        .map(|d| d.to_string())
        .unwrap_or_else(|| "-".to_string());

    let mut out = String::new();
    out.push_str(&format!("{:<14}{}\n", "GPS week", id.week));
    out.push_str(&format!(
        "{:<14}{} ({})\n",
        "Day of week",
        id.day_of_week,
        weekday_name(id.day_of_week)
    ));
    out.push_str(&format!("{:<14}{:05}\n", "Week+day", id.composite_id));
    out.push_str(&format!("{:<14}{:03}\n", "Day of year", id.day_of_year));
    out.push_str(&format!("{:<14}{}\n", "Year", id.year));
    out.push_str(&format!("{:<14}{}\n", "Week starts", week_start));
    out
}

/// One line per product: label, compression, URL.
pub fn product_table(descriptors: &[RemoteProductDescriptor]) -> String {
    descriptors
        .iter()
        .map(|d| format!("{:<20} .{:<3} {}\n", d.label, d.compression.suffix(), d.url))
        .collect()
}

/// Ranked stations, nearest first.
pub fn station_table(ranked: &[RankedStation]) -> String {
    if ranked.is_empty() {
        return "No stations available.\n".to_string();
    }

    let mut out = format!(
        "{:>3}  {:<6}{:<24}{:<22}{:>10}{:>11}{:>12}\n",
        "#", "ID", "Municipality", "Department", "Lat", "Lon", "Dist (km)"
    );
    for (rank, r) in ranked.iter().enumerate() {
        out.push_str(&format!(
            "{:>3}  {:<6}{:<24}{:<22}{:>10.4}{:>11.4}{:>12.3}\n",
            rank + 1,
            r.station.id,
            r.station.municipality,
            r.station.department,
            r.station.latitude,
            r.station.longitude,
            r.distance_km
        ));
    }
    out
}

/// GeoJSON FeatureCollection with the query point followed by the ranked
/// stations. Positions are `[longitude, latitude]` per RFC 7946.
pub fn ranking_geojson(reference: &Coordinate, ranked: &[RankedStation]) -> Value {
    let mut features = vec![json!({
        "type": "Feature",
        "geometry": {
            "type": "Point",
            "coordinates": [reference.longitude(), reference.latitude()],
        },
        "properties": { "role": "reference" },
    })];

    features.extend(ranked.iter().enumerate().map(|(rank, r)| {
        json!({
            "type": "Feature",
            "geometry": {
                "type": "Point",
                "coordinates": [r.station.longitude, r.station.latitude],
            },
            "properties": {
                "role": "station",
                "rank": rank + 1,
                "id": r.station.id,
                "municipality": r.station.municipality,
                "department": r.station.department,
                "distance_km": r.distance_km,
            },
        })
    }));

    json!({ "type": "FeatureCollection", "features": features })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Compression, Product, StationRecord};

    fn ranked(id: &str, latitude: f64, longitude: f64, distance_km: f64) -> RankedStation {
        RankedStation {
            station: StationRecord {
                id: id.to_string(),
                municipality: "Tunja".to_string(),
                department: "Boyacá".to_string(),
                latitude,
                longitude,
            },
            distance_km,
        }
    }

    #[test]
    fn test_gps_time_table_contents() {
        let id = GpsTimeIdentifier {
            week: 2190,
            day_of_week: 6,
            composite_id: 21906,
            day_of_year: 1,
            year: 2022,
        };
        let table = gps_time_table(&id);
        assert!(table.contains("2190"));
        assert!(table.contains("6 (Saturday)"));
        assert!(table.contains("21906"));
        assert!(table.contains("001"));
        assert!(table.contains("2021-12-26"));
    }

    #[test]
    fn test_product_table_one_line_per_product() {
        let descriptors = vec![RemoteProductDescriptor {
            product: Product::Rapid,
            label: "IGS rapid".to_string(),
            url: "https://archive/2190/igr21906.sp3.Z".to_string(),
            file_name: "igr21906.sp3.Z".to_string(),
            compression: Compression::Z,
        }];
        let table = product_table(&descriptors);
        assert_eq!(table.lines().count(), 1);
        assert!(table.contains(".Z"));
        assert!(table.ends_with("igr21906.sp3.Z\n"));
    }

    #[test]
    fn test_station_table_rows() {
        let table = station_table(&[ranked("TUNA", 5.5353, -73.3678, 12.3456)]);
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("TUNA"));
        assert!(lines[1].contains("12.346"));
    }

    #[test]
    fn test_station_table_empty() {
        assert_eq!(station_table(&[]), "No stations available.\n");
    }

    #[test]
    fn test_geojson_uses_lon_lat_order() {
        let reference = Coordinate::new(5.0, -73.0).unwrap();
        let doc = ranking_geojson(&reference, &[ranked("TUNA", 5.5353, -73.3678, 65.0)]);

        assert_eq!(doc["type"], "FeatureCollection");
        let features = doc["features"].as_array().unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0]["geometry"]["coordinates"], json!([-73.0, 5.0]));
        assert_eq!(features[1]["geometry"]["coordinates"], json!([-73.3678, 5.5353]));
        assert_eq!(features[1]["properties"]["rank"], 1);
        assert_eq!(features[1]["properties"]["id"], "TUNA");
    }
}
