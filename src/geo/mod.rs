//! Great-circle geometry over recorded samples
//!
//! Distances use the haversine formula on a spherical Earth. Speeds are
//! derived from the distance and the recorded time between two samples.

pub mod haversine;

pub use haversine::{bearing_deg, distance_km, EARTH_RADIUS_KM};

use crate::core::Sample;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Sum of the leg distances along `samples`, 0 for fewer than two samples
pub fn total_distance_km(samples: &[Sample]) -> f64 {
    samples
        .windows(2)
        .map(|pair| distance_km(pair[0].coordinate(), pair[1].coordinate()))
        .sum()
}

/// Average speed between two consecutive samples in km/h.
///
/// Equal or decreasing timestamps give 0 instead of an infinite or negative
/// speed; recorded data may contain duplicates.
pub fn speed_kmh(prev: &Sample, curr: &Sample) -> f64 {
    let hours = curr.millis_since(prev) as f64 / MILLIS_PER_HOUR;
    if hours <= 0.0 {
        return 0.0;
    }

    distance_km(prev.coordinate(), curr.coordinate()) / hours
}

/// Display form of a speed: two decimals, no unit
pub fn format_speed(kmh: f64) -> String {
    format!("{:.2}", kmh)
}

/// Display form of a distance: two decimals, no unit
pub fn format_km(km: f64) -> String {
    format!("{:.2}", km)
}
