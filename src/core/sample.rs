use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Format as "lat, lng" with six decimals
    pub fn label(&self) -> String {
        format!("{:.6}, {:.6}", self.lat, self.lng)
    }
}

/// One recorded route point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Latitude in degrees
    pub latitude: f64,

    /// Longitude in degrees
    pub longitude: f64,

    /// Recording time as Unix epoch milliseconds
    pub timestamp_millis: i64,
}

impl Sample {
    pub fn new(latitude: f64, longitude: f64, timestamp_millis: i64) -> Self {
        Self {
            latitude,
            longitude,
            timestamp_millis,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// Recording time in UTC, None if the millis are outside chrono's range
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp_millis).single()
    }

    /// Milliseconds from `prev` to this sample. Negative when out of order,
    /// saturating at the ends of the `i64` range.
    pub fn millis_since(&self, prev: &Sample) -> i64 {
        self.timestamp_millis.saturating_sub(prev.timestamp_millis)
    }
}

impl From<&Sample> for Coordinate {
    fn from(sample: &Sample) -> Self {
        sample.coordinate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millis_since_saturates() {
        let earliest = Sample::new(0.0, 0.0, i64::MIN);
        let latest = Sample::new(0.0, 0.0, i64::MAX);
        assert_eq!(latest.millis_since(&earliest), i64::MAX);
        assert_eq!(earliest.millis_since(&latest), i64::MIN);
        assert_eq!(latest.timestamp(), None);
    }
}
