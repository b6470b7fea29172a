use crate::core::Sample;
use crate::input::{check_latitude, check_longitude, checked_millis, parse_timestamp, LoadError};
use serde::Deserialize;

/// A route point as recorded in a JSON route document
#[derive(Debug, Clone, Deserialize)]
pub struct RawPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: RawTimestamp,
}

/// Timestamps show up either as epoch milliseconds or as date strings
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Millis(i64),
    Text(String),
}

impl RawPoint {
    fn into_sample(self, row: usize) -> Result<Sample, LoadError> {
        let latitude = check_latitude(self.latitude, row)?;
        let longitude = check_longitude(self.longitude, row)?;
        let timestamp_millis = match self.timestamp {
            RawTimestamp::Millis(ms) => checked_millis(ms).ok_or(LoadError::InvalidTimestamp {
                row,
                value: ms.to_string(),
            })?,
            RawTimestamp::Text(text) => parse_timestamp(&text)
                .ok_or(LoadError::InvalidTimestamp { row, value: text })?,
        };

        Ok(Sample::new(latitude, longitude, timestamp_millis))
    }
}

/// Parse a JSON array of `{latitude, longitude, timestamp}` records.
///
/// Input order is preserved.
pub fn parse_json(data: &[u8]) -> Result<Vec<Sample>, LoadError> {
    let points: Vec<RawPoint> = serde_json::from_slice(data)?;

    points
        .into_iter()
        .enumerate()
        .map(|(row, point)| point.into_sample(row))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_string_timestamps() {
        let data = br#"[
            {"latitude": 17.385044, "longitude": 78.486671, "timestamp": "2024-07-20T10:00:00Z"},
            {"latitude": 17.385200, "longitude": 78.486900, "timestamp": "2024-07-20T10:00:05Z"}
        ]"#;
        let samples = parse_json(data).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].latitude, 17.385044);
        assert_eq!(samples[1].millis_since(&samples[0]), 5_000);
    }

    #[test]
    fn test_parse_epoch_timestamps() {
        let data = br#"[{"latitude": 1.0, "longitude": 2.0, "timestamp": 1721469600000}]"#;
        let samples = parse_json(data).unwrap();
        assert_eq!(samples[0].timestamp_millis, 1_721_469_600_000);
    }

    #[test]
    fn test_keeps_out_of_order_samples() {
        let data = br#"[
            {"latitude": 1.0, "longitude": 1.0, "timestamp": 2000},
            {"latitude": 2.0, "longitude": 2.0, "timestamp": 1000}
        ]"#;
        let samples = parse_json(data).unwrap();
        assert_eq!(samples[0].timestamp_millis, 2000);
        assert_eq!(samples[1].timestamp_millis, 1000);
    }

    #[test]
    fn test_bad_timestamp_reports_row() {
        let data = br#"[
            {"latitude": 1.0, "longitude": 1.0, "timestamp": 1000},
            {"latitude": 2.0, "longitude": 2.0, "timestamp": "yesterday"}
        ]"#;
        match parse_json(data) {
            Err(LoadError::InvalidTimestamp { row, value }) => {
                assert_eq!(row, 1);
                assert_eq!(value, "yesterday");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_coordinates() {
        let data = br#"[
            {"latitude": 17.0, "longitude": 78.0, "timestamp": 1000},
            {"latitude": 95.0, "longitude": 78.0, "timestamp": 2000}
        ]"#;
        match parse_json(data) {
            Err(LoadError::InvalidNumber { row, field, value }) => {
                assert_eq!(row, 1);
                assert_eq!(field, "latitude");
                assert_eq!(value, "95");
            }
            other => panic!("unexpected result: {:?}", other),
        }

        let data = br#"[{"latitude": 1.0, "longitude": -400.0, "timestamp": 1000}]"#;
        assert!(matches!(
            parse_json(data),
            Err(LoadError::InvalidNumber { field: "longitude", .. })
        ));
    }

    #[test]
    fn test_epoch_outside_date_range() {
        let data = format!(
            r#"[{{"latitude": 1.0, "longitude": 1.0, "timestamp": {}}}]"#,
            i64::MAX
        );
        match parse_json(data.as_bytes()) {
            Err(LoadError::InvalidTimestamp { row, value }) => {
                assert_eq!(row, 0);
                assert_eq!(value, i64::MAX.to_string());
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_missing_field_is_json_error() {
        let data = br#"[{"latitude": 1.0, "timestamp": 1000}]"#;
        assert!(matches!(parse_json(data), Err(LoadError::Json(_))));
    }
}
