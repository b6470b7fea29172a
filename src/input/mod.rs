pub mod csv;
pub mod error;
pub mod json;
pub mod source;
pub mod store;

pub use self::csv::parse_csv;
pub use error::LoadError;
pub use json::parse_json;
pub use source::{FileSource, MemorySource, RouteSource};
pub use store::{LoadStatus, RouteStore};

use crate::core::Route;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

/// Input format detection result
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputFormat {
    Json,
    Csv,
    Unknown,
}

/// Detect the format of a route document by looking at its first bytes
pub fn detect_format(data: &[u8]) -> InputFormat {
    let data = data.strip_prefix(b"\xEF\xBB\xBF".as_slice()).unwrap_or(data);

    match data.iter().find(|b| !b.is_ascii_whitespace()) {
        Some(b'[') | Some(b'{') => InputFormat::Json,
        Some(_) if is_csv(data) => InputFormat::Csv,
        _ => InputFormat::Unknown,
    }
}

fn is_csv(data: &[u8]) -> bool {
    // A header line with at least latitude, longitude and timestamp columns
    let sample = match std::str::from_utf8(&data[..data.len().min(500)]) {
        Ok(text) => text,
        // The cut may land inside a multi-byte character
        Err(e) => match std::str::from_utf8(&data[..e.valid_up_to()]) {
            Ok(text) => text,
            Err(_) => return false,
        },
    };

    sample
        .lines()
        .take(5)
        .any(|line| line.chars().filter(|&c| c == ',').count() >= 2)
}

/// Parse a route timestamp into epoch milliseconds.
///
/// Accepts integer epoch milliseconds, RFC 3339 strings and naive
/// `YYYY-MM-DDTHH:MM:SS[.fff]` strings, which are taken as UTC. Epoch values
/// outside chrono's date range are rejected.
pub fn parse_timestamp(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ms) = raw.parse::<i64>() {
        return checked_millis(ms);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis());
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc().timestamp_millis())
}

/// `ms` if it names a representable UTC instant
pub(crate) fn checked_millis(ms: i64) -> Option<i64> {
    Utc.timestamp_millis_opt(ms).single().map(|_| ms)
}

pub(crate) fn check_latitude(value: f64, row: usize) -> Result<f64, LoadError> {
    check_degrees(value, 90.0, "latitude", row)
}

pub(crate) fn check_longitude(value: f64, row: usize) -> Result<f64, LoadError> {
    check_degrees(value, 180.0, "longitude", row)
}

/// Finite and within `-limit..=limit` degrees
fn check_degrees(
    value: f64,
    limit: f64,
    field: &'static str,
    row: usize,
) -> Result<f64, LoadError> {
    if value.is_finite() && value.abs() <= limit {
        Ok(value)
    } else {
        Err(LoadError::InvalidNumber {
            row,
            field,
            value: value.to_string(),
        })
    }
}

/// Parse a route document, auto-detecting its format
pub fn parse_route(data: &[u8]) -> Result<Route, LoadError> {
    let samples = match detect_format(data) {
        InputFormat::Json => parse_json(data)?,
        InputFormat::Csv => parse_csv(data)?,
        InputFormat::Unknown => return Err(LoadError::UnknownFormat),
    };

    Ok(Route::new(samples))
}

/// Fetch and parse a route from `source`.
///
/// No retries; call again for a fresh load.
pub async fn load_route<S: RouteSource + ?Sized>(source: &mut S) -> Result<Route, LoadError> {
    let data = source.fetch().await?;
    parse_route(&data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_format() {
        assert_eq!(detect_format(b"  [ {\"latitude\": 1} ]"), InputFormat::Json);
        assert_eq!(detect_format(b"\xEF\xBB\xBF[]"), InputFormat::Json);
        assert_eq!(detect_format(b"lat,lng,time\n1,2,3\n"), InputFormat::Csv);
        assert_eq!(detect_format(b"hello world"), InputFormat::Unknown);
        assert_eq!(detect_format(b""), InputFormat::Unknown);
    }

    #[test]
    fn test_parse_timestamp_variants() {
        assert_eq!(parse_timestamp("1721469600000"), Some(1_721_469_600_000));
        assert_eq!(parse_timestamp("2024-07-20T10:00:00Z"), Some(1_721_469_600_000));
        assert_eq!(parse_timestamp("2024-07-20T15:30:00+05:30"), Some(1_721_469_600_000));
        assert_eq!(parse_timestamp("2024-07-20T10:00:00"), Some(1_721_469_600_000));
        assert_eq!(parse_timestamp("2024-07-20 10:00:00.500"), Some(1_721_469_600_500));
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("not a time"), None);
    }

    #[test]
    fn test_parse_timestamp_out_of_range() {
        assert_eq!(parse_timestamp(&i64::MAX.to_string()), None);
        assert_eq!(parse_timestamp(&i64::MIN.to_string()), None);
        assert_eq!(parse_timestamp("-1000"), Some(-1000));
    }

    #[test]
    fn test_check_coordinates() {
        assert_eq!(check_latitude(-90.0, 0).unwrap(), -90.0);
        assert_eq!(check_longitude(180.0, 0).unwrap(), 180.0);
        assert!(check_latitude(95.0, 0).is_err());
        assert!(check_longitude(400.0, 0).is_err());
        assert!(check_latitude(f64::NAN, 0).is_err());
        assert!(check_longitude(f64::INFINITY, 0).is_err());
    }

    #[test]
    fn test_extreme_epoch_route_is_rejected() {
        let data = format!(
            r#"[{{"latitude": 1.0, "longitude": 1.0, "timestamp": {}}},
                {{"latitude": 2.0, "longitude": 2.0, "timestamp": {}}}]"#,
            i64::MIN,
            i64::MAX
        );
        match parse_route(data.as_bytes()) {
            Err(LoadError::InvalidTimestamp { row, .. }) => assert_eq!(row, 0),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_csv_route_is_rejected() {
        let data = b"lat,lng,time\nNaN,0,1000\n1,inf,2000\n95,400,3000\n";
        match parse_route(data) {
            Err(LoadError::InvalidNumber { row, field, .. }) => {
                assert_eq!(row, 0);
                assert_eq!(field, "latitude");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_route_unknown_format() {
        assert!(matches!(parse_route(b"garbage"), Err(LoadError::UnknownFormat)));
    }

    #[test]
    fn test_parse_demo_route() {
        let route = parse_route(include_bytes!("../../demos/dummy-route.json")).unwrap();
        assert_eq!(route.len(), 10);
        // Samples 4 and 5 are a duplicate recording
        let samples = route.samples();
        assert_eq!(crate::geo::speed_kmh(&samples[4], &samples[5]), 0.0);
        assert!(route.total_distance_km() > 0.5);
    }

    #[tokio::test]
    async fn test_load_route_from_memory() {
        let mut source = MemorySource::new(
            "mem",
            r#"[{"latitude": 1.0, "longitude": 2.0, "timestamp": 1000}]"#,
        );
        let route = load_route(&mut source).await.unwrap();
        assert_eq!(route.len(), 1);
    }
}
