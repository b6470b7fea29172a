use crate::core::Sample;
use crate::input::{check_latitude, check_longitude, parse_timestamp, LoadError};

const LATITUDE_NAMES: &[&str] = &["latitude", "lat"];
const LONGITUDE_NAMES: &[&str] = &["longitude", "lng", "lon", "long"];
const TIMESTAMP_NAMES: &[&str] = &["timestamp", "time", "ts", "t"];

/// Parse route samples from CSV.
///
/// Supports flexible column names:
/// - latitude,longitude,timestamp
/// - lat,lng,time
/// - ts,lat,lon
///
/// Timestamps may be epoch milliseconds or date strings.
pub fn parse_csv(data: &[u8]) -> Result<Vec<Sample>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers = rdr.headers()?;
    let (lat_idx, lng_idx, time_idx) = detect_columns(headers)?;

    let mut samples = Vec::new();

    for (row, result) in rdr.records().enumerate() {
        let record = result?;

        let latitude = check_latitude(parse_number(&record, lat_idx, row, "latitude")?, row)?;
        let longitude = check_longitude(parse_number(&record, lng_idx, row, "longitude")?, row)?;

        let raw_time = record.get(time_idx).unwrap_or("");
        let timestamp_millis = parse_timestamp(raw_time).ok_or_else(|| {
            LoadError::InvalidTimestamp {
                row,
                value: raw_time.to_string(),
            }
        })?;

        samples.push(Sample::new(latitude, longitude, timestamp_millis));
    }

    Ok(samples)
}

fn parse_number(
    record: &csv::StringRecord,
    idx: usize,
    row: usize,
    field: &'static str,
) -> Result<f64, LoadError> {
    let raw = record.get(idx).unwrap_or("");
    raw.parse::<f64>().map_err(|_| LoadError::InvalidNumber {
        row,
        field,
        value: raw.to_string(),
    })
}

/// Detect column indices from CSV headers
fn detect_columns(headers: &csv::StringRecord) -> Result<(usize, usize, usize), LoadError> {
    let lat_idx = find_column(headers, LATITUDE_NAMES)?;
    let lng_idx = find_column(headers, LONGITUDE_NAMES)?;
    let time_idx = find_column(headers, TIMESTAMP_NAMES)?;

    Ok((lat_idx, lng_idx, time_idx))
}

/// Find a column by checking possible names
fn find_column(
    headers: &csv::StringRecord,
    names: &'static [&'static str],
) -> Result<usize, LoadError> {
    headers
        .iter()
        .position(|header| {
            let header_lower = header.to_lowercase();
            names.iter().any(|&name| header_lower == name)
        })
        .ok_or(LoadError::MissingColumn(names))
}
