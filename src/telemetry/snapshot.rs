use crate::core::{Coordinate, Route};
use crate::geo;
use crate::playback::{PlaybackController, PlaybackState};
use crate::telemetry::format_elapsed;
use chrono::{DateTime, Utc};
use serde::Serialize;

const AWAITING_SIGNAL: &str = "Awaiting GPS signal...";
const NO_TIMESTAMP: &str = "No data available";

/// Telemetry readout for the current instant.
///
/// Derived from the route and the playback position on every call; it holds
/// nothing that is not recomputable from those two.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub state: PlaybackState,
    /// Current vehicle position, None when there is no route data
    pub position: Option<Coordinate>,
    /// Speed over the last leg, two decimals
    pub speed_kmh: String,
    /// Direction of travel over the last leg
    pub heading_deg: Option<f64>,
    pub elapsed_seconds: u64,
    /// Journey time as "M:SS"
    pub elapsed_formatted: String,
    /// Share of the route visited, 0.0 to 1.0
    pub progress_fraction: f64,
    pub progress_percent: u32,
    /// 1-based number of the current sample, 0 without route data
    pub sample_number: usize,
    pub sample_count: usize,
    /// Recording time of the current sample
    pub timestamp: Option<DateTime<Utc>>,
    pub total_distance_km: f64,
    pub start_location: Option<Coordinate>,
}

impl Snapshot {
    pub fn current(route: &Route, playback: &PlaybackController) -> Self {
        let index = playback.position().unwrap_or(0);
        let sample = route.get(index).or_else(|| route.first());

        let previous = index
            .checked_sub(1)
            .and_then(|prev| route.get(prev).zip(route.get(index)));

        let speed = match previous {
            Some((prev, curr)) if route.len() > 1 => geo::speed_kmh(prev, curr),
            _ => 0.0,
        };

        let heading_deg = previous
            .filter(|(prev, curr)| prev.coordinate() != curr.coordinate())
            .map(|(prev, curr)| geo::bearing_deg(prev.coordinate(), curr.coordinate()));

        let progress_fraction = progress_fraction(index, route.len());

        Self {
            state: playback.state(),
            position: sample.map(|s| s.coordinate()),
            speed_kmh: geo::format_speed(speed),
            heading_deg,
            elapsed_seconds: playback.elapsed_seconds(),
            elapsed_formatted: format_elapsed(playback.elapsed_seconds()),
            progress_fraction,
            progress_percent: (progress_fraction * 100.0).round() as u32,
            sample_number: if route.is_empty() { 0 } else { index + 1 },
            sample_count: route.len(),
            timestamp: sample.and_then(|s| s.timestamp()),
            total_distance_km: route.total_distance_km(),
            start_location: playback.start_location(),
        }
    }

    /// Snapshot of the controller's own route
    pub fn capture(playback: &PlaybackController) -> Self {
        Self::current(playback.route(), playback)
    }

    pub fn has_data(&self) -> bool {
        self.position.is_some()
    }

    pub fn position_label(&self) -> String {
        self.position
            .map(|p| p.label())
            .unwrap_or_else(|| AWAITING_SIGNAL.to_string())
    }

    pub fn timestamp_label(&self) -> String {
        self.timestamp
            .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| NO_TIMESTAMP.to_string())
    }

    /// "current / total" sample counter
    pub fn progress_label(&self) -> String {
        format!("{} / {}", self.sample_number, self.sample_count)
    }
}

fn progress_fraction(index: usize, len: usize) -> f64 {
    if len == 0 {
        return 0.0;
    }
    ((index + 1) as f64 / len as f64).min(1.0)
}
