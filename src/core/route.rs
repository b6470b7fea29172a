use crate::core::{Coordinate, Sample};
use crate::geo;
use chrono::Duration;

/// The ordered samples recorded for one journey.
///
/// A route never changes after it is built. Samples keep their recording
/// order even when timestamps go backwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Route {
    samples: Vec<Sample>,
    total_distance_km: f64,
}

impl Route {
    pub fn new(samples: Vec<Sample>) -> Self {
        let total_distance_km = geo::total_distance_km(&samples);
        Self {
            samples,
            total_distance_km,
        }
    }

    /// A route with no samples ("no data")
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Sample> {
        self.samples.get(index)
    }

    pub fn first(&self) -> Option<&Sample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// Index of the final sample, None for an empty route
    pub fn last_index(&self) -> Option<usize> {
        self.samples.len().checked_sub(1)
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Coordinates of the whole route, in order
    pub fn path(&self) -> Vec<Coordinate> {
        self.samples.iter().map(Sample::coordinate).collect()
    }

    /// Samples visited so far when the vehicle sits at `index`
    pub fn traveled(&self, index: usize) -> &[Sample] {
        let end = index.saturating_add(1).min(self.samples.len());
        &self.samples[..end]
    }

    /// Length of the whole route, summed once when the route is built
    pub fn total_distance_km(&self) -> f64 {
        self.total_distance_km
    }

    /// Time between the first and last recorded sample, None when either
    /// timestamp is outside chrono's range
    pub fn duration(&self) -> Option<Duration> {
        let first = self.first()?.timestamp()?;
        let last = self.last()?.timestamp()?;
        Some(last - first)
    }
}

impl From<Vec<Sample>> for Route {
    fn from(samples: Vec<Sample>) -> Self {
        Self::new(samples)
    }
}
