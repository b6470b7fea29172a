use crate::core::{Coordinate, Route};
use crate::playback::{PlaybackConfig, PlaybackState};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

/// Drives the simulated traversal of a recorded route.
///
/// Position and journey time are separate counters: `tick` moves one sample
/// forward, `elapsed_tick` refreshes the clock. Position is never derived
/// from elapsed time.
pub struct PlaybackController {
    route: Arc<Route>,
    config: PlaybackConfig,
    state: PlaybackState,
    current_position: usize,
    elapsed_seconds: u64,
    clock_anchor: Option<Instant>,
    start_location: Option<Coordinate>,
    run_epoch: u64,
}

impl PlaybackController {
    pub fn new(route: Arc<Route>, config: PlaybackConfig) -> Self {
        Self {
            route,
            config,
            state: PlaybackState::Idle,
            current_position: 0,
            elapsed_seconds: 0,
            clock_anchor: None,
            start_location: None,
            run_epoch: 0,
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn shared_route(&self) -> Arc<Route> {
        Arc::clone(&self.route)
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Get current playback state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Index of the current sample, None when the route is empty
    pub fn position(&self) -> Option<usize> {
        if self.route.is_empty() {
            None
        } else {
            Some(self.current_position)
        }
    }

    /// Check if currently playing
    pub fn is_running(&self) -> bool {
        self.state == PlaybackState::Running
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    /// Wall-clock instant the journey clock counts from, while running
    pub fn clock_anchor(&self) -> Option<Instant> {
        self.clock_anchor
    }

    pub fn start_location(&self) -> Option<Coordinate> {
        self.start_location
    }

    /// Identifies the current running period. Changes whenever playback
    /// starts or stops running, so timer firings from an earlier period can
    /// be recognised and dropped.
    pub fn run_epoch(&self) -> u64 {
        self.run_epoch
    }

    /// Show the route, parked on its first sample.
    ///
    /// Returns false (and changes nothing) when there is no route to show.
    pub fn show_route(&mut self) -> bool {
        if self.route.is_empty() {
            debug!("show route ignored: no route data");
            return false;
        }

        self.stop_running();
        self.state = PlaybackState::Ready;
        self.current_position = 0;
        self.elapsed_seconds = 0;
        self.clock_anchor = None;
        debug!(samples = self.route.len(), "route shown");
        true
    }

    /// Start, resume or pause playback
    pub fn toggle_play(&mut self, now: Instant) {
        match self.state {
            PlaybackState::Running => self.pause(),
            PlaybackState::Ready | PlaybackState::Paused => self.play(now),
            PlaybackState::Idle | PlaybackState::Finished => {
                debug!(state = ?self.state, "toggle play ignored");
            }
        }
    }

    /// Start/resume playback
    fn play(&mut self, now: Instant) {
        if self.at_last_sample() && !self.config.loop_playback {
            self.state = PlaybackState::Finished;
            debug!("play at last sample: finished");
            return;
        }

        // Count from an anchor set back by the time already accumulated
        let accumulated = Duration::from_secs(self.elapsed_seconds);
        self.clock_anchor = Some(now.checked_sub(accumulated).unwrap_or(now));
        self.state = PlaybackState::Running;
        self.run_epoch += 1;
        debug!(position = self.current_position, elapsed = self.elapsed_seconds, "playing");
    }

    /// Pause playback, keeping position and elapsed time
    pub fn pause(&mut self) {
        if self.state != PlaybackState::Running {
            return;
        }

        self.stop_running();
        self.state = PlaybackState::Paused;
        debug!(position = self.current_position, elapsed = self.elapsed_seconds, "paused");
    }

    /// Advance one sample. Returns true if the position changed.
    ///
    /// Reaching the last sample finishes playback unless looping is enabled,
    /// in which case the tick after the last sample wraps to the first.
    pub fn tick(&mut self) -> bool {
        if self.state != PlaybackState::Running {
            return false;
        }

        let last = match self.route.last_index() {
            Some(last) => last,
            None => return false,
        };

        if self.current_position < last {
            self.current_position += 1;
            if self.current_position == last && !self.config.loop_playback {
                self.finish();
            }
            true
        } else if self.config.loop_playback {
            self.current_position = 0;
            debug!("looped to first sample");
            true
        } else {
            self.finish();
            false
        }
    }

    /// Refresh the journey clock from the wall clock
    pub fn elapsed_tick(&mut self, now: Instant) {
        if self.state != PlaybackState::Running {
            return;
        }

        if let Some(anchor) = self.clock_anchor {
            self.elapsed_seconds = now.saturating_duration_since(anchor).as_secs();
        }
    }

    /// Back to the first sample with a zeroed clock.
    ///
    /// A shown route stays shown (Ready); without one the state stays Idle.
    pub fn reset(&mut self) {
        self.stop_running();
        self.state = if self.state.is_route_shown() {
            PlaybackState::Ready
        } else {
            PlaybackState::Idle
        };
        self.current_position = 0;
        self.elapsed_seconds = 0;
        self.clock_anchor = None;
        debug!(state = ?self.state, "reset");
    }

    /// Pick a new starting point. Hides the route and discards playback.
    pub fn set_start_location(&mut self, location: Coordinate) {
        self.start_location = Some(location);
        self.stop_running();
        self.state = PlaybackState::Idle;
        self.reset();
        info!(lat = location.lat, lng = location.lng, "start location selected");
    }

    fn at_last_sample(&self) -> bool {
        self.route.last_index() == Some(self.current_position)
    }

    fn finish(&mut self) {
        self.stop_running();
        self.state = PlaybackState::Finished;
        info!(samples = self.route.len(), elapsed = self.elapsed_seconds, "reached end of route");
    }

    /// Leave the running period, if in one
    fn stop_running(&mut self) {
        if self.state == PlaybackState::Running {
            self.run_epoch += 1;
        }
        self.clock_anchor = None;
    }
}
