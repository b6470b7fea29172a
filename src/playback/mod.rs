pub mod engine;
pub mod timer;

pub use engine::PlaybackController;
pub use timer::TimerHandle;

use serde::Serialize;
use std::time::Duration;

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlaybackState {
    /// No route shown
    Idle,
    /// Route shown, parked on the first sample
    Ready,
    /// Advancing through the route
    Running,
    /// Stopped mid-route, position kept
    Paused,
    /// Stopped on the last sample; only a reset replays
    Finished,
}

impl PlaybackState {
    pub fn is_route_shown(&self) -> bool {
        *self != PlaybackState::Idle
    }
}

/// Playback configuration
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackConfig {
    pub tick_interval: Duration,     // time spent on each sample
    pub elapsed_interval: Duration,  // journey clock refresh
    pub loop_playback: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(2),
            elapsed_interval: Duration::from_secs(1),
            loop_playback: false,
        }
    }
}
