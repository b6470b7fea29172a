//! Replay of a recorded vehicle route with live-computed telemetry.
//!
//! A [`RouteStore`](input::RouteStore) loads the recorded samples once per
//! session. A [`ReplaySession`](session::ReplaySession) steps through them on
//! two timers (one sample per tick, a one-second journey clock) and exposes
//! a [`Snapshot`](telemetry::Snapshot) of position, speed, elapsed time and
//! progress for whatever presentation layer sits on top.

pub mod config;
pub mod core;
pub mod geo;
pub mod input;
pub mod playback;
pub mod session;
pub mod telemetry;

pub use crate::core::{Coordinate, Route, Sample};
pub use config::ReplaySettings;
pub use input::{LoadError, RouteStore};
pub use playback::{PlaybackConfig, PlaybackController, PlaybackState};
pub use session::ReplaySession;
pub use telemetry::Snapshot;
