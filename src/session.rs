use crate::core::{Coordinate, Route};
use crate::input::RouteStore;
use crate::playback::{PlaybackConfig, PlaybackController, PlaybackState, TimerHandle};
use crate::telemetry::Snapshot;
use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::debug;

type SharedController = Arc<Mutex<PlaybackController>>;

/// One replay session: the playback controller plus the two timers that
/// drive it while running.
///
/// The session is the only writer of playback state. Both timers are
/// cancelled before any command that leaves the running state returns, and
/// when the session is dropped.
///
/// Commands spawn timers, so they must be called from within a Tokio
/// runtime.
pub struct ReplaySession {
    controller: SharedController,
    updates: Arc<watch::Sender<Snapshot>>,
    advance_timer: Option<TimerHandle>,
    clock_timer: Option<TimerHandle>,
}

impl ReplaySession {
    pub fn new(route: Arc<Route>, config: PlaybackConfig) -> Self {
        let controller = PlaybackController::new(route, config);
        let (updates, _) = watch::channel(Snapshot::capture(&controller));

        Self {
            controller: Arc::new(Mutex::new(controller)),
            updates: Arc::new(updates),
            advance_timer: None,
            clock_timer: None,
        }
    }

    /// Session over whatever route the store currently holds
    pub fn from_store(store: &RouteStore, config: PlaybackConfig) -> Self {
        Self::new(store.route(), config)
    }

    /// Receiver that sees a fresh snapshot after every change
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.updates.subscribe()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&lock(&self.controller))
    }

    pub fn route(&self) -> Arc<Route> {
        lock(&self.controller).shared_route()
    }

    pub fn state(&self) -> PlaybackState {
        lock(&self.controller).state()
    }

    pub fn is_running(&self) -> bool {
        lock(&self.controller).is_running()
    }

    /// User picked a starting point on the map
    pub fn select_start_location(&mut self, location: Coordinate) {
        self.stop_timers();
        self.apply(|playback| playback.set_start_location(location));
    }

    /// Show the route. Returns false when there is no route data.
    pub fn show_route(&mut self) -> bool {
        self.stop_timers();
        self.apply(|playback| playback.show_route())
    }

    /// Start, resume or pause
    pub fn toggle_play(&mut self) {
        self.stop_timers();
        let (running, epoch) = self.apply(|playback| {
            playback.toggle_play(Instant::now());
            (playback.is_running(), playback.run_epoch())
        });

        if running {
            self.start_timers(epoch);
        }
    }

    pub fn reset(&mut self) {
        self.stop_timers();
        self.apply(|playback| playback.reset());
    }

    /// Stop both timers without touching playback state
    pub fn shutdown(&mut self) {
        self.stop_timers();
        debug!("session shut down");
    }

    fn apply<T>(&self, command: impl FnOnce(&mut PlaybackController) -> T) -> T {
        let mut playback = lock(&self.controller);
        let result = command(&mut playback);
        self.updates.send_replace(Snapshot::capture(&playback));
        result
    }

    fn start_timers(&mut self, epoch: u64) {
        let (tick_interval, elapsed_interval) = {
            let playback = lock(&self.controller);
            (playback.config().tick_interval, playback.config().elapsed_interval)
        };

        let controller = Arc::clone(&self.controller);
        let updates = Arc::clone(&self.updates);
        self.advance_timer = Some(TimerHandle::spawn("advance", tick_interval, move || {
            fire(&controller, &updates, epoch, |playback| {
                playback.tick();
            })
        }));

        let controller = Arc::clone(&self.controller);
        let updates = Arc::clone(&self.updates);
        self.clock_timer = Some(TimerHandle::spawn("clock", elapsed_interval, move || {
            fire(&controller, &updates, epoch, |playback| {
                playback.elapsed_tick(Instant::now());
            })
        }));

        debug!(epoch, "timers started");
    }

    fn stop_timers(&mut self) {
        if let Some(timer) = self.advance_timer.take() {
            timer.cancel();
        }
        if let Some(timer) = self.clock_timer.take() {
            timer.cancel();
        }
    }
}

impl Drop for ReplaySession {
    fn drop(&mut self) {
        self.stop_timers();
    }
}

/// Apply one timer firing, unless it belongs to an earlier running period
fn fire(
    controller: &Mutex<PlaybackController>,
    updates: &watch::Sender<Snapshot>,
    epoch: u64,
    action: impl FnOnce(&mut PlaybackController),
) -> ControlFlow<()> {
    let mut playback = lock(controller);
    if playback.run_epoch() != epoch || !playback.is_running() {
        return ControlFlow::Break(());
    }

    action(&mut playback);
    updates.send_replace(Snapshot::capture(&playback));

    if playback.is_running() {
        ControlFlow::Continue(())
    } else {
        ControlFlow::Break(())
    }
}

fn lock(controller: &Mutex<PlaybackController>) -> MutexGuard<'_, PlaybackController> {
    controller.lock().unwrap_or_else(PoisonError::into_inner)
}
