use anyhow::{Context, Result};
use route_replay::geo::format_km;
use route_replay::input::FileSource;
use route_replay::{PlaybackState, ReplaySession, ReplaySettings, RouteStore, Snapshot};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let settings = ReplaySettings::load();
    let route_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| settings.route_path.clone())
        .context("No route file given and no route_path in settings")?;

    // Create tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
    rt.block_on(run(route_path, settings))
}

/// Headless replay: load, show, play to the end and log telemetry as it changes
async fn run(route_path: PathBuf, settings: ReplaySettings) -> Result<()> {
    let mut source = FileSource::new(&route_path);
    let store = RouteStore::load(&mut source).await;

    let route = store.route();
    if route.is_empty() {
        anyhow::bail!("No route data available from {:?}", route_path);
    }
    info!(
        samples = route.len(),
        distance_km = %format_km(route.total_distance_km()),
        "route ready"
    );

    let mut session = ReplaySession::from_store(&store, settings.playback_config());
    let mut updates = session.subscribe();

    // Stand at the first recorded point, then show and play the route
    if let Some(first) = route.first() {
        session.select_start_location(first.coordinate());
    }
    session.show_route();
    session.toggle_play();

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                log_snapshot(&snapshot);
                if snapshot.state == PlaybackState::Finished {
                    break;
                }
            }
            _ = &mut ctrl_c => {
                warn!("interrupted, stopping replay");
                break;
            }
        }
    }

    session.shutdown();

    let snapshot = session.snapshot();
    info!(
        state = ?snapshot.state,
        journey_time = %snapshot.elapsed_formatted,
        progress = %snapshot.progress_label(),
        "replay stopped"
    );
    Ok(())
}

fn log_snapshot(snapshot: &Snapshot) {
    info!(
        position = %snapshot.position_label(),
        speed_kmh = %snapshot.speed_kmh,
        journey_time = %snapshot.elapsed_formatted,
        progress = %snapshot.progress_label(),
        percent = snapshot.progress_percent,
        timestamp = %snapshot.timestamp_label(),
        "telemetry"
    );
}
