use crate::core::Route;
use crate::input::{load_route, LoadError, RouteSource};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Outcome of the most recent route load
#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    /// Nothing loaded yet
    Pending,
    /// Route loaded from the named source
    Loaded { source: String, samples: usize },
    /// Load failed; the store holds an empty route
    Failed { source: String, message: String },
}

/// Holds the route for the current session.
///
/// A pending or failed load leaves an empty route in place, so readers
/// always get a route and treat an empty one as "no data".
#[derive(Debug, Clone)]
pub struct RouteStore {
    route: Arc<Route>,
    status: LoadStatus,
}

impl Default for RouteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteStore {
    /// A store whose load has not happened yet
    pub fn new() -> Self {
        Self {
            route: Arc::new(Route::empty()),
            status: LoadStatus::Pending,
        }
    }

    /// Load a route, falling back to an empty one on failure
    pub async fn load<S: RouteSource + ?Sized>(source: &mut S) -> Self {
        let mut store = Self::new();
        // Failures are logged and recorded in the status
        let _ = store.reload(source).await;
        store
    }

    /// Replace the route with a fresh load from `source`.
    ///
    /// On failure the store falls back to an empty route and the error is
    /// returned as well as logged.
    pub async fn reload<S: RouteSource + ?Sized>(
        &mut self,
        source: &mut S,
    ) -> Result<usize, LoadError> {
        let name = source.name().to_string();

        match load_route(source).await {
            Ok(route) => {
                let samples = route.len();
                if samples == 0 {
                    warn!(source = %name, "route source contains no samples");
                } else {
                    info!(source = %name, samples, "route loaded");
                }
                self.route = Arc::new(route);
                self.status = LoadStatus::Loaded { source: name, samples };
                Ok(samples)
            }
            Err(e) => {
                error!(source = %name, error = %e, "error loading route data");
                self.route = Arc::new(Route::empty());
                self.status = LoadStatus::Failed {
                    source: name,
                    message: e.to_string(),
                };
                Err(e)
            }
        }
    }

    /// Shared handle to the current route
    pub fn route(&self) -> Arc<Route> {
        Arc::clone(&self.route)
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.status, LoadStatus::Loaded { .. })
    }
}
