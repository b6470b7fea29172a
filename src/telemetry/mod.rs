pub mod snapshot;

pub use snapshot::Snapshot;

/// Format a journey time as "M:SS"
pub fn format_elapsed(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
