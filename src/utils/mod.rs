/// Default location of the baseline snapshot, relative to the working directory
pub const DEFAULT_BASELINE_PATH: &str = "./cache/current_google.json";

/// Default period between two sync ticks, in seconds
pub const DEFAULT_INTERVAL_SECS: u64 = 60;

/// Default timeout applied to every outbound HTTP request, in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// User agent sent by the roster and mailing-list clients
pub const USER_AGENT: &str = concat!("roster-sync/", env!("CARGO_PKG_VERSION"));

/// Get current timestamp in ISO 8601 format
pub fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339()
}
