use std::env;

/// Get default CDP endpoint
/// Loads from DEFAULT_CDP_URL environment variable if set, otherwise uses the local debugging port
pub fn default_cdp_url() -> String {
    env::var("DEFAULT_CDP_URL").unwrap_or_else(|_| "http://127.0.0.1:9222".to_string())
}

/// Environment variable that overrides the configured CDP endpoint
pub const CDP_URL_ENV: &str = "CDPCTL_CDP_URL";
