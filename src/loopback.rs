use std::net::IpAddr;

use reqwest::Url;

/// Canonical loopback forms, in the order they are added to no-proxy lists.
pub const LOOPBACK_HOSTS: [&str; 3] = ["127.0.0.1", "localhost", "::1"];

/// Whether `host` (no scheme, no port) names the local loopback interface.
pub fn is_loopback_host(host: &str) -> bool {
    if LOOPBACK_HOSTS.contains(&host) || host.eq_ignore_ascii_case("localhost") {
        return true;
    }

    let bare = host
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(host);

    bare.parse::<IpAddr>()
        .map(|ip| ip.is_loopback())
        .unwrap_or(false)
}

/// Classifies a URL by its host. Unparseable URLs are not loopback.
pub fn is_loopback_url(url: &str) -> bool {
    Url::parse(url.trim())
        .ok()
        .and_then(|url| url.host_str().map(is_loopback_host))
        .unwrap_or(false)
}
