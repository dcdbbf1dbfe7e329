//! Loopback and proxy helpers for Chrome DevTools Protocol clients.
//!
//! A CDP client talking to a browser's debugging port over loopback HTTP must
//! never have that traffic picked up by a proxy configured through
//! `HTTP_PROXY` and friends. [`ensure_loopback_in_no_proxy`] primes the
//! no-proxy exclusion list, [`is_loopback_host`] classifies hosts and
//! [`append_cdp_path`] builds request URLs against the endpoint.

pub mod cdp_url;
pub mod config;
pub mod defaults;
pub mod doctor;
pub mod env;
pub mod loopback;
pub mod no_proxy;

pub use cdp_url::{append_cdp_path, CdpEndpoint, EndpointError};
pub use env::{EnvStore, MemoryEnv, NoProxyVar, ProcessEnv, ProxyVar};
pub use loopback::{is_loopback_host, is_loopback_url, LOOPBACK_HOSTS};
pub use no_proxy::{
    ensure_entries_in_no_proxy_with, ensure_loopback_in_no_proxy,
    ensure_loopback_in_no_proxy_with, NoProxyUpdate,
};
