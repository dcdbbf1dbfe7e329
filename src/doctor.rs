use crate::cdp_url::CdpEndpoint;
use crate::config;
use crate::env::{self, EnvStore, NoProxyVar, ProcessEnv};
use crate::no_proxy;
use anyhow::{anyhow, Context, Result};
use colored::Colorize;

pub struct DoctorSummary {
    pub lines: Vec<String>,
    pub healthy: bool,
}

pub fn run() -> Result<()> {
    let summary = evaluate()?;

    for line in &summary.lines {
        println!("{line}");
    }

    if summary.healthy {
        Ok(())
    } else {
        Err(anyhow!("doctor checks failed"))
    }
}

fn evaluate() -> Result<DoctorSummary> {
    let mut lines = Vec::new();
    let mut healthy = true;

    match check_config() {
        Ok(message) => lines.push(format!("Config: {} - {message}", "OK".green())),
        Err(err) => {
            lines.push(format!("Config: {} - {err:#}", "ERR".red()));
            healthy = false;
        }
    }

    let cdp_url = config::get_cdp_url().unwrap_or_else(|_| crate::defaults::default_cdp_url());
    let env_summary = evaluate_env(&ProcessEnv, &cdp_url);
    lines.extend(env_summary.lines);
    healthy &= env_summary.healthy;

    if healthy {
        lines.push("Doctor summary: all checks passed".to_string());
    } else {
        lines.push("Doctor summary: issues detected".to_string());
    }

    Ok(DoctorSummary { lines, healthy })
}

/// Endpoint and proxy-bypass checks against the given environment.
pub fn evaluate_env(env: &impl EnvStore, cdp_url: &str) -> DoctorSummary {
    let mut lines = Vec::new();
    let mut healthy = true;

    let endpoint = match CdpEndpoint::parse(cdp_url) {
        Ok(endpoint) => {
            lines.push(format!(
                "CDP endpoint: {} - {}",
                "OK".green(),
                endpoint.as_str()
            ));
            Some(endpoint)
        }
        Err(err) => {
            lines.push(format!("CDP endpoint: {} - {err}", "ERR".red()));
            healthy = false;
            None
        }
    };

    let proxies = env::configured_proxy_vars(env);
    if proxies.is_empty() {
        lines.push(format!("Proxy bypass: {} - no proxy configured", "OK".green()));
    } else if no_proxy::covers_loopback(env) {
        lines.push(format!(
            "Proxy bypass: {} - loopback excluded from proxy",
            "OK".green()
        ));
    } else if endpoint.as_ref().is_some_and(CdpEndpoint::is_loopback) {
        let names: Vec<&str> = proxies.iter().map(|var| var.name()).collect();
        lines.push(format!(
            "Proxy bypass: {} - {} set but loopback missing from no-proxy; run `cdpctl-rs prime`",
            "ERR".red(),
            names.join(", ")
        ));
        healthy = false;
    } else {
        lines.push(format!(
            "Proxy bypass: {} - loopback missing from no-proxy",
            "WARN".yellow()
        ));
    }

    DoctorSummary { lines, healthy }
}

pub fn status_lines(env: &impl EnvStore, cdp_url: &str) -> Vec<String> {
    let mut lines = Vec::new();

    for var in env::ProxyVar::ALL {
        if let Some(value) = env.var(var.name()).filter(|value| !value.trim().is_empty()) {
            lines.push(format!("{var}: {value}"));
        }
    }
    if lines.is_empty() {
        lines.push("Proxy: Not set".to_string());
    }

    match env::existing_no_proxy_var(env) {
        Some(var) => lines.push(format!(
            "{var}: {}",
            env.var(var.name()).unwrap_or_default()
        )),
        None => lines.push(format!("{}: Not set", NoProxyVar::Lower)),
    }

    lines.push(format!("CDP URL: {cdp_url}"));
    let bypass = if !env::has_proxy_configured(env) || no_proxy::covers_loopback(env) {
        "direct"
    } else {
        "via proxy"
    };
    lines.push(format!("Loopback traffic: {bypass}"));

    lines
}

fn check_config() -> Result<String> {
    let config_file = config::get_config_file().context("finding config directory")?;

    config::load_config()
        .with_context(|| format!("loading configuration from {}", config_file.display()))?;

    Ok(format!(
        "configuration file at {} parsed successfully",
        config_file.display()
    ))
}

pub fn print_config() -> Result<()> {
    let current = config::load_config()?;
    let rendered = toml::to_string_pretty(&current)?;

    println!("{}\n{}", "Configuration".bold(), rendered);
    println!(
        "{} {}",
        "Config file:".bold(),
        config::get_config_file()?.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MemoryEnv;

    fn joined(summary: &DoctorSummary) -> String {
        summary.lines.join("\n")
    }

    #[test]
    fn healthy_without_proxy() {
        colored::control::set_override(false);
        let summary = evaluate_env(&MemoryEnv::new(), "http://127.0.0.1:9222");
        assert!(summary.healthy);
        assert!(joined(&summary).contains("Proxy bypass: OK - no proxy configured"));
    }

    #[test]
    fn loopback_endpoint_behind_proxy_is_unhealthy() {
        colored::control::set_override(false);
        let env = MemoryEnv::with([("ALL_PROXY", "socks5://proxy.local:1080")]);
        let summary = evaluate_env(&env, "http://127.0.0.1:9222");
        assert!(!summary.healthy);
        assert!(joined(&summary).contains("ALL_PROXY set but loopback missing"));
    }

    #[test]
    fn remote_endpoint_behind_proxy_only_warns() {
        colored::control::set_override(false);
        let env = MemoryEnv::with([("http_proxy", "http://proxy.local:8080")]);
        let summary = evaluate_env(&env, "http://browser.example.com:9222");
        assert!(summary.healthy);
        assert!(joined(&summary).contains("WARN"));
    }

    #[test]
    fn invalid_endpoint_is_unhealthy() {
        colored::control::set_override(false);
        let summary = evaluate_env(&MemoryEnv::new(), "ftp://127.0.0.1");
        assert!(!summary.healthy);
    }

    #[test]
    fn status_reports_effective_no_proxy() {
        let env = MemoryEnv::with([
            ("HTTPS_PROXY", "http://proxy.local:7890"),
            ("NO_PROXY", "127.0.0.1,localhost,::1"),
        ]);
        let lines = status_lines(&env, "http://127.0.0.1:9222");
        assert!(lines.contains(&"HTTPS_PROXY: http://proxy.local:7890".to_string()));
        assert!(lines.contains(&"NO_PROXY: 127.0.0.1,localhost,::1".to_string()));
        assert!(lines.contains(&"Loopback traffic: direct".to_string()));
    }

    #[test]
    fn status_without_anything_set() {
        let lines = status_lines(&MemoryEnv::new(), "http://127.0.0.1:9222");
        assert_eq!(lines[0], "Proxy: Not set");
        assert_eq!(lines[1], "no_proxy: Not set");
    }
}
