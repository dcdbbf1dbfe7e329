use serde::Serialize;
use tracing::debug;

use crate::env::{self, EnvStore, NoProxyVar, ProcessEnv};
use crate::loopback::LOOPBACK_HOSTS;

/// A write performed on a no-proxy variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoProxyUpdate {
    pub var: NoProxyVar,
    pub value: String,
    pub added: Vec<String>,
}

impl NoProxyUpdate {
    pub fn export_line(&self) -> String {
        format!("export {}=\"{}\"", self.var, self.value)
    }
}

/// Primes the process no-proxy variable with every loopback form when a
/// proxy is configured. Call during single-threaded startup.
pub fn ensure_loopback_in_no_proxy() {
    ensure_loopback_in_no_proxy_with(&mut ProcessEnv);
}

pub fn ensure_loopback_in_no_proxy_with(env: &mut impl EnvStore) -> Option<NoProxyUpdate> {
    ensure_entries_in_no_proxy_with(env, &LOOPBACK_HOSTS[..])
}

/// Appends each missing entry to the effective no-proxy variable.
///
/// Does nothing unless one of the proxy variables is set. The variable that
/// is already present is updated in place (`NO_PROXY` first, then
/// `no_proxy`); when neither exists `no_proxy` is created. Existing entries
/// keep their order, and only exact matches count as present.
pub fn ensure_entries_in_no_proxy_with<S: AsRef<str>>(
    env: &mut impl EnvStore,
    entries: &[S],
) -> Option<NoProxyUpdate> {
    if !env::has_proxy_configured(&*env) {
        debug!("no proxy configured, leaving no-proxy variables untouched");
        return None;
    }

    let target = env::existing_no_proxy_var(&*env).unwrap_or(NoProxyVar::Lower);
    let current = env.var(target.name()).unwrap_or_default();
    let mut list = parse_no_proxy(&current);

    let mut added = Vec::new();
    for entry in entries {
        let entry = entry.as_ref().trim();
        if entry.is_empty() || list.iter().any(|existing| existing == entry) {
            continue;
        }
        list.push(entry.to_string());
        added.push(entry.to_string());
    }

    if added.is_empty() {
        debug!(var = %target, "no-proxy already covers requested entries");
        return None;
    }

    let value = list.join(",");
    env.set_var(target.name(), &value);
    debug!(var = %target, added = ?added, "updated no-proxy variable");

    Some(NoProxyUpdate {
        var: target,
        value,
        added,
    })
}

/// Splits a no-proxy value into trimmed, non-empty entries.
pub fn parse_no_proxy(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whether the effective no-proxy variable lists every loopback form.
pub fn covers_loopback(env: &impl EnvStore) -> bool {
    let Some(var) = env::existing_no_proxy_var(env) else {
        return false;
    };
    let entries = parse_no_proxy(&env.var(var.name()).unwrap_or_default());
    LOOPBACK_HOSTS
        .iter()
        .all(|host| entries.iter().any(|entry| entry == host))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MemoryEnv;

    #[test]
    fn parse_drops_blank_segments() {
        assert_eq!(
            parse_no_proxy(" a.com, ,b.com,,  *.internal "),
            vec!["a.com", "b.com", "*.internal"]
        );
        assert!(parse_no_proxy("").is_empty());
    }

    #[test]
    fn wildcard_entries_do_not_count_as_covering_loopback() {
        let mut env = MemoryEnv::with([("HTTP_PROXY", "http://p:1"), ("no_proxy", "*")]);
        let update = ensure_loopback_in_no_proxy_with(&mut env).expect("update");
        assert_eq!(update.value, "*,127.0.0.1,localhost,::1");
    }

    #[test]
    fn extra_entries_follow_loopback_and_skip_blanks() {
        let mut env = MemoryEnv::with([("https_proxy", "http://p:1")]);
        let entries = ["127.0.0.1", "localhost", "::1", " ", "*.corp.local"];
        let update = ensure_entries_in_no_proxy_with(&mut env, &entries[..]).expect("update");
        assert_eq!(update.var, NoProxyVar::Lower);
        assert_eq!(update.value, "127.0.0.1,localhost,::1,*.corp.local");
        assert_eq!(update.added.len(), 4);
    }

    #[test]
    fn export_line_quotes_value() {
        let update = NoProxyUpdate {
            var: NoProxyVar::Upper,
            value: "127.0.0.1,localhost".to_string(),
            added: vec![],
        };
        assert_eq!(update.export_line(), "export NO_PROXY=\"127.0.0.1,localhost\"");
    }

    #[test]
    fn covers_loopback_requires_every_form() {
        let env = MemoryEnv::with([("NO_PROXY", "localhost,127.0.0.1")]);
        assert!(!covers_loopback(&env));

        let env = MemoryEnv::with([("NO_PROXY", "localhost, 127.0.0.1 ,::1")]);
        assert!(covers_loopback(&env));

        assert!(!covers_loopback(&MemoryEnv::new()));
    }
}
