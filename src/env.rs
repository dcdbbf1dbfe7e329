use std::collections::HashMap;
use std::env;
use std::fmt;

/// Read/write access to environment variables.
///
/// Production code goes through [`ProcessEnv`]; tests inject a [`MemoryEnv`].
pub trait EnvStore {
    fn var(&self, key: &str) -> Option<String>;

    fn set_var(&mut self, key: &str, value: &str);

    /// Present with a non-blank value.
    fn is_configured(&self, key: &str) -> bool {
        self.var(key).is_some_and(|value| !value.trim().is_empty())
    }
}

/// The real process environment.
///
/// Non-UTF-8 values are still present; their bytes are read lossily.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvStore for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        env::var_os(key).map(|value| value.to_string_lossy().into_owned())
    }

    fn set_var(&mut self, key: &str, value: &str) {
        env::set_var(key, value);
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct MemoryEnv {
    vars: HashMap<String, String>,
}

impl MemoryEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    pub fn remove_var(&mut self, key: &str) {
        self.vars.remove(key);
    }
}

impl EnvStore for MemoryEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    fn set_var(&mut self, key: &str, value: &str) {
        self.vars.insert(key.to_string(), value.to_string());
    }
}

/// Proxy variables consulted by HTTP stacks, in both case variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyVar {
    HttpUpper,
    HttpLower,
    HttpsUpper,
    HttpsLower,
    AllUpper,
    AllLower,
}

impl ProxyVar {
    pub const ALL: [ProxyVar; 6] = [
        ProxyVar::HttpUpper,
        ProxyVar::HttpLower,
        ProxyVar::HttpsUpper,
        ProxyVar::HttpsLower,
        ProxyVar::AllUpper,
        ProxyVar::AllLower,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ProxyVar::HttpUpper => "HTTP_PROXY",
            ProxyVar::HttpLower => "http_proxy",
            ProxyVar::HttpsUpper => "HTTPS_PROXY",
            ProxyVar::HttpsLower => "https_proxy",
            ProxyVar::AllUpper => "ALL_PROXY",
            ProxyVar::AllLower => "all_proxy",
        }
    }
}

impl fmt::Display for ProxyVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum NoProxyVar {
    #[serde(rename = "NO_PROXY")]
    Upper,
    #[serde(rename = "no_proxy")]
    Lower,
}

impl NoProxyVar {
    /// Lookup order when both variants exist.
    pub const ALL: [NoProxyVar; 2] = [NoProxyVar::Upper, NoProxyVar::Lower];

    pub fn name(self) -> &'static str {
        match self {
            NoProxyVar::Upper => "NO_PROXY",
            NoProxyVar::Lower => "no_proxy",
        }
    }
}

impl fmt::Display for NoProxyVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Proxy variables that are currently set to a non-blank value.
pub fn configured_proxy_vars(env: &impl EnvStore) -> Vec<ProxyVar> {
    ProxyVar::ALL
        .into_iter()
        .filter(|var| env.is_configured(var.name()))
        .collect()
}

pub fn has_proxy_configured(env: &impl EnvStore) -> bool {
    ProxyVar::ALL
        .iter()
        .any(|var| env.is_configured(var.name()))
}

/// The no-proxy variant that is already present, if any.
pub fn existing_no_proxy_var(env: &impl EnvStore) -> Option<NoProxyVar> {
    NoProxyVar::ALL
        .into_iter()
        .find(|var| env.var(var.name()).is_some())
}
