//! Session configuration (environment-driven).

use std::time::Duration;

use campus_auth::{RouteConfig, local_path};

pub const ENV_SIGN_IN_PATH: &str = "CAMPUS_SIGN_IN_PATH";
pub const ENV_DEFAULT_AREA: &str = "CAMPUS_DEFAULT_AREA";
pub const ENV_PROFILE_FETCH_TIMEOUT_MS: &str = "CAMPUS_PROFILE_FETCH_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionConfig {
    /// Redirect targets used by the access gate.
    pub routes: RouteConfig,

    /// Upper bound on a single profile lookup.
    ///
    /// `None` waits indefinitely: a lookup that never answers keeps the
    /// session loading.
    pub profile_fetch_timeout: Option<Duration>,
}

impl SessionConfig {
    /// Read configuration from the process environment.
    ///
    /// Unset variables fall back to defaults; unparsable values are logged and
    /// ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_SIGN_IN_PATH) {
            match local_path(&path) {
                Some(path) => config.routes.sign_in_path = path.to_string(),
                None => tracing::warn!(
                    value = %path,
                    "{ENV_SIGN_IN_PATH} must be an absolute path; using default"
                ),
            }
        }

        if let Some(path) = lookup(ENV_DEFAULT_AREA) {
            match local_path(&path) {
                Some(path) => config.routes.default_area = path.to_string(),
                None => tracing::warn!(
                    value = %path,
                    "{ENV_DEFAULT_AREA} must be an absolute path; using default"
                ),
            }
        }

        if let Some(raw) = lookup(ENV_PROFILE_FETCH_TIMEOUT_MS) {
            match raw.trim().parse::<u64>() {
                Ok(0) => config.profile_fetch_timeout = None,
                Ok(ms) => config.profile_fetch_timeout = Some(Duration::from_millis(ms)),
                Err(e) => tracing::warn!(
                    value = %raw,
                    error = %e,
                    "{ENV_PROFILE_FETCH_TIMEOUT_MS} is not a number of milliseconds; ignoring"
                ),
            }
        }

        config
    }

    pub fn with_profile_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.profile_fetch_timeout = Some(timeout);
        self
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = SessionConfig::from_lookup(lookup(&[]));
        assert_eq!(config, SessionConfig::default());
        assert_eq!(config.routes.sign_in_path, "/login");
        assert_eq!(config.routes.default_area, "/dashboard");
        assert_eq!(config.profile_fetch_timeout, None);
    }

    #[test]
    fn reads_overrides() {
        let config = SessionConfig::from_lookup(lookup(&[
            (ENV_SIGN_IN_PATH, "/signin"),
            (ENV_DEFAULT_AREA, " /home "),
            (ENV_PROFILE_FETCH_TIMEOUT_MS, "2500"),
        ]));
        assert_eq!(config.routes.sign_in_path, "/signin");
        assert_eq!(config.routes.default_area, "/home");
        assert_eq!(config.profile_fetch_timeout, Some(Duration::from_millis(2500)));
    }

    #[test]
    fn ignores_invalid_values() {
        let config = SessionConfig::from_lookup(lookup(&[
            (ENV_SIGN_IN_PATH, "https://evil.example/login"),
            (ENV_DEFAULT_AREA, "//evil.example"),
            (ENV_PROFILE_FETCH_TIMEOUT_MS, "soon"),
        ]));
        assert_eq!(config, SessionConfig::default());

        let config = SessionConfig::from_lookup(lookup(&[
            (ENV_SIGN_IN_PATH, "login"),
            (ENV_DEFAULT_AREA, "/\\evil.example"),
        ]));
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn zero_timeout_disables_it() {
        let config = SessionConfig::from_lookup(lookup(&[(ENV_PROFILE_FETCH_TIMEOUT_MS, "0")]));
        assert_eq!(config.profile_fetch_timeout, None);
    }
}
