//! Tracing / logging initialisation helpers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the global level or a full filter directive.
pub const LOG_ENV: &str = "CHAINCALL_LOG";
/// Set to `1` or `true` for JSON output.
pub const LOG_JSON_ENV: &str = "CHAINCALL_LOG_JSON";

/// Log level per component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Global default level: "trace" | "debug" | "info" | "warn" | "error"
    #[serde(default = "default_level")]
    pub level: String,
    /// Override per component: crate name → level
    #[serde(default)]
    pub components: BTreeMap<String, String>,
    /// Emit JSON structured logs (true) or human-readable text (false)
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "warn".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            components: BTreeMap::new(),
            json: false,
        }
    }
}

impl LogConfig {
    /// Read `CHAINCALL_LOG` and `CHAINCALL_LOG_JSON`, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var(LOG_ENV).ok().as_deref(),
            std::env::var(LOG_JSON_ENV).ok().as_deref(),
        )
    }

    fn from_vars(level: Option<&str>, json: Option<&str>) -> Self {
        let mut config = Self::default();
        if let Some(level) = level.map(str::trim).filter(|l| !l.is_empty()) {
            config.level = level.to_string();
        }
        config.json = matches!(json.map(str::trim), Some("1") | Some("true"));
        config
    }

    pub fn with_component(mut self, component: &str, level: &str) -> Self {
        self.components.insert(component.to_string(), level.to_string());
        self
    }

    /// The filter directive string: `"info,chaincall_exec=debug"`.
    pub fn directives(&self) -> String {
        let mut directives = self.level.clone();
        for (component, level) in &self.components {
            directives.push_str(&format!(",{}={}", component.replace('-', "_"), level));
        }
        directives
    }
}

/// Initialise tracing with the given log config. Logs go to stderr.
///
/// Should be called once at application startup; later calls are ignored.
pub fn init_tracing(config: &LogConfig) {
    let filter = EnvFilter::try_new(config.directives()).unwrap_or_else(|_| EnvFilter::new("warn"));

    // try_init fails only if a global subscriber is already set
    let _ = if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_include_component_overrides() {
        let config = LogConfig {
            level: "info".into(),
            ..Default::default()
        }
        .with_component("chaincall-exec", "debug");
        assert_eq!(config.directives(), "info,chaincall_exec=debug");
    }

    #[test]
    fn env_values_override_defaults() {
        let config = LogConfig::from_vars(Some("debug"), Some("1"));
        assert_eq!(config.level, "debug");
        assert!(config.json);

        let config = LogConfig::from_vars(Some("  "), None);
        assert_eq!(config, LogConfig::default());
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: LogConfig = serde_json::from_str(r#"{"json": true}"#).unwrap();
        assert_eq!(config.level, "warn");
        assert!(config.json);
    }

    #[test]
    fn init_twice_does_not_panic() {
        init_tracing(&LogConfig::default());
        init_tracing(&LogConfig::default());
    }
}
