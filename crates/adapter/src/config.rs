//! Console front-end configuration from environment variables
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `SQUAD_RCON_INPUT` | file of console/log lines to classify | stdin |
//! | `SQUAD_RCON_LOG_RULES` | `1`/`true` to also dispatch log rules | off |
//! | `SQUAD_RCON_LOG_LEVEL` | tracing filter when `RUST_LOG` is unset | `info` |
//! | `SQUAD_RCON_CHANNEL_CAPACITY` | line and event channel bound | `256` |
//!
//! Unparsable values fall back to the default.

use std::path::PathBuf;

pub const INPUT_VAR: &str = "SQUAD_RCON_INPUT";
pub const LOG_RULES_VAR: &str = "SQUAD_RCON_LOG_RULES";
pub const LOG_LEVEL_VAR: &str = "SQUAD_RCON_LOG_LEVEL";
pub const CHANNEL_CAPACITY_VAR: &str = "SQUAD_RCON_CHANNEL_CAPACITY";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// `None` reads stdin.
    pub input: Option<PathBuf>,
    pub log_rules: bool,
    pub log_level: String,
    pub channel_capacity: usize,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            input: None,
            log_rules: false,
            log_level: "info".to_string(),
            channel_capacity: 256,
        }
    }
}

impl ConsoleConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let value = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let input = value(INPUT_VAR).map(PathBuf::from);

        let log_rules = value(LOG_RULES_VAR)
            .map(|s| s == "1" || s.eq_ignore_ascii_case("true"))
            .unwrap_or(defaults.log_rules);

        let log_level = value(LOG_LEVEL_VAR).unwrap_or(defaults.log_level);

        let channel_capacity = value(CHANNEL_CAPACITY_VAR)
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(defaults.channel_capacity);

        Self {
            input,
            log_rules,
            log_level,
            channel_capacity,
        }
    }
}
