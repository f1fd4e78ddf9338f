//! Application-level configuration loading: scoring-rule defaults, undo
//! depth, and clock cadence.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

use crate::engine::{history::DEFAULT_UNDO_DEPTH, volleyball::VolleyballRules};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "SCORELINE_BACK_CONFIG_PATH";

/// Immutable runtime configuration shared across the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Undo snapshots retained per match.
    pub undo_depth: usize,
    /// Cadence of the per-room clock ticker.
    pub clock_tick_interval: Duration,
    /// Basketball rule defaults used when seeding fresh states.
    pub basketball: BasketballConfig,
    /// Volleyball rule defaults used when seeding fresh states.
    pub volleyball_rules: VolleyballRules,
}

/// Basketball-specific rule defaults.
#[derive(Debug, Clone, Copy)]
pub struct BasketballConfig {
    /// Length of one period in seconds.
    pub period_seconds: u32,
    /// Shot-clock length in seconds.
    pub shot_clock_seconds: u32,
    /// Timeouts granted to each side.
    pub timeouts: u32,
}

impl Default for BasketballConfig {
    fn default() -> Self {
        Self {
            period_seconds: 600,
            shot_clock_seconds: 24,
            timeouts: 4,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            undo_depth: DEFAULT_UNDO_DEPTH,
            clock_tick_interval: Duration::from_secs(1),
            basketball: BasketballConfig::default(),
            volleyball_rules: VolleyballRules::default(),
        }
    }
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to the
    /// baked-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        undo_depth = config.undo_depth,
                        "loaded scoring configuration"
                    );
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }
}

/// JSON representation of the configuration file.
#[derive(Debug, Deserialize)]
struct RawConfig {
    undo_depth: Option<usize>,
    clock_tick_millis: Option<u64>,
    basketball: Option<RawBasketball>,
    volleyball: Option<RawVolleyball>,
}

#[derive(Debug, Deserialize)]
struct RawBasketball {
    period_seconds: Option<u32>,
    shot_clock_seconds: Option<u32>,
    timeouts: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawVolleyball {
    best_of: Option<u8>,
    points_per_set: Option<u32>,
    deciding_set_points: Option<u32>,
    substitutions_per_set: Option<u32>,
    timeouts_per_set: Option<u32>,
}

impl From<RawConfig> for AppConfig {
    fn from(raw: RawConfig) -> Self {
        let defaults = AppConfig::default();
        let basketball_defaults = defaults.basketball;
        let volleyball_defaults = defaults.volleyball_rules;

        let basketball = raw
            .basketball
            .map(|b| BasketballConfig {
                period_seconds: b.period_seconds.unwrap_or(basketball_defaults.period_seconds),
                shot_clock_seconds: b
                    .shot_clock_seconds
                    .unwrap_or(basketball_defaults.shot_clock_seconds),
                timeouts: b.timeouts.unwrap_or(basketball_defaults.timeouts),
            })
            .unwrap_or(basketball_defaults);

        let volleyball_rules = raw
            .volleyball
            .map(|v| VolleyballRules {
                best_of: v.best_of.unwrap_or(volleyball_defaults.best_of),
                points_per_set: v.points_per_set.unwrap_or(volleyball_defaults.points_per_set),
                deciding_set_points: v
                    .deciding_set_points
                    .unwrap_or(volleyball_defaults.deciding_set_points),
                substitutions_per_set: v
                    .substitutions_per_set
                    .unwrap_or(volleyball_defaults.substitutions_per_set),
                timeouts_per_set: v
                    .timeouts_per_set
                    .unwrap_or(volleyball_defaults.timeouts_per_set),
            })
            .unwrap_or(volleyball_defaults);

        Self {
            undo_depth: raw.undo_depth.unwrap_or(defaults.undo_depth),
            clock_tick_interval: raw
                .clock_tick_millis
                .map(Duration::from_millis)
                .unwrap_or(defaults.clock_tick_interval),
            basketball,
            volleyball_rules,
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_config_fills_missing_fields_with_defaults() {
        let raw: RawConfig =
            serde_json::from_str(r#"{"undo_depth": 10, "volleyball": {"best_of": 3}}"#).unwrap();
        let config: AppConfig = raw.into();

        assert_eq!(config.undo_depth, 10);
        assert_eq!(config.volleyball_rules.best_of, 3);
        assert_eq!(config.volleyball_rules.points_per_set, 25);
        assert_eq!(config.basketball.shot_clock_seconds, 24);
        assert_eq!(config.clock_tick_interval, Duration::from_secs(1));
    }
}
