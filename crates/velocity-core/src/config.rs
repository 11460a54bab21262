//! Tracker configuration.

use serde::{Deserialize, Serialize};
use velotrace_common::config::TrackerDefaults;

use crate::strategies::{StrategyKind, Weighting};

/// Per-tracker configuration.
///
/// Centralizes the mapping from [`StrategyKind::Default`] to a concrete
/// strategy. The default is tuned for perceived responsiveness and should
/// only be changed deliberately; tests override it to pin behavior down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// The strategy [`StrategyKind::Default`] resolves to.
    pub default_strategy: StrategyKind,

    /// Gap after which all pointers are assumed to have stopped moving.
    /// A movement arriving at least this long after the previous one resets
    /// strategy state before being recorded.
    pub assume_stopped_ns: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            default_strategy: StrategyKind::LeastSquares {
                degree: 2,
                weighting: Weighting::None,
            },
            assume_stopped_ns: 40_000_000,
        }
    }
}

impl TrackerConfig {
    /// Build a tracker config from application-level defaults, keeping the
    /// built-in values for anything that fails to parse.
    pub fn from_defaults(defaults: &TrackerDefaults) -> Self {
        let mut config = Self::default();
        match defaults.default_strategy.parse::<StrategyKind>() {
            Ok(StrategyKind::Default) => {
                tracing::warn!("default strategy may not be the 'default' sentinel, ignoring");
            }
            Ok(kind) => config.default_strategy = kind,
            Err(e) => {
                tracing::warn!(error = %e, "unrecognized default strategy name, keeping lsq2");
            }
        }
        config.assume_stopped_ns = defaults.assume_stopped_ms.saturating_mul(1_000_000);
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_defaults_parses_strategy_names() {
        let defaults = TrackerDefaults {
            default_strategy: "impulse".to_string(),
            assume_stopped_ms: 50,
        };
        let config = TrackerConfig::from_defaults(&defaults);
        assert_eq!(config.default_strategy, StrategyKind::Impulse);
        assert_eq!(config.assume_stopped_ns, 50_000_000);
    }

    #[test]
    fn test_from_defaults_keeps_builtin_on_bad_name() {
        let defaults = TrackerDefaults {
            default_strategy: "does-not-exist".to_string(),
            assume_stopped_ms: 40,
        };
        let config = TrackerConfig::from_defaults(&defaults);
        assert_eq!(
            config.default_strategy,
            TrackerConfig::default().default_strategy
        );
    }
}
