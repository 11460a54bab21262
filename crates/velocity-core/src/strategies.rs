//! Velocity estimation strategies.
//!
//! Each strategy is a pure function of the sequence of `add_movement` /
//! `clear` / `clear_pointers` calls it receives; event timestamps are the
//! only notion of time. The coordinator owns exactly one strategy, chosen at
//! construction via [`StrategyKind`].

pub mod impulse;
pub mod integrating;
pub mod least_squares;
pub mod legacy;

use serde::{Deserialize, Serialize};

use crate::config::TrackerConfig;
use crate::estimator::MotionEstimator;
use crate::pointer::{PointerIdSet, Position};

pub use impulse::ImpulseStrategy;
pub use integrating::IntegratingStrategy;
pub use least_squares::LeastSquaresStrategy;
pub use legacy::LegacyStrategy;

/// The contract every velocity estimation algorithm satisfies.
pub trait VelocityStrategy: Send {
    /// Drop all retained history for all pointers.
    fn clear(&mut self);

    /// Drop retained history for the given pointers only.
    fn clear_pointers(&mut self, ids: PointerIdSet);

    /// Record one sample. `positions` is ordered by ascending id and aligns
    /// 1:1 with `ids`. Timestamps are authoritative even when non-monotonic;
    /// an out-of-order sample must be tolerated, never crash the strategy.
    fn add_movement(&mut self, event_time_ns: u64, ids: PointerIdSet, positions: &[Position]);

    /// Fit a motion estimator for one pointer, or `None` when the strategy
    /// holds no usable data for it.
    fn estimator(&self, id: u32) -> Option<MotionEstimator>;
}

/// Sample weighting policies for the least-squares strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weighting {
    /// No weights applied. All samples are equally reliable.
    None,

    /// Weight by time delta. Samples clustered together are weighted less.
    Delta,

    /// Samples in a middle age window get full weight; very recent and very
    /// old samples are down-weighted.
    Central,

    /// Older samples are weighted less.
    Recent,
}

/// Selects the algorithm a [`crate::VelocityTracker`] uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Use the configured platform default.
    Default,

    /// Weighted least-squares polynomial regression. Degree must be 1..=4.
    LeastSquares { degree: u32, weighting: Weighting },

    /// Kinematic IIR state estimation. Degree must be 1 or 2.
    Integrating { degree: u32 },

    /// Pairwise duration-weighted velocity averaging.
    Legacy,

    /// Momentum-based displacement-over-time estimation.
    Impulse,
}

impl StrategyKind {
    /// Whether this selector names a strategy that can actually be built.
    fn is_supported(self) -> bool {
        match self {
            Self::Default => false,
            Self::LeastSquares { degree, .. } => {
                degree >= 1 && degree as usize <= MotionEstimator::MAX_DEGREE
            }
            Self::Integrating { degree } => degree == 1 || degree == 2,
            Self::Legacy | Self::Impulse => true,
        }
    }
}

/// Error returned when a strategy name cannot be parsed.
#[derive(Debug, thiserror::Error)]
#[error("unknown strategy name: {0}")]
pub struct ParseStrategyError(String);

impl std::str::FromStr for StrategyKind {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s {
            "default" => Self::Default,
            "lsq1" => Self::LeastSquares {
                degree: 1,
                weighting: Weighting::None,
            },
            "lsq2" => Self::LeastSquares {
                degree: 2,
                weighting: Weighting::None,
            },
            "lsq3" => Self::LeastSquares {
                degree: 3,
                weighting: Weighting::None,
            },
            "wlsq2-delta" => Self::LeastSquares {
                degree: 2,
                weighting: Weighting::Delta,
            },
            "wlsq2-central" => Self::LeastSquares {
                degree: 2,
                weighting: Weighting::Central,
            },
            "wlsq2-recent" => Self::LeastSquares {
                degree: 2,
                weighting: Weighting::Recent,
            },
            "int1" => Self::Integrating { degree: 1 },
            "int2" => Self::Integrating { degree: 2 },
            "legacy" => Self::Legacy,
            "impulse" => Self::Impulse,
            other => return Err(ParseStrategyError(other.to_string())),
        };
        Ok(kind)
    }
}

/// Instantiate the strategy named by `kind`, resolving the default sentinel
/// through `config`.
///
/// An unsupported selector (for example, a least-squares degree outside
/// 1..=4) falls back to the configured default with a warning; construction
/// never yields an unusable strategy.
pub(crate) fn create_strategy(
    kind: StrategyKind,
    config: &TrackerConfig,
) -> Box<dyn VelocityStrategy> {
    let resolved = match kind {
        StrategyKind::Default => config.default_strategy,
        other => other,
    };

    if let Some(strategy) = try_create(resolved) {
        return strategy;
    }
    tracing::warn!(
        requested = ?resolved,
        "unsupported velocity strategy, substituting the platform default"
    );
    try_create(config.default_strategy)
        .unwrap_or_else(|| Box::<LeastSquaresStrategy>::default())
}

fn try_create(kind: StrategyKind) -> Option<Box<dyn VelocityStrategy>> {
    if !kind.is_supported() {
        return None;
    }
    let strategy: Box<dyn VelocityStrategy> = match kind {
        StrategyKind::Default => return None,
        StrategyKind::LeastSquares { degree, weighting } => {
            Box::new(LeastSquaresStrategy::new(degree, weighting)?)
        }
        StrategyKind::Integrating { degree } => Box::new(IntegratingStrategy::new(degree)?),
        StrategyKind::Legacy => Box::new(LegacyStrategy::new()),
        StrategyKind::Impulse => Box::new(ImpulseStrategy::new()),
    };
    Some(strategy)
}
