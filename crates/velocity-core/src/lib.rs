//! Velotrace Core
//!
//! Estimates the instantaneous velocity and short-horizon motion trajectory
//! of one or more simultaneously tracked touch/pointer contacts from a
//! stream of timestamped position samples.
//!
//! The entry point is [`VelocityTracker`]: feed it position updates with
//! [`VelocityTracker::add_movement`] and query a velocity or a full
//! polynomial motion estimate per pointer at any time. The fitting algorithm
//! is chosen once at construction via [`StrategyKind`]:
//!
//! - **Least-squares** — weighted polynomial regression, degree 1–4, with
//!   optional sample weighting. The default (degree 2, unweighted).
//! - **Integrating** — per-pointer kinematic IIR state estimator.
//! - **Legacy** — pairwise duration-weighted velocity averaging.
//! - **Impulse** — displacement-over-elapsed-time momentum estimator.
//!
//! All operations are synchronous, CPU-bound arithmetic over fixed-size
//! buffers; a tracker instance is not internally synchronized and should be
//! confined to one input-processing thread.

pub mod config;
pub mod estimator;
pub mod event;
mod fit;
mod history;
pub mod pointer;
pub mod strategies;
pub mod tracker;

pub use config::TrackerConfig;
pub use estimator::{MotionEstimator, Velocity};
pub use event::{PointerEvent, PointerSample};
pub use pointer::{PointerIdSet, Position, MAX_POINTER_ID};
pub use strategies::{StrategyKind, VelocityStrategy, Weighting};
pub use tracker::VelocityTracker;
