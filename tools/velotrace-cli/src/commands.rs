//! CLI subcommand implementations.

pub mod replay;
pub mod synth;

/// Strategy names accepted by `--strategy`, in the order they are listed.
pub const STRATEGY_NAMES: &[&str] = &[
    "default",
    "lsq1",
    "lsq2",
    "lsq3",
    "wlsq2-delta",
    "wlsq2-central",
    "wlsq2-recent",
    "int1",
    "int2",
    "legacy",
    "impulse",
];
