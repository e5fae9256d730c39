use std::collections::BTreeSet;
use std::time::Duration;

/// Login material for the appliances, passed through to the session
/// layer per invocation and never persisted.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// How the fan-out executor schedules per-device work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecMode {
    /// One device at a time, in hostname order.
    Sequential,
    /// One task per device behind a worker pool; `workers` caps the pool,
    /// defaulting to the device count.
    Parallel { workers: Option<usize> },
}

/// Per-invocation fleet parameters, built once by the CLI and read-only
/// everywhere below it.
#[derive(Debug, Clone)]
pub struct FleetConfig {
    /// How long the discovery listener stays open.
    pub timeout: Duration,
    pub mode: ExecMode,
    /// Ordinal filter; `None` selects every discovered device.
    pub selected: Option<BTreeSet<u32>>,
    /// Suppresses headers and the discovery spinner.
    pub quiet: bool,
}
