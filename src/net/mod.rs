pub mod error;
pub mod frame;
pub mod wire;

/// Port a worker binds when none is configured.
pub const DEFAULT_WORKER_PORT: u16 = 5000;
