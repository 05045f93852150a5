// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod agenda;
pub mod app;
pub mod config;
pub mod runtime;
pub mod timer;
pub mod ui;
pub mod util;

/// One logical tick per second of wall time, uncompensated for drift.
pub const TICK_RATE_MS: u64 = 1000;
