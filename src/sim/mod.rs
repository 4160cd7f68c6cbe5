/// Simulated wall clock, one minute per tick.
pub mod clock;
pub mod engine;
/// Toggle events, annotations, and the append-only recorder.
pub mod event;
pub mod run;
/// Per-minute battery state machine.
pub mod state;
pub mod status;
pub mod summary;
/// Gaussian sunlight curve.
pub mod sunlight;
pub mod types;
