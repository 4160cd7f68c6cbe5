//! Minute-by-minute solar and battery power budget simulator.

#[cfg(feature = "api")]
pub mod api;
pub mod cli;
pub mod config;
pub mod io;
pub mod reporting;
/// Clock, battery state machine, event recording, and run summary.
pub mod sim;
#[cfg(feature = "tui")]
pub mod tui;
