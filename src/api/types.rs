//! API response and query types.

use serde::{Deserialize, Serialize};

use crate::sim::summary::RunSummary;
use crate::sim::types::SimulationConfig;

/// Configuration the run used, plus its summary.
#[derive(Debug, Serialize)]
pub struct SummaryResponse<'a> {
    pub config: &'a SimulationConfig,
    pub summary: &'a RunSummary,
    pub total_minutes: usize,
    /// Share of minutes the load was on, 0.0 to 1.0.
    pub uptime: f64,
}

/// Optional range query parameters for the series endpoint.
#[derive(Debug, Deserialize)]
pub struct SeriesQuery {
    /// First series index (inclusive).
    pub from: Option<usize>,
    /// Last series index (inclusive).
    pub to: Option<usize>,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
