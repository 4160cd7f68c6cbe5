//! CSV export for the energy series and toggle events.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::event::ToggleEvent;
use crate::sim::run::SimulationRun;
use crate::sim::types::TIME_FORMAT;

/// Column header for the per-minute series export.
pub const SERIES_HEADER: &str = "minute,weekday,time,energy_wh,percent,on,day_charging,limited";

/// Column header for the toggle event export.
pub const EVENTS_HEADER: &str = "minute,weekday,time,on,day_charging,limited";

/// Exports the per-minute energy series to a CSV file at the given path.
///
/// # Errors
///
/// Returns an error if file creation or writing fails.
pub fn export_series(run: &SimulationRun, path: &Path) -> Result<(), csv::Error> {
    let file = File::create(path)?;
    write_series(run, io::BufWriter::new(file))
}

/// Writes one row per simulated minute to any writer.
///
/// Status columns come from the toggle segment each minute falls in.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_series(run: &SimulationRun, writer: impl Write) -> Result<(), csv::Error> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(SERIES_HEADER.split(','))?;

    for row in run.rows(0, usize::MAX) {
        wtr.write_record(&[
            row.minute.to_string(),
            row.weekday.to_string(),
            row.time.format(TIME_FORMAT).to_string(),
            format!("{:.4}", row.energy_wh),
            row.percent.to_string(),
            row.on.to_string(),
            row.day_charging.to_string(),
            row.limited.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports the toggle events to a CSV file at the given path.
///
/// # Errors
///
/// Returns an error if file creation or writing fails.
pub fn export_events(run: &SimulationRun, path: &Path) -> Result<(), csv::Error> {
    let file = File::create(path)?;
    write_events(run, io::BufWriter::new(file))
}

/// Writes every toggle event, including the opening and closing markers.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_events(run: &SimulationRun, writer: impl Write) -> Result<(), csv::Error> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(EVENTS_HEADER.split(','))?;

    for event in &run.toggles {
        wtr.write_record(&event_record(run, event))?;
    }

    wtr.flush()?;
    Ok(())
}

fn event_record(run: &SimulationRun, event: &ToggleEvent) -> [String; 6] {
    let time = run.event_time(event);
    [
        event.minute.to_string(),
        time.weekday().to_string(),
        time.time.format(TIME_FORMAT).to_string(),
        event.on.to_string(),
        event.day_charging.to_string(),
        event.limited.to_string(),
    ]
}
