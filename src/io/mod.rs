/// CSV export of the energy series and toggle events.
pub mod export;
