//! Toggle events and chart annotations recorded during a run.

use serde::Serialize;

use super::clock::SimTime;
use super::state::BatteryState;
use super::types::TIME_FORMAT;

/// Minimum simulated minutes between two recorded annotations.
pub const ANNOTATION_SPACING_MINUTES: usize = 10;

/// Label offset (pixels) placing an annotation to the right of its point.
pub const OFFSET_RIGHT: (i32, i32) = (10, 0);

/// Label offset (pixels) placing an annotation to the left of its point.
pub const OFFSET_LEFT: (i32, i32) = (-50, 0);

/// A change in on/off or limited status at a given minute.
///
/// The status holds from `minute` until the next event; the series value at
/// index `minute` is the first one drawn in this state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToggleEvent {
    /// Minute index the status took effect.
    pub minute: usize,
    /// Load powered.
    pub on: bool,
    /// Held off for the scheduled day charge.
    pub day_charging: bool,
    /// Solar input capped.
    pub limited: bool,
}

impl ToggleEvent {
    /// Event describing `state` at `minute`.
    pub fn from_state(minute: usize, state: &BatteryState) -> Self {
        Self {
            minute,
            on: state.on,
            day_charging: state.day_charging,
            limited: state.limited,
        }
    }

    /// Display category of the segment this event opens.
    pub fn kind(&self) -> SegmentKind {
        SegmentKind::from_flags(self.on, self.day_charging, self.limited)
    }
}

/// Status category used to colour a stretch of the energy series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    /// Load on, solar uncapped.
    On,
    /// Load on, solar capped.
    OnLimited,
    /// Load off after hitting the off threshold.
    Off,
    /// Load off, solar capped.
    OffLimited,
    /// Load held off for the day charge.
    DayCharging,
}

impl SegmentKind {
    /// All kinds, in legend order.
    pub const ALL: [Self; 5] = [
        Self::On,
        Self::OnLimited,
        Self::Off,
        Self::OffLimited,
        Self::DayCharging,
    ];

    /// Classifies a combination of status flags.
    pub fn from_flags(on: bool, day_charging: bool, limited: bool) -> Self {
        match (on, day_charging, limited) {
            (_, true, _) => Self::DayCharging,
            (true, false, false) => Self::On,
            (true, false, true) => Self::OnLimited,
            (false, false, false) => Self::Off,
            (false, false, true) => Self::OffLimited,
        }
    }

    /// Short human-readable name.
    pub fn label(self) -> &'static str {
        match self {
            Self::On => "on",
            Self::OnLimited => "on, limited",
            Self::Off => "off",
            Self::OffLimited => "off, limited",
            Self::DayCharging => "day charging",
        }
    }
}

/// A labelled point on the energy chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    /// Wall-clock label, `HH:MM`.
    pub label: String,
    /// Minute index of the point.
    pub minute: usize,
    /// Energy at the point (Wh).
    pub energy_wh: f64,
    /// Label offset from the point in pixels.
    pub offset: (i32, i32),
}

impl Annotation {
    /// Annotation for the energy in `state` at `now`.
    pub fn at(now: &SimTime, state: &BatteryState, offset: (i32, i32)) -> Self {
        Self {
            label: now.time.format(TIME_FORMAT).to_string(),
            minute: now.index,
            energy_wh: state.energy_wh,
            offset,
        }
    }
}

/// Append-only log of toggle events and rate-limited annotations.
#[derive(Debug, Clone)]
pub struct Recorder {
    toggles: Vec<ToggleEvent>,
    annotations: Vec<Annotation>,
}

impl Recorder {
    /// Starts a log with the opening event describing the initial state.
    pub fn new(opening: ToggleEvent) -> Self {
        Self {
            toggles: vec![opening],
            annotations: Vec::new(),
        }
    }

    /// Appends a toggle event.
    pub fn record_toggle(&mut self, event: ToggleEvent) {
        debug_assert!(
            self.toggles.last().is_none_or(|last| last.minute < event.minute),
            "toggle events must be strictly ordered"
        );
        self.toggles.push(event);
    }

    /// Appends `annotation` unless the previous one is fewer than
    /// [`ANNOTATION_SPACING_MINUTES`] minutes earlier.
    ///
    /// Returns `true` when the annotation was recorded.
    pub fn annotate(&mut self, annotation: Annotation) -> bool {
        let crowded = self
            .annotations
            .last()
            .is_some_and(|last| annotation.minute - last.minute < ANNOTATION_SPACING_MINUTES);
        if crowded {
            return false;
        }
        self.annotations.push(annotation);
        true
    }

    /// Recorded toggle events so far.
    pub fn toggles(&self) -> &[ToggleEvent] {
        &self.toggles
    }

    /// Recorded annotations so far.
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Appends the closing event and returns both logs.
    ///
    /// The closing event may share its minute with the last transition when
    /// the final minute itself toggled.
    pub fn close(mut self, closing: ToggleEvent) -> (Vec<ToggleEvent>, Vec<Annotation>) {
        self.toggles.push(closing);
        (self.toggles, self.annotations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(minute: usize, on: bool) -> ToggleEvent {
        ToggleEvent {
            minute,
            on,
            day_charging: false,
            limited: false,
        }
    }

    fn note(minute: usize) -> Annotation {
        Annotation {
            label: "12:00".to_string(),
            minute,
            energy_wh: 100.0,
            offset: OFFSET_RIGHT,
        }
    }

    #[test]
    fn annotations_are_rate_limited() {
        let mut recorder = Recorder::new(event(0, true));
        assert!(recorder.annotate(note(5)));
        assert!(!recorder.annotate(note(14)));
        assert!(recorder.annotate(note(15)));
        assert!(!recorder.annotate(note(15)));
        let minutes: Vec<usize> = recorder.annotations().iter().map(|a| a.minute).collect();
        assert_eq!(minutes, vec![5, 15]);
    }

    #[test]
    fn close_appends_final_event() {
        let mut recorder = Recorder::new(event(0, true));
        recorder.record_toggle(event(40, false));
        let (toggles, annotations) = recorder.close(event(100, false));
        assert_eq!(toggles.len(), 3);
        assert_eq!(toggles[2].minute, 100);
        assert!(annotations.is_empty());
    }

    #[test]
    fn day_charging_wins_over_other_flags() {
        assert_eq!(SegmentKind::from_flags(false, true, true), SegmentKind::DayCharging);
        assert_eq!(SegmentKind::from_flags(true, false, true), SegmentKind::OnLimited);
        assert_eq!(SegmentKind::from_flags(false, false, false), SegmentKind::Off);
    }
}
