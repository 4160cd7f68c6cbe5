//! Simulated wall clock advancing one minute per tick.

use std::fmt;

use chrono::{NaiveTime, TimeDelta, Timelike, Weekday};

use super::types::{EVENING_HOUR, MINUTES_PER_DAY, START_HOUR, TIME_FORMAT, time_at_minute};

/// Weekday of an absolute day index, where day 0 is a Sunday.
pub fn weekday_of(day: u32) -> Weekday {
    (0..day % 7).fold(Weekday::Sun, |weekday, _| weekday.succ())
}

/// One simulated minute: absolute day, wall-clock time, and its run index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimTime {
    /// Absolute day index; day 0 is a Sunday.
    pub day: u32,
    /// Wall-clock time within the day.
    pub time: NaiveTime,
    /// 1-based count of minutes simulated so far, including this one.
    pub index: usize,
}

impl SimTime {
    /// Time of the minute `offset` minutes after 12:00 on `start_day`.
    ///
    /// # Examples
    ///
    /// ```
    /// use power_sim::sim::clock::SimTime;
    ///
    /// let t = SimTime::at_offset(3, 12 * 60 + 5);
    /// assert_eq!(t.to_string(), "Thu 00:05");
    /// assert_eq!(t.index, 12 * 60 + 6);
    /// ```
    pub fn at_offset(start_day: u32, offset: usize) -> Self {
        let absolute = (start_day * MINUTES_PER_DAY + START_HOUR * 60) as usize + offset;
        let per_day = MINUTES_PER_DAY as usize;
        Self {
            day: (absolute / per_day) as u32,
            time: time_at_minute((absolute % per_day) as u32),
            index: offset + 1,
        }
    }

    pub fn weekday(&self) -> Weekday {
        weekday_of(self.day)
    }

    pub fn hour(&self) -> u32 {
        self.time.hour()
    }

    pub fn minute(&self) -> u32 {
        self.time.minute()
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.weekday(), self.time.format(TIME_FORMAT))
    }
}

/// A simulation clock running from 12:00 on the start day through 18:00 on
/// the end day, one minute per step.
///
/// # Examples
///
/// ```
/// use power_sim::sim::clock::Clock;
///
/// let mut clock = Clock::new(3, 4);
/// let first = clock.tick().unwrap();
/// assert_eq!(first.to_string(), "Wed 12:00");
/// assert_eq!(first.index, 1);
/// ```
#[derive(Debug, Clone)]
pub struct Clock {
    /// Last minute handed out; starts one minute before 12:00.
    day: u32,
    time: NaiveTime,
    /// Minutes handed out so far.
    elapsed: usize,
    /// Day on which the clock stops at 18:00.
    end_day: u32,
}

impl Clock {
    /// Creates a clock starting at 12:00 on `start_day` and stopping after
    /// 18:00 on `end_day`.
    pub fn new(start_day: u32, end_day: u32) -> Self {
        Self {
            day: start_day,
            time: time_at_minute(START_HOUR * 60 - 1),
            elapsed: 0,
            end_day,
        }
    }

    /// Returns `true` once the 18:00 minute of the end day has been handed out.
    pub fn is_finished(&self) -> bool {
        self.day >= self.end_day && self.time.hour() >= EVENING_HOUR
    }

    /// Advances the clock by one minute.
    ///
    /// # Returns
    ///
    /// * `Some(time)` - The minute just entered
    /// * `None` - If the clock has already passed its last minute
    pub fn tick(&mut self) -> Option<SimTime> {
        if self.is_finished() {
            return None;
        }
        let (time, wrapped_secs) = self.time.overflowing_add_signed(TimeDelta::minutes(1));
        self.time = time;
        if wrapped_secs != 0 {
            self.day += 1;
        }
        self.elapsed += 1;
        Some(self.now())
    }

    /// The most recent minute handed out (or 11:59 before the first tick).
    pub fn now(&self) -> SimTime {
        SimTime {
            day: self.day,
            time: self.time,
            index: self.elapsed,
        }
    }

    /// Runs a function for each remaining minute.
    pub fn run(&mut self, mut f: impl FnMut(SimTime)) {
        while let Some(time) = self.tick() {
            f(time);
        }
    }
}
