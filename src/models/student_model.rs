//! Models for registered students and their weekly availability.
use std::collections::BTreeMap;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Weekday keys in display order. Every availability map holds all seven.
pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// One weekday's window. Unavailable days carry a zeroed time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct DayWindow {
    pub available: bool,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl DayWindow {
    pub fn closed() -> Self {
        DayWindow {
            available: false,
            start: NaiveTime::MIN,
            end: NaiveTime::MIN,
        }
    }
}

/// Per-weekday availability. Invariant: all seven weekday keys are present,
/// the parser in [`crate::availability`] rejects replies that miss one.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Availability(pub BTreeMap<String, DayWindow>);

impl Availability {
    pub fn window(&self, day: &str) -> Option<&DayWindow> {
        self.0.get(day)
    }

    /// Iterate windows in Monday..Sunday order rather than map order.
    pub fn days(&self) -> impl Iterator<Item = (&'static str, &DayWindow)> + '_ {
        WEEKDAYS
            .iter()
            .filter_map(move |day| self.0.get(*day).map(|window| (*day, window)))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Student {
    pub name: String,
    pub age: u32,
    pub subjects: Vec<String>,
    pub availability: Availability,
}
