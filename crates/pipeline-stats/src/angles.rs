//! Defect counts by clock hour.

use std::fmt;

use serde::Serialize;

use pipeline_model::Orientation;

/// Hour mark nearest to `minutes`, rounding the half hour down. Twelve
/// o'clock is hour 0.
pub fn get_hour(minutes: i64) -> usize {
    let mut hour = minutes / 60;
    if minutes % 60 > 30 {
        hour += 1;
    }
    hour.rem_euclid(12) as usize
}

/// Hour marks touched by the clockwise span from `start` to `end`, both in
/// minutes. A negative start yields nothing; a missing or negative end
/// yields only the start hour.
pub fn at_hours(start: i64, end: Option<i64>) -> Vec<usize> {
    if start < 0 {
        return Vec::new();
    }
    let first = get_hour(start);
    let mut hours = vec![first];
    let Some(end) = end.filter(|end| *end >= 0) else {
        return hours;
    };
    let last = get_hour(end);
    let mut current = first;
    while current != last {
        current = (current + 1) % 12;
        hours.push(current);
    }
    hours
}

/// Number of defects covering each clock hour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Angles {
    pub hours: [usize; 12],
}

impl Angles {
    /// Counts a defect span; defects without a start orientation are skipped.
    pub fn add(&mut self, orient1: Option<Orientation>, orient2: Option<Orientation>) {
        let Some(start) = orient1 else {
            return;
        };
        for hour in at_hours(start.minutes(), orient2.map(Orientation::minutes)) {
            self.hours[hour] += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.hours.iter().sum()
    }
}

impl fmt::Display for Angles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours: Vec<String> = self
            .hours
            .iter()
            .enumerate()
            .map(|(hour, count)| format!("{}h: {count}", if hour == 0 { 12 } else { hour }))
            .collect();
        f.write_str(&hours.join(", "))
    }
}
