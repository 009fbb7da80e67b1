//! Angular position around the pipe circumference.
//!
//! Positions are read as a clock face looking along the survey direction:
//! `12,00` is the top of the pipe, `6,00` the bottom. Internally an
//! orientation is a count of minutes in `0..720`.

use std::fmt;
use std::str::FromStr;

use crate::error::{ModelError, Result};

/// Minutes in one full turn of the clock face.
pub const CIRCLE_MINUTES: i64 = 720;

/// Clock-face orientation with minute resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Orientation {
    minutes: i64,
}

impl Orientation {
    /// Builds an orientation from clock hours (`0..=12`) and minutes (`0..=59`).
    pub fn new(hours: i64, minutes: i64) -> Result<Self> {
        if !(0..=12).contains(&hours) {
            return Err(ModelError::HoursOutOfRange { hours });
        }
        if !(0..60).contains(&minutes) {
            return Err(ModelError::MinutesOutOfRange { minutes });
        }
        Ok(Self::from_minutes(hours * 60 + minutes))
    }

    /// Wraps any minute count onto the circle.
    pub fn from_minutes(minutes: i64) -> Self {
        Self {
            minutes: minutes.rem_euclid(CIRCLE_MINUTES),
        }
    }

    /// One degree of arc is two clock minutes.
    pub fn from_degrees(degrees: f64) -> Self {
        Self::from_minutes((degrees * 2.0).round() as i64)
    }

    /// Fractional hours, e.g. `1.5` is `1,30`.
    pub fn from_hour_float(hours: f64) -> Self {
        Self::from_minutes((hours * 60.0).round() as i64)
    }

    /// Parses a table cell; an empty cell is no orientation.
    pub fn from_cell(text: &str) -> Result<Option<Self>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        text.parse().map(Some)
    }

    pub fn minutes(self) -> i64 {
        self.minutes
    }

    /// Whole hours in `0..12`.
    pub fn hours(self) -> i64 {
        self.minutes / 60
    }

    /// Clockwise and counterclockwise arc lengths from `self` to `other`.
    ///
    /// The two always add up to a full circle, so identical positions give
    /// `(0, 720)`.
    pub fn distance_to(self, other: Self) -> (i64, i64) {
        let clockwise = (other.minutes - self.minutes).rem_euclid(CIRCLE_MINUTES);
        (clockwise, CIRCLE_MINUTES - clockwise)
    }

    /// Shorter of the two arcs between `self` and `other`.
    pub fn min_distance(self, other: Self) -> i64 {
        let (clockwise, counterclockwise) = self.distance_to(other);
        clockwise.min(counterclockwise)
    }

    /// True if `self` lies on the clockwise arc from `start` to `end`.
    pub fn is_inside(self, start: Self, end: Self) -> bool {
        let (arc, _) = start.distance_to(end);
        let (to_end, _) = self.distance_to(end);
        to_end <= arc
    }

    /// Rotates clockwise by `minutes` (negative rotates back) and returns the
    /// new minute count.
    pub fn add_minutes(&mut self, minutes: i64) -> i64 {
        self.minutes = (self.minutes + minutes.rem_euclid(CIRCLE_MINUTES)) % CIRCLE_MINUTES;
        self.minutes
    }

    /// Diametrically opposite position.
    #[must_use]
    pub fn opposite(self) -> Self {
        Self::from_minutes(self.minutes + CIRCLE_MINUTES / 2)
    }

    /// Position seen from the other end of the pipe.
    #[must_use]
    pub fn mirrored(self) -> Self {
        Self::from_minutes(CIRCLE_MINUTES - self.minutes)
    }

    /// Point halfway along the clockwise arc from `start` to `end`.
    pub fn midpoint(start: Self, end: Self) -> Self {
        let (arc, _) = start.distance_to(end);
        Self::from_minutes(start.minutes + arc / 2)
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = match self.hours() {
            0 => 12,
            hours => hours,
        };
        write!(f, "{hours},{:02}", self.minutes % 60)
    }
}

impl FromStr for Orientation {
    type Err = ModelError;

    fn from_str(text: &str) -> Result<Self> {
        let invalid = || ModelError::InvalidOrientation {
            text: text.to_string(),
        };
        let trimmed = text.trim();
        let (hours, minutes) = match trimmed.split_once(',') {
            Some((hours, minutes)) => (hours, minutes),
            None => (trimmed, "0"),
        };
        let hours: i64 = hours.trim().parse().map_err(|_| invalid())?;
        let minutes = minutes.trim();
        let mut value: i64 = minutes.parse().map_err(|_| invalid())?;
        // a single digit counts tens of minutes: `3,5` is `3,50`
        if minutes.len() == 1 {
            value *= 10;
        }
        Self::new(hours, value)
    }
}
