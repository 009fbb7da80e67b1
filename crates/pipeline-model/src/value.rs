//! Numeric table cells.

use std::fmt;

/// A numeric cell as stored in the table.
///
/// Cells are frequently empty or hold placeholders such as `-`, so the value
/// keeps the three cases apart instead of collapsing them to zero. Text that
/// is not a canonical integer is kept verbatim and written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Numeric {
    #[default]
    Absent,
    Int(i64),
    Raw(String),
}

impl Numeric {
    pub fn parse(text: &str) -> Self {
        if text.is_empty() {
            return Self::Absent;
        }
        match text.parse::<i64>() {
            Ok(value) if value.to_string() == text => Self::Int(value),
            _ => Self::Raw(text.to_string()),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Reads integers and decimals written with either `.` or `,`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Absent => None,
            Self::Int(value) => Some(*value as f64),
            Self::Raw(text) => text.trim().replace(',', ".").parse().ok(),
        }
    }

    /// Nearest integer, halves rounded away from zero.
    pub fn rounded(&self) -> Option<i64> {
        self.as_f64().map(|value| value.round() as i64)
    }
}

impl From<i64> for Numeric {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<Option<i64>> for Numeric {
    fn from(value: Option<i64>) -> Self {
        value.map_or(Self::Absent, Self::Int)
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => Ok(()),
            Self::Int(value) => write!(f, "{value}"),
            Self::Raw(text) => f.write_str(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_keeps_absent_apart_from_zero() {
        assert_eq!(Numeric::parse(""), Numeric::Absent);
        assert_eq!(Numeric::parse("0"), Numeric::Int(0));
        assert_eq!(Numeric::parse("-15"), Numeric::Int(-15));
        assert_eq!(Numeric::parse("-"), Numeric::Raw("-".to_string()));
    }

    #[test]
    fn non_canonical_integers_stay_verbatim() {
        assert_eq!(Numeric::parse("010"), Numeric::Raw("010".to_string()));
        assert_eq!(Numeric::parse(" 10"), Numeric::Raw(" 10".to_string()));
        assert_eq!(Numeric::parse("010").to_string(), "010");
    }

    #[test]
    fn decimals_round_half_away_from_zero() {
        assert_eq!(Numeric::parse("2,5").rounded(), Some(3));
        assert_eq!(Numeric::parse("12.4").rounded(), Some(12));
        assert_eq!(Numeric::parse("-").rounded(), None);
        assert_eq!(Numeric::Absent.as_f64(), None);
    }
}
