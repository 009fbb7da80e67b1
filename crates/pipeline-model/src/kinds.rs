//! Object kinds and coded attributes stored in the table.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ModelError, Result};

/// Object class of a record (`TypeObject` column).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ObjectClass {
    /// Girth weld; starts a new tube.
    #[default]
    Weld,
    /// Line object (valve, tee, magnet marker, casing boundary, ...).
    Marker,
    Defect,
    /// Wall thickness change.
    Thickness,
    /// Longitudinal or spiral seam.
    Seam,
    /// Pipeline category change.
    Category,
    /// Pipe diameter change.
    Diameter,
    /// Spacer inserted by joins. Never written to a table.
    Join,
    /// Code not known to this model, kept as read.
    Other(i64),
}

impl ObjectClass {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Weld,
            1 => Self::Marker,
            2 => Self::Defect,
            3 => Self::Thickness,
            4 => Self::Seam,
            5 => Self::Category,
            6 => Self::Diameter,
            -1 => Self::Join,
            other => Self::Other(other),
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Self::Weld => 0,
            Self::Marker => 1,
            Self::Defect => 2,
            Self::Thickness => 3,
            Self::Seam => 4,
            Self::Category => 5,
            Self::Diameter => 6,
            Self::Join => -1,
            Self::Other(code) => code,
        }
    }

    /// Negative codes mark in-memory helpers that are skipped on save.
    pub fn is_persistent(self) -> bool {
        self.code() >= 0
    }
}

/// Longitudinal seam topology of a tube.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum SeamType {
    Horizontal,
    /// Two longitudinal seams.
    Second,
    /// Seamless pipe.
    NoWeld,
    Spiral,
    #[default]
    Unknown,
}

impl SeamType {
    pub const ALL: [SeamType; 5] = [
        SeamType::Horizontal,
        SeamType::Second,
        SeamType::NoWeld,
        SeamType::Spiral,
        SeamType::Unknown,
    ];

    pub fn from_code(code: i64) -> Result<Self> {
        match code {
            0 => Ok(Self::Horizontal),
            1 => Ok(Self::Second),
            2 => Ok(Self::NoWeld),
            3 => Ok(Self::Spiral),
            4 => Ok(Self::Unknown),
            _ => Err(ModelError::UnknownSeamType { code }),
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Self::Horizontal => 0,
            Self::Second => 1,
            Self::NoWeld => 2,
            Self::Spiral => 3,
            Self::Unknown => 4,
        }
    }

    /// Whether a seam of this type stores its primary orientation.
    pub fn has_primary(self) -> bool {
        matches!(self, Self::Horizontal | Self::Spiral | Self::Second)
    }

    pub fn has_secondary(self) -> bool {
        self == Self::Second
    }
}

impl fmt::Display for SeamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Horizontal => "horizontal",
            Self::Second => "double",
            Self::NoWeld => "seamless",
            Self::Spiral => "spiral",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Wall side a defect was detected on (`Type_Def` column).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DefectSide {
    #[default]
    Unknown,
    Outside,
    Inside,
    InWall,
}

impl DefectSide {
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Outside,
            2 => Self::Inside,
            3 => Self::InWall,
            _ => Self::Unknown,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Self::Unknown => 0,
            Self::Outside => 1,
            Self::Inside => 2,
            Self::InWall => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_codes_round_trip() {
        for code in -1..=6 {
            assert_eq!(ObjectClass::from_code(code).code(), code);
        }
        assert_eq!(ObjectClass::from_code(42), ObjectClass::Other(42));
        assert!(!ObjectClass::Join.is_persistent());
        assert!(ObjectClass::Other(9).is_persistent());
    }

    #[test]
    fn seam_codes_validate() {
        assert_eq!(SeamType::from_code(3).expect("spiral"), SeamType::Spiral);
        assert!(matches!(
            SeamType::from_code(999),
            Err(ModelError::UnknownSeamType { code: 999 })
        ));
        assert!(SeamType::Second.has_secondary());
        assert!(!SeamType::NoWeld.has_primary());
    }

    #[test]
    fn unknown_side_codes_fall_back() {
        assert_eq!(DefectSide::from_code(2), DefectSide::Inside);
        assert_eq!(DefectSide::from_code(7), DefectSide::Unknown);
    }
}
