//! Statistics over inspection tables.
//!
//! [`Totals::fill`] walks the tubes of a [`pipeline_csv::CsvFile`] and
//! aggregates pipe lengths by thickness, category and seam type, line
//! objects by type, and defects by depth grade, type, wall side, clock hour
//! and distance.

pub mod angles;
pub mod counters;
pub mod defects;
pub mod grades;
pub mod histogram;
pub mod pipes;
pub mod totals;

pub use angles::{Angles, at_hours, get_hour};
pub use counters::{Counter, CounterLength, Label, PropertyCounter, TubeProperty};
pub use defects::DefectTotals;
pub use grades::{DentGrades, DepthGrades, DistanceGrades, Grade, GradeTube};
pub use histogram::{Bar, DistanceBars, StackBy};
pub use pipes::PipeTotals;
pub use totals::{MarkerInfo, Totals};
