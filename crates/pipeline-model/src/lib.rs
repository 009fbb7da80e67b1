//! Record model for in-line pipeline inspection tables.
//!
//! A table is a flat stream of [`Record`]s ordered by distance along the
//! pipeline. Each record describes one object: a girth weld, a seam, a
//! wall thickness or category change, a marker or a defect. Angular
//! positions around the pipe use [`Orientation`], a 12-hour clock face with
//! minute resolution.
//!
//! Display names and defect/marker classification are data, supplied by a
//! [`Schema`] profile.

pub mod error;
pub mod kinds;
pub mod orientation;
pub mod record;
pub mod schema;
pub mod value;

pub use error::{ModelError, Result};
pub use kinds::{DefectSide, ObjectClass, SeamType};
pub use orientation::{CIRCLE_MINUTES, Orientation};
pub use record::{
    COLUMN_COUNT, COLUMN_HEADS, GeoPoint, LEGACY_COLUMN_COUNT, NewDefect, Record, Shoulders,
};
pub use schema::{Profile, Schema};
pub use value::Numeric;
