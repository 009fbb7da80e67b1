//! Inspection table engine.
//!
//! Reads and writes the semicolon separated defect table exported by
//! in-line inspection software, and implements the whole-table transforms
//! used when preparing survey data:
//!
//! - [`CsvFile::reverse`]: flip the survey direction
//! - [`CsvFile::join`]: concatenate tables with gaps
//! - [`CsvFile::distance_modify`]: correct distances through a [`DistanceTable`]
//! - [`CsvFile::make_distances_unique`]: separate records sharing a distance
//!
//! [`CsvFile::tubes`] assembles the record stream into [`Tube`]s, and
//! [`Defect`] measures defects against their tube's welds and seams.
//!
//! # Example
//!
//! ```
//! use pipeline_csv::{CsvFile, CsvOptions};
//! use pipeline_model::{Record, Schema};
//!
//! let schema = Schema::default();
//! let mut file = CsvFile::new(CsvOptions::utf8());
//! file.records.push(Record::weld(0, "", &schema));
//! file.records.push(Record::thickness(5, 105, &schema));
//! file.records.push(Record::weld(1000, "", &schema));
//!
//! let tubes: Vec<_> = file.tubes(None).collect::<Result<_, _>>()?;
//! assert_eq!(tubes.len(), 1);
//! assert_eq!(tubes[0].length, Some(1000));
//! # Ok::<(), pipeline_csv::CsvError>(())
//! ```

mod codec;
pub mod defect;
pub mod error;
pub mod file;
pub mod options;
pub mod remap;
pub mod tubes;
pub mod warning;

pub use defect::Defect;
pub use error::{CsvError, Result};
pub use file::{CsvFile, JoinItem};
pub use options::{CsvOptions, FloatDelimiter};
pub use remap::{DistanceTable, remap_distance, remap_length};
pub use tubes::{StreamState, Tube, Tubes};
pub use warning::Warning;
