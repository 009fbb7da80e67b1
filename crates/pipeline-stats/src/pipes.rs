//! Tube counts and lengths.

use std::fmt;

use serde::Serialize;

use pipeline_csv::Tube;
use pipeline_model::SeamType;

use crate::counters::TubeProperty;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipeTotals {
    pub number: usize,
    pub length: i64,
    pub thickness: TubeProperty<Option<i64>>,
    pub category: TubeProperty<Option<String>>,
    pub seam_types: TubeProperty<SeamType>,
}

impl PipeTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a finalized tube; an open tube counts with zero length.
    pub fn add_tube(&mut self, tube: &Tube<'_>) {
        let length = tube.length.unwrap_or(0);
        self.number += 1;
        self.length += length;
        self.thickness.add_data(tube.thickness, length);
        self.category.add_data(tube.category.clone(), length);
        self.seam_types.add_data(tube.seam_type(), length);
    }
}

impl fmt::Display for PipeTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "total_num: {} total_len: {}\n\nthick {}\n\ncategory {}\n\ntypes {}",
            self.number, self.length, self.thickness, self.category, self.seam_types
        )
    }
}
