//! Whole-table statistics.

use std::fmt;

use serde::Serialize;

use pipeline_csv::{CsvFile, Result, Warning};
use pipeline_model::Schema;

use crate::counters::PropertyCounter;
use crate::defects::DefectTotals;
use crate::pipes::PipeTotals;

/// Navigation marker listed in the totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkerInfo {
    pub dist: i64,
    pub code: i64,
    pub name: String,
    pub type_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Totals {
    /// Start weld of the first tube.
    pub start: Option<i64>,
    /// From the first tube's start to the last tube's end.
    pub length: i64,
    pub pipes: PipeTotals,
    /// Line objects by marker code.
    pub liners: PropertyCounter<i64>,
    pub markers: Vec<MarkerInfo>,
    pub defects: DefectTotals,
}

impl Totals {
    /// Collects statistics in two assembly passes: tubes and markers first,
    /// then defects against the pipeline extent found by the first pass.
    pub fn fill(
        file: &CsvFile,
        schema: &Schema,
        mut warnings: Option<&mut Vec<Warning>>,
    ) -> Result<Self> {
        let mut pipes = PipeTotals::new();
        let mut liners = PropertyCounter::new();
        let mut markers = Vec::new();
        let mut line_objects = Vec::new();
        let mut start = None;
        let mut end = None;

        for tube in file.tubes(warnings.as_deref_mut()) {
            let tube = tube?;
            start.get_or_insert(tube.start);
            end = tube.end();
            pipes.add_tube(&tube);
            for item in &tube.markers {
                liners.add_item(item.code, tube.auto_number);
                if item.is_marker {
                    markers.push(MarkerInfo {
                        dist: item.dist,
                        code: item.code,
                        name: item.name.clone(),
                        type_name: item.code_text.clone(),
                    });
                }
            }
            line_objects.extend(tube.markers.iter().copied());
        }

        let origin = start.unwrap_or(0);
        let length = end.map_or(0, |end| end - origin);
        let mut defects = DefectTotals::new(origin, length, &line_objects, schema);
        for tube in file.tubes(None) {
            defects.add_tube(&tube?, schema, warnings.as_deref_mut());
        }
        tracing::debug!(
            tubes = pipes.number,
            defects = defects.number,
            markers = markers.len(),
            "collected table statistics"
        );

        Ok(Self {
            start,
            length,
            pipes,
            liners,
            markers,
            defects,
        })
    }
}

impl fmt::Display for Totals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tubes: {}\n\nLiners: {}\n\nDefects: {}",
            self.pipes, self.liners, self.defects
        )
    }
}
