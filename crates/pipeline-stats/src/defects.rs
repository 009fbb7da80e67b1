//! Defect statistics.

use std::fmt;

use serde::Serialize;

use pipeline_csv::warning::{self, Warning};
use pipeline_csv::{Defect, Tube};
use pipeline_model::{Record, Schema};

use crate::angles::Angles;
use crate::counters::PropertyCounter;
use crate::grades::{DentGrades, DepthGrades, DistanceGrades, DISTANCE_PARTS};
use crate::histogram::{DEFAULT_BARS, DistanceBars, StackBy};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DefectTotals {
    pub number: usize,
    pub depth: DepthGrades,
    pub dents: DentGrades,
    /// By defect code.
    pub types: PropertyCounter<i64>,
    /// By wall side code.
    pub wallside: PropertyCounter<i64>,
    pub angles: Angles,
    pub distance: DistanceGrades,
    pub valves: DistanceGrades,
    pub bars: DistanceBars,
}

impl DefectTotals {
    /// Totals for a pipeline at `start..start + length`. Valves among
    /// `markers` split it into segments.
    pub fn new(start: i64, length: i64, markers: &[&Record], schema: &Schema) -> Self {
        let valve_nodes: Vec<i64> = markers
            .iter()
            .filter(|marker| schema.is_valve(marker))
            .map(|marker| marker.dist)
            .collect();
        Self {
            number: 0,
            depth: DepthGrades::default(),
            dents: DentGrades::default(),
            types: PropertyCounter::new(),
            wallside: PropertyCounter::new(),
            angles: Angles::default(),
            distance: DistanceGrades::equal_parts(start, length, DISTANCE_PARTS),
            valves: DistanceGrades::valves(markers.iter().copied(), schema),
            bars: if valve_nodes.is_empty() {
                DistanceBars::equal(start, length, DEFAULT_BARS, StackBy::WallSide)
            } else {
                DistanceBars::segments(start, length, valve_nodes, StackBy::WallSide)
            },
        }
    }

    /// Adds every defect of `tube`.
    pub fn add_tube(
        &mut self,
        tube: &Tube<'_>,
        schema: &Schema,
        mut warnings: Option<&mut Vec<Warning>>,
    ) {
        for defect in tube.defect_views(schema) {
            self.add_defect(&defect, warnings.as_deref_mut());
        }
    }

    pub fn add_defect(&mut self, defect: &Defect<'_>, warnings: Option<&mut Vec<Warning>>) {
        let record = defect.record;
        let tube = defect.tube.auto_number;
        let side = record.side.rounded().unwrap_or(0);

        self.number += 1;
        self.wallside.add_item(side, tube);
        self.types.add_item(record.code, tube);
        self.angles.add(record.orient1, record.orient2);
        self.distance.add(record.dist, tube);
        self.valves.add(record.dist, tube);
        self.bars.add(record.dist, side);

        if defect.is_metal_loss() {
            self.depth.add(defect);
        }
        if defect.is_dent() {
            if defect.depth_percent().is_none_or(|percent| percent == 0.0) {
                warning::report(
                    warnings,
                    Warning::ZeroDepthDent {
                        object_id: record.object_id.clone().unwrap_or_default(),
                        dist: record.dist,
                    },
                );
            }
            self.dents.add(defect);
        }
    }
}

impl fmt::Display for DefectTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "total_num: {}\n\ndepth {}\n\ndents {}\n\ntypes {}\n\nwallside {}\n\nangles {}",
            self.number, self.depth, self.dents, self.types, self.wallside, self.angles
        )
    }
}
