//! Tube assembly: grouping the record stream into pipe joints.
//!
//! Every weld starts a new [`Tube`]. Records after it, up to the next weld,
//! belong to that tube. Wall thickness, category and diameter are carried
//! from tube to tube in a [`StreamState`] until a change record replaces
//! them.

use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::fmt;

use pipeline_model::{
    CIRCLE_MINUTES, GeoPoint, Numeric, ObjectClass, Orientation, Record, Schema, SeamType,
};

use crate::defect::Defect;
use crate::error::{CsvError, Result};
use crate::warning::{self, Warning};

/// Values carried forward across tubes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamState {
    pub thickness: Option<i64>,
    pub category: Option<String>,
    pub diameter: Option<i64>,
}

impl StreamState {
    pub fn with_diameter(diameter: Option<i64>) -> Self {
        Self {
            diameter,
            ..Self::default()
        }
    }

    /// Applies a thickness, category or diameter record and reports whether
    /// the carried value changed. Other records leave the state untouched.
    pub fn apply(&mut self, record: &Record) -> Result<bool> {
        match record.kind {
            ObjectClass::Thickness => {
                let value = state_number(record, "thickness")?;
                Ok(replace(&mut self.thickness, value))
            }
            ObjectClass::Category => Ok(replace(&mut self.category, record.depth_max.to_string())),
            ObjectClass::Diameter => {
                let value = state_number(record, "diameter")?;
                Ok(replace(&mut self.diameter, value))
            }
            _ => Ok(false),
        }
    }
}

fn state_number(record: &Record, field: &'static str) -> Result<i64> {
    record
        .depth_max
        .rounded()
        .ok_or_else(|| CsvError::InvalidStateValue {
            dist: record.dist,
            field,
            value: record.depth_max.to_string(),
        })
}

fn replace<T: PartialEq>(slot: &mut Option<T>, value: T) -> bool {
    if slot.as_ref() == Some(&value) {
        return false;
    }
    *slot = Some(value);
    true
}

/// One pipe joint, from its weld to the next weld.
#[derive(Debug, Clone)]
pub struct Tube<'a> {
    pub weld: &'a Record,
    pub start: i64,
    pub auto_number: usize,
    /// Set when the tube is finalized.
    pub length: Option<i64>,
    pub thickness: Option<i64>,
    pub category: Option<String>,
    pub diameter: Option<i64>,
    pub is_thickness_change: bool,
    pub is_category_change: bool,
    pub is_diameter_change: bool,
    pub seams: Vec<&'a Record>,
    pub markers: Vec<&'a Record>,
    pub defects: Vec<&'a Record>,
    pub thicknesses: Vec<&'a Record>,
    pub categories: Vec<&'a Record>,
    pub diameters: Vec<&'a Record>,
}

impl<'a> Tube<'a> {
    pub fn new(weld: &'a Record, auto_number: usize, state: &StreamState) -> Self {
        Self {
            weld,
            start: weld.dist,
            auto_number,
            length: None,
            thickness: state.thickness,
            category: state.category.clone(),
            diameter: state.diameter,
            is_thickness_change: false,
            is_category_change: false,
            is_diameter_change: false,
            seams: Vec::new(),
            markers: Vec::new(),
            defects: Vec::new(),
            thicknesses: Vec::new(),
            categories: Vec::new(),
            diameters: Vec::new(),
        }
    }

    /// Routes a record into the tube, updating the carried state.
    pub fn add(&mut self, record: &'a Record, state: &mut StreamState) -> Result<()> {
        match record.kind {
            ObjectClass::Seam => self.seams.push(record),
            ObjectClass::Marker => self.markers.push(record),
            ObjectClass::Defect => self.defects.push(record),
            ObjectClass::Thickness => {
                self.is_thickness_change |= state.apply(record)?;
                self.thickness = state.thickness;
                self.thicknesses.push(record);
            }
            ObjectClass::Category => {
                self.is_category_change |= state.apply(record)?;
                self.category.clone_from(&state.category);
                self.categories.push(record);
            }
            ObjectClass::Diameter => {
                self.is_diameter_change |= state.apply(record)?;
                self.diameter = state.diameter;
                self.diameters.push(record);
            }
            ObjectClass::Weld | ObjectClass::Join | ObjectClass::Other(_) => {
                return Err(CsvError::UnknownObject {
                    tube_start: self.start,
                    dist: record.dist,
                    code: record.kind.code(),
                });
            }
        }
        Ok(())
    }

    /// Closes the tube at `end` and freezes the carried values.
    pub fn finalize(&mut self, end: i64, state: &StreamState) {
        self.length = Some(end - self.start);
        self.thickness = state.thickness;
        self.category.clone_from(&state.category);
        self.diameter = state.diameter;
    }

    /// True when no record followed the weld.
    pub fn is_empty(&self) -> bool {
        self.seams.is_empty()
            && self.markers.is_empty()
            && self.defects.is_empty()
            && self.thicknesses.is_empty()
            && self.categories.is_empty()
            && self.diameters.is_empty()
    }

    pub fn end(&self) -> Option<i64> {
        self.length.map(|length| self.start + length)
    }

    /// Custom number from the weld record, else the running number.
    pub fn number(&self) -> String {
        match self.weld.name.trim() {
            "" => self.auto_number.to_string(),
            custom => custom.to_string(),
        }
    }

    /// Curve radius stored on the weld.
    pub fn radius(&self) -> &Numeric {
        &self.weld.depth_min
    }

    pub fn geo(&self) -> &GeoPoint {
        &self.weld.geo
    }

    /// Seam topology, taken from the first seam record.
    pub fn seam_type(&self) -> SeamType {
        self.seams.first().map_or(SeamType::Unknown, |seam| {
            SeamType::from_code(seam.code).unwrap_or(SeamType::Unknown)
        })
    }

    pub fn seam1(&self) -> Option<Orientation> {
        match self.seam_type() {
            SeamType::Horizontal | SeamType::Second | SeamType::Spiral => {
                self.seams.first().and_then(|seam| seam.orient1)
            }
            SeamType::NoWeld | SeamType::Unknown => None,
        }
    }

    pub fn seam2(&self) -> Option<Orientation> {
        match self.seam_type() {
            SeamType::Second => self.seams.first().and_then(|seam| seam.orient2),
            SeamType::Spiral if self.seams.len() > 1 => {
                self.seams.last().and_then(|seam| seam.orient1)
            }
            _ => None,
        }
    }

    /// Seam positions as text, e.g. `1,10 / 7,10`.
    pub fn seam_info(&self) -> String {
        let orientations: Vec<String> = match self.seam_type() {
            SeamType::Spiral => self
                .seams
                .iter()
                .filter_map(|seam| seam.orient1)
                .map(|orientation| orientation.to_string())
                .collect(),
            _ => [self.seam1(), self.seam2()]
                .into_iter()
                .flatten()
                .map(|orientation| orientation.to_string())
                .collect(),
        };
        orientations.join(" / ")
    }

    /// Seam positions usable for distance measurements.
    ///
    /// `None` for spiral seams, whose angle changes along the tube, and when
    /// no seam orientation is known.
    pub fn seam_marks(&self) -> Option<Vec<Orientation>> {
        if self.seam_type() == SeamType::Spiral {
            return None;
        }
        let marks: Vec<Orientation> = [self.seam1(), self.seam2()].into_iter().flatten().collect();
        (!marks.is_empty()).then_some(marks)
    }

    /// Arc length in mm of `minutes` on this tube's circumference.
    pub fn minutes_to_length(&self, minutes: i64) -> Option<i64> {
        self.diameter.map(|diameter| {
            (diameter as f64 * PI * minutes as f64 / CIRCLE_MINUTES as f64).floor() as i64
        })
    }

    /// Markers and defects ordered by distance.
    pub fn features(&self) -> Vec<&'a Record> {
        let mut features: Vec<&'a Record> =
            self.markers.iter().chain(&self.defects).copied().collect();
        features.sort_by_key(|record| record.dist);
        features
    }

    /// Defect views with geometry relative to this tube.
    pub fn defect_views<'t>(&'t self, schema: &'t Schema) -> impl Iterator<Item = Defect<'t>> {
        self.defects
            .iter()
            .map(move |record| Defect::new(record, self, schema))
    }

    /// Counts of defects and markers by type, e.g. `Коррозия: 2, Кран: 1`.
    pub fn summary(&self, schema: &Schema) -> String {
        [
            summary_text(&self.defects, |code| schema.defect_name(code)),
            summary_text(&self.markers, |code| schema.marker_name(code)),
        ]
        .into_iter()
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

impl fmt::Display for Tube<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tube {} at {}", self.number(), self.start)
    }
}

fn summary_text<'s>(records: &[&Record], name: impl Fn(i64) -> Option<&'s str>) -> String {
    let mut counts: BTreeMap<i64, (String, usize)> = BTreeMap::new();
    for record in records {
        counts
            .entry(record.code)
            .or_insert_with(|| {
                let label = name(record.code).unwrap_or(record.code_text.as_str());
                (label.to_string(), 0)
            })
            .1 += 1;
    }
    counts
        .values()
        .map(|(label, count)| format!("{label}: {count}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Single-pass tube iterator over a table, in distance order.
///
/// Yields an error once if a record cannot be placed and stops afterwards.
pub struct Tubes<'a, 'w> {
    records: std::vec::IntoIter<&'a Record>,
    state: StreamState,
    current: Option<Tube<'a>>,
    auto_number: usize,
    last_dist: i64,
    warnings: Option<&'w mut Vec<Warning>>,
    done: bool,
}

impl<'a, 'w> Tubes<'a, 'w> {
    pub fn new(
        records: &'a [Record],
        default_diameter: Option<i64>,
        warnings: Option<&'w mut Vec<Warning>>,
    ) -> Self {
        let mut sorted: Vec<&'a Record> = records.iter().collect();
        sorted.sort_by_key(|record| record.dist);
        Self {
            records: sorted.into_iter(),
            state: StreamState::with_diameter(default_diameter),
            current: None,
            auto_number: 0,
            last_dist: 0,
            warnings,
            done: false,
        }
    }

    /// Carried values at the current position.
    pub fn state(&self) -> &StreamState {
        &self.state
    }
}

impl<'a> Iterator for Tubes<'a, '_> {
    type Item = Result<Tube<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        for record in self.records.by_ref() {
            if record.is_join() {
                continue;
            }
            self.last_dist = record.dist;
            if record.is_weld() {
                self.auto_number += 1;
                let next = Tube::new(record, self.auto_number, &self.state);
                if let Some(mut tube) = self.current.replace(next) {
                    tube.finalize(record.dist, &self.state);
                    return Some(Ok(tube));
                }
                continue;
            }
            let outcome = match self.current.as_mut() {
                Some(tube) => tube.add(record, &mut self.state),
                None => before_first_weld(record, &mut self.state, self.warnings.as_deref_mut()),
            };
            if let Err(error) = outcome {
                self.done = true;
                return Some(Err(error));
            }
        }

        self.done = true;
        tracing::debug!(welds = self.auto_number, "tube assembly finished");
        let mut tube = self.current.take()?;
        if tube.is_empty() {
            return None;
        }
        tube.finalize(self.last_dist, &self.state);
        Some(Ok(tube))
    }
}

fn before_first_weld(
    record: &Record,
    state: &mut StreamState,
    warnings: Option<&mut Vec<Warning>>,
) -> Result<()> {
    match record.kind {
        ObjectClass::Thickness | ObjectClass::Category | ObjectClass::Diameter => {
            state.apply(record)?;
        }
        _ => warning::report(
            warnings,
            Warning::ObjectBeforeFirstWeld {
                dist: record.dist,
                code: record.kind.code(),
            },
        ),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_reports_changes_only() {
        let schema = Schema::default();
        let mut state = StreamState::default();
        assert!(state.apply(&Record::thickness(1, 105, &schema)).expect("apply"));
        assert!(!state.apply(&Record::thickness(2, 105, &schema)).expect("apply"));
        assert!(state.apply(&Record::category(3, "2", &schema)).expect("apply"));
        assert_eq!(state.category.as_deref(), Some("2"));
        assert!(!state.apply(&Record::weld(4, "", &schema)).expect("apply"));
    }

    #[test]
    fn non_numeric_thickness_is_rejected() {
        let mut record = Record::thickness(1, 0, &Schema::default());
        record.depth_max = Numeric::Raw("-".to_string());
        assert!(matches!(
            StreamState::default().apply(&record),
            Err(CsvError::InvalidStateValue { dist: 1, field: "thickness", .. })
        ));
    }

    #[test]
    fn tube_rejects_foreign_records() {
        let schema = Schema::default();
        let weld = Record::weld(100, "", &schema);
        let other = Record::with_dist(150, ObjectClass::Other(9));
        let mut state = StreamState::default();
        let mut tube = Tube::new(&weld, 1, &state);
        let error = tube.add(&other, &mut state).expect_err("unknown kind");
        assert_eq!(
            error.to_string(),
            "tube at dist 100 has wrong record at dist 150 (type 9)"
        );
    }

    #[test]
    fn number_prefers_custom_weld_name() {
        let schema = Schema::default();
        let named = Record::weld(0, " 17A ", &schema);
        let plain = Record::weld(0, "", &schema);
        let state = StreamState::default();
        assert_eq!(Tube::new(&named, 3, &state).number(), "17A");
        assert_eq!(Tube::new(&plain, 3, &state).number(), "3");
    }

    #[test]
    fn circumference_conversion_floors() {
        let schema = Schema::default();
        let weld = Record::weld(0, "", &schema);
        let tube = Tube::new(&weld, 1, &StreamState::with_diameter(Some(700)));
        assert_eq!(tube.minutes_to_length(720), Some(2199));
        assert_eq!(tube.minutes_to_length(360), Some(1099));
        assert_eq!(tube.minutes_to_length(180), Some(549));

        let unknown = Tube::new(&weld, 1, &StreamState::default());
        assert_eq!(unknown.minutes_to_length(180), None);
    }
}
