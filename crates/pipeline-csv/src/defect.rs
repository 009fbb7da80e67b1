//! Defect geometry relative to its tube.

use std::fmt;

use pipeline_model::{Numeric, Orientation, Record, Schema};

use crate::tubes::Tube;

/// A defect record viewed inside the tube it belongs to.
///
/// Distances are in mm, except [`to_seam`](Self::to_seam), which is an arc
/// in clock minutes. The max-depth point's seam distance is converted along
/// the tube circumference, so it needs a known diameter.
#[derive(Debug, Clone, Copy)]
pub struct Defect<'t> {
    pub record: &'t Record,
    pub tube: &'t Tube<'t>,
    schema: &'t Schema,
}

impl<'t> Defect<'t> {
    pub fn new(record: &'t Record, tube: &'t Tube<'t>, schema: &'t Schema) -> Self {
        Self {
            record,
            tube,
            schema,
        }
    }

    pub fn code(&self) -> i64 {
        self.record.code
    }

    pub fn is_metal_loss(&self) -> bool {
        self.schema.is_metal_loss(self.record)
    }

    pub fn is_dent(&self) -> bool {
        self.schema.is_dent(self.record)
    }

    pub fn is_at_weld(&self) -> bool {
        self.schema.is_at_weld(self.record)
    }

    pub fn is_at_seam(&self) -> bool {
        self.schema.is_at_seam(self.record)
    }

    /// From the tube's start weld to the start of the defect.
    pub fn to_left_weld(&self) -> i64 {
        self.record.dist - self.tube.start
    }

    /// From the end of the defect to the next weld.
    pub fn to_right_weld(&self) -> Option<i64> {
        let end = self.tube.end()?;
        Some(end - (self.record.dist + self.record.own_length()))
    }

    fn mp_dist(&self) -> Option<i64> {
        if self.is_at_weld() || self.is_at_seam() {
            return None;
        }
        self.record.mp_dist.as_i64()
    }

    /// From the start weld to the point of maximum depth.
    pub fn mp_left_weld(&self) -> Option<i64> {
        self.mp_dist().map(|mp_dist| mp_dist - self.tube.start)
    }

    /// From the point of maximum depth to the next weld.
    pub fn mp_right_weld(&self) -> Option<i64> {
        let mp_dist = self.mp_dist()?;
        Some(self.tube.end()? - mp_dist)
    }

    /// From the point of maximum depth to the nearest seam.
    pub fn mp_seam(&self) -> Option<i64> {
        let mp_orient = self.record.mp_orient?;
        let minutes = self
            .tube
            .seam_marks()?
            .into_iter()
            .map(|seam| mp_orient.min_distance(seam))
            .min()?;
        self.tube.minutes_to_length(minutes)
    }

    /// Nearest of [`mp_seam`](Self::mp_seam) and the two weld distances.
    pub fn mp_seam_weld(&self) -> Option<i64> {
        [self.mp_seam(), self.mp_left_weld(), self.mp_right_weld()]
            .into_iter()
            .flatten()
            .min()
    }

    /// Clock minutes from the defect's angular span to the nearest seam; zero
    /// when a seam runs through the span.
    pub fn to_seam(&self) -> Option<i64> {
        let seams = self.tube.seam_marks()?;
        let (orient1, orient2) = (self.record.orient1, self.record.orient2);
        if let (Some(start), Some(end)) = (orient1, orient2) {
            if seams.iter().any(|seam| seam.is_inside(start, end)) {
                return Some(0);
            }
        }
        [orient1, orient2]
            .into_iter()
            .flatten()
            .flat_map(|boundary| seams.iter().map(move |seam| boundary.min_distance(*seam)))
            .min()
    }

    /// Smallest of [`to_seam`](Self::to_seam) and the two weld distances. The
    /// seam arc is compared as is, without conversion to mm.
    pub fn to_seam_weld(&self) -> Option<i64> {
        [
            self.to_seam(),
            Some(self.to_left_weld()),
            self.to_right_weld(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// Representative angular position of the defect.
    pub fn orientation_point(&self) -> Option<Orientation> {
        if let Some(point) = self.record.mp_orient {
            return Some(point);
        }
        match (self.record.orient1, self.record.orient2) {
            (Some(start), Some(end)) => Some(Orientation::midpoint(start, end)),
            (Some(point), None) | (None, Some(point)) => Some(point),
            (None, None) => None,
        }
    }

    /// Depth in percent: of wall thickness for metal loss, of the diameter
    /// for dents (whose depth is recorded in mm).
    pub fn depth_percent(&self) -> Option<f64> {
        let depth = self.record.depth_max.as_f64()?;
        if self.is_dent() {
            let diameter = self.tube.diameter.filter(|diameter| *diameter > 0)?;
            return Some(depth * 100.0 / diameter as f64);
        }
        Some(depth)
    }

    pub fn side(&self) -> &Numeric {
        &self.record.side
    }
}

impl fmt::Display for Defect<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.record.code_text, self.tube)
    }
}
