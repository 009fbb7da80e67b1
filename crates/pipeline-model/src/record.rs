//! One row of the inspection table.

use crate::error::{ModelError, Result};
use crate::kinds::{DefectSide, ObjectClass, SeamType};
use crate::orientation::Orientation;
use crate::schema::Schema;
use crate::value::Numeric;

/// Columns of the legacy table layout.
pub const LEGACY_COLUMN_COUNT: usize = 27;

/// Columns written by this crate: the legacy layout plus `ObjectId`.
pub const COLUMN_COUNT: usize = 28;

/// Header row, in column order.
pub const COLUMN_HEADS: [&str; COLUMN_COUNT] = [
    "DistOd",
    "TypeObject",
    "Object_Code",
    "ObjectName",
    "Object_Code_T",
    "Marker",
    "Length",
    "Width",
    "Depth_min",
    "Depth_max",
    "OrientTD",
    "OrientBD",
    "MPoint_Orient",
    "MPoint_Dist",
    "Type_Def",
    "DistML",
    "DistMR",
    "DistStL",
    "DistStR",
    "LinkStL",
    "LinkStR",
    "LinkML",
    "LinkMR",
    "Comments",
    "Latitude",
    "Longtitude",
    "Altitude",
    "ObjectId",
];

/// Distances and links to neighbouring objects on the left and right.
///
/// The values are opaque to this crate; only their sides are swapped when
/// the survey direction is reversed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Shoulders {
    pub dist_ml: String,
    pub dist_mr: String,
    pub dist_stl: String,
    pub dist_str: String,
    pub link_stl: String,
    pub link_str: String,
    pub link_ml: String,
    pub link_mr: String,
}

impl Shoulders {
    pub fn swap_sides(&mut self) {
        std::mem::swap(&mut self.dist_ml, &mut self.dist_mr);
        std::mem::swap(&mut self.dist_stl, &mut self.dist_str);
        std::mem::swap(&mut self.link_stl, &mut self.link_str);
        std::mem::swap(&mut self.link_ml, &mut self.link_mr);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeoPoint {
    pub latitude: String,
    pub longitude: String,
    pub altitude: String,
}

impl GeoPoint {
    pub fn is_set(&self) -> bool {
        !self.latitude.is_empty() && !self.longitude.is_empty() && !self.altitude.is_empty()
    }
}

/// Parameters of a new defect record.
#[derive(Debug, Clone, Default)]
pub struct NewDefect {
    pub code: i64,
    pub side: DefectSide,
    pub length: Numeric,
    pub width: Numeric,
    /// Stored rounded into both depth columns.
    pub depth: Numeric,
    pub orient1: Option<Orientation>,
    pub orient2: Option<Orientation>,
    pub mp_orient: Option<Orientation>,
    pub mp_dist: Option<i64>,
    pub comment: String,
}

/// A single table row.
///
/// Which fields are meaningful depends on [`ObjectClass`]: thickness and
/// category changes keep their value in `depth_max`, a diameter change keeps
/// the previous diameter in `depth_min` and the new one in `depth_max`, a
/// weld keeps the custom tube number in `name` and the curve radius in
/// `depth_min`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    pub dist: i64,
    pub kind: ObjectClass,
    pub code: i64,
    pub name: String,
    pub code_text: String,
    pub is_marker: bool,
    pub length: Numeric,
    pub width: Numeric,
    pub depth_min: Numeric,
    pub depth_max: Numeric,
    pub orient1: Option<Orientation>,
    pub orient2: Option<Orientation>,
    pub mp_orient: Option<Orientation>,
    pub mp_dist: Numeric,
    pub side: Numeric,
    pub shoulders: Shoulders,
    pub comments: String,
    pub geo: GeoPoint,
    pub object_id: Option<String>,
}

impl Record {
    pub fn with_dist(dist: i64, kind: ObjectClass) -> Self {
        Self {
            dist,
            kind,
            ..Self::default()
        }
    }

    /// Girth weld. A non-empty `custom_number` overrides the tube number.
    pub fn weld(dist: i64, custom_number: &str, schema: &Schema) -> Self {
        Self {
            name: custom_number.to_string(),
            code_text: schema.name_object(ObjectClass::Weld).to_string(),
            ..Self::with_dist(dist, ObjectClass::Weld)
        }
    }

    pub fn thickness(dist: i64, thickness: i64, schema: &Schema) -> Self {
        Self {
            code_text: schema.name_object(ObjectClass::Thickness).to_string(),
            depth_max: Numeric::Int(thickness),
            ..Self::with_dist(dist, ObjectClass::Thickness)
        }
    }

    pub fn category(dist: i64, category: &str, schema: &Schema) -> Self {
        Self {
            code_text: schema.name_object(ObjectClass::Category).to_string(),
            depth_max: Numeric::parse(category),
            ..Self::with_dist(dist, ObjectClass::Category)
        }
    }

    pub fn diameter(dist: i64, previous: Option<i64>, diameter: i64, schema: &Schema) -> Self {
        Self {
            code_text: schema.name_object(ObjectClass::Diameter).to_string(),
            depth_min: previous.into(),
            depth_max: Numeric::Int(diameter),
            ..Self::with_dist(dist, ObjectClass::Diameter)
        }
    }

    /// Seam record. Orientations the seam type has no use for are dropped.
    pub fn seam(
        dist: i64,
        code: i64,
        orient1: Option<Orientation>,
        orient2: Option<Orientation>,
        schema: &Schema,
    ) -> Result<Self> {
        let seam = SeamType::from_code(code)?;
        Ok(Self {
            code,
            code_text: schema.name_seam(seam).to_string(),
            orient1: orient1.filter(|_| seam.has_primary()),
            orient2: orient2.filter(|_| seam.has_secondary()),
            ..Self::with_dist(dist, ObjectClass::Seam)
        })
    }

    /// Line object such as a valve or a magnet marker.
    pub fn marker(
        dist: i64,
        code: i64,
        name: &str,
        is_marker: bool,
        comment: &str,
        schema: &Schema,
    ) -> Result<Self> {
        let code_text = schema
            .marker_name(code)
            .ok_or(ModelError::UnknownMarkerType { code })?;
        Ok(Self {
            code,
            name: name.to_string(),
            code_text: code_text.to_string(),
            is_marker,
            comments: comment.to_string(),
            ..Self::with_dist(dist, ObjectClass::Marker)
        })
    }

    pub fn defect(dist: i64, defect: &NewDefect, schema: &Schema) -> Result<Self> {
        let code_text = schema
            .defect_name(defect.code)
            .ok_or(ModelError::UnknownDefectType { code: defect.code })?;
        let depth: Numeric = defect.depth.rounded().into();
        Ok(Self {
            code: defect.code,
            code_text: code_text.to_string(),
            side: Numeric::Int(defect.side.code()),
            length: defect.length.clone(),
            width: defect.width.clone(),
            depth_min: depth.clone(),
            depth_max: depth,
            orient1: defect.orient1,
            orient2: defect.orient2,
            mp_orient: defect.mp_orient,
            mp_dist: defect.mp_dist.into(),
            comments: defect.comment.clone(),
            ..Self::with_dist(dist, ObjectClass::Defect)
        })
    }

    /// Placeholder that pads a join; dropped when the table is written.
    pub fn join_spacer(dist: i64) -> Self {
        Self::with_dist(dist, ObjectClass::Join)
    }

    /// Sets coordinates only when all three are given.
    #[must_use]
    pub fn with_geo(mut self, latitude: &str, longitude: &str, altitude: &str) -> Self {
        let geo = GeoPoint {
            latitude: latitude.to_string(),
            longitude: longitude.to_string(),
            altitude: altitude.to_string(),
        };
        if geo.is_set() {
            self.geo = geo;
        }
        self
    }

    #[must_use]
    pub fn with_object_id(mut self, id: impl Into<String>) -> Self {
        self.object_id = Some(id.into());
        self
    }

    pub fn is_weld(&self) -> bool {
        self.kind == ObjectClass::Weld
    }

    pub fn is_marker_object(&self) -> bool {
        self.kind == ObjectClass::Marker
    }

    pub fn is_defect(&self) -> bool {
        self.kind == ObjectClass::Defect
    }

    pub fn is_thickness(&self) -> bool {
        self.kind == ObjectClass::Thickness
    }

    pub fn is_seam(&self) -> bool {
        self.kind == ObjectClass::Seam
    }

    pub fn is_category(&self) -> bool {
        self.kind == ObjectClass::Category
    }

    pub fn is_diameter(&self) -> bool {
        self.kind == ObjectClass::Diameter
    }

    pub fn is_join(&self) -> bool {
        self.kind == ObjectClass::Join
    }

    /// Extent along the pipe; zero when the length cell is empty or not numeric.
    pub fn own_length(&self) -> i64 {
        self.length.rounded().unwrap_or(0)
    }

    /// Rewrites the record as seen when surveying from the other end of a
    /// pipeline of `total_length`. Applying it twice restores the record.
    pub fn reverse(&mut self, total_length: i64, schema: &Schema) {
        self.dist = total_length - self.dist - self.own_length();
        if let Numeric::Int(mp_dist) = self.mp_dist {
            self.mp_dist = Numeric::Int(total_length - mp_dist);
        }
        self.shoulders.swap_sides();

        if self.is_seam() {
            // seam positions are absolute; only their order flips
            if self.orient1.is_some() && self.orient2.is_some() {
                std::mem::swap(&mut self.orient1, &mut self.orient2);
            }
        } else {
            let orient1 = self.orient2.map(Orientation::mirrored);
            let orient2 = self.orient1.map(Orientation::mirrored);
            self.orient1 = orient1;
            self.orient2 = orient2;
            self.mp_orient = self.mp_orient.map(Orientation::mirrored);
        }

        if self.is_marker_object() {
            self.code = schema.reverse_marker(self.code);
        }
        if let Some(comments) = schema.reverse_comment(&self.comments) {
            self.comments = comments;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Profile;

    fn oegiv() -> Schema {
        Schema::builtin(Profile::Oegiv).expect("builtin profile")
    }

    fn at(text: &str) -> Option<Orientation> {
        Some(text.parse().expect("orientation"))
    }

    #[test]
    fn header_keeps_legacy_order() {
        assert_eq!(COLUMN_HEADS[0], "DistOd");
        assert_eq!(COLUMN_HEADS[LEGACY_COLUMN_COUNT - 1], "Altitude");
        assert_eq!(COLUMN_HEADS[COLUMN_COUNT - 1], "ObjectId");
    }

    #[test]
    fn weld_carries_number_and_name() {
        let weld = Record::weld(10, "A-12", &oegiv());
        assert!(weld.is_weld());
        assert_eq!(weld.name, "A-12");
        assert_eq!(weld.code_text, "Шов");
    }

    #[test]
    fn state_records_store_values() {
        let schema = oegiv();
        assert_eq!(Record::thickness(5, 105, &schema).depth_max, Numeric::Int(105));
        assert_eq!(Record::category(5, "2", &schema).depth_max, Numeric::Int(2));
        let diameter = Record::diameter(5, None, 1200, &schema);
        assert_eq!(diameter.depth_min, Numeric::Absent);
        assert_eq!(diameter.depth_max, Numeric::Int(1200));
    }

    #[test]
    fn seam_keeps_orientations_by_type() {
        let schema = oegiv();
        let horizontal = Record::seam(1, 0, at("1,10"), at("7,10"), &schema).expect("seam");
        assert_eq!(horizontal.orient1, at("1,10"));
        assert_eq!(horizontal.orient2, None);
        assert_eq!(horizontal.code_text, "Продольный шов");

        let double = Record::seam(1, 1, at("1,10"), at("7,10"), &schema).expect("seam");
        assert_eq!(double.orient2, at("7,10"));

        let seamless = Record::seam(1, 2, at("1,10"), at("7,10"), &schema).expect("seam");
        assert_eq!(seamless.orient1, None);

        assert!(matches!(
            Record::seam(1, 999, None, None, &schema),
            Err(ModelError::UnknownSeamType { code: 999 })
        ));
    }

    #[test]
    fn typed_constructors_validate_codes() {
        let schema = oegiv();
        let defect = NewDefect {
            code: 999,
            ..NewDefect::default()
        };
        assert!(matches!(
            Record::defect(1, &defect, &schema),
            Err(ModelError::UnknownDefectType { code: 999 })
        ));
        assert!(matches!(
            Record::marker(1, 999, "", false, "", &schema),
            Err(ModelError::UnknownMarkerType { code: 999 })
        ));
        assert!(Record::marker(1, 0, "valve 3", true, "", &Schema::default()).is_err());
    }

    #[test]
    fn defect_depth_is_rounded_into_both_columns() {
        let defect = NewDefect {
            code: 0,
            side: DefectSide::Outside,
            length: Numeric::Int(30),
            depth: Numeric::parse("12,6"),
            ..NewDefect::default()
        };
        let record = Record::defect(100, &defect, &oegiv()).expect("defect");
        assert_eq!(record.depth_min, Numeric::Int(13));
        assert_eq!(record.depth_max, Numeric::Int(13));
        assert_eq!(record.side, Numeric::Int(1));
        assert_eq!(record.code_text, "Коррозия");
    }

    #[test]
    fn geo_needs_all_coordinates() {
        let weld = Record::weld(1, "", &Schema::default()).with_geo("55.1", "37.2", "");
        assert!(!weld.geo.is_set());
        let weld = weld.with_geo("55.1", "37.2", "120");
        assert_eq!(weld.geo.altitude, "120");
    }

    #[test]
    fn reverse_mirrors_defect_span() {
        let defect = NewDefect {
            code: 0,
            length: Numeric::Int(10),
            orient1: at("4,00"),
            orient2: at("5,00"),
            mp_orient: at("4,30"),
            mp_dist: Some(105),
            ..NewDefect::default()
        };
        let mut record = Record::defect(100, &defect, &oegiv()).expect("defect");
        record.shoulders.dist_ml = "left".to_string();
        record.reverse(1000, &oegiv());

        assert_eq!(record.dist, 890);
        assert_eq!(record.mp_dist, Numeric::Int(895));
        assert_eq!(record.orient1, at("7,00"));
        assert_eq!(record.orient2, at("8,00"));
        assert_eq!(record.mp_orient, at("7,30"));
        assert_eq!(record.shoulders.dist_mr, "left");
        assert!(record.shoulders.dist_ml.is_empty());
    }

    #[test]
    fn reverse_swaps_seam_pair_without_mirroring() {
        let schema = oegiv();
        let mut double = Record::seam(10, 1, at("1,10"), at("7,10"), &schema).expect("seam");
        double.reverse(100, &schema);
        assert_eq!(double.dist, 90);
        assert_eq!(double.orient1, at("7,10"));
        assert_eq!(double.orient2, at("1,10"));

        let mut single = Record::seam(10, 0, at("1,10"), None, &schema).expect("seam");
        single.reverse(100, &schema);
        assert_eq!(single.orient1, at("1,10"));
        assert_eq!(single.orient2, None);
    }

    #[test]
    fn reverse_remaps_markers_and_comments() {
        let schema = oegiv();
        let mut casing =
            Record::marker(50, 4, "", false, "начало кожуха", &schema).expect("marker");
        casing.reverse(100, &schema);
        assert_eq!(casing.code, 5);
        assert_eq!(casing.comments, "конец кожуха");
        casing.reverse(100, &schema);
        assert_eq!(casing.code, 4);
        assert_eq!(casing.comments, "начало кожуха");
    }

    #[test]
    fn reverse_twice_restores_record() {
        let schema = oegiv();
        let defect = NewDefect {
            code: 1,
            length: Numeric::Int(25),
            width: Numeric::parse("7.5"),
            orient1: at("11,40"),
            mp_orient: at("12,00"),
            mp_dist: Some(130),
            ..NewDefect::default()
        };
        let original = Record::defect(120, &defect, &schema)
            .expect("defect")
            .with_object_id("D-1");
        let mut record = original.clone();
        record.reverse(5000, &schema);
        assert_ne!(record, original);
        record.reverse(5000, &schema);
        assert_eq!(record, original);
    }
}
