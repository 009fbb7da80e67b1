//! Threshold buckets ("grades").
//!
//! A value falls into the first threshold it is strictly less than, and into
//! [`Grade::OverMax`] when it reaches the last one.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Serialize, Serializer};

use pipeline_csv::Defect;
use pipeline_model::{Record, Schema};

/// Default metal loss depth thresholds, in percent of wall thickness.
pub const DEPTH_GRADES: [i64; 1] = [80];

/// Default dent depth thresholds, in percent of the diameter.
pub const DENT_GRADES: [i64; 2] = [5, 10];

/// Equal pipeline parts used by [`DistanceGrades::equal_parts`] in totals.
pub const DISTANCE_PARTS: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Grade {
    /// Below this threshold.
    Below(i64),
    OverMax,
}

impl Grade {
    pub fn of(value: f64, thresholds: &[i64]) -> Self {
        thresholds
            .iter()
            .find(|threshold| value < **threshold as f64)
            .map_or(Self::OverMax, |threshold| Self::Below(*threshold))
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Below(threshold) => write!(f, "{threshold}"),
            Self::OverMax => f.write_str("OVER_MAX"),
        }
    }
}

impl Serialize for Grade {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Items counted per grade, with the distinct tubes they were found on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeTube {
    pub number: usize,
    thresholds: Vec<i64>,
    data: BTreeMap<Grade, usize>,
    tubes: BTreeMap<Grade, BTreeSet<usize>>,
}

impl GradeTube {
    /// Starts every bucket, the overflow one included, at zero.
    pub fn new(thresholds: impl IntoIterator<Item = i64>) -> Self {
        let thresholds: Vec<i64> = thresholds.into_iter().collect();
        let grades = thresholds
            .iter()
            .map(|threshold| Grade::Below(*threshold))
            .chain([Grade::OverMax]);
        Self {
            number: 0,
            data: grades.clone().map(|grade| (grade, 0)).collect(),
            tubes: grades.map(|grade| (grade, BTreeSet::new())).collect(),
            thresholds,
        }
    }

    pub fn thresholds(&self) -> &[i64] {
        &self.thresholds
    }

    /// Counts `value` found on tube `tube` and returns its grade.
    pub fn add(&mut self, value: f64, tube: usize) -> Grade {
        let grade = Grade::of(value, &self.thresholds);
        self.number += 1;
        *self.data.entry(grade).or_default() += 1;
        self.tubes.entry(grade).or_default().insert(tube);
        grade
    }

    pub fn count(&self, grade: Grade) -> usize {
        self.data.get(&grade).copied().unwrap_or(0)
    }

    pub fn pipes_with_grade(&self, grade: Grade) -> usize {
        self.tubes.get(&grade).map_or(0, BTreeSet::len)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Grade, usize)> + '_ {
        self.data.iter().map(|(grade, count)| (*grade, *count))
    }
}

impl fmt::Display for GradeTube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "total_num: {}", self.number)?;
        for (grade, count) in self.iter() {
            write!(f, "\n{grade} num: {count} tubes: {}", self.pipes_with_grade(grade))?;
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct GradeEntry {
    grade: Grade,
    number: usize,
    tubes: usize,
}

impl Serialize for GradeTube {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let grades: Vec<GradeEntry> = self
            .iter()
            .map(|(grade, number)| GradeEntry {
                grade,
                number,
                tubes: self.pipes_with_grade(grade),
            })
            .collect();
        let mut state = serializer.serialize_struct("GradeTube", 2)?;
        state.serialize_field("number", &self.number)?;
        state.serialize_field("grades", &grades)?;
        state.end()
    }
}

/// Metal loss defects by depth percent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepthGrades {
    pub grades: GradeTube,
    /// Deepest metal loss seen, in percent.
    pub max_percent: f64,
}

impl Default for DepthGrades {
    fn default() -> Self {
        Self::new(DEPTH_GRADES)
    }
}

impl DepthGrades {
    pub fn new(thresholds: impl IntoIterator<Item = i64>) -> Self {
        Self {
            grades: GradeTube::new(thresholds),
            max_percent: 0.0,
        }
    }

    pub fn add(&mut self, defect: &Defect<'_>) -> Grade {
        let percent = defect.depth_percent().unwrap_or(0.0);
        self.max_percent = self.max_percent.max(percent);
        self.grades.add(percent, defect.tube.auto_number)
    }
}

impl fmt::Display for DepthGrades {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\nmax_percent: {}", self.grades, self.max_percent)
    }
}

/// Dents by depth in percent of the tube diameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DentGrades {
    pub grades: GradeTube,
}

impl Default for DentGrades {
    fn default() -> Self {
        Self::new(DENT_GRADES)
    }
}

impl DentGrades {
    pub fn new(thresholds: impl IntoIterator<Item = i64>) -> Self {
        Self {
            grades: GradeTube::new(thresholds),
        }
    }

    pub fn add(&mut self, defect: &Defect<'_>) -> Grade {
        self.grades
            .add(defect.depth_percent().unwrap_or(0.0), defect.tube.auto_number)
    }
}

impl fmt::Display for DentGrades {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.grades, f)
    }
}

/// Defects by distance, bucketed at fixed points.
///
/// The buckets are either equal parts of the pipeline or the segments that
/// end at each valve; valve buckets carry the valve's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistanceGrades {
    pub grades: GradeTube,
    pub names: BTreeMap<i64, String>,
}

impl DistanceGrades {
    /// `parts` buckets of equal length covering `start..start + length`.
    pub fn equal_parts(start: i64, length: i64, parts: usize) -> Self {
        let parts = parts.max(1);
        let part_length = length / parts as i64;
        let thresholds = (1..=parts as i64).map(|part| start + part * part_length);
        Self {
            grades: GradeTube::new(thresholds),
            names: BTreeMap::new(),
        }
    }

    /// One bucket per valve, ending at the valve.
    pub fn valves<'r>(markers: impl IntoIterator<Item = &'r Record>, schema: &Schema) -> Self {
        let mut names = BTreeMap::new();
        for marker in markers.into_iter().filter(|marker| schema.is_valve(marker)) {
            let name = if marker.name.is_empty() {
                marker.code_text.clone()
            } else {
                marker.name.clone()
            };
            names.insert(marker.dist, name);
        }
        Self {
            grades: GradeTube::new(names.keys().copied()),
            names,
        }
    }

    pub fn add(&mut self, dist: i64, tube: usize) -> Grade {
        self.grades.add(dist as f64, tube)
    }

    /// Name of the valve closing the bucket, if any.
    pub fn name(&self, grade: Grade) -> Option<&str> {
        match grade {
            Grade::Below(dist) => self.names.get(&dist).map(String::as_str),
            Grade::OverMax => None,
        }
    }
}

impl fmt::Display for DistanceGrades {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "total_num: {}", self.grades.number)?;
        for (grade, count) in self.grades.iter() {
            match self.name(grade) {
                Some(name) => write!(f, "\n{grade} ({name}) num: {count}")?,
                None => write!(f, "\n{grade} num: {count}")?,
            }
        }
        Ok(())
    }
}
