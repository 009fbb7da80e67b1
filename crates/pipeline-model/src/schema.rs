//! Schema profiles: display names and classification tables.
//!
//! Different inspection vendors label the same object codes differently and
//! disagree on which defect codes count as metal loss, dents and so on. A
//! [`Schema`] carries those tables as data. The empty schema knows no
//! defect or marker codes, so nothing classifies and the typed defect and
//! marker constructors reject every code.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{ModelError, Result};
use crate::kinds::{ObjectClass, SeamType};
use crate::record::Record;

/// Embedded Inspection Viewer profile.
pub const OEGIV_PROFILE: &str = include_str!("../profiles/oegiv.toml");

/// Profiles compiled into the crate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Profile {
    /// No names and no classification.
    #[default]
    Empty,
    /// Inspection Viewer labels (windows-1251 tables).
    Oegiv,
}

impl Profile {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Oegiv => "oegiv",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "empty" | "none" => Ok(Self::Empty),
            "oegiv" | "iv" => Ok(Self::Oegiv),
            other => Err(format!("unknown profile '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct ProfileFile {
    name: String,
    objects: ObjectNames,
    seams: Vec<CodeName>,
    defects: Vec<CodeName>,
    markers: Vec<CodeName>,
    classes: Classes,
    reverse: ReverseTables,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct ObjectNames {
    weld: Option<String>,
    thickness: Option<String>,
    category: Option<String>,
    diameter: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CodeName {
    code: i64,
    name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct Classes {
    default_markers: Vec<i64>,
    valves: Vec<i64>,
    metal_loss: Vec<i64>,
    dents: Vec<i64>,
    at_weld: Vec<i64>,
    at_seam: Vec<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct ReverseTables {
    markers: Vec<[i64; 2]>,
    comments: Vec<[String; 2]>,
}

/// Names and classification tables for one table dialect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    pub name: String,
    object_names: BTreeMap<i64, String>,
    seam_names: BTreeMap<i64, String>,
    defect_names: BTreeMap<i64, String>,
    marker_names: BTreeMap<i64, String>,
    default_markers: BTreeSet<i64>,
    valves: BTreeSet<i64>,
    metal_loss: BTreeSet<i64>,
    dents: BTreeSet<i64>,
    at_weld: BTreeSet<i64>,
    at_seam: BTreeSet<i64>,
    marker_reverse: BTreeMap<i64, i64>,
    comment_reverse: Vec<(String, String)>,
}

impl From<ProfileFile> for Schema {
    fn from(file: ProfileFile) -> Self {
        let object_names = [
            (ObjectClass::Weld, file.objects.weld),
            (ObjectClass::Thickness, file.objects.thickness),
            (ObjectClass::Category, file.objects.category),
            (ObjectClass::Diameter, file.objects.diameter),
        ]
        .into_iter()
        .filter_map(|(kind, name)| name.map(|name| (kind.code(), name)))
        .collect();
        let names = |entries: Vec<CodeName>| {
            entries
                .into_iter()
                .map(|entry| (entry.code, entry.name))
                .collect::<BTreeMap<_, _>>()
        };
        let mut marker_reverse = BTreeMap::new();
        for [from, to] in file.reverse.markers {
            marker_reverse.insert(from, to);
            marker_reverse.insert(to, from);
        }
        Self {
            name: file.name,
            object_names,
            seam_names: names(file.seams),
            defect_names: names(file.defects),
            marker_names: names(file.markers),
            default_markers: file.classes.default_markers.into_iter().collect(),
            valves: file.classes.valves.into_iter().collect(),
            metal_loss: file.classes.metal_loss.into_iter().collect(),
            dents: file.classes.dents.into_iter().collect(),
            at_weld: file.classes.at_weld.into_iter().collect(),
            at_seam: file.classes.at_seam.into_iter().collect(),
            marker_reverse,
            comment_reverse: file
                .reverse
                .comments
                .into_iter()
                .map(|[from, to]| (from, to))
                .collect(),
        }
    }
}

impl Schema {
    /// Loads one of the embedded profiles.
    pub fn builtin(profile: Profile) -> Result<Self> {
        match profile {
            Profile::Empty => Ok(Self::default()),
            Profile::Oegiv => Self::from_toml_str(OEGIV_PROFILE),
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: ProfileFile =
            toml::from_str(text).map_err(|source| ModelError::ProfileParse { source })?;
        Ok(file.into())
    }

    /// Reads a profile from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ModelError::ProfileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let schema = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), profile = %schema.name, "loaded schema profile");
        Ok(schema)
    }

    /// Display name of a common object (weld, thickness, ...); empty if unknown.
    pub fn name_object(&self, kind: ObjectClass) -> &str {
        self.object_names
            .get(&kind.code())
            .map_or("", String::as_str)
    }

    pub fn name_seam(&self, seam: SeamType) -> &str {
        self.seam_names.get(&seam.code()).map_or("", String::as_str)
    }

    pub fn defect_name(&self, code: i64) -> Option<&str> {
        self.defect_names.get(&code).map(String::as_str)
    }

    pub fn marker_name(&self, code: i64) -> Option<&str> {
        self.marker_names.get(&code).map(String::as_str)
    }

    pub fn defect_codes(&self) -> impl Iterator<Item = (i64, &str)> {
        self.defect_names
            .iter()
            .map(|(code, name)| (*code, name.as_str()))
    }

    pub fn marker_codes(&self) -> impl Iterator<Item = (i64, &str)> {
        self.marker_names
            .iter()
            .map(|(code, name)| (*code, name.as_str()))
    }

    /// Marker codes flagged as navigation markers when created.
    pub fn default_markers(&self) -> &BTreeSet<i64> {
        &self.default_markers
    }

    /// Marker code seen from the opposite survey direction.
    pub fn reverse_marker(&self, code: i64) -> i64 {
        self.marker_reverse.get(&code).copied().unwrap_or(code)
    }

    pub fn marker_reverse_len(&self) -> usize {
        self.marker_reverse.len()
    }

    /// Rewrites the first matching comment fragment for the reversed survey.
    pub fn reverse_comment(&self, comment: &str) -> Option<String> {
        self.comment_reverse
            .iter()
            .find(|(from, _)| comment.contains(from.as_str()))
            .map(|(from, to)| comment.replace(from.as_str(), to))
    }

    pub fn is_metal_loss(&self, record: &Record) -> bool {
        record.is_defect() && self.metal_loss.contains(&record.code)
    }

    pub fn is_dent(&self, record: &Record) -> bool {
        record.is_defect() && self.dents.contains(&record.code)
    }

    /// Defect located on a girth weld.
    pub fn is_at_weld(&self, record: &Record) -> bool {
        record.is_defect() && self.at_weld.contains(&record.code)
    }

    /// Defect located on a longitudinal or spiral seam.
    pub fn is_at_seam(&self, record: &Record) -> bool {
        record.is_defect() && self.at_seam.contains(&record.code)
    }

    pub fn is_valve(&self, record: &Record) -> bool {
        record.is_marker_object() && self.valves.contains(&record.code)
    }
}
