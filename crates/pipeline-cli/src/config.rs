//! Settings file and command-line overrides.
//!
//! ```toml
//! [csv]
//! delimiter = ";"
//! encoding = "windows-1251"
//! float_delimiter = "comma"
//! default_diameter = 1420
//!
//! [schema]
//! profile = "oegiv"
//! # or: path = "profiles/vendor.toml"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use pipeline_csv::{CsvOptions, FloatDelimiter};
use pipeline_model::{Profile, Schema};

use crate::cli::{FloatDelimiterArg, TableArgs};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub csv: CsvSettings,
    pub schema: SchemaSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CsvSettings {
    pub delimiter: Option<char>,
    pub encoding: Option<String>,
    pub float_delimiter: Option<FloatDelimiterSetting>,
    pub default_diameter: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloatDelimiterSetting {
    Point,
    Comma,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchemaSettings {
    pub profile: Option<String>,
    pub path: Option<PathBuf>,
}

impl Settings {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("parse settings")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read settings {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Reads `--config` when given and applies the remaining flags on top.
    pub fn resolve(args: &TableArgs) -> Result<Self> {
        let mut settings = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        settings.apply(args);
        Ok(settings)
    }

    pub fn apply(&mut self, args: &TableArgs) {
        if let Some(delimiter) = args.delimiter {
            self.csv.delimiter = Some(delimiter);
        }
        if let Some(encoding) = &args.encoding {
            self.csv.encoding = Some(encoding.clone());
        }
        if let Some(float_delimiter) = args.float_delimiter {
            self.csv.float_delimiter = Some(match float_delimiter {
                FloatDelimiterArg::Point => FloatDelimiterSetting::Point,
                FloatDelimiterArg::Comma => FloatDelimiterSetting::Comma,
            });
        }
        if let Some(diameter) = args.default_diameter {
            self.csv.default_diameter = Some(diameter);
        }
        // A profile flag replaces a schema path from the file and vice versa.
        if let Some(profile) = &args.profile {
            self.schema = SchemaSettings {
                profile: Some(profile.clone()),
                path: None,
            };
        }
        if let Some(path) = &args.schema {
            self.schema = SchemaSettings {
                profile: None,
                path: Some(path.clone()),
            };
        }
    }

    pub fn csv_options(&self) -> Result<CsvOptions> {
        let mut options = CsvOptions::default();
        if let Some(delimiter) = self.csv.delimiter {
            if !delimiter.is_ascii() {
                bail!("delimiter '{delimiter}' is not an ASCII character");
            }
            options = options.with_delimiter(delimiter as u8);
        }
        if let Some(label) = &self.csv.encoding {
            options = options.with_encoding_label(label)?;
        }
        if let Some(float_delimiter) = self.csv.float_delimiter {
            options = options.with_float_delimiter(match float_delimiter {
                FloatDelimiterSetting::Point => FloatDelimiter::Point,
                FloatDelimiterSetting::Comma => FloatDelimiter::Comma,
            });
        }
        Ok(options)
    }

    /// The profile file, the named built-in profile, or the Inspection
    /// Viewer profile when neither is set.
    pub fn schema(&self) -> Result<Schema> {
        if let Some(path) = &self.schema.path {
            return Schema::load(path).with_context(|| format!("load schema {}", path.display()));
        }
        let profile = match &self.schema.profile {
            Some(name) => name.parse::<Profile>().map_err(anyhow::Error::msg)?,
            None => Profile::Oegiv,
        };
        Schema::builtin(profile).with_context(|| format!("load {profile} profile"))
    }
}
