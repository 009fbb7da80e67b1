use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tracing::{info, info_span};

use pipeline_csv::{CsvFile, CsvOptions, DistanceTable, JoinItem, Tube, Warning};
use pipeline_model::Schema;
use pipeline_stats::Totals;

use crate::cli::{JoinArgs, RemapArgs, ReportArgs, ReverseArgs, UniqueArgs};
use crate::config::Settings;
use crate::summary::{render_stats, render_tubes};

/// Resolved table dialect and schema shared by every command.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub options: CsvOptions,
    pub default_diameter: Option<i64>,
    pub schema: Schema,
}

impl RunContext {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self {
            options: settings.csv_options()?,
            default_diameter: settings.csv.default_diameter,
            schema: settings.schema()?,
        })
    }

    pub fn load(&self, path: &Path) -> Result<CsvFile> {
        let file = CsvFile::from_path(path, self.options)
            .with_context(|| format!("load {}", path.display()))?;
        Ok(file.with_default_diameter(self.default_diameter))
    }

    fn save(&self, file: &CsvFile, path: &Path) -> Result<()> {
        file.to_path(path)
            .with_context(|| format!("write {}", path.display()))
    }
}

pub fn run_reverse(args: &ReverseArgs, context: &RunContext) -> Result<()> {
    let span = info_span!("reverse", input = %args.input.display());
    let _guard = span.enter();
    let mut file = context.load(&args.input)?;
    file.reverse(&context.schema);
    context.save(&file, &args.output)
}

/// One element of the `join` argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinArg {
    Gap(i64),
    Table(PathBuf),
}

impl JoinArg {
    /// Integers are gaps, anything else a table path.
    pub fn parse(item: &str) -> Result<Self> {
        match item.trim().parse::<i64>() {
            Ok(gap) if gap < 0 => bail!("negative gap {gap}"),
            Ok(gap) => Ok(Self::Gap(gap)),
            Err(_) => Ok(Self::Table(PathBuf::from(item))),
        }
    }
}

pub fn run_join(args: &JoinArgs, context: &RunContext) -> Result<()> {
    let span = info_span!("join", items = args.items.len());
    let _guard = span.enter();
    let mut items = Vec::with_capacity(args.items.len());
    for item in &args.items {
        items.push(match JoinArg::parse(item)? {
            JoinArg::Gap(gap) => JoinItem::Gap(gap),
            JoinArg::Table(path) => JoinItem::File(context.load(&path)?),
        });
    }
    let mut file = CsvFile::new(context.options).with_default_diameter(context.default_diameter);
    file.join(items);
    context.save(&file, &args.output)
}

pub fn run_remap(args: &RemapArgs, context: &RunContext) -> Result<()> {
    let span = info_span!("remap", input = %args.input.display());
    let _guard = span.enter();
    let table = DistanceTable::load(&args.table, context.options.delimiter)
        .with_context(|| format!("load distance table {}", args.table.display()))?;
    let mut file = context.load(&args.input)?;
    file.distance_modify(&table)?;
    info!(nodes = table.nodes().len(), "remapped distances");
    context.save(&file, &args.output)
}

/// Returns how many records were moved.
pub fn run_unique(args: &UniqueArgs, context: &RunContext) -> Result<usize> {
    let mut file = context.load(&args.input)?;
    let shifted = file.make_distances_unique(args.shift)?;
    info!(shifted, "separated records sharing a distance");
    context.save(&file, &args.output)?;
    Ok(shifted)
}

/// Tube listing row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TubeRow {
    pub number: String,
    pub auto_number: usize,
    pub start: i64,
    pub length: Option<i64>,
    pub thickness: Option<i64>,
    pub thickness_change: bool,
    pub category: Option<String>,
    pub category_change: bool,
    pub diameter: Option<i64>,
    pub diameter_change: bool,
    pub seam: String,
    pub defects: usize,
    pub features: String,
}

impl TubeRow {
    pub fn new(tube: &Tube<'_>, schema: &Schema) -> Self {
        Self {
            number: tube.number(),
            auto_number: tube.auto_number,
            start: tube.start,
            length: tube.length,
            thickness: tube.thickness,
            thickness_change: tube.is_thickness_change,
            category: tube.category.clone(),
            category_change: tube.is_category_change,
            diameter: tube.diameter,
            diameter_change: tube.is_diameter_change,
            seam: tube.seam_info(),
            defects: tube.defects.len(),
            features: tube.summary(schema),
        }
    }
}

pub fn tube_rows(
    file: &CsvFile,
    schema: &Schema,
    warnings: Option<&mut Vec<Warning>>,
) -> Result<Vec<TubeRow>> {
    let mut rows = Vec::new();
    for tube in file.tubes(warnings) {
        rows.push(TubeRow::new(&tube?, schema));
    }
    Ok(rows)
}

/// Renders the tube listing as a table or JSON.
pub fn run_tubes(args: &ReportArgs, context: &RunContext) -> Result<String> {
    let file = context.load(&args.input)?;
    let rows = tube_rows(&file, &context.schema, None)?;
    if args.json {
        return serde_json::to_string_pretty(&rows).context("serialize tubes");
    }
    Ok(render_tubes(&rows))
}

/// Renders table statistics as tables or JSON.
pub fn run_stats(args: &ReportArgs, context: &RunContext) -> Result<String> {
    let span = info_span!("stats", input = %args.input.display());
    let _guard = span.enter();
    let file = context.load(&args.input)?;
    let mut warnings = Vec::new();
    let totals = Totals::fill(&file, &context.schema, Some(&mut warnings))?;
    if args.json {
        return serde_json::to_string_pretty(&totals).context("serialize statistics");
    }
    Ok(render_stats(&totals, &context.schema, warnings.len()))
}
