//! Positional mapping between table rows and [`Record`]s.

use csv::StringRecord;

use pipeline_model::{
    COLUMN_COUNT, COLUMN_HEADS, GeoPoint, LEGACY_COLUMN_COUNT, Numeric, ObjectClass, Orientation,
    Record, Shoulders,
};

use crate::error::{CsvError, Result};
use crate::options::FloatDelimiter;

const TRUE_TEXT: &str = "True";
const FALSE_TEXT: &str = "False";

/// Builds a record from one data row.
pub(crate) fn record_from_row(row: &StringRecord, line: u64) -> Result<Record> {
    if row.len() < LEGACY_COLUMN_COUNT {
        return Err(CsvError::ShortRow {
            line,
            expected: LEGACY_COLUMN_COUNT,
            actual: row.len(),
        });
    }
    let cell = |index: usize| row.get(index).unwrap_or("");
    let text = |index: usize| cell(index).to_string();
    let orientation = |index: usize| {
        Orientation::from_cell(cell(index)).map_err(|error| CsvError::Parse {
            line,
            column: COLUMN_HEADS[index],
            message: error.to_string(),
        })
    };
    let object_id = Some(cell(LEGACY_COLUMN_COUNT))
        .filter(|id| !id.is_empty())
        .map(str::to_string);

    Ok(Record {
        dist: integer(cell(0), line, 0)?,
        kind: ObjectClass::from_code(integer(cell(1), line, 1)?),
        code: if cell(2).trim().is_empty() {
            0
        } else {
            integer(cell(2), line, 2)?
        },
        name: text(3),
        code_text: text(4),
        is_marker: cell(5).trim().eq_ignore_ascii_case(TRUE_TEXT) || cell(5).trim() == "1",
        length: Numeric::parse(cell(6)),
        width: Numeric::parse(cell(7)),
        depth_min: Numeric::parse(cell(8)),
        depth_max: Numeric::parse(cell(9)),
        orient1: orientation(10)?,
        orient2: orientation(11)?,
        mp_orient: orientation(12)?,
        mp_dist: Numeric::parse(cell(13)),
        side: Numeric::parse(cell(14)),
        shoulders: Shoulders {
            dist_ml: text(15),
            dist_mr: text(16),
            dist_stl: text(17),
            dist_str: text(18),
            link_stl: text(19),
            link_str: text(20),
            link_ml: text(21),
            link_mr: text(22),
        },
        comments: text(23),
        geo: GeoPoint {
            latitude: text(24),
            longitude: text(25),
            altitude: text(26),
        },
        object_id,
    })
}

/// Cells of one data row, in header order.
pub(crate) fn record_to_row(record: &Record, float_delimiter: FloatDelimiter) -> [String; COLUMN_COUNT] {
    let number = |value: &Numeric| match (value, float_delimiter) {
        (Numeric::Raw(text), FloatDelimiter::Comma) if value.as_f64().is_some() => {
            text.replace('.', ",")
        }
        _ => value.to_string(),
    };
    let orientation =
        |value: Option<Orientation>| value.map(|orientation| orientation.to_string()).unwrap_or_default();
    let shoulders = &record.shoulders;

    [
        record.dist.to_string(),
        record.kind.code().to_string(),
        record.code.to_string(),
        record.name.clone(),
        record.code_text.clone(),
        if record.is_marker { TRUE_TEXT } else { FALSE_TEXT }.to_string(),
        number(&record.length),
        number(&record.width),
        number(&record.depth_min),
        number(&record.depth_max),
        orientation(record.orient1),
        orientation(record.orient2),
        orientation(record.mp_orient),
        number(&record.mp_dist),
        number(&record.side),
        shoulders.dist_ml.clone(),
        shoulders.dist_mr.clone(),
        shoulders.dist_stl.clone(),
        shoulders.dist_str.clone(),
        shoulders.link_stl.clone(),
        shoulders.link_str.clone(),
        shoulders.link_ml.clone(),
        shoulders.link_mr.clone(),
        record.comments.clone(),
        record.geo.latitude.clone(),
        record.geo.longitude.clone(),
        record.geo.altitude.clone(),
        record.object_id.clone().unwrap_or_default(),
    ]
}

/// Integer cell; decimals are rounded.
fn integer(text: &str, line: u64, index: usize) -> Result<i64> {
    let trimmed = text.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return Ok(value);
    }
    trimmed
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .map(|value| value.round() as i64)
        .ok_or_else(|| CsvError::Parse {
            line,
            column: COLUMN_HEADS[index],
            message: format!("expected a number, got '{text}'"),
        })
}
