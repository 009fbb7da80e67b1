//! Piecewise-linear distance remapping.
//!
//! A [`DistanceTable`] pairs distances measured by the inspection tool with
//! corrected distances (for example from a field survey). Positions between
//! two nodes are interpolated; positions outside the table keep their
//! offset from the nearest end node.

use std::io::Read;
use std::path::Path;

use pipeline_model::Numeric;

use crate::error::{CsvError, Result};

/// Sorted `(original, new)` distance pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceTable {
    nodes: Vec<(i64, i64)>,
}

impl DistanceTable {
    /// Sorts the nodes by original distance. At least two nodes with distinct
    /// original distances are required.
    pub fn new(nodes: impl IntoIterator<Item = (i64, i64)>) -> Result<Self> {
        let mut nodes: Vec<(i64, i64)> = nodes.into_iter().collect();
        nodes.sort_unstable();
        if nodes.len() < 2 {
            return Err(CsvError::InvalidTable {
                reason: format!("need at least two nodes, got {}", nodes.len()),
            });
        }
        if let Some(pair) = nodes.windows(2).find(|pair| pair[0].0 == pair[1].0) {
            return Err(CsvError::InvalidTable {
                reason: format!("duplicate node at {}", pair[0].0),
            });
        }
        Ok(Self { nodes })
    }

    /// Reads a two-column table with one header row.
    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut nodes = Vec::new();
        for row in reader.records() {
            let row = row?;
            if row.iter().all(str::is_empty) {
                continue;
            }
            let line = row.position().map_or(0, csv::Position::line);
            let cell = |index: usize| {
                row.get(index)
                    .and_then(|text| text.parse::<i64>().ok())
                    .ok_or_else(|| CsvError::InvalidTable {
                        reason: format!("line {line}: expected two integer distances"),
                    })
            };
            nodes.push((cell(0)?, cell(1)?));
        }
        Self::new(nodes)
    }

    pub fn load(path: &Path, delimiter: u8) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|source| CsvError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_reader(file, delimiter)?;
        tracing::debug!(path = %path.display(), nodes = table.nodes.len(), "loaded distance table");
        Ok(table)
    }

    pub fn nodes(&self) -> &[(i64, i64)] {
        &self.nodes
    }

    /// Original distance of the first node.
    pub fn first_node(&self) -> i64 {
        self.nodes[0].0
    }
}

/// Maps `pos` through the table, starting the segment search at `cursor`.
///
/// Returns the advanced cursor with the new position. The cursor only moves
/// forward, so feeding positions in ascending order visits each segment once.
pub fn remap_distance(pos: i64, table: &DistanceTable, cursor: usize) -> (usize, i64) {
    let nodes = table.nodes();
    let last_segment = nodes.len() - 2;
    let mut cursor = cursor.min(last_segment);
    while pos > nodes[cursor + 1].0 && cursor < last_segment {
        cursor += 1;
    }
    let (left, new_left) = nodes[cursor];
    let (right, new_right) = nodes[cursor + 1];

    let mapped = if pos <= left {
        new_left - (left - pos)
    } else if pos >= right {
        new_right + (pos - right)
    } else {
        // halves round to even
        let offset = (pos - left) as f64 * (new_right - new_left) as f64 / (right - left) as f64;
        (offset + new_left as f64).round_ties_even() as i64
    };
    (cursor, mapped)
}

/// Maps the extent `pos..pos + length`. The cursor is not advanced.
pub fn remap_length(pos: i64, length: i64, table: &DistanceTable, cursor: usize) -> i64 {
    if length == 0 {
        return 0;
    }
    let (_, start) = remap_distance(pos, table, cursor);
    let (_, end) = remap_distance(pos + length, table, cursor);
    end - start
}

/// Like [`remap_distance`] for a cell; non-integer cells pass through.
pub fn remap_numeric(value: &Numeric, table: &DistanceTable, cursor: usize) -> (usize, Numeric) {
    match value {
        Numeric::Int(pos) => {
            let (cursor, mapped) = remap_distance(*pos, table, cursor);
            (cursor, Numeric::Int(mapped))
        }
        other => (cursor, other.clone()),
    }
}

/// Like [`remap_length`] for a cell; non-integer cells pass through.
pub fn remap_numeric_length(
    pos: i64,
    length: &Numeric,
    table: &DistanceTable,
    cursor: usize,
) -> Numeric {
    match length {
        Numeric::Int(length) => Numeric::Int(remap_length(pos, *length, table, cursor)),
        other => other.clone(),
    }
}
