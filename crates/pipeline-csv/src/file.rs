//! In-memory inspection table and its whole-table transforms.

use std::collections::HashSet;
use std::path::Path;

use pipeline_model::{COLUMN_HEADS, Numeric, ObjectClass, Record, Schema};

use crate::codec;
use crate::error::{CsvError, Result};
use crate::options::CsvOptions;
use crate::remap::{self, DistanceTable};
use crate::tubes::Tubes;
use crate::warning::Warning;

/// One element of a [`CsvFile::join`].
#[derive(Debug, Clone)]
pub enum JoinItem {
    /// Gap in mm left after the current end.
    Gap(i64),
    /// Table appended after the current end.
    File(CsvFile),
}

/// Records of one inspection table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvFile {
    pub records: Vec<Record>,
    /// Diameter assumed before the first diameter record.
    pub default_diameter: Option<i64>,
    pub options: CsvOptions,
}

impl CsvFile {
    pub fn new(options: CsvOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn from_records(records: Vec<Record>, options: CsvOptions) -> Self {
        Self {
            records,
            options,
            default_diameter: None,
        }
    }

    #[must_use]
    pub fn with_default_diameter(mut self, diameter: Option<i64>) -> Self {
        self.default_diameter = diameter;
        self
    }

    /// Decodes and parses table bytes. The first row is a header and is not
    /// interpreted; blank rows are skipped.
    pub fn parse(bytes: &[u8], options: CsvOptions) -> Result<Self> {
        let (text, _, malformed) = options.encoding.decode(bytes);
        if malformed {
            tracing::warn!(
                encoding = options.encoding.name(),
                "input contains byte sequences invalid for the encoding"
            );
        }
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            if row.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }
            let line = row.position().map_or(0, csv::Position::line);
            records.push(codec::record_from_row(&row, line)?);
        }
        check_unique_ids(&records)?;
        tracing::debug!(records = records.len(), "parsed inspection table");
        Ok(Self::from_records(records, options))
    }

    pub fn from_path(path: &Path, options: CsvOptions) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|source| CsvError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&bytes, options)
    }

    /// Encodes the table: header, then persistent records by distance.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        check_unique_ids(&self.records)?;
        let mut rows: Vec<&Record> = self
            .records
            .iter()
            .filter(|record| record.kind.is_persistent())
            .collect();
        rows.sort_by_key(|record| record.dist);

        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.options.delimiter)
            .from_writer(Vec::new());
        writer.write_record(COLUMN_HEADS)?;
        for record in rows {
            writer.write_record(&codec::record_to_row(record, self.options.float_delimiter))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|error| CsvError::Io(error.into_error()))?;
        let text = String::from_utf8(bytes)
            .map_err(|error| CsvError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, error)))?;

        let (encoded, _, unmappable) = self.options.encoding.encode(&text);
        if unmappable {
            return Err(CsvError::Unencodable {
                encoding: self.options.encoding.name(),
            });
        }
        Ok(encoded.into_owned())
    }

    pub fn to_path(&self, path: &Path) -> Result<()> {
        let bytes = self.serialize()?;
        std::fs::write(path, bytes).map_err(|source| CsvError::FileWrite {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), records = self.records.len(), "wrote inspection table");
        Ok(())
    }

    /// Largest record distance; zero for an empty table.
    pub fn total_length(&self) -> i64 {
        self.records
            .iter()
            .map(|record| record.dist)
            .max()
            .unwrap_or(0)
    }

    pub fn thicknesses(&self) -> impl Iterator<Item = &Record> {
        self.records.iter().filter(|record| record.is_thickness())
    }

    pub fn categories(&self) -> impl Iterator<Item = &Record> {
        self.records.iter().filter(|record| record.is_category())
    }

    pub fn diameters(&self) -> impl Iterator<Item = &Record> {
        self.records.iter().filter(|record| record.is_diameter())
    }

    /// Tubes in distance order. See [`Tubes`].
    pub fn tubes<'a, 'w>(&'a self, warnings: Option<&'w mut Vec<Warning>>) -> Tubes<'a, 'w> {
        Tubes::new(&self.records, self.default_diameter, warnings)
    }

    /// Rewrites the table as surveyed from the other end.
    ///
    /// The last thickness, category and diameter records describe the state
    /// at the new start, so they move right behind the first weld.
    pub fn reverse(&mut self, schema: &Schema) {
        let total_length = self.total_length();
        let carried: Vec<usize> = [
            ObjectClass::Thickness,
            ObjectClass::Category,
            ObjectClass::Diameter,
        ]
        .into_iter()
        .filter_map(|kind| self.last_of(kind))
        .collect();

        for record in &mut self.records {
            record.reverse(total_length, schema);
        }
        self.records.reverse();
        tracing::info!(records = self.records.len(), total_length, "reversed table");

        if !self.records.iter().any(Record::is_weld) {
            return;
        }
        let last = self.records.len() - 1;
        let mut by_position: Vec<(usize, usize)> = carried
            .iter()
            .enumerate()
            .map(|(order, index)| (last - index, order))
            .collect();
        by_position.sort_unstable_by(|a, b| b.0.cmp(&a.0));
        let mut moved: Vec<(usize, Record)> = by_position
            .into_iter()
            .map(|(position, order)| (order, self.records.remove(position)))
            .collect();
        moved.sort_unstable_by_key(|(order, _)| *order);

        let Some(mut anchor) = self.records.iter().position(Record::is_weld) else {
            self.records.extend(moved.into_iter().map(|(_, record)| record));
            return;
        };
        let mut base = self.records[anchor].dist;
        while anchor + 1 < self.records.len() && self.records[anchor + 1].dist - base <= 1 {
            anchor += 1;
            base = self.records[anchor].dist;
        }
        for (_, mut record) in moved {
            base += 1;
            anchor += 1;
            record.dist = base;
            self.records.insert(anchor, record);
        }
    }

    /// Index of the furthest record of `kind`; the later one on ties.
    fn last_of(&self, kind: ObjectClass) -> Option<usize> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, record)| record.kind == kind)
            .max_by_key(|(_, record)| record.dist)
            .map(|(index, _)| index)
    }

    /// Appends `other` shifted to start at the current end.
    pub fn append(&mut self, other: CsvFile) {
        let offset = self.total_length();
        self.records.extend(other.records.into_iter().map(|mut record| {
            record.dist += offset;
            if let Numeric::Int(mp_dist) = record.mp_dist {
                record.mp_dist = Numeric::Int(mp_dist + offset);
            }
            record
        }));
    }

    /// Appends tables and gaps in order.
    pub fn join(&mut self, items: impl IntoIterator<Item = JoinItem>) {
        for item in items {
            match item {
                JoinItem::Gap(length) => {
                    let dist = self.total_length() + length;
                    self.records.push(Record::join_spacer(dist));
                }
                JoinItem::File(file) => self.append(file),
            }
        }
        tracing::info!(records = self.records.len(), total_length = self.total_length(), "joined tables");
    }

    /// Moves records sharing a distance forward by `shift` until every
    /// distance is unique. Returns how many records moved.
    pub fn make_distances_unique(&mut self, shift: i64) -> Result<usize> {
        if shift <= 0 {
            return Err(CsvError::InvalidShift { shift });
        }
        let mut seen = HashSet::with_capacity(self.records.len());
        let mut shifted = 0;
        for record in &mut self.records {
            if seen.contains(&record.dist) {
                shifted += 1;
                while seen.contains(&record.dist) {
                    record.dist += shift;
                }
            }
            seen.insert(record.dist);
        }
        tracing::debug!(shifted, "made distances unique");
        Ok(shifted)
    }

    /// Remaps every distance through `table`.
    ///
    /// Records are visited in distance order so the table cursor only moves
    /// forward. Defects also get their max-depth point and length remapped.
    /// Nothing is changed when a record lies before the first node.
    pub fn distance_modify(&mut self, table: &DistanceTable) -> Result<()> {
        let mut order: Vec<usize> = (0..self.records.len()).collect();
        order.sort_by_key(|index| self.records[*index].dist);

        if let Some(first) = order.first() {
            let dist = self.records[*first].dist;
            if dist < table.first_node() {
                return Err(CsvError::DistanceBeforeNode {
                    dist,
                    node: table.first_node(),
                });
            }
        }

        let mut cursor = 0;
        for index in order {
            let record = &mut self.records[index];
            if record.is_defect() {
                record.mp_dist = remap::remap_numeric(&record.mp_dist, table, cursor).1;
                record.length = remap::remap_numeric_length(record.dist, &record.length, table, cursor);
            }
            let (next, dist) = remap::remap_distance(record.dist, table, cursor);
            cursor = next;
            record.dist = dist;
        }
        tracing::info!(records = self.records.len(), nodes = table.nodes().len(), "remapped distances");
        Ok(())
    }
}

fn check_unique_ids(records: &[Record]) -> Result<()> {
    let mut seen = HashSet::new();
    for id in records
        .iter()
        .filter_map(|record| record.object_id.as_deref())
        .filter(|id| !id.is_empty())
    {
        if !seen.insert(id) {
            return Err(CsvError::DuplicateId { id: id.to_string() });
        }
    }
    Ok(())
}
