//! The in-memory record table and its load-time normalization.
//!
//! A [`RecordTable`] is built once from a [`RawSheet`] (the header row plus
//! data rows of the first worksheet). Normalization happens in a single pass:
//! identities are assigned, missing cells become [`SENTINEL`], and absent
//! schema columns are synthesized. After that the schema is closed and the
//! only mutation is [`RecordTable::set`].

use super::models::{Field, FieldValue, Record, RecordId, SENTINEL};
use std::borrow::Cow;
use std::collections::HashSet;

/// Untyped grid read from a spreadsheet. `None` marks an empty cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

/// A column of the table layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Field(Field),
    /// Index into the table's extra headers.
    Extra(usize),
}

/// What normalization had to fill in while loading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub synthesized: Vec<&'static str>,
    pub normalized_cells: usize,
    pub skipped_rows: usize,
}

#[derive(Debug, Clone, Default)]
pub struct RecordTable {
    records: Vec<Record>,
    columns: Vec<Column>,
    extra_headers: Vec<String>,
}

impl RecordTable {
    /// Builds a table from a raw sheet, enriching every row.
    pub fn from_sheet(sheet: RawSheet) -> (Self, LoadReport) {
        let mut report = LoadReport::default();
        let headers = unique_headers(&sheet.headers);

        let mut columns = Vec::with_capacity(headers.len() + 4);
        let mut extra_headers = Vec::new();
        for header in &headers {
            match Field::from_header(header) {
                Some(field) => columns.push(Column::Field(field)),
                None => {
                    columns.push(Column::Extra(extra_headers.len()));
                    extra_headers.push(header.clone());
                }
            }
        }
        let source_columns = columns.clone();

        if !columns.contains(&Column::Field(Field::Id)) {
            columns.insert(0, Column::Field(Field::Id));
        }
        for field in Field::canonical() {
            if !columns.contains(&Column::Field(field)) {
                log::warn!("column `{}` missing from source, filling with {SENTINEL:?}", field.header());
                columns.push(Column::Field(field));
                if matches!(field, Field::Text(_)) {
                    report.synthesized.push(field.header());
                }
            }
        }

        let mut records = Vec::with_capacity(sheet.rows.len());
        for row in sheet.rows {
            if row.iter().all(Option::is_none) {
                report.skipped_rows += 1;
                continue;
            }

            let mut record = Record::blank(RecordId(records.len() + 1));
            record.extra = vec![SENTINEL.to_string(); extra_headers.len()];

            for (index, column) in source_columns.iter().enumerate() {
                let value = match row.get(index).and_then(|c| c.as_deref()) {
                    Some(value) if !value.trim().is_empty() => value.to_string(),
                    _ => {
                        report.normalized_cells += 1;
                        SENTINEL.to_string()
                    }
                };
                match *column {
                    Column::Field(Field::Id) => {}
                    Column::Field(Field::Text(text)) => *record.text_mut(text) = value,
                    Column::Field(Field::Status) => record.status = value,
                    Column::Field(Field::Evaluation) => record.evaluation = value,
                    Column::Field(Field::Comment) => record.comment = value,
                    Column::Extra(extra) => record.extra[extra] = value,
                }
            }
            records.push(record);
        }

        log::debug!(
            "normalized {} empty cells, skipped {} blank rows",
            report.normalized_cells,
            report.skipped_rows
        );

        (Self { records, columns, extra_headers }, report)
    }

    /// Builds a table from records directly, with the canonical layout.
    pub fn from_records(records: Vec<Record>) -> Self {
        let columns = std::iter::once(Field::Id)
            .chain(Field::canonical())
            .map(Column::Field)
            .collect();
        let records = records
            .into_iter()
            .enumerate()
            .map(|(index, mut record)| {
                record.id = RecordId(index + 1);
                record.extra.clear();
                record
            })
            .collect();
        Self { records, columns, extra_headers: Vec::new() }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn header(&self, column: Column) -> &str {
        match column {
            Column::Field(field) => field.header(),
            Column::Extra(index) => &self.extra_headers[index],
        }
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(|c| self.header(*c))
    }

    pub fn cell<'a>(&self, record: &'a Record, column: Column) -> Cow<'a, str> {
        match column {
            Column::Field(field) => record.value(field),
            Column::Extra(index) => Cow::Borrowed(
                record.extra.get(index).map(String::as_str).unwrap_or(SENTINEL),
            ),
        }
    }

    fn index_of(&self, id: RecordId) -> Option<usize> {
        let guess = id.0.checked_sub(1)?;
        match self.records.get(guess) {
            Some(record) if record.id == id => Some(guess),
            _ => self.records.iter().position(|r| r.id == id),
        }
    }

    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.index_of(id).map(|i| &self.records[i])
    }

    /// Replaces one field on the record with `id`.
    ///
    /// Returns `false` and leaves the table untouched when no record has that identity.
    pub fn set(&mut self, id: RecordId, value: FieldValue) -> bool {
        match self.index_of(id) {
            Some(index) => {
                log::debug!("record {id}: {value:?}");
                self.records[index].apply(value);
                true
            }
            None => {
                log::debug!("write-back to unknown record {id} ignored");
                false
            }
        }
    }
}

/// Names blank headers `Unnamed: <index>` and suffixes duplicates with `.<n>`.
fn unique_headers(headers: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            let base = if header.trim().is_empty() {
                format!("Unnamed: {index}")
            } else {
                header.clone()
            };
            let mut name = base.clone();
            let mut n = 1;
            while !seen.insert(name.clone()) {
                name = format!("{base}.{n}");
                n += 1;
            }
            name
        })
        .collect()
}
