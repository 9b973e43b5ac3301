//! Row filtering over the record table.
//!
//! [`apply`] is a pure function of the table and the criteria: it never
//! reorders records and never fails. An empty [`Subview`] is ordinary output.

use super::models::{Record, ALL, PRICE_LEVELS};
use super::table::RecordTable;
use std::collections::HashSet;

/// An equality constraint on one column. `All` means no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Choice {
    #[default]
    All,
    Only(String),
}

impl Choice {
    /// Reads a picker label, treating the `All` sentinel as no constraint.
    pub fn from_label(label: &str) -> Self {
        if label == ALL { Choice::All } else { Choice::Only(label.to_string()) }
    }

    pub fn label(&self) -> &str {
        match self {
            Choice::All => ALL,
            Choice::Only(value) => value,
        }
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(expected) => expected == value,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub activity: Choice,
    pub price_level: Choice,
    pub city: Choice,
    pub tag: Choice,
    /// Case-insensitive substring searched in company or activity. Empty means no constraint.
    pub search: String,
}

impl FilterCriteria {
    pub fn is_unconstrained(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.activity.matches(&record.activity)
            && self.price_level.matches(&record.price_level)
            && self.city.matches(&record.city)
            && self.tag.matches(&record.tag)
            && matches_search(&self.search, record)
    }
}

fn matches_search(search: &str, record: &Record) -> bool {
    if search.is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    record.company.to_lowercase().contains(&needle)
        || record.activity.to_lowercase().contains(&needle)
}

/// Positions into the table of the records passing the criteria, in table order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subview {
    indices: Vec<usize>,
}

impl Subview {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn get<'a>(&self, table: &'a RecordTable, position: usize) -> Option<&'a Record> {
        self.indices
            .get(position)
            .and_then(|&index| table.records().get(index))
    }

    pub fn records<'a>(&'a self, table: &'a RecordTable) -> impl Iterator<Item = &'a Record> + 'a {
        self.indices.iter().filter_map(|&index| table.records().get(index))
    }
}

pub fn apply(table: &RecordTable, criteria: &FilterCriteria) -> Subview {
    let indices = table
        .records()
        .iter()
        .enumerate()
        .filter(|(_, record)| criteria.matches(record))
        .map(|(index, _)| index)
        .collect();
    Subview { indices }
}

/// Picker contents for each equality filter, `All` first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub activities: Vec<String>,
    pub price_levels: Vec<String>,
    pub cities: Vec<String>,
    pub tags: Vec<String>,
}

impl FilterOptions {
    pub fn from_table(table: &RecordTable) -> Self {
        let records = table.records();
        Self {
            activities: with_all(distinct(records.iter().map(|r| r.activity.as_str()))),
            price_levels: with_all(PRICE_LEVELS.iter().map(|p| p.to_string()).collect()),
            cities: with_all(distinct(records.iter().map(|r| r.city.as_str()))),
            tags: with_all(distinct(records.iter().map(|r| r.tag.as_str()))),
        }
    }
}

/// Distinct values in first-appearance order.
pub fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

fn with_all(values: Vec<String>) -> Vec<String> {
    std::iter::once(ALL.to_string()).chain(values).collect()
}
