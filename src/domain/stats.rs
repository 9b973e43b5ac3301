use super::filter::{distinct, Subview};
use super::models::Record;
use super::table::RecordTable;

/// Summary counts over the whole table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableStats {
    pub total: usize,
    pub unique_activities: usize,
    pub unique_cities: usize,
    /// `(price level, count)`, most frequent first, ties in first-appearance order.
    pub price_distribution: Vec<(String, usize)>,
}

/// Summary counts over the current subview.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredStats {
    pub total: usize,
    pub unique_activities: usize,
    pub unique_cities: usize,
}

impl TableStats {
    pub fn compute(table: &RecordTable) -> Self {
        let records = table.records();
        let mut price_distribution: Vec<(String, usize)> = Vec::new();
        for record in records {
            match price_distribution.iter_mut().find(|(p, _)| *p == record.price_level) {
                Some((_, count)) => *count += 1,
                None => price_distribution.push((record.price_level.clone(), 1)),
            }
        }
        // stable sort keeps first-appearance order among equal counts
        price_distribution.sort_by(|a, b| b.1.cmp(&a.1));

        Self {
            total: records.len(),
            unique_activities: count_distinct(records.iter(), |r| &r.activity),
            unique_cities: count_distinct(records.iter(), |r| &r.city),
            price_distribution,
        }
    }
}

impl FilteredStats {
    pub fn compute(table: &RecordTable, view: &Subview) -> Self {
        Self {
            total: view.len(),
            unique_activities: count_distinct(view.records(table), |r| &r.activity),
            unique_cities: count_distinct(view.records(table), |r| &r.city),
        }
    }
}

fn count_distinct<'a>(
    records: impl Iterator<Item = &'a Record>,
    key: impl Fn(&'a Record) -> &'a String,
) -> usize {
    distinct(records.map(|r| key(r).as_str())).len()
}
