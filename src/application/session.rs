//! The editing session for one loaded table.
//!
//! A [`Session`] is created when a file loads successfully, is mutated by
//! each interaction handler, and is dropped when the program exits or another
//! file is loaded over it. It owns the table together with the filter
//! criteria, the subview they select and the cursor into that subview.
//! Every criteria change recomputes the subview and clamps the cursor.

use crate::domain::{
    apply, Choice, CommentSet, CommentTag, Cursor, Evaluation, FilterCriteria, FilterOptions,
    FilteredStats, LoadReport, Record, RecordTable, RowEditor, Status, Subview, TableStats,
};

#[derive(Debug, Clone)]
pub struct Session {
    table: RecordTable,
    criteria: FilterCriteria,
    subview: Subview,
    options: FilterOptions,
    cursor: Cursor,
    source: String,
    report: LoadReport,
}

impl Session {
    pub fn new(table: RecordTable, source: impl Into<String>) -> Self {
        Self::with_report(table, LoadReport::default(), source)
    }

    pub fn with_report(table: RecordTable, report: LoadReport, source: impl Into<String>) -> Self {
        let criteria = FilterCriteria::default();
        let subview = apply(&table, &criteria);
        let options = FilterOptions::from_table(&table);
        Self {
            table,
            criteria,
            subview,
            options,
            cursor: Cursor::default(),
            source: source.into(),
            report,
        }
    }

    pub fn table(&self) -> &RecordTable {
        &self.table
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn subview(&self) -> &Subview {
        &self.subview
    }

    pub fn filter_options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    /// Cursor position, clamped to the current subview.
    pub fn position(&self) -> usize {
        self.cursor.clamped(self.subview.len())
    }

    /// The displayed record, or `None` when no record passes the filters.
    pub fn current(&self) -> Option<&Record> {
        self.subview.get(&self.table, self.position())
    }

    pub fn set_activity(&mut self, choice: Choice) {
        self.criteria.activity = choice;
        self.refresh();
    }

    pub fn set_price_level(&mut self, choice: Choice) {
        self.criteria.price_level = choice;
        self.refresh();
    }

    pub fn set_city(&mut self, choice: Choice) {
        self.criteria.city = choice;
        self.refresh();
    }

    pub fn set_tag(&mut self, choice: Choice) {
        self.criteria.tag = choice;
        self.refresh();
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.criteria.search = search.into();
        self.refresh();
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.refresh();
    }

    fn refresh(&mut self) {
        self.subview = apply(&self.table, &self.criteria);
        self.cursor.clamp(self.subview.len());
        log::debug!(
            "filter {:?} -> {} of {} records",
            self.criteria,
            self.subview.len(),
            self.table.len()
        );
    }

    pub fn previous(&mut self) {
        self.cursor.clamp(self.subview.len());
        self.cursor.previous();
    }

    pub fn next(&mut self) {
        self.cursor.clamp(self.subview.len());
        self.cursor.next(self.subview.len());
    }

    /// Clears the search text and returns to the first record.
    pub fn reset_filter(&mut self) {
        self.criteria.search.clear();
        self.cursor.reset();
        self.refresh();
    }

    fn editor(&mut self) -> Option<RowEditor<'_>> {
        let id = self.current()?.id;
        Some(RowEditor::new(&mut self.table, id))
    }

    pub fn toggle_verified(&mut self) -> Option<Status> {
        self.editor()?.toggle_verified()
    }

    pub fn set_evaluation(&mut self, evaluation: Evaluation) -> bool {
        self.editor().is_some_and(|mut e| e.set_evaluation(evaluation))
    }

    pub fn set_comments(&mut self, comments: &CommentSet) -> bool {
        self.editor().is_some_and(|mut e| e.set_comments(comments))
    }

    pub fn toggle_comment(&mut self, tag: CommentTag) -> Option<CommentSet> {
        self.editor()?.toggle_comment(tag)
    }

    pub fn stats(&self) -> TableStats {
        TableStats::compute(&self.table)
    }

    pub fn filtered_stats(&self) -> FilteredStats {
        FilteredStats::compute(&self.table, &self.subview)
    }
}
