//! Per-row edits written straight through to the table.
//!
//! Every edit resolves the record by its stable identity, so the position a
//! record happens to occupy in a filtered subview never matters here.

use super::models::{CommentSet, CommentTag, Evaluation, FieldValue, RecordId, Status};
use super::table::RecordTable;

pub struct RowEditor<'a> {
    table: &'a mut RecordTable,
    id: RecordId,
}

impl<'a> RowEditor<'a> {
    pub fn new(table: &'a mut RecordTable, id: RecordId) -> Self {
        Self { table, id }
    }

    pub fn set_status(&mut self, status: Status) -> bool {
        self.table.set(self.id, FieldValue::Status(status))
    }

    /// Flips verification and returns the new status.
    pub fn toggle_verified(&mut self) -> Option<Status> {
        let status = self.table.get(self.id)?.status().toggled();
        self.set_status(status).then_some(status)
    }

    pub fn set_evaluation(&mut self, evaluation: Evaluation) -> bool {
        self.table.set(self.id, FieldValue::Evaluation(evaluation))
    }

    /// Commits the selected tags as the record's delimited comment string.
    pub fn set_comments(&mut self, comments: &CommentSet) -> bool {
        self.table.set(self.id, FieldValue::Comment(comments.to_stored()))
    }

    pub fn toggle_comment(&mut self, tag: CommentTag) -> Option<CommentSet> {
        let mut comments = self.table.get(self.id)?.comments();
        comments.toggle(tag);
        self.set_comments(&comments).then_some(comments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Record, NO_COMMENT};

    fn table() -> RecordTable {
        RecordTable::from_records(vec![Record::blank(RecordId(0)), Record::blank(RecordId(0))])
    }

    #[test]
    fn test_toggle_verified() {
        let mut table = table();
        let status = RowEditor::new(&mut table, RecordId(2)).toggle_verified();
        assert_eq!(status, Some(Status::Verified));
        assert_eq!(table.records()[1].status(), Status::Verified);
        assert_eq!(table.records()[0].status(), Status::NotVerified);
    }

    #[test]
    fn test_set_evaluation() {
        let mut table = table();
        assert!(RowEditor::new(&mut table, RecordId(1)).set_evaluation(Evaluation::LowEnd));
        assert_eq!(table.records()[0].evaluation(), Evaluation::LowEnd);
    }

    #[test]
    fn test_set_comments_stores_delimited_string() {
        let mut table = table();
        let comments: CommentSet = [CommentTag::HighPrices, CommentTag::KeyAccount].into_iter().collect();
        RowEditor::new(&mut table, RecordId(1)).set_comments(&comments);
        assert_eq!(table.records()[0].comment, "Key Account, High Prices");
        assert_eq!(table.records()[0].comments(), comments);
    }

    #[test]
    fn test_toggle_comment_back_to_empty() {
        let mut table = table();
        let mut editor = RowEditor::new(&mut table, RecordId(1));
        editor.toggle_comment(CommentTag::Industrial);
        let after = editor.toggle_comment(CommentTag::Industrial);
        assert_eq!(after, Some(CommentSet::new()));
        assert_eq!(table.records()[0].comment, NO_COMMENT);
    }

    #[test]
    fn test_unknown_record() {
        let mut table = table();
        let mut editor = RowEditor::new(&mut table, RecordId(5));
        assert_eq!(editor.toggle_verified(), None);
        assert!(!editor.set_evaluation(Evaluation::HighEnd));
    }
}
