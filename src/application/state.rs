//! Application state for the terminal front end.
//!
//! [`App`] holds the optional [`Session`] plus everything the UI needs on top
//! of it: the current mode, prompt buffers, open pickers and the status line.

use super::session::Session;
use crate::domain::{Choice, CommentSet, CommentTag, Evaluation, LoadReport, RecordTable};
use crate::infrastructure::LogBuffer;
use std::path::PathBuf;

/// Represents the current mode of the application.
///
/// The mode determines how key presses are interpreted and which popup,
/// if any, is drawn over the main view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Browsing records; navigation and edit shortcuts are active
    Normal,
    /// Help screen is displayed
    Help,
    /// Typing into the company/activity search box
    Search,
    /// Prompting for a file to load
    LoadFile,
    /// Prompting for an export path
    ExportFile,
    /// A single-choice list is open
    Pick(PickTarget),
    /// The comment multi-select is open
    Comments,
    /// Recent log lines are displayed
    Log,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickTarget {
    Activity,
    PriceLevel,
    City,
    Tag,
    Evaluation,
}

impl PickTarget {
    pub fn title(self) -> &'static str {
        match self {
            PickTarget::Activity => "Filter by Activity",
            PickTarget::PriceLevel => "Filter by Price Level",
            PickTarget::City => "Filter by City",
            PickTarget::Tag => "Filter by Valrhona Yes/No",
            PickTarget::Evaluation => "Evaluate this Company",
        }
    }
}

/// State of an open single-choice list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picker {
    pub target: PickTarget,
    pub options: Vec<String>,
    pub selected: usize,
}

/// State of the open comment multi-select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentPicker {
    pub draft: CommentSet,
    pub highlighted: usize,
}

/// Main application state.
///
/// # Examples
///
/// ```
/// use leadsheet::application::{App, AppMode};
///
/// let app = App::default();
/// assert!(app.session.is_none());
/// assert_eq!(app.mode, AppMode::Normal);
/// ```
#[derive(Debug)]
pub struct App {
    /// The loaded table and its filters; `None` until a file is loaded
    pub session: Option<Session>,
    /// Current application mode
    pub mode: AppMode,
    /// Input buffer for prompts and the search box
    pub input: String,
    /// Cursor position within the input buffer
    pub cursor_position: usize,
    /// Search text to restore when a search is cancelled
    pub search_backup: String,
    /// Path exports default to
    pub export_path: PathBuf,
    /// Scroll position in help text
    pub help_scroll: usize,
    /// Scroll position in the log view
    pub log_scroll: usize,
    /// Temporary status message to display
    pub status_message: Option<String>,
    pub picker: Option<Picker>,
    pub comment_picker: Option<CommentPicker>,
    /// Recent log lines, when a logger is installed
    pub log: Option<LogBuffer>,
}

impl Default for App {
    fn default() -> Self {
        Self {
            session: None,
            mode: AppMode::Normal,
            input: String::new(),
            cursor_position: 0,
            search_backup: String::new(),
            export_path: PathBuf::from(crate::infrastructure::DEFAULT_EXPORT),
            help_scroll: 0,
            log_scroll: 0,
            status_message: None,
            picker: None,
            comment_picker: None,
            log: None,
        }
    }
}

impl App {
    pub fn new(export_path: PathBuf, log: Option<LogBuffer>) -> Self {
        Self { export_path, log, ..Self::default() }
    }

    fn set_input(&mut self, text: String) {
        self.cursor_position = text.len();
        self.input = text;
    }

    fn clear_input(&mut self) {
        self.input.clear();
        self.cursor_position = 0;
    }

    /// Switches to load mode, prefilled with the current source file.
    pub fn start_load_file(&mut self) {
        self.mode = AppMode::LoadFile;
        let current = self.session.as_ref().map(|s| s.source().to_string()).unwrap_or_default();
        self.set_input(current);
        self.status_message = None;
    }

    pub fn get_load_filename(&self) -> String {
        self.input.trim().to_string()
    }

    /// Processes the result of a load.
    ///
    /// A successful load replaces any previous session. A failure keeps the
    /// previous session untouched.
    pub fn set_load_result(&mut self, result: Result<(RecordTable, LoadReport, String), String>) {
        match result {
            Ok((table, report, filename)) => {
                let mut message = format!("Loaded {} records from {}", table.len(), filename);
                if !report.synthesized.is_empty() {
                    message.push_str(&format!(" (missing columns filled: {})", report.synthesized.join(", ")));
                }
                self.session = Some(Session::with_report(table, report, filename));
                self.status_message = Some(message);
            }
            Err(error) => {
                self.status_message = Some(format!("Load failed: {}", error));
            }
        }
        self.mode = AppMode::Normal;
        self.clear_input();
    }

    /// Switches to export mode, prefilled with the configured export path.
    pub fn start_export(&mut self) {
        if self.session.is_none() {
            self.status_message = Some("Nothing to export: load a file first".to_string());
            return;
        }
        self.mode = AppMode::ExportFile;
        let path = self.export_path.display().to_string();
        self.set_input(path);
        self.status_message = None;
    }

    pub fn get_export_filename(&self) -> String {
        let name = self.input.trim();
        if name.is_empty() {
            self.export_path.display().to_string()
        } else {
            name.to_string()
        }
    }

    pub fn set_export_result(&mut self, result: Result<String, String>) {
        match result {
            Ok(filename) => {
                self.export_path = PathBuf::from(&filename);
                self.status_message = Some(format!("Exported to {}", filename));
            }
            Err(error) => {
                self.status_message = Some(format!("Export failed: {}", error));
            }
        }
        self.mode = AppMode::Normal;
        self.clear_input();
    }

    pub fn cancel_filename_input(&mut self) {
        self.mode = AppMode::Normal;
        self.clear_input();
    }

    /// Opens the search box with the active search text.
    pub fn start_search(&mut self) {
        let Some(session) = &self.session else { return };
        let current = session.criteria().search.clone();
        self.search_backup = current.clone();
        self.set_input(current);
        self.mode = AppMode::Search;
    }

    /// Applies the search box contents. Called on every keystroke.
    pub fn update_search(&mut self) {
        if let Some(session) = &mut self.session {
            session.set_search(self.input.clone());
        }
    }

    pub fn finish_search(&mut self) {
        self.update_search();
        self.mode = AppMode::Normal;
        self.clear_input();
    }

    pub fn cancel_search(&mut self) {
        if let Some(session) = &mut self.session {
            session.set_search(std::mem::take(&mut self.search_backup));
        }
        self.mode = AppMode::Normal;
        self.clear_input();
    }

    /// Opens a picker preselecting the active value.
    pub fn start_pick(&mut self, target: PickTarget) {
        let Some(session) = &self.session else { return };
        let options = session.filter_options();
        let criteria = session.criteria();
        let (options, active) = match target {
            PickTarget::Activity => (options.activities.clone(), criteria.activity.label().to_string()),
            PickTarget::PriceLevel => (options.price_levels.clone(), criteria.price_level.label().to_string()),
            PickTarget::City => (options.cities.clone(), criteria.city.label().to_string()),
            PickTarget::Tag => (options.tags.clone(), criteria.tag.label().to_string()),
            PickTarget::Evaluation => {
                let Some(record) = session.current() else { return };
                (
                    Evaluation::ALL.iter().map(|e| e.as_str().to_string()).collect(),
                    record.evaluation.as_str().to_string(),
                )
            }
        };
        let selected = options.iter().position(|o| *o == active).unwrap_or(0);
        self.picker = Some(Picker { target, options, selected });
        self.mode = AppMode::Pick(target);
    }

    pub fn pick_next(&mut self) {
        if let Some(picker) = &mut self.picker {
            if picker.selected + 1 < picker.options.len() {
                picker.selected += 1;
            }
        }
    }

    pub fn pick_previous(&mut self) {
        if let Some(picker) = &mut self.picker {
            picker.selected = picker.selected.saturating_sub(1);
        }
    }

    pub fn confirm_pick(&mut self) {
        self.mode = AppMode::Normal;
        let (Some(picker), Some(session)) = (self.picker.take(), self.session.as_mut()) else {
            return;
        };
        let Some(label) = picker.options.get(picker.selected) else { return };
        match picker.target {
            PickTarget::Activity => session.set_activity(Choice::from_label(label)),
            PickTarget::PriceLevel => session.set_price_level(Choice::from_label(label)),
            PickTarget::City => session.set_city(Choice::from_label(label)),
            PickTarget::Tag => session.set_tag(Choice::from_label(label)),
            PickTarget::Evaluation => {
                session.set_evaluation(Evaluation::parse(label));
            }
        }
    }

    pub fn cancel_pick(&mut self) {
        self.picker = None;
        self.mode = AppMode::Normal;
    }

    /// Opens the comment multi-select with the current record's tags.
    pub fn start_comments(&mut self) {
        let Some(record) = self.session.as_ref().and_then(|s| s.current()) else { return };
        self.comment_picker = Some(CommentPicker { draft: record.comments(), highlighted: 0 });
        self.mode = AppMode::Comments;
    }

    pub fn comment_next(&mut self) {
        if let Some(picker) = &mut self.comment_picker {
            if picker.highlighted + 1 < CommentTag::ALL.len() {
                picker.highlighted += 1;
            }
        }
    }

    pub fn comment_previous(&mut self) {
        if let Some(picker) = &mut self.comment_picker {
            picker.highlighted = picker.highlighted.saturating_sub(1);
        }
    }

    pub fn toggle_highlighted_comment(&mut self) {
        if let Some(picker) = &mut self.comment_picker {
            picker.draft.toggle(CommentTag::ALL[picker.highlighted]);
        }
    }

    /// Commits the drafted tags to the current record.
    pub fn confirm_comments(&mut self) {
        self.mode = AppMode::Normal;
        let (Some(picker), Some(session)) = (self.comment_picker.take(), self.session.as_mut()) else {
            return;
        };
        session.set_comments(&picker.draft);
    }

    pub fn cancel_comments(&mut self) {
        self.comment_picker = None;
        self.mode = AppMode::Normal;
    }

    pub fn toggle_verified(&mut self) {
        if let Some(status) = self.session.as_mut().and_then(|s| s.toggle_verified()) {
            self.status_message = Some(format!("Status: {}", status.as_str()));
        }
    }

    pub fn previous(&mut self) {
        if let Some(session) = &mut self.session {
            session.previous();
        }
    }

    pub fn next(&mut self) {
        if let Some(session) = &mut self.session {
            session.next();
        }
    }

    pub fn reset_filter(&mut self) {
        if let Some(session) = &mut self.session {
            session.reset_filter();
        }
    }

    /// Website of the displayed record, if it has one.
    pub fn current_website(&self) -> Option<String> {
        let record = self.session.as_ref()?.current()?;
        crate::domain::check_website(&record.web_url)
            .ok()
            .map(|_| record.web_url.trim().to_string())
    }

    pub fn set_copy_result(&mut self, result: Result<String, String>) {
        self.status_message = Some(match result {
            Ok(url) => format!("Copied {}", url),
            Err(error) => format!("Copy failed: {}", error),
        });
    }

    pub fn show_help(&mut self) {
        self.mode = AppMode::Help;
        self.help_scroll = 0;
    }

    pub fn show_log(&mut self) {
        self.mode = AppMode::Log;
        self.log_scroll = 0;
    }

    pub fn log_lines(&self, count: usize) -> Vec<String> {
        self.log.as_ref().map(|log| log.recent(count)).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Record, RecordId, Status};

    fn record(company: &str, activity: &str, city: &str, url: &str) -> Record {
        let mut r = Record::blank(RecordId(0));
        r.company = company.to_string();
        r.activity = activity.to_string();
        r.city = city.to_string();
        r.web_url = url.to_string();
        r
    }

    fn loaded_app() -> App {
        let mut app = App::default();
        let table = RecordTable::from_records(vec![
            record("Maison Blanc", "Bakery", "Paris", "https://maison.example"),
            record("Chocolaterie X", "Confectioner", "Lyon", "N/A"),
            record("Le Pain", "Bakery", "Lyon", "N/A"),
        ]);
        app.set_load_result(Ok((table, LoadReport::default(), "leads.xlsx".to_string())));
        app
    }

    fn current_company(app: &App) -> Option<String> {
        app.session.as_ref()?.current().map(|r| r.company.clone())
    }

    #[test]
    fn test_app_default() {
        let app = App::default();
        assert!(app.session.is_none());
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.input.is_empty());
        assert_eq!(app.cursor_position, 0);
        assert_eq!(app.export_path, PathBuf::from("data.xlsx"));
        assert!(app.status_message.is_none());
    }

    #[test]
    fn test_set_load_result_success() {
        let app = loaded_app();
        assert_eq!(app.status_message.as_deref(), Some("Loaded 3 records from leads.xlsx"));
        assert_eq!(current_company(&app).as_deref(), Some("Maison Blanc"));
    }

    #[test]
    fn test_set_load_result_failure_keeps_session() {
        let mut app = loaded_app();
        app.start_load_file();
        app.set_load_result(Err("No such file".to_string()));
        assert_eq!(app.status_message.as_deref(), Some("Load failed: No such file"));
        assert!(app.session.is_some());
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_load_reports_synthesized_columns() {
        let mut app = App::default();
        let report = LoadReport { synthesized: vec!["phone"], ..LoadReport::default() };
        app.set_load_result(Ok((RecordTable::default(), report, "x.csv".to_string())));
        assert_eq!(
            app.status_message.as_deref(),
            Some("Loaded 0 records from x.csv (missing columns filled: phone)")
        );
    }

    #[test]
    fn test_start_export_without_session() {
        let mut app = App::default();
        app.start_export();
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.status_message.is_some());
    }

    #[test]
    fn test_start_export_prefills_path() {
        let mut app = loaded_app();
        app.start_export();
        assert_eq!(app.mode, AppMode::ExportFile);
        assert_eq!(app.input, "data.xlsx");
        assert_eq!(app.cursor_position, 9);
    }

    #[test]
    fn test_set_export_result_remembers_path() {
        let mut app = loaded_app();
        app.start_export();
        app.set_export_result(Ok("out.csv".to_string()));
        assert_eq!(app.export_path, PathBuf::from("out.csv"));
        assert_eq!(app.status_message.as_deref(), Some("Exported to out.csv"));
    }

    #[test]
    fn test_pick_activity_filters() {
        let mut app = loaded_app();
        app.start_pick(PickTarget::Activity);
        assert_eq!(app.mode, AppMode::Pick(PickTarget::Activity));
        let picker = app.picker.clone().unwrap();
        assert_eq!(picker.options, vec!["All", "Bakery", "Confectioner"]);
        assert_eq!(picker.selected, 0);

        app.pick_next();
        app.confirm_pick();
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.session.as_ref().unwrap().subview().len(), 2);
    }

    #[test]
    fn test_pick_evaluation_writes_current_record() {
        let mut app = loaded_app();
        app.next();
        app.start_pick(PickTarget::Evaluation);
        app.pick_next();
        app.pick_next();
        app.confirm_pick();
        let table = app.session.as_ref().unwrap().table();
        assert_eq!(table.records()[1].evaluation(), Evaluation::MidEnd);
        assert_eq!(table.records()[0].evaluation(), Evaluation::InitialValue);
    }

    #[test]
    fn test_cancel_pick_changes_nothing() {
        let mut app = loaded_app();
        app.start_pick(PickTarget::City);
        app.pick_next();
        app.cancel_pick();
        assert!(app.picker.is_none());
        assert_eq!(app.session.as_ref().unwrap().subview().len(), 3);
    }

    #[test]
    fn test_live_search_and_cancel() {
        let mut app = loaded_app();
        app.start_search();
        app.input = "choc".to_string();
        app.update_search();
        assert_eq!(app.session.as_ref().unwrap().subview().len(), 1);
        app.cancel_search();
        assert_eq!(app.session.as_ref().unwrap().subview().len(), 3);
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_comments_round_trip_through_navigation() {
        let mut app = loaded_app();
        app.start_comments();
        app.toggle_highlighted_comment();
        for _ in 0..4 {
            app.comment_next();
        }
        app.toggle_highlighted_comment();
        app.confirm_comments();

        app.next();
        app.previous();
        app.start_comments();
        let draft = app.comment_picker.as_ref().unwrap().draft.clone();
        let tags: Vec<_> = draft.iter().collect();
        assert_eq!(tags, vec![CommentTag::KeyAccount, CommentTag::HighPrices]);
    }

    #[test]
    fn test_cancel_comments_discards_draft() {
        let mut app = loaded_app();
        app.start_comments();
        app.toggle_highlighted_comment();
        app.cancel_comments();
        assert!(app.session.as_ref().unwrap().current().unwrap().comments().is_empty());
    }

    #[test]
    fn test_toggle_verified() {
        let mut app = loaded_app();
        app.toggle_verified();
        assert_eq!(app.status_message.as_deref(), Some("Status: Verified"));
        let record = app.session.as_ref().unwrap().current().unwrap();
        assert_eq!(record.status(), Status::Verified);
    }

    #[test]
    fn test_current_website() {
        let mut app = loaded_app();
        assert_eq!(app.current_website().as_deref(), Some("https://maison.example"));
        app.next();
        assert_eq!(app.current_website(), None);
    }

    #[test]
    fn test_actions_without_session_are_noops() {
        let mut app = App::default();
        app.next();
        app.previous();
        app.reset_filter();
        app.toggle_verified();
        app.start_search();
        app.start_pick(PickTarget::City);
        app.start_comments();
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.status_message.is_none());
    }
}
