use crate::application::{App, AppMode};
use crate::application::PickTarget;
use crate::infrastructure::{ClipboardService, WorkbookRepository};
use crossterm::event::{KeyCode, KeyModifiers};
use std::path::Path;

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        match app.mode {
            AppMode::Normal => Self::handle_normal_mode(app, key, modifiers),
            AppMode::Help => Self::handle_help_mode(app, key),
            AppMode::Log => Self::handle_log_mode(app, key),
            AppMode::Search => Self::handle_search_mode(app, key),
            AppMode::LoadFile => Self::handle_filename_input_mode(app, key, "load"),
            AppMode::ExportFile => Self::handle_filename_input_mode(app, key, "export"),
            AppMode::Pick(_) => Self::handle_pick_mode(app, key),
            AppMode::Comments => Self::handle_comments_mode(app, key),
        }
    }

    fn handle_normal_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            match key {
                KeyCode::Char('o') => app.start_load_file(),
                KeyCode::Char('e') => app.start_export(),
                _ => {}
            }
            return;
        }

        app.status_message = None;

        match key {
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('p') => app.previous(),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('n') => app.next(),
            KeyCode::Char('r') => app.reset_filter(),
            KeyCode::Char('/') => app.start_search(),
            KeyCode::Char('a') => app.start_pick(PickTarget::Activity),
            KeyCode::Char('$') => app.start_pick(PickTarget::PriceLevel),
            KeyCode::Char('c') => app.start_pick(PickTarget::City),
            KeyCode::Char('t') => app.start_pick(PickTarget::Tag),
            KeyCode::Char('e') => app.start_pick(PickTarget::Evaluation),
            KeyCode::Char('v') | KeyCode::Char(' ') => app.toggle_verified(),
            KeyCode::Char('m') => app.start_comments(),
            KeyCode::Char('y') => Self::copy_website(app),
            KeyCode::Char('L') => app.show_log(),
            KeyCode::F(1) | KeyCode::Char('?') => app.show_help(),
            KeyCode::Char('q') => {
                // Will be handled by main loop
            }
            _ => {}
        }
    }

    fn copy_website(app: &mut App) {
        match app.current_website() {
            Some(url) => {
                let result = ClipboardService::copy_text(&url)
                    .map(|_| url)
                    .map_err(|e| e.to_string());
                app.set_copy_result(result);
            }
            None => app.status_message = Some("This company does not have a valid URL.".to_string()),
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.mode = AppMode::Normal;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                app.help_scroll = app.help_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll += 1;
            }
            KeyCode::PageUp => {
                app.help_scroll = app.help_scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                app.help_scroll += 5;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }

    fn handle_log_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('L') => {
                app.mode = AppMode::Normal;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                app.log_scroll = app.log_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.log_scroll += 1;
            }
            _ => {}
        }
    }

    fn handle_pick_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => app.confirm_pick(),
            KeyCode::Esc => app.cancel_pick(),
            KeyCode::Up | KeyCode::Char('k') => app.pick_previous(),
            KeyCode::Down | KeyCode::Char('j') => app.pick_next(),
            _ => {}
        }
    }

    fn handle_comments_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => app.confirm_comments(),
            KeyCode::Esc => app.cancel_comments(),
            KeyCode::Char(' ') => app.toggle_highlighted_comment(),
            KeyCode::Up | KeyCode::Char('k') => app.comment_previous(),
            KeyCode::Down | KeyCode::Char('j') => app.comment_next(),
            _ => {}
        }
    }

    /// Edits the prompt buffer. Returns `true` when the text changed.
    fn edit_input(app: &mut App, key: KeyCode) -> bool {
        match key {
            KeyCode::Backspace => {
                if app.cursor_position > 0 {
                    let previous = prev_char_boundary(&app.input, app.cursor_position);
                    app.input.replace_range(previous..app.cursor_position, "");
                    app.cursor_position = previous;
                    return true;
                }
            }
            KeyCode::Delete => {
                if app.cursor_position < app.input.len() {
                    let next = next_char_boundary(&app.input, app.cursor_position);
                    app.input.replace_range(app.cursor_position..next, "");
                    return true;
                }
            }
            KeyCode::Left => {
                app.cursor_position = prev_char_boundary(&app.input, app.cursor_position);
            }
            KeyCode::Right => {
                app.cursor_position = next_char_boundary(&app.input, app.cursor_position);
            }
            KeyCode::Home => {
                app.cursor_position = 0;
            }
            KeyCode::End => {
                app.cursor_position = app.input.len();
            }
            KeyCode::Char(c) => {
                app.input.insert(app.cursor_position, c);
                app.cursor_position += c.len_utf8();
                return true;
            }
            _ => {}
        }
        false
    }

    fn handle_filename_input_mode(app: &mut App, key: KeyCode, mode: &str) {
        match key {
            KeyCode::Enter => match mode {
                "load" => {
                    let filename = app.get_load_filename();
                    let result = WorkbookRepository::load_table(Path::new(&filename))
                        .map(|(table, report)| (table, report, filename.clone()))
                        .map_err(|e| e.to_string());
                    app.set_load_result(result);
                }
                "export" => {
                    let filename = app.get_export_filename();
                    let result = match &app.session {
                        Some(session) => WorkbookRepository::export_to_path(session.table(), Path::new(&filename))
                            .map(|_| filename.clone())
                            .map_err(|e| e.to_string()),
                        None => Err("no file loaded".to_string()),
                    };
                    app.set_export_result(result);
                }
                _ => {}
            },
            KeyCode::Esc => app.cancel_filename_input(),
            other => {
                Self::edit_input(app, other);
            }
        }
    }

    fn handle_search_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => app.finish_search(),
            KeyCode::Esc => app.cancel_search(),
            other => {
                if Self::edit_input(app, other) {
                    app.update_search();
                }
            }
        }
    }
}

fn prev_char_boundary(text: &str, position: usize) -> usize {
    text[..position].char_indices().next_back().map(|(i, _)| i).unwrap_or(0)
}

fn next_char_boundary(text: &str, position: usize) -> usize {
    text[position..].chars().next().map(|c| position + c.len_utf8()).unwrap_or(position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Record, RecordId, RecordTable, LoadReport, Status};
    use std::io::Write;

    fn loaded_app() -> App {
        let mut app = App::default();
        let mut records = Vec::new();
        for (company, activity, city) in [
            ("Maison Blanc", "Bakery", "Paris"),
            ("Chocolaterie X", "Confectioner", "Lyon"),
            ("Le Pain", "Bakery", "Lyon"),
        ] {
            let mut r = Record::blank(RecordId(0));
            r.company = company.to_string();
            r.activity = activity.to_string();
            r.city = city.to_string();
            records.push(r);
        }
        app.set_load_result(Ok((RecordTable::from_records(records), LoadReport::default(), "t.xlsx".to_string())));
        app
    }

    fn press(app: &mut App, key: KeyCode) {
        InputHandler::handle_key_event(app, key, KeyModifiers::NONE);
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn position(app: &App) -> usize {
        app.session.as_ref().unwrap().position()
    }

    #[test]
    fn test_load_key_binding() {
        let mut app = App::default();
        InputHandler::handle_key_event(&mut app, KeyCode::Char('o'), KeyModifiers::CONTROL);
        assert_eq!(app.mode, AppMode::LoadFile);
    }

    #[test]
    fn test_export_key_binding() {
        let mut app = loaded_app();
        InputHandler::handle_key_event(&mut app, KeyCode::Char('e'), KeyModifiers::CONTROL);
        assert_eq!(app.mode, AppMode::ExportFile);
        assert_eq!(app.input, "data.xlsx");
    }

    #[test]
    fn test_ctrl_s_is_unbound() {
        let mut app = loaded_app();
        InputHandler::handle_key_event(&mut app, KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_navigation_keys() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(position(&app), 2);
        press(&mut app, KeyCode::Char('p'));
        assert_eq!(position(&app), 1);
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Left);
        assert_eq!(position(&app), 0);
    }

    #[test]
    fn test_live_search_typing() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.mode, AppMode::Search);
        type_text(&mut app, "CHOC");
        assert_eq!(app.session.as_ref().unwrap().subview().len(), 1);
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.session.as_ref().unwrap().subview().len(), 3);
        type_text(&mut app, "pain");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.session.as_ref().unwrap().criteria().search, "pain");
    }

    #[test]
    fn test_reset_filter_key() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('c'));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "le");
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('r'));

        let session = app.session.as_ref().unwrap();
        assert!(session.criteria().search.is_empty());
        assert_eq!(session.position(), 0);
        assert_eq!(session.current().unwrap().company, "Maison Blanc");
    }

    #[test]
    fn test_verify_key() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('v'));
        let session = app.session.as_ref().unwrap();
        assert_eq!(session.current().unwrap().status(), Status::Verified);
    }

    #[test]
    fn test_comment_multiselect_keys() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('m'));
        assert_eq!(app.mode, AppMode::Comments);
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Enter);
        let record = app.session.as_ref().unwrap().current().unwrap().clone();
        assert_eq!(record.comment, "Key Account, No Website");
    }

    #[test]
    fn test_filename_editing() {
        let mut app = App::default();
        app.start_load_file();
        type_text(&mut app, "é.csv");
        assert_eq!(app.input, "é.csv");
        press(&mut app, KeyCode::Home);
        press(&mut app, KeyCode::Delete);
        assert_eq!(app.input, ".csv");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.input.is_empty());
    }

    #[test]
    fn test_load_missing_file_reports_error() {
        let mut app = App::default();
        app.start_load_file();
        type_text(&mut app, "/nonexistent/leads.csv");
        press(&mut app, KeyCode::Enter);
        assert!(app.session.is_none());
        assert!(app.status_message.as_deref().unwrap_or_default().starts_with("Load failed"));
    }

    #[test]
    fn test_load_csv_through_prompt() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "company,Activity,city\nAcme,Bakery,Paris\nBeta,Cafe,\n").unwrap();
        let mut app = App::default();
        app.start_load_file();
        type_text(&mut app, &file.path().display().to_string());
        press(&mut app, KeyCode::Enter);

        let session = app.session.as_ref().unwrap();
        assert_eq!(session.table().len(), 2);
        assert_eq!(session.table().records()[1].city, "N/A");
    }

    #[test]
    fn test_export_through_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.csv");
        let mut app = loaded_app();
        app.start_export();
        app.input.clear();
        app.cursor_position = 0;
        type_text(&mut app, &target.display().to_string());
        press(&mut app, KeyCode::Enter);
        assert!(target.exists());
        assert_eq!(app.export_path, target);
    }

    #[test]
    fn test_help_mode_toggle() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.mode, AppMode::Help);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.help_scroll, 1);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Normal);
    }
}
