use crate::application::{App, AppMode, Session};
use crate::domain::{check_website, CommentTag, Record};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    match &app.session {
        Some(session) => render_session(f, session, chunks[1]),
        None => render_welcome(f, chunks[1]),
    }
    render_status_bar(f, app, chunks[2]);

    match app.mode {
        AppMode::Help => render_help_popup(f, app.help_scroll),
        AppMode::Log => render_log_popup(f, app),
        AppMode::Pick(_) => render_picker_popup(f, app),
        AppMode::Comments => render_comments_popup(f, app),
        _ => {}
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let text = match &app.session {
        Some(session) if !session.subview().is_empty() => format!(
            "leadsheet - Enhanced Data Viewer | {} | Record {}/{}",
            session.source(),
            session.position() + 1,
            session.subview().len()
        ),
        Some(session) => format!("leadsheet - Enhanced Data Viewer | {} | no matches", session.source()),
        None => "leadsheet - Enhanced Data Viewer".to_string(),
    };
    f.render_widget(Paragraph::new(text).style(Style::default().fg(Color::Cyan)), area);
}

fn render_welcome(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from("Load your Excel file and scroll through the data."),
        Line::from(""),
        Line::from("Please load an Excel file to proceed. (Ctrl+O)"),
    ];
    let widget = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Data"))
        .wrap(Wrap { trim: true });
    f.render_widget(widget, area);
}

fn render_session(f: &mut Frame, session: &Session, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(36), Constraint::Min(0)])
        .split(area);

    render_sidebar(f, session, columns[0]);

    match session.current() {
        Some(record) => render_record(f, record, columns[1]),
        None => {
            let widget = Paragraph::new("No results match your filter criteria.")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default().borders(Borders::ALL).title("View Data"));
            f.render_widget(widget, columns[1]);
        }
    }
}

fn label(name: &str) -> Span<'static> {
    Span::styled(format!("{name}: "), Style::default().fg(Color::Yellow))
}

fn render_sidebar(f: &mut Frame, session: &Session, area: Rect) {
    let stats = session.stats();
    let filtered = session.filtered_stats();
    let criteria = session.criteria();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Length(5), Constraint::Min(0)])
        .split(area);

    let search = if criteria.search.is_empty() { "-" } else { criteria.search.as_str() };
    let filters = vec![
        Line::from(vec![label("Activity"), Span::raw(criteria.activity.label().to_string())]),
        Line::from(vec![label("Price Level"), Span::raw(criteria.price_level.label().to_string())]),
        Line::from(vec![label("City"), Span::raw(criteria.city.label().to_string())]),
        Line::from(vec![label("Valrhona Yes/No"), Span::raw(criteria.tag.label().to_string())]),
        Line::from(vec![label("Search"), Span::raw(search.to_string())]),
    ];
    f.render_widget(
        Paragraph::new(filters).block(Block::default().borders(Borders::ALL).title("Filters")),
        chunks[0],
    );

    let filtered_lines = vec![
        Line::from(format!("Filtered Companies: {}", filtered.total)),
        Line::from(format!("Unique Activities: {}", filtered.unique_activities)),
        Line::from(format!("Unique Cities: {}", filtered.unique_cities)),
    ];
    f.render_widget(
        Paragraph::new(filtered_lines)
            .block(Block::default().borders(Borders::ALL).title("Filtered Data Statistics")),
        chunks[1],
    );

    let mut overall = vec![
        Line::from(format!("Total Companies: {}", stats.total)),
        Line::from(format!("Unique Activities: {}", stats.unique_activities)),
        Line::from(format!("Unique Cities: {}", stats.unique_cities)),
        Line::from("Price Level Distribution:"),
    ];
    overall.extend(
        stats
            .price_distribution
            .iter()
            .map(|(level, count)| Line::from(format!("  {level}: {count}"))),
    );
    f.render_widget(
        Paragraph::new(overall)
            .block(Block::default().borders(Borders::ALL).title("Overall Data Statistics")),
        chunks[2],
    );
}

fn render_record(f: &mut Frame, record: &Record, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(11), Constraint::Min(0)])
        .split(area);

    let website = match check_website(&record.web_url) {
        Ok(_) => Line::from(vec![
            label("URL"),
            Span::styled(record.web_url.trim().to_string(), Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED)),
        ]),
        Err(warning) => Line::from(Span::styled(warning.to_string(), Style::default().fg(Color::Yellow))),
    };

    let details = vec![
        Line::from(vec![label("ID"), Span::raw(record.id.to_string())]),
        Line::from(vec![label("Company"), Span::raw(record.company.clone())]),
        Line::from(vec![label("Activity"), Span::raw(record.activity.clone())]),
        Line::from(vec![label("Address"), Span::raw(record.address.clone())]),
        Line::from(vec![label("Phone"), Span::raw(record.display_phone().into_owned())]),
        Line::from(vec![label("City"), Span::raw(record.city.clone())]),
        Line::from(vec![label("Valrhona Yes/No"), Span::raw(record.tag.clone())]),
        Line::from(vec![label("Price Level"), Span::raw(record.price_level.clone())]),
        website,
    ];
    f.render_widget(
        Paragraph::new(details)
            .block(Block::default().borders(Borders::ALL).title("View Data"))
            .wrap(Wrap { trim: false }),
        chunks[0],
    );

    let checkbox = if record.status().is_verified() { "[x]" } else { "[ ]" };
    let comments = record.comments();
    let comment_text = if comments.is_empty() {
        "No comment".to_string()
    } else {
        comments.iter().map(|t| t.as_str()).collect::<Vec<_>>().join(", ")
    };
    let status_style = if record.status().is_verified() {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };
    let workflow = vec![
        Line::from(vec![label("Status"), Span::styled(format!("{checkbox} Verified"), status_style)]),
        Line::from(vec![label("Evaluation"), Span::raw(record.evaluation.as_str())]),
        Line::from(vec![label("Comments"), Span::raw(comment_text)]),
    ];
    f.render_widget(
        Paragraph::new(workflow)
            .block(Block::default().borders(Borders::ALL).title("Workflow"))
            .wrap(Wrap { trim: false }),
        chunks[1],
    );
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let input_text = match app.mode {
        AppMode::Normal => match &app.status_message {
            Some(status) => status.clone(),
            None if app.session.is_some() => {
                "←/→: prev/next | r: reset | /: search | a $ c t: filters | v: verify | e: evaluate | m: comments | Ctrl+E: export | ?: help | q: quit".to_string()
            }
            None => "Ctrl+O: load file | ?: help | q: quit".to_string(),
        },
        AppMode::Help => "↑↓/jk: scroll | PgUp/PgDn: fast scroll | Home: top | Esc/q: close help".to_string(),
        AppMode::Log => "↑↓/jk: scroll | Esc/q: close log".to_string(),
        AppMode::Search => format!("Search by Company or Activity: {} (Enter to keep, Esc to cancel)", app.input),
        AppMode::LoadFile => format!("Load file: {} (Enter to load, Esc to cancel)", app.input),
        AppMode::ExportFile => format!("Export as: {} (Enter to export, Esc to cancel)", app.input),
        AppMode::Pick(target) => format!("{}: ↑↓ to choose, Enter to apply, Esc to cancel", target.title()),
        AppMode::Comments => "Select Comments: ↑↓ move, Space toggle, Enter save, Esc cancel".to_string(),
    };

    let input = Paragraph::new(input_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(match app.mode {
            AppMode::Normal | AppMode::Log => Style::default(),
            AppMode::Help => Style::default().fg(Color::Cyan),
            AppMode::Search => Style::default().fg(Color::Green),
            AppMode::LoadFile => Style::default().fg(Color::Yellow),
            AppMode::ExportFile => Style::default().fg(Color::Magenta),
            AppMode::Pick(_) | AppMode::Comments => Style::default().fg(Color::Cyan),
        });
    f.render_widget(input, area);
}

fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Rows needed for a bordered list of `len` items.
fn list_height(len: usize) -> u16 {
    u16::try_from(len).unwrap_or(u16::MAX).saturating_add(2)
}

fn render_picker_popup(f: &mut Frame, app: &App) {
    let Some(picker) = &app.picker else { return };
    let area = popup_area(f.area(), 44, list_height(picker.options.len()));
    f.render_widget(Clear, area);

    let items: Vec<ListItem> = picker.options.iter().map(|o| ListItem::new(o.as_str())).collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(picker.target.title()))
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(Some(picker.selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn render_comments_popup(f: &mut Frame, app: &App) {
    let Some(picker) = &app.comment_picker else { return };
    let area = popup_area(f.area(), 40, list_height(CommentTag::ALL.len()));
    f.render_widget(Clear, area);

    let items: Vec<ListItem> = CommentTag::ALL
        .iter()
        .map(|tag| {
            let mark = if picker.draft.contains(*tag) { "[x]" } else { "[ ]" };
            ListItem::new(format!("{mark} {}", tag.as_str()))
        })
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Select Comments"))
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White));
    let mut state = ListState::default();
    state.select(Some(picker.highlighted));
    f.render_stateful_widget(list, area, &mut state);
}

fn render_log_popup(f: &mut Frame, app: &App) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };
    f.render_widget(Clear, popup_area);

    let lines = app.log_lines(500);
    let visible = popup_area.height.saturating_sub(2) as usize;
    let start = app.log_scroll.min(lines.len().saturating_sub(visible));
    let text = if lines.is_empty() {
        "No log entries".to_string()
    } else {
        lines[start..(start + visible).min(lines.len())].join("\n")
    };
    let widget = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Log ({} lines)", lines.len())),
    );
    f.render_widget(widget, popup_area);
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_text = get_help_text();
    let help_lines: Vec<&str> = help_text.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(Block::default()
            .borders(Borders::ALL)
            .title(format!("leadsheet Help (Line {}/{})", start_line + 1, help_lines.len()))
            .style(Style::default().fg(Color::Cyan)))
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

fn get_help_text() -> &'static str {
    r#"LEADSHEET REFERENCE

=== FILES ===
Ctrl+O          Load a spreadsheet (.xlsx .xlsm .xlsb .xls .ods .csv)
                The first sheet is used; its first row holds the headers
Ctrl+E          Export the table with all edits (.xlsx or .csv)
                Default export file is data.xlsx

=== COLUMNS ===
company, Activity, Adress, city, phone, priceLevel, webUrl,
Valrhona Yes/No are expected. Missing columns and empty cells are
filled with N/A. ID, Status, Evaluating and Comment are added when absent.

=== NAVIGATION ===
← / h / p       Previous record
→ / l / n       Next record
r               Reset filter (clears the search, back to the first record)

=== FILTERS ===
a               Filter by Activity
$               Filter by Price Level
c               Filter by City
t               Filter by Valrhona Yes/No
/               Search by Company or Activity (case-insensitive)
                Choose "All" in a picker to remove that filter

=== EDITING THE CURRENT RECORD ===
v / Space       Toggle Verified / Not Verified
e               Choose the evaluation tier
m               Select comments (Space toggles, Enter saves)
y               Copy the website URL to the clipboard

=== OTHER ===
L               Show recent log lines
F1 or ?         Show this help (scroll with ↑↓, PgUp/PgDn, Home)
q               Quit (unsaved edits are lost; export first)

=== HELP NAVIGATION ===
↑↓ or j/k       Scroll help text up/down one line
Page Up/Down    Scroll help text up/down 5 lines
Home            Jump to top of help text
Esc/F1/?/q      Close this help window"#
}
