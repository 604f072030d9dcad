use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Cell, Clear, Paragraph, Row, Table as TableWidget, TableState, Wrap,
};
use ratatui::Frame;
use tracing::{error, info};

use crate::config::ValidationPolicy;
use crate::db::{read_table, Store};
use crate::error::{surface_error, LibraryError, WriteResult};
use crate::models::Table;
use crate::records::RecordWriter;

use super::commands::{action_for_key, dispatch, Action, KEY_BINDINGS};
use super::forms::{field_prefix, EntryForm, FormKind};
use super::helpers::{cascade_rect, centered_rect};
use super::screens::TableWindow;

const TITLE_HEIGHT: u16 = 3;
/// Button row with the table shortcuts.
const BUTTONS_HEIGHT: u16 = 3;
/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Rows a table window scrolls on PageUp/PageDown.
const PAGE_STEP: isize = 10;

/// Which field of which panel currently receives typed characters.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Focus {
    form: FormKind,
    field: usize,
}

impl Focus {
    fn first_of(form: FormKind) -> Self {
        Self { form, field: 0 }
    }

    /// Step through every field of every panel, wrapping around at the end.
    fn next(self) -> Self {
        if self.field + 1 < self.form.field_count() {
            return Self {
                form: self.form,
                field: self.field + 1,
            };
        }
        let next_form = FormKind::ALL[(self.form.index() + 1) % FormKind::ALL.len()];
        Self::first_of(next_form)
    }

    fn previous(self) -> Self {
        if self.field > 0 {
            return Self {
                form: self.form,
                field: self.field - 1,
            };
        }
        let len = FormKind::ALL.len();
        let prev_form = FormKind::ALL[(self.form.index() + len - 1) % len];
        Self {
            form: prev_form,
            field: prev_form.field_count() - 1,
        }
    }
}

/// Modal message box severities.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum DialogKind {
    Info,
    Warning,
    Error,
}

impl DialogKind {
    fn style(self) -> Style {
        match self {
            DialogKind::Info => Style::default().fg(Color::Green),
            DialogKind::Warning => Style::default().fg(Color::Yellow),
            DialogKind::Error => Style::default().fg(Color::Red),
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Dialog {
    pub(crate) kind: DialogKind,
    pub(crate) title: String,
    pub(crate) message: String,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: DialogKind,
}

/// Application state for the library desk: the store handle, the unsaved form
/// input, the stack of open table windows and an optional modal dialog.
pub struct App {
    store: Store,
    policy: ValidationPolicy,
    forms: [EntryForm; 3],
    focus: Focus,
    windows: Vec<TableWindow>,
    windows_opened: usize,
    dialog: Option<Dialog>,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(store: Store, policy: ValidationPolicy) -> Self {
        Self {
            store,
            policy,
            forms: FormKind::ALL.map(EntryForm::new),
            focus: Focus::first_of(FormKind::Student),
            windows: Vec::new(),
            windows_opened: 0,
            dialog: None,
            status: None,
        }
    }

    /// Hand the store back so the caller can close it explicitly.
    pub fn into_store(self) -> Store {
        self.store
    }

    /// Run a named action through the dispatch table.
    pub fn dispatch(&mut self, action: Action) -> Result<()> {
        dispatch(self, action)
    }

    /// Route one key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Result<bool> {
        if modifiers.contains(KeyModifiers::CONTROL) && matches!(code, KeyCode::Char('q')) {
            return Ok(true);
        }

        if self.dialog.is_some() {
            if matches!(code, KeyCode::Enter | KeyCode::Esc) {
                self.dialog = None;
            }
            return Ok(false);
        }

        if let Some(action) = action_for_key(code, modifiers) {
            self.dispatch(action)?;
            return Ok(false);
        }

        if !self.windows.is_empty() {
            self.handle_window_key(code);
            return Ok(false);
        }

        self.handle_form_key(code, modifiers)
    }

    fn handle_window_key(&mut self, code: KeyCode) {
        if matches!(code, KeyCode::Esc | KeyCode::Char('q')) {
            self.windows.pop();
            return;
        }
        let Some(window) = self.windows.last_mut() else {
            return;
        };
        match code {
            KeyCode::Up => window.move_selection(-1),
            KeyCode::Down => window.move_selection(1),
            KeyCode::PageUp => window.move_selection(-PAGE_STEP),
            KeyCode::PageDown => window.move_selection(PAGE_STEP),
            KeyCode::Home => window.select_first(),
            KeyCode::End => window.select_last(),
            _ => {}
        }
    }

    fn handle_form_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Result<bool> {
        match code {
            KeyCode::Esc => return Ok(true),
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.previous(),
            KeyCode::Enter => {
                let action = self.focus.form.submit_action();
                self.dispatch(action)?;
            }
            KeyCode::Backspace => {
                self.forms[self.focus.form.index()].backspace(self.focus.field);
            }
            KeyCode::Char(ch) if !modifiers.contains(KeyModifiers::CONTROL) => {
                if self.forms[self.focus.form.index()].push_char(self.focus.field, ch) {
                    self.clear_status();
                }
            }
            _ => {}
        }
        Ok(false)
    }

    pub(crate) fn add_student(&mut self) -> Result<()> {
        self.submit_form(FormKind::Student, |writer, values| {
            writer
                .add_student(values[0], values[1], values[2])
                .map(|_| "Student added successfully.".to_string())
        })
    }

    pub(crate) fn add_book(&mut self) -> Result<()> {
        self.submit_form(FormKind::Book, |writer, values| {
            writer
                .add_book(values[0], values[1], values[2])
                .map(|_| "Book added successfully.".to_string())
        })
    }

    pub(crate) fn issue_book(&mut self) -> Result<()> {
        self.submit_form(FormKind::Issue, |writer, values| {
            writer
                .issue_book(values[0], values[1])
                .map(|issue| issue.summary())
        })
    }

    pub(crate) fn show_students(&mut self) -> Result<()> {
        self.open_table_window(Table::Students)
    }

    pub(crate) fn show_books(&mut self) -> Result<()> {
        self.open_table_window(Table::Books)
    }

    pub(crate) fn show_issued_books(&mut self) -> Result<()> {
        self.open_table_window(Table::BookIssues)
    }

    /// Hand the panel's text to the record writer. Success clears the panel
    /// and confirms; failures become dialogs and leave the input untouched.
    fn submit_form<F>(&mut self, kind: FormKind, write: F) -> Result<()>
    where
        F: FnOnce(&RecordWriter<'_>, &[&str]) -> WriteResult<String>,
    {
        let outcome = {
            let values: Vec<&str> = self.forms[kind.index()]
                .values()
                .iter()
                .map(String::as_str)
                .collect();
            let writer = RecordWriter::new(&self.store, self.policy);
            write(&writer, &values)
        };

        match outcome {
            Ok(message) => {
                self.forms[kind.index()].clear();
                self.focus = Focus::first_of(kind);
                self.set_status(message.clone(), DialogKind::Info);
                self.open_dialog(DialogKind::Info, "Success", message);
            }
            Err(err) => self.report_write_error(err),
        }
        Ok(())
    }

    fn report_write_error(&mut self, err: LibraryError) {
        let (kind, title) = match &err {
            LibraryError::Validation(_) => (DialogKind::Warning, "Input Error"),
            LibraryError::DuplicateId { .. } | LibraryError::DanglingReference { .. } => {
                (DialogKind::Error, "Error")
            }
            LibraryError::Storage(_) => (DialogKind::Error, "Database Error"),
        };
        let message = err.user_message();
        self.set_status(message.clone(), kind);
        self.open_dialog(kind, title, message);
    }

    /// Snapshot `table` into a new window on top of any already open.
    fn open_table_window(&mut self, table: Table) -> Result<()> {
        match read_table(self.store.conn(), table) {
            Ok(view) => {
                self.windows_opened += 1;
                info!(table = %table, rows = view.len(), "table window opened");
                self.windows.push(TableWindow::new(view, self.windows_opened));
                self.clear_status();
            }
            Err(err) => {
                error!(table = %table, error = %format!("{err:#}"), "failed to read table");
                let message = surface_error(&err);
                self.set_status(message.clone(), DialogKind::Error);
                self.open_dialog(DialogKind::Error, "Database Error", message);
            }
        }
        Ok(())
    }

    fn open_dialog<S: Into<String>>(&mut self, kind: DialogKind, title: &str, message: S) {
        self.dialog = Some(Dialog {
            kind,
            title: title.to_string(),
            message: message.into(),
        });
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: DialogKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(TITLE_HEIGHT),
                Constraint::Length(panel_height(FormKind::Student)),
                Constraint::Length(panel_height(FormKind::Book)),
                Constraint::Length(panel_height(FormKind::Issue)),
                Constraint::Length(BUTTONS_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_title(frame, chunks[0]);
        for (form, panel_area) in self.forms.iter().zip(&chunks[1..4]) {
            self.draw_panel(frame, *panel_area, form);
        }
        self.draw_buttons(frame, chunks[4]);
        self.draw_footer(frame, chunks[6]);

        for (depth, window) in self.windows.iter().enumerate() {
            let on_top = depth + 1 == self.windows.len();
            self.draw_table_window(frame, cascade_rect(area, depth), window, on_top);
        }

        if let Some(dialog) = &self.dialog {
            self.draw_dialog(frame, area, dialog);
        }
    }

    fn draw_title(&self, frame: &mut Frame, area: Rect) {
        let title = Paragraph::new(Line::from(Span::styled(
            "Library Management System",
            Style::default().add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
        frame.render_widget(title, area);
    }

    fn draw_panel(&self, frame: &mut Frame, area: Rect, form: &EntryForm) {
        let kind = form.kind();
        let focused = self.focus.form == kind;
        let border_style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };

        let block = Block::default()
            .title(kind.title())
            .borders(Borders::ALL)
            .border_style(border_style);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let mut lines: Vec<Line> = (0..kind.field_count())
            .map(|idx| form.build_line(idx, focused && self.focus.field == idx))
            .collect();
        let button_style = if focused {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        lines.push(Line::from(Span::styled(
            format!("[ {} ]  (Enter)", kind.submit_action().label()),
            button_style,
        )));

        frame.render_widget(Paragraph::new(lines), inner);

        if focused && self.windows.is_empty() && self.dialog.is_none() {
            let label = kind.labels()[self.focus.field];
            let prefix = u16::try_from(field_prefix(label).chars().count()).unwrap_or(u16::MAX);
            let typed = u16::try_from(form.value_len(self.focus.field)).unwrap_or(u16::MAX);
            let cursor_x = inner.x.saturating_add(prefix).saturating_add(typed);
            let cursor_y = inner
                .y
                .saturating_add(u16::try_from(self.focus.field).unwrap_or(u16::MAX));
            if cursor_x < inner.right() && cursor_y < inner.bottom() {
                frame.set_cursor_position((cursor_x, cursor_y));
            }
        }
    }

    fn draw_buttons(&self, frame: &mut Frame, area: Rect) {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let mut spans = Vec::new();
        for binding in &KEY_BINDINGS {
            spans.push(Span::styled(format!("[{}]", binding.hint), key_style));
            spans.push(Span::raw(format!(" {}   ", binding.action.label())));
        }
        let buttons = Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(buttons, area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        if self.dialog.is_some() {
            Line::from(vec![
                Span::styled("[Enter/Esc]", key_style),
                Span::raw(" Dismiss   "),
                Span::styled("[Ctrl+Q]", key_style),
                Span::raw(" Quit"),
            ])
        } else if !self.windows.is_empty() {
            Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Select   "),
                Span::styled("[PgUp/PgDn]", key_style),
                Span::raw(" Page   "),
                Span::styled("[F2-F4]", key_style),
                Span::raw(" Open Another   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Close Window   "),
                Span::styled("[Ctrl+Q]", key_style),
                Span::raw(" Quit"),
            ])
        } else {
            Line::from(vec![
                Span::styled("[Tab/↑↓]", key_style),
                Span::raw(" Move   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Submit Panel   "),
                Span::styled("[F2-F4]", key_style),
                Span::raw(" Show Table   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Quit"),
            ])
        }
    }

    fn draw_table_window(&self, frame: &mut Frame, area: Rect, window: &TableWindow, on_top: bool) {
        frame.render_widget(Clear, area);

        let border_style = if on_top {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .title(window.title())
            .borders(Borders::ALL)
            .border_style(border_style);

        let columns = window.view.columns();
        let header = Row::new(
            columns
                .iter()
                .map(|label| Cell::from(Line::from(*label).centered())),
        )
        .style(Style::default().add_modifier(Modifier::BOLD))
        .bottom_margin(1);

        let rows = window.view.rows.iter().map(|row| {
            Row::new(
                row.iter()
                    .map(|value| Cell::from(Line::from(value.clone()).centered())),
            )
        });

        let widths = vec![Constraint::Fill(1); columns.len()];
        let table = TableWidget::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        let mut state = TableState::default();
        if on_top && !window.view.is_empty() {
            state.select(Some(window.selected));
        }
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_dialog(&self, frame: &mut Frame, area: Rect, dialog: &Dialog) {
        let popup_area = centered_rect(50, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(dialog.title.as_str())
            .borders(Borders::ALL)
            .border_style(dialog.kind.style());

        let lines = vec![
            Line::from(Span::styled(dialog.message.clone(), dialog.kind.style())),
            Line::from(""),
            Line::from(Span::styled(
                "Press Enter to continue",
                Style::default().fg(Color::Gray),
            )),
        ];
        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);
    }
}

/// Borders plus one line per field and one for the submit button.
fn panel_height(kind: FormKind) -> u16 {
    kind.field_count() as u16 + 3
}

#[cfg(test)]
mod tests {
    use chrono::Local;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use super::*;

    fn app() -> App {
        App::new(Store::open_in_memory().unwrap(), ValidationPolicy::default())
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_key(code, KeyModifiers::NONE).unwrap()
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            press(app, KeyCode::Char(ch));
        }
    }

    fn rows(app: &App, table: Table) -> Vec<Vec<String>> {
        read_table(app.store.conn(), table).unwrap().rows
    }

    #[test]
    fn submitting_student_form_saves_and_clears() {
        let mut app = app();
        type_text(&mut app, "7");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "Ada");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "Maths");
        press(&mut app, KeyCode::Enter);

        assert_eq!(rows(&app, Table::Students), vec![vec!["7", "Ada", "Maths"]]);
        assert!(app.forms[FormKind::Student.index()]
            .values()
            .iter()
            .all(String::is_empty));
        let dialog = app.dialog.clone().unwrap();
        assert_eq!(dialog.kind, DialogKind::Info);
        assert_eq!(dialog.message, "Student added successfully.");
    }

    #[test]
    fn missing_field_shows_warning_and_keeps_input() {
        let mut app = app();
        type_text(&mut app, "1");
        press(&mut app, KeyCode::Enter);

        let dialog = app.dialog.clone().unwrap();
        assert_eq!(dialog.kind, DialogKind::Warning);
        assert_eq!(dialog.title, "Input Error");
        assert_eq!(dialog.message, "All fields are required.");
        assert_eq!(app.forms[FormKind::Student.index()].value(0), "1");
        assert!(rows(&app, Table::Students).is_empty());

        press(&mut app, KeyCode::Esc);
        assert!(app.dialog.is_none());
    }

    #[test]
    fn issue_panel_records_todays_date() {
        let mut app = app();
        // Student panel has three fields and book panel three more.
        for _ in 0..6 {
            press(&mut app, KeyCode::Tab);
        }
        assert_eq!(app.focus, Focus::first_of(FormKind::Issue));
        type_text(&mut app, "42");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "1");
        press(&mut app, KeyCode::Enter);

        let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
        let issues = rows(&app, Table::BookIssues);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0][1..], ["42".to_string(), "1".to_string(), today.clone()]);
        assert_eq!(
            app.dialog.clone().unwrap().message,
            format!("Book ID 1 issued to Student ID 42 on {today}.")
        );
    }

    #[test]
    fn duplicate_book_reports_error_dialog() {
        let mut app = app();
        app.store
            .conn()
            .execute(
                "INSERT INTO Books (book_id, title, author) VALUES (1, 'Dune', 'Herbert')",
                [],
            )
            .unwrap();

        app.focus = Focus::first_of(FormKind::Book);
        type_text(&mut app, "1");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "Emma");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "Austen");
        press(&mut app, KeyCode::Enter);

        let dialog = app.dialog.clone().unwrap();
        assert_eq!(dialog.kind, DialogKind::Error);
        assert_eq!(dialog.message, "Book ID 1 already exists.");
        assert_eq!(rows(&app, Table::Books).len(), 1);
        assert_eq!(app.forms[FormKind::Book.index()].value(1), "Emma");
    }

    #[test]
    fn showing_a_table_twice_opens_two_windows() {
        let mut app = app();
        press(&mut app, KeyCode::F(2));
        press(&mut app, KeyCode::F(2));
        assert_eq!(app.windows.len(), 2);
        assert_eq!(app.windows[0].number, 1);
        assert_eq!(app.windows[1].number, 2);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.windows.len(), 1);
        press(&mut app, KeyCode::Esc);
        assert!(app.windows.is_empty());
    }

    #[test]
    fn windows_are_snapshots() {
        let mut app = app();
        app.dispatch(Action::ShowBooks).unwrap();
        app.store
            .conn()
            .execute(
                "INSERT INTO Books (book_id, title, author) VALUES (1, 'Dune', 'Herbert')",
                [],
            )
            .unwrap();
        app.dispatch(Action::ShowBooks).unwrap();

        assert!(app.windows[0].view.is_empty());
        assert_eq!(app.windows[1].view.rows, vec![vec!["1", "Dune", "Herbert"]]);
    }

    #[test]
    fn focus_wraps_in_both_directions() {
        let start = Focus::first_of(FormKind::Student);
        assert_eq!(
            start.previous(),
            Focus {
                form: FormKind::Issue,
                field: 1
            }
        );
        let mut focus = start;
        for _ in 0..8 {
            focus = focus.next();
        }
        assert_eq!(focus, start);
    }

    #[test]
    fn quit_keys() {
        let mut app = app();
        assert!(app
            .handle_key(KeyCode::Char('q'), KeyModifiers::CONTROL)
            .unwrap());
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert!(press(&mut app, KeyCode::Esc));
    }

    #[test]
    fn very_long_field_renders_without_overflow() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        let name = "a".repeat(70_000);
        type_text(&mut app, &name);
        assert_eq!(app.forms[FormKind::Student.index()].value_len(1), 70_000);

        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
    }

    #[test]
    fn renders_main_screen_and_windows() {
        fn render(app: &App) -> String {
            let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
            terminal.draw(|frame| app.draw(frame)).unwrap();
            let screen = terminal
                .backend()
                .buffer()
                .content()
                .iter()
                .map(|cell| cell.symbol())
                .collect();
            screen
        }

        let mut app = app();
        let main_screen = render(&app);
        assert!(main_screen.contains("Library Management System"));
        assert!(main_screen.contains("Add New Student"));
        assert!(main_screen.contains("Show Issued Books"));

        app.dispatch(Action::ShowIssuedBooks).unwrap();
        let with_window = render(&app);
        assert!(with_window.contains("BookIssues Table #1"));
        assert!(with_window.contains("Issue Date"));
    }
}
