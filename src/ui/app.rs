use std::mem;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;

use crate::store::RecordStore;

use super::forms::{ConfirmRemove, EntryField, EntryForm};
use super::helpers::{centered_rect, display_date, display_distance, surface_error};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Rows skipped by PageUp/PageDown.
const PAGE_STEP: isize = 5;
const DATE_LABEL: &str = "Date";
const DISTANCE_LABEL: &str = "Distance (km)";

/// Fine-grained modes layered over the record table.
enum Mode {
    Normal,
    Adding(EntryForm),
    Editing(EntryForm),
    ConfirmRemove(ConfirmRemove),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Session state for the terminal front-end. The record store is owned here
/// for the lifetime of the session; everything drawn comes from its view.
pub struct App {
    store: RecordStore,
    selected: usize,
    today: NaiveDate,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    /// `today` pre-fills the date field of new entries.
    pub fn new(store: RecordStore, today: NaiveDate) -> Self {
        Self {
            store,
            selected: 0,
            today,
            mode: Mode::Normal,
            status: None,
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Dispatch a key press to the active mode. Returns `true` once the user
    /// asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::Adding(form) => self.handle_add(code, form),
            Mode::Editing(form) => self.handle_edit(code, form),
            Mode::ConfirmRemove(confirm) => self.handle_confirm_remove(code, confirm)?,
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                *exit = true;
            }
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::PageUp => self.move_selection(-PAGE_STEP),
            KeyCode::PageDown => self.move_selection(PAGE_STEP),
            KeyCode::Home => self.selected = 0,
            KeyCode::End => self.selected = self.store.len().saturating_sub(1),
            KeyCode::Char('+') | KeyCode::Char('a') | KeyCode::Char('A') => {
                self.clear_status();
                return Mode::Adding(EntryForm::for_day(self.today));
            }
            KeyCode::Char('e') | KeyCode::Char('E') | KeyCode::Enter => {
                if self.store.is_empty() {
                    self.set_status("No record selected to edit.", StatusKind::Error);
                } else {
                    match self.store.begin_edit(self.selected) {
                        Ok(record) => {
                            self.clear_status();
                            return Mode::Editing(EntryForm::from_record(&record));
                        }
                        Err(err) => self.set_status(err.to_string(), StatusKind::Error),
                    }
                }
            }
            KeyCode::Char('-') | KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Delete => {
                if let Some(record) = self.store.get(self.selected).cloned() {
                    self.clear_status();
                    return Mode::ConfirmRemove(ConfirmRemove {
                        index: self.selected,
                        record,
                    });
                }
                self.set_status("No record selected to remove.", StatusKind::Error);
            }
            _ => {}
        }
        Mode::Normal
    }

    fn handle_add(&mut self, code: KeyCode, mut form: EntryForm) -> Mode {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Add cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::BackTab => form.toggle_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_new_entry(&form) {
                Ok(()) => keep_open = false,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Mode::Adding(form)
        } else {
            Mode::Normal
        }
    }

    fn handle_edit(&mut self, code: KeyCode, mut form: EntryForm) -> Mode {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.store.cancel_edit();
                self.set_status("Edit cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::BackTab => form.toggle_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_edited_entry(&form) {
                Ok(()) => keep_open = false,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Mode::Editing(form)
        } else {
            Mode::Normal
        }
    }

    fn handle_confirm_remove(&mut self, code: KeyCode, confirm: ConfirmRemove) -> Result<Mode> {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                let removed = self.store.remove(confirm.index)?;
                self.clamp_selection();
                self.set_status(
                    format!("Removed {}.", display_date(removed.date)),
                    StatusKind::Info,
                );
                Ok(Mode::Normal)
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.set_status("Removal cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            _ => Ok(Mode::ConfirmRemove(confirm)),
        }
    }

    fn save_new_entry(&mut self, form: &EntryForm) -> Result<()> {
        let (date, distance) = form.parse_inputs()?;
        let merged = self.store.position_of(date).is_some();
        self.selected = self.store.add_or_merge(date, distance);
        let verb = if merged { "Added to" } else { "Logged" };
        self.set_status(
            format!("{verb} {}.", display_date(date)),
            StatusKind::Info,
        );
        Ok(())
    }

    fn save_edited_entry(&mut self, form: &EntryForm) -> Result<()> {
        let (date, distance) = form.parse_inputs()?;
        let index = self
            .store
            .save_edit(date, distance)
            .ok_or_else(|| anyhow!("The edited record no longer exists."))?;
        self.selected = index;
        self.set_status(
            format!("Updated {}.", display_date(date)),
            StatusKind::Info,
        );
        Ok(())
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        self.draw_records(frame, content_area);

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::Adding(form) => self.draw_entry_form(frame, area, "Log Distance", form),
            Mode::Editing(form) => self.draw_entry_form(frame, area, "Edit Entry", form),
            Mode::ConfirmRemove(confirm) => self.draw_confirm_remove(frame, area, confirm),
            Mode::Normal => {}
        }
    }

    fn draw_records(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title(format!(
            "Daily distance ({} km total)",
            display_distance(self.store.total_distance())
        ));

        if self.store.is_empty() {
            let message = Paragraph::new("No entries yet. Press '+' to log a distance.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let editing = self.store.edit_cursor();
        let rows: Vec<Row> = self
            .store
            .view()
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let marker = if editing == Some(index) { "editing" } else { "" };
                Row::new(vec![
                    Cell::from(display_date(record.date)),
                    Cell::from(display_distance(record.distance)),
                    Cell::from(Span::styled(marker, Style::default().fg(Color::DarkGray))),
                ])
            })
            .collect();

        let header = Row::new(vec!["Date", "Distance, km", ""]).style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

        let table = Table::new(
            rows,
            [
                Constraint::Length(12),
                Constraint::Length(14),
                Constraint::Min(0),
            ],
        )
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().fg(Color::Yellow))
        .highlight_symbol("▶ ");

        let mut state = TableState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(table, area, &mut state);
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

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match &self.mode {
            Mode::Adding(_) | Mode::Editing(_) => Line::from(vec![
                Span::styled("[Enter]", key_style),
                Span::raw(" Save   "),
                Span::styled("[Tab]", key_style),
                Span::raw(" Switch field   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            Mode::ConfirmRemove(_) => Line::from(vec![
                Span::styled("[Y]", key_style),
                Span::raw(" Remove   "),
                Span::styled("[N]", key_style),
                Span::raw(" Keep"),
            ]),
            Mode::Normal => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Navigate   "),
                Span::styled("[+]", key_style),
                Span::raw(" Add   "),
                Span::styled("[e]", key_style),
                Span::raw(" Edit   "),
                Span::styled("[-]", key_style),
                Span::raw(" Remove   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
        }
    }

    fn draw_entry_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &EntryForm) {
        let popup_area = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let date_line = form.build_line(DATE_LABEL, EntryField::Date);
        let distance_line = form.build_line(DISTANCE_LABEL, EntryField::Distance);

        let mut lines = vec![date_line, distance_line, Line::from("")];

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Date as YYYY-MM-DD • same-day entries are added together",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let (label, row) = match form.active {
            EntryField::Date => (DATE_LABEL, 0),
            EntryField::Distance => (DISTANCE_LABEL, 1),
        };
        let prefix = format!("{label}: ").len() as u16;
        let cursor_x = inner.x + prefix + form.value_len(form.active) as u16;
        frame.set_cursor_position((cursor_x, inner.y + row));
    }

    fn draw_confirm_remove(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmRemove) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Removal")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!(
                "Remove {} ({} km)?",
                display_date(confirm.record.date),
                display_distance(confirm.record.distance)
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    fn move_selection(&mut self, offset: isize) {
        if self.store.is_empty() {
            return;
        }
        let last = self.store.len() as isize - 1;
        self.selected = (self.selected as isize + offset).clamp(0, last) as usize;
    }

    fn clamp_selection(&mut self) {
        if self.selected >= self.store.len() {
            self.selected = self.store.len().saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use super::*;

    fn day(raw: &str) -> NaiveDate {
        crate::models::Record::parse_date(raw).unwrap()
    }

    fn app_with_records() -> App {
        let mut store = RecordStore::new();
        store.add_or_merge(day("2024-03-01"), 5.0);
        store.add_or_merge(day("2024-03-05"), 3.0);
        App::new(store, day("2024-03-10"))
    }

    fn press(app: &mut App, keys: &[KeyCode]) {
        for key in keys {
            app.handle_key(*key).unwrap();
        }
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch)).unwrap();
        }
    }

    fn clear_field(app: &mut App) {
        for _ in 0..16 {
            app.handle_key(KeyCode::Backspace).unwrap();
        }
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_add_entry_defaults_to_today() {
        let mut app = app_with_records();
        press(&mut app, &[KeyCode::Char('+')]);
        type_text(&mut app, "4.5");
        press(&mut app, &[KeyCode::Enter]);

        let view = app.store().view();
        assert_eq!(view[0].iso_date(), "2024-03-10");
        assert_eq!(view[0].distance, 4.5);
        assert_eq!(app.selected, 0);
        assert!(matches!(app.mode, Mode::Normal));
    }

    #[test]
    fn test_add_same_day_merges() {
        let mut app = app_with_records();
        press(&mut app, &[KeyCode::Char('a'), KeyCode::Tab]);
        clear_field(&mut app);
        type_text(&mut app, "2024-03-01");
        press(&mut app, &[KeyCode::Tab]);
        type_text(&mut app, "2.5");
        press(&mut app, &[KeyCode::Enter]);

        assert_eq!(app.store().len(), 2);
        assert_eq!(app.store().view()[1].distance, 7.5);
        assert_eq!(app.selected, 1);
    }

    #[test]
    fn test_missing_distance_keeps_form_open() {
        let mut app = app_with_records();
        press(&mut app, &[KeyCode::Char('+'), KeyCode::Enter]);

        assert_eq!(app.store().len(), 2);
        match &app.mode {
            Mode::Adding(form) => {
                assert_eq!(form.error.as_deref(), Some("Distance is required."))
            }
            _ => panic!("form should stay open"),
        }
    }

    #[test]
    fn test_edit_selected_row() {
        let mut app = app_with_records();
        press(&mut app, &[KeyCode::Down, KeyCode::Char('e')]);
        assert_eq!(app.store().edit_cursor(), Some(1));

        clear_field(&mut app);
        type_text(&mut app, "10");
        press(&mut app, &[KeyCode::Enter]);

        let view = app.store().view();
        assert_eq!(view[1].iso_date(), "2024-03-01");
        assert_eq!(view[1].distance, 10.0);
        assert_eq!(app.store().edit_cursor(), None);
    }

    #[test]
    fn test_escape_cancels_edit() {
        let mut app = app_with_records();
        press(&mut app, &[KeyCode::Enter]);
        type_text(&mut app, "9");
        press(&mut app, &[KeyCode::Esc]);

        assert_eq!(app.store().edit_cursor(), None);
        assert_eq!(app.store().view()[0].distance, 3.0);
        assert!(matches!(app.mode, Mode::Normal));
    }

    #[test]
    fn test_remove_requires_confirmation() {
        let mut app = app_with_records();
        press(&mut app, &[KeyCode::Char('-'), KeyCode::Char('n')]);
        assert_eq!(app.store().len(), 2);

        press(&mut app, &[KeyCode::Down, KeyCode::Char('d'), KeyCode::Char('y')]);
        assert_eq!(app.store().len(), 1);
        assert_eq!(app.store().view()[0].iso_date(), "2024-03-05");
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn test_empty_store_reports_missing_selection() {
        let mut app = App::new(RecordStore::new(), day("2024-03-10"));
        press(&mut app, &[KeyCode::Char('e')]);
        assert!(matches!(app.mode, Mode::Normal));
        press(&mut app, &[KeyCode::Char('-')]);
        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(
            app.status.as_ref().map(|status| status.text.as_str()),
            Some("No record selected to remove.")
        );
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app_with_records();
        assert!(app.handle_key(KeyCode::Char('q')).unwrap());

        let mut app = app_with_records();
        press(&mut app, &[KeyCode::Char('+')]);
        assert!(!app.handle_key(KeyCode::Char('q')).unwrap());
    }

    #[test]
    fn test_render_shows_day_first_dates_in_order() {
        let app = app_with_records();
        let screen = render(&app);
        let newer = screen.find("05.03.2024").unwrap();
        let older = screen.find("01.03.2024").unwrap();
        assert!(newer < older);
        assert!(screen.contains("8 km total"));
    }

    #[test]
    fn test_render_empty_hint() {
        let app = App::new(RecordStore::new(), day("2024-03-10"));
        assert!(render(&app).contains("No entries yet."));
    }
}
