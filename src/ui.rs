use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use std::io;

use crate::models::{EditSession, FormFocus, FormState, PickerOutcome, Task};
use crate::picker::{format_deadline, DateTimePicker, PickerField};
use crate::tasklist::TaskList;

/// Presentation state: the controller plus UI-only scratch (list cursor,
/// search focus, the open picker). Every task mutation is a controller call.
pub struct App {
    pub tasks: TaskList,
    pub list_state: ListState,
    pub search_active: bool,
    pub form_focus: FormFocus,
    pub picker: Option<DateTimePicker>,
    pub should_quit: bool,
}

impl App {
    pub fn new() -> Self {
        App {
            tasks: TaskList::new(),
            list_state: ListState::default(),
            search_active: false,
            form_focus: FormFocus::Description,
            picker: None,
            should_quit: false,
        }
    }

    /// Route a key press to whichever layer currently captures input.
    /// Popups take priority: picker, then form, then the delete dialog.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.picker.is_some() {
            self.handle_picker_key(key.code);
        } else if matches!(self.tasks.form_state(), FormState::Open(_)) {
            self.handle_form_key(key.code, key.modifiers);
        } else if self.tasks.pending_delete().is_some() {
            self.handle_confirm_key(key.code);
        } else if self.search_active {
            self.handle_search_key(key.code);
        } else {
            self.handle_list_key(key.code);
        }
    }

    fn handle_picker_key(&mut self, code: KeyCode) {
        let outcome = match &mut self.picker {
            Some(picker) => match code {
                KeyCode::Left => {
                    picker.previous_field();
                    None
                }
                KeyCode::Right => {
                    picker.next_field();
                    None
                }
                KeyCode::Up => {
                    picker.step_up();
                    None
                }
                KeyCode::Down => {
                    picker.step_down();
                    None
                }
                KeyCode::Enter => Some(PickerOutcome::Confirmed(picker.date_time())),
                KeyCode::Esc => Some(PickerOutcome::Cancelled),
                _ => None,
            },
            None => None,
        };

        if let Some(outcome) = outcome {
            self.picker = None;
            if let PickerOutcome::Confirmed(value) = outcome {
                self.tasks.update_draft_deadline(&format_deadline(value));
            }
        }
    }

    fn handle_form_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            if code == KeyCode::Char('p') {
                self.open_picker();
            }
            return;
        }
        match code {
            KeyCode::Tab => {
                self.form_focus = match self.form_focus {
                    FormFocus::Description => FormFocus::Deadline,
                    FormFocus::Deadline => FormFocus::Description,
                };
            }
            KeyCode::Enter => {
                self.tasks.commit();
                self.clamp_selection();
            }
            KeyCode::Esc => {
                self.tasks.cancel();
            }
            KeyCode::Char(c) => self.push_draft_char(c),
            KeyCode::Backspace => self.pop_draft_char(),
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                if let Some(id) = self.tasks.pending_delete() {
                    self.tasks.delete(id);
                    self.clamp_selection();
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.tasks.cancel_delete();
            }
            _ => {}
        }
    }

    fn handle_search_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter | KeyCode::Esc => {
                self.search_active = false;
            }
            KeyCode::Char(c) => {
                let mut text = self.tasks.search_text().to_string();
                text.push(c);
                self.tasks.set_search_text(&text);
                self.clamp_selection();
            }
            KeyCode::Backspace => {
                let mut text = self.tasks.search_text().to_string();
                text.pop();
                self.tasks.set_search_text(&text);
                self.clamp_selection();
            }
            _ => {}
        }
    }

    fn handle_list_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Char('a') => {
                self.form_focus = FormFocus::Description;
                self.tasks.start_add();
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(id) = self.selected_id() {
                    self.form_focus = FormFocus::Description;
                    self.tasks.start_edit(id);
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected_id() {
                    self.tasks.request_delete(id);
                }
            }
            KeyCode::Char('/') => {
                self.search_active = true;
            }
            KeyCode::Down => self.next_item(),
            KeyCode::Up => self.previous_item(),
            _ => {}
        }
    }

    fn open_picker(&mut self) {
        let seed = DateTimePicker::from_display(self.tasks.deadline_draft());
        self.picker = Some(seed.unwrap_or_default());
        self.form_focus = FormFocus::Deadline;
    }

    fn push_draft_char(&mut self, c: char) {
        match self.form_focus {
            FormFocus::Description => {
                let mut draft = self.tasks.description_draft().to_string();
                draft.push(c);
                self.tasks.update_draft_description(&draft);
            }
            FormFocus::Deadline => {
                let mut draft = self.tasks.deadline_draft().to_string();
                draft.push(c);
                self.tasks.update_draft_deadline(&draft);
            }
        }
    }

    fn pop_draft_char(&mut self) {
        match self.form_focus {
            FormFocus::Description => {
                let mut draft = self.tasks.description_draft().to_string();
                draft.pop();
                self.tasks.update_draft_description(&draft);
            }
            FormFocus::Deadline => {
                let mut draft = self.tasks.deadline_draft().to_string();
                draft.pop();
                self.tasks.update_draft_deadline(&draft);
            }
        }
    }

    fn selected_id(&self) -> Option<u64> {
        let index = self.list_state.selected()?;
        self.tasks.visible_tasks().nth(index).map(|t| t.id)
    }

    fn next_item(&mut self) {
        let count = self.tasks.visible_tasks().count();
        if count == 0 {
            self.list_state.select(None);
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => {
                if i >= count - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    fn previous_item(&mut self) {
        let count = self.tasks.visible_tasks().count();
        if count == 0 {
            self.list_state.select(None);
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => {
                if i == 0 {
                    count - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    /// Keep the cursor inside the visible list after mutations or filter
    /// changes.
    fn clamp_selection(&mut self) {
        let count = self.tasks.visible_tasks().count();
        if count == 0 {
            self.list_state.select(None);
        } else {
            let i = self.list_state.selected().unwrap_or(0).min(count - 1);
            self.list_state.select(Some(i));
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

pub fn run_tui() -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new();
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key);
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    let title = Paragraph::new("Task Tracker")
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    f.render_widget(title, chunks[0]);

    let search_text = if app.tasks.search_text().is_empty() && !app.search_active {
        Span::styled("Search tasks", Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(
            app.tasks.search_text().to_string(),
            Style::default().fg(Color::White),
        )
    };
    let search = Paragraph::new(Line::from(search_text)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Search")
            .border_style(if app.search_active {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
            }),
    );
    f.render_widget(search, chunks[1]);

    render_tasks(f, app, chunks[2]);

    let help = Paragraph::new("a: Add | Enter: Edit | d: Delete | /: Search | q: Quit")
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(help, chunks[3]);

    if let FormState::Open(session) = app.tasks.form_state() {
        render_form(f, app, session);
    }

    if app.tasks.pending_delete().is_some() && app.picker.is_none() {
        render_delete_confirm(f);
    }

    if let Some(picker) = &app.picker {
        render_picker(f, picker);
    }
}

fn render_tasks(f: &mut Frame, app: &mut App, area: Rect) {
    let items: Vec<ListItem> = app
        .tasks
        .visible_tasks()
        .map(|task| {
            ListItem::new(vec![
                Line::from(Span::styled(
                    task.description.clone(),
                    Style::default().fg(Color::White),
                )),
                deadline_line(task),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Tasks"))
        .highlight_style(
            Style::default()
                .bg(Color::LightGreen)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");

    f.render_stateful_widget(list, area, &mut app.list_state);
}

fn deadline_line(task: &Task) -> Line<'static> {
    if task.deadline.is_empty() {
        Line::from(Span::styled(
            "   no deadline",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(Span::styled(
            format!("   Deadline: {}", task.deadline),
            Style::default().fg(Color::Blue),
        ))
    }
}

fn render_form(f: &mut Frame, app: &App, session: EditSession) {
    let popup_area = centered_rect(60, 45, f.area());
    let title = match session {
        EditSession::None => "Add Task",
        EditSession::Editing(_) => "Edit Task",
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .style(Style::default().bg(Color::DarkGray));

    let focus_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let label_style = Style::default().fg(Color::White);
    let description_focused = app.form_focus == FormFocus::Description;

    let mut lines = vec![
        Line::from(Span::styled(
            "Description",
            if description_focused { focus_style } else { label_style },
        )),
        Line::from(Span::styled(
            field_text(app.tasks.description_draft(), description_focused, ""),
            Style::default().fg(Color::White),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Deadline",
            if description_focused { label_style } else { focus_style },
        )),
        Line::from(Span::styled(
            field_text(
                app.tasks.deadline_draft(),
                !description_focused,
                "Set a deadline",
            ),
            if app.tasks.deadline_draft().is_empty() {
                Style::default().fg(Color::Gray)
            } else {
                Style::default().fg(Color::White)
            },
        )),
        Line::from(""),
    ];

    if let Some(message) = app.tasks.validation() {
        lines.push(Line::from(Span::styled(
            message,
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        "Enter: Save | Tab: Switch field | Ctrl+P: Date picker | Esc: Cancel",
        Style::default().fg(Color::Gray),
    )));

    let content = Paragraph::new(lines).block(block);
    f.render_widget(content, popup_area);
}

fn field_text(draft: &str, focused: bool, placeholder: &str) -> String {
    if draft.is_empty() && !focused {
        placeholder.to_string()
    } else if focused {
        format!("{draft}_")
    } else {
        draft.to_string()
    }
}

fn render_delete_confirm(f: &mut Frame) {
    let popup_area = centered_rect(50, 20, f.area());
    let block = Block::default()
        .title("Delete Task")
        .borders(Borders::ALL)
        .style(Style::default().bg(Color::DarkGray));
    let content = Paragraph::new(
        "Are you sure you want to delete this task?\n\nPress Y to delete\nPress N or ESC to cancel",
    )
    .block(block)
    .alignment(Alignment::Center)
    .style(Style::default().fg(Color::White));

    f.render_widget(content, popup_area);
}

fn render_picker(f: &mut Frame, picker: &DateTimePicker) {
    let popup_area = centered_rect(40, 25, f.area());
    let block = Block::default()
        .title("Set Deadline")
        .borders(Borders::ALL)
        .style(Style::default().bg(Color::DarkGray));

    let segment = |text: String, focused: bool| {
        if focused {
            Span::styled(text, Style::default().bg(Color::Cyan).fg(Color::Black))
        } else {
            Span::styled(text, Style::default().fg(Color::White))
        }
    };

    let value_line = Line::from(vec![
        segment(format!("{:04}", picker.year), picker.field == PickerField::Year),
        Span::raw("-"),
        segment(format!("{:02}", picker.month), picker.field == PickerField::Month),
        Span::raw("-"),
        segment(format!("{:02}", picker.day), picker.field == PickerField::Day),
        Span::raw(" "),
        segment(format!("{:02}", picker.hour), picker.field == PickerField::Hour),
        Span::raw(":"),
        segment(format!("{:02}", picker.minute), picker.field == PickerField::Minute),
    ]);

    let lines = vec![
        Line::from(""),
        value_line,
        Line::from(""),
        Line::from(Span::styled(
            "Left/Right: Field | Up/Down: Adjust",
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            "Enter: Confirm | Esc: Cancel",
            Style::default().fg(Color::Gray),
        )),
    ];

    let content = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center);
    f.render_widget(content, popup_area);
}

// Helper function to create centered rectangles for popups
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
