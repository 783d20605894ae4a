//! Application state and key handling.
//!
//! The `App` owns the catalog, the cursor, the viewport, and the edit
//! session. All mutations happen synchronously inside one key handler, and
//! every mutation persists the catalog and rebuilds the display projection.
//! Side effects with an OS surface (launching, link opening) are returned to
//! the event loop as an `AppAction` instead of being performed here.

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use crate::launcher::Outcome;
use crate::project::{Field, Project};
use crate::store::CatalogStore;
use crate::view::{self, ColumnLayout, Projection};

const STATUS_TTL: Duration = Duration::from_secs(3);

/// Side effects the event loop performs on the app's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    None,
    Quit,
    Launch(Project),
    OpenLink(Project),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
}

#[derive(Debug, Clone)]
struct StatusMessage {
    text: String,
    at: Instant,
    ttl: Duration,
    level: StatusLevel,
}

/// A minimal single-line text editor with a character-addressed cursor.
#[derive(Debug, Clone, Default)]
pub struct EditBuffer {
    value: String,
    cursor: usize,
}

impl EditBuffer {
    fn load(value: &str) -> Self {
        Self {
            value: value.to_string(),
            cursor: value.chars().count(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map(|(index, _)| index)
            .unwrap_or(self.value.len())
    }

    fn insert(&mut self, c: char) {
        let at = self.byte_index();
        self.value.insert(at, c);
        self.cursor += 1;
    }

    fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index();
            self.value.remove(at);
        }
    }

    fn delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            let at = self.byte_index();
            self.value.remove(at);
        }
    }

    fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    fn move_right(&mut self) {
        if self.cursor < self.value.chars().count() {
            self.cursor += 1;
        }
    }

    fn move_home(&mut self) {
        self.cursor = 0;
    }

    fn move_end(&mut self) {
        self.cursor = self.value.chars().count();
    }
}

/// An in-flight edit of one catalog record.
#[derive(Debug, Clone)]
struct EditSession {
    /// Catalog index of the record being edited; stable across re-sorting.
    index: usize,
    field: Field,
    buffer: EditBuffer,
}

/// The main application state container.
#[derive(Debug)]
pub struct App {
    /// The authoritative, persisted catalog.
    pub projects: Vec<Project>,
    store: CatalogStore,
    /// Cursor position as a display-row index.
    pub cursor: usize,
    /// Index of the first visible column before clamping.
    pub scroll_offset: usize,
    width: u16,
    height: u16,
    pub layout: ColumnLayout,
    pub projection: Projection,
    edit: Option<EditSession>,
    status: Option<StatusMessage>,
    pub show_help: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(projects: Vec<Project>, store: CatalogStore) -> Self {
        let mut app = Self {
            projects,
            store,
            cursor: 0,
            scroll_offset: 0,
            width: 100,
            height: 24,
            layout: ColumnLayout::fit(100, 0),
            projection: Projection::default(),
            edit: None,
            status: None,
            show_help: false,
            should_quit: false,
        };
        app.refresh_table();
        app
    }

    /// Recomputes the column window and the display projection, clamping the
    /// cursor to the new row set.
    pub fn refresh_table(&mut self) {
        self.layout = ColumnLayout::fit(self.width, self.scroll_offset);
        self.scroll_offset = self.layout.start;
        self.projection = Projection::build(&self.projects, &self.layout);
        let len = self.projection.len();
        if len == 0 {
            self.cursor = 0;
        } else if self.cursor >= len {
            self.cursor = len - 1;
        }
    }

    pub fn handle_resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.refresh_table();
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        if self.edit.is_some() {
            self.handle_edit_key(key)
        } else {
            self.handle_normal_key(key)
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.edit.is_some() {
            return;
        }
        match mouse.kind {
            MouseEventKind::ScrollUp => self.move_cursor_up(),
            MouseEventKind::ScrollDown => self.move_cursor_down(),
            _ => {}
        }
    }

    /// Field label and live buffer of the active edit, for rendering.
    pub fn edit_view(&self) -> Option<(&'static str, &EditBuffer)> {
        self.edit
            .as_ref()
            .map(|edit| (edit.field.label(), &edit.buffer))
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.set_status_with(message, StatusLevel::Info, STATUS_TTL);
    }

    pub fn set_status_warning(&mut self, message: impl Into<String>) {
        self.set_status_with(message, StatusLevel::Warning, STATUS_TTL);
    }

    fn set_status_with(&mut self, message: impl Into<String>, level: StatusLevel, ttl: Duration) {
        self.status = Some(StatusMessage {
            text: message.into(),
            at: Instant::now(),
            ttl,
            level,
        });
    }

    /// The current status message, or `None` once it has expired. Expiry is
    /// evaluated lazily at render time; nothing schedules a removal.
    pub fn status_message(&self) -> Option<(&str, StatusLevel)> {
        let message = self.status.as_ref()?;
        if message.at.elapsed() < message.ttl {
            Some((&message.text, message.level))
        } else {
            None
        }
    }

    /// Surfaces a launch or link-open outcome on the status line.
    pub fn report(&mut self, outcome: Outcome) {
        if outcome.ok {
            self.set_status(outcome.message);
        } else {
            self.set_status_warning(outcome.message);
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                AppAction::Quit
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                AppAction::Quit
            }
            KeyCode::Char('e') => {
                self.start_edit();
                AppAction::None
            }
            KeyCode::Char('n') | KeyCode::Char('a') => {
                self.add_project();
                AppAction::None
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                self.delete_selected();
                AppAction::None
            }
            KeyCode::Char(' ') | KeyCode::Enter => match self.selected_project() {
                Some(project) => AppAction::Launch(project),
                None => AppAction::None,
            },
            KeyCode::Char('o') => match self.selected_project() {
                Some(project) => AppAction::OpenLink(project),
                None => AppAction::None,
            },
            KeyCode::Char('r') => {
                self.reload();
                AppAction::None
            }
            KeyCode::Char('?') => {
                self.show_help = !self.show_help;
                AppAction::None
            }
            KeyCode::Up => {
                self.move_cursor_up();
                AppAction::None
            }
            KeyCode::Down => {
                self.move_cursor_down();
                AppAction::None
            }
            KeyCode::Home => {
                self.cursor = 0;
                AppAction::None
            }
            KeyCode::End => {
                self.cursor = self.projection.len().saturating_sub(1);
                AppAction::None
            }
            KeyCode::Left => {
                if self.scroll_offset > 0 {
                    self.scroll_offset -= 1;
                    self.refresh_table();
                }
                AppAction::None
            }
            KeyCode::Right => {
                if self.scroll_offset < self.layout.max_offset() {
                    self.scroll_offset += 1;
                    self.refresh_table();
                }
                AppAction::None
            }
            _ => AppAction::None,
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Esc => {
                // Cancel discards the buffer without touching the catalog.
                self.edit = None;
            }
            KeyCode::Enter => {
                self.commit_field();
                self.edit = None;
                self.refresh_table();
                self.set_status("Project updated");
                self.save();
            }
            KeyCode::Tab => self.cycle_field(true),
            KeyCode::BackTab => self.cycle_field(false),
            code => {
                if let Some(edit) = self.edit.as_mut() {
                    match code {
                        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                            edit.buffer.insert(c);
                        }
                        KeyCode::Backspace => edit.buffer.backspace(),
                        KeyCode::Delete => edit.buffer.delete(),
                        KeyCode::Left => edit.buffer.move_left(),
                        KeyCode::Right => edit.buffer.move_right(),
                        KeyCode::Home => edit.buffer.move_home(),
                        KeyCode::End => edit.buffer.move_end(),
                        _ => {}
                    }
                }
            }
        }
        AppAction::None
    }

    fn move_cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    fn move_cursor_down(&mut self) {
        if self.cursor + 1 < self.projection.len() {
            self.cursor += 1;
        }
    }

    /// The record behind the cursor, if the cursor is on a data row.
    pub fn selected_project(&self) -> Option<Project> {
        view::project_for_row(&self.projects, &self.projection, self.cursor).cloned()
    }

    /// Enters edit mode on the selected record, starting at the name field.
    /// No-op on an empty catalog or a header row.
    fn start_edit(&mut self) {
        if self.projects.is_empty() {
            return;
        }
        let Some(index) = view::original_index_for_row(&self.projects, &self.projection, self.cursor)
        else {
            return;
        };
        let field = Field::Name;
        let buffer = EditBuffer::load(field.get(&self.projects[index]));
        self.edit = Some(EditSession {
            index,
            field,
            buffer,
        });
    }

    /// Writes the live buffer into the record. The caller persists.
    fn commit_field(&mut self) {
        let Some(edit) = self.edit.as_ref() else {
            return;
        };
        let (index, field, value) = (edit.index, edit.field, edit.buffer.value().to_string());
        if let Some(project) = self.projects.get_mut(index) {
            field.set(project, value);
        }
    }

    /// Moves the edit to the next or previous field, committing the current
    /// buffer first so switching fields never loses typed input.
    fn cycle_field(&mut self, forward: bool) {
        self.commit_field();
        self.refresh_table();
        self.save();
        let Some(edit) = self.edit.as_mut() else {
            return;
        };
        edit.field = if forward {
            edit.field.next()
        } else {
            edit.field.prev()
        };
        let value = self
            .projects
            .get(edit.index)
            .map(|project| edit.field.get(project).to_string())
            .unwrap_or_default();
        edit.buffer = EditBuffer::load(&value);
    }

    /// Appends a template record, moves the cursor onto it, and starts
    /// editing its name.
    fn add_project(&mut self) {
        self.projects.push(Project::template());
        self.refresh_table();
        let index = self.projects.len() - 1;
        if let Some(row) = view::display_row_for_index(&self.projects, &self.projection, index) {
            self.cursor = row;
        }
        self.start_edit();
        self.set_status("New project added");
        self.save();
    }

    /// Deletes the record behind the cursor. No-op on header rows.
    fn delete_selected(&mut self) {
        if self.projects.is_empty() {
            return;
        }
        let Some(index) = view::original_index_for_row(&self.projects, &self.projection, self.cursor)
        else {
            return;
        };
        let removed = self.projects.remove(index);
        self.refresh_table();
        self.set_status(format!("Deleted {}", removed.name));
        self.save();
    }

    /// Replaces the catalog with the on-disk contents.
    fn reload(&mut self) {
        self.projects = self.store.load();
        self.refresh_table();
        self.set_status("Refreshed");
    }

    // Persists the catalog. A failed write keeps the in-memory mutation and
    // surfaces a warning instead of dropping the error.
    fn save(&mut self) {
        if let Err(err) = self.store.save(&self.projects) {
            self.set_status_warning(format!("Failed to save projects: {:#}", err));
        }
    }

    /// Whether horizontal scrolling is worth hinting at in the footer.
    pub fn columns_scrollable(&self) -> bool {
        self.layout.is_scrollable()
    }
}
