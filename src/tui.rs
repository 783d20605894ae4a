//! Terminal setup and rendering.
//!
//! This module handles initializing the terminal in raw mode, restoring it on
//! exit, and drawing the application state using `ratatui`.

use std::io::{self, Stdout};

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Row, Table, TableState};
use ratatui::Terminal;

use crate::app::{App, EditBuffer, StatusLevel};

/// Type alias for the specific terminal backend used.
pub type TuiTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Initializes the terminal for TUI mode.
pub fn init_terminal() -> io::Result<TuiTerminal> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

/// Restores the terminal to its original state.
pub fn restore_terminal(mut terminal: TuiTerminal) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Draws the current application state to the terminal.
pub fn draw(app: &mut App, terminal: &mut TuiTerminal) -> io::Result<()> {
    execute!(terminal.backend_mut(), SetTitle(window_title(app)))?;
    terminal.draw(|frame| {
        let area = frame.size();
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(4)])
            .split(area);

        let border_style = Style::default().fg(Color::DarkGray);
        let table_block = Block::default()
            .title("launchpad")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style);

        if app.projects.is_empty() {
            let welcome = Paragraph::new(
                "\nNo projects configured yet.\n\nPress 'n' to add your first project!",
            )
            .style(Style::default().fg(Color::Gray))
            .block(table_block);
            frame.render_widget(welcome, vertical[0]);
        } else {
            let header = Row::new(
                app.layout
                    .columns
                    .iter()
                    .map(|column| column.title)
                    .collect::<Vec<_>>(),
            )
            .style(Style::default().add_modifier(Modifier::BOLD));

            let rows: Vec<Row> = app
                .projection
                .rows
                .iter()
                .enumerate()
                .map(|(index, cells)| {
                    let row = Row::new(cells.clone());
                    if app.projection.is_header(index) {
                        row.style(
                            Style::default()
                                .fg(Color::DarkGray)
                                .add_modifier(Modifier::BOLD),
                        )
                    } else {
                        row
                    }
                })
                .collect();

            let widths: Vec<Constraint> = app
                .layout
                .columns
                .iter()
                .map(|column| Constraint::Length(column.width))
                .collect();

            let table = Table::new(rows, widths)
                .header(header)
                .block(table_block)
                .highlight_style(
                    Style::default()
                        .fg(Color::Indexed(229))
                        .bg(Color::Indexed(57)),
                );
            frame.render_stateful_widget(
                table,
                vertical[0],
                &mut table_state(app.cursor, app.projection.len()),
            );
        }

        let footer = Paragraph::new(Text::from(footer_lines(app))).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(border_style),
        );
        frame.render_widget(footer, vertical[1]);

        if app.show_help {
            let popup = centered_rect(50, 60, area);
            let help = Paragraph::new(HELP_TEXT)
                .block(
                    Block::default()
                        .title("Help")
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded),
                )
                .style(Style::default().bg(Color::DarkGray).fg(Color::White));
            frame.render_widget(Clear, popup);
            frame.render_widget(help, popup);
        }
    })?;
    Ok(())
}

const HELP_TEXT: &str = "Navigation:\n  \
    Up/Down      Select row\n  \
    Left/Right   Scroll columns\n  \
    Home/End     Jump to first/last row\n\n\
    Actions:\n  \
    Space/Enter  Launch project\n  \
    e            Edit project\n  \
    n / a        Add project\n  \
    d / Delete   Delete project\n  \
    r            Reload from disk\n  \
    o            Open link in browser\n\n\
    Editing:\n  \
    Tab          Next field (saves input)\n  \
    Shift+Tab    Previous field\n  \
    Enter        Save\n  \
    Esc          Cancel\n\n\
    General:\n  \
    ?            Toggle this help\n  \
    q            Quit";

fn window_title(app: &App) -> String {
    match app.selected_project() {
        Some(project) => format!("launchpad · {}", project.name),
        None => "launchpad".to_string(),
    }
}

fn footer_lines(app: &App) -> Vec<Line<'static>> {
    if let Some((label, buffer)) = app.edit_view() {
        return vec![
            edit_line(label, buffer),
            Line::from(Span::styled(
                "tab: next field | shift+tab: previous | enter: save | esc: cancel",
                Style::default().fg(Color::DarkGray),
            )),
        ];
    }

    let mut help = String::from(
        "Up/Down select | Space/Enter launch | e edit | n add | d delete | r reload | o link",
    );
    if app.columns_scrollable() {
        help.push_str(" | Left/Right columns");
    }
    help.push_str(" | ? help | q quit");

    let status = match app.status_message() {
        Some((text, level)) => {
            let color = match level {
                StatusLevel::Info => Color::Green,
                StatusLevel::Warning => Color::Red,
            };
            Line::from(vec![
                Span::raw("> "),
                Span::styled(text.to_string(), Style::default().fg(color)),
            ])
        }
        None => Line::default(),
    };

    vec![
        Line::from(Span::styled(help, Style::default().fg(Color::DarkGray))),
        status,
    ]
}

// The edit bar renders its own cursor as a reversed cell; the hardware
// cursor stays hidden with the rest of the TUI.
fn edit_line(label: &'static str, buffer: &EditBuffer) -> Line<'static> {
    let value = buffer.value();
    let cursor = buffer.cursor();
    let before: String = value.chars().take(cursor).collect();
    let at: String = value.chars().skip(cursor).take(1).collect();
    let after: String = value.chars().skip(cursor + 1).collect();

    let mut spans = vec![
        Span::styled(
            format!("Editing {}: ", label),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(before),
    ];
    if at.is_empty() {
        spans.push(Span::styled(
            " ".to_string(),
            Style::default().add_modifier(Modifier::REVERSED),
        ));
    } else {
        spans.push(Span::styled(
            at,
            Style::default().add_modifier(Modifier::REVERSED),
        ));
        spans.push(Span::raw(after));
    }
    Line::from(spans)
}

fn table_state(selected: usize, len: usize) -> TableState {
    let mut state = TableState::default();
    if len > 0 {
        state.select(Some(selected.min(len - 1)));
    }
    state
}

fn centered_rect(percent_x: u16, percent_y: u16, r: ratatui::layout::Rect) -> ratatui::layout::Rect {
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
