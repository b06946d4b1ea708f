//! UI rendering functions for the TUI.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

use super::state::App;
use super::types::{Focus, Selector};
use crate::sort::SortKey;
use crate::table::{EraImage, COLUMNS};

/// Column widths, in [`COLUMNS`] order.
const WIDTHS: [Constraint; 11] = [
    Constraint::Length(5),
    Constraint::Length(24),
    Constraint::Length(7),
    Constraint::Length(10),
    Constraint::Length(9),
    Constraint::Length(18),
    Constraint::Length(18),
    Constraint::Length(28),
    Constraint::Length(28),
    Constraint::Length(36),
    Constraint::Min(20),
];

/// Draw the UI.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let size = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Filters
            Constraint::Min(0),    // Table
            Constraint::Length(7), // Details
            Constraint::Length(3), // Footer
        ])
        .split(size);

    draw_header(frame, app, chunks[0]);
    draw_filters(frame, app, chunks[1]);

    if app.loading {
        draw_loading(frame, chunks[2]);
    } else {
        draw_table(frame, app, chunks[2]);
    }

    draw_details(frame, app, chunks[3]);
    draw_footer(frame, app, chunks[4]);

    if let Some(error) = &app.error_message {
        draw_error_popup(frame, error);
    }

    if app.show_help {
        draw_help_modal(frame);
    }
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn era_color(image: EraImage) -> Color {
    match image {
        EraImage::Classic => Color::Yellow,
        EraImage::Modern => Color::Cyan,
        EraImage::Recent => Color::Magenta,
    }
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let sort_text = match app.sort.active() {
        Some((key, direction)) => format!("[sorted: {} {}]", key, direction.as_str()),
        None => "[unsorted]".to_string(),
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "episode-browser",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!("[{}/{} episodes]", app.view().len(), app.total_count()),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  "),
        Span::styled(sort_text, Style::default().fg(Color::Yellow)),
        if app.compose_filter_and_sort {
            Span::styled("  [compose]", Style::default().fg(Color::Red))
        } else {
            Span::raw("")
        },
    ]))
    .block(Block::default().borders(Borders::ALL));

    frame.render_widget(header, area);
}

fn draw_filters(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
        ])
        .split(area);

    let name_focused = app.focus == Focus::NameFilter;
    let name_text = if app.name_input.is_empty() && !name_focused {
        "Press '/' to filter by name..."
    } else {
        app.name_input.as_str()
    };

    let name = Paragraph::new(name_text)
        .style(if name_focused {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Name")
                .border_style(border_style(name_focused)),
        );
    frame.render_widget(name, chunks[0]);

    if name_focused {
        let width = app.name_input.chars().count() as u16;
        frame.set_cursor_position((chunks[0].x + width + 1, chunks[0].y + 1));
    }

    draw_selector(frame, &app.era_selector, app.focus == Focus::EraFilter, chunks[1]);
    draw_selector(frame, &app.doctor_selector, app.focus == Focus::DoctorFilter, chunks[2]);
    draw_selector(
        frame,
        &app.companion_selector,
        app.focus == Focus::CompanionFilter,
        chunks[3],
    );
}

fn draw_selector(frame: &mut Frame, selector: &Selector, focused: bool, area: Rect) {
    let value_style = if selector.value().is_some() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let text = if focused {
        Line::from(vec![
            Span::raw("< "),
            Span::styled(selector.display().to_string(), value_style),
            Span::raw(" >"),
        ])
    } else {
        Line::from(Span::styled(selector.display().to_string(), value_style))
    };

    let widget = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(selector.label)
            .border_style(border_style(focused)),
    );
    frame.render_widget(widget, area);
}

fn draw_loading(frame: &mut Frame, area: Rect) {
    let loading = Paragraph::new("Fetching episode data...")
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL).title("Loading"));

    frame.render_widget(loading, area);
}

fn draw_table(frame: &mut Frame, app: &mut App, area: Rect) {
    let table_focused = app.focus == Focus::Table;
    let active = app.sort.active();

    let header_cells: Vec<Cell> = COLUMNS
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let mut title = column.title.to_string();
            if let (Some((key, direction)), Some(column_key)) = (active, column.sort_key) {
                if key == column_key {
                    title = format!("{} {}", title, direction.arrow());
                }
            }

            let style = if table_focused && i == app.selected_column {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };
            Cell::from(title).style(style)
        })
        .collect();

    let rows: Vec<Row> = app
        .rows()
        .iter()
        .map(|row| {
            let cells = row.cells().into_iter().enumerate().map(|(i, text)| {
                let cell = Cell::from(text.to_string());
                if COLUMNS[i].sort_key == Some(SortKey::Era) {
                    cell.style(Style::default().fg(era_color(row.era_image)))
                } else {
                    cell
                }
            });
            Row::new(cells)
        })
        .collect();

    let title = if app.is_filtered() {
        "Episodes (filtered)"
    } else {
        "Episodes"
    };

    let table = Table::new(rows, WIDTHS)
        .header(Row::new(header_cells))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(border_style(table_focused)),
        )
        .row_highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn draw_details(frame: &mut Frame, app: &App, area: Rect) {
    let details = match app.selected_episode() {
        Some(episode) => {
            let image = EraImage::for_era(&episode.era);
            vec![
                Line::from(vec![
                    Span::styled(
                        episode.title.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(
                        format!(
                            "{} era ({})",
                            episode.era,
                            image.asset_path(&app.assets_dir).display()
                        ),
                        Style::default().fg(era_color(image)),
                    ),
                ]),
                Line::from(episode.plot.clone()),
            ]
        }
        None => vec![Line::from("No episode selected")],
    };

    let widget = Paragraph::new(details)
        .block(Block::default().borders(Borders::ALL).title("Details"))
        .wrap(Wrap { trim: true });

    frame.render_widget(widget, area);
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = match app.focus {
        Focus::NameFilter => {
            "[type] filter  [Esc] clear  [Enter] table  [Tab] next  [?] help in table"
        }
        Focus::EraFilter | Focus::DoctorFilter | Focus::CompanionFilter => {
            "[←→] choose  [Bksp] all  [Enter] table  [Tab] next  [?] help  [q] quit"
        }
        Focus::Table => {
            "[↑↓] rows  [←→] column  [Enter] sort  [/] name  [c] clear  [Tab] next  [?] help  [q] quit"
        }
    };

    let footer = Paragraph::new(help_text)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(footer, area);
}

fn draw_error_popup(frame: &mut Frame, error: &str) {
    let area = centered_rect(60, 20, frame.area());
    frame.render_widget(Clear, area);

    let popup = Paragraph::new(format!("{}\n\n[Esc] dismiss  [q] quit", error))
        .style(Style::default().fg(Color::Red))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Error")
                .border_style(Style::default().fg(Color::Red)),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(popup, area);
}

fn draw_help_modal(frame: &mut Frame) {
    let area = centered_rect(70, 80, frame.area());
    frame.render_widget(Clear, area);

    let help_text = Paragraph::new(help_content())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help")
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(help_text, area);
}

fn help_content() -> &'static str {
    "\
Global Commands
───────────────
  ?           Show/hide this help
  Ctrl+C      Force quit
  Ctrl+Q      Force quit
  Tab         Next control
  Shift+Tab   Previous control
  q           Quit (outside the name filter)

Name Filter
───────────
  (Type)      Filter by episode title
  Backspace   Delete character
  Esc         Clear filter
  Enter       Back to table

Era / Doctor / Companion
────────────────────────
  h / ←       Previous option
  l / →       Next option
  Backspace   Show all

Table
─────
  j / ↓       Move down
  k / ↑       Move up
  g / G       First / last row
  h / l       Move between column headers
  Enter / s   Sort by column (press again to reverse)
  /           Focus name filter
  c           Clear all filters

Press ? to close"
}

/// Helper function to create a centered rect.
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
