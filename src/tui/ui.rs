use super::app::{App, MenuItem};
use crate::job::JobState;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

pub fn draw(f: &mut Frame, app: &App) {
    let base_chunks = Layout::default()
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(7),    // Form + file info
            Constraint::Length(3), // Status line
            Constraint::Length(6), // Log view
            Constraint::Length(3), // Footer
        ])
        .split(f.area());

    let title = Paragraph::new("Media Compressor")
        .style(Style::default().fg(Color::LightCyan))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, base_chunks[0]);

    render_main(f, app, base_chunks[1]);
    render_status(f, app, base_chunks[2]);
    render_log(f, app, base_chunks[3]);

    let footer_text = "↑/↓ or j/k to navigate, ↩ to select, ←/→ to change preset, 'q' to quit";
    let footer = Paragraph::new(footer_text)
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, base_chunks[4]);

    if app.is_editing() {
        render_editing_popup(f, app);
    }
}

fn render_main(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_form(f, app, chunks[0]);
    render_file_info(f, app, chunks[1]);
}

fn render_form(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .menu_items()
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let text = match item {
                MenuItem::Input => format!("Input:  {}", display_or_unset(&app.input_path)),
                MenuItem::Output => format!("Output: {}", display_or_unset(&app.output_path)),
                MenuItem::Preset => format!("Level:  < {} >", app.preset),
                MenuItem::Compress => {
                    if app.state.is_busy() {
                        "Processing...".to_string()
                    } else {
                        "Compress".to_string()
                    }
                }
                MenuItem::Clear => "Clear".to_string(),
            };
            let style = if i == app.menu_index() {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else if *item == MenuItem::Compress && app.state.is_busy() {
                // Visibly disabled while a job is in flight
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };
            ListItem::new(text).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Compression"))
        .highlight_symbol(">> ");

    f.render_widget(list, area);
}

fn render_file_info(f: &mut Frame, app: &App, area: Rect) {
    let text = match &app.file_info {
        Some(info) => format!(
            "File: {}\nType: {}\nSize: {:.2} MB",
            info.name,
            info.kind.label(),
            info.size_mb
        ),
        None => "No input selected".to_string(),
    };

    let info = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("File Info"));
    f.render_widget(info, area);
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let style = match app.state {
        JobState::Processing => Style::default().fg(Color::Yellow),
        JobState::Done(_) => Style::default().fg(Color::Green),
        JobState::Failed(_) => Style::default().fg(Color::Red),
        JobState::Idle => Style::default(),
    };

    let status = Paragraph::new(app.status_message.clone())
        .style(style)
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, area);
}

fn render_log(f: &mut Frame, app: &App, area: Rect) {
    let visible = area.height.saturating_sub(2) as usize;
    let start = app.logs.len().saturating_sub(visible);
    let text = app.logs[start..].join("\n");

    let log = Paragraph::new(text).block(Block::default().borders(Borders::ALL).title("Log"));
    f.render_widget(log, area);
}

fn render_editing_popup(f: &mut Frame, app: &App) {
    let title = match app.editing_item() {
        Some(MenuItem::Input) => "Input file path",
        Some(MenuItem::Output) => "Output file path",
        _ => "Edit",
    };

    let area = centered_rect(70, f.area());
    f.render_widget(Clear, area);

    let popup = Paragraph::new(app.input_text().to_string()).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .style(Style::default().fg(Color::Yellow)),
    );
    f.render_widget(popup, area);
}

fn display_or_unset(value: &str) -> &str {
    if value.is_empty() {
        "<not set>"
    } else {
        value
    }
}

/// A 3-line popup rect centered horizontally, sized as a percentage of width.
fn centered_rect(percent_x: u16, area: Rect) -> Rect {
    // Widened multiply: u16 math overflows on very wide terminals
    let popup_width = (area.width as u32 * percent_x as u32 / 100) as u16;
    let x = (area.width.saturating_sub(popup_width)) / 2;
    let y = area.height / 2;
    Rect {
        x: area.x + x,
        y: area.y + y.saturating_sub(1),
        width: popup_width,
        height: 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_wide_terminal() {
        let area = Rect {
            x: 0,
            y: 0,
            width: u16::MAX,
            height: 50,
        };

        let popup = centered_rect(70, area);
        assert_eq!(popup.width, (u16::MAX as u32 * 70 / 100) as u16);
        assert_eq!(popup.height, 3);
        assert!(popup.x + popup.width <= area.width);
    }

    #[test]
    fn test_centered_rect_is_centered() {
        let area = Rect {
            x: 0,
            y: 0,
            width: 100,
            height: 30,
        };

        let popup = centered_rect(70, area);
        assert_eq!(popup.width, 70);
        assert_eq!(popup.x, 15);
        assert_eq!(popup.y, 14);
    }
}
