//! Drawing board: preview, controls, drawn numbers and status bar

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::cli::tui::app::{App, InputMode};
use crate::cli::tui::utils::contrast_fg;

/// Draw the board layout
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let exhausted = app.session().is_exhausted();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                                  // Title
            Constraint::Min(7),                                     // Preview
            Constraint::Length(3),                                  // Controls
            Constraint::Length(7),                                  // Drawn numbers
            Constraint::Length(if exhausted { 3 } else { 0 }),      // Banner
            Constraint::Length(3),                                  // Status bar
        ])
        .split(area);

    draw_title(frame, app, chunks[0]);
    draw_preview(frame, app, chunks[1]);
    draw_controls(frame, app, chunks[2]);
    draw_history(frame, app, chunks[3]);
    if exhausted {
        draw_banner(frame, chunks[4]);
    }
    draw_status_bar(frame, app, chunks[5]);
}

fn draw_title(frame: &mut Frame, app: &App, area: Rect) {
    let registry = app.session().registry();
    let mut spans = vec![Span::styled(
        " Tombola ",
        Style::default().add_modifier(Modifier::BOLD),
    )];

    for pool in registry.pools() {
        let color = app.color_of(pool.id());
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!(" {} {}/{} ", pool.id(), pool.remaining(), pool.category().count()),
            Style::default().bg(color).fg(contrast_fg(color)),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn draw_preview(frame: &mut Frame, app: &App, area: Rect) {
    let session = app.session();

    let (text, style) = match session.preview() {
        Some(draw) => {
            let color = app.color_of(&draw.category);
            let mut style = Style::default()
                .bg(color)
                .fg(contrast_fg(color))
                .add_modifier(Modifier::BOLD);
            if app.is_celebrating() && app.celebration_phase() {
                style = style.add_modifier(Modifier::REVERSED);
            }
            (format!("{}", draw.value), style)
        }
        None => ("??".to_string(), Style::default().add_modifier(Modifier::BOLD)),
    };

    let title = match session.preview() {
        Some(draw) if session.is_spinning() => format!(" spinning... {} ", draw.category),
        Some(draw) => format!(" drawn from {} ", draw.category),
        None => " press space to start ".to_string(),
    };

    // Pad vertically so the number sits in the middle of the panel
    let inner_height = area.height.saturating_sub(2) as usize;
    let mut lines = vec![Line::raw(""); inner_height.saturating_sub(1) / 2];
    lines.push(Line::from(Span::raw(text)).alignment(Alignment::Center));

    let border_style = if app.is_celebrating() {
        Style::default().fg(Color::LightYellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let paragraph = Paragraph::new(lines).style(style).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(paragraph, area);
}

fn draw_controls(frame: &mut Frame, app: &App, area: Rect) {
    let session = app.session();
    let enabled = Style::default().fg(Color::Green).add_modifier(Modifier::BOLD);
    let disabled = Style::default().fg(Color::DarkGray);

    let can_start = !session.is_spinning() && !session.is_exhausted();
    let can_stop = session.is_spinning();

    let line = Line::from(vec![
        Span::styled("[s] Start", if can_start { enabled } else { disabled }),
        Span::raw("   "),
        Span::styled(
            "[x] Stop",
            if can_stop { enabled.fg(Color::Red) } else { disabled },
        ),
        Span::raw("   "),
        Span::styled("[r] Reset", Style::default().fg(Color::Blue)),
        Span::raw("   "),
        Span::styled(
            format!("{} ms/tick", session.tick_interval().as_millis()),
            disabled,
        ),
    ])
    .alignment(Alignment::Center);

    frame.render_widget(
        Paragraph::new(line).block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn draw_history(frame: &mut Frame, app: &App, area: Rect) {
    let history = app.session().history();

    let mut spans = Vec::with_capacity(history.len() * 2);
    for entry in history.all() {
        let color = app.color_of(&entry.category);
        spans.push(Span::styled(
            format!(" {} ", entry.value),
            Style::default()
                .bg(color)
                .fg(contrast_fg(color))
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" "));
    }

    let title = format!(" Drawn numbers ({}) ", history.len());
    let paragraph = Paragraph::new(Line::from(spans))
        .wrap(Wrap { trim: false })
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn draw_banner(frame: &mut Frame, area: Rect) {
    let paragraph = Paragraph::new(
        Line::from("All numbers have been drawn! Press r to restart the draw.")
            .alignment(Alignment::Center),
    )
    .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let (content, style) = match app.input_mode() {
        InputMode::Normal => {
            let msg = app.status_message().unwrap_or("[space]start/stop [?]help [q]uit");
            (msg.to_string(), Style::default())
        }
        InputMode::ConfirmReset => (
            "Reset all pools and clear the drawn numbers? [y/n]".to_string(),
            Style::default().fg(Color::Yellow),
        ),
    };

    let status_text = format!("Tombola [{}] {}", app.session().state(), content);

    let paragraph = Paragraph::new(status_text)
        .style(style)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::tui::app::App;
    use crate::storage::DrawConfig;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
    }

    #[test]
    fn idle_board_shows_placeholder() {
        let app = App::new(&DrawConfig::default(), Some(1)).unwrap();
        let screen = render(&app);
        assert!(screen.contains("??"));
        assert!(screen.contains("Drawn numbers (0)"));
        assert!(screen.contains("yellow 100/100"));
    }

    #[test]
    fn committed_draw_listed() {
        let mut app = App::new(&DrawConfig::default(), Some(1)).unwrap();
        let space = KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE);
        app.handle_key(space).unwrap();
        app.handle_key(space).unwrap();

        let screen = render(&app);
        assert!(screen.contains("Drawn numbers (1)"));
        assert!(screen.contains("drawn from"));
    }
}
