pub mod home;
pub mod practice;
pub mod profile;
pub mod read;
pub mod tabs;

use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::{App, PauseItem, Tab, PAUSE_ITEMS};
use crate::games::Game;

pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(0),   // Content
        ])
        .split(frame.area());

    tabs::render_tabs(frame, app, chunks[0]);

    match app.current_tab {
        Tab::Home => home::render_home(frame, chunks[1], app),
        Tab::Practice => practice::render_practice(frame, chunks[1], app),
        Tab::Read => read::render_read(frame, chunks[1], app),
        Tab::Profile => profile::render_profile(frame, chunks[1], app),
        Tab::Quiz => app.quiz.render(frame, chunks[1]),
        Tab::Runner => app.runner.render(frame, chunks[1]),
        Tab::Snake => app.snake.render(frame, chunks[1]),
        Tab::Invaders => app.invaders.render(frame, chunks[1]),
        Tab::Rampage => app.rampage.render(frame, chunks[1]),
    }

    // Pause menu sits on top of the frozen game
    if let Some(selected) = app.pause {
        render_pause_menu(frame, frame.area(), selected, app.review_mode);
    }
}

fn pause_label(item: PauseItem, review_mode: bool) -> String {
    match item {
        PauseItem::Resume => "Resume".to_string(),
        PauseItem::Restart => "Restart".to_string(),
        PauseItem::ReviewMode => format!("Review mode: {}", if review_mode { "on" } else { "off" }),
        PauseItem::Profile => "Players".to_string(),
        PauseItem::Games => "Back to games".to_string(),
    }
}

fn render_pause_menu(frame: &mut Frame, area: Rect, selected: usize, review_mode: bool) {
    let overlay_w = 36u16.min(area.width.saturating_sub(4));
    let overlay_h = (PAUSE_ITEMS.len() as u16 + 6).min(area.height.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(overlay_w)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_h)) / 2;
    let overlay_area = Rect::new(x, y, overlay_w, overlay_h);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Rgb(255, 220, 80)))
        .title(" ⏸ Paused ")
        .title_style(Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(Color::Rgb(15, 15, 25)));
    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    let mut lines = vec![Line::from("")];
    for (i, item) in PAUSE_ITEMS.iter().enumerate() {
        let label = pause_label(*item, review_mode);
        let line = if i == selected {
            Line::from(vec![
                Span::styled("  ▶ ", Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
                Span::styled(label, Style::default().fg(Color::Rgb(255, 255, 255)).add_modifier(Modifier::BOLD)),
            ])
        } else {
            Line::from(Span::styled(format!("    {}", label), Style::default().fg(Color::Rgb(140, 140, 160))))
        };
        lines.push(line);
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  Enter", Style::default().fg(Color::Rgb(80, 200, 255)).add_modifier(Modifier::BOLD)),
        Span::styled(" choose  ", Style::default().fg(Color::Rgb(100, 100, 130))),
        Span::styled("Esc", Style::default().fg(Color::Rgb(80, 200, 255)).add_modifier(Modifier::BOLD)),
        Span::styled(" resume", Style::default().fg(Color::Rgb(100, 100, 130))),
    ]));

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(Color::Rgb(15, 15, 25))), inner);
}
