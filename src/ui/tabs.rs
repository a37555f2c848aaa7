use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::{App, Tab};

const GAME_TAB: Color = Color::Rgb(120, 180, 140);
const SCREEN_TAB: Color = Color::Rgb(120, 120, 140);

/// Tab bar. Game tabs are tinted; the bar title carries the level and any pause.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Tab::all()
        .iter()
        .map(|t| {
            let fg = if *t == app.current_tab {
                Color::Rgb(255, 220, 80)
            } else if t.is_game() {
                GAME_TAB
            } else {
                SCREEN_TAB
            };
            Line::from(Span::styled(t.title(), Style::default().fg(fg)))
        })
        .collect();

    let mut title = format!(" 🔤 Wordcade · {} ", app.pool.level_name);
    if app.is_paused() {
        title.push_str("· ⏸ ");
    }
    if app.review_mode {
        title.push_str("· review ");
    }

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
                .border_type(BorderType::Rounded)
                .title(title)
                .title_style(Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD)),
        )
        .select(app.current_tab.index())
        .highlight_style(Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD))
        .divider(Span::styled("│", Style::default().fg(Color::Rgb(60, 60, 80))));

    frame.render_widget(tabs, area);
}
