use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::App;

const BANNER: &str = r#"

 ██╗    ██╗ ██████╗ ██████╗ ██████╗  ██████╗ █████╗ ██████╗ ███████╗
 ██║    ██║██╔═══██╗██╔══██╗██╔══██╗██╔════╝██╔══██╗██╔══██╗██╔════╝
 ██║ █╗ ██║██║   ██║██████╔╝██║  ██║██║     ███████║██║  ██║█████╗
 ██║███╗██║██║   ██║██╔══██╗██║  ██║██║     ██╔══██║██║  ██║██╔══╝
 ╚███╔███╔╝╚██████╔╝██║  ██║██████╔╝╚██████╗██║  ██║██████╔╝███████╗
  ╚══╝╚══╝  ╚═════╝ ╚═╝  ╚═╝╚═════╝  ╚═════╝╚═╝  ╚═╝╚═════╝ ╚══════╝"#;

struct Tile {
    key: &'static str,
    icon: &'static str,
    name: &'static str,
    desc: &'static str,
    color: Color,
    border_color: Color,
    /// (keys, action) pairs for the controls panel
    controls: &'static [(&'static str, &'static str)],
}

const TILES: [Tile; 8] = [
    Tile {
        key: "1", icon: "📖", name: "Quiz", desc: "Read each word\nof the level!",
        color: Color::Rgb(80, 200, 120), border_color: Color::Rgb(40, 110, 60),
        controls: &[("Y / →", "I read it"), ("N / ←", "Not yet"), ("R", "New round")],
    },
    Tile {
        key: "2", icon: "🏃", name: "Runner", desc: "Read it, then\njump over it!",
        color: Color::Rgb(80, 180, 255), border_color: Color::Rgb(40, 90, 140),
        controls: &[("Space / Enter", "Start, I read it"), ("Enter", "Dismiss missed word"), ("R", "Restart")],
    },
    Tile {
        key: "3", icon: "🐍", name: "Snake", desc: "One step per\nsyllable!",
        color: Color::Rgb(130, 230, 130), border_color: Color::Rgb(60, 120, 60),
        controls: &[("Enter", "Start, I read it"), ("R", "Restart")],
    },
    Tile {
        key: "4", icon: "👾", name: "Invaders", desc: "Shoot the words\nyou can read!",
        color: Color::Rgb(80, 255, 80), border_color: Color::Rgb(40, 140, 40),
        controls: &[("← / →", "Select word"), ("1-9", "Pick and fire"), ("Enter", "Fire at selected"), ("R", "Restart")],
    },
    Tile {
        key: "5", icon: "🦖", name: "Rampage", desc: "Smash every\nword building!",
        color: Color::Rgb(255, 140, 60), border_color: Color::Rgb(140, 70, 30),
        controls: &[("← / →", "Pick building"), ("Enter / 1-9", "Queue an attack"), ("R", "Rebuild")],
    },
    Tile {
        key: "6", icon: "🔤", name: "Practice", desc: "Sound out words\npart by part",
        color: Color::Rgb(200, 120, 255), border_color: Color::Rgb(100, 60, 140),
        controls: &[("↑ / ↓", "Choose word"), ("← / →", "Step through parts"), ("Enter", "Count a try"), ("F / + / -", "Word browser")],
    },
    Tile {
        key: "7", icon: "📜", name: "Read", desc: "Read sentences\nword by word",
        color: Color::Rgb(255, 220, 80), border_color: Color::Rgb(140, 120, 40),
        controls: &[("Space", "Next word"), ("R", "Start over")],
    },
    Tile {
        key: "8", icon: "🙂", name: "Profile", desc: "Players and\ntheir progress",
        color: Color::Rgb(100, 200, 255), border_color: Color::Rgb(50, 100, 140),
        controls: &[("↑ / ↓", "Choose player"), ("Enter", "Play as"), ("N", "New player")],
    },
];

fn render_tile(frame: &mut Frame, area: Rect, tile: &Tile, selected: bool) {
    let border_color = if selected { Color::Rgb(255, 220, 80) } else { tile.border_color };
    let border_type = if selected { BorderType::Double } else { BorderType::Rounded };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 { return; }

    let name_color = if selected { Color::Rgb(255, 255, 255) } else { tile.color };
    let mut lines = vec![Line::from(vec![
        Span::styled(format!("[{}] ", tile.key), Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
        Span::styled(format!("{} ", tile.icon), Style::default()),
        Span::styled(tile.name, Style::default().fg(name_color).add_modifier(Modifier::BOLD)),
    ])];
    for desc_line in tile.desc.split('\n') {
        lines.push(Line::from(Span::styled(
            desc_line,
            Style::default().fg(if selected { Color::Rgb(180, 180, 200) } else { Color::Rgb(120, 120, 140) }),
        )));
    }
    if selected {
        lines.push(Line::from(Span::styled(
            "▶ Enter to open",
            Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD),
        )));
    }
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn key_line(keys: &str, action: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("    {:<17}", keys), Style::default().fg(Color::Rgb(80, 200, 255))),
        Span::styled(action.to_string(), Style::default().fg(Color::Rgb(140, 140, 140))),
    ])
}

fn render_level_picker(frame: &mut Frame, area: Rect, app: &App) {
    let rank = app.catalog.rank(app.level_id()).unwrap_or(0);
    let mut spans = vec![Span::styled("  ◀ ", Style::default().fg(Color::Rgb(80, 200, 255)).add_modifier(Modifier::BOLD))];
    for (i, level) in app.catalog.levels.iter().enumerate() {
        let done = app
            .profiles
            .active()
            .and_then(|p| p.levels.get(&level.id))
            .map(|l| l.completed)
            .unwrap_or(false);
        let label = format!(" {}{} ", level.display_name(), if done { " ✓" } else { "" });
        let style = if i == rank {
            Style::default().fg(Color::Rgb(20, 20, 20)).bg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)
        } else if done {
            Style::default().fg(Color::Rgb(120, 230, 150))
        } else {
            Style::default().fg(Color::Rgb(140, 140, 160))
        };
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled("▶", Style::default().fg(Color::Rgb(80, 200, 255)).add_modifier(Modifier::BOLD)));

    let picker = Paragraph::new(vec![
        Line::from(spans),
        Line::from(Span::styled(
            format!("  {} words in this level", app.pool.words.len()),
            Style::default().fg(Color::Rgb(100, 100, 130)),
        )),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
            .title(" 📚 Level · ← → to change ")
            .title_style(Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(picker, area);
}

pub fn render_home(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9),  // Banner
            Constraint::Length(4),  // Level picker
            Constraint::Length(12), // Tiles (2 rows)
            Constraint::Min(8),     // Controls area
            Constraint::Length(2),  // Footer
        ])
        .split(area);

    let banner = Paragraph::new(BANNER)
        .style(Style::default().fg(Color::Rgb(80, 200, 255)))
        .alignment(Alignment::Center);
    frame.render_widget(banner, chunks[0]);

    render_level_picker(frame, chunks[1], app);

    let tiles_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
        .title(" 🎮 Play · ↑↓ Select, Enter to open ")
        .title_style(Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD));
    let tiles_inner = tiles_block.inner(chunks[2]);
    frame.render_widget(tiles_block, chunks[2]);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
        .split(tiles_inner);
    for (r, row) in rows.iter().enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 4); 4])
            .split(*row);
        for (c, col) in cols.iter().enumerate() {
            let i = r * 4 + c;
            render_tile(frame, *col, &TILES[i], app.selected_tile == i);
        }
    }

    let ctrl_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[3]);

    let nav = Paragraph::new(vec![
        Line::from(""),
        key_line("Tab / Shift+Tab", "Switch tabs"),
        key_line("← / →", "Change level"),
        key_line("↑ / ↓  Enter", "Pick and open"),
        key_line("1-8", "Open directly"),
        key_line("P", "Pause menu in games"),
        key_line("Esc", "Return to Home"),
        key_line("q / Ctrl+C", "Quit"),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
            .title(" ⌨ Navigation ")
            .title_style(Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(nav, ctrl_cols[0]);

    let tile = &TILES[app.selected_tile.min(TILES.len() - 1)];
    let mut lines = vec![Line::from("")];
    lines.extend(tile.controls.iter().map(|(k, a)| key_line(k, a)));
    let tile_ctrl = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(tile.border_color))
            .title(format!(" {} {} ", tile.icon, tile.name))
            .title_style(Style::default().fg(tile.color).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(tile_ctrl, ctrl_cols[1]);

    let player = match app.profiles.active() {
        Some(p) => format!("{} {}  🏆 {}", p.avatar, p.name, p.high_score(app.level_id())),
        None => "No player yet (press 8)".to_string(),
    };
    let footer = Paragraph::new(Line::from(vec![
        Span::styled("  🦀 ", Style::default().fg(Color::Rgb(255, 100, 50))),
        Span::styled(concat!("v", env!("CARGO_PKG_VERSION")), Style::default().fg(Color::Rgb(80, 80, 100))),
        Span::styled("  │  ", Style::default().fg(Color::Rgb(40, 40, 60))),
        Span::styled(player, Style::default().fg(Color::Rgb(200, 200, 220)).add_modifier(Modifier::BOLD)),
        Span::styled("  │  ", Style::default().fg(Color::Rgb(40, 40, 60))),
        Span::styled(
            format!("Score {}  ·  {} words read", app.progress.score, app.progress.completed.len()),
            Style::default().fg(Color::Rgb(100, 100, 130)),
        ),
        Span::styled(
            if app.review_mode { "  │  Review mode" } else { "" },
            Style::default().fg(Color::Rgb(255, 220, 80)),
        ),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(footer, chunks[4]);
}
