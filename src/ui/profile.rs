use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::App;
use crate::profiles::{AVATARS, MAX_NAME_LEN};
use crate::screens::profile::{FormStep, ProfileForm};

pub fn render_profile(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(100, 200, 255)))
        .title(" 🙂 Players ")
        .title_style(Style::default().fg(Color::Rgb(140, 220, 255)).add_modifier(Modifier::BOLD));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),    // Players + details
            Constraint::Length(3), // Global stats
            Constraint::Length(1), // Help
        ])
        .split(inner);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(26), Constraint::Min(20)])
        .split(chunks[0]);

    let active_id = app.profiles.active().map(|p| p.id.as_str());
    let profiles = app.profiles.all();
    if app.profiles.is_empty() {
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(" No players yet.", Style::default().fg(Color::Rgb(140, 140, 160)))),
                Line::from(Span::styled(" Press N to add one!", Style::default().fg(Color::Rgb(255, 220, 80)))),
            ]),
            cols[0],
        );
    } else {
        let items: Vec<ListItem> = profiles
            .iter()
            .map(|p| {
                let marker = if Some(p.id.as_str()) == active_id { "★" } else { " " };
                ListItem::new(Line::from(vec![
                    Span::styled(format!(" {} ", marker), Style::default().fg(Color::Rgb(255, 220, 80))),
                    Span::raw(format!("{} ", p.avatar)),
                    Span::styled(p.name.clone(), Style::default().fg(Color::Rgb(220, 220, 230))),
                ]))
            })
            .collect();
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::RIGHT)
                    .border_style(Style::default().fg(Color::Rgb(60, 60, 80))),
            )
            .highlight_style(Style::default().bg(Color::Rgb(30, 50, 70)).add_modifier(Modifier::BOLD))
            .highlight_symbol("▶");
        let selected = app.profile_screen.selected.min(profiles.len() - 1);
        let mut state = ListState::default().with_selected(Some(selected));
        frame.render_stateful_widget(list, cols[0], &mut state);

        let p = &profiles[selected];
        let mut lines = vec![
            Line::from(""),
            Line::from(vec![
                Span::raw(format!("  {} ", p.avatar)),
                Span::styled(p.name.clone(), Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
                Span::styled(
                    format!("   {} levels complete", p.completed_levels()),
                    Style::default().fg(Color::Rgb(120, 230, 150)),
                ),
            ]),
            Line::from(""),
        ];
        for level in &app.catalog.levels {
            let result = p.levels.get(&level.id).copied().unwrap_or_default();
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<10}", level.display_name()), Style::default().fg(Color::Rgb(200, 120, 255))),
                Span::styled(format!("🏆 {:>4}  ", result.high_score), Style::default().fg(Color::Yellow)),
                Span::styled(
                    if result.completed { "✓ complete" } else { "" },
                    Style::default().fg(Color::Rgb(120, 230, 150)),
                ),
            ]));
        }
        frame.render_widget(Paragraph::new(lines), cols[1]);
    }

    let stats = Paragraph::new(Line::from(vec![
        Span::styled(" Quiz score: ", Style::default().fg(Color::Rgb(140, 140, 160))),
        Span::styled(app.progress.score.to_string(), Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        Span::styled("   Words read: ", Style::default().fg(Color::Rgb(140, 140, 160))),
        Span::styled(app.progress.completed.len().to_string(), Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::styled("   Words practiced: ", Style::default().fg(Color::Rgb(140, 140, 160))),
        Span::styled(app.progress.attempts.len().to_string(), Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD)),
    ]))
    .block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(Color::Rgb(60, 60, 80)))
            .title(" Everyone ")
            .title_style(Style::default().fg(Color::Rgb(120, 120, 140))),
    );
    frame.render_widget(stats, chunks[1]);

    let help = Line::from(vec![
        Span::styled(" ↑↓ Choose ", Style::default().fg(Color::DarkGray)),
        Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
        Span::styled("Enter Play as ", Style::default().fg(Color::DarkGray)),
        Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
        Span::styled("N New player ", Style::default().fg(Color::DarkGray)),
        Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
        Span::styled("Esc Menu", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(help), chunks[2]);

    if let Some(form) = &app.profile_screen.form {
        render_form(frame, area, form, app.profile_screen.message.as_deref());
    }
}

/// New player overlay: name entry, then avatar choice.
fn render_form(frame: &mut Frame, area: Rect, form: &ProfileForm, message: Option<&str>) {
    let overlay_w = 44u16.min(area.width.saturating_sub(4));
    let overlay_h = 13u16.min(area.height.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(overlay_w)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_h)) / 2;
    let overlay_area = Rect::new(x, y, overlay_w, overlay_h);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Rgb(255, 220, 80)))
        .title(" ✨ New player ")
        .title_style(Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(Color::Rgb(15, 15, 25)));
    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    // Typed chars plus underscores for the rest
    let typed_len = form.name.chars().count();
    let display_name = format!("{}{}", form.name, "_".repeat(MAX_NAME_LEN.saturating_sub(typed_len)));
    let name_style = if form.step == FormStep::Name {
        Style::default().fg(Color::Rgb(255, 255, 255)).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Rgb(140, 140, 160))
    };

    let mut avatars = vec![Span::raw("    ")];
    for (i, a) in AVATARS.iter().enumerate() {
        let style = if i == form.avatar && form.step == FormStep::Avatar {
            Style::default().bg(Color::Rgb(255, 220, 80))
        } else if i == form.avatar {
            Style::default().bg(Color::Rgb(60, 60, 80))
        } else {
            Style::default()
        };
        avatars.push(Span::styled(format!(" {} ", a), style));
    }

    let (hint_key, hint) = match form.step {
        FormStep::Name => ("  Enter", " next  "),
        FormStep::Avatar => ("  ← → Enter", " pick  "),
    };
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("  Name:", Style::default().fg(Color::Rgb(180, 180, 200)))),
        Line::from(vec![
            Span::styled("    [ ", Style::default().fg(Color::Rgb(100, 100, 130))),
            Span::styled(display_name, name_style),
            Span::styled(" ]", Style::default().fg(Color::Rgb(100, 100, 130))),
        ]),
        Line::from(""),
        Line::from(Span::styled("  Avatar:", Style::default().fg(Color::Rgb(180, 180, 200)))),
        Line::from(avatars),
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", message.unwrap_or("")),
            Style::default().fg(Color::Rgb(255, 110, 110)),
        )),
        Line::from(vec![
            Span::styled(hint_key, Style::default().fg(Color::Rgb(80, 200, 255)).add_modifier(Modifier::BOLD)),
            Span::styled(hint, Style::default().fg(Color::Rgb(100, 100, 130))),
            Span::styled("Esc", Style::default().fg(Color::Rgb(80, 200, 255)).add_modifier(Modifier::BOLD)),
            Span::styled(" cancel", Style::default().fg(Color::Rgb(100, 100, 130))),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(Color::Rgb(15, 15, 25))), inner);
}
