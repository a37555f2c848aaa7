use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::App;
use crate::content::Word;

const VOICED: Color = Color::Rgb(200, 80, 160);
const UNVOICED: Color = Color::Rgb(80, 160, 255);
const DONE: Color = Color::Rgb(70, 70, 90);
const IDLE: Color = Color::Rgb(220, 220, 230);

/// The word with its active part lit; parts already sounded out are dimmed.
fn sounded_out(word: &Word, active: i32) -> Line<'static> {
    let parts = word.display_parts();
    let mut spans = Vec::with_capacity(parts.len() * 2);
    for (i, part) in parts.iter().enumerate() {
        let i = i as i32;
        let style = if i == active {
            let color = if word.is_voiced(i as usize) { VOICED } else { UNVOICED };
            Style::default().fg(color).add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else if i < active {
            Style::default().fg(DONE)
        } else {
            Style::default().fg(IDLE).add_modifier(Modifier::BOLD)
        };
        spans.push(Span::styled(part.to_string(), style));
        if (i as usize) + 1 < parts.len() {
            spans.push(Span::raw(" "));
        }
    }
    Line::from(spans)
}

pub fn render_practice(frame: &mut Frame, area: Rect, app: &App) {
    let practice = &app.practice;
    let words = practice.words(&app.catalog, &app.pool);

    let title = if practice.browsing {
        let name = app
            .catalog
            .levels
            .get(practice.browse_rank)
            .map(|l| l.display_name().to_string())
            .unwrap_or_default();
        format!(" 🔤 Word browser · up to {} ", name)
    } else {
        format!(" 🔤 Practice · {} ", app.pool.level_name)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(200, 120, 255)))
        .title(title)
        .title_style(Style::default().fg(Color::Rgb(220, 160, 255)).add_modifier(Modifier::BOLD));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // List + card
            Constraint::Length(1), // Help
        ])
        .split(inner);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(28), Constraint::Min(20)])
        .split(chunks[0]);

    if words.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No words available for this level!",
            Style::default().fg(Color::Red),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(msg, chunks[0]);
    } else {
        let items: Vec<ListItem> = words
            .iter()
            .map(|w| {
                let tries = app.progress.attempts_for(&w.word);
                let read = app.progress.completed.iter().any(|c| c == &w.word);
                ListItem::new(Line::from(vec![
                    Span::styled(format!(" {:<14}", w.word), Style::default().fg(IDLE)),
                    Span::styled(if read { "✓ " } else { "  " }, Style::default().fg(Color::Rgb(120, 230, 150))),
                    Span::styled(format!("×{}", tries), Style::default().fg(Color::Rgb(100, 100, 130))),
                ]))
            })
            .collect();
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::RIGHT)
                    .border_style(Style::default().fg(Color::Rgb(60, 60, 80))),
            )
            .highlight_style(Style::default().bg(Color::Rgb(50, 40, 70)).add_modifier(Modifier::BOLD))
            .highlight_symbol("▶");
        let mut state = ListState::default().with_selected(Some(practice.selected.min(words.len() - 1)));
        frame.render_stateful_widget(list, cols[0], &mut state);

        if let Some(word) = words.get(practice.selected) {
            let dots: String = (0..word.syllables()).map(|_| "● ").collect();
            let card = vec![
                Line::from(""),
                Line::from(""),
                sounded_out(word, practice.active_part),
                Line::from(""),
                Line::from(Span::styled(dots, Style::default().fg(Color::Rgb(255, 220, 80)))),
                Line::from(""),
                Line::from(vec![
                    Span::styled("voiced ", Style::default().fg(VOICED)),
                    Span::styled("· ", Style::default().fg(DONE)),
                    Span::styled("unvoiced", Style::default().fg(UNVOICED)),
                ]),
                Line::from(""),
                Line::from(Span::styled(
                    format!("Practiced {} times", app.progress.attempts_for(&word.word)),
                    Style::default().fg(Color::Rgb(100, 100, 130)),
                )),
            ];
            frame.render_widget(Paragraph::new(card).alignment(Alignment::Center), cols[1]);
        }
    }

    let mut help = vec![
        Span::styled(" ↑↓ Word ", Style::default().fg(Color::DarkGray)),
        Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
        Span::styled("←→ Sound it out ", Style::default().fg(Color::DarkGray)),
        Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
        Span::styled("Enter Count a try ", Style::default().fg(Color::DarkGray)),
        Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
        Span::styled("F Browser ", Style::default().fg(Color::DarkGray)),
    ];
    if practice.browsing {
        help.push(Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))));
        help.push(Span::styled("+/- Levels ", Style::default().fg(Color::DarkGray)));
    }
    frame.render_widget(Paragraph::new(Line::from(help)), chunks[1]);
}
