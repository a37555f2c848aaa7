use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::App;

pub fn render_read(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(255, 220, 80)))
        .title(format!(" 📜 Ready to Read · {} ", app.pool.level_name))
        .title_style(Style::default().fg(Color::Rgb(255, 230, 120)).add_modifier(Modifier::BOLD));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Sentence counter
            Constraint::Min(3),    // Sentence
            Constraint::Length(1), // Help
        ])
        .split(inner);

    let sentences = &app.pool.sentences;
    let Some(sentence) = sentences.get(app.read.sentence) else {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No sentences for this level!",
            Style::default().fg(Color::Red),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(msg, chunks[1]);
        return;
    };

    frame.render_widget(
        Paragraph::new(Span::styled(
            format!(" Sentence {} of {}", app.read.sentence + 1, sentences.len()),
            Style::default().fg(Color::Rgb(100, 100, 130)),
        )),
        chunks[0],
    );

    let mut spans = Vec::new();
    for (i, word) in sentence.split_whitespace().enumerate() {
        let style = if i == app.read.word {
            Style::default()
                .fg(Color::Rgb(20, 20, 20))
                .bg(Color::Rgb(255, 220, 80))
                .add_modifier(Modifier::BOLD)
        } else if i < app.read.word {
            Style::default().fg(Color::Rgb(120, 120, 140))
        } else {
            Style::default().fg(Color::Rgb(230, 230, 240))
        };
        spans.push(Span::styled(format!(" {} ", word), style));
    }
    let top_pad = chunks[1].height.saturating_sub(1) / 2;
    let mut lines: Vec<Line> = (0..top_pad).map(|_| Line::from("")).collect();
    lines.push(Line::from(spans));
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).wrap(Wrap { trim: false }),
        chunks[1],
    );

    let help = Line::from(vec![
        Span::styled(" Space Next word ", Style::default().fg(Color::DarkGray)),
        Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
        Span::styled("R Start over ", Style::default().fg(Color::DarkGray)),
        Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
        Span::styled("Esc Menu", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(help), chunks[2]);
}
