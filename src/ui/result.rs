use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, Padding, Paragraph},
};

use crate::app::App;
use crate::models::{AnswerLetter, Question};

const PREVIEW_CHARS: usize = 60;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let score = app.calculate_score();
    let total = app.total_questions();

    let [header, gauge, review, footer] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .areas(area);

    let heading = Paragraph::new(Line::from(vec![
        Span::styled("QUIZ COMPLETE  ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(format!("{} of {} correct", score, total), Style::default().fg(Color::Gray)),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(heading, header);

    let ratio = score_ratio(score, total);
    let widget = Gauge::default()
        .block(Block::default().borders(Borders::ALL).border_style(Color::DarkGray))
        .gauge_style(Style::default().fg(ratio_color(ratio)))
        .ratio(ratio)
        .label(format!("{:.0}%", ratio * 100.0));
    frame.render_widget(widget, gauge);

    let lines: Vec<Line> = app
        .questions()
        .iter()
        .zip(app.answers())
        .enumerate()
        .flat_map(|(index, (question, answer))| review_lines(index + 1, question, *answer))
        .collect();
    let widget = Paragraph::new(lines)
        .block(Block::default().padding(Padding::horizontal(1)))
        .scroll(((app.result_scroll() * 2) as u16, 0));
    frame.render_widget(widget, review);

    let controls = Paragraph::new("j/k scroll  ·  r restart  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(controls, footer);
}

fn score_ratio(score: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (score as f64 / total as f64).clamp(0.0, 1.0)
}

fn ratio_color(ratio: f64) -> Color {
    if ratio >= 0.8 {
        Color::Green
    } else if ratio >= 0.5 {
        Color::Yellow
    } else {
        Color::Red
    }
}

/// Two lines per question: the prompt, then the chosen and correct options.
fn review_lines(number: usize, question: &Question, answer: Option<usize>) -> [Line<'static>; 2] {
    let correct = answer.is_some_and(|selected| question.is_correct(selected));
    let mark = if correct {
        Span::styled(" ✓ ", Style::default().fg(Color::Green).bold())
    } else {
        Span::styled(" ✗ ", Style::default().fg(Color::Red).bold())
    };

    let prompt = Line::from(vec![
        mark,
        Span::styled(format!("{}. ", number), Style::default().fg(Color::DarkGray)),
        Span::styled(preview(&question.question), Style::default().fg(Color::White)),
    ]);

    let chosen = answer
        .and_then(AnswerLetter::from_index)
        .map_or_else(|| "-".to_string(), |letter| letter.label().to_string());
    let mut detail = vec![Span::styled(
        format!("     you {}", chosen),
        Style::default().fg(Color::DarkGray),
    )];
    if !correct {
        detail.push(Span::styled(
            format!("  ·  answer {}) {}", question.answer.label(), question.correct_option()),
            Style::default().fg(Color::Yellow),
        ));
    }

    [prompt, Line::from(detail)]
}

fn preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_CHARS {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(PREVIEW_CHARS - 1).collect();
    cut.push('…');
    cut
}
