use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::models::{FeedbackTone, GameSession};
use crate::ui::layout::calculate_game_chunks;

pub fn draw_game(f: &mut Frame, session: &GameSession) {
    let layout = calculate_game_chunks(f.area());

    draw_header(f, layout.header_area, session);
    draw_banner_line(f, layout.banner_area, session);
    draw_question_panel(f, layout.question_area, session);
    draw_input_panel(f, layout.input_area, session);
    draw_feedback_panel(f, layout.feedback_area, session);
    draw_help_panel(f, layout.help_area, session);
}

fn draw_header(f: &mut Frame, area: Rect, session: &GameSession) {
    let mut streak_line = format!(
        "Streak: {} | Best: {}",
        session.stats.streak, session.stats.best_streak
    );
    if session.mode.scales_difficulty() {
        streak_line.push_str(&format!(" | Level: {}", session.difficulty));
    }

    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("{}  -  {}", session.mode.title(), score_line(session)),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(streak_line),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

/// Score summary with the encouragement tag the score line always carries.
fn score_line(session: &GameSession) -> String {
    let stats = &session.stats;
    let percentage = stats.accuracy_percent();
    let tag = if stats.answered == 0 {
        ""
    } else if percentage >= 90.0 {
        " AMAZING!"
    } else if percentage >= 80.0 {
        " EXCELLENT!"
    } else if percentage >= 70.0 {
        " GREAT!"
    } else if percentage >= 60.0 {
        " GOOD!"
    } else if percentage >= 50.0 {
        " KEEP GOING!"
    } else {
        " LEARNING!"
    };
    format!(
        "Score: {}/{} ({:.0}%){}",
        stats.correct, stats.answered, percentage, tag
    )
}

pub(crate) fn draw_banner_line(f: &mut Frame, area: Rect, session: &GameSession) {
    if let Some(banner) = &session.banner {
        let line = Paragraph::new(banner.as_str())
            .style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center);
        f.render_widget(line, area);
    }
}

pub(crate) fn draw_question_panel(f: &mut Frame, area: Rect, session: &GameSession) {
    let question = Paragraph::new(Text::from(session.question.prompt()))
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Question"));
    f.render_widget(question, area);
}

pub(crate) fn draw_input_panel(f: &mut Frame, area: Rect, session: &GameSession) {
    let content = if session.input_buffer.is_empty() && !session.showing_result {
        "[Type a number...]"
    } else {
        session.input_buffer.as_str()
    };

    let input = Paragraph::new(content)
        .block(Block::default().borders(Borders::ALL).title("Your Answer"));
    f.render_widget(input, area);

    if !session.showing_result {
        let max_x = area.x + area.width.saturating_sub(2);
        let cursor_x = (area.x + 1 + session.cursor_position as u16).min(max_x);
        f.set_cursor_position((cursor_x, area.y + 1));
    }
}

pub(crate) fn draw_feedback_panel(f: &mut Frame, area: Rect, session: &GameSession) {
    let (text, color) = match &session.feedback {
        Some(feedback) => {
            let color = match feedback.tone {
                FeedbackTone::Praise => Color::Green,
                FeedbackTone::Encourage => Color::Red,
                FeedbackTone::Warn => Color::Yellow,
                FeedbackTone::Info => Color::Cyan,
            };
            (feedback.text.clone(), color)
        }
        None => (String::new(), Color::White),
    };

    let feedback = Paragraph::new(text)
        .style(Style::default().fg(color))
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(feedback, area);
}

pub(crate) fn draw_help_panel(f: &mut Frame, area: Rect, session: &GameSession) {
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);

    let mut spans = Vec::new();
    if session.game_over {
        spans.extend([
            Span::styled("Enter", key_style),
            Span::from(" Summary  "),
        ]);
    } else if session.showing_result {
        spans.extend([Span::styled("Enter", key_style), Span::from(" Next  ")]);
    } else {
        spans.extend([Span::styled("Enter", key_style), Span::from(" Check  ")]);
        if session.mode.hints_enabled() && session.hint_available {
            spans.extend([Span::styled("F1", key_style), Span::from(" Hint  ")]);
        }
    }
    spans.extend([
        Span::styled("Esc", key_style),
        Span::from(" Quit to Menu  "),
        Span::styled("Ctrl+C", key_style),
        Span::from(" Exit App"),
    ]);

    let help = Paragraph::new(vec![Line::from(spans)])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, area);
}

pub fn draw_quit_confirmation(f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(5)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(3),
        ])
        .split(f.area());

    let title = Paragraph::new("Quit to Menu")
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let message = Paragraph::new("Leave this game and return to the main menu?")
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(message, chunks[1]);

    let help_text = vec![Line::from(vec![
        Span::styled(
            "y",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(" Yes (Return to Menu)  "),
        Span::styled(
            "n",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::from(" No (Keep Playing)  "),
        Span::styled(
            "Ctrl+C",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(" Exit App"),
    ])];
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}
