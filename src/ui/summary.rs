use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::models::GameSession;
use crate::ui::layout::calculate_summary_chunks;

pub fn draw_summary(f: &mut Frame, session: &GameSession) {
    let layout = calculate_summary_chunks(f.area());

    let title_text = format!("Session Summary - {}", session.mode.title());
    let title = Paragraph::new(title_text)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, layout.header_area);

    let stats = &session.stats;
    let mut summary_text = Text::default();
    summary_text.push_line(Line::from(closing_message(session)));
    summary_text.push_line(Line::from(""));
    summary_text.push_line(Line::from(format!(
        "Score: {}/{} ({:.0}%)",
        stats.correct,
        stats.answered,
        stats.accuracy_percent()
    )));
    summary_text.push_line(Line::from(format!("Best Streak: {}", stats.best_streak)));
    if session.mode.hints_enabled() {
        summary_text.push_line(Line::from(format!("Hints Used: {}", stats.hints_used)));
    }
    if session.mode.scales_difficulty() {
        summary_text.push_line(Line::from(format!(
            "Difficulty Reached: {}",
            session.difficulty
        )));
    }
    if let Some(battle) = &session.battle {
        summary_text.push_line(Line::from(format!("Battle Level: {}", battle.level)));
    }

    summary_text.push_line(Line::from(""));
    if stats.achievements.is_empty() {
        summary_text.push_line(Line::from("No achievements this time - keep playing!"));
    } else {
        summary_text.push_line(Line::from(format!(
            "Achievements ({}):",
            stats.achievements.len()
        )));
        for achievement in &stats.achievements {
            summary_text.push_line(Line::from(format!("  [x] {}", achievement.label())));
        }
    }

    let summary = Paragraph::new(summary_text)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(summary, layout.content_area);

    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let help_text = vec![Line::from(vec![
        Span::styled("r", key_style),
        Span::from(" Play Again  "),
        Span::styled("m", key_style),
        Span::from(" Main Menu  "),
        Span::styled("q", key_style),
        Span::from(" Quit  "),
    ])];
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.footer_area);
}

fn closing_message(session: &GameSession) -> &'static str {
    if session.game_over {
        return "The hero has fallen - but every battle makes you stronger!";
    }
    let stats = &session.stats;
    if stats.answered == 0 {
        return "Thanks for playing! Come back anytime to practice.";
    }
    let percentage = stats.accuracy_percent();
    if percentage >= 90.0 {
        "INCREDIBLE! You're a math superstar!"
    } else if percentage >= 75.0 {
        "EXCELLENT! You're doing amazing - keep it up!"
    } else if percentage >= 60.0 {
        "GOOD WORK! You're improving steadily!"
    } else {
        "GREAT EFFORT! Every question helps you learn more!"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Achievement, GameMode};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render(session: &GameSession) -> String {
        let backend = TestBackend::new(80, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw_summary(f, session)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_summary_shows_stats_and_achievements() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut session = GameSession::new(GameMode::Challenge, &mut rng);
        session.stats.answered = 10;
        session.stats.correct = 9;
        session.stats.best_streak = 6;
        session.stats.achievements.push(Achievement::Streak5);

        let text = render(&session);
        assert!(text.contains("Score: 9/10 (90%)"));
        assert!(text.contains("Best Streak: 6"));
        assert!(text.contains("5 in a Row!"));
        assert!(text.contains("INCREDIBLE"));
    }

    #[test]
    fn test_summary_for_fresh_session() {
        let mut rng = StdRng::seed_from_u64(9);
        let session = GameSession::new(GameMode::Drill, &mut rng);
        let text = render(&session);
        assert!(text.contains("Thanks for playing"));
        assert!(text.contains("No achievements"));
    }
}
