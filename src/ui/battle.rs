use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::battle::{BattleState, HERO_SPRITE};
use crate::models::GameSession;
use crate::ui::game::{
    draw_banner_line, draw_feedback_panel, draw_help_panel, draw_input_panel,
    draw_question_panel,
};
use crate::ui::layout::calculate_battle_chunks;

pub fn draw_battle(f: &mut Frame, session: &GameSession) {
    let layout = calculate_battle_chunks(f.area());

    let Some(battle) = &session.battle else {
        return;
    };

    draw_header(f, layout.header_area, session, battle);
    draw_banner_line(f, layout.banner_area, session);
    draw_combatant(f, layout.hero_area, battle, Side::Hero);
    draw_combatant(f, layout.monster_area, battle, Side::Monster);
    draw_question_panel(f, layout.question_area, session);
    draw_input_panel(f, layout.input_area, session);
    draw_feedback_panel(f, layout.feedback_area, session);
    draw_help_panel(f, layout.help_area, session);
}

fn draw_header(f: &mut Frame, area: Rect, session: &GameSession, battle: &BattleState) {
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            format!(
                "Battle Arena  -  Lv {}  -  Score: {}/{} ({:.0}%)",
                battle.level,
                session.stats.correct,
                session.stats.answered,
                session.stats.accuracy_percent()
            ),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(format!(
            "Streak: {} | Best: {} | Difficulty: {}",
            session.stats.streak, session.stats.best_streak, session.difficulty
        )),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

#[derive(Clone, Copy, PartialEq)]
enum Side {
    Hero,
    Monster,
}

fn floating_for(battle: &BattleState, over_hero: bool) -> String {
    battle
        .floating
        .iter()
        .filter(|item| item.over_hero == over_hero)
        .map(|item| item.text.as_str())
        .collect::<Vec<_>>()
        .join("  ")
}

fn draw_combatant(f: &mut Frame, area: Rect, battle: &BattleState, side: Side) {
    let (name, sprite, hp, max_hp, hit, gauge_color, floating, shuffle) = match side {
        Side::Hero => (
            "HERO",
            HERO_SPRITE,
            battle.hero_hp,
            battle.hero_max_hp,
            battle.hero_flash > 0,
            Color::Green,
            floating_for(battle, true),
            0u16,
        ),
        Side::Monster => (
            battle.monster.name,
            battle.monster.sprite,
            battle.monster_hp,
            battle.monster_max_hp,
            battle.monster_flash > 0,
            Color::Red,
            floating_for(battle, false),
            // The monster shuffles side to side while it waits.
            (battle.bounce_phase / 4 % 3) as u16,
        ),
    };

    let block = Block::default().borders(Borders::ALL).title(name);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(inner);

    let ratio = if max_hp > 0 {
        (hp as f64 / max_hp as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(gauge_color))
        .ratio(ratio)
        .label(format!("HP {}/{}", hp, max_hp));
    f.render_widget(gauge, chunks[0]);

    let damage = Paragraph::new(floating)
        .style(
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    f.render_widget(damage, chunks[1]);

    let sprite_style = if hit {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let padding = " ".repeat(shuffle as usize);
    let body = Paragraph::new(format!("{}{}", padding, sprite))
        .style(sprite_style)
        .alignment(Alignment::Center);
    f.render_widget(body, chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GameMode;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render(session: &GameSession) -> String {
        let backend = TestBackend::new(90, 32);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw_battle(f, session)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_battle_screen_shows_both_hp_bars() {
        let mut rng = StdRng::seed_from_u64(4);
        let session = GameSession::new(GameMode::Battle, &mut rng);
        let text = render(&session);

        assert!(text.contains("HERO"));
        assert!(text.contains("HP 100/100"));
        assert!(text.contains("HP 60/60"));
        assert!(text.contains("Battle Arena"));
    }

    #[test]
    fn test_battle_screen_survives_ticks() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut session = GameSession::new(GameMode::Battle, &mut rng);
        if let Some(battle) = &mut session.battle {
            battle.resolve_incorrect();
        }
        for _ in 0..3 {
            session.tick();
        }
        let text = render(&session);
        assert!(text.contains("-12"), "floating damage text should render");
    }
}
