use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::models::GameMode;

const HELP_TEXT: &str = "How to Play

Pick a game and type your answer, then press Enter to check it.

Quick reference:
  1 kilometer = 1,000 meters
  km -> m: multiply by 1000        m -> km: divide by 1000
  Examples: 2.5 km = 2500 m        5000 m = 5 km

Distance Drill      one conversion attempt per question
Distance Challenge  difficulty adjusts to how well you do;
                    answers are graded to the shown precision
Division Quiz       whole numbers only; keep trying until
                    you get it right
Battle Arena        correct answers strike the monster, wrong
                    ones hurt the hero - no padded zeros here!

Press F1 during a question for a hint (once per question).
Every attempt is recorded in the game's log file.

Press h or Esc to close this help.";

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

pub fn draw_menu(f: &mut Frame, selected_mode: usize, show_help: bool) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(3),
        ])
        .split(f.area());

    let title = Paragraph::new("Math Drills v0.1.0")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let items: Vec<ListItem> = GameMode::ALL
        .iter()
        .enumerate()
        .map(|(i, mode)| {
            let style = if i == selected_mode {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let line = Line::from(vec![
                Span::styled(format!("{:<20}", mode.title()), style),
                Span::styled(
                    mode.description(),
                    Style::default().fg(Color::DarkGray),
                ),
            ]);
            ListItem::new(line)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Games"))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    f.render_widget(list, chunks[1]);

    let help_text = vec![Line::from(vec![
        Span::styled(
            "↑/↓",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(" Navigate  "),
        Span::styled(
            "Enter",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(" Play  "),
        Span::styled(
            "h",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(" How to Play  "),
        Span::styled(
            "q",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(" Quit"),
    ])];
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);

    if show_help {
        draw_help_popup(f);
    }
}

fn draw_help_popup(f: &mut Frame) {
    let area = centered_rect(70, 80, f.area());
    f.render_widget(Clear, area);

    let popup = Paragraph::new(HELP_TEXT)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help")
                .border_style(Style::default().fg(Color::Cyan)),
        );
    f.render_widget(popup, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_menu_renders_every_mode() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw_menu(f, 0, false)).unwrap();

        let rendered = terminal.backend().buffer().clone();
        let text: String = rendered.content().iter().map(|c| c.symbol()).collect();
        for mode in GameMode::ALL {
            assert!(text.contains(mode.title()), "missing {}", mode.title());
        }
    }

    #[test]
    fn test_help_popup_renders() {
        let backend = TestBackend::new(80, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw_menu(f, 1, true)).unwrap();

        let rendered = terminal.backend().buffer().clone();
        let text: String = rendered.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("How to Play"));
    }
}
