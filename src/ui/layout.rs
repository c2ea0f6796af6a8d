use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct GameLayout {
    pub header_area: Rect,
    pub banner_area: Rect,
    pub question_area: Rect,
    pub input_area: Rect,
    pub feedback_area: Rect,
    pub help_area: Rect,
}

pub struct BattleLayout {
    pub header_area: Rect,
    pub banner_area: Rect,
    pub hero_area: Rect,
    pub monster_area: Rect,
    pub question_area: Rect,
    pub input_area: Rect,
    pub feedback_area: Rect,
    pub help_area: Rect,
}

pub struct SummaryLayout {
    pub header_area: Rect,
    pub content_area: Rect,
    pub footer_area: Rect,
}

pub fn calculate_game_chunks(area: Rect) -> GameLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Min(4),
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(3),
        ])
        .split(area);

    GameLayout {
        header_area: chunks[0],
        banner_area: chunks[1],
        question_area: chunks[2],
        input_area: chunks[3],
        feedback_area: chunks[4],
        help_area: chunks[5],
    }
}

pub fn calculate_battle_chunks(area: Rect) -> BattleLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Length(8),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(3),
        ])
        .split(area);

    let arena = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);

    BattleLayout {
        header_area: chunks[0],
        banner_area: chunks[1],
        hero_area: arena[0],
        monster_area: arena[1],
        question_area: chunks[3],
        input_area: chunks[4],
        feedback_area: chunks[5],
        help_area: chunks[6],
    }
}

pub fn calculate_summary_chunks(area: Rect) -> SummaryLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(3),
        ])
        .split(area);

    SummaryLayout {
        header_area: chunks[0],
        content_area: chunks[1],
        footer_area: chunks[2],
    }
}
