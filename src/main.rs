use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use math_drills::models::{AppState, GameMode, GameSession};
use math_drills::session::handle_game_input;
use math_drills::ui::{draw_battle, draw_game, draw_menu, draw_quit_confirmation, draw_summary};

/// Poll timeout doubling as the animation tick.
const TICK_INTERVAL: Duration = Duration::from_millis(100);

fn is_ctrl_c(key: KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

fn main() -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut rng = rand::thread_rng();
    let mut app_state = AppState::Menu;
    let mut selected_mode: usize = 0;
    let mut show_help = false;
    let mut session: Option<GameSession> = None;

    loop {
        terminal.draw(|f| match app_state {
            AppState::Menu => draw_menu(f, selected_mode, show_help),
            AppState::Playing => {
                if let Some(session) = &session {
                    if session.battle.is_some() {
                        draw_battle(f, session);
                    } else {
                        draw_game(f, session);
                    }
                }
            }
            AppState::QuitConfirm => draw_quit_confirmation(f),
            AppState::Summary => {
                if let Some(session) = &session {
                    draw_summary(f, session);
                }
            }
        })?;

        // Timeouts drive the cosmetic animations; keys drive everything else.
        if !event::poll(TICK_INTERVAL)? {
            if let Some(session) = &mut session {
                session.tick();
            }
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if is_ctrl_c(key) {
                break;
            }
            match app_state {
                AppState::Menu => match key.code {
                    KeyCode::Up => {
                        selected_mode = selected_mode.saturating_sub(1);
                    }
                    KeyCode::Down => {
                        if selected_mode < GameMode::ALL.len() - 1 {
                            selected_mode += 1;
                        }
                    }
                    KeyCode::Enter if !show_help => {
                        let mut new_session =
                            GameSession::new(GameMode::ALL[selected_mode], &mut rng);
                        new_session.attach_default_log();
                        session = Some(new_session);
                        app_state = AppState::Playing;
                    }
                    KeyCode::Char('h') => {
                        show_help = !show_help;
                    }
                    KeyCode::Esc if show_help => {
                        show_help = false;
                    }
                    KeyCode::Char('q') if !show_help => break,
                    _ => {}
                },
                AppState::Playing => {
                    if let Some(session) = &mut session {
                        handle_game_input(session, key, &mut app_state, &mut rng)?;
                    }
                }
                AppState::QuitConfirm => match key.code {
                    KeyCode::Char('y') => {
                        // Show the final numbers on the way out of a game.
                        app_state = AppState::Summary;
                    }
                    KeyCode::Char('n') | KeyCode::Esc => {
                        app_state = AppState::Playing;
                    }
                    _ => {}
                },
                AppState::Summary => match key.code {
                    KeyCode::Char('r') => {
                        if let Some(old) = &session {
                            let mode = old.mode;
                            let mut new_session = GameSession::new(mode, &mut rng);
                            new_session.attach_default_log();
                            session = Some(new_session);
                            app_state = AppState::Playing;
                        }
                    }
                    KeyCode::Char('m') => {
                        app_state = AppState::Menu;
                        session = None;
                    }
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    _ => {}
                },
            }
        }
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}
