pub mod battle;
pub mod file_io;
pub mod generator;
pub mod grading;
pub mod models;
pub mod session;
pub mod ui;
pub mod utils;

// Re-exports for convenience
pub use battle::{BattleEvent, BattleState};
pub use file_io::{AttemptRecord, append_attempt, ensure_log, report_error};
pub use generator::{
    format_value, generate_conversion, generate_division, generate_simple_conversion, round_sig,
    weighted_choice,
};
pub use grading::{Grade, GradingPolicy, InputError, grade_attempt};
pub use models::{AppState, Direction, GameMode, GameSession, Question, Stats};
pub use session::{advance_question, handle_game_input, submit_answer};
pub use ui::{draw_battle, draw_game, draw_menu, draw_quit_confirmation, draw_summary};
