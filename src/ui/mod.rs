pub mod layout;

mod battle;
mod game;
mod menu;
mod summary;

pub use battle::draw_battle;
pub use game::{draw_game, draw_quit_confirmation};
pub use layout::{calculate_battle_chunks, calculate_game_chunks, calculate_summary_chunks};
pub use menu::draw_menu;
pub use summary::draw_summary;
