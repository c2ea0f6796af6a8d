use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::Rng;
use std::io;

use crate::battle::BattleEvent;
use crate::file_io::{self, AttemptRecord};
use crate::grading::{self, Grade};
use crate::models::{Achievement, AppState, Feedback, GameMode, GameSession, Question};
use crate::utils::condense_prompt;

/// Prompts are short; the cap only guards the log against pathological ones.
const LOG_QUESTION_MAX_CHARS: usize = 120;

const PRAISE_MESSAGES: [&str; 7] = [
    "Awesome! You're a math wizard!",
    "Fantastic! That's exactly right!",
    "Brilliant! You're on fire!",
    "Amazing! You're crushing it!",
    "Spectacular! Keep it up!",
    "Perfect! You're unstoppable!",
    "Incredible! You got it!",
];

const ENCOURAGEMENT_MESSAGES: [&str; 6] = [
    "Don't worry! Every mistake is a chance to learn!",
    "Almost there! You're getting closer!",
    "Nice try! Let's learn from this!",
    "Keep going! Practice makes perfect!",
    "Great effort! You're improving!",
    "No worries! You'll get the next one!",
];

const TRY_AGAIN_MESSAGES: [&str; 6] = [
    "Keep trying!",
    "Think it through!",
    "Almost there!",
    "You can do it!",
    "Try again!",
    "Check your work!",
];

pub fn handle_game_input<R: Rng>(
    session: &mut GameSession,
    key: KeyEvent,
    app_state: &mut AppState,
    rng: &mut R,
) -> io::Result<()> {
    if !session.showing_result {
        match key.code {
            KeyCode::Esc => {
                *app_state = AppState::QuitConfirm;
            }
            KeyCode::Enter => {
                submit_answer(session, rng);
            }
            // Ctrl+H would collide with Backspace in most terminals.
            KeyCode::F(1) => {
                show_hint(session);
            }
            KeyCode::Left => {
                if session.cursor_position > 0 {
                    session.cursor_position -= 1;
                }
                session.cursor_position = session.cursor_position.min(session.input_buffer.len());
            }
            KeyCode::Right => {
                if session.cursor_position < session.input_buffer.len() {
                    session.cursor_position += 1;
                }
            }
            KeyCode::Backspace => {
                if session.cursor_position > 0 {
                    session.input_buffer.remove(session.cursor_position - 1);
                    session.cursor_position -= 1;
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                session.input_buffer.insert(session.cursor_position, c);
                session.cursor_position += 1;
            }
            _ => {}
        }
    } else {
        match key.code {
            KeyCode::Esc => {
                *app_state = AppState::QuitConfirm;
            }
            KeyCode::Enter => {
                if session.game_over {
                    *app_state = AppState::Summary;
                } else {
                    advance_question(session, rng);
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// Grade the typed buffer against the current question and fold the result
/// into the session. Invalid input only produces a warning; valid attempts
/// follow the first-attempt scoring rules and are appended to the log.
pub fn submit_answer<R: Rng>(session: &mut GameSession, rng: &mut R) {
    if session.showing_result {
        return;
    }

    let raw = session.input_buffer.clone();
    let grade = grading::grade_attempt(
        &raw,
        &session.question,
        session.mode.policy(),
        session.mode.rejects_redundant_zeros(),
    );

    let error = match grade {
        Grade::Invalid(error) => Some(error),
        _ => None,
    };
    if let Some(error) = error {
        session.feedback = Some(Feedback::warn(error.message()));
        return;
    }

    // Only the first valid attempt counts toward "questions answered".
    if !session.answered_this_question {
        session.answered_this_question = true;
        session.stats.answered += 1;
    }

    if grade.is_correct() {
        resolve_correct(session, rng);
    } else {
        resolve_incorrect(session, rng);
    }

    log_attempt(session, &raw, grade.is_correct());
}

fn resolve_correct<R: Rng>(session: &mut GameSession, rng: &mut R) {
    // Only the first correct attempt scores.
    if !session.correct_this_question {
        session.correct_this_question = true;
        session.stats.correct += 1;
        session.stats.streak += 1;
        if session.stats.streak > session.stats.best_streak {
            session.stats.best_streak = session.stats.streak;
        }
    }

    let mut message =
        PRAISE_MESSAGES[rng.gen_range(0..PRAISE_MESSAGES.len())].to_string();
    if session.stats.streak >= 3 {
        message.push_str(&format!("  ({} in a row!)", session.stats.streak));
    }
    session.feedback = Some(Feedback::praise(message));

    if let Some(achievement) = check_achievements(session) {
        session.banner = Some(format!("Achievement unlocked: {}", achievement.label()));
    }

    if let Some(battle) = &mut session.battle {
        match battle.resolve_correct(session.stats.streak, rng) {
            BattleEvent::MonsterHit { damage } => {
                session.feedback = Some(Feedback::praise(format!(
                    "Critical hit! {} damage to the {}!",
                    damage, battle.monster.name
                )));
            }
            BattleEvent::MonsterDefeated { new_level, healed } => {
                session.feedback = Some(Feedback::praise(format!(
                    "Victory! Level {}! Recovered {} HP. A {} approaches...",
                    new_level, healed, battle.monster.name
                )));
            }
            _ => {}
        }
    }

    session.showing_result = true;
}

fn resolve_incorrect<R: Rng>(session: &mut GameSession, rng: &mut R) {
    session.stats.streak = 0;

    if session.mode.reveals_answer() {
        let encouragement =
            ENCOURAGEMENT_MESSAGES[rng.gen_range(0..ENCOURAGEMENT_MESSAGES.len())];
        let tip = match &session.question {
            Question::Conversion(q) => match q.unit_to {
                "m" => "Remember: multiply by 1000 to go from km to m.",
                _ => "Remember: divide by 1000 to go from m to km.",
            },
            Question::Division(_) => "",
        };
        session.banner = Some(format!(
            "Correct answer: {}",
            session.question.correct_display()
        ));
        session.feedback = Some(Feedback::encourage(format!("{}\n{}", encouragement, tip)));
    } else {
        let message = TRY_AGAIN_MESSAGES[rng.gen_range(0..TRY_AGAIN_MESSAGES.len())];
        session.feedback = Some(Feedback::encourage(message));
    }

    if let Some(battle) = &mut session.battle {
        match battle.resolve_incorrect() {
            BattleEvent::HeroHit { damage } => {
                session.feedback = Some(Feedback::encourage(format!(
                    "The {} strikes back for {} damage!",
                    battle.monster.name, damage
                )));
            }
            BattleEvent::HeroDefeated => {
                session.game_over = true;
                session.banner = Some("The hero has fallen!".to_string());
                session.feedback = Some(Feedback::encourage(format!(
                    "Game over. The correct answer was {}.",
                    session.question.correct_display()
                )));
            }
            _ => {}
        }
    }

    if !session.mode.locks_next_until_correct() {
        session.showing_result = true;
    }
}

/// Advance to the next question, re-tuning the difficulty first for the
/// modes that scale it.
pub fn advance_question<R: Rng>(session: &mut GameSession, rng: &mut R) {
    let banner = if session.mode.scales_difficulty() {
        adjust_difficulty(session)
    } else {
        None
    };
    session.issue_question(rng);
    session.banner = banner;
}

/// Every 10 attempted questions: >= 85% accuracy raises the level, < 50%
/// lowers it. Returns the announcement for the UI, if any.
fn adjust_difficulty(session: &mut GameSession) -> Option<String> {
    if session.stats.answered == 0 || session.stats.answered % 10 != 0 {
        return None;
    }
    let accuracy = session.stats.accuracy_percent();
    if accuracy >= 85.0 && session.difficulty < 3 {
        session.difficulty += 1;
        Some(format!(
            "Level up! Difficulty increased to {}",
            session.difficulty
        ))
    } else if accuracy < 50.0 && session.difficulty > 1 {
        session.difficulty -= 1;
        Some(format!(
            "Taking it easier: difficulty adjusted to {}",
            session.difficulty
        ))
    } else {
        None
    }
}

fn check_achievements(session: &mut GameSession) -> Option<Achievement> {
    let mut unlocked = None;
    for achievement in Achievement::ALL {
        if session.stats.has_achievement(achievement) {
            continue;
        }
        let stats = &session.stats;
        let earned = match achievement {
            Achievement::Streak5 => stats.streak >= 5,
            Achievement::Streak10 => stats.streak >= 10,
            Achievement::Correct20 => stats.correct >= 20,
            Achievement::Attempted50 => stats.answered >= 50,
            Achievement::PerfectTen => {
                stats.answered >= 10 && stats.correct == stats.answered
            }
        };
        if earned {
            session.stats.achievements.push(achievement);
            if unlocked.is_none() {
                unlocked = Some(achievement);
            }
        }
    }
    unlocked
}

fn show_hint(session: &mut GameSession) {
    if !session.hint_available || session.showing_result {
        return;
    }
    session.hint_available = false;
    session.stats.hints_used += 1;

    let hint = match &session.question {
        Question::Conversion(q) => match q.unit_to {
            "m" => format!(
                "Hint: to convert km to m, multiply by 1000. {} x 1000 = ?",
                q.display_value
            ),
            _ => format!(
                "Hint: to convert m to km, divide by 1000. {} / 1000 = ?",
                q.display_value
            ),
        },
        Question::Division(q) => format!(
            "Hint: what times {} equals {}?",
            q.divisor, q.dividend
        ),
    };
    session.feedback = Some(Feedback::info(hint));
}

/// Append the graded attempt to the mode's log file. Failures are diagnosed
/// and swallowed; they never interrupt play.
fn log_attempt(session: &GameSession, raw_input: &str, is_correct: bool) {
    let Some(path) = &session.log_path else {
        return;
    };

    let extra = match session.mode {
        GameMode::Drill => String::new(),
        GameMode::Challenge => format!(
            "Streak: {} | Level: {}",
            session.stats.streak, session.difficulty
        ),
        GameMode::Division => format!("Streak: {}", session.stats.streak),
        GameMode::Battle => match &session.battle {
            Some(b) => format!(
                "Streak: {} | Lv {} | Hero {}/{} | Monster {}/{}",
                session.stats.streak,
                b.level,
                b.hero_hp,
                b.hero_max_hp,
                b.monster_hp,
                b.monster_max_hp
            ),
            None => String::new(),
        },
    };

    let question = condense_prompt(&session.question.prompt(), LOG_QUESTION_MAX_CHARS);
    let correct_answer = session.question.correct_display();
    let record = AttemptRecord {
        question: &question,
        raw_input,
        correct_answer: &correct_answer,
        is_correct,
        extra: &extra,
    };

    if let Err(e) = file_io::append_attempt(path, &record) {
        file_io::report_error(&format!("writing {}", path.display()), &e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConversionQuestion, Direction, DivisionQuestion, FeedbackTone};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn hint_key() -> KeyEvent {
        KeyEvent::new(KeyCode::F(1), KeyModifiers::empty())
    }

    fn conversion_session(mode: GameMode) -> (GameSession, StdRng) {
        let mut rng = StdRng::seed_from_u64(99);
        let mut session = GameSession::new(mode, &mut rng);
        session.question = Question::Conversion(ConversionQuestion {
            prompt: "The spaceship traveled 3 kilometers.\nHow many meters is that?"
                .to_string(),
            correct_answer: 3000.0,
            unit_from: "km",
            unit_to: "m",
            sig_figs: 1,
            direction: Direction::KmToM,
            display_value: "3".to_string(),
            value_key: "km_to_m:3".to_string(),
        });
        (session, rng)
    }

    fn division_session() -> (GameSession, StdRng) {
        let mut rng = StdRng::seed_from_u64(7);
        let mut session = GameSession::new(GameMode::Division, &mut rng);
        session.question = Question::Division(DivisionQuestion {
            dividend: 63,
            divisor: 9,
            answer: 7,
        });
        (session, rng)
    }

    fn type_answer<R: Rng>(session: &mut GameSession, text: &str, rng: &mut R) {
        let mut app_state = AppState::Playing;
        for c in text.chars() {
            handle_game_input(session, key(KeyCode::Char(c)), &mut app_state, rng).unwrap();
        }
    }

    #[test]
    fn test_typing_and_cursor_editing() {
        let (mut session, mut rng) = conversion_session(GameMode::Challenge);
        let mut app_state = AppState::Playing;

        type_answer(&mut session, "300", &mut rng);
        assert_eq!(session.input_buffer, "300");
        assert_eq!(session.cursor_position, 3);

        handle_game_input(&mut session, key(KeyCode::Left), &mut app_state, &mut rng).unwrap();
        handle_game_input(
            &mut session,
            key(KeyCode::Char('0')),
            &mut app_state,
            &mut rng,
        )
        .unwrap();
        assert_eq!(session.input_buffer, "3000");
        assert_eq!(session.cursor_position, 3);

        handle_game_input(
            &mut session,
            key(KeyCode::Backspace),
            &mut app_state,
            &mut rng,
        )
        .unwrap();
        assert_eq!(session.input_buffer, "300");
    }

    #[test]
    fn test_correct_answer_scores_and_settles_question() {
        let (mut session, mut rng) = conversion_session(GameMode::Challenge);
        session.input_buffer = "3000".to_string();

        submit_answer(&mut session, &mut rng);

        assert_eq!(session.stats.answered, 1);
        assert_eq!(session.stats.correct, 1);
        assert_eq!(session.stats.streak, 1);
        assert_eq!(session.stats.best_streak, 1);
        assert!(session.showing_result);
        assert_eq!(
            session.feedback.as_ref().map(|f| f.tone),
            Some(FeedbackTone::Praise)
        );
    }

    #[test]
    fn test_answer_within_tolerance_is_correct() {
        // 3 km at 1 sig fig tolerates +/- 500 m.
        let (mut session, mut rng) = conversion_session(GameMode::Challenge);
        session.input_buffer = "2500".to_string();
        submit_answer(&mut session, &mut rng);
        assert_eq!(session.stats.correct, 1);
    }

    #[test]
    fn test_wrong_answer_resets_streak_and_reveals() {
        let (mut session, mut rng) = conversion_session(GameMode::Challenge);
        session.stats.streak = 4;
        session.stats.best_streak = 4;
        session.input_buffer = "2000".to_string();

        submit_answer(&mut session, &mut rng);

        assert_eq!(session.stats.answered, 1);
        assert_eq!(session.stats.correct, 0);
        assert_eq!(session.stats.streak, 0);
        assert_eq!(session.stats.best_streak, 4);
        assert!(session.showing_result, "drill variants settle after one try");
        assert_eq!(
            session.banner.as_deref(),
            Some("Correct answer: 3000 m")
        );
    }

    #[test]
    fn test_invalid_input_mutates_nothing() {
        let (mut session, mut rng) = conversion_session(GameMode::Challenge);
        for raw in ["abc", "", "12x", "   "] {
            session.input_buffer = raw.to_string();
            submit_answer(&mut session, &mut rng);
            assert_eq!(session.stats.answered, 0, "input {:?}", raw);
            assert_eq!(session.stats.correct, 0);
            assert!(!session.showing_result);
            assert_eq!(
                session.feedback.as_ref().map(|f| f.tone),
                Some(FeedbackTone::Warn)
            );
        }
    }

    #[test]
    fn test_battle_rejects_padded_zeros() {
        let (mut session, mut rng) = conversion_session(GameMode::Battle);
        session.input_buffer = "3000.0".to_string();
        submit_answer(&mut session, &mut rng);
        assert_eq!(session.stats.answered, 0);
        assert!(!session.showing_result);
    }

    #[test]
    fn test_division_locks_next_until_correct() {
        let (mut session, mut rng) = division_session();

        session.input_buffer = "9".to_string();
        submit_answer(&mut session, &mut rng);
        assert!(!session.showing_result, "wrong answer must not unlock next");
        assert_eq!(session.stats.answered, 1);
        assert_eq!(session.stats.correct, 0);

        session.input_buffer = "8".to_string();
        submit_answer(&mut session, &mut rng);
        assert_eq!(session.stats.answered, 1, "re-attempts count once");

        session.input_buffer = "7".to_string();
        submit_answer(&mut session, &mut rng);
        assert!(session.showing_result);
        assert_eq!(session.stats.answered, 1);
        assert_eq!(session.stats.correct, 1);
        assert_eq!(session.stats.streak, 1);
    }

    #[test]
    fn test_division_does_not_reveal_answer() {
        let (mut session, mut rng) = division_session();
        session.input_buffer = "9".to_string();
        submit_answer(&mut session, &mut rng);
        assert!(session.banner.is_none());
    }

    #[test]
    fn test_difficulty_rises_on_high_accuracy() {
        let (mut session, mut rng) = conversion_session(GameMode::Challenge);
        session.stats.answered = 10;
        session.stats.correct = 9;

        advance_question(&mut session, &mut rng);

        assert_eq!(session.difficulty, 2);
        assert!(
            session
                .banner
                .as_deref()
                .is_some_and(|b| b.contains("Level up"))
        );
    }

    #[test]
    fn test_difficulty_drops_on_low_accuracy() {
        let (mut session, mut rng) = conversion_session(GameMode::Challenge);
        session.difficulty = 3;
        session.stats.answered = 20;
        session.stats.correct = 4;

        advance_question(&mut session, &mut rng);
        assert_eq!(session.difficulty, 2);
    }

    #[test]
    fn test_difficulty_untouched_between_checkpoints() {
        let (mut session, mut rng) = conversion_session(GameMode::Challenge);
        session.stats.answered = 7;
        session.stats.correct = 7;
        advance_question(&mut session, &mut rng);
        assert_eq!(session.difficulty, 1);
    }

    #[test]
    fn test_streak_achievement_unlocks_once() {
        let (mut session, mut rng) = conversion_session(GameMode::Challenge);
        session.stats.streak = 4;
        session.stats.correct = 4;
        session.stats.answered = 4;
        session.input_buffer = "3000".to_string();

        submit_answer(&mut session, &mut rng);
        assert!(session.stats.has_achievement(Achievement::Streak5));
        assert!(
            session
                .banner
                .as_deref()
                .is_some_and(|b| b.contains("5 in a Row"))
        );

        // A later 5-streak does not re-announce.
        advance_question(&mut session, &mut rng);
        session.question = Question::Division(DivisionQuestion {
            dividend: 12,
            divisor: 3,
            answer: 4,
        });
        session.stats.streak = 5;
        session.input_buffer = "4".to_string();
        submit_answer(&mut session, &mut rng);
        assert_eq!(
            session
                .stats
                .achievements
                .iter()
                .filter(|a| **a == Achievement::Streak5)
                .count(),
            1
        );
    }

    #[test]
    fn test_hint_is_single_use_and_counted() {
        let (mut session, mut rng) = conversion_session(GameMode::Challenge);
        let mut app_state = AppState::Playing;

        handle_game_input(&mut session, hint_key(), &mut app_state, &mut rng).unwrap();
        assert_eq!(session.stats.hints_used, 1);
        assert!(!session.hint_available);
        assert!(
            session
                .feedback
                .as_ref()
                .is_some_and(|f| f.text.contains("multiply by 1000"))
        );

        handle_game_input(&mut session, hint_key(), &mut app_state, &mut rng).unwrap();
        assert_eq!(session.stats.hints_used, 1);
    }

    #[test]
    fn test_battle_defeat_ends_session() {
        let (mut session, mut rng) = conversion_session(GameMode::Battle);
        if let Some(battle) = &mut session.battle {
            battle.hero_hp = 5;
        }
        session.input_buffer = "1".to_string();
        submit_answer(&mut session, &mut rng);

        assert!(session.game_over);
        assert!(session.showing_result);

        let mut app_state = AppState::Playing;
        handle_game_input(&mut session, key(KeyCode::Enter), &mut app_state, &mut rng).unwrap();
        assert_eq!(app_state, AppState::Summary);
    }

    #[test]
    fn test_battle_victory_feedback() {
        let (mut session, mut rng) = conversion_session(GameMode::Battle);
        if let Some(battle) = &mut session.battle {
            battle.monster_hp = 1;
        }
        session.input_buffer = "3000".to_string();
        submit_answer(&mut session, &mut rng);

        let battle = session.battle.as_ref().unwrap();
        assert_eq!(battle.level, 2);
        assert!(
            session
                .feedback
                .as_ref()
                .is_some_and(|f| f.text.contains("Victory"))
        );
    }

    #[test]
    fn test_escape_prompts_quit_confirmation() {
        let (mut session, mut rng) = conversion_session(GameMode::Drill);
        let mut app_state = AppState::Playing;
        handle_game_input(&mut session, key(KeyCode::Esc), &mut app_state, &mut rng).unwrap();
        assert_eq!(app_state, AppState::QuitConfirm);
    }

    #[test]
    fn test_enter_advances_after_result() {
        let (mut session, mut rng) = conversion_session(GameMode::Drill);
        session.input_buffer = "3000".to_string();
        submit_answer(&mut session, &mut rng);
        assert!(session.showing_result);

        let mut app_state = AppState::Playing;
        handle_game_input(&mut session, key(KeyCode::Enter), &mut app_state, &mut rng).unwrap();
        assert!(!session.showing_result);
        assert!(session.input_buffer.is_empty());
        assert_eq!(app_state, AppState::Playing);
    }

    #[test]
    fn test_attempts_are_logged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("attempts.txt");

        let (mut session, mut rng) = conversion_session(GameMode::Challenge);
        file_io::ensure_log(&path, "=== Test Log ===").unwrap();
        session.log_path = Some(path.clone());

        session.input_buffer = "3000".to_string();
        submit_answer(&mut session, &mut rng);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("=== Test Log ==="));
        assert!(contents.contains("User: 3000"));
        assert!(contents.contains("CORRECT"));
        assert!(contents.contains("Level: 1"));
        // The two-line prompt is flattened onto one log line.
        assert!(contents.contains("kilometers. How many meters"));
    }

    #[test]
    fn test_log_failure_does_not_poison_session() {
        let (mut session, mut rng) = conversion_session(GameMode::Challenge);
        session.log_path = Some(std::path::PathBuf::from(
            "/nonexistent-dir/never/attempts.txt",
        ));
        session.input_buffer = "3000".to_string();
        submit_answer(&mut session, &mut rng);

        // The attempt still graded and scored.
        assert_eq!(session.stats.correct, 1);
        assert!(session.showing_result);
    }
}
