use std::collections::VecDeque;
use std::path::PathBuf;

use rand::Rng;

use crate::battle::BattleState;
use crate::file_io;
use crate::generator;
use crate::grading::GradingPolicy;

/// How many display values the anti-repeat window remembers.
pub const RECENT_CAPACITY: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    KmToM,
    MToKm,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::KmToM => Direction::MToKm,
            Direction::MToKm => Direction::KmToM,
        }
    }

    /// (source unit, target unit)
    pub fn units(self) -> (&'static str, &'static str) {
        match self {
            Direction::KmToM => ("km", "m"),
            Direction::MToKm => ("m", "km"),
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Direction::KmToM => "km_to_m",
            Direction::MToKm => "m_to_km",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConversionQuestion {
    pub prompt: String,
    pub correct_answer: f64,
    pub unit_from: &'static str,
    pub unit_to: &'static str,
    pub sig_figs: u32,
    pub direction: Direction,
    /// The magnitude exactly as shown in the prompt, used for hints.
    pub display_value: String,
    /// Direction tag + display value, used by the anti-repeat window.
    pub value_key: String,
}

#[derive(Debug, Clone)]
pub struct DivisionQuestion {
    pub dividend: u32,
    pub divisor: u32,
    pub answer: u32,
}

impl DivisionQuestion {
    pub fn prompt(&self) -> String {
        format!("{} / {} = ?", self.dividend, self.divisor)
    }
}

#[derive(Debug, Clone)]
pub enum Question {
    Conversion(ConversionQuestion),
    Division(DivisionQuestion),
}

impl Question {
    pub fn prompt(&self) -> String {
        match self {
            Question::Conversion(q) => q.prompt.clone(),
            Question::Division(q) => q.prompt(),
        }
    }

    /// The correct answer formatted the way it is revealed to the player.
    pub fn correct_display(&self) -> String {
        match self {
            Question::Conversion(q) => {
                format!("{} {}", generator::format_value(q.correct_answer), q.unit_to)
            }
            Question::Division(q) => q.answer.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    Drill,
    Challenge,
    Division,
    Battle,
}

impl GameMode {
    pub const ALL: [GameMode; 4] = [
        GameMode::Drill,
        GameMode::Challenge,
        GameMode::Division,
        GameMode::Battle,
    ];

    pub fn title(self) -> &'static str {
        match self {
            GameMode::Drill => "Distance Drill",
            GameMode::Challenge => "Distance Challenge",
            GameMode::Division => "Division Quiz",
            GameMode::Battle => "Battle Arena",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            GameMode::Drill => "km <-> m conversions, one try per question",
            GameMode::Challenge => "sig-fig precision, levels, streaks and hints",
            GameMode::Division => "division facts from the 2-12 times tables",
            GameMode::Battle => "answer to attack, miss and the monster strikes",
        }
    }

    pub fn log_file(self) -> &'static str {
        match self {
            GameMode::Drill => "conversion_log.txt",
            GameMode::Challenge => "challenge_log.txt",
            GameMode::Division => "division_log.txt",
            GameMode::Battle => "battle_log.txt",
        }
    }

    pub fn log_banner(self) -> &'static str {
        match self {
            GameMode::Drill => "=== Distance Drill Log ===",
            GameMode::Challenge => "=== Distance Challenge Log ===",
            GameMode::Division => "=== Division Quiz Log ===",
            GameMode::Battle => "=== Battle Arena Log ===",
        }
    }

    pub fn policy(self) -> GradingPolicy {
        match self {
            GameMode::Drill => GradingPolicy::FixedRelative,
            GameMode::Challenge | GameMode::Battle => GradingPolicy::SigFigHalfUnit,
            GameMode::Division => GradingPolicy::ExactInteger,
        }
    }

    /// Battle mode additionally rejects inputs like "3.0" or "0005".
    pub fn rejects_redundant_zeros(self) -> bool {
        matches!(self, GameMode::Battle)
    }

    /// Division locks the next question until the current one is answered
    /// correctly; the distance variants allow one graded attempt and move on.
    pub fn locks_next_until_correct(self) -> bool {
        matches!(self, GameMode::Division)
    }

    pub fn scales_difficulty(self) -> bool {
        matches!(self, GameMode::Challenge | GameMode::Battle)
    }

    pub fn hints_enabled(self) -> bool {
        !matches!(self, GameMode::Drill)
    }

    /// Whether a wrong answer reveals the correct one. Division keeps it
    /// hidden so the player can retry.
    pub fn reveals_answer(self) -> bool {
        !matches!(self, GameMode::Division)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Achievement {
    Streak5,
    Streak10,
    Correct20,
    Attempted50,
    PerfectTen,
}

impl Achievement {
    pub const ALL: [Achievement; 5] = [
        Achievement::Streak5,
        Achievement::Streak10,
        Achievement::Correct20,
        Achievement::Attempted50,
        Achievement::PerfectTen,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Achievement::Streak5 => "5 in a Row!",
            Achievement::Streak10 => "Perfect 10 Streak!",
            Achievement::Correct20 => "20 Correct Answers!",
            Achievement::Attempted50 => "50 Questions Attempted!",
            Achievement::PerfectTen => "Perfect Score!",
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct Stats {
    pub answered: usize,
    pub correct: usize,
    pub streak: usize,
    pub best_streak: usize,
    pub hints_used: usize,
    pub achievements: Vec<Achievement>,
}

impl Stats {
    pub fn accuracy_percent(&self) -> f64 {
        if self.answered == 0 {
            0.0
        } else {
            self.correct as f64 / self.answered as f64 * 100.0
        }
    }

    pub fn has_achievement(&self, achievement: Achievement) -> bool {
        self.achievements.contains(&achievement)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackTone {
    Praise,
    Encourage,
    Warn,
    Info,
}

#[derive(Debug, Clone)]
pub struct Feedback {
    pub text: String,
    pub tone: FeedbackTone,
}

impl Feedback {
    pub fn praise(text: impl Into<String>) -> Self {
        Feedback {
            text: text.into(),
            tone: FeedbackTone::Praise,
        }
    }

    pub fn encourage(text: impl Into<String>) -> Self {
        Feedback {
            text: text.into(),
            tone: FeedbackTone::Encourage,
        }
    }

    pub fn warn(text: impl Into<String>) -> Self {
        Feedback {
            text: text.into(),
            tone: FeedbackTone::Warn,
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Feedback {
            text: text.into(),
            tone: FeedbackTone::Info,
        }
    }
}

#[derive(Debug)]
pub struct GameSession {
    pub mode: GameMode,
    pub question: Question,
    pub input_buffer: String,
    pub cursor_position: usize,
    /// False while the player can still type an answer for this question,
    /// true once the question is settled and "next" is available.
    pub showing_result: bool,
    pub stats: Stats,
    pub difficulty: u8,
    pub prev_direction: Option<Direction>,
    pub recent: VecDeque<String>,
    pub answered_this_question: bool,
    pub correct_this_question: bool,
    pub hint_available: bool,
    pub feedback: Option<Feedback>,
    /// One-line announcement above the question (level changes, reveals,
    /// achievements).
    pub banner: Option<String>,
    pub battle: Option<BattleState>,
    /// None disables attempt logging (used by tests).
    pub log_path: Option<PathBuf>,
    /// Set when the battle hero runs out of HP; the session is over.
    pub game_over: bool,
}

impl GameSession {
    pub fn new<R: Rng>(mode: GameMode, rng: &mut R) -> GameSession {
        let mut session = GameSession {
            mode,
            question: Question::Division(DivisionQuestion {
                dividend: 0,
                divisor: 1,
                answer: 0,
            }),
            input_buffer: String::new(),
            cursor_position: 0,
            showing_result: false,
            stats: Stats::default(),
            difficulty: 1,
            prev_direction: None,
            recent: VecDeque::with_capacity(RECENT_CAPACITY),
            answered_this_question: false,
            correct_this_question: false,
            hint_available: mode.hints_enabled(),
            feedback: None,
            banner: None,
            battle: if mode == GameMode::Battle {
                Some(BattleState::new(rng))
            } else {
                None
            },
            log_path: None,
            game_over: false,
        };

        session.issue_question(rng);
        session
    }

    /// Point the session at its per-mode attempt log, writing the banner if
    /// the file does not exist yet. Initialization failures are diagnosed and
    /// logging stays off; they never block play.
    pub fn attach_default_log(&mut self) {
        let path = PathBuf::from(self.mode.log_file());
        match file_io::ensure_log(&path, self.mode.log_banner()) {
            Ok(()) => self.log_path = Some(path),
            Err(e) => {
                file_io::report_error(&format!("initializing {}", path.display()), &e);
            }
        }
    }

    /// Generate the next question for this mode and reset per-question state.
    /// The issued question is recorded into the anti-repeat window and the
    /// previous-direction memory here, keeping the generator itself pure.
    pub fn issue_question<R: Rng>(&mut self, rng: &mut R) {
        let question = match self.mode {
            GameMode::Drill => {
                Question::Conversion(generator::generate_simple_conversion(rng))
            }
            GameMode::Challenge | GameMode::Battle => {
                let q = generator::generate_conversion(
                    rng,
                    self.difficulty,
                    self.prev_direction,
                    &self.recent,
                );
                self.prev_direction = Some(q.direction);
                if self.recent.len() == RECENT_CAPACITY {
                    self.recent.pop_front();
                }
                self.recent.push_back(q.value_key.clone());
                Question::Conversion(q)
            }
            GameMode::Division => Question::Division(generator::generate_division(rng)),
        };

        self.question = question;
        self.input_buffer.clear();
        self.cursor_position = 0;
        self.showing_result = false;
        self.answered_this_question = false;
        self.correct_this_question = false;
        self.hint_available = self.mode.hints_enabled();
        self.feedback = None;
        self.banner = None;
    }

    /// Cosmetic animation step, driven by the main loop's poll timeout.
    pub fn tick(&mut self) {
        if let Some(battle) = &mut self.battle {
            battle.tick();
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum AppState {
    Menu,
    Playing,
    QuitConfirm,
    Summary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_direction_opposite() {
        assert_eq!(Direction::KmToM.opposite(), Direction::MToKm);
        assert_eq!(Direction::MToKm.opposite(), Direction::KmToM);
    }

    #[test]
    fn test_direction_units() {
        assert_eq!(Direction::KmToM.units(), ("km", "m"));
        assert_eq!(Direction::MToKm.units(), ("m", "km"));
    }

    #[test]
    fn test_division_prompt() {
        let q = DivisionQuestion {
            dividend: 63,
            divisor: 9,
            answer: 7,
        };
        assert_eq!(q.prompt(), "63 / 9 = ?");
        assert_eq!(Question::Division(q).correct_display(), "7");
    }

    #[test]
    fn test_stats_accuracy() {
        let mut stats = Stats::default();
        assert_eq!(stats.accuracy_percent(), 0.0);
        stats.answered = 4;
        stats.correct = 3;
        assert_eq!(stats.accuracy_percent(), 75.0);
    }

    #[test]
    fn test_new_session_issues_question() {
        let mut rng = StdRng::seed_from_u64(7);
        let session = GameSession::new(GameMode::Challenge, &mut rng);

        assert!(session.log_path.is_none());
        assert!(!session.showing_result);
        assert!(session.input_buffer.is_empty());
        assert_eq!(session.recent.len(), 1);
        assert!(session.prev_direction.is_some());
        match &session.question {
            Question::Conversion(q) => assert_eq!(session.recent[0], q.value_key),
            Question::Division(_) => panic!("challenge mode must issue conversions"),
        }
    }

    #[test]
    fn test_recent_window_is_bounded() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut session = GameSession::new(GameMode::Challenge, &mut rng);

        for _ in 0..(RECENT_CAPACITY * 2) {
            session.issue_question(&mut rng);
        }
        assert!(session.recent.len() <= RECENT_CAPACITY);
    }

    #[test]
    fn test_battle_session_has_battle_state() {
        let mut rng = StdRng::seed_from_u64(3);
        let session = GameSession::new(GameMode::Battle, &mut rng);
        assert!(session.battle.is_some());

        let mut rng = StdRng::seed_from_u64(3);
        let session = GameSession::new(GameMode::Drill, &mut rng);
        assert!(session.battle.is_none());
    }
}
