use lazy_static::lazy_static;
use regex::Regex;

use crate::models::Question;

lazy_static! {
    /// Plain base-10 numbers only: an optional sign, digits, optionally a
    /// fractional part. No exponents, no thousands separators.
    static ref DECIMAL_RE: Regex = Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)$").unwrap();
}

/// The tolerance formulas differ between the original variants; they stay
/// distinct named policies rather than being unified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradingPolicy {
    /// Half of the smallest displayed unit at the question's sig-fig
    /// precision, floored at 1e-9.
    SigFigHalfUnit,
    /// |answer| * 1e-9 + 1e-12, for variants without sig-fig plumbing.
    FixedRelative,
    /// Whole-number equality, for the division facts.
    ExactInteger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputError {
    Empty,
    NotANumber,
    NotAWholeNumber,
    RedundantZeros,
}

impl InputError {
    pub fn message(self) -> &'static str {
        match self {
            InputError::Empty => "Type an answer first!",
            InputError::NotANumber => "Enter a number only, like 1500 or 2.5",
            InputError::NotAWholeNumber => "Enter a whole number!",
            InputError::RedundantZeros => {
                "Avoid unnecessary zeros: write 3, 2.5 or 0 - not 3.0, 2.50 or 0005"
            }
        }
    }
}

/// Outcome of grading one typed attempt. Invalid attempts never touch the
/// score or streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    Correct,
    Incorrect,
    Invalid(InputError),
}

impl Grade {
    pub fn is_valid(self) -> bool {
        !matches!(self, Grade::Invalid(_))
    }

    pub fn is_correct(self) -> bool {
        matches!(self, Grade::Correct)
    }
}

/// Parse a plain decimal number, rejecting everything `f64::from_str` would
/// accept beyond simple base-10 (exponents, inf, nan, hex-ish forms).
pub fn parse_decimal(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if !DECIMAL_RE.is_match(trimmed) {
        return None;
    }
    trimmed.parse().ok()
}

/// Parse a non-negative whole number written with digits only.
pub fn parse_whole(input: &str) -> Option<u32> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    trimmed.parse().ok()
}

/// Formatting nudge: flag padded forms like "3.0", "2.50" or "0005".
pub fn has_redundant_zeros(input: &str) -> bool {
    let mut s = input.trim();
    if s.is_empty() {
        return false;
    }
    s = s.strip_prefix(['+', '-']).unwrap_or(s);
    if s.contains('e') || s.contains('E') {
        return false;
    }
    if s.starts_with('0') && s.len() > 1 && !s.starts_with("0.") {
        return true;
    }
    if let Some((_, frac)) = s.split_once('.') {
        if !frac.is_empty() && frac.chars().all(|c| c == '0') {
            return true;
        }
        if frac.len() > 1 && frac.ends_with('0') {
            return true;
        }
    }
    false
}

/// Acceptance window derived from the displayed precision: half of the
/// smallest representable unit at `sig_figs` significant figures.
pub fn tolerance_from_sig_figs(answer: f64, sig_figs: u32) -> f64 {
    if answer == 0.0 {
        return 1e-12;
    }
    let exponent = answer.abs().log10().floor() as i32 - sig_figs as i32 + 1;
    let tolerance = 0.5 * 10f64.powi(exponent);
    tolerance.max(1e-9)
}

pub fn fixed_relative_tolerance(answer: f64) -> f64 {
    answer.abs() * 1e-9 + 1e-12
}

/// Grade one typed attempt against the current question under the given
/// policy. `reject_redundant_zeros` layers the optional formatting rule on
/// top; it yields an invalid attempt, not an incorrect one.
pub fn grade_attempt(
    raw: &str,
    question: &Question,
    policy: GradingPolicy,
    reject_redundant_zeros: bool,
) -> Grade {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Grade::Invalid(InputError::Empty);
    }
    if reject_redundant_zeros && has_redundant_zeros(trimmed) {
        return Grade::Invalid(InputError::RedundantZeros);
    }

    match question {
        Question::Division(q) => match parse_whole(trimmed) {
            Some(value) => {
                if value == q.answer {
                    Grade::Correct
                } else {
                    Grade::Incorrect
                }
            }
            None => Grade::Invalid(InputError::NotAWholeNumber),
        },
        Question::Conversion(q) => {
            let value = match parse_decimal(trimmed) {
                Some(v) => v,
                None => return Grade::Invalid(InputError::NotANumber),
            };
            let tolerance = match policy {
                GradingPolicy::SigFigHalfUnit => {
                    tolerance_from_sig_figs(q.correct_answer, q.sig_figs)
                }
                GradingPolicy::FixedRelative => fixed_relative_tolerance(q.correct_answer),
                GradingPolicy::ExactInteger => 0.0,
            };
            if (value - q.correct_answer).abs() <= tolerance {
                Grade::Correct
            } else {
                Grade::Incorrect
            }
        }
    }
}
