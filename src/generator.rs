use std::collections::VecDeque;

use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};

use crate::models::{ConversionQuestion, Direction, DivisionQuestion};

/// Retry budget for the anti-repeat loop before forcing a direction flip.
const MAX_GENERATION_ATTEMPTS: usize = 100;

/// Attempts during which a repeated direction is rejected outright.
const ALTERNATION_ATTEMPTS: usize = 10;

const KM_TEMPLATES: [&str; 6] = [
    "The spaceship traveled {val} kilometers.\nHow many meters is that?",
    "The moon rover drove {val} km across the surface.\nConvert to meters!",
    "The airplane flew {val} kilometers.\nWhat's that in meters?",
    "The marathon runner completed {val} km.\nHow many meters did they run?",
    "The train traveled {val} kilometers.\nExpress this in meters!",
    "The hot air balloon drifted {val} km.\nHow many meters is that?",
];

const M_TEMPLATES: [&str; 6] = [
    "The rocket flew {val} meters into the sky.\nHow many kilometers is that?",
    "The swimmer completed {val} meters.\nConvert to kilometers!",
    "The cyclist rode {val} meters.\nWhat's that in kilometers?",
    "The arrow flew {val} meters.\nExpress this in kilometers!",
    "The kangaroo hopped {val} meters total.\nHow many km did it hop?",
    "The skier descended {val} meters.\nConvert to kilometers!",
];

/// Round to a number of significant figures. Zero stays zero and the figure
/// count is clamped to 1-6.
pub fn round_sig(x: f64, sig: u32) -> f64 {
    if x == 0.0 {
        return 0.0;
    }
    let sig = sig.clamp(1, 6) as i32;
    let exponent = x.abs().log10().floor() as i32;
    let factor = 10f64.powi(sig - 1 - exponent);
    (x * factor).round() / factor
}

/// Format a magnitude for display: bare integer when integral, otherwise
/// trailing zeros stripped. Never scientific notation for our ranges.
pub fn format_value(num: f64) -> String {
    if (num - num.round()).abs() < 1e-12 {
        format!("{}", num.round() as i64)
    } else {
        let formatted = format!("{:.10}", num);
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

/// (km range, m range) for a difficulty level 1-3.
pub fn difficulty_ranges(level: u8) -> ((f64, f64), (f64, f64)) {
    match level {
        1 => ((1.0, 100.0), (1000.0, 10_000.0)),
        2 => ((1.0, 500.0), (1000.0, 30_000.0)),
        _ => ((0.5, 999.0), (500.0, 50_000.0)),
    }
}

/// Pick one item according to integer weights.
pub fn weighted_choice<T: Copy, R: Rng>(rng: &mut R, items: &[(T, u32)]) -> T {
    let dist = WeightedIndex::new(items.iter().map(|(_, w)| *w))
        .expect("weights must be non-empty with a non-zero total");
    items[dist.sample(rng)].0
}

fn pick_direction<R: Rng>(rng: &mut R, prev: Option<Direction>) -> Direction {
    match prev {
        // Strong preference for alternating over repeating.
        Some(p) => weighted_choice(rng, &[(p.opposite(), 85), (p, 15)]),
        None => {
            if rng.gen_bool(0.5) {
                Direction::KmToM
            } else {
                Direction::MToKm
            }
        }
    }
}

fn build_question(
    direction: Direction,
    value: f64,
    sig_figs: u32,
    prompt: String,
) -> ConversionQuestion {
    let (unit_from, unit_to) = direction.units();
    let correct_answer = match direction {
        Direction::KmToM => value * 1000.0,
        Direction::MToKm => value / 1000.0,
    };
    let display_value = format_value(value);
    let value_key = format!("{}:{}", direction.tag(), display_value);
    ConversionQuestion {
        prompt,
        correct_answer,
        unit_from,
        unit_to,
        sig_figs,
        direction,
        display_value,
        value_key,
    }
}

/// One candidate question for the Challenge/Battle generator.
fn generate_conversion_once<R: Rng>(
    rng: &mut R,
    level: u8,
    prev: Option<Direction>,
    force: Option<Direction>,
) -> ConversionQuestion {
    let direction = force.unwrap_or_else(|| pick_direction(rng, prev));

    // Varied sig figs with a preference for 2-3.
    let sig_figs = weighted_choice(rng, &[(1u32, 1), (2, 3), (3, 3), (4, 2)]);
    let (km_range, m_range) = difficulty_ranges(level);

    match direction {
        Direction::KmToM => {
            let mut raw = rng.gen_range(km_range.0..km_range.1);
            if rng.gen_bool(0.3) && sig_figs <= 2 {
                let snapped = (raw / 10.0).round() * 10.0;
                if snapped > 0.0 {
                    raw = snapped;
                }
            }
            let value = round_sig(raw, sig_figs);
            let template = KM_TEMPLATES[rng.gen_range(0..KM_TEMPLATES.len())];
            let prompt = template.replace("{val}", &format_value(value));
            build_question(direction, value, sig_figs, prompt)
        }
        Direction::MToKm => {
            let mut raw = rng.gen_range(m_range.0..m_range.1);
            // Multiples of 1000 make for friendlier division.
            if rng.gen_bool(0.25) && sig_figs <= 3 {
                let snapped = (raw / 1000.0).round() * 1000.0;
                if snapped > 0.0 {
                    raw = snapped;
                }
            }
            let value = round_sig(raw, sig_figs);
            let template = M_TEMPLATES[rng.gen_range(0..M_TEMPLATES.len())];
            let prompt = template.replace("{val}", &format_value(value));
            build_question(direction, value, sig_figs, prompt)
        }
    }
}

/// Generate a non-repeating conversion question. Candidates whose display
/// value sits in the recent window are rejected, and for the first few
/// attempts so is a repeat of the previous direction; if the budget runs out
/// the direction opposite the previous question is forced.
pub fn generate_conversion<R: Rng>(
    rng: &mut R,
    level: u8,
    prev: Option<Direction>,
    recent: &VecDeque<String>,
) -> ConversionQuestion {
    for attempt in 0..MAX_GENERATION_ATTEMPTS {
        let q = generate_conversion_once(rng, level, prev, None);
        if !recent.contains(&q.value_key) {
            if attempt < ALTERNATION_ATTEMPTS && prev == Some(q.direction) {
                continue;
            }
            return q;
        }
    }
    let forced = prev.map(Direction::opposite).unwrap_or(Direction::KmToM);
    generate_conversion_once(rng, level, prev, Some(forced))
}

/// The simple Drill generator: uniform direction, wide fixed ranges, no
/// anti-repeat bookkeeping.
pub fn generate_simple_conversion<R: Rng>(rng: &mut R) -> ConversionQuestion {
    let direction = pick_direction(rng, None);
    let sig_figs = rng.gen_range(1..=4);

    match direction {
        Direction::KmToM => {
            let value = round_sig(rng.gen_range(1.0..999.0), sig_figs);
            let template = KM_TEMPLATES[rng.gen_range(0..KM_TEMPLATES.len())];
            let prompt = template.replace("{val}", &format_value(value));
            build_question(direction, value, sig_figs, prompt)
        }
        Direction::MToKm => {
            let value = round_sig(rng.gen_range(1000.0..50_000.0), sig_figs);
            let template = M_TEMPLATES[rng.gen_range(0..M_TEMPLATES.len())];
            let prompt = template.replace("{val}", &format_value(value));
            build_question(direction, value, sig_figs, prompt)
        }
    }
}

/// A division fact from the 2-12 times tables: dividend = a * b, divisor = b,
/// answer = a.
pub fn generate_division<R: Rng>(rng: &mut R) -> DivisionQuestion {
    let a = rng.gen_range(2..=12);
    let b = rng.gen_range(2..=12);
    DivisionQuestion {
        dividend: a * b,
        divisor: b,
        answer: a,
    }
}
