//! Memory-state formulas of FSRS-6.
//!
//! Every function is pure over the weight vector `w` and a rating. Stability
//! results are floored at [`STABILITY_MIN`]; difficulty results are clamped to
//! `[1, 10]` except where noted. Powers of e go through `E.powf` rather than
//! `exp`; the two can differ in the last bit and records are compared exactly.

use std::f64::consts::E;

use crate::{Parameters, Rating, DIFFICULTY_MAX, DIFFICULTY_MIN, STABILITY_MIN};

fn clamp_stability(s: f64) -> f64 {
    s.max(STABILITY_MIN)
}

fn clamp_difficulty(d: f64) -> f64 {
    d.clamp(DIFFICULTY_MIN, DIFFICULTY_MAX)
}

fn score(rating: Rating) -> f64 {
    f64::from(rating.as_score())
}

pub fn initial_stability(w: &Parameters, rating: Rating) -> f64 {
    clamp_stability(w[rating.stability_index()])
}

fn raw_initial_difficulty(w: &Parameters, rating: Rating) -> f64 {
    w[4] - E.powf(w[5] * (score(rating) - 1.0)) + 1.0
}

pub fn initial_difficulty(w: &Parameters, rating: Rating) -> f64 {
    clamp_difficulty(raw_initial_difficulty(w, rating))
}

pub fn next_difficulty(w: &Parameters, difficulty: f64, rating: Rating) -> f64 {
    let delta = -(w[6] * (score(rating) - 3.0));
    let damped = difficulty + (10.0 - difficulty) * delta / 9.0;
    // mean reversion towards the unclamped initial difficulty of Easy
    let target = raw_initial_difficulty(w, Rating::Easy);
    clamp_difficulty(w[7] * target + (1.0 - w[7]) * damped)
}

/// Stability after a review less than a day after the previous one.
pub fn short_term_stability(w: &Parameters, stability: f64, rating: Rating) -> f64 {
    let mut increase =
        E.powf(w[17] * (score(rating) - 3.0 + w[18])) * stability.powf(-w[19]);
    if matches!(rating, Rating::Good | Rating::Easy) {
        increase = increase.max(1.0);
    }
    clamp_stability(stability * increase)
}

pub fn next_stability(
    w: &Parameters,
    difficulty: f64,
    stability: f64,
    retrievability: f64,
    rating: Rating,
) -> f64 {
    let next = match rating {
        Rating::Again => next_forget_stability(w, difficulty, stability, retrievability),
        Rating::Hard | Rating::Good | Rating::Easy => {
            next_recall_stability(w, difficulty, stability, retrievability, rating)
        }
    };
    clamp_stability(next)
}

fn next_forget_stability(
    w: &Parameters,
    difficulty: f64,
    stability: f64,
    retrievability: f64,
) -> f64 {
    let long_term = w[11]
        * difficulty.powf(-w[12])
        * ((stability + 1.0).powf(w[13]) - 1.0)
        * E.powf((1.0 - retrievability) * w[14]);
    let short_term = stability / E.powf(w[17] * w[18]);
    long_term.min(short_term)
}

fn next_recall_stability(
    w: &Parameters,
    difficulty: f64,
    stability: f64,
    retrievability: f64,
    rating: Rating,
) -> f64 {
    let hard_penalty = if rating == Rating::Hard { w[15] } else { 1.0 };
    let easy_bonus = if rating == Rating::Easy { w[16] } else { 1.0 };
    stability
        * (1.0
            + E.powf(w[8])
                * (11.0 - difficulty)
                * stability.powf(-w[9])
                * (E.powf((1.0 - retrievability) * w[10]) - 1.0)
                * hard_penalty
                * easy_bonus)
}
