use crate::FUZZ_RANGES;

/// Intervals shorter than this many days are never fuzzed.
pub const FUZZ_THRESHOLD_DAYS: f64 = 2.5;

/// Inclusive `(min, max)` day bounds a fuzzed interval may land in.
pub fn fuzz_range(interval_days: f64, maximum_interval: u32) -> (i64, i64) {
    let delta = FUZZ_RANGES.iter().fold(1.0, |acc, range| {
        let upper = match range.end {
            Some(end) => interval_days.min(end),
            None => interval_days,
        };
        acc + range.factor * (upper - range.start).max(0.0)
    });

    let maximum = i64::from(maximum_interval);
    let max_ivl = ((interval_days + delta).round() as i64).min(maximum);
    let min_ivl = ((interval_days - delta).round() as i64).max(2).min(max_ivl);
    (min_ivl, max_ivl)
}

/// Spreads `interval_days` over its fuzz range using a uniform draw in `[0, 1)`.
pub fn fuzzed_interval_days(interval_days: f64, maximum_interval: u32, draw: f64) -> i64 {
    let (min_ivl, max_ivl) = fuzz_range(interval_days, maximum_interval);
    let fuzzed = draw * (max_ivl - min_ivl + 1) as f64 + min_ivl as f64;
    (fuzzed.round() as i64).min(i64::from(maximum_interval))
}
