pub const PARAMETER_COUNT: usize = 21;

pub const STABILITY_MIN: f64 = 0.001;
pub const INITIAL_STABILITY_MAX: f64 = 100.0;

pub const DIFFICULTY_MIN: f64 = 1.0;
pub const DIFFICULTY_MAX: f64 = 10.0;

pub const SECONDS_PER_DAY: i64 = 86_400;

pub const DEFAULT_PARAMETERS: [f64; PARAMETER_COUNT] = [
    0.212, 1.2931, 2.3065, 8.2956, // initial stability per rating
    6.4133, 0.8334, // initial difficulty
    3.0194, 0.001, // difficulty delta, mean reversion
    1.8722, 0.1666, 0.796, // recall stability
    1.4835, 0.0614, 0.2629, 1.6483, // forget stability
    0.6014, 1.8729, // hard penalty, easy bonus
    0.5425, 0.0912, 0.0658, // short-term stability
    0.1542, // decay
];

pub const LOWER_BOUNDS_PARAMETERS: [f64; PARAMETER_COUNT] = [
    STABILITY_MIN,
    STABILITY_MIN,
    STABILITY_MIN,
    STABILITY_MIN,
    1.0,
    0.001,
    0.001,
    0.001,
    0.0,
    0.0,
    0.001,
    0.001,
    0.001,
    0.001,
    0.0,
    0.0,
    1.0,
    0.0,
    0.0,
    0.0,
    0.1,
];

pub const UPPER_BOUNDS_PARAMETERS: [f64; PARAMETER_COUNT] = [
    INITIAL_STABILITY_MAX,
    INITIAL_STABILITY_MAX,
    INITIAL_STABILITY_MAX,
    INITIAL_STABILITY_MAX,
    10.0,
    4.0,
    4.0,
    0.75,
    4.5,
    0.8,
    3.5,
    5.0,
    0.25,
    0.9,
    4.0,
    1.0,
    6.0,
    2.0,
    2.0,
    0.8,
    0.8,
];

pub const DEFAULT_DESIRED_RETENTION: f64 = 0.9;
pub const DEFAULT_LEARNING_STEPS: [u32; 2] = [60, 600];
pub const DEFAULT_RELEARNING_STEPS: [u32; 1] = [600];
pub const DEFAULT_MAXIMUM_INTERVAL: u32 = 36_500;

/// Contiguous day range contributing `factor` per day to the fuzz delta.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FuzzRange {
    pub start: f64,
    pub end: Option<f64>,
    pub factor: f64,
}

pub const FUZZ_RANGES: [FuzzRange; 3] = [
    FuzzRange {
        start: 2.5,
        end: Some(7.0),
        factor: 0.15,
    },
    FuzzRange {
        start: 7.0,
        end: Some(20.0),
        factor: 0.1,
    },
    FuzzRange {
        start: 20.0,
        end: None,
        factor: 0.05,
    },
];
