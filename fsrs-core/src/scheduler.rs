use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::step_table;
use crate::formulas::{
    initial_difficulty, initial_stability, next_difficulty, next_stability, short_term_stability,
};
use crate::fuzz::{fuzzed_interval_days, FUZZ_THRESHOLD_DAYS};
use crate::sources::{Clock, FuzzSource, RandSource, SystemClock};
use crate::{
    Card, FsrsError, ForgettingCurve, Parameters, Rating, ReviewLog, SchedulerConfig, State, Step,
    SECONDS_PER_DAY,
};

#[derive(Clone, Debug)]
pub struct ReviewOutcome {
    pub updated_card: Card,
    pub review_log: ReviewLog,
}

#[derive(Clone, Copy, Debug)]
struct MemoryState {
    stability: f64,
    difficulty: f64,
}

/// Where a review leaves the card, before fuzzing.
#[derive(Clone, Copy, Debug)]
struct Transition {
    state: State,
    step: Option<u32>,
    interval_secs: i64,
}

/// Validated, immutable scheduling configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "SchedulerConfig", try_from = "SchedulerConfig")]
pub struct Scheduler {
    parameters: Parameters,
    desired_retention: f64,
    learning_steps: Vec<u32>,
    relearning_steps: Vec<u32>,
    maximum_interval: u32,
    enable_fuzzing: bool,
    curve: ForgettingCurve,
}

impl Default for Scheduler {
    fn default() -> Self {
        let parameters = Parameters::default();
        Self {
            curve: ForgettingCurve::from_parameters(&parameters),
            parameters,
            desired_retention: crate::DEFAULT_DESIRED_RETENTION,
            learning_steps: crate::DEFAULT_LEARNING_STEPS.to_vec(),
            relearning_steps: crate::DEFAULT_RELEARNING_STEPS.to_vec(),
            maximum_interval: crate::DEFAULT_MAXIMUM_INTERVAL,
            enable_fuzzing: true,
        }
    }
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Result<Self, FsrsError> {
        Self::build(config)
            .inspect_err(|e| tracing::warn!(error = %e, "rejected scheduler config"))
    }

    fn build(config: SchedulerConfig) -> Result<Self, FsrsError> {
        let parameters = Parameters::new(&config.parameters)?;
        let retention = config.desired_retention;
        if !(retention > 0.0 && retention <= 1.0) {
            return Err(FsrsError::InvalidRetention(retention));
        }
        if config.maximum_interval == 0 {
            return Err(FsrsError::InvalidMaximumInterval);
        }
        let learning_steps = step_table(&config.learning_steps)?;
        let relearning_steps = step_table(&config.relearning_steps)?;
        let curve = ForgettingCurve::from_parameters(&parameters);

        tracing::debug!(
            desired_retention = retention,
            decay = curve.decay,
            factor = curve.factor,
            learning_steps = learning_steps.len(),
            relearning_steps = relearning_steps.len(),
            "scheduler ready"
        );

        Ok(Self {
            parameters,
            desired_retention: retention,
            learning_steps,
            relearning_steps,
            maximum_interval: config.maximum_interval,
            enable_fuzzing: config.enable_fuzzing,
            curve,
        })
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn desired_retention(&self) -> f64 {
        self.desired_retention
    }

    pub fn learning_steps(&self) -> &[u32] {
        &self.learning_steps
    }

    pub fn relearning_steps(&self) -> &[u32] {
        &self.relearning_steps
    }

    pub fn maximum_interval(&self) -> u32 {
        self.maximum_interval
    }

    pub fn enable_fuzzing(&self) -> bool {
        self.enable_fuzzing
    }

    pub fn decay(&self) -> f64 {
        self.curve.decay
    }

    pub fn factor(&self) -> f64 {
        self.curve.factor
    }

    /// Whole days until retrievability drops to the desired retention,
    /// clamped to `[1, maximum_interval]`.
    pub fn next_interval(&self, stability: f64) -> i64 {
        let days = self.curve.interval(stability, self.desired_retention).round() as i64;
        days.max(1).min(i64::from(self.maximum_interval))
    }

    /// Recall probability of `card` at `current_datetime` (now if omitted).
    /// Cards that have never been reviewed have retrievability 0.
    pub fn card_retrievability(
        &self,
        card: &Card,
        current_datetime: Option<DateTime<Utc>>,
    ) -> f64 {
        let (Some(last_review), Some(stability)) = (card.last_review, card.stability) else {
            return 0.0;
        };
        let now = current_datetime.unwrap_or_else(|| SystemClock.now());
        let elapsed_days = (now - last_review).num_days().max(0);
        self.curve.retrievability(elapsed_days as f64, stability)
    }

    /// Reviews `card` at `review_datetime` (now if omitted), fuzzing with the
    /// thread-local generator.
    pub fn review_card(
        &self,
        card: &Card,
        rating: Rating,
        review_datetime: Option<DateTime<Utc>>,
        review_duration: Option<u32>,
    ) -> Result<ReviewOutcome, FsrsError> {
        self.review_card_with(
            card,
            rating,
            review_datetime,
            review_duration,
            &SystemClock,
            &mut RandSource::thread(),
        )
    }

    pub fn review_card_with<C, F>(
        &self,
        card: &Card,
        rating: Rating,
        review_datetime: Option<DateTime<Utc>>,
        review_duration: Option<u32>,
        clock: &C,
        fuzz: &mut F,
    ) -> Result<ReviewOutcome, FsrsError>
    where
        C: Clock + ?Sized,
        F: FuzzSource + ?Sized,
    {
        let review_datetime = review_datetime.unwrap_or_else(|| clock.now());
        let days_since_last_review = card
            .last_review
            .map(|last| (review_datetime - last).num_days());

        let memory =
            self.next_memory_state(card, rating, review_datetime, days_since_last_review)?;

        let transition = match card.state {
            State::Learning => self.step_transition(
                &self.learning_steps,
                State::Learning,
                current_step(card)?,
                rating,
                memory.stability,
            ),
            State::Relearning => self.step_transition(
                &self.relearning_steps,
                State::Relearning,
                current_step(card)?,
                rating,
                memory.stability,
            ),
            State::Review => self.review_transition(rating, memory.stability),
        };

        let mut interval_secs = transition.interval_secs;
        let mut fuzzed = false;
        if self.enable_fuzzing && transition.state == State::Review {
            let interval_days = (interval_secs / SECONDS_PER_DAY) as f64;
            if interval_days >= FUZZ_THRESHOLD_DAYS {
                let draw = fuzz.uniform();
                interval_secs =
                    fuzzed_interval_days(interval_days, self.maximum_interval, draw) * SECONDS_PER_DAY;
                fuzzed = true;
            }
        }

        let due = review_datetime
            .checked_add_signed(Duration::seconds(interval_secs))
            .ok_or(FsrsError::DueOutOfRange)?;

        tracing::debug!(
            card_id = card.card_id,
            rating = rating.as_score(),
            from = ?card.state,
            to = ?transition.state,
            interval_secs,
            fuzzed,
            "reviewed card"
        );

        let updated_card = Card {
            card_id: card.card_id,
            state: transition.state,
            step: transition.step,
            stability: Some(memory.stability),
            difficulty: Some(memory.difficulty),
            due,
            last_review: Some(review_datetime),
        };
        let review_log = ReviewLog::new(card.card_id, rating, review_datetime, review_duration);

        Ok(ReviewOutcome {
            updated_card,
            review_log,
        })
    }

    fn next_memory_state(
        &self,
        card: &Card,
        rating: Rating,
        review_datetime: DateTime<Utc>,
        days_since_last_review: Option<i64>,
    ) -> Result<MemoryState, FsrsError> {
        let w = &self.parameters;
        match (card.stability, card.difficulty) {
            (None, None) if card.state == State::Learning => Ok(MemoryState {
                stability: initial_stability(w, rating),
                difficulty: initial_difficulty(w, rating),
            }),
            (Some(stability), Some(difficulty)) => {
                let stability = match days_since_last_review {
                    Some(days) if days < 1 => short_term_stability(w, stability, rating),
                    _ => {
                        let retrievability =
                            self.card_retrievability(card, Some(review_datetime));
                        next_stability(w, difficulty, stability, retrievability, rating)
                    }
                };
                Ok(MemoryState {
                    stability,
                    difficulty: next_difficulty(w, difficulty, rating),
                })
            }
            (None, None) => Err(FsrsError::InvalidCard("reviewed card without a memory state")),
            _ => Err(FsrsError::InvalidCard(
                "stability and difficulty must be set together",
            )),
        }
    }

    fn graduate(&self, stability: f64) -> Transition {
        Transition {
            state: State::Review,
            step: None,
            interval_secs: self.next_interval(stability) * SECONDS_PER_DAY,
        }
    }

    /// Shared walk through a learning or relearning step table.
    fn step_transition(
        &self,
        steps: &[u32],
        state: State,
        step: u32,
        rating: Rating,
        stability: f64,
    ) -> Transition {
        let n = steps.len();
        let at = step as usize;
        if steps.is_empty() || (at >= n && rating != Rating::Again) {
            return self.graduate(stability);
        }

        let stay = |step: u32, interval_secs: i64| Transition {
            state,
            step: Some(step),
            interval_secs,
        };
        match rating {
            Rating::Again => stay(0, i64::from(steps[0])),
            Rating::Hard => {
                let interval_secs = if at == 0 && n == 1 {
                    (f64::from(steps[0]) * 1.5) as i64
                } else if at == 0 {
                    (i64::from(steps[0]) + i64::from(steps[1])) / 2
                } else {
                    i64::from(steps[at])
                };
                stay(step, interval_secs)
            }
            Rating::Good => {
                if at + 1 == n {
                    self.graduate(stability)
                } else {
                    stay(step + 1, i64::from(steps[at + 1]))
                }
            }
            Rating::Easy => self.graduate(stability),
        }
    }

    fn review_transition(&self, rating: Rating, stability: f64) -> Transition {
        match (rating, self.relearning_steps.first()) {
            (Rating::Again, Some(&first)) => Transition {
                state: State::Relearning,
                step: Some(0),
                interval_secs: i64::from(first),
            },
            (Rating::Again, None) | (Rating::Hard | Rating::Good | Rating::Easy, _) => {
                self.graduate(stability)
            }
        }
    }

    /// Rebuilds `card` by replaying `logs` in chronological order from a new card.
    pub fn reschedule_card(&self, card: &Card, logs: &[ReviewLog]) -> Result<Card, FsrsError> {
        self.reschedule_card_with(card, logs, &mut RandSource::thread())
    }

    pub fn reschedule_card_with<F: FuzzSource + ?Sized>(
        &self,
        card: &Card,
        logs: &[ReviewLog],
        fuzz: &mut F,
    ) -> Result<Card, FsrsError> {
        if let Some(stray) = logs.iter().find(|log| log.card_id != card.card_id) {
            return Err(FsrsError::CardIdMismatch {
                expected: card.card_id,
                found: stray.card_id,
            });
        }

        let mut ordered: Vec<&ReviewLog> = logs.iter().collect();
        ordered.sort_by_key(|log| log.review_datetime.timestamp_micros());

        tracing::debug!(card_id = card.card_id, reviews = ordered.len(), "rescheduling card");

        ordered
            .into_iter()
            .try_fold(Card::with_id(card.card_id, card.due), |current, log| {
                self.review_card_with(
                    &current,
                    log.rating,
                    Some(log.review_datetime),
                    log.review_duration,
                    &SystemClock,
                    &mut *fuzz,
                )
                .map(|outcome| outcome.updated_card)
            })
    }
}

fn current_step(card: &Card) -> Result<u32, FsrsError> {
    card.step
        .ok_or(FsrsError::InvalidCard("learning card without a step"))
}

impl From<Scheduler> for SchedulerConfig {
    fn from(s: Scheduler) -> Self {
        Self {
            parameters: s.parameters.to_vec(),
            desired_retention: s.desired_retention,
            learning_steps: s.learning_steps.into_iter().map(Step::from).collect(),
            relearning_steps: s.relearning_steps.into_iter().map(Step::from).collect(),
            maximum_interval: s.maximum_interval,
            enable_fuzzing: s.enable_fuzzing,
        }
    }
}

impl TryFrom<SchedulerConfig> for Scheduler {
    type Error = FsrsError;

    fn try_from(config: SchedulerConfig) -> Result<Self, Self::Error> {
        Scheduler::new(config)
    }
}
