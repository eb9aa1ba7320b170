use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};

use crate::sources::{Clock, SystemClock};
use crate::{timestamp, FsrsError, DIFFICULTY_MAX, DIFFICULTY_MIN, STABILITY_MIN};

pub type CardId = i64;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(into = "u8", try_from = "i64")]
pub enum Rating {
    Again,
    Hard,
    Good,
    Easy,
}

impl Rating {
    pub const ALL: [Rating; 4] = [Rating::Again, Rating::Hard, Rating::Good, Rating::Easy];

    pub fn as_score(self) -> u8 {
        match self {
            Rating::Again => 1,
            Rating::Hard => 2,
            Rating::Good => 3,
            Rating::Easy => 4,
        }
    }

    /// Position of this rating's initial stability in the parameter vector.
    pub fn stability_index(self) -> usize {
        usize::from(self.as_score()) - 1
    }
}

impl From<Rating> for u8 {
    fn from(r: Rating) -> u8 {
        r.as_score()
    }
}

impl TryFrom<i64> for Rating {
    type Error = FsrsError;

    fn try_from(v: i64) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(Rating::Again),
            2 => Ok(Rating::Hard),
            3 => Ok(Rating::Good),
            4 => Ok(Rating::Easy),
            other => Err(FsrsError::UnknownRating(other)),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(into = "u8", try_from = "i64")]
pub enum State {
    Learning,
    Review,
    Relearning,
}

impl State {
    pub fn as_code(self) -> u8 {
        match self {
            State::Learning => 1,
            State::Review => 2,
            State::Relearning => 3,
        }
    }

    /// Learning and relearning cards walk a step table; review cards don't.
    pub fn has_steps(self) -> bool {
        !matches!(self, State::Review)
    }
}

impl From<State> for u8 {
    fn from(s: State) -> u8 {
        s.as_code()
    }
}

impl TryFrom<i64> for State {
    type Error = FsrsError;

    fn try_from(v: i64) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(State::Learning),
            2 => Ok(State::Review),
            3 => Ok(State::Relearning),
            other => Err(FsrsError::UnknownState(other)),
        }
    }
}

static LAST_CARD_ID: AtomicI64 = AtomicI64::new(0);

/// Epoch milliseconds of `now`, bumped past any id already handed out.
fn generate_card_id(now: DateTime<Utc>) -> CardId {
    let candidate = now.timestamp_millis();
    let previous = LAST_CARD_ID
        .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |last| {
            Some(candidate.max(last + 1))
        })
        .unwrap_or_else(|last| last);
    candidate.max(previous + 1)
}

/// Scheduling state of one memory item.
///
/// `step` is set exactly when the card is learning or relearning, and
/// `stability`/`difficulty` are both absent until the first review.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "CardRecord")]
pub struct Card {
    pub card_id: CardId,
    pub state: State,
    pub step: Option<u32>,
    pub stability: Option<f64>,
    pub difficulty: Option<f64>,
    #[serde(with = "timestamp")]
    pub due: DateTime<Utc>,
    #[serde(with = "timestamp::option")]
    pub last_review: Option<DateTime<Utc>>,
}

impl Card {
    /// New card due now, with an id derived from the current time.
    pub fn new() -> Self {
        Self::new_at(&SystemClock)
    }

    pub fn new_at<C: Clock + ?Sized>(clock: &C) -> Self {
        let now = clock.now();
        Self::with_id(generate_card_id(now), now)
    }

    pub fn with_id(card_id: CardId, due: DateTime<Utc>) -> Self {
        Self {
            card_id,
            state: State::Learning,
            step: Some(0),
            stability: None,
            difficulty: None,
            due,
            last_review: None,
        }
    }

    /// Builds a card from raw fields, rejecting combinations no review could produce.
    /// A learning card without a step starts at step 0.
    pub fn from_parts(
        card_id: CardId,
        state: State,
        step: Option<u32>,
        stability: Option<f64>,
        difficulty: Option<f64>,
        due: DateTime<Utc>,
        last_review: Option<DateTime<Utc>>,
    ) -> Result<Self, FsrsError> {
        let step = match (state, step) {
            (State::Learning, None) => Some(0),
            (_, step) => step,
        };
        let card = Self {
            card_id,
            state,
            step,
            stability,
            difficulty,
            due,
            last_review,
        };
        card.validate()?;
        Ok(card)
    }

    pub fn validate(&self) -> Result<(), FsrsError> {
        match (self.state.has_steps(), self.step) {
            (true, None) => return Err(FsrsError::InvalidCard("learning card without a step")),
            (false, Some(_)) => return Err(FsrsError::InvalidCard("review card with a step")),
            _ => {}
        }
        match (self.stability, self.difficulty) {
            (None, None) => {
                if self.state != State::Learning {
                    return Err(FsrsError::InvalidCard("reviewed card without a memory state"));
                }
            }
            (Some(s), Some(d)) => {
                if !s.is_finite() || s < STABILITY_MIN {
                    return Err(FsrsError::InvalidCard("stability below minimum"));
                }
                if !d.is_finite() || !(DIFFICULTY_MIN..=DIFFICULTY_MAX).contains(&d) {
                    return Err(FsrsError::InvalidCard("difficulty outside [1, 10]"));
                }
            }
            _ => {
                return Err(FsrsError::InvalidCard(
                    "stability and difficulty must be set together",
                ))
            }
        }
        Ok(())
    }

    pub fn is_new(&self) -> bool {
        self.stability.is_none() && self.difficulty.is_none()
    }
}

impl Default for Card {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
struct CardRecord {
    card_id: CardId,
    state: State,
    step: Option<u32>,
    stability: Option<f64>,
    difficulty: Option<f64>,
    #[serde(with = "timestamp")]
    due: DateTime<Utc>,
    #[serde(with = "timestamp::option")]
    last_review: Option<DateTime<Utc>>,
}

impl TryFrom<CardRecord> for Card {
    type Error = FsrsError;

    fn try_from(r: CardRecord) -> Result<Self, Self::Error> {
        Card::from_parts(
            r.card_id,
            r.state,
            r.step,
            r.stability,
            r.difficulty,
            r.due,
            r.last_review,
        )
    }
}

/// One past review of a card. Never mutated once created.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReviewLog {
    pub card_id: CardId,
    pub rating: Rating,
    #[serde(with = "timestamp")]
    pub review_datetime: DateTime<Utc>,
    pub review_duration: Option<u32>,
}

impl ReviewLog {
    pub fn new(
        card_id: CardId,
        rating: Rating,
        review_datetime: DateTime<Utc>,
        review_duration: Option<u32>,
    ) -> Self {
        Self {
            card_id,
            rating,
            review_datetime,
            review_duration,
        }
    }
}
