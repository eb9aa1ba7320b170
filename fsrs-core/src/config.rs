use serde::{Deserialize, Serialize};

use crate::{
    FsrsError, DEFAULT_DESIRED_RETENTION, DEFAULT_LEARNING_STEPS, DEFAULT_MAXIMUM_INTERVAL,
    DEFAULT_PARAMETERS, DEFAULT_RELEARNING_STEPS,
};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StepUnit {
    Seconds,
    Minutes,
}

/// One entry of a learning or relearning step table.
///
/// Either a raw number of seconds or a `{ "unit": ..., "value": ... }` pair.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Step {
    Raw(i64),
    Timed { unit: StepUnit, value: f64 },
}

impl Step {
    pub fn seconds(value: f64) -> Self {
        Step::Timed {
            unit: StepUnit::Seconds,
            value,
        }
    }

    pub fn minutes(value: f64) -> Self {
        Step::Timed {
            unit: StepUnit::Minutes,
            value,
        }
    }

    /// Whole seconds, truncated.
    pub fn to_seconds(self) -> Result<u32, FsrsError> {
        let secs = match self {
            Step::Raw(n) => n as f64,
            Step::Timed { unit, value } => match unit {
                StepUnit::Seconds => value,
                StepUnit::Minutes => value * 60.0,
            },
        };
        if !secs.is_finite() || secs < 0.0 || secs >= f64::from(u32::MAX) {
            return Err(FsrsError::InvalidStep(format!("{self:?}")));
        }
        Ok(secs.trunc() as u32)
    }
}

impl From<u32> for Step {
    fn from(secs: u32) -> Self {
        Step::Raw(i64::from(secs))
    }
}

/// Scheduler settings, laid out exactly as the scheduler record.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SchedulerConfig {
    pub parameters: Vec<f64>,
    pub desired_retention: f64,
    pub learning_steps: Vec<Step>,
    pub relearning_steps: Vec<Step>,
    pub maximum_interval: u32,
    pub enable_fuzzing: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            parameters: DEFAULT_PARAMETERS.to_vec(),
            desired_retention: DEFAULT_DESIRED_RETENTION,
            learning_steps: DEFAULT_LEARNING_STEPS.iter().copied().map(Step::from).collect(),
            relearning_steps: DEFAULT_RELEARNING_STEPS
                .iter()
                .copied()
                .map(Step::from)
                .collect(),
            maximum_interval: DEFAULT_MAXIMUM_INTERVAL,
            enable_fuzzing: true,
        }
    }
}

impl SchedulerConfig {
    pub fn with_parameters(mut self, parameters: impl Into<Vec<f64>>) -> Self {
        self.parameters = parameters.into();
        self
    }

    pub fn with_desired_retention(mut self, desired_retention: f64) -> Self {
        self.desired_retention = desired_retention;
        self
    }

    pub fn with_learning_steps<S: Into<Step>>(mut self, steps: impl IntoIterator<Item = S>) -> Self {
        self.learning_steps = steps.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_relearning_steps<S: Into<Step>>(
        mut self,
        steps: impl IntoIterator<Item = S>,
    ) -> Self {
        self.relearning_steps = steps.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_maximum_interval(mut self, maximum_interval: u32) -> Self {
        self.maximum_interval = maximum_interval;
        self
    }

    pub fn with_fuzzing(mut self, enable_fuzzing: bool) -> Self {
        self.enable_fuzzing = enable_fuzzing;
        self
    }
}

pub(crate) fn step_table(steps: &[Step]) -> Result<Vec<u32>, FsrsError> {
    steps.iter().map(|s| s.to_seconds()).collect()
}
