use std::ops::Index;

use crate::errors::ParameterViolation;
use crate::{
    FsrsError, DEFAULT_PARAMETERS, LOWER_BOUNDS_PARAMETERS, PARAMETER_COUNT,
    UPPER_BOUNDS_PARAMETERS,
};

/// The 21 FSRS-6 weights, each known to lie within its bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Parameters([f64; PARAMETER_COUNT]);

pub fn default_parameters() -> Parameters {
    Parameters::default()
}

impl Parameters {
    /// Validates length and per-index bounds, reporting every violation at once.
    pub fn new(values: &[f64]) -> Result<Self, FsrsError> {
        let weights: [f64; PARAMETER_COUNT] =
            values.try_into().map_err(|_| FsrsError::ParameterCount {
                expected: PARAMETER_COUNT,
                found: values.len(),
            })?;

        let violations: Vec<ParameterViolation> = weights
            .iter()
            .enumerate()
            .filter(|(i, w)| {
                !(LOWER_BOUNDS_PARAMETERS[*i]..=UPPER_BOUNDS_PARAMETERS[*i]).contains(*w)
            })
            .map(|(i, w)| ParameterViolation {
                index: i,
                value: *w,
                lower: LOWER_BOUNDS_PARAMETERS[i],
                upper: UPPER_BOUNDS_PARAMETERS[i],
            })
            .collect();
        if !violations.is_empty() {
            return Err(FsrsError::ParametersOutOfBounds(violations));
        }
        Ok(Self(weights))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.0.to_vec()
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Self(DEFAULT_PARAMETERS)
    }
}

impl Index<usize> for Parameters {
    type Output = f64;

    fn index(&self, i: usize) -> &f64 {
        &self.0[i]
    }
}

impl TryFrom<Vec<f64>> for Parameters {
    type Error = FsrsError;

    fn try_from(v: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(&v)
    }
}

/// Power-law forgetting curve derived from the decay weight `w[20]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForgettingCurve {
    pub decay: f64,
    pub factor: f64,
}

impl ForgettingCurve {
    pub fn from_parameters(w: &Parameters) -> Self {
        let decay = -w[20];
        let factor = 0.9_f64.powf(1.0 / decay) - 1.0;
        Self { decay, factor }
    }

    /// Recall probability after `elapsed_days` at the given stability.
    pub fn retrievability(&self, elapsed_days: f64, stability: f64) -> f64 {
        (1.0 + self.factor * elapsed_days / stability).powf(self.decay)
    }

    /// Days until retrievability falls to `desired_retention`, unrounded.
    pub fn interval(&self, stability: f64, desired_retention: f64) -> f64 {
        stability / self.factor * (desired_retention.powf(1.0 / self.decay) - 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let w = default_parameters();
        assert_eq!(w.len(), 21);
        assert_eq!(w[0], 0.212);
        assert_eq!(w[20], 0.1542);
    }

    #[test]
    fn wrong_length() {
        let err = Parameters::new(&[1.0; 19]).unwrap_err();
        assert!(matches!(
            err,
            FsrsError::ParameterCount {
                expected: 21,
                found: 19
            }
        ));
    }

    #[test]
    fn reports_every_out_of_bounds_index() {
        let mut v = DEFAULT_PARAMETERS.to_vec();
        v[4] = 11.0;
        v[7] = 0.9;
        v[20] = 0.05;
        let err = Parameters::new(&v).unwrap_err();
        assert_eq!(err.violating_indices(), vec![4, 7, 20]);
        let msg = err.to_string();
        assert!(msg.contains("parameters[4] = 11"));
        assert!(msg.contains("parameters[20] = 0.05"));
    }

    #[test]
    fn nan_is_out_of_bounds() {
        let mut v = DEFAULT_PARAMETERS.to_vec();
        v[10] = f64::NAN;
        assert_eq!(Parameters::new(&v).unwrap_err().violating_indices(), vec![10]);
    }

    #[test]
    fn interval_equals_stability_at_ninety_percent() {
        let curve = ForgettingCurve::from_parameters(&default_parameters());
        let i = curve.interval(5.0, 0.9);
        assert!((i - 5.0).abs() < 1e-9);
        assert!((curve.retrievability(5.0, 5.0) - 0.9).abs() < 1e-9);
        assert_eq!(curve.retrievability(0.0, 5.0), 1.0);
    }
}
