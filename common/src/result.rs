use itertools::Itertools;

use crate::{error::SuspensionError, scalar_from_count, Float};

/// The positions of one body over a whole run, one per time sample.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult<T: Float> {
    /// The height of the body at every sample of the grid.
    positions: Box<[T]>,
}

impl<T: Float> SimulationResult<T> {
    /// Wraps the finished positions of a run.
    pub fn new(positions: Vec<T>) -> Self {
        Self {
            positions: positions.into_boxed_slice(),
        }
    }

    /// The positions, aligned with the time grid of the run.
    pub fn positions(&self) -> &[T] {
        &self.positions
    }

    /// The number of positions.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the run produced no positions.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Pairs every position with its time sample.
    ///
    /// # Panics
    /// If `times` does not have one sample per position.
    pub fn series<'a>(&'a self, times: &'a [T]) -> impl Iterator<Item = (T, T)> + 'a {
        times.iter().copied().zip_eq(self.positions.iter().copied())
    }

    /// The index of the first non-finite position, if the run diverged.
    pub fn first_non_finite(&self) -> Option<usize> {
        self.positions.iter().position(|p| !p.is_finite())
    }

    /// Checks that every position is finite.
    ///
    /// # Errors
    /// Returns [`SuspensionError::NumericDivergence`] with the first non-finite step.
    pub fn check_finite(&self) -> Result<(), SuspensionError> {
        match self.first_non_finite() {
            Some(step) => Err(SuspensionError::NumericDivergence { step }),
            None => Ok(()),
        }
    }

    /// The population variance of `position - reference` over the run.
    ///
    /// Returns NaN for an empty run.
    pub fn variance_about(&self, reference: T) -> T {
        let Ok(count) = scalar_from_count::<T>(self.positions.len()) else {
            return T::nan();
        };
        if self.positions.is_empty() {
            return T::nan();
        }

        let deviations = self.positions.iter().map(|&p| p - reference);
        let mean = deviations.clone().fold(T::zero(), |a, b| a + b) / count;
        deviations
            .map(|d| (d - mean) * (d - mean))
            .fold(T::zero(), |a, b| a + b)
            / count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variance_is_taken_about_the_mean_deviation() {
        let result = SimulationResult::new(vec![1.0f64, 3.0, 1.0, 3.0]);
        assert_eq!(result.variance_about(2.0), 1.0, "deviations are -1, 1, -1, 1");
        assert_eq!(
            result.variance_about(100.0),
            1.0,
            "a constant offset does not change the variance"
        );
    }

    #[test]
    fn reports_first_divergent_step() {
        let result = SimulationResult::new(vec![1.0f64, 2.0, f64::INFINITY, f64::NAN]);
        assert_eq!(result.first_non_finite(), Some(2), "first infinite sample");
        assert!(
            matches!(
                result.check_finite(),
                Err(SuspensionError::NumericDivergence { step: 2 })
            ),
            "divergence is surfaced as an error"
        );
        assert!(
            SimulationResult::new(vec![0.0f64; 4]).check_finite().is_ok(),
            "finite run passes"
        );
    }
}
