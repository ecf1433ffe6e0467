use crate::{error::ConfigurationError, scalar_from_count, to_f64, Float};

/// The relative tolerance used when checking an explicit step against the grid spacing.
const STEP_TOLERANCE: f64 = 1e-9;

/// An ordered, uniformly spaced sequence of time samples.
///
/// The spacing of the grid is the integration step of every run over it: there is no separate
/// `dt` that could drift away from the samples.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid<T: Float> {
    /// The time samples, strictly increasing.
    samples: Box<[T]>,
    /// The constant spacing between consecutive samples.
    dt: T,
}

impl<T: Float> TimeGrid<T> {
    /// Creates `sample_count` evenly spaced samples covering `[0, duration]`, both ends included.
    ///
    /// # Errors
    /// Fails if `duration` is not positive and finite or if fewer than two samples are requested.
    pub fn linspace(duration: T, sample_count: usize) -> Result<Self, ConfigurationError> {
        if !duration.is_finite() {
            return Err(ConfigurationError::NonFinite { name: "duration" });
        }
        if duration <= T::zero() {
            return Err(ConfigurationError::EmptyHorizon(to_f64(duration)));
        }
        if sample_count < 2 {
            return Err(ConfigurationError::TooFewSamples(sample_count));
        }

        let dt = duration / scalar_from_count::<T>(sample_count - 1)?;
        let mut samples = (0..sample_count)
            .map(|i| scalar_from_count::<T>(i).map(|i| i * dt))
            .collect::<Result<Vec<_>, _>>()?;
        // Pin the last sample to the horizon instead of accumulating the rounding of `i * dt`.
        if let Some(last) = samples.last_mut() {
            *last = duration;
        }

        Ok(Self {
            samples: samples.into_boxed_slice(),
            dt,
        })
    }

    /// Creates `sample_count` samples `0, dt, 2 dt, ...`.
    ///
    /// # Errors
    /// Fails if `dt` is not positive and finite or if fewer than two samples are requested.
    pub fn from_step(dt: T, sample_count: usize) -> Result<Self, ConfigurationError> {
        if !dt.is_finite() {
            return Err(ConfigurationError::NonFinite { name: "dt" });
        }
        if dt <= T::zero() {
            return Err(ConfigurationError::NonPositiveStep(to_f64(dt)));
        }
        if sample_count < 2 {
            return Err(ConfigurationError::TooFewSamples(sample_count));
        }

        let samples = (0..sample_count)
            .map(|i| scalar_from_count::<T>(i).map(|i| i * dt))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            samples: samples.into_boxed_slice(),
            dt,
        })
    }

    /// Creates a grid over `[0, duration]` and checks that an explicitly requested step agrees
    /// with its spacing.
    ///
    /// # Errors
    /// Everything [`TimeGrid::linspace`] rejects, plus [`ConfigurationError::NonPositiveStep`] and
    /// [`ConfigurationError::StepMismatch`] for a bad explicit step.
    pub fn with_step(
        duration: T,
        sample_count: usize,
        dt: Option<T>,
    ) -> Result<Self, ConfigurationError> {
        let grid = Self::linspace(duration, sample_count)?;

        if let Some(dt) = dt {
            if !(dt > T::zero()) {
                return Err(ConfigurationError::NonPositiveStep(to_f64(dt)));
            }
            let (dt, spacing) = (to_f64(dt), to_f64(grid.dt));
            if (dt - spacing).abs() > STEP_TOLERANCE * spacing {
                return Err(ConfigurationError::StepMismatch { dt, spacing });
            }
        }

        Ok(grid)
    }

    /// The integration step, equal to the spacing of the samples.
    pub fn dt(&self) -> T {
        self.dt
    }

    /// The time samples.
    pub fn samples(&self) -> &[T] {
        &self.samples
    }

    /// The number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// A grid always has at least two samples, kept for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The time of the last sample.
    pub fn horizon(&self) -> T {
        self.samples.last().copied().unwrap_or_else(T::zero)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linspace_matches_the_requested_horizon() {
        let grid = TimeGrid::<f64>::linspace(5.0, 1000).unwrap();
        assert_eq!(grid.len(), 1000, "one sample per requested point");
        assert_eq!(grid.samples()[0], 0.0, "grid starts at zero");
        assert_eq!(grid.horizon(), 5.0, "grid ends at the horizon");
        assert!(
            (grid.dt() - 5.0 / 999.0).abs() < 1e-15,
            "spacing should be duration / (N - 1), got {}",
            grid.dt()
        );
        assert!(
            grid.samples().windows(2).all(|w| w[1] > w[0]),
            "samples must be strictly increasing"
        );
    }

    #[test]
    fn explicit_step_must_match_spacing() {
        let spacing = 5.0 / 999.0;
        assert!(
            TimeGrid::<f64>::with_step(5.0, 1000, Some(spacing)).is_ok(),
            "matching step is accepted"
        );

        match TimeGrid::<f64>::with_step(5.0, 1000, Some(0.01)) {
            Err(ConfigurationError::StepMismatch { dt, .. }) => {
                assert_eq!(dt, 0.01, "error reports the requested step")
            }
            other => panic!("expected a step mismatch, got {other:?}"),
        }
    }

    #[test]
    fn rejects_degenerate_grids() {
        assert_eq!(
            TimeGrid::<f64>::linspace(0.0, 10),
            Err(ConfigurationError::EmptyHorizon(0.0)),
            "empty horizon"
        );
        assert_eq!(
            TimeGrid::<f64>::linspace(1.0, 1),
            Err(ConfigurationError::TooFewSamples(1)),
            "a single sample has no spacing"
        );
        assert_eq!(
            TimeGrid::<f64>::from_step(-0.1, 10),
            Err(ConfigurationError::NonPositiveStep(-0.1)),
            "negative step"
        );
    }
}
