use common::{
    interfaces::RoadGenerator,
    road::{ControlPoint, RoadProfile},
    time::TimeGrid,
    to_f64, ConfigurationError, Float, SuspensionError,
};
use itertools::Itertools;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub mod spline;

use spline::{CubicSpline, MIN_KNOTS};

/// How a random road is laid out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoadConfig<T: Float> {
    /// Number of control points the road is interpolated through, the first one at height zero.
    pub control_points: usize,
    /// Lower bound of the random control point heights.
    pub height_low: T,
    /// Upper bound of the random control point heights.
    pub height_high: T,
    /// Time covered by the control points. Defaults to the horizon of the time grid.
    pub horizon: Option<T>,
}

impl<T: Float> RoadConfig<T> {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.control_points < MIN_KNOTS {
            return Err(ConfigurationError::TooFewControlPoints {
                count: self.control_points,
            });
        }
        if !self.height_low.is_finite()
            || !self.height_high.is_finite()
            || self.height_low > self.height_high
            || !(self.height_high - self.height_low).is_finite()
        {
            return Err(ConfigurationError::InvalidHeightRange {
                low: to_f64(self.height_low),
                high: to_f64(self.height_high),
            });
        }
        if let Some(horizon) = self.horizon {
            if !(horizon > T::zero()) || !horizon.is_finite() {
                return Err(ConfigurationError::EmptyHorizon(to_f64(horizon)));
            }
        }

        Ok(())
    }
}

/// Generates a smooth random road: random control points joined by a cubic spline.
///
/// All randomness comes from the injected `rng`; fitting and sampling the spline are
/// deterministic.
pub struct SplineRoadGenerator<T: Float, R: Rng> {
    config: RoadConfig<T>,
    rng: R,
}

impl<T: Float, R: Rng> SplineRoadGenerator<T, R> {
    pub fn new(config: RoadConfig<T>, rng: R) -> Result<Self, ConfigurationError> {
        config.validate()?;

        Ok(Self { config, rng })
    }

    /// Draws the control points: evenly spaced in time, the first pinned to zero height.
    pub fn control_points(&mut self, horizon: T) -> Result<Vec<ControlPoint<T>>, ConfigurationError> {
        let RoadConfig {
            control_points,
            height_low,
            height_high,
            ..
        } = self.config;

        let times = TimeGrid::linspace(horizon, control_points)?;
        let rng = &mut self.rng;

        Ok(times
            .samples()
            .iter()
            .enumerate()
            .map(|(i, &time)| ControlPoint {
                time,
                height: if i == 0 {
                    T::zero()
                } else {
                    rng.gen_range(height_low..=height_high)
                },
            })
            .collect())
    }
}

impl<T: Float> SplineRoadGenerator<T, ChaCha8Rng> {
    /// A generator with a reproducible random source.
    pub fn from_seed(config: RoadConfig<T>, seed: u64) -> Result<Self, ConfigurationError> {
        Self::new(config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<T: Float, R: Rng> RoadGenerator<T> for SplineRoadGenerator<T, R> {
    fn generate(&mut self, grid: &TimeGrid<T>) -> Result<RoadProfile<T>, SuspensionError> {
        let horizon = self.config.horizon.unwrap_or_else(|| grid.horizon());
        let points = self.control_points(horizon)?;

        let (knots, values): (Vec<T>, Vec<T>) =
            points.iter().map(|p| (p.time, p.height)).unzip();
        let spline = CubicSpline::fit(&knots, &values)?;

        log::debug!(
            "fitted road through {} control points over {:?}: [{}]",
            points.len(),
            horizon,
            values.iter().map(|v| format!("{v:.3?}")).join(", ")
        );

        let heights = grid.samples().iter().map(|&t| spline.evaluate(t)).collect();

        Ok(RoadProfile::new(heights, points))
    }
}

/// A perfectly flat road at height zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatRoad;

impl<T: Float> RoadGenerator<T> for FlatRoad {
    fn generate(&mut self, grid: &TimeGrid<T>) -> Result<RoadProfile<T>, SuspensionError> {
        Ok(RoadProfile::flat(grid))
    }
}
