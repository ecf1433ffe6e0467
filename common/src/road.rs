use crate::{time::TimeGrid, Float};

/// A road control point: a time and the road height at that time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPoint<T: Float> {
    /// The time of the control point.
    pub time: T,
    /// The height of the road at that time.
    pub height: T,
}

/// The road height under the wheel, sampled 1:1 with a [`TimeGrid`].
#[derive(Debug, Clone, PartialEq)]
pub struct RoadProfile<T: Float> {
    /// One height per grid sample.
    heights: Box<[T]>,
    /// The points the profile was interpolated through, if any.
    control_points: Vec<ControlPoint<T>>,
}

impl<T: Float> RoadProfile<T> {
    /// Creates a profile from heights already sampled on a grid.
    pub fn new(heights: Vec<T>, control_points: Vec<ControlPoint<T>>) -> Self {
        Self {
            heights: heights.into_boxed_slice(),
            control_points,
        }
    }

    /// A perfectly flat road at height zero over the whole grid.
    pub fn flat(grid: &TimeGrid<T>) -> Self {
        Self::new(vec![T::zero(); grid.len()], Vec::new())
    }

    /// The sampled heights.
    pub fn heights(&self) -> &[T] {
        &self.heights
    }

    /// The control points the profile was fitted through. Empty for synthetic profiles.
    pub fn control_points(&self) -> &[ControlPoint<T>] {
        &self.control_points
    }

    /// The number of samples.
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// Whether the profile has no samples.
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// The height at the first sample, which fixes the equilibrium height of the body.
    pub fn start_height(&self) -> T {
        self.heights.first().copied().unwrap_or_else(T::zero)
    }
}
