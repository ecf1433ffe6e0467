#![forbid(
    missing_docs,
    clippy::missing_assert_message,
    clippy::missing_docs_in_private_items
)]
//! Controllers that drive the sprung mass towards its reference height.

use common::{interfaces::Controller, system::PidGains, Float};

/// The memory of a PID controller between two steps.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PidState<T: Float> {
    /// The running integral of the error.
    pub sum_error: T,
    /// The error of the previous step.
    pub prev_error: T,
}

/// A PID controller holding the body at a fixed target height.
///
/// The integral term is not clamped: long horizons or large `ki` can wind it up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidController<T: Float> {
    /// The controller gains.
    gains: PidGains<T>,
    /// The height the body is held at.
    target: T,
}

impl<T: Float> PidController<T> {
    /// Creates a controller holding the body at `target`.
    pub fn new(gains: PidGains<T>, target: T) -> Self {
        Self { gains, target }
    }

    /// The controller gains.
    pub fn gains(&self) -> &PidGains<T> {
        &self.gains
    }

    /// The height the body is held at.
    pub fn target(&self) -> T {
        self.target
    }
}

impl<T: Float> Controller<T> for PidController<T> {
    type State = PidState<T>;

    fn compute(&self, state: PidState<T>, position: T, dt: T) -> (PidState<T>, T) {
        let PidGains { kp, ki, kd } = self.gains;

        let error = self.target - position;
        let sum_error = state.sum_error + error * dt;
        let d_error = (error - state.prev_error) / dt;

        let force = kp * error + ki * sum_error + kd * d_error;

        (
            PidState {
                sum_error,
                prev_error: error,
            },
            force,
        )
    }
}

/// The passive suspension: no control force at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passive;

impl<T: Float> Controller<T> for Passive {
    type State = ();

    fn compute(&self, _state: (), _position: T, _dt: T) -> ((), T) {
        ((), T::zero())
    }
}
