use crate::{error::ConfigurationError, to_f64, Float};

/// The definition of the quarter-car system: a single sprung mass on a spring-damper whose lower
/// end follows the road.
///
/// The body obeys
/// $$ m \ddot{y} = k \left(L - (y - y_r)\right) - m g - c \dot{y} + F_c(t), $$
///
/// where $y$ is the height of the body, $y_r$ the height of the road, $L$ the rest length of the
/// spring, and $F_c$ the (optional) active control force.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuspensionParams<T: Float> {
    /// The sprung mass.
    pub mass: T,
    /// The stiffness of the spring.
    pub spring_constant: T,
    /// The viscous damping coefficient.
    pub damping_constant: T,
    /// The gravitational acceleration.
    pub gravity: T,
    /// The rest length of the spring.
    pub spring_length: T,
}

impl<T: Float> SuspensionParams<T> {
    /// The compression of the spring when the body is at rest.
    pub fn equilibrium_compression(&self) -> T {
        self.mass * self.gravity / self.spring_constant
    }

    /// The resting height of the body above a road at height `road_height`, where the spring force
    /// exactly balances gravity.
    pub fn equilibrium_height(&self, road_height: T) -> T {
        road_height + self.spring_length - self.equilibrium_compression()
    }

    /// Checks that the physical parameters describe a well-posed system.
    ///
    /// # Errors
    /// Returns the first [`ConfigurationError`] found.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (name, value) in [
            ("mass", self.mass),
            ("spring_constant", self.spring_constant),
            ("damping_constant", self.damping_constant),
            ("gravity", self.gravity),
            ("spring_length", self.spring_length),
        ] {
            if !value.is_finite() {
                return Err(ConfigurationError::NonFinite { name });
            }
        }

        if self.mass <= T::zero() {
            return Err(ConfigurationError::NonPositiveMass(to_f64(self.mass)));
        }
        if self.spring_constant <= T::zero() {
            return Err(ConfigurationError::NonPositiveSpringConstant(to_f64(
                self.spring_constant,
            )));
        }
        if self.damping_constant < T::zero() {
            return Err(ConfigurationError::NegativeDamping(to_f64(
                self.damping_constant,
            )));
        }

        Ok(())
    }
}

/// The gains of a PID controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidGains<T: Float> {
    /// The proportional gain.
    pub kp: T,
    /// The integral gain.
    pub ki: T,
    /// The derivative gain.
    pub kd: T,
}

impl<T: Float> PidGains<T> {
    /// Gains that never produce a control force.
    pub fn zero() -> Self {
        Self {
            kp: T::zero(),
            ki: T::zero(),
            kd: T::zero(),
        }
    }

    /// Checks that all gains are finite.
    ///
    /// # Errors
    /// Returns [`ConfigurationError::NonFinite`] naming the first non-finite gain.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (name, value) in [("kp", self.kp), ("ki", self.ki), ("kd", self.kd)] {
            if !value.is_finite() {
                return Err(ConfigurationError::NonFinite { name });
            }
        }

        Ok(())
    }
}

/// The mutable state of one simulated body. Owned by exactly one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuspensionState<T: Float> {
    /// The height of the body.
    pub position: T,
    /// The vertical velocity of the body.
    pub velocity: T,
    /// The index of the time sample this state belongs to.
    pub step: usize,
}

impl<T: Float> SuspensionState<T> {
    /// The state of a body resting at `height` at the first sample of the grid.
    pub fn at_rest(height: T) -> Self {
        Self {
            position: height,
            velocity: T::zero(),
            step: 0,
        }
    }
}
