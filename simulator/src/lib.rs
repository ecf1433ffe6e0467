use common::{
    interfaces::Integrator,
    system::{PidGains, SuspensionParams, SuspensionState},
    to_f64, ConfigurationError, Float,
};

/// Semi-implicit (symplectic) Euler: the velocity is updated first and the new velocity moves
/// the body.
#[derive(Debug, Clone, Copy, Default)]
pub struct SemiImplicitEuler;

impl SemiImplicitEuler {
    /// The net vertical force on the body. Damping acts on the pre-step velocity.
    pub fn net_force<T: Float>(
        params: &SuspensionParams<T>,
        state: &SuspensionState<T>,
        road_height: T,
        control_force: T,
    ) -> T {
        let SuspensionParams {
            mass,
            spring_constant,
            damping_constant,
            gravity,
            spring_length,
        } = *params;

        let spring_extension = spring_length - (state.position - road_height);
        let spring = spring_constant * spring_extension;
        let weight = mass * gravity;
        let damping = damping_constant * state.velocity;

        spring - weight - damping + control_force
    }
}

impl<T: Float> Integrator<T> for SemiImplicitEuler {
    fn step(
        &self,
        params: &SuspensionParams<T>,
        state: SuspensionState<T>,
        road_height: T,
        control_force: T,
        dt: T,
    ) -> SuspensionState<T> {
        let acceleration = Self::net_force(params, &state, road_height, control_force) / params.mass;

        let velocity = state.velocity + acceleration * dt;
        let position = state.position + velocity * dt;

        SuspensionState {
            position,
            velocity,
            step: state.step + 1,
        }
    }
}

/// Checks that semi-implicit Euler with step `dt` is stable for the system.
///
/// For `m y'' = -k y - c y'` the step map has determinant `1 - beta` and trace
/// `2 - alpha - beta`, with `alpha = k dt^2 / m` and `beta = c dt / m`; it is stable iff
/// `beta < 2` and `alpha + 2 beta < 4`. With a controller the proportional and derivative gains
/// are added to the stiffness and damping. The integral gain is not taken into account.
pub fn check_stability<T: Float>(
    params: &SuspensionParams<T>,
    gains: Option<&PidGains<T>>,
    dt: T,
) -> Result<(), ConfigurationError> {
    let gains = gains.copied().unwrap_or_else(PidGains::zero);
    let stiffness = params.spring_constant + gains.kp;
    let damping = params.damping_constant + gains.kd;

    let alpha = to_f64(stiffness * dt * dt / params.mass);
    let beta = to_f64(damping * dt / params.mass);

    if beta < 2.0 && alpha + 2.0 * beta < 4.0 {
        Ok(())
    } else {
        Err(ConfigurationError::UnstableStep { alpha, beta })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> SuspensionParams<f64> {
        SuspensionParams {
            mass: 5.0,
            spring_constant: 50.0,
            damping_constant: 50.0,
            gravity: 10.0,
            spring_length: 10.0,
        }
    }

    #[test]
    fn step_updates_velocity_before_position() {
        let state = SuspensionState {
            position: 8.0,
            velocity: 1.0,
            step: 4,
        };
        let next = SemiImplicitEuler.step(&params(), state, 0.5, 2.0, 0.1);

        // F = 50 * (10 - 7.5) - 50 - 50 * 1 + 2 = 27, a = 5.4
        assert!((next.velocity - 1.54).abs() < 1e-12, "v = 1 + 5.4 * 0.1, got {}", next.velocity);
        assert!(
            (next.position - (8.0 + 1.54 * 0.1)).abs() < 1e-12,
            "position uses the updated velocity, got {}",
            next.position
        );
        assert_eq!(next.step, 5, "step index advances by one");
    }

    #[test]
    fn rest_state_is_a_fixed_point() {
        let params = params();
        let mut state = SuspensionState::at_rest(params.equilibrium_height(0.0));
        for _ in 0..100 {
            state = SemiImplicitEuler.step(&params, state, 0.0, 0.0, 0.005);
        }
        assert_eq!(state.position, 9.0, "zero net force keeps the body at rest");
        assert_eq!(state.velocity, 0.0, "no velocity builds up at rest");
    }

    #[test]
    fn stability_boundary() {
        assert!(
            check_stability(&params(), None, 0.005).is_ok(),
            "reference step is stable"
        );
        assert!(
            matches!(
                check_stability(&params(), None, 1.0),
                Err(ConfigurationError::UnstableStep { .. })
            ),
            "dt = 1 is far beyond the stable range of k = 50, m = 5"
        );

        let gains = PidGains {
            kp: 150.0,
            ki: 50.0,
            kd: 50.0,
        };
        assert!(
            check_stability(&params(), Some(&gains), 0.01).is_ok(),
            "the reference controller is stable at 10 ms"
        );
        assert!(
            check_stability(&params(), Some(&gains), 0.1).is_err(),
            "the controller's damping makes 100 ms unstable"
        );
    }

    #[test]
    fn unstable_step_diverges() {
        let params = params();
        let mut state = SuspensionState::at_rest(params.equilibrium_height(0.0));
        state.position += 0.1;
        for _ in 0..2000 {
            state = SemiImplicitEuler.step(&params, state, 0.0, 0.0, 1.0);
        }
        assert!(
            !state.position.is_finite() || state.position.abs() > 1e6,
            "dt = 1 should blow up, got {}",
            state.position
        );
    }
}
