use common::{
    interfaces::{Controller, Integrator},
    result::SimulationResult,
    road::RoadProfile,
    system::{SuspensionParams, SuspensionState},
    time::TimeGrid,
    ConfigurationError, Float, SuspensionError,
};
use driver::{Passive, PidController};

/// The time grid, road and reference height shared read-only by every run of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSession<T: Float> {
    grid: TimeGrid<T>,
    road: RoadProfile<T>,
    initial_y: T,
}

impl<T: Float> SimulationSession<T> {
    /// Pairs a grid with a road sampled on it and computes the equilibrium height above the
    /// start of the road.
    pub fn new(
        params: &SuspensionParams<T>,
        grid: TimeGrid<T>,
        road: RoadProfile<T>,
    ) -> Result<Self, SuspensionError> {
        if road.len() != grid.len() {
            return Err(ConfigurationError::ProfileLength {
                expected: grid.len(),
                actual: road.len(),
            }
            .into());
        }
        let initial_y = params.equilibrium_height(road.start_height());

        log::debug!(
            "session: {} samples, dt = {:?}, initial height {:?}",
            grid.len(),
            grid.dt(),
            initial_y
        );

        Ok(Self {
            grid,
            road,
            initial_y,
        })
    }

    pub fn grid(&self) -> &TimeGrid<T> {
        &self.grid
    }

    pub fn road(&self) -> &RoadProfile<T> {
        &self.road
    }

    /// The resting height of the body, which is also the target of the active controller.
    pub fn initial_y(&self) -> T {
        self.initial_y
    }
}

/// Where a run is in its single pass over the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Only the resting state has been recorded.
    NotStarted,
    /// The last computed sample.
    Running(usize),
    /// Every sample of the grid has been computed.
    Completed,
}

/// One body stepping over a session. Step `i` only depends on the state after step `i - 1`.
pub struct Run<'s, T: Float, I, C: Controller<T>> {
    session: &'s SimulationSession<T>,
    params: &'s SuspensionParams<T>,
    integrator: &'s I,
    controller: &'s C,
    body: SuspensionState<T>,
    memory: C::State,
    positions: Vec<T>,
    phase: RunPhase,
}

impl<'s, T: Float, I: Integrator<T>, C: Controller<T>> Run<'s, T, I, C> {
    pub fn new(
        session: &'s SimulationSession<T>,
        params: &'s SuspensionParams<T>,
        integrator: &'s I,
        controller: &'s C,
    ) -> Self {
        let body = SuspensionState::at_rest(session.initial_y);
        let mut positions = Vec::with_capacity(session.grid.len());
        positions.push(body.position);

        Self {
            session,
            params,
            integrator,
            controller,
            body,
            memory: C::State::default(),
            positions,
            phase: RunPhase::NotStarted,
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// The state of the body after the last computed sample.
    pub fn body(&self) -> &SuspensionState<T> {
        &self.body
    }

    /// Computes the next sample. Does nothing once the run is completed.
    pub fn advance(&mut self) -> RunPhase {
        let samples = self.session.grid.len();
        let i = self.body.step + 1;
        if self.phase == RunPhase::Completed || i >= samples {
            self.phase = RunPhase::Completed;
            return self.phase;
        }

        let dt = self.session.grid.dt();
        let road_height = self.session.road.heights()[i];

        let (memory, control_force) = self.controller.compute(self.memory, self.body.position, dt);
        self.memory = memory;
        self.body = self
            .integrator
            .step(self.params, self.body, road_height, control_force, dt);
        self.positions.push(self.body.position);

        self.phase = if i + 1 == samples {
            RunPhase::Completed
        } else {
            RunPhase::Running(i)
        };
        self.phase
    }

    /// Runs the remaining samples and hands over the positions.
    pub fn finish(mut self) -> SimulationResult<T> {
        while self.advance() != RunPhase::Completed {}

        let result = SimulationResult::new(self.positions);
        log::debug!("run completed after {} samples", result.len());
        if let Some(step) = result.first_non_finite() {
            log::warn!("run diverged: first non-finite position at step {step}");
        }

        result
    }
}

/// Runs bodies with fixed physical parameters over a shared session.
#[derive(Debug, Clone, Copy)]
pub struct SimulationRunner<T: Float, I> {
    params: SuspensionParams<T>,
    integrator: I,
}

impl<T: Float, I: Integrator<T>> SimulationRunner<T, I> {
    pub fn new(params: SuspensionParams<T>, integrator: I) -> Self {
        Self { params, integrator }
    }

    pub fn params(&self) -> &SuspensionParams<T> {
        &self.params
    }

    /// Starts a run without stepping it.
    pub fn start<'s, C: Controller<T>>(
        &'s self,
        session: &'s SimulationSession<T>,
        controller: &'s C,
    ) -> Run<'s, T, I, C> {
        Run::new(session, &self.params, &self.integrator, controller)
    }

    /// Runs one body with `controller` over the whole session.
    pub fn run<C: Controller<T>>(
        &self,
        session: &SimulationSession<T>,
        controller: &C,
    ) -> SimulationResult<T> {
        self.start(session, controller).finish()
    }

    /// Runs the passive and the PID-controlled body over the same session in parallel. Each run
    /// owns its own state, so the results equal two sequential runs.
    pub fn compare(
        &self,
        session: &SimulationSession<T>,
        pid: &PidController<T>,
    ) -> (SimulationResult<T>, SimulationResult<T>)
    where
        I: Sync,
    {
        rayon::join(|| self.run(session, &Passive), || self.run(session, pid))
    }
}

#[cfg(test)]
mod tests {
    use common::system::PidGains;
    use simulator::SemiImplicitEuler;

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

    fn ramp_session(samples: usize) -> SimulationSession<f64> {
        let grid = TimeGrid::linspace(1.0, samples).unwrap();
        let heights = grid.samples().iter().map(|t| 0.5 * t).collect();
        SimulationSession::new(&params(), grid, RoadProfile::new(heights, Vec::new())).unwrap()
    }

    #[test]
    fn run_walks_through_every_phase() {
        let session = ramp_session(4);
        let runner = SimulationRunner::new(params(), SemiImplicitEuler);
        let mut run = runner.start(&session, &Passive);

        assert_eq!(run.phase(), RunPhase::NotStarted, "nothing stepped yet");
        assert_eq!(run.advance(), RunPhase::Running(1), "first step");
        assert_eq!(run.advance(), RunPhase::Running(2), "second step");
        assert_eq!(run.advance(), RunPhase::Completed, "last sample");
        assert_eq!(run.advance(), RunPhase::Completed, "stays completed");
        assert_eq!(run.body().step, 3, "one state per sample");
        assert_eq!(run.finish().len(), 4, "one position per sample");
    }

    #[test]
    fn parallel_comparison_matches_sequential_runs() {
        let session = ramp_session(300);
        let runner = SimulationRunner::new(params(), SemiImplicitEuler);
        let pid = PidController::new(
            PidGains {
                kp: 150.0,
                ki: 50.0,
                kd: 50.0,
            },
            session.initial_y(),
        );

        let (passive, active) = runner.compare(&session, &pid);
        assert_eq!(passive, runner.run(&session, &Passive), "passive run is unaffected");
        assert_eq!(active, runner.run(&session, &pid), "active run is unaffected");
        assert_ne!(passive, active, "the controller changes the trajectory");
    }

    #[test]
    fn rejects_mismatched_road() {
        let grid = TimeGrid::linspace(1.0, 10).unwrap();
        let road = RoadProfile::new(vec![0.0; 9], Vec::new());
        assert!(
            matches!(
                SimulationSession::new(&params(), grid, road),
                Err(SuspensionError::Configuration(
                    ConfigurationError::ProfileLength {
                        expected: 10,
                        actual: 9
                    }
                ))
            ),
            "road must be sampled on the grid"
        );
    }
}
