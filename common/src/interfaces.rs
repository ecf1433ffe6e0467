use crate::{
    error::SuspensionError,
    road::RoadProfile,
    system::{SuspensionParams, SuspensionState},
    time::TimeGrid,
    Float,
};

/// The interface for a source of road profiles.
// ANCHOR: RoadGenerator
pub trait RoadGenerator<T: Float> {
    /// Produces the road height at every sample of the grid.
    fn generate(&mut self, grid: &TimeGrid<T>) -> Result<RoadProfile<T>, SuspensionError>;
}
// ANCHOR_END: RoadGenerator

/// The interface for advancing a single spring-damper body in time.
// ANCHOR: Integrator
pub trait Integrator<T: Float> {
    /// Advances `state` by `dt` over a road at height `road_height`, with an additional external
    /// `control_force` (zero for a passive body).
    fn step(
        &self,
        params: &SuspensionParams<T>,
        state: SuspensionState<T>,
        road_height: T,
        control_force: T,
        dt: T,
    ) -> SuspensionState<T>;
}
// ANCHOR_END: Integrator

/// The interface for a feedback controller acting on the body.
// ANCHOR: Controller
pub trait Controller<T: Float> {
    /// The memory the controller carries from one step to the next. A fresh run starts from
    /// [`Default::default`].
    type State: Copy + Default + Send;

    /// Computes the control force for a body at `position`, returning the updated controller
    /// memory alongside it.
    fn compute(&self, state: Self::State, position: T, dt: T) -> (Self::State, T);
}
// ANCHOR_END: Controller
