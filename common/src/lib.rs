#![forbid(
    missing_docs,
    clippy::missing_assert_message,
    clippy::missing_docs_in_private_items,
    clippy::missing_asserts_for_indexing,
    clippy::missing_panics_doc
)]
//! This crate defines the common types, systems, errors, and component interfaces for the
//! quarter-car suspension simulation.

/// Defines the interfaces accessible to the different components of the simulation:
/// - Road generator: Produces the road height under the wheel for every sample of the time grid.
/// - Integrator: Advances a single spring-damper body by one time step.
/// - Controller: Computes the (optional) active control force for the current step.
pub mod interfaces;

/// Defines the [`SuspensionError`](crate::error::SuspensionError) and
/// [`ConfigurationError`](crate::error::ConfigurationError) types.
pub mod error;

/// Contains the quarter-car system definition: the physical parameters, the controller gains and
/// the per-run body state.
pub mod system;

/// Defines the uniform [`TimeGrid<T>`](crate::time::TimeGrid) shared by every run of a session.
pub mod time;

/// Defines the [`RoadProfile<T>`](crate::road::RoadProfile) type sampled on a time grid.
pub mod road;

/// Defines the immutable [`SimulationResult<T>`](crate::result::SimulationResult) produced by a
/// single run.
pub mod result;

pub use error::{ConfigurationError, SuspensionError};

/// This trait defines the set of floats that have nice computer properties.
pub trait Float:
    num::Float
    + bytemuck::Pod
    + rand::distributions::uniform::SampleUniform
    + std::fmt::Debug
    + Send
    + Sync
    + Default
{
}

impl Float for f32 {}
impl Float for f64 {}

/// Converts a count into the scalar type.
///
/// # Errors
/// Returns [`ConfigurationError::Unrepresentable`] if the count does not fit in `T`.
pub fn scalar_from_count<T: Float>(count: usize) -> Result<T, ConfigurationError> {
    T::from(count).ok_or(ConfigurationError::Unrepresentable)
}

/// Converts a literal into the scalar type.
///
/// # Errors
/// Returns [`ConfigurationError::Unrepresentable`] if the value does not fit in `T`.
pub fn scalar<T: Float>(value: f64) -> Result<T, ConfigurationError> {
    T::from(value).ok_or(ConfigurationError::Unrepresentable)
}

/// Lossy conversion of a scalar into an `f64` for error reporting and statistics.
pub fn to_f64<T: Float>(value: T) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}
