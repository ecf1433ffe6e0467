use thiserror::Error;

/// An invalid simulation configuration. Always detected before any time step is taken.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// The sprung mass must be strictly positive.
    #[error("mass must be positive, got {0}")]
    NonPositiveMass(f64),
    /// The spring constant must be strictly positive, the equilibrium height divides by it.
    #[error("spring constant must be positive, got {0}")]
    NonPositiveSpringConstant(f64),
    /// The damping constant must not be negative.
    #[error("damping constant must not be negative, got {0}")]
    NegativeDamping(f64),
    /// A parameter was NaN or infinite.
    #[error("parameter `{name}` must be finite")]
    NonFinite {
        /// The name of the offending parameter.
        name: &'static str,
    },
    /// The integration step must be strictly positive.
    #[error("time step must be positive, got {0}")]
    NonPositiveStep(f64),
    /// A time grid needs at least two samples to define a spacing.
    #[error("time grid needs at least 2 samples, got {0}")]
    TooFewSamples(usize),
    /// The time horizon (or road horizon) is empty.
    #[error("time horizon must be positive, got {0}")]
    EmptyHorizon(f64),
    /// The cubic road fit needs at least four control points.
    #[error("road profile needs at least 4 control points, got {count}")]
    TooFewControlPoints {
        /// The number of control points that was requested.
        count: usize,
    },
    /// Spline knots must be strictly increasing.
    #[error("spline knots must be strictly increasing")]
    UnorderedKnots,
    /// Every spline knot needs exactly one value.
    #[error("{knots} spline knots but {values} values")]
    LengthMismatch {
        /// The number of knots.
        knots: usize,
        /// The number of values.
        values: usize,
    },
    /// The road height range is inverted, not finite, or too wide to sample from.
    #[error("invalid road height range [{low}, {high}]")]
    InvalidHeightRange {
        /// Lower bound of the range.
        low: f64,
        /// Upper bound of the range.
        high: f64,
    },
    /// An explicit step disagrees with the spacing of the time grid.
    #[error("time step {dt} does not match the time grid spacing {spacing}")]
    StepMismatch {
        /// The explicitly configured step.
        dt: f64,
        /// The spacing derived from duration and sample count.
        spacing: f64,
    },
    /// The step is too large for the stiffness and damping of the system.
    #[error("time step is unstable for this system (alpha = {alpha}, beta = {beta})")]
    UnstableStep {
        /// `k dt^2 / m` using the effective stiffness.
        alpha: f64,
        /// `c dt / m` using the effective damping.
        beta: f64,
    },
    /// An active run was requested without controller gains.
    #[error("active control requested but no PID gains were configured")]
    MissingGains,
    /// The road profile does not have one height per time sample.
    #[error("road profile has {actual} samples but the time grid has {expected}")]
    ProfileLength {
        /// The number of time samples.
        expected: usize,
        /// The number of road samples.
        actual: usize,
    },
    /// A count could not be represented in the scalar type.
    #[error("value is not representable in the scalar type")]
    Unrepresentable,
}

/// The error type of the simulation crates.
#[derive(Debug, Error)]
pub enum SuspensionError {
    /// The configuration was rejected before simulation started.
    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigurationError),
    /// A finished run contains a non-finite position.
    #[error("simulation diverged at step {step}")]
    NumericDivergence {
        /// Index of the first non-finite sample.
        step: usize,
    },
    /// Writing the time series for the presenter failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
