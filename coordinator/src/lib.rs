use common::{
    interfaces::RoadGenerator, system::PidGains, to_f64, ConfigurationError, Float,
    SuspensionError,
};
use driver::{Passive, PidController};
use generator::SplineRoadGenerator;
use simulator::SemiImplicitEuler;

pub mod config;
pub mod report;
pub mod runner;

pub use config::{Preset, RunMode, SimulationConfig, SimulationConfigBuilder, TimeConfig};
pub use report::{PlotHints, RunKind, Series, SimulationReport};
pub use runner::{Run, RunPhase, SimulationRunner, SimulationSession};

/// Runs a configuration over a seeded random road.
pub fn simulate<T: Float>(
    config: &SimulationConfig<T>,
) -> Result<SimulationReport<T>, SuspensionError> {
    let mut road = SplineRoadGenerator::from_seed(config.road, config.seed)?;
    simulate_on(config, &mut road)
}

/// Runs a configuration over the road produced by `road`.
///
/// The configuration is validated again since its fields may have been edited after
/// [`SimulationConfigBuilder::finalize`]. The stability check is not repeated.
pub fn simulate_on<T: Float, R: RoadGenerator<T>>(
    config: &SimulationConfig<T>,
    road: &mut R,
) -> Result<SimulationReport<T>, SuspensionError> {
    config.params.validate()?;
    config.gains.as_ref().map(PidGains::validate).transpose()?;
    config.road.validate()?;

    let grid = config.time.grid()?;
    let profile = road.generate(&grid)?;
    let session = SimulationSession::new(&config.params, grid, profile)?;
    let runner = SimulationRunner::new(config.params, SemiImplicitEuler);

    let pid = match (config.mode.runs_active(), config.gains) {
        (true, Some(gains)) => Some(PidController::new(gains, session.initial_y())),
        (true, None) => return Err(ConfigurationError::MissingGains.into()),
        (false, _) => None,
    };

    log::debug!("running {:?} session with seed {}", config.mode, config.seed);
    let (passive, active) = match (config.mode, pid) {
        (RunMode::Compare, Some(pid)) => {
            let (passive, active) = runner.compare(&session, &pid);
            (Some(passive), Some(active))
        }
        (_, pid) => (
            config
                .mode
                .runs_passive()
                .then(|| runner.run(&session, &Passive)),
            pid.map(|pid| runner.run(&session, &pid)),
        ),
    };

    let hints = PlotHints::new(
        config.mode,
        to_f64(session.grid().horizon()),
        (to_f64(config.road.height_low), to_f64(config.road.height_high)),
        to_f64(session.initial_y()),
    );

    Ok(SimulationReport {
        mode: config.mode,
        session,
        passive,
        active,
        hints,
    })
}
