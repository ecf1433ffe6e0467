use common::{
    scalar,
    system::{PidGains, SuspensionParams},
    time::TimeGrid,
    ConfigurationError, Float,
};
use generator::RoadConfig;

/// Which bodies a simulation session runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Only the uncontrolled body.
    Passive,
    /// Only the PID-controlled body.
    Active,
    /// Both bodies over the same road.
    Compare,
}

impl RunMode {
    pub fn runs_passive(self) -> bool {
        matches!(self, RunMode::Passive | RunMode::Compare)
    }

    pub fn runs_active(self) -> bool {
        matches!(self, RunMode::Active | RunMode::Compare)
    }
}

/// How the time grid is laid out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeConfig<T: Float> {
    /// Total simulated time. When absent the grid is built from `dt`.
    pub duration: Option<T>,
    /// Number of samples, including `t = 0`.
    pub sample_count: usize,
    /// Explicit step. Must agree with the grid spacing when a duration is given too.
    pub dt: Option<T>,
}

impl<T: Float> TimeConfig<T> {
    pub fn grid(&self) -> Result<TimeGrid<T>, ConfigurationError> {
        match (self.duration, self.dt) {
            (Some(duration), dt) => TimeGrid::with_step(duration, self.sample_count, dt),
            (None, Some(dt)) => TimeGrid::from_step(dt, self.sample_count),
            (None, None) => Err(ConfigurationError::EmptyHorizon(0.0)),
        }
    }
}

/// The full, validated configuration of a simulation session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig<T: Float> {
    pub params: SuspensionParams<T>,
    pub gains: Option<PidGains<T>>,
    pub road: RoadConfig<T>,
    pub time: TimeConfig<T>,
    pub seed: u64,
    pub mode: RunMode,
}

impl<T: Float> SimulationConfig<T> {
    pub fn build() -> SimulationConfigBuilder<T> {
        SimulationConfigBuilder::default()
    }

    /// The grid spacing every run of this configuration integrates with.
    pub fn dt(&self) -> Result<T, ConfigurationError> {
        self.time.grid().map(|grid| grid.dt())
    }
}

/// Builder for [`SimulationConfig`]. Unset values fall back to the reference quarter car:
/// `m = 5`, `k = 50`, `c = 50`, `g = 10`, `L = 10`, 10 road control points in `[-2.5, 2.5]`, and
/// 1000 samples over 5 seconds.
#[derive(Debug, Clone)]
pub struct SimulationConfigBuilder<T: Float> {
    mass: Option<T>,
    spring_constant: Option<T>,
    damping_constant: Option<T>,
    gravity: Option<T>,
    spring_length: Option<T>,
    gains: Option<PidGains<T>>,
    control_points: Option<usize>,
    height_range: Option<(T, T)>,
    road_horizon: Option<T>,
    duration: Option<T>,
    sample_count: Option<usize>,
    dt: Option<T>,
    seed: Option<u64>,
    mode: Option<RunMode>,
    check_stability: bool,
}

impl<T: Float> Default for SimulationConfigBuilder<T> {
    fn default() -> Self {
        Self {
            mass: None,
            spring_constant: None,
            damping_constant: None,
            gravity: None,
            spring_length: None,
            gains: None,
            control_points: None,
            height_range: None,
            road_horizon: None,
            duration: None,
            sample_count: None,
            dt: None,
            seed: None,
            mode: None,
            check_stability: true,
        }
    }
}

impl<T: Float> SimulationConfigBuilder<T> {
    pub fn mass(mut self, mass: T) -> Self {
        self.mass.replace(mass);

        self
    }

    pub fn spring_constant(mut self, spring_constant: T) -> Self {
        self.spring_constant.replace(spring_constant);

        self
    }

    pub fn damping_constant(mut self, damping_constant: T) -> Self {
        self.damping_constant.replace(damping_constant);

        self
    }

    pub fn gravity(mut self, gravity: T) -> Self {
        self.gravity.replace(gravity);

        self
    }

    pub fn spring_length(mut self, spring_length: T) -> Self {
        self.spring_length.replace(spring_length);

        self
    }

    /// Enables active control with the given gains.
    pub fn pid(mut self, kp: T, ki: T, kd: T) -> Self {
        self.gains.replace(PidGains { kp, ki, kd });

        self
    }

    pub fn control_points(mut self, control_points: usize) -> Self {
        self.control_points.replace(control_points);

        self
    }

    pub fn height_range(mut self, low: T, high: T) -> Self {
        self.height_range.replace((low, high));

        self
    }

    pub fn road_horizon(mut self, horizon: T) -> Self {
        self.road_horizon.replace(horizon);

        self
    }

    pub fn duration(mut self, duration: T) -> Self {
        self.duration.replace(duration);

        self
    }

    pub fn sample_count(mut self, sample_count: usize) -> Self {
        self.sample_count.replace(sample_count);

        self
    }

    pub fn dt(mut self, dt: T) -> Self {
        self.dt.replace(dt);

        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed.replace(seed);

        self
    }

    /// Overrides the run mode. Defaults to [`RunMode::Compare`] when gains are set and
    /// [`RunMode::Passive`] otherwise.
    pub fn mode(mut self, mode: RunMode) -> Self {
        self.mode.replace(mode);

        self
    }

    /// Accepts step sizes the stability check would reject, so divergence can be observed.
    pub fn skip_stability_check(mut self) -> Self {
        self.check_stability = false;

        self
    }

    /// Fills in defaults and validates the whole configuration.
    pub fn finalize(self) -> Result<SimulationConfig<T>, ConfigurationError> {
        let params = SuspensionParams {
            mass: or_default(self.mass, 5.0)?,
            spring_constant: or_default(self.spring_constant, 50.0)?,
            damping_constant: or_default(self.damping_constant, 50.0)?,
            gravity: or_default(self.gravity, 10.0)?,
            spring_length: or_default(self.spring_length, 10.0)?,
        };
        params.validate()?;

        let mode = self.mode.unwrap_or(if self.gains.is_some() {
            RunMode::Compare
        } else {
            RunMode::Passive
        });
        if mode.runs_active() && self.gains.is_none() {
            return Err(ConfigurationError::MissingGains);
        }
        if let Some(gains) = &self.gains {
            gains.validate()?;
        }

        let (height_low, height_high) = match self.height_range {
            Some(range) => range,
            None => (scalar(-2.5)?, scalar(2.5)?),
        };
        let road = RoadConfig {
            control_points: self.control_points.unwrap_or(10),
            height_low,
            height_high,
            horizon: self.road_horizon,
        };
        road.validate()?;

        let duration = match (self.duration, self.dt) {
            (None, None) => Some(scalar(5.0)?),
            (duration, _) => duration,
        };
        let time = TimeConfig {
            duration,
            sample_count: self.sample_count.unwrap_or(1000),
            dt: self.dt,
        };
        let grid = time.grid()?;

        if self.check_stability {
            let gains = self.gains.as_ref().filter(|_| mode.runs_active());
            simulator::check_stability(&params, gains, grid.dt())?;
        }

        Ok(SimulationConfig {
            params,
            gains: self.gains,
            road,
            time,
            seed: self.seed.unwrap_or(0),
            mode,
        })
    }
}

/// Uses the configured value or converts the fallback literal.
fn or_default<T: Float>(value: Option<T>, fallback: f64) -> Result<T, ConfigurationError> {
    value.map_or_else(|| scalar(fallback), Ok)
}

/// The three reference scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// A PID-controlled body on a gentle road.
    Active,
    /// An uncontrolled body on a rough road.
    Passive,
    /// Both bodies on the rough road.
    Comparison,
}

impl Preset {
    pub fn builder<T: Float>(self) -> Result<SimulationConfigBuilder<T>, ConfigurationError> {
        let builder = SimulationConfig::build()
            .mass(scalar(5.0)?)
            .spring_constant(scalar(50.0)?)
            .damping_constant(scalar(50.0)?)
            .gravity(scalar(10.0)?)
            .duration(scalar(5.0)?)
            .sample_count(1000);

        Ok(match self {
            Preset::Active => builder
                .spring_length(scalar(10.0)?)
                .pid(scalar(150.0)?, scalar(50.0)?, scalar(50.0)?)
                .control_points(10)
                .height_range(scalar(-2.5)?, scalar(2.5)?)
                .mode(RunMode::Active),
            Preset::Passive => builder
                .spring_length(scalar(20.0)?)
                .control_points(100)
                .height_range(scalar(-10.0)?, scalar(10.0)?)
                .mode(RunMode::Passive),
            Preset::Comparison => builder
                .spring_length(scalar(20.0)?)
                .pid(scalar(150.0)?, scalar(50.0)?, scalar(50.0)?)
                .control_points(100)
                .height_range(scalar(-10.0)?, scalar(10.0)?)
                .mode(RunMode::Compare),
        })
    }

    pub fn config<T: Float>(self, seed: u64) -> Result<SimulationConfig<T>, ConfigurationError> {
        self.builder()?.seed(seed).finalize()
    }
}

impl std::str::FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Preset::Active),
            "passive" => Ok(Preset::Passive),
            "compare" | "comparison" => Ok(Preset::Comparison),
            other => Err(format!(
                "unknown preset `{other}`, expected one of: passive, active, compare"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_the_reference_quarter_car() {
        let config = SimulationConfig::<f64>::build().finalize().unwrap();
        assert_eq!(config.params.mass, 5.0, "default mass");
        assert_eq!(config.params.spring_length, 10.0, "default spring length");
        assert_eq!(config.mode, RunMode::Passive, "no gains means passive");
        assert_eq!(config.time.sample_count, 1000, "default sample count");
        assert!(
            (config.dt().unwrap() - 5.0 / 999.0).abs() < 1e-15,
            "dt is the grid spacing"
        );
    }

    #[test]
    fn setting_gains_switches_to_comparison() {
        let config = SimulationConfig::<f64>::build()
            .pid(1.0, 0.0, 0.0)
            .finalize()
            .unwrap();
        assert_eq!(config.mode, RunMode::Compare, "gains enable the active run");

        assert_eq!(
            SimulationConfig::<f64>::build()
                .mode(RunMode::Active)
                .finalize(),
            Err(ConfigurationError::MissingGains),
            "active mode needs gains"
        );
    }

    #[test]
    fn fails_fast_on_invalid_values() {
        assert_eq!(
            SimulationConfig::<f64>::build().mass(0.0).finalize(),
            Err(ConfigurationError::NonPositiveMass(0.0)),
            "zero mass"
        );
        assert_eq!(
            SimulationConfig::<f64>::build().control_points(2).finalize(),
            Err(ConfigurationError::TooFewControlPoints { count: 2 }),
            "two control points"
        );
        assert_eq!(
            SimulationConfig::<f64>::build().duration(0.0).finalize(),
            Err(ConfigurationError::EmptyHorizon(0.0)),
            "empty horizon"
        );
        assert_eq!(
            SimulationConfig::<f64>::build().dt(-1.0).finalize(),
            Err(ConfigurationError::NonPositiveStep(-1.0)),
            "negative step"
        );
        assert!(
            matches!(
                SimulationConfig::<f64>::build()
                    .duration(5.0)
                    .dt(0.01)
                    .finalize(),
                Err(ConfigurationError::StepMismatch { .. })
            ),
            "a step that disagrees with 5 s over 1000 samples"
        );
    }

    #[test]
    fn step_only_grids_take_their_horizon_from_dt() {
        let config = SimulationConfig::<f64>::build()
            .dt(0.005)
            .sample_count(1000)
            .finalize()
            .unwrap();
        assert_eq!(config.dt().unwrap(), 0.005, "explicit step is kept");
        assert_eq!(config.time.duration, None, "no duration was given");
    }

    #[test]
    fn large_steps_are_rejected_unless_explicitly_allowed() {
        let stiff = || {
            SimulationConfig::<f64>::build()
                .spring_constant(50.0)
                .dt(1.0)
                .sample_count(100)
        };
        assert!(
            matches!(
                stiff().finalize(),
                Err(ConfigurationError::UnstableStep { .. })
            ),
            "dt = 1 with k = 50 is unstable"
        );
        assert!(
            stiff().skip_stability_check().finalize().is_ok(),
            "the check can be skipped deliberately"
        );
    }

    #[test]
    fn presets_are_valid() {
        for preset in [Preset::Active, Preset::Passive, Preset::Comparison] {
            let config = preset.config::<f64>(7);
            assert!(config.is_ok(), "{preset:?} preset must validate: {config:?}");
        }
        assert_eq!(
            "compare".parse::<Preset>(),
            Ok(Preset::Comparison),
            "preset names parse"
        );
    }
}
