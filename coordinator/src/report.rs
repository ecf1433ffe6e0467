use std::io::Write;

use common::{
    result::SimulationResult, road::RoadProfile, time::TimeGrid, to_f64, Float, SuspensionError,
};
use itertools::Itertools;

use crate::{config::RunMode, runner::SimulationSession};

/// Label of the road series.
pub const ROAD_LABEL: &str = "Road";
/// Label of the reference height line.
pub const HEIGHT_LABEL: &str = "Height";
/// Label of the uncontrolled body.
pub const PASSIVE_LABEL: &str = "Passive Suspension";
/// Label of the controlled body.
pub const ACTIVE_LABEL: &str = "Active Suspension";

/// Vertical range of a chart showing only the controlled body.
pub const ACTIVE_Y_LIMITS: (f64, f64) = (-4.0, 15.0);

/// Which body of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    Passive,
    Active,
}

/// Axis and title hints for whatever renders the report.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotHints {
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    /// The x axis range, in milliseconds.
    pub x_limits: (f64, f64),
    /// Road range widened by 5 below and by the reference height above. Active-only charts use
    /// the fixed range [`ACTIVE_Y_LIMITS`].
    pub y_limits: (f64, f64),
}

impl PlotHints {
    pub fn new(mode: RunMode, horizon: f64, height_range: (f64, f64), initial_y: f64) -> Self {
        let title = match mode {
            RunMode::Passive => PASSIVE_LABEL,
            RunMode::Active => ACTIVE_LABEL,
            RunMode::Compare => "Comparison between Active and Passive Suspension",
        };

        Self {
            title,
            x_label: "Time (ms)",
            y_label: "Vertical Position (m)",
            x_limits: (0.0, horizon * 1000.0),
            y_limits: match mode {
                RunMode::Active => ACTIVE_Y_LIMITS,
                RunMode::Passive | RunMode::Compare => {
                    (height_range.0 - 5.0, height_range.1 + initial_y)
                }
            },
        }
    }
}

/// One line of the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Series<T: Float> {
    pub label: &'static str,
    pub points: Vec<(T, T)>,
}

/// Everything a presenter needs to draw a session: the shared grid and road, the reference
/// height and the result of every requested run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationReport<T: Float> {
    pub mode: RunMode,
    pub session: SimulationSession<T>,
    pub passive: Option<SimulationResult<T>>,
    pub active: Option<SimulationResult<T>>,
    pub hints: PlotHints,
}

impl<T: Float> SimulationReport<T> {
    pub fn grid(&self) -> &TimeGrid<T> {
        self.session.grid()
    }

    pub fn road(&self) -> &RoadProfile<T> {
        self.session.road()
    }

    pub fn initial_y(&self) -> T {
        self.session.initial_y()
    }

    pub fn result(&self, kind: RunKind) -> Option<&SimulationResult<T>> {
        match kind {
            RunKind::Passive => self.passive.as_ref(),
            RunKind::Active => self.active.as_ref(),
        }
    }

    /// Variance of `position - initial_y` for one run; lower means the body held its height
    /// better.
    pub fn tracking_variance(&self, kind: RunKind) -> Option<T> {
        self.result(kind)
            .map(|result| result.variance_about(self.initial_y()))
    }

    /// Checks every run for non-finite positions.
    pub fn check_finite(&self) -> Result<(), SuspensionError> {
        self.passive
            .iter()
            .chain(self.active.iter())
            .try_for_each(SimulationResult::check_finite)
    }

    /// The chart lines: the road, the reference height, then each run.
    pub fn series(&self) -> Vec<Series<T>> {
        let times = self.grid().samples();
        let mut series = vec![
            Series {
                label: ROAD_LABEL,
                points: times
                    .iter()
                    .copied()
                    .zip_eq(self.road().heights().iter().copied())
                    .collect(),
            },
            Series {
                label: HEIGHT_LABEL,
                points: times.iter().map(|&t| (t, self.initial_y())).collect(),
            },
        ];

        for (label, result) in [
            (PASSIVE_LABEL, &self.passive),
            (ACTIVE_LABEL, &self.active),
        ] {
            if let Some(result) = result {
                series.push(Series {
                    label,
                    points: result.series(times).collect(),
                });
            }
        }

        series
    }

    /// Writes the session as CSV: `time_s,road,height` followed by a column per run.
    pub fn write_csv<W: Write>(&self, mut writer: W) -> Result<(), SuspensionError> {
        let runs = [("passive", &self.passive), ("active", &self.active)]
            .into_iter()
            .filter_map(|(name, run)| run.as_ref().map(|run| (name, run.positions())))
            .collect_vec();

        writeln!(
            writer,
            "time_s,road,height{}",
            runs.iter().map(|(name, _)| format!(",{name}")).join("")
        )?;

        let initial_y = to_f64(self.initial_y());
        for (i, (&t, &road)) in self
            .grid()
            .samples()
            .iter()
            .zip(self.road().heights())
            .enumerate()
        {
            write!(writer, "{:?},{:?},{:?}", to_f64(t), to_f64(road), initial_y)?;
            for (_, positions) in &runs {
                write!(writer, ",{:?}", to_f64(positions[i]))?;
            }
            writeln!(writer)?;
        }

        writer.flush()?;

        Ok(())
    }
}
