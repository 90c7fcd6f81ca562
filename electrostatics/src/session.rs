//! A session holds the named systems of a command file and runs its commands in order.
//!
//! Boundary commands draw onto the current system, the one most recently created with `new`.
//! Solve commands read a system by name and store the result under a second name, which the
//! save and plot commands then refer to. Reusing a name replaces what was stored under it.

use crate::app::Configuration;
use crate::output::{self, PlotScript};
use crate::script::{Command, Script, Statement};
use crate::ElectrostaticsError;
use electrostatics_fdm::{analytical, relax, solve_linear_system, Method, PotentialField, UnsolvedSystem};
use nalgebra::RealField;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// The interpreter state of one command file
///
/// ```
/// # use electrostatics::app::{
/// #     Configuration, LinearConfiguration, OutputConfiguration, RelaxationConfiguration,
/// # };
/// # use electrostatics::{script::Script, session::Session};
/// let configuration = Configuration {
///     relaxation: RelaxationConfiguration {
///         maximum_iterations: 1000,
///         tolerance: None,
///         time_budget_seconds: None,
///     },
///     linear: LinearConfiguration {
///         method: "sparselu".into(),
///         tolerance: 1e-10,
///         maximum_iterations: 1000,
///     },
///     output: OutputConfiguration {
///         directory: std::env::temp_dir(),
///     },
/// };
/// let script = Script::parse("new plates 0 4 0 2\nleft 1\nright 0\nsolve plates solved")?;
/// let mut session = Session::new(&configuration)?;
/// session.execute(&script)?;
///
/// // Between two plates the potential falls linearly
/// let midpoint = session.solution("solved")?.get(2, 1)?;
/// assert!((midpoint - 0.5).abs() < 1e-12);
/// # Ok::<(), electrostatics::ElectrostaticsError>(())
/// ```
pub struct Session<'a, T: Copy + RealField> {
    configuration: &'a Configuration<T>,
    method: Method,
    directory: PathBuf,
    systems: HashMap<String, UnsolvedSystem<T>>,
    solutions: HashMap<String, PotentialField<T>>,
    current: Option<String>,
    timers: HashMap<String, Instant>,
    timings: Vec<(String, Duration)>,
    plot: Option<PlotScript<BufWriter<File>>>,
}

impl<'a, T: Copy + RealField> Session<'a, T> {
    /// A session writing into the configured output directory
    pub fn new(configuration: &'a Configuration<T>) -> Result<Self, ElectrostaticsError> {
        Ok(Self {
            configuration,
            method: configuration.method()?,
            directory: configuration.output.directory.clone(),
            systems: HashMap::new(),
            solutions: HashMap::new(),
            current: None,
            timers: HashMap::new(),
            timings: Vec::new(),
            plot: None,
        })
    }

    /// Run every statement of `script`, stopping at the first failure
    ///
    /// Errors are tagged with the line of the statement which raised them. The plot script, if
    /// one was opened, is flushed once every statement has run.
    pub fn execute(&mut self, script: &Script) -> Result<(), ElectrostaticsError> {
        for Statement { line, command } in script.statements() {
            tracing::debug!("line {}: {:?}", line, command);
            self.apply(command)
                .map_err(|source| ElectrostaticsError::Command {
                    line: *line,
                    source: Box::new(source),
                })?;
        }
        if let Some(plot) = self.plot.take() {
            plot.finish()?;
        }
        Ok(())
    }

    /// Run a single command
    pub fn apply(&mut self, command: &Command) -> Result<(), ElectrostaticsError> {
        match command {
            Command::New { name, extent } => {
                tracing::info!("New system {} over {}", name, extent);
                self.systems.insert(name.clone(), UnsolvedSystem::new(*extent));
                self.current = Some(name.clone());
            }
            Command::Analytical1 {
                name,
                extent,
                radius_a,
                radius_b,
                potential_a,
                potential_b,
            } => {
                let solution = analytical::coaxial_cylinders_field(
                    *extent,
                    *radius_a,
                    *radius_b,
                    *potential_a,
                    *potential_b,
                );
                self.solutions.insert(name.clone(), solution);
            }
            Command::Analytical2 {
                name,
                extent,
                left,
                right,
                cylinder_radius,
            } => {
                let solution =
                    analytical::cylinder_between_plates_field(*extent, *left, *right, *cylinder_radius);
                self.solutions.insert(name.clone(), solution);
            }
            Command::Point { position, value } => {
                let value = convert(*value);
                self.current_system()?
                    .set_boundary_point(position.i, position.j, value)?;
            }
            Command::Ring {
                centre,
                radius,
                value,
            } => {
                let value = convert(*value);
                self.current_system()?
                    .set_boundary_ring(*centre, *radius, value);
            }
            Command::Circle {
                centre,
                radius,
                value,
            } => {
                let value = convert(*value);
                self.current_system()?
                    .set_boundary_circle(*centre, *radius, value);
            }
            Command::Line { start, end, value } => {
                let value = convert(*value);
                self.current_system()?.set_boundary_line(*start, *end, value)?;
            }
            Command::Rectangle { a, b, value } => {
                let value = convert(*value);
                self.current_system()?.set_boundary_rectangle(*a, *b, value)?;
            }
            Command::Edge { edge, value } => {
                let value = convert(*value);
                self.current_system()?.set_boundary_edge(*edge, value);
            }
            Command::Solve {
                method,
                unsolved,
                solved,
            } => {
                let method = method.unwrap_or(self.method);
                let system = self.system(unsolved)?;
                let solution =
                    solve_linear_system(system, method, &self.configuration.linear_settings())?;
                self.solutions.insert(solved.clone(), solution);
            }
            Command::SolveIterative {
                unsolved,
                solved,
                iterations,
            } => {
                let system = self.system(unsolved)?;
                let settings = self.configuration.relaxation_settings(*iterations);
                let (solution, report) = relax(system, &settings);
                tracing::info!(
                    "Relaxed {} for {} iterations, stopped by {:?} with largest update {}",
                    unsolved,
                    report.iterations,
                    report.stop_reason,
                    report.max_update
                );
                self.solutions.insert(solved.clone(), solution);
            }
            Command::SaveSolution { name } => {
                output::save_matrix(&self.path(name), self.solution(name)?)?;
            }
            Command::SaveTuples { name } => {
                let path = self.path(&format!("{name}tuples"));
                output::save_tuples(&path, self.solution(name)?)?;
            }
            Command::SaveComparison { a, b, output: file } => {
                let difference = self.solution(a)?.compare_to(self.solution(b)?)?;
                output::save_matrix(&self.path(file), &difference)?;
            }
            Command::SaveField { name } => {
                let path = self.path(&format!("{name}field"));
                let solution = self
                    .solutions
                    .get_mut(name)
                    .ok_or_else(|| ElectrostaticsError::UnknownSolution(name.clone()))?;
                output::save_field(&path, solution.electric_field())?;
            }
            Command::StartTimer { name } => {
                self.timers.insert(name.clone(), Instant::now());
            }
            Command::StopTimer { name } => {
                let start = self
                    .timers
                    .remove(name)
                    .ok_or_else(|| ElectrostaticsError::UnknownTimer(name.clone()))?;
                let elapsed = start.elapsed();
                tracing::info!("CPU time elapsed for {}: {}s", name, elapsed.as_secs_f64());
                self.timings.push((name.clone(), elapsed));
            }
            Command::PlotFile {
                file,
                x_min,
                x_max,
                y_min,
                y_max,
            } => {
                if let Some(previous) = self.plot.take() {
                    previous.finish()?;
                }
                let writer = BufWriter::new(File::create(self.path(file))?);
                self.plot = Some(PlotScript::new(writer, *x_min, *x_max, *y_min, *y_max)?);
            }
            Command::Plot { name } => self.plot_script()?.plot(name)?,
            Command::FieldPlot { name, spacing } => self.plot_script()?.field_plot(name, *spacing)?,
            Command::ContourPlot { name } => self.plot_script()?.contour_plot(name)?,
        }
        Ok(())
    }

    /// The system created by the most recent `new`
    fn current_system(&mut self) -> Result<&mut UnsolvedSystem<T>, ElectrostaticsError> {
        let name = self
            .current
            .as_ref()
            .ok_or(ElectrostaticsError::NoCurrentSystem)?;
        self.systems
            .get_mut(name)
            .ok_or_else(|| ElectrostaticsError::UnknownSystem(name.clone()))
    }

    /// The unsolved system created by `new NAME`
    pub fn system(&self, name: &str) -> Result<&UnsolvedSystem<T>, ElectrostaticsError> {
        self.systems
            .get(name)
            .ok_or_else(|| ElectrostaticsError::UnknownSystem(name.to_string()))
    }

    /// The potential stored by a solve or analytical command under `name`
    pub fn solution(&self, name: &str) -> Result<&PotentialField<T>, ElectrostaticsError> {
        self.solutions
            .get(name)
            .ok_or_else(|| ElectrostaticsError::UnknownSolution(name.to_string()))
    }

    /// Names of the solved systems, sorted
    pub fn solution_names(&self) -> Vec<&str> {
        let mut names = self.solutions.keys().map(String::as_str).collect::<Vec<_>>();
        names.sort_unstable();
        names
    }

    /// Every timer stopped so far, in the order they stopped
    pub fn timings(&self) -> &[(String, Duration)] {
        &self.timings
    }

    /// Where output files are written
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn path(&self, file: &str) -> PathBuf {
        self.directory.join(file)
    }

    fn plot_script(&mut self) -> Result<&mut PlotScript<BufWriter<File>>, ElectrostaticsError> {
        self.plot.as_mut().ok_or(ElectrostaticsError::NoPlotFile)
    }
}

fn convert<T: Copy + RealField>(value: f64) -> T {
    nalgebra::convert::<f64, T>(value)
}
