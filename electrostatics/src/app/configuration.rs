use color_eyre::eyre::eyre;
use config::{Config, Environment, File};
use electrostatics_fdm::{LinearSolverSettings, Method, RelaxationSettings};
use nalgebra::RealField;
use serde::{de::DeserializeOwned, Deserialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Solver and output settings shared by every command in a file
#[derive(Debug, Deserialize)]
pub struct Configuration<T> {
    /// Controls for `solveiterative`
    pub relaxation: RelaxationConfiguration<T>,
    /// Controls for the sparse linear backends used by `solve`
    pub linear: LinearConfiguration<T>,
    /// Where results are written
    pub output: OutputConfiguration,
}

/// The `[relaxation]` table
#[derive(Debug, Deserialize)]
pub struct RelaxationConfiguration<T> {
    /// Sweeps used when `solveiterative` is not given an iteration count
    pub maximum_iterations: usize,
    /// Stop once the largest update of a sweep falls below this
    pub tolerance: Option<T>,
    /// Stop after this much wall-clock time
    pub time_budget_seconds: Option<f64>,
}

/// The `[linear]` table
#[derive(Debug, Deserialize)]
pub struct LinearConfiguration<T> {
    /// The backend used by `solve` commands which do not name one
    pub method: String,
    /// Relative residual at which `bicgstab` stops
    pub tolerance: T,
    /// Iteration cap for `bicgstab`
    pub maximum_iterations: usize,
}

/// The `[output]` table
#[derive(Debug, Deserialize)]
pub struct OutputConfiguration {
    /// Where solutions, fields, plot scripts and the log file are written
    pub directory: PathBuf,
}

impl<T: DeserializeOwned> Configuration<T> {
    /// Read the configuration from `.config` in the working directory
    pub fn build() -> color_eyre::Result<Self> {
        Self::build_from(Path::new(".config"))
    }

    /// Read the configuration from `directory`
    ///
    /// Built in defaults are overridden by `default.toml`, then by `{RUN_MODE}.toml`, then by
    /// `ELECTROSTATICS_` environment variables such as `ELECTROSTATICS_LINEAR__METHOD`. Every
    /// file is optional.
    pub fn build_from(directory: &Path) -> color_eyre::Result<Self> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .set_default("relaxation.maximum_iterations", 10_000i64)?
            .set_default("linear.method", "sparselu")?
            .set_default("linear.tolerance", 1e-10)?
            .set_default("linear.maximum_iterations", 10_000i64)?
            .set_default("output.directory", ".")?
            // The default settings for the solvers, shipped alongside the binary
            .add_source(File::from(directory.join("default")).required(false))
            // The override settings which may be set by the user, optional
            .add_source(File::from(directory.join(&run_mode)).required(false))
            .add_source(Environment::with_prefix("ELECTROSTATICS").separator("__"))
            .build()?;

        s.try_deserialize()
            .map_err(|e| eyre!(format!("Failed to deserialize the config file: {:?}", e)))
    }
}

impl<T: Copy + RealField> Configuration<T> {
    /// The configured default linear solver
    pub fn method(&self) -> Result<Method, electrostatics_fdm::MethodParseError> {
        self.linear.method.parse()
    }

    /// Convergence controls for the iterative linear backend
    pub fn linear_settings(&self) -> LinearSolverSettings<T> {
        LinearSolverSettings {
            tolerance: self.linear.tolerance,
            maximum_iterations: self.linear.maximum_iterations,
        }
    }

    /// Relaxation settings for `iterations` sweeps, or the configured number when `None`
    pub fn relaxation_settings(&self, iterations: Option<usize>) -> RelaxationSettings<T> {
        let mut settings =
            RelaxationSettings::new(iterations.unwrap_or(self.relaxation.maximum_iterations));
        if let Some(tolerance) = self.relaxation.tolerance {
            settings = settings.with_tolerance(tolerance);
        }
        if let Some(seconds) = self.relaxation.time_budget_seconds {
            settings = settings.with_time_budget(Duration::from_secs_f64(seconds));
        }
        settings
    }
}
