// Copyright 2022 Chris Gubbin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! # Error
//! The error types for the binary

use electrostatics_fdm::{MethodParseError, SolveError};
use electrostatics_grid::GridError;
use miette::Diagnostic;

#[derive(thiserror::Error, Debug, Diagnostic)]
/// Failures while reading a command file
#[allow(missing_docs)]
pub enum ScriptError {
    #[error("line {line}: unknown command `{command}`")]
    #[diagnostic(
        code(electrostatics::script::unknown_command),
        help("see `script::Command` for the available commands")
    )]
    UnknownCommand { line: usize, command: String },
    #[error("line {line}: `{command}` takes {expected} arguments, found {found}")]
    #[diagnostic(code(electrostatics::script::arguments))]
    WrongArgumentCount {
        line: usize,
        command: String,
        expected: String,
        found: usize,
    },
    #[error("line {line}: could not read `{token}` as {expected}")]
    #[diagnostic(code(electrostatics::script::argument))]
    InvalidArgument {
        line: usize,
        token: String,
        expected: &'static str,
    },
    #[error("line {line}: {source}")]
    #[diagnostic(code(electrostatics::script::extent))]
    InvalidExtent { line: usize, source: GridError },
    #[error("line {line}: {source}")]
    #[diagnostic(code(electrostatics::script::method))]
    UnknownMethod {
        line: usize,
        source: MethodParseError,
    },
}

#[derive(thiserror::Error, Debug, Diagnostic)]
/// The top level error of the application
#[allow(missing_docs)]
pub enum ElectrostaticsError {
    #[error(transparent)]
    #[diagnostic(code(electrostatics::io_error))]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    #[diagnostic(code(electrostatics::config_error))]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    #[diagnostic(code(electrostatics::script_error))]
    Script(#[from] ScriptError),
    #[error(transparent)]
    #[diagnostic(code(electrostatics::grid_error))]
    Grid(#[from] GridError),
    #[error(transparent)]
    #[diagnostic(code(electrostatics::solve_error))]
    Solve(#[from] SolveError),
    #[error(transparent)]
    #[diagnostic(code(electrostatics::method_error))]
    Method(#[from] MethodParseError),
    #[error("no system named `{0}`")]
    #[diagnostic(code(electrostatics::unknown_system))]
    UnknownSystem(String),
    #[error("no solved system named `{0}`")]
    #[diagnostic(
        code(electrostatics::unknown_solution),
        help("systems are stored under the solved name passed to a solve command")
    )]
    UnknownSolution(String),
    #[error("boundary commands need a current system, create one with `new`")]
    #[diagnostic(code(electrostatics::no_current_system))]
    NoCurrentSystem,
    #[error("no timer named `{0}` is running")]
    #[diagnostic(code(electrostatics::unknown_timer))]
    UnknownTimer(String),
    #[error("plot commands need an open plot file, create one with `plotfile`")]
    #[diagnostic(code(electrostatics::no_plot_file))]
    NoPlotFile,
    #[error("line {line}: {source}")]
    #[diagnostic(code(electrostatics::command))]
    Command {
        line: usize,
        source: Box<ElectrostaticsError>,
    },
}
