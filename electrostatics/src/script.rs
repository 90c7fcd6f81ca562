//! A command file is a list of whitespace separated commands, one per line.
//!
//! Lines are read case-insensitively, so system names are lower-cased along with the rest of the
//! line. Blank lines and lines starting with `#` are skipped. Every argument is checked when the
//! file is parsed, so a malformed file is rejected before any command runs.

use crate::ScriptError;
use electrostatics_fdm::{Edge, Method};
use electrostatics_grid::{Coordinate, Extent};
use std::path::Path;
use std::str::FromStr;

/// A single command of a command file
///
/// Fields hold the arguments named in each variant's syntax, in the same order.
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// `new NAME IMIN IMAX JMIN JMAX` creates an empty system and makes it current
    New { name: String, extent: Extent },
    /// `analytical1 NAME IMIN IMAX JMIN JMAX RA RB VA VB` stores the closed-form potential of two
    /// coaxial cylinders as a solved system
    Analytical1 {
        name: String,
        extent: Extent,
        radius_a: f64,
        radius_b: f64,
        potential_a: f64,
        potential_b: f64,
    },
    /// `analytical2 NAME IMIN IMAX JMIN JMAX VLEFT VRIGHT R` stores the closed-form potential of a
    /// grounded cylinder of radius `R` between two plates as a solved system
    Analytical2 {
        name: String,
        extent: Extent,
        left: f64,
        right: f64,
        cylinder_radius: f64,
    },
    /// `point I J V`
    Point { position: Coordinate, value: f64 },
    /// `ring I J R V`
    Ring {
        centre: Coordinate,
        radius: f64,
        value: f64,
    },
    /// `circle I J R V`, a filled disc
    Circle {
        centre: Coordinate,
        radius: f64,
        value: f64,
    },
    /// `line I1 J1 I2 J2 V`
    Line {
        start: Coordinate,
        end: Coordinate,
        value: f64,
    },
    /// `rectangle I1 J1 I2 J2 V`, the outline between two opposite corners
    Rectangle {
        a: Coordinate,
        b: Coordinate,
        value: f64,
    },
    /// `left V`, `right V`, `top V` or `bottom V`
    Edge { edge: Edge, value: f64 },
    /// `solve [METHOD] UNSOLVED SOLVED`, or one of the named solve commands such as
    /// `solvesparselu UNSOLVED SOLVED`. Without a method the configured one is used
    Solve {
        method: Option<Method>,
        unsolved: String,
        solved: String,
    },
    /// `solveiterative UNSOLVED SOLVED [N]` relaxes for at most `N` sweeps
    SolveIterative {
        unsolved: String,
        solved: String,
        iterations: Option<usize>,
    },
    /// `savesolution NAME` writes the solved potential to the file `NAME`
    SaveSolution { name: String },
    /// `savetuples NAME` writes the solved potential as `i j V` rows to `NAMEtuples`
    SaveTuples { name: String },
    /// `savecomparison A B OUT` writes the difference `A - B` to the file `OUT`
    SaveComparison { a: String, b: String, output: String },
    /// `savefield NAME` writes the normalised electric field to the file `NAMEfield`
    SaveField { name: String },
    /// `starttimer NAME`
    StartTimer { name: String },
    /// `stoptimer NAME` reports the time since the matching `starttimer`
    StopTimer { name: String },
    /// `plotfile FILE XMIN XMAX YMIN YMAX` opens a gnuplot script
    PlotFile {
        file: String,
        x_min: f64,
        x_max: f64,
        y_min: f64,
        y_max: f64,
    },
    /// `plot NAME`
    Plot { name: String },
    /// `fieldplot NAME S` overlays every `S`th field vector on the potential
    FieldPlot { name: String, spacing: usize },
    /// `contourplot NAME`
    ContourPlot { name: String },
}

/// A command and the line of the file it was read from, counting from one
#[derive(Clone, Debug, PartialEq)]
pub struct Statement {
    /// Line number in the source file
    pub line: usize,
    /// The parsed command
    pub command: Command,
}

/// A parsed command file
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Script {
    statements: Vec<Statement>,
}

impl Script {
    /// Parse the contents of a command file
    pub fn parse(source: &str) -> Result<Self, ScriptError> {
        let mut statements = Vec::new();
        for (index, raw) in source.lines().enumerate() {
            let line = raw.trim().to_lowercase();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let tokens = line.split_whitespace().collect::<Vec<_>>();
            statements.push(Statement {
                line: index + 1,
                command: Arguments::new(index + 1, &tokens).into_command()?,
            });
        }
        Ok(Self { statements })
    }

    /// Read and parse a command file
    pub fn from_file(path: &Path) -> Result<Self, crate::ElectrostaticsError> {
        let source = std::fs::read_to_string(path)?;
        Ok(Self::parse(&source)?)
    }

    /// The commands in file order, comments and blank lines removed
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Number of commands
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// True when the file held only comments and blank lines
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// The tokens of a single line
struct Arguments<'a> {
    line: usize,
    command: &'a str,
    arguments: &'a [&'a str],
}

impl<'a> Arguments<'a> {
    fn new(line: usize, tokens: &'a [&'a str]) -> Self {
        Self {
            line,
            command: tokens[0],
            arguments: &tokens[1..],
        }
    }

    fn arity(&self, count: usize) -> Result<(), ScriptError> {
        self.arity_between(count, count)
    }

    fn arity_between(&self, minimum: usize, maximum: usize) -> Result<(), ScriptError> {
        let found = self.arguments.len();
        if found < minimum || found > maximum {
            let expected = if minimum == maximum {
                minimum.to_string()
            } else {
                format!("{minimum} to {maximum}")
            };
            return Err(ScriptError::WrongArgumentCount {
                line: self.line,
                command: self.command.to_string(),
                expected,
                found,
            });
        }
        Ok(())
    }

    fn name(&self, index: usize) -> String {
        self.arguments[index].to_string()
    }

    fn parse<T: FromStr>(&self, index: usize, expected: &'static str) -> Result<T, ScriptError> {
        let token = self.arguments[index];
        token.parse().map_err(|_| ScriptError::InvalidArgument {
            line: self.line,
            token: token.to_string(),
            expected,
        })
    }

    fn integer(&self, index: usize) -> Result<i64, ScriptError> {
        self.parse(index, "an integer")
    }

    fn real(&self, index: usize) -> Result<f64, ScriptError> {
        self.finite(index, "a finite number", |_| true)
    }

    fn radius(&self, index: usize) -> Result<f64, ScriptError> {
        self.finite(index, "a finite, non-negative radius", |value| value >= 0.0)
    }

    // `f64::from_str` accepts `inf` and `NaN`
    fn finite(
        &self,
        index: usize,
        expected: &'static str,
        accept: impl Fn(f64) -> bool,
    ) -> Result<f64, ScriptError> {
        let value: f64 = self.parse(index, expected)?;
        if value.is_finite() && accept(value) {
            Ok(value)
        } else {
            Err(ScriptError::InvalidArgument {
                line: self.line,
                token: self.arguments[index].to_string(),
                expected,
            })
        }
    }

    fn spacing(&self, index: usize) -> Result<usize, ScriptError> {
        match self.parse(index, "a positive integer spacing")? {
            0 => Err(ScriptError::InvalidArgument {
                line: self.line,
                token: self.arguments[index].to_string(),
                expected: "a positive integer spacing",
            }),
            spacing => Ok(spacing),
        }
    }

    fn coordinate(&self, index: usize) -> Result<Coordinate, ScriptError> {
        Ok(Coordinate::new(self.integer(index)?, self.integer(index + 1)?))
    }

    /// Four integers in the order `IMIN IMAX JMIN JMAX`
    fn extent(&self, index: usize) -> Result<Extent, ScriptError> {
        Extent::new(
            self.integer(index)?,
            self.integer(index + 1)?,
            self.integer(index + 2)?,
            self.integer(index + 3)?,
        )
        .map_err(|source| ScriptError::InvalidExtent {
            line: self.line,
            source,
        })
    }

    fn method(&self, key: &str) -> Result<Method, ScriptError> {
        key.parse().map_err(|source| ScriptError::UnknownMethod {
            line: self.line,
            source,
        })
    }

    fn solve_with(&self, method: Method) -> Result<Command, ScriptError> {
        self.arity(2)?;
        Ok(Command::Solve {
            method: Some(method),
            unsolved: self.name(0),
            solved: self.name(1),
        })
    }

    fn edge(&self, edge: Edge) -> Result<Command, ScriptError> {
        self.arity(1)?;
        Ok(Command::Edge {
            edge,
            value: self.real(0)?,
        })
    }

    fn single_name(&self) -> Result<String, ScriptError> {
        self.arity(1)?;
        Ok(self.name(0))
    }

    fn into_command(self) -> Result<Command, ScriptError> {
        let command = match self.command {
            "new" => {
                self.arity(5)?;
                Command::New {
                    name: self.name(0),
                    extent: self.extent(1)?,
                }
            }
            "analytical1" => {
                self.arity(9)?;
                Command::Analytical1 {
                    name: self.name(0),
                    extent: self.extent(1)?,
                    radius_a: self.radius(5)?,
                    radius_b: self.radius(6)?,
                    potential_a: self.real(7)?,
                    potential_b: self.real(8)?,
                }
            }
            "analytical2" => {
                self.arity(8)?;
                Command::Analytical2 {
                    name: self.name(0),
                    extent: self.extent(1)?,
                    left: self.real(5)?,
                    right: self.real(6)?,
                    cylinder_radius: self.radius(7)?,
                }
            }
            "point" => {
                self.arity(3)?;
                Command::Point {
                    position: self.coordinate(0)?,
                    value: self.real(2)?,
                }
            }
            "ring" | "circle" => {
                self.arity(4)?;
                let (centre, radius, value) =
                    (self.coordinate(0)?, self.radius(2)?, self.real(3)?);
                if self.command == "ring" {
                    Command::Ring {
                        centre,
                        radius,
                        value,
                    }
                } else {
                    Command::Circle {
                        centre,
                        radius,
                        value,
                    }
                }
            }
            "line" | "rectangle" => {
                self.arity(5)?;
                let (a, b, value) = (self.coordinate(0)?, self.coordinate(2)?, self.real(4)?);
                if self.command == "line" {
                    Command::Line {
                        start: a,
                        end: b,
                        value,
                    }
                } else {
                    Command::Rectangle { a, b, value }
                }
            }
            "left" => self.edge(Edge::Left)?,
            "right" => self.edge(Edge::Right)?,
            "top" => self.edge(Edge::Top)?,
            "bottom" => self.edge(Edge::Bottom)?,
            "solve" => {
                self.arity_between(2, 3)?;
                if self.arguments.len() == 3 {
                    Command::Solve {
                        method: Some(self.method(self.arguments[0])?),
                        unsolved: self.name(1),
                        solved: self.name(2),
                    }
                } else {
                    Command::Solve {
                        method: None,
                        unsolved: self.name(0),
                        solved: self.name(1),
                    }
                }
            }
            "solveviennabicon" | "solveeigenbicon" | "solvebicgstab" => {
                self.solve_with(Method::BiCgStab)?
            }
            "solveeigensparselu" | "solvesparselu" => self.solve_with(Method::SparseLu)?,
            "solvedenselu" => self.solve_with(Method::DenseLu)?,
            "solveiterative" => {
                self.arity_between(2, 3)?;
                Command::SolveIterative {
                    unsolved: self.name(0),
                    solved: self.name(1),
                    iterations: match self.arguments.len() {
                        3 => Some(self.parse(2, "a number of iterations")?),
                        _ => None,
                    },
                }
            }
            "savesolution" => Command::SaveSolution {
                name: self.single_name()?,
            },
            "savetuples" => Command::SaveTuples {
                name: self.single_name()?,
            },
            "savecomparison" => {
                self.arity(3)?;
                Command::SaveComparison {
                    a: self.name(0),
                    b: self.name(1),
                    output: self.name(2),
                }
            }
            "savefield" => Command::SaveField {
                name: self.single_name()?,
            },
            "starttimer" => Command::StartTimer {
                name: self.single_name()?,
            },
            "stoptimer" => Command::StopTimer {
                name: self.single_name()?,
            },
            "plotfile" => {
                self.arity(5)?;
                Command::PlotFile {
                    file: self.name(0),
                    x_min: self.real(1)?,
                    x_max: self.real(2)?,
                    y_min: self.real(3)?,
                    y_max: self.real(4)?,
                }
            }
            "plot" => Command::Plot {
                name: self.single_name()?,
            },
            "fieldplot" => {
                self.arity(2)?;
                Command::FieldPlot {
                    name: self.name(0),
                    spacing: self.spacing(1)?,
                }
            }
            "contourplot" => Command::ContourPlot {
                name: self.single_name()?,
            },
            unknown => {
                return Err(ScriptError::UnknownCommand {
                    line: self.line,
                    command: unknown.to_string(),
                })
            }
        };
        Ok(command)
    }
}
