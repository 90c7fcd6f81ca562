/// This module governs the high-level implementation of the application
mod configuration;
mod styles;
mod telemetry;

pub use configuration::{
    Configuration, LinearConfiguration, OutputConfiguration, RelaxationConfiguration,
};

use crate::script::Script;
use crate::session::Session;
use clap::{ArgEnum, Parser};
use owo_colors::OwoColorize;
use std::fmt;
use std::path::PathBuf;
use styles::Styles;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct App {
    /// The command file to run
    file_path: PathBuf,
    #[clap(arg_enum, short, long, default_value = "info")]
    log_level: LogLevel,
    /// Overrides the configured solver for `solve` commands which do not name one
    #[clap(short, long)]
    method: Option<String>,
    /// Overrides the configured output directory
    #[clap(short, long)]
    output: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ArgEnum)]
enum LogLevel {
    Trace,
    Info,
    Debug,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self {
            LogLevel::Trace => "trace",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Error => "error",
        };
        write!(f, "{}", level)
    }
}

/// Run the command file named on the command line
pub fn run() -> color_eyre::Result<()> {
    let cli = App::parse();

    let mut config: Configuration<f64> = Configuration::build()?;
    if let Some(method) = cli.method {
        config.linear.method = method;
    }
    if let Some(directory) = cli.output {
        config.output.directory = directory;
    }
    std::fs::create_dir_all(&config.output.directory)?;

    let (subscriber, _guard) = telemetry::get_subscriber(cli.log_level, &config.output.directory);
    telemetry::init_subscriber(subscriber)?;

    tracing::info!("Reading commands from {}", cli.file_path.display());
    let script = Script::from_file(&cli.file_path)?;
    let mut session = Session::new(&config)?;
    session.execute(&script)?;

    summarise(&session)?;
    Ok(())
}

fn summarise(session: &Session<'_, f64>) -> std::io::Result<()> {
    let mut styles = Styles::default();
    if supports_color::on(supports_color::Stream::Stdout).is_some() {
        styles.colorize();
    }

    let term = console::Term::stdout();
    term.write_line(&format!(
        "Wrote results to {}",
        session.directory().display().style(styles.path_style)
    ))?;
    for name in session.solution_names() {
        term.write_line(&format!("  solved {}", name.style(styles.name_style)))?;
    }
    for (name, elapsed) in session.timings() {
        term.write_line(&format!(
            "  {} took {}",
            name.style(styles.name_style),
            format!("{:.3}s", elapsed.as_secs_f64()).style(styles.time_style)
        ))?;
    }
    Ok(())
}
