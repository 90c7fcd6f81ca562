use approx::assert_abs_diff_eq;
use electrostatics::app::{
    Configuration, LinearConfiguration, OutputConfiguration, RelaxationConfiguration,
};
use electrostatics::script::Script;
use electrostatics::session::Session;
use electrostatics::ElectrostaticsError;
use electrostatics_fdm::SolveError;
use std::path::PathBuf;

fn output_directory(name: &str) -> PathBuf {
    let directory = std::env::temp_dir().join(format!(
        "electrostatics-commands-{}-{}",
        name,
        std::process::id()
    ));
    std::fs::create_dir_all(&directory).unwrap();
    directory
}

fn configuration(directory: PathBuf) -> Configuration<f64> {
    Configuration {
        relaxation: RelaxationConfiguration {
            maximum_iterations: 50_000,
            tolerance: Some(1e-12),
            time_budget_seconds: None,
        },
        linear: LinearConfiguration {
            method: "bicgstab".into(),
            tolerance: 1e-12,
            maximum_iterations: 10_000,
        },
        output: OutputConfiguration { directory },
    }
}

fn run<'a>(config: &'a Configuration<f64>, source: &str) -> Result<Session<'a, f64>, ElectrostaticsError> {
    let script = Script::parse(source)?;
    let mut session = Session::new(config)?;
    session.execute(&script)?;
    Ok(session)
}

const CYLINDER: &str = "
# A grounded cylinder between two plates
new plates -8 8 -5 5
left 4
right -4
circle 0 0 2 0

solve sparselu plates direct
solveiterative plates relaxed
solve plates default
analytical2 exact -8 8 -5 5 4 -4 2

savesolution direct
savetuples direct
savecomparison direct relaxed difference
savefield direct

starttimer plotting
plotfile plot.gp -8 8 -5 5
plot direct
fieldplot direct 2
contourplot direct
stoptimer plotting
";

#[test]
fn a_command_file_solves_saves_and_plots() {
    let directory = output_directory("pipeline");
    let config = configuration(directory.clone());
    let session = run(&config, CYLINDER).unwrap();

    assert_eq!(
        session.solution_names(),
        vec!["default", "direct", "exact", "relaxed"]
    );
    assert_eq!(session.timings().len(), 1);
    assert_eq!(session.timings()[0].0, "plotting");

    // Relaxation, the configured backend and the explicit one all find the same potential
    let direct = session.solution("direct").unwrap();
    for other in ["relaxed", "default"] {
        let difference = direct
            .compare_to(session.solution(other).unwrap())
            .unwrap();
        for value in difference.as_slice() {
            assert_abs_diff_eq!(*value, 0.0, epsilon = 1e-6);
        }
    }
    assert_eq!(direct.get(-8, 0).unwrap(), 4.0);
    assert_eq!(direct.get(8, 3).unwrap(), -4.0);
    assert_eq!(direct.get(1, 1).unwrap(), 0.0);

    let matrix = std::fs::read_to_string(directory.join("direct")).unwrap();
    let rows = matrix.lines().collect::<Vec<_>>();
    assert_eq!(rows.len(), 11);
    for row in &rows {
        assert_eq!(row.split(' ').count(), 17);
    }
    // The first row is j = -5, running from the left plate to the right plate
    assert!(rows[0].starts_with("4 "));
    assert!(rows[0].ends_with(" -4"));

    let tuples = std::fs::read_to_string(directory.join("directtuples")).unwrap();
    assert_eq!(tuples.lines().filter(|line| !line.is_empty()).count(), 17 * 11);
    assert!(tuples.starts_with("-8 -5 4\n"));

    let difference = std::fs::read_to_string(directory.join("difference")).unwrap();
    for token in difference.split_whitespace() {
        assert_abs_diff_eq!(token.parse::<f64>().unwrap(), 0.0, epsilon = 1e-6);
    }

    let field = std::fs::read_to_string(directory.join("directfield")).unwrap();
    let largest = field
        .lines()
        .filter(|line| !line.is_empty())
        .map(|line| {
            let values = line
                .split(' ')
                .map(|token| token.parse::<f64>().unwrap())
                .collect::<Vec<_>>();
            (values[2] * values[2] + values[3] * values[3]).sqrt()
        })
        .fold(0.0, f64::max);
    assert_abs_diff_eq!(largest, 1.0, epsilon = 1e-9);

    let plot = std::fs::read_to_string(directory.join("plot.gp")).unwrap();
    assert!(plot.contains("xMin = -8\n"));
    assert!(plot.contains("set output \"direct.eps\"\n"));
    assert!(plot.contains("\"directfield\" every 2:2"));
    assert!(plot.contains("set output \"directcontour.eps\"\n"));
}

#[test]
fn boundary_commands_need_a_current_system() {
    let config = configuration(output_directory("no-current"));
    let error = run(&config, "# nothing yet\nleft 1").err().unwrap();
    assert!(matches!(
        error,
        ElectrostaticsError::Command { line: 2, ref source }
            if matches!(**source, ElectrostaticsError::NoCurrentSystem)
    ));
}

#[test]
fn systems_without_boundaries_cannot_be_solved() {
    let config = configuration(output_directory("ill-posed"));
    let error = run(&config, "new empty 0 4 0 4\nsolve denselu empty solved")
        .err()
        .unwrap();
    assert!(matches!(
        error,
        ElectrostaticsError::Command { line: 2, ref source }
            if matches!(**source, ElectrostaticsError::Solve(SolveError::NoBoundaryConditions))
    ));
}

#[test]
fn unknown_names_are_reported() {
    let config = configuration(output_directory("unknown"));

    let error = run(&config, "solve missing solved").err().unwrap();
    assert!(matches!(
        error,
        ElectrostaticsError::Command { line: 1, ref source }
            if matches!(**source, ElectrostaticsError::UnknownSystem(ref name) if name == "missing")
    ));

    let error = run(&config, "new a 0 2 0 2\nsavesolution a").err().unwrap();
    assert!(matches!(
        error,
        ElectrostaticsError::Command { line: 2, ref source }
            if matches!(**source, ElectrostaticsError::UnknownSolution(_))
    ));

    let error = run(&config, "stoptimer never").err().unwrap();
    assert!(matches!(
        error,
        ElectrostaticsError::Command { ref source, .. }
            if matches!(**source, ElectrostaticsError::UnknownTimer(_))
    ));

    let error = run(&config, "plot a").err().unwrap();
    assert!(matches!(
        error,
        ElectrostaticsError::Command { ref source, .. }
            if matches!(**source, ElectrostaticsError::NoPlotFile)
    ));
}

#[test]
fn lines_outside_the_grid_are_rejected_but_rings_are_clipped() {
    let config = configuration(output_directory("clipping"));
    let session = run(&config, "new a -3 3 -3 3\nring 0 0 10 1\ncircle 3 3 2 2").unwrap();
    assert_eq!(session.system("a").unwrap().get_potential(3, 3).unwrap(), 2.0);

    let error = run(&config, "new a -3 3 -3 3\nline 0 0 5 0 1").err().unwrap();
    assert!(matches!(
        error,
        ElectrostaticsError::Command { line: 2, ref source }
            if matches!(**source, ElectrostaticsError::Grid(_))
    ));
}

#[test]
fn an_unknown_configured_method_is_rejected() {
    let mut config = configuration(output_directory("method"));
    config.linear.method = "cholesky".into();
    assert!(matches!(
        Session::new(&config),
        Err(ElectrostaticsError::Method(_))
    ));
}
