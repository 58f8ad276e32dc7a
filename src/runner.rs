//! Command line driver: parses arguments, builds the engine and steps it until it halts.
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use clap::{Args, Command, FromArgMatches as _};
use log::{info, warn};

use crate::engine::SimulationEngine;
use crate::error::SirError;
use crate::log::apply_log_spec;
use crate::parameters::SimulationParameters;
use crate::report::{CountsReport, ReportOptions};

const UNBOUNDED_RUN_NOTICE: &str = "no halt condition can be met (no step limit, and \
    infected agents never recover or the run does not stop when none remain); the run \
    continues until interrupted";

/// Default cli arguments for the runner
#[derive(Args, Debug, Default)]
pub struct BaseArgs {
    /// Random seed. Overrides the seed in the config file
    #[arg(short, long)]
    pub random_seed: Option<u64>,

    /// Optional path for a JSON parameters file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Optional directory for the counts report
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Prefix for report file names
    #[arg(long, default_value = "")]
    pub prefix: String,

    /// Replace existing report files
    #[arg(short, long)]
    pub force_overwrite: bool,

    /// Log level, e.g. `info` or `info,spatial_sir::infection=trace`
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Pause for the configured step interval between steps
    #[arg(long)]
    pub realtime: bool,

    /// Halt after this many steps. Overrides the config file
    #[arg(long)]
    pub max_time_steps: Option<u64>,
}

fn create_cli() -> Command {
    let cli = Command::new("spatial_sir")
        .about("Simulates disease spread among agents moving on a bounded plane");
    BaseArgs::augment_args(cli)
}

/// Runs a simulation configured from the command line.
///
/// `setup_fn` is called with the freshly reset engine before the first step, for example to
/// register extra observers.
///
/// # Errors
///
/// Returns an error if argument parsing, configuration or the setup function fails
pub fn run_with_args<F>(setup_fn: F) -> Result<SimulationEngine, Box<dyn std::error::Error>>
where
    F: FnOnce(&mut SimulationEngine, &BaseArgs) -> Result<(), SirError>,
{
    let matches = create_cli().get_matches();
    let args = BaseArgs::from_arg_matches(&matches)?;
    run_with_args_internal(args, setup_fn)
}

fn load_parameters(args: &BaseArgs) -> Result<SimulationParameters, SirError> {
    let mut params = match &args.config {
        Some(path) => {
            info!("loading parameters from {}", path.display());
            SimulationParameters::from_json_file(path)?
        }
        None => SimulationParameters::default(),
    };
    if let Some(seed) = args.random_seed {
        params.seed = seed;
    }
    if let Some(max_time_steps) = args.max_time_steps {
        params.max_time_steps = Some(max_time_steps);
    }
    Ok(params)
}

fn run_with_args_internal<F>(
    args: BaseArgs,
    setup_fn: F,
) -> Result<SimulationEngine, Box<dyn std::error::Error>>
where
    F: FnOnce(&mut SimulationEngine, &BaseArgs) -> Result<(), SirError>,
{
    if let Some(spec) = &args.log_level {
        apply_log_spec(spec)?;
    }

    let params = load_parameters(&args)?;
    let interval = Duration::from_millis(params.step_interval_ms);
    let mut engine = SimulationEngine::new(params)?;

    // Optionally record the counts of every step
    if let Some(output_dir) = &args.output_dir {
        let mut options = ReportOptions::new();
        options
            .directory(output_dir.clone())
            .file_prefix(args.prefix.clone())
            .overwrite(args.force_overwrite);
        engine.add_observer(CountsReport::create(&options)?);
    }

    // Run the provided Fn
    setup_fn(&mut engine, &args)?;

    if !engine.parameters().can_halt() {
        warn!("{UNBOUNDED_RUN_NOTICE}");
        eprintln!("note: {UNBOUNDED_RUN_NOTICE}");
    }

    engine.set_running(true);
    while engine.is_running() {
        engine.step();
        if args.realtime && engine.is_running() {
            thread::sleep(interval);
        }
    }
    engine.finish_observers()?;

    match engine.halt_reason() {
        Some(reason) => println!(
            "Halted at time step {}: {} ({})",
            engine.time_step(),
            reason,
            engine.counts()
        ),
        None => println!(
            "Stopped at time step {} ({})",
            engine.time_step(),
            engine.counts()
        ),
    }
    Ok(engine)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::engine::HaltReason;
    use crate::health::HealthState;

    #[test]
    fn test_run_with_defaults_and_step_limit() {
        let args = BaseArgs {
            max_time_steps: Some(5),
            ..BaseArgs::default()
        };
        let engine = run_with_args_internal(args, |_, _| Ok(())).unwrap();
        assert!(engine.is_halted());
        assert!(engine.time_step() <= 5);
        assert_eq!(engine.counts().total(), 600);
    }

    #[test]
    fn test_run_with_random_seed() {
        let args = BaseArgs {
            random_seed: Some(42),
            max_time_steps: Some(3),
            ..BaseArgs::default()
        };
        let engine = run_with_args_internal(args, |engine, _| {
            assert_eq!(engine.parameters().seed, 42);
            Ok(())
        })
        .unwrap();

        let mut compare = SimulationEngine::new(SimulationParameters {
            seed: 42,
            max_time_steps: Some(3),
            ..SimulationParameters::default()
        })
        .unwrap();
        compare.run(None);
        assert_eq!(engine.last_snapshot(), compare.last_snapshot());
    }

    #[test]
    fn test_run_with_config_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "infection_chance_percent": 0,
                "stop_when_no_infected": false,
                "max_time_steps": 4
            }}"#
        )
        .unwrap();
        let args = BaseArgs {
            config: Some(file.path().to_path_buf()),
            ..BaseArgs::default()
        };
        let engine = run_with_args_internal(args, |_, _| Ok(())).unwrap();
        assert_eq!(engine.time_step(), 4);
        assert_eq!(engine.halt_reason(), Some(HaltReason::MaxTimeSteps));
        assert_eq!(engine.counts().get(HealthState::Infected), 1);
    }

    #[test]
    fn test_run_with_output_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let args = BaseArgs {
            output_dir: Some(temp_dir.path().to_path_buf()),
            prefix: "test_".to_string(),
            max_time_steps: Some(2),
            ..BaseArgs::default()
        };
        run_with_args_internal(args, |_, _| Ok(())).unwrap();
        assert!(temp_dir.path().join("test_counts.csv").exists());
    }

    #[test]
    fn test_run_with_invalid_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "infection_chance_percent": 150 }}"#).unwrap();
        let args = BaseArgs {
            config: Some(file.path().to_path_buf()),
            ..BaseArgs::default()
        };
        let result = run_with_args_internal(args, |_, _| Ok(()));
        let error = result.err().unwrap();
        assert!(error.to_string().contains("infection_chance_percent"));
    }

    #[test]
    fn test_setup_error_propagates() {
        let args = BaseArgs {
            max_time_steps: Some(1),
            ..BaseArgs::default()
        };
        let result = run_with_args_internal(args, |_, _| Err(SirError::config("rejected")));
        assert!(result.is_err());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_unwritable_report_fails_the_run() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink("/dev/full", temp_dir.path().join("counts.csv")).unwrap();
        let args = BaseArgs {
            output_dir: Some(temp_dir.path().to_path_buf()),
            force_overwrite: true,
            max_time_steps: Some(3),
            ..BaseArgs::default()
        };
        let error = run_with_args_internal(args, |_, _| Ok(())).err().unwrap();
        assert!(error.to_string().starts_with("io error"), "{error}");
    }
}
