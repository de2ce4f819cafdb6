use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::{info, LevelFilter};

use crate::config::{default_config_path, SimulationConfig};
use crate::error::VaccinateError;
use crate::log::{configure, LogSpec};
use crate::report::{CsvReporter, ReportOptions, TableReporter};
use crate::simulator::Simulator;

/// Short name of the per-cycle CSV report.
pub const CYCLE_REPORT: &str = "cycles";

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Seed, visit once and print the statistics table
    Console,
    /// Run reporting cycles, printing a table after each
    Watch,
    /// Start the interactive prompt
    #[cfg(feature = "repl")]
    Repl,
}

/// Default cli arguments for the simulator
#[derive(Parser, Debug)]
#[command(name = "vaccinate", version, about = "Simulate an infection spreading around a ring of people")]
pub struct BaseArgs {
    /// Random seed
    #[arg(short, long, default_value = "0")]
    pub random_seed: u64,

    /// Path of the configuration file; defaults to ~/.vaccinate and is created with
    /// default values if missing
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Optional directory for the per-cycle CSV report
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Prefix for report file names
    #[arg(long, default_value = "")]
    pub file_prefix: String,

    /// Overwrite existing report files
    #[arg(short, long)]
    pub force_overwrite: bool,

    /// Enable logging: a level (`info`) or a list of `module=level` pairs
    /// (`vaccinate=trace,rustyline=debug`)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// How to run the simulation
    #[arg(short, long, value_enum, default_value_t = Mode::Console)]
    pub mode: Mode,

    /// Number of reporting cycles in watch mode
    #[arg(short = 'n', long)]
    pub cycles: Option<u64>,
}

impl BaseArgs {
    fn config_path(&self) -> Result<PathBuf, VaccinateError> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => default_config_path(),
        }
    }

    fn report_options(&self) -> Option<ReportOptions> {
        let directory = self.output_dir.clone()?;
        let mut options = ReportOptions::default();
        options
            .directory(directory)
            .file_prefix(self.file_prefix.clone())
            .overwrite(self.force_overwrite);
        Some(options)
    }
}

fn init_logging(spec: &str) -> Result<(), VaccinateError> {
    let spec: LogSpec = spec.parse()?;
    configure(&spec);
    let enabled = spec.modules.iter().filter(|(_, level)| **level != LevelFilter::Off);
    for (module, level) in enabled {
        info!("Logging enabled for {module} at level {level}");
    }
    Ok(())
}

/// Parses command line arguments and runs the simulation they describe.
///
/// # Errors
/// Returns an error if argument parsing, configuration loading, or the run fails
pub fn run_with_args() -> Result<Simulator, VaccinateError> {
    run_with_args_internal(BaseArgs::parse())
}

fn run_with_args_internal(args: BaseArgs) -> Result<Simulator, VaccinateError> {
    if let Some(spec) = &args.log_level {
        init_logging(spec)?;
    }

    let config_path = args.config_path()?;
    info!("Loading configuration from: {}", config_path.display());
    let config = SimulationConfig::load_or_create(&config_path)?;

    let mut simulator = Simulator::new(config, args.random_seed)?;
    if let Some(options) = args.report_options() {
        simulator.add_reporter(Box::new(CsvReporter::create(&options, CYCLE_REPORT)?));
    }

    match args.mode {
        Mode::Console => {
            simulator.add_reporter(Box::new(TableReporter::stdout()));
            simulator.run_once()?;
        }
        Mode::Watch => {
            simulator.add_reporter(Box::new(TableReporter::stdout()));
            simulator.run_cycles(args.cycles)?;
        }
        #[cfg(feature = "repl")]
        Mode::Repl => {
            crate::repl::start(&mut simulator, config_path)?;
        }
    }
    Ok(simulator)
}
