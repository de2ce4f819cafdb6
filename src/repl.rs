//! The interactive prompt.
//!
//! Each line is split with shell quoting rules and parsed as a `clap` multicall command,
//! so every command gets `--help` for free.

use std::io::Write;
use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::debug;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::config::SimulationConfig;
use crate::error::VaccinateError;
use crate::report::{Reporter, TableReporter};
use crate::simulator::Simulator;
use crate::stats::PopulationStatsExt;

const PROMPT: &str = "> ";

/// `configure-*` commands and the configuration key each one sets.
const CONFIGURE_COMMANDS: [(&str, &str, &str); 5] = [
    ("configure-people", "people", "Set the number of people"),
    (
        "configure-infection-rate",
        "infection-rate",
        "Set the rate at which people are infected",
    ),
    (
        "configure-max-sick-days",
        "max-sick-days",
        "Set the number of days people remain infected",
    ),
    (
        "configure-visits",
        "visits",
        "Set the number of people visited per iteration",
    ),
    (
        "configure-unbounded",
        "unbounded",
        "Set whether watch runs continue until stopped",
    ),
];

fn cli() -> Command {
    // strip out "Usage: " in the default template
    const MAIN_HELP_TEMPLATE: &str = "\
        {all-args}
    ";
    // strip out name/version
    const COMMAND_TEMPLATE: &str = "\
        {about-with-newline}\n\
        {usage-heading}\n    {usage}\n\
        \n\
        {all-args}{after-help}\
    ";

    let path_arg = Arg::new("path")
        .value_parser(value_parser!(PathBuf))
        .help("Configuration file; defaults to the one loaded at startup");

    let mut cli = Command::new("repl")
        .multicall(true)
        .arg_required_else_help(true)
        .subcommand_required(true)
        .subcommand_value_name("COMMAND")
        .subcommand_help_heading("VACCINATE")
        .help_template(MAIN_HELP_TEMPLATE)
        .subcommand(
            Command::new("load")
                .about("Load configuration from a file, creating it with defaults if missing")
                .arg(path_arg.clone())
                .help_template(COMMAND_TEMPLATE),
        )
        .subcommand(
            Command::new("save")
                .about("Save the current configuration")
                .arg(path_arg)
                .help_template(COMMAND_TEMPLATE),
        )
        .subcommand(
            Command::new("show")
                .about("Show the current configuration")
                .help_template(COMMAND_TEMPLATE),
        )
        .subcommand(
            Command::new("run")
                .about("Run a fresh simulation: seed, visit once and print the statistics")
                .help_template(COMMAND_TEMPLATE),
        )
        .subcommand(
            Command::new("step")
                .about("Run more reporting cycles on the current population")
                .arg(
                    Arg::new("cycles")
                        .value_parser(value_parser!(u64))
                        .default_value("1"),
                )
                .help_template(COMMAND_TEMPLATE),
        )
        .subcommand(
            Command::new("reset")
                .about("Rebuild the population and seed the infection")
                .help_template(COMMAND_TEMPLATE),
        )
        .subcommand(
            Command::new("list")
                .about("List everyone in ring order")
                .arg(
                    Arg::new("reverse")
                        .long("reverse")
                        .short('r')
                        .action(ArgAction::SetTrue),
                )
                .help_template(COMMAND_TEMPLATE),
        )
        .subcommand(
            Command::new("quit")
                .alias("exit")
                .about("Quit")
                .help_template(COMMAND_TEMPLATE),
        );
    for (name, _, about) in CONFIGURE_COMMANDS {
        cli = cli.subcommand(
            Command::new(name)
                .about(about)
                .arg(Arg::new("value").required(true))
                .help_template(COMMAND_TEMPLATE),
        );
    }
    cli
}

struct Repl<'a> {
    simulator: &'a mut Simulator,
    config_path: PathBuf,
}

impl Repl<'_> {
    fn print_snapshot(&self, out: &mut dyn Write) -> Result<(), VaccinateError> {
        let snapshot = self.simulator.population().snapshot();
        TableReporter::new(out).render(self.simulator.cycle(), &snapshot)
    }

    fn resolve_path(&self, matches: &ArgMatches) -> PathBuf {
        matches
            .get_one::<PathBuf>("path")
            .cloned()
            .unwrap_or_else(|| self.config_path.clone())
    }

    /// Runs one command line. Returns `Ok(true)` when the prompt should exit.
    fn respond(&mut self, line: &str, out: &mut dyn Write) -> Result<bool, VaccinateError> {
        let args = shlex::split(line).ok_or("error: Invalid quoting")?;
        let matches = cli()
            .try_get_matches_from(args)
            .map_err(|e| e.to_string())?;
        match matches.subcommand() {
            Some(("load", matches)) => {
                let path = self.resolve_path(matches);
                let config = SimulationConfig::load_or_create(&path)?;
                self.simulator.reconfigure(config)?;
                writeln!(out, "Loaded configuration from {}", path.display())?;
                self.config_path = path;
            }
            Some(("save", matches)) => {
                let path = self.resolve_path(matches);
                self.simulator.config().save(&path)?;
                writeln!(out, "Saved configuration to {}", path.display())?;
            }
            Some(("show", _)) => {
                writeln!(out, "{}", serde_json::to_string_pretty(self.simulator.config())?)?;
            }
            Some(("run", _)) => {
                let config = self.simulator.config().clone();
                self.simulator.reconfigure(config)?;
                self.simulator.run_once()?;
                self.print_snapshot(out)?;
            }
            Some(("step", matches)) => {
                let cycles = matches.get_one::<u64>("cycles").copied().unwrap_or(1);
                for _ in 0..cycles {
                    self.simulator.step()?;
                }
                self.print_snapshot(out)?;
            }
            Some(("reset", _)) => {
                self.simulator.reset()?;
                writeln!(out, "Population rebuilt and seeded")?;
            }
            Some(("list", matches)) => {
                for individual in self.simulator.individuals(matches.get_flag("reverse")) {
                    writeln!(out, "{individual}")?;
                }
            }
            Some(("quit", _)) => return Ok(true),
            Some((name, matches)) => {
                let key = CONFIGURE_COMMANDS
                    .iter()
                    .find(|(command, _, _)| *command == name)
                    .map(|(_, key, _)| *key)
                    .ok_or_else(|| format!("unknown command: {name}"))?;
                let value = matches
                    .get_one::<String>("value")
                    .ok_or("error: missing value")?;
                let mut config = self.simulator.config().clone();
                config.set(key, value)?;
                self.simulator.reconfigure(config)?;
                writeln!(out, "Set {key} to {value}")?;
            }
            None => unreachable!("subcommand required"),
        }
        out.flush()?;
        Ok(false)
    }
}

/// Reads commands until `quit`, end of input or Ctrl-C. Command errors are printed and
/// the prompt continues.
///
/// # Errors
/// Returns an error if the line editor cannot be set up or reading input fails.
pub fn start(simulator: &mut Simulator, config_path: PathBuf) -> Result<(), VaccinateError> {
    let mut editor = DefaultEditor::new()?;
    let mut repl = Repl {
        simulator,
        config_path,
    };
    let mut stdout = std::io::stdout();
    writeln!(stdout, "Please select command (`help` lists them)")?;
    loop {
        let line = match editor.readline(PROMPT) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        editor.add_history_entry(line)?;
        debug!("repl command: {line}");

        match repl.respond(line, &mut stdout) {
            Ok(true) => break,
            Ok(false) => {}
            Err(VaccinateError::VaccinateError(message)) => writeln!(stdout, "{message}")?,
            Err(err) => writeln!(stdout, "{err}")?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn scenario() -> SimulationConfig {
        SimulationConfig {
            infection_rate: 100,
            max_sick_days: 0,
            number_of_people: 10,
            visits_per_iteration: 2,
            unbounded: false,
        }
    }

    fn respond(repl: &mut Repl, line: &str) -> (Result<bool, VaccinateError>, String) {
        let mut out = Vec::new();
        let result = repl.respond(line, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn run_prints_statistics() {
        let mut simulator = Simulator::new(scenario(), 0).unwrap();
        let mut repl = Repl {
            simulator: &mut simulator,
            config_path: PathBuf::from(".vaccinate"),
        };
        let (result, output) = respond(&mut repl, "run");
        assert!(!result.unwrap());
        assert!(output.starts_with("COLUMN"));
        let infected = output
            .lines()
            .find(|line| line.starts_with("Infected count"))
            .unwrap();
        assert!(infected.ends_with(" 3"));
    }

    #[test]
    fn run_twice_starts_fresh() {
        let mut simulator = Simulator::new(scenario(), 0).unwrap();
        let mut repl = Repl {
            simulator: &mut simulator,
            config_path: PathBuf::from(".vaccinate"),
        };
        let (_, first) = respond(&mut repl, "run");
        let (_, second) = respond(&mut repl, "run");
        assert_eq!(first, second);
    }

    #[test]
    fn configure_rebuilds_population() {
        let mut simulator = Simulator::new(scenario(), 0).unwrap();
        let mut repl = Repl {
            simulator: &mut simulator,
            config_path: PathBuf::from(".vaccinate"),
        };
        let (result, output) = respond(&mut repl, "configure-people 25");
        assert!(!result.unwrap());
        assert_eq!(output, "Set people to 25\n");
        assert_eq!(simulator.population().len(), 25);
    }

    #[test]
    fn invalid_configure_is_an_error() {
        let mut simulator = Simulator::new(scenario(), 0).unwrap();
        let mut repl = Repl {
            simulator: &mut simulator,
            config_path: PathBuf::from(".vaccinate"),
        };
        let (result, _) = respond(&mut repl, "configure-infection-rate 300");
        assert!(matches!(result, Err(VaccinateError::ConfigError(_))));
        let (result, _) = respond(&mut repl, "configure-people 0");
        assert!(matches!(result, Err(VaccinateError::ConstructionError(_))));
        assert_eq!(simulator.config(), &scenario());
    }

    #[test]
    fn unknown_command_is_an_error() {
        let mut simulator = Simulator::new(scenario(), 0).unwrap();
        let mut repl = Repl {
            simulator: &mut simulator,
            config_path: PathBuf::from(".vaccinate"),
        };
        let (result, _) = respond(&mut repl, "sneeze");
        assert!(matches!(result, Err(VaccinateError::VaccinateError(_))));
    }

    #[test]
    fn save_and_load_round_trip_through_a_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join(".vaccinate");
        let mut simulator = Simulator::new(scenario(), 0).unwrap();
        let mut repl = Repl {
            simulator: &mut simulator,
            config_path: path.clone(),
        };
        respond(&mut repl, "save").0.unwrap();
        respond(&mut repl, "configure-people 40").0.unwrap();
        let (result, output) = respond(&mut repl, "load");
        assert!(!result.unwrap());
        assert!(output.starts_with("Loaded configuration from"));
        assert_eq!(simulator.config(), &scenario());
    }

    #[test]
    fn list_in_reverse() {
        let mut simulator = Simulator::new(scenario(), 0).unwrap();
        let mut repl = Repl {
            simulator: &mut simulator,
            config_path: PathBuf::from(".vaccinate"),
        };
        respond(&mut repl, "reset").0.unwrap();
        let (_, output) = respond(&mut repl, "list --reverse");
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 10);
        assert!(lines[0].starts_with("ID: 9, Infected: false"));
        assert!(lines[8].starts_with("ID: 1, Infected: false"));
        assert!(lines[9].starts_with("ID: 0, Infected: true"));
    }

    #[test]
    fn step_advances_cycles() {
        let mut simulator = Simulator::new(scenario(), 0).unwrap();
        let mut repl = Repl {
            simulator: &mut simulator,
            config_path: PathBuf::from(".vaccinate"),
        };
        respond(&mut repl, "reset").0.unwrap();
        respond(&mut repl, "step 3").0.unwrap();
        assert_eq!(simulator.cycle(), 3);
    }

    #[test]
    fn quit_and_exit_stop_the_prompt() {
        let mut simulator = Simulator::new(scenario(), 0).unwrap();
        let mut repl = Repl {
            simulator: &mut simulator,
            config_path: PathBuf::from(".vaccinate"),
        };
        assert!(respond(&mut repl, "quit").0.unwrap());
        assert!(respond(&mut repl, "exit").0.unwrap());
    }
}
