//! Command model and dispatch
//!
//! `Cli` is first turned into a typed `Command` (validating booleans, type
//! names and numbers), then exactly one command is executed.

use std::io::Write;
use std::path::PathBuf;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument, warn};

use crate::cli::args::Cli;
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::Settings;
use crate::domain::{
    parse_bool, parse_unsigned, resolve_node, resolve_relation, FilterKind, TrackMode,
};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

/// One control operation with its typed payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Usage,
    Version,
    State,
    Enable(bool),
    All(bool),
    File(PathBuf),
    Track { path: PathBuf, mode: TrackMode },
    Taint { path: PathBuf, value: u64 },
    Opaque { path: PathBuf, on: bool },
    Filter { kind: FilterKind, id: u32, add: bool },
    ResetFilters,
    Completions(Shell),
    ShowConfig,
    ConfigTemplate,
}

impl Command {
    /// Validate the selected operation's arguments.
    ///
    /// For filter operations the type name is checked before the boolean.
    pub fn from_cli(cli: &Cli) -> CliResult<Self> {
        if cli.help {
            return Ok(Command::Usage);
        }
        if cli.version {
            return Ok(Command::Version);
        }
        if cli.state {
            return Ok(Command::State);
        }
        if let Some(v) = &cli.enable {
            return Ok(Command::Enable(parse_bool(v)?));
        }
        if let Some(v) = &cli.all {
            return Ok(Command::All(parse_bool(v)?));
        }
        if let Some(path) = &cli.file {
            return Ok(Command::File(path.clone()));
        }
        if let Some(values) = &cli.track {
            let [path, mode] = pair(values)?;
            return Ok(Command::Track {
                path: PathBuf::from(path),
                mode: TrackMode::parse(mode),
            });
        }
        if let Some(values) = &cli.taint {
            let [path, raw] = pair(values)?;
            let parsed = parse_unsigned(raw);
            if !parsed.complete {
                warn!("taint {:?} is not fully numeric, applying {}", raw, parsed.value);
            }
            return Ok(Command::Taint {
                path: PathBuf::from(path),
                value: parsed.value,
            });
        }
        if let Some(values) = &cli.opaque {
            let [path, flag] = pair(values)?;
            return Ok(Command::Opaque {
                path: PathBuf::from(path),
                on: parse_bool(flag)?,
            });
        }
        let filters = [
            (&cli.propagate_node, FilterKind::PropagateNode),
            (&cli.propagate_relation, FilterKind::PropagateRelation),
            (&cli.node_filter, FilterKind::Node),
            (&cli.relation_filter, FilterKind::Relation),
        ];
        for (values, kind) in filters {
            if let Some(values) = values {
                let [name, flag] = pair(values)?;
                let id = if kind.is_relation() {
                    resolve_relation(name)?
                } else {
                    resolve_node(name)?
                };
                return Ok(Command::Filter {
                    kind,
                    id,
                    add: parse_bool(flag)?,
                });
            }
        }
        if cli.reset {
            return Ok(Command::ResetFilters);
        }
        if let Some(shell) = cli.completions {
            return Ok(Command::Completions(shell));
        }
        if cli.show_config {
            return Ok(Command::ShowConfig);
        }
        if cli.config_template {
            return Ok(Command::ConfigTemplate);
        }
        Err(CliError::Usage("no operation given".to_string()))
    }
}

fn pair(values: &[String]) -> CliResult<[&str; 2]> {
    match values {
        [a, b] => Ok([a.as_str(), b.as_str()]),
        _ => Err(CliError::Usage(format!(
            "expected 2 arguments, got {}",
            values.len()
        ))),
    }
}

/// Write the usage text.
pub fn print_usage(out: &mut dyn Write) -> CliResult<()> {
    let help = Cli::command().render_help();
    write!(out, "{help}").map_err(|e| InfraError::io("write usage", e))?;
    Ok(())
}

/// Parse and execute the operation selected on the command line.
pub fn run(cli: &Cli, container: &ServiceContainer, out: &mut dyn Write) -> CliResult<()> {
    if !cli.rest.is_empty() {
        debug!("ignoring trailing arguments: {:?}", cli.rest);
    }
    let command = Command::from_cli(cli)?;
    execute_command(&command, container, out)
}

#[instrument(skip(container, out))]
pub fn execute_command(
    command: &Command,
    container: &ServiceContainer,
    out: &mut dyn Write,
) -> CliResult<()> {
    let service = &container.control_service;
    let write_err = |e| InfraError::io("write output", e);

    match command {
        Command::Usage => print_usage(out)?,
        Command::Version => {
            writeln!(out, "provctl {}", env!("CARGO_PKG_VERSION")).map_err(write_err)?
        }
        Command::State => {
            let report = service.state();
            for f in &report.failures {
                output::warning(&format!("could not {}: {}", f.call, f.source));
            }
            output::write_state(out, &report).map_err(write_err)?;
        }
        Command::Enable(on) => service.set_enabled(*on)?,
        Command::All(on) => service.set_all(*on)?,
        Command::File(path) => {
            let record = service.read_file(path)?;
            output::write_record(out, &record).map_err(write_err)?;
        }
        Command::Track { path, mode } => service.track(path, *mode)?,
        Command::Taint { path, value } => service.taint(path, *value)?,
        Command::Opaque { path, on } => service.opaque(path, *on)?,
        Command::Filter { kind, id, add } => service.filter(*kind, *id, *add)?,
        Command::ResetFilters => service.reset_filters()?,
        Command::Completions(shell) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, out);
        }
        Command::ShowConfig => {
            let toml = container.settings.to_toml()?;
            write!(out, "{toml}").map_err(write_err)?;
        }
        Command::ConfigTemplate => {
            write!(out, "{}", Settings::template()).map_err(write_err)?;
        }
    }
    debug!("done: {:?}", command);
    Ok(())
}
