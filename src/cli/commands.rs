//! Command dispatch

use std::io;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::IoResultExt;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::session::Session;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::Console;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Completion { shell }) => {
            completion(*shell);
            Ok(())
        }
        Some(Commands::Config { command }) => {
            let settings = load_settings(cli)?;
            config_command(command, settings)
        }
        None => {
            let settings = load_settings(cli)?;
            simulate(&cli.forests, settings)
        }
    }
}

/// Layered settings plus the `--data-dir` override.
pub fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(dir) = &cli.data_dir {
        settings = settings.with_data_dir(dir);
    }
    debug!("settings: {:?}", settings);
    Ok(settings)
}

#[instrument(skip(settings))]
fn simulate(forests: &[String], settings: Settings) -> CliResult<()> {
    if forests.is_empty() {
        return Err(CliError::Usage(
            "no forests given; usage: forestry <FOREST>...".to_string(),
        ));
    }
    let services = ServiceContainer::new(settings);
    let stdin = io::stdin();
    let console = Console::new(stdin.lock(), io::stdout());
    Session::new(&services, console).run(forests)?;
    Ok(())
}

fn config_command(command: &ConfigCommands, settings: Settings) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Path => {
            output::header("Config file");
            match global_config_path() {
                Some(path) => output::action(
                    if path.exists() { "found" } else { "absent" },
                    &path.display(),
                ),
                None => output::action("absent", "no config directory on this platform"),
            }
            output::header("Data directory");
            output::info(&settings.data_dir.display());
            Ok(())
        }
        ConfigCommands::Init => {
            let path = global_config_path().ok_or_else(|| {
                CliError::Usage("no config directory on this platform".to_string())
            })?;
            let services = ServiceContainer::new(settings);
            if services.fs.exists(&path) {
                return Err(CliError::Usage(format!(
                    "config already exists: {}",
                    path.display()
                )));
            }
            services
                .fs
                .ensure_parent(&path)
                .and_then(|_| services.fs.write(&path, &Settings::template()))
                .with_path_context("write config", &path)?;
            output::success(&format!("created {}", path.display()));
            Ok(())
        }
    }
}

fn completion(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    eprintln!("Generating completion file for {shell:?}...");
    generate(shell, &mut cmd, name, &mut io::stdout());
}
