use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info};

use super::demo::DemoCommand;
use super::dialog::DialogCommand;
use textui::Config;

/// textui - windows, widgets and modal dialogs in your terminal
#[derive(Parser)]
#[command(
    name = "textui",
    version,
    about = "Windows, widgets and modal dialogs in your terminal",
    long_about = r#"textui is a terminal widget toolkit. This binary runs its demo, or shows a
single dialog from a shell script and reports the answer.

Examples:
  textui                                        # Run the widget demo
  textui dialog confirm --text "Continue?"      # Exit code 0 on Yes, 1 on No
  textui dialog input --text "Name:" --default me"#
)]
pub struct Cli {
    /// Current working directory
    #[arg(short = 'c', long = "cwd", global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    pub debug: bool,

    /// Write logs to this file instead of stderr
    #[arg(long = "log-file", global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the interactive widget demo
    Demo(DemoCommand),

    /// Show a single dialog and print the result
    Dialog(DialogCommand),
}

impl Cli {
    /// Run the selected command and return the process exit code
    pub fn execute(self) -> Result<i32> {
        // Change working directory if specified
        if let Some(cwd) = &self.cwd {
            std::env::set_current_dir(cwd)
                .map_err(|e| anyhow::anyhow!("Failed to change directory to {}: {}", cwd.display(), e))?;
        }

        let config = Config::init()?;
        let log_file = self.log_file.clone().or_else(|| config.log_file.clone());
        crate::init_logging(self.debug, log_file.as_deref())?;
        debug!(?config, "Configuration initialized");

        if let Some(cwd) = &self.cwd {
            info!("Changed working directory to: {}", cwd.display());
        }

        match self.command {
            Some(Commands::Dialog(dialog)) => dialog.execute(&config),
            Some(Commands::Demo(demo)) => demo.execute(&config),
            None => DemoCommand::default().execute(&config),
        }
    }
}
