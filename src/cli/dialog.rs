use anyhow::Result;
use clap::{Args, ValueEnum};
use tracing::{debug, info};

use textui::{Config, TerminalPlatform, Ui};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DialogKind {
    /// Message with an OK button
    Message,
    /// Yes/No question
    Confirm,
    /// One-line text prompt
    Input,
}

/// Show a single dialog and print the result
#[derive(Debug, Args)]
pub struct DialogCommand {
    /// Kind of dialog to show
    #[arg(value_enum)]
    pub kind: DialogKind,

    /// Dialog title
    #[arg(short = 't', long = "title", default_value = "textui")]
    pub title: String,

    /// Message shown inside the dialog
    #[arg(short = 'm', long = "text", default_value = "")]
    pub text: String,

    /// Pre-filled value for input dialogs
    #[arg(long = "default", default_value = "")]
    pub default_value: String,
}

/// What the user answered
#[derive(Debug, Clone, PartialEq, Eq)]
enum Answer {
    Dismissed,
    Confirmed(bool),
    Input(Option<String>),
}

impl Answer {
    fn exit_code(&self) -> i32 {
        match self {
            Answer::Dismissed | Answer::Confirmed(true) | Answer::Input(Some(_)) => 0,
            Answer::Confirmed(false) | Answer::Input(None) => 1,
        }
    }
}

impl DialogCommand {
    pub fn execute(&self, config: &Config) -> Result<i32> {
        debug!(kind = ?self.kind, "Executing dialog command");

        // The terminal is restored when `ui` drops, before anything is printed
        let answer = {
            let platform = TerminalPlatform::new(config.mouse_enabled)?;
            let mut ui = Ui::with_config(Box::new(platform), config);
            let (columns, rows) = ui.screen_size()?;
            ui.create_window(0, 0, columns.max(1) as i32, rows.max(1) as i32, "")?;
            self.show(&mut ui)?
        };

        info!(?answer, "Dialog closed");
        match &answer {
            Answer::Confirmed(value) => println!("{}", if *value { "yes" } else { "no" }),
            Answer::Input(Some(text)) => println!("{}", text),
            Answer::Dismissed | Answer::Input(None) => {}
        }
        Ok(answer.exit_code())
    }

    fn show(&self, ui: &mut Ui) -> Result<Answer> {
        let answer = match self.kind {
            DialogKind::Message => {
                ui.show_message(&self.title, &self.text)?;
                Answer::Dismissed
            }
            DialogKind::Confirm => Answer::Confirmed(ui.show_confirm(&self.title, &self.text)?),
            DialogKind::Input => {
                Answer::Input(ui.prompt_input(&self.title, &self.text, &self.default_value)?)
            }
        };
        Ok(answer)
    }
}
