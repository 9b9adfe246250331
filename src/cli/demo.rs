use anyhow::Result;
use clap::Args;
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

use textui::{Config, TerminalPlatform, Ui};

/// Run the interactive widget demo
#[derive(Debug, Default, Args)]
pub struct DemoCommand {}

impl DemoCommand {
    pub fn execute(&self, config: &Config) -> Result<i32> {
        info!("Starting demo");
        {
            let platform = TerminalPlatform::new(config.mouse_enabled)?;
            let mut ui = Ui::with_config(Box::new(platform), config);
            main_menu(&mut ui)?;
            ui.run_application()?;
        }
        info!("Demo finished");
        Ok(0)
    }
}

/// Menu window; each entry opens a demo window on top of it
pub fn main_menu(ui: &mut Ui) -> Result<()> {
    let menu = ui.create_window(15, 5, 50, 15, "Main menu")?;
    ui.add_label(menu, 5, 2, "Choose a demonstration:")?;
    ui.add_button(menu, 5, 5, 40, "1. Basic widgets", basic_widgets)?;
    ui.add_button(menu, 5, 8, 40, "2. Modal windows", modal_windows)?;
    ui.add_button(menu, 5, 11, 40, "Exit", |ui| {
        ui.exit_application();
        Ok(())
    })?;
    Ok(())
}

fn basic_widgets(ui: &mut Ui) -> Result<()> {
    debug!("Opening basic widgets demo");
    let window = ui.create_window(5, 3, 70, 20, "Basic widgets")?;

    ui.add_label(window, 5, 2, "An example of the textui toolkit")?;
    let name = ui.add_text_box(window, 5, 4, 30, "Enter your name")?;
    let details = ui.add_check_box(window, 5, 6, "Show details", false)?;
    let progress = ui.add_progress_bar(window, 5, 8, 30, 0.0)?;

    ui.add_button(window, 5, 10, 18, "Greeting", move |ui| {
        let name = ui
            .widget(name)
            .map(|field| field.content().trim().to_string())
            .unwrap_or_default();
        if name.is_empty() {
            return ui.show_message("Error", "Please enter your name");
        }

        ui.show_message("Greeting", &format!("Hello, {}!", name))?;
        if ui.widget(details).map(|check| check.is_checked()).unwrap_or(false) {
            ui.show_message("Details", "Windows, widgets and modal dialogs")?;
        }
        Ok(())
    })?;

    ui.add_button(window, 25, 10, 19, "Progress", move |ui| {
        let mut value = 0.0f32;
        while value < 1.0 {
            value += 0.05;
            if let Some(bar) = ui.widget_mut(progress) {
                bar.set_progress(value);
            }
            ui.refresh()?;
            thread::sleep(Duration::from_millis(100));
        }
        ui.show_message("Done", "Progress complete!")
    })?;

    ui.add_button(window, 46, 10, 20, "Confirm", |ui| {
        let confirmed = ui.show_confirm("Confirmation", "Are you sure you want to continue?")?;
        let text = if confirmed {
            "You confirmed the action"
        } else {
            "You cancelled the action"
        };
        ui.show_message("Result", text)
    })?;

    ui.add_button(window, 5, 13, 25, "Comment", |ui| {
        let comment = ui.show_input("Comment", "Enter your comment:", "Example comment")?;
        ui.show_message("Your comment", &comment)
    })?;

    ui.add_button(window, 35, 13, 25, "Exit", |ui| {
        if ui.show_confirm("Exit", "Do you really want to exit?")? {
            ui.exit_application();
        }
        Ok(())
    })?;

    ui.add_button(window, 5, 16, 25, "Back to menu", move |ui| ui.close_window(window))?;
    Ok(())
}

fn modal_windows(ui: &mut Ui) -> Result<()> {
    debug!("Opening modal windows demo");
    let window = ui.create_window(10, 5, 60, 15, "Modal windows")?;

    ui.add_label(window, 5, 2, "Dialogs stack on top of each other")?;

    ui.add_button(window, 5, 5, 25, "Message", |ui| {
        ui.show_message("Information", "A simple information window")
    })?;

    ui.add_button(window, 30, 5, 25, "Confirm", |ui| {
        let agreed = ui.show_confirm("Confirmation", "Do you accept the terms?")?;
        ui.show_message("Result", if agreed { "Accepted" } else { "Declined" })
    })?;

    ui.add_button(window, 5, 8, 25, "Input", |ui| {
        let input = ui.show_input("Data entry", "Type something:", "Default")?;
        ui.show_message("You entered", &input)
    })?;

    ui.add_button(window, 30, 8, 25, "Nested dialogs", |ui| {
        let first = ui.show_confirm("First dialog", "This is the first modal dialog")?;
        if first {
            let second = ui.show_confirm("Second dialog", "This is the second modal dialog")?;
            ui.show_message("Summary", &format!("Result: {}, {}", first, second))?;
        }
        Ok(())
    })?;

    ui.add_button(window, 20, 12, 20, "Main menu", move |ui| ui.close_window(window))?;
    Ok(())
}
