//! Interactive session: one controller, one result store, many views.

use std::{
    io::Write as _,
    path::{Path, PathBuf},
};

use anyhow::Context;
use client_core::{RawSimulationInput, SubmissionController, SubmissionState};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::render::{render_summary, render_view, render_visualizations};

const HELP: &str = "\
Commands:
  submit <initial> <low|medium|high> <years>   run a simulation
  toggle                                       switch between table and graph
  export [dir]                                 write investment_simulation_results.csv
  visualize                                    line, pie and bar charts of the last result
  status                                       show the current state
  reset                                        go back to the form after a result
  help                                         show this message
  quit                                         leave the session
Press Ctrl-C while a simulation runs to cancel it.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Submit(RawSimulationInput),
    Toggle,
    Export(Option<PathBuf>),
    Visualize,
    Status,
    Reset,
    Help,
    Quit,
    Empty,
}

pub fn parse_command(line: &str) -> Result<ShellCommand, String> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Ok(ShellCommand::Empty);
    };
    let args: Vec<&str> = parts.collect();

    match (verb.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("submit", [initial, risk, years]) => Ok(ShellCommand::Submit(RawSimulationInput::new(
            *initial, *risk, *years,
        ))),
        ("submit", _) => Err("usage: submit <initial> <low|medium|high> <years>".to_string()),
        ("toggle", []) => Ok(ShellCommand::Toggle),
        ("export", []) => Ok(ShellCommand::Export(None)),
        ("export", [dir]) => Ok(ShellCommand::Export(Some(PathBuf::from(dir)))),
        ("visualize", []) => Ok(ShellCommand::Visualize),
        ("status", []) => Ok(ShellCommand::Status),
        ("reset", []) => Ok(ShellCommand::Reset),
        ("help", []) => Ok(ShellCommand::Help),
        ("quit" | "exit", []) => Ok(ShellCommand::Quit),
        _ => Err(format!("unrecognized command '{}'; type 'help'", line.trim())),
    }
}

pub async fn run_shell(
    mut controller: SubmissionController,
    default_export_dir: PathBuf,
) -> anyhow::Result<()> {
    let store = controller.store();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{HELP}");

    loop {
        print!("> ");
        std::io::stdout().flush().context("failed to flush stdout")?;

        let Some(line) = lines.next_line().await.context("failed to read stdin")? else {
            break;
        };

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };
        debug!(?command, "shell command");

        match command {
            ShellCommand::Submit(input) => match controller.submit(&input) {
                Ok(()) => {
                    println!("Simulating...");
                    let state = wait_or_cancel(&mut controller).await;
                    print_outcome(&controller, &state);
                }
                Err(err) => println!("{err}"),
            },
            ShellCommand::Toggle => match controller.toggle_view() {
                Some(_) => print_current_view(&controller),
                None => println!("No result on screen; submit a simulation first."),
            },
            ShellCommand::Export(dir) => {
                let dir = dir.unwrap_or_else(|| default_export_dir.clone());
                export(&controller, &dir);
            }
            ShellCommand::Visualize => match store.get() {
                Some(result) => print!("{}", render_visualizations(&result)),
                None => println!("No data available. Please run the simulation first."),
            },
            ShellCommand::Status => {
                println!(
                    "state: {}, view: {:?}",
                    controller.state().label(),
                    controller.view_mode()
                );
            }
            ShellCommand::Reset => {
                if controller.reset() {
                    println!("Ready for a new simulation.");
                } else {
                    println!("Nothing to reset.");
                }
            }
            ShellCommand::Help => println!("{HELP}"),
            ShellCommand::Quit => break,
            ShellCommand::Empty => {}
        }
    }

    Ok(())
}

/// Waits for the pending request; Ctrl-C abandons it instead.
pub async fn wait_or_cancel(controller: &mut SubmissionController) -> SubmissionState {
    let interrupted = tokio::select! {
        _ = controller.complete() => false,
        _ = tokio::signal::ctrl_c() => true,
    };
    if interrupted && controller.cancel() {
        println!("Simulation cancelled.");
    }
    controller.state()
}

pub fn print_outcome(controller: &SubmissionController, state: &SubmissionState) {
    match state {
        SubmissionState::Succeeded(result) => {
            print!("{}", render_summary(result));
            print_current_view(controller);
        }
        SubmissionState::Failed(err) => {
            println!("{}", err.user_message());
            println!("  ({err})");
        }
        _ => {}
    }
}

fn print_current_view(controller: &SubmissionController) {
    if let Some(view) = controller.current_view() {
        print!("{}", render_view(&view));
    }
}

fn export(controller: &SubmissionController, dir: &Path) {
    match controller
        .export_csv()
        .and_then(|export| export.write_to_dir(dir))
    {
        Ok(path) => println!("Saved {}", path.display()),
        Err(err) => println!("Export failed: {err}"),
    }
}
