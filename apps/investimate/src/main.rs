use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use client_core::{
    HttpSimulationClient, RawSimulationInput, ResultStore, SubmissionController, SubmissionState,
};
use shared::protocol::{parse_simulation_result, SimulateResponseBody};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod render;
mod shell;

use config::{load_settings, Settings, SettingsOverrides};

#[derive(Parser, Debug)]
#[command(name = "investimate", about = "Submit investment simulations and inspect the results")]
struct Args {
    /// Base URL of the simulation service.
    #[arg(long, global = true)]
    service_url: Option<String>,
    /// Request timeout in seconds; 0 disables it.
    #[arg(long, global = true)]
    timeout: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one simulation and print the result.
    Simulate {
        #[arg(long)]
        initial: String,
        #[arg(long)]
        risk: String,
        #[arg(long)]
        years: String,
        #[arg(long, value_enum, default_value_t = ViewArg::Table)]
        view: ViewArg,
        /// Directory to write investment_simulation_results.csv into.
        #[arg(long)]
        export: Option<PathBuf>,
        /// Print the raw result JSON instead of the rendered view.
        #[arg(long)]
        json: bool,
    },
    /// Render charts for a result JSON file without contacting the service.
    Visualize {
        #[arg(long)]
        input: PathBuf,
    },
    /// Interactive session.
    Shell {
        #[arg(long)]
        export_dir: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum ViewArg {
    Table,
    Graph,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let export_dir = match &args.command {
        Command::Shell { export_dir } => export_dir.clone(),
        _ => None,
    };
    let settings = load_settings(SettingsOverrides {
        service_url: args.service_url,
        request_timeout_secs: args.timeout,
        export_dir,
    })?;

    match args.command {
        Command::Simulate {
            initial,
            risk,
            years,
            view,
            export,
            json,
        } => {
            let input = RawSimulationInput::new(initial, risk, years);
            run_simulate(&settings, &input, view, export, json).await
        }
        Command::Visualize { input } => run_visualize(&input),
        Command::Shell { .. } => {
            info!(service_url = %settings.service_url, "starting interactive session");
            let controller = new_controller(&settings)?;
            shell::run_shell(controller, settings.export_dir.clone()).await
        }
    }
}

fn new_controller(settings: &Settings) -> Result<SubmissionController> {
    let client =
        HttpSimulationClient::with_timeout(settings.service_url.clone(), settings.request_timeout())
            .context("failed to create simulation client")?;
    Ok(SubmissionController::new(Arc::new(client), ResultStore::new()))
}

async fn run_simulate(
    settings: &Settings,
    input: &RawSimulationInput,
    view: ViewArg,
    export: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let mut controller = new_controller(settings)?;
    controller.submit(input)?;
    eprintln!("Simulating...");

    let state = shell::wait_or_cancel(&mut controller).await;
    match &state {
        SubmissionState::Succeeded(result) => {
            if json {
                let body = SimulateResponseBody::from(result.as_ref());
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                if view == ViewArg::Graph {
                    controller.toggle_view();
                }
                shell::print_outcome(&controller, &state);
            }

            if let Some(dir) = export {
                let path = controller.export_csv()?.write_to_dir(&dir)?;
                eprintln!("Saved {}", path.display());
            }
            Ok(())
        }
        SubmissionState::Failed(err) => {
            bail!("{} ({err})", err.user_message())
        }
        _ => bail!("simulation cancelled"),
    }
}

fn run_visualize(input: &Path) -> Result<()> {
    let bytes = std::fs::read(input)
        .with_context(|| format!("failed to read result file '{}'", input.display()))?;
    let result = parse_simulation_result(&bytes)
        .with_context(|| format!("'{}' is not a simulation result", input.display()))?;
    print!("{}", render::render_visualizations(&result));
    Ok(())
}
