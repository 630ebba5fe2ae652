use std::io::{self, Stdout};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;
use weatherdash_core::{AppError, Config, DashboardState, ThemeStore};
use weatherdash_ui::commands::HELP;
use weatherdash_ui::{
    Command, DashboardController, DashboardServiceMessage, DashboardServices, TerminalView,
};
use weatherdash_weather::Location;

#[derive(Parser, Debug)]
#[command(name = "weatherdash")]
#[command(about = "Current conditions, hourly and 5-day forecasts in the terminal")]
struct Args {
    /// Config file (default: <config dir>/weatherdash/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// City to show on startup instead of the configured default
    #[arg(long)]
    city: Option<String>,

    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,

    /// Show the first forecast and exit
    #[arg(long)]
    once: bool,
}

type Controller = DashboardController<TerminalView<Stdout>>;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("weatherdash failed: {:#}", e);
            let err = AppError::from_anyhow(e);
            eprintln!("{}", err.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<ExitCode> {
    let (config, validation) = Config::load_validated(args.config.as_deref())?;

    let level = if args.verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    weatherdash_core::init_logging(level)?;
    for warning in &validation.warnings {
        tracing::warn!("Config warning: {}", warning);
    }
    tracing::info!("weatherdash starting, config in {}", config.config_dir.display());

    let themes = ThemeStore::new(&config.config_dir);
    let view = TerminalView::new(io::stdout(), themes.load());
    let services = DashboardServices::from_config(&config)?;
    let (mut controller, mut inbox) = DashboardController::new(
        view,
        services,
        Duration::from_secs(config.dashboard.error_display_secs),
    );

    let default = &config.dashboard.default_location;
    controller.start(
        args.city.as_deref(),
        Location::new(
            default.name.as_str(),
            default.country.as_str(),
            default.latitude,
            default.longitude,
        ),
    );

    if args.once {
        return run_once(&mut controller, &mut inbox).await;
    }

    controller.view_mut().print(HELP);
    run_interactive(&mut controller, &mut inbox, &themes).await?;
    Ok(ExitCode::SUCCESS)
}

/// Wait for the startup request to settle.
async fn run_once(
    controller: &mut Controller,
    inbox: &mut UnboundedReceiver<DashboardServiceMessage>,
) -> Result<ExitCode> {
    while controller.state().is_busy() {
        let Some(msg) = inbox.recv().await else {
            break;
        };
        controller.apply(msg);
    }
    if controller.state() == DashboardState::Ready {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

async fn run_interactive(
    controller: &mut Controller,
    inbox: &mut UnboundedReceiver<DashboardServiceMessage>,
    themes: &ThemeStore,
) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    tracing::info!("stdin closed, exiting");
                    return Ok(());
                };
                if !handle_line(controller, themes, &line) {
                    return Ok(());
                }
            }
            Some(msg) = inbox.recv() => controller.apply(msg),
        }
    }
}

/// Returns false when the user asked to quit.
fn handle_line(controller: &mut Controller, themes: &ThemeStore, line: &str) -> bool {
    let command = match Command::parse(line) {
        Ok(Some(command)) => command,
        Ok(None) => return true,
        Err(message) => {
            controller.view_mut().print(&format!("{}\n", message));
            return true;
        }
    };

    match command {
        Command::Search(query) => {
            controller.search(&query);
        }
        Command::Suggest(query) => controller.suggest(&query),
        Command::Pick(n) => {
            if !controller.pick(n - 1) {
                controller
                    .view_mut()
                    .print(&format!("No suggestion {}; run suggest first\n", n));
            }
        }
        Command::Locate => controller.locate(),
        Command::Theme => match themes.toggle() {
            Ok(theme) => {
                controller.view_mut().set_theme(theme);
                controller
                    .view_mut()
                    .print(&format!("Theme: {}\n", theme.as_str()));
                if let Some(view) = controller.view_model().cloned() {
                    let text =
                        weatherdash_ui::render::render_weather(&view, controller.view().theme());
                    controller.view_mut().print(&text);
                }
            }
            Err(e) => tracing::warn!("Failed to save theme: {:#}", e),
        },
        Command::Help => controller.view_mut().print(HELP),
        Command::Quit => return false,
    }
    true
}
