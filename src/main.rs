use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use ratatui::crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use ratatui::crossterm::execute;
use tracing::{error, info};
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod controller;
mod domain;
mod export;
mod filter;
mod inputter;
mod model;
mod selection;
mod sheet;
mod ui;

use controller::Controller;
use domain::{SvConfig, SvError};
use model::{Model, Status};
use ui::TableUi;

#[derive(Parser, Debug)]
#[command(
    name = "sv",
    version,
    about = "A tui based spreadsheet viewer with null-check row filtering and export."
)]
struct Args {
    /// Spreadsheet (.xlsx) or CSV file to view
    path: String,

    /// Log file location
    #[arg(long, default_value = "sv.log")]
    log_file: String,

    /// Event poll time in milliseconds
    #[arg(long, default_value_t = 100)]
    event_poll_time: u64,

    /// Maximum render width of a single column
    #[arg(long, default_value_t = 80)]
    max_column_width: usize,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Err(e) => {
            ratatui::restore();
            eprintln!("Error: {:?}", e);
            ExitCode::FAILURE
        }
        Ok(_) => {
            ratatui::restore();
            ExitCode::SUCCESS
        }
    }
}

// The terminal is owned by the UI, so logs go to a file.
fn init_logging(log_file: &str) -> Result<(), SvError> {
    let file = std::fs::File::create(log_file)?;
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_writer(Arc::new(file)).with_ansi(false))
        .with(ErrorLayer::default())
        .init();
    Ok(())
}

fn run(args: &Args) -> Result<(), SvError> {
    init_logging(&args.log_file)?;
    info!("Starting sv!");

    let path: PathBuf = shellexpand::full(&args.path)
        .map_err(|e| SvError::LoadingFailed(e.to_string()))?
        .into_owned()
        .into();

    let config = SvConfig {
        event_poll_time: args.event_poll_time,
        max_column_width: args.max_column_width,
    };

    let mut terminal = ratatui::init();
    execute!(io::stdout(), EnableMouseCapture)?;
    let size = terminal.size()?;

    let mut model = Model::init(&config, size.width as usize, size.height as usize);
    // A failed load is logged and swallowed; the viewer starts empty.
    if let Err(e) = model.load_data_file(path.clone()) {
        error!("Error loading {:?}: {:?}", path, e);
    }

    let controller = Controller::new(&config);
    let ui = TableUi::new();

    while model.status != Status::QUITTING {
        // Render the current view
        terminal.draw(|f| ui.draw(model.get_uidata(), f))?;

        // Handle events and map to a Message
        if let Some(message) = controller.handle_event(&model)? {
            model.update(message)?;
        }
    }

    let _ = execute!(io::stdout(), DisableMouseCapture);
    Ok(())
}
