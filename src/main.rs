// ErrLogView - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Configuration loading and logging initialisation
// 3. Text source selection
// 4. Running the requested queries and printing the last published result

use clap::Parser;
use errlogview::app::service::{LogService, ServiceConfig};
use errlogview::app::source::TextSource;
use errlogview::app::viewer::{LogViewer, LogsUpdate};
use errlogview::core::filter;
use errlogview::core::model::TypeMask;
use errlogview::platform::config::{self, AppConfig, PlatformPaths};
use errlogview::platform::console::{CommandSource, FileSource, StdinSource};
use errlogview::util::{self, error::ErrLogViewError};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

/// ErrLogView - control system error log viewer.
///
/// Retrieves the console error log, strips interleaved stderr fragments,
/// and prints the records of one program slot, newest first.
#[derive(Parser, Debug)]
#[command(name = "errlogview", version, about)]
struct Cli {
    /// Read a saved console reply instead of running the console command.
    #[arg(short = 'f', long = "file", conflicts_with_all = ["stdin", "command"])]
    file: Option<PathBuf>,

    /// Read the console reply from standard input.
    #[arg(long = "stdin", conflicts_with = "command")]
    stdin: bool,

    /// Console bridge program to run (its stdout is the console reply).
    #[arg(short = 'c', long = "command")]
    command: Option<String>,

    /// Arguments for the console bridge program.
    #[arg(long = "arg", allow_hyphen_values = true)]
    args: Vec<String>,

    /// Program slot to show (defaults to this installation's slot).
    #[arg(short = 'a', long = "app")]
    app: Option<u32>,

    /// This installation's program slot.
    #[arg(long = "own-app")]
    own_app: Option<u32>,

    /// Keep at most this many of the most recent entries.
    #[arg(short = 'n', long = "max-logs")]
    max_logs: Option<usize>,

    /// Severities to show: a mask (e.g. 24) or names (e.g. warning,error).
    #[arg(short = 't', long = "types")]
    types: Option<TypeMask>,

    /// Keep entries whose program starts with this (".exe" optional).
    #[arg(short = 'p', long = "program")]
    program: Option<String>,

    /// Keep entries whose message contains this text.
    #[arg(short = 'm', long = "message")]
    message: Option<String>,

    /// Show the severity of each entry.
    #[arg(long = "show-type")]
    show_type: bool,

    /// Show the program of each entry.
    #[arg(long = "show-program")]
    show_program: bool,

    /// Show the program slot of each entry.
    #[arg(long = "show-app")]
    show_app: bool,

    /// Show the timestamp of each entry.
    #[arg(long = "show-timestamp")]
    show_timestamp: bool,

    /// Print entries as JSON instead of formatted lines.
    #[arg(long = "json")]
    json: bool,

    /// Directory containing config.toml (defaults to the platform config dir).
    #[arg(long = "config")]
    config_dir: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    let config_dir = cli
        .config_dir
        .clone()
        .unwrap_or_else(|| PlatformPaths::resolve().config_dir);
    let (app_config, warnings) = config::load_config(&config_dir);

    util::logging::init(cli.debug, app_config.log_level.as_deref());
    for warning in &warnings {
        tracing::warn!("{}", warning);
    }

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "ErrLogView starting"
    );

    if let Err(e) = run(&cli, &app_config) {
        tracing::error!(error = %e, "ErrLogView failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli, app_config: &AppConfig) -> Result<(), ErrLogViewError> {
    let source = select_source(cli, app_config);

    let mut display = app_config.display;
    display.show_type |= cli.show_type;
    display.show_program |= cli.show_program;
    display.show_app_number |= cli.show_app;
    display.show_timestamp |= cli.show_timestamp;

    let service_config = ServiceConfig {
        own_app_number: cli.own_app.unwrap_or(app_config.own_app_number),
        max_logs: cli.max_logs.unwrap_or(app_config.max_logs),
        display,
    };
    let app_number = cli.app.unwrap_or(service_config.own_app_number);

    let mut viewer = LogViewer::new(LogService::new(service_config, source));
    let latest: Rc<RefCell<Option<LogsUpdate>>> = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&latest);
    viewer.set_logs_updated(move |update| *sink.borrow_mut() = Some(update.clone()));

    match cli.types {
        Some(mask) => viewer.get_logs_by_type_filter(app_number, mask),
        None => viewer.get_all_logs(app_number),
    }
    match (cli.program.as_deref(), cli.message.as_deref()) {
        (Some(prefix), None) => viewer.get_logs_by_program_filter(app_number, prefix),
        (None, Some(substring)) => viewer.get_logs_by_message_filter(app_number, substring),
        (Some(prefix), Some(substring)) => {
            // Each refinement starts from the cached result, so the message
            // filter is applied to the program filter's output here.
            viewer.get_logs_by_program_filter(app_number, prefix);
            if let Some(update) = latest.borrow_mut().as_mut() {
                update.entries = filter::filter_by_message(&update.entries, substring);
            }
        }
        (None, None) => {}
    }

    let update = latest.borrow_mut().take();
    if let Some(update) = update {
        print_update(&update, cli.json)?;
    }
    Ok(())
}

fn select_source(cli: &Cli, app_config: &AppConfig) -> Box<dyn TextSource> {
    if let Some(ref path) = cli.file {
        return Box::new(FileSource::new(path));
    }
    if cli.stdin {
        return Box::new(StdinSource::new());
    }
    if let Some(ref program) = cli.command {
        let args = if cli.args.is_empty() {
            app_config.source_args.clone()
        } else {
            cli.args.clone()
        };
        return Box::new(CommandSource::new(program, args));
    }
    if let Some(ref path) = app_config.source_file {
        return Box::new(FileSource::new(path));
    }
    if let Some(ref program) = app_config.source_command {
        return Box::new(CommandSource::new(program, app_config.source_args.clone()));
    }
    tracing::debug!("No source configured; reading console reply from stdin");
    Box::new(StdinSource::new())
}

fn print_update(update: &LogsUpdate, json: bool) -> Result<(), ErrLogViewError> {
    use std::io::Write;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let io_err = |source| ErrLogViewError::Output { source };

    if json {
        serde_json::to_writer_pretty(&mut out, &update.entries)
            .map_err(|source| ErrLogViewError::Json { source })?;
        writeln!(out).map_err(io_err)?;
    } else {
        for line in update.lines() {
            writeln!(out, "{line}").map_err(io_err)?;
        }
    }
    out.flush().map_err(io_err)
}
