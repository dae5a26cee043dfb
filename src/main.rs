use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use midi_batch_transposer::config::DEFAULT_LOG_FILTER;
use midi_batch_transposer::{
    find_midi_files, load_config, print_failure_report, run_batch, spawn_stdin_handler, CancelToken, Config,
    ConfigError, ConsoleProgress, Interrupted, NoProgress, Progress, TransposeError,
};

#[derive(Parser)]
#[command(author, version, about = "Transpose midi files to other 11 keys", long_about = None)]
struct Cli {
    /// Directory of midi files to transpose, midi files will be searched for recursively
    #[arg(value_name = "MIDI_DIRECTORY")]
    directory: PathBuf,
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Input(#[from] TransposeError),
    #[error(transparent)]
    Interrupted(#[from] Interrupted),
}

/// Always exits 0. Problems are reported on the console, never through the
/// exit status.
fn main() {
    let cli = Cli::parse();

    let config = load_config();
    init_tracing(config.as_ref().map_or(DEFAULT_LOG_FILTER, |c| c.log_filter.as_str()));

    let result = config.map_err(AppError::from).and_then(|config| run(&cli, &config));
    match result {
        Ok(()) => {}
        Err(AppError::Interrupted(err)) => eprintln!("{}", err),
        Err(err) => error!("{}", err),
    }
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: &Cli, config: &Config) -> Result<(), AppError> {
    let shifts = config.shifts()?;
    let files = find_midi_files(&cli.directory)?;
    info!(
        directory = %cli.directory.display(),
        files = files.len(),
        shifts = ?shifts.iter().map(|s| s.semitones()).collect::<Vec<_>>(),
        "Starting transposition"
    );

    let cancel = CancelToken::new();
    if config.listen_stdin {
        // Left detached: a blocked stdin read must not hold up exit.
        let _ = spawn_stdin_handler(cancel.clone());
    }

    let choice = config.color.choice();
    let mut console;
    let mut quiet = NoProgress;
    let progress: &mut dyn Progress = if config.progress {
        console = ConsoleProgress::new(choice);
        &mut console
    } else {
        &mut quiet
    };

    let report = run_batch(&files, &shifts, &cancel, progress)?;
    print_failure_report(&report, choice);
    Ok(())
}
