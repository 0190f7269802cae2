use std::{
    fs::File,
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Mutex,
};

use clap::{Args, Parser, Subcommand};
use sort_visualiser_core::{
    menu_order, trace, AppConfig, ArrayGenerator, FrameRenderer, FrameSink, Session, SessionEnd,
    SoundBoard, ToneConfig, ToneCache, DEFAULT_ALGORITHM,
};
use tracing_subscriber::EnvFilter;

mod terminal;
#[cfg(feature = "audio")]
mod voices;

use terminal::{KeyboardInput, TerminalSurface};

fn main() -> sort_visualiser_core::Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => {
            let log_file = args
                .log_file
                .clone()
                .unwrap_or_else(|| std::env::temp_dir().join("sort-visualiser.log"));
            init_file_tracing(&log_file)?;
            run_live(&args)
        }
        Commands::List => {
            init_tracing();
            print_menu();
            Ok(ExitCode::SUCCESS)
        }
        Commands::Trace { settings, output } => {
            init_tracing();
            run_trace(&settings, output.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run_live(args: &RunArgs) -> sort_visualiser_core::Result<ExitCode> {
    let config = args.settings.resolve()?;
    let session = &config.session;
    tracing::info!(
        algorithm = %session.algorithm,
        size = session.size,
        max_value = session.max_value,
        delay_ms = session.delay_ms,
        unique = session.unique,
        "starting interactive run"
    );

    // Setup faults surface before the terminal is touched.
    let algorithm = sort_visualiser_core::Algorithm::lookup(&session.algorithm)?;
    let generator = ArrayGenerator::new(session)?;

    let sound = open_sound(&config.audio, args.no_audio);
    let windowed = args.windowed || config.display.windowed;
    let surface = TerminalSurface::open(!windowed)?;
    let sink = FrameSink::new(
        surface,
        KeyboardInput,
        sound,
        FrameRenderer::new(config.display.palette.clone()),
        algorithm.display_name(),
        session.delay_ms,
    );

    let mut visualiser = Session::with_parts(algorithm, generator, sink);
    let report = visualiser.run();
    // Restores the terminal before anything is printed.
    drop(visualiser);

    tracing::info!(
        runs = report.runs,
        restarts = report.restarts,
        completed = report.completed,
        "session finished"
    );
    match report.end {
        SessionEnd::Quit => {
            println!("Exiting Sorting Visualizer.");
            Ok(ExitCode::SUCCESS)
        }
        SessionEnd::Failed(err) => {
            eprintln!("sort-visualiser stopped after an unexpected error: {err}");
            Ok(ExitCode::FAILURE)
        }
    }
}

#[cfg(feature = "audio")]
fn open_sound(config: &ToneConfig, disabled: bool) -> SoundBoard {
    if disabled {
        tracing::info!("audio disabled on the command line");
        return SoundBoard::muted(config.clone());
    }
    match voices::RodioVoices::open(config.channels) {
        Ok(output) => SoundBoard::new(ToneCache::new(config.clone(), 1), Some(Box::new(output))),
        Err(err) => {
            tracing::warn!(%err, "audio unavailable, continuing without sound");
            SoundBoard::muted(config.clone())
        }
    }
}

#[cfg(not(feature = "audio"))]
fn open_sound(config: &ToneConfig, _disabled: bool) -> SoundBoard {
    tracing::info!("built without audio support");
    SoundBoard::new(ToneCache::new(config.clone(), 1), None)
}

fn print_menu() {
    println!("Available sorting algorithms:");
    for (position, algorithm) in menu_order().into_iter().enumerate() {
        let default = if algorithm.id == DEFAULT_ALGORITHM {
            " (default)"
        } else {
            ""
        };
        let worst = algorithm
            .worst
            .map(|worst| format!(", Worst: {worst}"))
            .unwrap_or_default();
        println!(
            "{:>3}. {:<16} (Avg: {}, Best: {}{worst}){default}",
            position + 1,
            algorithm.display_name(),
            algorithm.average,
            algorithm.best,
        );
    }
}

fn run_trace(settings: &SettingsArgs, output: Option<&Path>) -> sort_visualiser_core::Result<()> {
    let config = settings.resolve()?;
    tracing::info!(algorithm = %config.session.algorithm, ?output, "running headless trace");

    let report = trace(&config.session)?;
    let json = serde_json::to_string_pretty(&report)?;
    match output {
        Some(path) => std::fs::write(path, json)?,
        None => println!("{json}"),
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// The terminal belongs to the visualiser while it runs, so logs go to a file.
fn init_file_tracing(path: &Path) -> sort_visualiser_core::Result<()> {
    let file = File::create(path)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Sorting algorithm visualiser", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Animate a sorting algorithm in the terminal.
    Run(RunArgs),
    /// List the available algorithms with their complexity.
    List,
    /// Sort one generated array without a display and report the events as JSON.
    Trace {
        #[command(flatten)]
        settings: SettingsArgs,
        /// Write the report here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    #[command(flatten)]
    settings: SettingsArgs,
    /// Do not open an audio device.
    #[arg(long)]
    no_audio: bool,
    /// Start in windowed view instead of full screen.
    #[arg(long)]
    windowed: bool,
    /// Log file for the interactive run.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
struct SettingsArgs {
    /// Algorithm to visualise, e.g. `merge_sort` or `quick`.
    #[arg(short, long)]
    algorithm: Option<String>,
    /// Number of elements.
    #[arg(short, long)]
    size: Option<usize>,
    /// Largest element value.
    #[arg(short, long)]
    max_value: Option<u32>,
    /// Initial delay per event in milliseconds.
    #[arg(short, long)]
    delay: Option<u32>,
    /// Generate distinct elements only.
    #[arg(short, long)]
    unique: bool,
    /// Seed for a reproducible array.
    #[arg(long)]
    seed: Option<u64>,
    /// JSON configuration file; flags override its session settings.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl SettingsArgs {
    fn resolve(&self) -> sort_visualiser_core::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };

        let session = &mut config.session;
        if let Some(algorithm) = &self.algorithm {
            session.algorithm = algorithm.clone();
        }
        if let Some(size) = self.size {
            session.size = size;
        }
        if let Some(max_value) = self.max_value {
            session.max_value = max_value;
        }
        if let Some(delay) = self.delay {
            session.delay_ms = delay;
        }
        if self.unique {
            session.unique = true;
        }
        if self.seed.is_some() {
            session.seed = self.seed;
        }
        session.validate()?;
        Ok(config)
    }
}
