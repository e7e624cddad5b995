use bhugo::config::{self, Config, Overrides};
use bhugo::convert::{ConvertSettings, Converter};
use bhugo::detect::ChangeDetector;
use bhugo::output;
use bhugo::source::{BearDatabase, NoteSource};
use bhugo::watch::{self, Watcher};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tokio::sync::broadcast;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "bhugo")]
#[command(about = "Publish Bear notes as Hugo posts")]
#[command(long_about = "\
Publish Bear notes as Hugo posts

Every note containing the root tag (#blog by default) is a post. The first
line of the note is its heading, the second its tags, the rest its body:

  # My Post
  #blog/rust #blog/long read#
  Body text...
  [image:7BD34BA7-.../photo.jpg]
  *Photo caption*

becomes content/blog/my-post.md with categories [\"Rust\", \"Long Read\"].
A tag containing \"draft\" marks the post as a draft.

Configuration comes from bhugo.toml, then BHUGO_* environment variables
(optionally from a .bhugo dotenv file), then the flags below. Run
'bhugo gen-config' for a documented config file.")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Dotenv file with BHUGO_* overrides
    #[arg(long, default_value = ".bhugo", global = true)]
    env_file: PathBuf,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Watch Bear and update posts as notes change
    Watch,
    /// Write every tagged note once, changed or not
    Sync,
    /// List tagged notes and what would be written, without writing
    Check,
    /// Print a stock bhugo.toml with all options documented
    GenConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    init_logging(cli.verbose)?;
    load_env_file(&cli.env_file)?;
    // Parse again so BHUGO_* values from the dotenv file reach the
    // env-backed flags.
    let cli = Cli::parse();
    warn_legacy_env();
    let config = config::load_config(cli.config.as_deref(), &cli.overrides)?;
    let source = BearDatabase::open(Path::new(&config.database))?;

    match cli.command {
        Command::Watch => {
            let converter = open_converter(&config)?;
            info!(marker = %config.tag_marker(), "watching Bear for changes");

            let (shutdown, _) = broadcast::channel(1);
            let running = Watcher::new(
                ChangeDetector::new(source, config.tag_marker()),
                converter,
                config.interval(),
            )
            .start(&shutdown);

            wait_for_signal().await?;
            let _ = shutdown.send(());
            running.wait().await;
            info!("bhugo exiting");
        }
        Command::Sync => {
            let converter = open_converter(&config)?;
            let report = watch::sync_all(&source, &config.tag_marker(), &converter)?;
            output::print_sync_output(&report, &config.content_path());
        }
        Command::Check => {
            let converter = Converter::new(ConvertSettings::from_config(&config));
            let notes: Vec<_> = source
                .tagged_notes(&config.tag_marker())?
                .into_iter()
                .map(|note| {
                    let post = converter.prepare(&note);
                    (note.title, post)
                })
                .collect();
            output::print_check_output(&config.tag_marker(), &notes);
        }
        Command::GenConfig => unreachable!("handled before config loading"),
    }

    Ok(())
}

fn init_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let default = if verbose { "bhugo=debug" } else { "bhugo=info" };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
    Ok(())
}

/// Load `BHUGO_*` variables from a dotenv file. A missing file is fine.
fn load_env_file(path: &Path) -> Result<(), dotenvy::Error> {
    match dotenvy::from_path(path) {
        Err(e) if e.not_found() => Ok(()),
        other => other,
    }
}

fn warn_legacy_env() {
    for (legacy, replacement) in config::legacy_env_vars(|name| std::env::var_os(name).is_some()) {
        warn!(variable = legacy, use_instead = replacement, "ignoring legacy environment variable");
    }
}

/// Converter for `watch` and `sync`; creates the content directory.
fn open_converter(config: &Config) -> std::io::Result<Converter> {
    std::fs::create_dir_all(config.content_path())?;
    Ok(Converter::new(ConvertSettings::from_config(config)))
}

#[cfg(unix)]
async fn wait_for_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};
    let mut term = signal(SignalKind::terminate())?;
    tokio::select! {
        res = tokio::signal::ctrl_c() => res?,
        _ = term.recv() => {}
    }
    info!("shutdown signal received");
    Ok(())
}

#[cfg(not(unix))]
async fn wait_for_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received");
    Ok(())
}
