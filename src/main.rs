use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, Level};

use videomaker::{
    composition::{RunOptions, SlideshowEngine},
    config::Config,
    slides::LatexRenderer,
};

#[derive(Parser)]
#[command(
    name = "videomaker",
    version,
    about = "Build a movie from title slides and pictures",
    long_about = "VideoMaker typesets opening and ending slides, orders and letterboxes your pictures, and encodes everything into a single movie with FFmpeg."
)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(required_unless_present = "print_default_config")]
    config: Option<PathBuf>,

    /// Directory to create temporary directories in
    #[arg(short, long)]
    tmp_dir: Option<PathBuf>,

    /// Directory to write the movie to (defaults to the current directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Verbose logging; temporary directories are kept for inspection
    #[arg(short, long)]
    debug: bool,

    /// Print a default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .init();

    if cli.print_default_config {
        print!("{}", Config::default().to_toml_string()?);
        return Ok(());
    }

    let Some(config_path) = cli.config else {
        anyhow::bail!("a configuration file is required");
    };

    info!("Starting VideoMaker v{}", env!("CARGO_PKG_VERSION"));
    info!("Loading configuration from {:?}", config_path);

    let mut config = Config::from_file(&config_path)
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    if let Some(dir) = config_path.parent() {
        config.resolve_relative_to(dir);
    }

    let output_dir = match cli.output_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("cannot determine the current directory")?,
    };

    let renderer = LatexRenderer::from_config(&config.slides, &config.tools);
    let engine = SlideshowEngine::new(config, Box::new(renderer)).with_options(RunOptions {
        temp_base: cli.tmp_dir,
        keep_temp: cli.debug,
        output_dir,
    });

    match engine.render().await {
        Ok(movie) => {
            info!("Movie written to {:?}", movie.path);
            Ok(())
        }
        Err(e) => {
            error!("{}", e);
            Err(anyhow::anyhow!(e.user_message()))
        }
    }
}
