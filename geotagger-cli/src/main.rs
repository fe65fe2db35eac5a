//! Geotagger CLI - Command-line interface
//!
//! Stamps a map of where each photo was taken into the photo's
//! bottom-right corner and saves the result as `<name>_map.<ext>`.

mod cli;
mod error;
mod runner;

use clap::Parser;
use geotagger::cache::TileCache;
use geotagger::compose::MapComposer;
use geotagger::config::ConfigFile;
use geotagger::logging::{default_log_file, init_logging, LoggingGuard};
use geotagger::photo::PhotoAnnotator;
use geotagger::provider::{OsmTileFetcher, ReqwestClient};
use tracing::info;

use cli::Args;
use error::CliError;

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        e.exit();
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let config = match &args.config {
        Some(path) => ConfigFile::load_from(path)?,
        None => ConfigFile::load()?,
    };

    let _logging_guard: LoggingGuard =
        init_logging(&config.logging.directory, default_log_file())
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;
    info!("Geotagger v{}", env!("CARGO_PKG_VERSION"));

    let files = runner::expand_patterns(&args.files);
    if files.is_empty() {
        println!("No files found");
        return Ok(());
    }

    let map = args.map_defaults(&config);
    let http_client = ReqwestClient::with_settings(&config.tiles.user_agent, config.tiles.timeout)
        .map_err(CliError::HttpClient)?;
    let fetcher = OsmTileFetcher::with_url_template(http_client, config.tiles.url.clone());
    let composer = MapComposer::new(TileCache::new(fetcher), args.parallel_fetches(&config))
        .map_err(CliError::Composer)?;
    let annotator = PhotoAnnotator::new(composer, map.to_map_settings());

    info!(
        files = files.len(),
        zoom = map.zoom,
        area = map.area,
        scale = map.scale,
        "Annotating photos"
    );
    let summary = runner::run_batch(&annotator, &files);

    info!(cache = %annotator.composer().cache().stats(), "Tile cache");
    println!("{}", summary);
    Ok(())
}
