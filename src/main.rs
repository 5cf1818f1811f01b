use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

use wayfarer::api::ApiClient;
use wayfarer::cli::{self, Cli};
use wayfarer::core::{load_config, resolve, SessionStore};
use wayfarer::store::Store;

#[tokio::main]
async fn main() {
    let args = Cli::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to wayfarer.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("wayfarer.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(2);
        }
    };
    let resolved = resolve(&config, args.api_url.as_deref());
    log::info!("Wayfarer starting up against {}", resolved.base_url);

    let store = Store::new(
        ApiClient::new(&resolved.base_url),
        SessionStore::new(&resolved.data_dir),
    );

    if let Err(message) = cli::run(&store, args.command).await {
        eprintln!("Error: {message}");
        std::process::exit(1);
    }
}
