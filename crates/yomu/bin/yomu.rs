#[macro_use]
extern crate log;

use std::sync::Arc;

use clap::Parser;
use tokio::io::{BufReader, stdin, stdout};
use yomu::{
    context::Context,
    infrastructure::{config::Config, database, store::SqliteStore},
    presentation::shell::Shell,
};
use yomu_catalog::mangadex::MangaDex;

#[derive(Parser)]
struct Opts {
    /// Path to config file
    #[clap(long)]
    config: Option<String>,
}

fn init_logger() {
    let mut builder = env_logger::Builder::from_default_env();
    if std::env::var("RUST_LOG").is_err() {
        if let Ok(yomu_log) = std::env::var("YOMU_LOG") {
            builder.parse_filters(&format!("yomu={yomu_log},yomu_catalog={yomu_log}"));
        }
    }
    builder.init();
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    init_logger();
    info!(
        "yomu {} (lib {})",
        env!("CARGO_PKG_VERSION"),
        yomu_lib::LIB_VERSION
    );

    let opts: Opts = Opts::parse();
    let config = Config::open(opts.config)?;

    debug!("config: {:?}", config);

    let pool = database::establish_connection(&config.database_path, config.create_database).await?;
    let store = SqliteStore::new(pool);

    let catalog = MangaDex::with_urls(&config.api_url, &config.auth_url, &config.uploads_url)?
        .cover_size(config.cover_size);

    let ctx = Context::new(store, Arc::new(catalog), config.settings());

    let mut shell = Shell::new(ctx);
    shell.run(BufReader::new(stdin()), stdout()).await?;

    info!("bye");

    Ok(())
}
