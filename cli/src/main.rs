mod cli;
mod commands;
mod output;

use bukurs_profile::{config, error::Result, store::SqliteProfileStore};
use clap::Parser;

fn main() -> Result<()> {
    let args = cli::Cli::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if args.debug {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    if args.version {
        println!("bukurs-profile {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let cfg = config::Config::load(args.config.as_deref());

    let db_path = match &args.db {
        Some(path) => path.clone(),
        None => cfg.database_path(),
    };
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut store = SqliteProfileStore::init(&db_path)?;

    cli::handle_args(args, &mut store, &cfg)
}
