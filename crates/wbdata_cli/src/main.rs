//! `wbdata` entry point.
//!
//! # Responsibility
//! - Parse configuration, start logging and open the store.
//! - Run the HTTP server or one-shot maintenance commands.

mod config;

use actix_web::{middleware, web, App, HttpServer};
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use config::{Cli, Command};
use log::info;
use wbdata_core::db::open_db;
use wbdata_core::{catalog, default_log_level, init_logging, CollectionService, WorldBankClient};

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Command::Catalog = cli.command {
        for code in catalog::codes() {
            println!("{code}");
        }
        return Ok(());
    }

    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    init_logging(level, cli.log_dir.as_deref()).map_err(|err| anyhow!(err))?;

    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open database `{}`", cli.db.display()))?;
    // The blocking client owns its own runtime; build it before actix starts.
    let client = WorldBankClient::new(&cli.upstream_config())?;
    let service = CollectionService::new(conn, client);

    match cli.command {
        Command::Serve { bind } => serve(service, &bind),
        Command::Import { indicator } => {
            let outcome = service.import_collection(&indicator)?;
            let state = if outcome.is_created() { "created" } else { "existing" };
            eprintln!("collection {} ({state})", outcome.collection().collection_id);
            println!("{}", serde_json::to_string_pretty(outcome.collection())?);
            Ok(())
        }
        Command::List => {
            let collections = service.list_collections()?;
            if collections.is_empty() {
                println!("{}", wbdata_http::EMPTY_COLLECTIONS_MESSAGE);
            }
            for collection in collections {
                println!(
                    "{}\t{}\t{}\t{}",
                    collection.collection_id,
                    collection.indicator,
                    collection.creation_time,
                    collection.location
                );
            }
            Ok(())
        }
        Command::Catalog => Ok(()),
    }
}

fn serve(service: CollectionService, bind: &str) -> Result<()> {
    let data = web::Data::new(service);
    let server_data = data.clone();
    info!("event=http_serve module=cli status=start bind={bind}");

    actix_web::rt::System::new()
        .block_on(async move {
            HttpServer::new(move || {
                App::new()
                    .app_data(server_data.clone())
                    .wrap(middleware::Logger::default())
                    .configure(wbdata_http::configure)
            })
            .bind(bind)?
            .run()
            .await
        })
        .with_context(|| format!("http server on `{bind}` failed"))?;

    info!("event=http_serve module=cli status=ok bind={bind}");
    // Last handle to the blocking client is released outside the runtime.
    drop(data);
    Ok(())
}
