use crate::app::App;
use crate::config::{AppConfig, LogFormat};
use crate::db::init_db;
use crate::router::dispatch;
use astra::Server;
use std::net::SocketAddr;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod app;
mod auth;
mod config;
mod db;
mod domain;
mod errors;
mod intake;
mod ledger;
mod mailer;
mod requisitions;
mod responses;
mod router;
mod spreadsheets;
mod templates;

#[cfg(test)]
mod tests;

fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    match config.logging.format {
        LogFormat::Compact => {
            tracing_subscriber::fmt().with_target(false).with_env_filter(filter).compact().init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::fmt().with_target(false).with_env_filter(filter).pretty().init();
        }
        LogFormat::Json => {
            tracing_subscriber::fmt().with_target(false).with_env_filter(filter).json().init();
        }
    }
}

fn main() {
    dotenvy::dotenv().ok();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            std::process::exit(1);
        }
    };
    init_logging(&config);

    let addr: SocketAddr = match config.server.bind_address.parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!(address = %config.server.bind_address, error = %e, "invalid bind address");
            std::process::exit(1);
        }
    };
    let max_workers = config.server.max_workers;

    let mailer = App::mailer_from_config(&config);
    let app = match App::new(config, mailer) {
        Ok(app) => app,
        Err(e) => {
            error!(error = %e, "could not build application state");
            std::process::exit(1);
        }
    };

    if let Err(e) = init_db(&app.db) {
        error!(error = %e, "database initialization failed");
        std::process::exit(1);
    }

    info!(%addr, max_workers, base_url = %app.config.server.public_base_url, "starting server");

    let server = Server::bind(&addr).max_workers(max_workers);
    let result = server.serve(move |req, _info| dispatch(req, &app));

    if let Err(e) = result {
        error!(error = %e, "server ended with error");
    }

    info!("server shut down");
}
