//! SkinGuard HTTP server.
//!
//! Loads the model once, then serves `POST /predict` and `GET /health`.
//! A model that cannot be loaded aborts startup.

mod config;
mod routes;

use std::sync::Arc;

use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use clap::Parser;

use skinguard_core::{Classifier, ModelOptions};

use config::Config;
use routes::AppState;

#[actix_web::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = Config::parse();

    std::fs::create_dir_all(&config.upload_dir)
        .with_context(|| format!("cannot create upload dir {}", config.upload_dir.display()))?;

    log::info!("loading model from {}", config.model.display());
    let options = ModelOptions {
        intra_threads: config.intra_threads,
    };
    let classifier = Classifier::load(&config.model, &options)
        .with_context(|| format!("refusing to serve without a model ({})", config.model.display()))?;

    let state = web::Data::new(AppState {
        classifier: Arc::new(classifier),
        upload_dir: config.upload_dir.clone(),
        inference_timeout: config.inference_timeout(),
    });

    log::info!("listening on {}:{}", config.host, config.port);
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))
    .with_context(|| format!("cannot bind {}:{}", config.host, config.port))?
    .run()
    .await?;

    Ok(())
}
