// ABOUTME: Server binary: parses flags, loads config, starts the HTTP API
// ABOUTME: All runtime configuration comes from the environment
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recall AI

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use recall_api::config::ServerConfig;
use recall_api::logging;
use recall_api::resources::ServerResources;
use recall_api::server::ApiServer;

#[derive(Parser)]
#[command(
    name = "recall-api-server",
    about = "Flashcard generation API server",
    version
)]
struct Args {
    /// Override the HTTP port from the environment
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(port) = args.port {
        config.http_port = port;
    }

    logging::init_from_env()?;
    info!("starting recall-api-server: {}", config.summary());
    info!(
        "endpoints: POST /api/generate, POST /api/save, POST /api/chat, \
         POST /api/delete-deck, GET /health, GET /ready"
    );

    let resources = Arc::new(ServerResources::new(config)?);
    ApiServer::new(resources).run().await?;
    Ok(())
}
