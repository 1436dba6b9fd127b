// Health check endpoint for hosting platforms that probe `GET /`
// Runs on its own OS thread so the gateway runtime never waits on it

use axum::{extract::State, routing::get, Router};
use std::io;
use std::thread::{self, JoinHandle};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::utils::bot_name::BotName;

pub fn router(bot_name: BotName) -> Router {
    Router::new().route("/", get(home)).with_state(bot_name)
}

async fn home(State(bot_name): State<BotName>) -> String {
    format!("Bot {} is operational", bot_name.get())
}

/// Serve the health route on `0.0.0.0:port` from a background thread
pub fn spawn(port: u16, bot_name: BotName) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("health-check".into())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    error!("Failed to build health check runtime: {:?}", e);
                    return;
                }
            };

            runtime.block_on(async move {
                let listener = match TcpListener::bind(("0.0.0.0", port)).await {
                    Ok(listener) => listener,
                    Err(e) => {
                        error!("Failed to bind health check on port {}: {:?}", port, e);
                        return;
                    }
                };

                info!("🚀 Health check listening on port {}", port);
                if let Err(e) = axum::serve(listener, router(bot_name)).await {
                    error!("Health check server stopped: {:?}", e);
                }
            });
        })
}
