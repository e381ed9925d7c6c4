mod handlers;
mod router;

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::info;

use crate::core::engine::Engine;
use crate::core::lifecycle::LifecycleComponent;

pub use router::build_api_router;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) engine: Arc<Engine>,
}

pub struct ApiServer {
    engine: Arc<Engine>,
    bind_addr: String,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl ApiServer {
    pub fn new(engine: Arc<Engine>, bind_addr: String) -> Self {
        Self {
            engine,
            bind_addr,
            shutdown_tx: None,
            task: None,
        }
    }
}

#[async_trait]
impl LifecycleComponent for ApiServer {
    async fn on_init(&mut self) -> Result<()> {
        info!("API Server Interface initializing...");
        Ok(())
    }

    async fn on_start(&mut self) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(&self.bind_addr)
            .await
            .with_context(|| format!("Failed to bind {}", self.bind_addr))?;
        let app = build_api_router(AppState {
            engine: self.engine.clone(),
        });
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        self.shutdown_tx = Some(shutdown_tx);

        let addr = self.bind_addr.clone();
        self.task = Some(tokio::spawn(async move {
            info!("API Server running at http://{addr}");
            let serve = axum::serve(listener, app).with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            });
            if let Err(e) = serve.await {
                tracing::error!("API Server crashed: {}", e);
            }
        }));
        Ok(())
    }

    async fn on_shutdown(&mut self) -> Result<()> {
        info!("API Server Interface shutting down...");
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            task.await.context("API Server task panicked")?;
        }
        Ok(())
    }
}
