use anyhow::Result;
use log::info;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::handlers::AppState;
use crate::api::routes::create_router;
use crate::config::AppConfig;
use crate::database;
use crate::services::draw::DrawService;
use crate::services::progression::ProgressionService;
use crate::services::reports::ReportService;
use crate::workflow::LogNotifier;

pub struct ServerService {
    port: u16,
    config: AppConfig,
}

impl ServerService {
    pub fn new(port: u16, config: AppConfig) -> Self {
        Self { port, config }
    }

    pub async fn run(&self) -> Result<()> {
        let pool = database::create_pool(&self.config.database.path)?;
        {
            let conn = database::get_connection(&pool)?;
            database::setup::ensure_schema(&conn)?;
        }

        let state = Arc::new(AppState {
            reports: ReportService::new(pool.clone(), &self.config, Arc::new(LogNotifier))?,
            draw: DrawService::new(pool.clone(), self.config.bracket.clone()),
            progression: ProgressionService::new(pool.clone(), self.config.bracket.clone()),
            pool,
        });

        let app = create_router(state)
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive());

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        info!("Server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
