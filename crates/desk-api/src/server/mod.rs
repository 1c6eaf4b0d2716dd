//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use desk_common::{AppConfig, AppError, JwtService};
use desk_db::{
    create_pool, PgAuditRepository, PgDepartmentRepository, PgProjectRepository,
    PgTravelRequestRepository, PgUserRepository,
};
use desk_notify::{HubNotificationChannel, NotificationHub};
use desk_service::{PdfTicketRenderer, ServiceContextBuilder, SmtpMailSender};
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::apply_middleware;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let config = state.config().clone();
    let router = apply_middleware(
        create_router(),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    );
    // Health probes bypass rate limiting
    let router = router.merge(health_routes());
    router.with_state(state)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    // Create database pool
    info!("Connecting to PostgreSQL...");
    let db_config = desk_db::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        min_connections: config.database.min_connections,
        ..Default::default()
    };
    let pool = create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    // Create JWT service
    let jwt_service = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry,
        config.jwt.refresh_token_expiry,
    ));

    // Create repositories
    let travel_request_repo = Arc::new(PgTravelRequestRepository::new(pool.clone()));
    let user_repo = Arc::new(PgUserRepository::new(pool.clone()));
    let audit_repo = Arc::new(PgAuditRepository::new(pool.clone()));
    let department_repo = Arc::new(PgDepartmentRepository::new(pool.clone()));
    let project_repo = Arc::new(PgProjectRepository::new(pool.clone()));

    // Create the notification hub and its channel adapter
    let hub = NotificationHub::new_shared();
    let notification_channel = Arc::new(HubNotificationChannel::new(
        hub.clone(),
        user_repo.clone(),
    ));

    // Create mail sender and ticket renderer
    let mail_sender = Arc::new(SmtpMailSender::new(&config.smtp)?);
    let ticket_renderer = Arc::new(PdfTicketRenderer::new());

    // Build service context
    let service_context = ServiceContextBuilder::new()
        .travel_request_repo(travel_request_repo)
        .user_repo(user_repo)
        .audit_repo(audit_repo)
        .department_repo(department_repo)
        .project_repo(project_repo)
        .notification_channel(notification_channel)
        .ticket_renderer(ticket_renderer)
        .mail_sender(mail_sender)
        .jwt_service(jwt_service)
        .public_base_url(config.app.public_base_url.clone())
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, hub, pool, config))
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {}: {}", addr, e)))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {}", e)))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));

    // Create app state
    let state = create_app_state(config).await?;

    // Build application
    let app = create_app(state);

    // Run server
    run_server(app, addr).await
}
