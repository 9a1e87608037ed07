//! # praxis: Practice Management Backend
//!
//! `praxis` is the backend for a multi-tenant practice management platform
//! for professional-services firms. It exposes a RESTful API covering the
//! full client lifecycle: CRM (clients, contacts, deals), documents
//! (proposals and contracts with a send/sign lifecycle), delivery
//! (engagements and projects), finance (invoices, bills, vendors), and
//! messaging (threads and messages).
//!
//! ## Tenancy
//!
//! Every account belongs to an organization, created lazily on first
//! authenticated request. All business data carries an `organization_id`
//! stamped from the session, never from the request body, and every query
//! filters by it. A record in another tenant is indistinguishable from a
//! record that does not exist: item requests return `404` and listings
//! omit it.
//!
//! The filter is enforced structurally. Repositories implement
//! [`db::handlers::ScopedRepository`], whose methods all require an
//! [`OrganizationId`](types::OrganizationId), so a handler cannot reach
//! the database without saying which tenant it is acting for.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use praxis::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = praxis::config::Args::parse();
//!     let config = Config::load(args.config.as_deref())?;
//!     config.validate()?;
//!
//!     praxis::telemetry::init_telemetry()?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Database Setup
//!
//! The application requires PostgreSQL and runs migrations on startup:
//!
//! ```no_run
//! # use sqlx::PgPool;
//! # async fn example(pool: PgPool) -> Result<(), sqlx::migrate::MigrateError> {
//! praxis::migrator().run(&pool).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
mod openapi;
pub mod telemetry;
pub mod types;

#[cfg(test)]
pub mod test_utils;

use crate::config::CorsOrigin;
use crate::openapi::ApiDoc;
use axum::http::HeaderValue;
use axum::{
    Router, http,
    routing::{delete, get, patch, post},
};
use bon::Builder;
pub use config::Config;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

/// Application state shared across all request handlers.
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
}

/// Get the praxis database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let mut origins = Vec::new();
    for origin in &config.cors.allowed_origins {
        let header_value = match origin {
            CorsOrigin::Wildcard => "*".parse::<HeaderValue>()?,
            CorsOrigin::Url(url) => url.as_str().trim_end_matches('/').parse::<HeaderValue>()?,
        };
        origins.push(header_value);
    }

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            http::Method::GET,
            http::Method::POST,
            http::Method::PATCH,
            http::Method::DELETE,
        ])
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_credentials(true))
}

/// Build the application router with all endpoints and middleware.
#[instrument(skip_all)]
pub fn build_router(state: &AppState) -> anyhow::Result<Router> {
    let api_routes = Router::new()
        // Authentication and session management
        .route("/auth/register", post(api::handlers::auth::register))
        .route("/auth/login", post(api::handlers::auth::login))
        .route("/auth/logout", post(api::handlers::auth::logout))
        .route("/auth/user", get(api::handlers::auth::current_user))
        // CRM
        .route("/clients", get(api::handlers::clients::list_clients))
        .route("/clients", post(api::handlers::clients::create_client))
        .route("/clients/{id}", get(api::handlers::clients::get_client))
        .route("/clients/{id}", patch(api::handlers::clients::update_client))
        .route("/clients/{id}", delete(api::handlers::clients::delete_client))
        .route("/contacts", get(api::handlers::contacts::list_contacts))
        .route("/contacts", post(api::handlers::contacts::create_contact))
        .route("/contacts/{id}", get(api::handlers::contacts::get_contact))
        .route("/contacts/{id}", patch(api::handlers::contacts::update_contact))
        .route("/contacts/{id}", delete(api::handlers::contacts::delete_contact))
        .route("/deals", get(api::handlers::deals::list_deals))
        .route("/deals", post(api::handlers::deals::create_deal))
        .route("/deals/{id}", get(api::handlers::deals::get_deal))
        .route("/deals/{id}", patch(api::handlers::deals::update_deal))
        .route("/deals/{id}", delete(api::handlers::deals::delete_deal))
        // Documents
        .route("/proposals", get(api::handlers::proposals::list_proposals))
        .route("/proposals", post(api::handlers::proposals::create_proposal))
        .route("/proposals/{id}", get(api::handlers::proposals::get_proposal))
        .route("/proposals/{id}", patch(api::handlers::proposals::update_proposal))
        .route("/proposals/{id}", delete(api::handlers::proposals::delete_proposal))
        .route("/proposals/{id}/send", post(api::handlers::proposals::send_proposal))
        .route("/proposals/{id}/sign", post(api::handlers::proposals::sign_proposal))
        .route("/contracts", get(api::handlers::contracts::list_contracts))
        .route("/contracts", post(api::handlers::contracts::create_contract))
        .route("/contracts/{id}", get(api::handlers::contracts::get_contract))
        .route("/contracts/{id}", patch(api::handlers::contracts::update_contract))
        .route("/contracts/{id}", delete(api::handlers::contracts::delete_contract))
        .route("/contracts/{id}/send", post(api::handlers::contracts::send_contract))
        .route("/contracts/{id}/sign", post(api::handlers::contracts::sign_contract))
        // Delivery
        .route("/engagements", get(api::handlers::engagements::list_engagements))
        .route("/engagements", post(api::handlers::engagements::create_engagement))
        .route("/engagements/{id}", get(api::handlers::engagements::get_engagement))
        .route("/engagements/{id}", patch(api::handlers::engagements::update_engagement))
        .route("/engagements/{id}", delete(api::handlers::engagements::delete_engagement))
        .route("/projects", get(api::handlers::projects::list_projects))
        .route("/projects", post(api::handlers::projects::create_project))
        .route("/projects/{id}", get(api::handlers::projects::get_project))
        .route("/projects/{id}", patch(api::handlers::projects::update_project))
        .route("/projects/{id}", delete(api::handlers::projects::delete_project))
        // Finance
        .route("/vendors", get(api::handlers::vendors::list_vendors))
        .route("/vendors", post(api::handlers::vendors::create_vendor))
        .route("/invoices", get(api::handlers::invoices::list_invoices))
        .route("/invoices", post(api::handlers::invoices::create_invoice))
        .route("/invoices/{id}", get(api::handlers::invoices::get_invoice))
        .route("/invoices/{id}", patch(api::handlers::invoices::update_invoice))
        .route("/invoices/{id}", delete(api::handlers::invoices::delete_invoice))
        .route("/invoices/{id}/send", post(api::handlers::invoices::send_invoice))
        .route("/invoices/{id}/mark-paid", post(api::handlers::invoices::mark_invoice_paid))
        .route("/bills", get(api::handlers::bills::list_bills))
        .route("/bills", post(api::handlers::bills::create_bill))
        .route("/bills/{id}", get(api::handlers::bills::get_bill))
        .route("/bills/{id}", patch(api::handlers::bills::update_bill))
        .route("/bills/{id}", delete(api::handlers::bills::delete_bill))
        .route("/bills/{id}/approve", post(api::handlers::bills::approve_bill))
        .route("/bills/{id}/reject", post(api::handlers::bills::reject_bill))
        .route("/bills/{id}/mark-paid", post(api::handlers::bills::mark_bill_paid))
        // Messaging
        .route("/threads", get(api::handlers::threads::list_threads))
        .route("/threads", post(api::handlers::threads::create_thread))
        .route("/threads/{id}", get(api::handlers::threads::get_thread))
        .route("/threads/{id}/messages", get(api::handlers::threads::list_messages))
        .route("/threads/{id}/messages", post(api::handlers::threads::create_message))
        .with_state(state.clone());

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .nest("/api", api_routes)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    let cors_layer = create_cors_layer(&state.config)?;

    Ok(router.layer(cors_layer).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    ))
}

/// Main application struct that owns all resources and lifecycle.
///
/// 1. **Create**: [`Application::new`] connects to the database, runs
///    migrations, and builds the router
/// 2. **Serve**: [`Application::serve`] binds a TCP port and handles
///    requests until the shutdown future resolves
pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let url = config
            .database
            .url
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("no database url configured"))?;

        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.database.pool.max_connections)
            .min_connections(config.database.pool.min_connections)
            .acquire_timeout(config.database.pool.acquire_timeout)
            .connect(url)
            .await?;
        migrator().run(&pool).await?;

        let state = AppState::builder().db(pool.clone()).config(config.clone()).build();
        let router = build_router(&state)?;

        Ok(Self {
            router,
            config,
            pool,
        })
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!("praxis listening on http://{bind_addr}");

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Closing database connections...");
        self.pool.close().await;

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::test_utils::create_test_app;
    use sqlx::PgPool;

    #[test_log::test(sqlx::test)]
    async fn test_healthz(pool: PgPool) {
        let server = create_test_app(pool).await;
        let response = server.get("/healthz").await;
        response.assert_status_ok();
        assert_eq!(response.text(), "OK");
    }

    #[test_log::test(sqlx::test)]
    async fn test_docs_served(pool: PgPool) {
        let server = create_test_app(pool).await;
        server.get("/docs").await.assert_status_ok();
    }
}
