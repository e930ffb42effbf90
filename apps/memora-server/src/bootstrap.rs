use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::{middleware::from_fn, routing::get, Router};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};
use url::Url;
use uuid::Uuid;

use runtime::AppConfig;

use crate::{openapi, request_id, web};

/// Adapter exposing accounts personalization to the guides module; the
/// in-process equivalent of a cross-module client.
struct AccountsProfileSource {
    accounts: Arc<accounts::domain::service::Service>,
}

#[async_trait]
impl guides::domain::ports::ProfileSource for AccountsProfileSource {
    async fn personalization(
        &self,
        user_id: Uuid,
    ) -> anyhow::Result<Option<guides::contract::model::Personalization>> {
        match self.accounts.profile(user_id).await {
            Ok(p) => Ok(Some(guides::contract::model::Personalization {
                relation_to_patient: p.relation_to_patient,
                main_challenges: p.main_challenges,
                help_needs: p.help_needs,
            })),
            Err(accounts::domain::error::DomainError::UserNotFound { .. }) => Ok(None),
            Err(e) => Err(anyhow::anyhow!("profile lookup failed: {}", e)),
        }
    }
}

async fn connect_database(config: &AppConfig) -> Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(config.database.url.clone());
    opts.max_connections(config.database.max_conns)
        .acquire_timeout(Duration::from_secs(5));

    tracing::info!("Connecting to database");
    let conn = Database::connect(opts)
        .await
        .context("database connect failed")?;
    Ok(conn)
}

async fn run_migrations(conn: &DatabaseConnection) -> Result<()> {
    tracing::info!("Running database migrations");
    accounts::infra::storage::migrations::Migrator::up(conn, None)
        .await
        .context("accounts migrations failed")?;
    planner::infra::storage::migrations::Migrator::up(conn, None)
        .await
        .context("planner migrations failed")?;
    feedback::storage::Migrator::up(conn, None)
        .await
        .context("feedback migrations failed")?;
    Ok(())
}

fn parse_base_url(name: &str, value: &str) -> Result<Url> {
    Url::parse(value).with_context(|| format!("Invalid {}: '{}'", name, value))
}

/// Wire every module and build the application router.
pub fn build_router(config: &AppConfig, conn: DatabaseConnection) -> Result<Router> {
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .context("reqwest client build failed")?;

    // Accounts: repository + external service adapters.
    let accounts_repo = Arc::new(accounts::infra::storage::repo::SeaOrmAccountsRepository::new(
        conn.clone(),
    ));
    let identity = Arc::new(accounts::infra::http::HttpIdentityProvider::new(
        http.clone(),
        parse_base_url("identity.base_url", &config.identity.base_url)?,
        config.identity.api_key.clone(),
    ));
    let mirror: Arc<dyn accounts::domain::ports::ProfileMirror> =
        if config.mirror.enabled && !config.mirror.base_url.is_empty() {
            Arc::new(accounts::infra::http::HttpProfileMirror::new(
                http.clone(),
                parse_base_url("mirror.base_url", &config.mirror.base_url)?,
                config.mirror.api_key.clone(),
            ))
        } else {
            Arc::new(accounts::infra::http::NoopProfileMirror)
        };
    let objects = Arc::new(accounts::infra::http::HttpObjectStore::new(
        http.clone(),
        parse_base_url("storage.base_url", &config.storage.base_url)?,
        config.storage.api_key.clone(),
        config.storage.bucket.clone(),
    ));
    let mailer = Arc::new(accounts::infra::http::HttpMailer::new(
        http.clone(),
        parse_base_url("email.base_url", &config.email.base_url)?,
        config.email.api_key.clone(),
        config.email.from.clone(),
    ));
    let accounts_config = accounts::config::AccountsConfig {
        signed_url_ttl_sec: config.storage.signed_url_ttl_sec,
        ..Default::default()
    };
    let accounts_service = Arc::new(accounts::domain::service::Service::new(
        accounts_repo,
        identity,
        mirror,
        objects,
        mailer,
        accounts_config,
    ));

    // Planner.
    let planner_repo = Arc::new(planner::infra::storage::repo::SeaOrmPlannerRepository::new(
        conn.clone(),
    ));
    let planner_service = Arc::new(planner::domain::service::Service::new(planner_repo));

    // Guides: CMS adapter + in-process profile source.
    let content = Arc::new(guides::infra::http::HttpContentSource::new(
        http.clone(),
        parse_base_url("cms.base_url", &config.cms.base_url)?,
        config.cms.api_key.clone(),
    ));
    let profile_source = Arc::new(AccountsProfileSource {
        accounts: accounts_service.clone(),
    });
    let guides_service = Arc::new(guides::domain::service::Service::new(
        content,
        profile_source,
    ));

    // Feedback.
    let feedback_repo = Arc::new(feedback::storage::SeaOrmFeedbackRepository::new(conn));
    let feedback_service = Arc::new(feedback::domain::Service::new(feedback_repo));

    let mut router = Router::new()
        .route("/health", get(web::health_check))
        .route("/openapi.json", get(openapi::openapi_json))
        .route("/docs", get(web::serve_docs))
        .merge(accounts::api::rest::routes::router(accounts_service))
        .merge(planner::api::rest::routes::router(planner_service))
        .merge(guides::api::rest::routes::router(guides_service))
        .merge(feedback::api::router(feedback_service));

    // Middleware order (outermost to innermost):
    // PropagateRequestId -> SetRequestId -> push_req_id_to_extensions ->
    // Trace -> Timeout -> CORS -> BodyLimit
    let x_request_id = request_id::header();
    router = router.layer(PropagateRequestIdLayer::new(x_request_id.clone()));
    router = router.layer(SetRequestIdLayer::new(
        x_request_id,
        request_id::MakeReqId,
    ));
    router = router.layer(from_fn(request_id::push_req_id_to_extensions));
    router = router.layer(request_id::create_trace_layer());

    let timeout = match config.server.timeout_sec {
        0 => Duration::from_secs(30),
        secs => Duration::from_secs(secs),
    };
    router = router.layer(TimeoutLayer::new(timeout));
    router = router.layer(CorsLayer::permissive());
    router = router.layer(RequestBodyLimitLayer::new(16 * 1024 * 1024));

    Ok(router)
}

/// Bind, serve, and shut down gracefully on SIGINT.
pub async fn run_server(config: AppConfig) -> Result<()> {
    let conn = connect_database(&config).await?;
    run_migrations(&conn).await?;

    let router = build_router(&config, conn)?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid bind address: {}", e))?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP server bound on {}", addr);

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutdown signal received");
                cancel.cancel();
            }
        });
    }

    let shutdown = async move {
        cancel.cancelled().await;
        tracing::info!("HTTP server shutting down gracefully");
    };

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| anyhow::anyhow!(e))
}
