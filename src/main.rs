use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::MatchedPath;
use dotenvy::dotenv;
use http::HeaderValue;
use tokio::task::JoinHandle;
use tokio::time::{Duration, sleep};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use docs_api::application::ports::document_repository::DocumentRepository;
use docs_api::application::ports::user_repository::UserRepository;
use docs_api::application::use_cases::documents::reconcile_ownership::ReconcileOwnership;
use docs_api::bootstrap::app_context::{AppContext, AppServices};
use docs_api::bootstrap::config::{Config, StoreBackend};
use docs_api::infrastructure::db::PgPool;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
        paths(
            docs_api::presentation::http::auth::register,
            docs_api::presentation::http::auth::login,
            docs_api::presentation::http::auth::logout,
            docs_api::presentation::http::auth::me,
            docs_api::presentation::http::documents::list_documents,
            docs_api::presentation::http::documents::create_document,
            docs_api::presentation::http::documents::get_document,
            docs_api::presentation::http::documents::update_document,
            docs_api::presentation::http::documents::replace_document,
            docs_api::presentation::http::documents::delete_document,
            docs_api::presentation::http::documents::grant_role,
            docs_api::presentation::http::documents::revoke_role,
            docs_api::presentation::http::users::list_users,
            docs_api::presentation::http::users::find_user,
            docs_api::presentation::http::users::update_profile,
            docs_api::presentation::http::users::replace_profile,
            docs_api::presentation::http::users::user_documents,
            docs_api::presentation::http::health::health,
        ),
        components(schemas(
            docs_api::presentation::http::auth::RegisterRequest,
            docs_api::presentation::http::auth::LoginRequest,
            docs_api::presentation::http::auth::LoginResponse,
            docs_api::presentation::http::auth::UserResponse,
            docs_api::presentation::http::auth::ProfileResponse,
            docs_api::presentation::http::documents::Document,
            docs_api::presentation::http::documents::RoleItem,
            docs_api::presentation::http::documents::CreateDocumentRequest,
            docs_api::presentation::http::documents::UpdateDocumentRequest,
            docs_api::presentation::http::documents::ReplaceDocumentRequest,
            docs_api::presentation::http::documents::GrantRoleRequest,
            docs_api::presentation::http::documents::SuccessResponse,
            docs_api::presentation::http::users::UpdateProfileRequest,
            docs_api::presentation::http::users::ReplaceProfileRequest,
            docs_api::presentation::http::error::MessageResponse,
            docs_api::presentation::http::health::HealthResp,
        )),
        tags(
            (name = "Auth", description = "Authentication"),
            (name = "Documents", description = "Documents management"),
            (name = "Users", description = "User lookup, profiles and owned documents"),
            (name = "Health", description = "System health checks")
        )
    )]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "docs_api=debug,axum=info,tower_http=info".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    info!(
        api_port = cfg.api_port,
        store = ?cfg.store_backend,
        production = cfg.is_production,
        "Starting documents backend"
    );

    let (document_repo, user_repo, pool): (
        Arc<dyn DocumentRepository>,
        Arc<dyn UserRepository>,
        Option<PgPool>,
    ) = match cfg.store_backend {
        StoreBackend::Postgres => {
            let pool = docs_api::infrastructure::db::connect_pool(
                &cfg.database_url,
                cfg.database_max_connections,
            )
            .await?;
            docs_api::infrastructure::db::migrate(&pool).await?;
            let documents: Arc<dyn DocumentRepository> = Arc::new(
                docs_api::infrastructure::db::repositories::document_repository_sqlx::SqlxDocumentRepository::new(
                    pool.clone(),
                ),
            );
            let users: Arc<dyn UserRepository> = Arc::new(
                docs_api::infrastructure::db::repositories::user_repository_sqlx::SqlxUserRepository::new(
                    pool.clone(),
                ),
            );
            (documents, users, Some(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("using_in_memory_store_data_is_not_persisted");
            let store = docs_api::infrastructure::memory::MemoryStore::new();
            let documents: Arc<dyn DocumentRepository> = Arc::new(store.clone());
            let users: Arc<dyn UserRepository> = Arc::new(store);
            (documents, users, None)
        }
    };

    let services = AppServices::new(document_repo.clone(), user_repo, pool);
    let ctx = AppContext::new(cfg.clone(), services);

    let methods = [
        http::Method::GET,
        http::Method::POST,
        http::Method::PUT,
        http::Method::DELETE,
        http::Method::PATCH,
        http::Method::OPTIONS,
    ];
    let headers = [http::header::CONTENT_TYPE, http::header::AUTHORIZATION];
    let cors = match cfg.frontend_url.as_deref().map(HeaderValue::from_str) {
        Some(Ok(origin)) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(methods)
            .allow_headers(headers)
            .allow_credentials(true),
        // Production requires FRONTEND_URL, so this only guards a malformed value
        _ if cfg.is_production => CorsLayer::new()
            .allow_origin(AllowOrigin::exact(HeaderValue::from_static(
                "http://invalid",
            )))
            .allow_methods(methods)
            .allow_headers(headers),
        _ => CorsLayer::new()
            .allow_origin(AllowOrigin::mirror_request())
            .allow_methods(methods)
            .allow_headers(headers)
            .allow_credentials(true),
    };

    let app = docs_api::presentation::http::router(ctx)
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let matched = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                tracing::info_span!("http", %method, %uri, matched_path = %matched)
            }),
        );

    let api_addr = SocketAddr::from(([0, 0, 0, 0], cfg.api_port));
    info!(%api_addr, "HTTP API listening");
    let listener = tokio::net::TcpListener::bind(api_addr).await?;

    let api_handle: JoinHandle<anyhow::Result<()>> = tokio::spawn(async move {
        axum::serve(listener, app).await?;
        Ok(())
    });

    // Ownership reconciliation: once at startup, then on an interval
    let reconcile_handle: JoinHandle<()> = {
        let repo = document_repo.clone();
        let interval = Duration::from_secs(cfg.reconcile_interval_secs.max(1));
        tokio::spawn(async move {
            loop {
                let uc = ReconcileOwnership {
                    repo: repo.as_ref(),
                };
                if let Err(e) = uc.execute().await {
                    tracing::error!(error = ?e, "reconcile_loop_failed");
                }
                sleep(interval).await;
            }
        })
    };

    match api_handle.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!(?e, "API server task failed"),
        Err(e) => error!(?e, "API server task panicked"),
    }
    reconcile_handle.abort();
    Ok(())
}
