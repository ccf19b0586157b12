use axum::{
    extract::{Path, State},
    routing::get,
    serve, Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::application::market_service::MarketService;
use crate::errors::AppError;
use market_types::domain::{Entity, Offer, Order, RowId, User};
use market_types::ports::{MarketRepository, Repository};

type SharedService<R> = Arc<MarketService<R>>;

#[derive(Clone)]
pub struct HttpServerConfig {
    pub port: String,
}

#[derive(Clone)]
pub struct HttpServer<R>
where
    R: MarketRepository,
{
    pub service: SharedService<R>,
    pub config: HttpServerConfig,
}

impl<R> HttpServer<R>
where
    R: MarketRepository,
{
    pub async fn new(service: MarketService<R>, config: HttpServerConfig) -> anyhow::Result<Self> {
        Ok(Self {
            service: Arc::new(service),
            config,
        })
    }

    /// The full route table, without the tracing layer.
    pub fn router(&self) -> Router {
        let router = Router::new().route("/health", get(health));
        let router = entity_routes::<R, User>(router);
        let router = entity_routes::<R, Order>(router);
        let router = entity_routes::<R, Offer>(router);
        router.with_state(self.service.clone())
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &axum::extract::Request<_>| {
                let uri = request.uri().to_string();
                let request_id = Uuid::new_v4();
                tracing::info_span!(
                    "http_request",
                    %request_id,
                    method = %request.method(),
                    uri
                )
            })
            .on_request(
                |request: &axum::extract::Request<_>, span: &tracing::Span| {
                    tracing::info!(
                        parent: span,
                        method = %request.method(),
                        uri = %request.uri(),
                        "request"
                    );
                },
            )
            .on_response(
                |response: &axum::response::Response, latency: Duration, span: &tracing::Span| {
                    tracing::info!(
                        parent: span,
                        status = %response.status(),
                        latency_ms = %latency.as_millis(),
                        "response"
                    );
                },
            );

        let app = self.router().layer(trace_layer);

        let addr: SocketAddr = format!("0.0.0.0:{}", self.config.port).parse()?;
        tracing::info!("starting server on {}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        serve(listener, app.into_make_service()).await?;
        Ok(())
    }
}

/// Mounts the five CRUD routes for one entity under `/{collection}/`.
/// Mutating routes also answer GET.
fn entity_routes<R, E>(router: Router<SharedService<R>>) -> Router<SharedService<R>>
where
    R: Repository<E>,
    E: Entity,
{
    let base = format!("/{}", E::COLLECTION);
    router
        .route(&format!("{base}/"), get(list_rows::<R, E>))
        .route(
            &format!("{base}/create/"),
            get(create_row::<R, E>).post(create_row::<R, E>),
        )
        .route(&format!("{base}/{{id}}/"), get(get_row::<R, E>))
        .route(
            &format!("{base}/{{id}}/update/"),
            get(update_row::<R, E>).put(update_row::<R, E>),
        )
        .route(
            &format!("{base}/{{id}}/delete/"),
            get(delete_row::<R, E>).delete(delete_row::<R, E>),
        )
}

fn parse_id(raw: &str) -> Result<RowId, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("invalid id: {raw}")))
}

async fn health() -> (axum::http::StatusCode, Json<serde_json::Value>) {
    (
        axum::http::StatusCode::OK,
        Json(serde_json::json!({ "status": "ok" })),
    )
}

async fn list_rows<R, E>(State(service): State<SharedService<R>>) -> Result<Json<Vec<E>>, AppError>
where
    R: Repository<E>,
    E: Entity,
{
    let rows = service.list::<E>().await?;
    Ok(Json(rows))
}

async fn get_row<R, E>(
    State(service): State<SharedService<R>>,
    Path(id): Path<String>,
) -> Result<Json<E>, AppError>
where
    R: Repository<E>,
    E: Entity,
{
    let row = service.get::<E>(parse_id(&id)?).await?;
    Ok(Json(row))
}

// The request body, if any, is never read.
async fn create_row<R, E>(State(service): State<SharedService<R>>) -> Result<String, AppError>
where
    R: Repository<E>,
    E: Entity,
{
    service.create::<E>().await?;
    Ok(format!("new {} added", E::KIND))
}

async fn update_row<R, E>(
    State(service): State<SharedService<R>>,
    Path(id): Path<String>,
) -> Result<String, AppError>
where
    R: Repository<E>,
    E: Entity,
{
    service.update::<E>(parse_id(&id)?).await?;
    Ok("info updated".to_string())
}

async fn delete_row<R, E>(
    State(service): State<SharedService<R>>,
    Path(id): Path<String>,
) -> Result<String, AppError>
where
    R: Repository<E>,
    E: Entity,
{
    let removed = service.delete::<E>(parse_id(&id)?).await?;
    Ok(format!("{} {}: removed", E::KIND, removed.label()))
}
