//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{CloudObjectStore, FirestoreStore, PlatformIdentity},
    config::Config,
    error::ApiError,
    web::{
        alerts::{create_alert_handler, list_alerts_handler},
        auth::{login_handler, register_handler},
        board::{list_board_handler, post_board_handler},
        health_handler,
        listings::{
            create_listing_handler, delete_listing_handler, get_listing_handler,
            my_listings_handler, nearby_listings_handler, update_listing_handler,
        },
        require_auth,
        state::AppState,
        ApiDoc,
    },
};
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use achameupet_core::community::{AlertService, BoardService};
use achameupet_core::listing::ListingService;
use achameupet_core::ports::{DocumentStore, IdentityProvider, ObjectStore};
use achameupet_core::user::UserService;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Initialize the Collaborator Adapters ---
    let client = reqwest::Client::new();
    let store: Arc<dyn DocumentStore> = Arc::new(FirestoreStore::new(
        client.clone(),
        &config.project_id,
        config.platform_token.clone(),
    ));
    let media: Arc<dyn ObjectStore> = Arc::new(CloudObjectStore::new(
        client.clone(),
        &config.storage_bucket,
        config.platform_token.clone(),
    ));
    let identity: Arc<dyn IdentityProvider> = Arc::new(PlatformIdentity::new(
        client,
        &config.project_id,
        &config.identity_api_key,
        config.platform_token.clone(),
    ));

    // --- 3. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        config: Arc::clone(&config),
        identity: Arc::clone(&identity),
        listings: ListingService::new(Arc::clone(&store), media),
        users: UserService::new(Arc::clone(&store), identity),
        board: BoardService::new(Arc::clone(&store)),
        alerts: AlertService::new(store),
    });

    // --- 4. CORS ---
    let cors = match &config.frontend_origin {
        Some(origin) => {
            let origin = origin.parse::<HeaderValue>().map_err(|_| {
                ApiError::Internal(format!("FRONTEND_URL is not a valid origin: '{origin}'"))
            })?;
            CorsLayer::new()
                .allow_origin(origin)
                .allow_credentials(true)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT])
        }
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    // --- 5. Create the Web Router ---
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/api/auth/registro", post(register_handler))
        .route("/api/auth/login", post(login_handler))
        .route("/api/mural", get(list_board_handler))
        .route("/api/health", get(health_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/api/animais", post(create_listing_handler))
        .route("/api/animais/proximos", get(nearby_listings_handler))
        .route("/api/animais/meus", get(my_listings_handler))
        .route(
            "/api/animais/{id}",
            get(get_listing_handler)
                .put(update_listing_handler)
                .delete(delete_listing_handler),
        )
        .route("/api/mural", post(post_board_handler))
        .route(
            "/api/alertas",
            get(list_alerts_handler).post(create_alert_handler),
        )
        .layer(axum_middleware::from_fn_with_state(
            Arc::clone(&app_state),
            require_auth,
        ));

    // Combine API routes. The body limit leaves room for five photos of up
    // to 5 MB each plus the text fields.
    let api_router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(30 * 1024 * 1024))
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
