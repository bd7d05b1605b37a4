//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::body::MessageBody;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::{info, warn};

use relief_backend::Trace;
#[cfg(debug_assertions)]
use relief_backend::doc::ApiDoc;
use relief_backend::domain::ports::DocumentStore;
use relief_backend::inbound::http::api_scope;
use relief_backend::inbound::http::health::{HealthState, live, ready, status};
use relief_backend::inbound::http::state::HttpState;
use relief_backend::outbound::memory::InMemoryDocumentStore;
use relief_backend::outbound::mongo::MongoDocumentStore;
use relief_backend::settings::AppSettings;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Connect the document store named by `settings`.
///
/// Falls back to the in-memory store when no MongoDB URI is configured.
///
/// # Errors
/// Returns [`std::io::Error`] when the MongoDB server cannot be reached.
pub async fn build_store(settings: &AppSettings) -> std::io::Result<Arc<dyn DocumentStore>> {
    match settings.mongodb_uri() {
        Some(uri) => {
            let store = MongoDocumentStore::connect(uri, settings.database())
                .await
                .map_err(|e| std::io::Error::other(format!("mongodb connection failed: {e}")))?;
            info!(database = settings.database(), "connected to mongodb");
            Ok(Arc::new(store))
        }
        None => {
            warn!("RELIEF_MONGODB_URI unset; using the in-memory document store");
            Ok(Arc::new(InMemoryDocumentStore::new()))
        }
    }
}

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Cors::permissive())
        .wrap(Trace)
        .service(status)
        .service(ready)
        .service(live)
        .service(api_scope());

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig {
        bind_addr,
        store,
        hasher,
        tokens,
    } = config;
    let http_state = web::Data::new(HttpState::from_adapters(store, hasher, tokens));
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || build_app(server_health_state.clone(), http_state.clone()))
        .bind(bind_addr)?
        .run();

    info!(%bind_addr, "listening");
    health_state.mark_ready();
    Ok(server)
}
