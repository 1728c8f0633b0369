//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::{Repositories, build_http_state};

use actix_web::body::{BoxBody, EitherBody};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use shipment_backend::Trace;
#[cfg(debug_assertions)]
use shipment_backend::doc::ApiDoc;
use shipment_backend::inbound::http::configure_api;
use shipment_backend::inbound::http::health::{HealthState, live, ready};
use shipment_backend::inbound::http::session::RequireSessionCookie;
use shipment_backend::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<EitherBody<BoxBody>>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .configure(configure_api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app.wrap(RequireSessionCookie).wrap(Trace)
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// PostgreSQL backs every repository when the configuration carries a pool;
/// otherwise a single in-memory store does.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig {
        bind_addr,
        session,
        db_pool,
    } = config;

    let repositories = match &db_pool {
        Some(pool) => Repositories::diesel(pool),
        None => Repositories::in_memory(),
    };
    let http_state = build_http_state(repositories, session);
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    info!(
        %bind_addr,
        store = if db_pool.is_some() { "postgres" } else { "memory" },
        "server listening"
    );
    health_state.mark_ready();
    Ok(server)
}
