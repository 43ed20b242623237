// File: services/courtbook_backend/src/main.rs
use axum::{routing::get, Router};
use courtbook_booking::routes::routes_from_config;
use courtbook_common::{config_error, internal_error, logging, CourtbookError};
use courtbook_config::load_config;
use std::process::ExitCode;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("Court booking service stopped: {}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), CourtbookError> {
    let config = load_config().map_err(config_error)?;
    info!("Using {:?} data source", config.data_source);

    let api_router = Router::new()
        .route("/", get(|| async { "Welcome to the court booking API!" }))
        .merge(routes_from_config(&config)?);

    #[allow(unused_mut)] // only mutated with the openapi feature
    let mut app = Router::new().nest("/api", api_router);

    #[cfg(feature = "openapi")]
    {
        use courtbook_booking::doc::CalendarApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        info!("Adding Swagger UI at /api/docs");
        let swagger_ui =
            SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", CalendarApiDoc::openapi());
        app = app.merge(swagger_ui);
    }

    let app = app.layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|err| internal_error(format!("cannot bind {}: {}", addr, err)))?;
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .map_err(|err| internal_error(format!("server error: {}", err)))
}
