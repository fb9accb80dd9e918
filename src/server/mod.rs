mod handlers;

use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, post, put},
    Router,
};

use crate::api::{DynAPI, API};
use crate::error::{unexpected_error, Error};
use crate::server::handlers::{bookings, car_types, quotes, sessions};

pub fn router(api: DynAPI) -> Router {
    Router::new()
        .route("/car-types", get(car_types::list))
        .route("/car-types/available", get(car_types::available))
        .route("/cars/:id/availability", get(car_types::availability))
        .route("/distance", get(quotes::distance))
        .route("/quotes", post(quotes::create))
        .route("/sessions", post(sessions::create))
        .route("/sessions/:id", get(sessions::find))
        .route("/sessions/:id/trip", put(sessions::enter_trip))
        .route("/sessions/:id/distance", post(sessions::resolve_distance))
        .route(
            "/sessions/:id/car",
            put(sessions::select_car).delete(sessions::deselect_car),
        )
        .route("/sessions/:id/submit", post(sessions::submit))
        .route("/sessions/:id/reset", post(sessions::reset))
        .route("/bookings/:booking_id", get(bookings::find))
        .layer(Extension(api))
}

pub async fn serve<T: API + Sync + Send + 'static>(api: T, addr: SocketAddr) -> Result<(), Error> {
    let listener = TcpListener::bind(addr).map_err(|err| {
        tracing::error!("could not bind {}: {}", addr, err);
        unexpected_error()
    })?;

    serve_on(api, listener).await
}

/// Serves on an already bound listener, e.g. one on an ephemeral port.
pub async fn serve_on<T: API + Sync + Send + 'static>(
    api: T,
    listener: TcpListener,
) -> Result<(), Error> {
    let api = Arc::new(api) as DynAPI;
    let app = router(api);

    if let Ok(addr) = listener.local_addr() {
        tracing::info!("listening on {}", addr);
    }

    axum::Server::from_tcp(listener)
        .map_err(|err| {
            tracing::error!("could not use listener: {}", err);
            unexpected_error()
        })?
        .serve(app.into_make_service())
        .await
        .map_err(|err| {
            tracing::error!("server error: {}", err);
            unexpected_error()
        })
}
