mod booking_api;
mod catalog_api;
pub mod duration;
pub mod fallback;
pub mod fare;
mod helpers;
mod quote_api;
mod resolver;
mod session_api;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, OnceCell};
use uuid::Uuid;

use crate::{
    api::API,
    config::{Config, DEFAULT_SESSION_TTL_SECS},
    entities::{BookingSession, CarType},
    error::Error,
    external::{BookingBackend, DistanceMatrixClient, HttpBookingBackend},
};

pub use fare::FareError;
pub use resolver::{DistanceResolver, DynProvider};

pub type DynBackend = Arc<dyn BookingBackend + Send + Sync>;

pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(DEFAULT_SESSION_TTL_SECS);

/// A stored session and the last time any operation touched it.
struct Slot {
    session: BookingSession,
    touched: Instant,
}

impl Slot {
    fn new(session: BookingSession) -> Self {
        Self {
            session,
            touched: Instant::now(),
        }
    }
}

pub struct Engine {
    resolver: Arc<DistanceResolver>,
    backend: DynBackend,
    catalog: OnceCell<Vec<CarType>>,
    sessions: Mutex<HashMap<Uuid, Slot>>,
    session_ttl: Duration,
}

impl Engine {
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub fn new(config: &Config) -> Result<Self, Error> {
        let provider = match &config.google_maps_api_key {
            Some(key) => {
                let client = DistanceMatrixClient::new(
                    &config.google_maps_api_base,
                    key,
                    config.distance_timeout,
                )?;
                Some(Arc::new(client) as DynProvider)
            }
            None => {
                tracing::warn!("GOOGLE_MAPS_API_KEY is not set, distances will be estimated");
                None
            }
        };

        let backend = HttpBookingBackend::new(&config.booking_api_base, config.csrf_token.clone());

        Ok(Self::with_parts(DistanceResolver::new(provider), Arc::new(backend))
            .with_session_ttl(config.session_ttl))
    }

    pub fn with_parts(resolver: DistanceResolver, backend: DynBackend) -> Self {
        Self {
            resolver: Arc::new(resolver),
            backend,
            catalog: OnceCell::new(),
            sessions: Mutex::new(HashMap::new()),
            session_ttl: DEFAULT_SESSION_TTL,
        }
    }

    /// Sessions untouched for longer than `ttl` are dropped on the next
    /// `create_session`. Sessions with a call in flight are kept.
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }
}

impl API for Engine {}
