use super::{Engine, Slot};

use std::collections::HashMap;
use std::time::Instant;

use uuid::Uuid;

use crate::{
    entities::{fallback_car_types, BookingSession, CarType},
    error::{not_found_error, Error},
};

impl Engine {
    /// The car-type table, loaded from the backend on first use.
    ///
    /// Concurrent first callers wait on the same load. A failed load installs
    /// the built-in table for the lifetime of the engine.
    pub(super) async fn catalog(&self) -> &[CarType] {
        self.catalog
            .get_or_init(|| async {
                match self.backend.car_types().await {
                    Ok(car_types) => {
                        tracing::info!("loaded {} car types from backend", car_types.len());
                        car_types
                    }
                    Err(err) => {
                        tracing::warn!("{}, using built-in car types", err);
                        fallback_car_types()
                    }
                }
            })
            .await
    }

    /// Applies a synchronous transition under the session lock.
    ///
    /// The lock is never held across network calls: handlers that await I/O
    /// call this once to enter the in-flight state and again to leave it.
    pub(super) async fn update_session<T, F>(&self, id: Uuid, transition: F) -> Result<T, Error>
    where
        F: FnOnce(&mut BookingSession) -> Result<T, Error>,
    {
        let mut sessions = self.sessions.lock().await;

        let slot = sessions
            .get_mut(&id)
            .ok_or_else(|| not_found_error("session"))?;
        slot.touched = Instant::now();

        transition(&mut slot.session)
    }

    /// Drops sessions idle for longer than the configured TTL.
    pub(super) fn evict_idle(&self, sessions: &mut HashMap<Uuid, Slot>) {
        let before = sessions.len();

        sessions.retain(|_, slot| {
            slot.session.status.is_in_flight() || slot.touched.elapsed() < self.session_ttl
        });

        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::info!("evicted {} idle sessions, {} remain", evicted, sessions.len());
        }
    }
}
