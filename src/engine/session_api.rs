use super::{fare, Engine, Slot};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    api::SessionAPI,
    entities::{BookingSession, TripRequest},
    error::{unexpected_error, Error},
};

#[async_trait]
impl SessionAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn create_session(&self) -> Result<BookingSession, Error> {
        let session = BookingSession::new();

        let mut sessions = self.sessions.lock().await;
        self.evict_idle(&mut sessions);
        sessions.insert(session.id, Slot::new(session.clone()));

        Ok(session)
    }

    #[tracing::instrument(skip(self))]
    async fn find_session(&self, id: Uuid) -> Result<BookingSession, Error> {
        self.update_session(id, |session| Ok(session.clone())).await
    }

    #[tracing::instrument(skip(self, trip))]
    async fn enter_trip(&self, id: Uuid, trip: TripRequest) -> Result<BookingSession, Error> {
        let now = Utc::now();

        self.update_session(id, |session| {
            session.enter_trip(trip, now)?;
            Ok(session.clone())
        })
        .await
    }

    #[tracing::instrument(skip(self))]
    async fn resolve_session_distance(&self, id: Uuid) -> Result<BookingSession, Error> {
        let (attempt, pickup, dropoff) = self
            .update_session(id, |session| session.begin_resolving())
            .await?;

        // a panicking provider must not leave the session in DistanceResolving
        let resolver = self.resolver.clone();
        let lookup = tokio::spawn(async move { resolver.resolve(&pickup, &dropoff).await });

        match lookup.await {
            Ok(estimate) => {
                self.update_session(id, |session| {
                    session.finish_resolving(attempt, estimate)?;
                    Ok(session.clone())
                })
                .await
            }
            Err(err) => {
                tracing::error!("distance lookup aborted: {}", err);

                self.update_session(id, |session| {
                    session.abort_resolving(attempt, unexpected_error())
                })
                .await?;

                Err(unexpected_error())
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn select_car(&self, id: Uuid, car_type: &str) -> Result<BookingSession, Error> {
        let catalog = self.catalog().await;

        self.update_session(id, |session| {
            let trip = session.trip()?;
            let distance_km = session
                .distance
                .as_ref()
                .map(|d| d.distance_km)
                .unwrap_or(0.0);

            let (car_type, quote) = fare::quote_by_name(
                distance_km,
                trip.trip_type,
                catalog,
                car_type,
                trip.number_of_days(),
            )?;

            session.select_car(car_type, quote)?;
            Ok(session.clone())
        })
        .await
    }

    #[tracing::instrument(skip(self))]
    async fn deselect_car(&self, id: Uuid) -> Result<BookingSession, Error> {
        self.update_session(id, |session| {
            session.deselect_car()?;
            Ok(session.clone())
        })
        .await
    }

    #[tracing::instrument(skip(self))]
    async fn reset_session(&self, id: Uuid) -> Result<BookingSession, Error> {
        self.update_session(id, |session| {
            session.reset()?;
            Ok(session.clone())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{DistanceResolver, DynBackend, DynProvider};
    use crate::entities::{
        BookingPayload, BookingReceipt, CarAvailability, CarType, DistanceSource, InquiryRecord,
        PriceQuote, SessionStatus,
    };
    use crate::error::{not_found_error, INVALID_STATE, NOT_FOUND, UNKNOWN_CAR_TYPE};
    use crate::external::{
        BookingBackend, DistanceProvider, ProviderDistance, ProviderError, SubmitError,
    };
    use async_trait::async_trait;
    use chrono::Duration;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::Notify;
    use tokio_test::assert_err;

    struct Offline;

    #[async_trait]
    impl BookingBackend for Offline {
        async fn car_types(&self) -> Result<Vec<CarType>, Error> {
            Err(crate::error::upstream_error("offline"))
        }

        async fn available_cars_by_type(&self) -> Result<HashMap<String, Vec<String>>, Error> {
            Err(crate::error::upstream_error("offline"))
        }

        async fn car_availability(&self, _car_id: &str) -> Result<CarAvailability, Error> {
            Err(crate::error::upstream_error("offline"))
        }

        async fn create_booking(
            &self,
            _payload: &BookingPayload,
        ) -> Result<BookingReceipt, SubmitError> {
            Err(SubmitError::Network("offline".into()))
        }

        async fn find_booking(&self, _booking_id: &str) -> Result<InquiryRecord, Error> {
            Err(not_found_error("booking"))
        }
    }

    fn engine() -> Engine {
        Engine::with_parts(DistanceResolver::new(None), Arc::new(Offline) as DynBackend)
    }

    /// Answers the n-th lookup with `distances[n]` once `gates[n]` is opened.
    struct Gated {
        calls: AtomicUsize,
        gates: [Notify; 2],
        distances: [f64; 2],
    }

    #[async_trait]
    impl DistanceProvider for Gated {
        async fn driving_distance(
            &self,
            _origin: &str,
            _destination: &str,
        ) -> Result<ProviderDistance, ProviderError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            self.gates[n].notified().await;

            Ok(ProviderDistance {
                distance_km: self.distances[n],
                duration_seconds: None,
            })
        }
    }

    async fn wait_for_calls(provider: &Gated, calls: usize) {
        while provider.calls.load(Ordering::SeqCst) < calls {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn one_way_flow_reaches_car_selected() {
        let engine = engine();
        let session = engine.create_session().await.unwrap();
        let trip = TripRequest::one_way("Mumbai", "Pune", Utc::now() + Duration::days(2));

        let session = engine.enter_trip(session.id, trip).await.unwrap();
        assert_eq!(session.status, SessionStatus::LocationsEntered);

        let session = engine.resolve_session_distance(session.id).await.unwrap();
        assert_eq!(session.status, SessionStatus::DistanceResolved);
        let distance = session.distance.clone().unwrap();
        assert_eq!(distance.source, DistanceSource::Fallback);
        assert_eq!(distance.distance_km, 148.5);

        let session = engine.select_car(session.id, "Hatchback").await.unwrap();
        assert_eq!(session.status, SessionStatus::CarSelected);
        assert_eq!(
            session.selected.unwrap().quote,
            PriceQuote::OneWay {
                rate: 12.0,
                total_price: 1775.0
            }
        );
    }

    #[tokio::test]
    async fn local_ride_selects_car_without_distance() {
        let engine = engine();
        let session = engine.create_session().await.unwrap();
        let trip = TripRequest::local_ride(Utc::now() + Duration::hours(3));

        engine.enter_trip(session.id, trip).await.unwrap();

        let err = engine.resolve_session_distance(session.id).await.unwrap_err();
        assert_eq!(err.code, INVALID_STATE);

        let session = engine.select_car(session.id, "suv").await.unwrap();
        assert_eq!(session.status, SessionStatus::CarSelected);
        assert_eq!(session.selected.unwrap().quote, PriceQuote::LocalRide);
    }

    #[tokio::test]
    async fn unknown_car_type_leaves_session_untouched() {
        let engine = engine();
        let session = engine.create_session().await.unwrap();
        let trip = TripRequest::one_way("Delhi", "Agra", Utc::now() + Duration::days(1));

        engine.enter_trip(session.id, trip).await.unwrap();
        engine.resolve_session_distance(session.id).await.unwrap();

        let err = engine.select_car(session.id, "limousine").await.unwrap_err();
        assert_eq!(err.code, UNKNOWN_CAR_TYPE);

        let session = engine.find_session(session.id).await.unwrap();
        assert_eq!(session.status, SessionStatus::DistanceResolved);
        assert!(session.selected.is_none());
    }

    #[tokio::test]
    async fn car_can_be_switched_and_deselected() {
        let engine = engine();
        let session = engine.create_session().await.unwrap();
        let trip = TripRequest::one_way("Delhi", "Agra", Utc::now() + Duration::days(1));

        engine.enter_trip(session.id, trip).await.unwrap();
        engine.resolve_session_distance(session.id).await.unwrap();
        engine.select_car(session.id, "sedan").await.unwrap();

        let session = engine.select_car(session.id, "suv").await.unwrap();
        assert_eq!(session.selected.as_ref().unwrap().car_type.name, "suv");

        let session = engine.deselect_car(session.id).await.unwrap();
        assert_eq!(session.status, SessionStatus::DistanceResolved);
        assert!(session.distance.is_some());
    }

    #[tokio::test]
    async fn reset_clears_everything_but_the_id() {
        let engine = engine();
        let created = engine.create_session().await.unwrap();
        let trip = TripRequest::one_way("Delhi", "Agra", Utc::now() + Duration::days(1));

        engine.enter_trip(created.id, trip).await.unwrap();
        engine.resolve_session_distance(created.id).await.unwrap();

        let session = engine.reset_session(created.id).await.unwrap();
        assert_eq!(session.id, created.id);
        assert_eq!(session.status, SessionStatus::Idle);
        assert!(session.distance.is_none());
        assert!(session.trip.is_none());
    }

    #[tokio::test]
    async fn lookup_finishing_after_reset_does_not_touch_new_trip() {
        let provider = Arc::new(Gated {
            calls: AtomicUsize::new(0),
            gates: [Notify::new(), Notify::new()],
            distances: [150.0, 233.0],
        });
        let engine = Arc::new(Engine::with_parts(
            DistanceResolver::new(Some(provider.clone() as DynProvider)),
            Arc::new(Offline) as DynBackend,
        ));
        let id = engine.create_session().await.unwrap().id;
        let pickup = Utc::now() + Duration::days(1);

        let mumbai = TripRequest::one_way("Mumbai", "Pune", pickup);
        engine.enter_trip(id, mumbai).await.unwrap();
        let stale = {
            let engine = engine.clone();
            tokio::spawn(async move { engine.resolve_session_distance(id).await })
        };
        wait_for_calls(&provider, 1).await;

        engine.reset_session(id).await.unwrap();
        let delhi = TripRequest::one_way("Delhi", "Agra", pickup);
        engine.enter_trip(id, delhi).await.unwrap();
        let current = {
            let engine = engine.clone();
            tokio::spawn(async move { engine.resolve_session_distance(id).await })
        };
        wait_for_calls(&provider, 2).await;

        provider.gates[0].notify_one();
        let err = stale.await.unwrap().unwrap_err();
        assert_eq!(err.code, INVALID_STATE);

        let session = engine.find_session(id).await.unwrap();
        assert_eq!(session.status, SessionStatus::DistanceResolving);
        assert!(session.distance.is_none());

        provider.gates[1].notify_one();
        let session = current.await.unwrap().unwrap();
        assert_eq!(session.status, SessionStatus::DistanceResolved);
        assert_eq!(session.trip.unwrap().pickup, "Delhi");
        assert_eq!(session.distance.unwrap().distance_km, 233.0);
    }

    #[tokio::test]
    async fn idle_sessions_are_evicted_on_create() {
        let engine = engine().with_session_ttl(std::time::Duration::from_millis(50));
        let idle = engine.create_session().await.unwrap().id;
        let submitting = engine.create_session().await.unwrap().id;
        engine
            .update_session(submitting, |session| {
                session.status = SessionStatus::Submitting;
                Ok(())
            })
            .await
            .unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        let fresh = engine.create_session().await.unwrap().id;

        let err = assert_err!(engine.find_session(idle).await);
        assert_eq!(err.code, NOT_FOUND);
        assert!(engine.find_session(submitting).await.is_ok());
        assert!(engine.find_session(fresh).await.is_ok());
        assert_eq!(engine.sessions.lock().await.len(), 2);
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let engine = engine();

        let err = assert_err!(engine.find_session(Uuid::new_v4()).await);
        assert_eq!(err.code, NOT_FOUND);

        let err = assert_err!(engine.deselect_car(Uuid::new_v4()).await);
        assert_eq!(err.code, NOT_FOUND);
    }

    #[tokio::test]
    async fn catalog_falls_back_to_built_in_table() {
        let engine = engine();
        let car_types = crate::api::CatalogAPI::car_types(&engine).await.unwrap();

        let names: Vec<_> = car_types.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["hatchback", "sedan", "suv"]);
    }
}
