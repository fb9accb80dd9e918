use std::sync::Arc;

use crate::engine::fallback;
use crate::entities::DistanceEstimate;
use crate::external::DistanceProvider;

pub type DynProvider = Arc<dyn DistanceProvider + Send + Sync>;

/// Provider first, heuristic table second. Always yields a distance.
#[derive(Clone)]
pub struct DistanceResolver {
    provider: Option<DynProvider>,
}

impl DistanceResolver {
    pub fn new(provider: Option<DynProvider>) -> Self {
        Self { provider }
    }

    /// Callers validate the locations; this never fails.
    #[tracing::instrument(skip(self))]
    pub async fn resolve(&self, pickup: &str, dropoff: &str) -> DistanceEstimate {
        let provider = match &self.provider {
            Some(provider) => provider,
            None => {
                tracing::warn!("no distance provider configured, using fallback estimate");
                return DistanceEstimate::from_fallback(fallback::estimate_km(pickup, dropoff));
            }
        };

        match provider.driving_distance(pickup, dropoff).await {
            Ok(distance) => {
                DistanceEstimate::from_provider(distance.distance_km, distance.duration_seconds)
            }
            Err(err) => {
                let distance_km = fallback::estimate_km(pickup, dropoff);
                tracing::warn!("{}, using fallback estimate of {} km", err, distance_km);
                DistanceEstimate::from_fallback(distance_km)
            }
        }
    }
}
