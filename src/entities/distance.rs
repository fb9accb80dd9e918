use serde::{Deserialize, Serialize};

use crate::engine::duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceSource {
    Provider,
    Fallback,
}

/// Road distance between a pickup and a drop-off. Immutable once resolved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DistanceEstimate {
    pub distance_km: f64,
    pub duration_seconds: Option<f64>,
    pub source: DistanceSource,
}

impl DistanceEstimate {
    pub fn from_provider(distance_km: f64, duration_seconds: Option<f64>) -> Self {
        Self {
            distance_km,
            duration_seconds,
            source: DistanceSource::Provider,
        }
    }

    pub fn from_fallback(distance_km: f64) -> Self {
        Self {
            distance_km,
            duration_seconds: None,
            source: DistanceSource::Fallback,
        }
    }

    /// Provider duration when present, tiered-speed estimate otherwise.
    pub fn eta_seconds(&self) -> f64 {
        self.duration_seconds
            .unwrap_or_else(|| duration::estimate(self.distance_km))
    }
}
