//! Travel time from distance, for when the provider gives no duration.

const SHORT_HAUL_KM: f64 = 100.0;
const MEDIUM_HAUL_KM: f64 = 350.0;

const SHORT_HAUL_KMH: f64 = 45.0;
const MEDIUM_HAUL_KMH: f64 = 58.0;
const LONG_HAUL_KMH: f64 = 65.0;

const BUFFER_RATIO: f64 = 0.15;
const MAX_BUFFER_SECONDS: f64 = 2.0 * 3600.0;

/// Average speed assumed for a trip of this length. Non-decreasing in distance.
pub fn average_speed_kmh(distance_km: f64) -> f64 {
    if distance_km < SHORT_HAUL_KM {
        SHORT_HAUL_KMH
    } else if distance_km < MEDIUM_HAUL_KM {
        MEDIUM_HAUL_KMH
    } else {
        LONG_HAUL_KMH
    }
}

/// Estimated seconds of travel, including a capped allowance for stops and traffic.
pub fn estimate(distance_km: f64) -> f64 {
    if !distance_km.is_finite() || distance_km <= 0.0 {
        return 0.0;
    }

    let base = distance_km / average_speed_kmh(distance_km) * 3600.0;
    let buffer = (base * BUFFER_RATIO).min(MAX_BUFFER_SECONDS);

    base + buffer
}
