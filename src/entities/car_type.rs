use serde::{Deserialize, Serialize};

/// Spread applied around `rate_per_km` when the catalog omits the min/max rates.
pub const DEFAULT_RATE_SPREAD: f64 = 2.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CarType {
    pub id: i64,
    pub name: String,
    pub display_name: String,
    pub rate_per_km: f64,
    pub min_rate_per_km: f64,
    pub max_rate_per_km: f64,
    pub minimum_distance_cap: f64,
    pub is_active: bool,
}

impl CarType {
    pub fn new(id: i64, name: &str, display_name: &str, rate: f64, min: f64, max: f64) -> Self {
        Self {
            id,
            name: name.into(),
            display_name: display_name.into(),
            rate_per_km: rate,
            min_rate_per_km: min,
            max_rate_per_km: max,
            minimum_distance_cap: 0.0,
            is_active: true,
        }
    }

    /// `min_rate_per_km <= rate_per_km <= max_rate_per_km`, all finite and non-negative.
    pub fn has_valid_rates(&self) -> bool {
        let rates = [self.min_rate_per_km, self.rate_per_km, self.max_rate_per_km];

        rates.iter().all(|r| r.is_finite() && *r >= 0.0)
            && self.min_rate_per_km <= self.rate_per_km
            && self.rate_per_km <= self.max_rate_per_km
    }

    pub fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }

    /// Distance actually billed: never below the car type's minimum distance cap.
    pub fn billable_distance(&self, distance_km: f64) -> f64 {
        distance_km.max(self.minimum_distance_cap)
    }
}

/// Built-in rate table used whenever the backend catalog cannot be loaded.
pub fn fallback_car_types() -> Vec<CarType> {
    vec![
        CarType::new(1, "hatchback", "Hatchback", 12.0, 10.0, 14.0),
        CarType::new(2, "sedan", "Sedan", 15.0, 13.0, 17.0),
        CarType::new(3, "suv", "SUV", 18.0, 16.0, 20.0),
    ]
}

/// Finds an active car type by name. Inactive entries are treated as unknown.
pub fn find_active<'a>(car_types: &'a [CarType], name: &str) -> Option<&'a CarType> {
    car_types.iter().find(|c| c.is_active && c.matches(name))
}
