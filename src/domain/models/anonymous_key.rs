use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

pub const ANON_KEY_COOKIE_NAME: &str = "VAULT-KRATE-ANON-KEY";
pub const MIN_EXPIRATION_HOURS: f64 = 12.0;
pub const MAX_EXPIRATION_HOURS: f64 = 24.0;

/// Maps a uniform sample in `[0, 1)` onto the `[12, 24)` hour expiry window.
///
/// Samples outside the unit interval are clamped into it. The upper bound stays
/// exclusive even when rounding of a sample close to 1 would land on it.
pub fn expiration_hours(sample: f64) -> f64 {
    let sample = if sample.is_nan() {
        0.0
    } else {
        sample.clamp(0.0, 1.0)
    };
    let hours = sample * (MAX_EXPIRATION_HOURS - MIN_EXPIRATION_HOURS) + MIN_EXPIRATION_HOURS;
    if hours >= MAX_EXPIRATION_HOURS {
        f64::from_bits(MAX_EXPIRATION_HOURS.to_bits() - 1)
    } else {
        hours
    }
}

/// Longest lifetime any stored cookie may have (ten years).
const MAX_TTL_HOURS: f64 = 24.0 * 365.0 * 10.0;

/// Converts fractional hours to a chrono duration with millisecond precision.
pub fn hours_to_duration(hours: f64) -> Duration {
    let hours = if hours.is_nan() {
        0.0
    } else {
        hours.clamp(-MAX_TTL_HOURS, MAX_TTL_HOURS)
    };
    Duration::milliseconds((hours * 3_600_000.0).round() as i64)
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnonymousKey {
    pub value: String,
    pub ttl_hours: f64,
    pub expires_at: DateTime<Utc>,
}

impl AnonymousKey {
    pub fn generate(sample: f64, now: DateTime<Utc>) -> Self {
        let ttl_hours = expiration_hours(sample);
        Self {
            value: Uuid::new_v4().to_string(),
            ttl_hours,
            expires_at: now + hours_to_duration(ttl_hours),
        }
    }
}
