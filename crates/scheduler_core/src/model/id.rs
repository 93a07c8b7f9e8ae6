//! Record identifier generation.
//!
//! Identifiers are a base-36 millisecond timestamp followed by a random
//! base-36 suffix. Collisions are improbable but not ruled out, and callers
//! do not check for them.

use chrono::{DateTime, Utc};
use uuid::Uuid;

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generates a fresh opaque record id from the current time.
pub fn generate_id() -> String {
    generate_id_at(Utc::now())
}

/// Generates an id whose timestamp prefix encodes `now`.
pub fn generate_id_at(now: DateTime<Utc>) -> String {
    let millis = u64::try_from(now.timestamp_millis()).unwrap_or_default();
    let random = Uuid::new_v4().as_u64_pair().1;
    let mut id = to_base36(millis);
    id.push_str(&to_base36(random));
    id
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    digits.into_iter().map(char::from).collect()
}

#[cfg(test)]
mod tests {
    use super::{generate_id_at, to_base36};
    use chrono::{TimeZone, Utc};

    #[test]
    fn base36_matches_known_values() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_700_000_000_000), "loyw3v28");
    }

    #[test]
    fn id_starts_with_timestamp_and_has_random_suffix() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let first = generate_id_at(now);
        let second = generate_id_at(now);

        assert!(first.starts_with("loyw3v28"));
        assert!(first.len() > "loyw3v28".len());
        assert!(first
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        assert_ne!(first, second);
    }
}
