// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session identifier generation.
//!
//! Identifiers combine the wall-clock time in milliseconds with a short random
//! suffix. No coordination between processes is needed: collisions require two
//! visitors starting in the same millisecond and drawing the same suffix.

use rand::Rng;
use rand::distributions::Alphanumeric;

use crate::types::SessionId;

const SUFFIX_LEN: usize = 9;

/// Generates a new opaque session identifier, e.g. `session_1767225600000_k3j9x0a2b`.
pub fn generate_session_id() -> SessionId {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LEN)
        .map(|b| (b as char).to_ascii_lowercase())
        .collect();
    SessionId(format!("session_{millis}_{suffix}"))
}

/// Current UTC time as an RFC 3339 string with millisecond precision.
pub fn timestamp_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn session_id_has_expected_shape() {
        let id = generate_session_id();
        let parts: Vec<&str> = id.as_str().split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "session");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), SUFFIX_LEN);
        assert!(parts[2].chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn session_ids_do_not_repeat() {
        let ids: HashSet<_> = (0..2_000).map(|_| generate_session_id()).collect();
        assert_eq!(ids.len(), 2_000);
    }

    #[test]
    fn timestamps_are_rfc3339_utc() {
        let ts = timestamp_now();
        assert!(ts.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }

    proptest::proptest! {
        #[test]
        fn session_ids_are_url_safe(_seed in 0u8..32) {
            let id = generate_session_id();
            proptest::prop_assert!(id.as_str().chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
        }
    }
}
