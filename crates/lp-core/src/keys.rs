// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Session key and participant id generation

use rand::Rng;
use std::ops::RangeInclusive;

/// Six-digit session keys
pub const SESSION_KEY_RANGE: RangeInclusive<u32> = 100_000..=999_999;

/// Four-digit participant ids
pub const USER_ID_RANGE: RangeInclusive<u32> = 1_000..=9_999;

/// Source of session keys and participant ids
///
/// Generators are not required to avoid collisions; the store retries.
pub trait IdGenerator: Send + Sync {
    fn session_key(&self) -> String;
    fn user_id(&self) -> String;
}

/// Uniformly random numeric ids
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn session_key(&self) -> String {
        rand::thread_rng().gen_range(SESSION_KEY_RANGE).to_string()
    }

    fn user_id(&self) -> String {
        rand::thread_rng().gen_range(USER_ID_RANGE).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lp_api_contract::validation::{validate_session_key, validate_user_id};

    #[test]
    fn random_ids_have_expected_shape() {
        let ids = RandomIdGenerator;
        for _ in 0..500 {
            let key = ids.session_key();
            assert!(validate_session_key(&key).is_ok(), "bad key {key}");
            let user = ids.user_id();
            assert!(validate_user_id(&user).is_ok(), "bad user id {user}");
        }
    }
}
