//! Cache key generators and TTLs.

use std::time::Duration;
use user_api_core::UserId;

/// Lifetime of a cached user entry.
pub const USER_ENTRY_TTL: Duration = Duration::from_secs(20);

/// Cache key for a user entry: the id itself, unprefixed.
#[must_use]
pub fn user_entry(id: &UserId) -> String {
    id.as_str().to_string()
}
