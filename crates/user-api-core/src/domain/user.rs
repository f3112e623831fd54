//! User entity.

use crate::{Entity, UserId};
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A row of the `users` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct User {
    /// Primary key, assigned once at creation.
    pub id: UserId,

    /// Display name.
    #[validate(length(max = 255))]
    pub name: Option<String>,

    /// Free-form postal address.
    pub address: Option<String>,

    /// Game score.
    pub score: Option<i32>,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user stamped with the current time.
    #[must_use]
    pub fn new(id: UserId, name: Option<String>, address: Option<String>, score: Option<i32>) -> Self {
        let now = now();
        Self {
            id,
            name,
            address,
            score,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a partial profile change.
    ///
    /// The outer `None` leaves a field untouched; `Some(None)` clears it.
    pub fn apply_changes(
        &mut self,
        name: Option<Option<String>>,
        address: Option<Option<String>>,
        score: Option<Option<i32>>,
    ) {
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(address) = address {
            self.address = address;
        }
        if let Some(score) = score {
            self.score = score;
        }
        self.touch();
    }

    /// Sets the score.
    pub fn set_score(&mut self, score: i32) {
        self.score = Some(score);
        self.touch();
    }

    /// Bumps `updated_at` to now.
    pub fn touch(&mut self) {
        self.updated_at = now();
    }
}

// Storage keeps microsecond precision.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

impl Entity<UserId> for User {
    fn id(&self) -> &UserId {
        &self.id
    }
}
