//! Diesel row models for user account persistence.

use super::schema::users;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for user records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// Normalized email identity.
    pub email: String,
    /// Hex-encoded password digest.
    pub password_hash: String,
    /// Registration timestamp.
    pub registered_at: DateTime<Utc>,
}

/// Insert model for user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow {
    /// Normalized email identity.
    pub email: String,
    /// Hex-encoded password digest.
    pub password_hash: String,
    /// Registration timestamp.
    pub registered_at: DateTime<Utc>,
}
