//! Diesel schema for user account persistence.

diesel::table! {
    /// Registered user accounts.
    users (email) {
        /// Normalized email identity.
        #[max_length = 320]
        email -> Varchar,
        /// Hex-encoded password digest.
        #[max_length = 64]
        password_hash -> Varchar,
        /// Registration timestamp.
        registered_at -> Timestamptz,
    }
}
