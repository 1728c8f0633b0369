//! Diesel table definitions mirroring `backend/migrations`.
//!
//! Regenerate with `diesel print-schema` after a migration changes a table.

diesel::table! {
    /// Registered accounts. `email` is unique and stored lowercased.
    users (id) {
        id -> Uuid,
        #[max_length = 100]
        name -> Varchar,
        #[max_length = 100]
        email -> Varchar,
        password_hash -> Text,
        #[max_length = 16]
        role -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Server-side sessions keyed by the SHA-256 fingerprint of the token.
    login_sessions (fingerprint) {
        #[max_length = 64]
        fingerprint -> Varchar,
        user_id -> Uuid,
        expires_at -> Timestamptz,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    shipments (id) {
        id -> Uuid,
        #[max_length = 20]
        tracking_number -> Varchar,
        #[max_length = 50]
        origin -> Varchar,
        #[max_length = 50]
        destination -> Varchar,
        #[max_length = 16]
        status -> Varchar,
        owner_id -> Uuid,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only history of status changes; only amendments edit rows.
    tracking_events (id) {
        id -> Uuid,
        seq -> Int8,
        shipment_id -> Uuid,
        #[max_length = 16]
        status -> Varchar,
        #[max_length = 100]
        location -> Varchar,
        description -> Text,
        updated_by -> Uuid,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(login_sessions -> users (user_id));
diesel::joinable!(shipments -> users (owner_id));
diesel::joinable!(tracking_events -> shipments (shipment_id));

diesel::allow_tables_to_appear_in_same_query!(login_sessions, shipments, tracking_events, users);
