//! Diesel schema for service liveness persistence.

diesel::table! {
    /// Registered service instances.
    services (id) {
        /// Service identifier.
        id -> Uuid,
        /// Logical service name (not unique).
        #[max_length = 255]
        name -> Varchar,
        /// Connection endpoint.
        url -> Text,
        /// Optional health probe endpoint.
        health_check_url -> Nullable<Text>,
        /// Caller-defined metadata as JSONB.
        metadata -> Jsonb,
        /// Liveness window in seconds.
        ttl_seconds -> Int4,
        /// Registration timestamp.
        registered_at -> Timestamptz,
        /// Latest heartbeat timestamp.
        last_heartbeat_at -> Timestamptz,
        /// Latest update timestamp.
        updated_at -> Timestamptz,
        /// `last_heartbeat_at + ttl_seconds`, indexed for visibility checks.
        expires_at -> Timestamptz,
        /// Latest health snapshot as JSONB.
        last_health -> Nullable<Jsonb>,
    }
}
