//! Diesel schema for agent persistence.

diesel::table! {
    /// Agent directory entries.
    agents (id) {
        /// Agent identifier.
        id -> Uuid,
        /// Unique agent name.
        #[max_length = 255]
        name -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
        /// Version label.
        #[max_length = 100]
        version -> Varchar,
        /// Agent endpoint.
        url -> Text,
        /// Optional health probe endpoint.
        health_check_url -> Nullable<Text>,
        /// Lifecycle status (`active`, `inactive`, `unavailable`).
        #[max_length = 50]
        status -> Varchar,
        /// Caller-defined metadata.
        metadata -> Jsonb,
        /// Capability names, stored without foreign keys.
        capabilities -> Array<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
