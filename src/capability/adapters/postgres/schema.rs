//! Diesel schema for capability persistence.

diesel::table! {
    /// Capability definitions.
    capabilities (id) {
        /// Capability identifier.
        id -> Uuid,
        /// Unique capability name.
        #[max_length = 100]
        name -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
        /// Optional grouping label.
        category -> Nullable<Text>,
        /// Ranking weight in `0..=10`.
        priority -> Int2,
        /// Caller-defined metadata.
        metadata -> Jsonb,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
