//! Diesel schema for task catalogue persistence.

diesel::table! {
    /// Marketplace task records with their denormalised bidder set.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owner identity.
        #[max_length = 255]
        owner_email -> Varchar,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Task description.
        description -> Text,
        /// Category label.
        #[max_length = 100]
        category -> Varchar,
        /// Optional budget in minor currency units.
        budget -> Nullable<Int8>,
        /// Deadline used for featured ordering.
        deadline -> Timestamptz,
        /// Lifecycle status.
        #[max_length = 50]
        status -> Varchar,
        /// Bidder identities in registration order, no duplicates.
        bidders -> Array<Text>,
        /// Cached bidder count, kept in step with `bidders` by the
        /// conditional registration update.
        bids_count -> Int8,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last mutation timestamp.
        updated_at -> Timestamptz,
    }
}
