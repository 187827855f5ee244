//! Diesel schema for bid ledger persistence.
//!
//! The `bids` table carries a unique index on `(task_id, bidder_email)`
//! named `idx_bids_task_bidder_unique`; the repository maps violations of
//! that index to the duplicate-bid error. The index, not any pre-check, is
//! what makes bid placement exactly-once under concurrency.

diesel::table! {
    /// Bid records, at most one per `(task, bidder)` pair.
    bids (id) {
        /// Bid identifier.
        id -> Uuid,
        /// Referenced task (weak reference; tasks may be deleted first).
        task_id -> Uuid,
        /// Task title snapshot taken at bid time.
        #[max_length = 255]
        task_title -> Varchar,
        /// Bidder identity.
        #[max_length = 255]
        bidder_email -> Varchar,
        /// Offered amount in minor currency units.
        bid_amount -> Int8,
        /// Bidder's message to the owner.
        message -> Text,
        /// Lifecycle status.
        #[max_length = 50]
        status -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
