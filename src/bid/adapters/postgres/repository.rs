//! `PostgreSQL` repository implementation for bid ledger storage.

use super::{
    models::{BidRow, NewBidRow},
    schema::bids,
};
use crate::bid::{
    domain::{Bid, BidAmount, BidId, BidStatus, PersistedBidData},
    ports::{BidRepository, BidRepositoryError, BidRepositoryResult},
};
use crate::identity::EmailAddress;
use crate::task::domain::TaskId;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by bid adapters.
pub type BidPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed bid repository.
#[derive(Debug, Clone)]
pub struct PostgresBidRepository {
    pool: BidPgPool,
}

impl PostgresBidRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: BidPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> BidRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> BidRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(BidRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(BidRepositoryError::persistence)?
    }
}

#[async_trait]
impl BidRepository for PostgresBidRepository {
    async fn store(&self, bid: &Bid) -> BidRepositoryResult<()> {
        let bid_id = bid.id();
        let task_id = bid.task_id();
        let bidder = bid.bidder_email().clone();
        let new_row = to_new_row(bid);

        self.run_blocking(move |connection| {
            diesel::insert_into(bids::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if is_pair_unique_violation(info.as_ref()) =>
                    {
                        BidRepositoryError::DuplicateBid {
                            task_id,
                            bidder: bidder.clone(),
                        }
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        BidRepositoryError::DuplicateBidId(bid_id)
                    }
                    _ => BidRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn exists(&self, task_id: TaskId, bidder: &EmailAddress) -> BidRepositoryResult<bool> {
        let bidder = bidder.as_str().to_owned();
        self.run_blocking(move |connection| {
            let found = bids::table
                .filter(bids::task_id.eq(task_id.into_inner()))
                .filter(bids::bidder_email.eq(bidder))
                .select(bids::id)
                .first::<uuid::Uuid>(connection)
                .optional()
                .map_err(BidRepositoryError::persistence)?;
            Ok(found.is_some())
        })
        .await
    }

    async fn list_by_bidder(&self, bidder: &EmailAddress) -> BidRepositoryResult<Vec<Bid>> {
        let bidder = bidder.as_str().to_owned();
        self.run_blocking(move |connection| {
            let rows = bids::table
                .filter(bids::bidder_email.eq(bidder))
                .order(bids::created_at.desc())
                .select(BidRow::as_select())
                .load::<BidRow>(connection)
                .map_err(BidRepositoryError::persistence)?;
            rows.into_iter().map(row_to_bid).collect()
        })
        .await
    }

    async fn bidders_for_task(&self, task_id: TaskId) -> BidRepositoryResult<Vec<EmailAddress>> {
        self.run_blocking(move |connection| {
            let emails: Vec<String> = bids::table
                .filter(bids::task_id.eq(task_id.into_inner()))
                .order(bids::created_at.asc())
                .select(bids::bidder_email)
                .load(connection)
                .map_err(BidRepositoryError::persistence)?;
            emails
                .into_iter()
                .map(|email| EmailAddress::new(email).map_err(BidRepositoryError::persistence))
                .collect()
        })
        .await
    }

    async fn count_by_bidder(&self, bidder: &EmailAddress) -> BidRepositoryResult<u64> {
        let bidder = bidder.as_str().to_owned();
        self.run_blocking(move |connection| {
            let count: i64 = bids::table
                .filter(bids::bidder_email.eq(bidder))
                .count()
                .get_result(connection)
                .map_err(BidRepositoryError::persistence)?;
            Ok(u64::try_from(count).unwrap_or_default())
        })
        .await
    }

    async fn sum_completed_amounts(&self, bidder: &EmailAddress) -> BidRepositoryResult<i64> {
        let bidder = bidder.as_str().to_owned();
        self.run_blocking(move |connection| sum_completed(connection, &bidder))
            .await
    }

    async fn update_status(&self, id: BidId, status: BidStatus) -> BidRepositoryResult<Bid> {
        self.run_blocking(move |connection| {
            let row = diesel::update(bids::table.filter(bids::id.eq(id.into_inner())))
                .set(bids::status.eq(status.as_str()))
                .get_result::<BidRow>(connection)
                .optional()
                .map_err(BidRepositoryError::persistence)?;
            row.map_or(Err(BidRepositoryError::NotFound(id)), row_to_bid)
        })
        .await
    }
}

#[derive(QueryableByName)]
struct SumRow {
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    total: i64,
}

/// Sums completed bid amounts in the database so the aggregate never pulls
/// full rows into the process.
fn sum_completed(connection: &mut PgConnection, bidder: &str) -> BidRepositoryResult<i64> {
    let query = diesel::sql_query(concat!(
        "SELECT COALESCE(SUM(bid_amount), 0)::BIGINT AS total ",
        "FROM bids WHERE bidder_email = $1 AND status = $2",
    ))
    .bind::<diesel::sql_types::Text, _>(bidder)
    .bind::<diesel::sql_types::Text, _>(BidStatus::Completed.as_str());

    let row = query
        .get_result::<SumRow>(connection)
        .map_err(BidRepositoryError::persistence)?;
    Ok(row.total)
}

fn is_pair_unique_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == "idx_bids_task_bidder_unique")
}

fn to_new_row(bid: &Bid) -> NewBidRow {
    NewBidRow {
        id: bid.id().into_inner(),
        task_id: bid.task_id().into_inner(),
        task_title: bid.task_title().to_owned(),
        bidder_email: bid.bidder_email().as_str().to_owned(),
        bid_amount: bid.amount().value(),
        message: bid.message().to_owned(),
        status: bid.status().as_str().to_owned(),
        created_at: bid.created_at(),
    }
}

fn row_to_bid(row: BidRow) -> BidRepositoryResult<Bid> {
    let BidRow {
        id,
        task_id,
        task_title,
        bidder_email,
        bid_amount,
        message,
        status: persisted_status,
        created_at,
    } = row;

    let bidder_email =
        EmailAddress::new(bidder_email).map_err(BidRepositoryError::persistence)?;
    let status =
        BidStatus::try_from(persisted_status.as_str()).map_err(BidRepositoryError::persistence)?;
    let amount = BidAmount::new(bid_amount).map_err(BidRepositoryError::persistence)?;

    let data = PersistedBidData {
        id: BidId::from_uuid(id),
        task_id: TaskId::from_uuid(task_id),
        task_title,
        bidder_email,
        amount,
        message,
        status,
        created_at,
    };
    Ok(Bid::from_persisted(data))
}
