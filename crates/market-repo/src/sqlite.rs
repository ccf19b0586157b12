use async_trait::async_trait;
use market_types::domain::{Entity, NewOffer, NewOrder, NewUser, Offer, Order, RowId, User};
use market_types::ports::{RepoError, Repository};
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{FromRow, SqlitePool};
use std::str::FromStr;
use std::time::Duration;

type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

/// SQLite-backed tables.
///
/// The pool holds exactly one connection that never expires: an in-memory
/// database lives only as long as its connection, and a single connection also
/// serializes every write. Each row carries a hidden `seq` column so listing
/// follows insertion order even when explicit ids arrive out of order.
pub struct SqliteRepo {
    pool: SqlitePool,
}

/// How an entity maps onto its SQLite table.
pub trait SqlTable: Entity {
    /// Every column except `id`, in bind order.
    const COLUMNS: &'static [&'static str];

    type Row: for<'r> FromRow<'r, SqliteRow> + Send + Unpin + Into<Self>;

    fn bind_draft<'q>(q: SqliteQuery<'q>, draft: &'q Self::Draft) -> SqliteQuery<'q>;

    fn bind_row<'q>(q: SqliteQuery<'q>, row: &'q Self) -> SqliteQuery<'q>;
}

impl SqliteRepo {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        // Foreign keys are declared for documentation only; dangling ids are allowed.
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(false);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await?;

        let ddl = include_str!("../migrations/0001_create_tables.sql");
        for statement in ddl.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            sqlx::query(statement).execute(&pool).await?;
        }

        tracing::debug!(url = database_url, "sqlite repo ready");
        Ok(Self { pool })
    }
}

fn select_sql<E: SqlTable>() -> String {
    format!("SELECT id, {} FROM {}", E::COLUMNS.join(", "), E::COLLECTION)
}

fn insert_sql<E: SqlTable>() -> String {
    let placeholders = vec!["?"; E::COLUMNS.len()].join(", ");
    format!(
        "INSERT INTO {table} (id, {columns}, seq) \
         VALUES (?, {placeholders}, (SELECT COALESCE(MAX(seq), 0) + 1 FROM {table}))",
        table = E::COLLECTION,
        columns = E::COLUMNS.join(", "),
    )
}

fn update_sql<E: SqlTable>() -> String {
    let assignments = E::COLUMNS
        .iter()
        .map(|c| format!("{c} = ?"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("UPDATE {} SET {} WHERE id = ?", E::COLLECTION, assignments)
}

fn db_error(e: sqlx::Error) -> RepoError {
    RepoError::DbError(e.to_string())
}

fn insert_error<E: Entity>(e: sqlx::Error, requested: Option<RowId>) -> RepoError {
    match (&e, requested) {
        (sqlx::Error::Database(db), Some(id)) if db.is_unique_violation() => RepoError::Conflict {
            table: E::COLLECTION,
            id,
        },
        _ => db_error(e),
    }
}

#[async_trait]
impl<E: SqlTable> Repository<E> for SqliteRepo {
    async fn insert(&self, draft: E::Draft) -> Result<E, RepoError> {
        let sql = insert_sql::<E>();
        let requested = E::draft_id(&draft);
        let res = E::bind_draft(sqlx::query(&sql).bind(requested), &draft)
            .execute(&self.pool)
            .await
            .map_err(|e| insert_error::<E>(e, requested))?;
        Ok(E::from_draft(res.last_insert_rowid(), draft))
    }

    async fn get(&self, id: RowId) -> Result<Option<E>, RepoError> {
        let sql = format!("{} WHERE id = ?", select_sql::<E>());
        let row: Option<E::Row> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(row.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<E>, RepoError> {
        let sql = format!("{} ORDER BY seq", select_sql::<E>());
        let rows: Vec<E::Row> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: RowId, changes: E::Changes) -> Result<Option<E>, RepoError> {
        let select = format!("{} WHERE id = ?", select_sql::<E>());
        let update = update_sql::<E>();

        let mut tx = self.pool.begin().await.map_err(db_error)?;
        let current: Option<E::Row> = sqlx::query_as(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_error)?;
        let Some(current) = current else {
            return Ok(None);
        };

        let mut row: E = current.into();
        row.apply(changes);
        E::bind_row(sqlx::query(&update), &row)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
        tx.commit().await.map_err(db_error)?;
        Ok(Some(row))
    }

    async fn delete(&self, id: RowId) -> Result<Option<E>, RepoError> {
        let select = format!("{} WHERE id = ?", select_sql::<E>());
        let delete = format!("DELETE FROM {} WHERE id = ?", E::COLLECTION);

        let mut tx = self.pool.begin().await.map_err(db_error)?;
        let current: Option<E::Row> = sqlx::query_as(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_error)?;
        let Some(current) = current else {
            return Ok(None);
        };

        sqlx::query(&delete)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
        tx.commit().await.map_err(db_error)?;
        Ok(Some(current.into()))
    }
}

#[derive(FromRow)]
pub struct DbUser {
    id: i64,
    first_name: String,
    last_name: String,
    age: i32,
    email: String,
    role: String,
    phone: String,
}

impl From<DbUser> for User {
    fn from(r: DbUser) -> Self {
        User {
            id: r.id,
            first_name: r.first_name,
            last_name: r.last_name,
            age: r.age,
            email: r.email,
            role: r.role,
            phone: r.phone,
        }
    }
}

impl SqlTable for User {
    const COLUMNS: &'static [&'static str] =
        &["first_name", "last_name", "age", "email", "role", "phone"];

    type Row = DbUser;

    fn bind_draft<'q>(q: SqliteQuery<'q>, d: &'q NewUser) -> SqliteQuery<'q> {
        q.bind(&d.first_name)
            .bind(&d.last_name)
            .bind(d.age)
            .bind(&d.email)
            .bind(&d.role)
            .bind(&d.phone)
    }

    fn bind_row<'q>(q: SqliteQuery<'q>, r: &'q User) -> SqliteQuery<'q> {
        q.bind(&r.first_name)
            .bind(&r.last_name)
            .bind(r.age)
            .bind(&r.email)
            .bind(&r.role)
            .bind(&r.phone)
    }
}

#[derive(FromRow)]
pub struct DbOrder {
    id: i64,
    name: String,
    description: String,
    start_date: String,
    end_date: String,
    address: String,
    price: i64,
    customer_id: i64,
    executor_id: i64,
}

impl From<DbOrder> for Order {
    fn from(r: DbOrder) -> Self {
        Order {
            id: r.id,
            name: r.name,
            description: r.description,
            start_date: r.start_date,
            end_date: r.end_date,
            address: r.address,
            price: r.price,
            customer_id: r.customer_id,
            executor_id: r.executor_id,
        }
    }
}

impl SqlTable for Order {
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "description",
        "start_date",
        "end_date",
        "address",
        "price",
        "customer_id",
        "executor_id",
    ];

    type Row = DbOrder;

    fn bind_draft<'q>(q: SqliteQuery<'q>, d: &'q NewOrder) -> SqliteQuery<'q> {
        q.bind(&d.name)
            .bind(&d.description)
            .bind(&d.start_date)
            .bind(&d.end_date)
            .bind(&d.address)
            .bind(d.price)
            .bind(d.customer_id)
            .bind(d.executor_id)
    }

    fn bind_row<'q>(q: SqliteQuery<'q>, r: &'q Order) -> SqliteQuery<'q> {
        q.bind(&r.name)
            .bind(&r.description)
            .bind(&r.start_date)
            .bind(&r.end_date)
            .bind(&r.address)
            .bind(r.price)
            .bind(r.customer_id)
            .bind(r.executor_id)
    }
}

#[derive(FromRow)]
pub struct DbOffer {
    id: i64,
    order_id: i64,
    executor_id: i64,
}

impl From<DbOffer> for Offer {
    fn from(r: DbOffer) -> Self {
        Offer {
            id: r.id,
            order_id: r.order_id,
            executor_id: r.executor_id,
        }
    }
}

impl SqlTable for Offer {
    const COLUMNS: &'static [&'static str] = &["order_id", "executor_id"];

    type Row = DbOffer;

    fn bind_draft<'q>(q: SqliteQuery<'q>, d: &'q NewOffer) -> SqliteQuery<'q> {
        q.bind(d.order_id).bind(d.executor_id)
    }

    fn bind_row<'q>(q: SqliteQuery<'q>, r: &'q Offer) -> SqliteQuery<'q> {
        q.bind(r.order_id).bind(r.executor_id)
    }
}
