use async_trait::async_trait;

use crate::domain::entity::{Entity, RowId};
use crate::domain::{Offer, Order, User};

#[derive(thiserror::Error, Debug)]
pub enum RepoError {
    #[error("{table} row {id} already exists")]
    Conflict { table: &'static str, id: RowId },

    #[error("db error: {0}")]
    DbError(String),
}

/// Table-level storage for one entity. Missing rows are `None`, never an
/// error; callers decide what a miss means.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync + 'static {
    async fn insert(&self, draft: E::Draft) -> Result<E, RepoError>;
    async fn get(&self, id: RowId) -> Result<Option<E>, RepoError>;
    async fn list(&self) -> Result<Vec<E>, RepoError>;
    async fn update(&self, id: RowId, changes: E::Changes) -> Result<Option<E>, RepoError>;
    async fn delete(&self, id: RowId) -> Result<Option<E>, RepoError>;
}

/// Storage covering every marketplace table.
pub trait MarketRepository: Repository<User> + Repository<Order> + Repository<Offer> {}

impl<T> MarketRepository for T where T: Repository<User> + Repository<Order> + Repository<Offer> {}
