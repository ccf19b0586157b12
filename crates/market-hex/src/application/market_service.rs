use crate::errors::AppError;
use market_types::domain::{Entity, RowId};
use market_types::ports::{RepoError, Repository};

/// One storage call per operation. Create and update never take caller
/// input: they write the entity's placeholder values.
pub struct MarketService<R> {
    repo: R,
}

fn internal(e: RepoError) -> AppError {
    AppError::Internal(e.into())
}

fn not_found<E: Entity>(id: RowId) -> AppError {
    tracing::debug!(entity = E::KIND, id, "row not found");
    AppError::NotFound {
        entity: E::KIND,
        id,
    }
}

impl<R> MarketService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn list<E>(&self) -> Result<Vec<E>, AppError>
    where
        E: Entity,
        R: Repository<E>,
    {
        Repository::<E>::list(&self.repo).await.map_err(internal)
    }

    pub async fn get<E>(&self, id: RowId) -> Result<E, AppError>
    where
        E: Entity,
        R: Repository<E>,
    {
        Repository::<E>::get(&self.repo, id)
            .await
            .map_err(internal)?
            .ok_or_else(|| not_found::<E>(id))
    }

    pub async fn create<E>(&self) -> Result<E, AppError>
    where
        E: Entity,
        R: Repository<E>,
    {
        let row = Repository::<E>::insert(&self.repo, E::placeholder_draft())
            .await
            .map_err(internal)?;
        tracing::info!(entity = E::KIND, id = row.id(), "row created");
        Ok(row)
    }

    pub async fn update<E>(&self, id: RowId) -> Result<E, AppError>
    where
        E: Entity,
        R: Repository<E>,
    {
        let row = Repository::<E>::update(&self.repo, id, E::placeholder_changes())
            .await
            .map_err(internal)?
            .ok_or_else(|| not_found::<E>(id))?;
        tracing::info!(entity = E::KIND, id, "row updated");
        Ok(row)
    }

    /// Returns the removed row so callers can echo what was deleted.
    pub async fn delete<E>(&self, id: RowId) -> Result<E, AppError>
    where
        E: Entity,
        R: Repository<E>,
    {
        let row = Repository::<E>::delete(&self.repo, id)
            .await
            .map_err(internal)?
            .ok_or_else(|| not_found::<E>(id))?;
        tracing::info!(entity = E::KIND, id, "row deleted");
        Ok(row)
    }
}
