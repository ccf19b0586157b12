#[cfg(not(any(feature = "memory", feature = "sqlite")))]
compile_error!("Enable a repo feature: `memory` or `sqlite`.");

use market_types::domain::{Entity, Offer, Order, RowId, User};
use market_types::ports::{RepoError, Repository};

#[cfg(feature = "memory")]
pub mod memory;
pub mod seed;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use seed::{seed_repo, SeedData, SeedReport};

#[cfg(all(feature = "sqlite", not(feature = "memory")))]
const DEFAULT_SQLITE_URL: &str = "sqlite::memory:";

/// Storage selected at startup.
pub enum Repo {
    #[cfg(feature = "memory")]
    Memory(memory::InMemoryRepo),
    #[cfg(feature = "sqlite")]
    Sqlite(sqlite::SqliteRepo),
}

pub async fn build_repo(url: Option<&str>) -> anyhow::Result<Repo> {
    Repo::build_repo(url).await
}

impl Repo {
    #[cfg(all(feature = "memory", not(feature = "sqlite")))]
    pub async fn build_repo(url: Option<&str>) -> anyhow::Result<Self> {
        if let Some(url) = url {
            tracing::warn!(url, "sqlite feature disabled, ignoring DATABASE_URL");
        }
        Ok(Repo::Memory(memory::InMemoryRepo::new()))
    }

    #[cfg(all(feature = "sqlite", not(feature = "memory")))]
    pub async fn build_repo(database_url: Option<&str>) -> anyhow::Result<Self> {
        let url = database_url.unwrap_or(DEFAULT_SQLITE_URL);
        Ok(Repo::Sqlite(sqlite::SqliteRepo::new(url).await?))
    }

    // If both features are enabled a DATABASE_URL picks sqlite.
    #[cfg(all(feature = "sqlite", feature = "memory"))]
    pub async fn build_repo(database_url: Option<&str>) -> anyhow::Result<Self> {
        match database_url {
            Some(url) => Ok(Repo::Sqlite(sqlite::SqliteRepo::new(url).await?)),
            None => Ok(Repo::Memory(memory::InMemoryRepo::new())),
        }
    }

    pub fn backend(&self) -> &'static str {
        match self {
            #[cfg(feature = "memory")]
            Repo::Memory(_) => "memory",
            #[cfg(feature = "sqlite")]
            Repo::Sqlite(_) => "sqlite",
        }
    }
}

macro_rules! dispatch {
    ($self:ident, $repo:ident => $call:expr) => {
        match $self {
            #[cfg(feature = "memory")]
            Repo::Memory($repo) => $call,
            #[cfg(feature = "sqlite")]
            Repo::Sqlite($repo) => $call,
        }
    };
}

macro_rules! delegate_repository {
    ($($entity:ty),+) => {$(
        #[async_trait::async_trait]
        impl Repository<$entity> for Repo {
            async fn insert(
                &self,
                draft: <$entity as Entity>::Draft,
            ) -> Result<$entity, RepoError> {
                dispatch!(self, r => Repository::<$entity>::insert(r, draft).await)
            }

            async fn get(&self, id: RowId) -> Result<Option<$entity>, RepoError> {
                dispatch!(self, r => Repository::<$entity>::get(r, id).await)
            }

            async fn list(&self) -> Result<Vec<$entity>, RepoError> {
                dispatch!(self, r => Repository::<$entity>::list(r).await)
            }

            async fn update(
                &self,
                id: RowId,
                changes: <$entity as Entity>::Changes,
            ) -> Result<Option<$entity>, RepoError> {
                dispatch!(self, r => Repository::<$entity>::update(r, id, changes).await)
            }

            async fn delete(&self, id: RowId) -> Result<Option<$entity>, RepoError> {
                dispatch!(self, r => Repository::<$entity>::delete(r, id).await)
            }
        }
    )+};
}

delegate_repository!(User, Order, Offer);
