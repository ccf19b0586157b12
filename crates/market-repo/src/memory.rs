use async_trait::async_trait;
use market_types::domain::{Entity, Offer, Order, RowId, User};
use market_types::ports::{RepoError, Repository};
use std::sync::Arc;
use tokio::sync::RwLock;

struct TableState<E> {
    rows: Vec<E>,
    // `None` once `RowId::MAX` has been handed out.
    next_id: Option<RowId>,
}

/// One table: rows kept in insertion order behind a single lock, so writers
/// are serialized and readers never see a half-applied update.
pub struct MemoryTable<E> {
    state: Arc<RwLock<TableState<E>>>,
}

impl<E> Clone for MemoryTable<E> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<E: Entity> MemoryTable<E> {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(TableState {
                rows: Vec::new(),
                next_id: Some(1),
            })),
        }
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.rows.len()
    }
}

impl<E: Entity> Default for MemoryTable<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for MemoryTable<E> {
    async fn insert(&self, draft: E::Draft) -> Result<E, RepoError> {
        let mut state = self.state.write().await;
        let id = match E::draft_id(&draft) {
            Some(id) if state.rows.iter().any(|r| r.id() == id) => {
                return Err(RepoError::Conflict {
                    table: E::COLLECTION,
                    id,
                });
            }
            Some(id) => id,
            None => state.next_id.ok_or_else(|| {
                RepoError::DbError(format!("{} id space exhausted", E::COLLECTION))
            })?,
        };
        // Ids are never handed out twice, even after the holder is deleted.
        state.next_id = match (state.next_id, id.checked_add(1)) {
            (Some(next), Some(after)) => Some(next.max(after)),
            _ => None,
        };
        let row = E::from_draft(id, draft);
        state.rows.push(row.clone());
        Ok(row)
    }

    async fn get(&self, id: RowId) -> Result<Option<E>, RepoError> {
        let state = self.state.read().await;
        Ok(state.rows.iter().find(|r| r.id() == id).cloned())
    }

    async fn list(&self) -> Result<Vec<E>, RepoError> {
        Ok(self.state.read().await.rows.clone())
    }

    async fn update(&self, id: RowId, changes: E::Changes) -> Result<Option<E>, RepoError> {
        let mut state = self.state.write().await;
        if let Some(row) = state.rows.iter_mut().find(|r| r.id() == id) {
            row.apply(changes);
            return Ok(Some(row.clone()));
        }
        Ok(None)
    }

    async fn delete(&self, id: RowId) -> Result<Option<E>, RepoError> {
        let mut state = self.state.write().await;
        match state.rows.iter().position(|r| r.id() == id) {
            Some(idx) => Ok(Some(state.rows.remove(idx))),
            None => Ok(None),
        }
    }
}

/// The three marketplace tables, each with its own lock.
#[derive(Clone, Default)]
pub struct InMemoryRepo {
    pub users: MemoryTable<User>,
    pub orders: MemoryTable<Order>,
    pub offers: MemoryTable<Offer>,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

macro_rules! route_to_table {
    ($entity:ty => $field:ident) => {
        #[async_trait]
        impl Repository<$entity> for InMemoryRepo {
            async fn insert(
                &self,
                draft: <$entity as Entity>::Draft,
            ) -> Result<$entity, RepoError> {
                self.$field.insert(draft).await
            }

            async fn get(&self, id: RowId) -> Result<Option<$entity>, RepoError> {
                self.$field.get(id).await
            }

            async fn list(&self) -> Result<Vec<$entity>, RepoError> {
                self.$field.list().await
            }

            async fn update(
                &self,
                id: RowId,
                changes: <$entity as Entity>::Changes,
            ) -> Result<Option<$entity>, RepoError> {
                self.$field.update(id, changes).await
            }

            async fn delete(&self, id: RowId) -> Result<Option<$entity>, RepoError> {
                self.$field.delete(id).await
            }
        }
    };
}

route_to_table!(User => users);
route_to_table!(Order => orders);
route_to_table!(Offer => offers);
