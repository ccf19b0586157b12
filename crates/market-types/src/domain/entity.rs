use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

/// Primary key type shared by every table.
pub type RowId = i64;

/// A row type stored in one of the marketplace tables.
///
/// Each entity comes with a draft type (the insert input, whose id may be left
/// for the store to assign) and a change set (a partial overwrite where `None`
/// leaves the column untouched).
pub trait Entity: Debug + Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Draft: Debug + Clone + Serialize + DeserializeOwned + Send + Sync + 'static;
    type Changes: Debug + Clone + Default + Send + Sync + 'static;

    /// Singular name used in log lines and confirmation messages.
    const KIND: &'static str;
    /// Collection name; doubles as the table name and the URL prefix.
    const COLLECTION: &'static str;

    fn id(&self) -> RowId;

    fn draft_id(draft: &Self::Draft) -> Option<RowId>;

    fn from_draft(id: RowId, draft: Self::Draft) -> Self;

    fn apply(&mut self, changes: Self::Changes);

    /// Row written by the create endpoint.
    fn placeholder_draft() -> Self::Draft;

    /// Changes written by the update endpoint; covers every mutable column.
    fn placeholder_changes() -> Self::Changes;

    /// Identity echoed back once the row is removed.
    fn label(&self) -> String {
        self.id().to_string()
    }
}
