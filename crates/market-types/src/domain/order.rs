use serde::{Deserialize, Serialize};

use super::entity::{Entity, RowId};

/// A job posted by a customer. Dates are free text and never parsed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Order {
    pub id: RowId,
    pub name: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    pub address: String,
    pub price: i64,
    pub customer_id: RowId,
    pub executor_id: RowId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewOrder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RowId>,
    pub name: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    pub address: String,
    pub price: i64,
    pub customer_id: RowId,
    pub executor_id: RowId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub address: Option<String>,
    pub price: Option<i64>,
    pub customer_id: Option<RowId>,
    pub executor_id: Option<RowId>,
}

impl Entity for Order {
    type Draft = NewOrder;
    type Changes = OrderChanges;

    const KIND: &'static str = "order";
    const COLLECTION: &'static str = "orders";

    fn id(&self) -> RowId {
        self.id
    }

    fn draft_id(draft: &NewOrder) -> Option<RowId> {
        draft.id
    }

    fn from_draft(id: RowId, draft: NewOrder) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            start_date: draft.start_date,
            end_date: draft.end_date,
            address: draft.address,
            price: draft.price,
            customer_id: draft.customer_id,
            executor_id: draft.executor_id,
        }
    }

    fn apply(&mut self, changes: OrderChanges) {
        if let Some(v) = changes.name {
            self.name = v;
        }
        if let Some(v) = changes.description {
            self.description = v;
        }
        if let Some(v) = changes.start_date {
            self.start_date = v;
        }
        if let Some(v) = changes.end_date {
            self.end_date = v;
        }
        if let Some(v) = changes.address {
            self.address = v;
        }
        if let Some(v) = changes.price {
            self.price = v;
        }
        if let Some(v) = changes.customer_id {
            self.customer_id = v;
        }
        if let Some(v) = changes.executor_id {
            self.executor_id = v;
        }
    }

    fn placeholder_draft() -> NewOrder {
        NewOrder {
            id: None,
            name: "Test".into(),
            description: "Test".into(),
            start_date: "1.1.1.".into(),
            end_date: "1.1.1".into(),
            address: "Test".into(),
            price: 1,
            customer_id: 1,
            executor_id: 1,
        }
    }

    fn placeholder_changes() -> OrderChanges {
        OrderChanges {
            name: Some("name".into()),
            description: Some("description".into()),
            start_date: Some("1.1.1".into()),
            end_date: Some("1.1.1".into()),
            address: Some("test".into()),
            price: Some(1),
            customer_id: Some(1),
            executor_id: Some(1),
        }
    }
}
