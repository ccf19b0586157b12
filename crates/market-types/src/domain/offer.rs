use serde::{Deserialize, Serialize};

use super::entity::{Entity, RowId};

/// A user's bid to execute an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Offer {
    pub id: RowId,
    pub order_id: RowId,
    pub executor_id: RowId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewOffer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RowId>,
    pub order_id: RowId,
    pub executor_id: RowId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfferChanges {
    pub order_id: Option<RowId>,
    pub executor_id: Option<RowId>,
}

impl Entity for Offer {
    type Draft = NewOffer;
    type Changes = OfferChanges;

    const KIND: &'static str = "offer";
    const COLLECTION: &'static str = "offers";

    fn id(&self) -> RowId {
        self.id
    }

    fn draft_id(draft: &NewOffer) -> Option<RowId> {
        draft.id
    }

    fn from_draft(id: RowId, draft: NewOffer) -> Self {
        Self {
            id,
            order_id: draft.order_id,
            executor_id: draft.executor_id,
        }
    }

    fn apply(&mut self, changes: OfferChanges) {
        if let Some(v) = changes.order_id {
            self.order_id = v;
        }
        if let Some(v) = changes.executor_id {
            self.executor_id = v;
        }
    }

    fn placeholder_draft() -> NewOffer {
        NewOffer {
            id: None,
            order_id: 1,
            executor_id: 1,
        }
    }

    fn placeholder_changes() -> OfferChanges {
        OfferChanges {
            order_id: Some(1),
            executor_id: Some(2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_placeholder_moves_executor() {
        let mut offer = Offer::from_draft(5, Offer::placeholder_draft());
        assert_eq!(offer.executor_id, 1);
        offer.apply(Offer::placeholder_changes());
        assert_eq!(offer.order_id, 1);
        assert_eq!(offer.executor_id, 2);
        assert_eq!(offer.label(), "5");
    }
}
