use serde::{Deserialize, Serialize};

use super::entity::{Entity, RowId};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: RowId,
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub email: String,
    pub role: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RowId>,
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub email: String,
    pub role: String,
    pub phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub age: Option<i32>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub phone: Option<String>,
}

impl Entity for User {
    type Draft = NewUser;
    type Changes = UserChanges;

    const KIND: &'static str = "user";
    const COLLECTION: &'static str = "users";

    fn id(&self) -> RowId {
        self.id
    }

    fn draft_id(draft: &NewUser) -> Option<RowId> {
        draft.id
    }

    fn from_draft(id: RowId, draft: NewUser) -> Self {
        Self {
            id,
            first_name: draft.first_name,
            last_name: draft.last_name,
            age: draft.age,
            email: draft.email,
            role: draft.role,
            phone: draft.phone,
        }
    }

    fn apply(&mut self, changes: UserChanges) {
        if let Some(v) = changes.first_name {
            self.first_name = v;
        }
        if let Some(v) = changes.last_name {
            self.last_name = v;
        }
        if let Some(v) = changes.age {
            self.age = v;
        }
        if let Some(v) = changes.email {
            self.email = v;
        }
        if let Some(v) = changes.role {
            self.role = v;
        }
        if let Some(v) = changes.phone {
            self.phone = v;
        }
    }

    fn placeholder_draft() -> NewUser {
        NewUser {
            id: None,
            first_name: "Test".into(),
            last_name: "Test".into(),
            age: 1,
            email: "email@email.com".into(),
            role: "Test".into(),
            phone: "1".into(),
        }
    }

    fn placeholder_changes() -> UserChanges {
        UserChanges {
            first_name: Some("first_name".into()),
            last_name: Some("last_name".into()),
            age: Some(1),
            email: Some("email@email.com".into()),
            role: Some("test".into()),
            phone: Some("1".into()),
        }
    }

    fn label(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
