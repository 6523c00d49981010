//! Session Entity
//!
//! Value stored under `session:{id}`. Email and name are denormalized so
//! request authorization needs no user lookup. Expiry lives in the store's
//! TTL, not in the record.

use serde::{Deserialize, Serialize};

use crate::domain::entity::user::UserIdentity;
use crate::domain::value_object::{email::Email, user_id::UserId, user_name::UserName};

/// Serialized as `{"userId":1,"email":"a@x.com","name":"A"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    pub user_id: UserId,
    pub email: Email,
    pub name: UserName,
}

impl SessionData {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    pub fn into_identity(self) -> UserIdentity {
        UserIdentity {
            id: self.user_id,
            email: self.email,
            name: self.name,
        }
    }
}

impl From<&UserIdentity> for SessionData {
    fn from(identity: &UserIdentity) -> Self {
        Self {
            user_id: identity.id,
            email: identity.email.clone(),
            name: identity.name.clone(),
        }
    }
}
