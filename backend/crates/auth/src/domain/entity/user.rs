//! User Entity
//!
//! A registered account. [`User`] carries the password hash and never
//! leaves the auth crate; [`SafeUser`] and [`UserIdentity`] are the shapes
//! handed to callers.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::value_object::{
    email::Email, user_id::UserId, user_name::UserName, user_password::UserPassword,
};

#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub name: UserName,
    pub password: UserPassword,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn to_safe(&self) -> SafeUser {
        SafeUser {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            created_at: self.created_at,
        }
    }

    pub fn identity(&self) -> UserIdentity {
        UserIdentity {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }
}

/// Insert payload. The id and creation time are assigned by storage.
#[derive(Debug)]
pub struct NewUser {
    pub email: Email,
    pub name: UserName,
    pub password: UserPassword,
}

/// User record without the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeUser {
    pub id: UserId,
    pub email: Email,
    pub name: UserName,
    pub created_at: DateTime<Utc>,
}

impl SafeUser {
    pub fn identity(&self) -> UserIdentity {
        UserIdentity {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }
}

/// Minimal identity attached to authenticated requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserIdentity {
    pub id: UserId,
    pub email: Email,
    pub name: UserName,
}
