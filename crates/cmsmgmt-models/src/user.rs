//! User types.
//!
//! `UserRecord` is the normalized view of a CMS account. Adapters build it
//! from their own row layout; nothing outside an adapter sees native rows.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A normalized CMS user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Numeric user ID, unique within one listing.
    pub id: i64,

    /// Login name.
    pub username: String,

    /// Name shown on the site.
    pub display_name: String,

    /// Contact email.
    pub email: String,

    /// Role or group names. Empty when the user has none.
    #[serde(default)]
    pub roles: BTreeSet<String>,
}

impl UserRecord {
    /// Creates a record with no roles.
    pub fn new(
        id: i64,
        username: impl Into<String>,
        display_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            display_name: display_name.into(),
            email: email.into(),
            roles: BTreeSet::new(),
        }
    }

    /// Adds roles to the record.
    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles.extend(roles.into_iter().map(Into::into));
        self
    }
}

/// A set of changes to apply to one user.
///
/// `None` fields are left untouched. `roles`, when present, replaces the
/// user's whole role set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEdit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<BTreeSet<String>>,
}

impl UserEdit {
    /// Returns true if the edit changes nothing.
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.display_name.is_none() && self.roles.is_none()
    }

    /// Applies the edit to a normalized record.
    pub fn apply(&self, user: &mut UserRecord) {
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        if let Some(name) = &self.display_name {
            user.display_name = name.clone();
        }
        if let Some(roles) = &self.roles {
            user.roles = roles.clone();
        }
    }

    /// Names of the fields this edit touches.
    pub fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.email.is_some() {
            fields.push("email");
        }
        if self.display_name.is_some() {
            fields.push("display_name");
        }
        if self.roles.is_some() {
            fields.push("roles");
        }
        fields
    }
}

/// What an edit did to the backing store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EditOutcome {
    /// The user was rewritten.
    Updated {
        user: UserRecord,
        fields: Vec<String>,
    },
    /// The user exists but the edit carried no changes; nothing was written.
    Unchanged { user: UserRecord },
}

impl EditOutcome {
    pub fn user(&self) -> &UserRecord {
        match self {
            EditOutcome::Updated { user, .. } | EditOutcome::Unchanged { user } => user,
        }
    }
}
