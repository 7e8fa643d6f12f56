//! Shared user-table logic.
//!
//! Both platforms store users as one row per account in `<prefix>users`;
//! they differ only in column names. Each adapter describes its row with a
//! [`NativeUser`] type and reuses the listing and editing code here.

use std::collections::HashSet;

use cmsmgmt_models::{EditOutcome, UserEdit, UserRecord};
use cmsmgmt_store::UserStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{AdapterError, Result};

/// A platform's native user row.
pub(crate) trait NativeUser: Serialize + DeserializeOwned {
    fn username(&self) -> &str;

    fn to_record(&self) -> UserRecord;

    fn apply(&mut self, edit: &UserEdit);
}

/// Location of a user table inside a store.
pub(crate) struct UserTable<'a> {
    pub database: &'a str,
    pub prefix: &'a str,
}

impl UserTable<'_> {
    pub fn name(&self) -> String {
        format!("{}users", self.prefix)
    }

    fn raw_rows(&self, store: &dyn UserStore) -> Result<Vec<Value>> {
        let table = self.name();
        if !store.has_table(&table) {
            return Err(AdapterError::missing_table(table, self.prefix));
        }
        store
            .rows(&table)
            .map_err(|e| AdapterError::from_store_read(e, self.database, &table, self.prefix))
    }

    fn decode<T: NativeUser>(&self, row: &Value, index: usize) -> Result<T> {
        serde_json::from_value(row.clone()).map_err(|e| AdapterError::Schema {
            table: self.name(),
            prefix: self.prefix.to_string(),
            reason: format!("has an unreadable row at position {}: {}", index, e),
        })
    }

    /// Reads and normalizes every user, keeping table order.
    pub fn list<T: NativeUser>(&self, store: &dyn UserStore) -> Result<Vec<UserRecord>> {
        let rows = self.raw_rows(store)?;
        let mut seen = HashSet::with_capacity(rows.len());
        let mut users = Vec::with_capacity(rows.len());

        for (index, row) in rows.iter().enumerate() {
            let record = self.decode::<T>(row, index)?.to_record();
            if !seen.insert(record.id) {
                return Err(AdapterError::Schema {
                    table: self.name(),
                    prefix: self.prefix.to_string(),
                    reason: format!("contains duplicate user id {}", record.id),
                });
            }
            users.push(record);
        }

        debug!(table = %self.name(), count = users.len(), "Listed users");
        Ok(users)
    }

    /// Applies an edit to one user and writes the table back.
    ///
    /// Columns the native row type does not know about are preserved.
    pub fn edit<T: NativeUser>(
        &self,
        store: &mut dyn UserStore,
        username: &str,
        edit: &UserEdit,
    ) -> Result<EditOutcome> {
        let table = self.name();
        let mut rows = self.raw_rows(&*store)?;

        let mut found = None;
        for (index, row) in rows.iter().enumerate() {
            let user: T = self.decode(row, index)?;
            if user.username() == username {
                found = Some((index, user));
                break;
            }
        }
        let (index, mut user) = found.ok_or_else(|| AdapterError::user_not_found(username))?;

        if edit.is_empty() {
            return Ok(EditOutcome::Unchanged {
                user: user.to_record(),
            });
        }

        user.apply(edit);
        let updated = serde_json::to_value(&user)
            .map_err(|e| AdapterError::from_store_write(e.into(), &table))?;
        merge_row(&mut rows[index], updated);

        store
            .replace_rows(&table, rows)
            .map_err(|e| AdapterError::from_store_write(e, &table))?;

        let fields = edit
            .changed_fields()
            .into_iter()
            .map(String::from)
            .collect();
        info!(table = %table, username, "Updated user");

        Ok(EditOutcome::Updated {
            user: user.to_record(),
            fields,
        })
    }
}

/// Overlays the known columns of `updated` onto `row`.
fn merge_row(row: &mut Value, updated: Value) {
    match (row, updated) {
        (Value::Object(target), Value::Object(source)) => {
            for (key, value) in source {
                target.insert(key, value);
            }
        }
        (row, updated) => *row = updated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use cmsmgmt_store::StoreError;
    use serde::Deserialize;
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    #[derive(Serialize, Deserialize)]
    struct TestUser {
        id: i64,
        username: String,
        #[serde(default)]
        email: String,
    }

    impl NativeUser for TestUser {
        fn username(&self) -> &str {
            &self.username
        }

        fn to_record(&self) -> UserRecord {
            UserRecord::new(self.id, self.username.as_str(), "", self.email.as_str())
        }

        fn apply(&mut self, edit: &UserEdit) {
            if let Some(email) = &edit.email {
                self.email = email.clone();
            }
        }
    }

    /// In-memory store whose writes always fail.
    struct ReadOnlyStore {
        tables: BTreeMap<String, Vec<Value>>,
        write_attempts: usize,
    }

    impl UserStore for ReadOnlyStore {
        fn tables(&self) -> Vec<String> {
            self.tables.keys().cloned().collect()
        }

        fn rows(&self, table: &str) -> cmsmgmt_store::Result<Vec<Value>> {
            self.tables
                .get(table)
                .cloned()
                .ok_or_else(|| StoreError::TableNotFound(table.to_string()))
        }

        fn replace_rows(
            &mut self,
            _table: &str,
            _rows: Vec<Value>,
        ) -> cmsmgmt_store::Result<()> {
            self.write_attempts += 1;
            Err(StoreError::Unavailable {
                path: PathBuf::from("/readonly/db.json"),
                reason: "read-only filesystem".to_string(),
            })
        }
    }

    #[test]
    fn test_merge_keeps_unknown_columns() {
        let mut row = json!({"id": 1, "username": "admin", "password": "$2y$10$hash"});
        merge_row(&mut row, json!({"id": 1, "username": "admin", "email": "new@example.com"}));

        assert_eq!(row["password"], "$2y$10$hash");
        assert_eq!(row["email"], "new@example.com");
    }

    #[test]
    fn test_merge_non_object_replaces() {
        let mut row = json!(null);
        merge_row(&mut row, json!({"id": 1}));
        assert_eq!(row, json!({"id": 1}));
    }

    #[test]
    fn test_table_name() {
        let table = UserTable {
            database: "joomla_db",
            prefix: "jos_",
        };
        assert_eq!(table.name(), "jos_users");
    }

    #[test]
    fn test_failed_commit_is_write_error_and_keeps_rows() {
        let rows = vec![
            json!({"id": 1, "username": "admin", "email": "admin@example.com"}),
            json!({"id": 2, "username": "jane", "email": "jane@example.com"}),
        ];
        let mut store = ReadOnlyStore {
            tables: BTreeMap::from([("wp_users".to_string(), rows.clone())]),
            write_attempts: 0,
        };
        let table = UserTable {
            database: "wordpress",
            prefix: "wp_",
        };
        let edit = UserEdit {
            email: Some("new@example.com".to_string()),
            ..Default::default()
        };

        let err = table.edit::<TestUser>(&mut store, "jane", &edit).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Write);
        assert_eq!(store.write_attempts, 1);
        assert_eq!(store.tables["wp_users"], rows);
    }
}
