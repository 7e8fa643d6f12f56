//! End-to-end adapter tests against temporary installation trees.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use cmsmgmt_adapters::{AdapterRegistry, Detector, ErrorKind, PlatformAdapter};
use cmsmgmt_models::{EditOutcome, PlatformTag, UserEdit};
use cmsmgmt_store::{Snapshot, SnapshotConnector, SnapshotStore};
use serde_json::json;
use tempfile::{tempdir, TempDir};

struct Site {
    root: TempDir,
    db_dir: TempDir,
}

impl Site {
    fn new() -> Self {
        Self {
            root: tempdir().unwrap(),
            db_dir: tempdir().unwrap(),
        }
    }

    fn root(&self) -> &Path {
        self.root.path()
    }

    fn write(&self, rel: &str, body: &str) {
        let path = self.root.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }

    fn database(&self, name: &str, tables: &[(&str, serde_json::Value)]) -> std::path::PathBuf {
        let mut snapshot = Snapshot::default();
        for (table, rows) in tables {
            let rows = rows.as_array().cloned().unwrap_or_default();
            snapshot.tables.insert(table.to_string(), rows);
        }
        let path = self.db_dir.path().join(format!("{}.json", name));
        SnapshotStore::create(&path, snapshot).unwrap();
        path
    }

    fn registry(&self) -> AdapterRegistry {
        AdapterRegistry::new(Arc::new(SnapshotConnector::new(self.db_dir.path())))
    }

    fn adapter(&self) -> Arc<dyn PlatformAdapter> {
        Detector::new(&self.registry())
            .select(self.root())
            .expect("platform should be detected")
    }
}

fn wordpress_site() -> Site {
    let site = Site::new();
    site.write(
        "wp-config.php",
        "<?php\ndefine( 'DB_NAME', 'wordpress' );\ndefine( 'DB_USER', 'wp_user' );\n$table_prefix = 'wp_';\n",
    );
    site.write(
        "wp-includes/version.php",
        "<?php\n$wp_version = '6.4.2';\n$wp_db_version = 56657;\n",
    );
    site.database(
        "wordpress",
        &[(
            "wp_users",
            json!([
                {"ID": 1, "user_login": "admin", "display_name": "Admin", "user_email": "admin@example.com", "roles": ["administrator"], "user_pass": "$P$B1"},
                {"ID": 2, "user_login": "writer", "display_name": "Writer", "user_email": "writer@example.com", "roles": ["author"]}
            ]),
        )],
    );
    site
}

fn joomla_site() -> Site {
    let site = Site::new();
    site.write(
        "configuration.php",
        "<?php\nclass JConfig {\n\tpublic $host = 'localhost';\n\tpublic $user = 'joomla_user';\n\tpublic $db = 'joomla_db';\n\tpublic $dbprefix = 'jos_';\n}\n",
    );
    site
}

#[test]
fn wordpress_version_has_no_release() {
    let site = wordpress_site();
    let adapter = site.adapter();

    assert_eq!(adapter.platform(), PlatformTag::WordPress);
    let version = adapter.get_version(site.root()).unwrap();
    assert_eq!(version.version, "6.4.2");
    assert_eq!(version.release, "");
}

#[test]
fn wordpress_lists_users_in_table_order() {
    let site = wordpress_site();
    let users = site.adapter().list_users(site.root()).unwrap();

    let names: Vec<_> = users.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["admin", "writer"]);
    assert!(users[0].roles.contains("administrator"));
}

#[test]
fn wordpress_edit_preserves_unknown_columns() {
    let site = wordpress_site();
    let adapter = site.adapter();
    let edit = UserEdit {
        email: Some("root@example.com".to_string()),
        ..Default::default()
    };

    let outcome = adapter.edit_user(site.root(), "admin", &edit).unwrap();
    match outcome {
        EditOutcome::Updated { user, fields } => {
            assert_eq!(user.email, "root@example.com");
            assert_eq!(fields, vec!["email"]);
        }
        other => panic!("expected update, got {:?}", other),
    }

    let raw = fs::read_to_string(site.db_dir.path().join("wordpress.json")).unwrap();
    assert!(raw.contains("root@example.com"));
    assert!(raw.contains("$P$B1"));
}

#[test]
fn edit_unknown_user_leaves_store_untouched() {
    let site = wordpress_site();
    let db_path = site.db_dir.path().join("wordpress.json");
    let before = fs::read(&db_path).unwrap();
    let edit = UserEdit {
        display_name: Some("Ghost".to_string()),
        ..Default::default()
    };

    let err = site
        .adapter()
        .edit_user(site.root(), "ghost", &edit)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(fs::read(&db_path).unwrap(), before);
}

#[test]
fn empty_edit_writes_nothing() {
    let site = wordpress_site();
    let db_path = site.db_dir.path().join("wordpress.json");
    let before = fs::read(&db_path).unwrap();

    let outcome = site
        .adapter()
        .edit_user(site.root(), "writer", &UserEdit::default())
        .unwrap();

    assert!(matches!(outcome, EditOutcome::Unchanged { .. }));
    assert_eq!(fs::read(&db_path).unwrap(), before);
}

#[test]
fn joomla_info_and_users() {
    let site = joomla_site();
    site.database(
        "joomla_db",
        &[
            (
                "jos_users",
                json!([
                    {"id": 42, "username": "admin", "name": "Super User", "email": "admin@example.com", "groups": ["Super Users"]},
                    {"id": 43, "username": "editor", "name": "Editor", "email": "editor@example.com", "groups": []}
                ]),
            ),
            ("jos_usergroups", json!([])),
        ],
    );
    let adapter = site.adapter();
    assert_eq!(adapter.platform(), PlatformTag::Joomla);

    let info = adapter.show_info(site.root()).unwrap();
    assert_eq!(info.database_name, "joomla_db");
    assert_eq!(info.user, "joomla_user");
    assert_eq!(info.table_prefix_candidates, vec!["jos_"]);

    let users = adapter.list_users(site.root()).unwrap();
    assert_eq!(users.len(), 2);
    assert_ne!(users[0].id, users[1].id);
    assert!(users[1].roles.is_empty());
}

#[test]
fn joomla_default_prefix_drives_listing() {
    let site = joomla_site();
    site.database(
        "joomla_db",
        &[
            ("aaa_users", json!([{"id": 1, "username": "other-site"}])),
            ("aaa_usergroups", json!([])),
            ("jos_users", json!([{"id": 7, "username": "this-site"}])),
            ("jos_usergroups", json!([])),
        ],
    );
    let adapter = site.adapter();

    let info = adapter.show_info(site.root()).unwrap();
    assert_eq!(info.table_prefix_candidates, vec!["jos_", "aaa_"]);

    let users = adapter.list_users(site.root()).unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].username, "this-site");
}

#[test]
fn joomla_missing_user_table_is_schema_error() {
    let site = joomla_site();
    site.database("joomla_db", &[("j3_users", json!([]))]);

    let err = site.adapter().list_users(site.root()).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Schema);
    assert_eq!(err.context().as_deref(), Some("table prefix 'jos_'"));
}

#[test]
fn duplicate_ids_are_rejected() {
    let site = joomla_site();
    site.database(
        "joomla_db",
        &[(
            "jos_users",
            json!([{"id": 1, "username": "a"}, {"id": 1, "username": "b"}]),
        )],
    );

    let err = site.adapter().list_users(site.root()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Schema);
}

#[test]
fn malformed_database_is_parse_error() {
    let site = joomla_site();
    fs::write(site.db_dir.path().join("joomla_db.json"), "{ nope").unwrap();

    let err = site.adapter().list_users(site.root()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
}
