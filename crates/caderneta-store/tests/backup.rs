use caderneta_store::repo::ContactNew;
use caderneta_store::Store;
use tempfile::TempDir;

#[test]
fn backup_copies_contacts() {
    let temp = TempDir::new().expect("tempdir");
    let db_path = temp.path().join("caderneta.sqlite3");
    let backup_path = temp.path().join("backup.sqlite3");

    let store = Store::open(&db_path).expect("open");
    store.migrate().expect("migrate");
    store
        .contacts()
        .create(
            0,
            ContactNew {
                name: "Ana".to_string(),
                phone: "11987654321".to_string(),
                email: None,
                group_id: None,
            },
        )
        .expect("create");

    store.backup_to(&backup_path).expect("backup");

    let restored = Store::open(&backup_path).expect("open backup");
    assert_eq!(restored.contacts().count().expect("count"), 1);
}

#[test]
fn backup_refuses_live_database_path() {
    let temp = TempDir::new().expect("tempdir");
    let db_path = temp.path().join("caderneta.sqlite3");

    let store = Store::open(&db_path).expect("open");
    store.migrate().expect("migrate");

    let err = store.backup_to(&db_path).unwrap_err();
    assert!(err.to_string().contains("invalid backup path"));
}
