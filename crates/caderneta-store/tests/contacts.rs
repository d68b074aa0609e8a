use caderneta_core::domain::GroupName;
use caderneta_store::query::ContactQuery;
use caderneta_store::repo::{ContactNew, ContactUpdate};
use caderneta_store::Store;

fn new_contact(name: &str, phone: &str) -> ContactNew {
    ContactNew {
        name: name.to_string(),
        phone: phone.to_string(),
        email: None,
        group_id: None,
    }
}

#[test]
fn contact_crud_roundtrip() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");

    let now = 1_700_000_000;
    let contact = store
        .contacts()
        .create(
            now,
            ContactNew {
                name: "Ana Souza".to_string(),
                phone: "(11) 98765-4321".to_string(),
                email: Some("ana@example.com.br".to_string()),
                group_id: None,
            },
        )
        .expect("create contact");

    let fetched = store
        .contacts()
        .get(contact.id)
        .expect("get contact")
        .expect("contact exists");
    assert_eq!(fetched.name, "Ana Souza");
    assert_eq!(fetched.phone, "(11) 98765-4321");

    let updated = store
        .contacts()
        .update(
            now + 10,
            contact.id,
            ContactUpdate {
                name: Some("Ana Lima".to_string()),
                email: Some(None),
                ..Default::default()
            },
        )
        .expect("update contact");
    assert_eq!(updated.name, "Ana Lima");
    assert!(updated.email.is_none());
    assert_eq!(updated.updated_at, now + 10);

    store.contacts().delete(contact.id).expect("delete contact");
    let missing = store.contacts().get(contact.id).expect("get contact");
    assert!(missing.is_none());
}

#[test]
fn create_rejects_blank_name() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");

    let err = store
        .contacts()
        .create(0, new_contact("   ", "11987654321"))
        .unwrap_err();
    assert!(err.to_string().contains("name is required"));
}

#[test]
fn find_by_phone_matches_across_formats() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");

    store
        .contacts()
        .create(0, new_contact("Ana", "(11) 98765-4321"))
        .expect("create");
    store
        .contacts()
        .create(1, new_contact("Ana antiga", "1187654321"))
        .expect("create");
    store
        .contacts()
        .create(2, new_contact("Bruno", "21999998888"))
        .expect("create");

    let matches = store
        .contacts()
        .find_by_phone("11987654321")
        .expect("find by phone");
    assert_eq!(matches.len(), 2);

    let none = store
        .contacts()
        .find_by_phone("123")
        .expect("find by phone");
    assert!(none.is_empty());
}

#[test]
fn phone_key_tracks_phone_updates() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");

    let contact = store
        .contacts()
        .create(0, new_contact("Ana", "11987654321"))
        .expect("create");

    store
        .contacts()
        .update(
            1,
            contact.id,
            ContactUpdate {
                phone: Some("21912345678".to_string()),
                ..Default::default()
            },
        )
        .expect("update");

    assert!(store
        .contacts()
        .find_by_phone("11987654321")
        .expect("find")
        .is_empty());
    assert_eq!(
        store
            .contacts()
            .find_by_phone("2112345678")
            .expect("find")
            .len(),
        1
    );
}

#[test]
fn invalid_phone_is_stored_with_null_key() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");

    let contact = store
        .contacts()
        .create(0, new_contact("Legado", "123"))
        .expect("create");
    let fetched = store
        .contacts()
        .get(contact.id)
        .expect("get")
        .expect("exists");
    assert_eq!(fetched.phone, "123");
    assert!(store
        .contacts()
        .find_by_phone("123")
        .expect("find")
        .is_empty());
}

#[test]
fn list_filters_by_text_and_group() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");

    let group = store
        .groups()
        .create(0, GroupName::new("Clientes").expect("group name"))
        .expect("create group");

    store
        .contacts()
        .create(
            0,
            ContactNew {
                name: "Ana Souza".to_string(),
                phone: "11987654321".to_string(),
                email: None,
                group_id: Some(group.id),
            },
        )
        .expect("create");
    store
        .contacts()
        .create(1, new_contact("Bruno Costa", "21999998888"))
        .expect("create");

    let query = ContactQuery::with_text("souza");
    let found = store.contacts().list(&query).expect("list");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Ana Souza");

    let mut by_group = ContactQuery::default();
    by_group.group_id = Some(group.id);
    let members = store.contacts().list(&by_group).expect("list");
    assert_eq!(members.len(), 1);

    let mut ungrouped = ContactQuery::default();
    ungrouped.ungrouped = true;
    let loose = store.contacts().list(&ungrouped).expect("list");
    assert_eq!(loose.len(), 1);
    assert_eq!(loose[0].name, "Bruno Costa");
}

#[test]
fn delete_missing_contact_reports_not_found() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");

    let err = store
        .contacts()
        .delete(caderneta_core::domain::ContactId::new())
        .unwrap_err();
    assert!(matches!(
        err.kind(),
        caderneta_store::error::StoreErrorKind::NotFound
    ));
}
