mod common;

use std::fs;

use finanza_core::{
    config::Config,
    core::{
        services::{AuthService, CategoryService},
        Database,
    },
    domain::{Category, MovementKind, Role},
    storage::{JsonFileStore, KeyValueStore, StoreKeys},
};

use common::{open_database, setup_test_env, temp_base, today};

#[test]
fn collections_are_written_under_prefixed_keys() {
    let (_db, _config, base) = setup_test_env();
    let store = base.join("store");
    for key in [
        "finanzapro_users",
        "finanzapro_movements",
        "finanzapro_categories",
        "finanzapro_budgets",
    ] {
        assert!(store.join(format!("{key}.json")).exists(), "missing {key}");
    }
    assert!(!store.join("finanzapro_current_user.json").exists());

    let movements = fs::read_to_string(store.join("finanzapro_movements.json")).unwrap();
    assert!(movements.contains("\"userId\":\"u1\""));
    assert!(movements.contains("\"categoryId\":\"c1-u1\""));
    assert!(movements.contains("\"type\":\"income\""));
}

#[test]
fn session_survives_reopening_the_store() {
    let (mut db, _config, base) = setup_test_env();
    AuthService::login(&mut db, "maria@example.com", "123456", Role::User).unwrap();
    drop(db);

    let mut reopened = open_database(&base);
    let user = AuthService::current_user(&reopened).unwrap().unwrap();
    assert_eq!(user.id, "u2");

    AuthService::logout(&mut reopened).unwrap();
    assert!(open_database(&base).current_user().unwrap().is_none());
}

#[test]
fn saved_records_are_visible_to_a_new_database() {
    let (mut db, _config, base) = setup_test_env();
    AuthService::login(&mut db, "carlos@example.com", "123456", Role::User).unwrap();
    let saved = CategoryService::save(
        &mut db,
        Category::new("Mascotas", MovementKind::Expense).with_color("#123456"),
    )
    .unwrap();
    assert!(saved.id.starts_with('c'));

    let reopened = open_database(&base);
    let found = reopened
        .categories(Some("u3"))
        .unwrap()
        .into_iter()
        .find(|category| category.id == saved.id)
        .unwrap();
    assert_eq!(found.name, "Mascotas");
    assert_eq!(found.user_id.as_deref(), Some("u3"));
    assert_eq!(found.color, "#123456");
}

#[test]
fn initialize_keeps_existing_collections() {
    let (mut db, _config, base) = setup_test_env();
    db.delete_movement("m1").unwrap();

    let mut reopened = open_database(&base);
    reopened.initialize(today()).unwrap();
    let ids: Vec<_> = reopened
        .movements(None)
        .unwrap()
        .into_iter()
        .map(|movement| movement.id)
        .collect();
    assert_eq!(ids, vec!["m2", "m3"]);
}

#[test]
fn custom_prefix_isolates_collections() {
    let base = temp_base();
    let config = Config {
        key_prefix: "demo".into(),
        ..Config::default()
    };
    let store = JsonFileStore::new(base.join("store")).unwrap();
    let mut db = Database::with_keys(Box::new(store), config.store_keys());
    db.initialize(today()).unwrap();

    let keys = StoreKeys::with_prefix("demo");
    let raw = JsonFileStore::new(base.join("store")).unwrap();
    assert!(raw.contains(&keys.users).unwrap());
    assert!(!raw.contains(&StoreKeys::default().users).unwrap());
}

#[test]
fn hand_written_store_contents_are_readable() {
    let base = temp_base();
    let store_dir = base.join("store");
    fs::create_dir_all(&store_dir).unwrap();
    fs::write(
        store_dir.join("finanzapro_movements.json"),
        r#"[{"id":"m9","userId":"u1","type":"expense","description":"Taxi","amount":80,"categoryId":"c4-u1","date":"2024-02-10"}]"#,
    )
    .unwrap();

    let db = open_database(&base);
    let movements = db.movements(Some("u1")).unwrap();
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].amount, 80.0);
    assert_eq!(movements[0].kind, MovementKind::Expense);
    assert!(db.users().unwrap().is_empty());
}
