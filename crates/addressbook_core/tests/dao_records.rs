mod support;

use addressbook_core::db::open_db_in_memory;
use addressbook_core::{AttributeValue, Dao, DaoError, Record, RecordKey};
use support::{stored_address, RecordingStore};

#[test]
fn merge_update_with_equal_values_issues_no_write() {
    let conn = open_db_in_memory().unwrap();
    let store = RecordingStore::new(&conn, "addresses");
    let key = RecordKey::id("X");
    store.seed(&key, &stored_address("X"));
    let dao = Dao::new(&store);

    let partial = Record::new()
        .with("id", "X")
        .with("building", "53")
        .with("street", "Main St");
    let returned = dao.merge_update(&key, &partial).unwrap();

    assert_eq!(returned, stored_address("X"));
    assert_eq!(store.write_count(), 0);
}

#[test]
fn merge_update_with_empty_partial_is_a_no_op() {
    let conn = open_db_in_memory().unwrap();
    let store = RecordingStore::new(&conn, "addresses");
    let key = RecordKey::id("X");
    store.seed(&key, &stored_address("X"));
    let dao = Dao::new(&store);

    let returned = dao.merge_update(&key, &Record::new()).unwrap();
    assert_eq!(returned, stored_address("X"));
    assert_eq!(store.write_count(), 0);
}

#[test]
fn merge_update_writes_only_the_changed_attribute() {
    let conn = open_db_in_memory().unwrap();
    let store = RecordingStore::new(&conn, "addresses");
    let key = RecordKey::id("X");
    store.seed(
        &key,
        &Record::new()
            .with("id", "X")
            .with("building", "53")
            .with("street", "Main St"),
    );
    let dao = Dao::new(&store);

    let returned = dao
        .merge_update(&key, &Record::new().with("building", "112"))
        .unwrap();

    let update = store.last_update().unwrap();
    assert_eq!(update.attributes(), vec!["building"]);
    assert_eq!(update.expression(), "SET #attr0 = :val0");
    assert_eq!(store.update_count(), 1);
    assert_eq!(store.put_count(), 0);
    assert_eq!(
        returned,
        Record::new()
            .with("id", "X")
            .with("building", "112")
            .with("street", "Main St")
    );
}

#[test]
fn merge_update_preserves_untouched_attributes() {
    let conn = open_db_in_memory().unwrap();
    let store = RecordingStore::new(&conn, "addresses");
    let key = RecordKey::id("X");
    store.seed(&key, &stored_address("X"));
    let dao = Dao::new(&store);

    let partial = Record::new()
        .with("building", "112")
        .with("street", "Main St")
        .with("apt", "7B");
    let returned = dao.merge_update(&key, &partial).unwrap();

    assert_eq!(store.last_update().unwrap().attributes(), vec!["apt", "building"]);
    let expected = stored_address("X").with("building", "112").with("apt", "7B");
    assert_eq!(returned, expected);
    assert_eq!(dao.fetch_by_key(&key).unwrap(), Some(expected));
}

#[test]
fn merge_update_on_missing_or_deleted_record_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let store = RecordingStore::new(&conn, "addresses");
    let dao = Dao::new(&store);
    let partial = Record::new().with("building", "112");

    let missing = dao.merge_update(&RecordKey::id("missing"), &partial).unwrap_err();
    assert!(matches!(missing, DaoError::NotFound(_)));

    let key = RecordKey::id("gone");
    store.seed(&key, &stored_address("gone").with("deleted", true));
    let deleted = dao.merge_update(&key, &partial).unwrap_err();
    assert!(matches!(deleted, DaoError::NotFound(ref k) if *k == key));
    assert_eq!(store.write_count(), 0);
}

#[test]
fn insert_rejects_any_existing_item_including_deleted() {
    let conn = open_db_in_memory().unwrap();
    let store = RecordingStore::new(&conn, "addresses");
    let dao = Dao::new(&store);
    let key = RecordKey::id("A");

    let inserted = dao.insert(&key, stored_address("A")).unwrap();
    assert_eq!(inserted, stored_address("A"));

    let duplicate = dao.insert(&key, stored_address("A")).unwrap_err();
    assert!(matches!(duplicate, DaoError::AlreadyExists(_)));

    dao.soft_delete(&key).unwrap();
    let after_delete = dao.insert(&key, stored_address("A")).unwrap_err();
    assert!(matches!(after_delete, DaoError::AlreadyExists(_)));
    assert_eq!(store.put_count(), 2);
}

#[test]
fn fetch_by_key_hides_soft_deleted_records() {
    let conn = open_db_in_memory().unwrap();
    let store = RecordingStore::new(&conn, "addresses");
    let dao = Dao::new(&store);
    let key = RecordKey::id("A");
    dao.insert(&key, stored_address("A")).unwrap();

    assert!(dao.fetch_by_key(&key).unwrap().is_some());
    dao.soft_delete(&key).unwrap();
    assert_eq!(dao.fetch_by_key(&key).unwrap(), None);
    assert_eq!(dao.fetch_by_key(&RecordKey::id("never")).unwrap(), None);
}

#[test]
fn soft_delete_flips_only_the_flag() {
    let conn = open_db_in_memory().unwrap();
    let store = RecordingStore::new(&conn, "addresses");
    let dao = Dao::new(&store);
    let key = RecordKey::id("A");
    dao.insert(&key, stored_address("A")).unwrap();

    let deleted = dao.soft_delete(&key).unwrap();
    assert_eq!(deleted, stored_address("A").with("deleted", true));

    let again = dao.soft_delete(&key).unwrap();
    assert_eq!(again, deleted);

    let err = dao.soft_delete(&RecordKey::id("missing")).unwrap_err();
    assert!(matches!(err, DaoError::NotFound(_)));
}

#[test]
fn fetch_all_returns_only_live_records_in_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let store = RecordingStore::new(&conn, "addresses");
    let dao = Dao::new(&store);

    for id in ["a", "b", "c"] {
        dao.insert(&RecordKey::id(id), stored_address(id)).unwrap();
    }
    dao.soft_delete(&RecordKey::id("b")).unwrap();

    let ids = dao
        .fetch_all()
        .unwrap()
        .iter()
        .map(|record| record.id().unwrap().to_string())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["a", "c"]);
}

#[test]
fn merge_update_compares_values_strictly() {
    let conn = open_db_in_memory().unwrap();
    let store = RecordingStore::new(&conn, "items");
    let dao = Dao::new(&store);
    let key = RecordKey::id("n");
    dao.insert(
        &key,
        Record::new()
            .with("id", "n")
            .with("count", 1_i64)
            .with("deleted", false),
    )
    .unwrap();

    let updated = dao
        .merge_update(&key, &Record::new().with("count", 1.0_f64))
        .unwrap();
    assert_eq!(updated.get("count"), Some(&AttributeValue::Float(1.0)));
    assert_eq!(store.update_count(), 1);
}

#[test]
fn merge_update_accepts_attribute_names_with_path_characters() {
    let conn = open_db_in_memory().unwrap();
    let store = RecordingStore::new(&conn, "addresses");
    let key = RecordKey::id("X");
    store.seed(&key, &stored_address("X"));
    let dao = Dao::new(&store);

    let partial = Record::new()
        .with("a\"b", "quoted")
        .with("a.b", "dotted")
        .with("$[0]", "bracketed");
    let returned = dao.merge_update(&key, &partial).unwrap();

    assert_eq!(returned.text("a\"b"), Some("quoted"));
    assert_eq!(returned.text("a.b"), Some("dotted"));
    assert_eq!(returned.text("$[0]"), Some("bracketed"));
    assert_eq!(returned.text("street"), Some("Main St"));
    assert_eq!(dao.fetch_by_key(&key).unwrap(), Some(returned));
}
