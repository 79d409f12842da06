mod support;

use addressbook_core::db::open_db_in_memory;
use addressbook_core::{
    send_response, AddressInput, AddressService, ItemStore, RecordKey, ServiceError,
};
use support::{stored_address, RecordingStore};

fn las_vegas() -> AddressInput {
    AddressInput {
        city: Some("Las Vegas".to_string()),
        state: Some("NV".to_string()),
        apt: Some("190".to_string()),
        number: Some("890".to_string()),
        street: Some("Second Street".to_string()),
        zip_code: Some("43090".to_string()),
        ..AddressInput::default()
    }
}

#[test]
fn create_persists_storage_shaped_record() {
    let conn = open_db_in_memory().unwrap();
    let store = RecordingStore::new(&conn, "addresses");
    let service = AddressService::new(&store);

    let address = service.create(&las_vegas()).unwrap();

    let record = store.get(&RecordKey::id(address.id.as_str())).unwrap().unwrap();
    assert_eq!(record.text("residential_city"), Some("Las Vegas"));
    assert_eq!(record.text("building"), Some("890"));
    assert!(!record.is_deleted());
    assert_eq!(service.fetch(&address.id).unwrap(), Some(address));
}

#[test]
fn update_maps_number_to_building_and_writes_only_it() {
    let conn = open_db_in_memory().unwrap();
    let store = RecordingStore::new(&conn, "addresses");
    let id = "e7a02e34-371f-41f7-81f7-ca3f4be9c546";
    store.seed(&RecordKey::id(id), &stored_address(id));
    let service = AddressService::new(&store);

    let patch = AddressInput {
        number: Some("112".to_string()),
        ..AddressInput::default()
    };
    let updated = service.update(id, &patch).unwrap();

    assert_eq!(updated.number.as_deref(), Some("112"));
    assert_eq!(updated.street.as_deref(), Some("Main St"));
    assert_eq!(updated.city.as_deref(), Some("Champaign"));
    assert_eq!(
        store.last_update().unwrap().attributes(),
        vec!["building"]
    );
}

#[test]
fn update_with_same_values_returns_stored_address_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let store = RecordingStore::new(&conn, "addresses");
    let id = "same";
    store.seed(&RecordKey::id(id), &stored_address(id));
    let service = AddressService::new(&store);

    let patch = AddressInput {
        street: Some("Main St".to_string()),
        state: Some("il".to_string()),
        ..AddressInput::default()
    };
    let updated = service.update(id, &patch).unwrap();
    assert_eq!(updated.state.as_deref(), Some("IL"));
    assert_eq!(store.write_count(), 0);
}

#[test]
fn fetch_of_deleted_address_is_empty_and_update_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let store = RecordingStore::new(&conn, "addresses");
    let service = AddressService::new(&store);
    let address = service.create(&las_vegas()).unwrap();

    let deleted = service.delete(&address.id).unwrap();
    assert!(deleted.deleted);
    assert_eq!(deleted.street, address.street);

    assert_eq!(service.fetch(&address.id).unwrap(), None);
    assert!(service.fetch_all().unwrap().is_empty());

    let patch = AddressInput {
        apt: Some("1".to_string()),
        ..AddressInput::default()
    };
    let err = service.update(&address.id, &patch).unwrap_err();
    assert!(matches!(err, ServiceError::ObjectNotFound(_)));
}

#[test]
fn invalid_input_never_reaches_the_store() {
    let conn = open_db_in_memory().unwrap();
    let store = RecordingStore::new(&conn, "addresses");
    let service = AddressService::new(&store);

    let mut vague = las_vegas();
    vague.number = None;
    let reply = send_response(service.create(&vague)).unwrap_err();
    assert_eq!(reply.message, "Address is not specific enough");

    let bad_zip = AddressInput {
        zip_code: Some("ABCDE".to_string()),
        ..AddressInput::default()
    };
    let reply = send_response(service.update("some-id", &bad_zip)).unwrap_err();
    assert_eq!(reply.message, "Address provided is Invalid");

    let reply = send_response(service.delete("  ")).unwrap_err();
    assert_eq!(reply.message, "Invalid Input");
    assert_eq!(reply.http_status(), 400);

    assert_eq!(store.write_count(), 0);
}

#[test]
fn duplicate_id_maps_to_object_exists() {
    let conn = open_db_in_memory().unwrap();
    let store = RecordingStore::new(&conn, "addresses");
    let service = AddressService::new(&store);

    let mut input = las_vegas();
    input.id = Some("fixed-id".to_string());
    service.create(&input).unwrap();

    let reply = send_response(service.create(&input)).unwrap_err();
    assert_eq!(reply.message, "This id already exists");
    assert_eq!(reply.http_status(), 409);
}
