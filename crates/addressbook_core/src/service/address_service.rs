//! Address use-case service.
//!
//! # Responsibility
//! - Build and validate addresses, then persist them through `Dao`.
//! - Own the address domain-to-storage attribute mapping.
//!
//! # Invariants
//! - Blank patch fields are never written; they keep stored values.
//! - A patch never rewrites the `id` attribute.

use super::{require_id, ServiceError, ServiceResult};
use crate::model::address::{Address, AddressInput};
use crate::model::record::{Record, RecordKey, ID_ATTRIBUTE};
use crate::repo::dao::Dao;
use crate::store::ItemStore;

const ATTR_CITY: &str = "residential_city";
const ATTR_STATE: &str = "residential_state";
const ATTR_APT: &str = "apt";
const ATTR_BUILDING: &str = "building";
const ATTR_STREET: &str = "street";
const ATTR_ZIP_CODE: &str = "zip_code";

pub struct AddressService<S: ItemStore> {
    dao: Dao<S>,
}

impl<S: ItemStore> AddressService<S> {
    pub fn new(store: S) -> Self {
        Self {
            dao: Dao::new(store),
        }
    }

    /// Builds a validated address from input and persists it.
    pub fn create(&self, input: &AddressInput) -> ServiceResult<Address> {
        let address = Address::new(input)?;
        self.save(&address)
    }

    /// Persists an already-built address.
    ///
    /// Fails with `ObjectExists` when its id is taken.
    pub fn save(&self, address: &Address) -> ServiceResult<Address> {
        address.validate()?;
        let key = RecordKey::id(address.id.as_str());
        self.dao.insert(&key, address_to_record(address))?;
        Ok(address.clone())
    }

    /// Returns the live address with `id`, or `None` when absent or deleted.
    pub fn fetch(&self, id: &str) -> ServiceResult<Option<Address>> {
        let id = require_id(id)?;
        self.dao
            .fetch_by_key(&RecordKey::id(id))?
            .map(|record| record_to_address(&record))
            .transpose()
    }

    pub fn fetch_all(&self) -> ServiceResult<Vec<Address>> {
        self.dao
            .fetch_all()?
            .iter()
            .map(record_to_address)
            .collect()
    }

    /// Soft-deletes the address with `id` and returns it.
    pub fn delete(&self, id: &str) -> ServiceResult<Address> {
        let id = require_id(id)?;
        let record = self.dao.soft_delete(&RecordKey::id(id))?;
        record_to_address(&record)
    }

    /// Merges the non-blank fields of `patch` into the stored address.
    pub fn update(&self, id: &str, patch: &AddressInput) -> ServiceResult<Address> {
        let id = require_id(id)?;
        patch.validate_patch()?;
        let partial = address_patch_to_record(patch);
        let record = self.dao.merge_update(&RecordKey::id(id), &partial)?;
        record_to_address(&record)
    }
}

/// Maps a full address onto storage attributes.
pub fn address_to_record(address: &Address) -> Record {
    let mut record = Record::new().with(ID_ATTRIBUTE, address.id.as_str());
    insert_optional(&mut record, ATTR_CITY, address.city.as_deref());
    insert_optional(&mut record, ATTR_STATE, address.state.as_deref());
    insert_optional(&mut record, ATTR_APT, address.apt.as_deref());
    insert_optional(&mut record, ATTR_BUILDING, address.number.as_deref());
    insert_optional(&mut record, ATTR_STREET, address.street.as_deref());
    insert_optional(&mut record, ATTR_ZIP_CODE, address.zip_code.as_deref());
    record.set_deleted(address.deleted);
    record
}

/// Maps the present fields of a patch onto storage attributes.
pub fn address_patch_to_record(patch: &AddressInput) -> Record {
    let patch = patch.normalized();
    let mut record = Record::new();
    insert_optional(&mut record, ATTR_CITY, patch.city.as_deref());
    insert_optional(&mut record, ATTR_STATE, patch.state.as_deref());
    insert_optional(&mut record, ATTR_APT, patch.apt.as_deref());
    insert_optional(&mut record, ATTR_BUILDING, patch.number.as_deref());
    insert_optional(&mut record, ATTR_STREET, patch.street.as_deref());
    insert_optional(&mut record, ATTR_ZIP_CODE, patch.zip_code.as_deref());
    record
}

/// Maps stored attributes back onto an address.
pub fn record_to_address(record: &Record) -> ServiceResult<Address> {
    let id = record.id().ok_or_else(|| {
        ServiceError::DataObjectError("stored address has no textual `id`".to_string())
    })?;

    Ok(Address {
        id: id.to_string(),
        city: record.text(ATTR_CITY).map(str::to_string),
        state: record.text(ATTR_STATE).map(str::to_string),
        apt: record.text(ATTR_APT).map(str::to_string),
        number: record.text(ATTR_BUILDING).map(str::to_string),
        street: record.text(ATTR_STREET).map(str::to_string),
        zip_code: record.text(ATTR_ZIP_CODE).map(str::to_string),
        deleted: record.is_deleted(),
    })
}

pub(crate) fn insert_optional(record: &mut Record, name: &str, value: Option<&str>) {
    if let Some(value) = value {
        record.insert(name, value);
    }
}
