//! Customer use-case service.
//!
//! # Responsibility
//! - Create customers together with their address.
//! - Resolve `address_ref` into an embedded address on reads.
//! - Route patch fields to the customer or the referenced address.
//!
//! # Invariants
//! - `id` is the customer email and cannot be changed by a patch.
//! - A failed customer insert leaves no live orphan address behind.

use super::address_service::{insert_optional, AddressService};
use super::{require_id, ServiceError, ServiceResult};
use crate::model::address::Address;
use crate::model::customer::{Customer, CustomerInput};
use crate::model::record::{Record, RecordKey, ID_ATTRIBUTE};
use crate::repo::dao::Dao;
use crate::store::ItemStore;
use log::warn;

const ATTR_FIRST_NAME: &str = "first_name";
const ATTR_LAST_NAME: &str = "last_name";
const ATTR_PHONE_NUMBER: &str = "phone_number";
const ATTR_ADDRESS_REF: &str = "address_ref";

pub struct CustomerService<C: ItemStore, A: ItemStore> {
    dao: Dao<C>,
    addresses: AddressService<A>,
}

impl<C: ItemStore, A: ItemStore> CustomerService<C, A> {
    pub fn new(customer_store: C, addresses: AddressService<A>) -> Self {
        Self {
            dao: Dao::new(customer_store),
            addresses,
        }
    }

    pub fn addresses(&self) -> &AddressService<A> {
        &self.addresses
    }

    /// Validates input, saves the address, then saves the customer.
    ///
    /// The address is soft-deleted again when the customer insert fails.
    pub fn create(&self, input: &CustomerInput) -> ServiceResult<Customer> {
        let mut customer = Customer::new(input)?;
        let key = RecordKey::id(customer.id.as_str());
        if self.dao.fetch_by_key(&key)?.is_some() {
            return Err(ServiceError::ObjectExists(key.to_string()));
        }

        let address = match customer.address.as_ref() {
            Some(address) => self.addresses.save(address)?,
            None => return Err(ServiceError::InvalidInput("address")),
        };

        let record = customer_to_record(&customer, &address.id);
        if let Err(err) = self.dao.insert(&key, record) {
            if let Err(cleanup_err) = self.addresses.delete(&address.id) {
                warn!(
                    "event=customer_create module=service status=cleanup_failed address_id={} error={}",
                    address.id, cleanup_err
                );
            }
            return Err(err.into());
        }

        customer.address = Some(address);
        Ok(customer)
    }

    /// Returns the live customer with `id` and its live address.
    pub fn fetch(&self, id: &str) -> ServiceResult<Option<Customer>> {
        let id = customer_id(id)?;
        match self.dao.fetch_by_key(&RecordKey::id(id))? {
            Some(record) => self.resolve(&record).map(Some),
            None => Ok(None),
        }
    }

    pub fn fetch_all(&self) -> ServiceResult<Vec<Customer>> {
        self.dao
            .fetch_all()?
            .iter()
            .map(|record| self.resolve(record))
            .collect()
    }

    /// Soft-deletes the customer, then its address when still live.
    pub fn delete(&self, id: &str) -> ServiceResult<Customer> {
        let id = customer_id(id)?;
        let record = self.dao.soft_delete(&RecordKey::id(id))?;

        let address = match record.text(ATTR_ADDRESS_REF) {
            Some(address_id) if self.addresses.fetch(address_id)?.is_some() => {
                Some(self.addresses.delete(address_id)?)
            }
            _ => None,
        };
        record_to_customer(&record, address)
    }

    /// Merges the non-blank customer fields of `patch`, then its address fields.
    ///
    /// The customer and, when the patch carries address fields, its address
    /// must both be live before anything is written.
    pub fn update(&self, id: &str, patch: &CustomerInput) -> ServiceResult<Customer> {
        let id = customer_id(id)?;
        patch.validate_patch()?;
        let patch = patch.normalized();
        if let Some(email) = patch.email.as_deref() {
            if email != id {
                return Err(ServiceError::InvalidInput("email"));
            }
        }

        let key = RecordKey::id(id.as_str());
        let current = self
            .dao
            .fetch_by_key(&key)?
            .ok_or_else(|| ServiceError::ObjectNotFound(key.to_string()))?;

        let address_patch = patch.address.as_ref().filter(|input| !input.is_blank());
        let address_id = match address_patch {
            Some(_) => {
                let address_id = current.text(ATTR_ADDRESS_REF).ok_or_else(|| {
                    ServiceError::DataObjectError(format!("customer {id} has no address_ref"))
                })?;
                if self.addresses.fetch(address_id)?.is_none() {
                    return Err(ServiceError::ObjectNotFound(
                        RecordKey::id(address_id).to_string(),
                    ));
                }
                Some(address_id.to_string())
            }
            None => None,
        };

        let partial = customer_patch_to_record(&patch);
        let record = self.dao.merge_update(&key, &partial)?;
        if let (Some(address_id), Some(address_patch)) = (address_id, address_patch) {
            self.addresses.update(&address_id, address_patch)?;
        }

        self.resolve(&record)
    }

    fn resolve(&self, record: &Record) -> ServiceResult<Customer> {
        let address = match record.text(ATTR_ADDRESS_REF) {
            Some(address_id) => self.addresses.fetch(address_id)?,
            None => None,
        };
        record_to_customer(record, address)
    }
}

/// Customer ids are emails, stored lowercased.
fn customer_id(id: &str) -> ServiceResult<String> {
    require_id(id).map(str::to_ascii_lowercase)
}

/// Maps a customer onto storage attributes, referencing `address_id`.
pub fn customer_to_record(customer: &Customer, address_id: &str) -> Record {
    let mut record = Record::new()
        .with(ID_ATTRIBUTE, customer.id.as_str())
        .with(ATTR_FIRST_NAME, customer.first_name.as_str())
        .with(ATTR_LAST_NAME, customer.last_name.as_str())
        .with(ATTR_ADDRESS_REF, address_id);
    insert_optional(
        &mut record,
        ATTR_PHONE_NUMBER,
        customer.phone_number.as_deref(),
    );
    record.set_deleted(customer.deleted);
    record
}

/// Maps the present customer fields of a normalized patch.
///
/// Address fields are excluded; they belong to the address record.
pub fn customer_patch_to_record(patch: &CustomerInput) -> Record {
    let mut record = Record::new();
    insert_optional(&mut record, ATTR_FIRST_NAME, patch.first_name.as_deref());
    insert_optional(&mut record, ATTR_LAST_NAME, patch.last_name.as_deref());
    insert_optional(
        &mut record,
        ATTR_PHONE_NUMBER,
        patch.phone_number.as_deref(),
    );
    record
}

/// Maps stored attributes and a resolved address back onto a customer.
pub fn record_to_customer(record: &Record, address: Option<Address>) -> ServiceResult<Customer> {
    let required = |name: &'static str| {
        record.text(name).map(str::to_string).ok_or_else(|| {
            ServiceError::DataObjectError(format!("stored customer has no textual `{name}`"))
        })
    };
    let id = required(ID_ATTRIBUTE)?;

    Ok(Customer {
        email: id.clone(),
        id,
        first_name: required(ATTR_FIRST_NAME)?,
        last_name: required(ATTR_LAST_NAME)?,
        phone_number: record.text(ATTR_PHONE_NUMBER).map(str::to_string),
        address,
        deleted: record.is_deleted(),
    })
}

#[cfg(test)]
mod tests {
    use super::{customer_patch_to_record, record_to_customer};
    use crate::model::address::AddressInput;
    use crate::model::customer::CustomerInput;
    use crate::model::record::Record;

    #[test]
    fn patch_keeps_only_present_customer_fields() {
        let patch = CustomerInput {
            first_name: Some("Jose".to_string()),
            last_name: Some(String::new()),
            email: Some("josruice@gmail.com".to_string()),
            phone_number: Some(String::new()),
            address: Some(AddressInput::default()),
        }
        .normalized();

        let record = customer_patch_to_record(&patch);
        assert_eq!(record, Record::new().with("first_name", "Jose"));
    }

    #[test]
    fn stored_customer_maps_email_from_id() {
        let record = Record::new()
            .with("id", "josruice@gmail.com")
            .with("first_name", "Pedro")
            .with("last_name", "Ruiz")
            .with("address_ref", "ed7888cd")
            .with("deleted", false);

        let customer = record_to_customer(&record, None).unwrap();
        assert_eq!(customer.email, "josruice@gmail.com");
        assert_eq!(customer.phone_number, None);
        assert!(customer.is_active());
    }
}
