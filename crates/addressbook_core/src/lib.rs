//! Core domain logic for the addressbook backend.
//! Customers and addresses persisted as items in a single-table store.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use config::StoreConfig;
pub use error::{
    classify, respond_with, send_response, Classification, Classify, ErrorReply, FailureKind,
    StatusCategory,
};
pub use logging::{
    default_log_level, init_logging, init_logging_from_env, logging_status, LoggingError,
};
pub use model::address::{Address, AddressInput};
pub use model::customer::{Customer, CustomerInput};
pub use model::record::{AttributeValue, Record, RecordKey};
pub use model::ModelError;
pub use repo::dao::{Dao, DaoError, DaoResult};
pub use service::address_service::AddressService;
pub use service::customer_service::CustomerService;
pub use service::{ServiceError, ServiceResult};
pub use store::{ItemStore, ScanFilter, SqliteItemStore, StoreError, StoreResult, UpdateSet};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
