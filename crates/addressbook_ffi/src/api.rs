//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose customer and address use-cases to Dart via FRB.
//! - Translate JSON text in and out of core domain types.
//! - Map every failure onto the fixed response messages.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Failure envelopes carry only classifier messages, never internal detail.

use addressbook_core::db::open_db;
use addressbook_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    send_response, AddressInput, AddressService, CustomerInput, CustomerService, ErrorReply,
    FailureKind, ServiceError, ServiceResult, SqliteItemStore, StoreConfig,
};
use log::info;
use rusqlite::Connection;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::OnceLock;

const STATUS_OK: u16 = 200;
const STATUS_CREATED: u16 = 201;
const EMPTY_BODY: &str = "{}";

static STORE_CONFIG: OnceLock<Result<StoreConfig, String>> = OnceLock::new();

type Addresses<'conn> = AddressService<SqliteItemStore<'conn>>;
type Customers<'conn> = CustomerService<SqliteItemStore<'conn>, SqliteItemStore<'conn>>;

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// Returns an empty string on success and the error message on failure.
/// Repeating the same configuration is a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Response envelope shared by every use-case call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub ok: bool,
    /// HTTP-equivalent status code.
    pub status: u16,
    /// Classifier message on failure, short summary on success.
    pub message: String,
    /// JSON body on success.
    pub body: Option<String>,
}

impl ApiResponse {
    fn success(status: u16, body: String) -> Self {
        Self {
            ok: true,
            status,
            message: "OK".to_string(),
            body: Some(body),
        }
    }

    fn failure(reply: &ErrorReply) -> Self {
        Self {
            ok: false,
            status: reply.http_status(),
            message: reply.message.to_string(),
            body: None,
        }
    }
}

/// Creates an address from a JSON `AddressInput`.
#[flutter_rust_bridge::frb(sync)]
pub fn address_create(body_json: String) -> ApiResponse {
    with_store(|conn, config| address_create_on(&addresses(conn, config), &body_json))
}

/// Returns the live address with `id`, or `{}` when there is none.
#[flutter_rust_bridge::frb(sync)]
pub fn address_get(id: String) -> ApiResponse {
    with_store(|conn, config| address_get_on(&addresses(conn, config), &id))
}

#[flutter_rust_bridge::frb(sync)]
pub fn address_list() -> ApiResponse {
    with_store(|conn, config| address_list_on(&addresses(conn, config)))
}

/// Merges the non-blank fields of a JSON `AddressInput` patch.
#[flutter_rust_bridge::frb(sync)]
pub fn address_update(id: String, body_json: String) -> ApiResponse {
    with_store(|conn, config| address_update_on(&addresses(conn, config), &id, &body_json))
}

#[flutter_rust_bridge::frb(sync)]
pub fn address_delete(id: String) -> ApiResponse {
    with_store(|conn, config| address_delete_on(&addresses(conn, config), &id))
}

/// Creates a customer and its address from a JSON `CustomerInput`.
#[flutter_rust_bridge::frb(sync)]
pub fn customer_create(body_json: String) -> ApiResponse {
    with_store(|conn, config| customer_create_on(&customers(conn, config), &body_json))
}

/// Returns the live customer with `id` and its address, or `{}`.
#[flutter_rust_bridge::frb(sync)]
pub fn customer_get(id: String) -> ApiResponse {
    with_store(|conn, config| customer_get_on(&customers(conn, config), &id))
}

#[flutter_rust_bridge::frb(sync)]
pub fn customer_list() -> ApiResponse {
    with_store(|conn, config| customer_list_on(&customers(conn, config)))
}

/// Merges a JSON `CustomerInput` patch; address fields go to the referenced address.
#[flutter_rust_bridge::frb(sync)]
pub fn customer_update(id: String, body_json: String) -> ApiResponse {
    with_store(|conn, config| customer_update_on(&customers(conn, config), &id, &body_json))
}

/// Soft-deletes the customer and its address.
#[flutter_rust_bridge::frb(sync)]
pub fn customer_delete(id: String) -> ApiResponse {
    with_store(|conn, config| customer_delete_on(&customers(conn, config), &id))
}

/// Routes a REST-style request onto the use-case functions.
///
/// - `method`: `GET|POST|PUT|PATCH|DELETE` (case-insensitive).
/// - `resource`: `addresses` or `customers`.
/// - `id`: target id; blank or `None` addresses the collection.
///
/// Unsupported verbs and verb/target combinations answer 405.
#[flutter_rust_bridge::frb(sync)]
pub fn dispatch(
    method: String,
    resource: String,
    id: Option<String>,
    body_json: Option<String>,
) -> ApiResponse {
    with_store(|conn, config| {
        dispatch_on(
            conn,
            config,
            &method,
            &resource,
            id.as_deref(),
            body_json.as_deref(),
        )
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resource {
    Addresses,
    Customers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Create,
    Get,
    List,
    Update,
    Delete,
}

fn parse_resource(raw: &str) -> Option<Resource> {
    match raw.trim().trim_matches('/').to_ascii_lowercase().as_str() {
        "address" | "addresses" => Some(Resource::Addresses),
        "customer" | "customers" => Some(Resource::Customers),
        _ => None,
    }
}

fn parse_route(method: &str, has_id: bool) -> Option<Route> {
    match (method.trim().to_ascii_uppercase().as_str(), has_id) {
        ("GET", true) => Some(Route::Get),
        ("GET", false) => Some(Route::List),
        ("POST", false) => Some(Route::Create),
        ("PUT" | "PATCH", true) => Some(Route::Update),
        ("DELETE", true) => Some(Route::Delete),
        _ => None,
    }
}

fn dispatch_on(
    conn: &Connection,
    config: &StoreConfig,
    method: &str,
    resource: &str,
    id: Option<&str>,
    body_json: Option<&str>,
) -> ApiResponse {
    let id = id.map(str::trim).filter(|value| !value.is_empty());
    let (Some(resource), Some(route)) = (parse_resource(resource), parse_route(method, id.is_some()))
    else {
        info!(
            "event=dispatch module=ffi status=rejected method={} resource={}",
            method.trim(),
            resource.trim()
        );
        return ApiResponse::failure(&ErrorReply::from_kind(FailureKind::MethodNotAllowed));
    };
    let id = id.unwrap_or_default();
    let body = body_json.unwrap_or(EMPTY_BODY);

    match resource {
        Resource::Addresses => {
            let service = addresses(conn, config);
            match route {
                Route::Create => address_create_on(&service, body),
                Route::Get => address_get_on(&service, id),
                Route::List => address_list_on(&service),
                Route::Update => address_update_on(&service, id, body),
                Route::Delete => address_delete_on(&service, id),
            }
        }
        Resource::Customers => {
            let service = customers(conn, config);
            match route {
                Route::Create => customer_create_on(&service, body),
                Route::Get => customer_get_on(&service, id),
                Route::List => customer_list_on(&service),
                Route::Update => customer_update_on(&service, id, body),
                Route::Delete => customer_delete_on(&service, id),
            }
        }
    }
}

fn address_create_on(service: &Addresses<'_>, body_json: &str) -> ApiResponse {
    let outcome = parse_body::<AddressInput>(body_json).and_then(|input| service.create(&input));
    respond(STATUS_CREATED, outcome)
}

fn address_get_on(service: &Addresses<'_>, id: &str) -> ApiResponse {
    respond_optional(service.fetch(id))
}

fn address_list_on(service: &Addresses<'_>) -> ApiResponse {
    respond(STATUS_OK, service.fetch_all())
}

fn address_update_on(service: &Addresses<'_>, id: &str, body_json: &str) -> ApiResponse {
    let outcome =
        parse_body::<AddressInput>(body_json).and_then(|patch| service.update(id, &patch));
    respond(STATUS_OK, outcome)
}

fn address_delete_on(service: &Addresses<'_>, id: &str) -> ApiResponse {
    respond(STATUS_OK, service.delete(id))
}

fn customer_create_on(service: &Customers<'_>, body_json: &str) -> ApiResponse {
    let outcome = parse_body::<CustomerInput>(body_json).and_then(|input| service.create(&input));
    respond(STATUS_CREATED, outcome)
}

fn customer_get_on(service: &Customers<'_>, id: &str) -> ApiResponse {
    respond_optional(service.fetch(id))
}

fn customer_list_on(service: &Customers<'_>) -> ApiResponse {
    respond(STATUS_OK, service.fetch_all())
}

fn customer_update_on(service: &Customers<'_>, id: &str, body_json: &str) -> ApiResponse {
    let outcome =
        parse_body::<CustomerInput>(body_json).and_then(|patch| service.update(id, &patch));
    respond(STATUS_OK, outcome)
}

fn customer_delete_on(service: &Customers<'_>, id: &str) -> ApiResponse {
    respond(STATUS_OK, service.delete(id))
}

fn addresses<'conn>(conn: &'conn Connection, config: &StoreConfig) -> Addresses<'conn> {
    AddressService::new(SqliteItemStore::new(conn, &config.address_table))
}

fn customers<'conn>(conn: &'conn Connection, config: &StoreConfig) -> Customers<'conn> {
    CustomerService::new(
        SqliteItemStore::new(conn, &config.customer_table),
        addresses(conn, config),
    )
}

fn parse_body<T: DeserializeOwned>(body_json: &str) -> ServiceResult<T> {
    let body_json = body_json.trim();
    let body_json = if body_json.is_empty() {
        EMPTY_BODY
    } else {
        body_json
    };
    serde_json::from_str(body_json).map_err(|_| ServiceError::InvalidInput("body"))
}

fn respond<T: Serialize>(status: u16, outcome: ServiceResult<T>) -> ApiResponse {
    let encoded = outcome.and_then(|body| {
        serde_json::to_string(&body)
            .map_err(|err| ServiceError::DataObjectError(format!("response encoding: {err}")))
    });
    match send_response(encoded) {
        Ok(body) => ApiResponse::success(status, body),
        Err(reply) => ApiResponse::failure(&reply),
    }
}

fn respond_optional<T: Serialize>(outcome: ServiceResult<Option<T>>) -> ApiResponse {
    match outcome {
        Ok(None) => ApiResponse::success(STATUS_OK, EMPTY_BODY.to_string()),
        Ok(Some(body)) => respond(STATUS_OK, Ok(body)),
        Err(err) => respond::<()>(STATUS_OK, Err(err)),
    }
}

fn store_config() -> Result<&'static StoreConfig, &'static str> {
    STORE_CONFIG
        .get_or_init(StoreConfig::from_env)
        .as_ref()
        .map_err(String::as_str)
}

fn with_store(f: impl FnOnce(&Connection, &StoreConfig) -> ApiResponse) -> ApiResponse {
    let opened = store_config()
        .map_err(str::to_string)
        .and_then(|config| {
            open_db(&config.db_path)
                .map(|conn| (conn, config))
                .map_err(|err| err.to_string())
        });
    match opened {
        Ok((conn, config)) => f(&conn, config),
        Err(detail) => {
            let reply = send_response(Err::<(), _>(detail))
                .err()
                .unwrap_or_else(|| ErrorReply::from_kind(FailureKind::Unclassified));
            ApiResponse::failure(&reply)
        }
    }
}
