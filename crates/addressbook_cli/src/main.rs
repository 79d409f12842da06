//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `addressbook_core` linkage.
//! - Exercise one create/fetch round-trip against an in-memory store.
//! - Write rolling logs when `ADDRESSBOOK_LOG_DIR` is set.

use addressbook_core::db::open_db_in_memory;
use addressbook_core::{
    init_logging_from_env, send_response, AddressInput, AddressService, SqliteItemStore,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("addressbook_core ping={}", addressbook_core::ping());
    println!("addressbook_core version={}", addressbook_core::core_version());
    match init_logging_from_env() {
        Ok(()) => println!("addressbook_core logging=on"),
        Err(err) => println!("addressbook_core logging=off reason=\"{err}\""),
    }

    let conn = match open_db_in_memory() {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("addressbook_core db_open=failed error={err}");
            return ExitCode::FAILURE;
        }
    };
    let service = AddressService::new(SqliteItemStore::new(&conn, "addresses"));
    let input = AddressInput {
        street: Some("Main St".to_string()),
        number: Some("22".to_string()),
        zip_code: Some("68080".to_string()),
        ..AddressInput::default()
    };

    let outcome = service
        .create(&input)
        .and_then(|address| service.fetch(&address.id));
    match send_response(outcome) {
        Ok(Some(address)) => {
            println!("addressbook_core round_trip=ok id={}", address.id);
            ExitCode::SUCCESS
        }
        Ok(None) => {
            eprintln!("addressbook_core round_trip=missing");
            ExitCode::FAILURE
        }
        Err(reply) => {
            eprintln!(
                "addressbook_core round_trip=failed status={} message={}",
                reply.http_status(),
                reply.message
            );
            ExitCode::FAILURE
        }
    }
}
