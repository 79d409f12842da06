//! Record access layer.
//!
//! # Responsibility
//! - Expose insert/fetch/soft-delete/merge-update over one item table.
//! - Return semantic errors (`AlreadyExists`, `NotFound`) alongside raw
//!   store failures.

pub mod dao;
