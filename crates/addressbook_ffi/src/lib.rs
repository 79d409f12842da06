//! Flutter-facing bindings over `addressbook_core`.

pub mod api;
