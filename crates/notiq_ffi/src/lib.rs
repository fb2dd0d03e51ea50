//! Flutter-facing bindings for NotIQ core.

pub mod api;
