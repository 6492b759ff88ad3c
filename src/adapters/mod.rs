//! External integrations
//!
//! Adapters wrap external systems behind domain-level traits so the export
//! pipeline never depends on wire formats or HTTP client types directly.

pub mod fedora;
