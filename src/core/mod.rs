//! Core export logic: mime resolution, on-disk layout, and the export
//! pipeline itself.

pub mod export;
pub mod layout;
pub mod mime;
