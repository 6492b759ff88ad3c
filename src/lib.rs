//! fcrepo-export - Fedora 3 repository export tool
//!
//! Migrates digital objects out of a legacy Fedora Commons 3 repository
//! into a plain filesystem tree, one sharded directory per object with its
//! datastream content and metadata, tracking progress in a durable SQLite
//! job ledger so large exports can be interrupted and resumed.
//!
//! # Architecture
//!
//! - `domain` - identifiers, object model, and error types
//! - `config` - TOML configuration with environment overrides
//! - `adapters` - the Fedora 3 REST client behind the `Repository` trait
//! - `core` - mime resolution, directory layout, and the export pipeline
//! - `ledger` - the SQLite job ledger
//! - `cli` - clap commands
//! - `logging` - tracing subscriber setup

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod ledger;
pub mod logging;
