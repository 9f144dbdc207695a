// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! Relational store for FRA Atlas.
//!
//! Owns the SQLite schema and its migrations, the bounded connection pool
//! handed to the HTTP layer, row decoding shared with the query crate, every
//! write path, and the demo seed used by the operator CLI.

mod error;
mod pool;
pub mod rows;
mod schema;
mod seed;
mod writes;

pub use error::StoreError;
pub use pool::{open_connection, Database, DbConfig};
pub use schema::{migrate, schema_version, verify_schema, SCHEMA_VERSION, TABLES};
pub use seed::{seed_demo, SeedReport};
pub use writes::{
    delete_document, delete_ticket, insert_asset, insert_boundary, insert_claim, insert_document,
    insert_land_parcel, insert_patta_holder, insert_scheme, insert_ticket, insert_village,
    update_claim_status, update_document, update_ticket, NewAsset, NewBoundary, NewLandParcel,
    NewPattaHolder, NewScheme, NewVillage,
};

pub const CRATE_NAME: &str = "fra-atlas-store";

/// Current UTC time in the format every `*_at` column uses.
pub const SQL_NOW: &str = "strftime('%Y-%m-%dT%H:%M:%fZ', 'now')";
