//! Database module: models, schema and the actor owning the pool.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `patch.rs`: create / patch payloads accepted by the actor
//! - `queries.rs`: SQL helpers that run inside a caller's transaction

pub mod actor;
pub mod models;
pub mod patch;
pub mod schema;

mod patch_impl;
mod queries;

pub use models::{DbProject, DbUser, DbValue};
pub use patch::{
    ComponentCreateRow, ComponentStylePatch, DbPatchable, PatchedRecord, ProjectCreateRow,
    StorePatch, UserCreate, ValueCreate, ValuePatch,
};
pub use schema::SQLITE_INIT;

pub use actor::{DbActorHandle, spawn};
