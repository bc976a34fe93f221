//! Familiar Mocks
//!
//! A schema-driven mock entity store. Given a set of GraphQL-style object
//! types, the store lazily synthesizes plausible field values, remembers
//! them, and lets callers override them, so repeated reads of the same
//! `(type, key, field)` triple always agree.
//!
//! ## Features
//!
//! - **Lazy generation**: values appear on first read and stay stable
//! - **Reference normalization**: object-typed values are stored as references
//!   to entities, so every entity exists exactly once
//! - **Argument-aware slots**: `friends(first: 2)` and `friends` are distinct
//! - **Caller mocks**: per-scalar, per-field and whole-type generators
//! - **Reproducible runs**: a seeded store replays the same values
//!
//! ## Architecture
//!
//! ```text
//! schema (SDL / JSON) ──┐
//! mocks  ───────────────┼──> MockStore ──> resolver hook ──> executor
//! config (TOML / env) ──┘        │
//!                                └── type -> key -> { field slot -> value }
//! ```
//!
//! ## Example
//!
//! ```
//! use familiar_mocks::{MockStore, Schema, Value};
//!
//! let schema = Schema::from_sdl("type User { id: ID! name: String! }").unwrap();
//! let mut store = MockStore::new(schema);
//!
//! assert_eq!(store.get_field("User", "123", "id").unwrap(), Value::from("123"));
//! assert_eq!(store.get_field("User", "123", "name").unwrap(), Value::from("Hello World"));
//!
//! store.set_field("User", "123", "name", "Alexandre").unwrap();
//! assert_eq!(store.get_field("User", "123", "name").unwrap(), Value::from("Alexandre"));
//! ```

pub mod args;
pub mod config;
pub mod error;
pub mod executor;
pub mod mocks;
pub mod resolver;
pub mod schema;
pub mod store;
pub mod value;

pub use args::{field_name_in_store, FieldArgs};
pub use config::{KeyFieldPolicy, MockConfig, TypePolicy};
pub use error::{MockError, Result};
pub use executor::{execute, OperationKind, Selection};
pub use mocks::{Mocks, TypeMock};
pub use resolver::{resolve_field, FieldContext, Resolution};
pub use schema::{NamedType, ObjectType, OutputType, Schema};
pub use store::{GetArgs, MockStore, SetArgs, SharedMockStore};
pub use value::{Key, Record, Ref, Value};
