//! # Schoolhouse DB
//!
//! A small document store: collections of JSON documents addressed by UUID and
//! queried by containment filters.
//!
//! - [`store`]: the [`DocumentStore`] backend trait and the typed [`Store`] facade
//! - [`filter`]: [`Filter`], equality and array-membership matching
//! - [`memory`]: in-process backend used in development and tests
//! - [`postgres`]: JSONB backend on PostgreSQL
//!
//! Each write touches exactly one document and is atomic in both backends.
//! Upserts by id are the only conflict-resolution primitive; there is no
//! multi-document transaction.
//!
//! # Example
//!
//! ```ignore
//! use schoolhouse_db::{Filter, Store};
//!
//! let store = Store::connect(&DatabaseConfig::from_env()?).await?;
//! let teachers: Vec<UserRecord> = store.find(&Filter::new().eq("role", "teacher")).await?;
//! ```

pub mod collection;
pub mod error;
pub mod filter;
pub mod memory;
pub mod postgres;
pub mod store;

pub use collection::Collection;
pub use error::{StoreError, StoreResult};
pub use filter::Filter;
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::{Document, DocumentStore, Store};
