//! Database access layer for SONiC show utilities.
//!
//! SONiC keeps switch state in several Redis logical databases. This crate
//! hides the transport behind the [`SonicDb`] trait so that the consumers
//! (for example `intfutil`) only ever talk in terms of tables, keys and
//! fields:
//!
//! - [`DbId`]: which logical database a handle points at, and its key separator
//! - [`SonicDb`]: async read/publish operations plus table-level helpers
//! - [`RedisDatabase`]: production backend over `redis::aio::ConnectionManager`
//! - [`MemoryDatabase`]: in-process backend used by tests and offline tooling
//!
//! # Key layout
//!
//! | Database | Example key | Separator |
//! |----------|-------------|-----------|
//! | CONFIG_DB | `PORT\|Ethernet0` | `\|` |
//! | APPL_DB | `PORT_TABLE:Ethernet0` | `:` |
//! | STATE_DB | `TRANSCEIVER_INFO\|Ethernet0` | `\|` |
//! | COUNTERS_DB | `COUNTERS:oid:0x1000000000002` | `:` |
//!
//! # Example
//!
//! ```ignore
//! use sonic_db_common::{DbId, RedisConfig, RedisDatabase, SonicDb};
//!
//! let config_db = RedisDatabase::connect(RedisConfig::new("127.0.0.1", 6379, DbId::ConfigDb)).await?;
//! let ports = config_db.get_keys("PORT").await?;
//! ```

pub mod db;
pub mod error;
pub mod memory;
pub mod redis_backend;

pub use db::{DbId, FieldValue, FieldValues, FieldValuesExt, SonicDb};
pub use error::{DbError, DbResult};
pub use memory::MemoryDatabase;
pub use redis_backend::{RedisConfig, RedisDatabase};
