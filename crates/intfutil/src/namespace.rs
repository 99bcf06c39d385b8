//! Hardware namespaces and their per-namespace store handles.
//!
//! A multi-ASIC device runs one Redis instance per ASIC namespace. Store
//! handles are opened by a [`DbConnector`] at the start of a namespace
//! iteration and released when the [`NamespaceDbs`] is dropped at its end.

use std::collections::{HashMap, HashSet};
use std::fmt;

use async_trait::async_trait;
use sonic_db_common::{
    DbError, DbId, DbResult, MemoryDatabase, RedisDatabase, SonicDb,
};
use tracing::{debug, instrument};

use crate::config::IntfUtilConfig;

/// One hardware partition. The default namespace of a single-ASIC device
/// has an empty name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Namespace(String);

impl Namespace {
    /// Creates a namespace from its name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the namespace name ("" for the default namespace).
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Returns true for the default (host) namespace.
    pub fn is_default(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_default() {
            write!(f, "default")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Store handles for one namespace.
pub struct NamespaceDbs {
    /// The namespace these handles belong to.
    pub namespace: Namespace,
    /// CONFIG_DB handle.
    pub config_db: Box<dyn SonicDb>,
    /// APPL_DB handle.
    pub appl_db: Box<dyn SonicDb>,
    /// STATE_DB handle.
    pub state_db: Box<dyn SonicDb>,
}

impl NamespaceDbs {
    /// Returns the handle for `db`. COUNTERS_DB is not part of a namespace
    /// query and maps to `None`.
    pub fn db(&self, db: DbId) -> Option<&dyn SonicDb> {
        match db {
            DbId::ConfigDb => Some(self.config_db.as_ref()),
            DbId::ApplDb => Some(self.appl_db.as_ref()),
            DbId::StateDb => Some(self.state_db.as_ref()),
            DbId::CountersDb => None,
        }
    }
}

impl fmt::Debug for NamespaceDbs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamespaceDbs")
            .field("namespace", &self.namespace)
            .finish()
    }
}

impl Drop for NamespaceDbs {
    fn drop(&mut self) {
        debug!(namespace = %self.namespace, "Released namespace stores");
    }
}

/// Opens the store handles of a namespace.
#[async_trait]
pub trait DbConnector: Send + Sync {
    /// Connects CONFIG_DB, APPL_DB and STATE_DB of `namespace`.
    async fn connect(&self, namespace: &Namespace) -> DbResult<NamespaceDbs>;
}

/// Connects to the Redis instances described by the configuration file.
#[derive(Debug, Clone)]
pub struct RedisConnector {
    config: IntfUtilConfig,
}

impl RedisConnector {
    /// Creates a connector from configuration.
    pub fn new(config: IntfUtilConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl DbConnector for RedisConnector {
    #[instrument(skip(self), fields(namespace = %namespace))]
    async fn connect(&self, namespace: &Namespace) -> DbResult<NamespaceDbs> {
        let config_db =
            RedisDatabase::connect(self.config.redis_config(namespace, DbId::ConfigDb)).await?;
        let appl_db =
            RedisDatabase::connect(self.config.redis_config(namespace, DbId::ApplDb)).await?;
        let state_db =
            RedisDatabase::connect(self.config.redis_config(namespace, DbId::StateDb)).await?;

        Ok(NamespaceDbs {
            namespace: namespace.clone(),
            config_db: Box::new(config_db),
            appl_db: Box::new(appl_db),
            state_db: Box::new(state_db),
        })
    }
}

/// In-memory CONFIG_DB, APPL_DB and STATE_DB of one namespace.
#[derive(Debug, Clone)]
pub struct MemoryStores {
    /// CONFIG_DB contents.
    pub config_db: MemoryDatabase,
    /// APPL_DB contents.
    pub appl_db: MemoryDatabase,
    /// STATE_DB contents.
    pub state_db: MemoryDatabase,
}

impl MemoryStores {
    /// Creates empty stores.
    pub fn new() -> Self {
        Self {
            config_db: MemoryDatabase::new(DbId::ConfigDb),
            appl_db: MemoryDatabase::new(DbId::ApplDb),
            state_db: MemoryDatabase::new(DbId::StateDb),
        }
    }

    /// Returns handles sharing these stores.
    pub fn handles(&self, namespace: Namespace) -> NamespaceDbs {
        NamespaceDbs {
            namespace,
            config_db: Box::new(self.config_db.clone()),
            appl_db: Box::new(self.appl_db.clone()),
            state_db: Box::new(self.state_db.clone()),
        }
    }
}

impl Default for MemoryStores {
    fn default() -> Self {
        Self::new()
    }
}

/// Connector over in-memory stores.
#[derive(Debug, Clone, Default)]
pub struct MemoryConnector {
    stores: HashMap<Namespace, MemoryStores>,
    unreachable: HashSet<Namespace>,
}

impl MemoryConnector {
    /// Creates a connector with no namespaces.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the stores of `namespace`.
    pub fn with_namespace(mut self, namespace: Namespace, stores: MemoryStores) -> Self {
        self.stores.insert(namespace, stores);
        self
    }

    /// Makes `connect` fail for `namespace`.
    pub fn mark_unreachable(&mut self, namespace: Namespace) {
        self.unreachable.insert(namespace);
    }
}

#[async_trait]
impl DbConnector for MemoryConnector {
    async fn connect(&self, namespace: &Namespace) -> DbResult<NamespaceDbs> {
        if self.unreachable.contains(namespace) {
            return Err(DbError::connection(
                DbId::ConfigDb.name(),
                format!("namespace {} unreachable", namespace),
            ));
        }

        self.stores
            .get(namespace)
            .map(|stores| stores.handles(namespace.clone()))
            .ok_or_else(|| {
                DbError::connection(
                    DbId::ConfigDb.name(),
                    format!("no stores for namespace {}", namespace),
                )
            })
    }
}
