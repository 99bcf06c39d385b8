//! Database identifiers, field-value helpers and the [`SonicDb`] trait.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::DbResult;

/// Logical SONiC databases read by the show utilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DbId {
    /// Configuration database (CONFIG_DB) - user-authored intent.
    ConfigDb,
    /// Application database (APPL_DB) - state published by the daemons.
    ApplDb,
    /// State database (STATE_DB) - hardware and transceiver state.
    StateDb,
    /// Counters database (COUNTERS_DB) - statistics and clear requests.
    CountersDb,
}

impl DbId {
    /// Returns the database name as used in SONiC.
    pub fn name(&self) -> &'static str {
        match self {
            DbId::ConfigDb => "CONFIG_DB",
            DbId::ApplDb => "APPL_DB",
            DbId::StateDb => "STATE_DB",
            DbId::CountersDb => "COUNTERS_DB",
        }
    }

    /// Returns the Redis database number.
    pub fn id(&self) -> u32 {
        match self {
            DbId::ConfigDb => 4,
            DbId::ApplDb => 0,
            DbId::StateDb => 6,
            DbId::CountersDb => 2,
        }
    }

    /// Returns the separator placed between a table name and its key.
    pub fn separator(&self) -> char {
        match self {
            DbId::ConfigDb | DbId::StateDb => '|',
            DbId::ApplDb | DbId::CountersDb => ':',
        }
    }

    /// Builds the full Redis key for `table` and `key` in this database.
    pub fn table_key(&self, table: &str, key: &str) -> String {
        format!("{}{}{}", table, self.separator(), key)
    }
}

/// Key-value tuple representing a field and its value.
pub type FieldValue = (String, String);

/// Collection of field-value pairs for a table entry.
pub type FieldValues = Vec<FieldValue>;

/// Helper trait for working with field-value collections.
pub trait FieldValuesExt {
    /// Gets the value for a field, if present.
    fn get_field(&self, field: &str) -> Option<&str>;
}

impl FieldValuesExt for FieldValues {
    fn get_field(&self, field: &str) -> Option<&str> {
        self.iter()
            .find(|(f, _)| f == field)
            .map(|(_, v)| v.as_str())
    }
}

/// Builds a FieldValues collection from key-value pairs.
#[macro_export]
macro_rules! field_values {
    ($($field:expr => $value:expr),* $(,)?) => {
        vec![
            $(($field.to_string(), $value.to_string()),)*
        ]
    };
}

/// A handle on one logical SONiC database.
///
/// Implementations only need the four primitive operations; the table-level
/// helpers are derived from them using [`DbId::separator`]. Absent keys and
/// fields are reported as `None` or empty collections.
#[async_trait]
pub trait SonicDb: Send + Sync {
    /// Returns which database this handle points at.
    fn id(&self) -> DbId;

    /// Reads one field of a hash (`HGET`).
    async fn hget(&self, key: &str, field: &str) -> DbResult<Option<String>>;

    /// Reads every field of a hash (`HGETALL`).
    async fn hgetall(&self, key: &str) -> DbResult<FieldValues>;

    /// Lists keys matching a glob pattern (`KEYS`).
    async fn keys(&self, pattern: &str) -> DbResult<Vec<String>>;

    /// Publishes a message on a channel (`PUBLISH`).
    async fn publish(&self, channel: &str, message: &str) -> DbResult<()>;

    /// Reads `field` of `table<sep>key`.
    async fn get(&self, table: &str, key: &str, field: &str) -> DbResult<Option<String>> {
        self.hget(&self.id().table_key(table, key), field).await
    }

    /// Reads the whole entry `table<sep>key`.
    async fn get_entry(&self, table: &str, key: &str) -> DbResult<FieldValues> {
        self.hgetall(&self.id().table_key(table, key)).await
    }

    /// Lists the keys of `table`, with the table prefix stripped.
    async fn get_keys(&self, table: &str) -> DbResult<Vec<String>> {
        let prefix = self.id().table_key(table, "");
        let keys = self.keys(&format!("{}*", prefix)).await?;

        Ok(keys
            .into_iter()
            .filter_map(|k| k.strip_prefix(prefix.as_str()).map(str::to_string))
            .collect())
    }

    /// Reads every entry of `table`, keyed by the stripped key.
    async fn get_table(&self, table: &str) -> DbResult<BTreeMap<String, FieldValues>> {
        let mut entries = BTreeMap::new();
        for key in self.get_keys(table).await? {
            let fvs = self.get_entry(table, &key).await?;
            entries.insert(key, fvs);
        }
        Ok(entries)
    }
}
