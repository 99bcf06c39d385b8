//! Error types for intfutil.
//!
//! Only connectivity problems are fatal. Everything that amounts to missing or
//! malformed data is caught close to where it happens and rendered as `N/A`.

use sonic_db_common::DbError;
use thiserror::Error;

/// Result type alias for intfutil operations.
pub type IntfUtilResult<T> = Result<T, IntfUtilError>;

/// Errors that can occur while building an interface report.
#[derive(Debug, Error)]
pub enum IntfUtilError {
    /// The stores of a namespace could not be opened. Aborts the whole run.
    #[error("Store unavailable for namespace '{namespace}': {source}")]
    StoreUnavailable {
        /// The namespace whose stores failed.
        namespace: String,
        /// The underlying database error.
        #[source]
        source: DbError,
    },

    /// A CONFIG_DB table could not be read. Fatal for this namespace only.
    #[error("Failed to build interface catalog for namespace '{namespace}': {source}")]
    CatalogBuild {
        /// The namespace being built.
        namespace: String,
        /// The underlying database error.
        #[source]
        source: DbError,
    },

    /// A store read failed while resolving fields. Fatal for this namespace only.
    #[error("Failed to query namespace '{namespace}': {source}")]
    Query {
        /// The namespace being queried.
        namespace: String,
        /// The underlying database error.
        #[source]
        source: DbError,
    },

    /// A raw speed value is not a non-negative integer.
    #[error("Malformed speed value '{value}'")]
    MalformedSpeed {
        /// The offending value.
        value: String,
    },

    /// A sub-interface name has no parent that is a known port or LAG.
    #[error("Cannot resolve parent of sub-interface '{name}'")]
    UnresolvedParent {
        /// The sub-interface name.
        name: String,
    },

    /// The namespace filter names a namespace that does not exist.
    #[error("Unknown namespace '{namespace}'")]
    UnknownNamespace {
        /// The requested namespace.
        namespace: String,
    },

    /// Configuration file or argument error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl IntfUtilError {
    /// Creates a malformed speed error.
    pub fn malformed_speed(value: impl Into<String>) -> Self {
        Self::MalformedSpeed {
            value: value.into(),
        }
    }

    /// Creates an unresolved parent error.
    pub fn unresolved_parent(name: impl Into<String>) -> Self {
        Self::UnresolvedParent { name: name.into() }
    }

    /// Returns true if the error must abort the whole run rather than one namespace.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            IntfUtilError::StoreUnavailable { .. }
                | IntfUtilError::UnknownNamespace { .. }
                | IntfUtilError::Config(_)
        )
    }
}
