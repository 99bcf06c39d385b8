//! Port type resolution.
//!
//! The "Type" column shows what is plugged into a port. The first source
//! that knows wins:
//!
//! 1. `TRANSCEIVER_INFO|<port>` `type` in STATE_DB
//! 2. the platform's static list of copper ports → `RJ45`
//! 3. `PORT_TABLE:<port>` `role` of `Dpc` in APPL_DB → `DPU-NPU Data Port`
//! 4. `N/A`

use std::collections::HashSet;

use sonic_db_common::DbResult;
use tracing::trace;

use crate::namespace::NamespaceDbs;
use crate::tables::{self, fields, values};

/// Static per-platform port capabilities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortCapabilities {
    rj45_ports: HashSet<String>,
}

impl PortCapabilities {
    /// Creates capabilities from the list of copper ports.
    pub fn new<I, S>(rj45_ports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rj45_ports: rj45_ports.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if `port` has a fixed RJ45 connector.
    pub fn is_rj45_port(&self, port: &str) -> bool {
        self.rj45_ports.contains(port)
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Resolves the optics type of `port`.
pub async fn resolve_optics_type(
    dbs: &NamespaceDbs,
    caps: &PortCapabilities,
    port: &str,
) -> DbResult<String> {
    if let Some(optics) = present(
        dbs.state_db
            .get(tables::STATE_TRANSCEIVER_INFO_TABLE_NAME, port, fields::OPTICS_TYPE)
            .await?,
    ) {
        trace!(port, %optics, "Optics type from transceiver info");
        return Ok(optics);
    }

    if caps.is_rj45_port(port) {
        return Ok(values::OPTICS_TYPE_RJ45.to_string());
    }

    let role = dbs
        .appl_db
        .get(tables::APP_PORT_TABLE_NAME, port, fields::ROLE)
        .await?;
    if role.as_deref() == Some(values::ROLE_DPC) {
        return Ok(values::OPTICS_TYPE_DPU.to_string());
    }

    Ok(values::NOT_AVAILABLE.to_string())
}
