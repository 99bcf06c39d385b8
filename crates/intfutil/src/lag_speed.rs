//! LAG speed aggregation.
//!
//! A LAG's speed is derived from its current members on every query:
//!
//! - no members: unknown
//! - one member: that member's operational speed
//! - several members: the sum of the members' operational speeds, where
//!   members without a usable speed count as 0
//!
//! The map is computed once per namespace before any LAG row is resolved.

use std::collections::HashMap;

use sonic_db_common::DbResult;
use tracing::{debug, instrument};

use crate::catalog::EntityCatalog;
use crate::namespace::NamespaceDbs;
use crate::port_type::{resolve_optics_type, PortCapabilities};
use crate::resolver::raw_oper_speed;
use crate::speed::{format_speed, format_speed_mbps, parse_speed};

/// Raw speed and optics type of one LAG member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSpeed {
    /// Member name.
    pub port: String,
    /// Raw operational speed in Mb/s, if known.
    pub raw: Option<String>,
    /// Resolved optics type of the member.
    pub optics_type: String,
}

/// Aggregates member speeds into a displayed LAG speed.
///
/// With several members the sum is formatted with the optics type of the
/// last member. A LAG mixing copper and optical members can therefore show
/// a unit that only fits some of them; this matches the established
/// `show interfaces status` output and is kept as is.
pub fn aggregate(members: &[MemberSpeed]) -> Option<String> {
    match members {
        [] => None,
        [member] => {
            let raw = member.raw.as_deref()?;
            match format_speed(raw, &member.optics_type) {
                Ok(speed) => Some(speed),
                Err(e) => {
                    debug!(port = %member.port, "{}", e);
                    None
                }
            }
        }
        [.., last] => {
            let total: u64 = members
                .iter()
                .map(|m| {
                    m.raw
                        .as_deref()
                        .and_then(|raw| parse_speed(raw).ok())
                        .unwrap_or(0)
                })
                .sum();
            Some(format_speed_mbps(total, &last.optics_type))
        }
    }
}

/// Displayed speed of every LAG in a namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LagSpeedMap {
    speeds: HashMap<String, Option<String>>,
}

impl LagSpeedMap {
    /// Computes the speed of every LAG in `catalog`.
    #[instrument(skip_all, fields(namespace = %dbs.namespace))]
    pub async fn compute_all(
        catalog: &EntityCatalog,
        dbs: &NamespaceDbs,
        caps: &PortCapabilities,
    ) -> DbResult<Self> {
        let mut speeds = HashMap::new();

        for lag in catalog.lags() {
            let mut members = Vec::new();
            for port in catalog.lag_members(lag) {
                members.push(MemberSpeed {
                    port: port.clone(),
                    raw: raw_oper_speed(dbs, port).await?,
                    optics_type: resolve_optics_type(dbs, caps, port).await?,
                });
            }

            let speed = aggregate(&members);
            debug!(lag, members = members.len(), speed = ?speed, "Computed LAG speed");
            speeds.insert(lag.to_string(), speed);
        }

        Ok(Self { speeds })
    }

    /// Returns the displayed speed of `lag`, or `None` if it is unknown.
    pub fn get(&self, lag: &str) -> Option<&str> {
        self.speeds.get(lag).and_then(|s| s.as_deref())
    }
}
