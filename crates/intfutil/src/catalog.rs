//! Per-namespace interface catalog.
//!
//! Built once per namespace from CONFIG_DB and then only read. Holds which
//! ports and LAGs exist, LAG membership in both directions, the derived
//! switchport mode of every port and LAG, and the sub-interface names.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use sonic_db_common::{DbError, FieldValues, FieldValuesExt};
use tracing::{debug, instrument, warn};

use crate::error::{IntfUtilError, IntfUtilResult};
use crate::namespace::NamespaceDbs;
use crate::natsort::{natural_cmp, natural_sort};
use crate::tables::{self, fields, values};

/// Switchport mode of a port or LAG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwitchMode {
    /// Layer 3 interface.
    Routed,
    /// Carries tagged VLAN traffic.
    Trunk,
    /// Carries untagged traffic of a single VLAN.
    Access,
}

impl SwitchMode {
    /// Returns the mode as displayed and stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            SwitchMode::Routed => "routed",
            SwitchMode::Trunk => "trunk",
            SwitchMode::Access => "access",
        }
    }
}

impl fmt::Display for SwitchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SwitchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "routed" => Ok(SwitchMode::Routed),
            "trunk" => Ok(SwitchMode::Trunk),
            "access" => Ok(SwitchMode::Access),
            _ => Err(format!("Unknown switchport mode: {}", s)),
        }
    }
}

/// Raw CONFIG_DB tables the catalog is built from.
#[derive(Debug, Clone, Default)]
pub struct CatalogTables {
    /// `PORT` entries.
    pub ports: BTreeMap<String, FieldValues>,
    /// `PORTCHANNEL` entries.
    pub lags: BTreeMap<String, FieldValues>,
    /// `PORTCHANNEL_MEMBER` keys (`<lag>|<member>`).
    pub lag_member_keys: Vec<String>,
    /// `VLAN_MEMBER` keys (`<vlan>|<member>`).
    pub vlan_member_keys: Vec<String>,
    /// `VLAN_SUB_INTERFACE` keys.
    pub sub_intf_keys: Vec<String>,
}

impl CatalogTables {
    /// Reads the tables from CONFIG_DB. Missing tables come back empty.
    pub async fn read(dbs: &NamespaceDbs) -> Result<Self, DbError> {
        let config_db = dbs.config_db.as_ref();
        Ok(Self {
            ports: config_db.get_table(tables::CFG_PORT_TABLE_NAME).await?,
            lags: config_db.get_table(tables::CFG_LAG_TABLE_NAME).await?,
            lag_member_keys: config_db
                .get_keys(tables::CFG_LAG_MEMBER_TABLE_NAME)
                .await?,
            vlan_member_keys: config_db
                .get_keys(tables::CFG_VLAN_MEMBER_TABLE_NAME)
                .await?,
            sub_intf_keys: config_db
                .get_keys(tables::CFG_VLAN_SUB_INTF_TABLE_NAME)
                .await?,
        })
    }
}

/// Splits a composite `<a>|<b>` key.
fn split_pair(key: &str) -> Option<(&str, &str)> {
    key.split_once('|')
}

/// Immutable snapshot of one namespace's interfaces.
#[derive(Debug, Clone, Default)]
pub struct EntityCatalog {
    front_panel_ports: HashSet<String>,
    port_roles: HashMap<String, String>,
    lag_members: BTreeMap<String, Vec<String>>,
    port_to_lag: HashMap<String, String>,
    switch_modes: HashMap<String, SwitchMode>,
    sub_interfaces: Vec<String>,
    membership_conflicts: Vec<String>,
}

impl EntityCatalog {
    /// Builds the catalog of a namespace from CONFIG_DB.
    #[instrument(skip(dbs), fields(namespace = %dbs.namespace))]
    pub async fn build(dbs: &NamespaceDbs) -> IntfUtilResult<Self> {
        let tables = CatalogTables::read(dbs)
            .await
            .map_err(|source| IntfUtilError::CatalogBuild {
                namespace: dbs.namespace.to_string(),
                source,
            })?;

        let catalog = Self::from_tables(tables);
        debug!(
            ports = catalog.front_panel_ports.len(),
            lags = catalog.lag_members.len(),
            sub_interfaces = catalog.sub_interfaces.len(),
            "Built interface catalog"
        );
        Ok(catalog)
    }

    /// Builds the catalog from already-read tables.
    pub fn from_tables(raw: CatalogTables) -> Self {
        let mut catalog = Self {
            front_panel_ports: raw.ports.keys().cloned().collect(),
            ..Self::default()
        };

        for (port, fvs) in &raw.ports {
            if let Some(role) = fvs.get_field(fields::ROLE) {
                catalog.port_roles.insert(port.clone(), role.to_string());
            }
        }

        // Configured LAGs without members still show up.
        for lag in raw.lags.keys() {
            catalog.lag_members.entry(lag.clone()).or_default();
        }

        let mut member_keys = raw.lag_member_keys;
        natural_sort(&mut member_keys);
        for key in &member_keys {
            let Some((lag, member)) = split_pair(key) else {
                warn!(key = %key, "Ignoring malformed {} key", tables::CFG_LAG_MEMBER_TABLE_NAME);
                continue;
            };

            catalog
                .lag_members
                .entry(lag.to_string())
                .or_default()
                .push(member.to_string());

            // A port in two LAGs is a config error; the later key wins.
            if let Some(previous) = catalog
                .port_to_lag
                .insert(member.to_string(), lag.to_string())
            {
                if previous != lag {
                    debug!(
                        port = %member,
                        previous = %previous,
                        lag = %lag,
                        "Port is a member of more than one LAG, using the last one"
                    );
                    catalog.membership_conflicts.push(member.to_string());
                }
            }
        }

        let vlan_members: HashSet<&str> = raw
            .vlan_member_keys
            .iter()
            .filter_map(|key| split_pair(key).map(|(_, member)| member))
            .collect();

        for (name, fvs) in raw.ports.iter().chain(raw.lags.iter()) {
            let mode = derive_switch_mode(name, fvs, &vlan_members);
            catalog.switch_modes.insert(name.clone(), mode);
        }
        for lag in catalog.lag_members.keys() {
            if !catalog.switch_modes.contains_key(lag) {
                let mode = derive_switch_mode(lag, &FieldValues::new(), &vlan_members);
                catalog.switch_modes.insert(lag.clone(), mode);
            }
        }

        // IP address entries (`<subintf>|<prefix>`) share the table.
        let mut sub_interfaces: Vec<String> = raw
            .sub_intf_keys
            .into_iter()
            .filter(|key| !key.contains('|'))
            .collect();
        natural_sort(&mut sub_interfaces);
        catalog.sub_interfaces = sub_interfaces;

        catalog
    }

    /// Returns true if `name` is a front-panel port of this namespace.
    pub fn is_front_panel_port(&self, name: &str) -> bool {
        self.front_panel_ports.contains(name)
    }

    /// Returns the front-panel ports in natural order.
    pub fn front_panel_ports(&self) -> Vec<&str> {
        let mut ports: Vec<&str> = self.front_panel_ports.iter().map(String::as_str).collect();
        ports.sort_by(|a, b| natural_cmp(a, b));
        ports
    }

    /// Returns true if `name` is a LAG of this namespace.
    pub fn is_lag(&self, name: &str) -> bool {
        self.lag_members.contains_key(name)
    }

    /// Returns the LAGs in natural order.
    pub fn lags(&self) -> Vec<&str> {
        let mut lags: Vec<&str> = self.lag_members.keys().map(String::as_str).collect();
        lags.sort_by(|a, b| natural_cmp(a, b));
        lags
    }

    /// Returns the members of `lag` in natural order.
    pub fn lag_members(&self, lag: &str) -> &[String] {
        self.lag_members
            .get(lag)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns the LAG `port` belongs to.
    pub fn lag_of(&self, port: &str) -> Option<&str> {
        self.port_to_lag.get(port).map(String::as_str)
    }

    /// Returns the derived switchport mode of a port or LAG.
    pub fn switch_mode(&self, name: &str) -> SwitchMode {
        self.switch_modes
            .get(name)
            .copied()
            .unwrap_or(SwitchMode::Routed)
    }

    /// Returns the sub-interface names in natural order.
    pub fn sub_interfaces(&self) -> &[String] {
        &self.sub_interfaces
    }

    /// Returns the ports that were claimed by more than one LAG.
    pub fn membership_conflicts(&self) -> &[String] {
        &self.membership_conflicts
    }

    /// Returns true if `port` is an internal (backplane, inband or
    /// recirculation) port.
    pub fn is_internal_port(&self, port: &str) -> bool {
        self.port_roles
            .get(port)
            .map(|role| values::INTERNAL_ROLES.contains(&role.as_str()))
            .unwrap_or(false)
    }

    /// Returns true if every member of `lag` is internal.
    pub fn is_internal_lag(&self, lag: &str) -> bool {
        let members = self.lag_members(lag);
        !members.is_empty() && members.iter().all(|m| self.is_internal_port(m))
    }
}

/// Explicit `mode` wins, then VLAN membership implies trunk, else routed.
fn derive_switch_mode(name: &str, fvs: &FieldValues, vlan_members: &HashSet<&str>) -> SwitchMode {
    if let Some(mode) = fvs.get_field(fields::MODE) {
        match mode.parse() {
            Ok(mode) => return mode,
            Err(e) => warn!(interface = %name, "{}", e),
        }
    }

    if vlan_members.contains(name) {
        SwitchMode::Trunk
    } else {
        SwitchMode::Routed
    }
}
