//! Field resolution.
//!
//! Every displayed column of a port, LAG or sub-interface is produced from
//! a [`Chain`]: an ordered list of store lookups, the first of which yields
//! a usable value, followed by an optional transform and a default. A value
//! is usable when it is present, non-empty and not `N/A`.
//!
//! The chains are plain data so the precedence of each field can be read in
//! one place and checked by tests.

use sonic_db_common::{DbId, DbResult};
use tracing::debug;

use crate::catalog::EntityCatalog;
use crate::error::IntfUtilError;
use crate::lag_speed::LagSpeedMap;
use crate::namespace::NamespaceDbs;
use crate::port_type::{resolve_optics_type, PortCapabilities};
use crate::speed::{format_speed, format_speed_list};
use crate::subintf::parse_subintf_name;
use crate::tables::{self, fields, values};

/// Kind of interface a row is produced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Front-panel port.
    Port,
    /// Link aggregation group.
    Lag,
    /// VLAN sub-interface.
    SubInterface,
}

/// Displayable interface attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Lanes,
    Speed,
    Mtu,
    AdminFec,
    OperFec,
    Alias,
    Vlan,
    OperStatus,
    AdminStatus,
    Type,
    PfcAsym,
    Description,
    Tpid,
    Autoneg,
    AdvSpeeds,
    RmtAdvSpeeds,
    InterfaceType,
    AdvInterfaceTypes,
    LinkTraining,
    LinkTrainingStatus,
}

/// Condition a lookup step is subject to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Always consulted.
    Always,
    /// Only consulted while the port is operationally up.
    OperUp,
}

/// One store lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub db: DbId,
    pub table: &'static str,
    pub field: &'static str,
    pub guard: Guard,
}

impl Step {
    const fn new(db: DbId, table: &'static str, field: &'static str) -> Self {
        Self {
            db,
            table,
            field,
            guard: Guard::Always,
        }
    }

    /// APPL_DB `PORT_TABLE` lookup.
    pub const fn appl_port(field: &'static str) -> Self {
        Self::new(DbId::ApplDb, tables::APP_PORT_TABLE_NAME, field)
    }

    /// STATE_DB `PORT_TABLE` lookup.
    pub const fn state_port(field: &'static str) -> Self {
        Self::new(DbId::StateDb, tables::STATE_PORT_TABLE_NAME, field)
    }

    /// APPL_DB `LAG_TABLE` lookup.
    pub const fn appl_lag(field: &'static str) -> Self {
        Self::new(DbId::ApplDb, tables::APP_LAG_TABLE_NAME, field)
    }

    /// CONFIG_DB `PORTCHANNEL` lookup.
    pub const fn config_lag(field: &'static str) -> Self {
        Self::new(DbId::ConfigDb, tables::CFG_LAG_TABLE_NAME, field)
    }

    /// APPL_DB `INTF_TABLE` lookup.
    pub const fn appl_intf(field: &'static str) -> Self {
        Self::new(DbId::ApplDb, tables::APP_INTF_TABLE_NAME, field)
    }

    /// Restricts the step to operationally up ports.
    pub const fn when_oper_up(mut self) -> Self {
        self.guard = Guard::OperUp;
        self
    }
}

/// Post-processing of the value a chain found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Shown as stored.
    Verbatim,
    /// Single speed formatted for the port's optics type.
    Speed,
    /// Speed list formatted for the port's optics type.
    SpeedList,
    /// `on` shows as `enabled`, anything else as `disabled`.
    AutonegMode,
}

/// Ordered lookup rule of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    pub steps: Vec<Step>,
    pub transform: Transform,
    pub default: &'static str,
}

impl Chain {
    fn new(steps: Vec<Step>) -> Self {
        Self {
            steps,
            transform: Transform::Verbatim,
            default: values::NOT_AVAILABLE,
        }
    }

    fn single(step: Step) -> Self {
        Self::new(vec![step])
    }

    fn transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    fn default_to(mut self, default: &'static str) -> Self {
        self.default = default;
        self
    }
}

/// Operational speed of a port: STATE_DB while the link is up, otherwise
/// the configured APPL_DB speed.
fn oper_speed_steps() -> Vec<Step> {
    vec![
        Step::state_port(fields::SPEED).when_oper_up(),
        Step::appl_port(fields::SPEED),
    ]
}

/// Returns the lookup chain of a port field. `Vlan` and `Type` are derived
/// from the catalog and the optics type instead and have no chain.
pub fn port_chain(field: Field) -> Option<Chain> {
    let chain = match field {
        Field::Vlan | Field::Type => return None,
        Field::Speed => Chain::new(oper_speed_steps()).transform(Transform::Speed),
        Field::AdvSpeeds => {
            Chain::single(Step::appl_port(fields::ADV_SPEEDS)).transform(Transform::SpeedList)
        }
        Field::RmtAdvSpeeds => Chain::single(Step::state_port(fields::RMT_ADV_SPEEDS))
            .transform(Transform::SpeedList),
        Field::OperFec => Chain::new(vec![
            Step::state_port(fields::FEC).when_oper_up(),
            Step::appl_port(fields::FEC).when_oper_up(),
        ]),
        Field::AdminFec => Chain::single(Step::appl_port(fields::FEC)),
        Field::Tpid => Chain::single(Step::appl_port(fields::TPID)).default_to(values::DEFAULT_TPID),
        Field::LinkTrainingStatus => Chain::single(Step::state_port(fields::LINK_TRAINING_STATUS)),
        Field::Autoneg => {
            Chain::single(Step::appl_port(fields::AUTONEG)).transform(Transform::AutonegMode)
        }
        Field::Lanes => Chain::single(Step::appl_port(fields::LANES)),
        Field::Mtu => Chain::single(Step::appl_port(fields::MTU)),
        Field::Alias => Chain::single(Step::appl_port(fields::ALIAS)),
        Field::OperStatus => Chain::single(Step::appl_port(fields::OPER_STATUS)),
        Field::AdminStatus => Chain::single(Step::appl_port(fields::ADMIN_STATUS)),
        Field::PfcAsym => Chain::single(Step::appl_port(fields::PFC_ASYM)),
        Field::Description => Chain::single(Step::appl_port(fields::DESCRIPTION)),
        Field::InterfaceType => Chain::single(Step::appl_port(fields::INTERFACE_TYPE)),
        Field::AdvInterfaceTypes => Chain::single(Step::appl_port(fields::ADV_INTERFACE_TYPES)),
        Field::LinkTraining => Chain::single(Step::appl_port(fields::LINK_TRAINING)),
    };
    Some(chain)
}

/// Returns the lookup chain of a LAG field. `Speed`, `Vlan` and `Type` are
/// not stored per LAG and have no chain.
pub fn lag_chain(field: Field) -> Option<Chain> {
    let chain = match field {
        Field::Speed | Field::Vlan | Field::Type => return None,
        Field::Mtu => Chain::single(Step::config_lag(fields::MTU)),
        Field::Tpid => {
            Chain::single(Step::config_lag(fields::TPID)).default_to(values::DEFAULT_TPID)
        }
        Field::Lanes => Chain::single(Step::appl_lag(fields::LANES)),
        Field::AdminFec | Field::OperFec => Chain::single(Step::appl_lag(fields::FEC)),
        Field::Alias => Chain::single(Step::appl_lag(fields::ALIAS)),
        Field::OperStatus => Chain::single(Step::appl_lag(fields::OPER_STATUS)),
        Field::AdminStatus => Chain::single(Step::appl_lag(fields::ADMIN_STATUS)),
        Field::PfcAsym => Chain::single(Step::appl_lag(fields::PFC_ASYM)),
        Field::Description => Chain::single(Step::appl_lag(fields::DESCRIPTION)),
        Field::Autoneg
        | Field::AdvSpeeds
        | Field::RmtAdvSpeeds
        | Field::InterfaceType
        | Field::AdvInterfaceTypes
        | Field::LinkTraining
        | Field::LinkTrainingStatus => Chain::single(Step::appl_lag(field_name(field))),
    };
    Some(chain)
}

/// Returns the lookup chain of a sub-interface field that is stored on the
/// sub-interface itself.
pub fn sub_intf_chain(field: Field) -> Option<Chain> {
    match field {
        Field::Vlan => Some(Chain::single(Step::appl_intf(fields::VLAN))),
        Field::AdminStatus => Some(Chain::single(Step::appl_intf(fields::ADMIN_STATUS))),
        _ => None,
    }
}

fn field_name(field: Field) -> &'static str {
    match field {
        Field::Lanes => fields::LANES,
        Field::Speed => fields::SPEED,
        Field::Mtu => fields::MTU,
        Field::AdminFec | Field::OperFec => fields::FEC,
        Field::Alias => fields::ALIAS,
        Field::Vlan => fields::VLAN,
        Field::OperStatus => fields::OPER_STATUS,
        Field::AdminStatus => fields::ADMIN_STATUS,
        Field::Type => fields::OPTICS_TYPE,
        Field::PfcAsym => fields::PFC_ASYM,
        Field::Description => fields::DESCRIPTION,
        Field::Tpid => fields::TPID,
        Field::Autoneg => fields::AUTONEG,
        Field::AdvSpeeds => fields::ADV_SPEEDS,
        Field::RmtAdvSpeeds => fields::RMT_ADV_SPEEDS,
        Field::InterfaceType => fields::INTERFACE_TYPE,
        Field::AdvInterfaceTypes => fields::ADV_INTERFACE_TYPES,
        Field::LinkTraining => fields::LINK_TRAINING,
        Field::LinkTrainingStatus => fields::LINK_TRAINING_STATUS,
    }
}

fn is_usable(value: &str) -> bool {
    !value.is_empty() && value != values::NOT_AVAILABLE
}

async fn is_oper_up(dbs: &NamespaceDbs, port: &str) -> DbResult<bool> {
    let status = dbs
        .appl_db
        .get(tables::APP_PORT_TABLE_NAME, port, fields::OPER_STATUS)
        .await?;
    Ok(status.as_deref() == Some(values::UP))
}

/// Returns the first usable value along `steps` for `key`.
async fn first_usable(dbs: &NamespaceDbs, steps: &[Step], key: &str) -> DbResult<Option<String>> {
    let mut oper_up = None;

    for step in steps {
        if step.guard == Guard::OperUp {
            let up = match oper_up {
                Some(up) => up,
                None => {
                    let up = is_oper_up(dbs, key).await?;
                    oper_up = Some(up);
                    up
                }
            };
            if !up {
                continue;
            }
        }

        let Some(db) = dbs.db(step.db) else {
            continue;
        };
        if let Some(value) = db.get(step.table, key, step.field).await? {
            if is_usable(&value) {
                return Ok(Some(value));
            }
        }
    }

    Ok(None)
}

/// Returns the unformatted operational speed of `port`.
pub(crate) async fn raw_oper_speed(dbs: &NamespaceDbs, port: &str) -> DbResult<Option<String>> {
    first_usable(dbs, &oper_speed_steps(), port).await
}

/// Resolves displayed field values within one namespace.
///
/// Missing or malformed data resolves to `N/A` (or the field's default);
/// only store errors are returned.
pub struct FieldResolver<'a> {
    dbs: &'a NamespaceDbs,
    catalog: &'a EntityCatalog,
    lag_speeds: &'a LagSpeedMap,
    caps: &'a PortCapabilities,
}

impl<'a> FieldResolver<'a> {
    /// Creates a resolver over the stores and catalog of one namespace.
    pub fn new(
        dbs: &'a NamespaceDbs,
        catalog: &'a EntityCatalog,
        lag_speeds: &'a LagSpeedMap,
        caps: &'a PortCapabilities,
    ) -> Self {
        Self {
            dbs,
            catalog,
            lag_speeds,
            caps,
        }
    }

    /// Resolves `field` of the interface `name`.
    pub async fn resolve(&self, kind: EntityKind, name: &str, field: Field) -> DbResult<String> {
        match kind {
            EntityKind::Port => self.resolve_port(name, field).await,
            EntityKind::Lag => self.resolve_lag(name, field).await,
            EntityKind::SubInterface => self.resolve_sub_interface(name, field).await,
        }
    }

    async fn resolve_port(&self, port: &str, field: Field) -> DbResult<String> {
        match field {
            // A LAG member follows the mode of its LAG.
            Field::Vlan => {
                let owner = self.catalog.lag_of(port).unwrap_or(port);
                Ok(self.catalog.switch_mode(owner).to_string())
            }
            Field::Type => resolve_optics_type(self.dbs, self.caps, port).await,
            _ => match port_chain(field) {
                Some(chain) => self.evaluate(&chain, port).await,
                None => Ok(values::NOT_AVAILABLE.to_string()),
            },
        }
    }

    async fn resolve_lag(&self, lag: &str, field: Field) -> DbResult<String> {
        match field {
            Field::Speed => Ok(self
                .lag_speeds
                .get(lag)
                .unwrap_or(values::NOT_AVAILABLE)
                .to_string()),
            Field::Vlan => Ok(self.catalog.switch_mode(lag).to_string()),
            Field::Type => Ok(values::NOT_AVAILABLE.to_string()),
            _ => match lag_chain(field) {
                Some(chain) => self.evaluate(&chain, lag).await,
                None => Ok(values::NOT_AVAILABLE.to_string()),
            },
        }
    }

    async fn resolve_sub_interface(&self, name: &str, field: Field) -> DbResult<String> {
        let Some((parent, _)) = parse_subintf_name(name) else {
            debug!("{}", IntfUtilError::unresolved_parent(name));
            return Ok(values::NOT_AVAILABLE.to_string());
        };

        match field {
            Field::Type => Ok(values::VLAN_SUB_INTERFACE_TYPE.to_string()),
            Field::Mtu | Field::Speed => match self.parent_kind(name, &parent) {
                Ok(EntityKind::Lag) => self.resolve_lag(&parent, field).await,
                Ok(_) => self.resolve_port(&parent, field).await,
                Err(e) => {
                    debug!("{}", e);
                    Ok(values::NOT_AVAILABLE.to_string())
                }
            },
            _ => match sub_intf_chain(field) {
                Some(chain) => self.evaluate(&chain, name).await,
                None => Ok(values::NOT_AVAILABLE.to_string()),
            },
        }
    }

    fn parent_kind(&self, name: &str, parent: &str) -> Result<EntityKind, IntfUtilError> {
        if self.catalog.is_front_panel_port(parent) {
            Ok(EntityKind::Port)
        } else if self.catalog.is_lag(parent) {
            Ok(EntityKind::Lag)
        } else {
            Err(IntfUtilError::unresolved_parent(name))
        }
    }

    async fn evaluate(&self, chain: &Chain, key: &str) -> DbResult<String> {
        let Some(value) = first_usable(self.dbs, &chain.steps, key).await? else {
            return Ok(chain.default.to_string());
        };

        let formatted = match chain.transform {
            Transform::Verbatim => Ok(value),
            Transform::AutonegMode => Ok(if value == "on" { "enabled" } else { "disabled" }.to_string()),
            Transform::Speed => {
                let optics = resolve_optics_type(self.dbs, self.caps, key).await?;
                format_speed(&value, &optics)
            }
            Transform::SpeedList => {
                let optics = resolve_optics_type(self.dbs, self.caps, key).await?;
                format_speed_list(&value, &optics)
            }
        };

        Ok(formatted.unwrap_or_else(|e| {
            debug!(interface = %key, "{}", e);
            values::NOT_AVAILABLE.to_string()
        }))
    }
}
