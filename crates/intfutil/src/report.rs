//! Report generators.
//!
//! A report is a fixed column set over the ports (and for some reports the
//! LAGs) of a namespace. The `status` report switches to a sub-interface
//! view when filtered by `subport` or by a sub-interface name.

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

use sonic_db_common::DbResult;
use tracing::{debug, trace};

use crate::catalog::EntityCatalog;
use crate::display::{DisplayFilter, EntityRef};
use crate::error::{IntfUtilError, IntfUtilResult};
use crate::namespace::NamespaceDbs;
use crate::resolver::{EntityKind, Field, FieldResolver};
use crate::subintf::{intf_long_name, is_subintf_name, parse_subintf_name};
use crate::tables::{self, values};

/// One output row; the first cell is the interface name.
pub type Row = Vec<String>;

/// Selectable reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum ReportKind {
    Status,
    Description,
    Autoneg,
    Tpid,
    LinkTraining,
    Fec,
}

impl ReportKind {
    /// Returns the selector name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Status => "status",
            ReportKind::Description => "description",
            ReportKind::Autoneg => "autoneg",
            ReportKind::Tpid => "tpid",
            ReportKind::LinkTraining => "link_training",
            ReportKind::Fec => "fec",
        }
    }

    /// Returns true if LAG rows follow the port rows.
    pub fn includes_lags(&self) -> bool {
        matches!(self, ReportKind::Status | ReportKind::Tpid)
    }

    fn columns(&self) -> &'static [(&'static str, Field)] {
        match self {
            ReportKind::Status => STATUS_COLUMNS,
            ReportKind::Description => DESCRIPTION_COLUMNS,
            ReportKind::Autoneg => AUTONEG_COLUMNS,
            ReportKind::Tpid => TPID_COLUMNS,
            ReportKind::LinkTraining => LINK_TRAINING_COLUMNS,
            ReportKind::Fec => FEC_COLUMNS,
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = IntfUtilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "status" => Ok(ReportKind::Status),
            "description" => Ok(ReportKind::Description),
            "autoneg" => Ok(ReportKind::Autoneg),
            "tpid" => Ok(ReportKind::Tpid),
            "link_training" => Ok(ReportKind::LinkTraining),
            "fec" => Ok(ReportKind::Fec),
            _ => Err(IntfUtilError::Config(format!("Unknown report: {}", s))),
        }
    }
}

const INTERFACE_HEADER: &str = "Interface";
const SUB_PORT_HEADER: &str = "Sub port interface";

const STATUS_COLUMNS: &[(&str, Field)] = &[
    ("Lanes", Field::Lanes),
    ("Speed", Field::Speed),
    ("MTU", Field::Mtu),
    ("FEC", Field::AdminFec),
    ("Alias", Field::Alias),
    ("Vlan", Field::Vlan),
    ("Oper", Field::OperStatus),
    ("Admin", Field::AdminStatus),
    ("Type", Field::Type),
    ("Asym PFC", Field::PfcAsym),
];

const SUB_PORT_COLUMNS: &[(&str, Field)] = &[
    ("Speed", Field::Speed),
    ("MTU", Field::Mtu),
    ("Vlan", Field::Vlan),
    ("Admin", Field::AdminStatus),
    ("Type", Field::Type),
];

const DESCRIPTION_COLUMNS: &[(&str, Field)] = &[
    ("Oper", Field::OperStatus),
    ("Admin", Field::AdminStatus),
    ("Alias", Field::Alias),
    ("Description", Field::Description),
];

const AUTONEG_COLUMNS: &[(&str, Field)] = &[
    ("Auto-Neg Mode", Field::Autoneg),
    ("Speed", Field::Speed),
    ("Adv Speeds", Field::AdvSpeeds),
    ("Rmt Adv Speeds", Field::RmtAdvSpeeds),
    ("Type", Field::InterfaceType),
    ("Adv Types", Field::AdvInterfaceTypes),
    ("Oper", Field::OperStatus),
    ("Admin", Field::AdminStatus),
];

const TPID_COLUMNS: &[(&str, Field)] = &[
    ("Alias", Field::Alias),
    ("Oper", Field::OperStatus),
    ("Admin", Field::AdminStatus),
    ("TPID", Field::Tpid),
];

const LINK_TRAINING_COLUMNS: &[(&str, Field)] = &[
    ("LT Oper", Field::LinkTrainingStatus),
    ("LT Admin", Field::LinkTraining),
    ("Oper", Field::OperStatus),
    ("Admin", Field::AdminStatus),
];

const FEC_COLUMNS: &[(&str, Field)] = &[
    ("FEC Oper", Field::OperFec),
    ("FEC Admin", Field::AdminFec),
];

/// Restricts a report to some interfaces.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InterfaceFilter {
    /// No restriction.
    #[default]
    All,
    /// Named ports or LAGs, plus numeric ranges of them.
    Names {
        names: BTreeSet<String>,
        ranges: Vec<NameRange>,
    },
    /// Every sub-interface.
    SubPorts,
    /// One sub-interface.
    SubInterface(String),
}

/// A range such as `Ethernet0-8`, kept unexpanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRange {
    pub prefix: String,
    pub lo: u32,
    pub hi: u32,
}

impl NameRange {
    /// Returns true if `name` is `prefix` followed by a number in `lo..=hi`.
    pub fn contains(&self, name: &str) -> bool {
        let Some(digits) = name.strip_prefix(self.prefix.as_str()) else {
            return false;
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        // "Ethernet04" is not "Ethernet4"
        if digits.len() > 1 && digits.starts_with('0') {
            return false;
        }
        digits
            .parse::<u32>()
            .is_ok_and(|n| (self.lo..=self.hi).contains(&n))
    }
}

impl InterfaceFilter {
    /// Parses an `-i` argument.
    ///
    /// Accepts `subport`, a single sub-interface name, or a comma separated
    /// list of names and ranges such as `Ethernet0,Ethernet8-12`. Short names
    /// (`Eth0`, `Po1`) are expanded. Sub-interfaces cannot appear in a list.
    pub fn parse(arg: &str) -> IntfUtilResult<Self> {
        let arg = arg.trim();
        if arg == values::SUBPORT {
            return Ok(InterfaceFilter::SubPorts);
        }
        if is_subintf_name(arg) && !arg.contains(',') {
            return Ok(InterfaceFilter::SubInterface(arg.to_string()));
        }

        let mut names = BTreeSet::new();
        let mut ranges = Vec::new();
        for item in arg.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            if is_subintf_name(item) {
                return Err(IntfUtilError::Config(format!(
                    "Sub-interface {} cannot be combined with other interfaces",
                    item
                )));
            }
            match parse_range(item)? {
                Some(range) => ranges.push(range),
                None => {
                    names.insert(intf_long_name(item));
                }
            }
        }

        if names.is_empty() && ranges.is_empty() {
            return Err(IntfUtilError::Config("Empty interface filter".to_string()));
        }
        Ok(InterfaceFilter::Names { names, ranges })
    }

    /// Returns true if the report shows sub-interfaces.
    pub fn is_sub_interface_mode(&self) -> bool {
        matches!(
            self,
            InterfaceFilter::SubPorts | InterfaceFilter::SubInterface(_)
        )
    }

    /// Returns true if `name` passes the filter.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            InterfaceFilter::All | InterfaceFilter::SubPorts => true,
            InterfaceFilter::Names { names, ranges } => {
                names.contains(name) || ranges.iter().any(|range| range.contains(name))
            }
            InterfaceFilter::SubInterface(wanted) => {
                wanted == name || parse_subintf_name(wanted) == parse_subintf_name(name)
            }
        }
    }
}

/// Parses `Ethernet0-8` into a [`NameRange`]. Returns `None` when `item` is
/// not a range.
fn parse_range(item: &str) -> IntfUtilResult<Option<NameRange>> {
    let Some((left, hi)) = item.rsplit_once('-') else {
        return Ok(None);
    };
    if hi.is_empty() || !hi.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(None);
    }
    let digits_at = left.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    let (prefix, lo) = left.split_at(digits_at);
    if prefix.is_empty() || lo.is_empty() {
        return Ok(None);
    }

    let invalid = || IntfUtilError::Config(format!("Invalid interface range: {}", item));
    let lo: u32 = lo.parse().map_err(|_| invalid())?;
    let hi: u32 = hi.parse().map_err(|_| invalid())?;
    if lo > hi {
        return Err(invalid());
    }

    Ok(Some(NameRange {
        prefix: intf_long_name(prefix),
        lo,
        hi,
    }))
}

/// What to report and for which interfaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportQuery {
    pub kind: ReportKind,
    pub filter: InterfaceFilter,
}

impl ReportQuery {
    /// Creates a query. Sub-interface filters only apply to `status`.
    pub fn new(kind: ReportKind, filter: Option<&str>) -> IntfUtilResult<Self> {
        let filter = match filter {
            Some(arg) => InterfaceFilter::parse(arg)?,
            None => InterfaceFilter::All,
        };

        if filter.is_sub_interface_mode() && kind != ReportKind::Status {
            return Err(IntfUtilError::Config(format!(
                "The {} report does not support sub-interfaces",
                kind
            )));
        }

        Ok(Self { kind, filter })
    }

    fn columns(&self) -> &'static [(&'static str, Field)] {
        if self.filter.is_sub_interface_mode() {
            SUB_PORT_COLUMNS
        } else {
            self.kind.columns()
        }
    }

    /// Returns the column headers.
    pub fn header(&self) -> Vec<&'static str> {
        let first = if self.filter.is_sub_interface_mode() {
            SUB_PORT_HEADER
        } else {
            INTERFACE_HEADER
        };

        std::iter::once(first)
            .chain(self.columns().iter().map(|(header, _)| *header))
            .collect()
    }
}

/// Produces the rows of one namespace.
pub struct ReportGenerator<'a> {
    query: &'a ReportQuery,
    dbs: &'a NamespaceDbs,
    catalog: &'a EntityCatalog,
    resolver: FieldResolver<'a>,
    display: &'a dyn DisplayFilter,
}

impl<'a> ReportGenerator<'a> {
    pub fn new(
        query: &'a ReportQuery,
        dbs: &'a NamespaceDbs,
        catalog: &'a EntityCatalog,
        resolver: FieldResolver<'a>,
        display: &'a dyn DisplayFilter,
    ) -> Self {
        Self {
            query,
            dbs,
            catalog,
            resolver,
            display,
        }
    }

    /// Generates the rows in catalog order.
    pub async fn rows(&self) -> DbResult<Vec<Row>> {
        let mut rows = Vec::new();

        if self.query.filter.is_sub_interface_mode() {
            for name in self.catalog.sub_interfaces() {
                self.push_row(&mut rows, EntityKind::SubInterface, name).await?;
            }
            return Ok(rows);
        }

        for port in self.listed_ports().await? {
            self.push_row(&mut rows, EntityKind::Port, port).await?;
        }

        if self.query.kind.includes_lags() {
            for lag in self.catalog.lags() {
                self.push_row(&mut rows, EntityKind::Lag, lag).await?;
            }
        }

        debug!(
            namespace = %self.dbs.namespace,
            report = %self.query.kind,
            rows = rows.len(),
            "Generated report rows"
        );
        Ok(rows)
    }

    /// Front-panel ports that also have an APPL_DB status entry.
    async fn listed_ports(&self) -> DbResult<Vec<&'a str>> {
        let appl_ports: HashSet<String> = self
            .dbs
            .appl_db
            .get_keys(tables::APP_PORT_TABLE_NAME)
            .await?
            .into_iter()
            .collect();

        Ok(self
            .catalog
            .front_panel_ports()
            .into_iter()
            .filter(|port| appl_ports.contains(*port))
            .collect())
    }

    async fn push_row(&self, rows: &mut Vec<Row>, kind: EntityKind, name: &str) -> DbResult<()> {
        if !self.query.filter.matches(name) {
            return Ok(());
        }

        let entity = EntityRef {
            namespace: &self.dbs.namespace,
            kind,
            name,
            catalog: self.catalog,
        };
        if self.display.skip(&entity) {
            trace!(interface = %name, "Skipped by display filter");
            return Ok(());
        }

        let mut row = Vec::with_capacity(self.query.columns().len() + 1);
        row.push(name.to_string());
        for (_, field) in self.query.columns() {
            row.push(self.resolver.resolve(kind, name, *field).await?);
        }
        rows.push(row);
        Ok(())
    }
}
