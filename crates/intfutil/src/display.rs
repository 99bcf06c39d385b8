//! Display filtering.
//!
//! Multi-ASIC devices carry backplane, inband and recirculation ports that
//! are not interesting to an operator. The runner asks a [`DisplayFilter`]
//! about every port and LAG right before its row is appended.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::EntityCatalog;
use crate::namespace::Namespace;
use crate::resolver::EntityKind;

/// Which interfaces to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Every interface, internal ones included.
    All,
    /// Front-panel interfaces only.
    Frontend,
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayMode::All => write!(f, "all"),
            DisplayMode::Frontend => write!(f, "frontend"),
        }
    }
}

impl FromStr for DisplayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(DisplayMode::All),
            "frontend" => Ok(DisplayMode::Frontend),
            _ => Err(format!("Unknown display mode: {}", s)),
        }
    }
}

/// An interface about to be displayed.
#[derive(Debug, Clone, Copy)]
pub struct EntityRef<'a> {
    /// Namespace the interface lives in.
    pub namespace: &'a Namespace,
    /// Port or LAG.
    pub kind: EntityKind,
    /// Interface name.
    pub name: &'a str,
    /// Catalog of the namespace.
    pub catalog: &'a EntityCatalog,
}

/// Decides whether an interface row is left out of a report.
pub trait DisplayFilter: Send + Sync {
    /// Returns true to leave `entity` out.
    fn skip(&self, entity: &EntityRef<'_>) -> bool;
}

impl<F> DisplayFilter for F
where
    F: Fn(&EntityRef<'_>) -> bool + Send + Sync,
{
    fn skip(&self, entity: &EntityRef<'_>) -> bool {
        self(entity)
    }
}

impl DisplayFilter for DisplayMode {
    fn skip(&self, entity: &EntityRef<'_>) -> bool {
        match self {
            DisplayMode::All => false,
            DisplayMode::Frontend => match entity.kind {
                EntityKind::Port => entity.catalog.is_internal_port(entity.name),
                EntityKind::Lag => entity.catalog.is_internal_lag(entity.name),
                EntityKind::SubInterface => false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogTables;
    use sonic_db_common::field_values;

    fn catalog() -> EntityCatalog {
        let mut raw = CatalogTables::default();
        raw.ports
            .insert("Ethernet0".to_string(), field_values! {"role" => "Ext"});
        raw.ports
            .insert("Ethernet-BP0".to_string(), field_values! {"role" => "Int"});
        raw.ports
            .insert("Ethernet-BP4".to_string(), field_values! {"role" => "Int"});
        raw.lag_member_keys = vec![
            "PortChannel1|Ethernet0".to_string(),
            "PortChannel4001|Ethernet-BP0".to_string(),
            "PortChannel4001|Ethernet-BP4".to_string(),
        ];
        EntityCatalog::from_tables(raw)
    }

    fn entity<'a>(
        ns: &'a Namespace,
        catalog: &'a EntityCatalog,
        kind: EntityKind,
        name: &'a str,
    ) -> EntityRef<'a> {
        EntityRef {
            namespace: ns,
            kind,
            name,
            catalog,
        }
    }

    #[test]
    fn test_frontend_skips_internal() {
        let ns = Namespace::new("asic0");
        let catalog = catalog();
        let mode = DisplayMode::Frontend;

        assert!(!mode.skip(&entity(&ns, &catalog, EntityKind::Port, "Ethernet0")));
        assert!(mode.skip(&entity(&ns, &catalog, EntityKind::Port, "Ethernet-BP0")));
        assert!(!mode.skip(&entity(&ns, &catalog, EntityKind::Lag, "PortChannel1")));
        assert!(mode.skip(&entity(&ns, &catalog, EntityKind::Lag, "PortChannel4001")));
    }

    #[test]
    fn test_all_keeps_everything() {
        let ns = Namespace::new("asic0");
        let catalog = catalog();

        assert!(!DisplayMode::All.skip(&entity(&ns, &catalog, EntityKind::Port, "Ethernet-BP0")));
        assert!(!DisplayMode::All.skip(&entity(&ns, &catalog, EntityKind::Lag, "PortChannel4001")));
    }

    #[test]
    fn test_closure_filter() {
        let ns = Namespace::new("asic0");
        let catalog = catalog();
        let filter = |e: &EntityRef<'_>| e.name.ends_with('0');

        assert!(filter.skip(&entity(&ns, &catalog, EntityKind::Port, "Ethernet0")));
        assert!(!filter.skip(&entity(&ns, &catalog, EntityKind::Port, "Ethernet-BP4")));
    }

    #[test]
    fn test_parse_display_mode() {
        assert_eq!("frontend".parse::<DisplayMode>().unwrap(), DisplayMode::Frontend);
        assert_eq!(DisplayMode::All.to_string(), "all");
        assert!("internal".parse::<DisplayMode>().is_err());
    }
}
