//! Interface status reporting for SONiC.
//!
//! This crate implements the engine behind `show interfaces status` and its
//! sibling reports. It reconciles ports, LAGs and VLAN sub-interfaces from
//! CONFIG_DB, APPL_DB and STATE_DB into one table, namespace by namespace on
//! multi-ASIC devices.
//!
//! # Pipeline
//!
//! For every namespace the [`FanOutRunner`]:
//!
//! 1. opens the namespace's stores through a [`DbConnector`]
//! 2. builds the [`EntityCatalog`] from CONFIG_DB
//! 3. computes the [`LagSpeedMap`]
//! 4. asks the [`ReportGenerator`] for rows, resolving each cell with the
//!    [`FieldResolver`] and consulting the [`DisplayFilter`]
//!
//! # Tables
//!
//! | Database | Table | Purpose |
//! |----------|-------|---------|
//! | CONFIG_DB | PORT | Front-panel ports, roles, switchport mode |
//! | CONFIG_DB | PORTCHANNEL / PORTCHANNEL_MEMBER | LAGs and membership |
//! | CONFIG_DB | VLAN_MEMBER | Implicit trunk mode |
//! | CONFIG_DB | VLAN_SUB_INTERFACE | Sub-interface names |
//! | APPL_DB | PORT_TABLE / LAG_TABLE / INTF_TABLE | Status fields |
//! | STATE_DB | PORT_TABLE | Operational speed, FEC, link training |
//! | STATE_DB | TRANSCEIVER_INFO | Optics type |
//!
//! # Example
//!
//! ```ignore
//! use sonic_intfutil::{FanOutRunner, IntfUtilConfig, ReportKind, ReportQuery, RedisConnector};
//!
//! let config = IntfUtilConfig::load()?;
//! let runner = FanOutRunner::new(RedisConnector::new(config.clone()), config.port_capabilities());
//! let query = ReportQuery::new(ReportKind::Status, None)?;
//! let report = runner.run(&config.namespace_list(), &query, &config.display_mode()).await?;
//! print!("{}", report.render());
//! ```

pub mod catalog;
pub mod config;
pub mod display;
pub mod error;
pub mod lag_speed;
pub mod namespace;
pub mod natsort;
pub mod port_type;
pub mod render;
pub mod report;
pub mod resolver;
pub mod runner;
pub mod speed;
pub mod subintf;
pub mod tables;
pub mod watermark;

pub use catalog::{EntityCatalog, SwitchMode};
pub use config::IntfUtilConfig;
pub use display::{DisplayFilter, DisplayMode, EntityRef};
pub use error::{IntfUtilError, IntfUtilResult};
pub use lag_speed::LagSpeedMap;
pub use namespace::{DbConnector, MemoryConnector, MemoryStores, Namespace, NamespaceDbs, RedisConnector};
pub use port_type::PortCapabilities;
pub use report::{InterfaceFilter, NameRange, ReportGenerator, ReportKind, ReportQuery, Row};
pub use resolver::{EntityKind, Field, FieldResolver};
pub use runner::{select_namespaces, FanOutRunner, Report};
pub use watermark::WatermarkKind;
