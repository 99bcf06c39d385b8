//! Table and field name constants for intfutil.
//!
//! These match the schema definitions in swss-common.

/// CONFIG_DB table listing front-panel ports.
pub const CFG_PORT_TABLE_NAME: &str = "PORT";

/// CONFIG_DB table listing LAGs.
pub const CFG_LAG_TABLE_NAME: &str = "PORTCHANNEL";

/// CONFIG_DB table of `<lag>|<member>` pairs.
pub const CFG_LAG_MEMBER_TABLE_NAME: &str = "PORTCHANNEL_MEMBER";

/// CONFIG_DB table of `<vlan>|<member>` pairs.
pub const CFG_VLAN_MEMBER_TABLE_NAME: &str = "VLAN_MEMBER";

/// CONFIG_DB table of VLAN sub-interfaces.
pub const CFG_VLAN_SUB_INTF_TABLE_NAME: &str = "VLAN_SUB_INTERFACE";

/// APPL_DB port status table (`PORT_TABLE:<port>`).
pub const APP_PORT_TABLE_NAME: &str = "PORT_TABLE";

/// APPL_DB LAG status table (`LAG_TABLE:<lag>`).
pub const APP_LAG_TABLE_NAME: &str = "LAG_TABLE";

/// APPL_DB interface table, holds sub-interface status (`INTF_TABLE:<subintf>`).
pub const APP_INTF_TABLE_NAME: &str = "INTF_TABLE";

/// STATE_DB port state table (`PORT_TABLE|<port>`).
pub const STATE_PORT_TABLE_NAME: &str = "PORT_TABLE";

/// STATE_DB transceiver table (`TRANSCEIVER_INFO|<port>`).
pub const STATE_TRANSCEIVER_INFO_TABLE_NAME: &str = "TRANSCEIVER_INFO";

/// COUNTERS_DB channel for watermark clear requests.
pub const WATERMARK_CLEAR_CHANNEL: &str = "WATERMARK_CLEAR_REQUEST";

/// Prefix of front-panel port names.
pub const PORT_PREFIX: &str = "Ethernet";

/// Short form of [`PORT_PREFIX`] accepted in sub-interface names.
pub const SUBINTF_PORT_PREFIX: &str = "Eth";

/// Prefix of LAG names.
pub const LAG_PREFIX: &str = "PortChannel";

/// Short form of [`LAG_PREFIX`] accepted in sub-interface names.
pub const SUBINTF_LAG_PREFIX: &str = "Po";

/// Separator between a sub-interface parent and its suffix.
pub const VLAN_SUB_INTERFACE_SEPARATOR: char = '.';

/// Field names used across the port, LAG and interface tables.
pub mod fields {
    /// Lane list.
    pub const LANES: &str = "lanes";

    /// Interface alias.
    pub const ALIAS: &str = "alias";

    /// Operational status (up/down).
    pub const OPER_STATUS: &str = "oper_status";

    /// Admin status (up/down).
    pub const ADMIN_STATUS: &str = "admin_status";

    /// Speed in Mb/s.
    pub const SPEED: &str = "speed";

    /// MTU.
    pub const MTU: &str = "mtu";

    /// FEC mode.
    pub const FEC: &str = "fec";

    /// Free-form description.
    pub const DESCRIPTION: &str = "description";

    /// Transceiver type in TRANSCEIVER_INFO.
    pub const OPTICS_TYPE: &str = "type";

    /// Asymmetric PFC flag.
    pub const PFC_ASYM: &str = "pfc_asym";

    /// Auto-negotiation mode (on/off).
    pub const AUTONEG: &str = "autoneg";

    /// Advertised speeds.
    pub const ADV_SPEEDS: &str = "adv_speeds";

    /// Speeds advertised by the link partner (STATE_DB).
    pub const RMT_ADV_SPEEDS: &str = "rmt_adv_speeds";

    /// Interface type.
    pub const INTERFACE_TYPE: &str = "interface_type";

    /// Advertised interface types.
    pub const ADV_INTERFACE_TYPES: &str = "adv_interface_types";

    /// TPID.
    pub const TPID: &str = "tpid";

    /// Link training admin mode.
    pub const LINK_TRAINING: &str = "link_training";

    /// Link training status (STATE_DB).
    pub const LINK_TRAINING_STATUS: &str = "link_training_status";

    /// Switchport mode on PORT / PORTCHANNEL.
    pub const MODE: &str = "mode";

    /// Port role on PORT (CONFIG_DB) and PORT_TABLE (APPL_DB).
    pub const ROLE: &str = "role";

    /// Sub-interface VLAN id in INTF_TABLE.
    pub const VLAN: &str = "vlan";
}

/// Well-known field values.
pub mod values {
    /// Placeholder for absent data.
    pub const NOT_AVAILABLE: &str = "N/A";

    /// Advertised-speed wildcard.
    pub const ALL: &str = "all";

    /// Operational status `up`.
    pub const UP: &str = "up";

    /// Optics type reported for copper ports.
    pub const OPTICS_TYPE_RJ45: &str = "RJ45";

    /// Optics type reported for DPU-facing ports.
    pub const OPTICS_TYPE_DPU: &str = "DPU-NPU Data Port";

    /// Port role of DPU-facing ports.
    pub const ROLE_DPC: &str = "Dpc";

    /// Port roles of internal (non front-panel) ports.
    pub const INTERNAL_ROLES: &[&str] = &["Int", "Inb", "Rec"];

    /// Type reported for VLAN sub-interfaces.
    pub const VLAN_SUB_INTERFACE_TYPE: &str = "802.1q-encapsulation";

    /// TPID assumed when none is configured.
    pub const DEFAULT_TPID: &str = "0x8100";

    /// Filter keyword selecting the sub-interface listing.
    pub const SUBPORT: &str = "subport";
}
