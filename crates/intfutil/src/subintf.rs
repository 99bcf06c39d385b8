//! Sub-interface name parsing.

use crate::tables::{
    LAG_PREFIX, PORT_PREFIX, SUBINTF_LAG_PREFIX, SUBINTF_PORT_PREFIX,
    VLAN_SUB_INTERFACE_SEPARATOR,
};

/// Expands a short interface name to its long form.
///
/// - "Eth0" → "Ethernet0"
/// - "Po1" → "PortChannel1"
///
/// Names already in long form, or with any other prefix, are returned as is.
pub fn intf_long_name(name: &str) -> String {
    if let Some(rest) = name.strip_prefix(SUBINTF_PORT_PREFIX) {
        if !name.starts_with(PORT_PREFIX) {
            return format!("{}{}", PORT_PREFIX, rest);
        }
    }
    if let Some(rest) = name.strip_prefix(SUBINTF_LAG_PREFIX) {
        if !name.starts_with(LAG_PREFIX) {
            return format!("{}{}", LAG_PREFIX, rest);
        }
    }
    name.to_string()
}

/// Splits a sub-interface name into (parent, suffix).
///
/// The split happens at the first `.`; the parent is expanded with
/// [`intf_long_name`]. The suffix is not validated: SONiC allows
/// sub-interface names whose suffix differs from the VLAN id.
///
/// Examples:
/// - "Ethernet0.100" → ("Ethernet0", "100")
/// - "Po1.200" → ("PortChannel1", "200")
///
/// Returns None if the name has no separator.
pub fn parse_subintf_name(name: &str) -> Option<(String, String)> {
    let (parent, suffix) = name.split_once(VLAN_SUB_INTERFACE_SEPARATOR)?;
    Some((intf_long_name(parent), suffix.to_string()))
}

/// Check if a name is a sub-interface
pub fn is_subintf_name(name: &str) -> bool {
    name.contains(VLAN_SUB_INTERFACE_SEPARATOR)
}
