//! Speed codec.
//!
//! Speeds are stored as integer Mb/s strings (`"100000"`) and displayed with
//! a unit suffix (`"100G"`, `"40.5G"`, `"100M"`).

use crate::error::{IntfUtilError, IntfUtilResult};
use crate::natsort::natural_sort;
use crate::tables::values;

/// Parses a raw speed string into Mb/s.
pub fn parse_speed(raw: &str) -> IntfUtilResult<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| IntfUtilError::malformed_speed(raw))
}

/// Formats a speed in Mb/s for display.
///
/// Copper ports keep megabit units up to and including 1000 Mb/s; every other
/// port switches to gigabits at 1000. Gigabit values get one decimal only when
/// the remainder is at least 100 Mb/s.
pub fn format_speed_mbps(speed: u64, optics_type: &str) -> String {
    if optics_type == values::OPTICS_TYPE_RJ45 && speed <= 1000 {
        format!("{}M", speed)
    } else if speed < 1000 {
        format!("{}M", speed)
    } else if speed % 1000 >= 100 {
        format!("{:.1}G", speed as f64 / 1000.0)
    } else {
        format!("{:.0}G", speed as f64 / 1000.0)
    }
}

/// Parses and formats a raw speed string.
pub fn format_speed(raw: &str, optics_type: &str) -> IntfUtilResult<String> {
    parse_speed(raw).map(|speed| format_speed_mbps(speed, optics_type))
}

/// Formats a comma-separated speed list, naturally sorted.
///
/// `N/A` and `all` are passed through untouched.
pub fn format_speed_list(raw: &str, optics_type: &str) -> IntfUtilResult<String> {
    if raw == values::NOT_AVAILABLE || raw == values::ALL {
        return Ok(raw.to_string());
    }

    let mut speeds: Vec<&str> = raw.split(',').map(str::trim).collect();
    natural_sort(&mut speeds);

    let formatted = speeds
        .into_iter()
        .map(|s| format_speed(s, optics_type))
        .collect::<IntfUtilResult<Vec<_>>>()?;

    Ok(formatted.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_megabit_range() {
        for raw in [1, 10, 100, 999] {
            assert_eq!(format_speed_mbps(raw, "N/A"), format!("{}M", raw));
            assert_eq!(format_speed_mbps(raw, "QSFP28"), format!("{}M", raw));
        }
    }

    #[test]
    fn test_whole_gigabits() {
        assert_eq!(format_speed_mbps(1000, "N/A"), "1G");
        assert_eq!(format_speed_mbps(10000, "N/A"), "10G");
        assert_eq!(format_speed_mbps(100000, "QSFP28 or later"), "100G");
        assert_eq!(format_speed_mbps(400000, "N/A"), "400G");
        assert_eq!(format_speed_mbps(10050, "N/A"), "10G");
    }

    #[test]
    fn test_fractional_gigabits() {
        assert_eq!(format_speed_mbps(40500, "N/A"), "40.5G");
        assert_eq!(format_speed_mbps(2500, "N/A"), "2.5G");
        assert_eq!(format_speed_mbps(25100, "N/A"), "25.1G");
    }

    #[test]
    fn test_rj45_keeps_megabits_up_to_1000() {
        assert_eq!(format_speed_mbps(1000, values::OPTICS_TYPE_RJ45), "1000M");
        assert_eq!(format_speed_mbps(100, values::OPTICS_TYPE_RJ45), "100M");
        assert_eq!(format_speed_mbps(10000, values::OPTICS_TYPE_RJ45), "10G");
    }

    #[test]
    fn test_malformed_speed() {
        assert!(matches!(
            format_speed("fast", "N/A"),
            Err(IntfUtilError::MalformedSpeed { .. })
        ));
        assert!(format_speed("-100", "N/A").is_err());
        assert!(format_speed("", "N/A").is_err());
        assert_eq!(format_speed("100000", "N/A").unwrap(), "100G");
    }

    #[test]
    fn test_speed_list_sorted_and_formatted() {
        assert_eq!(
            format_speed_list("1000,100,10000", values::OPTICS_TYPE_RJ45).unwrap(),
            "100M,1000M,10G"
        );
        assert_eq!(
            format_speed_list("100000,40000,50000", "N/A").unwrap(),
            "40G,50G,100G"
        );
    }

    #[test]
    fn test_speed_list_passthrough() {
        assert_eq!(format_speed_list("N/A", "N/A").unwrap(), "N/A");
        assert_eq!(format_speed_list("all", "N/A").unwrap(), "all");
    }

    #[test]
    fn test_speed_list_malformed_member() {
        assert!(format_speed_list("1000,fast", "N/A").is_err());
    }
}
