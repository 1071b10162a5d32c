use std::cmp::Ordering;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref CORNER_RE: Regex = Regex::new(r"(\w+)_([n\d]+)C_([\dv]+)").unwrap();
}

/// The process segment of a liberty file name, uppercased.
///
/// Liberty files follow the `<cell_lib>__<process>_<temp>C_<voltage>.lib`
/// convention, e.g. `sky130_fd_sc_hd__tt_025C_1v80.lib` maps to `TT`.
/// Reports for that lib land in the report subdirectory of the same name.
pub fn corner_group(lib_file_name: &str) -> Option<String> {
    let corner = lib_file_name.split("__").nth(1)?;
    let process = corner.split('_').next()?;
    Some(process.to_uppercase())
}

/// The PVT corner label embedded in a report file name.
///
/// `pmu_fsm.power.sky130_fd_sc_hd__tt_025C_1v80.lib.rpt` maps to
/// `tt_025C_1v80`.
pub fn pvt_label(report_file_name: &str) -> Option<String> {
    let tail = report_file_name.split("__").nth(1)?;
    Some(tail.strip_suffix(".lib.rpt").unwrap_or(tail).to_string())
}

/// A PVT corner label decoded into its sortable parts.
#[derive(Debug, Clone, PartialEq)]
pub struct CornerKey {
    /// Process name as written in the label (e.g. `tt`).
    pub process: String,
    /// Temperature in degrees Celsius. `n40` decodes to -40.
    pub temp_c: i32,
    /// Supply voltage in volts. `1v80` decodes to 1.80.
    pub voltage: f64,
}

impl CornerKey {
    /// Parses a label such as `tt_025C_1v80` or `ff_n40C_1v95`.
    pub fn parse(label: &str) -> Option<Self> {
        let caps = CORNER_RE.captures(label)?;
        let process = caps[1].to_string();
        let temp_c = parse_temp(&caps[2])?;
        let voltage = parse_voltage(&caps[3])?;
        Some(CornerKey {
            process,
            temp_c,
            voltage,
        })
    }

    /// Corner ordering used for tables and chart axes: temperature,
    /// then voltage.
    pub fn cmp_order(&self, other: &Self) -> Ordering {
        self.temp_c
            .cmp(&other.temp_c)
            .then(self.voltage.total_cmp(&other.voltage))
    }
}

fn parse_temp(s: &str) -> Option<i32> {
    if let Some(rest) = s.strip_prefix('n') {
        rest.parse::<i32>().ok().map(|t| -t)
    } else {
        s.parse().ok()
    }
}

fn parse_voltage(s: &str) -> Option<f64> {
    s.replace('v', ".").parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn corner_group_from_lib_name() {
        assert_eq!(
            corner_group("sky130_fd_sc_hd__tt_025C_1v80.lib").as_deref(),
            Some("TT")
        );
        assert_eq!(
            corner_group("sky130_fd_sc_hd__ss_n40C_1v60.lib").as_deref(),
            Some("SS")
        );
        assert_eq!(corner_group("no_separator.lib"), None);
    }

    #[test]
    fn pvt_label_from_report_name() {
        assert_eq!(
            pvt_label("pmu_fsm.power.sky130_fd_sc_hd__tt_025C_1v80.lib.rpt").as_deref(),
            Some("tt_025C_1v80")
        );
        assert_eq!(
            pvt_label("pmu_fsm.timing.sky130_fd_sc_hd__ff_n40C_1v95.lib.rpt").as_deref(),
            Some("ff_n40C_1v95")
        );
        assert_eq!(pvt_label("pmu_fsm.power.rpt"), None);
    }

    #[test]
    fn parse_room_temp_corner() {
        let key = CornerKey::parse("tt_025C_1v80").unwrap();
        assert_eq!(key.process, "tt");
        assert_eq!(key.temp_c, 25);
        assert_abs_diff_eq!(key.voltage, 1.80);
    }

    #[test]
    fn parse_negative_temp_corner() {
        let key = CornerKey::parse("ff_n40C_1v95").unwrap();
        assert_eq!(key.process, "ff");
        assert_eq!(key.temp_c, -40);
        assert_abs_diff_eq!(key.voltage, 1.95);
    }

    #[test]
    fn parse_high_temp_corner() {
        let key = CornerKey::parse("ss_100C_1v60").unwrap();
        assert_eq!(key.temp_c, 100);
        assert_abs_diff_eq!(key.voltage, 1.60);
    }

    #[test]
    fn parse_rejects_malformed_labels() {
        assert!(CornerKey::parse("totally-wrong").is_none());
        assert!(CornerKey::parse("tt_025_1v80").is_none());
    }

    #[test]
    fn corner_ordering() {
        let cold = CornerKey::parse("ff_n40C_1v95").unwrap();
        let room_lo = CornerKey::parse("ff_025C_1v60").unwrap();
        let room_hi = CornerKey::parse("ff_025C_1v95").unwrap();
        let hot = CornerKey::parse("ff_100C_1v60").unwrap();

        assert_eq!(cold.cmp_order(&room_lo), Ordering::Less);
        assert_eq!(room_lo.cmp_order(&room_hi), Ordering::Less);
        assert_eq!(room_hi.cmp_order(&hot), Ordering::Less);
        assert_eq!(hot.cmp_order(&hot), Ordering::Equal);
    }
}
