use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use derive_builder::Builder;
use itertools::Itertools;
use log::warn;
use plotters::prelude::*;

use crate::corner::CornerKey;
use crate::report::PathType;
use crate::summary::{PowerRow, TimingRow};
use crate::Result;

/// Series color per process: TT steel blue, FF tomato, SS sea green,
/// anything else orange.
pub fn process_color(process: &str) -> RGBColor {
    match process {
        "TT" => RGBColor(70, 130, 180),
        "FF" => RGBColor(255, 99, 71),
        "SS" => RGBColor(46, 139, 87),
        _ => RGBColor(255, 165, 0),
    }
}

#[derive(Debug, Clone, Builder)]
pub struct PlotParams {
    pub caption: String,
    pub y_desc: String,
    pub output_path: PathBuf,
    #[builder(default = "(1000, 800)")]
    pub size: (u32, u32),
}

impl PlotParams {
    #[inline]
    pub fn builder() -> PlotParamsBuilder {
        PlotParamsBuilder::default()
    }
}

struct Series {
    label: String,
    color: RGBColor,
    points: Vec<(usize, f64)>,
}

/// Renders the chart set for one sweep: total power, hold slack, and
/// setup slack vs PVT corner, one line per process.
pub fn render_charts(
    power: &[PowerRow],
    timing: &[TimingRow],
    plots_dir: impl AsRef<Path>,
) -> Result<()> {
    let plots_dir = plots_dir.as_ref();
    fs::create_dir_all(plots_dir)?;

    plot_power(
        power,
        &PlotParams::builder()
            .caption("Power vs PVT Corner".to_string())
            .y_desc("Total Power (W)".to_string())
            .output_path(plots_dir.join("Power_vs_PVT_Corner.png"))
            .build()?,
    )?;
    plot_slack(
        timing,
        PathType::Hold,
        &PlotParams::builder()
            .caption("Hold Slack vs PVT Corner".to_string())
            .y_desc("Slack (ns)".to_string())
            .output_path(plots_dir.join("Hold_Slack_vs_PVT_Corner.png"))
            .build()?,
    )?;
    plot_slack(
        timing,
        PathType::Setup,
        &PlotParams::builder()
            .caption("Setup Slack vs PVT Corner".to_string())
            .y_desc("Slack (ns)".to_string())
            .output_path(plots_dir.join("Setup_Slack_vs_PVT_Corner.png"))
            .build()?,
    )?;

    Ok(())
}

pub fn plot_power(rows: &[PowerRow], params: &PlotParams) -> Result<()> {
    let (corners, series) = build_series(
        rows.iter()
            .map(|r| (r.process.as_str(), r.corner.as_str(), &r.key, r.power_w)),
    );
    draw_lines(&corners, &series, params)
}

pub fn plot_slack(rows: &[TimingRow], path_type: PathType, params: &PlotParams) -> Result<()> {
    let (corners, series) = build_series(
        rows.iter()
            .filter(|r| r.path_type == path_type)
            .map(|r| (r.process.as_str(), r.corner.as_str(), &r.key, r.slack)),
    );
    draw_lines(&corners, &series, params)
}

/// Builds the corner axis (the union of corner labels ordered by
/// temperature then voltage) and one series per process, with each
/// point placed at the index of its corner label.
fn build_series<'a>(
    rows: impl Iterator<Item = (&'a str, &'a str, &'a CornerKey, f64)> + Clone,
) -> (Vec<String>, Vec<Series>) {
    let mut labeled: Vec<(&CornerKey, &str)> =
        rows.clone().map(|(_, corner, key, _)| (key, corner)).collect();
    labeled.sort_by(|a, b| a.0.cmp_order(b.0).then(a.1.cmp(b.1)));
    labeled.dedup_by(|a, b| a.1 == b.1);
    let corners: Vec<String> = labeled.into_iter().map(|(_, c)| c.to_string()).collect();

    let index: HashMap<&str, usize> = corners
        .iter()
        .enumerate()
        .map(|(i, c)| (c.as_str(), i))
        .collect();

    let mut series = Vec::new();
    for (process, group) in &rows.group_by(|(process, ..)| *process) {
        let points = group
            .map(|(_, corner, _, value)| (index[corner], value))
            .collect();
        series.push(Series {
            label: process.to_string(),
            color: process_color(process),
            points,
        });
    }

    (corners, series)
}

fn draw_lines(corners: &[String], series: &[Series], params: &PlotParams) -> Result<()> {
    if corners.is_empty() {
        warn!("no data for chart {:?}, skipping", params.output_path);
        return Ok(());
    }

    let (y_min, y_max) = y_range(series);
    let x_max = corners.len() as f64 - 0.5;

    let root = BitMapBackend::new(&params.output_path, params.size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .x_label_area_size(120)
        .y_label_area_size(60)
        .margin(10)
        .caption(&params.caption, ("sans-serif", 28.0).into_font())
        .build_cartesian_2d(-0.5f64..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(corners.len())
        .x_label_formatter(&|&x| {
            let i = x.round() as i64;
            if (x - i as f64).abs() < 0.25 && i >= 0 && (i as usize) < corners.len() {
                corners[i as usize].clone()
            } else {
                String::new()
            }
        })
        .x_desc("PVT Corner")
        .y_desc(&params.y_desc)
        .draw()?;

    for s in series {
        let color = s.color;
        chart
            .draw_series(LineSeries::new(
                s.points.iter().map(|&(i, v)| (i as f64, v)),
                color.stroke_width(2),
            ))?
            .label(&s.label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        chart.draw_series(
            s.points
                .iter()
                .map(|&(i, v)| Circle::new((i as f64, v), 4, color.filled())),
        )?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Padded value range across all series.
fn y_range(series: &[Series]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for s in series {
        for &(_, v) in &s.points {
            min = min.min(v);
            max = max.max(v);
        }
    }
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    let pad = if max > min { (max - min) * 0.05 } else { 1.0 };
    (min - pad, max + pad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn power_row(process: &str, corner: &str, power_w: f64) -> PowerRow {
        PowerRow {
            process: process.to_string(),
            corner: corner.to_string(),
            key: CornerKey::parse(corner).unwrap(),
            power_w,
        }
    }

    #[test]
    fn known_process_colors() {
        assert_eq!(process_color("TT"), RGBColor(70, 130, 180));
        assert_eq!(process_color("FF"), RGBColor(255, 99, 71));
        assert_eq!(process_color("SS"), RGBColor(46, 139, 87));
        assert_eq!(process_color("MC"), RGBColor(255, 165, 0));
    }

    #[test]
    fn series_axis_is_corner_union_in_corner_order() {
        let rows = vec![
            power_row("FF", "ff_n40C_1v95", 5.2e-3),
            power_row("FF", "ff_100C_1v95", 6.0e-3),
            power_row("TT", "tt_025C_1v80", 3.8e-3),
        ];
        let (corners, series) = build_series(
            rows.iter()
                .map(|r| (r.process.as_str(), r.corner.as_str(), &r.key, r.power_w)),
        );

        assert_eq!(corners, vec!["ff_n40C_1v95", "tt_025C_1v80", "ff_100C_1v95"]);
        assert_eq!(series.len(), 2);

        assert_eq!(series[0].label, "FF");
        assert_eq!(series[0].points[0].0, 0);
        assert_eq!(series[0].points[1].0, 2);
        assert_abs_diff_eq!(series[0].points[1].1, 6.0e-3);

        assert_eq!(series[1].label, "TT");
        assert_eq!(series[1].points, vec![(1, 3.8e-3)]);
    }

    #[test]
    fn duplicate_corner_labels_collapse() {
        let rows = vec![
            power_row("TT", "tt_025C_1v80", 3.8e-3),
            power_row("SS", "tt_025C_1v80", 3.1e-3),
        ];
        let (corners, series) = build_series(
            rows.iter()
                .map(|r| (r.process.as_str(), r.corner.as_str(), &r.key, r.power_w)),
        );
        assert_eq!(corners.len(), 1);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].points[0].0, 0);
        assert_eq!(series[1].points[0].0, 0);
    }

    #[test]
    fn y_range_pads_flat_series() {
        let series = vec![Series {
            label: "TT".to_string(),
            color: process_color("TT"),
            points: vec![(0, 1.0), (1, 1.0)],
        }];
        let (lo, hi) = y_range(&series);
        assert_abs_diff_eq!(lo, 0.0);
        assert_abs_diff_eq!(hi, 2.0);
    }

    #[test]
    fn plot_params_default_size() {
        let params = PlotParams::builder()
            .caption("Power vs PVT Corner".to_string())
            .y_desc("Total Power (W)".to_string())
            .output_path(PathBuf::from("plots/power.png"))
            .build()
            .unwrap();
        assert_eq!(params.size, (1000, 800));
    }
}
