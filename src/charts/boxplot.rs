//! Per-attribute boxplots grouped by species.

use super::style::ChartStyle;
use super::{padded_range, species_tick};
use crate::models::{Attribute, Dataset, Species};
use crate::stats::{self, BoxStats};
use anyhow::Result;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

/// Half the width of a box, in category units.
const BOX_HALF_WIDTH: f64 = 0.3;
/// Half the width of a whisker cap, in category units.
const CAP_HALF_WIDTH: f64 = 0.12;

/// Render a 2x2 grid of boxplots, one per attribute, to `path`.
pub fn render(path: &Path, dataset: &Dataset, style: &ChartStyle) -> Result<()> {
    let root = BitMapBackend::new(path, style.pixels(style.boxplot_size)).into_drawing_area();
    root.fill(&WHITE)?;

    let panels = root.split_evenly((2, 2));
    for (panel, attr) in panels.iter().zip(Attribute::ALL) {
        draw_panel(panel, dataset, attr, style)?;
    }

    root.present()?;
    Ok(())
}

fn draw_panel(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    dataset: &Dataset,
    attr: Attribute,
    style: &ChartStyle,
) -> Result<()> {
    let values = dataset.column(attr);
    let caption = format!("Distribution of {} by Species", attr);

    let mut chart = ChartBuilder::on(area)
        .caption(caption, style.label_font())
        .margin(style.px(10.0))
        .x_label_area_size(style.px(36.0))
        .y_label_area_size(style.px(44.0))
        .build_cartesian_2d(-0.5f64..2.5f64, padded_range(&values, 0.08))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Species")
        .y_desc(attr.column_name())
        .axis_desc_style(style.tick_font().style(FontStyle::Bold))
        .label_style(style.tick_font())
        .x_labels(7)
        .x_label_formatter(&species_tick)
        .bold_line_style(BLACK.mix(0.15))
        .light_line_style(TRANSPARENT)
        .draw()?;

    for species in Species::ALL {
        let Some(b) = stats::box_stats(&dataset.column_of(species, attr)) else {
            continue;
        };
        let x = species.index() as f64;
        draw_box(&mut chart, x, &b, style.box_colors[species.index()])?;
    }
    Ok(())
}

fn draw_box(
    chart: &mut ChartContext<'_, BitMapBackend<'_>, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    x: f64,
    b: &BoxStats,
    fill: RGBColor,
) -> Result<()> {
    let (left, right) = (x - BOX_HALF_WIDTH, x + BOX_HALF_WIDTH);
    let (cap_left, cap_right) = (x - CAP_HALF_WIDTH, x + CAP_HALF_WIDTH);
    let body = fill.filled();
    let line = BLACK.stroke_width(2);
    let outline = BLACK.stroke_width(1);

    chart.draw_series(std::iter::once(Rectangle::new([(left, b.q1), (right, b.q3)], body)))?;
    chart.draw_series(std::iter::once(Rectangle::new([(left, b.q1), (right, b.q3)], line)))?;

    let segments = [
        // median
        vec![(left, b.median), (right, b.median)],
        // whiskers
        vec![(x, b.q3), (x, b.whisker_high)],
        vec![(x, b.q1), (x, b.whisker_low)],
        // caps
        vec![(cap_left, b.whisker_high), (cap_right, b.whisker_high)],
        vec![(cap_left, b.whisker_low), (cap_right, b.whisker_low)],
    ];
    chart.draw_series(segments.into_iter().map(|pts| PathElement::new(pts, line)))?;

    chart.draw_series(b.outliers.iter().map(|v| Circle::new((x, *v), 4, outline)))?;
    Ok(())
}
