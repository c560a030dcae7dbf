//! Correlation heatmap with annotated coefficients and a colour bar.

use super::style::{diverging, ChartStyle};
use crate::models::{Attribute, CorrelationMatrix};
use anyhow::Result;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;

/// Number of slices in the colour bar.
const BAR_STEPS: usize = 100;

/// Render the heatmap to `path`.
pub fn render(path: &Path, matrix: &CorrelationMatrix, style: &ChartStyle) -> Result<()> {
    let (width, height) = style.pixels(style.heatmap_size);
    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE)?;

    let root = root.titled(
        "Correlation Matrix of Numeric Variables",
        style.title_font(),
    )?;
    let (grid_area, bar_area) = root.split_horizontally((width * 82 / 100) as i32);

    let n = Attribute::ALL.len();
    let upper = n as f64 - 0.5;
    let mut chart = ChartBuilder::on(&grid_area)
        .margin(style.px(10.0))
        .x_label_area_size(style.px(40.0))
        .y_label_area_size(style.px(100.0))
        .build_cartesian_2d(-0.5f64..upper, -0.5f64..upper)?;

    // Row 0 sits at the top, so the y axis counts rows from the bottom.
    let x_label = |x: &f64| attribute_tick(*x, false);
    let y_label = |y: &f64| attribute_tick(*y, true);
    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(2 * n + 1)
        .y_labels(2 * n + 1)
        .x_label_formatter(&x_label)
        .y_label_formatter(&y_label)
        .label_style(style.tick_font())
        .draw()?;

    let border = BLACK.stroke_width(2);
    for row in Attribute::ALL {
        for col in Attribute::ALL {
            let value = matrix.get(row, col);
            let x = col.index() as f64;
            let y = (n - 1 - row.index()) as f64;
            let cell = [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)];

            chart.draw_series(std::iter::once(Rectangle::new(cell, diverging(value).filled())))?;
            chart.draw_series(std::iter::once(Rectangle::new(cell, border)))?;

            let text_color = if value.abs() > 0.6 { WHITE } else { BLACK };
            let annotation = style
                .label_font()
                .color(&text_color)
                .pos(Pos::new(HPos::Center, VPos::Center));
            let label = format!("{:.2}", value);
            chart.draw_series(std::iter::once(Text::new(label, (x, y), annotation)))?;
        }
    }

    draw_color_bar(&bar_area, style)?;

    root.present()?;
    Ok(())
}

fn draw_color_bar(
    area: &DrawingArea<BitMapBackend<'_>, plotters::coord::Shift>,
    style: &ChartStyle,
) -> Result<()> {
    let mut chart = ChartBuilder::on(area)
        .margin(style.px(10.0))
        .margin_top(style.px(20.0))
        .x_label_area_size(style.px(40.0))
        .y_label_area_size(style.px(40.0))
        .build_cartesian_2d(0f64..1f64, -1f64..1f64)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_desc("Correlation")
        .axis_desc_style(style.label_font())
        .label_style(style.tick_font())
        .y_labels(5)
        .draw()?;

    let step = 2.0 / BAR_STEPS as f64;
    chart.draw_series((0..BAR_STEPS).map(|i| {
        let lo = -1.0 + step * i as f64;
        let color = diverging(lo + step / 2.0);
        Rectangle::new([(0.0, lo), (1.0, lo + step)], color.filled())
    }))?;
    Ok(())
}

/// Attribute title for axis positions that land on a cell centre.
fn attribute_tick(position: f64, from_bottom: bool) -> String {
    let rounded = position.round();
    if (position - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    let n = Attribute::ALL.len();
    let idx = rounded as usize;
    if idx >= n {
        return String::new();
    }
    let idx = if from_bottom { n - 1 - idx } else { idx };
    Attribute::ALL[idx].title().to_string()
}
