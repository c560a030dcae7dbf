//! The four-panel overview figure.
//!
//! Top left: daily mean sepal length over time. Top right: mean petal length
//! per species. Bottom left: sepal length histogram. Bottom right: sepal
//! versus petal length scatter with a fitted trend line.

use super::style::ChartStyle;
use super::{padded_range, species_tick};
use crate::analysis::daily_means;
use crate::models::{Attribute, Dataset, GroupSummary, Species};
use crate::stats;
use anyhow::Result;
use chrono::{Duration, NaiveDate};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;
use tracing::debug;

/// Points sampled along the scatter trend line.
const TREND_POINTS: usize = 100;

/// Render the dashboard to `path`.
pub fn render(
    path: &Path,
    dataset: &Dataset,
    groups: &GroupSummary,
    style: &ChartStyle,
) -> Result<()> {
    let root = BitMapBackend::new(path, style.pixels(style.dashboard_size)).into_drawing_area();
    root.fill(&WHITE)?;

    let panels = root.split_evenly((2, 2));
    draw_trend(&panels[0], dataset, style)?;
    draw_bars(&panels[1], groups, style)?;
    draw_histogram(&panels[2], dataset, style)?;
    draw_scatter(&panels[3], dataset, style)?;

    root.present()?;
    Ok(())
}

fn draw_trend(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    dataset: &Dataset,
    style: &ChartStyle,
) -> Result<()> {
    let daily = daily_means(dataset, Attribute::SepalLength);
    let start: NaiveDate = daily
        .first()
        .map(|(d, _)| *d)
        .unwrap_or_else(crate::dataset::loader::start_date);
    let points: Vec<(i32, f64)> = daily
        .iter()
        .map(|(d, v)| ((*d - start).num_days() as i32, *v))
        .collect();
    debug!("Trend chart: {} daily points", points.len());

    let last_day = points.last().map(|p| p.0).unwrap_or(0).max(1);
    let values: Vec<f64> = points.iter().map(|p| p.1).collect();
    let y_max = stats::max(&values).max(0.0) * 1.1 + 0.1;

    let mut chart = ChartBuilder::on(area)
        .caption("Sepal Length Trend Over Time", style.title_font())
        .margin(style.px(10.0))
        .x_label_area_size(style.px(36.0))
        .y_label_area_size(style.px(44.0))
        .build_cartesian_2d(0..last_day, 0f64..y_max)?;

    let date_label = |d: &i32| {
        let date = start + Duration::days(*d as i64);
        date.format("%Y-%m-%d").to_string()
    };
    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc(Attribute::SepalLength.column_name())
        .axis_desc_style(style.label_font())
        .label_style(style.tick_font())
        .x_labels(6)
        .x_label_formatter(&date_label)
        .bold_line_style(BLACK.mix(0.15))
        .light_line_style(TRANSPARENT)
        .draw()?;

    let color = style.trend_color;
    chart.draw_series(AreaSeries::new(points.iter().copied(), 0.0, color.mix(0.3).filled()))?;
    chart
        .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(3)))?
        .label("Daily mean")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(3)));
    chart.draw_series(points.iter().map(|p| Circle::new(*p, 3, color.filled())))?;

    chart
        .configure_series_labels()
        .label_font(style.tick_font())
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    Ok(())
}

fn draw_bars(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    groups: &GroupSummary,
    style: &ChartStyle,
) -> Result<()> {
    let bars: Vec<(Species, f64)> = groups
        .groups
        .iter()
        .map(|g| (g.species, g.aggregate(Attribute::PetalLength).mean))
        .collect();
    let top = bars.iter().map(|b| b.1).fold(0.0, f64::max) * 1.15 + 0.2;

    let mut chart = ChartBuilder::on(area)
        .caption("Mean Petal Length by Species", style.title_font())
        .margin(style.px(10.0))
        .x_label_area_size(style.px(36.0))
        .y_label_area_size(style.px(44.0))
        .build_cartesian_2d(-0.5f64..2.5f64, 0f64..top)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Species")
        .y_desc(Attribute::PetalLength.column_name())
        .axis_desc_style(style.label_font())
        .label_style(style.tick_font())
        .x_labels(7)
        .x_label_formatter(&species_tick)
        .bold_line_style(BLACK.mix(0.15))
        .light_line_style(TRANSPARENT)
        .draw()?;

    let value_style = style
        .tick_font()
        .style(FontStyle::Bold)
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Bottom));

    for (species, mean) in &bars {
        let x = species.index() as f64;
        let color = style.bar_colors[species.index()];
        chart.draw_series(std::iter::once(Rectangle::new(
            [(x - 0.3, 0.0), (x + 0.3, *mean)],
            color.filled(),
        )))?;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(x - 0.3, 0.0), (x + 0.3, *mean)],
            BLACK.stroke_width(2),
        )))?;
        chart.draw_series(std::iter::once(Text::new(
            format!("{:.2}", mean),
            (x, mean + 0.05),
            value_style.clone(),
        )))?;
    }
    Ok(())
}

fn draw_histogram(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    dataset: &Dataset,
    style: &ChartStyle,
) -> Result<()> {
    let values = dataset.column(Attribute::SepalLength);
    let bins = stats::histogram(&values, style.histogram_bins);
    let mean = stats::mean(&values);
    let peak = bins.iter().map(|b| b.count).max().unwrap_or(0) as f64;
    let x_range = padded_range(&values, 0.05);

    let mut chart = ChartBuilder::on(area)
        .caption("Sepal Length Distribution", style.title_font())
        .margin(style.px(10.0))
        .x_label_area_size(style.px(36.0))
        .y_label_area_size(style.px(44.0))
        .build_cartesian_2d(x_range, 0f64..(peak * 1.1).max(1.0))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(Attribute::SepalLength.column_name())
        .y_desc("Frequency")
        .axis_desc_style(style.label_font())
        .label_style(style.tick_font())
        .bold_line_style(BLACK.mix(0.15))
        .light_line_style(TRANSPARENT)
        .draw()?;

    let fill = style.histogram_color.mix(0.7).filled();
    let outline = BLACK.stroke_width(1);
    let corners = |b: &stats::Bin| [(b.lower, 0.0), (b.upper, b.count as f64)];
    chart.draw_series(bins.iter().map(|b| Rectangle::new(corners(b), fill)))?;
    chart.draw_series(bins.iter().map(|b| Rectangle::new(corners(b), outline)))?;

    if mean.is_finite() {
        let mean_color = style.mean_color;
        chart
            .draw_series(DashedLineSeries::new(
                vec![(mean, 0.0), (mean, peak * 1.1)],
                10,
                6,
                mean_color.stroke_width(3),
            ))?
            .label(format!("Mean: {:.2} cm", mean))
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], mean_color.stroke_width(3))
            });
    }

    chart
        .configure_series_labels()
        .label_font(style.tick_font())
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    Ok(())
}

fn draw_scatter(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    dataset: &Dataset,
    style: &ChartStyle,
) -> Result<()> {
    let (x_attr, y_attr) = (Attribute::SepalLength, Attribute::PetalLength);
    let xs = dataset.column(x_attr);
    let ys = dataset.column(y_attr);

    let mut chart = ChartBuilder::on(area)
        .caption("Sepal Length vs Petal Length", style.title_font())
        .margin(style.px(10.0))
        .x_label_area_size(style.px(36.0))
        .y_label_area_size(style.px(44.0))
        .build_cartesian_2d(padded_range(&xs, 0.05), padded_range(&ys, 0.05))?;

    chart
        .configure_mesh()
        .x_desc(x_attr.column_name())
        .y_desc(y_attr.column_name())
        .axis_desc_style(style.label_font())
        .label_style(style.tick_font())
        .bold_line_style(BLACK.mix(0.15))
        .light_line_style(TRANSPARENT)
        .draw()?;

    let outline = BLACK.stroke_width(1);
    for species in Species::ALL {
        let points: Vec<(f64, f64)> = dataset
            .records_of(species)
            .filter_map(|r| Some((r.get(x_attr)?, r.get(y_attr)?)))
            .collect();
        if points.is_empty() {
            continue;
        }
        let color = style.species_color(species);
        let fill = color.mix(0.7).filled();
        chart
            .draw_series(points.iter().map(|p| Circle::new(*p, 6, fill)))?
            .label(species.label())
            .legend(move |(x, y)| Circle::new((x + 10, y), 6, color.filled()));
        chart.draw_series(points.iter().map(|p| Circle::new(*p, 6, outline)))?;
    }

    if let Some(fit) = stats::linear_fit(&xs, &ys) {
        let (lo, hi) = (stats::min(&xs), stats::max(&xs));
        let step = (hi - lo) / (TREND_POINTS - 1) as f64;
        let line: Vec<(f64, f64)> = (0..TREND_POINTS)
            .map(|i| {
                let x = lo + step * i as f64;
                (x, fit.at(x))
            })
            .collect();
        debug!(
            "Trend line: slope {:.3}, intercept {:.3}",
            fit.slope,
            fit.intercept
        );
        chart
            .draw_series(DashedLineSeries::new(line, 10, 6, BLACK.mix(0.7).stroke_width(2)))?
            .label("Trend")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .label_font(style.tick_font())
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    Ok(())
}
