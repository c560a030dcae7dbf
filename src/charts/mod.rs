//! Chart rendering.
//!
//! Every chart is a PNG written to a fixed file name inside the output
//! directory; an existing file is overwritten. Rendering failures are not
//! recovered from.

pub mod boxplot;
pub mod dashboard;
pub mod heatmap;
pub mod style;

pub use style::ChartStyle;

use crate::config::ChartsConfig;
use crate::models::{ChartArtifact, ChartKind, CorrelationMatrix, Dataset, GroupSummary, Species};
use crate::stats;
use anyhow::{Context, Result};
use indicatif::ProgressBar;
use std::ops::Range;
use std::path::Path;
use tracing::info;

/// Everything the renderer draws from.
pub struct ChartInput<'a> {
    pub dataset: &'a Dataset,
    pub groups: &'a GroupSummary,
    pub correlation: &'a CorrelationMatrix,
}

/// Render every chart into `output_dir`.
pub fn render_all(
    input: &ChartInput<'_>,
    config: &ChartsConfig,
    style: &ChartStyle,
    output_dir: &Path,
    progress: Option<&ProgressBar>,
) -> Result<Vec<ChartArtifact>> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    let targets = [
        (ChartKind::Dashboard, &config.dashboard_file),
        (ChartKind::Heatmap, &config.heatmap_file),
        (ChartKind::Boxplots, &config.boxplot_file),
    ];

    let mut artifacts = Vec::with_capacity(targets.len());
    for (kind, file) in targets {
        let path = output_dir.join(file);
        if let Some(pb) = progress {
            pb.set_message(format!("Rendering {}", kind));
        }

        match kind {
            ChartKind::Dashboard => dashboard::render(&path, input.dataset, input.groups, style),
            ChartKind::Heatmap => heatmap::render(&path, input.correlation, style),
            ChartKind::Boxplots => boxplot::render(&path, input.dataset, style),
        }
        .with_context(|| format!("Failed to render {} to {}", kind, path.display()))?;

        info!("{} saved to {}", kind, path.display());
        if let Some(pb) = progress {
            pb.inc(1);
        }
        artifacts.push(ChartArtifact { kind, path });
    }

    Ok(artifacts)
}

/// Value range of `values` widened by `fraction` of its span on both sides.
///
/// Empty input gives `0..1`; a single distinct value is widened by 0.5.
pub(crate) fn padded_range(values: &[f64], fraction: f64) -> Range<f64> {
    let lo = stats::min(values);
    let hi = stats::max(values);
    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..1.0;
    }
    if hi == lo {
        return (lo - 0.5)..(hi + 0.5);
    }
    let pad = (hi - lo) * fraction;
    (lo - pad)..(hi + pad)
}

/// Species label for category axis positions 0, 1 and 2; blank elsewhere.
pub(crate) fn species_tick(position: &f64) -> String {
    let rounded = position.round();
    if (position - rounded).abs() > 1e-6 {
        return String::new();
    }
    Species::ALL
        .iter()
        .find(|s| s.index() as f64 == rounded)
        .map(|s| s.label().to_string())
        .unwrap_or_default()
}
