//! SVG scatter plots of a dataset and its clustering.
//!
//! Two panels, mirroring the usual affinity propagation figure:
//!
//! - the raw points;
//! - points colored by cluster, exemplars drawn larger with a black outline, and a
//!   line from every non-exemplar to its exemplar.
//!
//! Only the first two coordinates are drawn. Requires the `plot` feature.

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::cluster::AffinityFit;
use crate::error::{Error, Result};

/// Cluster colors, cycled: blue, green, red, cyan, magenta, yellow, black.
const CLUSTER_COLORS: [RGBColor; 7] = [BLUE, GREEN, RED, CYAN, MAGENTA, YELLOW, BLACK];

const PANEL_SIZE: (u32, u32) = (600, 500);

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

fn render_err<E: std::fmt::Display>(e: E) -> Error {
    Error::Render(e.to_string())
}

/// Scatter plot of `data`.
pub fn dataset_svg(data: &[Vec<f32>], title: &str) -> Result<String> {
    check_plottable(data)?;
    render(PANEL_SIZE, |root| draw_dataset(root, data, title))
}

/// Clustering panel: points colored by exemplar, with membership lines.
pub fn clustering_svg(data: &[Vec<f32>], fit: &AffinityFit, title: &str) -> Result<String> {
    check_plottable(data)?;
    fit.check(data.len())?;
    render(PANEL_SIZE, |root| draw_clustering(root, data, fit, title))
}

/// Both panels side by side: the dataset on the left, the clustering on the right.
pub fn report_svg(data: &[Vec<f32>], fit: &AffinityFit, dataset_title: &str) -> Result<String> {
    check_plottable(data)?;
    fit.check(data.len())?;
    let title = format!("Estimated number of clusters: {}", fit.n_clusters());
    render((PANEL_SIZE.0 * 2, PANEL_SIZE.1), |root| {
        let panels = root.split_evenly((1, 2));
        draw_dataset(&panels[0], data, dataset_title)?;
        draw_clustering(&panels[1], data, fit, &title)
    })
}

fn render(size: (u32, u32), draw: impl FnOnce(&Area<'_>) -> Result<()>) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;
        draw(&root)?;
        root.present().map_err(render_err)?;
    }
    Ok(svg)
}

fn check_plottable(data: &[Vec<f32>]) -> Result<()> {
    if data.is_empty() {
        return Err(Error::EmptyInput);
    }
    if let Some(p) = data.iter().find(|p| p.len() < 2) {
        return Err(Error::DimensionMismatch {
            expected: 2,
            found: p.len(),
        });
    }
    Ok(())
}

fn xy(p: &[f32]) -> (f64, f64) {
    (f64::from(p[0]), f64::from(p[1]))
}

/// Axis ranges covering every point with a 5% margin.
fn bounds(data: &[Vec<f32>]) -> (std::ops::Range<f64>, std::ops::Range<f64>) {
    let mut lo = (f64::INFINITY, f64::INFINITY);
    let mut hi = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in data {
        let (x, y) = xy(p);
        lo = (lo.0.min(x), lo.1.min(y));
        hi = (hi.0.max(x), hi.1.max(y));
    }
    let pad = |lo: f64, hi: f64| {
        let span = hi - lo;
        let m = if span > 0.0 { span * 0.05 } else { 1.0 };
        (lo - m)..(hi + m)
    };
    (pad(lo.0, hi.0), pad(lo.1, hi.1))
}

fn draw_dataset(area: &Area<'_>, data: &[Vec<f32>], title: &str) -> Result<()> {
    let (x_range, y_range) = bounds(data);
    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(x_range, y_range)
        .map_err(render_err)?;
    chart.configure_mesh().draw().map_err(render_err)?;

    chart
        .draw_series(data.iter().map(|p| Circle::new(xy(p), 3, BLUE.filled())))
        .map_err(render_err)?;
    Ok(())
}

fn draw_clustering(area: &Area<'_>, data: &[Vec<f32>], fit: &AffinityFit, title: &str) -> Result<()> {
    let (x_range, y_range) = bounds(data);
    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(x_range, y_range)
        .map_err(render_err)?;
    chart.configure_mesh().draw().map_err(render_err)?;

    for (&exemplar, color) in fit.exemplars.iter().zip(CLUSTER_COLORS.iter().cycle()) {
        let center = xy(&data[exemplar]);
        let members = fit.members(exemplar);

        chart
            .draw_series(members.iter().map(|&i| {
                PathElement::new(vec![center, xy(&data[i])], color.stroke_width(1))
            }))
            .map_err(render_err)?;
        chart
            .draw_series(members.iter().map(|&i| Circle::new(xy(&data[i]), 3, color.filled())))
            .map_err(render_err)?;
        chart
            .draw_series([
                Circle::new(center, 8, color.filled()),
                Circle::new(center, 8, BLACK.stroke_width(1)),
            ])
            .map_err(render_err)?;
    }
    Ok(())
}
