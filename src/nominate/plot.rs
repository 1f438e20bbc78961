// Plots of the estimates, as SVG files.

use std::collections::BTreeMap;
use std::fmt::Display;

use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;

use crate::nominate::*;

pub const STATIC_1D_FILE: &str = "static-1d.svg";
pub const STATIC_2D_FILE: &str = "static-2d.svg";
pub const DYNAMIC_FILE: &str = "dynamic.svg";

const FONT: &str = "sans-serif";

type DrawResult = Result<(), DrawingAreaErrorKind<std::io::Error>>;

fn plotting<'a, E: Display>(path: &'a Path) -> impl Fn(E) -> NominateError + 'a {
    move |e| {
        PlottingSnafu {
            path: path.display().to_string(),
            message: e.to_string(),
        }
        .build()
    }
}

/// The range covering the finite values, with some room on both sides.
fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|x| x.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
            (lo.min(x), hi.max(x))
        });
    if !lo.is_finite() {
        return (-1.0, 1.0);
    }
    if hi - lo < 1e-9 {
        return (lo - 1.0, hi + 1.0);
    }
    let pad = 0.1 * (hi - lo);
    (lo - pad, hi + pad)
}

/// Legislators ranked along the first dimension, with one standard error on
/// each side.
pub fn plot_static_1d(path: &Path, estimate: &StaticEstimate) -> NResult<()> {
    let mut rows: Vec<(&str, f64, f64)> = estimate
        .legislators
        .iter()
        .filter_map(|l| {
            let c = l.coordinates.first().cloned().unwrap_or(f64::NAN);
            let se = l.std_errors.first().cloned().unwrap_or(f64::NAN);
            if c.is_finite() {
                Some((l.legislator.as_str(), c, se))
            } else {
                None
            }
        })
        .collect();
    rows.sort_by(|a, b| a.1.total_cmp(&b.1));

    let height = 80 + 16 * rows.len() as u32;
    {
        let root = SVGBackend::new(path, (800, height)).into_drawing_area();
        draw_static_1d(&root, &rows).map_err(plotting(path))?;
        root.present().map_err(plotting(path))?;
    }
    info!("Wrote {:?}", path);
    Ok(())
}

fn draw_static_1d(
    root: &DrawingArea<SVGBackend, Shift>,
    rows: &[(&str, f64, f64)],
) -> DrawResult {
    root.fill(&WHITE)?;
    let with_errors = |(_, c, se): &(&str, f64, f64)| {
        let se = if se.is_finite() { *se } else { 0.0 };
        vec![c - se, c + se]
    };
    let (lo, hi) = bounds(rows.iter().flat_map(with_errors));
    let mut chart = ChartBuilder::on(root)
        .caption("Static estimation, first dimension", (FONT, 20))
        .margin(10)
        .set_label_area_size(LabelAreaPosition::Bottom, 30)
        .build_cartesian_2d(lo..hi, -1f64..(rows.len() as f64))?;
    chart
        .configure_mesh()
        .disable_y_mesh()
        .disable_y_axis()
        .draw()?;

    chart.draw_series(
        rows.iter()
            .enumerate()
            .filter(|(_, r)| r.2.is_finite())
            .map(|(i, (_, c, se))| {
                PathElement::new(vec![(c - se, i as f64), (c + se, i as f64)], &BLUE)
            }),
    )?;
    chart.draw_series(
        rows.iter()
            .enumerate()
            .map(|(i, (_, c, _))| Circle::new((*c, i as f64), 3, BLUE.filled())),
    )?;
    chart.draw_series(rows.iter().enumerate().map(|(i, (name, c, _))| {
        Text::new(name.to_string(), (*c, i as f64 + 0.3), (FONT, 11).into_font())
    }))?;
    Ok(())
}

/// Both dimensions, in the unit circle.
pub fn plot_static_2d(
    path: &Path,
    estimate: &StaticEstimate,
    axis_titles: &(String, String),
) -> NResult<()> {
    let points: Vec<(&str, f64, f64)> = estimate
        .legislators
        .iter()
        .filter_map(|l| match l.coordinates.as_slice() {
            [x, y, ..] if x.is_finite() && y.is_finite() => Some((l.legislator.as_str(), *x, *y)),
            _ => None,
        })
        .collect();
    {
        let root = SVGBackend::new(path, (800, 800)).into_drawing_area();
        draw_static_2d(&root, &points, axis_titles).map_err(plotting(path))?;
        root.present().map_err(plotting(path))?;
    }
    info!("Wrote {:?}", path);
    Ok(())
}

fn draw_static_2d(
    root: &DrawingArea<SVGBackend, Shift>,
    points: &[(&str, f64, f64)],
    axis_titles: &(String, String),
) -> DrawResult {
    root.fill(&WHITE)?;
    let (lo, hi) = bounds(
        points
            .iter()
            .flat_map(|(_, x, y)| vec![*x, *y])
            .chain(vec![-1.0, 1.0]),
    );
    let mut chart = ChartBuilder::on(root)
        .caption("Static estimation", (FONT, 20))
        .margin(10)
        .set_label_area_size(LabelAreaPosition::Left, 50)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(lo..hi, lo..hi)?;
    chart
        .configure_mesh()
        .x_desc(axis_titles.0.as_str())
        .y_desc(axis_titles.1.as_str())
        .draw()?;

    chart.draw_series(LineSeries::new(
        (0..=100).map(|i| {
            let t = 2.0 * std::f64::consts::PI * (i as f64) / 100.0;
            (t.cos(), t.sin())
        }),
        &BLACK,
    ))?;
    chart.draw_series(
        points
            .iter()
            .map(|(_, x, y)| Circle::new((*x, *y), 3, RED.filled())),
    )?;
    chart.draw_series(
        points
            .iter()
            .map(|(name, x, y)| Text::new(name.to_string(), (*x, *y), (FONT, 11).into_font())),
    )?;
    Ok(())
}

/// The first dimension of every legislator across the years.
pub fn plot_dynamic(path: &Path, estimate: &DynamicEstimate) -> NResult<()> {
    let mut series: BTreeMap<&str, Vec<(f64, f64)>> = BTreeMap::new();
    for p in estimate.points.iter() {
        let c = p.coordinates.first().cloned().unwrap_or(f64::NAN);
        if let (PeriodId::Year(y), true) = (p.period, c.is_finite()) {
            series
                .entry(p.legislator.as_str())
                .or_default()
                .push((y as f64, c));
        }
    }
    for line in series.values_mut() {
        line.sort_by(|a, b| a.0.total_cmp(&b.0));
    }
    {
        let root = SVGBackend::new(path, (1000, 700)).into_drawing_area();
        draw_dynamic(&root, &series).map_err(plotting(path))?;
        root.present().map_err(plotting(path))?;
    }
    info!("Wrote {:?}", path);
    Ok(())
}

fn draw_dynamic(
    root: &DrawingArea<SVGBackend, Shift>,
    series: &BTreeMap<&str, Vec<(f64, f64)>>,
) -> DrawResult {
    root.fill(&WHITE)?;
    let (x_lo, x_hi) = bounds(series.values().flatten().map(|(x, _)| *x));
    let (y_lo, y_hi) = bounds(series.values().flatten().map(|(_, y)| *y));
    let mut chart = ChartBuilder::on(root)
        .caption("Dynamic estimation, first dimension", (FONT, 20))
        .margin(10)
        .set_label_area_size(LabelAreaPosition::Left, 50)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;
    chart
        .configure_mesh()
        .x_desc("Year")
        .x_label_formatter(&|x| format!("{:.0}", x))
        .draw()?;

    for (idx, (name, line)) in series.iter().enumerate() {
        let color = Palette99::pick(idx);
        chart.draw_series(LineSeries::new(line.iter().copied(), &color))?;
        if let Some((x, y)) = line.last() {
            chart.draw_series(std::iter::once(Text::new(
                name.to_string(),
                (*x, *y),
                (FONT, 11).into_font(),
            )))?;
        }
    }
    Ok(())
}
