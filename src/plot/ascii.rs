//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - chosen ideal function: `-` line
//! - training points: `o`
//! - test points assigned to the ideal function: `x`
//!
//! The overview plot shows every ideal function as `.`, training points as `o`
//! and all test points as `x`.

use crate::domain::{Point, Series};

/// Render one selection: training series, its chosen ideal function and the
/// test points mapped to it.
pub fn render_selection_plot(
    training: &Series,
    candidate: &Series,
    mapped: &[Point],
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let all = training
        .points
        .iter()
        .chain(candidate.points.iter())
        .chain(mapped.iter());
    let Some((x_min, x_max, y_min, y_max)) = bounds(all) else {
        return format!("Plot: {} vs {} (no data)\n", training.id, candidate.id);
    };
    let (x_min, x_max) = widen(x_min, x_max);
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Draw curve first (so points can overlay).
    draw_curve(&mut grid, &candidate.points, x_min, x_max, y_min, y_max);

    let frame = (x_min, x_max, y_min, y_max);
    mark(&mut grid, training.points.iter(), 'o', frame);
    mark(&mut grid, mapped.iter(), 'x', frame);

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {} (o) vs {} (-), {} mapped (x) | x=[{x_min:.3}, {x_max:.3}] | y=[{y_min:.2}, {y_max:.2}]\n",
        training.id,
        candidate.id,
        mapped.len()
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

/// Render all inputs of a dataset in one frame, before any selection.
pub fn render_overview_plot(
    training: &[Series],
    pool: &[Series],
    test: &[Point],
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let all = training
        .iter()
        .chain(pool.iter())
        .flat_map(|s| s.points.iter())
        .chain(test.iter());
    let Some((x_min, x_max, y_min, y_max)) = bounds(all) else {
        return "Overview (no data)\n".to_string();
    };
    let (x_min, x_max) = widen(x_min, x_max);
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    let frame = (x_min, x_max, y_min, y_max);
    mark(&mut grid, pool.iter().flat_map(|s| s.points.iter()), '.', frame);
    mark(&mut grid, training.iter().flat_map(|s| s.points.iter()), 'o', frame);
    mark(&mut grid, test.iter(), 'x', frame);

    let mut out = String::new();
    out.push_str(&format!(
        "Overview: {} ideal (.), {} training (o), {} test (x) | x=[{x_min:.3}, {x_max:.3}] | y=[{y_min:.2}, {y_max:.2}]\n",
        pool.len(),
        training.len(),
        test.len()
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

fn mark<'a>(
    grid: &mut [Vec<char>],
    points: impl Iterator<Item = &'a Point>,
    ch: char,
    (x_min, x_max, y_min, y_max): (f64, f64, f64, f64),
) {
    let height = grid.len();
    let width = grid[0].len();
    for p in points {
        let x = map_x(p.x, x_min, x_max, width);
        let y = map_y(p.y, y_min, y_max, height);
        grid[y][x] = ch;
    }
}

fn bounds<'a>(points: impl Iterator<Item = &'a Point>) -> Option<(f64, f64, f64, f64)> {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;

    for p in points {
        x_min = x_min.min(p.x);
        x_max = x_max.max(p.x);
        y_min = y_min.min(p.y);
        y_max = y_max.max(p.y);
    }

    if x_min.is_finite() && x_max.is_finite() && y_min.is_finite() && y_max.is_finite() {
        Some((x_min, x_max, y_min, y_max))
    } else {
        None
    }
}

fn widen(min: f64, max: f64) -> (f64, f64) {
    if max > min { (min, max) } else { (min - 0.5, max + 0.5) }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    if span == 0.0 {
        return (min - 0.5, max + 0.5);
    }
    let pad = span * frac;
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[Point], x_min: f64, x_max: f64, y_min: f64, y_max: f64) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for p in curve {
        let x = map_x(p.x, x_min, x_max, width);
        let y = map_y(p.y, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, x, y, '-');
        } else {
            grid[y][x] = '-';
        }
        prev = Some((x, y));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_golden_snapshot_small() {
        let training = Series::from_pairs("y1", &[(0.0, 0.0), (9.0, 10.0)]);
        let candidate = Series::from_pairs("y7", &[(0.0, 0.0), (9.0, 0.0)]);

        let txt = render_selection_plot(&training, &candidate, &[Point::new(9.0, 0.0)], 10, 5);
        let expected = concat!(
            "Plot: y1 (o) vs y7 (-), 1 mapped (x) | x=[0.000, 9.000] | y=[-0.50, 10.50]\n",
            "         o\n",
            "          \n",
            "          \n",
            "          \n",
            "o--------x\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn overview_layers_test_over_training_over_ideal() {
        let training = vec![Series::from_pairs("y1", &[(0.0, 0.0), (9.0, 10.0)])];
        let pool = vec![Series::from_pairs("y1", &[(0.0, 0.0), (9.0, 0.0)])];
        let test = [Point::new(9.0, 10.0)];

        let txt = render_overview_plot(&training, &pool, &test, 10, 5);
        let expected = concat!(
            "Overview: 1 ideal (.), 1 training (o), 1 test (x) | x=[0.000, 9.000] | y=[-0.50, 10.50]\n",
            "         x\n",
            "          \n",
            "          \n",
            "          \n",
            "o        .\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn empty_series_do_not_panic() {
        let empty = Series::new("y1", Vec::new());
        let txt = render_selection_plot(&empty, &empty, &[], 20, 6);
        assert!(txt.contains("no data"));
    }
}
