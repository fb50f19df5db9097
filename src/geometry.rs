//! Shared geometry utilities: corner smoothing and two interchangeable
//! polyline simplifiers.
//!
//! Both simplifiers keep the first and last point, never reduce a path
//! below two points, and are no-ops for `tolerance <= 0` or fewer than
//! three points. They are deliberately independent algorithms and are not
//! expected to agree on output for the same tolerance.

use geo_types::{coord, Coord, LineString};

use crate::path::Path;

/// Moving-average corner smoothing. Endpoints stay fixed; each interior
/// point is pulled toward the midpoint of its neighbors by `amount` in
/// `[0, 1]`. Metadata is carried over unchanged.
pub fn smooth_path(path: &Path, amount: f64) -> Path {
    let (points, meta) = match path {
        Path::Polyline { points, meta } => (points, meta),
        Path::Circle { .. } => return path.clone(),
    };
    if amount <= 0.0 || points.0.len() < 3 {
        return path.clone();
    }
    let amount = amount.min(1.0);
    let n = points.0.len();
    let mut out: Vec<Coord<f64>> = Vec::with_capacity(n);
    out.push(points.0[0]);
    for i in 1..n - 1 {
        let prev = points.0[i - 1];
        let here = points.0[i];
        let next = points.0[i + 1];
        let mid = coord! {x: (prev.x + next.x) / 2.0, y: (prev.y + next.y) / 2.0};
        out.push(coord! {
            x: here.x * (1.0 - amount) + mid.x * amount,
            y: here.y * (1.0 - amount) + mid.y * amount,
        });
    }
    out.push(points.0[n - 1]);
    Path::Polyline {
        points: LineString::new(out),
        meta: meta.clone(),
    }
}

/// Squared perpendicular distance from `pt` to the segment `a..b`.
/// Degenerate segments fall back to point distance.
fn perp_distance_sq(pt: Coord<f64>, a: Coord<f64>, b: Coord<f64>) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq <= f64::EPSILON {
        let px = pt.x - a.x;
        let py = pt.y - a.y;
        return px * px + py * py;
    }
    let cross = (pt.x - a.x) * dy - (pt.y - a.y) * dx;
    cross * cross / len_sq
}

/// Perpendicular-distance (Douglas-Peucker style) simplification.
///
/// Uses an explicit range stack rather than recursion so pathological
/// inputs can't blow the call stack.
pub fn simplify_rdp(path: &Path, tolerance: f64) -> Path {
    let (points, meta) = match path {
        Path::Polyline { points, meta } => (points, meta),
        Path::Circle { .. } => return path.clone(),
    };
    let n = points.0.len();
    if tolerance <= 0.0 || n < 3 {
        return path.clone();
    }
    let tol_sq = tolerance * tolerance;
    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;
    let mut stack: Vec<(usize, usize)> = vec![(0, n - 1)];
    while let Some((lo, hi)) = stack.pop() {
        if hi <= lo + 1 {
            continue;
        }
        let mut max_dist = 0.0;
        let mut max_idx = lo;
        for i in lo + 1..hi {
            let d = perp_distance_sq(points.0[i], points.0[lo], points.0[hi]);
            if d > max_dist {
                max_dist = d;
                max_idx = i;
            }
        }
        if max_dist > tol_sq {
            keep[max_idx] = true;
            stack.push((lo, max_idx));
            stack.push((max_idx, hi));
        }
    }
    let kept: Vec<Coord<f64>> = points
        .0
        .iter()
        .zip(keep.iter())
        .filter(|(_, k)| **k)
        .map(|(c, _)| *c)
        .collect();
    if kept.len() < 2 {
        return path.clone();
    }
    Path::Polyline {
        points: LineString::new(kept),
        meta: meta.clone(),
    }
}

/// Unsigned triangle area; callers only compare magnitudes.
fn triangle_area(a: Coord<f64>, b: Coord<f64>, c: Coord<f64>) -> f64 {
    ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)).abs() / 2.0
}

/// Visvalingam-Whyatt simplification: repeatedly drop the interior point
/// whose neighbor triangle has the globally smallest area, while that area
/// stays under `tolerance^2`. Neighbors of a dropped point get their areas
/// recomputed against the next surviving point on each side.
pub fn simplify_visvalingam(path: &Path, tolerance: f64) -> Path {
    let (points, meta) = match path {
        Path::Polyline { points, meta } => (points, meta),
        Path::Circle { .. } => return path.clone(),
    };
    let n = points.0.len();
    if tolerance <= 0.0 || n < 3 {
        return path.clone();
    }
    let tol_sq = tolerance * tolerance;

    let mut removed = vec![false; n];
    let mut areas = vec![f64::INFINITY; n];
    for i in 1..n - 1 {
        areas[i] = triangle_area(points.0[i - 1], points.0[i], points.0[i + 1]);
    }

    let live_prev = |removed: &[bool], mut i: usize| -> usize {
        loop {
            i -= 1;
            if !removed[i] {
                return i;
            }
        }
    };
    let live_next = |removed: &[bool], mut i: usize| -> usize {
        loop {
            i += 1;
            if !removed[i] {
                return i;
            }
        }
    };

    let mut live = n;
    while live > 2 {
        // Globally smallest live interior area.
        let mut min_area = f64::INFINITY;
        let mut min_idx = 0;
        for i in 1..n - 1 {
            if !removed[i] && areas[i] < min_area {
                min_area = areas[i];
                min_idx = i;
            }
        }
        if min_area >= tol_sq {
            break;
        }
        removed[min_idx] = true;
        live -= 1;
        // The two newly-adjacent neighbors span a different triangle now.
        let prev = live_prev(&removed, min_idx);
        let next = live_next(&removed, min_idx);
        if prev > 0 {
            areas[prev] =
                triangle_area(points.0[live_prev(&removed, prev)], points.0[prev], points.0[next]);
        }
        if next < n - 1 {
            areas[next] =
                triangle_area(points.0[prev], points.0[next], points.0[live_next(&removed, next)]);
        }
    }

    let kept: Vec<Coord<f64>> = points
        .0
        .iter()
        .zip(removed.iter())
        .filter(|(_, r)| !**r)
        .map(|(c, _)| *c)
        .collect();
    if kept.len() < 2 {
        return path.clone();
    }
    Path::Polyline {
        points: LineString::new(kept),
        meta: meta.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PathMeta;

    fn zigzag(n: usize) -> Path {
        Path::polyline(
            (0..n)
                .map(|i| coord! {x: i as f64, y: if i % 2 == 0 { 0.0 } else { 0.1 }})
                .collect(),
        )
    }

    #[test]
    fn test_smooth_endpoints_fixed() {
        let path = zigzag(9);
        let smoothed = smooth_path(&path, 0.5);
        assert_eq!(smoothed.start(), path.start());
        assert_eq!(smoothed.end(), path.end());
        assert_eq!(smoothed.point_count(), path.point_count());
    }

    #[test]
    fn test_smooth_noop_cases() {
        let path = zigzag(9);
        assert_eq!(smooth_path(&path, 0.0), path);
        assert_eq!(smooth_path(&path, -1.0), path);
        let short = Path::polyline(vec![coord! {x: 0.0, y: 0.0}, coord! {x: 1.0, y: 0.0}]);
        assert_eq!(smooth_path(&short, 0.9), short);
    }

    #[test]
    fn test_smooth_interior_math() {
        let path = Path::polyline(vec![
            coord! {x: 0.0, y: 0.0},
            coord! {x: 1.0, y: 2.0},
            coord! {x: 2.0, y: 0.0},
        ]);
        let smoothed = smooth_path(&path, 1.0);
        if let Path::Polyline { points, .. } = smoothed {
            // Full smoothing moves the apex onto the neighbor midpoint.
            assert_eq!(points.0[1], coord! {x: 1.0, y: 0.0});
        } else {
            unreachable!();
        }
    }

    #[test]
    fn test_rdp_collinear_collapse() {
        let path = Path::polyline((0..10).map(|i| coord! {x: i as f64, y: 0.0}).collect());
        let out = simplify_rdp(&path, 0.01);
        assert_eq!(out.point_count(), 2);
        assert_eq!(out.start(), path.start());
        assert_eq!(out.end(), path.end());
    }

    #[test]
    fn test_rdp_keeps_significant_corner() {
        let path = Path::polyline(vec![
            coord! {x: 0.0, y: 0.0},
            coord! {x: 5.0, y: 5.0},
            coord! {x: 10.0, y: 0.0},
        ]);
        let out = simplify_rdp(&path, 1.0);
        assert_eq!(out.point_count(), 3);
    }

    #[test]
    fn test_both_simplifiers_floor_and_noop() {
        let path = zigzag(14);
        for f in [simplify_rdp, simplify_visvalingam] {
            assert_eq!(f(&path, 0.0), path);
            assert_eq!(f(&path, -2.0), path);
            let crushed = f(&path, 1e9);
            assert!(crushed.point_count() >= 2);
        }
    }

    #[test]
    fn test_visvalingam_small_area_removal() {
        let path = Path::polyline(vec![
            coord! {x: 0.0, y: 0.0},
            coord! {x: 5.0, y: 0.001}, // negligible bump
            coord! {x: 10.0, y: 0.0},
            coord! {x: 10.0, y: 10.0},
        ]);
        let out = simplify_visvalingam(&path, 0.5);
        assert_eq!(out.point_count(), 3);
    }

    #[test]
    fn test_meta_survives_simplify_and_smooth() {
        let meta = PathMeta {
            group: Some("g".to_string()),
            outline: false,
        };
        let path = zigzag(20).with_meta(meta.clone());
        assert_eq!(smooth_path(&path, 0.4).meta(), Some(&meta));
        assert_eq!(simplify_rdp(&path, 0.5).meta(), Some(&meta));
        assert_eq!(simplify_visvalingam(&path, 0.5).meta(), Some(&meta));
    }

    #[test]
    fn test_circle_passthrough() {
        let c = Path::circle(1.0, 1.0, 4.0);
        assert_eq!(smooth_path(&c, 0.8), c);
        assert_eq!(simplify_rdp(&c, 1.0), c);
        assert_eq!(simplify_visvalingam(&c, 1.0), c);
    }
}
