//! Core path data model.
//!
//! A [`Path`] is either a polyline (a `geo_types` [`LineString`]) or an
//! analytic circle/ellipse descriptor. Circles stay analytic all the way
//! through transform and optimization: resampling them into points would
//! lose exactness and break the circle-specific length and dedupe math.

use geo_types::{coord, Coord, LineString};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Opaque per-path annotations. Must survive cloning, smoothing and
/// simplification unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PathMeta {
    /// Grouping label, used by grouped travel sorting.
    pub group: Option<String>,
    /// Marks a path as an outline rather than a fill.
    pub outline: bool,
}

/// A single plottable path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Path {
    Polyline {
        points: LineString<f64>,
        meta: Option<PathMeta>,
    },
    Circle {
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
        /// Radians.
        rotation: f64,
        meta: Option<PathMeta>,
    },
}

impl Path {
    /// A polyline with no metadata.
    pub fn polyline(points: Vec<Coord<f64>>) -> Path {
        Path::Polyline {
            points: LineString::new(points),
            meta: None,
        }
    }

    /// An unrotated circle with no metadata.
    pub fn circle(cx: f64, cy: f64, r: f64) -> Path {
        Path::Circle {
            cx,
            cy,
            rx: r.abs(),
            ry: r.abs(),
            rotation: 0.0,
            meta: None,
        }
    }

    pub fn meta(&self) -> Option<&PathMeta> {
        match self {
            Path::Polyline { meta, .. } | Path::Circle { meta, .. } => meta.as_ref(),
        }
    }

    pub fn with_meta(mut self, new_meta: PathMeta) -> Path {
        match &mut self {
            Path::Polyline { meta, .. } | Path::Circle { meta, .. } => *meta = Some(new_meta),
        }
        self
    }

    /// Pen-down travel length. Ellipses use the mean radius; this keeps the
    /// formula exact for true circles and close enough for filtering.
    pub fn length(&self) -> f64 {
        match self {
            Path::Polyline { points, .. } => points
                .0
                .windows(2)
                .map(|w| {
                    let dx = w[1].x - w[0].x;
                    let dy = w[1].y - w[0].y;
                    (dx * dx + dy * dy).sqrt()
                })
                .sum(),
            Path::Circle { rx, ry, .. } => 2.0 * PI * ((rx + ry) / 2.0),
        }
    }

    /// Where the pen first touches down. Circles start at their rotation
    /// angle on the perimeter.
    pub fn start(&self) -> Option<Coord<f64>> {
        match self {
            Path::Polyline { points, .. } => points.0.first().copied(),
            Path::Circle {
                cx,
                cy,
                rx,
                ry,
                rotation,
                ..
            } => Some(coord! {
                x: cx + rx * rotation.cos(),
                y: cy + ry * rotation.sin(),
            }),
        }
    }

    /// Where the pen lifts. A circle ends where it starts.
    pub fn end(&self) -> Option<Coord<f64>> {
        match self {
            Path::Polyline { points, .. } => points.0.last().copied(),
            Path::Circle { .. } => self.start(),
        }
    }

    /// Reverse the direction of travel. No-op for circles.
    pub fn reverse(&mut self) {
        if let Path::Polyline { points, .. } = self {
            points.0.reverse();
        }
    }

    /// Number of explicit points (0 for analytic circles).
    pub fn point_count(&self) -> usize {
        match self {
            Path::Polyline { points, .. } => points.0.len(),
            Path::Circle { .. } => 0,
        }
    }

    /// True for empty polylines; circles always render.
    pub fn is_empty(&self) -> bool {
        match self {
            Path::Polyline { points, .. } => points.0.is_empty(),
            Path::Circle { .. } => false,
        }
    }
}

/// Paper dimensions plus the margin-inset drawable region. Passed
/// read-only into every generator call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
    pub drawable_width: f64,
    pub drawable_height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64, margin: f64) -> Bounds {
        Bounds {
            width,
            height,
            margin,
            drawable_width: (width - 2.0 * margin).max(0.0),
            drawable_height: (height - 2.0 * margin).max(0.0),
        }
    }

    /// Paper center, the transform origin for every layer.
    pub fn center(&self) -> Coord<f64> {
        coord! {x: self.width / 2.0, y: self.height / 2.0}
    }
}

impl Default for Bounds {
    fn default() -> Bounds {
        // A4 landscape in mm.
        Bounds::new(297.0, 210.0, 20.0)
    }
}

/// Aggregate line/point counts over a path list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PathStats {
    pub line_count: usize,
    pub point_count: usize,
}

/// Deep-copy a path list, metadata included.
pub fn clone_paths(paths: &[Path]) -> Vec<Path> {
    paths.to_vec()
}

/// Count lines and points over a path list. Circles count as one line
/// with zero explicit points.
pub fn count_path_points(paths: &[Path]) -> PathStats {
    PathStats {
        line_count: paths.len(),
        point_count: paths.iter().map(Path::point_count).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polyline_length() {
        let p = Path::polyline(vec![
            coord! {x: 0.0, y: 0.0},
            coord! {x: 3.0, y: 4.0},
            coord! {x: 3.0, y: 14.0},
        ]);
        assert!((p.length() - 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_circle_length() {
        let c = Path::circle(10.0, 10.0, 2.0);
        assert!((c.length() - 4.0 * PI).abs() < 1e-12);
    }

    #[test]
    fn test_clone_preserves_meta() {
        let meta = PathMeta {
            group: Some("hatch".to_string()),
            outline: true,
        };
        let paths = vec![
            Path::polyline(vec![coord! {x: 0.0, y: 0.0}, coord! {x: 1.0, y: 1.0}])
                .with_meta(meta.clone()),
            Path::circle(0.0, 0.0, 5.0).with_meta(meta.clone()),
        ];
        let copies = clone_paths(&paths);
        assert_eq!(copies, paths);
        assert_eq!(copies[0].meta(), Some(&meta));
        assert_eq!(copies[1].meta(), Some(&meta));
    }

    #[test]
    fn test_stats() {
        let paths = vec![
            Path::polyline(vec![coord! {x: 0.0, y: 0.0}, coord! {x: 1.0, y: 1.0}]),
            Path::circle(0.0, 0.0, 1.0),
        ];
        let stats = count_path_points(&paths);
        assert_eq!(stats.line_count, 2);
        assert_eq!(stats.point_count, 2);
    }

    #[test]
    fn test_degenerate_bounds() {
        let b = Bounds::new(10.0, 10.0, 20.0);
        assert_eq!(b.drawable_width, 0.0);
        assert_eq!(b.drawable_height, 0.0);
    }
}
