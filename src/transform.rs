//! Per-layer geometric transform.
//!
//! Raw paths come out of a generator in local paper coordinates; this
//! module applies the layer's similarity transform (scale, rotate,
//! translate about the paper center) followed by optional corner smoothing
//! and the layer's own simplify tolerance. That ordering is load-bearing:
//! smoothing before transforming (or generating in transformed space)
//! produces different coordinates and breaks exact-regeneration.

use geo_types::{coord, Coord};
use nalgebra::{Affine2, Matrix3, Point2};

use crate::algorithms::Params;
use crate::geometry::{simplify_rdp, smooth_path};
use crate::path::{Bounds, Path};

/// A layer's resolved transform, in application order: translate to be
/// origin-relative, scale X/Y independently, rotate, translate back to
/// origin plus the layer offset.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    pub origin: Coord<f64>,
    pub scale_x: f64,
    pub scale_y: f64,
    /// Degrees.
    pub rotation: f64,
    pub pos_x: f64,
    pub pos_y: f64,
    /// Corner smoothing amount in `[0, 1]`, applied after the transform.
    pub smoothing: f64,
    /// Per-layer RDP tolerance, applied last. Zero disables.
    pub simplify: f64,
}

fn param(params: &Params, key: &str, fallback: f64) -> f64 {
    params.get(key).copied().unwrap_or(fallback)
}

impl Transform {
    /// Pull the transform fields out of a resolved parameter map, with the
    /// paper center as origin.
    pub fn from_params(params: &Params, bounds: &Bounds) -> Transform {
        Transform {
            origin: bounds.center(),
            scale_x: param(params, "scaleX", 1.0),
            scale_y: param(params, "scaleY", 1.0),
            rotation: param(params, "rotation", 0.0),
            pos_x: param(params, "posX", 0.0),
            pos_y: param(params, "posY", 0.0),
            smoothing: param(params, "smoothing", 0.0),
            simplify: param(params, "simplify", 0.0),
        }
    }

    fn radians(&self) -> f64 {
        self.rotation.to_radians()
    }

    /// The whole similarity transform as one affine matrix.
    fn affine(&self) -> Affine2<f64> {
        let to_origin = translate(-self.origin.x, -self.origin.y);
        let scale = Affine2::from_matrix_unchecked(Matrix3::new(
            self.scale_x,
            0.0,
            0.0,
            0.0,
            self.scale_y,
            0.0,
            0.0,
            0.0,
            1.0,
        ));
        let (sin, cos) = self.radians().sin_cos();
        let rotate = Affine2::from_matrix_unchecked(Matrix3::new(
            cos, -sin, 0.0, sin, cos, 0.0, 0.0, 0.0, 1.0,
        ));
        let back = translate(self.origin.x + self.pos_x, self.origin.y + self.pos_y);
        back * rotate * scale * to_origin
    }

    /// Transform a raw path list into paper space and apply smoothing and
    /// the per-layer simplify pass.
    pub fn apply(&self, paths: &[Path]) -> Vec<Path> {
        let affine = self.affine();
        paths
            .iter()
            .map(|path| {
                let moved = self.apply_one(path, &affine);
                let smoothed = smooth_path(&moved, self.smoothing);
                simplify_rdp(&smoothed, self.simplify)
            })
            .collect()
    }

    fn apply_one(&self, path: &Path, affine: &Affine2<f64>) -> Path {
        match path {
            Path::Polyline { points, meta } => Path::Polyline {
                points: points
                    .0
                    .iter()
                    .map(|c| xform_coord(*c, affine))
                    .collect::<Vec<Coord<f64>>>()
                    .into(),
                meta: meta.clone(),
            },
            Path::Circle {
                cx,
                cy,
                rx,
                ry,
                rotation,
                meta,
            } => {
                let center = xform_coord(coord! {x: *cx, y: *cy}, affine);
                Path::Circle {
                    cx: center.x,
                    cy: center.y,
                    // Asymmetric scale turns circles into ellipses; radii
                    // are magnitudes.
                    rx: (rx * self.scale_x).abs(),
                    ry: (ry * self.scale_y).abs(),
                    rotation: rotation + self.radians(),
                    meta: meta.clone(),
                }
            }
        }
    }
}

fn translate(tx: f64, ty: f64) -> Affine2<f64> {
    Affine2::from_matrix_unchecked(Matrix3::new(1.0, 0.0, tx, 0.0, 1.0, ty, 0.0, 0.0, 1.0))
}

fn xform_coord(c: Coord<f64>, affine: &Affine2<f64>) -> Coord<f64> {
    let out = affine * Point2::new(c.x, c.y);
    coord! {x: out.x, y: out.y}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(bounds: &Bounds) -> Transform {
        Transform::from_params(&Params::new(), bounds)
    }

    #[test]
    fn test_identity_transform() {
        let bounds = Bounds::new(100.0, 100.0, 10.0);
        let tx = identity(&bounds);
        let path = Path::polyline(vec![coord! {x: 10.0, y: 20.0}, coord! {x: 30.0, y: 40.0}]);
        let out = tx.apply(&[path.clone()]);
        if let (Path::Polyline { points: a, .. }, Path::Polyline { points: b, .. }) =
            (&out[0], &path)
        {
            for (pa, pb) in a.0.iter().zip(b.0.iter()) {
                assert!((pa.x - pb.x).abs() < 1e-9);
                assert!((pa.y - pb.y).abs() < 1e-9);
            }
        } else {
            unreachable!();
        }
    }

    #[test]
    fn test_rotation_about_center() {
        let bounds = Bounds::new(100.0, 100.0, 10.0);
        let mut params = Params::new();
        params.insert("rotation".to_string(), 90.0);
        let tx = Transform::from_params(&params, &bounds);
        // A point right of center rotates to below/above center.
        let out = tx.apply(&[Path::polyline(vec![
            coord! {x: 60.0, y: 50.0},
            coord! {x: 70.0, y: 50.0},
        ])]);
        if let Path::Polyline { points, .. } = &out[0] {
            assert!((points.0[0].x - 50.0).abs() < 1e-9);
            assert!((points.0[0].y - 60.0).abs() < 1e-9);
        } else {
            unreachable!();
        }
    }

    #[test]
    fn test_offset() {
        let bounds = Bounds::new(100.0, 100.0, 10.0);
        let mut params = Params::new();
        params.insert("posX".to_string(), 5.0);
        params.insert("posY".to_string(), -3.0);
        let tx = Transform::from_params(&params, &bounds);
        let out = tx.apply(&[Path::polyline(vec![
            coord! {x: 0.0, y: 0.0},
            coord! {x: 1.0, y: 1.0},
        ])]);
        if let Path::Polyline { points, .. } = &out[0] {
            assert!((points.0[0].x - 5.0).abs() < 1e-9);
            assert!((points.0[0].y + 3.0).abs() < 1e-9);
        } else {
            unreachable!();
        }
    }

    #[test]
    fn test_circle_stays_analytic() {
        let bounds = Bounds::new(100.0, 100.0, 10.0);
        let mut params = Params::new();
        params.insert("scaleX".to_string(), 2.0);
        params.insert("scaleY".to_string(), -0.5);
        params.insert("rotation".to_string(), 45.0);
        let tx = Transform::from_params(&params, &bounds);
        let out = tx.apply(&[Path::circle(50.0, 50.0, 10.0)]);
        match &out[0] {
            Path::Circle {
                cx,
                cy,
                rx,
                ry,
                rotation,
                ..
            } => {
                // Center sits on the transform origin, so it doesn't move.
                assert!((cx - 50.0).abs() < 1e-9);
                assert!((cy - 50.0).abs() < 1e-9);
                assert!((rx - 20.0).abs() < 1e-12);
                // Negative scale yields a magnitude radius.
                assert!((ry - 5.0).abs() < 1e-12);
                assert!((rotation - std::f64::consts::FRAC_PI_4).abs() < 1e-12);
            }
            Path::Polyline { .. } => panic!("circle lost its analytic form"),
        }
    }

    #[test]
    fn test_smoothing_runs_after_transform() {
        let bounds = Bounds::new(100.0, 100.0, 10.0);
        let mut params = Params::new();
        params.insert("smoothing".to_string(), 1.0);
        params.insert("scaleX".to_string(), 2.0);
        params.insert("scaleY".to_string(), 2.0);
        let tx = Transform::from_params(&params, &bounds);
        let raw = Path::polyline(vec![
            coord! {x: 50.0, y: 50.0},
            coord! {x: 55.0, y: 60.0},
            coord! {x: 60.0, y: 50.0},
        ]);
        let out = tx.apply(&[raw]);
        if let Path::Polyline { points, .. } = &out[0] {
            // Scaled apex (60, 70) fully smoothed onto midpoint of the
            // scaled neighbors (50,50)-(70,50).
            assert!((points.0[1].x - 60.0).abs() < 1e-9);
            assert!((points.0[1].y - 50.0).abs() < 1e-9);
        } else {
            unreachable!();
        }
    }
}
