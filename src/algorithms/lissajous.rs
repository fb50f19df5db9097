//! Lissajous curve generator. The registry's default algorithm.

use geo_types::coord;

use super::{get, Generator, Params};
use crate::noise::SimplexField;
use crate::path::{Bounds, Path};
use crate::rng::Lcg;

use std::f64::consts::PI;

pub struct Lissajous;

impl Generator for Lissajous {
    fn defaults(&self) -> &'static [(&'static str, f64)] {
        &[
            ("resolution", 420.0),
            ("freqX", 3.0),
            ("freqY", 2.0),
            // Phase offset as a fraction of pi.
            ("phase", 0.5),
        ]
    }

    fn generate(
        &self,
        params: &Params,
        _rng: &mut Lcg,
        _noise: &SimplexField,
        bounds: &Bounds,
    ) -> Vec<Path> {
        let resolution = get(params, "resolution") as usize;
        if resolution == 0 {
            return vec![];
        }
        let freq_x = get(params, "freqX");
        let freq_y = get(params, "freqY");
        let phase = get(params, "phase") * PI;
        let center = bounds.center();
        let ax = bounds.drawable_width / 2.0;
        let ay = bounds.drawable_height / 2.0;

        let points = (0..=resolution)
            .map(|i| {
                let t = 2.0 * PI * i as f64 / resolution as f64;
                coord! {
                    x: center.x + ax * (freq_x * t + phase).sin(),
                    y: center.y + ay * (freq_y * t).sin(),
                }
            })
            .collect();
        vec![Path::polyline(points)]
    }

    fn formula(&self, params: &Params) -> Option<String> {
        Some(format!(
            "x = A·sin({}·t + {}π), y = B·sin({}·t)",
            get(params, "freqX"),
            get(params, "phase"),
            get(params, "freqY"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::{resolve_params, AlgorithmKind};

    #[test]
    fn test_curve_stays_in_drawable_region() {
        let bounds = Bounds::new(320.0, 220.0, 20.0);
        let params = resolve_params(AlgorithmKind::Lissajous, &Params::new());
        let mut rng = Lcg::new(1212);
        let noise = SimplexField::new(1212);
        let paths = Lissajous.generate(&params, &mut rng, &noise, &bounds);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].point_count(), 421);
        if let Path::Polyline { points, .. } = &paths[0] {
            for c in &points.0 {
                assert!(c.x >= bounds.margin - 1e-9 && c.x <= bounds.width - bounds.margin + 1e-9);
                assert!(c.y >= bounds.margin - 1e-9 && c.y <= bounds.height - bounds.margin + 1e-9);
            }
        }
    }

    #[test]
    fn test_zero_resolution_is_empty() {
        let mut params = resolve_params(AlgorithmKind::Lissajous, &Params::new());
        params.insert("resolution".to_string(), 0.0);
        let mut rng = Lcg::new(1);
        let noise = SimplexField::new(1);
        let paths = Lissajous.generate(&params, &mut rng, &noise, &Bounds::default());
        assert!(paths.is_empty());
    }

    #[test]
    fn test_formula_present() {
        let params = resolve_params(AlgorithmKind::Lissajous, &Params::new());
        assert!(Lissajous.formula(&params).unwrap().contains("sin"));
    }
}
