//! Noise-field streamlines: seeded start points advected through the
//! simplex field, one polyline per streamline.

use geo_types::{coord, Coord};

use super::{get, Generator, Params};
use crate::noise::SimplexField;
use crate::path::{Bounds, Path};
use crate::rng::Lcg;

use std::f64::consts::TAU;

pub struct Flowfield;

impl Generator for Flowfield {
    fn defaults(&self) -> &'static [(&'static str, f64)] {
        &[
            ("lines", 120.0),
            ("steps", 80.0),
            ("stepLength", 2.0),
            ("noiseScale", 0.012),
            // How many full turns the field angle spans.
            ("curl", 2.0),
        ]
    }

    fn generate(
        &self,
        params: &Params,
        rng: &mut Lcg,
        noise: &SimplexField,
        bounds: &Bounds,
    ) -> Vec<Path> {
        let lines = get(params, "lines") as usize;
        let steps = get(params, "steps") as usize;
        let step_length = get(params, "stepLength");
        let noise_scale = get(params, "noiseScale");
        let curl = get(params, "curl");
        if lines == 0 || steps == 0 || step_length <= 0.0 {
            return vec![];
        }

        let x0 = bounds.margin;
        let y0 = bounds.margin;
        let x1 = bounds.width - bounds.margin;
        let y1 = bounds.height - bounds.margin;

        let mut paths = Vec::with_capacity(lines);
        for _ in 0..lines {
            let mut x = rng.next_range(x0, x1);
            let mut y = rng.next_range(y0, y1);
            let mut points: Vec<Coord<f64>> = vec![coord! {x: x, y: y}];
            for _ in 0..steps {
                let angle = curl * TAU * noise.noise2d(x * noise_scale, y * noise_scale);
                x += step_length * angle.cos();
                y += step_length * angle.sin();
                if x < x0 || x > x1 || y < y0 || y > y1 {
                    break;
                }
                points.push(coord! {x: x, y: y});
            }
            if points.len() >= 2 {
                paths.push(Path::polyline(points));
            }
        }
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::{resolve_params, AlgorithmKind};

    #[test]
    fn test_streamlines_stay_in_bounds() {
        let bounds = Bounds::new(320.0, 220.0, 20.0);
        let params = resolve_params(AlgorithmKind::Flowfield, &Params::new());
        let mut rng = Lcg::new(1212);
        let noise = SimplexField::new(1212);
        let paths = Flowfield.generate(&params, &mut rng, &noise, &bounds);
        assert!(!paths.is_empty());
        for path in &paths {
            assert!(path.point_count() >= 2);
            if let Path::Polyline { points, .. } = path {
                for c in &points.0 {
                    assert!(c.x >= bounds.margin && c.x <= bounds.width - bounds.margin);
                    assert!(c.y >= bounds.margin && c.y <= bounds.height - bounds.margin);
                }
            }
        }
    }

    #[test]
    fn test_degenerate_step_length() {
        let mut params = resolve_params(AlgorithmKind::Flowfield, &Params::new());
        params.insert("stepLength".to_string(), 0.0);
        let mut rng = Lcg::new(1);
        let noise = SimplexField::new(1);
        assert!(Flowfield
            .generate(&params, &mut rng, &noise, &Bounds::default())
            .is_empty());
    }
}
