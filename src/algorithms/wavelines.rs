//! Stacked horizontal lines displaced vertically by the noise field
//! (ridge-line style).

use geo_types::coord;

use super::{get, Generator, Params};
use crate::noise::SimplexField;
use crate::path::{Bounds, Path, PathMeta};
use crate::rng::Lcg;

pub struct Wavelines;

impl Generator for Wavelines {
    fn defaults(&self) -> &'static [(&'static str, f64)] {
        &[
            ("lines", 48.0),
            ("resolution", 180.0),
            ("amplitude", 14.0),
            ("noiseScale", 0.015),
            // Per-line depth jitter so adjacent lines decorrelate.
            ("drift", 0.35),
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
        let resolution = get(params, "resolution") as usize;
        if lines == 0 || resolution == 0 {
            return vec![];
        }
        let amplitude = get(params, "amplitude");
        let noise_scale = get(params, "noiseScale");
        let drift = get(params, "drift");

        let row_gap = if lines > 1 {
            bounds.drawable_height / (lines - 1) as f64
        } else {
            0.0
        };

        let mut paths = Vec::with_capacity(lines);
        for row in 0..lines {
            let base_y = bounds.margin + row as f64 * row_gap;
            let depth = row as f64 * drift + rng.next_range(0.0, drift);
            let points = (0..=resolution)
                .map(|i| {
                    let x = bounds.margin + bounds.drawable_width * i as f64 / resolution as f64;
                    let dy = amplitude * noise.noise2d(x * noise_scale, depth);
                    coord! {x: x, y: base_y + dy}
                })
                .collect();
            paths.push(Path::polyline(points).with_meta(PathMeta {
                group: Some(format!("row-{}", row)),
                outline: false,
            }));
        }
        paths
    }
}
