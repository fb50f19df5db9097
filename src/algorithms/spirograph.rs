//! Hypotrochoid ("spirograph") generator.

use geo_types::coord;

use super::{get, Generator, Params};
use crate::noise::SimplexField;
use crate::path::{Bounds, Path};
use crate::rng::Lcg;

use std::f64::consts::PI;

pub struct Spirograph;

impl Generator for Spirograph {
    fn defaults(&self) -> &'static [(&'static str, f64)] {
        &[
            ("outerR", 80.0),
            ("innerR", 35.0),
            ("offset", 45.0),
            ("resolution", 140.0),
            ("revolutions", 12.0),
        ]
    }

    fn generate(
        &self,
        params: &Params,
        _rng: &mut Lcg,
        _noise: &SimplexField,
        bounds: &Bounds,
    ) -> Vec<Path> {
        let outer = get(params, "outerR");
        let inner = get(params, "innerR");
        let offset = get(params, "offset");
        let resolution = get(params, "resolution") as usize;
        let revolutions = get(params, "revolutions");
        // Safe-denominator guards: a zero inner wheel or an empty sweep
        // degrades to no output instead of NaN coordinates.
        if inner.abs() < 1e-12 || resolution == 0 || revolutions <= 0.0 {
            return vec![];
        }

        let center = bounds.center();
        // Fit the theoretical extent into the drawable region.
        let extent = (outer - inner).abs() + offset.abs();
        let fit = if extent > 1e-12 {
            (bounds.drawable_width.min(bounds.drawable_height) / 2.0) / extent
        } else {
            return vec![];
        };

        // Fractional revolutions still need at least one full step;
        // truncating here would divide by a zero step count below.
        let steps = ((resolution as f64) * revolutions).ceil() as usize;
        if steps == 0 {
            return vec![];
        }
        let ratio = (outer - inner) / inner;
        let points = (0..=steps)
            .map(|i| {
                let t = 2.0 * PI * revolutions * i as f64 / steps as f64;
                coord! {
                    x: center.x + fit * ((outer - inner) * t.cos() + offset * (ratio * t).cos()),
                    y: center.y + fit * ((outer - inner) * t.sin() - offset * (ratio * t).sin()),
                }
            })
            .collect();
        vec![Path::polyline(points)]
    }

    fn formula(&self, params: &Params) -> Option<String> {
        Some(format!(
            "hypotrochoid R={} r={} d={}",
            get(params, "outerR"),
            get(params, "innerR"),
            get(params, "offset"),
        ))
    }
}
