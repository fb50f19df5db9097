//! Concentric analytic circles with seeded radius jitter.
//!
//! The one generator that emits [`Path::Circle`] directly, which keeps the
//! circle branch of the transform, length and dedupe code honest.

use super::{get, Generator, Params};
use crate::noise::SimplexField;
use crate::path::{Bounds, Path};
use crate::rng::Lcg;

pub struct Rings;

impl Generator for Rings {
    fn defaults(&self) -> &'static [(&'static str, f64)] {
        &[("count", 24.0), ("jitter", 0.25)]
    }

    fn generate(
        &self,
        params: &Params,
        rng: &mut Lcg,
        _noise: &SimplexField,
        bounds: &Bounds,
    ) -> Vec<Path> {
        let count = get(params, "count") as usize;
        let jitter = get(params, "jitter");
        let max_r = bounds.drawable_width.min(bounds.drawable_height) / 2.0;
        if count == 0 || max_r <= 0.0 {
            return vec![];
        }
        let center = bounds.center();
        let gap = max_r / count as f64;

        (1..=count)
            .filter_map(|i| {
                let r = i as f64 * gap * (1.0 + jitter * (rng.next_float() - 0.5));
                if r > 1e-12 {
                    Some(Path::circle(center.x, center.y, r))
                } else {
                    None
                }
            })
            .collect()
    }
}
