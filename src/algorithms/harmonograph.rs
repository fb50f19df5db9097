//! Damped twin-pendulum ("harmonograph") trace.
//!
//! Each axis sums two decaying sinusoids. The configured frequencies get a
//! small seeded detuning so nearby seeds give distinct but reproducible
//! figures.

use geo_types::coord;

use super::{get, Generator, Params};
use crate::noise::SimplexField;
use crate::path::{Bounds, Path};
use crate::rng::Lcg;

pub struct Harmonograph;

impl Generator for Harmonograph {
    fn defaults(&self) -> &'static [(&'static str, f64)] {
        &[
            ("freqX1", 2.0),
            ("freqX2", 3.0),
            ("freqY1", 3.0),
            ("freqY2", 2.0),
            ("damping", 0.004),
            ("detune", 0.02),
            ("resolution", 3000.0),
            ("duration", 60.0),
        ]
    }

    fn generate(
        &self,
        params: &Params,
        rng: &mut Lcg,
        _noise: &SimplexField,
        bounds: &Bounds,
    ) -> Vec<Path> {
        let resolution = get(params, "resolution") as usize;
        let duration = get(params, "duration");
        if resolution == 0 || duration <= 0.0 {
            return vec![];
        }
        let damping = get(params, "damping").max(0.0);
        let detune = get(params, "detune");
        let fx1 = get(params, "freqX1") + rng.next_range(-detune, detune);
        let fx2 = get(params, "freqX2") + rng.next_range(-detune, detune);
        let fy1 = get(params, "freqY1") + rng.next_range(-detune, detune);
        let fy2 = get(params, "freqY2") + rng.next_range(-detune, detune);
        let px1 = rng.next_range(0.0, std::f64::consts::TAU);
        let px2 = rng.next_range(0.0, std::f64::consts::TAU);
        let py1 = rng.next_range(0.0, std::f64::consts::TAU);
        let py2 = rng.next_range(0.0, std::f64::consts::TAU);

        let center = bounds.center();
        // Two pendulums per axis, so each gets half the drawable amplitude.
        let ax = bounds.drawable_width / 4.0;
        let ay = bounds.drawable_height / 4.0;

        let points = (0..=resolution)
            .map(|i| {
                let t = duration * i as f64 / resolution as f64;
                let decay = (-damping * t).exp();
                coord! {
                    x: center.x + decay * ax * ((fx1 * t + px1).sin() + (fx2 * t + px2).sin()),
                    y: center.y + decay * ay * ((fy1 * t + py1).sin() + (fy2 * t + py2).sin()),
                }
            })
            .collect();
        vec![Path::polyline(points)]
    }

    fn formula(&self, params: &Params) -> Option<String> {
        Some(format!(
            "x = e^(-{d}t)·(sin({x1}t+φ₁)+sin({x2}t+φ₂)), y = e^(-{d}t)·(sin({y1}t+φ₃)+sin({y2}t+φ₄))",
            d = get(params, "damping"),
            x1 = get(params, "freqX1"),
            x2 = get(params, "freqX2"),
            y1 = get(params, "freqY1"),
            y2 = get(params, "freqY2"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::{resolve_params, AlgorithmKind};

    #[test]
    fn test_seed_changes_figure() {
        let bounds = Bounds::new(200.0, 200.0, 10.0);
        let params = resolve_params(AlgorithmKind::Harmonograph, &Params::new());
        let noise = SimplexField::new(1);
        let a = Harmonograph.generate(&params, &mut Lcg::new(10), &noise, &bounds);
        let b = Harmonograph.generate(&params, &mut Lcg::new(11), &noise, &bounds);
        assert_ne!(a, b);
    }

    #[test]
    fn test_zero_duration_degrades() {
        let mut params = resolve_params(AlgorithmKind::Harmonograph, &Params::new());
        params.insert("duration".to_string(), 0.0);
        let noise = SimplexField::new(1);
        let paths = Harmonograph.generate(&params, &mut Lcg::new(1), &noise, &Bounds::default());
        assert!(paths.is_empty());
    }
}
