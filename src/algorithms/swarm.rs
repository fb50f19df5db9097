//! Agent swarm: seeded walkers with pairwise repulsion and noise steering,
//! each leaving a polyline trail.
//!
//! Pairwise forces make a step quadratic in agent count. That cost is
//! accepted; configured counts are a caller concern and nothing in here
//! truncates the run.

use geo_types::{coord, Coord};

use super::{get, Generator, Params};
use crate::noise::SimplexField;
use crate::path::{Bounds, Path};
use crate::rng::Lcg;

use std::f64::consts::TAU;

pub struct Swarm;

struct Agent {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    trail: Vec<Coord<f64>>,
}

impl Generator for Swarm {
    fn defaults(&self) -> &'static [(&'static str, f64)] {
        &[
            ("agents", 40.0),
            ("steps", 120.0),
            ("speed", 1.6),
            ("repulsion", 30.0),
            ("noiseScale", 0.01),
            ("steer", 0.5),
        ]
    }

    fn generate(
        &self,
        params: &Params,
        rng: &mut Lcg,
        noise: &SimplexField,
        bounds: &Bounds,
    ) -> Vec<Path> {
        let agent_count = get(params, "agents") as usize;
        let steps = get(params, "steps") as usize;
        let speed = get(params, "speed");
        let repulsion = get(params, "repulsion");
        let noise_scale = get(params, "noiseScale");
        let steer = get(params, "steer");
        if agent_count == 0 || steps == 0 || speed <= 0.0 {
            return vec![];
        }

        let x0 = bounds.margin;
        let y0 = bounds.margin;
        let x1 = bounds.width - bounds.margin;
        let y1 = bounds.height - bounds.margin;

        let mut agents: Vec<Agent> = (0..agent_count)
            .map(|_| {
                let x = rng.next_range(x0, x1);
                let y = rng.next_range(y0, y1);
                let heading = rng.next_range(0.0, TAU);
                Agent {
                    x,
                    y,
                    vx: speed * heading.cos(),
                    vy: speed * heading.sin(),
                    trail: vec![coord! {x: x, y: y}],
                }
            })
            .collect();

        for _ in 0..steps {
            // Pairwise repulsion, O(n^2) by design.
            let positions: Vec<(f64, f64)> = agents.iter().map(|a| (a.x, a.y)).collect();
            for (i, agent) in agents.iter_mut().enumerate() {
                let mut fx = 0.0;
                let mut fy = 0.0;
                for (j, (ox, oy)) in positions.iter().enumerate() {
                    if i == j {
                        continue;
                    }
                    let dx = agent.x - ox;
                    let dy = agent.y - oy;
                    let dist_sq = dx * dx + dy * dy;
                    // Coincident agents exert no force; anything else
                    // would divide by zero.
                    if dist_sq > 1e-9 {
                        fx += repulsion * dx / (dist_sq * dist_sq.sqrt());
                        fy += repulsion * dy / (dist_sq * dist_sq.sqrt());
                    }
                }
                let wander =
                    steer * TAU * noise.noise2d(agent.x * noise_scale, agent.y * noise_scale);
                let (sin, cos) = wander.sin_cos();
                let (vx, vy) = (agent.vx, agent.vy);
                agent.vx = vx * cos - vy * sin + fx;
                agent.vy = vx * sin + vy * cos + fy;
                // Renormalize to constant travel speed.
                let mag = (agent.vx * agent.vx + agent.vy * agent.vy).sqrt();
                if mag > 1e-12 {
                    agent.vx = speed * agent.vx / mag;
                    agent.vy = speed * agent.vy / mag;
                }
                agent.x = (agent.x + agent.vx).clamp(x0, x1);
                agent.y = (agent.y + agent.vy).clamp(y0, y1);
                agent.trail.push(coord! {x: agent.x, y: agent.y});
            }
        }

        agents
            .into_iter()
            .map(|agent| Path::polyline(agent.trail))
            .collect()
    }
}
