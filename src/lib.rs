//! Generative line-art core for pen plotters.
//!
//! This library contains the deterministic heart of a layer-based plotter
//! art tool: seeded random and noise sources, a closed registry of curve
//! generators, per-layer placement transforms, and a multi-stage path
//! optimizer feeding a per-pen SVG serializer. Everything downstream of a
//! seed is reproducible: the same layer parameters always regenerate the
//! same paths, byte for byte once serialized.
//!
//! Geometry rides on [`geo_types`](https://docs.rs/geo-types) line strings
//! so the usual geo ecosystem tools apply directly to generated paths.

/// Seeded linear congruential random source. Every generator draw goes
/// through this, never through an ambient RNG.
pub mod rng;

/// Seeded 2D simplex noise field with an in-place reseed.
pub mod noise;

/// Path representation (polylines and analytic circles), metadata, and
/// drawing bounds.
pub mod path;

/// Path post-processing: smoothing and the two simplification modes.
pub mod geometry;

/// The closed registry of curve generators and their parameter handling.
pub mod algorithms;

/// Per-layer similarity transform (scale, rotate, place) plus the
/// smoothing/simplify tail of the layer pipeline.
pub mod transform;

/// Layers: one generator instance with its parameters, paths, and
/// presentation state.
pub mod layer;

/// The engine owning the layer stack, regeneration, snapshots, and
/// undo/redo history.
pub mod engine;

/// Multi-stage plot optimization: simplify, sort, filter, and the per-pen
/// duplicate canonicalization contract.
pub mod optimizer;

/// Pen definitions used for export grouping.
pub mod pen;

/// SVG serialization of the engine's visible layers.
pub mod svg_export;

pub mod errors;

/// Make your life easy! Just import prelude::* and ignore all the warnings!
/// One stop shopping at the expense of a slightly more complex dependency graph.
pub mod prelude {
    pub use crate::algorithms::{AlgorithmKind, Generator, Params};
    pub use crate::engine::{EngineSettings, PlotEngine};
    pub use crate::errors::{SnapshotError, SvgExportError};
    pub use crate::layer::Layer;
    pub use crate::noise::SimplexField;
    pub use crate::optimizer::{PipelineConfig, SortDirection, SortMethod, StepKind};
    pub use crate::path::{Bounds, Path, PathMeta};
    pub use crate::pen::Pen;
    pub use crate::rng::Lcg;
    pub use crate::svg_export::render_svg;
    pub use crate::transform::Transform;
}
