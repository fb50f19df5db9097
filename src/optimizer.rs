//! Multi-stage path optimization.
//!
//! An ordered, configurable pipeline of named steps (simplify, sort,
//! filter) run over a layer's paths, caching the result in the layer's
//! `optimized_paths` without touching the raw paths. Also provides the
//! canonicalization contract render/export code uses for per-pen
//! duplicate-path removal.
//!
//! Travel sorting is greedy nearest-endpoint over an R-tree seeded with
//! one forward and one reversed entry per path, so a path whose tail is
//! closer than its head gets drawn backwards instead of skipped.

use std::collections::{HashMap, HashSet};

#[allow(deprecated)]
use geo::prelude::EuclideanDistance;
use geo_types::{coord, Coord, Point};
use rstar::{PointDistance, RTree, RTreeObject, AABB};
use serde::{Deserialize, Serialize};

use crate::geometry::{simplify_rdp, simplify_visvalingam};
use crate::layer::Layer;
use crate::path::{clone_paths, Path};

/// Paths shorter than this are "tiny" for `remove_tiny` purposes.
const TINY_LENGTH: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimplifyMode {
    PerpendicularDistance,
    Visvalingam,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortMethod {
    Nearest,
}

/// Preferred direction of travel for sorted paths. A candidate matches
/// when the dominant component of its (possibly reversed) start-to-end
/// vector agrees; non-matching candidates are only used when nothing
/// matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    LeftToRight,
    RightToLeft,
    TopToBottom,
    BottomToTop,
}

/// Scope within which travel sorting reorders paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortGrouping {
    /// The whole layer is one scope.
    Layer,
    /// Partition by the paths' metadata group label; order within each
    /// partition, partitions keep first-appearance order.
    Group,
}

/// One named stage of the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StepKind {
    Simplify {
        tolerance: f64,
        mode: SimplifyMode,
    },
    Sort {
        method: SortMethod,
        direction: Option<SortDirection>,
        grouping: SortGrouping,
    },
    Filter {
        min_length: f64,
        /// `<= 0` means unbounded above.
        max_length: f64,
        remove_tiny: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepConfig {
    pub enabled: bool,
    pub bypass: bool,
    pub kind: StepKind,
}

impl StepConfig {
    pub fn id(&self) -> &'static str {
        match self.kind {
            StepKind::Simplify { .. } => "linesimplify",
            StepKind::Sort { .. } => "linesort",
            StepKind::Filter { .. } => "linefilter",
        }
    }

    fn active(&self) -> bool {
        self.enabled && !self.bypass
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub bypass_all: bool,
    pub steps: Vec<StepConfig>,
}

impl Default for PipelineConfig {
    fn default() -> PipelineConfig {
        PipelineConfig {
            bypass_all: false,
            steps: vec![
                StepConfig {
                    enabled: true,
                    bypass: false,
                    kind: StepKind::Simplify {
                        tolerance: 0.1,
                        mode: SimplifyMode::PerpendicularDistance,
                    },
                },
                StepConfig {
                    enabled: true,
                    bypass: false,
                    kind: StepKind::Sort {
                        method: SortMethod::Nearest,
                        direction: None,
                        grouping: SortGrouping::Layer,
                    },
                },
                StepConfig {
                    enabled: true,
                    bypass: false,
                    kind: StepKind::Filter {
                        min_length: 0.0,
                        max_length: 0.0,
                        remove_tiny: true,
                    },
                },
            ],
        }
    }
}

/// Run the pipeline over each target layer, storing the result in its
/// `optimized_paths`. `bypass_all` clears the cache to `None` rather than
/// leaving a stale result behind.
pub fn optimize<'a>(layers: impl IntoIterator<Item = &'a mut Layer>, config: &PipelineConfig) {
    for layer in layers {
        if config.bypass_all {
            layer.optimized_paths = None;
            continue;
        }
        let mut paths = clone_paths(&layer.paths);
        for step in config.steps.iter().filter(|s| s.active()) {
            paths = apply_step(paths, &step.kind);
        }
        layer.optimized_paths = Some(paths);
    }
}

fn apply_step(paths: Vec<Path>, kind: &StepKind) -> Vec<Path> {
    match kind {
        StepKind::Simplify { tolerance, mode } => paths
            .iter()
            .map(|p| match mode {
                SimplifyMode::PerpendicularDistance => simplify_rdp(p, *tolerance),
                SimplifyMode::Visvalingam => simplify_visvalingam(p, *tolerance),
            })
            .collect(),
        StepKind::Sort {
            method: SortMethod::Nearest,
            direction,
            grouping,
        } => match grouping {
            SortGrouping::Layer => sort_nearest(paths, *direction),
            SortGrouping::Group => sort_grouped(paths, *direction),
        },
        StepKind::Filter {
            min_length,
            max_length,
            remove_tiny,
        } => paths
            .into_iter()
            .filter(|p| {
                let len = p.length();
                if *remove_tiny && len <= TINY_LENGTH {
                    return false;
                }
                len >= *min_length && (*max_length <= 0.0 || len <= *max_length)
            })
            .collect(),
    }
}

/// One traversal direction of one path's endpoints, indexed in the R-tree.
#[derive(Clone, Debug, PartialEq)]
struct EndpointRef {
    path_id: usize,
    start: Coord<f64>,
    fwd: bool,
}

impl RTreeObject for EndpointRef {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.start.x, self.start.y])
    }
}

impl PointDistance for EndpointRef {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.start.x - point[0];
        let dy = self.start.y - point[1];
        dx * dx + dy * dy
    }
}

fn direction_matches(path: &Path, fwd: bool, direction: SortDirection) -> bool {
    let (Some(start), Some(end)) = (path.start(), path.end()) else {
        return true;
    };
    let (from, to) = if fwd { (start, end) } else { (end, start) };
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    // Closed/degenerate paths (circles, dots) travel nowhere and match
    // any preference.
    if dx.abs() < 1e-12 && dy.abs() < 1e-12 {
        return true;
    }
    match direction {
        SortDirection::LeftToRight => dx.abs() >= dy.abs() && dx > 0.0,
        SortDirection::RightToLeft => dx.abs() >= dy.abs() && dx < 0.0,
        SortDirection::TopToBottom => dy.abs() >= dx.abs() && dy > 0.0,
        SortDirection::BottomToTop => dy.abs() >= dx.abs() && dy < 0.0,
    }
}

/// Greedy nearest-endpoint ordering. Preserves the exact multiset of
/// paths: everything comes back out, reordered and possibly reversed.
fn sort_nearest(paths: Vec<Path>, direction: Option<SortDirection>) -> Vec<Path> {
    if paths.len() < 2 {
        return paths;
    }

    // Refs are built in path-index order so the tree's structure is a pure
    // function of the input list.
    let indexed: Vec<(usize, Path)> = paths.into_iter().enumerate().collect();
    let mut refs: Vec<EndpointRef> = vec![];
    for (id, path) in indexed.iter() {
        let (Some(start), Some(end)) = (path.start(), path.end()) else {
            // Empty polylines have no endpoints; they're re-appended at
            // the end to keep the multiset intact.
            continue;
        };
        refs.push(EndpointRef {
            path_id: *id,
            start,
            fwd: true,
        });
        refs.push(EndpointRef {
            path_id: *id,
            start: end,
            fwd: false,
        });
    }
    let tree = RTree::bulk_load(refs);
    let mut pending: HashMap<usize, Path> = indexed.into_iter().collect();

    let mut ordered: Vec<Path> = Vec::with_capacity(pending.len());
    // Fixed start position for the first pick: the paper origin.
    let mut pen = coord! {x: 0.0, y: 0.0};

    loop {
        // (path_id, fwd, squared distance); equidistant candidates break
        // the tie on lowest id, then forward before reversed, so the pick
        // never depends on tree traversal order.
        let mut chosen: Option<(usize, bool, f64)> = None;
        let mut fallback: Option<(usize, bool, f64)> = None;
        for (endpoint, dist_sq) in tree.nearest_neighbor_iter_with_distance_2(&[pen.x, pen.y]) {
            if let Some((_, _, best)) = chosen {
                if dist_sq > best {
                    break;
                }
            }
            let Some(path) = pending.get(&endpoint.path_id) else {
                continue; // already placed via its other endpoint
            };
            let matches = match direction {
                Some(dir) => direction_matches(path, endpoint.fwd, dir),
                None => true,
            };
            let slot = if matches { &mut chosen } else { &mut fallback };
            let replace = match slot {
                None => true,
                Some((id, fwd, best)) => {
                    dist_sq < *best
                        || (dist_sq == *best && (endpoint.path_id, !endpoint.fwd) < (*id, !*fwd))
                }
            };
            if replace {
                *slot = Some((endpoint.path_id, endpoint.fwd, dist_sq));
            }
        }
        let Some((id, fwd, _)) = chosen.or(fallback) else {
            break;
        };
        let Some(mut path) = pending.remove(&id) else {
            break;
        };
        if !fwd {
            path.reverse();
        }
        if let Some(end) = path.end() {
            pen = end;
        }
        ordered.push(path);
    }

    // Anything unreachable through the tree (empty paths) still ships.
    let mut leftovers: Vec<usize> = pending.keys().copied().collect();
    leftovers.sort_unstable();
    for id in leftovers {
        if let Some(path) = pending.remove(&id) {
            ordered.push(path);
        }
    }
    ordered
}

/// Sort within metadata groups, keeping the groups themselves in
/// first-appearance order.
fn sort_grouped(paths: Vec<Path>, direction: Option<SortDirection>) -> Vec<Path> {
    let mut order: Vec<String> = vec![];
    let mut groups: HashMap<String, Vec<Path>> = HashMap::new();
    for path in paths {
        let key = path
            .meta()
            .and_then(|m| m.group.clone())
            .unwrap_or_default();
        if !groups.contains_key(&key) {
            order.push(key.clone());
        }
        groups.entry(key).or_default().push(path);
    }
    let mut out = vec![];
    for key in order {
        if let Some(bucket) = groups.remove(&key) {
            out.extend(sort_nearest(bucket, direction));
        }
    }
    out
}

/// Total pen-up travel distance over an ordered path list. Exposed for
/// callers (and tests) comparing orderings.
pub fn travel_distance(paths: &[Path]) -> f64 {
    let mut total = 0.0;
    for pair in paths.windows(2) {
        if let (Some(a), Some(b)) = (pair[0].end(), pair[1].start()) {
            #[allow(deprecated)]
            {
                total += Point::from(a).euclidean_distance(&Point::from(b));
            }
        }
    }
    total
}

/// Snap a coordinate onto the dedupe grid.
pub fn quantize(v: f64, tolerance: f64) -> f64 {
    if tolerance <= 0.0 {
        v
    } else {
        (v / tolerance).round() * tolerance
    }
}

/// Canonical key for duplicate detection: joined quantized coordinate
/// pairs for polylines, center+radii for circles.
pub fn canonical_key(path: &Path, tolerance: f64) -> String {
    match path {
        Path::Polyline { points, .. } => {
            let mut key = String::with_capacity(points.0.len() * 12);
            for c in &points.0 {
                key.push_str(&format!(
                    "{},{};",
                    quantize(c.x, tolerance),
                    quantize(c.y, tolerance)
                ));
            }
            key
        }
        Path::Circle {
            cx,
            cy,
            rx,
            ry,
            rotation,
            ..
        } => {
            let mut key = format!(
                "C{},{},{},{}",
                quantize(*cx, tolerance),
                quantize(*cy, tolerance),
                quantize(*rx, tolerance),
                quantize(*ry, tolerance)
            );
            // Rotation is invisible on a true circle but distinguishes
            // ellipses.
            if (rx - ry).abs() > 1e-12 {
                key.push_str(&format!(",{}", quantize(*rotation, tolerance)));
            }
            key
        }
    }
}

/// Render/export-time duplicate suppression, scoped per pen: identical
/// geometry on different pens is NOT deduplicated against each other.
#[derive(Debug, Default)]
pub struct PenDeduper {
    tolerance: f64,
    seen: HashMap<usize, HashSet<String>>,
}

impl PenDeduper {
    pub fn new(tolerance: f64) -> PenDeduper {
        PenDeduper {
            tolerance,
            seen: HashMap::new(),
        }
    }

    /// True if this path is the first of its shape for this pen; false
    /// (skip it) otherwise.
    pub fn admit(&mut self, pen_id: usize, path: &Path) -> bool {
        let key = canonical_key(path, self.tolerance);
        self.seen.entry(pen_id).or_default().insert(key)
    }
}
