//! The plot engine: owns the layer list and settings, drives
//! regeneration, and provides the snapshot machinery that makes undo/redo
//! and duplication exact.
//!
//! Settings and the algorithm table are held by the engine instance, not
//! read from any shared namespace; everything a regeneration needs travels
//! through explicit arguments.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::algorithms::{resolve_params, AlgorithmKind};
use crate::errors::SnapshotError;
use crate::layer::{Layer, LayerSnapshot};
use crate::noise::SimplexField;
use crate::optimizer::{self, PipelineConfig};
use crate::path::Bounds;
use crate::rng::Lcg;
use crate::transform::Transform;

/// Engine-wide configuration injected at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    pub bounds: Bounds,
    /// Decimal places for exported coordinates.
    pub precision: usize,
    /// Quantization grid for duplicate-path detection.
    pub dedupe_tolerance: f64,
}

impl Default for EngineSettings {
    fn default() -> EngineSettings {
        EngineSettings {
            bounds: Bounds::default(),
            precision: 3,
            dedupe_tolerance: 0.05,
        }
    }
}

/// The layer-stack half of a snapshot, nested so settings stay separate
/// from document content in persisted payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineState {
    pub layers: Vec<LayerSnapshot>,
    pub active_layer_id: Option<Uuid>,
}

/// Full persistable engine state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub engine: EngineState,
    pub settings: EngineSettings,
}

impl EngineSnapshot {
    /// Serialize for persistence.
    pub fn to_ron(&self) -> Result<String, SnapshotError> {
        ron::to_string(self).map_err(|e| SnapshotError::MalformedPayload(e.to_string()))
    }

    /// Parse a persisted payload. The only fallible loading surface;
    /// everything downstream of a parsed snapshot is total.
    pub fn from_ron(payload: &str) -> Result<EngineSnapshot, SnapshotError> {
        ron::from_str(payload).map_err(|e| SnapshotError::MalformedPayload(e.to_string()))
    }
}

#[derive(Debug, Default)]
struct History {
    undo: Vec<EngineSnapshot>,
    redo: Vec<EngineSnapshot>,
}

#[derive(Debug)]
pub struct PlotEngine {
    layers: Vec<Layer>,
    active_layer_id: Option<Uuid>,
    settings: EngineSettings,
    history: History,
}

impl PlotEngine {
    pub fn new(settings: EngineSettings) -> PlotEngine {
        PlotEngine {
            layers: vec![],
            active_layer_id: None,
            settings,
            history: History::default(),
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn active_layer_id(&self) -> Option<Uuid> {
        self.active_layer_id
    }

    pub fn set_active_layer(&mut self, id: Uuid) {
        if self.layers.iter().any(|l| l.id == id) {
            self.active_layer_id = Some(id);
        }
    }

    pub fn layer(&self, id: Uuid) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn layer_mut(&mut self, id: Uuid) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id == id)
    }

    /// Add a new layer of the given kind, generate it, and make it active.
    pub fn add_layer(&mut self, kind: AlgorithmKind, name: impl Into<String>) -> Uuid {
        let layer = Layer::new(kind, name);
        let id = layer.id;
        self.layers.push(layer);
        self.active_layer_id = Some(id);
        self.regenerate_layer(id);
        id
    }

    pub fn remove_layer(&mut self, id: Uuid) {
        self.layers.retain(|l| l.id != id);
        if self.active_layer_id == Some(id) {
            self.active_layer_id = self.layers.last().map(|l| l.id);
        }
    }

    /// Set one parameter and regenerate. The usual mutation entry point
    /// for panel-style callers.
    pub fn set_param(&mut self, id: Uuid, key: &str, value: f64) {
        if let Some(layer) = self.layer_mut(id) {
            layer.params.insert(key.to_string(), value);
            self.regenerate_layer(id);
        }
    }

    /// Regenerate a layer's paths from its seed, params and transform.
    /// Fresh rng/noise instances are derived from the layer's seed on
    /// every call, which is what makes regeneration reproducible.
    pub fn regenerate_layer(&mut self, id: Uuid) {
        let bounds = self.settings.bounds.clone();
        if let Some(layer) = self.layer_mut(id) {
            let params = resolve_params(layer.kind, &layer.params);
            let seed = params.get("seed").copied().unwrap_or(0.0) as u32;
            let mut rng = Lcg::new(seed);
            let noise = SimplexField::new(seed);
            let raw = layer
                .kind
                .generator()
                .generate(&params, &mut rng, &noise, &bounds);
            let transform = Transform::from_params(&params, &bounds);
            layer.paths = transform.apply(&raw);
        }
    }

    pub fn regenerate_all(&mut self) {
        let ids: Vec<Uuid> = self.layers.iter().map(|l| l.id).collect();
        for id in ids {
            self.regenerate_layer(id);
        }
    }

    /// Formula label for a layer, when its algorithm provides one.
    pub fn layer_formula(&self, id: Uuid) -> Option<String> {
        let layer = self.layer(id)?;
        let params = resolve_params(layer.kind, &layer.params);
        layer.kind.generator().formula(&params)
    }

    /// Run the optimization pipeline over every layer.
    pub fn optimize_all(&mut self, config: &PipelineConfig) {
        optimizer::optimize(self.layers.iter_mut(), config);
    }

    /// Run the optimization pipeline over a subset of layers.
    pub fn optimize_layers(&mut self, ids: &[Uuid], config: &PipelineConfig) {
        optimizer::optimize(
            self.layers.iter_mut().filter(|l| ids.contains(&l.id)),
            config,
        );
    }

    /// Structural copy of the whole engine state. Cached paths are not
    /// part of it; they are derived data.
    pub fn export_state(&self) -> EngineSnapshot {
        EngineSnapshot {
            engine: EngineState {
                layers: self.layers.iter().map(Layer::snapshot).collect(),
                active_layer_id: self.active_layer_id,
            },
            settings: self.settings.clone(),
        }
    }

    /// Replace the engine state with a snapshot and regenerate every
    /// layer. After this, each layer's paths are exactly what they were
    /// when the snapshot was taken.
    pub fn import_state(&mut self, snapshot: &EngineSnapshot) {
        self.settings = snapshot.settings.clone();
        self.layers = snapshot
            .engine
            .layers
            .iter()
            .map(LayerSnapshot::restore)
            .collect();
        self.active_layer_id = snapshot
            .engine
            .active_layer_id
            .filter(|id| snapshot.engine.layers.iter().any(|l| l.id == *id));
        self.regenerate_all();
    }

    /// Clone a layer: fresh id, value-copied params (seed included, so the
    /// duplicate is an exact twin, not a re-roll), inserted right after
    /// the source in z-order, regenerated.
    pub fn duplicate_layer(&mut self, id: Uuid) -> Option<Uuid> {
        let index = self.layers.iter().position(|l| l.id == id)?;
        let mut copy = self.layers[index].clone();
        copy.id = Uuid::new_v4();
        copy.name = format!("{} copy", copy.name);
        copy.optimized_paths = None;
        let new_id = copy.id;
        self.layers.insert(index + 1, copy);
        self.regenerate_layer(new_id);
        self.active_layer_id = Some(new_id);
        Some(new_id)
    }

    /// Record the current state before a mutation. Clears the redo stack,
    /// as any new edit forks history.
    pub fn checkpoint(&mut self) {
        self.history.undo.push(self.export_state());
        self.history.redo.clear();
    }

    /// Roll back to the last checkpoint. Returns false when there is
    /// nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo.pop() else {
            return false;
        };
        self.history.redo.push(self.export_state());
        self.import_state(&snapshot);
        true
    }

    /// Reapply the last undone state. Returns false when there is nothing
    /// to redo.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo.pop() else {
            return false;
        };
        self.history.undo.push(self.export_state());
        self.import_state(&snapshot);
        true
    }
}

impl Default for PlotEngine {
    fn default() -> PlotEngine {
        PlotEngine::new(EngineSettings::default())
    }
}
