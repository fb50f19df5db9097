//! The [`Layer`]: one algorithm choice plus its parameters, transform and
//! generated paths. The unit of composition, duplication and history.

use csscolorparser::Color as CssColor;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::collections::BTreeMap;

use crate::algorithms::{AlgorithmKind, Params};
use crate::path::Path;

/// Per-parameter presentation state. Opaque to the engine core; it is
/// carried through snapshots so panel-style callers get their parameter
/// annotations back intact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParamState {
    /// Locked parameters keep their value through bulk re-rolls.
    #[serde(default)]
    pub locked: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub id: Uuid,
    pub kind: AlgorithmKind,
    pub name: String,
    pub params: Params,
    /// Presentation state per parameter name. Never read by generation.
    pub param_states: BTreeMap<String, ParamState>,
    /// Raw generated+transformed paths. Mutated only by regeneration.
    pub paths: Vec<Path>,
    /// Optimizer output cache. `None` means "no optimization applied",
    /// distinct from `Some(vec![])` (optimization ran, nothing survived).
    pub optimized_paths: Option<Vec<Path>>,
    pub visible: bool,
    pub color: CssColor,
    pub stroke_width: f64,
    pub line_cap: String,
    pub pen_id: usize,
    /// Optional grouping parent (layer folders).
    pub parent_id: Option<Uuid>,
}

impl Layer {
    pub fn new(kind: AlgorithmKind, name: impl Into<String>) -> Layer {
        Layer {
            id: Uuid::new_v4(),
            kind,
            name: name.into(),
            params: Params::new(),
            param_states: BTreeMap::new(),
            paths: vec![],
            optimized_paths: None,
            visible: true,
            color: CssColor::from_rgba8(0, 0, 0, 255),
            stroke_width: 0.5,
            line_cap: "round".to_string(),
            pen_id: 0,
            parent_id: None,
        }
    }

    /// The paths a renderer/exporter should draw: the optimizer cache when
    /// present, raw paths otherwise.
    pub fn drawable_paths(&self) -> &[Path] {
        match &self.optimized_paths {
            Some(paths) => paths,
            None => &self.paths,
        }
    }

    /// Structural copy for persistence and history. Cached path arrays are
    /// deliberately omitted; restoration regenerates them from the seed and
    /// params, which is the source of truth.
    pub fn snapshot(&self) -> LayerSnapshot {
        LayerSnapshot {
            id: self.id,
            kind: self.kind.key().to_string(),
            name: self.name.clone(),
            params: self.params.clone(),
            param_states: self.param_states.clone(),
            visible: self.visible,
            color: self.color.clone(),
            stroke_width: self.stroke_width,
            line_cap: self.line_cap.clone(),
            pen_id: self.pen_id,
            parent_id: self.parent_id,
        }
    }
}

/// Persisted form of a layer. `kind` is stored as its key string so stale
/// snapshots with unknown algorithms restore via the registry fallback
/// instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSnapshot {
    pub id: Uuid,
    pub kind: String,
    pub name: String,
    pub params: Params,
    #[serde(default)]
    pub param_states: BTreeMap<String, ParamState>,
    pub visible: bool,
    pub color: CssColor,
    pub stroke_width: f64,
    pub line_cap: String,
    pub pen_id: usize,
    pub parent_id: Option<Uuid>,
}

impl LayerSnapshot {
    /// Rebuild a live layer (paths empty until regeneration).
    pub fn restore(&self) -> Layer {
        Layer {
            id: self.id,
            kind: AlgorithmKind::from_key(&self.kind),
            name: self.name.clone(),
            params: self.params.clone(),
            param_states: self.param_states.clone(),
            paths: vec![],
            optimized_paths: None,
            visible: self.visible,
            color: self.color.clone(),
            stroke_width: self.stroke_width,
            line_cap: self.line_cap.clone(),
            pen_id: self.pen_id,
            parent_id: self.parent_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_restores_identity() {
        let mut layer = Layer::new(AlgorithmKind::Spirograph, "spiro");
        layer.params.insert("seed".to_string(), 42.0);
        layer
            .param_states
            .insert("seed".to_string(), ParamState { locked: true });
        layer.pen_id = 3;
        layer.stroke_width = 0.3;
        let snap = layer.snapshot();
        let restored = snap.restore();
        assert_eq!(restored.id, layer.id);
        assert_eq!(restored.kind, layer.kind);
        assert_eq!(restored.params, layer.params);
        assert_eq!(restored.param_states, layer.param_states);
        assert_eq!(restored.pen_id, 3);
        assert!(restored.paths.is_empty());
        assert!(restored.optimized_paths.is_none());
    }

    #[test]
    fn test_unknown_kind_restores_to_default() {
        let layer = Layer::new(AlgorithmKind::Rings, "r");
        let mut snap = layer.snapshot();
        snap.kind = "retired-algorithm".to_string();
        assert_eq!(snap.restore().kind, AlgorithmKind::DEFAULT);
    }

    #[test]
    fn test_drawable_prefers_optimized() {
        let mut layer = Layer::new(AlgorithmKind::Lissajous, "l");
        layer.paths = vec![Path::circle(0.0, 0.0, 1.0)];
        assert_eq!(layer.drawable_paths().len(), 1);
        layer.optimized_paths = Some(vec![]);
        assert!(layer.drawable_paths().is_empty());
    }
}
