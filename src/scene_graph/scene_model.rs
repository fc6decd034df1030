use std::cell::Cell;

use id_arena::Id;

use crate::model::Model;

pub type SceneModelId = Id<SceneModel>;

pub struct SceneModel {
    pub model: Model,
    vertices_dirty: Cell<bool>,
}

impl SceneModel {
    pub fn new(model: Model) -> Self {
        Self {
            model,
            vertices_dirty: Cell::new(false),
        }
    }

    /// Flags the vertex data for re-upload after a CPU-side edit.
    pub fn mark_vertices_dirty(&self) {
        self.vertices_dirty.set(true);
    }

    pub fn take_vertices_dirty(&self) -> bool {
        self.vertices_dirty.replace(false)
    }
}
