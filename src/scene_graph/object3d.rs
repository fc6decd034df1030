use glam::Vec3;
use id_arena::Id;

use crate::material_manager::MaterialId;
use crate::scene_graph::scene_model::SceneModelId;
use crate::scene_graph::transform::Transform;

pub type ObjectId = Id<Object3D>;

/// A node in the scene graph. Groups have neither a model nor a material;
/// meshes have both.
pub struct Object3D {
    pub name: String,
    pub transform: Transform,
    pub model_id: Option<SceneModelId>,
    pub material_id: Option<MaterialId>,
    pub parent_id: Option<ObjectId>,
    pub child_ids: Vec<ObjectId>,
}

impl Object3D {
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn mesh(name: impl Into<String>, model_id: SceneModelId, material_id: MaterialId) -> Self {
        Self {
            name: name.into(),
            model_id: Some(model_id),
            material_id: Some(material_id),
            ..Default::default()
        }
    }

    pub fn is_mesh(&self) -> bool {
        self.model_id.is_some()
    }
}

impl Default for Object3D {
    fn default() -> Self {
        Self {
            name: String::new(),
            transform: Transform::from_translation(Vec3::ZERO),
            model_id: None,
            material_id: None,
            parent_id: None,
            child_ids: Vec::new(),
        }
    }
}
