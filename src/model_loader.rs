use std::path::Path;

use anyhow::Context;
use glam::Vec3;

use crate::config::ModelEntry;
use crate::material_manager::MaterialManager;
use crate::scene_graph::object3d::ObjectId;
use crate::scene_graph::scene::Scene;

/// A parsed glTF file with its buffers and images resolved.
pub struct LoadedModel {
    pub file_name: String,
    pub document: gltf::Document,
    pub buffers: Vec<gltf::buffer::Data>,
    pub images: Vec<gltf::image::Data>,
}

pub fn load_model(path: impl AsRef<Path>) -> anyhow::Result<LoadedModel> {
    let path = path.as_ref();
    let (document, buffers, images) =
        gltf::import(path).with_context(|| format!("Failed to load {}", path.display()))?;

    Ok(LoadedModel {
        file_name: path.to_string_lossy().to_string(),
        document,
        buffers,
        images,
    })
}

impl LoadedModel {
    /// Group name for the spawned model: the file name without extension.
    pub fn group_name(&self) -> String {
        Path::new(&self.file_name)
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| self.file_name.clone())
    }

    /// Converts the materials and spawns the default scene (or the first one)
    /// under a new top-level group placed at `position`.
    pub fn spawn(
        &self,
        scene: &mut Scene,
        materials: &mut MaterialManager,
        position: Vec3,
    ) -> anyhow::Result<ObjectId> {
        let gltf_scene = self
            .document
            .default_scene()
            .or_else(|| self.document.scenes().next())
            .with_context(|| format!("No scenes in {}", self.file_name))?;

        materials.load_all_materials_from_gltf(&self.file_name, &self.document, &self.images);

        let group_id = scene.spawn_gltf_scene(
            materials,
            &self.file_name,
            &self.group_name(),
            &self.buffers,
            &gltf_scene,
        );
        scene.set_object_translation(group_id, position);

        Ok(group_id)
    }
}

/// Loads the configured models one after another. Failures are logged and
/// skipped; the returned groups are in list order.
pub fn load_models(
    scene: &mut Scene,
    materials: &mut MaterialManager,
    entries: &[ModelEntry],
) -> Vec<ObjectId> {
    let mut groups = Vec::with_capacity(entries.len());

    for entry in entries {
        let spawned =
            load_model(&entry.path).and_then(|loaded| loaded.spawn(scene, materials, entry.position));

        match spawned {
            Ok(group_id) => {
                let meshes = scene.meshes_under(group_id);
                let vertices: usize = meshes
                    .iter()
                    .filter_map(|&id| scene.get_object(id)?.model_id)
                    .filter_map(|model_id| scene.get_model(model_id))
                    .map(|scene_model| scene_model.model.vertex_count())
                    .sum();
                log::info!(
                    "Loaded {} ({} meshes, {} vertices)",
                    entry.path,
                    meshes.len(),
                    vertices
                );
                groups.push(group_id);
            }
            Err(e) => log::error!("{:#}", e),
        }
    }

    groups
}
