use std::collections::HashMap;

use anyhow::Context;
use glam::Vec4;

use crate::material_manager::{Material, MaterialId, MaterialManager, TextureData, TextureId};
use crate::scene_graph::object3d::ObjectId;
use crate::scene_graph::scene::Scene;

/// Swaps the material of whole objects for a textured one and back.
///
/// Decoded images, and the material sampling each of them, are cached by path
/// for the whole session. The material a mesh had before its first swap is
/// remembered once and never replaced, so resetting always returns to what
/// the model was loaded with.
pub struct TextureManager {
    cache: HashMap<String, TextureId>,
    textured_materials: HashMap<String, MaterialId>,
    original_materials: HashMap<ObjectId, MaterialId>,
}

impl TextureManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            textured_materials: HashMap::new(),
            original_materials: HashMap::new(),
        }
    }

    pub fn load_texture(
        &mut self,
        materials: &mut MaterialManager,
        path: &str,
    ) -> anyhow::Result<TextureId> {
        if let Some(&texture_id) = self.cache.get(path) {
            return Ok(texture_id);
        }

        let image = image::open(path)
            .with_context(|| format!("Failed to load texture {path}"))?
            .to_rgba8();

        let (width, height) = image.dimensions();
        let texture_id = materials.add_texture(TextureData {
            name: path.to_string(),
            width,
            height,
            pixels: image.into_raw(),
        });

        log::info!("Loaded texture {path} ({width}x{height})");
        self.cache.insert(path.to_string(), texture_id);

        Ok(texture_id)
    }

    /// The material shared by every object textured with `path`, created on
    /// first use.
    fn textured_material(
        &mut self,
        materials: &mut MaterialManager,
        path: &str,
    ) -> anyhow::Result<MaterialId> {
        if let Some(&material_id) = self.textured_materials.get(path) {
            return Ok(material_id);
        }

        let texture_id = self.load_texture(materials, path)?;
        let material_id = materials.add_material(Material {
            name: format!("Textured ({path})"),
            base_color: Vec4::ONE,
            base_color_texture: Some(texture_id),
        });
        self.textured_materials.insert(path.to_string(), material_id);

        Ok(material_id)
    }

    /// Puts every mesh under `object` onto the material sampling the texture
    /// at `path`. On error nothing is changed.
    pub fn apply_texture(
        &mut self,
        scene: &mut Scene,
        materials: &mut MaterialManager,
        object: ObjectId,
        path: &str,
    ) -> anyhow::Result<MaterialId> {
        let material_id = self.textured_material(materials, path)?;

        for mesh_id in scene.meshes_under(object) {
            let Some(mesh) = scene.get_object_mut(mesh_id) else {
                continue;
            };
            let Some(current) = mesh.material_id else {
                continue;
            };
            if current == material_id {
                continue;
            }

            self.original_materials.entry(mesh_id).or_insert(current);
            mesh.material_id = Some(material_id);
        }

        Ok(material_id)
    }

    /// Puts the pre-swap material back on every mesh under `object`.
    pub fn reset_texture(&mut self, scene: &mut Scene, object: ObjectId) {
        for mesh_id in scene.meshes_under(object) {
            let Some(&original) = self.original_materials.get(&mesh_id) else {
                continue;
            };

            if let Some(mesh) = scene.get_object_mut(mesh_id) {
                mesh.material_id = Some(original);
            }
        }
    }

    #[cfg(test)]
    pub fn original_material(&self, mesh_id: ObjectId) -> Option<MaterialId> {
        self.original_materials.get(&mesh_id).copied()
    }

    #[cfg(test)]
    pub fn cached_texture_count(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
pub mod test_support {
    use std::path::Path;

    /// Writes a solid-colour 2x2 PNG and returns its path as a string.
    pub fn write_png(dir: &Path, name: &str, rgba: [u8; 4]) -> String {
        let path = dir.join(name);
        image::RgbaImage::from_pixel(2, 2, image::Rgba(rgba))
            .save(&path)
            .unwrap();
        path.to_string_lossy().to_string()
    }
}
