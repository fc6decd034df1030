use std::collections::HashMap;

use anyhow::bail;
use glam::Vec4;
use id_arena::{Arena, Id};

/// Decoded RGBA8 image ready for upload.
#[derive(Debug, Clone)]
pub struct TextureData {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

pub type TextureId = Id<TextureData>;

#[derive(Debug, Clone)]
pub struct Material {
    pub name: String,
    pub base_color: Vec4,
    pub base_color_texture: Option<TextureId>,
}

pub type MaterialId = Id<Material>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct GltfMaterialKey {
    file_name: String,
    material_index: usize,
}

/// Owns every material and texture in the session. Nothing is ever freed;
/// ids stay valid until exit.
pub struct MaterialManager {
    materials: Arena<Material>,
    textures: Arena<TextureData>,
    materials_by_gltf: HashMap<GltfMaterialKey, MaterialId>,
    default_material: MaterialId,
}

impl MaterialManager {
    pub fn new() -> Self {
        let mut materials = Arena::new();
        let default_material = materials.alloc(Material {
            name: "Default".to_string(),
            base_color: Vec4::new(0.8, 0.8, 0.8, 1.0),
            base_color_texture: None,
        });

        Self {
            materials,
            textures: Arena::new(),
            materials_by_gltf: HashMap::new(),
            default_material,
        }
    }

    pub fn default_material(&self) -> MaterialId {
        self.default_material
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.alloc(material)
    }

    pub fn add_texture(&mut self, texture: TextureData) -> TextureId {
        self.textures.alloc(texture)
    }

    pub fn get_material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id)
    }

    pub fn get_texture(&self, id: TextureId) -> Option<&TextureData> {
        self.textures.get(id)
    }

    pub fn get_gltf_material(&self, file_name: &str, material_index: usize) -> Option<MaterialId> {
        let key = GltfMaterialKey {
            file_name: file_name.to_string(),
            material_index,
        };
        self.materials_by_gltf.get(&key).copied()
    }

    pub fn load_all_materials_from_gltf(
        &mut self,
        file_name: &str,
        document: &gltf::Document,
        images: &[gltf::image::Data],
    ) {
        for material in document.materials() {
            let Some(material_index) = material.index() else {
                continue;
            };

            let key = GltfMaterialKey {
                file_name: file_name.to_string(),
                material_index,
            };

            if self.materials_by_gltf.contains_key(&key) {
                continue;
            }

            let material_name = material
                .name()
                .map(String::from)
                .unwrap_or_else(|| format!("{file_name} material {material_index}"));

            let pbr = material.pbr_metallic_roughness();

            let base_color_texture = pbr.base_color_texture().and_then(|info| {
                let image_index = info.texture().source().index();
                let Some(image) = images.get(image_index) else {
                    log::warn!("{material_name}: base colour image {image_index} missing");
                    return None;
                };

                match convert_image_data_to_rgba(image) {
                    Ok(pixels) => Some(self.add_texture(TextureData {
                        name: format!("{material_name} (base colour)"),
                        width: image.width,
                        height: image.height,
                        pixels,
                    })),
                    Err(e) => {
                        log::warn!("{material_name}: {e}");
                        None
                    }
                }
            });

            let id = self.add_material(Material {
                name: material_name,
                base_color: Vec4::from(pbr.base_color_factor()),
                base_color_texture,
            });
            self.materials_by_gltf.insert(key, id);
        }
    }

    pub fn materials(&self) -> impl Iterator<Item = (MaterialId, &Material)> {
        self.materials.iter()
    }

    pub fn textures(&self) -> impl Iterator<Item = (TextureId, &TextureData)> {
        self.textures.iter()
    }
}

fn convert_image_data_to_rgba(data: &gltf::image::Data) -> anyhow::Result<Vec<u8>> {
    use gltf::image::Format;

    match data.format {
        Format::R8G8B8A8 => Ok(data.pixels.clone()),
        Format::R8G8B8 => {
            let mut rgba_data = Vec::with_capacity(data.pixels.len() / 3 * 4);
            for pixel in data.pixels.chunks_exact(3) {
                rgba_data.extend_from_slice(pixel);
                rgba_data.push(255);
            }
            Ok(rgba_data)
        }
        Format::R8 => Ok(data
            .pixels
            .iter()
            .flat_map(|&value| [value, value, value, 255])
            .collect()),
        other => bail!("Unsupported image format: {:?}", other),
    }
}
