use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use gltf::buffer;
use itertools::izip;

use crate::math::bounds::AABB;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub tex_coords: Vec2,
}

pub struct ModelPrimitive {
    pub index: usize,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub material_index: Option<usize>,
}

impl ModelPrimitive {
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).filter_map(|triangle| {
            let v0 = self.vertices.get(triangle[0] as usize)?;
            let v1 = self.vertices.get(triangle[1] as usize)?;
            let v2 = self.vertices.get(triangle[2] as usize)?;
            Some([v0.position, v1.position, v2.position])
        })
    }
}

pub struct Model {
    pub name: String,
    pub primitives: Vec<ModelPrimitive>,
}

pub type Buffers<'a> = &'a [buffer::Data];

impl Model {
    pub fn from_gltf(
        name: impl Into<String>,
        mesh: gltf::Mesh,
        buffers: Buffers,
    ) -> anyhow::Result<Model> {
        let mut model = Model {
            name: name.into(),
            primitives: Vec::new(),
        };

        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                log::warn!(
                    "Skipping primitive {} of {}: unsupported mode {:?}",
                    primitive.index(),
                    model.name,
                    primitive.mode()
                );
                continue;
            }

            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

            let Some(position_reader) = reader.read_positions() else {
                log::warn!(
                    "Skipping primitive {} of {}: no positions",
                    primitive.index(),
                    model.name
                );
                continue;
            };
            let positions: Vec<Vec3> = position_reader.map(Vec3::from).collect();

            let normals: Vec<Vec3> = match reader.read_normals() {
                Some(normals) => normals.map(Vec3::from).collect(),
                None => vec![Vec3::Y; positions.len()],
            };

            let tex_coords: Vec<Vec2> = match reader.read_tex_coords(0) {
                Some(tex_coords) => tex_coords.into_f32().map(Vec2::from).collect(),
                None => vec![Vec2::ZERO; positions.len()],
            };

            let vertices = izip!(positions, normals, tex_coords)
                .map(|(position, normal, tex_coords)| Vertex {
                    position,
                    normal,
                    tex_coords,
                })
                .collect::<Vec<Vertex>>();

            let indices = match reader.read_indices() {
                Some(index_reader) => index_reader.into_u32().collect::<Vec<u32>>(),
                None => (0..vertices.len() as u32).collect(),
            };

            model.primitives.push(ModelPrimitive {
                index: primitive.index(),
                vertices,
                indices,
                material_index: primitive.material().index(),
            });
        }

        if model.primitives.is_empty() {
            return Err(anyhow::anyhow!("Mesh without primitives: {}", model.name));
        }

        Ok(model)
    }

    pub fn vertex_count(&self) -> usize {
        self.primitives
            .iter()
            .map(|primitive| primitive.vertices.len())
            .sum()
    }

    /// All vertex positions, primitives concatenated in order.
    pub fn positions(&self) -> Vec<Vec3> {
        self.primitives
            .iter()
            .flat_map(|primitive| primitive.vertices.iter().map(|vertex| vertex.position))
            .collect()
    }

    /// Inverse of `positions()`. Extra or missing entries are ignored.
    pub fn set_positions(&mut self, positions: &[Vec3]) {
        let vertices = self
            .primitives
            .iter_mut()
            .flat_map(|primitive| primitive.vertices.iter_mut());

        for (vertex, position) in vertices.zip(positions) {
            vertex.position = *position;
        }
    }

    pub fn local_bounds(&self) -> AABB {
        AABB::from_points(
            self.primitives
                .iter()
                .flat_map(|primitive| primitive.vertices.iter().map(|vertex| vertex.position)),
        )
    }
}
