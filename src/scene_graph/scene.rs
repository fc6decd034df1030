use glam::{Mat4, Quat, Vec3};
use id_arena::Arena;
use std::collections::HashMap;

use crate::material_manager::MaterialManager;
use crate::math::bounds::AABB;
use crate::math::ray::Ray;
use crate::model::{Buffers, Model};
use crate::scene_graph::helpers::{Helper, HelperId};
use crate::scene_graph::object3d::{Object3D, ObjectId};
use crate::scene_graph::scene_model::{SceneModel, SceneModelId};
use crate::scene_graph::transform::Transform;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    /// The mesh that was hit, not its selectable ancestor.
    pub object_id: ObjectId,
    pub distance: f32,
    pub point: Vec3,
}

pub struct Scene {
    pub objects: Arena<Object3D>,
    pub models: Arena<SceneModel>,
    helpers: Vec<(HelperId, Helper)>,
    next_helper_id: u32,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Arena::new(),
            models: Arena::new(),
            helpers: Vec::new(),
            next_helper_id: 0,
        }
    }

    pub fn add_object(&mut self, object: Object3D) -> ObjectId {
        self.objects.alloc(object)
    }

    pub fn add_child(&mut self, parent_id: ObjectId, object: Object3D) -> ObjectId {
        let object_id = self.add_object(object);
        self.set_object_parent(object_id, Some(parent_id));
        object_id
    }

    pub fn get_object(&self, id: ObjectId) -> Option<&Object3D> {
        self.objects.get(id)
    }

    pub fn get_object_mut(&mut self, id: ObjectId) -> Option<&mut Object3D> {
        self.objects.get_mut(id)
    }

    pub fn object_name(&self, id: ObjectId) -> &str {
        self.get_object(id)
            .map(|object| object.name.as_str())
            .unwrap_or("")
    }

    pub fn add_model(&mut self, model: SceneModel) -> SceneModelId {
        self.models.alloc(model)
    }

    pub fn get_model(&self, id: SceneModelId) -> Option<&SceneModel> {
        self.models.get(id)
    }

    pub fn get_model_mut(&mut self, id: SceneModelId) -> Option<&mut SceneModel> {
        self.models.get_mut(id)
    }

    /// Spawns every root node of `scene` under a new group named `group_name`
    /// and returns the group.
    pub fn spawn_gltf_scene(
        &mut self,
        material_manager: &MaterialManager,
        file_name: &str,
        group_name: &str,
        buffers: Buffers,
        scene: &gltf::Scene,
    ) -> ObjectId {
        let group_id = self.add_object(Object3D::group(group_name));
        let mut gltf_mesh_to_model = HashMap::new();

        for node in scene.nodes() {
            self.spawn_gltf_node(
                material_manager,
                file_name,
                buffers,
                &node,
                group_id,
                &mut gltf_mesh_to_model,
            );
        }

        group_id
    }

    fn spawn_gltf_node(
        &mut self,
        material_manager: &MaterialManager,
        file_name: &str,
        buffers: Buffers,
        node: &gltf::Node,
        parent_id: ObjectId,
        gltf_mesh_to_model: &mut HashMap<usize, SceneModelId>,
    ) -> ObjectId {
        let mut object = Object3D::default();
        let node_name = node.name().unwrap_or("Unnamed").to_string();
        object.name = node_name.clone();
        let (translation, rotation, scale) = node.transform().decomposed();

        object.transform.set_transform(
            translation.into(),
            Quat::from_array(rotation),
            scale[0], // Assume uniform scale for simplicity
        );

        if let Some(mesh) = node.mesh() {
            let mesh_index = mesh.index();

            let model_id = match gltf_mesh_to_model.get(&mesh_index).copied() {
                Some(model_id) => Some(model_id),
                None => {
                    let mesh_name = mesh
                        .name()
                        .map(String::from)
                        .unwrap_or_else(|| format!("{} (Mesh)", node_name));

                    match Model::from_gltf(mesh_name, mesh, buffers) {
                        Ok(model) => {
                            let model_id = self.add_model(SceneModel::new(model));
                            gltf_mesh_to_model.insert(mesh_index, model_id);
                            Some(model_id)
                        }
                        Err(e) => {
                            log::warn!("{file_name}: skipping mesh of node {node_name}: {e}");
                            None
                        }
                    }
                }
            };

            if let Some(model_id) = model_id {
                let material_id = self
                    .get_model(model_id)
                    .and_then(|scene_model| scene_model.model.primitives.first())
                    .and_then(|primitive| primitive.material_index)
                    .and_then(|index| material_manager.get_gltf_material(file_name, index))
                    .unwrap_or_else(|| material_manager.default_material());

                object.model_id = Some(model_id);
                object.material_id = Some(material_id);
            }
        }

        let object_id = self.add_child(parent_id, object);

        for child in node.children() {
            self.spawn_gltf_node(
                material_manager,
                file_name,
                buffers,
                &child,
                object_id,
                gltf_mesh_to_model,
            );
        }

        object_id
    }

    /// `root` and everything below it, depth first, parents before children.
    pub fn descendants(&self, root: ObjectId) -> Vec<ObjectId> {
        let mut result = Vec::new();
        let mut stack = vec![root];

        while let Some(id) = stack.pop() {
            let Some(object) = self.objects.get(id) else {
                continue;
            };

            result.push(id);
            stack.extend(object.child_ids.iter().rev().copied());
        }

        result
    }

    /// Mesh nodes at or below `root`.
    pub fn meshes_under(&self, root: ObjectId) -> Vec<ObjectId> {
        self.descendants(root)
            .into_iter()
            .filter(|id| self.objects.get(*id).is_some_and(Object3D::is_mesh))
            .collect()
    }

    #[cfg(test)]
    pub fn root_objects(&self) -> Vec<ObjectId> {
        self.objects
            .iter()
            .filter(|(_, object)| object.parent_id.is_none())
            .map(|(id, _)| id)
            .collect()
    }

    pub fn world_matrix(&self, id: ObjectId) -> Mat4 {
        self.objects
            .get(id)
            .map(|object| *object.transform.get_world_matrix())
            .unwrap_or(Mat4::IDENTITY)
    }

    /// World-space box around every mesh at or below `root`. Uses the world
    /// matrices from the last `update_world_transforms`.
    pub fn world_bounds(&self, root: ObjectId) -> AABB {
        self.meshes_under(root)
            .into_iter()
            .filter_map(|id| {
                let object = self.objects.get(id)?;
                let scene_model = self.models.get(object.model_id?)?;
                let local = scene_model.model.local_bounds();
                Some(local.transform(&object.transform.get_world_matrix()))
            })
            .fold(AABB::EMPTY, |acc, bounds| acc.union(&bounds))
    }

    /// Nearest mesh hit below any of `roots`.
    pub fn raycast(&self, ray: &Ray, roots: &[ObjectId]) -> Option<RaycastHit> {
        let mut nearest: Option<RaycastHit> = None;

        for &root in roots {
            for mesh_id in self.meshes_under(root) {
                let Some(hit) = self.raycast_mesh(ray, mesh_id) else {
                    continue;
                };

                if nearest.map_or(true, |current| hit.distance < current.distance) {
                    nearest = Some(hit);
                }
            }
        }

        nearest
    }

    fn raycast_mesh(&self, ray: &Ray, mesh_id: ObjectId) -> Option<RaycastHit> {
        let object = self.objects.get(mesh_id)?;
        let scene_model = self.models.get(object.model_id?)?;
        let world_matrix = *object.transform.get_world_matrix();

        let world_bounds = scene_model.model.local_bounds().transform(&world_matrix);
        world_bounds.intersect_ray(ray)?;

        let mut nearest: Option<f32> = None;
        for primitive in &scene_model.model.primitives {
            for [v0, v1, v2] in primitive.triangles() {
                let hit = ray.intersect_triangle(
                    world_matrix.transform_point3(v0),
                    world_matrix.transform_point3(v1),
                    world_matrix.transform_point3(v2),
                );

                if let Some(distance) = hit {
                    if nearest.map_or(true, |current| distance < current) {
                        nearest = Some(distance);
                    }
                }
            }
        }

        nearest.map(|distance| RaycastHit {
            object_id: mesh_id,
            distance,
            point: ray.at(distance),
        })
    }

    pub fn add_helper(&mut self, helper: Helper) -> HelperId {
        let id = HelperId(self.next_helper_id);
        self.next_helper_id += 1;
        self.helpers.push((id, helper));
        id
    }

    pub fn remove_helper(&mut self, id: HelperId) -> Option<Helper> {
        let index = self.helpers.iter().position(|(helper_id, _)| *helper_id == id)?;
        Some(self.helpers.remove(index).1)
    }

    pub fn get_helper_mut(&mut self, id: HelperId) -> Option<&mut Helper> {
        self.helpers
            .iter_mut()
            .find(|(helper_id, _)| *helper_id == id)
            .map(|(_, helper)| helper)
    }

    pub fn helpers(&self) -> impl Iterator<Item = &Helper> {
        self.helpers.iter().map(|(_, helper)| helper)
    }

    /// Updates all object transforms in hierarchical order
    pub fn update_world_transforms(&self) {
        for (root_id, _) in self
            .objects
            .iter()
            .filter(|(_, object)| object.parent_id.is_none())
        {
            self.update_object_transform_recursive(root_id, Mat4::IDENTITY, false);
        }
    }

    fn update_object_transform_recursive(
        &self,
        object_id: ObjectId,
        parent_world_matrix: Mat4,
        parent_changed: bool,
    ) {
        if let Some(object) = self.objects.get(object_id) {
            let local_matrix = *object.transform.get_local_matrix();
            let changed = parent_changed || object.transform.is_world_dirty();

            if changed {
                object
                    .transform
                    .set_world_matrix(parent_world_matrix * local_matrix);
            }

            let world_matrix = *object.transform.get_world_matrix();
            for &child_id in &object.child_ids {
                self.update_object_transform_recursive(child_id, world_matrix, changed);
            }
        }
    }

    /// Invalidates world transforms for an object and all its descendants
    pub fn invalidate_object_hierarchy(&self, object_id: ObjectId) {
        if let Some(object) = self.objects.get(object_id) {
            object.transform.invalidate_world();

            for &child_id in &object.child_ids {
                self.invalidate_object_hierarchy(child_id);
            }
        }
    }

    /// Sets the parent of an object and updates child relationships
    pub fn set_object_parent(&mut self, child_id: ObjectId, new_parent_id: Option<ObjectId>) {
        // Remove from old parent's children list
        if let Some(old_parent_id) = self.objects.get(child_id).and_then(|child| child.parent_id) {
            if let Some(old_parent) = self.objects.get_mut(old_parent_id) {
                old_parent.child_ids.retain(|&id| id != child_id);
            }
        }

        if let Some(child) = self.objects.get_mut(child_id) {
            child.parent_id = new_parent_id;
        }

        if let Some(new_parent) = new_parent_id.and_then(|id| self.objects.get_mut(id)) {
            new_parent.child_ids.push(child_id);
        }

        self.invalidate_object_hierarchy(child_id);
    }

    pub fn get_object_transform(&self, object_id: ObjectId) -> Option<&Transform> {
        self.objects.get(object_id).map(|object| &object.transform)
    }

    pub fn set_object_translation(&mut self, object_id: ObjectId, translation: Vec3) {
        if let Some(object) = self.objects.get_mut(object_id) {
            object.transform.set_translation(translation);
        }
        self.invalidate_object_hierarchy(object_id);
    }

    pub fn modify_object_transform(
        &mut self,
        object_id: ObjectId,
        modify: impl FnOnce(&mut Transform),
    ) {
        if let Some(object) = self.objects.get_mut(object_id) {
            modify(&mut object.transform);
        }
        self.invalidate_object_hierarchy(object_id);
    }
}

#[cfg(test)]
pub mod test_support {
    use super::*;
    use crate::model::test_support::cube;

    /// Adds a unit cube mesh under `parent` (or as a root) at `translation`.
    pub fn add_cube(
        scene: &mut Scene,
        materials: &MaterialManager,
        parent: Option<ObjectId>,
        name: &str,
        translation: Vec3,
    ) -> ObjectId {
        let model_id = scene.add_model(SceneModel::new(cube(name, 0.5)));
        let mut object = Object3D::mesh(name, model_id, materials.default_material());
        object.transform.set_translation(translation);

        match parent {
            Some(parent_id) => scene.add_child(parent_id, object),
            None => scene.add_object(object),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::add_cube;
    use super::*;

    #[test]
    fn child_world_matrix_includes_parent() {
        let materials = MaterialManager::new();
        let mut scene = Scene::new();
        let mut group = Object3D::group("Group");
        group.transform.set_translation(Vec3::new(10.0, 0.0, 0.0));
        let group_id = scene.add_object(group);
        let cube_id = add_cube(&mut scene, &materials, Some(group_id), "Cube", Vec3::Y);

        scene.update_world_transforms();

        let position = scene.world_matrix(cube_id).transform_point3(Vec3::ZERO);
        assert_eq!(position, Vec3::new(10.0, 1.0, 0.0));

        scene.set_object_translation(group_id, Vec3::new(-10.0, 0.0, 0.0));
        scene.update_world_transforms();

        let position = scene.world_matrix(cube_id).transform_point3(Vec3::ZERO);
        assert_eq!(position, Vec3::new(-10.0, 1.0, 0.0));
    }

    #[test]
    fn descendants_are_listed_parent_first() {
        let materials = MaterialManager::new();
        let mut scene = Scene::new();
        let group_id = scene.add_object(Object3D::group("Group"));
        let a = add_cube(&mut scene, &materials, Some(group_id), "A", Vec3::ZERO);
        let b = add_cube(&mut scene, &materials, Some(a), "B", Vec3::ZERO);

        assert_eq!(scene.descendants(group_id), vec![group_id, a, b]);
        assert_eq!(scene.meshes_under(group_id), vec![a, b]);
        assert_eq!(scene.root_objects(), vec![group_id]);
    }

    #[test]
    fn raycast_returns_nearest_mesh() {
        let materials = MaterialManager::new();
        let mut scene = Scene::new();
        let near = add_cube(&mut scene, &materials, None, "Near", Vec3::new(0.0, 0.0, -2.0));
        let far = add_cube(&mut scene, &materials, None, "Far", Vec3::new(0.0, 0.0, 2.0));
        scene.update_world_transforms();

        let ray = Ray::new(Vec3::new(0.1, 0.2, -10.0), Vec3::Z);
        let hit = scene.raycast(&ray, &[far, near]).unwrap();

        assert_eq!(hit.object_id, near);
        assert!((hit.distance - 7.5).abs() < 1e-4);
        assert!((hit.point.z + 2.5).abs() < 1e-4);
    }

    #[test]
    fn raycast_ignores_objects_outside_roots() {
        let materials = MaterialManager::new();
        let mut scene = Scene::new();
        add_cube(&mut scene, &materials, None, "Unlisted", Vec3::ZERO);
        scene.update_world_transforms();

        let ray = Ray::new(Vec3::new(0.0, 0.0, -10.0), Vec3::Z);
        assert!(scene.raycast(&ray, &[]).is_none());
    }

    #[test]
    fn world_bounds_cover_all_meshes() {
        let materials = MaterialManager::new();
        let mut scene = Scene::new();
        let group_id = scene.add_object(Object3D::group("Group"));
        add_cube(&mut scene, &materials, Some(group_id), "A", Vec3::new(-2.0, 0.0, 0.0));
        add_cube(&mut scene, &materials, Some(group_id), "B", Vec3::new(2.0, 0.0, 0.0));
        scene.update_world_transforms();

        let bounds = scene.world_bounds(group_id);
        assert_eq!(bounds.min, Vec3::new(-2.5, -0.5, -0.5));
        assert_eq!(bounds.max, Vec3::new(2.5, 0.5, 0.5));
    }

    #[test]
    fn helpers_can_be_removed_by_id() {
        let mut scene = Scene::new();
        let grid = scene.add_helper(Helper::Grid {
            size: 1.0,
            divisions: 1,
            color: glam::Vec4::ONE,
        });
        let other = scene.add_helper(Helper::Grid {
            size: 2.0,
            divisions: 2,
            color: glam::Vec4::ONE,
        });

        assert!(scene.remove_helper(grid).is_some());
        assert!(scene.remove_helper(grid).is_none());
        assert_eq!(scene.helpers().count(), 1);
        assert!(scene.get_helper_mut(other).is_some());
    }
}
