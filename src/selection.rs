//! Right-click selection of top-level models and the per-model edit state
//! that follows the selection around.
//!
//! Edits survive deselection: a model keeps its stretched geometry and
//! swapped texture when something else is selected, and the panel shows the
//! same values again when it is reselected.

use std::collections::HashMap;
use std::time::Instant;

use glam::Vec2;

use crate::camera::Camera;
use crate::extension::ExtensionAnimator;
use crate::material_manager::MaterialManager;
use crate::scene_graph::helpers::{Helper, HelperId};
use crate::scene_graph::object3d::ObjectId;
use crate::scene_graph::scene::Scene;
use crate::texture_manager::TextureManager;
use crate::ui::panel::PanelState;

/// Slider changes smaller than this are ignored.
pub const EXTENSION_DEAD_ZONE: f32 = 0.01;

/// Mutable access to everything a selection change touches.
pub struct EditContext<'a> {
    pub scene: &'a mut Scene,
    pub materials: &'a mut MaterialManager,
    pub textures: &'a mut TextureManager,
    pub extension: &'a mut ExtensionAnimator,
    pub panel: &'a mut PanelState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Unselected,
    Selected { object: ObjectId, indicator: HelperId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionRequest {
    Started(u64),
    Ignored,
    WithinDeadZone,
    /// Held back until the running animation finishes.
    Deferred,
}

pub struct SelectionManager {
    candidates: Vec<ObjectId>,
    cursor_ndc: Vec2,
    selection: Selection,
    current_extension: f32,
    current_texture: Option<String>,
    pending_extension: Option<f32>,
    extension_memory: HashMap<ObjectId, f32>,
    texture_memory: HashMap<ObjectId, String>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self {
            candidates: Vec::new(),
            cursor_ndc: Vec2::ZERO,
            selection: Selection::Unselected,
            current_extension: 0.0,
            current_texture: None,
            pending_extension: None,
            extension_memory: HashMap::new(),
            texture_memory: HashMap::new(),
        }
    }

    pub fn add_candidate(&mut self, object: ObjectId) {
        if !self.candidates.contains(&object) {
            self.candidates.push(object);
        }
    }

    pub fn set_cursor(&mut self, ndc: Vec2) {
        self.cursor_ndc = ndc;
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn selected(&self) -> Option<ObjectId> {
        match self.selection {
            Selection::Selected { object, .. } => Some(object),
            Selection::Unselected => None,
        }
    }

    pub fn current_extension(&self) -> f32 {
        self.current_extension
    }

    pub fn current_texture(&self) -> Option<&str> {
        self.current_texture.as_deref()
    }

    /// The candidate under the cursor, if any. Hits on nested meshes resolve
    /// to the candidate that contains them.
    pub fn hit_test(&self, scene: &Scene, camera: &Camera) -> Option<ObjectId> {
        let ray = camera.ray_through(self.cursor_ndc);
        let hit = scene.raycast(&ray, &self.candidates)?;

        let mut current = Some(hit.object_id);
        while let Some(id) = current {
            if self.candidates.contains(&id) {
                return Some(id);
            }
            current = scene.get_object(id).and_then(|object| object.parent_id);
        }

        None
    }

    /// Hit test at the cursor and select the result, or deselect on a miss.
    pub fn pick(&mut self, ctx: &mut EditContext, camera: &Camera) {
        let target = self.hit_test(ctx.scene, camera);
        self.select(ctx, target);
    }

    pub fn select(&mut self, ctx: &mut EditContext, target: Option<ObjectId>) {
        if self.selected() == target {
            return;
        }

        if let Selection::Selected { object, indicator } = self.selection {
            // The panel already shows a held value, so it lands before the
            // object is left behind.
            if let Some(factor) = self.pending_extension.take() {
                self.current_extension = factor;
                ctx.extension
                    .extend(ctx.scene, object, factor, false, Instant::now());
            }
            self.remember(object);
            ctx.scene.remove_helper(indicator);
        }

        let Some(object) = target else {
            log::info!("Selection cleared");
            self.selection = Selection::Unselected;
            self.current_extension = 0.0;
            self.current_texture = None;
            ctx.panel.hide();
            return;
        };

        log::info!("Selected {}", ctx.scene.object_name(object));

        let bounds = ctx.scene.world_bounds(object);
        let indicator = ctx.scene.add_helper(Helper::bounding_box(object, bounds));
        self.selection = Selection::Selected { object, indicator };

        self.current_extension = self.extension_memory.get(&object).copied().unwrap_or(0.0);
        if self.current_extension != 0.0 {
            ctx.extension
                .extend(ctx.scene, object, self.current_extension, false, Instant::now());
        }

        self.current_texture = self.texture_memory.get(&object).cloned();
        if let Some(path) = &self.current_texture {
            if let Err(e) = ctx.textures.apply_texture(ctx.scene, ctx.materials, object, path) {
                log::error!("{:#}", e);
            }
        }

        ctx.panel.show(
            ctx.scene.object_name(object),
            self.current_extension,
            self.current_texture.as_deref(),
        );
    }

    fn remember(&mut self, object: ObjectId) {
        if self.current_extension != 0.0 {
            self.extension_memory.insert(object, self.current_extension);
        } else {
            self.extension_memory.remove(&object);
        }

        match &self.current_texture {
            Some(path) => {
                self.texture_memory.insert(object, path.clone());
            }
            None => {
                self.texture_memory.remove(&object);
            }
        }
    }

    /// Slider input for the selected object.
    pub fn request_extension(
        &mut self,
        ctx: &mut EditContext,
        factor: f32,
        now: Instant,
    ) -> ExtensionRequest {
        let Some(object) = self.selected() else {
            return ExtensionRequest::Ignored;
        };

        if (factor - self.current_extension).abs() < EXTENSION_DEAD_ZONE {
            // Back at the running target: a held value is no longer wanted.
            self.pending_extension = None;
            return ExtensionRequest::WithinDeadZone;
        }

        if ctx.extension.is_animating(object) {
            self.pending_extension = Some(factor);
            return ExtensionRequest::Deferred;
        }

        self.current_extension = factor;
        ctx.panel.extension = factor;

        match ctx.extension.extend(ctx.scene, object, factor, true, now) {
            Some(generation) => ExtensionRequest::Started(generation),
            None => ExtensionRequest::Ignored,
        }
    }

    /// Puts the selected object's geometry back to how it was loaded.
    pub fn reset_extension(&mut self, ctx: &mut EditContext) {
        let Some(object) = self.selected() else {
            return;
        };

        ctx.extension.reset(ctx.scene, object);
        self.pending_extension = None;
        self.current_extension = 0.0;
        self.extension_memory.remove(&object);
        ctx.panel.extension = 0.0;
    }

    /// Puts every model's geometry back, selected or not.
    pub fn reset_all_extensions(&mut self, ctx: &mut EditContext) {
        ctx.extension.reset_all(ctx.scene);
        self.pending_extension = None;
        self.current_extension = 0.0;
        self.extension_memory.clear();
        ctx.panel.extension = 0.0;
    }

    pub fn apply_texture(&mut self, ctx: &mut EditContext, path: &str) {
        let Some(object) = self.selected() else {
            return;
        };

        match ctx.textures.apply_texture(ctx.scene, ctx.materials, object, path) {
            Ok(_) => {
                self.current_texture = Some(path.to_string());
                ctx.panel.active_texture = Some(path.to_string());
            }
            Err(e) => log::error!("{:#}", e),
        }
    }

    pub fn reset_texture(&mut self, ctx: &mut EditContext) {
        let Some(object) = self.selected() else {
            return;
        };

        ctx.textures.reset_texture(ctx.scene, object);
        self.current_texture = None;
        self.texture_memory.remove(&object);
        ctx.panel.active_texture = None;
    }

    /// Per-frame: keeps the indicator around the (possibly moving) target and
    /// applies a deferred slider value once the previous animation is done.
    pub fn update(&mut self, ctx: &mut EditContext, now: Instant) {
        let Selection::Selected { object, indicator } = self.selection else {
            return;
        };

        let bounds = ctx.scene.world_bounds(object);
        if let Some(Helper::BoundingBox { bounds: current, .. }) =
            ctx.scene.get_helper_mut(indicator)
        {
            *current = bounds;
        }

        if !ctx.extension.is_animating(object) {
            if let Some(factor) = self.pending_extension.take() {
                self.request_extension(ctx, factor, now);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TextureChoice;
    use crate::extension::DEFAULT_DURATION;
    use crate::math::bounds::AABB;
    use crate::scene_graph::object3d::Object3D;
    use crate::scene_graph::scene::test_support::add_cube;
    use crate::scene_graph::scene_model::SceneModelId;
    use crate::texture_manager::test_support::write_png;
    use glam::Vec3;
    use std::time::Duration;
    use tempfile::TempDir;

    struct Fixture {
        scene: Scene,
        materials: MaterialManager,
        textures: TextureManager,
        extension: ExtensionAnimator,
        panel: PanelState,
        camera: Camera,
        selection: SelectionManager,
        left: ObjectId,
        left_child: ObjectId,
        right: ObjectId,
    }

    impl Fixture {
        fn ctx(&mut self) -> (EditContext<'_>, &mut SelectionManager, &Camera) {
            (
                EditContext {
                    scene: &mut self.scene,
                    materials: &mut self.materials,
                    textures: &mut self.textures,
                    extension: &mut self.extension,
                    panel: &mut self.panel,
                },
                &mut self.selection,
                &self.camera,
            )
        }

        fn point_at(&mut self, world: Vec3) {
            let ndc = self.camera.get_vp_matrix().project_point3(world);
            self.selection.set_cursor(Vec2::new(ndc.x, ndc.y));
        }

        fn pick_at(&mut self, world: Vec3) {
            self.point_at(world);
            let (mut ctx, selection, camera) = self.ctx();
            selection.pick(&mut ctx, camera);
        }

        fn model_of(&self, object: ObjectId) -> SceneModelId {
            self.scene.get_object(object).unwrap().model_id.unwrap()
        }

        fn max_x(&self, mesh: ObjectId) -> f32 {
            self.scene
                .get_model(self.model_of(mesh))
                .unwrap()
                .model
                .positions()
                .iter()
                .map(|p| p.x)
                .fold(f32::MIN, f32::max)
        }
    }

    // Two groups side by side in front of the camera; the left one has a
    // mesh nested one level below its first mesh.
    fn fixture() -> Fixture {
        let materials = MaterialManager::new();
        let mut scene = Scene::new();

        let mut left_group = Object3D::group("Left");
        left_group.transform.set_translation(Vec3::new(-2.0, 0.0, 0.0));
        let left = scene.add_object(left_group);
        let left_mesh = add_cube(&mut scene, &materials, Some(left), "LeftBody", Vec3::ZERO);
        let left_child = add_cube(
            &mut scene,
            &materials,
            Some(left_mesh),
            "LeftHandle",
            Vec3::new(0.0, 1.0, 0.0),
        );

        let mut right_group = Object3D::group("Right");
        right_group.transform.set_translation(Vec3::new(2.0, 0.0, 0.0));
        let right = scene.add_object(right_group);
        add_cube(&mut scene, &materials, Some(right), "RightBody", Vec3::ZERO);

        scene.update_world_transforms();

        let mut selection = SelectionManager::new();
        selection.add_candidate(left);
        selection.add_candidate(right);

        let choices = vec![TextureChoice {
            label: "Red".to_string(),
            path: "red.png".to_string(),
        }];

        Fixture {
            scene,
            materials,
            textures: TextureManager::new(),
            extension: ExtensionAnimator::new(DEFAULT_DURATION),
            panel: PanelState::new(choices, (0.0, 2.0)),
            camera: Camera::new(Vec3::new(0.0, 0.5, 10.0), Vec3::ZERO, 1.0),
            selection,
            left,
            left_child,
            right,
        }
    }

    #[test]
    fn clicking_nested_mesh_selects_top_level_group() {
        let mut f = fixture();

        f.pick_at(Vec3::new(-2.0, 1.1, 0.5));

        assert_eq!(f.selection.selected(), Some(f.left));
        assert!(f.panel.visible);
        assert_eq!(f.panel.model_name, "Left");
        // Sanity check that the click really landed on the nested mesh.
        let ray = f.camera.ray_through(f.selection.cursor_ndc);
        let hit = f.scene.raycast(&ray, &[f.left]).unwrap();
        assert_eq!(hit.object_id, f.left_child);
    }

    #[test]
    fn clicking_empty_space_clears_selection_and_hides_panel() {
        let mut f = fixture();
        f.pick_at(Vec3::new(2.0, 0.0, 0.5));
        assert_eq!(f.selection.selected(), Some(f.right));
        assert_eq!(f.scene.helpers().count(), 1);

        f.pick_at(Vec3::new(0.0, 4.0, 0.0));

        assert_eq!(f.selection.selection(), Selection::Unselected);
        assert!(!f.panel.visible);
        assert_eq!(f.scene.helpers().count(), 0);
    }

    #[test]
    fn indicator_is_replaced_when_switching_selection() {
        let mut f = fixture();
        f.pick_at(Vec3::new(-2.0, 0.0, 0.5));
        f.pick_at(Vec3::new(2.0, 0.0, 0.5));

        let helpers: Vec<_> = f.scene.helpers().collect();
        assert_eq!(helpers.len(), 1);
        match helpers[0] {
            Helper::BoundingBox { target, bounds, .. } => {
                assert_eq!(*target, f.right);
                assert_eq!(bounds.center(), Vec3::new(2.0, 0.0, 0.0));
            }
            other => panic!("unexpected helper {:?}", other),
        }
    }

    #[test]
    fn indicator_follows_moving_target() {
        let mut f = fixture();
        f.pick_at(Vec3::new(2.0, 0.0, 0.5));

        f.scene.set_object_translation(f.right, Vec3::new(2.0, 3.0, 0.0));
        f.scene.update_world_transforms();
        {
            let (mut ctx, selection, _) = f.ctx();
            selection.update(&mut ctx, Instant::now());
        }

        let bounds = match f.scene.helpers().next().unwrap() {
            Helper::BoundingBox { bounds, .. } => *bounds,
            _ => AABB::EMPTY,
        };
        assert_eq!(bounds.center(), Vec3::new(2.0, 3.0, 0.0));
    }

    #[test]
    fn extension_within_dead_zone_starts_no_animation() {
        let mut f = fixture();
        f.pick_at(Vec3::new(2.0, 0.0, 0.5));
        let right = f.right;
        let now = Instant::now();
        let (mut ctx, selection, _) = f.ctx();

        let first = selection.request_extension(&mut ctx, 0.5, now);
        assert!(matches!(first, ExtensionRequest::Started(_)));
        ctx.extension.step(ctx.scene, now + Duration::from_secs(1));

        let second = selection.request_extension(&mut ctx, 0.5, now + Duration::from_secs(1));
        assert_eq!(second, ExtensionRequest::WithinDeadZone);
        let nudge = selection.request_extension(&mut ctx, 0.505, now + Duration::from_secs(1));
        assert_eq!(nudge, ExtensionRequest::WithinDeadZone);
        assert!(!ctx.extension.is_animating(right));
    }

    #[test]
    fn extension_while_animating_is_deferred_then_applied() {
        let mut f = fixture();
        f.pick_at(Vec3::new(2.0, 0.0, 0.5));
        let right = f.right;
        let start = Instant::now();
        let (mut ctx, selection, _) = f.ctx();

        selection.request_extension(&mut ctx, 1.0, start);
        let deferred = selection.request_extension(&mut ctx, 1.5, start);
        assert_eq!(deferred, ExtensionRequest::Deferred);
        assert_eq!(selection.current_extension(), 1.0);

        let done = start + DEFAULT_DURATION;
        ctx.extension.step(ctx.scene, done);
        selection.update(&mut ctx, done);
        assert_eq!(selection.current_extension(), 1.5);
        assert!(ctx.extension.is_animating(right));

        ctx.extension.step(ctx.scene, done + DEFAULT_DURATION);
        let right_mesh = f.scene.meshes_under(right)[0];
        assert!((f.max_x(right_mesh) - 1.25).abs() < 1e-5);
    }

    #[test]
    fn returning_to_running_target_drops_held_value() {
        let mut f = fixture();
        f.pick_at(Vec3::new(2.0, 0.0, 0.5));
        let right = f.right;
        let start = Instant::now();
        let (mut ctx, selection, _) = f.ctx();

        selection.request_extension(&mut ctx, 1.0, start);
        assert_eq!(
            selection.request_extension(&mut ctx, 1.5, start),
            ExtensionRequest::Deferred
        );
        assert_eq!(
            selection.request_extension(&mut ctx, 1.005, start),
            ExtensionRequest::WithinDeadZone
        );

        let done = start + DEFAULT_DURATION;
        ctx.extension.step(ctx.scene, done);
        selection.update(&mut ctx, done);

        assert_eq!(selection.current_extension(), 1.0);
        assert!(!ctx.extension.is_animating(right));
        let right_mesh = f.scene.meshes_under(right)[0];
        assert!((f.max_x(right_mesh) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn held_value_is_applied_when_switching_away() {
        let mut f = fixture();
        f.pick_at(Vec3::new(2.0, 0.0, 0.5));
        let right = f.right;
        let start = Instant::now();
        {
            let (mut ctx, selection, _) = f.ctx();
            selection.request_extension(&mut ctx, 1.0, start);
            selection.request_extension(&mut ctx, 1.5, start);
        }

        f.pick_at(Vec3::new(-2.0, 0.0, 0.5));
        assert!(!f.extension.is_animating(right));
        let right_mesh = f.scene.meshes_under(right)[0];
        assert!((f.max_x(right_mesh) - 1.25).abs() < 1e-5);

        f.pick_at(Vec3::new(2.0, 0.0, 0.5));
        assert_eq!(f.selection.current_extension(), 1.5);
        assert_eq!(f.panel.extension, 1.5);
        assert!((f.max_x(right_mesh) - 1.25).abs() < 1e-5);
    }

    #[test]
    fn reselecting_textured_model_allocates_no_materials() {
        let dir = TempDir::new().unwrap();
        let red = write_png(dir.path(), "red.png", [255, 0, 0, 255]);
        let mut f = fixture();

        f.pick_at(Vec3::new(2.0, 0.0, 0.5));
        {
            let (mut ctx, selection, _) = f.ctx();
            selection.apply_texture(&mut ctx, &red);
        }
        let before = f.materials.materials().count();

        for _ in 0..10 {
            f.pick_at(Vec3::new(-2.0, 0.0, 0.5));
            f.pick_at(Vec3::new(2.0, 0.0, 0.5));
        }

        assert_eq!(f.selection.current_texture(), Some(red.as_str()));
        assert_eq!(f.materials.materials().count(), before);
    }

    #[test]
    fn reset_extension_cancels_and_restores() {
        let mut f = fixture();
        f.pick_at(Vec3::new(2.0, 0.0, 0.5));
        let right = f.right;
        let now = Instant::now();
        {
            let (mut ctx, selection, _) = f.ctx();
            selection.request_extension(&mut ctx, 1.0, now);
            ctx.extension.step(ctx.scene, now + Duration::from_millis(100));
            selection.request_extension(&mut ctx, 1.5, now + Duration::from_millis(100));

            selection.reset_extension(&mut ctx);
            assert!(!ctx.extension.is_animating(right));
            assert_eq!(selection.current_extension(), 0.0);
            assert_eq!(ctx.panel.extension, 0.0);

            // The dropped slider value must not come back later.
            selection.update(&mut ctx, now + Duration::from_secs(1));
            assert!(!ctx.extension.is_animating(right));
        }

        let right_mesh = f.scene.meshes_under(right)[0];
        assert_eq!(f.max_x(right_mesh), 0.5);
    }

    #[test]
    fn reset_all_restores_unselected_models_too() {
        let mut f = fixture();
        let now = Instant::now();

        f.pick_at(Vec3::new(-2.0, 0.0, 0.5));
        {
            let (mut ctx, selection, _) = f.ctx();
            selection.request_extension(&mut ctx, 1.0, now);
            ctx.extension.step(ctx.scene, now + Duration::from_secs(1));
        }
        f.pick_at(Vec3::new(2.0, 0.0, 0.5));
        let right = f.right;
        {
            let (mut ctx, selection, _) = f.ctx();
            selection.request_extension(&mut ctx, 0.6, now);
            selection.reset_all_extensions(&mut ctx);
            assert!(!ctx.extension.is_animating(right));
            assert_eq!(ctx.panel.extension, 0.0);
        }

        let left_mesh = f.scene.meshes_under(f.left)[0];
        let right_mesh = f.scene.meshes_under(f.right)[0];
        assert_eq!(f.max_x(left_mesh), 0.5);
        assert_eq!(f.max_x(right_mesh), 0.5);

        // Nothing is remembered for the left model any more.
        f.pick_at(Vec3::new(-2.0, 0.0, 0.5));
        assert_eq!(f.selection.current_extension(), 0.0);
        assert_eq!(f.max_x(left_mesh), 0.5);
    }

    #[test]
    fn extension_without_selection_is_ignored() {
        let mut f = fixture();
        let (mut ctx, selection, _) = f.ctx();

        assert_eq!(
            selection.request_extension(&mut ctx, 1.0, Instant::now()),
            ExtensionRequest::Ignored
        );
    }

    #[test]
    fn reselecting_restores_extension_and_texture() {
        let dir = TempDir::new().unwrap();
        let red = write_png(dir.path(), "red.png", [255, 0, 0, 255]);
        let mut f = fixture();
        let now = Instant::now();

        f.pick_at(Vec3::new(-2.0, 0.0, 0.5));
        {
            let (mut ctx, selection, _) = f.ctx();
            selection.request_extension(&mut ctx, 0.8, now);
            ctx.extension.step(ctx.scene, now + Duration::from_secs(1));
            selection.apply_texture(&mut ctx, &red);
        }
        let left_mesh = f.scene.meshes_under(f.left)[0];
        let textured = f.scene.get_object(left_mesh).unwrap().material_id;
        let stretched = f.max_x(left_mesh);
        assert!((stretched - 0.9).abs() < 1e-5);

        // Deselect, select the other model, then come back.
        f.pick_at(Vec3::new(0.0, 4.0, 0.0));
        f.pick_at(Vec3::new(2.0, 0.0, 0.5));
        assert_eq!(f.panel.extension, 0.0);
        assert_eq!(f.panel.active_texture, None);

        // Edits were kept while deselected.
        assert_eq!(f.max_x(left_mesh), stretched);

        f.pick_at(Vec3::new(-2.0, 0.0, 0.5));
        assert_eq!(f.selection.selected(), Some(f.left));
        assert_eq!(f.selection.current_extension(), 0.8);
        assert_eq!(f.selection.current_texture(), Some(red.as_str()));
        assert_eq!(f.panel.extension, 0.8);
        assert_eq!(f.panel.active_texture.as_deref(), Some(red.as_str()));
        assert_eq!(f.max_x(left_mesh), stretched);

        let material = f.scene.get_object(left_mesh).unwrap().material_id.unwrap();
        let texture = f.materials.get_material(material).unwrap().base_color_texture;
        let original_texture = f
            .materials
            .get_material(textured.unwrap())
            .unwrap()
            .base_color_texture;
        assert_eq!(texture, original_texture);
    }

    #[test]
    fn texture_reset_clears_memory() {
        let dir = TempDir::new().unwrap();
        let red = write_png(dir.path(), "red.png", [255, 0, 0, 255]);
        let mut f = fixture();
        let original = f.materials.default_material();

        f.pick_at(Vec3::new(2.0, 0.0, 0.5));
        {
            let (mut ctx, selection, _) = f.ctx();
            selection.apply_texture(&mut ctx, &red);
            selection.reset_texture(&mut ctx);
        }
        assert_eq!(f.panel.active_texture, None);

        f.pick_at(Vec3::new(-2.0, 0.0, 0.5));
        f.pick_at(Vec3::new(2.0, 0.0, 0.5));

        assert_eq!(f.selection.current_texture(), None);
        let right_mesh = f.scene.meshes_under(f.right)[0];
        assert_eq!(
            f.scene.get_object(right_mesh).unwrap().material_id,
            Some(original)
        );
    }

    #[test]
    fn failed_texture_keeps_previous_state() {
        let mut f = fixture();
        f.pick_at(Vec3::new(2.0, 0.0, 0.5));
        let (mut ctx, selection, _) = f.ctx();

        selection.apply_texture(&mut ctx, "missing/texture.png");

        assert_eq!(selection.current_texture(), None);
        assert_eq!(ctx.panel.active_texture, None);
    }
}
