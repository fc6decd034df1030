use std::time::{Duration, Instant};

use glam::{Vec2, Vec4};

use crate::camera::Camera;
use crate::config::ViewerConfig;
use crate::controls::OrbitControls;
use crate::extension::ExtensionAnimator;
use crate::gravity::GravityAnimator;
use crate::lighting::Lights;
use crate::material_manager::MaterialManager;
use crate::model_loader;
use crate::scene_graph::helpers::Helper;
use crate::scene_graph::object3d::ObjectId;
use crate::scene_graph::scene::Scene;
use crate::selection::{EditContext, SelectionManager};
use crate::texture_manager::TextureManager;
use crate::ui::panel::{PanelState, UiEvent};

pub struct ViewerState {
    pub config: ViewerConfig,
    pub camera: Camera,
    pub controls: OrbitControls,
    pub lights: Lights,
    pub scene: Scene,
    pub materials: MaterialManager,
    pub textures: TextureManager,
    pub extension: ExtensionAnimator,
    pub gravity: GravityAnimator,
    pub selection: SelectionManager,
    pub panel: PanelState,
    pub groups: Vec<ObjectId>,
}

impl ViewerState {
    /// Builds the scene without any models.
    pub fn empty(config: ViewerConfig) -> Self {
        let camera = Camera::new(config.camera_eye, config.camera_target, 16.0 / 9.0);
        let controls = OrbitControls::new(config.camera_eye, config.camera_target);

        let mut scene = Scene::new();
        scene.add_helper(Helper::Grid {
            size: config.grid_size,
            divisions: config.grid_divisions,
            color: Vec4::new(0.4, 0.4, 0.4, 1.0),
        });

        let panel = PanelState::new(
            config.textures.clone(),
            (config.extension_min, config.extension_max),
        );

        Self {
            camera,
            controls,
            lights: Lights::default(),
            scene,
            materials: MaterialManager::new(),
            textures: TextureManager::new(),
            extension: ExtensionAnimator::new(Duration::from_millis(config.extension_duration_ms)),
            gravity: GravityAnimator::new(),
            selection: SelectionManager::new(),
            panel,
            groups: Vec::new(),
            config,
        }
    }

    /// Builds the scene and loads every configured model.
    pub fn new(config: ViewerConfig) -> Self {
        let mut state = Self::empty(config);

        let groups =
            model_loader::load_models(&mut state.scene, &mut state.materials, &state.config.models);
        if groups.is_empty() {
            log::warn!("No models loaded");
        }

        state.scene.update_world_transforms();
        for group in groups {
            state.add_group(group);
        }

        state
    }

    /// Makes a top-level group selectable and lets it float with gravity.
    pub fn add_group(&mut self, group: ObjectId) {
        self.selection.add_candidate(group);
        self.gravity.register(&self.scene, group);
        self.groups.push(group);
    }

    fn edit(&mut self) -> (&mut SelectionManager, EditContext<'_>, &Camera) {
        (
            &mut self.selection,
            EditContext {
                scene: &mut self.scene,
                materials: &mut self.materials,
                textures: &mut self.textures,
                extension: &mut self.extension,
                panel: &mut self.panel,
            },
            &self.camera,
        )
    }

    pub fn cursor_moved(&mut self, ndc: Vec2) {
        self.selection.set_cursor(ndc);
    }

    pub fn pick(&mut self) {
        let (selection, mut ctx, camera) = self.edit();
        selection.pick(&mut ctx, camera);
    }

    pub fn handle_ui_event(&mut self, event: UiEvent, now: Instant) {
        match event {
            UiEvent::ExtensionChanged(factor) => {
                let (selection, mut ctx, _) = self.edit();
                selection.request_extension(&mut ctx, factor, now);
            }
            UiEvent::ExtensionReset => {
                let (selection, mut ctx, _) = self.edit();
                selection.reset_extension(&mut ctx);
            }
            UiEvent::ExtensionResetAll => {
                let (selection, mut ctx, _) = self.edit();
                selection.reset_all_extensions(&mut ctx);
            }
            UiEvent::TextureSelected(path) => {
                let (selection, mut ctx, _) = self.edit();
                selection.apply_texture(&mut ctx, &path);
            }
            UiEvent::TextureReset => {
                let (selection, mut ctx, _) = self.edit();
                selection.reset_texture(&mut ctx);
            }
            UiEvent::GravityToggled => {
                self.panel.gravity_enabled = self.gravity.toggle(&mut self.scene);
            }
        }
    }

    /// Advances everything that moves on its own.
    pub fn update(&mut self, delta: Duration, now: Instant) {
        self.controls.update(&mut self.camera);

        self.extension.step(&mut self.scene, now);
        self.gravity.update(&mut self.scene, delta.as_secs_f32());
        self.scene.update_world_transforms();

        let (selection, mut ctx, _) = self.edit();
        selection.update(&mut ctx, now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TextureChoice;
    use crate::scene_graph::object3d::Object3D;
    use crate::scene_graph::scene::test_support::add_cube;
    use crate::texture_manager::test_support::write_png;
    use glam::Vec3;
    use tempfile::TempDir;

    fn viewer_with_cube(textures: Vec<TextureChoice>) -> (ViewerState, ObjectId) {
        let config = ViewerConfig {
            models: Vec::new(),
            textures,
            camera_eye: Vec3::new(0.0, 0.0, 6.0),
            camera_target: Vec3::ZERO,
            ..ViewerConfig::default()
        };
        let mut viewer = ViewerState::empty(config);

        let group = viewer.scene.add_object(Object3D::group("Box"));
        add_cube(&mut viewer.scene, &viewer.materials, Some(group), "BoxMesh", Vec3::ZERO);
        viewer.scene.update_world_transforms();
        viewer.add_group(group);

        (viewer, group)
    }

    #[test]
    fn default_config_loads_shipped_assets() {
        let mut viewer = ViewerState::new(ViewerConfig::default());

        let names: Vec<&str> = viewer
            .groups
            .iter()
            .map(|&group| viewer.scene.object_name(group))
            .collect();
        assert_eq!(names, vec!["crate", "pillar"]);
        // Plinth with the column nested below it.
        assert_eq!(viewer.scene.meshes_under(viewer.groups[1]).len(), 2);

        let group = viewer.groups[0];
        for choice in viewer.config.textures.clone() {
            viewer
                .textures
                .apply_texture(&mut viewer.scene, &mut viewer.materials, group, &choice.path)
                .unwrap();
        }
    }

    #[test]
    fn grid_is_present_without_models() {
        let (viewer, _) = viewer_with_cube(Vec::new());
        assert!(viewer
            .scene
            .helpers()
            .any(|helper| matches!(helper, Helper::Grid { .. })));
    }

    #[test]
    fn ui_events_reach_the_selection() {
        let dir = TempDir::new().unwrap();
        let wood = write_png(dir.path(), "wood.png", [150, 100, 50, 255]);
        let (mut viewer, group) = viewer_with_cube(vec![TextureChoice {
            label: "Wood".to_string(),
            path: wood.clone(),
        }]);
        let now = Instant::now();

        viewer.cursor_moved(Vec2::ZERO);
        viewer.pick();
        assert_eq!(viewer.selection.selected(), Some(group));

        viewer.handle_ui_event(UiEvent::TextureSelected(wood.clone()), now);
        assert_eq!(viewer.panel.active_texture.as_deref(), Some(wood.as_str()));

        viewer.handle_ui_event(UiEvent::ExtensionChanged(1.0), now);
        assert!(viewer.extension.is_animating(group));

        viewer.update(Duration::from_millis(16), now + Duration::from_secs(1));
        assert!(!viewer.extension.is_animating(group));

        viewer.handle_ui_event(UiEvent::TextureReset, now);
        assert_eq!(viewer.panel.active_texture, None);
    }

    #[test]
    fn reset_all_event_restores_deselected_model() {
        let (mut viewer, group) = viewer_with_cube(Vec::new());
        let now = Instant::now();
        let mesh = viewer.scene.meshes_under(group)[0];
        let model = viewer.scene.get_object(mesh).unwrap().model_id.unwrap();
        let loaded = viewer.scene.get_model(model).unwrap().model.positions();

        viewer.cursor_moved(Vec2::ZERO);
        viewer.pick();
        viewer.handle_ui_event(UiEvent::ExtensionChanged(1.0), now);
        viewer.update(Duration::from_millis(16), now + Duration::from_secs(1));

        viewer.cursor_moved(Vec2::new(0.9, 0.9));
        viewer.pick();
        assert_eq!(viewer.selection.selected(), None);

        viewer.handle_ui_event(UiEvent::ExtensionResetAll, now);
        assert_eq!(viewer.scene.get_model(model).unwrap().model.positions(), loaded);
    }

    #[test]
    fn gravity_toggle_updates_panel_and_restores_pose() {
        let (mut viewer, group) = viewer_with_cube(Vec::new());
        let now = Instant::now();

        viewer.handle_ui_event(UiEvent::GravityToggled, now);
        assert!(viewer.panel.gravity_enabled);
        assert!(viewer.gravity.is_active());

        for frame in 1..30 {
            viewer.update(
                Duration::from_millis(16),
                now + Duration::from_millis(16 * frame),
            );
        }

        viewer.handle_ui_event(UiEvent::GravityToggled, now);
        assert!(!viewer.panel.gravity_enabled);
        let transform = viewer.scene.get_object_transform(group).unwrap();
        assert_eq!(transform.translation(), Vec3::ZERO);
    }

    #[test]
    fn indicator_tracks_floating_group() {
        let (mut viewer, group) = viewer_with_cube(Vec::new());
        let now = Instant::now();

        viewer.pick();
        viewer.handle_ui_event(UiEvent::GravityToggled, now);
        for frame in 1..60 {
            viewer.update(
                Duration::from_millis(16),
                now + Duration::from_millis(16 * frame),
            );
        }

        let expected = viewer.scene.world_bounds(group);
        let indicator = viewer
            .scene
            .helpers()
            .find_map(|helper| match helper {
                Helper::BoundingBox { bounds, .. } => Some(*bounds),
                _ => None,
            })
            .unwrap();
        assert_eq!(indicator, expected);
    }
}
