//! Stretches meshes along X by interpolating vertex positions towards
//! `x * (1 + factor)`.
//!
//! Targets are always computed from a snapshot of the untouched geometry,
//! taken the first time a mesh is deformed. Animations are stepped from the
//! render loop; each object has at most one, and starting another replaces
//! it.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use glam::Vec3;

use crate::scene_graph::object3d::ObjectId;
use crate::scene_graph::scene::Scene;
use crate::scene_graph::scene_model::SceneModelId;

pub const DEFAULT_DURATION: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SnapshotKey {
    mesh_id: ObjectId,
    model_id: SceneModelId,
}

struct MeshTrack {
    key: SnapshotKey,
    from: Vec<Vec3>,
    to: Vec<Vec3>,
}

struct ExtensionAnimation {
    generation: u64,
    start: Instant,
    tracks: Vec<MeshTrack>,
}

pub struct ExtensionAnimator {
    duration: Duration,
    originals: HashMap<SnapshotKey, Vec<Vec3>>,
    animations: HashMap<ObjectId, ExtensionAnimation>,
    next_generation: u64,
}

impl ExtensionAnimator {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            originals: HashMap::new(),
            animations: HashMap::new(),
            next_generation: 0,
        }
    }

    /// Deforms every mesh under `object`. With `animate`, the change is
    /// spread over the configured duration by subsequent `step` calls and the
    /// new animation's generation is returned.
    pub fn extend(
        &mut self,
        scene: &mut Scene,
        object: ObjectId,
        factor: f32,
        animate: bool,
        now: Instant,
    ) -> Option<u64> {
        if let Some(cancelled) = self.animations.remove(&object) {
            log::debug!(
                "Cancelling extension animation {} of {}",
                cancelled.generation,
                scene.object_name(object)
            );
        }

        let mut tracks = Vec::new();

        for mesh_id in scene.meshes_under(object) {
            let Some(model_id) = scene.get_object(mesh_id).and_then(|mesh| mesh.model_id) else {
                continue;
            };
            let Some(scene_model) = scene.get_model(model_id) else {
                continue;
            };

            let key = SnapshotKey { mesh_id, model_id };
            let current = scene_model.model.positions();
            let original = self.originals.entry(key).or_insert_with(|| current.clone());

            let target = original
                .iter()
                .map(|position| Vec3::new(position.x * (1.0 + factor), position.y, position.z))
                .collect();

            tracks.push(MeshTrack {
                key,
                from: current,
                to: target,
            });
        }

        if !animate || self.duration.is_zero() {
            for track in &tracks {
                write_positions(scene, track.key.model_id, &track.to);
            }
            return None;
        }

        let generation = self.next_generation;
        self.next_generation += 1;

        log::debug!(
            "Starting extension animation {} of {} to factor {:.2}",
            generation,
            scene.object_name(object),
            factor
        );

        self.animations.insert(
            object,
            ExtensionAnimation {
                generation,
                start: now,
                tracks,
            },
        );

        Some(generation)
    }

    /// Advances all running animations and returns the objects whose
    /// animation completed during this step.
    pub fn step(&mut self, scene: &mut Scene, now: Instant) -> Vec<ObjectId> {
        let mut finished = Vec::new();

        for (&object, animation) in &self.animations {
            let elapsed = now.saturating_duration_since(animation.start);
            let progress = (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0);

            for track in &animation.tracks {
                if progress >= 1.0 {
                    write_positions(scene, track.key.model_id, &track.to);
                    continue;
                }

                let positions: Vec<Vec3> = track
                    .from
                    .iter()
                    .zip(&track.to)
                    .map(|(from, to)| from.lerp(*to, progress))
                    .collect();
                write_positions(scene, track.key.model_id, &positions);
            }

            if progress >= 1.0 {
                finished.push(object);
            }
        }

        for object in &finished {
            self.animations.remove(object);
        }

        finished
    }

    pub fn is_animating(&self, object: ObjectId) -> bool {
        self.animations.contains_key(&object)
    }

    #[cfg(test)]
    pub fn active_generation(&self, object: ObjectId) -> Option<u64> {
        self.animations
            .get(&object)
            .map(|animation| animation.generation)
    }

    /// Restores the meshes under `object` to their snapshots and cancels its
    /// animation.
    pub fn reset(&mut self, scene: &mut Scene, object: ObjectId) {
        self.animations.remove(&object);

        let meshes = scene.meshes_under(object);
        for (key, original) in &self.originals {
            if meshes.contains(&key.mesh_id) {
                write_positions(scene, key.model_id, original);
            }
        }
    }

    /// Restores every mesh ever deformed and cancels all animations.
    pub fn reset_all(&mut self, scene: &mut Scene) {
        self.animations.clear();

        for (key, original) in &self.originals {
            write_positions(scene, key.model_id, original);
        }
    }

    #[cfg(test)]
    pub fn original_positions(&self, mesh_id: ObjectId, model_id: SceneModelId) -> Option<&[Vec3]> {
        self.originals
            .get(&SnapshotKey { mesh_id, model_id })
            .map(Vec::as_slice)
    }
}

fn write_positions(scene: &mut Scene, model_id: SceneModelId, positions: &[Vec3]) {
    if let Some(scene_model) = scene.get_model_mut(model_id) {
        scene_model.model.set_positions(positions);
        scene_model.mark_vertices_dirty();
    }
}
