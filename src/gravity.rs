//! Decorative idle float for top-level groups. Purely cosmetic: participants
//! drift upwards, bounce softly under a ceiling and spin slowly, then snap
//! back to where they were registered when switched off.

use glam::{EulerRot, Quat, Vec3};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::scene_graph::object3d::ObjectId;
use crate::scene_graph::scene::Scene;

/// Highest a participant may rise above its registered position.
pub const MAX_RISE: f32 = 0.5;

const FRAMES_PER_SECOND: f32 = 60.0;
const LIFT: f32 = 0.0004;
const BOUNCE: f32 = 0.5;
const JITTER: f32 = 0.0002;
const HORIZONTAL_DAMPING: f32 = 0.98;
const MAX_SPIN: f32 = 0.01;
const MAX_INITIAL_SPEED: f32 = 0.005;

struct Participant {
    object: ObjectId,
    original_translation: Vec3,
    original_rotation: Quat,
    velocity: Vec3,
    spin: Vec3,
}

pub struct GravityAnimator {
    participants: Vec<Participant>,
    active: bool,
    rng: StdRng,
}

impl GravityAnimator {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            participants: Vec::new(),
            active: false,
            rng,
        }
    }

    /// Records the object's current transform as its rest pose. Registering
    /// the same object twice keeps the first pose.
    pub fn register(&mut self, scene: &Scene, object: ObjectId) {
        if self.participants.iter().any(|p| p.object == object) {
            return;
        }

        let Some(transform) = scene.get_object_transform(object) else {
            return;
        };

        let (velocity, spin) = self.random_motion();
        self.participants.push(Participant {
            object,
            original_translation: transform.translation(),
            original_rotation: transform.rotation(),
            velocity,
            spin,
        });
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, scene: &mut Scene, active: bool) {
        if self.active == active {
            return;
        }

        self.active = active;

        if active {
            log::info!("Gravity on ({} participants)", self.participants.len());
        } else {
            log::info!("Gravity off, restoring rest poses");
            self.restore(scene);
        }
    }

    pub fn toggle(&mut self, scene: &mut Scene) -> bool {
        self.set_active(scene, !self.active);
        self.active
    }

    pub fn update(&mut self, scene: &mut Scene, delta_seconds: f32) {
        if !self.active {
            return;
        }

        let frames = delta_seconds * FRAMES_PER_SECOND;
        let damping = HORIZONTAL_DAMPING.powf(frames);

        for participant in &mut self.participants {
            let Some(transform) = scene.get_object_transform(participant.object) else {
                continue;
            };
            let mut translation = transform.translation();

            participant.velocity.y += LIFT * frames;
            participant.velocity.x += self.rng.gen_range(-JITTER..=JITTER) * frames;
            participant.velocity.z += self.rng.gen_range(-JITTER..=JITTER) * frames;
            participant.velocity.x *= damping;
            participant.velocity.z *= damping;

            translation += participant.velocity * frames;

            let rise = translation.y - participant.original_translation.y;
            if rise > MAX_RISE {
                translation.y = participant.original_translation.y + MAX_RISE;
                participant.velocity.y = -participant.velocity.y.abs() * BOUNCE;
            } else if rise < 0.0 {
                translation.y = participant.original_translation.y;
                participant.velocity.y = participant.velocity.y.abs() * BOUNCE;
            }

            let spin = participant.spin * frames;
            let delta_rotation = Quat::from_euler(EulerRot::XYZ, spin.x, spin.y, spin.z);

            scene.modify_object_transform(participant.object, |transform| {
                transform.set_translation(translation);
                transform.rotate(delta_rotation);
            });
        }
    }

    fn restore(&mut self, scene: &mut Scene) {
        for index in 0..self.participants.len() {
            let (velocity, spin) = self.random_motion();
            let participant = &mut self.participants[index];

            scene.modify_object_transform(participant.object, |transform| {
                transform.set_translation(participant.original_translation);
                transform.set_rotation(participant.original_rotation);
            });

            participant.velocity = velocity;
            participant.spin = spin;
        }
    }

    fn random_motion(&mut self) -> (Vec3, Vec3) {
        let velocity = Vec3::new(
            self.rng.gen_range(-MAX_INITIAL_SPEED..=MAX_INITIAL_SPEED),
            self.rng.gen_range(0.0..=MAX_INITIAL_SPEED),
            self.rng.gen_range(-MAX_INITIAL_SPEED..=MAX_INITIAL_SPEED),
        );
        let spin = Vec3::new(
            self.rng.gen_range(-MAX_SPIN..=MAX_SPIN),
            self.rng.gen_range(-MAX_SPIN..=MAX_SPIN),
            self.rng.gen_range(-MAX_SPIN..=MAX_SPIN),
        );

        (velocity, spin)
    }
}
